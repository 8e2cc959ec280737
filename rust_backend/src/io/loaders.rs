use anyhow::{Context, Result};
use log::{debug, info};
use std::fs;
use std::path::Path;

use crate::core::domain::{CallRecord, RosterEntry};
use crate::core::error::DialerResult;
use crate::io::checksum::Fingerprint;
use crate::parsing::table::{read_table, SourceFormat};
use crate::parsing::{parse_call_log, parse_roster};
use crate::preprocessing::diagnostics::InputSummary;

/// One uploaded file: its display name and raw bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputFile {
    pub name: String,
    pub contents: Vec<u8>,
}

impl InputFile {
    pub fn new(name: impl Into<String>, contents: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            contents: contents.into(),
        }
    }

    /// Read a file from disk, naming it after its file name.
    pub fn from_path(path: &Path) -> Result<Self> {
        let contents =
            fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .context("File has no name")?;
        Ok(Self::new(name, contents))
    }

    pub fn format(&self) -> DialerResult<SourceFormat> {
        SourceFormat::from_name(&self.name)
    }
}

/// The inputs of one analysis run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputSet {
    /// Dialer exports, concatenated in this order.
    pub call_logs: Vec<InputFile>,
    pub roster: InputFile,
}

impl InputSet {
    pub fn new(call_logs: Vec<InputFile>, roster: InputFile) -> Self {
        Self { call_logs, roster }
    }

    /// SHA-256 identity of all input names and bytes, in upload order.
    pub fn fingerprint(&self) -> String {
        let mut fingerprint = Fingerprint::new();
        for file in &self.call_logs {
            fingerprint.update("call_log_name", file.name.as_bytes());
            fingerprint.update("call_log", &file.contents);
        }
        fingerprint.update("roster_name", self.roster.name.as_bytes());
        fingerprint.update("roster", &self.roster.contents);
        fingerprint.finish()
    }
}

/// Parsed records of an [`InputSet`].
#[derive(Debug, Clone, Default)]
pub struct LoadedInputs {
    pub calls: Vec<CallRecord>,
    pub roster: Vec<RosterEntry>,
    pub inputs: Vec<InputSummary>,
}

/// Loads dialer exports and rosters from CSV or XLSX.
pub struct DialerLoader;

impl DialerLoader {
    pub fn load_call_log(file: &InputFile) -> DialerResult<Vec<CallRecord>> {
        let table = read_table(&file.name, &file.contents)?;
        let records = parse_call_log(&table)?;
        debug!("Loaded {} call records from {}", records.len(), file.name);
        Ok(records)
    }

    pub fn load_roster(file: &InputFile) -> DialerResult<Vec<RosterEntry>> {
        let table = read_table(&file.name, &file.contents)?;
        let roster = parse_roster(&table)?;
        debug!("Loaded {} roster rows from {}", roster.len(), file.name);
        Ok(roster)
    }

    /// Loads every input, failing on the first structural problem.
    ///
    /// Nothing downstream runs unless every table parses.
    pub fn load(inputs: &InputSet) -> DialerResult<LoadedInputs> {
        let mut loaded = LoadedInputs::default();

        for file in &inputs.call_logs {
            let records = Self::load_call_log(file)?;
            loaded.inputs.push(InputSummary {
                name: file.name.clone(),
                rows: records.len(),
            });
            loaded.calls.extend(records);
        }

        loaded.roster = Self::load_roster(&inputs.roster)?;
        loaded.inputs.push(InputSummary {
            name: inputs.roster.name.clone(),
            rows: loaded.roster.len(),
        });

        info!(
            "Loaded {} call records from {} file(s) and {} roster rows",
            loaded.calls.len(),
            inputs.call_logs.len(),
            loaded.roster.len()
        );
        Ok(loaded)
    }

    /// Reads and loads files from disk.
    pub fn load_from_paths<P: AsRef<Path>>(call_logs: &[P], roster: &Path) -> Result<LoadedInputs> {
        let inputs = Self::read_input_set(call_logs, roster)?;
        Self::load(&inputs).context("Failed to load dialer inputs")
    }

    pub fn read_input_set<P: AsRef<Path>>(call_logs: &[P], roster: &Path) -> Result<InputSet> {
        let call_logs = call_logs
            .iter()
            .map(|p| InputFile::from_path(p.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        let roster = InputFile::from_path(roster).context("Failed to read roster")?;
        Ok(InputSet::new(call_logs, roster))
    }
}
