use pyo3::exceptions::{PyRuntimeError, PyValueError};
use pyo3::prelude::*;
use pyo3::types::PyDict;
use std::sync::Arc;

use crate::config::AnalysisConfig;
use crate::core::domain::RawDuration;
use crate::core::error::DialerError;
use crate::io::loaders::{InputFile, InputSet};
use crate::parsing::names::normalize_name;
use crate::preprocessing::cache::PipelineCache;
use crate::preprocessing::pipeline::{AnalysisPipeline, PipelineOutput};
use crate::time::duration::normalize_duration;
use crate::transformations::{distinct_options, KpiSummary, SummaryFilter};

fn to_py_err(err: &DialerError) -> PyErr {
    match err {
        DialerError::ConfigurationError(_) => PyValueError::new_err(err.to_string()),
        DialerError::MissingRequiredColumn { .. } | DialerError::UnsupportedFormat { .. } => {
            PyValueError::new_err(err.to_string())
        }
        _ => PyRuntimeError::new_err(err.to_string()),
    }
}

fn input_set(call_logs: Vec<(String, Vec<u8>)>, roster: (String, Vec<u8>)) -> InputSet {
    InputSet::new(
        call_logs
            .into_iter()
            .map(|(name, bytes)| InputFile::new(name, bytes))
            .collect(),
        InputFile::new(roster.0, roster.1),
    )
}

fn kpis_dict<'py>(py: Python<'py>, kpis: &KpiSummary) -> PyResult<Bound<'py, PyDict>> {
    let dict = PyDict::new(py);
    dict.set_item("cre_count", kpis.cre_count)?;
    dict.set_item("total_dials", kpis.total_dials)?;
    dict.set_item("total_connected", kpis.total_connected)?;
    dict.set_item("total_talk_secs", kpis.total_talk_secs)?;
    dict.set_item("avg_dials_per_cre", kpis.avg_dials_per_cre)?;
    dict.set_item("avg_talk_secs", kpis.avg_talk_secs)?;
    Ok(dict)
}

/// A dashboard session holding memoized analysis results.
///
/// Args:
///     config_path: Optional path to a dialer.toml file
#[pyclass]
pub struct DialerSession {
    cache: PipelineCache,
}

impl DialerSession {
    fn run(&self, inputs: &InputSet) -> PyResult<Arc<PipelineOutput>> {
        self.cache.get_or_process(inputs).map_err(|e| to_py_err(&e))
    }
}

#[pymethods]
impl DialerSession {
    #[new]
    #[pyo3(signature = (config_path=None))]
    fn new(config_path: Option<&str>) -> PyResult<Self> {
        let config = match config_path {
            Some(path) => AnalysisConfig::from_file(path).map_err(|e| to_py_err(&e))?,
            None => AnalysisConfig::default(),
        };
        let pipeline = AnalysisPipeline::with_config(config).map_err(|e| to_py_err(&e))?;
        Ok(Self {
            cache: PipelineCache::new(pipeline),
        })
    }

    /// Process uploaded call logs and a roster.
    ///
    /// Args:
    ///     call_logs: List of (file name, bytes) for the dialer exports
    ///     roster: (file name, bytes) of the team roster
    ///
    /// Returns:
    ///     dict with summary_csv, detail_csv, daily_csv, diagnostics,
    ///     warnings, unmatched, kpis and filter options
    fn process_uploads<'py>(
        &self,
        py: Python<'py>,
        call_logs: Vec<(String, Vec<u8>)>,
        roster: (String, Vec<u8>),
    ) -> PyResult<Bound<'py, PyDict>> {
        let output = self.run(&input_set(call_logs, roster))?;
        let csv = |r: Result<String, DialerError>| r.map_err(|e| to_py_err(&e));

        let result = PyDict::new(py);
        result.set_item("summary_csv", csv(output.summary_csv())?)?;
        result.set_item("detail_csv", csv(output.detail_csv())?)?;
        result.set_item("daily_csv", csv(output.daily_csv())?)?;
        result.set_item("diagnostics", output.diagnostics_report())?;
        result.set_item("warnings", output.diagnostics.warnings.clone())?;
        result.set_item(
            "unmatched",
            output
                .diagnostics
                .unmatched
                .iter()
                .map(|(name, count)| (name.clone(), *count))
                .collect::<Vec<_>>(),
        )?;
        result.set_item("kpis", kpis_dict(py, &output.kpis(&SummaryFilter::default()))?)?;

        let options = distinct_options(&output.summary);
        result.set_item("team_leads", options.team_leads)?;
        result.set_item("pools", options.pools)?;
        result.set_item("cres", options.cres)?;
        Ok(result)
    }

    /// Summary CSV and KPIs for a dashboard selection.
    ///
    /// Empty selections accept everything.
    #[pyo3(signature = (call_logs, roster, team_leads=Vec::new(), pools=Vec::new(), cres=Vec::new()))]
    fn filtered_summary<'py>(
        &self,
        py: Python<'py>,
        call_logs: Vec<(String, Vec<u8>)>,
        roster: (String, Vec<u8>),
        team_leads: Vec<String>,
        pools: Vec<String>,
        cres: Vec<String>,
    ) -> PyResult<Bound<'py, PyDict>> {
        let output = self.run(&input_set(call_logs, roster))?;
        let filter = SummaryFilter {
            team_leads,
            pools,
            cres,
        };

        let result = PyDict::new(py);
        result.set_item(
            "summary_csv",
            output
                .filtered_summary_csv(&filter)
                .map_err(|e| to_py_err(&e))?,
        )?;
        result.set_item("kpis", kpis_dict(py, &output.kpis(&filter))?)?;
        Ok(result)
    }

    /// Number of pipeline runs this session has started.
    fn computations(&self) -> usize {
        self.cache.computations()
    }

    fn clear(&self) {
        self.cache.clear();
    }
}

/// Normalize an agent identifier the way the matcher does.
#[pyfunction]
pub fn normalize_agent_name(raw: &str) -> String {
    normalize_name(raw)
}

/// Canonical HH:MM:SS form of a raw duration string.
#[pyfunction]
pub fn normalize_duration_text(raw: &str) -> String {
    normalize_duration(&RawDuration::Text(raw.to_string()))
}
