//! Run diagnostics with warnings and a plain-text export.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::Write as _;

use crate::preprocessing::matcher::RosterIndexStats;
use crate::preprocessing::reconciler::ReconcileStats;

/// Rows read from one input table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputSummary {
    pub name: String,
    pub rows: usize,
}

/// Everything the pipeline recovered from instead of failing.
///
/// Warnings never invalidate a run; structural problems are reported as
/// [`DialerError`](crate::core::error::DialerError) before any stage runs.
///
/// # Examples
///
/// ```
/// use cre_dialer::preprocessing::diagnostics::PipelineDiagnostics;
///
/// let mut diagnostics = PipelineDiagnostics::new();
/// diagnostics.add_warning("Roster is empty".to_string());
/// assert!(diagnostics.has_warnings());
/// assert!(diagnostics.to_report().contains("Roster is empty"));
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PipelineDiagnostics {
    pub inputs: Vec<InputSummary>,
    pub roster: RosterIndexStats,
    pub reconcile: ReconcileStats,
    pub unmatched: BTreeMap<String, usize>,
    pub calls_out: usize,
    pub agents_out: usize,
    pub warnings: Vec<String>,
}

impl PipelineDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_warning(&mut self, warning: String) {
        self.warnings.push(warning);
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    pub fn unmatched_count(&self) -> usize {
        self.reconcile.dropped_unmatched
    }

    /// Renders the diagnostics as a text report for download.
    pub fn to_report(&self) -> String {
        let mut out = String::new();
        let stats = &self.reconcile;

        // Writing into a String cannot fail
        let _ = writeln!(out, "CRE dialer diagnostics");
        let _ = writeln!(out, "======================");
        let _ = writeln!(out);

        let _ = writeln!(out, "Inputs:");
        for input in &self.inputs {
            let _ = writeln!(out, "  {}: {} rows", input.name, input.rows);
        }
        let _ = writeln!(
            out,
            "Roster: {} rows, {} indexed ({} inactive, {} blank, {} without key, {} duplicate)",
            self.roster.total_entries,
            self.roster.indexed_entries,
            self.roster.inactive_entries,
            self.roster.blank_identifiers,
            self.roster.missing_agent_keys,
            self.roster.duplicate_identifiers
        );
        let _ = writeln!(out);

        let _ = writeln!(out, "Records read:              {}", stats.records_in);
        let _ = writeln!(out, "Duplicates removed:        {}", stats.duplicates_removed);
        let _ = writeln!(out, "Malformed timestamps:      {}", stats.malformed_timestamps);
        let _ = writeln!(out, "Malformed durations:       {}", stats.malformed_durations);
        let _ = writeln!(out, "Matched (exact):           {}", stats.matched_exact);
        let _ = writeln!(out, "Matched (fuzzy):           {}", stats.matched_fuzzy);
        let _ = writeln!(out, "Dropped (unmatched):       {}", stats.dropped_unmatched);
        let _ = writeln!(out, "Dropped (no talk time):    {}", stats.dropped_missing_talk_time);
        let _ = writeln!(out, "Reconciled calls:          {}", self.calls_out);
        let _ = writeln!(out, "CREs in summary:           {}", self.agents_out);

        if !self.unmatched.is_empty() {
            let _ = writeln!(out);
            let _ = writeln!(out, "Unmatched identifiers:");
            for (name, count) in &self.unmatched {
                let _ = writeln!(out, "  {} ({})", name, count);
            }
        }

        if !self.warnings.is_empty() {
            let _ = writeln!(out);
            let _ = writeln!(out, "Warnings:");
            for warning in &self.warnings {
                let _ = writeln!(out, "  - {}", warning);
            }
        }

        out
    }
}
