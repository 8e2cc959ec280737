use anyhow::{Context, Result};
use log::{info, warn};
use polars::prelude::DataFrame;
use std::path::Path;

use crate::algorithms::{compute_gaps, daily_metrics, DailyMetrics, PivotBuilder};
use crate::config::AnalysisConfig;
use crate::core::domain::{AgentCall, CallRecord, CreSummaryRow, RosterEntry};
use crate::core::error::DialerResult;
use crate::io::export;
use crate::io::loaders::{DialerLoader, InputSet};
use crate::preprocessing::diagnostics::{InputSummary, PipelineDiagnostics};
use crate::preprocessing::matcher::RosterIndex;
use crate::preprocessing::reconciler::{CallReconciler, ReconcileStats};
use crate::time::intervals::IntervalScheme;
use crate::transformations::{compute_kpis, filter_summary, KpiSummary, SummaryFilter};

/// Result of one analysis run.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    /// Reconciled calls with gaps, ordered by agent, date and start time.
    pub calls: Vec<AgentCall>,
    pub summary: Vec<CreSummaryRow>,
    pub daily: Vec<DailyMetrics>,
    pub diagnostics: PipelineDiagnostics,
    pub scheme: IntervalScheme,
}

impl PipelineOutput {
    pub fn detail_frame(&self) -> DialerResult<DataFrame> {
        export::detail_frame(&self.calls, &self.scheme)
    }

    pub fn summary_frame(&self) -> DialerResult<DataFrame> {
        export::summary_frame(&self.summary, &self.scheme)
    }

    pub fn daily_frame(&self) -> DialerResult<DataFrame> {
        export::daily_frame(&self.daily)
    }

    pub fn detail_csv(&self) -> DialerResult<String> {
        export::frame_to_csv(&mut self.detail_frame()?)
    }

    /// The CRE summary CSV offered for download.
    pub fn summary_csv(&self) -> DialerResult<String> {
        export::frame_to_csv(&mut self.summary_frame()?)
    }

    pub fn daily_csv(&self) -> DialerResult<String> {
        export::frame_to_csv(&mut self.daily_frame()?)
    }

    pub fn diagnostics_report(&self) -> String {
        self.diagnostics.to_report()
    }

    pub fn filtered_summary(&self, filter: &SummaryFilter) -> Vec<&CreSummaryRow> {
        filter_summary(&self.summary, filter)
    }

    /// Summary CSV restricted to the rows accepted by `filter`.
    pub fn filtered_summary_csv(&self, filter: &SummaryFilter) -> DialerResult<String> {
        let rows: Vec<CreSummaryRow> = self.filtered_summary(filter).into_iter().cloned().collect();
        export::frame_to_csv(&mut export::summary_frame(&rows, &self.scheme)?)
    }

    pub fn kpis(&self, filter: &SummaryFilter) -> KpiSummary {
        compute_kpis(self.filtered_summary(filter))
    }
}

/// Main analysis pipeline: load, reconcile, compute gaps, pivot.
#[derive(Debug, Clone)]
pub struct AnalysisPipeline {
    config: AnalysisConfig,
    scheme: IntervalScheme,
}

impl AnalysisPipeline {
    /// Create a new pipeline with default configuration
    pub fn new() -> Self {
        Self {
            config: AnalysisConfig::default(),
            scheme: IntervalScheme::default(),
        }
    }

    /// Create a pipeline with custom configuration
    pub fn with_config(config: AnalysisConfig) -> DialerResult<Self> {
        config.validate()?;
        let scheme = config.interval_scheme()?;
        Ok(Self { config, scheme })
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    pub fn scheme(&self) -> &IntervalScheme {
        &self.scheme
    }

    /// Load and process a set of uploaded files.
    ///
    /// Every input is parsed and checked for required columns before any
    /// stage runs; a structural failure yields no output at all.
    pub fn process(&self, inputs: &InputSet) -> DialerResult<PipelineOutput> {
        let loaded = DialerLoader::load(inputs)?;
        Ok(self.process_records(&loaded.calls, &loaded.roster, loaded.inputs))
    }

    /// Process already-parsed records. Never fails.
    pub fn process_records(
        &self,
        calls: &[CallRecord],
        roster: &[RosterEntry],
        inputs: Vec<InputSummary>,
    ) -> PipelineOutput {
        let mut diagnostics = PipelineDiagnostics {
            inputs,
            ..PipelineDiagnostics::default()
        };

        // Step 1: Index the roster
        let index = RosterIndex::build(roster);
        diagnostics.roster = index.stats().clone();

        if calls.is_empty() {
            warn!("No call records to process");
            diagnostics.add_warning("Call log is empty: no call records were read".to_string());
        }
        if index.is_empty() {
            warn!("Roster has no active agents");
            diagnostics.add_warning("Roster is empty: no active agents to match against".to_string());
        }

        // Step 2: Deduplicate, normalize and match
        let outcome = CallReconciler::new(&index, self.config.matching.mode).reconcile(calls);
        self.check_match_ratio(&outcome.stats, &index, &mut diagnostics);
        diagnostics.reconcile = outcome.stats;
        diagnostics.unmatched = outcome.unmatched;

        // Step 3: Gaps
        let calls = compute_gaps(outcome.calls, self.config.gaps.threshold_secs);

        // Step 4: Pivot and daily metrics
        let summary = PivotBuilder::new(self.scheme).build(&calls);
        let daily = daily_metrics(&calls);

        diagnostics.calls_out = calls.len();
        diagnostics.agents_out = summary.len();

        info!(
            "Pipeline produced {} calls, {} CRE rows, {} daily rows ({} warnings)",
            calls.len(),
            summary.len(),
            daily.len(),
            diagnostics.warnings.len()
        );

        PipelineOutput {
            calls,
            summary,
            daily,
            diagnostics,
            scheme: self.scheme,
        }
    }

    fn check_match_ratio(
        &self,
        stats: &ReconcileStats,
        index: &RosterIndex,
        diagnostics: &mut PipelineDiagnostics,
    ) {
        if index.is_empty() {
            return;
        }
        let Some(ratio) = stats.exact_match_ratio() else {
            return;
        };
        let threshold = self.config.matching.low_match_warning_ratio;
        if ratio < threshold {
            warn!(
                "Low exact match rate: {:.1}% (threshold {:.1}%)",
                ratio * 100.0,
                threshold * 100.0
            );
            diagnostics.add_warning(format!(
                "Only {:.1}% of records matched the roster exactly; check roster Dialer Names",
                ratio * 100.0
            ));
        }
    }
}

impl Default for AnalysisPipeline {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience function to process dialer exports and a roster from disk
pub fn process_dialer_files<P: AsRef<Path>>(
    call_logs: &[P],
    roster: &Path,
    config: Option<AnalysisConfig>,
) -> Result<PipelineOutput> {
    let pipeline = match config {
        Some(config) => AnalysisPipeline::with_config(config).context("Invalid configuration")?,
        None => AnalysisPipeline::new(),
    };
    let inputs = DialerLoader::read_input_set(call_logs, roster)?;
    pipeline
        .process(&inputs)
        .context("Failed to process dialer inputs")
}
