//! Reconciliation pipeline.
//!
//! - [`matcher`]: roster index and agent matching
//! - [`reconciler`]: dedup, normalize, match and decode raw call records
//! - [`diagnostics`]: counts, unmatched listing and warnings of a run
//! - [`pipeline`]: end-to-end processing of one set of uploads
//! - [`cache`]: memoized runs keyed by input content

pub mod cache;
pub mod diagnostics;
pub mod matcher;
pub mod pipeline;
pub mod reconciler;

pub use cache::PipelineCache;
pub use diagnostics::{InputSummary, PipelineDiagnostics};
pub use matcher::{match_agent, AgentMatcher, MatchMode, RosterIndex};
pub use pipeline::{process_dialer_files, AnalysisPipeline, PipelineOutput};
pub use reconciler::{reconcile_calls, CallReconciler, ReconcileOutcome, ReconcileStats};
