//! Call analytics over reconciled calls.
//!
//! - [`gaps`]: idle time between consecutive calls per agent and day
//! - [`pivot`]: per-agent hourly pivot of call counts and talk time
//! - [`metrics`]: daily per-agent totals
//!
//! # Example
//!
//! ```ignore
//! use cre_dialer::algorithms::{compute_gaps, daily_metrics, PivotBuilder};
//!
//! let calls = compute_gaps(calls, 60);
//! let summary = PivotBuilder::default().build(&calls);
//! let daily = daily_metrics(&calls);
//! ```

pub mod gaps;
pub mod metrics;
pub mod pivot;

pub use gaps::{compute_gaps, DEFAULT_GAP_THRESHOLD_SECS};
pub use metrics::{daily_metrics, DailyMetrics};
pub use pivot::{build_summary, PivotBuilder};
