//! Dashboard-side transformations of the CRE summary.
//!
//! - [`filtering`]: team lead, pool and CRE selections
//! - [`kpis`]: headline totals and averages
//!
//! # Example
//!
//! ```ignore
//! use cre_dialer::transformations::{compute_kpis, filter_summary, SummaryFilter};
//!
//! let filter = SummaryFilter { pools: vec!["A".into()], ..Default::default() };
//! let kpis = compute_kpis(filter_summary(&summary, &filter));
//! ```

pub mod filtering;
pub mod kpis;

pub use filtering::{distinct_options, filter_summary, FilterOptions, SummaryFilter};
pub use kpis::{compute_kpis, KpiSummary};
