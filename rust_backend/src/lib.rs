#[cfg(feature = "python")]
use pyo3::prelude::*;

pub mod algorithms;
pub mod config;
pub mod core;
pub mod io;
pub mod parsing;
pub mod preprocessing;
pub mod time;
pub mod transformations;

#[cfg(feature = "python")]
pub mod python;

pub use crate::config::AnalysisConfig;
pub use crate::core::{DialerError, DialerResult};
pub use crate::preprocessing::{AnalysisPipeline, PipelineCache, PipelineOutput};

/// CRE dialer analytics - call reconciliation and hourly CRE summaries
#[cfg(feature = "python")]
#[pymodule]
fn cre_dialer(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<python::DialerSession>()?;

    m.add_function(wrap_pyfunction!(python::normalize_agent_name, m)?)?;
    m.add_function(wrap_pyfunction!(python::normalize_duration_text, m)?)?;

    Ok(())
}
