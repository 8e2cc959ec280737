//! Python bindings for the dashboard.
//!
//! The dashboard keeps one [`DialerSession`] per user session and hands it
//! the raw upload bytes on every rerun; results are cached by content.
//!
//! ```python
//! import cre_dialer
//!
//! session = cre_dialer.DialerSession()
//! result = session.process_uploads(
//!     [("stringee_1.xlsx", f1.getvalue()), ("stringee_2.xlsx", f2.getvalue())],
//!     ("team.csv", team.getvalue()),
//! )
//! summary_csv = result["summary_csv"]
//! ```

pub mod session;

pub use session::{normalize_agent_name, normalize_duration_text, DialerSession};
