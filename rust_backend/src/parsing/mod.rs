//! Readers and parsers for dialer exports and the team roster.
//!
//! - [`table`]: load CSV or XLSX bytes into a column-major [`SourceTable`]
//! - [`dialer_parser`]: turn a call-log table into [`CallRecord`](crate::core::CallRecord)s
//! - [`roster_parser`]: turn a roster table into [`RosterEntry`](crate::core::RosterEntry)s
//! - [`names`]: normalize agent identifiers for matching
//!
//! # Example
//!
//! ```no_run
//! use cre_dialer::parsing::{parse_call_log, read_table};
//!
//! let bytes = std::fs::read("stringee_1.csv").expect("read file");
//! let table = read_table("stringee_1.csv", &bytes).expect("load table");
//! let calls = parse_call_log(&table).expect("parse calls");
//! ```

pub mod dialer_parser;
pub mod names;
pub mod roster_parser;
pub mod table;


pub use dialer_parser::{parse_call_log, REQUIRED_CALL_LOG_COLUMNS};
pub use names::normalize_name;
pub use roster_parser::{parse_roster, REQUIRED_ROSTER_COLUMNS};
pub use table::{read_csv_table, read_table, read_xlsx_table, Cell, SourceFormat, SourceTable};
