//! Input loading and output export.
//!
//! # Example
//!
//! ```no_run
//! use cre_dialer::io::loaders::DialerLoader;
//! use std::path::Path;
//!
//! let loaded = DialerLoader::load_from_paths(
//!     &["stringee_1.xlsx", "stringee_2.xlsx"],
//!     Path::new("team.csv"),
//! )
//! .expect("Failed to load");
//! println!("Loaded {} call records", loaded.calls.len());
//! ```

pub mod checksum;
pub mod export;
pub mod loaders;

#[cfg(test)]
mod loaders_tests;

pub use checksum::{calculate_checksum, Fingerprint};
pub use export::{daily_frame, detail_frame, frame_to_csv, summary_columns, summary_frame};
pub use loaders::{DialerLoader, InputFile, InputSet, LoadedInputs};
