//! Core domain models for dialer reconciliation.
//!
//! This module defines the fundamental data structures used throughout the crate,
//! representing raw call records, roster entries, reconciled calls and summary rows,
//! together with the crate's error type.

pub mod domain;
pub mod error;

pub use domain::{
    AgentCall, AgentIdentity, CallRecord, CallStatus, CreSummaryRow, MatchKind, RawDuration,
    RosterEntry,
};
pub use error::{DialerError, DialerResult};
