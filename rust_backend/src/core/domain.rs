//! Domain models for dialer call records, roster entries and reconciled calls.
//!
//! This module provides the data structures that flow through the reconciliation
//! pipeline: raw dialer events as read from the export, roster rows describing
//! the agents, calls joined with their agent, and the per-agent hourly summary.

use chrono::{NaiveDate, NaiveDateTime, TimeDelta, Timelike};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::time::duration::HmsDuration;
use crate::time::intervals::IntervalBucket;

/// A duration field as it appears in a dialer export.
///
/// Exports are inconsistent: the same column may hold a digit string of
/// seconds, an `H:M:S` clock string, or a spreadsheet duration cell. The raw
/// shape is kept until the duration codec turns it into an [`HmsDuration`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RawDuration {
    /// The cell was empty or absent.
    #[default]
    Missing,
    /// Textual cell content, untrimmed.
    Text(String),
    /// A spreadsheet elapsed-duration value.
    Elapsed(TimeDelta),
}

impl RawDuration {
    /// Returns `true` when the source supplied any value at all.
    pub fn is_present(&self) -> bool {
        match self {
            RawDuration::Missing => false,
            RawDuration::Text(text) => !text.trim().is_empty(),
            RawDuration::Elapsed(_) => true,
        }
    }
}

/// One raw dialer event, immutable once read.
///
/// # Fields
///
/// * `source` - Name of the input table the row came from
/// * `row` - Zero-based data row index inside that table
/// * `started_at` - Parsed start timestamp, `None` when malformed or missing
/// * `agent_identifier` - Raw dialer account string
/// * `call_status` - Raw call outcome label (e.g. "Answered")
/// * `talk` / `hold` / `queue` - Raw duration fields
/// * `customer_number` - Dialed customer number
#[derive(Debug, Clone, PartialEq)]
pub struct CallRecord {
    pub source: String,
    pub row: usize,
    pub started_at: Option<NaiveDateTime>,
    pub agent_identifier: String,
    pub call_status: String,
    pub talk: RawDuration,
    pub hold: RawDuration,
    pub queue: RawDuration,
    pub customer_number: String,
}

impl CallRecord {
    /// Calendar date of the call, derived from the start timestamp.
    pub fn call_date(&self) -> Option<NaiveDate> {
        self.started_at.map(|ts| ts.date())
    }
}

/// One row of the team roster.
///
/// # Examples
///
/// ```
/// use cre_dialer::core::domain::RosterEntry;
///
/// let entry = RosterEntry::new("Jane Doe", "jane@co.com", "Jane Doe", "A", "X");
/// assert!(entry.active);
///
/// let gone = RosterEntry::new("Old Agent", "old@co.com (inactive)", "Old Agent", "A", "X");
/// assert!(!gone.active);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RosterEntry {
    pub identifier: String,
    pub agent_key: String,
    pub full_name: String,
    pub pool: String,
    pub team_lead: String,
    pub active: bool,
}

impl RosterEntry {
    /// Creates a roster entry, deriving the active flag from the inactive marker.
    pub fn new(
        identifier: impl Into<String>,
        agent_key: impl Into<String>,
        full_name: impl Into<String>,
        pool: impl Into<String>,
        team_lead: impl Into<String>,
    ) -> Self {
        let identifier = identifier.into();
        let agent_key = agent_key.into();
        let active = !is_marked_inactive(&identifier) && !is_marked_inactive(&agent_key);
        Self {
            identifier,
            agent_key,
            full_name: full_name.into(),
            pool: pool.into(),
            team_lead: team_lead.into(),
            active,
        }
    }
}

/// Case-insensitive check for the roster's "inactive" marker.
pub fn is_marked_inactive(value: &str) -> bool {
    value.to_lowercase().contains("inactive")
}

/// Normalized call outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CallStatus {
    Connected,
    NotConnected,
}

impl CallStatus {
    /// Maps a raw dialer status: only "answered" (any case) counts as connected.
    pub fn from_source(status: &str) -> Self {
        if status.trim().eq_ignore_ascii_case("answered") {
            CallStatus::Connected
        } else {
            CallStatus::NotConnected
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CallStatus::Connected => "connected",
            CallStatus::NotConnected => "not connected",
        }
    }
}

impl fmt::Display for CallStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a call-log identifier was resolved to its roster entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
    Exact,
    Fuzzy,
}

impl fmt::Display for MatchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchKind::Exact => write!(f, "exact"),
            MatchKind::Fuzzy => write!(f, "fuzzy"),
        }
    }
}

/// A call record joined with its resolved roster entry.
///
/// The agent key is never empty: records that fail to resolve are dropped by
/// the reconciler instead of being carried with a placeholder key. `gap` and
/// `call_gap` are zero/false until the gap calculator has run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgentCall {
    pub agent_key: String,
    pub full_name: String,
    pub pool: String,
    pub team_lead: String,
    pub dialer_name: String,
    pub customer_number: String,
    pub call_status: CallStatus,
    pub started_at: Option<NaiveDateTime>,
    pub talk_time: HmsDuration,
    pub hold_time: HmsDuration,
    pub total_duration: HmsDuration,
    pub gap: HmsDuration,
    pub call_gap: bool,
    pub match_kind: MatchKind,
}

impl AgentCall {
    pub fn call_date(&self) -> Option<NaiveDate> {
        self.started_at.map(|ts| ts.date())
    }

    /// Hour of day (0-23) the call started in.
    pub fn start_hour(&self) -> Option<u32> {
        self.started_at.map(|ts| ts.hour())
    }

    /// Start plus total call duration.
    pub fn ended_at(&self) -> Option<NaiveDateTime> {
        self.started_at
            .and_then(|ts| ts.checked_add_signed(self.total_duration.to_time_delta()))
    }

    pub fn is_connected(&self) -> bool {
        self.call_status == CallStatus::Connected
    }

    /// "Yes"/"No" rendering of the gap flag used by the detail table.
    pub fn call_gap_label(&self) -> &'static str {
        if self.call_gap {
            "Yes"
        } else {
            "No"
        }
    }
}

/// Grouping key of the CRE summary pivot.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct AgentIdentity {
    pub agent_key: String,
    pub full_name: String,
    pub pool: String,
    pub team_lead: String,
}

impl AgentIdentity {
    pub fn of(call: &AgentCall) -> Self {
        Self {
            agent_key: call.agent_key.clone(),
            full_name: call.full_name.clone(),
            pool: call.pool.clone(),
            team_lead: call.team_lead.clone(),
        }
    }
}

/// One row of the CRE summary pivot.
///
/// `calls` and `talk_time` always hold every bucket of the interval scheme the
/// row was built with, zero-filled where the agent had no calls.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreSummaryRow {
    pub agent: AgentIdentity,
    pub calls: BTreeMap<IntervalBucket, u32>,
    pub talk_time: BTreeMap<IntervalBucket, HmsDuration>,
    pub connected_calls: u32,
}

impl CreSummaryRow {
    pub fn total_calls(&self) -> u32 {
        self.calls.values().sum()
    }

    pub fn total_talk_time(&self) -> HmsDuration {
        self.talk_time.values().copied().sum()
    }

    pub fn calls_in(&self, bucket: IntervalBucket) -> u32 {
        self.calls.get(&bucket).copied().unwrap_or(0)
    }

    pub fn talk_time_in(&self, bucket: IntervalBucket) -> HmsDuration {
        self.talk_time.get(&bucket).copied().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 4)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    #[test]
    fn test_call_status_from_source() {
        assert_eq!(CallStatus::from_source("Answered"), CallStatus::Connected);
        assert_eq!(CallStatus::from_source(" ANSWERED "), CallStatus::Connected);
        assert_eq!(CallStatus::from_source("No answer"), CallStatus::NotConnected);
        assert_eq!(CallStatus::from_source(""), CallStatus::NotConnected);
        assert_eq!(CallStatus::Connected.to_string(), "connected");
        assert_eq!(CallStatus::NotConnected.to_string(), "not connected");
    }

    #[test]
    fn test_inactive_marker_on_key_or_identifier() {
        assert!(!RosterEntry::new("INACTIVE ravi", "r@co.com", "Ravi", "A", "X").active);
        assert!(!RosterEntry::new("ravi", "Inactive-r@co.com", "Ravi", "A", "X").active);
        assert!(RosterEntry::new("ravi", "r@co.com", "Ravi", "A", "X").active);
    }

    #[test]
    fn test_raw_duration_presence() {
        assert!(!RawDuration::Missing.is_present());
        assert!(!RawDuration::Text("   ".into()).is_present());
        assert!(RawDuration::Text("00:00:00".into()).is_present());
        assert!(RawDuration::Elapsed(TimeDelta::zero()).is_present());
    }

    #[test]
    fn test_agent_call_end_and_hour() {
        let call = AgentCall {
            agent_key: "J1".into(),
            full_name: "Jane Doe".into(),
            pool: "A".into(),
            team_lead: "X".into(),
            dialer_name: "jane doe".into(),
            customer_number: "555".into(),
            call_status: CallStatus::Connected,
            started_at: Some(at(9, 55, 0)),
            talk_time: HmsDuration::from_seconds(240),
            hold_time: HmsDuration::ZERO,
            total_duration: HmsDuration::from_seconds(300),
            gap: HmsDuration::ZERO,
            call_gap: false,
            match_kind: MatchKind::Exact,
        };

        assert_eq!(call.start_hour(), Some(9));
        assert_eq!(call.ended_at(), Some(at(10, 0, 0)));
        assert_eq!(call.call_gap_label(), "No");
        assert!(call.is_connected());
    }
}
