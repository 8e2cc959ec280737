//! Joins raw dialer events with the roster.
//!
//! Records pass through four steps: deduplication on (customer number, start
//! time), identifier normalization, roster matching, and duration decoding.
//! Records that fail matching or have no talk time are dropped and counted.

use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

use crate::core::domain::{AgentCall, CallRecord, CallStatus, MatchKind, RawDuration, RosterEntry};
use crate::parsing::names::normalize_name;
use crate::preprocessing::matcher::{AgentMatcher, MatchMode, RosterIndex};
use crate::time::duration::{decode_duration, try_decode_duration, HmsDuration};

/// Label used in the unmatched listing for identifiers that normalize to nothing.
pub const BLANK_IDENTIFIER: &str = "(blank)";

/// Per-run reconciliation counters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconcileStats {
    pub records_in: usize,
    pub duplicates_removed: usize,
    pub malformed_timestamps: usize,
    pub malformed_durations: usize,
    pub matched_exact: usize,
    pub matched_fuzzy: usize,
    pub dropped_unmatched: usize,
    pub dropped_missing_talk_time: usize,
}

impl ReconcileStats {
    pub fn matched(&self) -> usize {
        self.matched_exact + self.matched_fuzzy
    }

    /// Share of deduplicated records resolved by exact match, `None` when
    /// there was nothing to match.
    pub fn exact_match_ratio(&self) -> Option<f64> {
        let candidates = self.records_in - self.duplicates_removed;
        (candidates > 0).then(|| self.matched_exact as f64 / candidates as f64)
    }
}

#[derive(Debug, Clone, Default)]
pub struct ReconcileOutcome {
    /// Matched calls in input order; gaps are not yet filled in.
    pub calls: Vec<AgentCall>,
    pub stats: ReconcileStats,
    /// Unmatched normalized identifiers with their record counts.
    pub unmatched: BTreeMap<String, usize>,
}

pub struct CallReconciler<'a> {
    matcher: AgentMatcher<'a>,
}

impl<'a> CallReconciler<'a> {
    pub fn new(index: &'a RosterIndex, mode: MatchMode) -> Self {
        Self {
            matcher: AgentMatcher::new(index, mode),
        }
    }

    pub fn reconcile(&self, records: &[CallRecord]) -> ReconcileOutcome {
        let mut outcome = ReconcileOutcome::default();
        outcome.stats.records_in = records.len();

        let mut seen: HashSet<(&str, chrono::NaiveDateTime)> = HashSet::new();

        for record in records {
            match record.started_at {
                Some(started_at) => {
                    if !seen.insert((record.customer_number.trim(), started_at)) {
                        outcome.stats.duplicates_removed += 1;
                        continue;
                    }
                }
                None => outcome.stats.malformed_timestamps += 1,
            }

            let normalized = normalize_name(&record.agent_identifier);
            let Some(found) = self.matcher.match_name(&normalized) else {
                outcome.stats.dropped_unmatched += 1;
                let label = if normalized.is_empty() {
                    BLANK_IDENTIFIER.to_string()
                } else {
                    normalized
                };
                *outcome.unmatched.entry(label).or_insert(0) += 1;
                continue;
            };

            if !record.talk.is_present() {
                outcome.stats.dropped_missing_talk_time += 1;
                continue;
            }

            outcome.stats.malformed_durations += [&record.talk, &record.hold, &record.queue]
                .into_iter()
                .filter(|raw| is_malformed(raw))
                .count();

            match found.kind {
                MatchKind::Exact => outcome.stats.matched_exact += 1,
                MatchKind::Fuzzy => {
                    debug!(
                        "Fuzzy match '{}' -> '{}' ({} row {})",
                        normalized, found.entry.identifier, record.source, record.row
                    );
                    outcome.stats.matched_fuzzy += 1;
                }
            }

            outcome
                .calls
                .push(build_agent_call(record, normalized, found.entry, found.kind));
        }

        info!(
            "Reconciled {} of {} records ({} duplicates, {} unmatched, {} without talk time)",
            outcome.calls.len(),
            outcome.stats.records_in,
            outcome.stats.duplicates_removed,
            outcome.stats.dropped_unmatched,
            outcome.stats.dropped_missing_talk_time
        );

        outcome
    }
}

fn is_malformed(raw: &RawDuration) -> bool {
    raw.is_present() && try_decode_duration(raw).is_none()
}

fn build_agent_call(
    record: &CallRecord,
    dialer_name: String,
    entry: &RosterEntry,
    kind: MatchKind,
) -> AgentCall {
    let talk_time = decode_duration(&record.talk);
    AgentCall {
        agent_key: entry.agent_key.clone(),
        full_name: entry.full_name.clone(),
        pool: entry.pool.clone(),
        team_lead: entry.team_lead.clone(),
        dialer_name,
        customer_number: record.customer_number.trim().to_string(),
        call_status: CallStatus::from_source(&record.call_status),
        started_at: record.started_at,
        talk_time,
        hold_time: decode_duration(&record.hold),
        total_duration: decode_duration(&record.queue) + talk_time,
        gap: HmsDuration::ZERO,
        call_gap: false,
        match_kind: kind,
    }
}

/// Reconciles calls against a roster using exact matching.
///
/// # Examples
///
/// ```
/// use cre_dialer::core::domain::{CallRecord, RawDuration, RosterEntry};
/// use cre_dialer::preprocessing::reconciler::reconcile_calls;
///
/// let roster = vec![RosterEntry::new("bob", "B1", "Bob Stone", "B", "Y")];
/// let call = CallRecord {
///     source: "calls.csv".into(),
///     row: 0,
///     started_at: None,
///     agent_identifier: "Bob (temp contractor)".into(),
///     call_status: "Answered".into(),
///     talk: RawDuration::Text("125".into()),
///     hold: RawDuration::Missing,
///     queue: RawDuration::Missing,
///     customer_number: "555".into(),
/// };
///
/// let calls = reconcile_calls(&[call], &roster);
/// assert_eq!(calls.len(), 1);
/// assert_eq!(calls[0].agent_key, "B1");
/// assert_eq!(calls[0].talk_time.to_string(), "00:02:05");
/// ```
pub fn reconcile_calls(records: &[CallRecord], roster: &[RosterEntry]) -> Vec<AgentCall> {
    let index = RosterIndex::build(roster);
    CallReconciler::new(&index, MatchMode::Exact)
        .reconcile(records)
        .calls
}
