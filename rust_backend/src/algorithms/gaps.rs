//! Idle time between consecutive calls of one agent on one day.

use chrono::NaiveDate;
use log::debug;
use std::collections::BTreeMap;

use crate::core::domain::AgentCall;
use crate::time::duration::HmsDuration;

/// Default idle time, in seconds, above which a gap is flagged.
pub const DEFAULT_GAP_THRESHOLD_SECS: u64 = 60;

/// Fills `gap` and `call_gap` for every call.
///
/// Calls are partitioned by (agent key, calendar date) and each partition is
/// stable-sorted by start time. The first call of a partition has a zero gap;
/// every later call gets `start - (prev start + prev total duration)`,
/// clamped at zero, and is flagged when that exceeds `threshold_secs`.
/// Calls without a start time form their own partition per agent and keep
/// zero gaps.
///
/// The result is ordered by agent key, then date (undated last), then start.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use cre_dialer::algorithms::gaps::compute_gaps;
/// use cre_dialer::core::domain::{CallRecord, RawDuration, RosterEntry};
/// use cre_dialer::preprocessing::reconciler::reconcile_calls;
///
/// let day = NaiveDate::from_ymd_opt(2024, 3, 4).unwrap();
/// let record = |h, m, s, talk: &str| CallRecord {
///     source: "calls.csv".into(),
///     row: 0,
///     started_at: day.and_hms_opt(h, m, s),
///     agent_identifier: "amy".into(),
///     call_status: "Answered".into(),
///     talk: RawDuration::Text(talk.into()),
///     hold: RawDuration::Missing,
///     queue: RawDuration::Missing,
///     customer_number: format!("{h}{m}{s}"),
/// };
/// let roster = vec![RosterEntry::new("amy", "A1", "Amy Lee", "B", "Y")];
/// let calls = reconcile_calls(&[record(9, 55, 0, "00:05:00"), record(10, 1, 30, "10")], &roster);
///
/// let calls = compute_gaps(calls, 60);
/// assert_eq!(calls[1].gap.seconds(), 90);
/// assert!(calls[1].call_gap);
/// ```
pub fn compute_gaps(calls: Vec<AgentCall>, threshold_secs: u64) -> Vec<AgentCall> {
    let mut groups: BTreeMap<(String, Option<NaiveDate>), Vec<AgentCall>> = BTreeMap::new();
    for call in calls {
        groups
            .entry((call.agent_key.clone(), call.call_date()))
            .or_default()
            .push(call);
    }

    // Undated partitions sort first under Option's ordering; move them last
    let (dated, undated): (Vec<_>, Vec<_>) =
        groups.into_iter().partition(|((_, date), _)| date.is_some());

    let mut flagged = 0usize;
    let mut out = Vec::new();
    for ((agent_key, date), mut group) in dated.into_iter().chain(undated) {
        group.sort_by_key(|call| call.started_at);

        let mut previous_end = None;
        for mut call in group {
            let gap = match (previous_end, call.started_at) {
                (Some(prev_end), Some(start)) => HmsDuration::from_time_delta(start - prev_end),
                _ => HmsDuration::ZERO,
            };
            call.gap = gap;
            call.call_gap = gap.seconds() > threshold_secs;
            flagged += usize::from(call.call_gap);

            previous_end = call.ended_at();
            out.push(call);
        }
        debug!("Computed gaps for {} on {:?}", agent_key, date);
    }

    debug!("{} of {} calls flagged with gaps", flagged, out.len());
    out
}
