//! Daily per-agent call metrics.

use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::core::domain::AgentCall;

/// Aggregates for one agent on one calendar day.
///
/// `date` is `None` for calls whose start time could not be read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyMetrics {
    pub agent_key: String,
    pub date: Option<NaiveDate>,
    pub dialed_calls: u32,
    pub connected_calls: u32,
    /// Talk seconds of connected calls only.
    pub connected_talk_secs: u64,
    pub gap_secs: u64,
    pub flagged_gaps: u32,
}

impl DailyMetrics {
    fn new(agent_key: String, date: Option<NaiveDate>) -> Self {
        Self {
            agent_key,
            date,
            dialed_calls: 0,
            connected_calls: 0,
            connected_talk_secs: 0,
            gap_secs: 0,
            flagged_gaps: 0,
        }
    }

    /// Connected share of dialed calls, zero when nothing was dialed.
    pub fn connection_rate(&self) -> f64 {
        if self.dialed_calls == 0 {
            0.0
        } else {
            self.connected_calls as f64 / self.dialed_calls as f64
        }
    }
}

/// Aggregates calls per (agent key, date), ordered by agent then date.
///
/// Expects gaps to be filled in already.
pub fn daily_metrics(calls: &[AgentCall]) -> Vec<DailyMetrics> {
    let mut groups: BTreeMap<(&str, Option<NaiveDate>), DailyMetrics> = BTreeMap::new();

    for call in calls {
        let date = call.call_date();
        let metrics = groups
            .entry((call.agent_key.as_str(), date))
            .or_insert_with(|| DailyMetrics::new(call.agent_key.clone(), date));

        metrics.dialed_calls += 1;
        if call.is_connected() {
            metrics.connected_calls += 1;
            metrics.connected_talk_secs += call.talk_time.seconds();
        }
        metrics.gap_secs += call.gap.seconds();
        if call.call_gap {
            metrics.flagged_gaps += 1;
        }
    }

    groups.into_values().collect()
}
