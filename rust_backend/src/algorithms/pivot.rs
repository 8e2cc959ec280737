//! Per-agent hourly pivot of call counts and talk time.

use log::debug;
use std::collections::BTreeMap;

use crate::core::domain::{AgentCall, AgentIdentity, CreSummaryRow};
use crate::time::duration::HmsDuration;
use crate::time::intervals::{IntervalBucket, IntervalScheme};

/// Builds [`CreSummaryRow`]s for one interval scheme.
///
/// Every row carries every bucket of the scheme, zero-filled, so the
/// column set depends only on the scheme.
#[derive(Debug, Clone, Copy, Default)]
pub struct PivotBuilder {
    scheme: IntervalScheme,
}

impl PivotBuilder {
    pub fn new(scheme: IntervalScheme) -> Self {
        Self { scheme }
    }

    pub fn scheme(&self) -> &IntervalScheme {
        &self.scheme
    }

    /// Bucket columns in output order.
    pub fn columns(&self) -> Vec<IntervalBucket> {
        self.scheme.buckets()
    }

    /// Groups calls by agent identity and aggregates them per bucket.
    ///
    /// Rows are ordered by agent key, then display name, pool and team lead.
    pub fn build(&self, calls: &[AgentCall]) -> Vec<CreSummaryRow> {
        let columns = self.columns();
        let mut rows: BTreeMap<AgentIdentity, CreSummaryRow> = BTreeMap::new();

        for call in calls {
            let row = rows
                .entry(AgentIdentity::of(call))
                .or_insert_with_key(|agent| empty_row(agent.clone(), &columns));

            let bucket = self.scheme.bucket_for(call.start_hour());
            *row.calls.entry(bucket).or_insert(0) += 1;
            *row.talk_time.entry(bucket).or_insert(HmsDuration::ZERO) += call.talk_time;
            if call.is_connected() {
                row.connected_calls += 1;
            }
        }

        debug!(
            "Pivoted {} calls into {} rows x {} buckets",
            calls.len(),
            rows.len(),
            columns.len()
        );
        rows.into_values().collect()
    }
}

fn empty_row(agent: AgentIdentity, columns: &[IntervalBucket]) -> CreSummaryRow {
    CreSummaryRow {
        agent,
        calls: columns.iter().map(|&b| (b, 0)).collect(),
        talk_time: columns.iter().map(|&b| (b, HmsDuration::ZERO)).collect(),
        connected_calls: 0,
    }
}

/// Summary rows under the default interval scheme.
pub fn build_summary(calls: &[AgentCall]) -> Vec<CreSummaryRow> {
    PivotBuilder::default().build(calls)
}
