//! Output tables as Polars DataFrames and CSV text.

use polars::prelude::*;

use crate::algorithms::metrics::DailyMetrics;
use crate::core::domain::{AgentCall, CreSummaryRow};
use crate::core::error::DialerResult;
use crate::time::duration::HmsDuration;
use crate::time::intervals::{IntervalBucket, IntervalScheme};

/// Columns of the agent-level detail table, in order.
pub const DETAIL_COLUMNS: [&str; 16] = [
    "Date",
    "Dialer Name",
    "Number",
    "Call Status",
    "Call Start Time",
    "Total Call Duration",
    "Talk Time",
    "Hold Time",
    "CRM ID",
    "Full Name",
    "Pool",
    "TL",
    "Gap Duration",
    "Call Gap",
    "Interval",
    "Match",
];

/// Identity columns leading every summary row.
pub const SUMMARY_ID_COLUMNS: [&str; 4] = ["CRM ID", "Full Name", "Pool", "TL"];

pub fn calls_column_name(bucket: &IntervalBucket) -> String {
    format!("{} Calls", bucket.label())
}

pub fn talk_time_column_name(bucket: &IntervalBucket) -> String {
    format!("{} Talk Time", bucket.label())
}

/// Summary column names for a scheme, in output order.
pub fn summary_columns(scheme: &IntervalScheme) -> Vec<String> {
    let buckets = scheme.buckets();
    let mut names: Vec<String> = SUMMARY_ID_COLUMNS.iter().map(|s| s.to_string()).collect();
    names.extend(buckets.iter().map(calls_column_name));
    names.extend(buckets.iter().map(talk_time_column_name));
    names.extend(
        ["Total Calls", "Connected Calls", "Total Talk Time"]
            .iter()
            .map(|s| s.to_string()),
    );
    names
}

fn text_column(name: &str, values: Vec<String>) -> Column {
    Column::new(name.into(), values)
}

fn hms_column(name: &str, values: impl Iterator<Item = HmsDuration>) -> Column {
    text_column(name, values.map(|d| d.to_string()).collect())
}

/// One row per reconciled call.
pub fn detail_frame(calls: &[AgentCall], scheme: &IntervalScheme) -> DialerResult<DataFrame> {
    let strings = |f: fn(&AgentCall) -> String| -> Vec<String> { calls.iter().map(f).collect() };

    let dates: Vec<Option<String>> = calls
        .iter()
        .map(|c| c.call_date().map(|d| d.format("%Y-%m-%d").to_string()))
        .collect();
    let starts: Vec<Option<String>> = calls
        .iter()
        .map(|c| c.started_at.map(|t| t.format("%H:%M:%S").to_string()))
        .collect();

    let columns = vec![
        Column::new(DETAIL_COLUMNS[0].into(), dates),
        text_column(DETAIL_COLUMNS[1], strings(|c| c.dialer_name.clone())),
        text_column(DETAIL_COLUMNS[2], strings(|c| c.customer_number.clone())),
        text_column(DETAIL_COLUMNS[3], strings(|c| c.call_status.to_string())),
        Column::new(DETAIL_COLUMNS[4].into(), starts),
        hms_column(DETAIL_COLUMNS[5], calls.iter().map(|c| c.total_duration)),
        hms_column(DETAIL_COLUMNS[6], calls.iter().map(|c| c.talk_time)),
        hms_column(DETAIL_COLUMNS[7], calls.iter().map(|c| c.hold_time)),
        text_column(DETAIL_COLUMNS[8], strings(|c| c.agent_key.clone())),
        text_column(DETAIL_COLUMNS[9], strings(|c| c.full_name.clone())),
        text_column(DETAIL_COLUMNS[10], strings(|c| c.pool.clone())),
        text_column(DETAIL_COLUMNS[11], strings(|c| c.team_lead.clone())),
        hms_column(DETAIL_COLUMNS[12], calls.iter().map(|c| c.gap)),
        text_column(DETAIL_COLUMNS[13], strings(|c| c.call_gap_label().to_string())),
        text_column(
            DETAIL_COLUMNS[14],
            calls
                .iter()
                .map(|c| scheme.bucket_for(c.start_hour()).label())
                .collect(),
        ),
        text_column(DETAIL_COLUMNS[15], strings(|c| c.match_kind.to_string())),
    ];

    Ok(DataFrame::new(columns)?)
}

/// The CRE summary pivot, one row per agent.
pub fn summary_frame(rows: &[CreSummaryRow], scheme: &IntervalScheme) -> DialerResult<DataFrame> {
    let buckets = scheme.buckets();
    let mut columns = vec![
        text_column("CRM ID", rows.iter().map(|r| r.agent.agent_key.clone()).collect()),
        text_column("Full Name", rows.iter().map(|r| r.agent.full_name.clone()).collect()),
        text_column("Pool", rows.iter().map(|r| r.agent.pool.clone()).collect()),
        text_column("TL", rows.iter().map(|r| r.agent.team_lead.clone()).collect()),
    ];

    for bucket in &buckets {
        let counts: Vec<u32> = rows.iter().map(|r| r.calls_in(*bucket)).collect();
        columns.push(Column::new(calls_column_name(bucket).into(), counts));
    }
    for bucket in &buckets {
        columns.push(hms_column(
            &talk_time_column_name(bucket),
            rows.iter().map(|r| r.talk_time_in(*bucket)),
        ));
    }

    let totals: Vec<u32> = rows.iter().map(CreSummaryRow::total_calls).collect();
    let connected: Vec<u32> = rows.iter().map(|r| r.connected_calls).collect();
    columns.push(Column::new("Total Calls".into(), totals));
    columns.push(Column::new("Connected Calls".into(), connected));
    columns.push(hms_column(
        "Total Talk Time",
        rows.iter().map(CreSummaryRow::total_talk_time),
    ));

    Ok(DataFrame::new(columns)?)
}

/// Daily per-agent metrics.
pub fn daily_frame(daily: &[DailyMetrics]) -> DialerResult<DataFrame> {
    let dates: Vec<Option<String>> = daily
        .iter()
        .map(|d| d.date.map(|x| x.format("%Y-%m-%d").to_string()))
        .collect();
    let dialed: Vec<u32> = daily.iter().map(|d| d.dialed_calls).collect();
    let connected: Vec<u32> = daily.iter().map(|d| d.connected_calls).collect();
    let flagged: Vec<u32> = daily.iter().map(|d| d.flagged_gaps).collect();

    let columns = vec![
        text_column("CRM ID", daily.iter().map(|d| d.agent_key.clone()).collect()),
        Column::new("Date".into(), dates),
        Column::new("Total Dialed Calls".into(), dialed),
        Column::new("Total Connected Calls".into(), connected),
        hms_column(
            "Total Talk Time",
            daily.iter().map(|d| HmsDuration::from_seconds(d.connected_talk_secs)),
        ),
        hms_column(
            "Total Gap Duration",
            daily.iter().map(|d| HmsDuration::from_seconds(d.gap_secs)),
        ),
        Column::new("Call Gaps".into(), flagged),
    ];

    Ok(DataFrame::new(columns)?)
}

/// Renders a frame as CSV text with a header row.
pub fn frame_to_csv(df: &mut DataFrame) -> DialerResult<String> {
    let mut buf = Vec::new();
    CsvWriter::new(&mut buf).include_header(true).finish(df)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}
