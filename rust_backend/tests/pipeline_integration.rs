//! End-to-end tests of the reconciliation pipeline over CSV uploads.

use cre_dialer::config::AnalysisConfig;
use cre_dialer::core::{CallStatus, DialerError};
use cre_dialer::io::loaders::{InputFile, InputSet};
use cre_dialer::preprocessing::{process_dialer_files, AnalysisPipeline, PipelineCache};
use cre_dialer::time::IntervalBucket;
use std::io::Write;

const HEADER: &str =
    "Start time,Account,Call status,Answer duration,Hold duration,Queue duration,Customer number\n";

const ROSTER: &str = "\
Dialer Name,Email,Full Name,Pool,TL
jane doe,J1,Jane Doe,A,X
bob,B1,Bob Stone,B,Y
amy,A1,Amy Lee,B,Y
";

// ==================== Helper Functions ====================

fn call_log(rows: &[&str]) -> String {
    let mut csv = HEADER.to_string();
    for row in rows {
        csv.push_str(row);
        csv.push('\n');
    }
    csv
}

fn inputs(rows: &[&str]) -> InputSet {
    InputSet::new(
        vec![InputFile::new("stringee_1.csv", call_log(rows))],
        InputFile::new("team.csv", ROSTER),
    )
}

// ==================== Scenarios ====================

#[test]
fn email_accounts_match_and_overlapping_calls_clamp_to_zero() {
    let output = AnalysisPipeline::new()
        .process(&inputs(&[
            "2024-03-04 09:10:00,jane.doe@co.com,Answered,30,0,0,111",
            "2024-03-04 09:10:00,jane.doe@co.com,Answered,30,0,0,222",
        ]))
        .unwrap();

    assert_eq!(output.calls.len(), 2);
    assert!(output.calls.iter().all(|c| c.dialer_name == "jane doe"));
    assert!(output.calls.iter().all(|c| c.agent_key == "J1"));
    assert_eq!(output.calls[1].gap.to_string(), "00:00:00");
    assert!(!output.calls[1].call_gap);

    assert_eq!(output.summary.len(), 1);
    assert_eq!(output.summary[0].calls_in(IntervalBucket::Hour(9)), 2);
    assert_eq!(
        output.summary[0].talk_time_in(IntervalBucket::Hour(9)).to_string(),
        "00:01:00"
    );
}

#[test]
fn annotated_account_matches_plain_roster_name() {
    let output = AnalysisPipeline::new()
        .process(&inputs(&[
            "2024-03-04 11:00:00,bob (temp contractor),Answered,45,0,0,333",
        ]))
        .unwrap();

    assert_eq!(output.calls.len(), 1);
    assert_eq!(output.calls[0].agent_key, "B1");
    assert_eq!(output.calls[0].full_name, "Bob Stone");
}

#[test]
fn unknown_account_is_excluded_and_counted() {
    let output = AnalysisPipeline::new()
        .process(&inputs(&[
            "2024-03-04 11:00:00,bob,Answered,45,0,0,333",
            "2024-03-04 11:05:00,john smith,Answered,45,0,0,444",
        ]))
        .unwrap();

    assert_eq!(output.calls.len(), 1);
    assert_eq!(output.diagnostics.unmatched_count(), 1);
    assert_eq!(output.diagnostics.unmatched.get("john smith"), Some(&1));
    assert!(output.diagnostics_report().contains("john smith (1)"));
}

#[test]
fn digit_talk_time_is_decoded_as_seconds() {
    let output = AnalysisPipeline::new()
        .process(&inputs(&["2024-03-04 12:00:00,amy,Answered,125,0,0,555"]))
        .unwrap();

    assert_eq!(output.calls[0].talk_time.to_string(), "00:02:05");
    assert_eq!(output.calls[0].call_status, CallStatus::Connected);

    let detail = output.detail_csv().unwrap();
    assert!(detail.contains("00:02:05"));
}

#[test]
fn gap_after_call_end_is_flagged() {
    let output = AnalysisPipeline::new()
        .process(&inputs(&[
            "2024-03-04 09:55:00,amy,Answered,00:05:00,0,0,1",
            "2024-03-04 10:01:30,amy,Answered,20,0,0,2",
        ]))
        .unwrap();

    let second = &output.calls[1];
    assert_eq!(second.gap.seconds(), 90);
    assert!(second.call_gap);
    assert_eq!(second.call_gap_label(), "Yes");
    assert_eq!(output.daily[0].gap_secs, 90);
    assert_eq!(output.daily[0].flagged_gaps, 1);
}

// ==================== Structural failures ====================

#[test]
fn missing_queue_column_fails_before_processing() {
    let inputs = InputSet::new(
        vec![
            InputFile::new("stringee_1.csv", call_log(&[])),
            InputFile::new(
                "stringee_2.csv",
                "Start time,Account,Call status,Answer duration,Hold duration,Customer number\n",
            ),
        ],
        InputFile::new("team.csv", ROSTER),
    );

    let err = AnalysisPipeline::new().process(&inputs).unwrap_err();
    match err {
        DialerError::MissingRequiredColumn { input, columns } => {
            assert_eq!(input, "stringee_2.csv");
            assert_eq!(columns, "Queue duration");
        }
        other => panic!("unexpected error: {other}"),
    }
}

// ==================== Cross-cutting behavior ====================

#[test]
fn duplicates_across_files_are_removed() {
    let row = "2024-03-04 09:10:00,amy,Answered,30,0,0,777";
    let inputs = InputSet::new(
        vec![
            InputFile::new("stringee_1.csv", call_log(&[row])),
            InputFile::new("stringee_2.csv", call_log(&[row])),
        ],
        InputFile::new("team.csv", ROSTER),
    );
    let output = AnalysisPipeline::new().process(&inputs).unwrap();

    assert_eq!(output.diagnostics.reconcile.records_in, 2);
    assert_eq!(output.diagnostics.reconcile.duplicates_removed, 1);
    assert_eq!(output.calls.len(), 1);
}

#[test]
fn malformed_start_goes_to_unknown_bucket() {
    let output = AnalysisPipeline::new()
        .process(&inputs(&["yesterday-ish,amy,Answered,30,0,0,1"]))
        .unwrap();

    assert_eq!(output.diagnostics.reconcile.malformed_timestamps, 1);
    assert_eq!(output.summary[0].calls_in(IntervalBucket::Unknown), 1);
    assert!(output.summary_csv().unwrap().contains("Unknown Calls"));
}

#[test]
fn summary_columns_follow_configured_cutoffs() {
    let config = AnalysisConfig::from_toml_str(
        "[intervals]\nfirst_cutoff_hour = 10\nlast_cutoff_hour = 12\n",
    )
    .unwrap();
    let output = AnalysisPipeline::with_config(config)
        .unwrap()
        .process(&inputs(&["2024-03-04 09:00:00,amy,Answered,30,0,0,1"]))
        .unwrap();

    let header = output.summary_csv().unwrap().lines().next().unwrap().to_string();
    assert_eq!(
        header,
        "CRM ID,Full Name,Pool,TL,\
         0-10 Calls,10-11 Calls,11-12 Calls,12+ Calls,Unknown Calls,\
         0-10 Talk Time,10-11 Talk Time,11-12 Talk Time,12+ Talk Time,Unknown Talk Time,\
         Total Calls,Connected Calls,Total Talk Time"
    );
}

#[test]
fn cache_reuses_results_for_identical_uploads() {
    let cache = PipelineCache::default();
    let rows = ["2024-03-04 09:10:00,amy,Answered,30,0,0,1"];

    let first = cache.get_or_process(&inputs(&rows)).unwrap();
    let second = cache.get_or_process(&inputs(&rows)).unwrap();

    assert_eq!(cache.computations(), 1);
    assert_eq!(first.summary, second.summary);
}

#[test]
fn process_files_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let calls_path = dir.path().join("stringee_1.csv");
    let roster_path = dir.path().join("team.csv");

    let mut calls = std::fs::File::create(&calls_path).unwrap();
    calls
        .write_all(call_log(&["2024-03-04 09:10:00,amy,Answered,30,0,0,1"]).as_bytes())
        .unwrap();
    std::fs::write(&roster_path, ROSTER).unwrap();

    let output = process_dialer_files(&[&calls_path], &roster_path, None).unwrap();
    assert_eq!(output.calls.len(), 1);
    assert_eq!(output.diagnostics.inputs[0].name, "stringee_1.csv");
}

#[test]
fn process_xlsx_export_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let roster_path = dir.path().join("team.csv");
    std::fs::write(&roster_path, ROSTER).unwrap();
    let calls_path =
        std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/data/stringee_sample.xlsx");

    let output = process_dialer_files(&[&calls_path], &roster_path, None).unwrap();

    assert_eq!(output.diagnostics.reconcile.records_in, 2);
    assert_eq!(output.diagnostics.reconcile.dropped_missing_talk_time, 1);
    assert_eq!(output.calls.len(), 1);

    let call = &output.calls[0];
    assert_eq!(call.agent_key, "J1");
    assert_eq!(call.call_status, CallStatus::Connected);
    assert_eq!(call.talk_time.to_string(), "00:02:05");
    assert_eq!(call.total_duration.to_string(), "00:02:10");
    assert_eq!(call.customer_number, "9876543210");
}
