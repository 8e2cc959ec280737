use crate::core::domain::CallRecord;
use crate::core::error::DialerResult;
use crate::parsing::table::SourceTable;

pub const START_TIME: &str = "Start time";
pub const ACCOUNT: &str = "Account";
pub const CALL_STATUS: &str = "Call status";
pub const ANSWER_DURATION: &str = "Answer duration";
pub const HOLD_DURATION: &str = "Hold duration";
pub const QUEUE_DURATION: &str = "Queue duration";
pub const CUSTOMER_NUMBER: &str = "Customer number";

/// Columns every dialer export must carry.
pub const REQUIRED_CALL_LOG_COLUMNS: [&str; 7] = [
    START_TIME,
    ACCOUNT,
    CALL_STATUS,
    ANSWER_DURATION,
    HOLD_DURATION,
    QUEUE_DURATION,
    CUSTOMER_NUMBER,
];

/// Parse a dialer export table into call records.
///
/// Fails only when a required column is missing. Cell-level problems are
/// kept as-is for the pipeline to recover: an unparseable start time becomes
/// `None`, duration cells stay raw.
pub fn parse_call_log(table: &SourceTable) -> DialerResult<Vec<CallRecord>> {
    let idx = table.require_columns(&REQUIRED_CALL_LOG_COLUMNS)?;
    let (start, account, status, answer, hold, queue, number) =
        (idx[0], idx[1], idx[2], idx[3], idx[4], idx[5], idx[6]);

    let records = (0..table.height())
        .map(|row| CallRecord {
            source: table.name().to_string(),
            row,
            started_at: table.cell(row, start).as_timestamp(),
            agent_identifier: table.cell(row, account).as_text(),
            call_status: table.cell(row, status).as_text(),
            talk: table.cell(row, answer).as_raw_duration(),
            hold: table.cell(row, hold).as_raw_duration(),
            queue: table.cell(row, queue).as_raw_duration(),
            customer_number: table.cell(row, number).as_text(),
        })
        .collect();

    Ok(records)
}
