use crate::core::domain::{is_marked_inactive, RosterEntry};
use crate::core::error::DialerResult;
use crate::parsing::table::SourceTable;

pub const DIALER_NAME: &str = "Dialer Name";
pub const EMAIL: &str = "Email";
pub const FULL_NAME: &str = "Full Name";
pub const POOL: &str = "Pool";
pub const TEAM_LEAD: &str = "TL";
pub const STATUS: &str = "Status";

/// Columns every roster file must carry. `Status` is optional.
pub const REQUIRED_ROSTER_COLUMNS: [&str; 5] = [DIALER_NAME, EMAIL, FULL_NAME, POOL, TEAM_LEAD];

/// Parse a roster table into entries, preserving file order.
///
/// Inactive rows are kept (with `active == false`) so that the index builder
/// can report how many were filtered.
pub fn parse_roster(table: &SourceTable) -> DialerResult<Vec<RosterEntry>> {
    let idx = table.require_columns(&REQUIRED_ROSTER_COLUMNS)?;
    let status = table.column_index(STATUS);

    let entries = (0..table.height())
        .map(|row| {
            let mut entry = RosterEntry::new(
                table.cell(row, idx[0]).as_text(),
                table.cell(row, idx[1]).as_text(),
                table.cell(row, idx[2]).as_text(),
                table.cell(row, idx[3]).as_text(),
                table.cell(row, idx[4]).as_text(),
            );
            if let Some(col) = status {
                if is_marked_inactive(&table.cell(row, col).as_text()) {
                    entry.active = false;
                }
            }
            entry
        })
        .collect();

    Ok(entries)
}
