//! Spreadsheet readers producing column-addressable source tables.
//!
//! Dialer exports arrive as `.xlsx` workbooks or `.csv` files and the roster
//! as `.csv`. Both are read into a [`SourceTable`]: a header row plus typed
//! cells, so the record parsers do not care which format a file came in.
//! CSV files are read through Polars with every column as a string; workbooks
//! are read with calamine, keeping date and duration cells typed.

use calamine::{Data, Reader, Xlsx};
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeDelta};
use polars::prelude::*;
use std::io::Cursor;
use std::path::Path;

use crate::core::domain::RawDuration;
use crate::core::error::{DialerError, DialerResult};
use crate::time::duration::HmsDuration;

/// Supported input file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Csv,
    Xlsx,
}

impl SourceFormat {
    /// Detects the format from a file name's extension.
    pub fn from_name(name: &str) -> DialerResult<Self> {
        let extension = Path::new(name)
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or_default()
            .to_lowercase();

        match extension.as_str() {
            "csv" => Ok(SourceFormat::Csv),
            "xlsx" | "xlsm" => Ok(SourceFormat::Xlsx),
            _ => Err(DialerError::UnsupportedFormat {
                input: name.to_string(),
                extension,
            }),
        }
    }
}

/// A single spreadsheet cell.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Text(String),
    Number(f64),
    Timestamp(NaiveDateTime),
    Elapsed(TimeDelta),
}

static EMPTY_CELL: Cell = Cell::Empty;

const TIMESTAMP_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y/%m/%d %H:%M:%S",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
    "%m-%d-%Y %H:%M:%S",
    "%d-%m-%Y %H:%M:%S",
];

/// Upper bound of a spreadsheet serial (9999-12-31).
const MAX_SERIAL_DAYS: f64 = 2_958_466.0;

impl Cell {
    /// Builds a text cell, mapping blank text to [`Cell::Empty`].
    pub fn text(value: &str) -> Self {
        if value.trim().is_empty() {
            Cell::Empty
        } else {
            Cell::Text(value.to_string())
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    /// Cell content as trimmed text.
    ///
    /// Integral numbers render without a decimal point so that customer
    /// numbers stored as numeric cells keep their digits.
    pub fn as_text(&self) -> String {
        match self {
            Cell::Empty => String::new(),
            Cell::Text(text) => text.trim().to_string(),
            Cell::Number(n) => format_number(*n),
            Cell::Timestamp(ts) => ts.format("%Y-%m-%d %H:%M:%S").to_string(),
            Cell::Elapsed(delta) => HmsDuration::from_time_delta(*delta).to_string(),
        }
    }

    /// Interprets the cell as a call start timestamp.
    pub fn as_timestamp(&self) -> Option<NaiveDateTime> {
        match self {
            Cell::Timestamp(ts) => Some(*ts),
            Cell::Text(text) => parse_timestamp(text),
            Cell::Number(serial) => excel_serial_to_datetime(*serial),
            Cell::Empty | Cell::Elapsed(_) => None,
        }
    }

    /// Interprets the cell as a raw duration field.
    pub fn as_raw_duration(&self) -> RawDuration {
        match self {
            Cell::Empty => RawDuration::Missing,
            Cell::Text(text) => RawDuration::Text(text.clone()),
            Cell::Elapsed(delta) => RawDuration::Elapsed(*delta),
            Cell::Number(n) if n.fract() == 0.0 && *n >= 0.0 => {
                RawDuration::Text(format_number(*n))
            }
            // Fractional numbers below one are spreadsheet day fractions
            Cell::Number(n) if (0.0..1.0).contains(n) => {
                day_fraction_to_delta(*n).map_or(RawDuration::Missing, RawDuration::Elapsed)
            }
            Cell::Number(n) => RawDuration::Text(format_number(n.trunc())),
            Cell::Timestamp(ts) => RawDuration::Text(ts.format("%H:%M:%S").to_string()),
        }
    }
}

fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

/// Parses a textual start timestamp in the layouts dialer exports use.
///
/// Ambiguous slash dates read month first; day-first only applies when the
/// leading field cannot be a month.
pub fn parse_timestamp(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
        .or_else(|| {
            DateTime::parse_from_rfc3339(text)
                .ok()
                .map(|dt| dt.naive_local())
        })
}

/// Converts a day count to a time delta. Negative, non-finite and
/// out-of-range values yield `None`.
fn day_fraction_to_delta(days: f64) -> Option<TimeDelta> {
    if !days.is_finite() || !(0.0..MAX_SERIAL_DAYS).contains(&days) {
        return None;
    }
    TimeDelta::try_milliseconds((days * 86_400_000.0).round() as i64)
}

/// Converts a spreadsheet serial date (days since 1899-12-30) to a timestamp.
pub fn excel_serial_to_datetime(serial: f64) -> Option<NaiveDateTime> {
    if !serial.is_finite() || !(1.0..MAX_SERIAL_DAYS).contains(&serial) {
        return None;
    }
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?.and_hms_opt(0, 0, 0)?;
    epoch.checked_add_signed(day_fraction_to_delta(serial)?)
}

fn convert_excel_cell(data: &Data) -> Cell {
    match data {
        Data::Empty | Data::Error(_) => Cell::Empty,
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::text(s),
        Data::Int(i) => Cell::Number(*i as f64),
        Data::Float(f) => Cell::Number(*f),
        Data::Bool(b) => Cell::Text(b.to_string()),
        Data::DateTime(dt) => {
            let serial = dt.as_f64();
            if dt.is_duration() || serial < 1.0 {
                day_fraction_to_delta(serial).map_or(Cell::Empty, Cell::Elapsed)
            } else {
                excel_serial_to_datetime(serial).map_or(Cell::Empty, Cell::Timestamp)
            }
        }
    }
}

/// A header row plus column-major cells.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceTable {
    name: String,
    headers: Vec<String>,
    columns: Vec<Vec<Cell>>,
    height: usize,
}

impl SourceTable {
    /// Creates a table; short columns read as empty cells.
    pub fn new(name: impl Into<String>, headers: Vec<String>, columns: Vec<Vec<Cell>>) -> Self {
        let height = columns.iter().map(Vec::len).max().unwrap_or(0);
        Self {
            name: name.into(),
            headers,
            columns,
            height,
        }
    }

    /// Builds a table from rows of text cells.
    pub fn from_text_rows(name: impl Into<String>, headers: &[&str], rows: &[Vec<&str>]) -> Self {
        let mut columns = vec![Vec::with_capacity(rows.len()); headers.len()];
        for row in rows {
            for (idx, column) in columns.iter_mut().enumerate() {
                column.push(row.get(idx).map_or(Cell::Empty, |v| Cell::text(v)));
            }
        }
        Self::new(
            name,
            headers.iter().map(|h| h.to_string()).collect(),
            columns,
        )
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn is_empty(&self) -> bool {
        self.height == 0
    }

    /// Finds a column by header, ignoring case, surrounding whitespace,
    /// inner whitespace runs and a UTF-8 byte-order mark.
    pub fn column_index(&self, header: &str) -> Option<usize> {
        let wanted = header_key(header);
        self.headers.iter().position(|h| header_key(h) == wanted)
    }

    /// Resolves every required column or reports all missing ones.
    pub fn require_columns(&self, required: &[&str]) -> DialerResult<Vec<usize>> {
        let mut indices = Vec::with_capacity(required.len());
        let mut missing = Vec::new();

        for column in required {
            match self.column_index(column) {
                Some(idx) => indices.push(idx),
                None => missing.push(*column),
            }
        }

        if !missing.is_empty() {
            return Err(DialerError::MissingRequiredColumn {
                input: self.name.clone(),
                columns: missing.join(", "),
            });
        }
        Ok(indices)
    }

    pub fn cell(&self, row: usize, column: usize) -> &Cell {
        self.columns
            .get(column)
            .and_then(|col| col.get(row))
            .unwrap_or(&EMPTY_CELL)
    }
}

fn header_key(header: &str) -> String {
    header
        .trim_start_matches('\u{feff}')
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Reads a CSV file's bytes into a table, every column as text.
pub fn read_csv_table(name: &str, bytes: &[u8]) -> DialerResult<SourceTable> {
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .into_reader_with_file_handle(Cursor::new(bytes.to_vec()))
        .finish()
        .map_err(|e| DialerError::unreadable(name, e))?;

    dataframe_to_table(name, &df)
}

/// Converts a Polars DataFrame into a table of text cells.
pub fn dataframe_to_table(name: &str, df: &DataFrame) -> DialerResult<SourceTable> {
    let headers: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|s| s.to_string())
        .collect();

    let mut columns = Vec::with_capacity(headers.len());
    for column in df.get_columns() {
        let as_text = column.cast(&DataType::String)?;
        let cells: Vec<Cell> = as_text
            .str()?
            .into_iter()
            .map(|value| value.map_or(Cell::Empty, Cell::text))
            .collect();
        columns.push(cells);
    }

    Ok(SourceTable::new(name, headers, columns))
}

/// Reads the first worksheet of an `.xlsx` workbook into a table.
///
/// The first row is the header row. A workbook whose first sheet is empty
/// yields a table without headers, which then fails column validation.
pub fn read_xlsx_table(name: &str, bytes: &[u8]) -> DialerResult<SourceTable> {
    let mut workbook: Xlsx<_> =
        Xlsx::new(Cursor::new(bytes.to_vec())).map_err(|e| DialerError::unreadable(name, e))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| DialerError::unreadable(name, "workbook has no worksheets"))?
        .map_err(|e| DialerError::unreadable(name, e))?;

    let mut rows = range.rows();
    let headers: Vec<String> = match rows.next() {
        Some(header_row) => header_row
            .iter()
            .map(|cell| convert_excel_cell(cell).as_text())
            .collect(),
        None => return Ok(SourceTable::new(name, Vec::new(), Vec::new())),
    };

    let mut columns: Vec<Vec<Cell>> = vec![Vec::new(); headers.len()];
    for row in rows {
        for (idx, column) in columns.iter_mut().enumerate() {
            column.push(row.get(idx).map_or(Cell::Empty, convert_excel_cell));
        }
    }

    Ok(SourceTable::new(name, headers, columns))
}

/// Reads a table, choosing the reader from the file name.
pub fn read_table(name: &str, bytes: &[u8]) -> DialerResult<SourceTable> {
    match SourceFormat::from_name(name)? {
        SourceFormat::Csv => read_csv_table(name, bytes),
        SourceFormat::Xlsx => read_xlsx_table(name, bytes),
    }
}
