//! In-memory table of spreadsheet cells

use std::fmt;

use chrono::{DateTime, NaiveDateTime};

/// Days between the Excel 1900 epoch (1899-12-30) and the Unix epoch
const EXCEL_UNIX_EPOCH_DAYS: f64 = 25_569.0;
const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// Text form of timestamps when a date cell is read as an identifier
pub const DATETIME_TEXT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A single spreadsheet value
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Cell {
    #[default]
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
    DateTime(NaiveDateTime),
}

impl Cell {
    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    /// True only for a numeric cell holding exactly zero
    pub fn is_zero(&self) -> bool {
        matches!(self, Cell::Number(v) if *v == 0.0)
    }

    /// Render the cell as text, `None` for an empty cell
    ///
    /// Integral numbers drop their fractional part so an identifier typed as
    /// a number in Excel (`460.0`) reads back as `"460"`.
    pub fn to_text(&self) -> Option<String> {
        match self {
            Cell::Empty => None,
            Cell::Text(s) => Some(s.clone()),
            Cell::Number(v) => Some(format_number(*v)),
            Cell::Bool(b) => Some(if *b { "True" } else { "False" }.to_string()),
            Cell::DateTime(dt) => Some(dt.format(DATETIME_TEXT_FORMAT).to_string()),
        }
    }

    /// Empty, or text holding only whitespace
    pub fn is_blank(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// Read the cell as a number; text may carry thousands separators
    pub fn parse_number(&self) -> Option<f64> {
        let value = match self {
            Cell::Number(v) => *v,
            Cell::Text(s) => s.trim().replace(',', "").parse::<f64>().ok()?,
            _ => return None,
        };
        value.is_finite().then_some(value)
    }

    /// Numeric text becomes a number cell; anything else is kept as is
    pub fn into_numeric(self) -> Cell {
        match self.parse_number() {
            Some(v) => Cell::Number(v),
            None if self.is_blank() => Cell::Empty,
            None => self,
        }
    }

    /// Convert the cell into a text cell, leaving empty cells empty
    pub fn into_text(self) -> Cell {
        match self {
            Cell::Text(_) | Cell::Empty => self,
            other => other.to_text().map(Cell::Text).unwrap_or_default(),
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_text() {
            Some(text) => f.write_str(&text),
            None => Ok(()),
        }
    }
}

fn format_number(v: f64) -> String {
    if v.fract() == 0.0 && v.abs() < 1e15 {
        format!("{}", v as i64)
    } else {
        v.to_string()
    }
}

/// Convert an Excel serial date (days since 1899-12-30) into a timestamp
pub fn from_excel_serial(serial: f64) -> Option<NaiveDateTime> {
    if !serial.is_finite() {
        return None;
    }
    let millis = ((serial - EXCEL_UNIX_EPOCH_DAYS) * MILLIS_PER_DAY).round() as i64;
    DateTime::from_timestamp_millis(millis).map(|dt| dt.naive_utc())
}

/// Convert a timestamp into an Excel serial date
pub fn to_excel_serial(dt: &NaiveDateTime) -> f64 {
    dt.and_utc().timestamp_millis() as f64 / MILLIS_PER_DAY + EXCEL_UNIX_EPOCH_DAYS
}

/// The first worksheet of an uploaded file: a header row plus data rows
///
/// Every row has exactly as many cells as there are headers.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    /// Name used in error messages (usually the uploaded file name)
    pub name: String,
    pub headers: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl Table {
    pub fn new(name: impl Into<String>, headers: Vec<String>) -> Self {
        Self {
            name: name.into(),
            headers,
            rows: Vec::new(),
        }
    }

    /// Append a row, padding or truncating it to the header width
    pub fn push_row(&mut self, mut row: Vec<Cell>) {
        row.resize(self.headers.len(), Cell::Empty);
        self.rows.push(row);
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Index of the first column with this header
    pub fn column_index(&self, header: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == header)
    }

    /// Force a column to text, keeping leading zeros of codes intact
    pub fn retain_as_text(&mut self, header: &str) {
        if let Some(idx) = self.column_index(header) {
            for row in &mut self.rows {
                let cell = std::mem::take(&mut row[idx]);
                row[idx] = cell.into_text();
            }
        }
    }
}
