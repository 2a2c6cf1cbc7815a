//! Load uploaded spreadsheets into tables
//!
//! Workbooks (.xlsx, .xls and friends) are read with calamine; only the
//! first worksheet is used and its first row is the header. CSV files are
//! read with every field as text.

use std::fs;
use std::io::Cursor;
use std::path::Path;

use calamine::{open_workbook_auto_from_rs, Data, Reader};
use chrono::NaiveDateTime;
use log::debug;

use super::data::{from_excel_serial, Cell, Table};
use crate::error::LoadError;

/// An uploaded file: its name (used for format detection) and its bytes
#[derive(Debug, Clone)]
pub struct Upload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl Upload {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
        }
    }

    /// Read an upload from disk, keeping only the file name
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let bytes = fs::read(path).map_err(|source| LoadError::Io {
            file: path.display().to_string(),
            source,
        })?;
        Ok(Self { file_name, bytes })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SourceFormat {
    Workbook,
    Csv,
}

fn detect_format(file_name: &str) -> Result<SourceFormat, LoadError> {
    let extension = Path::new(file_name)
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => Ok(SourceFormat::Workbook),
        "csv" => Ok(SourceFormat::Csv),
        _ => Err(LoadError::UnsupportedFormat {
            file: file_name.to_string(),
        }),
    }
}

/// Load the first sheet of an upload, keeping `text_columns` as text
///
/// Rows in which every cell is empty are skipped.
pub fn load_table(upload: &Upload, text_columns: &[&str]) -> Result<Table, LoadError> {
    let mut table = match detect_format(&upload.file_name)? {
        SourceFormat::Workbook => read_workbook(upload)?,
        SourceFormat::Csv => read_csv(upload)?,
    };

    for column in text_columns {
        table.retain_as_text(column);
    }

    debug!(
        "Loaded '{}': {} columns, {} rows",
        table.name,
        table.headers.len(),
        table.len()
    );
    Ok(table)
}

fn read_workbook(upload: &Upload) -> Result<Table, LoadError> {
    let file = upload.file_name.clone();
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(upload.bytes.as_slice()))
        .map_err(|source| LoadError::Workbook {
            file: file.clone(),
            source,
        })?;

    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| LoadError::NoSheets { file: file.clone() })?;

    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|source| LoadError::Workbook {
            file: file.clone(),
            source,
        })?;

    let mut rows = range.rows();
    let headers: Vec<String> = rows
        .next()
        .map(|row| row.iter().map(header_text).collect())
        .ok_or_else(|| LoadError::EmptySheet { file: file.clone() })?;
    if headers.iter().all(|h| h.is_empty()) {
        return Err(LoadError::EmptySheet { file });
    }

    let mut table = Table::new(file, headers);
    for row in rows {
        let cells: Vec<Cell> = row.iter().map(cell_from_data).collect();
        if cells.iter().all(Cell::is_empty) {
            continue;
        }
        table.push_row(cells);
    }

    Ok(table)
}

fn header_text(data: &Data) -> String {
    cell_from_data(data)
        .to_text()
        .map(|s| s.trim().to_string())
        .unwrap_or_default()
}

fn cell_from_data(data: &Data) -> Cell {
    match data {
        Data::Empty | Data::Error(_) => Cell::Empty,
        Data::String(s) if s.is_empty() => Cell::Empty,
        Data::String(s) => Cell::Text(s.clone()),
        Data::Float(v) => Cell::Number(*v),
        Data::Int(v) => Cell::Number(*v as f64),
        Data::Bool(b) => Cell::Bool(*b),
        Data::DateTime(dt) if dt.is_datetime() => from_excel_serial(dt.as_f64())
            .map(Cell::DateTime)
            .unwrap_or(Cell::Number(dt.as_f64())),
        Data::DateTime(dt) => Cell::Number(dt.as_f64()),
        Data::DateTimeIso(s) => parse_iso_datetime(s)
            .map(Cell::DateTime)
            .unwrap_or_else(|| Cell::Text(s.clone())),
        Data::DurationIso(s) => Cell::Text(s.clone()),
    }
}

fn parse_iso_datetime(s: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S"))
        .ok()
}

fn read_csv(upload: &Upload) -> Result<Table, LoadError> {
    let file = upload.file_name.clone();
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(upload.bytes.as_slice());

    let headers: Vec<String> = reader
        .headers()
        .map_err(|source| LoadError::Csv {
            file: file.clone(),
            source,
        })?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();
    if headers.iter().all(|h| h.is_empty()) {
        return Err(LoadError::EmptySheet { file });
    }

    let mut table = Table::new(file.clone(), headers);
    for result in reader.records() {
        let record = result.map_err(|source| LoadError::Csv {
            file: file.clone(),
            source,
        })?;
        let cells: Vec<Cell> = record
            .iter()
            .map(|field| {
                if field.is_empty() {
                    Cell::Empty
                } else {
                    Cell::Text(field.to_string())
                }
            })
            .collect();
        if cells.iter().all(Cell::is_empty) {
            continue;
        }
        table.push_row(cells);
    }

    Ok(table)
}
