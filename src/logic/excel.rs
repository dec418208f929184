//! Single-sheet XLSX codec.
//!
//! Reading goes through `calamine`, writing through `rust_xlsxwriter`. The
//! first worksheet is the table: its first row is the header, every later
//! row is a record. Column types are inferred from the body cells.

use super::io::ensure_representable;
use super::types::{ColumnKind, TargetFormat};
use crate::error::{Result, SweeperError};
use calamine::{Data, DataType as _, Reader as _, Xlsx};
use polars::prelude::*;
use rust_xlsxwriter::Workbook;
use std::collections::HashSet;
use std::io::Cursor;

pub const SHEET_NAME: &str = "Sheet1";
pub const MAX_ROWS: usize = 1_048_576;
pub const MAX_COLUMNS: usize = 16_384;

// Largest integer an f64 cell can hold exactly.
const MAX_EXACT_INT: f64 = 9_007_199_254_740_992.0;

pub fn decode_workbook(bytes: &[u8]) -> Result<DataFrame> {
    let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(bytes))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| SweeperError::Parse("workbook has no worksheets".to_owned()))??;

    let mut rows = range.rows();
    let Some(header) = rows.next() else {
        return Ok(DataFrame::empty());
    };
    let names = header_names(header);
    let body: Vec<&[Data]> = rows.collect();

    let mut columns = Vec::with_capacity(names.len());
    for (idx, name) in names.into_iter().enumerate() {
        let cells: Vec<&Data> = body.iter().map(|row| row.get(idx).unwrap_or(&Data::Empty)).collect();
        columns.push(Column::from(build_series(name.into(), &cells)));
    }

    DataFrame::new(columns).map_err(|e| SweeperError::Parse(format!("invalid sheet layout: {e}")))
}

/// Header cells as column names; blanks become `Unnamed: <idx>` and repeats
/// get a `.<n>` suffix so every name is unique.
fn header_names(header: &[Data]) -> Vec<String> {
    let mut seen = HashSet::new();
    header
        .iter()
        .enumerate()
        .map(|(idx, cell)| {
            let base = match cell_text(cell) {
                Some(text) if !text.trim().is_empty() => text,
                _ => format!("Unnamed: {idx}"),
            };
            let mut name = base.clone();
            let mut n = 1;
            while !seen.insert(name.clone()) {
                name = format!("{base}.{n}");
                n += 1;
            }
            name
        })
        .collect()
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum Inferred {
    Empty,
    Boolean,
    Integer,
    Float,
    Text,
}

fn is_missing(cell: &Data) -> bool {
    match cell {
        Data::Empty | Data::Error(_) => true,
        Data::String(s) => s.is_empty(),
        Data::Float(f) => f.is_nan(),
        _ => false,
    }
}

fn infer_kind(cells: &[&Data]) -> Inferred {
    let mut kind = Inferred::Empty;
    for cell in cells.iter().filter(|c| !is_missing(c)) {
        let cell_kind = match cell {
            Data::Bool(_) => Inferred::Boolean,
            Data::Int(_) => Inferred::Integer,
            Data::Float(f) if f.fract() == 0.0 && f.abs() <= MAX_EXACT_INT => Inferred::Integer,
            Data::Float(_) => Inferred::Float,
            _ => Inferred::Text,
        };
        kind = match (kind, cell_kind) {
            (Inferred::Empty, k) => k,
            (a, b) if a == b => a,
            (Inferred::Integer | Inferred::Float, Inferred::Integer | Inferred::Float) => {
                Inferred::Float
            }
            _ => return Inferred::Text,
        };
    }
    kind
}

fn build_series(name: PlSmallStr, cells: &[&Data]) -> Series {
    match infer_kind(cells) {
        Inferred::Boolean => {
            let values: Vec<Option<bool>> = cells
                .iter()
                .map(|c| match c {
                    Data::Bool(b) => Some(*b),
                    _ => None,
                })
                .collect();
            Series::new(name, values)
        }
        Inferred::Integer => {
            let values: Vec<Option<i64>> = cells
                .iter()
                .map(|c| match c {
                    Data::Int(i) => Some(*i),
                    Data::Float(f) if !f.is_nan() => Some(*f as i64),
                    _ => None,
                })
                .collect();
            Series::new(name, values)
        }
        Inferred::Float => {
            let values: Vec<Option<f64>> = cells.iter().map(|c| numeric_value(c)).collect();
            Series::new(name, values)
        }
        // An all-blank column reads as text, the same way the CSV reader
        // types an empty column.
        Inferred::Empty | Inferred::Text => {
            let values: Vec<Option<String>> = cells
                .iter()
                .map(|c| if is_missing(c) { None } else { cell_text(c) })
                .collect();
            Series::new(name, values)
        }
    }
}

fn numeric_value(cell: &Data) -> Option<f64> {
    match cell {
        Data::Int(i) => Some(*i as f64),
        Data::Float(f) if !f.is_nan() => Some(*f),
        _ => None,
    }
}

fn cell_text(cell: &Data) -> Option<String> {
    match cell {
        Data::Empty | Data::Error(_) => None,
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => Some(s.clone()),
        Data::Bool(b) => Some(b.to_string()),
        Data::Int(i) => Some(i.to_string()),
        Data::Float(f) => Some(f.to_string()),
        Data::DateTime(_) => Some(match cell.as_datetime() {
            Some(dt) if dt.time() == chrono::NaiveTime::MIN => dt.format("%Y-%m-%d").to_string(),
            Some(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
            None => cell.to_string(),
        }),
    }
}

pub fn encode_workbook(df: &DataFrame) -> Result<Vec<u8>> {
    ensure_representable(df, TargetFormat::Excel)?;
    if df.height() + 1 > MAX_ROWS {
        return Err(SweeperError::Serialization(format!(
            "{} rows exceed the Excel sheet limit of {} (including the header)",
            df.height(),
            MAX_ROWS
        )));
    }
    if df.width() > MAX_COLUMNS {
        return Err(SweeperError::Serialization(format!(
            "{} columns exceed the Excel sheet limit of {MAX_COLUMNS}",
            df.width()
        )));
    }

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(SHEET_NAME)?;

    for (idx, column) in df.get_columns().iter().enumerate() {
        let col_idx = u16::try_from(idx)
            .map_err(|_| SweeperError::Serialization(format!("column index {idx} out of range")))?;
        worksheet.write_string(0, col_idx, column.name().as_str())?;

        let series = column.as_materialized_series();
        match ColumnKind::from_dtype(series.dtype()) {
            ColumnKind::Numeric => {
                let floats = series.cast(&DataType::Float64).map_err(serialization)?;
                for (row, value) in floats.f64().map_err(serialization)?.into_iter().enumerate() {
                    // NaN and infinities have no cell representation; left blank.
                    if let Some(v) = value.filter(|v| v.is_finite()) {
                        worksheet.write_number(sheet_row(row)?, col_idx, v)?;
                    }
                }
            }
            ColumnKind::Boolean => {
                for (row, value) in series.bool().map_err(serialization)?.into_iter().enumerate() {
                    if let Some(v) = value {
                        worksheet.write_boolean(sheet_row(row)?, col_idx, v)?;
                    }
                }
            }
            ColumnKind::Text | ColumnKind::Temporal => {
                let text = series.cast(&DataType::String).map_err(serialization)?;
                for (row, value) in text.str().map_err(serialization)?.into_iter().enumerate() {
                    if let Some(v) = value {
                        worksheet.write_string(sheet_row(row)?, col_idx, v)?;
                    }
                }
            }
            ColumnKind::Nested => {
                return Err(SweeperError::Serialization(format!(
                    "column '{}' cannot be written to a worksheet",
                    column.name()
                )));
            }
        }
    }

    Ok(workbook.save_to_buffer()?)
}

/// Body row `row` sits one below the header.
fn sheet_row(row: usize) -> Result<u32> {
    u32::try_from(row + 1)
        .map_err(|_| SweeperError::Serialization(format!("row {row} out of range")))
}

fn serialization(err: PolarsError) -> SweeperError {
    SweeperError::Serialization(err.to_string())
}
