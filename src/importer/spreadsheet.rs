//! XLSX table reader. Only the first worksheet is read; its first row is the
//! header.

use crate::importer::tabular::{Cell, Table};
use calamine::{Data, ExcelDateTime, Range, Reader, Xlsx, open_workbook_from_rs};
use std::io::Cursor;

pub fn read_table(raw: &[u8]) -> Result<Table, String> {
    let mut workbook =
        open_workbook_from_rs::<Xlsx<_>, _>(Cursor::new(raw)).map_err(|e| e.to_string())?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| "workbook has no worksheets".to_string())?
        .map_err(|e| e.to_string())?;
    table_from_range(&range)
}

/// Converts a worksheet range into a [`Table`].
pub fn table_from_range(range: &Range<Data>) -> Result<Table, String> {
    let mut rows = range.rows();
    let header_row = rows
        .next()
        .ok_or_else(|| "no columns to parse from worksheet".to_string())?;
    let headers: Vec<String> = header_row
        .iter()
        .map(|d| to_cell(d).to_text().ok().flatten().unwrap_or_default())
        .collect();
    if headers.iter().all(|h| h.trim().is_empty()) {
        return Err("no columns to parse from worksheet".to_string());
    }

    let mut table = Table::new(headers);
    for row in rows {
        table.push_row(row.iter().map(to_cell).collect());
    }
    Ok(table)
}

fn to_cell(data: &Data) -> Cell {
    match data {
        Data::Empty => Cell::Empty,
        Data::String(s) => Cell::from_text(s),
        Data::Int(i) => Cell::Int(*i),
        Data::Float(f) => Cell::Float(*f),
        Data::Bool(b) => Cell::Bool(*b),
        Data::DateTime(dt) => date_cell(dt),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::from_text(s),
        Data::Error(e) => Cell::Error(e.to_string()),
    }
}

/// Dates render as ISO text (`2023-03-15`, or `2023-03-15T09:30:00` when a
/// time of day is set). Durations keep their serial value.
fn date_cell(dt: &ExcelDateTime) -> Cell {
    if dt.is_duration() {
        return Cell::Float(dt.as_f64());
    }
    match dt.as_datetime() {
        Some(moment) => {
            let text = moment.format("%Y-%m-%dT%H:%M:%S").to_string();
            match text.strip_suffix("T00:00:00") {
                Some(date) => Cell::Text(date.to_string()),
                None => Cell::Text(text),
            }
        }
        None => Cell::Float(dt.as_f64()),
    }
}
