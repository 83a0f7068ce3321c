//! Comma-delimited table reader.

use crate::importer::tabular::{Cell, Table};

/// Decodes CSV bytes into a [`Table`]. The first record is the header.
///
/// Short rows are padded with empty cells. A row with more fields than the
/// header, non-UTF-8 content, or an input without any header fails the whole
/// decode; the returned string describes why.
pub fn read_table(raw: &[u8]) -> Result<Table, String> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(raw);

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| e.to_string())?
        .iter()
        .map(str::to_string)
        .collect();
    if headers.iter().all(|h| h.trim().is_empty()) {
        return Err("no columns to parse from input".to_string());
    }

    let mut table = Table::new(headers);
    for record in reader.records() {
        let record = record.map_err(|e| e.to_string())?;
        if record.len() > table.headers.len() {
            let line = record.position().map(|p| p.line()).unwrap_or_default();
            return Err(format!(
                "line {}: expected {} fields, saw {}",
                line,
                table.headers.len(),
                record.len()
            ));
        }
        table.push_row(record.iter().map(Cell::from_text).collect());
    }
    Ok(table)
}
