use crate::core::models::cell::CellValue;
use crate::core::report::{RawTable, ReportError};
use calamine::{Data, Reader, open_workbook_auto_from_rs};
use std::io::Cursor;

/// Reads the first worksheet of an xlsx or xls workbook, using its first
/// row as the header
pub fn read_excel(bytes: &[u8]) -> Result<RawTable, ReportError> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))
        .map_err(|e| ReportError::Unreadable(e.to_string()))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| ReportError::Unreadable("workbook has no worksheets".into()))?
        .map_err(|e| ReportError::Unreadable(e.to_string()))?;

    let mut rows = range.rows();

    let headers = match rows.next() {
        Some(header_row) => header_row
            .iter()
            .map(|cell| cell_from_excel(cell).to_text().trim().to_string())
            .collect(),
        None => Vec::new(),
    };

    let rows = rows
        .map(|row| row.iter().map(cell_from_excel).collect())
        .collect();

    Ok(RawTable { headers, rows })
}

fn cell_from_excel(cell: &Data) -> CellValue {
    match cell {
        Data::Int(num) => CellValue::Number(*num as f64),
        Data::Float(num) => CellValue::Number(*num),
        Data::String(text) => CellValue::infer(text),
        Data::Bool(flag) => CellValue::Text(flag.to_string()),
        Data::Empty | Data::Error(_) => CellValue::Empty,
        other => CellValue::Text(other.to_string()),
    }
}
