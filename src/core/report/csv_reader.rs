use crate::core::models::cell::CellValue;
use crate::core::report::{RawTable, ReportError};
use std::borrow::Cow;

fn lossy(field: &[u8]) -> Cow<'_, str> {
    String::from_utf8_lossy(field)
}

/// Reads delimited text. The first record is the header, rows may be
/// ragged, and invalid UTF-8 is replaced rather than rejected.
pub fn read_csv(bytes: &[u8]) -> Result<RawTable, ReportError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(bytes);

    let headers = reader
        .byte_headers()
        .map_err(|e| ReportError::Unreadable(e.to_string()))?
        .iter()
        .map(|h| lossy(h).trim().to_string())
        .collect();

    let mut rows = Vec::new();

    for record in reader.byte_records() {
        let record = record.map_err(|e| ReportError::Unreadable(e.to_string()))?;

        rows.push(record.iter().map(|f| CellValue::infer(&lossy(f))).collect());
    }

    Ok(RawTable { headers, rows })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reads_headers_and_inferred_cells() {
        let data = "Keyword,CPC(USD),ACOS\nshoes,$1.50,-\nboots,0.8,\n";

        let table = read_csv(data.as_bytes()).unwrap();

        assert_eq!(table.headers, vec!["Keyword", "CPC(USD)", "ACOS"]);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(
            table.rows[0],
            vec![
                CellValue::Text("shoes".into()),
                CellValue::Text("$1.50".into()),
                CellValue::Text("-".into()),
            ]
        );
        assert_eq!(
            table.rows[1],
            vec![
                CellValue::Text("boots".into()),
                CellValue::Number(0.8),
                CellValue::Empty,
            ]
        );
    }

    #[test]
    fn test_ragged_rows_and_quoted_fields() {
        let data = "Keyword,Match Type,State\n\"shoes, red\",EXACT\n";

        let table = read_csv(data.as_bytes()).unwrap();

        assert_eq!(table.rows[0].len(), 2);
        assert_eq!(table.rows[0][0], CellValue::Text("shoes, red".into()));
    }

    #[test]
    fn test_tolerates_invalid_utf8() {
        let mut data = b"Keyword,ACOS\ncaf".to_vec();
        data.push(0xE9);
        data.extend_from_slice(b",12\n");

        let table = read_csv(&data).unwrap();

        assert_eq!(table.rows[0][0], CellValue::Text("caf\u{FFFD}".into()));
        assert_eq!(table.rows[0][1], CellValue::Number(12.0));
    }

    #[test]
    fn test_empty_input_has_no_headers() {
        let table = read_csv(b"").unwrap();

        assert!(table.headers.is_empty());
        assert!(table.rows.is_empty());
    }
}
