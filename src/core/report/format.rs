use crate::core::report::excel_reader::read_excel;
use crate::core::report::csv_reader::read_csv;
use crate::core::report::{RawTable, ReportError};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;
use strum::{AsRefStr, Display, EnumString};

/// Report file types accepted for upload
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumString, Display, AsRefStr,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    Csv,
    Xlsx,
    Xls,
}

impl ReportFormat {
    /// Detects the format from the extension of the uploaded file name
    pub fn from_filename(filename: &str) -> Result<ReportFormat, ReportError> {
        Path::new(filename)
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| ReportFormat::from_str(ext).ok())
            .ok_or_else(|| ReportError::UnsupportedFormat(filename.to_string()))
    }

    /// Reads the raw table out of the uploaded bytes
    pub fn read(self, bytes: &[u8]) -> Result<RawTable, ReportError> {
        match self {
            ReportFormat::Csv => read_csv(bytes),
            ReportFormat::Xlsx | ReportFormat::Xls => read_excel(bytes),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_filename() {
        assert_eq!(ReportFormat::from_filename("report.csv").unwrap(), ReportFormat::Csv);
        assert_eq!(ReportFormat::from_filename("Campaign.XLSX").unwrap(), ReportFormat::Xlsx);
        assert_eq!(ReportFormat::from_filename("old.report.xls").unwrap(), ReportFormat::Xls);
    }

    #[test]
    fn test_from_filename_rejects_other_types() {
        for name in ["report.txt", "report", "csv", ".csv.bak", "report.xlsm"] {
            let err = ReportFormat::from_filename(name).unwrap_err();
            assert!(matches!(err, ReportError::UnsupportedFormat(_)), "name {}", name);
            assert_eq!(err.to_string(), "Invalid file type");
        }
    }

    #[test]
    fn test_display_is_lowercase() {
        assert_eq!(ReportFormat::Xlsx.to_string(), "xlsx");
        assert_eq!(ReportFormat::Csv.as_ref(), "csv");
    }
}
