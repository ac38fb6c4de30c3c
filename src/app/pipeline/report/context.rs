use crate::core::models::keyword::KeywordBidRecord;
use crate::core::report::ReportFormat;
use bytes::Bytes;
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::sync::OnceLock;
use uuid::Uuid;

/// The file as it arrived in the request, held in memory only
#[derive(Debug, Clone, Default)]
pub struct ReportUpload {
    pub filename: String,
    pub bytes: Bytes,
}

/// Outcome of pricing one report
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecomputeSummary {
    pub rows: usize,
    /// Rows whose bid fell back to 0
    pub defaulted: usize,
    /// Fallback count per failure kind
    pub fallbacks: BTreeMap<&'static str, usize>,
}

#[derive(Debug)]
pub struct ReportContext {
    /// Correlates log lines and spans for one upload
    pub report_id: String,
    pub upload: ReportUpload,
    /// Batch target ACOS, applied to rows without their own
    pub target_acos: f64,
    pub format: OnceLock<ReportFormat>,
    /// Parsed rows, priced in place once the bids are recomputed
    pub records: Mutex<Vec<KeywordBidRecord>>,
    pub summary: OnceLock<RecomputeSummary>,
}

impl ReportContext {
    pub fn new(upload: ReportUpload, target_acos: f64) -> ReportContext {
        ReportContext {
            report_id: Uuid::new_v4().to_string(),
            upload,
            target_acos,
            format: OnceLock::new(),
            records: Mutex::new(Vec::new()),
            summary: OnceLock::new(),
        }
    }

    /// Moves the rows out, leaving the context empty
    pub fn take_records(&self) -> Vec<KeywordBidRecord> {
        std::mem::take(&mut *self.records.lock())
    }
}
