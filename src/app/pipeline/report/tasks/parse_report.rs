use crate::app::pipeline::report::context::ReportContext;
use crate::child_span_info;
use crate::core::pipeline::BlockingTask;
use crate::core::report::ColumnContract;
use anyhow::{Error, anyhow};
use tracing::debug;

/// Reads the uploaded bytes and projects them onto keyword rows
pub struct ParseReportTask {
    columns: ColumnContract,
}

impl ParseReportTask {
    pub fn new(columns: ColumnContract) -> Self {
        Self { columns }
    }
}

impl BlockingTask<ReportContext, Error> for ParseReportTask {
    fn run(&self, context: &ReportContext) -> Result<(), Error> {
        let format = context
            .format
            .get()
            .ok_or_else(|| anyhow!("Report format missing on context! Cant parse"))?;

        let span = child_span_info!(
            "parse_report",
            format = %format,
            bytes = context.upload.bytes.len(),
            raw_rows = tracing::field::Empty,
            rows = tracing::field::Empty,
        )
        .entered();

        let table = format.read(&context.upload.bytes)?;
        span.record("raw_rows", table.rows.len());

        let records = self.columns.project(table)?;
        span.record("rows", records.len());

        debug!("Report {} parsed {} keyword rows", context.report_id, records.len());

        *context.records.lock() = records;

        Ok(())
    }
}
