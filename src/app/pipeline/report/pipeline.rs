use crate::app::pipeline::report::context::ReportContext;
use crate::app::pipeline::report::tasks::{
    DetectFormatTask, InjectTargetAcosTask, ParseReportTask, RecomputeBidsTask,
    RecordReportMetricsTask,
};
use crate::core::pipeline::{Pipeline, PipelineBuilder};
use crate::core::report::ColumnContract;
use anyhow::{Error, bail};

/// Builds the per upload pipeline, shared by every request handler
pub fn build_report_pipeline(columns: ColumnContract) -> Result<Pipeline<ReportContext, Error>, Error> {
    let report_pipeline = PipelineBuilder::new()
        // Picks csv or excel from the file name, rejects anything else
        .with_blocking(Box::new(DetectFormatTask))
        // Reads the sheet and projects it onto keyword rows
        .with_blocking(Box::new(ParseReportTask::new(columns)))
        // Rows without their own target get the batch one
        .with_blocking(Box::new(InjectTargetAcosTask))
        .with_blocking(Box::new(RecomputeBidsTask))
        .with_blocking(Box::new(RecordReportMetricsTask))
        .build();

    match report_pipeline {
        Some(pipeline) => Ok(pipeline),
        None => bail!("Failed to build report pipeline"),
    }
}
