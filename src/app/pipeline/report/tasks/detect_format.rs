use crate::app::pipeline::report::context::ReportContext;
use crate::core::pipeline::BlockingTask;
use crate::core::report::ReportFormat;
use anyhow::{Error, bail};
use tracing::debug;

pub struct DetectFormatTask;

impl BlockingTask<ReportContext, Error> for DetectFormatTask {
    fn run(&self, context: &ReportContext) -> Result<(), Error> {
        let format = ReportFormat::from_filename(&context.upload.filename)?;

        if context.format.set(format).is_err() {
            bail!("Report format already set on context!");
        }

        debug!(
            "Report {} detected as {} ({})",
            context.report_id, format, context.upload.filename
        );

        Ok(())
    }
}
