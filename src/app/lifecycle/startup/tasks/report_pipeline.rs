use crate::app::lifecycle::context::StartupContext;
use crate::app::pipeline::report::build_report_pipeline;
use crate::core::pipeline::BlockingTask;
use anyhow::{Error, anyhow};
use std::sync::Arc;
use tracing::{info, instrument};

pub struct ReportPipelineTask;

impl BlockingTask<StartupContext, Error> for ReportPipelineTask {
    #[instrument(skip_all, name = "report_pipeline_task")]
    fn run(&self, context: &StartupContext) -> Result<(), Error> {
        let config = context
            .config
            .get()
            .ok_or_else(|| anyhow!("Config not loaded before building report pipeline"))?;

        let pipeline = build_report_pipeline(config.report.columns.clone())?;
        let tasks = pipeline.len();

        context
            .report_pipeline
            .set(Arc::new(pipeline))
            .map_err(|_| anyhow!("Report pipeline already built"))?;

        info!("Built report pipeline with {} tasks", tasks);

        Ok(())
    }
}
