use crate::app::lifecycle::context::StartupContext;
use crate::app::lifecycle::shutdown::tasks::{ObservabilityShutdownTask, StopServerTask};
use crate::app::span::WrappedPipelineTask;
use crate::core::pipeline::{Pipeline, PipelineBuilder};
use tracing::info_span;

/// Builds the shutdown pipeline, which takes the resulting `StartupContext`
/// and releases everything startup attached to it
pub fn build_shutdown_pipeline() -> Pipeline<StartupContext, anyhow::Error> {
    let shutdown_pipeline = PipelineBuilder::new()
        .with_async(Box::new(StopServerTask))
        .build()
        .expect("Shutdown pipeline should have tasks!");

    let observed_pipeline =
        WrappedPipelineTask::new(shutdown_pipeline, || info_span!("shutdown_pipeline"));

    // exporters flush last, outside the span they would otherwise still be exporting
    PipelineBuilder::new()
        .with_async(Box::new(observed_pipeline))
        .with_blocking(Box::new(ObservabilityShutdownTask))
        .build()
        .expect("Shutdown pipeline should have tasks!")
}
