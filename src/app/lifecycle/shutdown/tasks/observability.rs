use crate::app::lifecycle::context::StartupContext;
use crate::core::observability;
use crate::core::pipeline::BlockingTask;
use anyhow::Error;
use tracing::info;

pub struct ObservabilityShutdownTask;

impl BlockingTask<StartupContext, Error> for ObservabilityShutdownTask {
    fn run(&self, context: &StartupContext) -> Result<(), Error> {
        let Some(provider) = context.observability.lock().take() else {
            return Ok(());
        };

        info!("Shutting down observability");

        observability::shutdown(provider)
    }
}
