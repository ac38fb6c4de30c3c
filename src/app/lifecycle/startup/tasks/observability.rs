use crate::app::lifecycle::context::StartupContext;
use crate::core::observability;
use crate::core::pipeline::BlockingTask;
use anyhow::{Error, anyhow};
use tracing::info;

pub struct ConfigureObservabilityTask;

impl BlockingTask<StartupContext, Error> for ConfigureObservabilityTask {
    fn run(&self, context: &StartupContext) -> Result<(), Error> {
        let config = context
            .config
            .get()
            .ok_or_else(|| anyhow!("Config not loaded before observability initialization"))?;

        let providers = observability::init(&config.logging)?;

        info!(
            traces = providers.exports_traces(),
            metrics = providers.exports_metrics(),
            "Observability configured"
        );

        *context.observability.lock() = Some(providers);

        Ok(())
    }
}
