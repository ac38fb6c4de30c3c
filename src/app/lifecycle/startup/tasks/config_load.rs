use crate::app::lifecycle::context::StartupContext;
use crate::core::config_manager::ConfigManager;
use crate::core::pipeline::BlockingTask;
use anyhow::{Context, Error, anyhow};

pub struct ConfigLoadTask {
    manager: ConfigManager,
}

impl ConfigLoadTask {
    pub fn new(manager: ConfigManager) -> Self {
        Self { manager }
    }
}

impl BlockingTask<StartupContext, Error> for ConfigLoadTask {
    fn run(&self, context: &StartupContext) -> Result<(), Error> {
        self.manager
            .start()
            .with_context(|| format!("failed to load config {}", self.manager.path().display()))?;

        context
            .config
            .set(self.manager.snapshot()?)
            .map_err(|_| anyhow!("Config already loaded on startup context"))?;

        // logging is not configured yet
        println!("Config loaded from {}", self.manager.path().display());

        Ok(())
    }
}
