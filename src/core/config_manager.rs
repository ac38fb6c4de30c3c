use crate::app::config::PpcConfig;
use anyhow::{Error, bail};
use parking_lot::{RwLock, RwLockReadGuard};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Owns the loaded config file. Reads are cheap shared guards and a
/// reload swaps the whole config in place.
pub struct ConfigManager {
    path: PathBuf,
    cfg: Arc<RwLock<PpcConfig>>,
    started: AtomicBool,
}

impl ConfigManager {
    pub fn new(cfg_path: PathBuf) -> ConfigManager {
        ConfigManager {
            path: cfg_path,
            cfg: Arc::new(RwLock::new(PpcConfig::default())),
            started: AtomicBool::new(false),
        }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// Reads the file again, the previous config stays live if it fails
    pub fn reload(&self) -> Result<(), Error> {
        let cfg = PpcConfig::load(&self.path)?;
        *self.cfg.write() = cfg;

        Ok(())
    }

    /// Loads the initial config
    pub fn start(&self) -> Result<(), Error> {
        self.reload()?;
        self.started.store(true, Ordering::Release);

        Ok(())
    }

    /// Read guard over the current config, errors before `start`
    pub fn get(&self) -> Result<RwLockReadGuard<'_, PpcConfig>, Error> {
        if !self.started.load(Ordering::Acquire) {
            bail!("ConfigManager not started yet but fetching config");
        }

        Ok(self.cfg.read())
    }

    /// Owned copy of the current config
    pub fn snapshot(&self) -> Result<PpcConfig, Error> {
        Ok(self.get()?.clone())
    }
}
