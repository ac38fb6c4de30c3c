use crate::core::bidding::DEFAULT_TARGET_ACOS;
use crate::core::report::ColumnContract;
use config::{Config, Environment};
use derive_builder::Builder;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Env prefix for overrides, e.g. `PPCBID__SERVER__PORT=8080`
const ENV_PREFIX: &str = "PPCBID";

#[derive(Debug, Clone, Serialize, Deserialize, Builder)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Worker threads, 0 lets actix pick one per core
    pub workers: usize,
    /// Grace period for in flight uploads on shutdown
    #[serde(with = "humantime_serde")]
    pub shutdown_timeout: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            workers: 0,
            shutdown_timeout: Duration::from_secs(10),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Builder)]
#[serde(default)]
pub struct UploadConfig {
    /// Largest report accepted, in bytes
    pub max_bytes: usize,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_bytes: 16 * 1024 * 1024,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Builder)]
#[serde(default)]
pub struct BiddingConfig {
    /// Target ACOS injected into every row when the request names none
    pub default_target_acos: f64,
}

impl Default for BiddingConfig {
    fn default() -> Self {
        Self {
            default_target_acos: DEFAULT_TARGET_ACOS,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, Builder)]
#[serde(default)]
pub struct ReportConfig {
    pub columns: ColumnContract,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, Builder)]
#[serde(default)]
pub struct PpcConfig {
    pub server: ServerConfig,
    pub upload: UploadConfig,
    pub bidding: BiddingConfig,
    pub report: ReportConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OtelProto {
    Http,
    Grpc,
}

impl Default for OtelProto {
    fn default() -> Self {
        OtelProto::Grpc
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileRotation {
    Daily,
    Hourly,
    Never,
}

impl Default for FileRotation {
    fn default() -> Self {
        FileRotation::Daily
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogSink {
    #[serde(flatten)]
    pub dest: LogType,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum LogType {
    Stdout {
        #[serde(default = "default_true")]
        color: bool,
        #[serde(default)]
        json: bool,
        #[serde(default)]
        spans: bool,
    },
    File {
        path: PathBuf,
        #[serde(default)]
        json: bool,
        #[serde(default)]
        rotation: FileRotation,
        #[serde(default)]
        max_files: usize,
        #[serde(default)]
        spans: bool,
    },
    Otel {
        #[serde(default)]
        endpoint: String,
        #[serde(default)]
        proto: OtelProto,
        #[serde(default = "default_true")]
        metrics: bool,
        #[serde(default = "default_metrics_interval")]
        metrics_interval_secs: u32,
    },
}

fn default_true() -> bool {
    true
}

fn default_metrics_interval() -> u32 {
    15
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub span_sample_rate: f32,
    pub sinks: Vec<LogSink>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            span_sample_rate: 0.01,
            sinks: vec![LogSink {
                dest: LogType::Stdout {
                    color: true,
                    json: false,
                    spans: false,
                },
            }],
        }
    }
}

impl LoggingConfig {
    /// Validates the logging configuration
    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.sinks.is_empty() {
            anyhow::bail!("At least one logging sink must be configured");
        }

        self.level.parse::<tracing::Level>().map_err(|_| {
            anyhow::anyhow!(
                "Invalid log level: '{}'. Valid levels: trace, debug, info, warn, error",
                self.level
            )
        })?;

        if !(0.0..=1.0).contains(&self.span_sample_rate) {
            anyhow::bail!(
                "span_sample_rate must be between 0.0 and 1.0, got {}",
                self.span_sample_rate
            );
        }

        let otel_sinks = self
            .sinks
            .iter()
            .filter(|sink| matches!(sink.dest, LogType::Otel { .. }))
            .count();

        if otel_sinks > 1 {
            anyhow::bail!("Only one otel sink may be configured, got {}", otel_sinks);
        }

        Ok(())
    }
}

impl PpcConfig {
    /// Loads the yaml file at `path`, then applies `PPCBID__*` env overrides
    pub fn load(path: &PathBuf) -> Result<PpcConfig, anyhow::Error> {
        let cfg = Config::builder()
            .add_source(config::File::from(path.to_path_buf()))
            .add_source(Environment::with_prefix(ENV_PREFIX).separator("__"))
            .build()?;

        let ppc_config: PpcConfig = cfg.try_deserialize()?;
        ppc_config.validate()?;

        Ok(ppc_config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        let target = self.bidding.default_target_acos;
        if !target.is_finite() || target < 0.0 {
            anyhow::bail!("bidding.default_target_acos must be a non-negative number, got {}", target);
        }

        if self.upload.max_bytes == 0 {
            anyhow::bail!("upload.max_bytes must be greater than zero");
        }

        self.logging.validate()
    }
}
