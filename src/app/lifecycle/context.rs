use crate::app::config::PpcConfig;
use crate::app::pipeline::report::ReportContext;
use crate::core::observability::Observability;
use crate::core::pipeline::Pipeline;
use actix_web::dev::ServerHandle;
use anyhow::Error;
use parking_lot::Mutex;
use std::sync::{Arc, OnceLock};

#[derive(Default)]
pub struct StartupContext {
    /// Config snapshot taken at startup
    pub config: OnceLock<PpcConfig>,

    /// Taken by the shutdown pipeline so exporters and log writers flush
    pub observability: Mutex<Option<Observability>>,

    /// Per upload pipeline shared by every handler
    pub report_pipeline: OnceLock<Arc<Pipeline<ReportContext, Error>>>,

    /// The running web server
    pub server: OnceLock<ServerHandle>,
}
