use crate::app::http::AppState;
use crate::app::lifecycle::context::StartupContext;
use crate::core::pipeline::AsyncTask;
use actix_web::{App, HttpServer, rt};
use anyhow::{Context, Error, anyhow};
use async_trait::async_trait;
use tracing::{error, info, instrument};

pub struct StartServerTask;

#[async_trait]
impl AsyncTask<StartupContext, Error> for StartServerTask {
    #[instrument(skip_all, name = "start_server_task")]
    async fn run(&self, ctx: &StartupContext) -> Result<(), Error> {
        let config = ctx
            .config
            .get()
            .ok_or_else(|| anyhow!("Server task context missing config!"))?;

        let pipeline = ctx
            .report_pipeline
            .get()
            .ok_or_else(|| anyhow!("Report pipeline not built"))?
            .clone();

        let state = AppState {
            pipeline,
            default_target_acos: config.bidding.default_target_acos,
            max_bytes: config.upload.max_bytes,
            span_sample_rate: config.logging.span_sample_rate,
        };

        let addr = (config.server.host.as_str(), config.server.port);

        let mut server = HttpServer::new(move || App::new().configure(|cfg| state.configure(cfg)))
            .disable_signals()
            .shutdown_timeout(config.server.shutdown_timeout.as_secs());

        if config.server.workers > 0 {
            server = server.workers(config.server.workers);
        }

        let server = server
            .bind(addr)
            .with_context(|| format!("failed to bind {}:{}", addr.0, addr.1))?
            .run();

        ctx.server
            .set(server.handle())
            .map_err(|_| anyhow!("Could not set server"))?;

        rt::spawn(async move {
            if let Err(e) = server.await {
                error!("Http server exited with error: {}", e);
            }
        });

        info!(
            "Started http server on {}:{}, ready for requests",
            addr.0, addr.1
        );

        Ok(())
    }
}
