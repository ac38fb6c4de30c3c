mod config_load;
mod observability;
mod report_pipeline;
mod start_server;

pub use config_load::ConfigLoadTask;
pub use observability::ConfigureObservabilityTask;
pub use report_pipeline::ReportPipelineTask;
pub use start_server::StartServerTask;
