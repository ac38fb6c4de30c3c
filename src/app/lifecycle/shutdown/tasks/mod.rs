mod observability;
mod stop_server;

pub use observability::ObservabilityShutdownTask;
pub use stop_server::StopServerTask;
