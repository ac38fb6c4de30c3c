mod detect_format;
mod inject_target;
mod parse_report;
mod recompute_bids;
mod record_metrics;

pub use detect_format::DetectFormatTask;
pub use inject_target::InjectTargetAcosTask;
pub use parse_report::ParseReportTask;
pub use recompute_bids::RecomputeBidsTask;
pub use record_metrics::RecordReportMetricsTask;
