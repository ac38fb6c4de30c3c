mod context;
mod pipeline;
pub mod tasks;

pub use context::{RecomputeSummary, ReportContext, ReportUpload};
pub use pipeline::build_report_pipeline;
