use crate::app::pipeline::report::context::ReportContext;
use crate::core::pipeline::BlockingTask;
use anyhow::{Error, anyhow};
use opentelemetry::metrics::Counter;
use opentelemetry::{KeyValue, global};
use std::sync::LazyLock;

static REPORTS_TOTAL: LazyLock<Counter<u64>> = LazyLock::new(|| {
    global::meter("ppcbid:report")
        .u64_counter("reports.processed")
        .with_description("Reports parsed and priced")
        .with_unit("1")
        .build()
});

static ROWS_TOTAL: LazyLock<Counter<u64>> = LazyLock::new(|| {
    global::meter("ppcbid:report")
        .u64_counter("reports.rows")
        .with_description("Keyword rows priced")
        .with_unit("1")
        .build()
});

static ROWS_DEFAULTED: LazyLock<Counter<u64>> = LazyLock::new(|| {
    global::meter("ppcbid:report")
        .u64_counter("reports.rows.defaulted")
        .with_description("Keyword rows whose bid fell back to 0")
        .with_unit("1")
        .build()
});

/// Exports per report counters, only reached by reports which priced
pub struct RecordReportMetricsTask;

impl BlockingTask<ReportContext, Error> for RecordReportMetricsTask {
    fn run(&self, context: &ReportContext) -> Result<(), Error> {
        let format = context
            .format
            .get()
            .ok_or_else(|| anyhow!("Report format missing on context! Cant record metrics"))?;

        let summary = context
            .summary
            .get()
            .ok_or_else(|| anyhow!("Recompute summary missing on context! Cant record metrics"))?;

        let attrs = [KeyValue::new("format", format.to_string())];

        REPORTS_TOTAL.add(1, &attrs);
        ROWS_TOTAL.add(summary.rows as u64, &attrs);

        for (kind, count) in &summary.fallbacks {
            ROWS_DEFAULTED.add(
                *count as u64,
                &[
                    KeyValue::new("format", format.to_string()),
                    KeyValue::new("reason", *kind),
                ],
            );
        }

        Ok(())
    }
}
