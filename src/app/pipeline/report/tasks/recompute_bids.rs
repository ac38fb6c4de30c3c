use crate::app::pipeline::report::context::{RecomputeSummary, ReportContext};
use crate::child_span_info;
use crate::core::bidding::BidRecalculator;
use crate::core::pipeline::BlockingTask;
use anyhow::{Error, bail};
use tracing::debug;

/// Assigns every row its new max bid. A row which cannot be priced gets
/// a bid of 0 and is tallied by failure kind, it never fails the upload.
pub struct RecomputeBidsTask;

impl BlockingTask<ReportContext, Error> for RecomputeBidsTask {
    fn run(&self, context: &ReportContext) -> Result<(), Error> {
        let span = child_span_info!(
            "recompute_bids",
            target_acos = context.target_acos,
            rows = tracing::field::Empty,
            defaulted = tracing::field::Empty,
        )
        .entered();

        let recalculator = BidRecalculator::new(context.target_acos);
        let mut summary = RecomputeSummary::default();

        for record in context.records.lock().iter_mut() {
            summary.rows += 1;

            if let Err(e) = recalculator.apply(record) {
                summary.defaulted += 1;
                *summary.fallbacks.entry(e.kind()).or_default() += 1;
            }
        }

        span.record("rows", summary.rows);
        span.record("defaulted", summary.defaulted);

        debug!(
            "Report {} priced {} rows, {} fell back to 0",
            context.report_id, summary.rows, summary.defaulted
        );

        if context.summary.set(summary).is_err() {
            bail!("Recompute summary already set on context!");
        }

        Ok(())
    }
}
