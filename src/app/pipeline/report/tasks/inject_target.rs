use crate::app::pipeline::report::context::ReportContext;
use crate::core::pipeline::BlockingTask;
use anyhow::Error;
use tracing::debug;

/// Gives every row without a target of its own the batch target ACOS
pub struct InjectTargetAcosTask;

impl BlockingTask<ReportContext, Error> for InjectTargetAcosTask {
    fn run(&self, context: &ReportContext) -> Result<(), Error> {
        let mut records = context.records.lock();
        let mut injected = 0;

        for record in records.iter_mut() {
            if record.target_acos.is_missing() {
                record.inject_target_acos(context.target_acos);
                injected += 1;
            }
        }

        debug!(
            "Report {} injected target {} into {} of {} rows",
            context.report_id,
            context.target_acos,
            injected,
            records.len()
        );

        Ok(())
    }
}
