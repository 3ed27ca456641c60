use std::time::Duration;

use tokio::time::timeout;

use crate::extraction::{ExtractionReport, TaskExtractor};
use crate::lowering::LoweringPipeline;
use crate::models::{CoreError, CoreErrorKind, CoreResult, OperatorFilter, Target, Task};

impl<L> TaskExtractor<L>
where
    L: LoweringPipeline + Send + 'static,
    L::Program: Send + 'static,
    L::Params: Send + 'static,
{
    pub async fn extract_from_programs_async(
        &self,
        programs: Vec<L::Program>,
        params: Vec<L::Params>,
        filter: Option<OperatorFilter>,
        target: Target,
        host: Option<Target>,
        timeout_duration: Option<Duration>,
    ) -> CoreResult<Vec<Task>> {
        Ok(self
            .extract_report_async(programs, params, filter, target, host, timeout_duration)
            .await?
            .tasks)
    }

    /// Runs the batch on the blocking pool. When the timeout elapses the
    /// caller gets `Timeout`, but the batch keeps running to completion and
    /// holds the tracing session until then.
    pub async fn extract_report_async(
        &self,
        programs: Vec<L::Program>,
        params: Vec<L::Params>,
        filter: Option<OperatorFilter>,
        target: Target,
        host: Option<Target>,
        timeout_duration: Option<Duration>,
    ) -> CoreResult<ExtractionReport> {
        let extractor = self.clone();
        let batch = tokio::task::spawn_blocking(move || {
            extractor.extract_report(&programs, &params, filter.as_ref(), &target, host.as_ref())
        });

        let joined = match timeout_duration {
            Some(duration) => timeout(duration, batch).await.map_err(|_| CoreError {
                operator: None,
                program: None,
                kind: CoreErrorKind::Timeout,
                message: format!("task extraction timed out after {}ms", duration.as_millis()),
            })?,
            None => batch.await,
        };

        joined.map_err(|join_error| CoreError {
            operator: None,
            program: None,
            kind: CoreErrorKind::Internal,
            message: format!("task extraction join failure: {join_error}"),
        })?
    }
}
