use crate::models::{CoreResult, Task, TaskRequest};

/// Builds a tuning task for one distinct invocation.
///
/// Fails with `CoreErrorKind::InvalidShape` when the signature cannot be
/// realized by any schedule template; every other error is fatal to the batch.
pub trait TaskFactory: Send + Sync {
    fn construct(&self, request: &TaskRequest<'_>) -> CoreResult<Task>;
}

impl<F> TaskFactory for F
where
    F: Fn(&TaskRequest<'_>) -> CoreResult<Task> + Send + Sync,
{
    fn construct(&self, request: &TaskRequest<'_>) -> CoreResult<Task> {
        self(request)
    }
}

/// Accepts every request as-is.
pub struct PassthroughTaskFactory;

impl TaskFactory for PassthroughTaskFactory {
    fn construct(&self, request: &TaskRequest<'_>) -> CoreResult<Task> {
        Ok(Task::from_request(request))
    }
}
