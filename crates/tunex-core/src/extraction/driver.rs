use std::any::Any;

use crate::extraction::{ExtractionReport, ProgramExtractor, TaskExtractor, materialize};
use crate::interception::{self, InterceptionScope};
use crate::logging::LogSuppression;
use crate::lowering::LoweringPipeline;
use crate::models::{
    CoreError, CoreErrorKind, CoreResult, OperatorFilter, Target, TargetPair, Task,
};

impl<L: LoweringPipeline> TaskExtractor<L> {
    /// Single-program form of [`TaskExtractor::extract_from_programs`].
    pub fn extract_from_program(
        &self,
        program: &L::Program,
        params: &L::Params,
        target: &Target,
        host: Option<&Target>,
        filter: Option<&OperatorFilter>,
    ) -> CoreResult<Vec<Task>> {
        self.extract_from_programs(
            std::slice::from_ref(program),
            std::slice::from_ref(params),
            filter,
            target,
            host,
        )
    }

    pub fn extract_from_programs(
        &self,
        programs: &[L::Program],
        params: &[L::Params],
        filter: Option<&OperatorFilter>,
        target: &Target,
        host: Option<&Target>,
    ) -> CoreResult<Vec<Task>> {
        Ok(self
            .extract_report(programs, params, filter, target, host)?
            .tasks)
    }

    pub fn extract_report(
        &self,
        programs: &[L::Program],
        params: &[L::Params],
        filter: Option<&OperatorFilter>,
        target: &Target,
        host: Option<&Target>,
    ) -> CoreResult<ExtractionReport> {
        if programs.len() != params.len() {
            return Err(CoreError {
                operator: None,
                program: None,
                kind: CoreErrorKind::InvalidInput,
                message: format!(
                    "got {} programs but {} parameter sets",
                    programs.len(),
                    params.len()
                ),
            });
        }

        // The enclosing batch holds the session lock while it joins this thread.
        if interception::in_lowering_pass() {
            return Err(CoreError {
                operator: None,
                program: None,
                kind: CoreErrorKind::AlreadyTracing,
                message: "task extraction started from inside a traced lowering pass"
                    .to_string(),
            });
        }

        let targets = self.resolver.canonicalize(target, host)?;

        let records = {
            let _session = interception::lock_tracing_session();
            self.ledger.reset(filter.cloned())?;
            self.trace_programs(programs, params, &targets)?;
            self.ledger.drain()?
        };

        let materialized = materialize(
            &records,
            &targets.target,
            self.factory.as_ref(),
            &self.options,
        )?;
        tracing::info!(
            compile_target = %targets.target,
            programs = programs.len(),
            invocations = records.len(),
            tasks = materialized.tasks.len(),
            skipped = materialized.skipped.len(),
            "extracted tuning tasks"
        );

        Ok(ExtractionReport {
            tasks: materialized.tasks,
            skipped: materialized.skipped,
            programs_traced: programs.len(),
            distinct_invocations: records.len(),
        })
    }

    fn trace_programs(
        &self,
        programs: &[L::Program],
        params: &[L::Params],
        targets: &TargetPair,
    ) -> CoreResult<()> {
        let _scope = InterceptionScope::enter(self.ledger.clone())?;
        let _quiet = LogSuppression::new(self.options.suppress_logs);
        let extractor = ProgramExtractor::new(self.pipeline.as_ref());

        for (index, (program, params)) in programs.iter().zip(params).enumerate() {
            self.pipeline.clear_function_cache();
            let traced = self.run_isolated(index, || extractor.extract(program, targets, params));

            // Reset on every exit path, a failed or panicked pass included.
            self.pipeline.clear_function_cache();
            if let Some(fallback) = self.pipeline.fallback_context() {
                fallback.clear_warnings();
            }

            traced.map_err(|error| CoreError {
                program: error.program.or(Some(index)),
                ..error
            })?;
        }

        Ok(())
    }

    /// Runs `operation` on a fresh thread and waits for it, so thread-local
    /// state the pipeline sets up dies with the pass.
    fn run_isolated(
        &self,
        index: usize,
        operation: impl FnOnce() -> CoreResult<()> + Send,
    ) -> CoreResult<()> {
        let suppress_logs = self.options.suppress_logs;
        let mut builder = std::thread::Builder::new()
            .name(format!("{}-{index}", self.options.thread_name_prefix));
        if let Some(stack_size) = self.options.lowering_stack_size {
            builder = builder.stack_size(stack_size);
        }

        std::thread::scope(|scope| {
            let handle = builder
                .spawn_scoped(scope, move || {
                    let _quiet = LogSuppression::new(suppress_logs);
                    interception::with_lowering_pass(operation)
                })
                .map_err(|error| CoreError {
                    operator: None,
                    program: Some(index),
                    kind: CoreErrorKind::Internal,
                    message: format!("failed to spawn lowering thread: {error}"),
                })?;

            handle.join().map_err(|panic| CoreError {
                operator: None,
                program: Some(index),
                kind: CoreErrorKind::LoweringFailure,
                message: format!("lowering thread panicked: {}", panic_message(panic.as_ref())),
            })?
        })
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        return (*message).to_string();
    }
    if let Some(message) = payload.downcast_ref::<String>() {
        return message.clone();
    }
    "unknown panic payload".to_string()
}
