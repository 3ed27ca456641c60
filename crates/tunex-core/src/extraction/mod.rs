pub mod driver;
pub mod materialize;
pub mod program;
pub mod runtime;

use std::sync::Arc;

use crate::config::ExtractionOptions;
use crate::construction::TaskFactory;
use crate::ledger::InvocationLedger;
use crate::lowering::LoweringPipeline;
use crate::models::{InvocationRecord, Task};
use crate::target_resolution::{CanonicalTargetResolver, TargetResolver};

pub use materialize::{Materialized, materialize};
pub use program::ProgramExtractor;

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SkippedInvocation {
    pub record: InvocationRecord,
    pub reason: String,
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ExtractionReport {
    pub tasks: Vec<Task>,
    pub skipped: Vec<SkippedInvocation>,
    pub programs_traced: usize,
    pub distinct_invocations: usize,
}

/// Traces batches of programs through a lowering pipeline and turns the
/// distinct tunable invocations into tuning tasks.
pub struct TaskExtractor<L> {
    pipeline: Arc<L>,
    factory: Arc<dyn TaskFactory>,
    resolver: Arc<dyn TargetResolver>,
    ledger: Arc<InvocationLedger>,
    options: ExtractionOptions,
}

impl<L> Clone for TaskExtractor<L> {
    fn clone(&self) -> Self {
        Self {
            pipeline: self.pipeline.clone(),
            factory: self.factory.clone(),
            resolver: self.resolver.clone(),
            ledger: self.ledger.clone(),
            options: self.options.clone(),
        }
    }
}

impl<L: LoweringPipeline> TaskExtractor<L> {
    pub fn new(pipeline: Arc<L>, factory: Arc<dyn TaskFactory>) -> Self {
        Self {
            pipeline,
            factory,
            resolver: Arc::new(CanonicalTargetResolver),
            ledger: InvocationLedger::global(),
            options: ExtractionOptions::default(),
        }
    }

    pub fn with_resolver(mut self, resolver: Arc<dyn TargetResolver>) -> Self {
        self.resolver = resolver;
        self
    }

    pub fn with_ledger(mut self, ledger: Arc<InvocationLedger>) -> Self {
        self.ledger = ledger;
        self
    }

    pub fn with_options(mut self, options: ExtractionOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &ExtractionOptions {
        &self.options
    }

    pub fn ledger(&self) -> &Arc<InvocationLedger> {
        &self.ledger
    }
}
