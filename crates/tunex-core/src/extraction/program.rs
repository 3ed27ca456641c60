use crate::lowering::{LoweringConfig, LoweringPipeline};
use crate::models::{CoreError, CoreErrorKind, CoreResult, TargetPair};

/// Lowers one program purely for its dispatch side effects.
pub struct ProgramExtractor<'a, L> {
    pipeline: &'a L,
}

impl<'a, L: LoweringPipeline> ProgramExtractor<'a, L> {
    pub fn new(pipeline: &'a L) -> Self {
        Self { pipeline }
    }

    /// Invocations reach the ledger through the active interception scope;
    /// the lowered form itself is dropped.
    pub fn extract(
        &self,
        program: &L::Program,
        targets: &TargetPair,
        params: &L::Params,
    ) -> CoreResult<()> {
        // Cached lowered functions would bypass dispatch entirely.
        self.pipeline.clear_function_cache();

        let config = LoweringConfig::for_target(&targets.target);
        if let Some(backend) = &config.auxiliary_backend {
            tracing::debug!(backend = %backend, "lowering with auxiliary backend configuration");
        }
        let lowered = self.pipeline.lower(program, targets, params, &config);

        self.pipeline.clear_function_cache();

        lowered.map(drop).map_err(lowering_failure)
    }
}

fn lowering_failure(error: CoreError) -> CoreError {
    if error.kind == CoreErrorKind::LoweringFailure {
        return error;
    }
    CoreError {
        operator: error.operator,
        program: error.program,
        kind: CoreErrorKind::LoweringFailure,
        message: format!("lowering failed ({:?}): {}", error.kind, error.message),
    }
}
