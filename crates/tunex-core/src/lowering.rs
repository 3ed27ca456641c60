use std::collections::BTreeSet;

use crate::models::{CoreResult, Target, TargetPair};

/// Device name of the auxiliary accelerator that needs its own lowering setup.
pub const VTA_DEVICE: &str = "vta";
const VTA_OPT_LEVEL: u8 = 3;
const VTA_DISABLED_PASSES: &[&str] = &["AlterOpLayout"];

/// Pass configuration applied to a single lowering call.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct LoweringConfig {
    /// `None` keeps the pipeline's own default.
    pub opt_level: Option<u8>,
    pub disabled_passes: BTreeSet<String>,
    /// Auxiliary backend whose build configuration wraps the lowering call.
    pub auxiliary_backend: Option<String>,
}

impl LoweringConfig {
    pub fn for_target(target: &Target) -> Self {
        if target.device_name() == Some(VTA_DEVICE) {
            return Self {
                opt_level: Some(VTA_OPT_LEVEL),
                disabled_passes: VTA_DISABLED_PASSES
                    .iter()
                    .map(|pass| pass.to_string())
                    .collect(),
                auxiliary_backend: Some(VTA_DEVICE.to_string()),
            };
        }
        Self::default()
    }

    pub fn is_pass_disabled(&self, pass: &str) -> bool {
        self.disabled_passes.contains(pass)
    }
}

/// The compiler lowering pipeline being traced.
///
/// Implementations must call [`crate::interception::dispatch`] for every
/// tunable-operator dispatch they perform.
pub trait LoweringPipeline: Sync {
    type Program: Sync;
    type Params: Sync;
    type Lowered;

    /// Lowers `program` far enough to dispatch every tunable operator.
    ///
    /// `config` applies to this call only: opt level, disabled passes and the
    /// auxiliary backend's build configuration must be restored before
    /// returning, so later lowerings in the process see the pipeline defaults.
    fn lower(
        &self,
        program: &Self::Program,
        targets: &TargetPair,
        params: &Self::Params,
        config: &LoweringConfig,
    ) -> CoreResult<Self::Lowered>;

    fn clear_function_cache(&self);

    /// The dispatch layer's fallback context, when the pipeline is running
    /// without tuned schedules.
    fn fallback_context(&self) -> Option<&dyn FallbackContext> {
        None
    }
}

pub trait FallbackContext: Send + Sync {
    /// Drop memoized fallback configurations and the warn-once message set.
    fn clear_warnings(&self);
}

#[cfg(test)]
mod tests {
    use super::LoweringConfig;
    use crate::models::Target;

    #[test]
    fn vta_targets_get_specialized_config() {
        let target = Target::parse("llvm -device=vta").unwrap();
        let config = LoweringConfig::for_target(&target);
        assert_eq!(config.opt_level, Some(3));
        assert!(config.is_pass_disabled("AlterOpLayout"));
        assert_eq!(config.auxiliary_backend.as_deref(), Some("vta"));
    }

    #[test]
    fn other_targets_use_pipeline_defaults() {
        let config = LoweringConfig::for_target(&Target::parse("cuda -arch=sm_75").unwrap());
        assert_eq!(config, LoweringConfig::default());
    }
}
