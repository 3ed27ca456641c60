use std::collections::BTreeMap;

use crate::models::{CoreError, CoreErrorKind, CoreResult};

pub const SUPPRESS_LOGS_ENV: &str = "TUNEX_SUPPRESS_LOGS";
pub const LOWERING_STACK_SIZE_ENV: &str = "TUNEX_LOWERING_STACK_SIZE";
const DEFAULT_THREAD_NAME_PREFIX: &str = "tunex-lower";

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ExtractionOptions {
    /// Silence log output while programs are being traced.
    pub suppress_logs: bool,
    pub thread_name_prefix: String,
    pub lowering_stack_size: Option<usize>,
    /// Per-operator schedule template overrides, e.g. `conv2d_nchw -> winograd`.
    pub template_keys: BTreeMap<String, String>,
}

impl Default for ExtractionOptions {
    fn default() -> Self {
        Self {
            suppress_logs: true,
            thread_name_prefix: DEFAULT_THREAD_NAME_PREFIX.to_string(),
            lowering_stack_size: None,
            template_keys: BTreeMap::new(),
        }
    }
}

impl ExtractionOptions {
    pub fn from_env() -> CoreResult<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> CoreResult<Self> {
        let mut options = Self::default();

        if let Some(raw) = lookup(SUPPRESS_LOGS_ENV) {
            options.suppress_logs = match raw.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => true,
                "0" | "false" | "no" | "off" => false,
                _ => return Err(invalid_setting(SUPPRESS_LOGS_ENV, &raw)),
            };
        }

        if let Some(raw) = lookup(LOWERING_STACK_SIZE_ENV) {
            let bytes = raw
                .trim()
                .parse::<usize>()
                .ok()
                .filter(|bytes| *bytes > 0)
                .ok_or_else(|| invalid_setting(LOWERING_STACK_SIZE_ENV, &raw))?;
            options.lowering_stack_size = Some(bytes);
        }

        Ok(options)
    }

    pub fn with_template_key(
        mut self,
        operator: impl Into<String>,
        template_key: impl Into<String>,
    ) -> Self {
        self.template_keys
            .insert(operator.into(), template_key.into());
        self
    }

    pub fn template_key_for(&self, operator: &str) -> Option<&str> {
        self.template_keys.get(operator).map(String::as_str)
    }
}

fn invalid_setting(name: &str, raw: &str) -> CoreError {
    CoreError {
        operator: None,
        program: None,
        kind: CoreErrorKind::InvalidInput,
        message: format!("invalid value '{raw}' for {name}"),
    }
}
