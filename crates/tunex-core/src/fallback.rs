use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::lowering::FallbackContext;

/// In-memory fallback dispatch state: configurations handed out for workloads
/// without a tuned schedule, plus the warnings already emitted for them.
#[derive(Default)]
pub struct FallbackWarningCache {
    state: Mutex<FallbackState>,
}

#[derive(Default)]
struct FallbackState {
    memory: HashMap<(String, String), String>,
    warning_messages: HashSet<String>,
}

impl FallbackWarningCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Emits `message` as a warning unless it was already emitted since the
    /// last clear. Returns whether the warning was emitted.
    pub fn warn_once(&self, message: &str) -> bool {
        let mut state = self.lock_state();
        if !state.warning_messages.insert(message.to_string()) {
            return false;
        }
        tracing::warn!(warning = message, "using fallback schedule");
        true
    }

    pub fn remember(&self, target_key: &str, workload_key: &str, config: impl Into<String>) {
        self.lock_state().memory.insert(
            (target_key.to_string(), workload_key.to_string()),
            config.into(),
        );
    }

    pub fn lookup(&self, target_key: &str, workload_key: &str) -> Option<String> {
        self.lock_state()
            .memory
            .get(&(target_key.to_string(), workload_key.to_string()))
            .cloned()
    }

    pub fn warning_count(&self) -> usize {
        self.lock_state().warning_messages.len()
    }

    pub fn memoized_count(&self) -> usize {
        self.lock_state().memory.len()
    }

    fn lock_state(&self) -> MutexGuard<'_, FallbackState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl FallbackContext for FallbackWarningCache {
    fn clear_warnings(&self) {
        let mut state = self.lock_state();
        state.memory.clear();
        state.warning_messages.clear();
    }
}
