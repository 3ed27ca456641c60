use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, OnceLock};

use crate::models::{
    ArgumentSignature, CoreError, CoreErrorKind, CoreResult, InvocationRecord, OperatorFilter,
};

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum RecordOutcome {
    Recorded,
    Duplicate,
    Filtered,
}

/// Distinct tunable-operator invocations observed during one tracing session.
#[derive(Default)]
pub struct InvocationLedger {
    state: Mutex<LedgerState>,
}

#[derive(Default)]
struct LedgerState {
    filter: Option<OperatorFilter>,
    seen: HashSet<InvocationRecord>,
    ordered: Vec<InvocationRecord>,
}

static GLOBAL_LEDGER: OnceLock<Arc<InvocationLedger>> = OnceLock::new();

impl InvocationLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide ledger used by `TaskExtractor::new`.
    pub fn global() -> Arc<InvocationLedger> {
        GLOBAL_LEDGER
            .get_or_init(|| Arc::new(InvocationLedger::new()))
            .clone()
    }

    pub fn reset(&self, filter: Option<OperatorFilter>) -> CoreResult<()> {
        let mut state = self.lock_state()?;
        state.seen.clear();
        state.ordered.clear();
        state.filter = filter;
        Ok(())
    }

    pub fn record(
        &self,
        operator: &str,
        signature: &ArgumentSignature,
    ) -> CoreResult<RecordOutcome> {
        let mut state = self.lock_state()?;
        if let Some(filter) = &state.filter
            && !filter.accepts(operator)
        {
            return Ok(RecordOutcome::Filtered);
        }

        let record = InvocationRecord::new(operator, signature.clone());
        if state.seen.contains(&record) {
            return Ok(RecordOutcome::Duplicate);
        }

        tracing::debug!(operator, signature = %signature, "recorded tunable invocation");
        state.seen.insert(record.clone());
        state.ordered.push(record);
        Ok(RecordOutcome::Recorded)
    }

    /// Distinct records in first-seen order. The ledger keeps its contents.
    pub fn drain(&self) -> CoreResult<Vec<InvocationRecord>> {
        Ok(self.lock_state()?.ordered.clone())
    }

    pub fn accepts(&self, operator: &str) -> CoreResult<bool> {
        let state = self.lock_state()?;
        Ok(state
            .filter
            .as_ref()
            .is_none_or(|filter| filter.accepts(operator)))
    }

    pub fn len(&self) -> CoreResult<usize> {
        Ok(self.lock_state()?.ordered.len())
    }

    pub fn is_empty(&self) -> CoreResult<bool> {
        Ok(self.len()? == 0)
    }

    fn lock_state(&self) -> CoreResult<MutexGuard<'_, LedgerState>> {
        self.state.lock().map_err(|_| CoreError {
            operator: None,
            program: None,
            kind: CoreErrorKind::Internal,
            message: "invocation ledger mutex poisoned".to_string(),
        })
    }
}
