use std::cell::Cell;
use std::marker::PhantomData;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};

use crate::ledger::{InvocationLedger, RecordOutcome};
use crate::models::{ArgumentSignature, CoreError, CoreErrorKind, CoreResult};

/// Receives every tunable-operator dispatch while an `InterceptionScope` is active.
pub trait DispatchHook: Send + Sync {
    fn on_dispatch(
        &self,
        operator: &str,
        signature: &ArgumentSignature,
    ) -> CoreResult<DispatchDecision>;
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum DispatchDecision {
    /// The call was observed for tracing; the pipeline may skip scheduling it.
    Traced,
    /// Dispatch normally.
    PassThrough,
}

impl DispatchHook for InvocationLedger {
    fn on_dispatch(
        &self,
        operator: &str,
        signature: &ArgumentSignature,
    ) -> CoreResult<DispatchDecision> {
        Ok(match self.record(operator, signature)? {
            RecordOutcome::Recorded | RecordOutcome::Duplicate => DispatchDecision::Traced,
            RecordOutcome::Filtered => DispatchDecision::PassThrough,
        })
    }
}

static ACTIVE_HOOK: RwLock<Option<Arc<dyn DispatchHook>>> = RwLock::new(None);
static TRACING_SESSION: Mutex<()> = Mutex::new(());

thread_local! {
    static IN_LOWERING_PASS: Cell<bool> = const { Cell::new(false) };
}

/// Whether the current thread is running a traced lowering pass.
pub fn in_lowering_pass() -> bool {
    IN_LOWERING_PASS.with(Cell::get)
}

pub(crate) fn with_lowering_pass<R>(operation: impl FnOnce() -> R) -> R {
    IN_LOWERING_PASS.with(|slot| {
        let previous = slot.replace(true);
        let result = operation();
        slot.set(previous);
        result
    })
}

/// Entry point for lowering pipelines: route a tunable dispatch through the
/// installed hook, if any. Safe to call from any thread.
pub fn dispatch(operator: &str, signature: &ArgumentSignature) -> CoreResult<DispatchDecision> {
    let hook = ACTIVE_HOOK
        .read()
        .map_err(|_| poisoned_hook_error())?
        .clone();
    match hook {
        Some(hook) => hook.on_dispatch(operator, signature),
        None => Ok(DispatchDecision::PassThrough),
    }
}

pub fn is_tracing() -> bool {
    ACTIVE_HOOK
        .read()
        .map(|slot| slot.is_some())
        .unwrap_or(false)
}

/// Serializes whole tracing sessions across threads. A panic in a previous
/// holder does not block later sessions.
pub fn lock_tracing_session() -> MutexGuard<'static, ()> {
    TRACING_SESSION
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
}

/// Installs a dispatch hook for its lifetime. Dropping the scope uninstalls
/// the hook on every exit path, unwinding included.
#[must_use = "the hook is removed as soon as the scope is dropped"]
pub struct InterceptionScope {
    _single_thread: PhantomData<*const ()>,
}

impl InterceptionScope {
    pub fn enter(hook: Arc<dyn DispatchHook>) -> CoreResult<Self> {
        let mut slot = ACTIVE_HOOK.write().map_err(|_| poisoned_hook_error())?;
        if slot.is_some() {
            return Err(CoreError {
                operator: None,
                program: None,
                kind: CoreErrorKind::AlreadyTracing,
                message: "an interception scope is already active".to_string(),
            });
        }
        *slot = Some(hook);
        tracing::debug!("interception scope entered");

        Ok(Self {
            _single_thread: PhantomData,
        })
    }
}

impl Drop for InterceptionScope {
    fn drop(&mut self) {
        let mut slot = ACTIVE_HOOK
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        *slot = None;
        tracing::debug!("interception scope exited");
    }
}

fn poisoned_hook_error() -> CoreError {
    CoreError {
        operator: None,
        program: None,
        kind: CoreErrorKind::Internal,
        message: "dispatch hook lock poisoned".to_string(),
    }
}
