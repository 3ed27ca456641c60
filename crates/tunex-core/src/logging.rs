use tracing::subscriber::{DefaultGuard, NoSubscriber};
use tracing_subscriber::EnvFilter;

/// Installs a formatting subscriber filtered by `RUST_LOG`. Does nothing if
/// a global subscriber is already set.
pub fn init() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init();
}

/// Silences `tracing` output on the current thread until dropped, then
/// restores whatever subscriber was in effect before.
#[must_use = "logging is restored as soon as the guard is dropped"]
pub struct LogSuppression {
    guard: Option<DefaultGuard>,
}

impl LogSuppression {
    pub fn new(enabled: bool) -> Self {
        Self {
            guard: enabled.then(|| tracing::subscriber::set_default(NoSubscriber::default())),
        }
    }

    pub fn is_active(&self) -> bool {
        self.guard.is_some()
    }
}
