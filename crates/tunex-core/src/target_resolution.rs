use crate::models::{CoreError, CoreErrorKind, CoreResult, Target, TargetPair};

pub trait TargetResolver: Send + Sync {
    fn canonicalize(&self, target: &Target, host: Option<&Target>) -> CoreResult<TargetPair>;
}

/// Merges an explicit host into the target; otherwise keeps the host the
/// target already carries.
pub struct CanonicalTargetResolver;

impl TargetResolver for CanonicalTargetResolver {
    fn canonicalize(&self, target: &Target, host: Option<&Target>) -> CoreResult<TargetPair> {
        if host.is_some_and(|host| host.host.is_some()) {
            return Err(CoreError {
                operator: None,
                program: None,
                kind: CoreErrorKind::TargetResolution,
                message: format!("host target for '{target}' must not carry its own host"),
            });
        }

        let mut merged = target.clone();
        if let Some(host) = host {
            merged.host = Some(Box::new(host.clone()));
        }
        let host = merged.host.as_deref().cloned();

        Ok(TargetPair {
            target: merged,
            host,
        })
    }
}
