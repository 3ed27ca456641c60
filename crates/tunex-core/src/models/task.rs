use serde::{Deserialize, Serialize};

use crate::models::{ArgumentSignature, CoreError, CoreErrorKind, CoreResult, Target};

/// Input handed to a `TaskFactory` for one distinct invocation.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TaskRequest<'a> {
    pub operator: &'a str,
    pub signature: &'a ArgumentSignature,
    pub target: &'a Target,
    pub template_key: Option<&'a str>,
}

#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Task {
    pub name: String,
    pub args: ArgumentSignature,
    pub target: Target,
    pub template_key: Option<String>,
}

impl Task {
    pub fn from_request(request: &TaskRequest<'_>) -> Self {
        Self {
            name: request.operator.to_string(),
            args: request.signature.clone(),
            target: request.target.clone(),
            template_key: request.template_key.map(str::to_string),
        }
    }

    /// Canonical JSON form of `(name, args)`, the key tuning logs are indexed by.
    pub fn workload_key(&self) -> CoreResult<String> {
        serde_json::to_string(&(&self.name, &self.args)).map_err(|error| CoreError {
            operator: Some(self.name.clone()),
            program: None,
            kind: CoreErrorKind::Internal,
            message: format!("failed to serialize workload key: {error}"),
        })
    }
}
