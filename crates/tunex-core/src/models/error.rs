use thiserror::Error;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum CoreErrorKind {
    AlreadyTracing,
    LoweringFailure,
    InvalidShape,
    InvalidInput,
    TargetResolution,
    ConstructionFailure,
    Timeout,
    Internal,
}

#[derive(Clone, Debug, Eq, PartialEq, Error)]
#[error("{kind:?}: {message}")]
pub struct CoreError {
    pub operator: Option<String>,
    /// Index of the program within the batch that produced the error.
    pub program: Option<usize>,
    pub kind: CoreErrorKind,
    pub message: String,
}

pub type CoreResult<T> = Result<T, CoreError>;

impl CoreError {
    pub fn new(kind: CoreErrorKind, message: impl Into<String>) -> Self {
        Self {
            operator: None,
            program: None,
            kind,
            message: message.into(),
        }
    }

    pub fn invalid_shape(operator: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            operator: Some(operator.into()),
            program: None,
            kind: CoreErrorKind::InvalidShape,
            message: message.into(),
        }
    }

    pub fn is_recoverable_shape_error(&self) -> bool {
        self.kind == CoreErrorKind::InvalidShape
    }
}
