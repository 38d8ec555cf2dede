use std::borrow::Cow;

/// Errors raised while registering or dispatching tools.
///
/// Schema compilation itself never fails; everything here comes from the
/// dispatch side.
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    #[error("Tool function '{name}' not found")]
    FunctionNotFound { name: Cow<'static, str> },

    #[error("Tool function '{name}' is already registered")]
    AlreadyRegistered { name: Cow<'static, str> },

    #[error("Tool function '{name}' cannot take {input}: arguments must be a record")]
    UnsupportedInput {
        name: Cow<'static, str>,
        input: String,
    },

    #[error("Deserialization error: {0}")]
    Deserialize(#[from] DeserializationError),

    #[error("JSON serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Runtime error: {0}")]
    Runtime(String),
}

impl ToolError {
    pub(crate) fn not_found(name: impl Into<String>) -> Self {
        ToolError::FunctionNotFound {
            name: Cow::Owned(name.into()),
        }
    }
}

/// Tool arguments that did not match the function's parameters.
#[derive(Debug, thiserror::Error)]
#[error("Failed to deserialize arguments: {source}")]
pub struct DeserializationError {
    #[source]
    pub source: serde_json::Error,
}

impl From<serde_json::Error> for DeserializationError {
    fn from(err: serde_json::Error) -> Self {
        DeserializationError { source: err }
    }
}
