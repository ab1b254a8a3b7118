use thiserror::Error;

use crate::wizard::provider::ParamType;

/// Why a provider or operation could not be registered with the wizard.
///
/// These never abort the process: the offending provider is logged and left
/// out of the registry.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum RegistrationError {
    #[error("provider `{0}` exposes no operations")]
    NoOperations(String),
    #[error("operation `{0}` has no handler")]
    MissingHandler(String),
    #[error("operation `{operation}` declares parameter `{parameter}` more than once")]
    DuplicateParameter { operation: String, parameter: String },
    #[error("`{parameter}` is not defined in `{operation}` signature")]
    UnknownParameter { operation: String, parameter: String },
    #[error("default for `{parameter}` in `{operation}` is not a {expected}")]
    DefaultTypeMismatch {
        operation: String,
        parameter: String,
        expected: ParamType,
    },
    #[error("provider `{provider}` declares operation `{operation}` more than once")]
    DuplicateOperation { provider: String, operation: String },
    #[error("provider `{provider}` curates unknown operation `{operation}`")]
    UnknownCuratedOperation { provider: String, operation: String },
}

/// Raw console text that could not be turned into a selection or a value.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum InputValidationError {
    #[error("{0} is not an option")]
    UnknownSelection(String),
    #[error("expected {expected}, got `{raw}`")]
    Parse { expected: ParamType, raw: String },
    #[error("a value is required for `{0}`")]
    Required(String),
}

/// Error returned by an operation handler.
#[derive(Debug, Error)]
pub enum OperationError {
    #[error("missing argument `{0}`")]
    MissingArgument(String),
    #[error("argument `{name}` is not a {expected}")]
    ArgumentType { name: String, expected: ParamType },
    #[error("{0}")]
    Failed(String),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl OperationError {
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed(message.into())
    }
}

/// Errors that end a wizard session.
#[derive(Debug, Error)]
pub enum WizardError {
    #[error("navigation consistency violated: {0}")]
    NavigationConsistency(String),
    #[error("console i/o failed: {0}")]
    Console(#[from] std::io::Error),
}
