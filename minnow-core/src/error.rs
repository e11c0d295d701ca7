use thiserror::Error;

/// Failure kinds raised by the mapping layer and the SQL builder.
///
/// Every fallible operation returns [`crate::Result`], which is an
/// `anyhow::Error` underneath. These kinds travel inside it and can be
/// recovered with `error.downcast_ref::<MinnowError>()`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MinnowError {
    /// The type cannot be mapped: missing identifier, duplicate column,
    /// missing table attribute, no parameterless constructor.
    #[error("Mapping configuration error: {0}")]
    Configuration(String),
    /// A call received an argument that violates its contract.
    #[error("Invalid argument: {0}")]
    Argument(String),
    /// Counts or types do not line up, for example parameters versus arguments.
    #[error("Shape mismatch: {0}")]
    ShapeMismatch(String),
    /// The operation is intentionally not provided by this component.
    #[error("Unsupported operation: {0}")]
    Unsupported(String),
    /// The builder is not in a state where the call is legal.
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),
    /// The identifier state of an instance contradicts its strategy.
    #[error("Identifier error: {0}")]
    Identifier(String),
    /// A single column failed to bind while materializing a row.
    #[error("Cannot bind column `{column}`: {message}")]
    Data { column: String, message: String },
}

impl MinnowError {
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    pub fn argument(message: impl Into<String>) -> Self {
        Self::Argument(message.into())
    }

    pub fn shape_mismatch(message: impl Into<String>) -> Self {
        Self::ShapeMismatch(message.into())
    }

    pub fn unsupported(message: impl Into<String>) -> Self {
        Self::Unsupported(message.into())
    }

    pub fn invalid_operation(message: impl Into<String>) -> Self {
        Self::InvalidOperation(message.into())
    }

    pub fn identifier(message: impl Into<String>) -> Self {
        Self::Identifier(message.into())
    }

    pub fn data(column: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Data {
            column: column.into(),
            message: message.into(),
        }
    }
}
