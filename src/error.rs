use thiserror::Error;

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for registration and document assembly.
///
/// Every variant describes a programming or configuration mistake detected at
/// start-up. None of them is transient, so callers are expected to abort
/// instead of retrying.
#[derive(Debug, Error)]
pub enum Error {
    /// Malformed registration input (missing tags or response, json and form together, ...)
    #[error("invalid operation spec: {0}")]
    InvalidSpec(String),

    /// An operation failed its structural constraints
    #[error("validation failed on `{field}`: {message}")]
    Validation { field: String, message: String },

    /// A doc reference that is not of the form `file:node`
    #[error("invalid doc reference '{reference}': {reason}")]
    InvalidReference { reference: String, reason: String },

    /// I/O or parse failure while loading a doc file
    #[error("failed to load doc file '{file}': {message}")]
    DocLoad { file: String, message: String },

    /// The referenced node does not exist in a loaded doc file
    #[error("doc file '{file}' has no entry '{node}'")]
    MissingNode { file: String, node: String },

    /// A type descriptor that cannot be turned into a schema tree
    #[error("cannot describe type `{type_name}`: {message}")]
    Schema { type_name: String, message: String },

    #[error("invalid http method '{0}'")]
    InvalidMethod(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    /// The assembled document could not be rendered for serving
    #[error("failed to render spec document: {0}")]
    Render(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub(crate) fn schema(type_name: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Schema {
            type_name: type_name.into(),
            message: message.into(),
        }
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(err: serde_yaml::Error) -> Self {
        Error::Config(format!("YAML error: {}", err))
    }
}
