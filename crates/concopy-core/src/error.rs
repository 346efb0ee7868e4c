use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConcopyError {
    // Extraction errors
    #[error("INVALID_FORMAT: function must have the form `(page) => {{ ... }}`")]
    InvalidFormat,

    #[error("MISSING_RETURN: function body has no `return {{ ... }}` statement")]
    MissingReturn,

    #[error("UNSUPPORTED_EXPRESSION: expression '{0}' is not a supported form")]
    UnsupportedExpression(String),

    // Dispatch errors
    #[error("UNKNOWN_TEMPLATE: unknown template function '{0}'")]
    UnknownTemplate(String),

    #[error("NO_EXECUTABLE_FUNCTION: function has neither code nor a template id")]
    NoExecutableFunction,

    #[error("EXECUTION_FAILED: failed to execute function: {0}")]
    ExecutionFailed(#[source] Box<ConcopyError>),

    // Config errors
    #[error("CONFIG_PARSE_ERROR: {0}")]
    ConfigParseError(String),

    #[error("CONFIG_INVALID_VALUE: {field}: {reason}")]
    ConfigInvalidValue { field: String, reason: String },

    // Store errors
    #[error("STORE_READ_ERROR: failed to read '{path}': {reason}")]
    StoreReadError { path: PathBuf, reason: String },

    #[error("STORE_WRITE_ERROR: failed to write '{path}': {reason}")]
    StoreWriteError { path: PathBuf, reason: String },

    #[error("FUNCTION_NOT_FOUND: function '{0}' not found")]
    FunctionNotFound(String),

    // Collaborator errors
    #[error("SHARE_DECODE_FAILED: {0}")]
    ShareDecodeFailed(String),

    #[error("PAGE_PARSE_ERROR: {0}")]
    PageParseError(String),

    // IO errors
    #[error("IO_ERROR: {0}")]
    IoError(#[from] std::io::Error),

    // Generic errors
    #[error("{0}")]
    Generic(String),
}

impl ConcopyError {
    /// Wrap an error raised below the dispatcher
    pub fn execution_failed(inner: ConcopyError) -> Self {
        ConcopyError::ExecutionFailed(Box::new(inner))
    }

    /// Stable machine-readable code for this error
    pub fn code(&self) -> &'static str {
        match self {
            ConcopyError::InvalidFormat => "INVALID_FORMAT",
            ConcopyError::MissingReturn => "MISSING_RETURN",
            ConcopyError::UnsupportedExpression(_) => "UNSUPPORTED_EXPRESSION",
            ConcopyError::UnknownTemplate(_) => "UNKNOWN_TEMPLATE",
            ConcopyError::NoExecutableFunction => "NO_EXECUTABLE_FUNCTION",
            ConcopyError::ExecutionFailed(_) => "EXECUTION_FAILED",
            ConcopyError::ConfigParseError(_) => "CONFIG_PARSE_ERROR",
            ConcopyError::ConfigInvalidValue { .. } => "CONFIG_INVALID_VALUE",
            ConcopyError::StoreReadError { .. } => "STORE_READ_ERROR",
            ConcopyError::StoreWriteError { .. } => "STORE_WRITE_ERROR",
            ConcopyError::FunctionNotFound(_) => "FUNCTION_NOT_FOUND",
            ConcopyError::ShareDecodeFailed(_) => "SHARE_DECODE_FAILED",
            ConcopyError::PageParseError(_) => "PAGE_PARSE_ERROR",
            ConcopyError::IoError(_) => "IO_ERROR",
            ConcopyError::Generic(_) => "GENERIC",
        }
    }

    /// Innermost error below any `ExecutionFailed` layers
    pub fn root_cause(&self) -> &ConcopyError {
        match self {
            ConcopyError::ExecutionFailed(inner) => inner.root_cause(),
            other => other,
        }
    }
}

impl From<serde_json::Error> for ConcopyError {
    fn from(err: serde_json::Error) -> Self {
        ConcopyError::Generic(format!("JSON error: {}", err))
    }
}

pub type Result<T> = std::result::Result<T, ConcopyError>;
