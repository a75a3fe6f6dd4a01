use std::fmt;

/// Main error type for sniff-fixture
#[derive(Debug)]
pub enum SniffError {
    /// Node address could not be parsed as a URI
    Address(url::ParseError),

    /// Options or caller-supplied configuration errors
    Config(String),

    /// JSON serialization/deserialization errors
    Serialization(serde_json::Error),
}

impl fmt::Display for SniffError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SniffError::Address(err) => write!(f, "Address error: {}", err),
            SniffError::Config(msg) => write!(f, "Configuration error: {}", msg),
            SniffError::Serialization(err) => write!(f, "Serialization error: {}", err),
        }
    }
}

impl std::error::Error for SniffError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SniffError::Address(err) => Some(err),
            SniffError::Serialization(err) => Some(err),
            SniffError::Config(_) => None,
        }
    }
}

// Convenient type alias for Results using our error type
pub type Result<T> = std::result::Result<T, SniffError>;

impl SniffError {
    /// Get the error type identifier
    pub fn error_type(&self) -> &'static str {
        match self {
            SniffError::Address(_) => "address_error",
            SniffError::Config(_) => "configuration_error",
            SniffError::Serialization(_) => "serialization_error",
        }
    }
}

// Conversions from common error types
impl From<url::ParseError> for SniffError {
    fn from(err: url::ParseError) -> Self {
        SniffError::Address(err)
    }
}

impl From<serde_json::Error> for SniffError {
    fn from(err: serde_json::Error) -> Self {
        SniffError::Serialization(err)
    }
}

#[macro_export]
macro_rules! config_error {
    ($msg:expr) => {
        $crate::error::SniffError::Config($msg.to_string())
    };
    ($fmt:expr, $($arg:tt)*) => {
        $crate::error::SniffError::Config(format!($fmt, $($arg)*))
    };
}
