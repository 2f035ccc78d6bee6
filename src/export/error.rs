use std::fmt;

/// Error types for export operations
#[derive(Debug)]
pub enum ExportError {
    /// Resource key does not split into `type.name`
    InvalidKey(String),

    /// A nil value was supplied where one is required
    RequiredValue(String),

    /// Resource key already holds a value
    AlreadyExists(String),

    /// Resource could not be read from the provider (soft skip)
    NotReadable {
        resource_type: String,
        resource_id: String,
    },

    /// Resource does not match the requested tag filter (soft skip)
    TagMismatch {
        resource_type: String,
        resource_id: String,
    },

    /// Requested resource type is not supported by the provider
    UnsupportedResourceType { resource_type: String },

    /// Invalid input or parameter
    InvalidInput(String),

    /// Serialization error
    Serialization(String),

    /// General I/O error
    Io(std::io::Error),
}

impl ExportError {
    /// Whether this error is a per-resource soft skip rather than a
    /// run-aborting failure. Soft skips drop the resource from output
    /// and let the run continue.
    pub fn is_soft_skip(&self) -> bool {
        matches!(
            self,
            ExportError::NotReadable { .. } | ExportError::TagMismatch { .. }
        )
    }
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportError::InvalidKey(key) => {
                write!(f, "Invalid resource key '{}': expected 'type.name'", key)
            }
            ExportError::RequiredValue(key) => {
                write!(f, "A value is required for '{}'", key)
            }
            ExportError::AlreadyExists(key) => {
                write!(f, "Resource key '{}' already exists", key)
            }
            ExportError::NotReadable {
                resource_type,
                resource_id,
            } => {
                write!(
                    f,
                    "Resource not readable: {} with ID '{}'",
                    resource_type, resource_id
                )
            }
            ExportError::TagMismatch {
                resource_type,
                resource_id,
            } => {
                write!(
                    f,
                    "Resource does not match tag filter: {} with ID '{}'",
                    resource_type, resource_id
                )
            }
            ExportError::UnsupportedResourceType { resource_type } => {
                write!(f, "Unsupported resource type '{}'", resource_type)
            }
            ExportError::InvalidInput(msg) => {
                write!(f, "Invalid input: {}", msg)
            }
            ExportError::Serialization(msg) => {
                write!(f, "Serialization error: {}", msg)
            }
            ExportError::Io(err) => {
                write!(f, "I/O error: {}", err)
            }
        }
    }
}

impl std::error::Error for ExportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ExportError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ExportError {
    fn from(err: std::io::Error) -> Self {
        ExportError::Io(err)
    }
}

impl From<serde_json::Error> for ExportError {
    fn from(err: serde_json::Error) -> Self {
        ExportError::Serialization(err.to_string())
    }
}

/// Result type for export operations
pub type ExportResult<T> = Result<T, ExportError>;
