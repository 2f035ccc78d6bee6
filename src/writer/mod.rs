pub mod config;
pub mod state;

pub use config::ConfigWriter;
pub use state::{STATE_VERSION, StateWriter};

use std::fmt;

use crate::export::error::{ExportError, ExportResult};

/// Identity of one resource within a synthesis run
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResourceKey {
    pub resource_type: String,
    pub name: String,
}

impl ResourceKey {
    pub fn new(resource_type: &str, name: &str) -> Self {
        Self {
            resource_type: resource_type.to_string(),
            name: name.to_string(),
        }
    }

    /// Parse a `type.name` key. Any other shape is invalid.
    pub fn parse(key: &str) -> ExportResult<Self> {
        let parts: Vec<&str> = key.split('.').collect();

        if parts.len() != 2 || parts.iter().any(|part| part.is_empty()) {
            return Err(ExportError::InvalidKey(key.to_string()));
        }

        Ok(Self::new(parts[0], parts[1]))
    }
}

impl fmt::Display for ResourceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.resource_type, self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_key() {
        let key = ResourceKey::parse("aws_instance.web").unwrap();

        assert_eq!(key.resource_type, "aws_instance");
        assert_eq!(key.name, "web");
        assert_eq!(key.to_string(), "aws_instance.web");
    }

    #[test]
    fn test_parse_rejects_malformed_keys() {
        for key in ["", "a", "a.b.c", "a.", ".b", "."] {
            assert!(
                matches!(ResourceKey::parse(key), Err(ExportError::InvalidKey(_))),
                "expected invalid key for {:?}",
                key
            );
        }
    }
}
