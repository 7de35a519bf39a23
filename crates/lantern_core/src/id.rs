//! Identifiers for LANTERN entities.

use crate::error::RegistryError;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Run identifier - identifies one invocation of the runner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RunId(Uuid);

impl RunId {
    /// Create a new random RunId
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create from UUID bytes
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(Uuid::from_bytes(bytes))
    }

    /// Get as UUID
    #[must_use]
    pub const fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RunId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "run_{}", self.0)
    }
}

/// Validated snippet name.
///
/// Names are the registry key, so they must be non-empty and free of
/// whitespace to stay addressable from the command line.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SnippetName(String);

impl SnippetName {
    /// Validate and wrap a name
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::InvalidName`] for empty names or names
    /// containing whitespace.
    pub fn new(name: impl Into<String>) -> Result<Self, RegistryError> {
        let name = name.into();
        if name.is_empty() {
            return Err(RegistryError::InvalidName {
                name,
                reason: "name is empty".to_string(),
            });
        }
        if name.chars().any(char::is_whitespace) {
            return Err(RegistryError::InvalidName {
                name,
                reason: "name contains whitespace".to_string(),
            });
        }
        Ok(Self(name))
    }

    /// Get the name as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for SnippetName {
    type Error = RegistryError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<SnippetName> for String {
    fn from(value: SnippetName) -> Self {
        value.0
    }
}

impl AsRef<str> for SnippetName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SnippetName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_id_unique() {
        assert_ne!(RunId::new(), RunId::new());
    }

    #[test]
    fn test_run_id_display() {
        let id = RunId::from_bytes([0; 16]);
        assert_eq!(
            format!("{}", id),
            "run_00000000-0000-0000-0000-000000000000"
        );
    }

    #[test]
    fn test_snippet_name_valid() {
        let name = SnippetName::new("closureCounter").unwrap();
        assert_eq!(name.as_str(), "closureCounter");
        assert_eq!(format!("{}", name), "closureCounter");
    }

    #[test]
    fn test_snippet_name_rejects_empty() {
        assert!(matches!(
            SnippetName::new(""),
            Err(RegistryError::InvalidName { .. })
        ));
    }

    #[test]
    fn test_snippet_name_rejects_whitespace() {
        assert!(SnippetName::new("closure counter").is_err());
        assert!(SnippetName::new("tab\there").is_err());
    }

    #[test]
    fn test_snippet_name_serde() {
        let name: SnippetName = serde_json::from_str("\"faulty\"").unwrap();
        assert_eq!(name.as_str(), "faulty");
        assert!(serde_json::from_str::<SnippetName>("\"\"").is_err());
    }
}
