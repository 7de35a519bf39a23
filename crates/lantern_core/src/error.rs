//! Core error types for LANTERN.

use serde::{Deserialize, Serialize};

/// Result type returned by snippet bodies and deferred callbacks
pub type SnippetResult = Result<(), SnippetError>;

/// Fault raised while a snippet (or one of its callbacks) is executing.
///
/// The runner catches these at the snippet boundary; they never abort a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SnippetError {
    /// A binding was read before it exists in any enclosing scope
    #[error("{binding} is not defined")]
    Unbound {
        /// Name of the missing binding
        binding: String,
    },

    /// Something that is not a function was invoked
    #[error("{target} is not a function")]
    NotCallable {
        /// Name of the value that was invoked
        target: String,
    },

    /// A value had the wrong shape for the operation
    #[error("type error: {message}")]
    Type {
        /// Description of the mismatch
        message: String,
    },

    /// Any other fault
    #[error("{message}")]
    Fault {
        /// Error message
        message: String,
    },
}

impl SnippetError {
    /// Build an [`SnippetError::Unbound`]
    #[must_use]
    pub fn unbound(binding: impl Into<String>) -> Self {
        Self::Unbound {
            binding: binding.into(),
        }
    }

    /// Build an [`SnippetError::NotCallable`]
    #[must_use]
    pub fn not_callable(target: impl Into<String>) -> Self {
        Self::NotCallable {
            target: target.into(),
        }
    }

    /// Build an [`SnippetError::Fault`]
    #[must_use]
    pub fn fault(message: impl Into<String>) -> Self {
        Self::Fault {
            message: message.into(),
        }
    }
}

/// Registry errors, surfaced directly to the caller
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    /// Two snippets share a name
    #[error("snippet already registered: {name}")]
    DuplicateName {
        /// Offending name
        name: String,
    },

    /// No snippet with this name is registered
    #[error("snippet not found: {name}")]
    NotFound {
        /// Requested name
        name: String,
    },

    /// Name rejected before registration
    #[error("invalid snippet name {name:?}: {reason}")]
    InvalidName {
        /// Rejected name
        name: String,
        /// Why it was rejected
        reason: String,
    },
}

/// Runner configuration errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// Timeout outside the accepted range
    #[error("invalid timeout {millis}ms: {reason}")]
    InvalidTimeout {
        /// Supplied value
        millis: u64,
        /// Why it was rejected
        reason: String,
    },
}
