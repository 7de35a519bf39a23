//! Concept topics used to group snippets.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Runtime concept a snippet demonstrates
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Topic {
    /// Uncategorised
    #[default]
    General,
    /// Creation phase and hoisting
    Hoisting,
    /// Variable environments and the scope chain
    Scope,
    /// Closures and captured state
    Closures,
    /// Objects, member access and reference semantics
    Objects,
    /// Receiver binding: call, apply, bind
    Binding,
    /// Prototype delegation
    Prototypes,
    /// Coercion and default values
    Coercion,
    /// Functions as values
    Functional,
    /// Callback queues and timers
    Async,
    /// Fault handling demonstrations
    Diagnostics,
}

impl Topic {
    /// All topics, in display order
    pub const ALL: [Topic; 11] = [
        Topic::General,
        Topic::Hoisting,
        Topic::Scope,
        Topic::Closures,
        Topic::Objects,
        Topic::Binding,
        Topic::Prototypes,
        Topic::Coercion,
        Topic::Functional,
        Topic::Async,
        Topic::Diagnostics,
    ];

    /// Lowercase label
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::General => "general",
            Self::Hoisting => "hoisting",
            Self::Scope => "scope",
            Self::Closures => "closures",
            Self::Objects => "objects",
            Self::Binding => "binding",
            Self::Prototypes => "prototypes",
            Self::Coercion => "coercion",
            Self::Functional => "functional",
            Self::Async => "async",
            Self::Diagnostics => "diagnostics",
        }
    }
}

impl std::fmt::Display for Topic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown topic label
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown topic: {0}")]
pub struct TopicParseError(pub String);

impl FromStr for Topic {
    type Err = TopicParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|topic| topic.as_str() == wanted)
            .ok_or_else(|| TopicParseError(s.to_string()))
    }
}
