//! LANTERN Core Types
//!
//! Pure types shared by the capture sink, the runner and the snippet
//! catalog. Nothing in this crate performs I/O.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod id;
pub mod time;
pub mod topic;

// Re-exports
pub use error::{ConfigError, RegistryError, SnippetError, SnippetResult};
pub use id::{RunId, SnippetName};
pub use time::Offset;
pub use topic::{Topic, TopicParseError};
