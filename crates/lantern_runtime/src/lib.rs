//! LANTERN Runtime
//!
//! Runs registered snippets strictly in sequence. Each snippet gets an
//! isolated capture sink and a cooperative deferred-callback queue; the
//! runner waits for pending callbacks up to a bounded timeout.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod result;
pub mod runner;
pub mod snippet;
pub mod timer;

pub use config::{RunnerConfig, DEFAULT_TIMEOUT_MILLIS, MAX_TIMEOUT_MILLIS};
pub use result::{RunReport, RunResult, RunStatus, RunSummary};
pub use runner::{Runner, SnippetFilter};
pub use snippet::{FnSnippet, Snippet, SnippetContext};
pub use timer::{Callback, Deferred, DeferredQueue, TimerId};
