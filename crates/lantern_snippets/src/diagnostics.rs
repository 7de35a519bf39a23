//! Snippets that fail on purpose, to exercise failure reporting.

use crate::env::Environment;
use lantern_core::{SnippetResult, Topic};
use lantern_runtime::{Snippet, SnippetContext};

/// Emits one line, then reads a binding that was never declared.
#[derive(Debug, Default, Clone, Copy)]
pub struct Faulty;

impl Faulty {
    /// Registry name
    pub const NAME: &'static str = "faulty";

    /// Binding the snippet tries to read
    pub const MISSING: &'static str = "notDeclaredAnywhere";
}

impl Snippet for Faulty {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn summary(&self) -> &str {
        "reads an undeclared binding after emitting a line"
    }

    fn topic(&self) -> Topic {
        Topic::Diagnostics
    }

    fn run(&self, ctx: &mut SnippetContext) -> SnippetResult {
        let global = Environment::global();
        ctx.emit("about to read an undeclared binding");
        let value = global.resolve(Self::MISSING)?;
        ctx.emit(value.to_string());
        Ok(())
    }
}
