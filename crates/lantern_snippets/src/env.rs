//! Lexical environments for the scope and hoisting demonstrations.
//!
//! An environment owns its own bindings and borrows its outer
//! environment. Lookups walk outward until a binding is found; the chain
//! is fixed where the environment is created, not where it is used.

use indexmap::IndexMap;
use lantern_core::{SnippetError, SnippetResult};
use lantern_runtime::SnippetContext;

/// Function stored in an environment. Receives the environment that
/// declares it, never the one it is invoked from.
pub type NativeFn = fn(&mut SnippetContext, &Environment<'_>) -> SnippetResult;

/// Value held by a binding
#[derive(Clone)]
pub enum Binding {
    /// Declared during the creation phase, not yet assigned
    Undefined,
    /// Assigned text value
    Value(String),
    /// Function declaration
    Function(NativeFn),
}

impl std::fmt::Debug for Binding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Undefined => write!(f, "Undefined"),
            Self::Value(value) => f.debug_tuple("Value").field(value).finish(),
            Self::Function(_) => write!(f, "Function"),
        }
    }
}

impl std::fmt::Display for Binding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Undefined => write!(f, "undefined"),
            Self::Value(value) => f.write_str(value),
            Self::Function(_) => write!(f, "[Function]"),
        }
    }
}

/// One frame of the scope chain
#[derive(Debug)]
pub struct Environment<'a> {
    label: &'static str,
    bindings: IndexMap<String, Binding>,
    outer: Option<&'a Environment<'a>>,
}

impl<'a> Environment<'a> {
    /// The outermost environment
    #[must_use]
    pub fn global() -> Self {
        Self {
            label: "global",
            bindings: IndexMap::new(),
            outer: None,
        }
    }

    /// An environment whose outer reference is `outer`
    #[must_use]
    pub fn nested(label: &'static str, outer: &'a Environment<'a>) -> Self {
        Self {
            label,
            bindings: IndexMap::new(),
            outer: Some(outer),
        }
    }

    /// Name of this frame
    #[must_use]
    pub const fn label(&self) -> &'static str {
        self.label
    }

    /// Creation phase: reserve a binding without a value
    pub fn hoist(&mut self, name: &str) {
        self.bindings
            .entry(name.to_string())
            .or_insert(Binding::Undefined);
    }

    /// Creation phase: declare a function in full
    pub fn declare_fn(&mut self, name: &str, body: NativeFn) {
        self.bindings.insert(name.to_string(), Binding::Function(body));
    }

    /// Execution phase: assign a value in this frame
    pub fn assign(&mut self, name: &str, value: impl Into<String>) {
        self.bindings
            .insert(name.to_string(), Binding::Value(value.into()));
    }

    /// Walk the chain for `name`
    ///
    /// # Errors
    ///
    /// Returns [`SnippetError::Unbound`] if no frame declares it
    pub fn resolve(&self, name: &str) -> Result<&Binding, SnippetError> {
        self.lookup(name)
            .map(|(binding, _)| binding)
            .ok_or_else(|| SnippetError::unbound(name))
    }

    /// Label of the frame that owns `name`, if any
    #[must_use]
    pub fn owner_of(&self, name: &str) -> Option<&'static str> {
        self.lookup(name).map(|(_, frame)| frame.label)
    }

    /// Call a function binding with the frame that declares it
    ///
    /// # Errors
    ///
    /// Returns [`SnippetError::Unbound`] for unknown names and
    /// [`SnippetError::NotCallable`] for non-function bindings.
    pub fn call(&self, ctx: &mut SnippetContext, name: &str) -> SnippetResult {
        match self.lookup(name) {
            Some((Binding::Function(body), owner)) => body(ctx, owner),
            Some(_) => Err(SnippetError::not_callable(name)),
            None => Err(SnippetError::unbound(name)),
        }
    }

    fn lookup(&self, name: &str) -> Option<(&Binding, &Environment<'a>)> {
        let mut frame = Some(self);
        while let Some(env) = frame {
            if let Some(binding) = env.bindings.get(name) {
                return Some((binding, env));
            }
            frame = env.outer;
        }
        None
    }
}
