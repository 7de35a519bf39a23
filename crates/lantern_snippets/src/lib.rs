//! LANTERN Snippets
//!
//! The demonstration catalog: each module re-expresses one runtime concept
//! (hoisting, scope chains, records, closures, receiver binding, prototype
//! delegation, coercion, higher-order functions, deferred callbacks) as
//! snippets whose transcripts match the tutorial output.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod binding;
pub mod callbacks;
pub mod closures;
pub mod coercion;
pub mod constructors;
pub mod diagnostics;
pub mod env;
pub mod functional;
pub mod functions;
pub mod hoisting;
pub mod objects;
pub mod prototypes;
pub mod scope;
pub mod value;

pub use diagnostics::Faulty;
pub use env::{Binding, Environment, NativeFn};
pub use prototypes::{ObjectRef, ProtoObject};
pub use value::Value;

use lantern_core::{ConfigError, RegistryError};
use lantern_runtime::{Runner, RunnerConfig};
use thiserror::Error;

/// Errors building a catalog runner
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Runner configuration rejected
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Registration failed
    #[error(transparent)]
    Registry(#[from] RegistryError),
}

/// Which groups of snippets to register
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CatalogOptions {
    /// Also register snippets that fail on purpose
    pub include_diagnostics: bool,
}

impl CatalogOptions {
    /// Include or leave out the failing snippets
    #[must_use]
    pub const fn with_diagnostics(mut self, include: bool) -> Self {
        self.include_diagnostics = include;
        self
    }
}

/// Register every demonstration in catalog order
///
/// # Errors
///
/// Returns error if any name is already registered on `runner`
pub fn register_all(runner: &mut Runner, options: CatalogOptions) -> Result<(), RegistryError> {
    hoisting::register(runner)?;
    scope::register(runner)?;
    objects::register(runner)?;
    functions::register(runner)?;
    closures::register(runner)?;
    binding::register(runner)?;
    prototypes::register(runner)?;
    constructors::register(runner)?;
    coercion::register(runner)?;
    functional::register(runner)?;
    if options.include_diagnostics {
        runner.register(Faulty)?;
    }
    callbacks::register(runner)?;

    tracing::debug!(snippets = runner.len(), "catalog registered");
    Ok(())
}

/// A runner holding the catalog
///
/// # Errors
///
/// Returns error if `config` is invalid
pub fn catalog(config: RunnerConfig, options: CatalogOptions) -> Result<Runner, CatalogError> {
    let mut runner = Runner::new(config)?;
    register_all(&mut runner, options)?;
    Ok(runner)
}
