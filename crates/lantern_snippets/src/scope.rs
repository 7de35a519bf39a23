//! Scope chain resolution.

use crate::env::Environment;
use lantern_core::{RegistryError, SnippetResult, Topic};
use lantern_runtime::{FnSnippet, Runner, SnippetContext};

/// Register this module's snippets
///
/// # Errors
///
/// Returns error if a name is already taken
pub fn register(runner: &mut Runner) -> Result<(), RegistryError> {
    runner.register(
        FnSnippet::new("scopeChain", scope_chain)
            .with_topic(Topic::Scope)
            .with_summary("lookups walk outward through lexically enclosing frames"),
    )
}

fn func_c(ctx: &mut SnippetContext, env: &Environment<'_>) -> SnippetResult {
    ctx.emit("Hello from funcC()!");
    env.call(ctx, "funcD")
}

fn func_d(ctx: &mut SnippetContext, _env: &Environment<'_>) -> SnippetResult {
    ctx.emit("Hello from funcD()!");
    Ok(())
}

fn scope_chain(ctx: &mut SnippetContext) -> SnippetResult {
    let mut global = Environment::global();
    global.declare_fn("funcD", func_d);
    global.assign("myVar", "1");

    let mut func_a = Environment::nested("funcA", &global);
    func_a.declare_fn("funcC", func_c);

    let func_b = Environment::nested("funcB", &func_a);
    ctx.emit(func_b.resolve("myVar")?.to_string());
    tracing::trace!(owner = ?func_b.owner_of("myVar"), "resolved myVar");

    // funcC lives in funcA, funcD in global; both reachable from funcB.
    func_b.call(ctx, "funcC")
}

#[cfg(test)]
mod tests {
    use super::*;
    use lantern_runtime::RunnerConfig;

    #[tokio::test(start_paused = true)]
    async fn test_scope_chain() {
        let mut runner = Runner::new(RunnerConfig::default()).unwrap();
        register(&mut runner).unwrap();

        let result = runner.run_one("scopeChain").await.unwrap();
        assert!(result.succeeded());
        assert_eq!(
            result.texts(),
            vec!["1", "Hello from funcC()!", "Hello from funcD()!"]
        );
    }
}
