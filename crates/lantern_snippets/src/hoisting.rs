//! Creation phase and hoisting.
//!
//! Every demonstration here runs in two passes over an [`Environment`]:
//! first all declarations are reserved (functions in full, variables as
//! `undefined`), then statements execute top to bottom.

use crate::env::{Environment, NativeFn};
use lantern_core::{RegistryError, SnippetResult, Topic};
use lantern_runtime::{FnSnippet, Runner, SnippetContext};

/// Register this module's snippets
///
/// # Errors
///
/// Returns error if a name is already taken
pub fn register(runner: &mut Runner) -> Result<(), RegistryError> {
    runner.register(
        FnSnippet::new("globalExecutionContext", global_execution_context)
            .with_topic(Topic::Hoisting)
            .with_summary("functions are callable and variables read as undefined before their line runs"),
    )?;
    runner.register(
        FnSnippet::new("variableEnvironment", variable_environment)
            .with_topic(Topic::Hoisting)
            .with_summary("each invocation gets its own variable environment"),
    )?;
    Ok(())
}

fn my_func(ctx: &mut SnippetContext, env: &Environment<'_>) -> SnippetResult {
    let foo2 = env.resolve("foo2")?;
    ctx.emit(foo2.to_string());
    Ok(())
}

fn my_func2(ctx: &mut SnippetContext, _env: &Environment<'_>) -> SnippetResult {
    ctx.emit("Called myFunc2!");
    Ok(())
}

fn creation_phase(env: &mut Environment<'_>, vars: &[&str], fns: &[(&str, NativeFn)]) {
    for name in vars {
        env.hoist(name);
    }
    for (name, body) in fns {
        env.declare_fn(name, *body);
    }
}

fn global_execution_context(ctx: &mut SnippetContext) -> SnippetResult {
    let mut global = Environment::global();
    creation_phase(
        &mut global,
        &["foo", "foo2", "foo3"],
        &[("myFunc", my_func as NativeFn), ("myFunc2", my_func2 as NativeFn)],
    );

    global.assign("foo", "Hello World!");

    // myFunc2 is declared further down but already callable.
    global.call(ctx, "myFunc2")?;

    let foo3 = global.resolve("foo3")?.to_string();
    ctx.emit(foo3);

    global.assign("foo3", "Hello World!");

    // myFunc is declared but never invoked.
    Ok(())
}

fn variable_environment(ctx: &mut SnippetContext) -> SnippetResult {
    let mut global = Environment::global();
    creation_phase(&mut global, &["myVar"], &[]);
    global.assign("myVar", "1");
    ctx.emit(global.resolve("myVar")?.to_string());

    // a(): its own myVar, then calls b()
    {
        let mut a = Environment::nested("a", &global);
        a.hoist("myVar");
        a.assign("myVar", "2");
        ctx.emit(a.resolve("myVar")?.to_string());

        // b() sits lexically in global, so a's frame is not on its chain.
        let mut b = Environment::nested("b", &global);
        b.hoist("myVar");
        ctx.emit(b.resolve("myVar")?.to_string());
    }

    ctx.emit(global.resolve("myVar")?.to_string());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use lantern_runtime::RunnerConfig;

    async fn run(name: &str) -> Vec<String> {
        let mut runner = Runner::new(RunnerConfig::default()).unwrap();
        register(&mut runner).unwrap();
        let result = runner.run_one(name).await.unwrap();
        assert!(result.succeeded(), "{} did not succeed: {}", name, result.status());
        result.texts().into_iter().map(str::to_string).collect()
    }

    #[tokio::test(start_paused = true)]
    async fn test_global_execution_context() {
        assert_eq!(
            run("globalExecutionContext").await,
            vec!["Called myFunc2!", "undefined"]
        );
    }

    #[test]
    fn test_uncalled_function_reads_hoisted_variable() {
        let mut global = Environment::global();
        creation_phase(
            &mut global,
            &["foo2"],
            &[("myFunc", my_func as NativeFn)],
        );

        let mut ctx = SnippetContext::new();
        global.call(&mut ctx, "myFunc").unwrap();
        assert_eq!(ctx.sink().lines().collect::<Vec<_>>(), vec!["undefined"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_variable_environment() {
        assert_eq!(
            run("variableEnvironment").await,
            vec!["1", "2", "undefined", "1"]
        );
    }
}
