//! Loose coercion and `||` defaults.

use crate::value::Value;
use lantern_core::{RegistryError, SnippetResult, Topic};
use lantern_runtime::{FnSnippet, Runner, SnippetContext};

/// Register this module's snippets
///
/// # Errors
///
/// Returns error if a name is already taken
pub fn register(runner: &mut Runner) -> Result<(), RegistryError> {
    runner.register(
        FnSnippet::new("coercionDefaults", coercion_defaults)
            .with_topic(Topic::Coercion)
            .with_summary("mixed-type addition, truthiness and default parameters via ||"),
    )
}

fn greet(ctx: &mut SnippetContext, name: Option<&str>) {
    let name = name
        .map_or(Value::Undefined, Value::from)
        .or(Value::from("<Your name here>"));
    ctx.emit(format!("Hello {}", name));
}

fn coercion_defaults(ctx: &mut SnippetContext) -> SnippetResult {
    let result = Value::from(1.0).add(&Value::from("2"));
    tracing::trace!(%result, "number plus text");

    let is_ok = Value::Undefined;
    if is_ok.to_boolean() {
        ctx.emit("isOK has value");
    } else {
        ctx.emit("isOK is undefined");
    }

    // Explicit conversions, evaluated and discarded.
    let forced = [
        Value::from(Value::from("Hello").to_boolean()),
        Value::Number(Value::from("haha").to_number()),
        Value::from(Value::Undefined.to_text().as_str()),
    ];
    tracing::trace!(?forced, "explicit conversions");

    greet(ctx, Some("Darwing"));
    greet(ctx, None);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use lantern_runtime::RunnerConfig;

    #[tokio::test(start_paused = true)]
    async fn test_coercion_defaults() {
        let mut runner = Runner::new(RunnerConfig::default()).unwrap();
        register(&mut runner).unwrap();

        let result = runner.run_one("coercionDefaults").await.unwrap();
        assert!(result.succeeded());
        assert_eq!(
            result.texts(),
            vec!["isOK is undefined", "Hello Darwing", "Hello <Your name here>"]
        );
    }

    #[test]
    fn test_explicit_conversions_are_silent_but_correct() {
        assert_eq!(Value::from(1.0).add(&Value::from("2")).to_string(), "12");
        assert!(Value::from("Hello").to_boolean());
        assert!(Value::from("haha").to_number().is_nan());
        assert_eq!(Value::Undefined.to_text(), "undefined");
    }

    #[test]
    fn test_empty_name_takes_default() {
        let mut ctx = SnippetContext::new();
        greet(&mut ctx, Some(""));
        assert_eq!(
            ctx.sink().lines().collect::<Vec<_>>(),
            vec!["Hello <Your name here>"]
        );
    }
}
