//! Closures: captured values versus shared bindings.

use lantern_core::{RegistryError, SnippetResult, Topic};
use lantern_runtime::{FnSnippet, Runner, SnippetContext};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// Delay used by the loop demonstrations
const LOOP_DELAY_MS: u64 = 100;

/// Iterations of the loop demonstrations
const LOOP_COUNT: i32 = 3;

/// Register this module's snippets
///
/// # Errors
///
/// Returns error if a name is already taken
pub fn register(runner: &mut Runner) -> Result<(), RegistryError> {
    runner.register(
        FnSnippet::new("closureCounter", closure_counter)
            .with_topic(Topic::Closures)
            .with_summary("each deferred callback keeps its own copy of the loop counter"),
    )?;
    runner.register(
        FnSnippet::new("closureNaive", closure_naive)
            .with_topic(Topic::Closures)
            .with_summary("callbacks sharing one loop binding all see its final value"),
    )?;
    runner.register(
        FnSnippet::new("closureScope", closure_scope)
            .with_topic(Topic::Closures)
            .with_summary("a returned function keeps its parameters but reads globals live"),
    )?;
    runner.register(
        FnSnippet::new("functionFactory", function_factory)
            .with_topic(Topic::Closures)
            .with_summary("functions built from a captured language setting"),
    )?;
    Ok(())
}

/// Capture `value` by copy so the callback is independent of the loop.
fn preserve_value(value: i32) -> impl FnOnce(&mut SnippetContext) -> SnippetResult {
    move |ctx: &mut SnippetContext| {
        ctx.emit(value.to_string());
        Ok(())
    }
}

fn closure_counter(ctx: &mut SnippetContext) -> SnippetResult {
    for i in 0..LOOP_COUNT {
        ctx.set_timeout(LOOP_DELAY_MS, preserve_value(i));
    }
    Ok(())
}

fn closure_naive(ctx: &mut SnippetContext) -> SnippetResult {
    // One binding for the whole loop, like a function-scoped counter.
    let i = Rc::new(Cell::new(0));
    while i.get() < LOOP_COUNT {
        let shared = Rc::clone(&i);
        ctx.set_timeout(LOOP_DELAY_MS, move |ctx| {
            ctx.emit(shared.get().to_string());
            Ok(())
        });
        i.set(i.get() + 1);
    }
    Ok(())
}

fn say_hello(
    subject: &Rc<RefCell<String>>,
    name: String,
) -> impl Fn(&mut SnippetContext, &str) {
    let verify_scope = "This is a scope test!";
    *subject.borrow_mut() = "Vegetta".to_string();

    let subject = Rc::clone(subject);
    move |ctx: &mut SnippetContext, salutation: &str| {
        ctx.emit(verify_scope);
        ctx.emit(subject.borrow().clone());
        ctx.emit(format!("{} {}!", salutation, name));
    }
}

fn closure_scope(ctx: &mut SnippetContext) -> SnippetResult {
    let hello_subject = Rc::new(RefCell::new("World".to_string()));

    let initial = hello_subject.borrow().clone();
    let say_aloha = say_hello(&hello_subject, initial);

    *hello_subject.borrow_mut() = "Trunks".to_string();
    say_aloha(ctx, "Aloha");
    Ok(())
}

const SUPPORTED_LANGUAGES: [&str; 4] = ["en", "es", "de", "it"];

type Greeter = Box<dyn Fn(&mut SnippetContext, &str, &str)>;

fn make_greeting(language: Option<&'static str>) -> Greeter {
    let Some(language) = language else {
        return Box::new(|ctx: &mut SnippetContext, _: &str, _: &str| {
            ctx.emit("ERROR: You must specified a supported language.");
        });
    };
    if !SUPPORTED_LANGUAGES.contains(&language) {
        return Box::new(|ctx: &mut SnippetContext, _: &str, _: &str| {
            ctx.emit("ERROR: Unsupported language.");
        });
    }

    Box::new(move |ctx: &mut SnippetContext, firstname: &str, lastname: &str| match language {
        "en" => ctx.emit(format!("Hello {} {}", firstname, lastname)),
        "es" => ctx.emit(format!("Hola {} {}", firstname, lastname)),
        _ => {}
    })
}

fn function_factory(ctx: &mut SnippetContext) -> SnippetResult {
    let greeters = [
        make_greeting(Some("en")),
        make_greeting(Some("es")),
        make_greeting(Some("ru")),
        make_greeting(None),
    ];
    for greet in &greeters {
        greet(ctx, "Darwing", "Jenkins");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use lantern_log::Origin;
    use lantern_runtime::RunnerConfig;

    fn runner() -> Runner {
        let mut runner = Runner::new(RunnerConfig::default()).unwrap();
        register(&mut runner).unwrap();
        runner
    }

    #[tokio::test(start_paused = true)]
    async fn test_closure_counter_preserves_each_value() {
        let result = runner().run_one("closureCounter").await.unwrap();
        assert!(result.succeeded());
        assert_eq!(result.texts(), vec!["0", "1", "2"]);
        assert!(result.lines().iter().all(|line| line.origin() == Origin::Deferred));
        assert!(result.lines().iter().all(|line| line.at().as_millis() == LOOP_DELAY_MS));
    }

    #[tokio::test(start_paused = true)]
    async fn test_closure_naive_sees_final_value() {
        let result = runner().run_one("closureNaive").await.unwrap();
        assert!(result.succeeded());
        assert_eq!(result.texts(), vec!["3", "3", "3"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_closure_scope() {
        let result = runner().run_one("closureScope").await.unwrap();
        assert_eq!(
            result.texts(),
            vec!["This is a scope test!", "Trunks", "Aloha World!"]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_function_factory() {
        let result = runner().run_one("functionFactory").await.unwrap();
        assert_eq!(
            result.texts(),
            vec![
                "Hello Darwing Jenkins",
                "Hola Darwing Jenkins",
                "ERROR: Unsupported language.",
                "ERROR: You must specified a supported language.",
            ]
        );
    }

    #[test]
    fn test_preserve_value_is_independent() {
        let mut ctx = SnippetContext::new();
        let first = preserve_value(7);
        let second = preserve_value(9);
        second(&mut ctx).unwrap();
        first(&mut ctx).unwrap();
        assert_eq!(ctx.sink().lines().collect::<Vec<_>>(), vec!["9", "7"]);
    }
}
