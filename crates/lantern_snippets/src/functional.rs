//! Functions as values: mapping with callbacks, partial application and
//! immediately invoked expressions.

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
        FnSnippet::new("mapForEach", map_for_each_demo)
            .with_topic(Topic::Functional)
            .with_summary("a generic map driven by plain and partially applied callbacks"),
    )?;
    runner.register(
        FnSnippet::new("iife", iife)
            .with_topic(Topic::Functional)
            .with_summary("function expressions invoked where they are defined"),
    )?;
    Ok(())
}

/// Apply `f` to every element, collecting the results
fn map_for_each<T, U>(items: &[T], f: impl Fn(&T) -> U) -> Vec<U> {
    let mut mapped = Vec::with_capacity(items.len());
    for item in items {
        mapped.push(f(item));
    }
    mapped
}

fn check_past_limit(limiter: f64, item: &f64) -> bool {
    *item > limiter
}

fn check_past_limit_simplified(limiter: f64) -> impl Fn(&f64) -> bool {
    move |item: &f64| check_past_limit(limiter, item)
}

fn render<T: Copy + Into<Value>>(items: &[T]) -> String {
    Value::Array(items.iter().map(|item| (*item).into()).collect()).to_string()
}

fn map_for_each_demo(ctx: &mut SnippetContext) -> SnippetResult {
    let arr1: [f64; 3] = [1.0, 2.0, 3.0];
    ctx.emit(render(&arr1));

    let arr2 = map_for_each(&arr1, |item| item * 2.0);
    ctx.emit(render(&arr2));

    let arr3 = map_for_each(&arr1, |item| *item > 2.0);
    ctx.emit(render(&arr3));

    let arr4 = map_for_each(&arr1, |item| check_past_limit(1.0, item));
    ctx.emit(render(&arr4));

    let arr5 = map_for_each(&arr1, check_past_limit_simplified(1.0));
    ctx.emit(render(&arr5));
    Ok(())
}

const VADER_QUOTE: &str = "The circle is now complete. When I left you, I was but the learner. Now I am the master.";
const DENT_QUOTE: &str =
    "You either die a hero or you live long enough to see yourself become the villain.";

fn iife(ctx: &mut SnippetContext) -> SnippetResult {
    let darth_vader = (|quote: &str| format!("Darth Vader said: {}", quote))(VADER_QUOTE);
    ctx.emit(darth_vader);

    (|ctx: &mut SnippetContext, quote: &str| {
        ctx.emit("IIFE anonymous function!");
        ctx.emit(quote);
    })(ctx, DENT_QUOTE);

    (|ctx: &mut SnippetContext, a: i64, b: i64| {
        ctx.emit(format!("Result is -> {}", a * b));
    })(ctx, 5, 7);
    Ok(())
}
