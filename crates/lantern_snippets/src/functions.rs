//! Functions as first-class objects, value versus reference semantics, and
//! the implicit argument list.

use crate::prototypes::{ObjectRef, ProtoObject};
use crate::value::{format_arguments, Value};
use indexmap::IndexMap;
use lantern_core::{RegistryError, SnippetResult, Topic};
use lantern_runtime::{FnSnippet, Runner, SnippetContext};
use std::rc::Rc;

/// Register this module's snippets
///
/// # Errors
///
/// Returns error if a name is already taken
pub fn register(runner: &mut Runner) -> Result<(), RegistryError> {
    runner.register(
        FnSnippet::new("functionsAreObjects", functions_are_objects)
            .with_topic(Topic::Functional)
            .with_summary("functions carry properties, live in variables and travel as arguments"),
    )?;
    runner.register(
        FnSnippet::new("byValueByReference", by_value_by_reference)
            .with_topic(Topic::Objects)
            .with_summary("primitives copy on assignment while records are shared until rebound"),
    )?;
    runner.register(
        FnSnippet::new("argumentsAndRest", arguments_and_rest)
            .with_topic(Topic::Functional)
            .with_summary("the implicit argument list, a missing-parameter guard and rest parameters"),
    )?;
    Ok(())
}

/// A callable that is also an object with its own properties
struct FunctionObject {
    body: fn(&mut SnippetContext),
    properties: IndexMap<String, Value>,
}

impl FunctionObject {
    fn new(body: fn(&mut SnippetContext)) -> Self {
        Self {
            body,
            properties: IndexMap::new(),
        }
    }

    fn set(&mut self, key: &str, value: Value) {
        self.properties.insert(key.to_string(), value);
    }

    fn get(&self, key: &str) -> Value {
        self.properties.get(key).cloned().unwrap_or(Value::Undefined)
    }

    fn call(&self, ctx: &mut SnippetContext) {
        (self.body)(ctx);
    }
}

fn say_hi(ctx: &mut SnippetContext) {
    ctx.emit("hi");
}

/// Invokes whatever function it is handed
fn log(ctx: &mut SnippetContext, inner: impl FnOnce(&mut SnippetContext)) {
    inner(ctx);
}

fn functions_are_objects(ctx: &mut SnippetContext) -> SnippetResult {
    let mut salute = FunctionObject::new(say_hi);
    salute.set("language", Value::from("venezuelan"));
    ctx.emit(salute.get("language").to_string());

    let anonymous_salute = FunctionObject::new(say_hi);
    anonymous_salute.call(ctx);

    log(ctx, |ctx: &mut SnippetContext| ctx.emit("Passing a function as parameter."));
    Ok(())
}

fn greeting_record(text: &str) -> ObjectRef {
    let record = ProtoObject::empty();
    ProtoObject::set(&record, "greeting", text);
    record
}

fn change_greeting(obj: &ObjectRef) {
    ProtoObject::set(obj, "greeting", "Hola");
}

fn by_value_by_reference(ctx: &mut SnippetContext) -> SnippetResult {
    let mut a = Value::from(3.0);
    let b = a.clone();
    a = Value::from(2.0);
    ctx.emit(a.to_string());
    ctx.emit(b.to_string());

    let mut c = greeting_record("hi");
    let d = Rc::clone(&c);
    ProtoObject::set(&c, "greeting", "hello");
    ctx.emit(c.borrow().to_string());
    ctx.emit(d.borrow().to_string());

    // Parameters share the record too.
    change_greeting(&d);
    ctx.emit(c.borrow().to_string());
    ctx.emit(d.borrow().to_string());

    // Rebinding c leaves d on the old record.
    c = greeting_record("howdy");
    ctx.emit(c.borrow().to_string());
    ctx.emit(d.borrow().to_string());
    Ok(())
}

const MISSING_PARAMETERS: &str = "Missing parameters, you must specify at least 2 numbers.";

fn multiply_three_numbers(ctx: &mut SnippetContext, arguments: &[Value]) {
    let nth = |i: usize| arguments.get(i).cloned().unwrap_or(Value::Undefined);
    let number3 = nth(2).or(Value::from(1.0));

    if arguments.len() < 2 {
        ctx.emit(MISSING_PARAMETERS);
        return;
    }

    ctx.emit(format_arguments(arguments));
    let result = nth(0).to_number() * nth(1).to_number() * number3.to_number();
    ctx.emit(format!("The result is -> {}", Value::from(result)));
}

fn multiply_many_numbers(ctx: &mut SnippetContext, arguments: &[Value]) {
    if arguments.len() < 2 {
        ctx.emit(MISSING_PARAMETERS);
        return;
    }
    let (named, other_numbers) = arguments.split_at(2);

    ctx.emit(format_arguments(arguments));
    ctx.emit(Value::Array(other_numbers.to_vec()).to_string());

    let mut result = named[0].to_number() * named[1].to_number();
    other_numbers.iter().for_each(|item| result *= item.to_number());
    ctx.emit(format!("The result is -> {}", Value::from(result)));
}

fn numbers(items: &[f64]) -> Vec<Value> {
    items.iter().copied().map(Value::from).collect()
}

fn arguments_and_rest(ctx: &mut SnippetContext) -> SnippetResult {
    multiply_three_numbers(ctx, &[]);
    multiply_three_numbers(ctx, &numbers(&[2.0]));
    multiply_three_numbers(ctx, &numbers(&[2.0, 4.0]));
    multiply_three_numbers(ctx, &numbers(&[2.0, 4.0, 6.0]));

    multiply_many_numbers(ctx, &[]);
    multiply_many_numbers(ctx, &numbers(&[1.0, 2.0]));
    multiply_many_numbers(ctx, &numbers(&[1.0, 2.0, 3.0]));
    multiply_many_numbers(ctx, &numbers(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0]));
    Ok(())
}
