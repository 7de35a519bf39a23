//! Records: computed and dotted member access, nesting, methods stored as
//! members, and arrays holding values of every kind.

use crate::value::Value;
use lantern_core::{RegistryError, SnippetError, SnippetResult, Topic};
use lantern_runtime::{FnSnippet, Runner, SnippetContext};

/// Register this module's snippets
///
/// # Errors
///
/// Returns error if a name is already taken
pub fn register(runner: &mut Runner) -> Result<(), RegistryError> {
    runner.register(
        FnSnippet::new("objectMembers", object_members)
            .with_topic(Topic::Objects)
            .with_summary("members read by computed key or dot, missing ones are undefined, methods see their record"),
    )?;
    runner.register(
        FnSnippet::new("objectLiterals", object_literals)
            .with_topic(Topic::Objects)
            .with_summary("literal records passed to functions, named or built on the fly"),
    )?;
    runner.register(
        FnSnippet::new("mixedArray", mixed_array)
            .with_topic(Topic::Objects)
            .with_summary("one array holding primitives, a record, a function and another array"),
    )?;
    Ok(())
}

/// `function (greeting) { greeting = greeting || "Hello"; ... }` with the
/// record it was read from as receiver
fn print_full_name(ctx: &mut SnippetContext, this: &Value, greeting: Option<&str>) {
    let greeting = greeting
        .map_or(Value::Undefined, Value::from)
        .or(Value::from("Hello"));
    ctx.emit(format!(
        "{} {} {}",
        greeting,
        this.get("firstname").to_text(),
        this.get("lastname").to_text()
    ));
}

/// Read `key` off `this` and call it; only function members are callable
fn call_member(
    ctx: &mut SnippetContext,
    this: &Value,
    key: &str,
    body: fn(&mut SnippetContext, &Value, Option<&str>),
    greeting: Option<&str>,
) -> SnippetResult {
    match this.get(key) {
        Value::Function => {
            body(ctx, this, greeting);
            Ok(())
        }
        _ => Err(SnippetError::not_callable(key)),
    }
}

fn object_members(ctx: &mut SnippetContext) -> SnippetResult {
    let mut person = Value::Record(Vec::new());
    person.set("firstname", Value::from("Darwing"));
    person.set("lastname", Value::from("Zenfy"));

    let first_name_property = "firstname";
    ctx.emit(person.get(first_name_property).to_string());
    ctx.emit(person.get("firstname").to_string());
    ctx.emit(person.get("lastname").to_string());
    ctx.emit(person.get("address").to_string());

    let mut address = Value::Record(Vec::new());
    address.set("street", Value::from("14-1 Venezuela St."));
    address.set("city", Value::from("Caracas"));
    address.set("state", Value::from("DF"));
    person.set("address", address);
    person.set("printFullName", Value::Function);

    ctx.emit(person.get("address").get("street").to_string());
    ctx.emit(person.get("address").get("city").to_string());
    ctx.emit(person.get("address").get("state").to_string());

    call_member(ctx, &person, "printFullName", print_full_name, Some("Hola"))?;

    // Reading the member without calling it yields the function itself.
    ctx.emit(person.get("printFullName").to_string());
    call_member(ctx, &person, "printFullName", print_full_name, None)
}

fn greet_person(ctx: &mut SnippetContext, person: &Value) {
    ctx.emit(format!("Hi {}", person.get("firstname").to_text()));
}

fn object_literals(ctx: &mut SnippetContext) -> SnippetResult {
    let mut darwing = Value::record([
        ("firstname", Value::from("Darwing")),
        ("lastname", Value::from("Zenfy")),
        (
            "address",
            Value::record([
                ("street", Value::from("14-1 Venezuela St.")),
                ("city", Value::from("Caracas")),
                ("state", Value::from("DF")),
            ]),
        ),
    ]);
    greet_person(ctx, &darwing);

    greet_person(
        ctx,
        &Value::record([
            ("firstname", Value::from("Dancer")),
            ("lastname", Value::from("of Boreal Valley")),
        ]),
    );

    darwing.set(
        "address2",
        Value::record([("street", Value::from("15-2 Venezia St."))]),
    );
    tracing::trace!(record = %darwing, "after adding address2");
    Ok(())
}

/// The function expression stored at index 3
fn greet_entry(name: &Value, greeting: &Value) -> String {
    let greeting = greeting.clone().or(Value::from("Hello "));
    format!("{}, {}", name.to_text(), greeting.to_text())
}

#[allow(clippy::approx_constant)]
fn mixed_array(ctx: &mut SnippetContext) -> SnippetResult {
    let items = vec![
        Value::from(42.0),
        Value::from(false),
        Value::record([
            ("name", Value::from("Darwing")),
            ("address", Value::from("Alderaan")),
        ]),
        Value::Function,
        Value::from("Im your father"),
        Value::Array(vec![Value::from(3.14), Value::from("Im pi!")]),
    ];
    ctx.emit(Value::Array(items.clone()).to_string());

    match &items[3] {
        Value::Function => {
            ctx.emit(greet_entry(&items[2].get("name"), &items[4]));
            Ok(())
        }
        _ => Err(SnippetError::not_callable("arr[3]")),
    }
}
