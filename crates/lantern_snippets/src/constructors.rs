//! Constructor functions, their shared prototypes, and augmenting the
//! prototypes of built-in wrappers.

use crate::prototypes::{get_formal_full_name, get_full_name, ObjectRef, ProtoObject};
use crate::value::Value;
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
        FnSnippet::new("functionConstructors", function_constructors)
            .with_topic(Topic::Prototypes)
            .with_summary("new hands a fresh receiver to the constructor and returns it"),
    )?;
    runner.register(
        FnSnippet::new("constructorPrototype", constructor_prototype)
            .with_topic(Topic::Prototypes)
            .with_summary("methods on the constructor's prototype reach every instance, even when added later"),
    )?;
    runner.register(
        FnSnippet::new("builtinPrototypes", builtin_prototypes)
            .with_topic(Topic::Prototypes)
            .with_summary("augmented wrapper prototypes, boxed equality and for..in over an array"),
    )?;
    Ok(())
}

/// `function Person(firstname, lastname)` as run under `new`
fn person(ctx: &mut SnippetContext, this: &ObjectRef, firstname: &str, lastname: &str) {
    ctx.emit(this.borrow().to_string());
    ProtoObject::set(this, "firstname", firstname);
    ProtoObject::set(this, "lastname", lastname);
    ctx.emit("This function constructor is invoked.");
}

fn new_person(ctx: &mut SnippetContext, prototype: &ObjectRef, firstname: &str, lastname: &str) -> ObjectRef {
    ProtoObject::construct(prototype, |this| person(ctx, this, firstname, lastname))
}

fn function_constructors(ctx: &mut SnippetContext) -> SnippetResult {
    let prototype = ProtoObject::prototype_of("Person");

    let luke = new_person(ctx, &prototype, "Luke", "Skywalker");
    ctx.emit(luke.borrow().to_string());

    let leia = new_person(ctx, &prototype, "Leia", "Organa");
    ctx.emit(leia.borrow().to_string());
    Ok(())
}

fn constructor_prototype(ctx: &mut SnippetContext) -> SnippetResult {
    let prototype = ProtoObject::prototype_of("Person");
    ProtoObject::define(&prototype, "getFullName", get_full_name);

    let luke = new_person(ctx, &prototype, "Luke", "Skywalker");
    ctx.emit(luke.borrow().to_string());
    ctx.emit(ProtoObject::invoke(&luke, "getFullName", &[])?.to_string());

    let leia = new_person(ctx, &prototype, "Leia", "Organa");
    ctx.emit(leia.borrow().to_string());

    // Added after leia was built.
    ProtoObject::define(&prototype, "getFormalFullName", get_formal_full_name);
    ctx.emit(ProtoObject::invoke(&leia, "getFormalFullName", &[])?.to_string());
    Ok(())
}

/// Prototypes shared by every wrapper of one primitive kind
struct Builtins {
    string: ObjectRef,
    number: ObjectRef,
    array: ObjectRef,
}

impl Builtins {
    fn new() -> Self {
        let number = ProtoObject::prototype_of("Number");
        ProtoObject::define_native(&number, "toFixed", to_fixed);
        Self {
            string: ProtoObject::prototype_of("String"),
            number,
            array: ProtoObject::prototype_of("Array"),
        }
    }

    /// Implicit wrapper used when a member is read off a primitive
    fn wrap(&self, primitive: &Value) -> ObjectRef {
        let prototype = match primitive {
            Value::Str(_) => &self.string,
            _ => &self.number,
        };
        ProtoObject::boxed(prototype, primitive.clone())
    }

    /// Array as a record: one data slot per index
    fn array_of(&self, items: &[&str]) -> ObjectRef {
        let array = ProtoObject::create(&self.array);
        for (index, item) in items.iter().enumerate() {
            ProtoObject::set(&array, &index.to_string(), *item);
        }
        array
    }
}

fn to_fixed(this: &ObjectRef, args: &[Value]) -> Value {
    let digits = args.first().map_or(0.0, Value::to_number).max(0.0) as usize;
    Value::Str(format!("{:.*}", digits, ProtoObject::primitive(this).to_number()))
}

fn is_length_greater_than(this: &ObjectRef, args: &[Value]) -> Value {
    let length = ProtoObject::primitive(this).to_text().chars().count();
    let limit = args.first().map_or(f64::NAN, Value::to_number);
    Value::Bool(length as f64 > limit)
}

fn is_positive(this: &ObjectRef, _args: &[Value]) -> Value {
    Value::Bool(ProtoObject::primitive(this).to_number() > 0.0)
}

fn custom_method(_this: &ObjectRef, _args: &[Value]) -> Value {
    Value::from("Hallo")
}

/// Either side of an equality test
enum Operand {
    Primitive(Value),
    Object(ObjectRef),
}

impl Operand {
    /// `==`: an object against a primitive compares by its wrapped value
    fn loose_eq(&self, other: &Operand) -> bool {
        match (self, other) {
            (Self::Object(a), Self::Object(b)) => Rc::ptr_eq(a, b),
            (Self::Primitive(a), Self::Primitive(b)) => a.loose_eq(b),
            (Self::Primitive(p), Self::Object(o)) | (Self::Object(o), Self::Primitive(p)) => {
                p.loose_eq(&ProtoObject::primitive(o))
            }
        }
    }

    /// `===`: an object only equals itself
    fn strict_eq(&self, other: &Operand) -> bool {
        match (self, other) {
            (Self::Object(a), Self::Object(b)) => Rc::ptr_eq(a, b),
            (Self::Primitive(a), Self::Primitive(b)) => a.strict_eq(b),
            _ => false,
        }
    }
}

fn log_for_in(ctx: &mut SnippetContext, array: &ObjectRef) {
    for key in ProtoObject::enumerate(array) {
        ctx.emit(format!("{}: {}", key, ProtoObject::get_text(array, &key)));
    }
}

fn builtin_prototypes(ctx: &mut SnippetContext) -> SnippetResult {
    let builtins = Builtins::new();

    let hello = builtins.wrap(&Value::from("Hello World!"));
    ctx.emit(ProtoObject::primitive(&hello).to_text().chars().count().to_string());

    let num = Value::from(5.0);
    let fixed = ProtoObject::invoke(&builtins.wrap(&num), "toFixed", &[Value::from(2.0)])?;
    ctx.emit(fixed.to_string());

    ProtoObject::define(&builtins.string, "isLengthGreaterThan", is_length_greater_than);
    let pikachu = builtins.wrap(&Value::from("Pikachu"));
    ctx.emit(ProtoObject::invoke(&pikachu, "isLengthGreaterThan", &[Value::from(3.0)])?.to_string());

    ProtoObject::define(&builtins.number, "isPositive", is_positive);
    ctx.emit(ProtoObject::invoke(&builtins.wrap(&num), "isPositive", &[])?.to_string());

    let a = Operand::Primitive(Value::from(3.0));
    let b = Operand::Object(ProtoObject::boxed(&builtins.number, Value::from(3.0)));
    ctx.emit(a.loose_eq(&b).to_string());
    ctx.emit(a.strict_eq(&b).to_string());

    let arr = builtins.array_of(&["Luke", "Leia", "Anakin"]);
    log_for_in(ctx, &arr);

    ProtoObject::set(&builtins.array, "customProperty", "Kame Hame Ha!");
    ProtoObject::define_with_source(
        &builtins.array,
        "customMethod",
        custom_method,
        "function () { return \"Hallo\"; }",
    );
    log_for_in(ctx, &arr);
    Ok(())
}
