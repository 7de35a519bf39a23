//! Prototype delegation through a chain of shared records.
//!
//! A record owns its own slots and optionally delegates to a prototype.
//! Reads walk the chain; writes always land on the record itself. Methods
//! run against the record they were looked up on, not the one that owns
//! them.

use crate::value::Value;
use indexmap::IndexMap;
use lantern_core::{RegistryError, SnippetError, SnippetResult, Topic};
use lantern_runtime::{FnSnippet, Runner, SnippetContext};
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Shared handle to a record
pub type ObjectRef = Rc<RefCell<ProtoObject>>;

/// Method body. Receives the record it was invoked on and the call
/// arguments.
pub type Method = fn(&ObjectRef, &[Value]) -> Value;

#[derive(Clone)]
enum Slot {
    Data(String),
    Method {
        body: Method,
        source: Option<&'static str>,
        enumerable: bool,
    },
}

/// Record with an optional prototype
#[derive(Default)]
pub struct ProtoObject {
    own: IndexMap<String, Slot>,
    proto: Option<ObjectRef>,
    constructor: Option<&'static str>,
    primitive: Option<Value>,
}

impl ProtoObject {
    /// Record with no prototype
    #[must_use]
    pub fn empty() -> ObjectRef {
        Rc::new(RefCell::new(Self::default()))
    }

    /// Record delegating to `proto`
    #[must_use]
    pub fn create(proto: &ObjectRef) -> ObjectRef {
        Rc::new(RefCell::new(Self {
            proto: Some(Rc::clone(proto)),
            ..Self::default()
        }))
    }

    /// The shared prototype of constructor `name`. Records built from it
    /// print with that name.
    #[must_use]
    pub fn prototype_of(name: &'static str) -> ObjectRef {
        Rc::new(RefCell::new(Self {
            constructor: Some(name),
            ..Self::default()
        }))
    }

    /// Record delegating to `prototype`, initialised by a constructor body
    ///
    /// The body sees the fresh record as its receiver; writes it makes land
    /// on the record, never on `prototype`.
    pub fn construct(prototype: &ObjectRef, body: impl FnOnce(&ObjectRef)) -> ObjectRef {
        let this = Self::create(prototype);
        body(&this);
        this
    }

    /// Wrapper record around a primitive, delegating to `prototype`
    #[must_use]
    pub fn boxed(prototype: &ObjectRef, primitive: Value) -> ObjectRef {
        let this = Self::create(prototype);
        this.borrow_mut().primitive = Some(primitive);
        this
    }

    /// The wrapped primitive, or `undefined` for plain records
    #[must_use]
    pub fn primitive(obj: &ObjectRef) -> Value {
        obj.borrow().primitive.clone().unwrap_or(Value::Undefined)
    }

    /// Replace the prototype of an existing record
    ///
    /// # Errors
    ///
    /// Returns [`SnippetError::Type`] if `obj` already appears on the chain
    /// of `proto`, which would close a cycle.
    pub fn set_proto(obj: &ObjectRef, proto: &ObjectRef) -> Result<(), SnippetError> {
        if Self::chain(proto).any(|link| Rc::ptr_eq(&link, obj)) {
            return Err(SnippetError::Type {
                message: "cyclic prototype value".to_string(),
            });
        }
        obj.borrow_mut().proto = Some(Rc::clone(proto));
        Ok(())
    }

    /// `obj` followed by every record it delegates to, nearest first
    fn chain(obj: &ObjectRef) -> impl Iterator<Item = ObjectRef> {
        std::iter::successors(Some(Rc::clone(obj)), |record| {
            let record = record.borrow();
            record.proto.clone()
        })
    }

    /// Whether `prototype` appears anywhere on the chain above `obj`
    #[must_use]
    pub fn instance_of(obj: &ObjectRef, prototype: &ObjectRef) -> bool {
        Self::chain(obj).skip(1).any(|link| Rc::ptr_eq(&link, prototype))
    }

    /// Write a data slot on the record itself
    pub fn set(obj: &ObjectRef, key: &str, value: impl Into<String>) {
        obj.borrow_mut()
            .own
            .insert(key.to_string(), Slot::Data(value.into()));
    }

    /// Write an enumerable method slot on the record itself
    pub fn define(obj: &ObjectRef, key: &str, body: Method) {
        Self::insert_method(obj, key, body, None, true);
    }

    /// Like [`ProtoObject::define`], remembering the text the method
    /// converts to
    pub fn define_with_source(obj: &ObjectRef, key: &str, body: Method, source: &'static str) {
        Self::insert_method(obj, key, body, Some(source), true);
    }

    /// Write a method slot that key enumeration skips
    pub fn define_native(obj: &ObjectRef, key: &str, body: Method) {
        Self::insert_method(obj, key, body, None, false);
    }

    fn insert_method(
        obj: &ObjectRef,
        key: &str,
        body: Method,
        source: Option<&'static str>,
        enumerable: bool,
    ) {
        obj.borrow_mut().own.insert(
            key.to_string(),
            Slot::Method {
                body,
                source,
                enumerable,
            },
        );
    }

    fn lookup(obj: &ObjectRef, key: &str) -> Option<Slot> {
        Self::chain(obj).find_map(|record| {
            let record = record.borrow();
            record.own.get(key).cloned()
        })
    }

    /// Read a slot through the chain
    #[must_use]
    pub fn get(obj: &ObjectRef, key: &str) -> Value {
        match Self::lookup(obj, key) {
            Some(Slot::Data(text)) => Value::Str(text),
            Some(Slot::Method { .. }) => Value::Function,
            None => Value::Undefined,
        }
    }

    /// Read a slot through the chain as concatenation would convert it
    #[must_use]
    pub fn get_text(obj: &ObjectRef, key: &str) -> String {
        match Self::lookup(obj, key) {
            Some(Slot::Method {
                source: Some(source),
                ..
            }) => source.to_string(),
            _ => Self::get(obj, key).to_text(),
        }
    }

    /// Invoke a method found anywhere on the chain with `obj` as receiver
    ///
    /// # Errors
    ///
    /// Returns [`SnippetError::NotCallable`] if the slot is missing or holds
    /// data.
    pub fn invoke(obj: &ObjectRef, key: &str, args: &[Value]) -> Result<Value, SnippetError> {
        match Self::lookup(obj, key) {
            Some(Slot::Method { body, .. }) => Ok(body(obj, args)),
            _ => Err(SnippetError::not_callable(key)),
        }
    }

    /// Keys a `for..in` loop visits: own keys first, then enumerable keys
    /// up the chain, each name once
    #[must_use]
    pub fn enumerate(obj: &ObjectRef) -> Vec<String> {
        let mut seen: IndexMap<String, bool> = IndexMap::new();
        for record in Self::chain(obj) {
            let record = record.borrow();
            for (key, slot) in &record.own {
                let enumerable = match slot {
                    Slot::Data(_) => true,
                    Slot::Method { enumerable, .. } => *enumerable,
                };
                seen.entry(key.clone()).or_insert(enumerable);
            }
        }
        seen.into_iter()
            .filter_map(|(key, enumerable)| enumerable.then_some(key))
            .collect()
    }

    /// Own data slots, in insertion order
    #[must_use]
    pub fn own_entries(obj: &ObjectRef) -> Vec<(String, String)> {
        obj.borrow()
            .own
            .iter()
            .filter_map(|(key, slot)| match slot {
                Slot::Data(text) => Some((key.clone(), text.clone())),
                Slot::Method { .. } => None,
            })
            .collect()
    }

    /// Whether `key` is stored on the record itself
    #[must_use]
    pub fn has_own(obj: &ObjectRef, key: &str) -> bool {
        obj.borrow().own.contains_key(key)
    }

    fn constructor_name(&self) -> Option<&'static str> {
        let proto = self.proto.as_ref()?;
        Self::chain(proto).find_map(|record| {
            let record = record.borrow();
            record.constructor
        })
    }
}

impl fmt::Debug for ProtoObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProtoObject")
            .field("own", &self.own.keys().collect::<Vec<_>>())
            .field("has_proto", &self.proto.is_some())
            .field("constructor", &self.constructor)
            .finish()
    }
}

/// Console rendering of own data slots, prefixed by the constructor name
/// when the record was built by one
impl fmt::Display for ProtoObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(name) = self.constructor_name() {
            write!(f, "{} ", name)?;
        }
        let fields: Vec<String> = self
            .own
            .iter()
            .filter_map(|(key, slot)| match slot {
                Slot::Data(text) => Some(format!("{}: '{}'", key, text)),
                Slot::Method { .. } => None,
            })
            .collect();
        if fields.is_empty() {
            f.write_str("{}")
        } else {
            write!(f, "{{ {} }}", fields.join(", "))
        }
    }
}

/// Register this module's snippets
///
/// # Errors
///
/// Returns error if a name is already taken
pub fn register(runner: &mut Runner) -> Result<(), RegistryError> {
    runner.register(
        FnSnippet::new("prototypeChain", prototype_chain)
            .with_topic(Topic::Prototypes)
            .with_summary("lookups fall through to a shared prototype, including methods added later"),
    )?;
    runner.register(
        FnSnippet::new("objectCreate", object_create)
            .with_topic(Topic::Prototypes)
            .with_summary("a record created from a prototype shadows without mutating it"),
    )?;
    runner.register(
        FnSnippet::new("typeInspection", type_inspection)
            .with_topic(Topic::Prototypes)
            .with_summary("typeof and instance checks across value kinds"),
    )?;
    Ok(())
}

fn text_of(obj: &ObjectRef, key: &str) -> String {
    ProtoObject::get(obj, key).to_string()
}

/// `this.firstname + ' ' + this.lastname`
pub(crate) fn get_full_name(this: &ObjectRef, _args: &[Value]) -> Value {
    Value::Str(format!("{} {}", text_of(this, "firstname"), text_of(this, "lastname")))
}

/// `this.lastname + ', ' + this.firstname`
pub(crate) fn get_formal_full_name(this: &ObjectRef, _args: &[Value]) -> Value {
    Value::Str(format!("{}, {}", text_of(this, "lastname"), text_of(this, "firstname")))
}

fn greet(this: &ObjectRef, _args: &[Value]) -> Value {
    Value::Str(format!("Hi {}", text_of(this, "firstname")))
}

fn default_person(method_name: &str, method: Method) -> ObjectRef {
    let person = ProtoObject::empty();
    ProtoObject::set(&person, "firstname", "Default");
    ProtoObject::set(&person, "lastname", "Default");
    ProtoObject::define(&person, method_name, method);
    person
}

fn prototype_chain(ctx: &mut SnippetContext) -> SnippetResult {
    let person = default_person("getFullName", get_full_name);

    let john = ProtoObject::empty();
    ProtoObject::set(&john, "firstname", "John");
    ProtoObject::set(&john, "lastname", "Cena");
    ProtoObject::set_proto(&john, &person)?;

    ctx.emit(ProtoObject::invoke(&john, "getFullName", &[])?.to_string());
    ctx.emit(text_of(&john, "firstname"));

    let jane = ProtoObject::empty();
    ProtoObject::set(&jane, "firstname", "Jane");
    ProtoObject::set_proto(&jane, &person)?;
    ctx.emit(ProtoObject::invoke(&jane, "getFullName", &[])?.to_string());

    // Added after john and jane were linked; both still see it.
    ProtoObject::define(&person, "getFormalFullName", get_formal_full_name);
    ctx.emit(ProtoObject::invoke(&john, "getFormalFullName", &[])?.to_string());
    ctx.emit(ProtoObject::invoke(&jane, "getFormalFullName", &[])?.to_string());

    ctx.emit("----- Reflection example -----");
    for (key, value) in ProtoObject::own_entries(&john) {
        ctx.emit(format!("{}: {}", key, value));
    }
    ctx.emit("----- End Reflection example -----");
    Ok(())
}

fn object_create(ctx: &mut SnippetContext) -> SnippetResult {
    let person = default_person("greet", greet);

    let bilbo = ProtoObject::create(&person);
    ProtoObject::set(&bilbo, "firstname", "Bilbo");
    ProtoObject::set(&bilbo, "lastname", "Baggins");

    ctx.emit(bilbo.borrow().to_string());
    ctx.emit(ProtoObject::invoke(&bilbo, "greet", &[])?.to_string());
    ctx.emit(text_of(&person, "firstname"));
    Ok(())
}

fn type_inspection(ctx: &mut SnippetContext) -> SnippetResult {
    let values = [
        Value::Number(3.0),
        Value::from("Hello"),
        Value::Object("Object"),
        Value::Array(Vec::new()),
    ];
    for value in &values {
        ctx.emit(value.type_of());
    }

    let d = &values[3];
    ctx.emit(d.is_array().to_string());
    ctx.emit(d.class_tag());

    ctx.emit(Value::Function.type_of());

    // new Person('Jane')
    let person_prototype = ProtoObject::prototype_of("Person");
    let e = ProtoObject::construct(&person_prototype, |this| {
        ProtoObject::set(this, "name", "Jane");
    });
    ctx.emit(Value::Object("Person").type_of());
    ctx.emit(ProtoObject::instance_of(&e, &person_prototype).to_string());

    ctx.emit(Value::Undefined.type_of());
    ctx.emit(Value::Null.type_of());
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
    async fn test_prototype_chain() {
        assert_eq!(
            run("prototypeChain").await,
            vec![
                "John Cena",
                "John",
                "Jane Default",
                "Cena, John",
                "Default, Jane",
                "----- Reflection example -----",
                "firstname: John",
                "lastname: Cena",
                "----- End Reflection example -----",
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_object_create() {
        assert_eq!(
            run("objectCreate").await,
            vec![
                "{ firstname: 'Bilbo', lastname: 'Baggins' }",
                "Hi Bilbo",
                "Default",
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_type_inspection() {
        assert_eq!(
            run("typeInspection").await,
            vec![
                "number", "string", "object", "object", "true", "[object Array]",
                "function", "object", "true", "undefined", "object",
            ]
        );
    }

    #[test]
    fn test_write_shadows_without_touching_proto() {
        let proto = default_person("getFullName", get_full_name);
        let child = ProtoObject::create(&proto);
        ProtoObject::set(&child, "firstname", "Sam");

        assert!(ProtoObject::has_own(&child, "firstname"));
        assert!(!ProtoObject::has_own(&child, "lastname"));
        assert_eq!(
            ProtoObject::invoke(&child, "getFullName", &[]).unwrap(),
            Value::from("Sam Default")
        );
        assert_eq!(text_of(&proto, "firstname"), "Default");
    }

    #[test]
    fn test_instance_of_walks_the_chain() {
        let base = ProtoObject::empty();
        let middle = ProtoObject::create(&base);
        let leaf = ProtoObject::construct(&middle, |this| ProtoObject::set(this, "k", "v"));
        let stranger = ProtoObject::empty();

        assert!(ProtoObject::instance_of(&leaf, &middle));
        assert!(ProtoObject::instance_of(&leaf, &base));
        assert!(!ProtoObject::instance_of(&leaf, &leaf));
        assert!(!ProtoObject::instance_of(&leaf, &stranger));
        assert!(!ProtoObject::instance_of(&base, &middle));
        assert!(ProtoObject::has_own(&leaf, "k"));
        assert!(!ProtoObject::has_own(&middle, "k"));
    }

    #[test]
    fn test_set_proto_rejects_cycles() {
        let a = ProtoObject::empty();
        let b = ProtoObject::create(&a);
        let c = ProtoObject::create(&b);

        assert!(matches!(
            ProtoObject::set_proto(&a, &c),
            Err(SnippetError::Type { .. })
        ));
        assert!(ProtoObject::set_proto(&a, &a).is_err());

        // The chain is untouched, so lookups still terminate.
        assert_eq!(ProtoObject::get(&c, "missing"), Value::Undefined);
        assert!(!ProtoObject::instance_of(&a, &c));

        let other = ProtoObject::empty();
        ProtoObject::set(&other, "k", "v");
        ProtoObject::set_proto(&a, &other).unwrap();
        assert_eq!(ProtoObject::get(&c, "k"), Value::from("v"));
    }

    fn hallo(_this: &ObjectRef, _args: &[Value]) -> Value {
        Value::from("Hallo")
    }

    #[test]
    fn test_enumerate_skips_native_and_shadowed_keys() {
        let proto = ProtoObject::empty();
        ProtoObject::define_native(&proto, "hidden", hallo);
        ProtoObject::set(&proto, "shared", "p");
        ProtoObject::define_with_source(&proto, "shout", hallo, "function () { return 'Hallo'; }");

        let child = ProtoObject::create(&proto);
        ProtoObject::set(&child, "0", "a");
        ProtoObject::set(&child, "shared", "c");

        assert_eq!(ProtoObject::enumerate(&child), vec!["0", "shared", "shout"]);
        assert_eq!(ProtoObject::get_text(&child, "shared"), "c");
        assert_eq!(ProtoObject::get_text(&child, "shout"), "function () { return 'Hallo'; }");
        assert_eq!(ProtoObject::get_text(&child, "hidden"), "[Function]");
        assert_eq!(
            ProtoObject::invoke(&child, "hidden", &[]).unwrap(),
            Value::from("Hallo")
        );
    }

    #[test]
    fn test_constructed_record_prints_constructor_name() {
        let prototype = ProtoObject::prototype_of("Person");
        let luke = ProtoObject::construct(&prototype, |this| {
            assert_eq!(this.borrow().to_string(), "Person {}");
            ProtoObject::set(this, "firstname", "Luke");
        });
        assert_eq!(luke.borrow().to_string(), "Person { firstname: 'Luke' }");
        assert_eq!(prototype.borrow().to_string(), "{}");

        let boxed = ProtoObject::boxed(&ProtoObject::empty(), Value::from(3.0));
        assert_eq!(ProtoObject::primitive(&boxed), Value::from(3.0));
        assert_eq!(ProtoObject::primitive(&luke), Value::Undefined);
    }

    #[test]
    fn test_invoke_missing_or_data_slot() {
        let obj = ProtoObject::empty();
        ProtoObject::set(&obj, "name", "x");
        assert_eq!(
            ProtoObject::invoke(&obj, "name", &[]).unwrap_err(),
            SnippetError::not_callable("name")
        );
        assert!(ProtoObject::invoke(&obj, "missing", &[]).is_err());
        assert_eq!(ProtoObject::get(&obj, "missing"), Value::Undefined);
    }
}
