//! Receiver binding: call, apply, bind, borrowing and constructor chaining.
//!
//! The receiver is always an explicit parameter. "Binding" a function means
//! returning a closure that has captured its receiver.

use crate::value::{format_arguments, Value};
use lantern_core::{RegistryError, SnippetError, SnippetResult, Topic};
use lantern_runtime::{FnSnippet, Runner, SnippetContext};
use std::fmt;

/// Register this module's snippets
///
/// # Errors
///
/// Returns error if a name is already taken
pub fn register(runner: &mut Runner) -> Result<(), RegistryError> {
    runner.register(
        FnSnippet::new("callApplyBind", call_apply_bind)
            .with_topic(Topic::Binding)
            .with_summary("the same function invoked with a bound, called and applied receiver"),
    )?;
    runner.register(
        FnSnippet::new("functionBorrowing", function_borrowing)
            .with_topic(Topic::Binding)
            .with_summary("a method of one record invoked against another"),
    )?;
    runner.register(
        FnSnippet::new("functionCurrying", function_currying)
            .with_topic(Topic::Binding)
            .with_summary("partial application by binding the leading argument"),
    )?;
    runner.register(
        FnSnippet::new("constructorChaining", constructor_chaining)
            .with_topic(Topic::Binding)
            .with_summary("one constructor initialising its receiver through another"),
    )?;
    runner.register(
        FnSnippet::new("selfReference", self_reference)
            .with_topic(Topic::Binding)
            .with_summary("inner functions reach the outer receiver through a saved reference"),
    )?;
    Ok(())
}

#[derive(Debug, Clone)]
struct Person {
    firstname: String,
    lastname: String,
}

impl Person {
    fn new(firstname: &str, lastname: &str) -> Self {
        Self {
            firstname: firstname.to_string(),
            lastname: lastname.to_string(),
        }
    }
}

/// Method body shared by every record with a first and last name
fn get_full_name(this: &Person) -> String {
    format!("{} {}", this.firstname, this.lastname)
}

fn as_values(params: &[&str]) -> Vec<Value> {
    params.iter().copied().map(Value::from).collect()
}

/// Function that expects a receiver but may be invoked without one
fn log_name(ctx: &mut SnippetContext, this: Option<&Person>, params: &[&str]) -> SnippetResult {
    ctx.emit("------ parameters ------");
    let params = as_values(params);
    ctx.emit(Value::Array(params.clone()).to_string());

    ctx.emit("------ arguments ------");
    ctx.emit(format_arguments(&params));

    ctx.emit("------ Logging Full Name ------");
    let this = this.ok_or_else(|| SnippetError::Type {
        message: "cannot read getFullName of undefined".to_string(),
    })?;
    ctx.emit(format!("Logged: {}", get_full_name(this)));
    Ok(())
}

/// Capture a receiver, producing a function callable without one
fn bind<'p>(
    this: &'p Person,
    body: fn(&mut SnippetContext, Option<&Person>, &[&str]) -> SnippetResult,
) -> impl Fn(&mut SnippetContext, &[&str]) -> SnippetResult + 'p {
    move |ctx: &mut SnippetContext, params: &[&str]| body(ctx, Some(this), params)
}

fn call_apply_bind(ctx: &mut SnippetContext) -> SnippetResult {
    let luke = Person::new("Luke", "Skywalker");

    let log_luke_name = bind(&luke, log_name);
    log_luke_name(ctx, &["Leia", "R2-D2"])?;

    // call: receiver then arguments
    log_name(ctx, Some(&luke), &["Leia", "R2-D2"])?;

    // apply: receiver then an argument list
    let args = vec!["Leia", "R2-D2"];
    log_name(ctx, Some(&luke), &args)
}

fn function_borrowing(ctx: &mut SnippetContext) -> SnippetResult {
    let luke = Person::new("Luke", "Skywalker");

    // Immediately invoked with an applied receiver.
    (|ctx: &mut SnippetContext, this: &Person, langs: [&str; 2]| {
        ctx.emit(format!("Logged: {}", get_full_name(this)));
        ctx.emit(format!("Arguments: {} {}", langs[0], langs[1]));
        ctx.emit("-----------");
    })(ctx, &luke, ["es", "en"]);

    let leia = Person::new("Leia", "Organa");
    ctx.emit(get_full_name(&leia));
    Ok(())
}

fn multiply(a: i64, b: i64) -> i64 {
    a * b
}

fn partial(a: i64) -> impl Fn(i64) -> i64 {
    move |b| multiply(a, b)
}

fn function_currying(ctx: &mut SnippetContext) -> SnippetResult {
    let multiply_by_two = partial(2);
    ctx.emit(multiply_by_two(4).to_string());

    let multiply_by_three = partial(3);
    ctx.emit(multiply_by_three(4).to_string());
    Ok(())
}

#[derive(Debug, Default)]
struct Product {
    name: String,
    price: u32,
}

impl Product {
    /// Initialise fields on a receiver owned by the caller
    fn init(this: &mut Product, ctx: &mut SnippetContext, name: &str, price: u32) {
        this.name = name.to_string();
        this.price = price;
        ctx.emit("Running from Product().");
    }

    fn name_and_price(&self) -> String {
        format!("{} ${}", self.name, self.price)
    }
}

#[derive(Debug)]
struct Food {
    product: Product,
    category: &'static str,
}

impl Food {
    fn new(ctx: &mut SnippetContext, name: &str, price: u32) -> Self {
        let mut product = Product::default();
        Product::init(&mut product, ctx, name, price);
        let food = Self {
            product,
            category: "food",
        };
        ctx.emit("Running from Food().");
        food
    }
}

impl fmt::Display for Food {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Food {{ name: '{}', price: {}, category: '{}' }}",
            self.product.name, self.product.price, self.category
        )
    }
}

fn constructor_chaining(ctx: &mut SnippetContext) -> SnippetResult {
    let cheese = Food::new(ctx, "cheese", 5);
    ctx.emit(cheese.to_string());
    ctx.emit(cheese.product.name_and_price());
    Ok(())
}

#[derive(Debug)]
struct Named {
    name: String,
}

impl fmt::Display for Named {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{ name: '{}' }}", self.name)
    }
}

impl Named {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
        }
    }

    fn log_global(&mut self, ctx: &mut SnippetContext) {
        let this = self;
        this.name = "Updated globalC object".to_string();
        ctx.emit(this.to_string());

        // The nested function writes through the saved receiver.
        let mut set_name = |new_name: &str| this.name = new_name.to_string();
        set_name("Updated again! The globalC object");
        ctx.emit(this.to_string());

        let mut new_obj = Named::new("Im a new object living in globalC");
        new_obj.log_nested(ctx);
    }

    fn log_nested(&mut self, ctx: &mut SnippetContext) {
        self.name = "newObj: Javascript can be crazy sometimes!".to_string();
        ctx.emit("Logging from newObj");
        ctx.emit(self.to_string());
    }
}

fn self_reference(ctx: &mut SnippetContext) -> SnippetResult {
    let mut global_c = Named::new("The globalC object");
    global_c.log_global(ctx);
    tracing::trace!(name = %global_c.name, "receiver after log");
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
    async fn test_call_apply_bind() {
        let block = [
            "------ parameters ------",
            "[ 'Leia', 'R2-D2' ]",
            "------ arguments ------",
            "[Arguments] { '0': 'Leia', '1': 'R2-D2' }",
            "------ Logging Full Name ------",
            "Logged: Luke Skywalker",
        ];
        let expected: Vec<&str> = block.iter().copied().cycle().take(block.len() * 3).collect();
        assert_eq!(run("callApplyBind").await, expected);
    }

    #[tokio::test(start_paused = true)]
    async fn test_function_borrowing() {
        assert_eq!(
            run("functionBorrowing").await,
            vec![
                "Logged: Luke Skywalker",
                "Arguments: es en",
                "-----------",
                "Leia Organa",
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_function_currying() {
        assert_eq!(run("functionCurrying").await, vec!["8", "12"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_constructor_chaining() {
        assert_eq!(
            run("constructorChaining").await,
            vec![
                "Running from Product().",
                "Running from Food().",
                "Food { name: 'cheese', price: 5, category: 'food' }",
                "cheese $5",
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_self_reference() {
        assert_eq!(
            run("selfReference").await,
            vec![
                "{ name: 'Updated globalC object' }",
                "{ name: 'Updated again! The globalC object' }",
                "Logging from newObj",
                "{ name: 'newObj: Javascript can be crazy sometimes!' }",
            ]
        );
    }

    #[test]
    fn test_log_name_without_receiver_stops_before_logging() {
        let mut ctx = SnippetContext::new();
        let err = log_name(&mut ctx, None, &[]).unwrap_err();
        assert!(matches!(err, SnippetError::Type { .. }));
        assert_eq!(
            ctx.sink().lines().collect::<Vec<_>>(),
            vec![
                "------ parameters ------",
                "[]",
                "------ arguments ------",
                "[Arguments] {}",
                "------ Logging Full Name ------",
            ]
        );
    }
}
