//! Dynamic values and the loose coercion rules the demonstrations rely on.

use std::fmt;

/// A dynamically typed value
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Declared but never assigned
    Undefined,
    /// Explicit absence
    Null,
    /// Boolean
    Bool(bool),
    /// IEEE-754 number
    Number(f64),
    /// Text
    Str(String),
    /// Ordered list of values
    Array(Vec<Value>),
    /// Plain record, tagged with its constructor name
    Object(&'static str),
    /// Record literal with its members in insertion order
    Record(Vec<(String, Value)>),
    /// Callable
    Function,
}

impl Value {
    /// Text value
    pub fn str(text: impl Into<String>) -> Self {
        Self::Str(text.into())
    }

    /// Numeric array
    pub fn numbers(items: &[f64]) -> Self {
        Self::Array(items.iter().copied().map(Self::Number).collect())
    }

    /// Record literal
    pub fn record<'k>(members: impl IntoIterator<Item = (&'k str, Value)>) -> Self {
        Self::Record(
            members
                .into_iter()
                .map(|(key, value)| (key.to_string(), value))
                .collect(),
        )
    }

    /// Member access. Missing members, and members of non-records, read as
    /// `undefined`.
    #[must_use]
    pub fn get(&self, key: &str) -> Value {
        match self {
            Self::Record(members) => members
                .iter()
                .find(|(name, _)| name == key)
                .map_or(Self::Undefined, |(_, value)| value.clone()),
            _ => Self::Undefined,
        }
    }

    /// Member assignment on a record; ignored for every other kind
    pub fn set(&mut self, key: &str, value: Value) {
        if let Self::Record(members) = self {
            match members.iter_mut().find(|(name, _)| name == key) {
                Some((_, slot)) => *slot = value,
                None => members.push((key.to_string(), value)),
            }
        }
    }

    /// Truthiness used by conditions and `||`
    #[must_use]
    pub fn to_boolean(&self) -> bool {
        match self {
            Self::Undefined | Self::Null => false,
            Self::Bool(b) => *b,
            Self::Number(n) => *n != 0.0 && !n.is_nan(),
            Self::Str(s) => !s.is_empty(),
            Self::Array(_) | Self::Object(_) | Self::Record(_) | Self::Function => true,
        }
    }

    /// Numeric conversion; anything unparsable becomes `NaN`
    #[must_use]
    pub fn to_number(&self) -> f64 {
        match self {
            Self::Undefined => f64::NAN,
            Self::Null => 0.0,
            Self::Bool(b) => f64::from(u8::from(*b)),
            Self::Number(n) => *n,
            Self::Str(s) => parse_number(s),
            Self::Array(items) => match items.as_slice() {
                [] => 0.0,
                [only] => only.to_number(),
                _ => f64::NAN,
            },
            Self::Object(_) | Self::Record(_) | Self::Function => f64::NAN,
        }
    }

    /// Result of the `typeof` operator
    #[must_use]
    pub const fn type_of(&self) -> &'static str {
        match self {
            Self::Undefined => "undefined",
            Self::Null | Self::Array(_) | Self::Object(_) | Self::Record(_) => "object",
            Self::Bool(_) => "boolean",
            Self::Number(_) => "number",
            Self::Str(_) => "string",
            Self::Function => "function",
        }
    }

    /// Whether this is an array, as `Array.isArray` reports it
    #[must_use]
    pub const fn is_array(&self) -> bool {
        matches!(self, Self::Array(_))
    }

    /// Internal class tag, as `Object.prototype.toString` renders it
    #[must_use]
    pub const fn class_tag(&self) -> &'static str {
        match self {
            Self::Undefined => "[object Undefined]",
            Self::Null => "[object Null]",
            Self::Bool(_) => "[object Boolean]",
            Self::Number(_) => "[object Number]",
            Self::Str(_) => "[object String]",
            Self::Array(_) => "[object Array]",
            Self::Object(_) | Self::Record(_) => "[object Object]",
            Self::Function => "[object Function]",
        }
    }

    /// `==`: converts mismatched primitives to numbers before comparing
    #[must_use]
    pub fn loose_eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Self::Undefined | Self::Null, Self::Undefined | Self::Null) => true,
            (Self::Undefined | Self::Null, _) | (_, Self::Undefined | Self::Null) => false,
            (Self::Str(a), Self::Str(b)) => a == b,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            _ => self.to_number() == other.to_number(),
        }
    }

    /// `===`: no conversion, so kinds must already agree
    #[must_use]
    pub fn strict_eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Self::Undefined, Self::Undefined) | (Self::Null, Self::Null) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Number(a), Self::Number(b)) => a == b,
            (Self::Str(a), Self::Str(b)) => a == b,
            _ => false,
        }
    }

    /// Nested console rendering: like `Display`, but text is quoted
    #[must_use]
    pub fn inspect(&self) -> String {
        match self {
            Self::Str(s) => format!("'{}'", s),
            other => other.to_string(),
        }
    }

    /// `self + other`: concatenates when either side is text
    #[must_use]
    pub fn add(&self, other: &Value) -> Value {
        match (self, other) {
            (Self::Str(_), _) | (_, Self::Str(_)) => {
                Self::Str(format!("{}{}", self.to_text(), other.to_text()))
            }
            _ => Self::Number(self.to_number() + other.to_number()),
        }
    }

    /// `self || fallback`
    #[must_use]
    pub fn or(self, fallback: Value) -> Value {
        if self.to_boolean() { self } else { fallback }
    }

    /// String conversion as used by concatenation
    #[must_use]
    pub fn to_text(&self) -> String {
        match self {
            Self::Str(s) => s.clone(),
            Self::Array(items) => items
                .iter()
                .map(Value::to_text)
                .collect::<Vec<_>>()
                .join(","),
            Self::Object(_) | Self::Record(_) => "[object Object]".to_string(),
            other => other.to_string(),
        }
    }
}

fn parse_number(text: &str) -> f64 {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return 0.0;
    }
    let lower = trimmed.to_ascii_lowercase();
    if lower.contains("inf") || lower.contains("nan") {
        return if trimmed == "Infinity" { f64::INFINITY } else { f64::NAN };
    }
    trimmed.parse().unwrap_or(f64::NAN)
}

fn format_number(n: f64, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if n.is_nan() {
        f.write_str("NaN")
    } else if n.is_infinite() {
        f.write_str(if n > 0.0 { "Infinity" } else { "-Infinity" })
    } else {
        write!(f, "{}", n)
    }
}

/// Console rendering: strings bare, arrays as `[ a, b ]`
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Undefined => f.write_str("undefined"),
            Self::Null => f.write_str("null"),
            Self::Bool(b) => write!(f, "{}", b),
            Self::Number(n) => format_number(*n, f),
            Self::Str(s) => f.write_str(s),
            Self::Array(items) if items.is_empty() => f.write_str("[]"),
            Self::Array(items) => {
                f.write_str("[ ")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    f.write_str(&item.inspect())?;
                }
                f.write_str(" ]")
            }
            Self::Object(name) => write!(f, "{} {{}}", name),
            Self::Record(members) if members.is_empty() => f.write_str("{}"),
            Self::Record(members) => {
                let fields: Vec<String> = members
                    .iter()
                    .map(|(key, value)| format!("{}: {}", key, value.inspect()))
                    .collect();
                write!(f, "{{ {} }}", fields.join(", "))
            }
            Self::Function => f.write_str("[Function]"),
        }
    }
}

/// Console rendering of an implicit argument list
#[must_use]
pub fn format_arguments(args: &[Value]) -> String {
    if args.is_empty() {
        return "[Arguments] {}".to_string();
    }
    let entries: Vec<String> = args
        .iter()
        .enumerate()
        .map(|(i, arg)| format!("'{}': {}", i, arg.inspect()))
        .collect();
    format!("[Arguments] {{ {} }}", entries.join(", "))
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Str(s.to_string())
    }
}
