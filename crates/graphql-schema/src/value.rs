//! GraphQL input values.
//!
//! `Null` and `Absent` are distinct: `Null` is an explicitly provided null,
//! `Absent` means no value was supplied at all. The two behave differently
//! under coercion (see [`crate::coercion`]) and both are preserved here.

use crate::result::Checked;
use crate::result::Problem;
use indexmap::IndexMap;
use ordered_float::OrderedFloat;
use std::fmt;

/// A GraphQL identifier.
pub type Name = String;

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Value {
    Int(i32),
    Float(OrderedFloat<f64>),
    String(String),
    Boolean(bool),
    Id(String),
    Enum(Name),
    /// Field order is insertion order and is preserved when rendering.
    Object(Vec<(Name, Value)>),
    List(Vec<Value>),
    Variable(Name),
    Null,
    Absent,
}

impl Value {
    pub fn float(value: f64) -> Self {
        Value::Float(OrderedFloat(value))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Constructs a `List` whose elements are all `String`.
    pub fn string_list<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Value::List(
            items
                .into_iter()
                .map(|item| Value::String(item.into()))
                .collect(),
        )
    }

    /// Destructures a `List` whose elements are all `String`.
    pub fn as_string_list(&self) -> Option<Vec<&str>> {
        match self {
            Value::List(elements) => elements
                .iter()
                .map(|element| match element {
                    Value::String(s) => Some(s.as_str()),
                    _ => None,
                })
                .collect(),
            _ => None,
        }
    }

    /// Recursively replaces every `Variable(n)` with `vars[n]`, failing with
    /// `Undefined variable 'n'` for variables not present in `vars`. Lists
    /// and objects are traversed; every other variant passes through.
    pub fn elaborate(&self, vars: &IndexMap<Name, Value>) -> Checked<Value> {
        match self {
            Value::Variable(name) => match vars.get(name) {
                Some(value) => Checked::Success(value.clone()),
                None => Checked::failure(Problem::UndefinedVariable(name.clone())),
            },
            Value::List(elements) => {
                Checked::traverse(elements, |element| element.elaborate(vars)).map(Value::List)
            }
            Value::Object(fields) => Checked::traverse(fields, |(name, value)| {
                value.elaborate(vars).map(|value| (name.clone(), value))
            })
            .map(Value::Object),
            other => Checked::Success(other.clone()),
        }
    }
}

/// Canonical GraphQL rendering; what the SDL serializer and coercion error
/// messages print.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(i) => write!(f, "{i}"),
            // `{:?}` keeps the decimal point (`1.0`, not `1`) so rendered
            // floats re-parse as floats
            Value::Float(x) => write!(f, "{:?}", x.into_inner()),
            Value::String(s) | Value::Id(s) => write_quoted(f, s),
            Value::Boolean(b) => write!(f, "{b}"),
            Value::Enum(name) => write!(f, "{name}"),
            Value::Variable(name) => write!(f, "${name}"),
            Value::Null | Value::Absent => write!(f, "null"),
            Value::List(elements) => {
                write!(f, "[")?;
                for (i, element) in elements.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{element}")?;
                }
                write!(f, "]")
            }
            Value::Object(fields) => {
                write!(f, "{{")?;
                for (i, (name, value)) in fields.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{name}: {value}")?;
                }
                write!(f, "}}")
            }
        }
    }
}

/// Quotes `s` as a GraphQL string literal. The String grammar forbids raw
/// `"`, `\` and control characters other than tab; the first six get their
/// short escapes, the rest a `\u` sequence.
pub(crate) fn write_quoted(f: &mut impl fmt::Write, s: &str) -> fmt::Result {
    f.write_char('"')?;
    for c in s.chars() {
        match c {
            '"' => f.write_str("\\\"")?,
            '\\' => f.write_str("\\\\")?,
            '\n' => f.write_str("\\n")?,
            '\r' => f.write_str("\\r")?,
            '\u{0008}' => f.write_str("\\b")?,
            '\u{000C}' => f.write_str("\\f")?,
            c if c < ' ' && c != '\t' => write!(f, "\\u{:04X}", c as u32)?,
            c => f.write_char(c)?,
        }
    }
    f.write_char('"')
}
