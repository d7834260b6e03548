//! Problem accumulation and the `Checked` result sum.
//!
//! Validation in this crate does not short-circuit: every fallible pass
//! collects as many [`Problem`]s as it can find before failing. `Checked<T>`
//! carries a value together with any warnings, or the accumulated problems of
//! a failure.

use crate::ty::DirectiveLocation;
use crate::Name;

/// A single diagnostic produced by parsing, validation, coercion or
/// elaboration. `Display` renders the user-visible message.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum Problem {
    #[error("Syntax error: {0}")]
    Syntax(String),

    #[error("Parser limit reached: {0}")]
    ParserLimit(String),

    #[error("Expected {expected} found '{found}' for '{name}' in {location}")]
    UnexpectedValue {
        expected: String,
        found: String,
        name: Name,
        location: String,
    },

    #[error("Value of type {expected} required for '{name}' in {location}")]
    RequiredValue {
        expected: String,
        name: Name,
        location: String,
    },

    #[error("Unknown field '{field}' for input object value of type {type_name} in {location}")]
    UnknownInputField {
        field: Name,
        type_name: Name,
        location: String,
    },

    #[error("Undefined variable '{0}'")]
    UndefinedVariable(Name),

    #[error("Reference to undefined type '{0}'")]
    UndefinedType(Name),

    #[error("Duplicate definition of type '{0}'")]
    DuplicateType(Name),

    #[error("Duplicate value '{value}' in enum '{enum_name}'")]
    DuplicateEnumValue { value: Name, enum_name: Name },

    #[error("{kind} type '{name}' must define at least one {member}")]
    EmptyType {
        kind: &'static str,
        name: Name,
        member: &'static str,
    },

    #[error("Type '{type_name}' implements non-interface type '{implemented}'")]
    NonInterfaceImplemented { type_name: Name, implemented: Name },

    #[error("Field '{field}' of interface '{interface}' is not implemented by type '{type_name}'")]
    MissingInterfaceField {
        field: Name,
        interface: Name,
        type_name: Name,
    },

    #[error("Field '{field}' of type '{type_name}' is not a subtype of its definition in interface '{interface}'")]
    IncompatibleFieldType {
        field: Name,
        interface: Name,
        type_name: Name,
    },

    #[error("Field '{field}' of type '{type_name}' does not declare the same arguments as interface '{interface}'")]
    MismatchedFieldArguments {
        field: Name,
        interface: Name,
        type_name: Name,
    },

    #[error("Undefined directive '{0}'")]
    UndefinedDirective(Name),

    #[error("Directive '{name}' is not allowed on {location}")]
    MisplacedDirective {
        name: Name,
        location: DirectiveLocation,
    },

    #[error("Directive '{0}' may not occur more than once")]
    RepeatedDirective(Name),

    #[error("Unknown argument '{argument}' in directive '{directive}'")]
    UnknownDirectiveArgument { argument: Name, directive: Name },

    #[error("At most one schema definition permitted")]
    MultipleSchemaDefinitions,

    #[error("No query root operation type defined")]
    MissingQueryRoot,

    #[error("Internal error: {0}")]
    Internal(String),
}

/// The outcome of a fallible core operation.
///
/// `Success` and `Warning` both carry a value; `Warning` additionally carries
/// non-fatal problems. `Failure` carries the accumulated problems of the
/// whole pass, in traversal order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Checked<T> {
    Success(T),
    Warning(Vec<Problem>, T),
    Failure(Vec<Problem>),
    InternalError(String),
}

impl<T> Checked<T> {
    pub fn failure(problem: Problem) -> Self {
        Checked::Failure(vec![problem])
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Checked::Success(_) | Checked::Warning(_, _))
    }

    /// The carried value, discarding warnings.
    pub fn ok(self) -> Option<T> {
        match self {
            Checked::Success(value) | Checked::Warning(_, value) => Some(value),
            Checked::Failure(_) | Checked::InternalError(_) => None,
        }
    }

    /// The accumulated problems, fatal or not.
    pub fn problems(&self) -> &[Problem] {
        match self {
            Checked::Success(_) | Checked::InternalError(_) => &[],
            Checked::Warning(problems, _) | Checked::Failure(problems) => problems,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Checked<U> {
        match self {
            Checked::Success(value) => Checked::Success(f(value)),
            Checked::Warning(problems, value) => Checked::Warning(problems, f(value)),
            Checked::Failure(problems) => Checked::Failure(problems),
            Checked::InternalError(err) => Checked::InternalError(err),
        }
    }

    /// Monadic bind that carries warnings across the join.
    pub fn and_then<U>(self, f: impl FnOnce(T) -> Checked<U>) -> Checked<U> {
        match self {
            Checked::Success(value) => f(value),
            Checked::Warning(problems, value) => f(value).with_problems(problems),
            Checked::Failure(problems) => Checked::Failure(problems),
            Checked::InternalError(err) => Checked::InternalError(err),
        }
    }

    /// Prepends `problems` to this result, demoting `Success` to `Warning`.
    /// A no-op when `problems` is empty.
    pub fn with_problems(self, mut problems: Vec<Problem>) -> Checked<T> {
        if problems.is_empty() {
            return self;
        }
        match self {
            Checked::Success(value) => Checked::Warning(problems, value),
            Checked::Warning(more, value) => {
                problems.extend(more);
                Checked::Warning(problems, value)
            }
            Checked::Failure(more) => {
                problems.extend(more);
                Checked::Failure(problems)
            }
            Checked::InternalError(err) => Checked::InternalError(err),
        }
    }

    /// Applies `f` to every item, accumulating problems across all of them.
    /// Fails with the union of all problems if any application failed.
    pub fn traverse<I, A, F>(items: I, mut f: F) -> Checked<Vec<T>>
    where
        I: IntoIterator<Item = A>,
        F: FnMut(A) -> Checked<T>,
    {
        let mut problems = Vec::new();
        let mut values = Vec::new();
        let mut failed = false;
        for item in items {
            match f(item) {
                Checked::Success(value) => values.push(value),
                Checked::Warning(more, value) => {
                    problems.extend(more);
                    values.push(value);
                }
                Checked::Failure(more) => {
                    problems.extend(more);
                    failed = true;
                }
                Checked::InternalError(err) => return Checked::InternalError(err),
            }
        }
        if failed {
            Checked::Failure(problems)
        } else if problems.is_empty() {
            Checked::Success(values)
        } else {
            Checked::Warning(problems, values)
        }
    }

    /// Flattens into a plain `Result`, folding warnings into the value and
    /// internal errors into a single problem.
    pub fn into_result(self) -> Result<T, Vec<Problem>> {
        match self {
            Checked::Success(value) | Checked::Warning(_, value) => Ok(value),
            Checked::Failure(problems) => Err(problems),
            Checked::InternalError(err) => Err(vec![Problem::Internal(err)]),
        }
    }
}
