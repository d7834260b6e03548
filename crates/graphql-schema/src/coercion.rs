//! Input-value coercion and validation.
//!
//! Two sibling algorithms with the same clause structure: one coerces AST
//! literal values (from SDL defaults, directive arguments and query
//! documents), the other external JSON variable values. Both take an input
//! value definition (type, default, nullability), an optional source value
//! and a human-readable location label for error messages, and resolve
//! top-down:
//!
//! 1. no value and a default: the default applies, even to non-null types;
//! 2. nullable and no/null value: `Absent` for nothing, `Null` for an
//!    explicit null;
//! 3. nullable and a real value: recurse on the inner type;
//! 4. built-in scalars match by shape;
//! 5. custom scalars pass primitives through unchanged (the server-side
//!    scalar codec checks further, outside this crate);
//! 6. enums match declared values;
//! 7. lists coerce element-wise, with element defaults cleared;
//! 8. input objects report undeclared fields, then coerce declared fields
//!    (missing ones may be supplied by per-field defaults) into an object
//!    in declaration order;
//! 9. anything else is an error.

use crate::node::Node;
use crate::result::Checked;
use crate::result::Problem;
use crate::ty::InputValueDefinition;
use crate::ty::Type;
use crate::value::Value;
use crate::Name;
use serde_json_bytes::Value as JsonValue;

/// Coerces an AST literal value against `iv`.
pub fn coerce_value(
    iv: &InputValueDefinition,
    value: Option<&Value>,
    location: &str,
) -> Checked<Value> {
    coerce(
        &iv.name,
        &iv.ty,
        iv.default_value.as_deref(),
        value,
        location,
    )
}

/// Coerces an external JSON variable value against `iv`.
pub fn coerce_json(
    iv: &InputValueDefinition,
    value: Option<&JsonValue>,
    location: &str,
) -> Checked<Value> {
    coerce_from_json(
        &iv.name,
        &iv.ty,
        iv.default_value.as_deref(),
        value,
        location,
    )
}

fn coerce(
    name: &Name,
    ty: &Type,
    default: Option<&Value>,
    value: Option<&Value>,
    location: &str,
) -> Checked<Value> {
    if value.is_none() {
        if let Some(default) = default {
            return Checked::Success(default.clone());
        }
    }
    let ty = ty.dealias();
    if let Type::Nullable(inner) = &ty {
        return match value {
            None | Some(Value::Absent) => Checked::Success(Value::Absent),
            Some(Value::Null) => Checked::Success(Value::Null),
            Some(_) => coerce(name, inner, default, value, location),
        };
    }
    match (&ty, value) {
        (Type::Scalar(scalar), Some(v)) if scalar.is_built_in() => {
            match (scalar.name.as_str(), v) {
                ("Int", Value::Int(_))
                | ("Float", Value::Float(_))
                | ("String", Value::String(_))
                | ("Boolean", Value::Boolean(_))
                | ("ID", Value::Id(_)) => Checked::Success(v.clone()),
                // SDL has no ID literal syntax, so ID accepts the string
                // and int shapes
                ("ID", Value::String(s)) => Checked::Success(Value::Id(s.clone())),
                ("ID", Value::Int(i)) => Checked::Success(Value::Id(i.to_string())),
                _ => unexpected(name, &ty, v, location),
            }
        }
        (
            Type::Scalar(_),
            Some(
                v @ (Value::Int(_) | Value::Float(_) | Value::String(_) | Value::Boolean(_)),
            ),
        ) => Checked::Success(v.clone()),
        (Type::Enum(e), Some(v @ Value::Enum(n))) if e.has_value(n) => Checked::Success(v.clone()),
        (Type::List(element), Some(Value::List(elements))) => {
            // Defaults never cascade inside list elements
            Checked::traverse(elements, |el| coerce(name, element, None, Some(el), location))
                .map(Value::List)
        }
        (Type::InputObject(definition), Some(Value::Object(fields))) => {
            let mut problems: Vec<Problem> = fields
                .iter()
                .filter(|(field, _)| !definition.fields.iter().any(|iv| iv.name == *field))
                .map(|(field, _)| Problem::UnknownInputField {
                    field: field.clone(),
                    type_name: definition.name.clone(),
                    location: location.to_string(),
                })
                .collect();
            let coerced = Checked::traverse(&definition.fields, |iv| {
                let supplied = fields.iter().find(|(n, _)| *n == iv.name).map(|(_, v)| v);
                coerce_value(iv, supplied, location).map(|value| (iv.name.clone(), value))
            })
            .map(Value::Object);
            match coerced {
                failure @ Checked::Failure(_) => failure.with_problems(problems),
                success if problems.is_empty() => success,
                other => {
                    problems.extend(other.problems().iter().cloned());
                    Checked::Failure(problems)
                }
            }
        }
        (_, Some(v)) => unexpected(name, &ty, v, location),
        (_, None) => required(name, &ty, location),
    }
}

fn coerce_from_json(
    name: &Name,
    ty: &Type,
    default: Option<&Value>,
    value: Option<&JsonValue>,
    location: &str,
) -> Checked<Value> {
    if value.is_none() {
        if let Some(default) = default {
            return Checked::Success(default.clone());
        }
    }
    let ty = ty.dealias();
    if let Type::Nullable(inner) = &ty {
        return match value {
            None => Checked::Success(Value::Absent),
            Some(JsonValue::Null) => Checked::Success(Value::Null),
            Some(_) => coerce_from_json(name, inner, default, value, location),
        };
    }
    match (&ty, value) {
        (Type::Scalar(scalar), Some(v)) if scalar.is_built_in() => {
            match (scalar.name.as_str(), v) {
                ("Int", JsonValue::Number(n)) => match n.as_i64().and_then(|i| i32::try_from(i).ok())
                {
                    Some(i) => Checked::Success(Value::Int(i)),
                    None => unexpected_json(name, &ty, v, location),
                },
                ("Float", JsonValue::Number(n)) => match n.as_f64() {
                    Some(x) => Checked::Success(Value::float(x)),
                    None => unexpected_json(name, &ty, v, location),
                },
                ("String", JsonValue::String(s)) => {
                    Checked::Success(Value::String(s.as_str().to_string()))
                }
                ("Boolean", JsonValue::Bool(b)) => Checked::Success(Value::Boolean(*b)),
                ("ID", JsonValue::String(s)) => Checked::Success(Value::Id(s.as_str().to_string())),
                ("ID", JsonValue::Number(n)) => match n.as_i64() {
                    Some(i) => Checked::Success(Value::Id(i.to_string())),
                    None => unexpected_json(name, &ty, v, location),
                },
                _ => unexpected_json(name, &ty, v, location),
            }
        }
        (Type::Scalar(_), Some(v)) => match v {
            JsonValue::Number(n) => match n.as_i64().and_then(|i| i32::try_from(i).ok()) {
                Some(i) => Checked::Success(Value::Int(i)),
                None => match n.as_f64() {
                    Some(x) => Checked::Success(Value::float(x)),
                    None => unexpected_json(name, &ty, v, location),
                },
            },
            JsonValue::String(s) => Checked::Success(Value::String(s.as_str().to_string())),
            JsonValue::Bool(b) => Checked::Success(Value::Boolean(*b)),
            _ => unexpected_json(name, &ty, v, location),
        },
        (Type::Enum(e), Some(JsonValue::String(n))) if e.has_value(n.as_str()) => {
            Checked::Success(Value::Enum(n.as_str().to_string()))
        }
        (Type::List(element), Some(JsonValue::Array(elements))) => Checked::traverse(
            elements,
            |el| coerce_from_json(name, element, None, Some(el), location),
        )
        .map(Value::List),
        (Type::InputObject(definition), Some(JsonValue::Object(fields))) => {
            let mut problems: Vec<Problem> = fields
                .iter()
                .filter(|(field, _)| {
                    !definition
                        .fields
                        .iter()
                        .any(|iv| iv.name == field.as_str())
                })
                .map(|(field, _)| Problem::UnknownInputField {
                    field: field.as_str().to_string(),
                    type_name: definition.name.clone(),
                    location: location.to_string(),
                })
                .collect();
            let coerced = Checked::traverse(&definition.fields, |iv| {
                let supplied = fields
                    .iter()
                    .find(|(n, _)| n.as_str() == iv.name)
                    .map(|(_, v)| v);
                coerce_json(iv, supplied, location).map(|value| (iv.name.clone(), value))
            })
            .map(Value::Object);
            match coerced {
                failure @ Checked::Failure(_) => failure.with_problems(problems),
                success if problems.is_empty() => success,
                other => {
                    problems.extend(other.problems().iter().cloned());
                    Checked::Failure(problems)
                }
            }
        }
        (_, Some(v)) => unexpected_json(name, &ty, v, location),
        (_, None) => required(name, &ty, location),
    }
}

fn unexpected(name: &Name, ty: &Type, found: &Value, location: &str) -> Checked<Value> {
    Checked::failure(Problem::UnexpectedValue {
        expected: ty.to_string(),
        found: found.to_string(),
        name: name.clone(),
        location: location.to_string(),
    })
}

fn unexpected_json(name: &Name, ty: &Type, found: &JsonValue, location: &str) -> Checked<Value> {
    Checked::failure(Problem::UnexpectedValue {
        expected: ty.to_string(),
        found: render_json(found),
        name: name.clone(),
        location: location.to_string(),
    })
}

fn required(name: &Name, ty: &Type, location: &str) -> Checked<Value> {
    Checked::failure(Problem::RequiredValue {
        expected: ty.to_string(),
        name: name.clone(),
        location: location.to_string(),
    })
}

fn render_json(value: &JsonValue) -> String {
    match value {
        JsonValue::Null => "null".to_string(),
        JsonValue::Bool(b) => b.to_string(),
        JsonValue::Number(n) => n.to_string(),
        JsonValue::String(s) => format!("\"{}\"", s.as_str()),
        JsonValue::Array(elements) => {
            let rendered: Vec<String> = elements.iter().map(render_json).collect();
            format!("[{}]", rendered.join(", "))
        }
        JsonValue::Object(fields) => {
            let rendered: Vec<String> = fields
                .iter()
                .map(|(name, value)| format!("{}: {}", name.as_str(), render_json(value)))
                .collect();
            format!("{{{}}}", rendered.join(", "))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Schema;
    use crate::ty::NamedType;
    use pretty_assertions::assert_eq;
    use serde_json_bytes::json;

    fn schema() -> Schema {
        Schema::parse(
            r#"
            scalar BigInt

            enum Color { RED GREEN }

            input P {
              n: Int = 7
              m: Int!
            }

            type Query {
              x(p: P, big: BigInt, color: Color, id: ID, names: [String!], point: Float): Int
            }
            "#,
        )
        .ok()
        .expect("valid schema")
    }

    fn argument(schema: &Schema, name: &str) -> Node<InputValueDefinition> {
        let NamedType::Object(query) = schema.definition("Query").unwrap() else {
            panic!("expected object");
        };
        query.fields[0]
            .arguments
            .iter()
            .find(|a| a.name == name)
            .expect(name)
            .clone()
    }

    fn object(fields: &[(&str, Value)]) -> Value {
        Value::Object(
            fields
                .iter()
                .map(|(n, v)| (n.to_string(), v.clone()))
                .collect(),
        )
    }

    #[test]
    fn input_object_defaulting() {
        let schema = schema();
        let p = argument(&schema, "p");
        let result = coerce_value(&p, Some(&object(&[("m", Value::Int(3))])), "field 'x'");
        assert_eq!(
            result,
            Checked::Success(object(&[("n", Value::Int(7)), ("m", Value::Int(3))]))
        );
    }

    #[test]
    fn missing_required_input_field() {
        let schema = schema();
        let p = argument(&schema, "p");
        let result = coerce_value(&p, Some(&object(&[("n", Value::Int(1))])), "field 'x'");
        let problems: Vec<String> = result.problems().iter().map(|p| p.to_string()).collect();
        assert_eq!(
            problems,
            ["Value of type Int! required for 'm' in field 'x'"]
        );
    }

    #[test]
    fn unknown_input_fields_are_reported_first() {
        let schema = schema();
        let p = argument(&schema, "p");
        let result = coerce_value(&p, Some(&object(&[("q", Value::Int(1))])), "field 'x'");
        let problems: Vec<String> = result.problems().iter().map(|p| p.to_string()).collect();
        assert_eq!(
            problems,
            [
                "Unknown field 'q' for input object value of type P in field 'x'",
                "Value of type Int! required for 'm' in field 'x'",
            ]
        );
    }

    #[test]
    fn nullable_distinguishes_null_from_absent() {
        let schema = schema();
        let id = argument(&schema, "id");
        assert_eq!(coerce_value(&id, None, "loc"), Checked::Success(Value::Absent));
        assert_eq!(
            coerce_value(&id, Some(&Value::Absent), "loc"),
            Checked::Success(Value::Absent)
        );
        assert_eq!(
            coerce_value(&id, Some(&Value::Null), "loc"),
            Checked::Success(Value::Null)
        );
    }

    #[test]
    fn id_accepts_string_and_int_shapes() {
        let schema = schema();
        let id = argument(&schema, "id");
        assert_eq!(
            coerce_value(&id, Some(&Value::String("abc".into())), "loc"),
            Checked::Success(Value::Id("abc".into()))
        );
        assert_eq!(
            coerce_value(&id, Some(&Value::Int(42)), "loc"),
            Checked::Success(Value::Id("42".into()))
        );
        assert_eq!(
            coerce_value(&id, Some(&Value::Boolean(true)), "loc")
                .problems()[0]
                .to_string(),
            "Expected ID! found 'true' for 'id' in loc"
        );
    }

    #[test]
    fn custom_scalars_pass_primitives_through() {
        let schema = schema();
        let big = argument(&schema, "big");
        assert_eq!(
            coerce_value(&big, Some(&Value::Int(42)), "loc"),
            Checked::Success(Value::Int(42))
        );
        assert_eq!(
            coerce_value(&big, Some(&Value::String("1e100".into())), "loc"),
            Checked::Success(Value::String("1e100".into()))
        );
        assert!(!coerce_value(&big, Some(&Value::Enum("X".into())), "loc").is_success());
    }

    #[test]
    fn enums_match_declared_values() {
        let schema = schema();
        let color = argument(&schema, "color");
        assert_eq!(
            coerce_value(&color, Some(&Value::Enum("RED".into())), "loc"),
            Checked::Success(Value::Enum("RED".into()))
        );
        let result = coerce_value(&color, Some(&Value::Enum("BLUE".into())), "loc");
        assert_eq!(
            result.problems()[0].to_string(),
            "Expected Color! found 'BLUE' for 'color' in loc"
        );
    }

    #[test]
    fn lists_coerce_elementwise_without_defaults() {
        let schema = schema();
        let names = argument(&schema, "names");
        assert_eq!(
            coerce_value(
                &names,
                Some(&Value::List(vec![
                    Value::String("a".into()),
                    Value::String("b".into())
                ])),
                "loc"
            ),
            Checked::Success(Value::List(vec![
                Value::String("a".into()),
                Value::String("b".into())
            ]))
        );
        // the element is non-null and the list default must not leak in
        let mut with_default = (*names).clone();
        with_default.default_value = Some(Node::new(Value::string_list(["d"])));
        let result = coerce_value(&with_default, Some(&Value::List(vec![Value::Null])), "loc");
        assert_eq!(
            result.problems()[0].to_string(),
            "Expected String! found 'null' for 'names' in loc"
        );
        // but the whole-value default still applies when nothing is supplied
        assert_eq!(
            coerce_value(&with_default, None, "loc"),
            Checked::Success(Value::string_list(["d"]))
        );
    }

    #[test]
    fn json_input_object_defaulting() {
        let schema = schema();
        let p = argument(&schema, "p");
        let value = json!({"m": 3});
        assert_eq!(
            coerce_json(&p, Some(&value), "field 'x'"),
            Checked::Success(object(&[("n", Value::Int(7)), ("m", Value::Int(3))]))
        );
        let value = json!({"n": 1});
        let problems: Vec<String> = coerce_json(&p, Some(&value), "field 'x'")
            .problems()
            .iter()
            .map(|p| p.to_string())
            .collect();
        assert_eq!(
            problems,
            ["Value of type Int! required for 'm' in field 'x'"]
        );
    }

    #[test]
    fn json_scalars_coerce_by_shape() {
        let schema = schema();
        let id = argument(&schema, "id");
        assert_eq!(
            coerce_json(&id, Some(&json!("abc")), "loc"),
            Checked::Success(Value::Id("abc".into()))
        );
        assert_eq!(
            coerce_json(&id, Some(&json!(42)), "loc"),
            Checked::Success(Value::Id("42".into()))
        );
        let point = argument(&schema, "point");
        assert_eq!(
            coerce_json(&point, Some(&json!(1.5)), "loc"),
            Checked::Success(Value::float(1.5))
        );
        let names = argument(&schema, "names");
        assert_eq!(
            coerce_json(&names, Some(&json!(["a", "b"])), "loc"),
            Checked::Success(Value::string_list(["a", "b"]))
        );
        let color = argument(&schema, "color");
        assert_eq!(
            coerce_json(&color, Some(&json!("GREEN")), "loc"),
            Checked::Success(Value::Enum("GREEN".into()))
        );
        assert_eq!(
            coerce_json(&color, Some(&json!(3)), "loc").problems()[0].to_string(),
            "Expected Color! found '3' for 'color' in loc"
        );
    }

    #[test]
    fn json_null_and_absent() {
        let schema = schema();
        let id = argument(&schema, "id");
        assert_eq!(coerce_json(&id, None, "loc"), Checked::Success(Value::Absent));
        assert_eq!(
            coerce_json(&id, Some(&json!(null)), "loc"),
            Checked::Success(Value::Null)
        );
    }

    #[test]
    fn json_custom_scalar_pass_through() {
        let schema = schema();
        let big = argument(&schema, "big");
        assert_eq!(
            coerce_json(&big, Some(&json!(42)), "loc"),
            Checked::Success(Value::Int(42))
        );
        assert_eq!(
            coerce_json(&big, Some(&json!(1.25)), "loc"),
            Checked::Success(Value::float(1.25))
        );
        assert_eq!(
            coerce_json(&big, Some(&json!("x")), "loc"),
            Checked::Success(Value::String("x".into()))
        );
    }
}
