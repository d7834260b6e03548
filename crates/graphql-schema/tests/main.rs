//! End-to-end scenarios exercising the public API surface.

use graphql_schema::coercion::coerce_json;
use graphql_schema::coercion::coerce_value;
use graphql_schema::directives::validate_query_directives;
use graphql_schema::Checked;
use graphql_schema::ExecutableDocument;
use graphql_schema::Name;
use graphql_schema::NamedType;
use graphql_schema::Schema;
use graphql_schema::Type;
use graphql_schema::Value;
use indexmap::IndexMap;
use pretty_assertions::assert_eq;

fn parse(input: &str) -> Schema {
    match Schema::parse(input) {
        Checked::Success(schema) => schema,
        other => panic!("expected a valid schema, got {:?}", other.problems()),
    }
}

#[test]
fn default_schema_root_and_rendering() {
    let schema = parse("type Query { x: Int }");
    assert_eq!(
        schema.query_type().and_then(|t| t.name().cloned()),
        Some("Query".to_string())
    );
    assert_eq!(schema.mutation_type(), None);
    assert_eq!(schema.to_string(), "type Query {\n  x: Int\n}\n");
}

#[test]
fn subtyping_through_interfaces() {
    let schema = parse(
        r#"
        interface Node { id: ID! }
        type User implements Node { id: ID! name: String }
        type Query { node: Node }
        "#,
    );
    let user = Type::from(schema.definition("User").unwrap());
    let node = Type::from(schema.definition("Node").unwrap());
    assert!(user.is_subtype_of(&node));
    assert!(!node.is_subtype_of(&user));
    assert!(schema.exhaustive(&node, &[user]));
}

#[test]
fn input_defaulting() {
    let schema = parse(
        r#"
        input P { n: Int = 7, m: Int! }
        type Query { x(p: P): Int }
        "#,
    );
    let NamedType::Object(query) = schema.definition("Query").unwrap() else {
        panic!("expected object");
    };
    let p = query.fields[0].arguments[0].clone();

    let supplied = Value::Object(vec![("m".to_string(), Value::Int(3))]);
    assert_eq!(
        coerce_value(&p, Some(&supplied), "field 'x'"),
        Checked::Success(Value::Object(vec![
            ("n".to_string(), Value::Int(7)),
            ("m".to_string(), Value::Int(3)),
        ]))
    );

    let supplied = Value::Object(vec![("n".to_string(), Value::Int(1))]);
    let problems: Vec<String> = coerce_value(&p, Some(&supplied), "field 'x'")
        .problems()
        .iter()
        .map(|p| p.to_string())
        .collect();
    assert_eq!(problems, ["Value of type Int! required for 'm' in field 'x'"]);

    // the JSON variable path agrees
    assert_eq!(
        coerce_json(&p, Some(&serde_json_bytes::json!({"m": 3})), "field 'x'"),
        Checked::Success(Value::Object(vec![
            ("n".to_string(), Value::Int(7)),
            ("m".to_string(), Value::Int(3)),
        ]))
    );
}

#[test]
fn directive_location_error() {
    let schema = parse(
        r#"
        directive @tag(v: String!) on FIELD_DEFINITION
        type Query { x: Int }
        "#,
    );
    let document = ExecutableDocument::parse(&schema, r#"{ x @tag(v: "a") }"#)
        .ok()
        .expect("parses");
    let operation = document.operation(None).expect("sole operation");
    let result = validate_query_directives(
        &schema,
        operation,
        &document.fragments,
        &IndexMap::new(),
    );
    let problems: Vec<String> = result.problems().iter().map(|p| p.to_string()).collect();
    assert_eq!(problems, ["Directive 'tag' is not allowed on FIELD"]);
}

#[test]
fn variable_elaboration() {
    let value = Value::List(vec![
        Value::Variable("a".to_string()),
        Value::Variable("a".to_string()),
        Value::Int(3),
    ]);

    let mut vars: IndexMap<Name, Value> = IndexMap::new();
    vars.insert("a".to_string(), Value::Int(1));
    assert_eq!(
        value.elaborate(&vars),
        Checked::Success(Value::List(vec![
            Value::Int(1),
            Value::Int(1),
            Value::Int(3)
        ]))
    );

    let result = value.elaborate(&IndexMap::new());
    let problems: Vec<String> = result.problems().iter().map(|p| p.to_string()).collect();
    assert_eq!(problems, ["Undefined variable 'a'"]);
}

#[test]
fn custom_scalar_pass_through() {
    let schema = parse(
        r#"
        scalar BigInt
        type Query { x(b: BigInt): Int }
        "#,
    );
    let NamedType::Object(query) = schema.definition("Query").unwrap() else {
        panic!("expected object");
    };
    let b = query.fields[0].arguments[0].clone();
    assert_eq!(
        coerce_value(&b, Some(&Value::Int(42)), "field 'x'"),
        Checked::Success(Value::Int(42))
    );
}

#[test]
fn schemas_round_trip_through_rendering() {
    let schema = parse(
        r#"
        schema {
          query: Root
        }

        "Entry points"
        type Root {
          pets(filter: PetFilter): [Pet!]
        }

        interface Named {
          name: String!
        }

        type Dog implements Named {
          name: String!
          barks: Boolean
        }

        type Cat implements Named {
          name: String!
        }

        union Pet = Dog | Cat

        enum Kind { DOG CAT }

        input PetFilter {
          kind: Kind = DOG
          limit: Int = 10
        }
        "#,
    );
    let rendered = schema.to_string();
    let reparsed = parse(&rendered);
    assert_eq!(reparsed.to_string(), rendered);
}

#[test]
fn schemas_are_shareable_across_threads() {
    let schema = parse(
        r#"
        interface Node { id: ID! }
        type User implements Node { id: ID! }
        type Query { user: User }
        "#,
    );
    let handles: Vec<_> = (0..2)
        .map(|_| {
            let schema = schema.clone();
            std::thread::spawn(move || {
                let user = Type::from(schema.definition("User").unwrap());
                let node = Type::from(schema.definition("Node").unwrap());
                user.is_subtype_of(&node)
            })
        })
        .collect();
    for handle in handles {
        assert!(handle.join().unwrap());
    }
}
