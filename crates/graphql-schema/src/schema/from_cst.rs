//! Builds a [`Schema`] from the external parser's concrete syntax tree.
//!
//! Construction runs in three phases over one shared builder, so that type
//! references created early resolve once the schema is sealed: build the
//! named type nodes and directive definitions, then the schema root, then
//! seal and validate. Referenced type names become refs; resolution is
//! deferred to the sealed index.

use super::built_in_scalar;
use super::validation;
use super::Schema;
use super::SchemaBuilder;
use super::TypeIndex;
use crate::node::Node;
use crate::result::Checked;
use crate::result::Problem;
use crate::ty::Directive;
use crate::ty::DirectiveDefinition;
use crate::ty::DirectiveList;
use crate::ty::DirectiveLocation;
use crate::ty::EnumType;
use crate::ty::EnumValueDefinition;
use crate::ty::FieldDefinition;
use crate::ty::InputObjectType;
use crate::ty::InputValueDefinition;
use crate::ty::InterfaceType;
use crate::ty::NamedType;
use crate::ty::ObjectType;
use crate::ty::ScalarType;
use crate::ty::Type;
use crate::ty::TypeRef;
use crate::ty::UnionType;
use crate::value::Value;
use crate::Name;
use apollo_parser::cst;
use apollo_parser::cst::CstNode;
use apollo_parser::S;
use ordered_float::OrderedFloat;
use std::sync::Arc;

pub(crate) fn parse_schema(config: &crate::parser::Parser, source_text: &str) -> Checked<Schema> {
    let tree = config.apollo(source_text).parse();
    let mut problems = crate::parser::syntax_problems(&tree);
    if !problems.is_empty() {
        return Checked::Failure(problems);
    }

    let mut builder = Schema::builder();
    let mut schema_definitions = Vec::new();
    for definition in tree.document().definitions() {
        match definition {
            cst::Definition::ScalarTypeDefinition(def) => {
                if let Some(ty) = mk_scalar(&def) {
                    builder.add_type(ty);
                }
            }
            cst::Definition::ObjectTypeDefinition(def) => {
                if let Some(ty) = mk_object(&builder, &def, &mut problems) {
                    builder.add_type(ty);
                }
            }
            cst::Definition::InterfaceTypeDefinition(def) => {
                if let Some(ty) = mk_interface(&builder, &def, &mut problems) {
                    builder.add_type(ty);
                }
            }
            cst::Definition::UnionTypeDefinition(def) => {
                if let Some(ty) = mk_union(&builder, &def, &mut problems) {
                    builder.add_type(ty);
                }
            }
            cst::Definition::EnumTypeDefinition(def) => {
                if let Some(ty) = mk_enum(&def, &mut problems) {
                    builder.add_type(ty);
                }
            }
            cst::Definition::InputObjectTypeDefinition(def) => {
                if let Some(ty) = mk_input_object(&builder, &def, &mut problems) {
                    builder.add_type(ty);
                }
            }
            cst::Definition::DirectiveDefinition(def) => {
                if let Some(directive) = mk_directive_definition(&builder, &def) {
                    builder.add_directive(directive);
                }
            }
            cst::Definition::SchemaDefinition(def) => schema_definitions.push(def),
            // Executable definitions and extensions are not part of the
            // type system built here
            _ => {}
        }
    }

    if schema_definitions.len() > 1 {
        problems.push(Problem::MultipleSchemaDefinitions);
    } else if let Some(def) = schema_definitions.first() {
        let root = mk_schema_type(&builder, def);
        builder.set_schema_type(root);
    }

    let schema = builder.complete();
    problems.extend(validation::validate_schema(&schema));
    if problems.is_empty() {
        Checked::Success(schema)
    } else {
        Checked::Failure(problems)
    }
}

fn mk_scalar(def: &cst::ScalarTypeDefinition) -> Option<NamedType> {
    let name = text(def.name()?);
    // Declaring a built-in scalar yields the built-in itself
    if let Some(built_in) = built_in_scalar(&name) {
        return Some(NamedType::Scalar(built_in));
    }
    Some(NamedType::Scalar(Node::new(ScalarType {
        name,
        description: description(def.description()),
        directives: convert_directives(def.directives()),
    })))
}

fn mk_object(
    builder: &SchemaBuilder,
    def: &cst::ObjectTypeDefinition,
    problems: &mut Vec<Problem>,
) -> Option<NamedType> {
    let name = text(def.name()?);
    let fields = field_definitions(builder, def.fields_definition());
    if fields.is_empty() {
        problems.push(Problem::EmptyType {
            kind: "Object",
            name,
            member: "field",
        });
        return None;
    }
    Some(NamedType::Object(Node::new(ObjectType {
        name,
        description: description(def.description()),
        fields,
        implements: implements_interfaces(builder, def.implements_interfaces()),
        directives: convert_directives(def.directives()),
    })))
}

fn mk_interface(
    builder: &SchemaBuilder,
    def: &cst::InterfaceTypeDefinition,
    problems: &mut Vec<Problem>,
) -> Option<NamedType> {
    let name = text(def.name()?);
    let fields = field_definitions(builder, def.fields_definition());
    if fields.is_empty() {
        problems.push(Problem::EmptyType {
            kind: "Interface",
            name,
            member: "field",
        });
        return None;
    }
    Some(NamedType::Interface(Node::new(InterfaceType {
        name,
        description: description(def.description()),
        fields,
        implements: implements_interfaces(builder, def.implements_interfaces()),
        directives: convert_directives(def.directives()),
    })))
}

fn mk_union(
    builder: &SchemaBuilder,
    def: &cst::UnionTypeDefinition,
    problems: &mut Vec<Problem>,
) -> Option<NamedType> {
    let name = text(def.name()?);
    let members: Vec<Type> = def
        .union_member_types()
        .map(|members| {
            members
                .named_types()
                .filter_map(|member| Some(reference(builder, text(member.name()?))))
                .collect()
        })
        .unwrap_or_default();
    if members.is_empty() {
        problems.push(Problem::EmptyType {
            kind: "Union",
            name,
            member: "member",
        });
        return None;
    }
    Some(NamedType::Union(Node::new(UnionType {
        name,
        description: description(def.description()),
        members,
        directives: convert_directives(def.directives()),
    })))
}

fn mk_enum(def: &cst::EnumTypeDefinition, problems: &mut Vec<Problem>) -> Option<NamedType> {
    let name = text(def.name()?);
    let values: Vec<Node<EnumValueDefinition>> = def
        .enum_values_definition()
        .map(|values| {
            values
                .enum_value_definitions()
                .filter_map(|value| {
                    Some(Node::new(EnumValueDefinition {
                        value: text(value.enum_value()?.name()?),
                        description: description(value.description()),
                        directives: convert_directives(value.directives()),
                    }))
                })
                .collect()
        })
        .unwrap_or_default();
    if values.is_empty() {
        problems.push(Problem::EmptyType {
            kind: "Enum",
            name,
            member: "value",
        });
        return None;
    }
    Some(NamedType::Enum(Node::new(EnumType {
        name,
        description: description(def.description()),
        values,
        directives: convert_directives(def.directives()),
    })))
}

fn mk_input_object(
    builder: &SchemaBuilder,
    def: &cst::InputObjectTypeDefinition,
    problems: &mut Vec<Problem>,
) -> Option<NamedType> {
    let name = text(def.name()?);
    let fields: Vec<Node<InputValueDefinition>> = def
        .input_fields_definition()
        .map(|fields| {
            fields
                .input_value_definitions()
                .filter_map(|field| mk_input_value(&builder.index, &field))
                .collect()
        })
        .unwrap_or_default();
    if fields.is_empty() {
        problems.push(Problem::EmptyType {
            kind: "Input object",
            name,
            member: "input field",
        });
        return None;
    }
    Some(NamedType::InputObject(Node::new(InputObjectType {
        name,
        description: description(def.description()),
        fields,
        directives: convert_directives(def.directives()),
    })))
}

fn mk_directive_definition(
    builder: &SchemaBuilder,
    def: &cst::DirectiveDefinition,
) -> Option<Node<DirectiveDefinition>> {
    Some(Node::new(DirectiveDefinition {
        name: text(def.name()?),
        description: description(def.description()),
        arguments: argument_definitions(builder, def.arguments_definition()),
        repeatable: def.repeatable_token().is_some(),
        locations: def
            .directive_locations()
            .map(|locations| {
                locations
                    .directive_locations()
                    .filter_map(convert_location)
                    .collect()
            })
            .unwrap_or_default(),
    }))
}

/// Builds the root object from an explicit `schema { ... }` definition.
/// Only the three operation kinds are recognised; `query` defaults to a ref
/// to `Query` when absent.
fn mk_schema_type(builder: &SchemaBuilder, def: &cst::SchemaDefinition) -> NamedType {
    fn add(fields: &mut Vec<Node<FieldDefinition>>, name: &str, ty: Type) {
        if !fields.iter().any(|f| f.name == name) {
            fields.push(Node::new(FieldDefinition {
                name: name.into(),
                description: None,
                arguments: Vec::new(),
                ty,
                directives: DirectiveList::new(),
            }));
        }
    }
    let mut fields = Vec::new();
    for root in def.root_operation_type_definitions() {
        let Some(operation_type) = root.operation_type() else {
            continue;
        };
        let Some(target) = root.named_type().and_then(|ty| ty.name()).map(text) else {
            continue;
        };
        let target = reference(builder, target);
        let Some(token) = operation_type.syntax().first_token() else {
            continue;
        };
        match token.kind() {
            S![query] => add(&mut fields, "query", target),
            S![mutation] => add(&mut fields, "mutation", target.nullable()),
            S![subscription] => add(&mut fields, "subscription", target.nullable()),
            _ => {}
        }
    }
    if !fields.iter().any(|f| f.name == "query") {
        let query = reference(builder, "Query".to_string());
        add(&mut fields, "query", query);
        fields.rotate_right(1);
    }
    NamedType::Object(Node::new(ObjectType {
        name: "Schema".into(),
        description: description(def.description()),
        fields,
        implements: Vec::new(),
        directives: convert_directives(def.directives()),
    }))
}

fn field_definitions(
    builder: &SchemaBuilder,
    fields: Option<cst::FieldsDefinition>,
) -> Vec<Node<FieldDefinition>> {
    fields
        .map(|fields| {
            fields
                .field_definitions()
                .filter_map(|field| mk_field(&builder.index, &field))
                .collect()
        })
        .unwrap_or_default()
}

fn argument_definitions(
    builder: &SchemaBuilder,
    arguments: Option<cst::ArgumentsDefinition>,
) -> Vec<Node<InputValueDefinition>> {
    arguments
        .map(|arguments| {
            arguments
                .input_value_definitions()
                .filter_map(|argument| mk_input_value(&builder.index, &argument))
                .collect()
        })
        .unwrap_or_default()
}

fn implements_interfaces(
    builder: &SchemaBuilder,
    implements: Option<cst::ImplementsInterfaces>,
) -> Vec<Type> {
    implements
        .map(|implements| {
            implements
                .named_types()
                .filter_map(|ty| Some(reference(builder, text(ty.name()?))))
                .collect()
        })
        .unwrap_or_default()
}

fn mk_field(index: &Arc<TypeIndex>, field: &cst::FieldDefinition) -> Option<Node<FieldDefinition>> {
    Some(Node::new(FieldDefinition {
        name: text(field.name()?),
        description: description(field.description()),
        arguments: field
            .arguments_definition()
            .map(|arguments| {
                arguments
                    .input_value_definitions()
                    .filter_map(|argument| mk_input_value(index, &argument))
                    .collect()
            })
            .unwrap_or_default(),
        ty: mk_type(index, &field.ty()?)?,
        directives: convert_directives(field.directives()),
    }))
}

fn mk_input_value(
    index: &Arc<TypeIndex>,
    input_value: &cst::InputValueDefinition,
) -> Option<Node<InputValueDefinition>> {
    Some(Node::new(InputValueDefinition {
        name: text(input_value.name()?),
        description: description(input_value.description()),
        ty: mk_type(index, &input_value.ty()?)?,
        default_value: input_value
            .default_value()
            .and_then(|default| default.value())
            .and_then(|value| convert_value(&value))
            .map(Node::new),
        directives: convert_directives(input_value.directives()),
    }))
}

/// Builds a [`Type`] from the syntactic type, tracking nullability: SDL
/// types are nullable unless wrapped in `NonNull`, and list elements start
/// a fresh nullable scope.
pub(crate) fn mk_type(index: &Arc<TypeIndex>, ty: &cst::Type) -> Option<Type> {
    mk_type_inner(index, ty, true)
}

fn mk_type_inner(index: &Arc<TypeIndex>, ty: &cst::Type, nullable: bool) -> Option<Type> {
    let wrap = |ty: Type| if nullable { ty.nullable() } else { ty };
    match ty {
        cst::Type::NamedType(named) => Some(wrap(ref_type(index, text(named.name()?)))),
        cst::Type::ListType(list) => {
            Some(wrap(mk_type_inner(index, &list.ty()?, true)?.list()))
        }
        cst::Type::NonNullType(non_null) => {
            if let Some(named) = non_null.named_type() {
                Some(ref_type(index, text(named.name()?)))
            } else if let Some(list) = non_null.list_type() {
                Some(mk_type_inner(index, &list.ty()?, true)?.list())
            } else {
                None
            }
        }
    }
}

fn reference(builder: &SchemaBuilder, name: Name) -> Type {
    ref_type(&builder.index, name)
}

fn ref_type(index: &Arc<TypeIndex>, name: Name) -> Type {
    Type::Ref(TypeRef {
        index: Arc::downgrade(index),
        name,
    })
}

pub(crate) fn convert_directives(directives: Option<cst::Directives>) -> DirectiveList {
    DirectiveList(
        directives
            .map(|directives| {
                directives
                    .directives()
                    .filter_map(|directive| convert_directive(&directive))
                    .map(Node::new)
                    .collect()
            })
            .unwrap_or_default(),
    )
}

fn convert_directive(directive: &cst::Directive) -> Option<Directive> {
    Some(Directive {
        name: text(directive.name()?),
        arguments: directive
            .arguments()
            .map(|arguments| {
                arguments
                    .arguments()
                    .filter_map(|argument| convert_argument(&argument))
                    .collect()
            })
            .unwrap_or_default(),
    })
}

pub(crate) fn convert_argument(argument: &cst::Argument) -> Option<(Name, Node<Value>)> {
    Some((
        text(argument.name()?),
        Node::new(convert_value(&argument.value()?)?),
    ))
}

pub(crate) fn convert_value(value: &cst::Value) -> Option<Value> {
    Some(match value {
        cst::Value::Variable(variable) => Value::Variable(text(variable.name()?)),
        cst::Value::StringValue(string) => Value::String(String::from(string.clone())),
        cst::Value::FloatValue(float) => Value::Float(OrderedFloat(f64::try_from(float).ok()?)),
        cst::Value::IntValue(int) => Value::Int(i32::try_from(int).ok()?),
        cst::Value::BooleanValue(boolean) => Value::Boolean(bool::try_from(boolean).ok()?),
        cst::Value::NullValue(_) => Value::Null,
        cst::Value::EnumValue(value) => Value::Enum(text(value.name()?)),
        cst::Value::ListValue(list) => Value::List(
            list.values()
                .filter_map(|element| convert_value(&element))
                .collect(),
        ),
        cst::Value::ObjectValue(object) => Value::Object(
            object
                .object_fields()
                .filter_map(|field| {
                    Some((text(field.name()?), convert_value(&field.value()?)?))
                })
                .collect(),
        ),
    })
}

fn convert_location(location: cst::DirectiveLocation) -> Option<DirectiveLocation> {
    let token = location.syntax().first_token()?;
    Some(match token.kind() {
        S![QUERY] => DirectiveLocation::Query,
        S![MUTATION] => DirectiveLocation::Mutation,
        S![SUBSCRIPTION] => DirectiveLocation::Subscription,
        S![FIELD] => DirectiveLocation::Field,
        S![FRAGMENT_DEFINITION] => DirectiveLocation::FragmentDefinition,
        S![FRAGMENT_SPREAD] => DirectiveLocation::FragmentSpread,
        S![INLINE_FRAGMENT] => DirectiveLocation::InlineFragment,
        S![VARIABLE_DEFINITION] => DirectiveLocation::VariableDefinition,
        S![SCHEMA] => DirectiveLocation::Schema,
        S![SCALAR] => DirectiveLocation::Scalar,
        S![OBJECT] => DirectiveLocation::Object,
        S![FIELD_DEFINITION] => DirectiveLocation::FieldDefinition,
        S![ARGUMENT_DEFINITION] => DirectiveLocation::ArgumentDefinition,
        S![INTERFACE] => DirectiveLocation::Interface,
        S![UNION] => DirectiveLocation::Union,
        S![ENUM] => DirectiveLocation::Enum,
        S![ENUM_VALUE] => DirectiveLocation::EnumValue,
        S![INPUT_OBJECT] => DirectiveLocation::InputObject,
        S![INPUT_FIELD_DEFINITION] => DirectiveLocation::InputFieldDefinition,
        _ => return None,
    })
}

fn text(name: cst::Name) -> Name {
    name.text().as_str().to_string()
}

fn description(description: Option<cst::Description>) -> Option<String> {
    description
        .and_then(|description| description.string_value())
        .map(String::from)
}
