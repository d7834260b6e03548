//! Post-construction schema checks.
//!
//! Four independent passes plus directive validation, each appending to one
//! flat problem list in document order: reference resolution, unique type
//! names, unique enum values, and interface implementation conformance.

use super::Schema;
use crate::node::Node;
use crate::result::Problem;
use crate::ty::InputValueDefinition;
use crate::ty::NamedType;
use crate::ty::Type;

pub(crate) fn validate_schema(schema: &Schema) -> Vec<Problem> {
    let mut problems = Vec::new();
    check_references(schema, &mut problems);
    check_schema_root(schema, &mut problems);
    check_unique_type_names(schema, &mut problems);
    check_unique_enum_values(schema, &mut problems);
    check_implementations(schema, &mut problems);
    problems.extend(crate::directives::validate_schema_directives(schema));
    problems
}

/// Every named type mentioned in field types, argument types, implements
/// lists and union members must resolve against the built-ins or the
/// declared types.
fn check_references(schema: &Schema, problems: &mut Vec<Problem>) {
    for ty in &schema.types {
        match ty {
            NamedType::Object(object) => {
                for field in &object.fields {
                    check_reference(schema, &field.ty, problems);
                    for argument in &field.arguments {
                        check_reference(schema, &argument.ty, problems);
                    }
                }
                for implemented in &object.implements {
                    check_reference(schema, implemented, problems);
                }
            }
            NamedType::Interface(interface) => {
                for field in &interface.fields {
                    check_reference(schema, &field.ty, problems);
                    for argument in &field.arguments {
                        check_reference(schema, &argument.ty, problems);
                    }
                }
                for implemented in &interface.implements {
                    check_reference(schema, implemented, problems);
                }
            }
            NamedType::Union(union) => {
                for member in &union.members {
                    check_reference(schema, member, problems);
                }
            }
            NamedType::InputObject(input_object) => {
                for field in &input_object.fields {
                    check_reference(schema, &field.ty, problems);
                }
            }
            NamedType::Scalar(_) | NamedType::Enum(_) => {}
        }
    }
    for directive in &schema.directives {
        for argument in &directive.arguments {
            check_reference(schema, &argument.ty, problems);
        }
    }
}

fn check_reference(schema: &Schema, ty: &Type, problems: &mut Vec<Problem>) {
    match ty {
        Type::Ref(reference) => {
            if schema.definition(&reference.name).is_none() {
                problems.push(Problem::UndefinedType(reference.name.clone()));
            }
        }
        Type::List(inner) | Type::Nullable(inner) => check_reference(schema, inner, problems),
        // Resolved named nodes need no lookup
        _ => {}
    }
}

/// Root operation types must resolve, and a query root is mandatory:
/// either a `schema` block names one or a `Query` type implies the
/// default. A schema with neither cannot execute anything.
fn check_schema_root(schema: &Schema, problems: &mut Vec<Problem>) {
    let NamedType::Object(root) = schema.schema_type() else {
        return;
    };
    for field in &root.fields {
        check_reference(schema, &field.ty, problems);
    }
    if !root.fields.iter().any(|field| field.name == "query") {
        problems.push(Problem::MissingQueryRoot);
    }
}

fn check_unique_type_names(schema: &Schema, problems: &mut Vec<Problem>) {
    let mut seen = Vec::new();
    for ty in &schema.types {
        let name = ty.name();
        if seen.contains(&name) {
            problems.push(Problem::DuplicateType(name.clone()));
        } else {
            seen.push(name);
        }
    }
}

fn check_unique_enum_values(schema: &Schema, problems: &mut Vec<Problem>) {
    for ty in &schema.types {
        let NamedType::Enum(enum_) = ty else {
            continue;
        };
        let mut seen = Vec::new();
        for value in &enum_.values {
            if seen.contains(&&value.value) {
                problems.push(Problem::DuplicateEnumValue {
                    value: value.value.clone(),
                    enum_name: enum_.name.clone(),
                });
            } else {
                seen.push(&value.value);
            }
        }
    }
}

/// Every field of an implemented interface must exist on the implementing
/// type with an identical argument list and a covariant return type; every
/// entry of an `implements` list must actually be an interface.
fn check_implementations(schema: &Schema, problems: &mut Vec<Problem>) {
    for ty in &schema.types {
        let (type_name, fields, implements) = match ty {
            NamedType::Object(object) => (&object.name, &object.fields, &object.implements),
            NamedType::Interface(interface) => {
                (&interface.name, &interface.fields, &interface.implements)
            }
            _ => continue,
        };
        for implemented in implements {
            let interface = match implemented.dealias() {
                Type::Interface(interface) => interface,
                // Unresolved refs are reported by the reference pass
                Type::Ref(_) => continue,
                other => {
                    problems.push(Problem::NonInterfaceImplemented {
                        type_name: type_name.clone(),
                        implemented: other.name().cloned().unwrap_or_default(),
                    });
                    continue;
                }
            };
            for interface_field in &interface.fields {
                match fields.iter().find(|f| f.name == interface_field.name) {
                    None => problems.push(Problem::MissingInterfaceField {
                        field: interface_field.name.clone(),
                        interface: interface.name.clone(),
                        type_name: type_name.clone(),
                    }),
                    Some(field) => {
                        if !same_arguments(&field.arguments, &interface_field.arguments) {
                            problems.push(Problem::MismatchedFieldArguments {
                                field: field.name.clone(),
                                interface: interface.name.clone(),
                                type_name: type_name.clone(),
                            });
                        }
                        if !field.ty.is_subtype_of(&interface_field.ty) {
                            problems.push(Problem::IncompatibleFieldType {
                                field: field.name.clone(),
                                interface: interface.name.clone(),
                                type_name: type_name.clone(),
                            });
                        }
                    }
                }
            }
        }
    }
}

/// Exact equality by position, name and type identity.
fn same_arguments(
    implementing: &[Node<InputValueDefinition>],
    declared: &[Node<InputValueDefinition>],
) -> bool {
    implementing.len() == declared.len()
        && implementing
            .iter()
            .zip(declared)
            .all(|(a, b)| a.name == b.name && a.ty.equiv(&b.ty))
}
