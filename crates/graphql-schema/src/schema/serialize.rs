//! Canonical SDL rendering.
//!
//! Deterministic output: two-space indentation, one field per line,
//! interface lists joined by `&`, union members by ` | `. The
//! `schema { ... }` block is elided when the root is the conventional
//! single `query: Query` with no directives, and the built-in directive
//! definitions are never re-printed. Types render in the order the schema
//! holds them, so rendering round-trips through the parser.

use super::built_in_directives;
use super::Schema;
use crate::node::Node;
use crate::ty::Directive;
use crate::ty::DirectiveDefinition;
use crate::ty::DirectiveList;
use crate::ty::EnumValueDefinition;
use crate::ty::FieldDefinition;
use crate::ty::InputValueDefinition;
use crate::ty::NamedType;
use crate::value::write_quoted;
use std::fmt;
use std::fmt::Write as _;

impl fmt::Display for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut definitions = Vec::new();
        let root = self.schema_type();
        if !elide_schema_block(&root) {
            definitions.push(render_schema_block(&root)?);
        }
        for ty in &self.types {
            definitions.push(ty.to_string());
        }
        for directive in &self.directives {
            if !built_in_directives().contains(directive) {
                definitions.push(render(|out| write_directive_definition(out, directive))?);
            }
        }
        for (i, definition) in definitions.iter().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            f.write_str(definition)?;
            f.write_str("\n")?;
        }
        Ok(())
    }
}

/// The block is implied when the root declares exactly one operation
/// field, its type is named `Query`, and the root is undirectived.
fn elide_schema_block(root: &NamedType) -> bool {
    let NamedType::Object(object) = root else {
        return false;
    };
    object.directives.is_empty()
        && object.fields.len() == 1
        && object.fields[0].name == "query"
        && object.fields[0]
            .ty
            .clone()
            .non_null()
            .name()
            .is_some_and(|name| name == "Query")
}

fn render_schema_block(root: &NamedType) -> Result<String, fmt::Error> {
    render(|out| {
        write_description(out, root.description(), "")?;
        write!(out, "schema{} {{", root.directives())?;
        if let NamedType::Object(object) = root {
            for field in &object.fields {
                let target = field.ty.clone().non_null();
                let target = target.name().map(|name| name.as_str()).unwrap_or_default();
                write!(out, "\n  {}: {}", field.name, target)?;
            }
        }
        out.write_str("\n}")
    })
}

impl fmt::Display for NamedType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_description(f, self.description(), "")?;
        match self {
            NamedType::Scalar(scalar) => {
                write!(f, "scalar {}{}", scalar.name, scalar.directives)
            }
            NamedType::Object(object) => {
                write!(f, "type {}", object.name)?;
                write_implements(f, &object.implements)?;
                write!(f, "{} {{", object.directives)?;
                for field in &object.fields {
                    write_field(f, field)?;
                }
                f.write_str("\n}")
            }
            NamedType::Interface(interface) => {
                write!(f, "interface {}", interface.name)?;
                write_implements(f, &interface.implements)?;
                write!(f, "{} {{", interface.directives)?;
                for field in &interface.fields {
                    write_field(f, field)?;
                }
                f.write_str("\n}")
            }
            NamedType::Union(union) => {
                write!(f, "union {}{} = ", union.name, union.directives)?;
                for (i, member) in union.members.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" | ")?;
                    }
                    f.write_str(member.name().map(|name| name.as_str()).unwrap_or_default())?;
                }
                Ok(())
            }
            NamedType::Enum(enum_) => {
                write!(f, "enum {}{} {{", enum_.name, enum_.directives)?;
                for value in &enum_.values {
                    write_enum_value(f, value)?;
                }
                f.write_str("\n}")
            }
            NamedType::InputObject(input_object) => {
                write!(f, "input {}{} {{", input_object.name, input_object.directives)?;
                for field in &input_object.fields {
                    write_description(f, field.description.as_deref(), "\n  ")?;
                    f.write_str("\n  ")?;
                    write_input_value(f, field)?;
                }
                f.write_str("\n}")
            }
        }
    }
}

fn write_implements(f: &mut impl fmt::Write, implements: &[crate::ty::Type]) -> fmt::Result {
    for (i, interface) in implements.iter().enumerate() {
        f.write_str(if i == 0 { " implements " } else { " & " })?;
        f.write_str(interface.name().map(|name| name.as_str()).unwrap_or_default())?;
    }
    Ok(())
}

fn write_field(f: &mut impl fmt::Write, field: &Node<FieldDefinition>) -> fmt::Result {
    write_description(f, field.description.as_deref(), "\n  ")?;
    write!(f, "\n  {}", field.name)?;
    write_argument_definitions(f, &field.arguments)?;
    write!(f, ": {}{}", field.ty, field.directives)
}

fn write_argument_definitions(
    f: &mut impl fmt::Write,
    arguments: &[Node<InputValueDefinition>],
) -> fmt::Result {
    for (i, argument) in arguments.iter().enumerate() {
        f.write_str(if i == 0 { "(" } else { ", " })?;
        if let Some(description) = &argument.description {
            write_quoted(f, description)?;
            f.write_str(" ")?;
        }
        write_input_value(f, argument)?;
    }
    if !arguments.is_empty() {
        f.write_str(")")?;
    }
    Ok(())
}

fn write_input_value(f: &mut impl fmt::Write, value: &Node<InputValueDefinition>) -> fmt::Result {
    write!(f, "{}: {}", value.name, value.ty)?;
    if let Some(default) = &value.default_value {
        write!(f, " = {}", default.as_ref())?;
    }
    write!(f, "{}", value.directives)
}

fn write_enum_value(f: &mut impl fmt::Write, value: &Node<EnumValueDefinition>) -> fmt::Result {
    write_description(f, value.description.as_deref(), "\n  ")?;
    write!(f, "\n  {}{}", value.value, value.directives)
}

fn write_directive_definition(
    f: &mut impl fmt::Write,
    definition: &Node<DirectiveDefinition>,
) -> fmt::Result {
    write_description(f, definition.description.as_deref(), "")?;
    write!(f, "directive @{}", definition.name)?;
    write_argument_definitions(f, &definition.arguments)?;
    if definition.repeatable {
        f.write_str(" repeatable")?;
    }
    for (i, location) in definition.locations.iter().enumerate() {
        f.write_str(if i == 0 { " on " } else { " | " })?;
        f.write_str(location.name())?;
    }
    Ok(())
}

fn write_description(
    f: &mut impl fmt::Write,
    description: Option<&str>,
    prefix: &str,
) -> fmt::Result {
    if let Some(description) = description {
        f.write_str(prefix)?;
        write_quoted(f, description)?;
        if prefix.is_empty() {
            f.write_str("\n")?;
        }
    }
    Ok(())
}

/// Directives render as `@name` or `@name(a: v, …)`.
impl fmt::Display for Directive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}", self.name)?;
        for (i, (name, value)) in self.arguments.iter().enumerate() {
            f.write_str(if i == 0 { "(" } else { ", " })?;
            write!(f, "{}: {}", name, value.as_ref())?;
        }
        if !self.arguments.is_empty() {
            f.write_str(")")?;
        }
        Ok(())
    }
}

/// Each applied directive with a leading space, so lists drop in after a
/// name: `type Query @a @b`.
impl fmt::Display for DirectiveList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for directive in &self.0 {
            write!(f, " {}", directive.as_ref())?;
        }
        Ok(())
    }
}

fn render(write: impl FnOnce(&mut String) -> fmt::Result) -> Result<String, fmt::Error> {
    let mut out = String::new();
    write(&mut out)?;
    Ok(out)
}
