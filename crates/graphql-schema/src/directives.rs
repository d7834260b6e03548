//! Directive occurrence and argument validation, across schemas and
//! queries.
//!
//! Every site where directives may appear is visited with the matching
//! [`DirectiveLocation`]. Per site, occurrence problems (undefined
//! directives and illegal locations, then illegal repetition) are reported
//! before argument problems (unknown arguments, then coercion failures).

use crate::coercion::coerce_value;
use crate::executable::FragmentDefinition;
use crate::executable::OperationDefinition;
use crate::executable::Selection;
use crate::node::Node;
use crate::result::Checked;
use crate::result::Problem;
use crate::schema::Schema;
use crate::ty::Directive;
use crate::ty::DirectiveDefinition;
use crate::ty::DirectiveLocation;
use crate::ty::DirectiveList;
use crate::ty::InputValueDefinition;
use crate::ty::NamedType;
use crate::value::Value;
use crate::Name;
use indexmap::IndexMap;

/// Validates every directive attached to any schema component, pairing each
/// site with its [`DirectiveLocation`]. Problems come back in document
/// order.
pub fn validate_schema_directives(schema: &Schema) -> Vec<Problem> {
    let vars = IndexMap::new();
    let mut problems = Vec::new();
    let mut validate = |dirs: &DirectiveList, location| {
        problems.extend(validate_directives(schema, dirs, location, &vars));
    };
    validate(schema.schema_type().directives(), DirectiveLocation::Schema);
    for ty in &schema.types {
        match ty {
            NamedType::Scalar(scalar) => {
                validate(&scalar.directives, DirectiveLocation::Scalar);
            }
            NamedType::Object(object) => {
                validate(&object.directives, DirectiveLocation::Object);
                for field in &object.fields {
                    validate(&field.directives, DirectiveLocation::FieldDefinition);
                    for argument in &field.arguments {
                        validate(&argument.directives, DirectiveLocation::ArgumentDefinition);
                    }
                }
            }
            NamedType::Interface(interface) => {
                validate(&interface.directives, DirectiveLocation::Interface);
                for field in &interface.fields {
                    validate(&field.directives, DirectiveLocation::FieldDefinition);
                    for argument in &field.arguments {
                        validate(&argument.directives, DirectiveLocation::ArgumentDefinition);
                    }
                }
            }
            NamedType::Union(union) => {
                validate(&union.directives, DirectiveLocation::Union);
            }
            NamedType::Enum(enum_) => {
                validate(&enum_.directives, DirectiveLocation::Enum);
                for value in &enum_.values {
                    validate(&value.directives, DirectiveLocation::EnumValue);
                }
            }
            NamedType::InputObject(input_object) => {
                validate(&input_object.directives, DirectiveLocation::InputObject);
                for field in &input_object.fields {
                    validate(&field.directives, DirectiveLocation::InputFieldDefinition);
                }
            }
        }
    }
    for directive in &schema.directives {
        for argument in &directive.arguments {
            problems.extend(validate_directives(
                schema,
                &argument.directives,
                DirectiveLocation::ArgumentDefinition,
                &vars,
            ));
        }
    }
    problems
}

/// Validates every directive in a query tree: the operation itself, its
/// variable definitions, fields, fragment spreads, inline fragments and
/// fragment definitions. Problems come back in pre-order.
pub fn validate_query_directives(
    schema: &Schema,
    operation: &OperationDefinition,
    fragments: &[Node<FragmentDefinition>],
    vars: &IndexMap<Name, Value>,
) -> Checked<()> {
    let mut problems = Vec::new();
    problems.extend(validate_directives(
        schema,
        &operation.directives,
        operation.operation_type.directive_location(),
        vars,
    ));
    for variable in &operation.variables {
        problems.extend(validate_directives(
            schema,
            &variable.directives,
            DirectiveLocation::VariableDefinition,
            vars,
        ));
    }
    validate_selection_directives(schema, &operation.selection_set, vars, &mut problems);
    for fragment in fragments {
        problems.extend(validate_directives(
            schema,
            &fragment.directives,
            DirectiveLocation::FragmentDefinition,
            vars,
        ));
        validate_selection_directives(schema, &fragment.selection_set, vars, &mut problems);
    }
    if problems.is_empty() {
        Checked::Success(())
    } else {
        Checked::Failure(problems)
    }
}

fn validate_selection_directives(
    schema: &Schema,
    selections: &[Selection],
    vars: &IndexMap<Name, Value>,
    problems: &mut Vec<Problem>,
) {
    for selection in selections {
        match selection {
            Selection::Field(field) => {
                problems.extend(validate_directives(
                    schema,
                    &field.directives,
                    DirectiveLocation::Field,
                    vars,
                ));
                validate_selection_directives(schema, &field.selection_set, vars, problems);
            }
            Selection::FragmentSpread(spread) => {
                problems.extend(validate_directives(
                    schema,
                    &spread.directives,
                    DirectiveLocation::FragmentSpread,
                    vars,
                ));
            }
            Selection::InlineFragment(inline) => {
                problems.extend(validate_directives(
                    schema,
                    &inline.directives,
                    DirectiveLocation::InlineFragment,
                    vars,
                ));
                validate_selection_directives(schema, &inline.selection_set, vars, problems);
            }
        }
    }
}

/// Validates one directive site.
pub fn validate_directives(
    schema: &Schema,
    directives: &DirectiveList,
    location: DirectiveLocation,
    vars: &IndexMap<Name, Value>,
) -> Vec<Problem> {
    let mut problems = Vec::new();
    for directive in directives {
        match schema.directive_definition(&directive.name) {
            None => problems.push(Problem::UndefinedDirective(directive.name.clone())),
            Some(definition) if !definition.locations.contains(&location) => {
                problems.push(Problem::MisplacedDirective {
                    name: directive.name.clone(),
                    location,
                })
            }
            Some(_) => {}
        }
    }
    let mut occurrences: IndexMap<&Name, usize> = IndexMap::new();
    for directive in directives {
        *occurrences.entry(&directive.name).or_insert(0) += 1;
    }
    for (name, count) in occurrences {
        if count > 1 {
            // Unknown directives are presumed repeatable
            let repeatable = schema
                .directive_definition(name)
                .map(|definition| definition.repeatable)
                .unwrap_or(true);
            if !repeatable {
                problems.push(Problem::RepeatedDirective(name.clone()));
            }
        }
    }
    for directive in directives {
        if let Some(definition) = schema.directive_definition(&directive.name) {
            let (argument_problems, _) = elaborate_arguments(directive, definition, vars);
            problems.extend(argument_problems);
        }
    }
    problems
}

/// Rewrites a directive list with fully-resolved argument bindings:
/// variables substituted and every value coerced through its argument
/// definition.
pub fn elaborate_directives(
    schema: &Schema,
    directives: &DirectiveList,
    vars: &IndexMap<Name, Value>,
) -> Checked<DirectiveList> {
    Checked::traverse(directives, |directive| {
        let Some(definition) = schema.directive_definition(&directive.name) else {
            return Checked::failure(Problem::UndefinedDirective(directive.name.clone()));
        };
        let (problems, bindings) = elaborate_arguments(directive, definition, vars);
        if problems.is_empty() {
            Checked::Success(Node::new(Directive {
                name: directive.name.clone(),
                arguments: bindings
                    .into_iter()
                    .map(|(name, value)| (name, Node::new(value)))
                    .collect(),
            }))
        } else {
            Checked::Failure(problems)
        }
    })
    .map(DirectiveList)
}

/// Checks applied arguments against the definition and coerces each declared
/// argument, returning problems and the resolved bindings. Bindings whose
/// coerced value is `Absent` are dropped.
fn elaborate_arguments(
    directive: &Directive,
    definition: &DirectiveDefinition,
    vars: &IndexMap<Name, Value>,
) -> (Vec<Problem>, Vec<(Name, Value)>) {
    let mut problems = Vec::new();
    let mut bindings = Vec::new();
    for (name, _) in &directive.arguments {
        if definition.argument(name).is_none() {
            problems.push(Problem::UnknownDirectiveArgument {
                argument: name.clone(),
                directive: directive.name.clone(),
            });
        }
    }
    let location = format!("directive '@{}'", directive.name);
    for argument in &definition.arguments {
        match coerce_argument(argument, directive.argument(&argument.name), vars, &location) {
            Checked::Success(value) | Checked::Warning(_, value) => {
                if value != Value::Absent {
                    bindings.push((argument.name.clone(), value));
                }
            }
            Checked::Failure(more) => problems.extend(more),
            Checked::InternalError(err) => problems.push(Problem::Internal(err)),
        }
    }
    (problems, bindings)
}

fn coerce_argument(
    argument: &InputValueDefinition,
    supplied: Option<&Node<Value>>,
    vars: &IndexMap<Name, Value>,
    location: &str,
) -> Checked<Value> {
    match supplied {
        Some(value) => value
            .elaborate(vars)
            .and_then(|value| coerce_value(argument, Some(&value), location)),
        None => coerce_value(argument, None, location),
    }
}
