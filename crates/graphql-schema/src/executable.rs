//! Executable documents: operations, fragments and selections.
//!
//! This is the query-side tree that directive validation traverses; query
//! elaboration and execution live outside this crate and consume the same
//! types. Parsed from the external CST, with variable types resolved
//! against a schema.

use crate::node::Node;
use crate::result::Checked;
use crate::schema::from_cst;
use crate::schema::Schema;
use crate::ty::DirectiveList;
use crate::ty::DirectiveLocation;
use crate::ty::Type;
use crate::value::Value;
use crate::Name;
use apollo_parser::cst;
use apollo_parser::cst::CstNode;
use apollo_parser::S;

#[derive(Copy, Clone, Debug, Hash, PartialEq, Eq)]
pub enum OperationType {
    Query,
    Mutation,
    Subscription,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExecutableDocument {
    pub operations: Vec<Node<OperationDefinition>>,
    pub fragments: Vec<Node<FragmentDefinition>>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OperationDefinition {
    pub operation_type: OperationType,
    pub name: Option<Name>,
    pub variables: Vec<Node<VariableDefinition>>,
    pub directives: DirectiveList,
    pub selection_set: Vec<Selection>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FragmentDefinition {
    pub name: Name,
    pub type_condition: Name,
    pub directives: DirectiveList,
    pub selection_set: Vec<Selection>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VariableDefinition {
    pub name: Name,
    pub ty: Type,
    pub default_value: Option<Node<Value>>,
    pub directives: DirectiveList,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Selection {
    Field(Node<Field>),
    FragmentSpread(Node<FragmentSpread>),
    InlineFragment(Node<InlineFragment>),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Field {
    pub alias: Option<Name>,
    pub name: Name,
    pub arguments: Vec<(Name, Node<Value>)>,
    pub directives: DirectiveList,
    pub selection_set: Vec<Selection>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FragmentSpread {
    pub fragment_name: Name,
    pub directives: DirectiveList,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InlineFragment {
    pub type_condition: Option<Name>,
    pub directives: DirectiveList,
    pub selection_set: Vec<Selection>,
}

impl OperationType {
    pub fn name(&self) -> &'static str {
        match self {
            OperationType::Query => "query",
            OperationType::Mutation => "mutation",
            OperationType::Subscription => "subscription",
        }
    }

    /// The directive location of an operation of this kind.
    pub fn directive_location(&self) -> DirectiveLocation {
        match self {
            OperationType::Query => DirectiveLocation::Query,
            OperationType::Mutation => DirectiveLocation::Mutation,
            OperationType::Subscription => DirectiveLocation::Subscription,
        }
    }
}

impl ExecutableDocument {
    /// Parses an executable document against `schema`, with the default
    /// parser configuration.
    pub fn parse(schema: &Schema, source_text: &str) -> Checked<ExecutableDocument> {
        crate::parser::Parser::new().parse_executable(schema, source_text)
    }

    /// Finds an operation by name, or the sole operation when `name` is
    /// `None`.
    pub fn operation(&self, name: Option<&str>) -> Option<&Node<OperationDefinition>> {
        match name {
            Some(name) => self
                .operations
                .iter()
                .find(|op| op.name.as_deref() == Some(name)),
            None => match self.operations.as_slice() {
                [single] => Some(single),
                _ => None,
            },
        }
    }
}

pub(crate) fn document_from_cst(schema: &Schema, document: &cst::Document) -> ExecutableDocument {
    let mut operations = Vec::new();
    let mut fragments = Vec::new();
    for definition in document.definitions() {
        match definition {
            cst::Definition::OperationDefinition(op) => {
                if let Some(op) = convert_operation(schema, &op) {
                    operations.push(Node::new(op));
                }
            }
            cst::Definition::FragmentDefinition(fragment) => {
                if let Some(fragment) = convert_fragment(&fragment) {
                    fragments.push(Node::new(fragment));
                }
            }
            // Type-system definitions are not executable
            _ => {}
        }
    }
    ExecutableDocument {
        operations,
        fragments,
    }
}

fn convert_operation(
    schema: &Schema,
    op: &cst::OperationDefinition,
) -> Option<OperationDefinition> {
    // Shorthand `{ ... }` documents are queries
    let operation_type = match op.operation_type() {
        Some(ty) => convert_operation_type(&ty)?,
        None => OperationType::Query,
    };
    Some(OperationDefinition {
        operation_type,
        name: op.name().map(|n| n.text().as_str().to_string()),
        variables: op
            .variable_definitions()
            .map(|defs| {
                defs.variable_definitions()
                    .filter_map(|def| convert_variable_definition(schema, &def))
                    .map(Node::new)
                    .collect()
            })
            .unwrap_or_default(),
        directives: from_cst::convert_directives(op.directives()),
        selection_set: convert_selection_set(op.selection_set()?),
    })
}

fn convert_operation_type(ty: &cst::OperationType) -> Option<OperationType> {
    let token = ty.syntax().first_token()?;
    match token.kind() {
        S![query] => Some(OperationType::Query),
        S![mutation] => Some(OperationType::Mutation),
        S![subscription] => Some(OperationType::Subscription),
        _ => None,
    }
}

fn convert_variable_definition(
    schema: &Schema,
    def: &cst::VariableDefinition,
) -> Option<VariableDefinition> {
    Some(VariableDefinition {
        name: def.variable()?.name()?.text().as_str().to_string(),
        ty: from_cst::mk_type(&schema.index, &def.ty()?)?,
        default_value: def
            .default_value()
            .and_then(|default| default.value())
            .and_then(|value| from_cst::convert_value(&value))
            .map(Node::new),
        directives: from_cst::convert_directives(def.directives()),
    })
}

fn convert_fragment(fragment: &cst::FragmentDefinition) -> Option<FragmentDefinition> {
    Some(FragmentDefinition {
        name: fragment.fragment_name()?.name()?.text().as_str().to_string(),
        type_condition: fragment
            .type_condition()?
            .named_type()?
            .name()?
            .text()
            .as_str()
            .to_string(),
        directives: from_cst::convert_directives(fragment.directives()),
        selection_set: convert_selection_set(fragment.selection_set()?),
    })
}

fn convert_selection_set(selection_set: cst::SelectionSet) -> Vec<Selection> {
    selection_set
        .selections()
        .filter_map(|selection| convert_selection(&selection))
        .collect()
}

fn convert_selection(selection: &cst::Selection) -> Option<Selection> {
    Some(match selection {
        cst::Selection::Field(field) => Selection::Field(Node::new(Field {
            alias: field
                .alias()
                .and_then(|alias| alias.name())
                .map(|n| n.text().as_str().to_string()),
            name: field.name()?.text().as_str().to_string(),
            arguments: field
                .arguments()
                .map(|args| {
                    args.arguments()
                        .filter_map(|arg| from_cst::convert_argument(&arg))
                        .collect()
                })
                .unwrap_or_default(),
            directives: from_cst::convert_directives(field.directives()),
            // A field without sub-selections has an empty set
            selection_set: field
                .selection_set()
                .map(convert_selection_set)
                .unwrap_or_default(),
        })),
        cst::Selection::FragmentSpread(spread) => {
            Selection::FragmentSpread(Node::new(FragmentSpread {
                fragment_name: spread.fragment_name()?.name()?.text().as_str().to_string(),
                directives: from_cst::convert_directives(spread.directives()),
            }))
        }
        cst::Selection::InlineFragment(inline) => {
            Selection::InlineFragment(Node::new(InlineFragment {
                type_condition: inline
                    .type_condition()
                    .and_then(|cond| cond.named_type())
                    .and_then(|named| named.name())
                    .map(|n| n.text().as_str().to_string()),
                directives: from_cst::convert_directives(inline.directives()),
                selection_set: convert_selection_set(inline.selection_set()?),
            }))
        }
    })
}
