//! The schema container: named types, directive definitions and the root
//! operation types, plus the builder that seals a schema after imperative
//! construction.
//!
//! A schema is built once (usually by [`Schema::parse`]) and is read-only
//! afterwards; it can be traversed freely from any number of threads.

use crate::node::Node;
use crate::result::Checked;
use crate::ty::DirectiveDefinition;
use crate::ty::DirectiveLocation;
use crate::ty::DirectiveList;
use crate::ty::FieldDefinition;
use crate::ty::InputValueDefinition;
use crate::ty::NamedType;
use crate::ty::ObjectType;
use crate::ty::ScalarType;
use crate::ty::Type;
use crate::ty::TypeRef;
use crate::value::Value;
use crate::Name;
use indexmap::IndexMap;
use std::sync::Arc;
use std::sync::OnceLock;

pub(crate) mod from_cst;
mod serialize;
pub(crate) mod validation;

#[derive(Clone, Debug)]
pub struct Schema {
    /// The named types, in declaration order. Rendering follows this order.
    pub types: Vec<NamedType>,
    /// Declared directive definitions followed by the built-ins `@skip`,
    /// `@include` and `@deprecated` (which are always present).
    pub directives: Vec<Node<DirectiveDefinition>>,
    pub(crate) schema_type: Option<NamedType>,
    pub(crate) index: Arc<TypeIndex>,
}

/// The sealed name → definition map shared between a [`Schema`] and every
/// [`TypeRef`] handed out during its construction. Empty until the builder
/// calls [`SchemaBuilder::complete`].
#[derive(Debug, Default)]
pub(crate) struct TypeIndex(OnceLock<IndexMap<Name, NamedType>>);

impl TypeIndex {
    pub(crate) fn lookup(&self, name: &str) -> Option<NamedType> {
        self.0
            .get()
            .and_then(|types| types.get(name).cloned())
            .or_else(|| built_in_scalar(name).map(NamedType::Scalar))
    }
}

impl Schema {
    /// Parses an SDL document into a validated schema, with the default
    /// parser configuration. Use [`crate::Parser`] to change limits.
    pub fn parse(source_text: &str) -> Checked<Schema> {
        crate::parser::Parser::new().parse_schema(source_text)
    }

    pub fn builder() -> SchemaBuilder {
        SchemaBuilder::new()
    }

    /// Looks up a named type; built-in scalars resolve implicitly even when
    /// not declared. The result is always dealiased.
    pub fn definition(&self, name: &str) -> Option<NamedType> {
        self.index.lookup(name)
    }

    /// A cheap by-name handle into this schema. Never fails; an undefined
    /// name surfaces later, during validation or on `dealias`.
    pub fn type_ref(&self, name: impl Into<Name>) -> TypeRef {
        TypeRef {
            index: Arc::downgrade(&self.index),
            name: name.into(),
        }
    }

    pub fn directive_definition(&self, name: &str) -> Option<&Node<DirectiveDefinition>> {
        self.directives.iter().find(|d| d.name == name)
    }

    /// The root object: the declared `schema { ... }` type if the document
    /// had one, otherwise the default
    /// `{ query: Query!, mutation: Mutation, subscription: Subscription }`
    /// built from whichever of those types exist.
    pub fn schema_type(&self) -> NamedType {
        if let Some(ty) = &self.schema_type {
            return ty.clone();
        }
        let mut fields = Vec::new();
        let mut root_field = |field_name: &str, type_name: &str, nullable: bool| {
            if self.definition(type_name).is_some() {
                let ty = Type::Ref(self.type_ref(type_name));
                fields.push(Node::new(FieldDefinition {
                    name: field_name.into(),
                    description: None,
                    arguments: Vec::new(),
                    ty: if nullable { ty.nullable() } else { ty },
                    directives: DirectiveList::new(),
                }));
            }
        };
        root_field("query", "Query", false);
        root_field("mutation", "Mutation", true);
        root_field("subscription", "Subscription", true);
        NamedType::Object(Node::new(ObjectType {
            name: "Schema".into(),
            description: None,
            fields,
            implements: Vec::new(),
            directives: DirectiveList::new(),
        }))
    }

    /// The object type `query` operations execute against.
    pub fn query_type(&self) -> Option<Type> {
        self.root_operation_type("query")
    }

    pub fn mutation_type(&self) -> Option<Type> {
        self.root_operation_type("mutation")
    }

    pub fn subscription_type(&self) -> Option<Type> {
        self.root_operation_type("subscription")
    }

    fn root_operation_type(&self, operation: &str) -> Option<Type> {
        Type::from(self.schema_type())
            .field(operation)
            .map(|ty| ty.non_null().dealias())
    }

    pub fn is_root_type(&self, ty: &Type) -> bool {
        self.query_type().is_some_and(|root| root.equiv(ty))
            || self.mutation_type().is_some_and(|root| root.equiv(ty))
            || self.subscription_type().is_some_and(|root| root.equiv(ty))
    }

    /// Whether every object subtype of `ty` is covered by some branch.
    /// Drives interface and union fragment coverage checks.
    pub fn exhaustive(&self, ty: &Type, branches: &[Type]) -> bool {
        self.types
            .iter()
            .filter(|t| t.is_object())
            .map(|t| Type::from(t.clone()))
            .filter(|object| object.is_subtype_of(ty))
            .all(|object| branches.iter().any(|branch| object.is_subtype_of(branch)))
    }

    /// Whether `ty` may be used as an input type.
    pub fn is_input_type(&self, ty: &Type) -> bool {
        match ty.underlying() {
            Type::Scalar(_) | Type::Enum(_) | Type::InputObject(_) => true,
            Type::Ref(r) => r.dealias().is_some_and(|t| t.is_input_type()),
            _ => false,
        }
    }

    /// Whether `ty` may be used as an output type.
    pub fn is_output_type(&self, ty: &Type) -> bool {
        match ty.underlying() {
            Type::Scalar(_)
            | Type::Enum(_)
            | Type::Object(_)
            | Type::Interface(_)
            | Type::Union(_) => true,
            Type::Ref(r) => r.dealias().is_some_and(|t| t.is_output_type()),
            _ => false,
        }
    }
}

/// Imperative construction of a [`Schema`]. Type references created through
/// [`SchemaBuilder::type_ref`] resolve only once [`SchemaBuilder::complete`]
/// seals the type index, which is what lets mutually recursive types be
/// built in one pass.
pub struct SchemaBuilder {
    types: Vec<NamedType>,
    directives: Vec<Node<DirectiveDefinition>>,
    schema_type: Option<NamedType>,
    index: Arc<TypeIndex>,
}

impl Default for SchemaBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SchemaBuilder {
    pub fn new() -> Self {
        SchemaBuilder {
            types: Vec::new(),
            directives: Vec::new(),
            schema_type: None,
            index: Arc::new(TypeIndex::default()),
        }
    }

    /// A by-name handle that will resolve against the completed schema.
    pub fn type_ref(&self, name: impl Into<Name>) -> TypeRef {
        TypeRef {
            index: Arc::downgrade(&self.index),
            name: name.into(),
        }
    }

    pub fn add_type(&mut self, ty: NamedType) {
        self.types.push(ty);
    }

    pub fn add_directive(&mut self, directive: Node<DirectiveDefinition>) {
        self.directives.push(directive);
    }

    pub fn set_schema_type(&mut self, ty: NamedType) {
        self.schema_type = Some(ty);
    }

    /// Seals the type index and appends the built-in directive definitions,
    /// yielding an observationally immutable schema. Duplicate type names
    /// keep their first definition in the index; the duplicates stay in
    /// `types` for the validator to report.
    pub fn complete(self) -> Schema {
        let SchemaBuilder {
            types,
            mut directives,
            schema_type,
            index,
        } = self;
        for built_in in built_in_directives() {
            if !directives.iter().any(|d| d.name == built_in.name) {
                directives.push(built_in.clone());
            }
        }
        let mut by_name = IndexMap::new();
        for ty in &types {
            by_name
                .entry(ty.name().clone())
                .or_insert_with(|| ty.clone());
        }
        // The builder is the only holder of this Arc, so this cannot fail.
        index.0.set(by_name).expect("schema index already sealed");
        Schema {
            types,
            directives,
            schema_type,
            index,
        }
    }
}

/// The five built-in scalars. They resolve implicitly even when a document
/// never declares them.
pub(crate) fn built_in_scalar(name: &str) -> Option<Node<ScalarType>> {
    static SCALARS: OnceLock<[Node<ScalarType>; 5]> = OnceLock::new();
    SCALARS
        .get_or_init(|| {
            ["Int", "Float", "String", "Boolean", "ID"].map(|name| {
                Node::new(ScalarType {
                    name: name.into(),
                    description: None,
                    directives: DirectiveList::new(),
                })
            })
        })
        .iter()
        .find(|scalar| scalar.name == name)
        .cloned()
}

/// `@skip`, `@include` and `@deprecated`, present in every schema.
pub(crate) fn built_in_directives() -> &'static [Node<DirectiveDefinition>] {
    static DIRECTIVES: OnceLock<[Node<DirectiveDefinition>; 3]> = OnceLock::new();
    DIRECTIVES.get_or_init(|| {
        let boolean = || Type::Scalar(built_in_scalar("Boolean").unwrap());
        let string = || Type::Scalar(built_in_scalar("String").unwrap());
        let if_argument = || {
            Node::new(InputValueDefinition {
                name: "if".into(),
                description: None,
                ty: boolean(),
                default_value: None,
                directives: DirectiveList::new(),
            })
        };
        let conditional = |name: &str| {
            Node::new(DirectiveDefinition {
                name: name.into(),
                description: None,
                arguments: vec![if_argument()],
                repeatable: false,
                locations: vec![
                    DirectiveLocation::Field,
                    DirectiveLocation::FragmentSpread,
                    DirectiveLocation::InlineFragment,
                ],
            })
        };
        [
            conditional("skip"),
            conditional("include"),
            Node::new(DirectiveDefinition {
                name: "deprecated".into(),
                description: None,
                arguments: vec![Node::new(InputValueDefinition {
                    name: "reason".into(),
                    description: None,
                    ty: string().nullable(),
                    default_value: Some(Node::new(Value::String("No longer supported".into()))),
                    directives: DirectiveList::new(),
                })],
                repeatable: false,
                locations: vec![
                    DirectiveLocation::FieldDefinition,
                    DirectiveLocation::EnumValue,
                ],
            }),
        ]
    })
}
