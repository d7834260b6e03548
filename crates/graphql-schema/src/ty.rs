//! The GraphQL type algebra: named type definitions, the `List`/`Nullable`
//! modifiers, by-name references that close recursive type cycles, and the
//! equivalence and subtype relations every downstream consumer depends on.
//!
//! Following the external syntax, non-null is the default in SDL; internally
//! it is the other way round: every type is non-null unless wrapped in
//! [`Type::Nullable`]. `Nullable` never nests.

use crate::node::Node;
use crate::schema::TypeIndex;
use crate::value::Value;
use crate::Name;
use std::fmt;
use std::hash::Hash;
use std::hash::Hasher;
use std::sync::Weak;

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Type {
    /// A by-name reference, resolved lazily against the owning schema.
    /// Exists solely so that mutually recursive types can be constructed;
    /// [`Type::dealias`] replaces it with the named type it resolves to.
    Ref(TypeRef),
    Scalar(Node<ScalarType>),
    Enum(Node<EnumType>),
    Object(Node<ObjectType>),
    Interface(Node<InterfaceType>),
    Union(Node<UnionType>),
    InputObject(Node<InputObjectType>),
    List(Box<Type>),
    Nullable(Box<Type>),
}

/// A lazily-resolved handle into a schema's type index.
///
/// The handle is weak: a ref that outlives its schema simply stops
/// resolving, it does not keep the cyclic type graph alive.
#[derive(Clone)]
pub struct TypeRef {
    pub(crate) index: Weak<TypeIndex>,
    pub name: Name,
}

/// One of the six named type definitions held by a schema.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum NamedType {
    Scalar(Node<ScalarType>),
    Enum(Node<EnumType>),
    Object(Node<ObjectType>),
    Interface(Node<InterfaceType>),
    Union(Node<UnionType>),
    InputObject(Node<InputObjectType>),
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ScalarType {
    pub name: Name,
    pub description: Option<String>,
    pub directives: DirectiveList,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct EnumType {
    pub name: Name,
    pub description: Option<String>,
    pub values: Vec<Node<EnumValueDefinition>>,
    pub directives: DirectiveList,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ObjectType {
    pub name: Name,
    pub description: Option<String>,
    pub fields: Vec<Node<FieldDefinition>>,
    /// References to the implemented interfaces.
    pub implements: Vec<Type>,
    pub directives: DirectiveList,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct InterfaceType {
    pub name: Name,
    pub description: Option<String>,
    pub fields: Vec<Node<FieldDefinition>>,
    pub implements: Vec<Type>,
    pub directives: DirectiveList,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct UnionType {
    pub name: Name,
    pub description: Option<String>,
    /// References to the member object types.
    pub members: Vec<Type>,
    pub directives: DirectiveList,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct InputObjectType {
    pub name: Name,
    pub description: Option<String>,
    pub fields: Vec<Node<InputValueDefinition>>,
    pub directives: DirectiveList,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FieldDefinition {
    pub name: Name,
    pub description: Option<String>,
    pub arguments: Vec<Node<InputValueDefinition>>,
    pub ty: Type,
    pub directives: DirectiveList,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct InputValueDefinition {
    pub name: Name,
    pub description: Option<String>,
    pub ty: Type,
    pub default_value: Option<Node<Value>>,
    pub directives: DirectiveList,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct EnumValueDefinition {
    pub value: Name,
    pub description: Option<String>,
    pub directives: DirectiveList,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct DirectiveDefinition {
    pub name: Name,
    pub description: Option<String>,
    pub arguments: Vec<Node<InputValueDefinition>>,
    pub repeatable: bool,
    pub locations: Vec<DirectiveLocation>,
}

/// An applied directive, e.g. `@deprecated(reason: "use v2")`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Directive {
    pub name: Name,
    pub arguments: Vec<(Name, Node<Value>)>,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Default)]
pub struct DirectiveList(pub Vec<Node<Directive>>);

#[derive(Copy, Clone, Debug, Hash, PartialEq, Eq)]
pub enum DirectiveLocation {
    Query,
    Mutation,
    Subscription,
    Field,
    FragmentDefinition,
    FragmentSpread,
    InlineFragment,
    VariableDefinition,
    Schema,
    Scalar,
    Object,
    FieldDefinition,
    ArgumentDefinition,
    Interface,
    Union,
    Enum,
    EnumValue,
    InputObject,
    InputFieldDefinition,
}

impl Type {
    /// Replaces a top-level [`Type::Ref`] with the named type it resolves
    /// to, or yields `self` unchanged if the ref is undefined. Modifier and
    /// named nodes pass through untouched.
    pub fn dealias(&self) -> Type {
        match self {
            Type::Ref(r) => r.dealias().map(Type::from).unwrap_or_else(|| self.clone()),
            _ => self.clone(),
        }
    }

    /// Strips `List` and `Nullable` modifiers and dealiases the base type.
    pub fn underlying(&self) -> Type {
        match self {
            Type::List(inner) | Type::Nullable(inner) => inner.underlying(),
            _ => self.dealias(),
        }
    }

    /// The name of a named type or reference; `None` for modifiers.
    pub fn name(&self) -> Option<&Name> {
        match self {
            Type::Ref(r) => Some(&r.name),
            Type::Scalar(t) => Some(&t.name),
            Type::Enum(t) => Some(&t.name),
            Type::Object(t) => Some(&t.name),
            Type::Interface(t) => Some(&t.name),
            Type::Union(t) => Some(&t.name),
            Type::InputObject(t) => Some(&t.name),
            Type::List(_) | Type::Nullable(_) => None,
        }
    }

    /// Equivalence modulo aliasing: `TypeRef` is transparent.
    pub fn equiv(&self, other: &Type) -> bool {
        self.dealias() == other.dealias()
    }

    /// Nominal equivalence: equality, or both sides are named types with
    /// the same name.
    pub fn nominal_equiv(&self, other: &Type) -> bool {
        self.equiv(other)
            || match (self.name(), other.name()) {
                (Some(a), Some(b)) => a == b,
                _ => false,
            }
    }

    /// The subtype relation.
    ///
    /// Holds when the types are equal modulo aliasing, when `other` is a
    /// union with a member this is a subtype of, when this is an object or
    /// interface implementing an interface that is a subtype of `other`,
    /// and covariantly through `List` and `Nullable` (non-null being a
    /// subtype of nullable).
    pub fn is_subtype_of(&self, other: &Type) -> bool {
        let a = self.dealias();
        let b = other.dealias();
        if a == b {
            return true;
        }
        if let Type::Union(u) = &b {
            if u.members.iter().any(|member| a.is_subtype_of(member)) {
                return true;
            }
        }
        let implements = match &a {
            Type::Object(o) => Some(&o.implements),
            Type::Interface(i) => Some(&i.implements),
            _ => None,
        };
        if let Some(implements) = implements {
            if implements.iter().any(|i| i.is_subtype_of(&b)) {
                return true;
            }
        }
        match (&a, &b) {
            (Type::Nullable(x), Type::Nullable(y)) => x.is_subtype_of(y),
            (_, Type::Nullable(y)) => a.is_subtype_of(y),
            (Type::List(x), Type::List(y)) => x.is_subtype_of(y),
            _ => false,
        }
    }

    /// The type of the named field of an object or interface, peeling
    /// `Nullable` and refs. `None` for lists, unions, leaves and input
    /// objects.
    pub fn field(&self, name: &str) -> Option<Type> {
        match self {
            Type::Nullable(inner) => inner.field(name),
            Type::Ref(r) => Type::from(r.dealias()?).field(name),
            Type::Object(o) => o.fields.iter().find(|f| f.name == name).map(|f| f.ty.clone()),
            Type::Interface(i) => i.fields.iter().find(|f| f.name == name).map(|f| f.ty.clone()),
            _ => None,
        }
    }

    /// Walks a sequence of field names, peeling `List` and `Nullable`
    /// between steps. The empty path yields `self`.
    pub fn path(&self, names: &[&str]) -> Option<Type> {
        if names.is_empty() {
            return Some(self.clone());
        }
        match self {
            Type::List(inner) | Type::Nullable(inner) => inner.path(names),
            Type::Ref(r) => Type::from(r.dealias()?).path(names),
            _ => self.field(names[0])?.path(&names[1..]),
        }
    }

    /// Whether some step along the path is a list type. The empty path
    /// inspects `self`.
    pub fn path_is_list(&self, names: &[&str]) -> bool {
        if names.is_empty() {
            return self.is_list();
        }
        match self {
            Type::List(_) => true,
            Type::Nullable(inner) => inner.path_is_list(names),
            Type::Ref(r) => r
                .dealias()
                .is_some_and(|t| Type::from(t).path_is_list(names)),
            _ => self
                .field(names[0])
                .is_some_and(|t| t.path_is_list(&names[1..])),
        }
    }

    /// Whether some step along the path is nullable. The empty path is
    /// never nullable, unlike [`Type::path_is_list`]; the asymmetry is
    /// deliberate.
    pub fn path_is_nullable(&self, names: &[&str]) -> bool {
        if names.is_empty() {
            return false;
        }
        match self {
            Type::Nullable(_) => true,
            Type::List(inner) => inner.path_is_nullable(names),
            Type::Ref(r) => r
                .dealias()
                .is_some_and(|t| Type::from(t).path_is_nullable(names)),
            _ => self
                .field(names[0])
                .is_some_and(|t| t.path_is_nullable(&names[1..])),
        }
    }

    /// Strips modifiers and refs down to an object, interface or union.
    pub fn underlying_object(&self) -> Option<NamedType> {
        match self.underlying() {
            Type::Object(o) => Some(NamedType::Object(o)),
            Type::Interface(i) => Some(NamedType::Interface(i)),
            Type::Union(u) => Some(NamedType::Union(u)),
            _ => None,
        }
    }

    /// Strips modifiers and refs, then looks up `name` on the underlying
    /// object or interface.
    pub fn underlying_field(&self, name: &str) -> Option<Node<FieldDefinition>> {
        match self.underlying() {
            Type::Object(o) => o.fields.iter().find(|f| f.name == name).cloned(),
            Type::Interface(i) => i.fields.iter().find(|f| f.name == name).cloned(),
            _ => None,
        }
    }

    /// A leaf is a scalar or an enum: a type whose values cannot be
    /// selected into.
    pub fn is_leaf(&self) -> bool {
        match self {
            Type::Ref(r) => r.dealias().map(Type::from).is_some_and(|t| t.is_leaf()),
            Type::Scalar(_) | Type::Enum(_) => true,
            _ => false,
        }
    }

    pub fn as_leaf(&self) -> Option<NamedType> {
        match self {
            Type::Ref(r) => Type::from(r.dealias()?).as_leaf(),
            Type::Scalar(s) => Some(NamedType::Scalar(s.clone())),
            Type::Enum(e) => Some(NamedType::Enum(e.clone())),
            _ => None,
        }
    }

    /// Like [`Type::is_leaf`] but additionally peels `List` and `Nullable`.
    pub fn is_underlying_leaf(&self) -> bool {
        match self {
            Type::List(inner) | Type::Nullable(inner) => inner.is_underlying_leaf(),
            _ => self.is_leaf(),
        }
    }

    pub fn underlying_leaf(&self) -> Option<NamedType> {
        match self {
            Type::List(inner) | Type::Nullable(inner) => inner.underlying_leaf(),
            _ => self.as_leaf(),
        }
    }

    /// Wraps `self` in the same `List`/`Nullable` envelope that `template`
    /// carries.
    pub fn with_modifiers_of(&self, template: &Type) -> Type {
        match template {
            Type::Nullable(inner) => self.with_modifiers_of(inner).nullable(),
            Type::List(inner) => self.with_modifiers_of(inner).list(),
            _ => self.clone(),
        }
    }

    pub fn list(self) -> Type {
        Type::List(Box::new(self))
    }

    /// Idempotent: wrapping a nullable type is a no-op.
    pub fn nullable(self) -> Type {
        if self.is_nullable() {
            self
        } else {
            Type::Nullable(Box::new(self))
        }
    }

    pub fn non_null(self) -> Type {
        match self {
            Type::Nullable(inner) => *inner,
            other => other,
        }
    }

    /// The element type of a list, peeling `Nullable`.
    pub fn item(&self) -> Option<Type> {
        match self {
            Type::Nullable(inner) => inner.item(),
            Type::List(inner) => Some((**inner).clone()),
            _ => None,
        }
    }

    pub fn is_list(&self) -> bool {
        match self {
            Type::Nullable(inner) => inner.is_list(),
            Type::List(_) => true,
            _ => false,
        }
    }

    pub fn is_nullable(&self) -> bool {
        matches!(self, Type::Nullable(_))
    }

    /// Whether `self` is an object type declaring `name` while at least one
    /// of its interfaces lacks it. Such fields force dispatch on the
    /// concrete type during query planning.
    pub fn variant_field(&self, name: &str) -> bool {
        match self.dealias() {
            Type::Object(o) => {
                o.fields.iter().any(|f| f.name == name)
                    && o.implements.iter().any(|i| i.field(name).is_none())
            }
            _ => false,
        }
    }
}

impl TypeRef {
    /// Resolves against the owning schema's type index, falling back to the
    /// built-in scalars. `None` if the name is undefined or the schema has
    /// been dropped.
    pub fn dealias(&self) -> Option<NamedType> {
        match self.index.upgrade() {
            Some(index) => index.lookup(&self.name),
            None => crate::schema::built_in_scalar(&self.name).map(NamedType::Scalar),
        }
    }
}

// The owning index is identity, not state: two refs are interchangeable
// exactly when they name the same type.
impl PartialEq for TypeRef {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for TypeRef {}

impl Hash for TypeRef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state)
    }
}

impl fmt::Debug for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("TypeRef").field(&self.name).finish()
    }
}

impl From<NamedType> for Type {
    fn from(ty: NamedType) -> Self {
        match ty {
            NamedType::Scalar(t) => Type::Scalar(t),
            NamedType::Enum(t) => Type::Enum(t),
            NamedType::Object(t) => Type::Object(t),
            NamedType::Interface(t) => Type::Interface(t),
            NamedType::Union(t) => Type::Union(t),
            NamedType::InputObject(t) => Type::InputObject(t),
        }
    }
}

impl From<TypeRef> for Type {
    fn from(r: TypeRef) -> Self {
        Type::Ref(r)
    }
}

impl NamedType {
    pub fn name(&self) -> &Name {
        match self {
            NamedType::Scalar(t) => &t.name,
            NamedType::Enum(t) => &t.name,
            NamedType::Object(t) => &t.name,
            NamedType::Interface(t) => &t.name,
            NamedType::Union(t) => &t.name,
            NamedType::InputObject(t) => &t.name,
        }
    }

    pub fn description(&self) -> Option<&str> {
        match self {
            NamedType::Scalar(t) => t.description.as_deref(),
            NamedType::Enum(t) => t.description.as_deref(),
            NamedType::Object(t) => t.description.as_deref(),
            NamedType::Interface(t) => t.description.as_deref(),
            NamedType::Union(t) => t.description.as_deref(),
            NamedType::InputObject(t) => t.description.as_deref(),
        }
    }

    pub fn directives(&self) -> &DirectiveList {
        match self {
            NamedType::Scalar(t) => &t.directives,
            NamedType::Enum(t) => &t.directives,
            NamedType::Object(t) => &t.directives,
            NamedType::Interface(t) => &t.directives,
            NamedType::Union(t) => &t.directives,
            NamedType::InputObject(t) => &t.directives,
        }
    }

    pub fn is_object(&self) -> bool {
        matches!(self, NamedType::Object(_))
    }

    pub fn is_interface(&self) -> bool {
        matches!(self, NamedType::Interface(_))
    }

    /// Whether values of this type may be used as inputs.
    pub fn is_input_type(&self) -> bool {
        matches!(
            self,
            NamedType::Scalar(_) | NamedType::Enum(_) | NamedType::InputObject(_)
        )
    }

    /// Whether values of this type may be used as outputs.
    pub fn is_output_type(&self) -> bool {
        !matches!(self, NamedType::InputObject(_))
    }
}

impl ScalarType {
    /// The five scalars of the GraphQL specification. Any scalar carrying
    /// one of their names is the built-in.
    pub fn is_built_in(&self) -> bool {
        matches!(
            self.name.as_str(),
            "Int" | "Float" | "String" | "Boolean" | "ID"
        )
    }
}

impl EnumType {
    pub fn has_value(&self, name: &str) -> bool {
        self.values.iter().any(|v| v.value == name)
    }
}

impl DirectiveDefinition {
    pub fn argument(&self, name: &str) -> Option<&Node<InputValueDefinition>> {
        self.arguments.iter().find(|a| a.name == name)
    }
}

impl Directive {
    pub fn argument(&self, name: &str) -> Option<&Node<Value>> {
        self.arguments
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }
}

impl DirectiveList {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// All directives with the given name; for repeatable directives.
    pub fn get_all<'def: 'name, 'name>(
        &'def self,
        name: &'name str,
    ) -> impl Iterator<Item = &'def Node<Directive>> + 'name {
        self.0.iter().filter(move |dir| dir.name == name)
    }

    /// The first directive with the given name; for non-repeatable
    /// directives.
    pub fn get(&self, name: &str) -> Option<&Node<Directive>> {
        self.get_all(name).next()
    }

    pub fn has(&self, name: &str) -> bool {
        self.get(name).is_some()
    }
}

impl std::ops::Deref for DirectiveList {
    type Target = Vec<Node<Directive>>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl std::ops::DerefMut for DirectiveList {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl<'a> IntoIterator for &'a DirectiveList {
    type Item = &'a Node<Directive>;
    type IntoIter = std::slice::Iter<'a, Node<Directive>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl<D> FromIterator<D> for DirectiveList
where
    D: Into<Node<Directive>>,
{
    fn from_iter<T: IntoIterator<Item = D>>(iter: T) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl DirectiveLocation {
    pub fn name(&self) -> &'static str {
        match self {
            DirectiveLocation::Query => "QUERY",
            DirectiveLocation::Mutation => "MUTATION",
            DirectiveLocation::Subscription => "SUBSCRIPTION",
            DirectiveLocation::Field => "FIELD",
            DirectiveLocation::FragmentDefinition => "FRAGMENT_DEFINITION",
            DirectiveLocation::FragmentSpread => "FRAGMENT_SPREAD",
            DirectiveLocation::InlineFragment => "INLINE_FRAGMENT",
            DirectiveLocation::VariableDefinition => "VARIABLE_DEFINITION",
            DirectiveLocation::Schema => "SCHEMA",
            DirectiveLocation::Scalar => "SCALAR",
            DirectiveLocation::Object => "OBJECT",
            DirectiveLocation::FieldDefinition => "FIELD_DEFINITION",
            DirectiveLocation::ArgumentDefinition => "ARGUMENT_DEFINITION",
            DirectiveLocation::Interface => "INTERFACE",
            DirectiveLocation::Union => "UNION",
            DirectiveLocation::Enum => "ENUM",
            DirectiveLocation::EnumValue => "ENUM_VALUE",
            DirectiveLocation::InputObject => "INPUT_OBJECT",
            DirectiveLocation::InputFieldDefinition => "INPUT_FIELD_DEFINITION",
        }
    }
}

impl fmt::Display for DirectiveLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// `[T]` for lists, `T!` for non-null, `T` (no suffix) for nullable.
impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn base(ty: &Type, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            match ty {
                Type::Nullable(inner) => base(inner, f),
                Type::List(inner) => write!(f, "[{inner}]"),
                other => f.write_str(other.name().map(|n| n.as_str()).unwrap_or("")),
            }
        }
        match self {
            Type::Nullable(inner) => base(inner, f),
            other => {
                base(other, f)?;
                f.write_str("!")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Schema;
    use pretty_assertions::assert_eq;

    fn schema() -> Schema {
        Schema::parse(
            r#"
            interface Node { id: ID! }

            type User implements Node {
              id: ID!
              name: String
              profile: Profile
              friends: [User!]
            }

            type Profile implements Node {
              id: ID!
              handle: String!
            }

            union Owner = User

            type Query {
              node: Node
              user: User
            }
            "#,
        )
        .ok()
        .expect("valid schema")
    }

    fn ty(schema: &Schema, name: &str) -> Type {
        Type::from(schema.definition(name).expect(name))
    }

    #[test]
    fn subtyping_through_interfaces() {
        let schema = schema();
        let user = ty(&schema, "User");
        let node = ty(&schema, "Node");
        assert!(user.is_subtype_of(&node));
        assert!(!node.is_subtype_of(&user));
    }

    #[test]
    fn subtyping_through_unions() {
        let schema = schema();
        let user = ty(&schema, "User");
        let owner = ty(&schema, "Owner");
        assert!(user.is_subtype_of(&owner));
        assert!(!owner.is_subtype_of(&user));
    }

    #[test]
    fn subtyping_is_reflexive_and_transitive() {
        let schema = schema();
        for name in ["Node", "User", "Profile", "Owner", "Query"] {
            let t = ty(&schema, name);
            assert!(t.is_subtype_of(&t), "{name} <:< {name}");
            assert!(t.equiv(&t), "{name} =:= {name}");
        }
        // User <:< Owner and Owner <:< Owner ∪ … trivially; check the
        // interface chain User <:< Node through list and nullable wrappers
        let user = ty(&schema, "User");
        let node = ty(&schema, "Node");
        assert!(user.clone().list().is_subtype_of(&node.clone().list()));
        assert!(user
            .clone()
            .nullable()
            .is_subtype_of(&node.clone().nullable()));
    }

    #[test]
    fn non_null_is_a_subtype_of_nullable() {
        let schema = schema();
        let user = ty(&schema, "User");
        assert!(user.is_subtype_of(&user.clone().nullable()));
        assert!(!user.clone().nullable().is_subtype_of(&user));
    }

    #[test]
    fn nullable_is_idempotent() {
        let schema = schema();
        let user = ty(&schema, "User");
        assert_eq!(user.clone().nullable().nullable(), user.clone().nullable());
        assert_eq!(user.clone().nullable().non_null(), user);
    }

    #[test]
    fn refs_are_transparent_to_equivalence() {
        let schema = schema();
        let by_ref = Type::Ref(schema.type_ref("User"));
        let resolved = ty(&schema, "User");
        assert!(by_ref.equiv(&resolved));
        assert!(resolved.equiv(&by_ref));
        assert!(by_ref.nominal_equiv(&resolved));
    }

    #[test]
    fn nominal_equivalence_ignores_structure() {
        let schema = schema();
        let dangling = Type::Ref(schema.type_ref("Ghost"));
        let other = Type::Ref(schema.type_ref("Ghost"));
        assert!(dangling.nominal_equiv(&other));
        assert!(!dangling.nominal_equiv(&ty(&schema, "User")));
    }

    #[test]
    fn field_peels_nullable_and_refs() {
        let schema = schema();
        let query = ty(&schema, "Query");
        let user_field = query.field("user").expect("user field");
        assert_eq!(user_field.name(), None); // nullable wrapper
        assert_eq!(user_field.clone().non_null().name().unwrap(), "User");
        // lists, leaves and unions have no fields
        assert_eq!(ty(&schema, "Owner").field("name"), None);
        assert_eq!(user_field.clone().list().field("name"), None);
    }

    #[test]
    fn path_walks_fields_through_modifiers() {
        let schema = schema();
        let query = ty(&schema, "Query");
        let handle = query.path(&["user", "profile", "handle"]).expect("path");
        assert_eq!(handle.to_string(), "String!");
        assert_eq!(query.path(&[]), Some(query.clone()));
        assert_eq!(query.path(&["user", "missing"]), None);
        // steps peel lists: friends is [User!]
        let friend_name = query.path(&["user", "friends", "name"]).expect("path");
        assert_eq!(friend_name.to_string(), "String");
    }

    #[test]
    fn path_is_list_inspects_intermediate_steps() {
        let schema = schema();
        let query = ty(&schema, "Query");
        assert!(query.path_is_list(&["user", "friends"]));
        assert!(query.path_is_list(&["user", "friends", "name"]));
        assert!(!query.path_is_list(&["user", "profile"]));
        assert!(!query.path_is_list(&[]));
        assert!(ty(&schema, "User").list().path_is_list(&[]));
    }

    #[test]
    fn path_is_nullable_ignores_the_empty_path() {
        let schema = schema();
        let query = ty(&schema, "Query");
        assert!(query.path_is_nullable(&["user", "profile"]));
        // the handle step itself is non-null, but user and profile are not
        assert!(query.path_is_nullable(&["user", "profile", "handle"]));
        // trailing nullability does not count without a further step
        assert!(!ty(&schema, "User").path_is_nullable(&[]));
        assert!(!ty(&schema, "User").nullable().path_is_nullable(&[]));
    }

    #[test]
    fn underlying_navigation() {
        let schema = schema();
        let user = ty(&schema, "User");
        let wrapped = user.clone().nullable().list().nullable();
        assert_eq!(
            wrapped.underlying_object().map(|t| t.name().clone()),
            Some("User".to_string())
        );
        assert_eq!(
            wrapped.underlying_field("name").map(|f| f.name.clone()),
            Some("name".to_string())
        );
        assert_eq!(ty(&schema, "Owner").underlying_object().map(|t| t.name().clone()),
            Some("Owner".to_string()));
        let id = Type::Ref(schema.type_ref("ID"));
        assert!(!id.clone().list().is_leaf());
        assert!(id.is_leaf());
        assert!(id.clone().list().nullable().is_underlying_leaf());
        assert_eq!(
            id.list().underlying_leaf().map(|t| t.name().clone()),
            Some("ID".to_string())
        );
        assert!(!user.is_leaf());
    }

    #[test]
    fn modifier_envelopes_copy_over() {
        let schema = schema();
        let user = ty(&schema, "User");
        let template = ty(&schema, "Profile").list().nullable();
        let wrapped = user.with_modifiers_of(&template);
        assert_eq!(wrapped.to_string(), "[User!]");
        assert_eq!(user.with_modifiers_of(&ty(&schema, "Profile")), user);
        assert_eq!(template.item().unwrap().to_string(), "Profile!");
        assert!(template.is_list());
        assert!(template.is_nullable());
    }

    #[test]
    fn variant_fields_require_an_uncovered_interface() {
        let schema = schema();
        let user = ty(&schema, "User");
        // name is not declared by Node
        assert!(user.variant_field("name"));
        // id is declared by Node
        assert!(!user.variant_field("id"));
        assert!(!ty(&schema, "Node").variant_field("id"));
    }

    #[test]
    fn exhaustive_branch_coverage() {
        let schema = schema();
        let node = ty(&schema, "Node");
        let user = ty(&schema, "User");
        let profile = ty(&schema, "Profile");
        assert!(!schema.exhaustive(&node, &[user.clone()]));
        assert!(schema.exhaustive(&node, &[user.clone(), profile]));
        assert!(schema.exhaustive(&ty(&schema, "Owner"), &[user]));
    }

    #[test]
    fn renders_modifiers() {
        let schema = schema();
        let user = ty(&schema, "User");
        assert_eq!(user.to_string(), "User!");
        assert_eq!(user.clone().nullable().to_string(), "User");
        assert_eq!(user.clone().list().to_string(), "[User!]!");
        assert_eq!(
            user.nullable().list().nullable().to_string(),
            "[User]"
        );
    }
}
