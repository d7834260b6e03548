#![doc = include_str!("../README.md")]

pub mod coercion;
pub mod directives;
pub mod executable;
mod node;
mod parser;
mod result;
pub mod schema;
pub mod ty;
mod value;

pub use self::executable::ExecutableDocument;
pub use self::node::Node;
pub use self::parser::Parser;
pub use self::result::Checked;
pub use self::result::Problem;
pub use self::schema::Schema;
pub use self::schema::SchemaBuilder;
pub use self::ty::DirectiveLocation;
pub use self::ty::NamedType;
pub use self::ty::Type;
pub use self::ty::TypeRef;
pub use self::value::Name;
pub use self::value::Value;

const _: () = {
    const fn assert_send<T: Send>() {}
    const fn assert_sync<T: Sync>() {}
    assert_send::<Type>();
    assert_sync::<Type>();
    assert_send::<Schema>();
    assert_sync::<Schema>();
};
