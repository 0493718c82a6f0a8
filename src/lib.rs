// Fulmen library entry point
//
// Fulmen is a schema-driven binary serializer: a native type is described
// once, compiled into an immutable schema model, and then written to or read
// from a byte stream by walking that model. Polymorphic members are closed
// unions of record variants, recursive records resolve by name, and types the
// codec cannot construct directly are bridged through registered surrogates.

pub mod codec;
pub mod internal;
pub mod schema;
pub mod serializer;

pub use codec::{read_value, skip_value, write_value, Decimal, Record, Value};
pub use internal::error::{
    ConstructionError, DeserializationError, SerializationError, SurrogateError,
};
pub use schema::{
    Describe, FromValue, MemberDescription, PrimitiveKind, Schema, SchemaBuilder, SchemaModel,
    SurrogateRegistry, ToValue, TypeDescription, TypeKind, TypeRef,
};
pub use serializer::{Serializer, SerializerSettings};
