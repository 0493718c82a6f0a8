// Schema module for the Fulmen data format
//
// This module provides the schema model, the type-description layer the
// builder compiles, and the surrogate registry. It includes:
//
// 1. Immutable schema graphs with by-name record references
// 2. One-time type descriptions and the traits binding native types to them
// 3. Deterministic schema construction with surrogate substitution
// 4. JSON rendering of built schema graphs

// Re-export public types and functions
pub use self::builder::SchemaBuilder;
pub use self::descriptor::{
    Describe, DescribeFn, FromValue, MemberDescription, ToValue, TypeDescription, TypeKind,
    TypeRef,
};
pub use self::surrogate::{SurrogateEntry, SurrogateRegistry};
pub use self::types::{
    ConvertFn, EnumSchema, FieldSchema, PrimitiveKind, RecordSchema, Schema, SchemaModel,
    SurrogateHook, UnionSchema,
};

// Sub-modules
pub mod builder;
pub mod descriptor;
pub mod surrogate;
pub mod types;

// JSON rendering attaches to SchemaModel
mod json;
