// Encode module for the schema-driven binary format

pub mod basic;
pub mod complex;

use std::io::Write;

use crate::codec::types::Value;
use crate::internal::error::SerializationError;
use crate::schema::types::{PrimitiveKind, Schema, SchemaModel};

pub use basic::BinaryEncoder;

/// Encodes a value against the model's root schema. The encoding is
/// schema-driven: nothing self-describing lands on the wire, and nothing is
/// written once an error surfaces mid-value.
pub fn write_value<W: Write>(
    writer: &mut W,
    model: &SchemaModel,
    value: &Value,
) -> Result<(), SerializationError> {
    let mut encoder = BinaryEncoder::new(writer);
    write_node(&mut encoder, model, model.root(), value)
}

/// Encodes a value against one schema node, dispatching on the node kind.
pub(crate) fn write_node<W: Write>(
    encoder: &mut BinaryEncoder<W>,
    model: &SchemaModel,
    schema: &Schema,
    value: &Value,
) -> Result<(), SerializationError> {
    // Null is only representable where the schema declares it.
    if matches!(value, Value::Null)
        && !matches!(
            schema,
            Schema::Nullable(_) | Schema::Primitive(PrimitiveKind::Null)
        )
    {
        return Err(SerializationError::UnexpectedNull {
            schema: schema.label(),
        });
    }

    match schema {
        Schema::Primitive(kind) => basic::write_primitive(encoder, *kind, value),
        Schema::Nullable(inner) => complex::write_nullable(encoder, model, inner, value),
        Schema::Sequence(element) => complex::write_sequence(encoder, model, element, value),
        Schema::Map(value_schema) => complex::write_map(encoder, model, value_schema, value),
        Schema::Record(record) => complex::write_record(encoder, model, record, value),
        Schema::Enum(schema) => complex::write_enum(encoder, schema, value),
        Schema::Union(union) => complex::write_union(encoder, model, union, value),
        Schema::Ref(name) => {
            let record = model
                .record(name)
                .cloned()
                .ok_or_else(|| SerializationError::UnresolvedReference { name: name.clone() })?;
            complex::write_record(encoder, model, &record, value)
        }
    }
}
