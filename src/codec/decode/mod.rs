// Decode module for the schema-driven binary format

pub mod basic;
pub mod complex;

use std::io::Read;

use crate::codec::types::Value;
use crate::internal::error::DeserializationError;
use crate::schema::types::{Schema, SchemaModel};

pub use basic::BinaryDecoder;

/// Upper bound on speculative preallocation for counted containers. Corrupt
/// counts beyond this fail on the stream running dry, not on allocation.
pub(crate) const PREALLOC_LIMIT: u64 = 4096;

/// Decodes one value against the model's root schema. Either the whole value
/// comes back or an error does; no partial results.
pub fn read_value<R: Read>(
    reader: &mut R,
    model: &SchemaModel,
) -> Result<Value, DeserializationError> {
    let mut decoder = BinaryDecoder::new(reader);
    read_node(&mut decoder, model, model.root())
}

/// Advances past one value encoded against the model's root schema without
/// materializing it. Structural prefixes still get validated on the way.
pub fn skip_value<R: Read>(
    reader: &mut R,
    model: &SchemaModel,
) -> Result<(), DeserializationError> {
    let mut decoder = BinaryDecoder::new(reader);
    skip_node(&mut decoder, model, model.root())
}

/// Decodes one schema node, dispatching on the node kind.
pub(crate) fn read_node<R: Read>(
    decoder: &mut BinaryDecoder<R>,
    model: &SchemaModel,
    schema: &Schema,
) -> Result<Value, DeserializationError> {
    match schema {
        Schema::Primitive(kind) => basic::read_primitive(decoder, *kind),
        Schema::Nullable(inner) => complex::read_nullable(decoder, model, inner),
        Schema::Sequence(element) => complex::read_sequence(decoder, model, element),
        Schema::Map(value_schema) => complex::read_map(decoder, model, value_schema),
        Schema::Record(record) => complex::read_record(decoder, model, record),
        Schema::Enum(schema) => complex::read_enum(decoder, schema),
        Schema::Union(union) => complex::read_union(decoder, model, union),
        Schema::Ref(name) => {
            let record = model
                .record(name)
                .cloned()
                .ok_or_else(|| DeserializationError::UnresolvedReference { name: name.clone() })?;
            complex::read_record(decoder, model, &record)
        }
    }
}

/// Advances past one schema node without materializing it.
pub(crate) fn skip_node<R: Read>(
    decoder: &mut BinaryDecoder<R>,
    model: &SchemaModel,
    schema: &Schema,
) -> Result<(), DeserializationError> {
    match schema {
        Schema::Primitive(kind) => basic::skip_primitive(decoder, *kind),
        Schema::Nullable(inner) => complex::skip_nullable(decoder, model, inner),
        Schema::Sequence(element) => complex::skip_sequence(decoder, model, element),
        Schema::Map(value_schema) => complex::skip_map(decoder, model, value_schema),
        Schema::Record(record) => complex::skip_record(decoder, model, record),
        Schema::Enum(_) => {
            decoder.decode_varint()?;
            Ok(())
        }
        Schema::Union(union) => complex::skip_union(decoder, model, union),
        Schema::Ref(name) => {
            let record = model
                .record(name)
                .cloned()
                .ok_or_else(|| DeserializationError::UnresolvedReference { name: name.clone() })?;
            complex::skip_record(decoder, model, &record)
        }
    }
}
