use std::collections::HashMap;
use std::io::Read;

use crate::codec::decode::basic::BinaryDecoder;
use crate::codec::decode::{read_node, skip_node, PREALLOC_LIMIT};
use crate::codec::types::{Record, Value};
use crate::internal::error::DeserializationError;
use crate::schema::types::{EnumSchema, RecordSchema, Schema, SchemaModel, UnionSchema};

/// Presence byte, then the inner value when present.
pub(crate) fn read_nullable<R: Read>(
    decoder: &mut BinaryDecoder<R>,
    model: &SchemaModel,
    inner: &Schema,
) -> Result<Value, DeserializationError> {
    if decoder.decode_presence()? {
        read_node(decoder, model, inner)
    } else {
        Ok(Value::Null)
    }
}

pub(crate) fn skip_nullable<R: Read>(
    decoder: &mut BinaryDecoder<R>,
    model: &SchemaModel,
    inner: &Schema,
) -> Result<(), DeserializationError> {
    if decoder.decode_presence()? {
        skip_node(decoder, model, inner)?;
    }
    Ok(())
}

/// Varint element count, then that many elements.
pub(crate) fn read_sequence<R: Read>(
    decoder: &mut BinaryDecoder<R>,
    model: &SchemaModel,
    element: &Schema,
) -> Result<Value, DeserializationError> {
    let count = decoder.decode_varint()?;
    let mut items = Vec::with_capacity(count.min(PREALLOC_LIMIT) as usize);
    for _ in 0..count {
        items.push(read_node(decoder, model, element)?);
    }
    Ok(Value::Sequence(items))
}

pub(crate) fn skip_sequence<R: Read>(
    decoder: &mut BinaryDecoder<R>,
    model: &SchemaModel,
    element: &Schema,
) -> Result<(), DeserializationError> {
    let count = decoder.decode_varint()?;
    for _ in 0..count {
        skip_node(decoder, model, element)?;
    }
    Ok(())
}

/// Varint entry count, then string key and value per entry.
pub(crate) fn read_map<R: Read>(
    decoder: &mut BinaryDecoder<R>,
    model: &SchemaModel,
    value_schema: &Schema,
) -> Result<Value, DeserializationError> {
    let count = decoder.decode_varint()?;
    let mut entries = HashMap::with_capacity(count.min(PREALLOC_LIMIT) as usize);
    for _ in 0..count {
        let key = decoder.decode_string()?;
        let value = read_node(decoder, model, value_schema)?;
        entries.insert(key, value);
    }
    Ok(Value::Map(entries))
}

pub(crate) fn skip_map<R: Read>(
    decoder: &mut BinaryDecoder<R>,
    model: &SchemaModel,
    value_schema: &Schema,
) -> Result<(), DeserializationError> {
    let count = decoder.decode_varint()?;
    for _ in 0..count {
        decoder.skip_length_prefixed()?;
        skip_node(decoder, model, value_schema)?;
    }
    Ok(())
}

/// Field payloads in schema order. When the record carries a surrogate hook
/// the decoded stand-in is converted back before it surfaces.
pub(crate) fn read_record<R: Read>(
    decoder: &mut BinaryDecoder<R>,
    model: &SchemaModel,
    record: &RecordSchema,
) -> Result<Value, DeserializationError> {
    let mut fields = Vec::with_capacity(record.fields.len());
    for field in &record.fields {
        fields.push(read_node(decoder, model, &field.schema)?);
    }
    let value = Value::Record(Record::new(record.name.clone(), fields));
    match &record.hook {
        Some(hook) => Ok((hook.from_surrogate)(value)?),
        None => Ok(value),
    }
}

pub(crate) fn skip_record<R: Read>(
    decoder: &mut BinaryDecoder<R>,
    model: &SchemaModel,
    record: &RecordSchema,
) -> Result<(), DeserializationError> {
    for field in &record.fields {
        skip_node(decoder, model, &field.schema)?;
    }
    Ok(())
}

/// Varint ordinal resolved against the declared symbol list.
pub(crate) fn read_enum<R: Read>(
    decoder: &mut BinaryDecoder<R>,
    schema: &EnumSchema,
) -> Result<Value, DeserializationError> {
    let ordinal = decoder.decode_varint()?;
    let symbol = usize::try_from(ordinal)
        .ok()
        .and_then(|i| schema.symbol_at(i))
        .ok_or_else(|| DeserializationError::UnknownEnumOrdinal {
            enum_name: schema.name.clone(),
            ordinal,
        })?;
    Ok(Value::Enum(symbol.to_string()))
}

/// Varint discriminator selecting the variant, then that variant's record
/// encoding. Discriminators outside the variant list are corruption.
pub(crate) fn read_union<R: Read>(
    decoder: &mut BinaryDecoder<R>,
    model: &SchemaModel,
    union: &UnionSchema,
) -> Result<Value, DeserializationError> {
    let variant = read_union_variant(decoder, union)?;
    read_record(decoder, model, &union.variants[variant])
}

pub(crate) fn skip_union<R: Read>(
    decoder: &mut BinaryDecoder<R>,
    model: &SchemaModel,
    union: &UnionSchema,
) -> Result<(), DeserializationError> {
    let variant = read_union_variant(decoder, union)?;
    skip_record(decoder, model, &union.variants[variant])
}

fn read_union_variant<R: Read>(
    decoder: &mut BinaryDecoder<R>,
    union: &UnionSchema,
) -> Result<usize, DeserializationError> {
    let index = decoder.decode_varint()?;
    usize::try_from(index)
        .ok()
        .filter(|i| *i < union.variants.len())
        .ok_or_else(|| DeserializationError::UnknownVariant {
            union: union.name.clone(),
            index,
        })
}
