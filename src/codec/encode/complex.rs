use std::io::Write;

use crate::codec::encode::basic::BinaryEncoder;
use crate::codec::encode::write_node;
use crate::codec::types::Value;
use crate::internal::error::SerializationError;
use crate::schema::types::{EnumSchema, RecordSchema, Schema, SchemaModel, UnionSchema};

/// One presence byte, then the inner encoding when the value is present.
pub(crate) fn write_nullable<W: Write>(
    encoder: &mut BinaryEncoder<W>,
    model: &SchemaModel,
    inner: &Schema,
    value: &Value,
) -> Result<(), SerializationError> {
    match value {
        Value::Null => encoder.encode_bool(false),
        present => {
            encoder.encode_bool(true)?;
            write_node(encoder, model, inner, present)
        }
    }
}

/// Varint element count, then each element in order.
pub(crate) fn write_sequence<W: Write>(
    encoder: &mut BinaryEncoder<W>,
    model: &SchemaModel,
    element: &Schema,
    value: &Value,
) -> Result<(), SerializationError> {
    let items = match value {
        Value::Sequence(items) => items,
        other => {
            return Err(SerializationError::TypeMismatch {
                expected: "array".to_string(),
                found: other.kind().to_string(),
            })
        }
    };
    encoder.encode_varint(items.len() as u64)?;
    for item in items {
        write_node(encoder, model, element, item)?;
    }
    Ok(())
}

/// Varint entry count, then string key and value for each entry.
pub(crate) fn write_map<W: Write>(
    encoder: &mut BinaryEncoder<W>,
    model: &SchemaModel,
    value_schema: &Schema,
    value: &Value,
) -> Result<(), SerializationError> {
    let entries = match value {
        Value::Map(entries) => entries,
        other => {
            return Err(SerializationError::TypeMismatch {
                expected: "map".to_string(),
                found: other.kind().to_string(),
            })
        }
    };
    encoder.encode_varint(entries.len() as u64)?;
    for (key, item) in entries {
        encoder.encode_string(key)?;
        write_node(encoder, model, value_schema, item)?;
    }
    Ok(())
}

/// Field payloads back to back, in schema order. No names, no framing.
/// A surrogate hook converts the value before any of its fields are read.
pub(crate) fn write_record<W: Write>(
    encoder: &mut BinaryEncoder<W>,
    model: &SchemaModel,
    record: &RecordSchema,
    value: &Value,
) -> Result<(), SerializationError> {
    let converted;
    let value = match &record.hook {
        Some(hook) => {
            converted = (hook.to_surrogate)(value.clone())?;
            &converted
        }
        None => value,
    };
    let rec = match value {
        Value::Record(rec) => rec,
        other => {
            return Err(SerializationError::TypeMismatch {
                expected: format!("record '{}'", record.name),
                found: other.kind().to_string(),
            })
        }
    };
    if rec.name != record.name {
        return Err(SerializationError::TypeMismatch {
            expected: format!("record '{}'", record.name),
            found: format!("record '{}'", rec.name),
        });
    }
    if rec.fields.len() != record.fields.len() {
        return Err(SerializationError::FieldCount {
            record: record.name.clone(),
            expected: record.fields.len(),
            found: rec.fields.len(),
        });
    }
    for (field, item) in record.fields.iter().zip(&rec.fields) {
        write_node(encoder, model, &field.schema, item)?;
    }
    Ok(())
}

/// Varint ordinal of the symbol within the declared list.
pub(crate) fn write_enum<W: Write>(
    encoder: &mut BinaryEncoder<W>,
    schema: &EnumSchema,
    value: &Value,
) -> Result<(), SerializationError> {
    let symbol = match value {
        Value::Enum(symbol) => symbol,
        other => {
            return Err(SerializationError::TypeMismatch {
                expected: format!("enum '{}'", schema.name),
                found: other.kind().to_string(),
            })
        }
    };
    let ordinal = schema
        .ordinal_of(symbol)
        .ok_or_else(|| SerializationError::UnknownEnumSymbol {
            enum_name: schema.name.clone(),
            symbol: symbol.clone(),
        })?;
    encoder.encode_varint(ordinal as u64)
}

/// Varint discriminator for the variant's position, then the variant's
/// record encoding. Dispatch is by exact record name; anything outside the
/// closed variant list is refused.
pub(crate) fn write_union<W: Write>(
    encoder: &mut BinaryEncoder<W>,
    model: &SchemaModel,
    union: &UnionSchema,
    value: &Value,
) -> Result<(), SerializationError> {
    let rec = match value {
        Value::Record(rec) => rec,
        other => {
            return Err(SerializationError::TypeMismatch {
                expected: format!("union '{}'", union.name),
                found: other.kind().to_string(),
            })
        }
    };
    let index = union
        .position_of(&rec.name)
        .ok_or_else(|| SerializationError::UnknownVariant {
            union: union.name.clone(),
            variant: rec.name.clone(),
        })?;
    encoder.encode_varint(index as u64)?;
    write_record(encoder, model, &union.variants[index], value)
}
