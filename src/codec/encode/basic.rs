use std::io::Write;

use byteorder::{LittleEndian, WriteBytesExt};
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::codec::types::{Decimal, Value};
use crate::codec::varint;
use crate::internal::error::SerializationError;
use crate::schema::types::PrimitiveKind;

/// The primitive layer of the writer. Fixed-width values travel
/// little-endian; byte and string payloads carry a varint length prefix.
pub struct BinaryEncoder<W> {
    writer: W,
}

impl<W: Write> BinaryEncoder<W> {
    pub fn new(writer: W) -> Self {
        BinaryEncoder { writer }
    }

    pub fn encode_bool(&mut self, value: bool) -> Result<(), SerializationError> {
        self.writer.write_u8(value as u8)?;
        Ok(())
    }

    pub fn encode_int(&mut self, value: i32) -> Result<(), SerializationError> {
        self.writer.write_i32::<LittleEndian>(value)?;
        Ok(())
    }

    pub fn encode_long(&mut self, value: i64) -> Result<(), SerializationError> {
        self.writer.write_i64::<LittleEndian>(value)?;
        Ok(())
    }

    pub fn encode_float(&mut self, value: f32) -> Result<(), SerializationError> {
        self.writer.write_f32::<LittleEndian>(value)?;
        Ok(())
    }

    pub fn encode_double(&mut self, value: f64) -> Result<(), SerializationError> {
        self.writer.write_f64::<LittleEndian>(value)?;
        Ok(())
    }

    /// Counts, ordinals, and discriminators travel as varints.
    pub fn encode_varint(&mut self, value: u64) -> Result<(), SerializationError> {
        varint::write_varint(&mut self.writer, value)?;
        Ok(())
    }

    /// Varint length prefix, then the payload.
    pub fn encode_bytes(&mut self, value: &[u8]) -> Result<(), SerializationError> {
        varint::write_varint(&mut self.writer, value.len() as u64)?;
        self.writer.write_all(value)?;
        Ok(())
    }

    pub fn encode_string(&mut self, value: &str) -> Result<(), SerializationError> {
        self.encode_bytes(value.as_bytes())
    }

    /// A raw block with no length prefix; reader and writer agree on the
    /// width through the schema.
    pub fn encode_fixed(&mut self, value: &[u8]) -> Result<(), SerializationError> {
        self.writer.write_all(value)?;
        Ok(())
    }

    pub fn encode_guid(&mut self, value: &Uuid) -> Result<(), SerializationError> {
        self.encode_fixed(value.as_bytes())
    }

    /// Microseconds since the Unix epoch, as a fixed-width long.
    pub fn encode_timestamp(&mut self, value: &DateTime<Utc>) -> Result<(), SerializationError> {
        self.encode_long(value.timestamp_micros())
    }

    /// 16 bytes of scaled units, then one scale byte.
    pub fn encode_decimal(&mut self, value: &Decimal) -> Result<(), SerializationError> {
        self.writer.write_i128::<LittleEndian>(value.units)?;
        self.writer.write_u8(value.scale)?;
        Ok(())
    }

    pub fn encode_char(&mut self, value: char) -> Result<(), SerializationError> {
        self.writer.write_u32::<LittleEndian>(value as u32)?;
        Ok(())
    }
}

/// Encodes a primitive schema node against a value.
pub(crate) fn write_primitive<W: Write>(
    encoder: &mut BinaryEncoder<W>,
    kind: PrimitiveKind,
    value: &Value,
) -> Result<(), SerializationError> {
    match (kind, value) {
        (PrimitiveKind::Null, Value::Null) => Ok(()),
        (PrimitiveKind::Boolean, Value::Boolean(v)) => encoder.encode_bool(*v),
        (PrimitiveKind::Int32, Value::Int32(v)) => encoder.encode_int(*v),
        (PrimitiveKind::Int64, Value::Int64(v)) => encoder.encode_long(*v),
        (PrimitiveKind::Float32, Value::Float32(v)) => encoder.encode_float(*v),
        (PrimitiveKind::Float64, Value::Float64(v)) => encoder.encode_double(*v),
        (PrimitiveKind::Bytes, Value::Bytes(v)) => encoder.encode_bytes(v),
        (PrimitiveKind::String, Value::String(v)) => encoder.encode_string(v),
        (PrimitiveKind::Decimal, Value::Decimal(v)) => encoder.encode_decimal(v),
        (PrimitiveKind::Guid, Value::Guid(v)) => encoder.encode_guid(v),
        (PrimitiveKind::Timestamp, Value::Timestamp(v)) => encoder.encode_timestamp(v),
        (PrimitiveKind::Char, Value::Char(v)) => encoder.encode_char(*v),
        (kind, other) => Err(SerializationError::TypeMismatch {
            expected: kind.name().to_string(),
            found: other.kind().to_string(),
        }),
    }
}
