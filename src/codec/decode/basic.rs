use std::io::{self, Read};

use byteorder::{LittleEndian, ReadBytesExt};
use bytes::Bytes;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::codec::decode::PREALLOC_LIMIT;
use crate::codec::types::{Decimal, Value};
use crate::codec::varint;
use crate::internal::error::DeserializationError;
use crate::schema::types::PrimitiveKind;

/// The primitive layer of the reader, mirroring the encoder byte for byte.
/// Every method either returns a fully decoded value or an error; a short
/// stream surfaces as `UnexpectedEndOfStream`.
pub struct BinaryDecoder<R> {
    reader: R,
}

impl<R: Read> BinaryDecoder<R> {
    pub fn new(reader: R) -> Self {
        BinaryDecoder { reader }
    }

    pub fn decode_bool(&mut self) -> Result<bool, DeserializationError> {
        match self.reader.read_u8()? {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(DeserializationError::InvalidBoolean(other)),
        }
    }

    /// Reads a nullable presence byte. Anything but 0 or 1 is corruption.
    pub fn decode_presence(&mut self) -> Result<bool, DeserializationError> {
        match self.reader.read_u8()? {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(DeserializationError::InvalidPresenceFlag(other)),
        }
    }

    pub fn decode_int(&mut self) -> Result<i32, DeserializationError> {
        Ok(self.reader.read_i32::<LittleEndian>()?)
    }

    pub fn decode_long(&mut self) -> Result<i64, DeserializationError> {
        Ok(self.reader.read_i64::<LittleEndian>()?)
    }

    pub fn decode_float(&mut self) -> Result<f32, DeserializationError> {
        Ok(self.reader.read_f32::<LittleEndian>()?)
    }

    pub fn decode_double(&mut self) -> Result<f64, DeserializationError> {
        Ok(self.reader.read_f64::<LittleEndian>()?)
    }

    pub fn decode_varint(&mut self) -> Result<u64, DeserializationError> {
        varint::read_varint(&mut self.reader)
    }

    /// Varint length prefix, then the payload. The preallocation is clamped
    /// so a corrupt length cannot balloon memory before the stream runs dry.
    pub fn decode_bytes(&mut self) -> Result<Bytes, DeserializationError> {
        let length = self.decode_varint()?;
        let mut buf = Vec::with_capacity(length.min(PREALLOC_LIMIT) as usize);
        let copied = (&mut self.reader).take(length).read_to_end(&mut buf)?;
        if (copied as u64) < length {
            return Err(DeserializationError::UnexpectedEndOfStream);
        }
        Ok(Bytes::from(buf))
    }

    pub fn decode_string(&mut self) -> Result<String, DeserializationError> {
        let raw = self.decode_bytes()?;
        Ok(String::from_utf8(raw.to_vec())?)
    }

    pub fn decode_guid(&mut self) -> Result<Uuid, DeserializationError> {
        let mut buf = [0u8; 16];
        self.reader.read_exact(&mut buf)?;
        Ok(Uuid::from_bytes(buf))
    }

    /// Microseconds since the Unix epoch. Values outside chrono's
    /// representable range are refused rather than clamped.
    pub fn decode_timestamp(&mut self) -> Result<DateTime<Utc>, DeserializationError> {
        let micros = self.decode_long()?;
        DateTime::from_timestamp_micros(micros)
            .ok_or(DeserializationError::InvalidTimestamp(micros))
    }

    pub fn decode_decimal(&mut self) -> Result<Decimal, DeserializationError> {
        let units = self.reader.read_i128::<LittleEndian>()?;
        let scale = self.reader.read_u8()?;
        Ok(Decimal::new(units, scale))
    }

    pub fn decode_char(&mut self) -> Result<char, DeserializationError> {
        let raw = self.reader.read_u32::<LittleEndian>()?;
        char::from_u32(raw).ok_or(DeserializationError::InvalidChar(raw))
    }

    /// Discards exactly `count` bytes from the stream.
    pub fn skip(&mut self, count: u64) -> Result<(), DeserializationError> {
        let copied = io::copy(&mut (&mut self.reader).take(count), &mut io::sink())?;
        if copied < count {
            return Err(DeserializationError::UnexpectedEndOfStream);
        }
        Ok(())
    }

    /// Discards one varint-length-prefixed payload.
    pub fn skip_length_prefixed(&mut self) -> Result<(), DeserializationError> {
        let length = self.decode_varint()?;
        self.skip(length)
    }
}

/// Decodes a primitive schema node into a value.
pub(crate) fn read_primitive<R: Read>(
    decoder: &mut BinaryDecoder<R>,
    kind: PrimitiveKind,
) -> Result<Value, DeserializationError> {
    match kind {
        PrimitiveKind::Null => Ok(Value::Null),
        PrimitiveKind::Boolean => Ok(Value::Boolean(decoder.decode_bool()?)),
        PrimitiveKind::Int32 => Ok(Value::Int32(decoder.decode_int()?)),
        PrimitiveKind::Int64 => Ok(Value::Int64(decoder.decode_long()?)),
        PrimitiveKind::Float32 => Ok(Value::Float32(decoder.decode_float()?)),
        PrimitiveKind::Float64 => Ok(Value::Float64(decoder.decode_double()?)),
        PrimitiveKind::Bytes => Ok(Value::Bytes(decoder.decode_bytes()?)),
        PrimitiveKind::String => Ok(Value::String(decoder.decode_string()?)),
        PrimitiveKind::Decimal => Ok(Value::Decimal(decoder.decode_decimal()?)),
        PrimitiveKind::Guid => Ok(Value::Guid(decoder.decode_guid()?)),
        PrimitiveKind::Timestamp => Ok(Value::Timestamp(decoder.decode_timestamp()?)),
        PrimitiveKind::Char => Ok(Value::Char(decoder.decode_char()?)),
    }
}

/// Advances past a primitive node without materializing it.
pub(crate) fn skip_primitive<R: Read>(
    decoder: &mut BinaryDecoder<R>,
    kind: PrimitiveKind,
) -> Result<(), DeserializationError> {
    match kind {
        PrimitiveKind::Null => Ok(()),
        PrimitiveKind::Boolean => decoder.skip(1),
        PrimitiveKind::Int32 | PrimitiveKind::Float32 | PrimitiveKind::Char => decoder.skip(4),
        PrimitiveKind::Int64 | PrimitiveKind::Float64 | PrimitiveKind::Timestamp => {
            decoder.skip(8)
        }
        PrimitiveKind::Guid => decoder.skip(16),
        PrimitiveKind::Decimal => decoder.skip(17),
        PrimitiveKind::Bytes | PrimitiveKind::String => decoder.skip_length_prefixed(),
    }
}
