use std::io::{self, Read, Write};

use crate::internal::error::DeserializationError;

/// Writes an unsigned 64-bit integer using a variable-length scheme (LEB128).
/// Counts, enum ordinals, and union discriminators all travel this way.
pub fn write_varint<W: Write>(writer: &mut W, value: u64) -> io::Result<()> {
    let mut value = value;

    loop {
        let mut byte = (value & 0x7F) as u8;
        value >>= 7;
        if value != 0 {
            byte |= 0x80;
        }
        writer.write_all(&[byte])?;
        if value == 0 {
            break;
        }
    }
    Ok(())
}

/// Reads a variable-length encoded unsigned 64-bit integer from a stream.
pub fn read_varint<R: Read>(reader: &mut R) -> Result<u64, DeserializationError> {
    let mut value = 0u64;
    let mut shift = 0;

    loop {
        let mut byte = [0u8; 1];
        reader.read_exact(&mut byte)?;
        let low_seven_bits = (byte[0] & 0x7F) as u64;
        value |= low_seven_bits << shift;
        if (byte[0] & 0x80) == 0 {
            return Ok(value);
        }
        shift += 7;
        if shift >= 64 {
            // Value is too large to fit in u64
            return Err(DeserializationError::InvalidVarint);
        }
    }
}
