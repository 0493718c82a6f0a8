// Codec module for the schema-driven binary format

pub mod decode;
pub mod encode;
pub mod types;
pub mod varint;

pub use decode::{read_value, skip_value, BinaryDecoder};
pub use encode::{write_value, BinaryEncoder};
pub use types::{Decimal, Record, Value};
