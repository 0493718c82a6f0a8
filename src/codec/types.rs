use std::collections::HashMap;

use bytes::Bytes;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::internal::error::DeserializationError;

/// A fixed-size decimal: a 128-bit scaled integer plus the number of
/// fractional digits. `units = 12345, scale = 2` represents 123.45.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct Decimal {
    pub units: i128,
    pub scale: u8,
}

impl Decimal {
    /// Creates a new decimal from scaled units.
    pub fn new(units: i128, scale: u8) -> Self {
        Decimal { units, scale }
    }
}

/// A named aggregate value with positional fields.
///
/// Fields are ordered exactly as the matching record schema orders them; the
/// name carries the runtime type identity used for union dispatch.
#[derive(Debug, PartialEq, Clone)]
pub struct Record {
    pub name: String,
    pub fields: Vec<Value>,
}

impl Record {
    /// Creates a new record value.
    pub fn new(name: impl Into<String>, fields: Vec<Value>) -> Self {
        Record {
            name: name.into(),
            fields,
        }
    }
}

/// The dynamic value representation the codec transforms.
///
/// Typed APIs convert native values to and from this shape once per call; the
/// writer and reader only ever walk a `Value` against a schema model.
#[derive(Debug, PartialEq, Clone)]
pub enum Value {
    Null,
    Boolean(bool),
    Int32(i32),
    Int64(i64),
    Float32(f32),
    Float64(f64),
    Bytes(Bytes),
    String(String),
    Decimal(Decimal),
    Guid(Uuid),
    Timestamp(DateTime<Utc>),
    Char(char),
    Sequence(Vec<Value>),
    Map(HashMap<String, Value>),
    Record(Record),
    Enum(String),
}

impl Value {
    /// Creates a record value.
    pub fn record(name: impl Into<String>, fields: Vec<Value>) -> Value {
        Value::Record(Record::new(name, fields))
    }

    /// Returns a short label for the value's shape, used in diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Boolean(_) => "boolean",
            Value::Int32(_) => "int",
            Value::Int64(_) => "long",
            Value::Float32(_) => "float",
            Value::Float64(_) => "double",
            Value::Bytes(_) => "bytes",
            Value::String(_) => "string",
            Value::Decimal(_) => "decimal",
            Value::Guid(_) => "guid",
            Value::Timestamp(_) => "timestamp",
            Value::Char(_) => "char",
            Value::Sequence(_) => "array",
            Value::Map(_) => "map",
            Value::Record(_) => "record",
            Value::Enum(_) => "enum",
        }
    }

    fn mismatch(expected: &str, found: &Value) -> DeserializationError {
        DeserializationError::TypeMismatch {
            expected: expected.to_string(),
            found: found.kind().to_string(),
        }
    }

    /// Extracts a record, or reports the actual shape.
    pub fn into_record(self) -> Result<Record, DeserializationError> {
        match self {
            Value::Record(record) => Ok(record),
            other => Err(Self::mismatch("record", &other)),
        }
    }

    pub fn into_bool(self) -> Result<bool, DeserializationError> {
        match self {
            Value::Boolean(v) => Ok(v),
            other => Err(Self::mismatch("boolean", &other)),
        }
    }

    pub fn into_i32(self) -> Result<i32, DeserializationError> {
        match self {
            Value::Int32(v) => Ok(v),
            other => Err(Self::mismatch("int", &other)),
        }
    }

    pub fn into_i64(self) -> Result<i64, DeserializationError> {
        match self {
            Value::Int64(v) => Ok(v),
            other => Err(Self::mismatch("long", &other)),
        }
    }

    pub fn into_f32(self) -> Result<f32, DeserializationError> {
        match self {
            Value::Float32(v) => Ok(v),
            other => Err(Self::mismatch("float", &other)),
        }
    }

    pub fn into_f64(self) -> Result<f64, DeserializationError> {
        match self {
            Value::Float64(v) => Ok(v),
            other => Err(Self::mismatch("double", &other)),
        }
    }

    pub fn into_bytes(self) -> Result<Bytes, DeserializationError> {
        match self {
            Value::Bytes(v) => Ok(v),
            other => Err(Self::mismatch("bytes", &other)),
        }
    }

    pub fn into_string(self) -> Result<String, DeserializationError> {
        match self {
            Value::String(v) => Ok(v),
            other => Err(Self::mismatch("string", &other)),
        }
    }

    pub fn into_decimal(self) -> Result<Decimal, DeserializationError> {
        match self {
            Value::Decimal(v) => Ok(v),
            other => Err(Self::mismatch("decimal", &other)),
        }
    }

    pub fn into_guid(self) -> Result<Uuid, DeserializationError> {
        match self {
            Value::Guid(v) => Ok(v),
            other => Err(Self::mismatch("guid", &other)),
        }
    }

    pub fn into_timestamp(self) -> Result<DateTime<Utc>, DeserializationError> {
        match self {
            Value::Timestamp(v) => Ok(v),
            other => Err(Self::mismatch("timestamp", &other)),
        }
    }

    pub fn into_char(self) -> Result<char, DeserializationError> {
        match self {
            Value::Char(v) => Ok(v),
            other => Err(Self::mismatch("char", &other)),
        }
    }

    pub fn into_sequence(self) -> Result<Vec<Value>, DeserializationError> {
        match self {
            Value::Sequence(v) => Ok(v),
            other => Err(Self::mismatch("array", &other)),
        }
    }

    pub fn into_map(self) -> Result<HashMap<String, Value>, DeserializationError> {
        match self {
            Value::Map(v) => Ok(v),
            other => Err(Self::mismatch("map", &other)),
        }
    }

    pub fn into_enum(self) -> Result<String, DeserializationError> {
        match self {
            Value::Enum(v) => Ok(v),
            other => Err(Self::mismatch("enum", &other)),
        }
    }

    /// Collapses a nullable position: `Null` becomes `None`, anything else
    /// stays as the present value.
    pub fn into_optional(self) -> Option<Value> {
        match self {
            Value::Null => None,
            other => Some(other),
        }
    }
}
