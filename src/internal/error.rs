use std::io;

use thiserror::Error;

/// Errors raised while compiling a type description into a schema model.
#[derive(Error, Debug)]
pub enum ConstructionError {
    /// A non-constructible type has no surrogate registered for it.
    #[error("no surrogate registered for non-constructible type '{type_name}'")]
    MissingSurrogate { type_name: String },

    /// Two distinct type descriptions produced the same record name.
    #[error("duplicate record name '{name}' in schema graph")]
    DuplicateRecordName { name: String },

    /// A union declared no variants at all.
    #[error("union '{union}' declares no variants")]
    EmptyUnion { union: String },

    /// A union variant recursed into a type that is still being built.
    #[error("union '{union}' variant '{variant}' forms a cycle through an incomplete type")]
    UnionVariantCycle { union: String, variant: String },

    /// A union variant resolved to something other than a record.
    #[error("union '{union}' variant '{variant}' is not a record type")]
    UnionVariantNotRecord { union: String, variant: String },

    /// A registered surrogate description is not a record.
    #[error("surrogate '{surrogate}' for type '{type_name}' is not a record type")]
    SurrogateNotRecord { type_name: String, surrogate: String },
}

/// Errors raised while writing a value against a schema model.
#[derive(Error, Debug)]
pub enum SerializationError {
    /// The runtime record name is not a registered variant of the union.
    #[error("type '{variant}' is not a registered variant of union '{union}'")]
    UnknownVariant { union: String, variant: String },

    /// A null value was written against a non-nullable schema node.
    #[error("unexpected null value against non-nullable schema node '{schema}'")]
    UnexpectedNull { schema: String },

    /// The enum value's symbol is not declared by the schema.
    #[error("symbol '{symbol}' is not declared by enum '{enum_name}'")]
    UnknownEnumSymbol { enum_name: String, symbol: String },

    /// The value's shape does not match the schema node.
    #[error("type mismatch: schema expects {expected}, value is {found}")]
    TypeMismatch { expected: String, found: String },

    /// A record value carries a different field count than its schema.
    #[error("record '{record}' expects {expected} fields, value carries {found}")]
    FieldCount {
        record: String,
        expected: usize,
        found: usize,
    },

    /// A by-name reference points at no record in the schema model.
    #[error("unresolved record reference '{name}'")]
    UnresolvedReference { name: String },

    /// A to-surrogate conversion failed.
    #[error("surrogate conversion failed: {0}")]
    Surrogate(#[from] SurrogateError),

    /// The output sink failed.
    #[error("i/o failure during write: {0}")]
    Io(#[from] io::Error),
}

/// Errors raised while reading a value against a schema model.
#[derive(Error, Debug)]
pub enum DeserializationError {
    /// The stream ended before the value was fully decoded.
    #[error("unexpected end of stream")]
    UnexpectedEndOfStream,

    /// The union discriminator is outside the variant list.
    #[error("discriminator {index} is outside the variants of union '{union}'")]
    UnknownVariant { union: String, index: u64 },

    /// A nullable presence byte was neither 0 nor 1.
    #[error("invalid presence flag byte {0:#04x}")]
    InvalidPresenceFlag(u8),

    /// A boolean byte was neither 0 nor 1.
    #[error("invalid boolean byte {0:#04x}")]
    InvalidBoolean(u8),

    /// A varint ran past the width of a 64-bit value.
    #[error("varint exceeds 64 bits")]
    InvalidVarint,

    /// A decoded string was not valid UTF-8.
    #[error("invalid utf-8 in string payload: {0}")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),

    /// A decoded char scalar is not a valid Unicode scalar value.
    #[error("invalid char scalar value {0:#010x}")]
    InvalidChar(u32),

    /// A decoded timestamp is outside the representable range.
    #[error("timestamp {0} microseconds is outside the representable range")]
    InvalidTimestamp(i64),

    /// An enum ordinal is outside the declared symbol list.
    #[error("ordinal {ordinal} is outside the symbols of enum '{enum_name}'")]
    UnknownEnumOrdinal { enum_name: String, ordinal: u64 },

    /// The decoded value's shape does not match what the caller expected.
    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch { expected: String, found: String },

    /// A record value carries a different field count than expected.
    #[error("record '{record}' expects {expected} fields, found {found}")]
    FieldCount {
        record: String,
        expected: usize,
        found: usize,
    },

    /// A by-name reference points at no record in the schema model.
    #[error("unresolved record reference '{name}'")]
    UnresolvedReference { name: String },

    /// A from-surrogate conversion failed.
    #[error("surrogate conversion failed: {0}")]
    Surrogate(#[from] SurrogateError),

    /// The input source failed for a reason other than running dry.
    #[error("i/o failure during read: {0}")]
    Io(io::Error),
}

impl From<io::Error> for DeserializationError {
    fn from(err: io::Error) -> Self {
        // A short read is the truncated-stream case, every other kind is a
        // genuine source failure.
        if err.kind() == io::ErrorKind::UnexpectedEof {
            DeserializationError::UnexpectedEndOfStream
        } else {
            DeserializationError::Io(err)
        }
    }
}

/// Failure produced by a registered surrogate conversion function.
#[derive(Error, Debug)]
#[error("{message}")]
pub struct SurrogateError {
    pub message: String,
}

impl SurrogateError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
