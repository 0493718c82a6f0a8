// Schema model for the Fulmen data format
//
// A schema model is built once from a type description and then treated as
// immutable: writer and reader walk it concurrently without synchronization.
// Records live in a name-keyed table so that recursive and repeated
// occurrences resolve by name instead of expanding forever.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::codec::types::Value;
use crate::internal::error::SurrogateError;

/// The primitive kinds a schema leaf can take.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimitiveKind {
    Null,
    Boolean,
    Int32,
    Int64,
    Float32,
    Float64,
    Bytes,
    String,
    Decimal,
    Guid,
    Timestamp,
    Char,
}

impl PrimitiveKind {
    /// Returns the kind's wire-format name, used in diagnostics and in the
    /// JSON rendering.
    pub fn name(self) -> &'static str {
        match self {
            PrimitiveKind::Null => "null",
            PrimitiveKind::Boolean => "boolean",
            PrimitiveKind::Int32 => "int",
            PrimitiveKind::Int64 => "long",
            PrimitiveKind::Float32 => "float",
            PrimitiveKind::Float64 => "double",
            PrimitiveKind::Bytes => "bytes",
            PrimitiveKind::String => "string",
            PrimitiveKind::Decimal => "decimal",
            PrimitiveKind::Guid => "guid",
            PrimitiveKind::Timestamp => "timestamp",
            PrimitiveKind::Char => "char",
        }
    }
}

/// A bidirectional value conversion registered for a surrogate.
pub type ConvertFn = dyn Fn(Value) -> Result<Value, SurrogateError> + Send + Sync;

/// The conversion pair stamped onto a record schema that stands in for a
/// non-constructible native type. The writer applies `to_surrogate` before
/// encoding; the reader applies `from_surrogate` after decoding.
#[derive(Clone)]
pub struct SurrogateHook {
    pub to_surrogate: Arc<ConvertFn>,
    pub from_surrogate: Arc<ConvertFn>,
}

impl fmt::Debug for SurrogateHook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SurrogateHook")
    }
}

/// A named field inside a record schema.
#[derive(Debug, Clone)]
pub struct FieldSchema {
    pub name: String,
    pub schema: Schema,
}

/// A named record with ordered fields. Field order is fixed at build time;
/// the wire format is purely positional.
#[derive(Debug)]
pub struct RecordSchema {
    pub name: String,
    pub fields: Vec<FieldSchema>,
    /// Present when this record stands in for a surrogate-redirected type.
    pub hook: Option<SurrogateHook>,
}

/// A named enumeration; values travel as the ordinal of their symbol.
#[derive(Debug)]
pub struct EnumSchema {
    pub name: String,
    pub symbols: Vec<String>,
}

impl EnumSchema {
    /// Position of a symbol in the declared order.
    pub fn ordinal_of(&self, symbol: &str) -> Option<usize> {
        self.symbols.iter().position(|s| s == symbol)
    }

    /// Symbol at a decoded ordinal.
    pub fn symbol_at(&self, ordinal: usize) -> Option<&str> {
        self.symbols.get(ordinal).map(String::as_str)
    }
}

/// A closed union of record variants; the wire carries the variant's index
/// in declaration order, then the variant's record body.
#[derive(Debug)]
pub struct UnionSchema {
    pub name: String,
    pub variants: Vec<Arc<RecordSchema>>,
}

impl UnionSchema {
    /// Position of a variant by record name. Dispatch is exact: a name not
    /// in the list is never matched to a structurally similar variant.
    pub fn position_of(&self, record_name: &str) -> Option<usize> {
        self.variants.iter().position(|v| v.name == record_name)
    }
}

/// One node of a schema graph.
#[derive(Debug, Clone)]
pub enum Schema {
    Primitive(PrimitiveKind),
    /// A presence flag ahead of the inner encoding. Never nests: nullable of
    /// nullable is collapsed at build time.
    Nullable(Box<Schema>),
    Sequence(Box<Schema>),
    /// String-keyed map of the inner schema.
    Map(Box<Schema>),
    Record(Arc<RecordSchema>),
    Enum(Arc<EnumSchema>),
    Union(Arc<UnionSchema>),
    /// By-name reference to a record in the model's table. Emitted for every
    /// repeated or recursive record occurrence.
    Ref(String),
}

impl Schema {
    /// Returns a short label for the node, used in diagnostics.
    pub fn label(&self) -> String {
        match self {
            Schema::Primitive(kind) => kind.name().to_string(),
            Schema::Nullable(_) => "nullable".to_string(),
            Schema::Sequence(_) => "array".to_string(),
            Schema::Map(_) => "map".to_string(),
            Schema::Record(record) => format!("record {}", record.name),
            Schema::Enum(en) => format!("enum {}", en.name),
            Schema::Union(un) => format!("union {}", un.name),
            Schema::Ref(name) => format!("record {}", name),
        }
    }
}

/// A complete, immutable schema: the root node plus the name-keyed record
/// table that by-name references resolve against.
#[derive(Debug)]
pub struct SchemaModel {
    root: Schema,
    records: HashMap<String, Arc<RecordSchema>>,
}

impl SchemaModel {
    pub(crate) fn new(root: Schema, records: HashMap<String, Arc<RecordSchema>>) -> Self {
        SchemaModel { root, records }
    }

    /// The root schema node.
    pub fn root(&self) -> &Schema {
        &self.root
    }

    /// Looks up a named record in the model's table.
    pub fn record(&self, name: &str) -> Option<&Arc<RecordSchema>> {
        self.records.get(name)
    }

    /// Number of named records in the table.
    pub fn record_count(&self) -> usize {
        self.records.len()
    }
}
