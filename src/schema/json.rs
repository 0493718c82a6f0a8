// JSON rendering of schema models
//
// Human-readable rendering of a schema graph. A named record or enum renders
// fully at its first occurrence and by name everywhere after, so recursive
// graphs render finitely. Rendering is one-way; there is no JSON parsing
// surface.

use std::collections::HashSet;
use std::fmt;

use serde_json::{json, Value as JsonValue};

use crate::schema::types::{EnumSchema, RecordSchema, Schema, SchemaModel, UnionSchema};

impl SchemaModel {
    /// Renders the schema graph as a JSON value.
    pub fn to_json(&self) -> JsonValue {
        let mut seen = HashSet::new();
        render_schema(self.root(), &mut seen)
    }
}

impl fmt::Display for SchemaModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_json())
    }
}

fn render_schema(schema: &Schema, seen: &mut HashSet<String>) -> JsonValue {
    match schema {
        Schema::Primitive(kind) => json!(kind.name()),
        Schema::Nullable(inner) => json!(["null", render_schema(inner, seen)]),
        Schema::Sequence(inner) => json!({
            "type": "array",
            "items": render_schema(inner, seen),
        }),
        Schema::Map(inner) => json!({
            "type": "map",
            "values": render_schema(inner, seen),
        }),
        Schema::Record(record) => render_record(record, seen),
        Schema::Enum(en) => render_enum(en, seen),
        Schema::Union(union) => render_union(union, seen),
        Schema::Ref(name) => json!(name),
    }
}

fn render_record(record: &RecordSchema, seen: &mut HashSet<String>) -> JsonValue {
    if seen.contains(&record.name) {
        return json!(record.name);
    }
    seen.insert(record.name.clone());

    let fields: Vec<JsonValue> = record
        .fields
        .iter()
        .map(|field| {
            json!({
                "name": field.name,
                "type": render_schema(&field.schema, seen),
            })
        })
        .collect();
    json!({
        "type": "record",
        "name": record.name,
        "fields": fields,
    })
}

fn render_enum(en: &EnumSchema, seen: &mut HashSet<String>) -> JsonValue {
    if seen.contains(&en.name) {
        return json!(en.name);
    }
    seen.insert(en.name.clone());
    json!({
        "type": "enum",
        "name": en.name,
        "symbols": en.symbols,
    })
}

fn render_union(union: &UnionSchema, seen: &mut HashSet<String>) -> JsonValue {
    let variants: Vec<JsonValue> = union
        .variants
        .iter()
        .map(|variant| render_record(variant, seen))
        .collect();
    json!(variants)
}
