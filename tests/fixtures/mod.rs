// Shared fixture types for the integration tests. Every fixture implements
// the describe/to-value/from-value triple by hand, the way a caller of the
// library would, so the tests exercise the same seams real callers do.
#![allow(dead_code)]

use std::collections::HashMap;

use bytes::Bytes;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use fulmen::{
    Decimal, Describe, DeserializationError, FromValue, MemberDescription, PrimitiveKind,
    SurrogateError, SurrogateRegistry, ToValue, TypeDescription, TypeRef, Value,
};

/// Unpacks a record value with a known name and arity into its fields.
pub fn unpack<const N: usize>(
    value: Value,
    name: &str,
) -> Result<[Value; N], DeserializationError> {
    let record = value.into_record()?;
    if record.name != name {
        return Err(DeserializationError::TypeMismatch {
            expected: format!("record '{}'", name),
            found: format!("record '{}'", record.name),
        });
    }
    let found = record.fields.len();
    <[Value; N]>::try_from(record.fields).map_err(|_| DeserializationError::FieldCount {
        record: name.to_string(),
        expected: N,
        found,
    })
}

/// The smallest possible record: one int field.
#[derive(Debug, Clone, PartialEq)]
pub struct IntHolder {
    pub value: i32,
}

impl Describe for IntHolder {
    fn describe() -> TypeDescription {
        TypeDescription::record::<IntHolder>(
            "IntHolder",
            vec![MemberDescription::new(
                "value",
                TypeRef::Primitive(PrimitiveKind::Int32),
            )],
        )
    }
}

impl ToValue for IntHolder {
    fn to_value(&self) -> Value {
        Value::record("IntHolder", vec![Value::Int32(self.value)])
    }
}

impl FromValue for IntHolder {
    fn from_value(value: Value) -> Result<Self, DeserializationError> {
        let [value] = unpack(value, "IntHolder")?;
        Ok(IntHolder {
            value: value.into_i32()?,
        })
    }
}

/// A flat record covering the whole primitive repertoire.
#[derive(Debug, Clone, PartialEq)]
pub struct Telemetry {
    pub enabled: bool,
    pub count: i32,
    pub total: i64,
    pub ratio: f32,
    pub precise: f64,
    pub label: String,
    pub payload: Bytes,
    pub price: Decimal,
    pub device: Uuid,
    pub observed_at: DateTime<Utc>,
    pub grade: char,
}

impl Telemetry {
    pub fn sample() -> Self {
        Telemetry {
            enabled: true,
            count: -7,
            total: 9_876_543_210,
            ratio: 0.25,
            precise: 2.718_281_828,
            label: "telemetry".to_string(),
            payload: Bytes::from_static(&[0xDE, 0xAD, 0xBE, 0xEF]),
            price: Decimal::new(123_456, 2),
            device: Uuid::from_bytes([0x11; 16]),
            observed_at: DateTime::from_timestamp_micros(1_700_000_000_000_000).unwrap(),
            grade: 'A',
        }
    }
}

impl Describe for Telemetry {
    fn describe() -> TypeDescription {
        TypeDescription::record::<Telemetry>(
            "Telemetry",
            vec![
                MemberDescription::new("enabled", TypeRef::Primitive(PrimitiveKind::Boolean)),
                MemberDescription::new("count", TypeRef::Primitive(PrimitiveKind::Int32)),
                MemberDescription::new("total", TypeRef::Primitive(PrimitiveKind::Int64)),
                MemberDescription::new("ratio", TypeRef::Primitive(PrimitiveKind::Float32)),
                MemberDescription::new("precise", TypeRef::Primitive(PrimitiveKind::Float64)),
                MemberDescription::new("label", TypeRef::Primitive(PrimitiveKind::String)),
                MemberDescription::new("payload", TypeRef::Primitive(PrimitiveKind::Bytes)),
                MemberDescription::new("price", TypeRef::Primitive(PrimitiveKind::Decimal)),
                MemberDescription::new("device", TypeRef::Primitive(PrimitiveKind::Guid)),
                MemberDescription::new(
                    "observed_at",
                    TypeRef::Primitive(PrimitiveKind::Timestamp),
                ),
                MemberDescription::new("grade", TypeRef::Primitive(PrimitiveKind::Char)),
            ],
        )
    }
}

impl ToValue for Telemetry {
    fn to_value(&self) -> Value {
        Value::record(
            "Telemetry",
            vec![
                Value::Boolean(self.enabled),
                Value::Int32(self.count),
                Value::Int64(self.total),
                Value::Float32(self.ratio),
                Value::Float64(self.precise),
                Value::String(self.label.clone()),
                Value::Bytes(self.payload.clone()),
                Value::Decimal(self.price),
                Value::Guid(self.device),
                Value::Timestamp(self.observed_at),
                Value::Char(self.grade),
            ],
        )
    }
}

impl FromValue for Telemetry {
    fn from_value(value: Value) -> Result<Self, DeserializationError> {
        let [enabled, count, total, ratio, precise, label, payload, price, device, observed_at, grade] =
            unpack(value, "Telemetry")?;
        Ok(Telemetry {
            enabled: enabled.into_bool()?,
            count: count.into_i32()?,
            total: total.into_i64()?,
            ratio: ratio.into_f32()?,
            precise: precise.into_f64()?,
            label: label.into_string()?,
            payload: payload.into_bytes()?,
            price: price.into_decimal()?,
            device: device.into_guid()?,
            observed_at: observed_at.into_timestamp()?,
            grade: grade.into_char()?,
        })
    }
}

/// A self-referential record; the schema resolves the tail by name.
#[derive(Debug, Clone, PartialEq)]
pub struct ListNode {
    pub value: i32,
    pub next: Option<Box<ListNode>>,
}

impl ListNode {
    /// Builds a chain holding the given values in order.
    pub fn chain(values: &[i32]) -> Option<ListNode> {
        let mut next = None;
        for &value in values.iter().rev() {
            next = Some(ListNode {
                value,
                next: next.map(Box::new),
            });
        }
        next
    }
}

impl Describe for ListNode {
    fn describe() -> TypeDescription {
        TypeDescription::record::<ListNode>(
            "ListNode",
            vec![
                MemberDescription::new("value", TypeRef::Primitive(PrimitiveKind::Int32)),
                MemberDescription::new(
                    "next",
                    TypeRef::Optional(Box::new(TypeRef::Described(ListNode::describe))),
                ),
            ],
        )
    }
}

impl ToValue for ListNode {
    fn to_value(&self) -> Value {
        let next = match &self.next {
            Some(node) => node.to_value(),
            None => Value::Null,
        };
        Value::record("ListNode", vec![Value::Int32(self.value), next])
    }
}

impl FromValue for ListNode {
    fn from_value(value: Value) -> Result<Self, DeserializationError> {
        let [value, next] = unpack(value, "ListNode")?;
        let next = match next.into_optional() {
            Some(inner) => Some(Box::new(ListNode::from_value(inner)?)),
            None => None,
        };
        Ok(ListNode {
            value: value.into_i32()?,
            next,
        })
    }
}

/// A non-optional field forced onto a nullable wire shape by its member
/// marking. Outgoing values are always present; the presence byte still
/// travels.
#[derive(Debug, Clone, PartialEq)]
pub struct ForcedNullable {
    pub value: i32,
}

impl Describe for ForcedNullable {
    fn describe() -> TypeDescription {
        TypeDescription::record::<ForcedNullable>(
            "ForcedNullable",
            vec![
                MemberDescription::new("value", TypeRef::Primitive(PrimitiveKind::Int32))
                    .nullable_schema(),
            ],
        )
    }
}

impl ToValue for ForcedNullable {
    fn to_value(&self) -> Value {
        Value::record("ForcedNullable", vec![Value::Int32(self.value)])
    }
}

impl FromValue for ForcedNullable {
    fn from_value(value: Value) -> Result<Self, DeserializationError> {
        let [value] = unpack(value, "ForcedNullable")?;
        Ok(ForcedNullable {
            value: value.into_i32()?,
        })
    }
}

/// An optional string; absent, empty, and non-empty are three distinct
/// states on the wire.
#[derive(Debug, Clone, PartialEq)]
pub struct MaybeText {
    pub text: Option<String>,
}

impl Describe for MaybeText {
    fn describe() -> TypeDescription {
        TypeDescription::record::<MaybeText>(
            "MaybeText",
            vec![MemberDescription::new(
                "text",
                TypeRef::Optional(Box::new(TypeRef::Primitive(PrimitiveKind::String))),
            )],
        )
    }
}

impl ToValue for MaybeText {
    fn to_value(&self) -> Value {
        let text = match &self.text {
            Some(text) => Value::String(text.clone()),
            None => Value::Null,
        };
        Value::record("MaybeText", vec![text])
    }
}

impl FromValue for MaybeText {
    fn from_value(value: Value) -> Result<Self, DeserializationError> {
        let [text] = unpack(value, "MaybeText")?;
        let text = match text.into_optional() {
            Some(inner) => Some(inner.into_string()?),
            None => None,
        };
        Ok(MaybeText { text })
    }
}

/// Two members carry explicit inclusion markers, so only those two reach the
/// wire; the unmarked note stays local and comes back empty.
#[derive(Debug, Clone, PartialEq)]
pub struct AuditedOrder {
    pub id: i64,
    pub total: f64,
    pub draft_note: String,
}

impl Describe for AuditedOrder {
    fn describe() -> TypeDescription {
        TypeDescription::record::<AuditedOrder>(
            "AuditedOrder",
            vec![
                MemberDescription::new("id", TypeRef::Primitive(PrimitiveKind::Int64))
                    .data_member(),
                MemberDescription::new("total", TypeRef::Primitive(PrimitiveKind::Float64))
                    .data_member(),
                MemberDescription::new("draft_note", TypeRef::Primitive(PrimitiveKind::String)),
            ],
        )
    }
}

impl ToValue for AuditedOrder {
    fn to_value(&self) -> Value {
        Value::record(
            "AuditedOrder",
            vec![Value::Int64(self.id), Value::Float64(self.total)],
        )
    }
}

impl FromValue for AuditedOrder {
    fn from_value(value: Value) -> Result<Self, DeserializationError> {
        let [id, total] = unpack(value, "AuditedOrder")?;
        Ok(AuditedOrder {
            id: id.into_i64()?,
            total: total.into_f64()?,
            draft_note: String::new(),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    Red,
    Green,
    Blue,
}

impl Color {
    fn symbol(self) -> &'static str {
        match self {
            Color::Red => "Red",
            Color::Green => "Green",
            Color::Blue => "Blue",
        }
    }

    fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "Red" => Some(Color::Red),
            "Green" => Some(Color::Green),
            "Blue" => Some(Color::Blue),
            _ => None,
        }
    }
}

impl Describe for Color {
    fn describe() -> TypeDescription {
        TypeDescription::enumeration::<Color>("Color", &["Red", "Green", "Blue"])
    }
}

impl ToValue for Color {
    fn to_value(&self) -> Value {
        Value::Enum(self.symbol().to_string())
    }
}

impl FromValue for Color {
    fn from_value(value: Value) -> Result<Self, DeserializationError> {
        let symbol = value.into_enum()?;
        Color::from_symbol(&symbol).ok_or_else(|| DeserializationError::TypeMismatch {
            expected: "a symbol of enum 'Color'".to_string(),
            found: symbol,
        })
    }
}

/// A record holding an enum member.
#[derive(Debug, Clone, PartialEq)]
pub struct Paint {
    pub color: Color,
    pub coats: i32,
}

impl Describe for Paint {
    fn describe() -> TypeDescription {
        TypeDescription::record::<Paint>(
            "Paint",
            vec![
                MemberDescription::new("color", TypeRef::Described(Color::describe)),
                MemberDescription::new("coats", TypeRef::Primitive(PrimitiveKind::Int32)),
            ],
        )
    }
}

impl ToValue for Paint {
    fn to_value(&self) -> Value {
        Value::record("Paint", vec![self.color.to_value(), Value::Int32(self.coats)])
    }
}

impl FromValue for Paint {
    fn from_value(value: Value) -> Result<Self, DeserializationError> {
        let [color, coats] = unpack(value, "Paint")?;
        Ok(Paint {
            color: Color::from_value(color)?,
            coats: coats.into_i32()?,
        })
    }
}

bitflags::bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Permissions: u32 {
        const READ = 0b0001;
        const WRITE = 0b0010;
        const EXECUTE = 0b0100;
    }
}

/// Bit-flags travel as their combined integer value, not as ordinals.
#[derive(Debug, Clone, PartialEq)]
pub struct Grant {
    pub subject: String,
    pub permissions: Permissions,
}

impl Describe for Grant {
    fn describe() -> TypeDescription {
        TypeDescription::record::<Grant>(
            "Grant",
            vec![
                MemberDescription::new("subject", TypeRef::Primitive(PrimitiveKind::String)),
                MemberDescription::new("permissions", TypeRef::Flags),
            ],
        )
    }
}

impl ToValue for Grant {
    fn to_value(&self) -> Value {
        Value::record(
            "Grant",
            vec![
                Value::String(self.subject.clone()),
                Value::Int64(self.permissions.bits() as i64),
            ],
        )
    }
}

impl FromValue for Grant {
    fn from_value(value: Value) -> Result<Self, DeserializationError> {
        let [subject, permissions] = unpack(value, "Grant")?;
        Ok(Grant {
            subject: subject.into_string()?,
            permissions: Permissions::from_bits_truncate(permissions.into_i64()? as u32),
        })
    }
}

/// A sequence of guids under a label.
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceSet {
    pub name: String,
    pub ids: Vec<Uuid>,
}

impl Describe for DeviceSet {
    fn describe() -> TypeDescription {
        TypeDescription::record::<DeviceSet>(
            "DeviceSet",
            vec![
                MemberDescription::new("name", TypeRef::Primitive(PrimitiveKind::String)),
                MemberDescription::new(
                    "ids",
                    TypeRef::Sequence(Box::new(TypeRef::Primitive(PrimitiveKind::Guid))),
                ),
            ],
        )
    }
}

impl ToValue for DeviceSet {
    fn to_value(&self) -> Value {
        Value::record(
            "DeviceSet",
            vec![
                Value::String(self.name.clone()),
                Value::Sequence(self.ids.iter().map(|id| Value::Guid(*id)).collect()),
            ],
        )
    }
}

impl FromValue for DeviceSet {
    fn from_value(value: Value) -> Result<Self, DeserializationError> {
        let [name, ids] = unpack(value, "DeviceSet")?;
        let ids = ids
            .into_sequence()?
            .into_iter()
            .map(Value::into_guid)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(DeviceSet {
            name: name.into_string()?,
            ids,
        })
    }
}

/// A string-keyed map of ints.
#[derive(Debug, Clone, PartialEq)]
pub struct Lookup {
    pub entries: HashMap<String, i32>,
}

impl Describe for Lookup {
    fn describe() -> TypeDescription {
        TypeDescription::record::<Lookup>(
            "Lookup",
            vec![MemberDescription::new(
                "entries",
                TypeRef::Map(Box::new(TypeRef::Primitive(PrimitiveKind::Int32))),
            )],
        )
    }
}

impl ToValue for Lookup {
    fn to_value(&self) -> Value {
        let entries = self
            .entries
            .iter()
            .map(|(key, value)| (key.clone(), Value::Int32(*value)))
            .collect();
        Value::record("Lookup", vec![Value::Map(entries)])
    }
}

impl FromValue for Lookup {
    fn from_value(value: Value) -> Result<Self, DeserializationError> {
        let [entries] = unpack(value, "Lookup")?;
        let entries = entries
            .into_map()?
            .into_iter()
            .map(|(key, value)| Ok((key, value.into_i32()?)))
            .collect::<Result<HashMap<_, _>, DeserializationError>>()?;
        Ok(Lookup { entries })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Describe for Point {
    fn describe() -> TypeDescription {
        TypeDescription::record::<Point>(
            "Point",
            vec![
                MemberDescription::new("x", TypeRef::Primitive(PrimitiveKind::Int32)),
                MemberDescription::new("y", TypeRef::Primitive(PrimitiveKind::Int32)),
            ],
        )
    }
}

impl ToValue for Point {
    fn to_value(&self) -> Value {
        Value::record("Point", vec![Value::Int32(self.x), Value::Int32(self.y)])
    }
}

impl FromValue for Point {
    fn from_value(value: Value) -> Result<Self, DeserializationError> {
        let [x, y] = unpack(value, "Point")?;
        Ok(Point {
            x: x.into_i32()?,
            y: y.into_i32()?,
        })
    }
}

/// Two members of the same record type; the second schema occurrence is a
/// by-name reference.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    pub from: Point,
    pub to: Point,
}

impl Describe for Segment {
    fn describe() -> TypeDescription {
        TypeDescription::record::<Segment>(
            "Segment",
            vec![
                MemberDescription::new("from", TypeRef::Described(Point::describe)),
                MemberDescription::new("to", TypeRef::Described(Point::describe)),
            ],
        )
    }
}

impl ToValue for Segment {
    fn to_value(&self) -> Value {
        Value::record("Segment", vec![self.from.to_value(), self.to.to_value()])
    }
}

impl FromValue for Segment {
    fn from_value(value: Value) -> Result<Self, DeserializationError> {
        let [from, to] = unpack(value, "Segment")?;
        Ok(Segment {
            from: Point::from_value(from)?,
            to: Point::from_value(to)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Rectangle {
    pub width: f64,
    pub height: f64,
}

impl Describe for Rectangle {
    fn describe() -> TypeDescription {
        TypeDescription::record::<Rectangle>(
            "Rectangle",
            vec![
                MemberDescription::new("width", TypeRef::Primitive(PrimitiveKind::Float64)),
                MemberDescription::new("height", TypeRef::Primitive(PrimitiveKind::Float64)),
            ],
        )
    }
}

impl ToValue for Rectangle {
    fn to_value(&self) -> Value {
        Value::record(
            "Rectangle",
            vec![Value::Float64(self.width), Value::Float64(self.height)],
        )
    }
}

impl FromValue for Rectangle {
    fn from_value(value: Value) -> Result<Self, DeserializationError> {
        let [width, height] = unpack(value, "Rectangle")?;
        Ok(Rectangle {
            width: width.into_f64()?,
            height: height.into_f64()?,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Square {
    pub side: f64,
}

impl Describe for Square {
    fn describe() -> TypeDescription {
        TypeDescription::record::<Square>(
            "Square",
            vec![MemberDescription::new(
                "side",
                TypeRef::Primitive(PrimitiveKind::Float64),
            )],
        )
    }
}

impl ToValue for Square {
    fn to_value(&self) -> Value {
        Value::record("Square", vec![Value::Float64(self.side)])
    }
}

impl FromValue for Square {
    fn from_value(value: Value) -> Result<Self, DeserializationError> {
        let [side] = unpack(value, "Square")?;
        Ok(Square {
            side: side.into_f64()?,
        })
    }
}

/// A closed union over two record variants. Writing dispatches on the
/// variant's record name; reading restores the exact variant written.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Rectangle(Rectangle),
    Square(Square),
}

impl Describe for Shape {
    fn describe() -> TypeDescription {
        TypeDescription::union::<Shape>("Shape", vec![Rectangle::describe, Square::describe])
    }
}

impl ToValue for Shape {
    fn to_value(&self) -> Value {
        match self {
            Shape::Rectangle(rectangle) => rectangle.to_value(),
            Shape::Square(square) => square.to_value(),
        }
    }
}

impl FromValue for Shape {
    fn from_value(value: Value) -> Result<Self, DeserializationError> {
        let record = value.into_record()?;
        match record.name.as_str() {
            "Rectangle" => Rectangle::from_value(Value::Record(record)).map(Shape::Rectangle),
            "Square" => Square::from_value(Value::Record(record)).map(Shape::Square),
            other => Err(DeserializationError::TypeMismatch {
                expected: "a variant of union 'Shape'".to_string(),
                found: format!("record '{}'", other),
            }),
        }
    }
}

/// A record holding a union-typed member.
#[derive(Debug, Clone, PartialEq)]
pub struct Drawing {
    pub title: String,
    pub shape: Shape,
}

impl Describe for Drawing {
    fn describe() -> TypeDescription {
        TypeDescription::record::<Drawing>(
            "Drawing",
            vec![
                MemberDescription::new("title", TypeRef::Primitive(PrimitiveKind::String)),
                MemberDescription::new("shape", TypeRef::Described(Shape::describe)),
            ],
        )
    }
}

impl ToValue for Drawing {
    fn to_value(&self) -> Value {
        Value::record(
            "Drawing",
            vec![Value::String(self.title.clone()), self.shape.to_value()],
        )
    }
}

impl FromValue for Drawing {
    fn from_value(value: Value) -> Result<Self, DeserializationError> {
        let [title, shape] = unpack(value, "Drawing")?;
        Ok(Drawing {
            title: title.into_string()?,
            shape: Shape::from_value(shape)?,
        })
    }
}

/// Carries private state the codec cannot rebuild on its own; serializable
/// only through the registered stand-in.
#[derive(Debug, Clone, PartialEq)]
pub struct SealedCounter {
    start: i32,
}

impl SealedCounter {
    pub fn start_at(start: i32) -> Self {
        SealedCounter { start }
    }

    pub fn start(&self) -> i32 {
        self.start
    }
}

impl Describe for SealedCounter {
    fn describe() -> TypeDescription {
        TypeDescription::record::<SealedCounter>("SealedCounter", Vec::new()).non_constructible()
    }
}

impl ToValue for SealedCounter {
    fn to_value(&self) -> Value {
        Value::record("SealedCounter", vec![Value::Int32(self.start)])
    }
}

impl FromValue for SealedCounter {
    fn from_value(value: Value) -> Result<Self, DeserializationError> {
        let [start] = unpack(value, "SealedCounter")?;
        Ok(SealedCounter::start_at(start.into_i32()?))
    }
}

/// The stand-in record shape for `SealedCounter`.
pub fn counter_state_description() -> TypeDescription {
    struct CounterState;
    TypeDescription::record::<CounterState>(
        "CounterState",
        vec![MemberDescription::new(
            "start",
            TypeRef::Primitive(PrimitiveKind::Int32),
        )],
    )
}

/// Registers the `SealedCounter` stand-in and its conversion pair.
pub fn register_counter_surrogate(registry: &SurrogateRegistry) {
    registry.register::<SealedCounter, _, _>(
        counter_state_description,
        |value| match value {
            Value::Record(record) => Ok(Value::record("CounterState", record.fields)),
            other => Err(SurrogateError::new(format!(
                "expected a SealedCounter record, got {}",
                other.kind()
            ))),
        },
        |value| match value {
            Value::Record(record) => Ok(Value::record("SealedCounter", record.fields)),
            other => Err(SurrogateError::new(format!(
                "expected a CounterState record, got {}",
                other.kind()
            ))),
        },
    );
}
