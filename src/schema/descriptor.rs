// Type descriptions for the Fulmen schema system
//
// A native type is described once, as an explicit value: which members
// participate, how each member's type maps onto schema shapes, and whether
// the codec can construct the type directly. The schema builder compiles
// these descriptions; the codec never inspects the native type again.

use std::any::TypeId;

use crate::codec::types::Value;
use crate::internal::error::DeserializationError;
use crate::schema::types::PrimitiveKind;

/// A function producing the description of some native type.
///
/// Plain function pointers keep descriptions cheap to reference from other
/// descriptions, which is what makes recursive graphs expressible.
pub type DescribeFn = fn() -> TypeDescription;

/// Describes one native type to the schema builder.
#[derive(Debug, Clone)]
pub struct TypeDescription {
    /// Record, union, or enum name; record names must be unique per graph.
    pub name: String,
    /// Identity of the native type, used for recursion detection and
    /// surrogate lookup.
    pub id: TypeId,
    pub kind: TypeKind,
}

impl TypeDescription {
    /// Describes a record type with the given members.
    pub fn record<T: 'static>(name: impl Into<String>, members: Vec<MemberDescription>) -> Self {
        TypeDescription {
            name: name.into(),
            id: TypeId::of::<T>(),
            kind: TypeKind::Record {
                members,
                constructible: true,
            },
        }
    }

    /// Describes a closed union over the given record variants, in
    /// declaration order.
    pub fn union<T: 'static>(name: impl Into<String>, variants: Vec<DescribeFn>) -> Self {
        TypeDescription {
            name: name.into(),
            id: TypeId::of::<T>(),
            kind: TypeKind::Union { variants },
        }
    }

    /// Describes an enumeration with the given symbols, in ordinal order.
    pub fn enumeration<T: 'static>(name: impl Into<String>, symbols: &[&str]) -> Self {
        TypeDescription {
            name: name.into(),
            id: TypeId::of::<T>(),
            kind: TypeKind::Enum {
                symbols: symbols.iter().map(|s| s.to_string()).collect(),
            },
        }
    }

    /// Marks a record as not directly constructible by the codec; building
    /// it then requires a registered surrogate.
    pub fn non_constructible(mut self) -> Self {
        if let TypeKind::Record { constructible, .. } = &mut self.kind {
            *constructible = false;
        }
        self
    }
}

/// The structural kind of a described type.
#[derive(Debug, Clone)]
pub enum TypeKind {
    Record {
        members: Vec<MemberDescription>,
        /// Whether the codec can materialize this type without a surrogate.
        constructible: bool,
    },
    Union {
        variants: Vec<DescribeFn>,
    },
    Enum {
        symbols: Vec<String>,
    },
}

/// Describes one member of a record type.
#[derive(Debug, Clone)]
pub struct MemberDescription {
    pub name: String,
    pub ty: TypeRef,
    /// Explicit inclusion marker. When any member of a record carries it,
    /// only marked members participate in the schema.
    pub data_member: bool,
    /// Forces a nullable wire shape even for a non-optional native member.
    pub nullable_schema: bool,
}

impl MemberDescription {
    pub fn new(name: impl Into<String>, ty: TypeRef) -> Self {
        MemberDescription {
            name: name.into(),
            ty,
            data_member: false,
            nullable_schema: false,
        }
    }

    /// Marks the member as an explicit data member.
    pub fn data_member(mut self) -> Self {
        self.data_member = true;
        self
    }

    /// Forces the member onto a nullable wire shape.
    pub fn nullable_schema(mut self) -> Self {
        self.nullable_schema = true;
        self
    }
}

/// References the type of a member.
#[derive(Debug, Clone)]
pub enum TypeRef {
    Primitive(PrimitiveKind),
    /// An optional native value; compiles to a nullable node. Optional of
    /// optional collapses to a single nullable layer.
    Optional(Box<TypeRef>),
    Sequence(Box<TypeRef>),
    /// String-keyed map of the given value type.
    Map(Box<TypeRef>),
    /// A bit-flags enumeration; compiles to a plain 64-bit integer, never an
    /// enum node.
    Flags,
    /// Another described type: a nested record, union, or enum.
    Described(DescribeFn),
}

/// Produces the one-time shape description of a native type.
pub trait Describe {
    fn describe() -> TypeDescription;
}

/// Converts a native value into the codec's dynamic representation.
pub trait ToValue {
    fn to_value(&self) -> Value;
}

/// Reconstructs a native value from the codec's dynamic representation.
pub trait FromValue: Sized {
    fn from_value(value: Value) -> Result<Self, DeserializationError>;
}
