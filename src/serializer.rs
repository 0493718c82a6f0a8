// Typed facade over the schema builder and the binary codec.

use std::io::{Read, Write};
use std::marker::PhantomData;
use std::sync::Arc;

use tracing::debug;

use crate::codec::{read_value, skip_value, write_value};
use crate::internal::error::{ConstructionError, DeserializationError, SerializationError};
use crate::schema::{Describe, FromValue, SchemaBuilder, SchemaModel, SurrogateRegistry, ToValue};

/// Settings for constructing a serializer.
#[derive(Debug, Clone, Default)]
pub struct SerializerSettings {
    /// Registry consulted when a described type cannot be built directly.
    pub surrogates: Arc<SurrogateRegistry>,
}

/// A schema-bound serializer for values of one Rust type.
///
/// The schema is compiled once, eagerly, at construction; serialize and
/// deserialize then run against the frozen model, so a given serializer
/// always produces and accepts one wire shape.
#[derive(Debug)]
pub struct Serializer<T> {
    model: SchemaModel,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Describe> Serializer<T> {
    pub fn new() -> Result<Self, ConstructionError> {
        Self::with_settings(SerializerSettings::default())
    }

    pub fn with_settings(settings: SerializerSettings) -> Result<Self, ConstructionError> {
        let description = T::describe();
        debug!("constructing serializer for '{}'", description.name);
        let builder = SchemaBuilder::with_registry(settings.surrogates);
        let model = builder.build(&description)?;
        Ok(Serializer {
            model,
            _marker: PhantomData,
        })
    }

    /// The schema model this serializer writes and reads against.
    pub fn schema(&self) -> &SchemaModel {
        &self.model
    }

    /// Advances the reader past one encoded value without decoding it.
    pub fn skip<R: Read>(&self, reader: &mut R) -> Result<(), DeserializationError> {
        skip_value(reader, &self.model)
    }
}

impl<T: Describe + ToValue> Serializer<T> {
    /// Encodes one value onto the writer. Nothing lands on the writer once
    /// an error surfaces mid-value.
    pub fn serialize<W: Write>(
        &self,
        writer: &mut W,
        value: &T,
    ) -> Result<(), SerializationError> {
        write_value(writer, &self.model, &value.to_value())
    }
}

impl<T: Describe + FromValue> Serializer<T> {
    /// Decodes one value from the reader.
    pub fn deserialize<R: Read>(&self, reader: &mut R) -> Result<T, DeserializationError> {
        let value = read_value(reader, &self.model)?;
        T::from_value(value)
    }
}
