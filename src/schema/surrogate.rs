// Surrogate registry for the Fulmen schema system
//
// Some native types cannot be materialized by the codec directly. A surrogate
// maps such a type to a constructible stand-in record plus conversion
// functions in both directions. Lookup is keyed by exact type identity; a
// subtype of a registered type is never covered implicitly.

use std::any::TypeId;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use tracing::trace;

use crate::codec::types::Value;
use crate::internal::error::SurrogateError;
use crate::schema::descriptor::DescribeFn;
use crate::schema::types::ConvertFn;

/// A registered surrogate: the stand-in record description and the
/// conversion pair the codec applies around it.
#[derive(Clone)]
pub struct SurrogateEntry {
    pub description: DescribeFn,
    pub to_surrogate: Arc<ConvertFn>,
    pub from_surrogate: Arc<ConvertFn>,
}

impl std::fmt::Debug for SurrogateEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SurrogateEntry")
            .field("description", &(self.description)().name)
            .finish()
    }
}

/// Exact-type-keyed registry of surrogates.
///
/// Registrations may race schema construction in a hosting application, so
/// the table sits behind a single-writer/many-reader lock.
#[derive(Debug, Default)]
pub struct SurrogateRegistry {
    entries: RwLock<HashMap<TypeId, SurrogateEntry>>,
}

impl SurrogateRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a surrogate for the native type `T`. Registering `T` a
    /// second time replaces the previous entry.
    pub fn register<T, F, G>(&self, description: DescribeFn, to_surrogate: F, from_surrogate: G)
    where
        T: 'static,
        F: Fn(Value) -> Result<Value, SurrogateError> + Send + Sync + 'static,
        G: Fn(Value) -> Result<Value, SurrogateError> + Send + Sync + 'static,
    {
        let entry = SurrogateEntry {
            description,
            to_surrogate: Arc::new(to_surrogate),
            from_surrogate: Arc::new(from_surrogate),
        };
        trace!(
            "registering surrogate '{}' for {}",
            (description)().name,
            std::any::type_name::<T>()
        );
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(TypeId::of::<T>(), entry);
    }

    /// Looks up the surrogate registered for a type identity, if any.
    pub fn lookup(&self, id: TypeId) -> Option<SurrogateEntry> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&id)
            .cloned()
    }

    /// Number of registered surrogates.
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Whether the registry has no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
