//! Generated manifests - bulk (value type -> factory) snapshots

use std::fmt;
use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::capsule::Capsule;
use crate::error::BoxError;
use crate::factory::{CapsuleFactory, TypedFactory};

/// Read-only mapping of value types to capsule factories, emitted by the
/// generator for one loading context.
///
/// Keyed by value type name, the identity the generator works with. The
/// runtime validates type identity when it resolves an entry.
#[derive(Clone, Default)]
pub struct Manifest {
    entries: FxHashMap<&'static str, Arc<dyn CapsuleFactory>>,
}

impl Manifest {
    /// Start building a manifest
    pub fn builder() -> ManifestBuilder {
        ManifestBuilder {
            entries: FxHashMap::default(),
        }
    }

    /// Factory registered under the given value type name
    pub fn get(&self, type_name: &str) -> Option<&Arc<dyn CapsuleFactory>> {
        self.entries.get(type_name)
    }

    /// Iterate over (value type name, factory) entries
    pub fn entries(&self) -> impl Iterator<Item = (&'static str, &Arc<dyn CapsuleFactory>)> {
        self.entries.iter().map(|(name, factory)| (*name, factory))
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the manifest has no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Debug for Manifest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Manifest")
            .field("entries", &self.entries.len())
            .finish()
    }
}

/// Builder for [`Manifest`]
pub struct ManifestBuilder {
    entries: FxHashMap<&'static str, Arc<dyn CapsuleFactory>>,
}

impl ManifestBuilder {
    /// Register the generated capsule constructor for the value type `T`
    pub fn register<T, W>(self, construct: fn(T) -> W) -> Self
    where
        T: Send + 'static,
        W: Capsule + 'static,
    {
        self.insert(Arc::new(TypedFactory::new(construct)))
    }

    /// Register a fallible generated constructor for the value type `T`
    pub fn register_fallible<T, W>(self, construct: fn(T) -> Result<W, BoxError>) -> Self
    where
        T: Send + 'static,
        W: Capsule + 'static,
    {
        self.insert(Arc::new(TypedFactory::fallible(construct)))
    }

    /// Insert a factory keyed by its own value type name
    pub fn insert(mut self, factory: Arc<dyn CapsuleFactory>) -> Self {
        self.entries.insert(factory.value_type().name(), factory);
        self
    }

    /// Insert a factory under an explicit name.
    ///
    /// Generated tables normally key entries by the factory's own value
    /// type name; this is the raw form those tables are emitted with.
    pub fn insert_named(
        mut self,
        type_name: &'static str,
        factory: Arc<dyn CapsuleFactory>,
    ) -> Self {
        self.entries.insert(type_name, factory);
        self
    }

    /// Build the manifest
    pub fn build(self) -> Manifest {
        Manifest {
            entries: self.entries,
        }
    }
}
