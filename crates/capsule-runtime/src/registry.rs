//! Concurrent value-type-to-factory cache

use std::any::TypeId;
use std::fmt;
use std::sync::Arc;

use dashmap::DashMap;
use rustc_hash::FxBuildHasher;

use capsule_sdk::{
    CapsuleError, CapsuleFactory, CapsuleResult, Manifest, ManifestSource, ValueType,
};

use crate::resolver::Resolver;

/// Concurrent cache of capsule factories keyed by value type.
///
/// Lookups of cached types touch only a shard read lock; misses resolve
/// against the loading context's binding table outside any lock and
/// install with insert-if-absent, so racing callers converge on a single
/// factory per type. Entries are never evicted; [`reload`](Self::reload)
/// merges a fresh manifest, overwriting overlapping types.
///
/// Owned by the application's composition root and passed by reference.
/// Independent instances are fully isolated.
pub struct FactoryRegistry {
    cache: DashMap<TypeId, Arc<dyn CapsuleFactory>, FxBuildHasher>,
    resolver: Resolver,
}

impl FactoryRegistry {
    /// Registry with no generated bindings
    pub fn new() -> Self {
        Self::with_table(Manifest::default())
    }

    /// Registry resolving against the given binding table
    pub fn with_table(table: Manifest) -> Self {
        Self {
            cache: DashMap::with_hasher(FxBuildHasher::default()),
            resolver: Resolver::new(table),
        }
    }

    /// Registry resolving against the manifest of the given loading
    /// context.
    ///
    /// A context with no generated manifest yields an empty binding table.
    pub fn from_source(source: &dyn ManifestSource) -> CapsuleResult<Self> {
        let table = source.manifest()?.unwrap_or_default();
        Ok(Self::with_table(table))
    }

    /// Factory for `ty`, resolving and caching it on first use.
    ///
    /// A type with no generated binding is a hard error; this never hands
    /// back a missing factory.
    pub fn get(&self, ty: ValueType) -> CapsuleResult<Arc<dyn CapsuleFactory>> {
        if let Some(factory) = self.cache.get(&ty.id()) {
            return Ok(factory.clone());
        }

        let resolved = match self.resolver.resolve(ty)? {
            Some(factory) => factory,
            None => {
                return Err(CapsuleError::NotRegistered {
                    type_name: ty.name(),
                })
            }
        };

        // First install wins; a losing racer discards its resolution and
        // observes the winner.
        let winner = self
            .cache
            .entry(ty.id())
            .or_insert_with(|| {
                log::trace!("caching capsule factory for `{}`", ty.name());
                resolved
            })
            .value()
            .clone();
        Ok(winner)
    }

    /// Merge the manifest of `source` into the cache, overwriting entries
    /// for overlapping types.
    ///
    /// A context with no generated manifest is a no-op, not an error.
    pub fn reload(&self, source: &dyn ManifestSource) -> CapsuleResult<()> {
        let manifest = match source.manifest()? {
            Some(manifest) => manifest,
            None => return Ok(()),
        };
        log::debug!("merging {} capsule factories into the registry", manifest.len());
        for (name, factory) in manifest.entries() {
            log::trace!("installing capsule factory for `{name}`");
            self.cache.insert(factory.value_type().id(), factory.clone());
        }
        Ok(())
    }

    /// Check whether a factory for `ty` is cached
    pub fn contains(&self, ty: ValueType) -> bool {
        self.cache.contains_key(&ty.id())
    }

    /// Number of cached factories
    pub fn cached_len(&self) -> usize {
        self.cache.len()
    }

    /// Check if the cache is empty
    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }
}

impl Default for FactoryRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for FactoryRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FactoryRegistry")
            .field("cached", &self.cache.len())
            .field("bindings", &self.resolver.table_len())
            .finish()
    }
}
