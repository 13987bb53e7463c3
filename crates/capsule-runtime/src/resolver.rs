//! Factory resolution over the generated binding table

use std::sync::Arc;

use capsule_sdk::{CapsuleError, CapsuleFactory, CapsuleResult, Manifest, ValueType};

/// Resolves value types to factories against the statically known binding
/// table of a loading context.
///
/// Resolution is a pure lookup with no side effects; caching is owned by
/// the registry.
#[derive(Debug, Default)]
pub struct Resolver {
    table: Manifest,
}

impl Resolver {
    /// Resolver over the given binding table
    pub fn new(table: Manifest) -> Self {
        Self { table }
    }

    /// Resolver for a context with no generated code
    pub fn empty() -> Self {
        Self::default()
    }

    /// Look up the factory generated for `ty`.
    ///
    /// `Ok(None)` means no binding exists; the caller decides whether that
    /// is fatal. An entry registered under `ty`'s name but bound to a
    /// different type identity is a generated-code mismatch and fails hard.
    pub fn resolve(&self, ty: ValueType) -> CapsuleResult<Option<Arc<dyn CapsuleFactory>>> {
        let factory = match self.table.get(ty.name()) {
            Some(factory) => factory,
            None => return Ok(None),
        };
        if factory.value_type().id() != ty.id() {
            return Err(CapsuleError::MalformedBinding {
                type_name: ty.name(),
            });
        }
        Ok(Some(factory.clone()))
    }

    /// Number of bindings in the table
    pub fn table_len(&self) -> usize {
        self.table.len()
    }
}
