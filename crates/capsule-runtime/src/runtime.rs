//! The wrap/unwrap dispatch surface

use std::any::type_name;
use std::collections::BTreeMap;

use capsule_sdk::{
    BoxedCapsule, CapsuleError, CapsuleResult, Manifest, ManifestSource, ValueType,
};

use crate::registry::FactoryRegistry;

/// The public wrap/unwrap surface over a [`FactoryRegistry`].
///
/// Owns the registry; construct one at the application's composition root
/// and pass it by reference to anything needing wrap/unwrap.
///
/// Absent values short-circuit: wrapping `None` is `None` and unwrapping
/// `None` is `None`, with no factory involved. Collection operations are
/// all-or-nothing - the first element error aborts the whole call and no
/// partial result is returned.
#[derive(Debug, Default)]
pub struct CapsuleRuntime {
    registry: FactoryRegistry,
}

impl CapsuleRuntime {
    /// Runtime with no generated bindings
    pub fn new() -> Self {
        Self::default()
    }

    /// Runtime resolving against the given binding table
    pub fn with_table(table: Manifest) -> Self {
        Self {
            registry: FactoryRegistry::with_table(table),
        }
    }

    /// Runtime resolving against the manifest of the given loading context
    pub fn from_source(source: &dyn ManifestSource) -> CapsuleResult<Self> {
        Ok(Self {
            registry: FactoryRegistry::from_source(source)?,
        })
    }

    /// The underlying factory registry
    pub fn registry(&self) -> &FactoryRegistry {
        &self.registry
    }

    /// Merge the manifest of `source` into the registry, overwriting
    /// entries for overlapping types
    pub fn reload(&self, source: &dyn ManifestSource) -> CapsuleResult<()> {
        self.registry.reload(source)
    }

    // ========================================================================
    // Wrapping
    // ========================================================================

    /// Wrap a single value in its generated capsule
    pub fn wrap<T: Send + 'static>(&self, value: T) -> CapsuleResult<BoxedCapsule> {
        let factory = self.registry.get(ValueType::of::<T>())?;
        factory.build(Box::new(value))
    }

    /// Wrap an optional value; `None` passes through untouched
    pub fn wrap_opt<T: Send + 'static>(
        &self,
        value: Option<T>,
    ) -> CapsuleResult<Option<BoxedCapsule>> {
        value.map(|value| self.wrap(value)).transpose()
    }

    /// Wrap every element of an ordered sequence, preserving length and
    /// element order
    pub fn wrap_vec<T: Send + 'static>(
        &self,
        values: Option<Vec<T>>,
    ) -> CapsuleResult<Option<Vec<BoxedCapsule>>> {
        let values = match values {
            Some(values) => values,
            None => return Ok(None),
        };
        let mut capsules = Vec::with_capacity(values.len());
        for value in values {
            capsules.push(self.wrap(value)?);
        }
        Ok(Some(capsules))
    }

    /// Wrap every element of a fixed-size array, preserving position
    pub fn wrap_array<T: Send + 'static, const N: usize>(
        &self,
        values: Option<[T; N]>,
    ) -> CapsuleResult<Option<[BoxedCapsule; N]>> {
        let values = match values {
            Some(values) => values,
            None => return Ok(None),
        };
        let mut capsules = Vec::with_capacity(N);
        for value in values {
            capsules.push(self.wrap(value)?);
        }
        match capsules.try_into() {
            Ok(capsules) => Ok(Some(capsules)),
            Err(_) => unreachable!("length preserved by element-wise wrap"),
        }
    }

    /// Wrap every entry of a sparse integer-keyed map, preserving the key
    /// set and per-key mapping
    pub fn wrap_sparse<T: Send + 'static>(
        &self,
        values: Option<BTreeMap<i32, T>>,
    ) -> CapsuleResult<Option<BTreeMap<i32, BoxedCapsule>>> {
        let values = match values {
            Some(values) => values,
            None => return Ok(None),
        };
        let mut capsules = BTreeMap::new();
        for (key, value) in values {
            capsules.insert(key, self.wrap(value)?);
        }
        Ok(Some(capsules))
    }

    // ========================================================================
    // Unwrapping
    // ========================================================================

    /// Take the wrapped value back out of a capsule.
    ///
    /// Never consults the registry; the capsule itself carries the
    /// accessor capability. Requesting a different type than the capsule
    /// holds is a type mismatch, not a silent absence.
    pub fn unwrap<T: 'static>(&self, capsule: BoxedCapsule) -> CapsuleResult<T> {
        let got = capsule.value_type_name();
        match capsule.into_value().downcast::<T>() {
            Ok(value) => Ok(*value),
            Err(_) => Err(CapsuleError::TypeMismatch {
                expected: type_name::<T>(),
                got,
            }),
        }
    }

    /// Unwrap an optional capsule; `None` passes through untouched
    pub fn unwrap_opt<T: 'static>(
        &self,
        capsule: Option<BoxedCapsule>,
    ) -> CapsuleResult<Option<T>> {
        capsule.map(|capsule| self.unwrap(capsule)).transpose()
    }

    /// Unwrap every element of an ordered sequence, preserving length and
    /// element order
    pub fn unwrap_vec<T: 'static>(
        &self,
        capsules: Option<Vec<BoxedCapsule>>,
    ) -> CapsuleResult<Option<Vec<T>>> {
        let capsules = match capsules {
            Some(capsules) => capsules,
            None => return Ok(None),
        };
        let mut values = Vec::with_capacity(capsules.len());
        for capsule in capsules {
            values.push(self.unwrap(capsule)?);
        }
        Ok(Some(values))
    }

    /// Unwrap every element of a fixed-size array, preserving position
    pub fn unwrap_array<T: 'static, const N: usize>(
        &self,
        capsules: Option<[BoxedCapsule; N]>,
    ) -> CapsuleResult<Option<[T; N]>> {
        let capsules = match capsules {
            Some(capsules) => capsules,
            None => return Ok(None),
        };
        let mut values = Vec::with_capacity(N);
        for capsule in capsules {
            values.push(self.unwrap(capsule)?);
        }
        match values.try_into() {
            Ok(values) => Ok(Some(values)),
            Err(_) => unreachable!("length preserved by element-wise unwrap"),
        }
    }

    /// Unwrap every entry of a sparse integer-keyed map, preserving the
    /// key set and per-key mapping
    pub fn unwrap_sparse<T: 'static>(
        &self,
        capsules: Option<BTreeMap<i32, BoxedCapsule>>,
    ) -> CapsuleResult<Option<BTreeMap<i32, T>>> {
        let capsules = match capsules {
            Some(capsules) => capsules,
            None => return Ok(None),
        };
        let mut values = BTreeMap::new();
        for (key, capsule) in capsules {
            values.insert(key, self.unwrap(capsule)?);
        }
        Ok(Some(values))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use capsule_sdk::Capsule;
    use std::any::{Any, TypeId};

    #[derive(Debug, Clone, PartialEq)]
    struct Token(u64);

    #[derive(Debug)]
    struct TokenCapsule {
        value: Token,
    }

    impl TokenCapsule {
        fn new(value: Token) -> Self {
            Self { value }
        }
    }

    impl Capsule for TokenCapsule {
        fn value_type(&self) -> TypeId {
            TypeId::of::<Token>()
        }

        fn value_type_name(&self) -> &'static str {
            std::any::type_name::<Token>()
        }

        fn into_value(self: Box<Self>) -> Box<dyn Any + Send> {
            Box::new(self.value)
        }
    }

    fn runtime() -> CapsuleRuntime {
        CapsuleRuntime::with_table(Manifest::builder().register(TokenCapsule::new).build())
    }

    #[test]
    fn test_scalar_round_trip() {
        let runtime = runtime();
        let capsule = runtime.wrap(Token(7)).unwrap();
        let value: Token = runtime.unwrap(capsule).unwrap();
        assert_eq!(value, Token(7));
    }

    #[test]
    fn test_unwrap_wrong_type_is_a_mismatch() {
        let runtime = runtime();
        let capsule = runtime.wrap(Token(7)).unwrap();
        let err = runtime.unwrap::<String>(capsule).unwrap_err();
        assert!(matches!(err, CapsuleError::TypeMismatch { .. }));
    }

    #[test]
    fn test_wrap_unknown_type_is_an_error() {
        let runtime = CapsuleRuntime::new();
        let err = runtime.wrap(Token(7)).unwrap_err();
        assert!(matches!(err, CapsuleError::NotRegistered { .. }));
    }

    #[test]
    fn test_absent_values_pass_through() {
        let runtime = runtime();
        assert!(runtime.wrap_opt(None::<Token>).unwrap().is_none());
        assert!(runtime.unwrap_opt::<Token>(None).unwrap().is_none());
    }
}
