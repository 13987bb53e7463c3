//! Capsule factories - the bound constructor capability

use std::any::Any;
use std::fmt;

use crate::capsule::{BoxedCapsule, Capsule};
use crate::error::{BoxError, CapsuleError, CapsuleResult};
use crate::types::ValueType;

/// Builds a capsule from one value instance.
///
/// A factory is stateless, bound to exactly one value type, and safe to
/// invoke concurrently from multiple callers.
pub trait CapsuleFactory: Send + Sync + fmt::Debug {
    /// The value type this factory accepts
    fn value_type(&self) -> ValueType;

    /// Build the capsule for `value`.
    ///
    /// `value` must hold exactly the type reported by
    /// [`value_type`](CapsuleFactory::value_type); anything else is a
    /// generated-code mismatch.
    fn build(&self, value: Box<dyn Any + Send>) -> CapsuleResult<BoxedCapsule>;
}

enum Constructor<T, W> {
    Infallible(fn(T) -> W),
    Fallible(fn(T) -> Result<W, BoxError>),
}

/// Factory binding a value type `T` to its generated capsule type `W`.
///
/// Owns the constructor the generator emitted for `T` and invokes it after
/// recovering the typed value from the type-erased argument.
pub struct TypedFactory<T, W> {
    construct: Constructor<T, W>,
}

impl<T, W> TypedFactory<T, W>
where
    T: Send + 'static,
    W: Capsule + 'static,
{
    /// Factory around an infallible generated constructor
    pub fn new(construct: fn(T) -> W) -> Self {
        Self {
            construct: Constructor::Infallible(construct),
        }
    }

    /// Factory around a fallible generated constructor
    pub fn fallible(construct: fn(T) -> Result<W, BoxError>) -> Self {
        Self {
            construct: Constructor::Fallible(construct),
        }
    }
}

impl<T, W> CapsuleFactory for TypedFactory<T, W>
where
    T: Send + 'static,
    W: Capsule + 'static,
{
    fn value_type(&self) -> ValueType {
        ValueType::of::<T>()
    }

    fn build(&self, value: Box<dyn Any + Send>) -> CapsuleResult<BoxedCapsule> {
        let value = match value.downcast::<T>() {
            Ok(value) => *value,
            Err(_) => {
                return Err(CapsuleError::MalformedBinding {
                    type_name: std::any::type_name::<T>(),
                })
            }
        };
        let capsule = match &self.construct {
            Constructor::Infallible(construct) => construct(value),
            Constructor::Fallible(construct) => {
                construct(value).map_err(|source| CapsuleError::BuildFailed {
                    type_name: std::any::type_name::<T>(),
                    source,
                })?
            }
        };
        Ok(Box::new(capsule))
    }
}

impl<T, W> fmt::Debug for TypedFactory<T, W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypedFactory")
            .field("value_type", &std::any::type_name::<T>())
            .field("capsule_type", &std::any::type_name::<W>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::any::TypeId;

    #[derive(Debug, Clone, PartialEq)]
    struct Note {
        text: String,
    }

    #[derive(Debug)]
    struct NoteCapsule {
        value: Note,
    }

    impl NoteCapsule {
        fn new(value: Note) -> Self {
            Self { value }
        }
    }

    impl Capsule for NoteCapsule {
        fn value_type(&self) -> TypeId {
            TypeId::of::<Note>()
        }

        fn value_type_name(&self) -> &'static str {
            std::any::type_name::<Note>()
        }

        fn into_value(self: Box<Self>) -> Box<dyn Any + Send> {
            Box::new(self.value)
        }
    }

    fn note(text: &str) -> Note {
        Note { text: text.to_string() }
    }

    #[test]
    fn test_build_produces_capsule() {
        let factory = TypedFactory::new(NoteCapsule::new);
        let capsule = factory.build(Box::new(note("hello"))).unwrap();

        assert_eq!(capsule.value_type(), TypeId::of::<Note>());
        let value = capsule.into_value().downcast::<Note>().unwrap();
        assert_eq!(value.text, "hello");
    }

    #[test]
    fn test_build_rejects_wrong_value_type() {
        let factory = TypedFactory::new(NoteCapsule::new);
        let err = factory.build(Box::new(42i32)).unwrap_err();
        assert!(matches!(err, CapsuleError::MalformedBinding { .. }));
    }

    #[test]
    fn test_fallible_constructor_failure() {
        fn reject(_value: Note) -> Result<NoteCapsule, BoxError> {
            Err("text too long".into())
        }

        let factory = TypedFactory::fallible(reject);
        let err = factory.build(Box::new(note("hello"))).unwrap_err();
        match err {
            CapsuleError::BuildFailed { source, .. } => {
                assert_eq!(source.to_string(), "text too long");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_fallible_constructor_success() {
        fn accept(value: Note) -> Result<NoteCapsule, BoxError> {
            Ok(NoteCapsule::new(value))
        }

        let factory = TypedFactory::fallible(accept);
        let capsule = factory.build(Box::new(note("ok"))).unwrap();
        assert_eq!(capsule.value_type_name(), std::any::type_name::<Note>());
    }

    #[test]
    fn test_factory_reports_value_type() {
        let factory = TypedFactory::new(NoteCapsule::new);
        assert_eq!(factory.value_type(), ValueType::of::<Note>());
    }
}
