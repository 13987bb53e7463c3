//! The capsule capability implemented by generated wrapper types

use std::any::{Any, TypeId};

/// Suffix convention for generated capsule type names.
///
/// The generator emits, for a value type `Point`, a wrapper type named
/// `PointCapsule`. The runtime never resolves this name dynamically; the
/// constant documents what generated code looks like.
pub const CAPSULE_SUFFIX: &str = "Capsule";

/// Capability exposed by every generated capsule: report what it holds and
/// hand the value back.
///
/// A capsule takes ownership of its value at construction; nothing is
/// shared back into the original binding afterwards. Generated capsule
/// types additionally implement the platform transport trait, which lives
/// outside this layer.
pub trait Capsule: Send + std::fmt::Debug {
    /// Identity of the wrapped value type
    fn value_type(&self) -> TypeId;

    /// Name of the wrapped value type
    fn value_type_name(&self) -> &'static str;

    /// Consume the capsule and surrender the wrapped value
    fn into_value(self: Box<Self>) -> Box<dyn Any + Send>;
}

/// Boxed capsule as produced by the wrap surface
pub type BoxedCapsule = Box<dyn Capsule>;
