//! Capsule runtime - the type-indexed factory registry and the generic
//! wrap/unwrap dispatch over scalars, ordered sequences, fixed arrays, and
//! sparse integer-keyed maps.
//!
//! Construct a [`CapsuleRuntime`] at the application's composition root,
//! hand it the loading context carrying the generated manifest, and share
//! it by reference. Independent instances are fully isolated, so tests can
//! build their own.

pub mod registry;
pub mod resolver;
pub mod runtime;

// Re-export SDK contracts for convenience
pub use capsule_sdk::{
    BoxError, BoxedCapsule, Capsule, CapsuleError, CapsuleFactory, CapsuleResult, Manifest,
    ManifestBuilder, ManifestSource, StaticSource, TypedFactory, ValueType, CAPSULE_SUFFIX,
};

pub use registry::FactoryRegistry;
pub use resolver::Resolver;
pub use runtime::CapsuleRuntime;
