//! Capsule SDK - contracts for generated capsule code
//!
//! This crate provides the minimal types and traits needed by generated
//! capsule wrappers and their manifests, without depending on the capsule
//! runtime itself.
//!
//! # Example
//!
//! What the generator emits for a value type `Point`:
//!
//! ```ignore
//! use capsule_sdk::{Capsule, CapsuleResult, Manifest, ManifestSource};
//! use std::any::{Any, TypeId};
//!
//! pub struct PointCapsule {
//!     value: Point,
//! }
//!
//! impl PointCapsule {
//!     pub fn new(value: Point) -> Self {
//!         Self { value }
//!     }
//! }
//!
//! impl Capsule for PointCapsule {
//!     fn value_type(&self) -> TypeId {
//!         TypeId::of::<Point>()
//!     }
//!
//!     fn value_type_name(&self) -> &'static str {
//!         std::any::type_name::<Point>()
//!     }
//!
//!     fn into_value(self: Box<Self>) -> Box<dyn Any + Send> {
//!         Box::new(self.value)
//!     }
//! }
//!
//! pub struct GeneratedCapsules;
//!
//! impl ManifestSource for GeneratedCapsules {
//!     fn manifest(&self) -> CapsuleResult<Option<Manifest>> {
//!         Ok(Some(Manifest::builder().register(PointCapsule::new).build()))
//!     }
//! }
//! ```

#![warn(missing_docs)]

pub mod capsule;
pub mod error;
pub mod factory;
pub mod manifest;
pub mod source;
pub mod types;

pub use capsule::{BoxedCapsule, Capsule, CAPSULE_SUFFIX};
pub use error::{BoxError, CapsuleError, CapsuleResult};
pub use factory::{CapsuleFactory, TypedFactory};
pub use manifest::{Manifest, ManifestBuilder};
pub use source::{ManifestSource, StaticSource};
pub use types::ValueType;
