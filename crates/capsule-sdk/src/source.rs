//! Loading contexts - where generated manifests come from

use crate::error::CapsuleResult;
use crate::manifest::Manifest;

/// A source of generated capsule manifests (a loading context).
///
/// `Ok(None)` means no generated code exists for this context, which is
/// legitimate and not an error. `Err` means a manifest exists but could
/// not be produced.
pub trait ManifestSource: Send + Sync {
    /// The manifest generated for this context, if any
    fn manifest(&self) -> CapsuleResult<Option<Manifest>>;
}

/// Loading context backed by an in-memory manifest.
///
/// Generated code ships its own [`ManifestSource`]; this adapter covers
/// tests and hosts that assemble manifests by hand.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    manifest: Option<Manifest>,
}

impl StaticSource {
    /// Context exposing the given manifest
    pub fn new(manifest: Manifest) -> Self {
        Self {
            manifest: Some(manifest),
        }
    }

    /// Context with no generated code
    pub fn empty() -> Self {
        Self { manifest: None }
    }
}

impl ManifestSource for StaticSource {
    fn manifest(&self) -> CapsuleResult<Option<Manifest>> {
        Ok(self.manifest.clone())
    }
}
