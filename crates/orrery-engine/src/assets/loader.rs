//! Asset loading seam.
//!
//! Model/texture loading lives in the host. The core only asks for a body's
//! visual asset and receives a future; dropping the future cancels the load.

use std::future::Future;
use std::pin::Pin;
use crate::api::error::LoadError;
use crate::api::types::BodyId;

/// Opaque handle to a loaded model, as far as the core is concerned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisualAsset {
    /// Host-side key (URL, cache key, ...).
    pub key: String,
    /// Catalog index, stamped by the director so the host can map nodes back
    /// to bodies without string lookups. -1 until stamped.
    pub index: i32,
}

impl VisualAsset {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            index: -1,
        }
    }

    pub fn with_index(mut self, index: i32) -> Self {
        self.index = index;
        self
    }
}

/// A pending asset load. Single-threaded: no `Send` bound, so JS promises fit.
pub type AssetFuture = Pin<Box<dyn Future<Output = Result<VisualAsset, LoadError>>>>;

/// Source of body visual assets.
pub trait AssetLoader {
    fn load_body_asset(&mut self, id: &BodyId) -> AssetFuture;
}

/// Loader that resolves every request immediately, keyed by body id.
/// Used by native hosts that bundle their models.
#[derive(Debug, Default, Clone)]
pub struct BundledLoader {
    /// Prefix joined to the body id to build the asset key.
    pub prefix: String,
}

impl BundledLoader {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self { prefix: prefix.into() }
    }
}

impl AssetLoader for BundledLoader {
    fn load_body_asset(&mut self, id: &BodyId) -> AssetFuture {
        let key = format!("{}{}", self.prefix, id);
        Box::pin(std::future::ready(Ok::<_, LoadError>(VisualAsset::new(key))))
    }
}
