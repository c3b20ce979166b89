//! Renderer/scene contract consumed by the viewer core.
//!
//! All drawing happens in the host (TypeScript/WebGPU on the web). The core
//! only creates, moves, shows/hides and destroys nodes through this trait.
//! `core::scene::Scene` is the in-memory implementation the web bridge
//! packs into the shared buffer each frame.

use glam::Vec3;
use crate::api::types::NodeHandle;
use crate::assets::loader::VisualAsset;

pub trait SceneGraph {
    /// Create a renderable node for a loaded asset. The node starts hidden
    /// at the origin with unit scale.
    fn create_node(&mut self, asset: &VisualAsset) -> NodeHandle;

    /// Destroy a node and release its resources. Unknown handles are ignored.
    fn destroy_node(&mut self, handle: NodeHandle);

    /// Write position, uniform scale and spin (radians about +Y).
    fn set_transform(&mut self, handle: NodeHandle, position: Vec3, scale: f32, rotation: f32);

    fn set_visible(&mut self, handle: NodeHandle, visible: bool);
}
