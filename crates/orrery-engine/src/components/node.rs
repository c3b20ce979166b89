use glam::Vec3;
use crate::api::types::NodeHandle;

/// A renderable node as the host sees it.
/// Plain data: the registry decides what it shows and where.
#[derive(Debug, Clone)]
pub struct Node {
    /// Unique handle.
    pub handle: NodeHandle,
    /// Asset key the host uses to pick a model/texture.
    pub asset_key: String,
    /// Index into the host's asset table (catalog order), or -1 if unknown.
    pub asset_index: i32,
    /// Whether the host should draw this node.
    pub visible: bool,
    /// Position in world space.
    pub position: Vec3,
    /// Uniform scale (rendered radius of a unit sphere).
    pub scale: f32,
    /// Spin about +Y in radians.
    pub rotation: f32,
}

impl Node {
    /// Create a hidden node at the origin.
    pub fn new(handle: NodeHandle, asset_key: impl Into<String>) -> Self {
        Self {
            handle,
            asset_key: asset_key.into(),
            asset_index: -1,
            visible: false,
            position: Vec3::ZERO,
            scale: 1.0,
            rotation: 0.0,
        }
    }

    // -- Builder pattern --

    pub fn with_asset_index(mut self, index: i32) -> Self {
        self.asset_index = index;
        self
    }

    pub fn with_position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }
}
