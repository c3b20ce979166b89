use bytemuck::{Pod, Zeroable};
use crate::components::node::Node;

/// Per-node render data written to the shared buffer for the TypeScript renderer.
/// Must match the TypeScript protocol: 8 floats = 32 bytes stride.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct NodeInstance {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    /// Uniform scale (world-space radius of the body mesh).
    pub scale: f32,
    /// Spin about +Y in radians.
    pub rotation: f32,
    /// 1.0 when visible.
    pub visible: f32,
    /// Host-side asset index resolved by the loader (-1 if none).
    pub asset_index: f32,
    /// Scene handle, so the host can keep its own mesh map in sync.
    pub handle: f32,
}

impl NodeInstance {
    pub const FLOATS: usize = 8;
    pub const STRIDE_BYTES: usize = Self::FLOATS * 4;

    pub fn from_node(node: &Node) -> Self {
        Self {
            x: node.position.x,
            y: node.position.y,
            z: node.position.z,
            scale: node.scale,
            rotation: node.rotation,
            visible: if node.visible { 1.0 } else { 0.0 },
            asset_index: node.asset_index as f32,
            handle: node.handle.0 as f32,
        }
    }
}

/// Flat buffer of node instances rebuilt every frame.
pub struct NodeBuffer {
    instances: Vec<NodeInstance>,
    capacity: usize,
}

impl NodeBuffer {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            instances: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Replace the contents with `nodes`, truncated to capacity.
    pub fn rebuild<'a>(&mut self, nodes: impl Iterator<Item = &'a Node>) {
        self.instances.clear();
        for node in nodes {
            if self.instances.len() == self.capacity {
                log::warn!("node buffer full ({}), dropping the rest", self.capacity);
                break;
            }
            self.instances.push(NodeInstance::from_node(node));
        }
    }

    pub fn instances(&self) -> &[NodeInstance] {
        &self.instances
    }

    pub fn instance_count(&self) -> u32 {
        self.instances.len() as u32
    }

    /// Raw pointer to instance data for shared-buffer reads.
    pub fn instances_ptr(&self) -> *const f32 {
        self.instances.as_ptr() as *const f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::NodeHandle;
    use glam::Vec3;

    #[test]
    fn node_instance_is_8_floats() {
        assert_eq!(std::mem::size_of::<NodeInstance>(), NodeInstance::STRIDE_BYTES);
    }

    #[test]
    fn from_node_copies_transform() {
        let node = Node::new(NodeHandle(7), "earth")
            .with_position(Vec3::new(1.0, 2.0, 3.0))
            .with_scale(6.4)
            .with_visible(true);
        let inst = NodeInstance::from_node(&node);
        assert_eq!((inst.x, inst.y, inst.z), (1.0, 2.0, 3.0));
        assert_eq!(inst.scale, 6.4);
        assert_eq!(inst.visible, 1.0);
        assert_eq!(inst.handle, 7.0);
        assert_eq!(inst.asset_index, -1.0);
    }

    #[test]
    fn rebuild_respects_capacity() {
        let nodes: Vec<Node> = (0..5).map(|i| Node::new(NodeHandle(i), "x")).collect();
        let mut buf = NodeBuffer::with_capacity(3);
        buf.rebuild(nodes.iter());
        assert_eq!(buf.instance_count(), 3);
        buf.rebuild(nodes.iter().take(1));
        assert_eq!(buf.instance_count(), 1);
    }
}
