use glam::Vec3;
use crate::api::types::NodeHandle;
use crate::assets::loader::VisualAsset;
use crate::components::node::Node;
use crate::renderer::traits::SceneGraph;

/// Simple node storage using a flat Vec.
/// Designed for a handful of bodies, not thousands.
pub struct Scene {
    nodes: Vec<Node>,
    next_handle: u32,
    /// Lifetime counters, read by the bridge and by tests checking churn.
    created: usize,
    destroyed: usize,
}

impl Scene {
    pub fn new() -> Self {
        Self::with_capacity(16)
    }

    /// Create a scene with a specific node capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity),
            next_handle: 1,
            created: 0,
            destroyed: 0,
        }
    }

    /// Get a reference to a node by handle.
    pub fn get(&self, handle: NodeHandle) -> Option<&Node> {
        self.nodes.iter().find(|n| n.handle == handle)
    }

    fn get_mut(&mut self, handle: NodeHandle) -> Option<&mut Node> {
        self.nodes.iter_mut().find(|n| n.handle == handle)
    }

    /// Iterate over all nodes.
    pub fn iter(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter()
    }

    /// Find the first node created from the given asset key.
    /// Presentation convenience only; the registry tracks nodes by body id.
    pub fn find_by_asset(&self, key: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.asset_key == key)
    }

    /// Number of live nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Total nodes ever created.
    pub fn created_count(&self) -> usize {
        self.created
    }

    /// Total nodes ever destroyed.
    pub fn destroyed_count(&self) -> usize {
        self.destroyed
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneGraph for Scene {
    fn create_node(&mut self, asset: &VisualAsset) -> NodeHandle {
        let handle = NodeHandle(self.next_handle);
        self.next_handle += 1;
        self.created += 1;
        self.nodes
            .push(Node::new(handle, asset.key.clone()).with_asset_index(asset.index));
        handle
    }

    fn destroy_node(&mut self, handle: NodeHandle) {
        if let Some(idx) = self.nodes.iter().position(|n| n.handle == handle) {
            self.nodes.swap_remove(idx);
            self.destroyed += 1;
        }
    }

    fn set_transform(&mut self, handle: NodeHandle, position: Vec3, scale: f32, rotation: f32) {
        if let Some(node) = self.get_mut(handle) {
            node.position = position;
            node.scale = scale;
            node.rotation = rotation;
        }
    }

    fn set_visible(&mut self, handle: NodeHandle, visible: bool) {
        if let Some(node) = self.get_mut(handle) {
            node.visible = visible;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn asset(key: &str) -> VisualAsset {
        VisualAsset::new(key)
    }

    #[test]
    fn create_and_get() {
        let mut scene = Scene::new();
        let h = scene.create_node(&asset("earth"));
        let node = scene.get(h).unwrap();
        assert_eq!(node.asset_key, "earth");
        assert!(!node.visible, "nodes start hidden");
    }

    #[test]
    fn destroy_removes_node() {
        let mut scene = Scene::new();
        let h = scene.create_node(&asset("mars"));
        assert_eq!(scene.len(), 1);
        scene.destroy_node(h);
        assert_eq!(scene.len(), 0);
        assert_eq!(scene.destroyed_count(), 1);

        // Second destroy is a no-op
        scene.destroy_node(h);
        assert_eq!(scene.destroyed_count(), 1);
    }

    #[test]
    fn handles_are_never_reused() {
        let mut scene = Scene::new();
        let a = scene.create_node(&asset("a"));
        scene.destroy_node(a);
        let b = scene.create_node(&asset("b"));
        assert_ne!(a, b);
    }

    #[test]
    fn set_transform_writes_through() {
        let mut scene = Scene::new();
        let h = scene.create_node(&asset("venus"));
        scene.set_transform(h, Vec3::new(1.0, 2.0, 3.0), 4.0, 0.5);
        scene.set_visible(h, true);
        let node = scene.find_by_asset("venus").unwrap();
        assert_eq!(node.position, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(node.scale, 4.0);
        assert_eq!(node.rotation, 0.5);
        assert!(node.visible);
    }
}
