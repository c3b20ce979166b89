use std::collections::HashMap;
use glam::Vec3;
use crate::api::error::UnknownBodyError;
use crate::api::types::{BodyId, NodeHandle};
use crate::assets::catalog::{BodyCatalog, BodyDescriptor};
use crate::assets::loader::VisualAsset;
use crate::extensions::transform::Placement;
use crate::renderer::traits::SceneGraph;

/// Scale convention a live body was materialized under.
/// Changing convention means destroying the node and creating a new one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Representation {
    /// Individually scaled by visual radius (default, paired, free flight).
    Scaled,
    /// Fixed orbit-mode scale, position driven by orbital phase.
    Orbital,
}

/// A body currently present in the scene.
#[derive(Debug, Clone, PartialEq)]
pub struct BodyInstance {
    pub id: BodyId,
    /// Owned node; destroyed on release.
    pub node: NodeHandle,
    pub representation: Representation,
    pub position: Vec3,
    pub scale: f32,
    /// Spin about +Y in radians.
    pub rotation: f32,
    /// Orbital angle in radians. Only set for orbiting bodies in orbit mode.
    pub orbital_phase: Option<f32>,
    pub visible: bool,
}

impl BodyInstance {
    pub fn placement(&self) -> Placement {
        Placement::new(self.position, self.scale)
    }

    pub(crate) fn sync(&self, scene: &mut impl SceneGraph) {
        scene.set_transform(self.node, self.position, self.scale, self.rotation);
        scene.set_visible(self.node, self.visible);
    }
}

/// Canonical body data plus the id → live instance map.
/// Holds at most one instance per body id.
pub struct BodyRegistry {
    catalog: BodyCatalog,
    live: HashMap<BodyId, BodyInstance>,
}

impl BodyRegistry {
    pub fn new(catalog: BodyCatalog) -> Self {
        let capacity = catalog.len();
        Self {
            catalog,
            live: HashMap::with_capacity(capacity),
        }
    }

    pub fn catalog(&self) -> &BodyCatalog {
        &self.catalog
    }

    /// Static descriptor for a body.
    pub fn get(&self, id: &BodyId) -> Result<&BodyDescriptor, UnknownBodyError> {
        self.catalog.get(id)
    }

    /// Create the body's node at `placement`, or update the existing instance
    /// in place. Never creates a second node for the same id.
    pub fn materialize(
        &mut self,
        scene: &mut impl SceneGraph,
        id: &BodyId,
        asset: &VisualAsset,
        placement: Placement,
        representation: Representation,
    ) -> Result<&BodyInstance, UnknownBodyError> {
        self.catalog.get(id)?;
        let instance = self.live.entry(id.clone()).or_insert_with(|| {
            let node = scene.create_node(asset);
            BodyInstance {
                id: id.clone(),
                node,
                representation,
                position: placement.position,
                scale: placement.scale,
                rotation: 0.0,
                orbital_phase: None,
                visible: true,
            }
        });
        instance.representation = representation;
        instance.position = placement.position;
        instance.scale = placement.scale;
        instance.visible = true;
        instance.sync(scene);
        Ok(instance)
    }

    /// Destroy the body's node and forget it. No-op if not live.
    pub fn release(&mut self, scene: &mut impl SceneGraph, id: &BodyId) {
        if let Some(instance) = self.live.remove(id) {
            scene.destroy_node(instance.node);
        }
    }

    /// Release every live body.
    pub fn release_all(&mut self, scene: &mut impl SceneGraph) {
        for (_, instance) in self.live.drain() {
            scene.destroy_node(instance.node);
        }
    }

    /// Mutate a live instance and write its transform to the scene.
    /// Returns false if the body is not live.
    pub fn update(
        &mut self,
        scene: &mut impl SceneGraph,
        id: &BodyId,
        f: impl FnOnce(&mut BodyInstance),
    ) -> bool {
        match self.live.get_mut(id) {
            Some(instance) => {
                f(instance);
                instance.sync(scene);
                true
            }
            None => false,
        }
    }

    /// Set position/scale of a live instance.
    pub fn write_placement(
        &mut self,
        scene: &mut impl SceneGraph,
        id: &BodyId,
        placement: Placement,
    ) -> bool {
        self.update(scene, id, |instance| {
            instance.position = placement.position;
            instance.scale = placement.scale;
        })
    }

    pub fn instance(&self, id: &BodyId) -> Option<&BodyInstance> {
        self.live.get(id)
    }

    pub fn is_live(&self, id: &BodyId) -> bool {
        self.live.contains_key(id)
    }

    /// Snapshot of live instances in catalog order.
    pub fn all(&self) -> Vec<BodyInstance> {
        self.catalog
            .ids()
            .filter_map(|id| self.live.get(id).cloned())
            .collect()
    }

    /// Ids of live instances in catalog order.
    pub fn live_ids(&self) -> Vec<BodyId> {
        self.catalog
            .ids()
            .filter(|id| self.live.contains_key(*id))
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.live.len()
    }

    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    /// Catalog alongside mutable live instances, in no particular order.
    /// Callers must write transforms back themselves (`BodyInstance::sync`).
    pub(crate) fn split_mut(&mut self) -> (&BodyCatalog, impl Iterator<Item = &mut BodyInstance>) {
        (&self.catalog, self.live.values_mut())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::scene::Scene;

    fn registry() -> BodyRegistry {
        BodyRegistry::new(BodyCatalog::builtin(9))
    }

    fn earth() -> BodyId {
        BodyId::new("earth")
    }

    #[test]
    fn materialize_twice_reuses_the_node() {
        let mut reg = registry();
        let mut scene = Scene::new();
        let asset = VisualAsset::new("earth");

        let first = reg
            .materialize(&mut scene, &earth(), &asset, Placement::default(), Representation::Scaled)
            .unwrap()
            .node;
        let moved = Placement::new(Vec3::new(10.0, 0.0, 0.0), 2.0);
        let second = reg
            .materialize(&mut scene, &earth(), &asset, moved, Representation::Orbital)
            .unwrap();

        assert_eq!(first, second.node);
        assert_eq!(second.representation, Representation::Orbital);
        assert_eq!(second.position.x, 10.0);
        assert_eq!(reg.len(), 1);
        assert_eq!(scene.len(), 1);
        assert_eq!(scene.get(first).unwrap().position.x, 10.0);
    }

    #[test]
    fn materialize_unknown_body_fails() {
        let mut reg = registry();
        let mut scene = Scene::new();
        let err = reg
            .materialize(
                &mut scene,
                &BodyId::new("vulcan"),
                &VisualAsset::new("vulcan"),
                Placement::default(),
                Representation::Scaled,
            )
            .unwrap_err();
        assert_eq!(err, UnknownBodyError(BodyId::new("vulcan")));
        assert!(scene.is_empty());
    }

    #[test]
    fn release_destroys_node_and_is_idempotent() {
        let mut reg = registry();
        let mut scene = Scene::new();
        reg.materialize(&mut scene, &earth(), &VisualAsset::new("e"), Placement::default(), Representation::Scaled)
            .unwrap();
        reg.release(&mut scene, &earth());
        reg.release(&mut scene, &earth());
        assert!(reg.is_empty());
        assert!(scene.is_empty());
        assert_eq!(scene.destroyed_count(), 1);
    }

    #[test]
    fn all_is_a_snapshot_in_catalog_order() {
        let mut reg = registry();
        let mut scene = Scene::new();
        for name in ["jupiter", "mercury", "earth"] {
            let id = BodyId::new(name);
            reg.materialize(&mut scene, &id, &VisualAsset::new(name), Placement::default(), Representation::Scaled)
                .unwrap();
        }
        let snapshot = reg.all();
        reg.release(&mut scene, &earth());

        let names: Vec<&str> = snapshot.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(names, ["mercury", "earth", "jupiter"]);
        assert_eq!(reg.len(), 2);
    }

    #[test]
    fn update_writes_through_to_scene() {
        let mut reg = registry();
        let mut scene = Scene::new();
        let node = reg
            .materialize(&mut scene, &earth(), &VisualAsset::new("e"), Placement::default(), Representation::Scaled)
            .unwrap()
            .node;
        assert!(reg.update(&mut scene, &earth(), |i| i.rotation = 1.25));
        assert_eq!(scene.get(node).unwrap().rotation, 1.25);
        assert!(!reg.update(&mut scene, &BodyId::new("mars"), |i| i.rotation = 1.0));
    }
}
