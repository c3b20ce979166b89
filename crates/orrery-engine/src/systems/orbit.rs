//! Steady-state per-frame updaters.
//!
//! `OrbitAnimator` moves orbiting bodies along their circles while orbit mode
//! is active. `spin_bodies` is the rotation-only updater used in every other
//! idle mode. Neither creates or removes bodies or changes scale.

use std::f32::consts::TAU;
use crate::assets::registry::BodyRegistry;
use crate::renderer::traits::SceneGraph;
use crate::systems::placement::Layout;

/// Advances orbital phases. Only the director toggles it.
#[derive(Debug, Default)]
pub struct OrbitAnimator {
    enabled: bool,
    /// Seconds spent in orbit mode this session; entering bodies are placed
    /// where this clock says they should be.
    elapsed: f32,
}

impl OrbitAnimator {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Advance every orbiting instance by `dt` seconds and write its position.
    /// Returns immediately when orbit mode is not active.
    pub fn advance(
        &mut self,
        dt: f32,
        layout: &Layout,
        registry: &mut BodyRegistry,
        scene: &mut impl SceneGraph,
    ) {
        if !self.enabled {
            return;
        }
        self.elapsed += dt;

        let (catalog, instances) = registry.split_mut();
        for instance in instances {
            let Some(phase) = instance.orbital_phase.as_mut() else {
                continue;
            };
            let Ok(body) = catalog.get(&instance.id) else {
                continue;
            };
            *phase = (*phase + layout.angular_rate(body) * dt).rem_euclid(TAU);
            match layout.orbit_transform_at_phase(body, *phase) {
                Ok(placement) => {
                    instance.position = placement.position;
                    instance.sync(scene);
                }
                Err(err) => log::error!("orbit update skipped: {err}"),
            }
        }
    }
}

/// Spin every live body about its axis at its rotation rate.
pub fn spin_bodies(dt: f32, registry: &mut BodyRegistry, scene: &mut impl SceneGraph) {
    let (catalog, instances) = registry.split_mut();
    for instance in instances {
        let Ok(body) = catalog.get(&instance.id) else {
            continue;
        };
        instance.rotation = (instance.rotation + body.rotation_rate * dt).rem_euclid(TAU);
        instance.sync(scene);
    }
}
