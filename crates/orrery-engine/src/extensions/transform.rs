// extensions/transform.rs
//
// Position + uniform scale pair produced by the placement strategies and
// animated by tweens. Rotation is owned by the steady-state updaters.

use glam::Vec3;
use super::easing::{Easing, ease, ease_vec3};

/// Target transform of a body in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    /// Position in world units.
    pub position: Vec3,
    /// Uniform scale: the rendered radius of a unit-sphere asset.
    pub scale: f32,
}

impl Default for Placement {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            scale: 1.0,
        }
    }
}

impl Placement {
    pub fn new(position: Vec3, scale: f32) -> Self {
        Self { position, scale }
    }

    pub fn with_position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    /// Interpolate toward `other` with easing.
    pub fn ease_to(&self, other: &Placement, t: f32, easing: Easing) -> Placement {
        Placement {
            position: ease_vec3(self.position, other.position, t, easing),
            scale: ease(self.scale, other.scale, t, easing),
        }
    }

    /// Component-wise closeness, for tests and settle checks.
    pub fn approx_eq(&self, other: &Placement, tolerance: f32) -> bool {
        self.position.abs_diff_eq(other.position, tolerance)
            && (self.scale - other.scale).abs() <= tolerance
    }
}
