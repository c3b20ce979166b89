// extensions/easing.rs
//
// Easing curves for body and camera animations.
// No dependencies on the registry or the camera, just math.

use std::f32::consts::PI;
use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Easing function type. Named in config files in snake_case ("cubic_in_out").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Easing {
    /// Constant velocity (no easing).
    #[default]
    Linear,
    /// Slow start.
    QuadIn,
    /// Slow end.
    QuadOut,
    /// Slow start and end.
    QuadInOut,
    /// Stronger slow start. Used for exit shrinks.
    CubicIn,
    /// Stronger slow end.
    CubicOut,
    /// Stronger slow start and end. Used for camera framing.
    CubicInOut,
    SineInOut,
    /// Slight overshoot then settle. Used for enter growth.
    BackOut,
}

impl Easing {
    /// Apply the easing function to a normalized time value `t` in [0, 1].
    /// BackOut overshoots 1.0 slightly before settling.
    #[inline]
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::QuadIn => poly_in(t, 2),
            Easing::QuadOut => poly_out(t, 2),
            Easing::QuadInOut => poly_in_out(t, 2),
            Easing::CubicIn => poly_in(t, 3),
            Easing::CubicOut => poly_out(t, 3),
            Easing::CubicInOut => poly_in_out(t, 3),
            Easing::SineInOut => (1.0 - (PI * t).cos()) * 0.5,
            Easing::BackOut => {
                const OVERSHOOT: f32 = 1.70158;
                let u = t - 1.0;
                1.0 + u * u * ((OVERSHOOT + 1.0) * u + OVERSHOOT)
            }
        }
    }
}

#[inline]
fn poly_in(t: f32, degree: i32) -> f32 {
    t.powi(degree)
}

#[inline]
fn poly_out(t: f32, degree: i32) -> f32 {
    1.0 - poly_in(1.0 - t, degree)
}

/// First half is `poly_in` squeezed into [0, 0.5], second half mirrors it.
#[inline]
fn poly_in_out(t: f32, degree: i32) -> f32 {
    if t < 0.5 {
        poly_in(2.0 * t, degree) * 0.5
    } else {
        1.0 - poly_in(2.0 - 2.0 * t, degree) * 0.5
    }
}

// ── Interpolation helpers ────────────────────────────────────────────────

/// Linearly interpolate between two values.
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Interpolate with easing.
#[inline]
pub fn ease(a: f32, b: f32, t: f32, easing: Easing) -> f32 {
    lerp(a, b, easing.apply(t))
}

/// Interpolate Vec3 with easing.
#[inline]
pub fn ease_vec3(a: Vec3, b: Vec3, t: f32, easing: Easing) -> Vec3 {
    a.lerp(b, easing.apply(t))
}
