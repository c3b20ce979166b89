// extensions/mod.rs
//
// Animation building blocks shared by the director and the camera rig.
// Decoupled from the registry: they compute values, callers write them.

pub mod easing;
pub mod transform;
pub mod tween;

pub use easing::{Easing, lerp, ease, ease_vec3};
pub use transform::Placement;
pub use tween::Tween;
