use glam::Vec3;
use serde::{Deserialize, Serialize};
use crate::extensions::easing::Easing;

/// Viewer configuration, provided by the host as JSON (all fields optional).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Seed for per-session randomness (initial orbital phases).
    pub session_seed: u64,

    // -- Body animations --
    /// Exit shrink duration in seconds.
    pub exit_duration: f32,
    pub exit_easing: Easing,
    /// Enter growth duration in seconds.
    pub enter_duration: f32,
    pub enter_easing: Easing,
    /// Duration for bodies that stay live but change target.
    pub move_duration: f32,
    pub move_easing: Easing,
    /// Offset from the target where entering bodies start.
    pub enter_offset: Vec3,

    // -- Placement --
    /// Default layout: world units per sqrt(AU) along +X.
    pub default_spacing: f32,
    /// Extra gap kept between the primary's surface and the first body.
    pub default_clearance: f32,
    /// Orbit layout: world units per ln(1 + AU).
    pub orbit_radius_scale: f32,
    /// Orbital angular speed (rad/s) of a body with period 1.
    pub base_angular_rate: f32,
    /// Gap between surfaces in the paired layout.
    pub paired_margin: f32,
    /// Shared midpoint of the paired layout.
    pub paired_focus: Vec3,

    // -- Camera --
    pub camera_duration: f32,
    pub camera_easing: Easing,
    /// Vertical field of view in degrees.
    pub fov_y_degrees: f32,
    /// Overview framing distance multiplier (>1 leaves a border).
    pub overview_padding: f32,
    /// Paired framing distance multiplier.
    pub paired_distance_multiplier: f32,
    /// Zoom bounds when framing the whole scene, as multiples of the
    /// framing distance.
    pub overview_zoom_min: f32,
    pub overview_zoom_max: f32,
    /// Radians per unit of orbit-drag input.
    pub orbit_sensitivity: f32,
    /// Fractional distance change per unit of zoom input.
    pub zoom_sensitivity: f32,
    /// Free-flight speed in world units per second.
    pub flight_speed: f32,
    /// Radians per unit of look input.
    pub look_sensitivity: f32,

    // -- Bridge capacities --
    pub max_nodes: usize,
    pub max_events: usize,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            session_seed: 0x5eed_0bb1,
            exit_duration: 0.4,
            exit_easing: Easing::CubicIn,
            enter_duration: 0.8,
            enter_easing: Easing::BackOut,
            move_duration: 1.0,
            move_easing: Easing::CubicInOut,
            enter_offset: Vec3::new(0.0, -200.0, 0.0),
            default_spacing: 200.0,
            default_clearance: 20.0,
            orbit_radius_scale: 90.0,
            base_angular_rate: 0.6,
            paired_margin: 50.0,
            paired_focus: Vec3::ZERO,
            camera_duration: 1.5,
            camera_easing: Easing::CubicInOut,
            fov_y_degrees: 45.0,
            overview_padding: 1.2,
            paired_distance_multiplier: 1.3,
            overview_zoom_min: 0.1,
            overview_zoom_max: 3.0,
            orbit_sensitivity: 0.005,
            zoom_sensitivity: 0.1,
            flight_speed: 150.0,
            look_sensitivity: 0.003,
            max_nodes: 64,
            max_events: 32,
        }
    }
}

impl ViewerConfig {
    /// Parse a config from a JSON string. Missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Vertical field of view in radians.
    pub fn fov_y(&self) -> f32 {
        self.fov_y_degrees.to_radians()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_json_is_default() {
        assert_eq!(ViewerConfig::from_json("{}").unwrap(), ViewerConfig::default());
    }

    #[test]
    fn partial_json_overrides_fields() {
        let json = r#"{ "paired_margin": 10, "camera_easing": "sine_in_out", "paired_focus": [1, 2, 3] }"#;
        let config = ViewerConfig::from_json(json).unwrap();
        assert_eq!(config.paired_margin, 10.0);
        assert_eq!(config.camera_easing, Easing::SineInOut);
        assert_eq!(config.paired_focus, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(config.enter_duration, ViewerConfig::default().enter_duration);
    }
}
