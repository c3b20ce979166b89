//! Placement strategies: where a body sits under each view mode.
//!
//! Pure functions over descriptors. Nothing here touches the registry or the
//! scene, so the director can plan a transition before mutating anything.
//!
//! - default: one axis (+X), sqrt-compressed distances, primary at origin
//! - orbit:   circles in the XZ plane, log-compressed radii, fixed scales
//! - paired:  two bodies symmetric about a shared focus along +X

use glam::Vec3;
use crate::api::config::ViewerConfig;
use crate::api::error::InvalidDescriptorError;
use crate::assets::catalog::{BodyCatalog, BodyDescriptor};
use crate::extensions::transform::Placement;

/// Sphere enclosing a layout, used for overview framing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneBounds {
    pub center: Vec3,
    pub radius: f32,
}

/// Result of the paired layout.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PairedPlacement {
    pub a: Placement,
    pub b: Placement,
    /// Midpoint the camera should look at.
    pub focus: Vec3,
    /// Center-to-center distance.
    pub separation: f32,
    /// Larger of the two bounding radii.
    pub max_radius: f32,
}

/// Layout parameters, lifted out of `ViewerConfig` plus the primary's size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Layout {
    pub default_spacing: f32,
    pub default_clearance: f32,
    pub orbit_radius_scale: f32,
    pub base_angular_rate: f32,
    pub paired_margin: f32,
    pub paired_focus: Vec3,
    /// Visual radius of the primary; the default layout starts past its surface.
    pub primary_radius: f32,
}

impl Layout {
    pub fn new(config: &ViewerConfig, catalog: &BodyCatalog) -> Self {
        Self {
            default_spacing: config.default_spacing,
            default_clearance: config.default_clearance,
            orbit_radius_scale: config.orbit_radius_scale,
            base_angular_rate: config.base_angular_rate,
            paired_margin: config.paired_margin,
            paired_focus: config.paired_focus,
            primary_radius: catalog.primary().map_or(0.0, |p| p.visual_radius),
        }
    }

    /// Fixed-axis layout at compressed spacing, ordered by reference distance.
    pub fn default_transform(&self, body: &BodyDescriptor) -> Result<Placement, InvalidDescriptorError> {
        let distance = checked_distance(body)?;
        let x = if body.is_primary() {
            0.0
        } else {
            self.primary_radius + self.default_clearance + self.default_spacing * distance.sqrt()
        };
        Ok(Placement::new(Vec3::new(x, 0.0, 0.0), body.visual_radius))
    }

    /// Radius of the body's circular orbit in orbit mode.
    pub fn orbit_radius(&self, body: &BodyDescriptor) -> Result<f32, InvalidDescriptorError> {
        let distance = checked_distance(body)?;
        Ok(self.orbit_radius_scale * distance.ln_1p())
    }

    /// Orbital angular speed in rad/s: farther bodies move proportionally slower.
    pub fn angular_rate(&self, body: &BodyDescriptor) -> f32 {
        self.base_angular_rate * body.orbital_rate_factor()
    }

    /// Orbital angle after `elapsed` seconds in orbit mode.
    pub fn orbit_phase(&self, body: &BodyDescriptor, elapsed: f32) -> f32 {
        body.initial_orbital_phase + elapsed * self.angular_rate(body)
    }

    /// Orbit-mode placement at a given orbital angle.
    pub fn orbit_transform_at_phase(
        &self,
        body: &BodyDescriptor,
        phase: f32,
    ) -> Result<Placement, InvalidDescriptorError> {
        let r = self.orbit_radius(body)?;
        let position = if body.is_primary() {
            Vec3::ZERO
        } else {
            Vec3::new(r * phase.cos(), 0.0, r * phase.sin())
        };
        Ok(Placement::new(position, body.orbit_scale))
    }

    /// Orbit-mode placement after `elapsed` seconds.
    pub fn orbit_transform(
        &self,
        body: &BodyDescriptor,
        elapsed: f32,
    ) -> Result<Placement, InvalidDescriptorError> {
        self.orbit_transform_at_phase(body, self.orbit_phase(body, elapsed))
    }

    /// Two bodies placed symmetrically about the paired focus, surfaces
    /// `paired_margin` apart.
    pub fn paired_transform(
        &self,
        a: &BodyDescriptor,
        b: &BodyDescriptor,
    ) -> Result<PairedPlacement, InvalidDescriptorError> {
        checked_distance(a)?;
        checked_distance(b)?;
        let (ra, rb) = (bounding_radius(a), bounding_radius(b));
        let separation = ra + rb + self.paired_margin;
        let half = Vec3::X * (separation * 0.5);
        Ok(PairedPlacement {
            a: Placement::new(self.paired_focus - half, ra),
            b: Placement::new(self.paired_focus + half, rb),
            focus: self.paired_focus,
            separation,
            max_radius: ra.max(rb),
        })
    }

    /// Bounds of the whole default layout.
    pub fn default_bounds(&self, catalog: &BodyCatalog) -> Result<SceneBounds, InvalidDescriptorError> {
        let mut min_x = 0.0f32;
        let mut max_x = 0.0f32;
        for body in catalog.iter() {
            let p = self.default_transform(body)?;
            min_x = min_x.min(p.position.x - p.scale);
            max_x = max_x.max(p.position.x + p.scale);
        }
        Ok(SceneBounds {
            center: Vec3::new((min_x + max_x) * 0.5, 0.0, 0.0),
            radius: (max_x - min_x) * 0.5,
        })
    }

    /// Bounds of every orbit, regardless of where bodies currently are.
    pub fn orbit_bounds(&self, catalog: &BodyCatalog) -> Result<SceneBounds, InvalidDescriptorError> {
        let mut radius = 0.0f32;
        for body in catalog.iter() {
            radius = radius.max(self.orbit_radius(body)? + body.orbit_scale);
        }
        Ok(SceneBounds { center: Vec3::ZERO, radius })
    }
}

/// Radius of the sphere enclosing a body in the scaled representation.
pub fn bounding_radius(body: &BodyDescriptor) -> f32 {
    body.visual_radius
}

fn checked_distance(body: &BodyDescriptor) -> Result<f32, InvalidDescriptorError> {
    let d = body.reference_distance;
    if d.is_finite() && d >= 0.0 {
        Ok(d)
    } else {
        Err(InvalidDescriptorError::new(&body.id, "unknown reference distance"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::BodyId;

    fn layout() -> (Layout, BodyCatalog) {
        let catalog = BodyCatalog::builtin(5);
        (Layout::new(&ViewerConfig::default(), &catalog), catalog)
    }

    fn descriptor(id: &str, radius: f32) -> BodyDescriptor {
        BodyDescriptor {
            id: BodyId::new(id),
            display_name: id.to_string(),
            reference_distance: 1.0,
            visual_radius: radius,
            rotation_rate: 0.0,
            orbital_period: 1.0,
            initial_orbital_phase: 0.0,
            orbit_scale: 1.0,
            min_camera_distance: 1.0,
            max_camera_distance: 10.0,
        }
    }

    #[test]
    fn default_layout_keeps_primary_at_origin_and_orders_by_distance() {
        let (layout, catalog) = layout();
        let xs: Vec<f32> = catalog
            .iter()
            .map(|b| layout.default_transform(b).unwrap().position.x)
            .collect();
        assert_eq!(xs[0], 0.0);
        assert!(xs.windows(2).all(|w| w[0] < w[1]), "not ordered: {xs:?}");
    }

    #[test]
    fn default_layout_bodies_do_not_overlap() {
        let (layout, catalog) = layout();
        let placed: Vec<Placement> = catalog
            .iter()
            .map(|b| layout.default_transform(b).unwrap())
            .collect();
        for pair in placed.windows(2) {
            let gap = pair[1].position.x - pair[0].position.x;
            assert!(gap > pair[0].scale + pair[1].scale, "overlap: {pair:?}");
        }
    }

    #[test]
    fn default_scale_is_visual_radius() {
        let (layout, catalog) = layout();
        let jupiter = catalog.get(&BodyId::new("jupiter")).unwrap();
        assert_eq!(layout.default_transform(jupiter).unwrap().scale, jupiter.visual_radius);
    }

    #[test]
    fn orbit_scale_differs_from_default_scale() {
        let (layout, catalog) = layout();
        let earth = catalog.get(&BodyId::new("earth")).unwrap();
        let orbit = layout.orbit_transform(earth, 0.0).unwrap();
        let default = layout.default_transform(earth).unwrap();
        assert_eq!(orbit.scale, earth.orbit_scale);
        assert_ne!(orbit.scale, default.scale);
    }

    #[test]
    fn orbit_position_stays_on_its_circle() {
        let (layout, catalog) = layout();
        let mars = catalog.get(&BodyId::new("mars")).unwrap();
        let r = layout.orbit_radius(mars).unwrap();
        for t in [0.0, 1.0, 7.5, 100.0] {
            let p = layout.orbit_transform(mars, t).unwrap().position;
            assert!((p.length() - r).abs() < 1e-3);
            assert_eq!(p.y, 0.0);
        }
    }

    #[test]
    fn orbit_angle_follows_initial_phase_and_period() {
        let (layout, catalog) = layout();
        let earth = catalog.get(&BodyId::new("earth")).unwrap();
        let expected = earth.initial_orbital_phase + 2.0 * layout.base_angular_rate;
        assert!((layout.orbit_phase(earth, 2.0) - expected).abs() < 1e-5);
    }

    #[test]
    fn outer_bodies_orbit_slower() {
        let (layout, catalog) = layout();
        let rates: Vec<f32> = catalog
            .iter()
            .filter(|b| !b.is_primary())
            .map(|b| layout.angular_rate(b))
            .collect();
        assert!(rates.windows(2).all(|w| w[0] > w[1]));
    }

    #[test]
    fn all_orbits_fit_within_orbit_bounds() {
        let (layout, catalog) = layout();
        let bounds = layout.orbit_bounds(&catalog).unwrap();
        for body in catalog.iter() {
            let p = layout.orbit_transform(body, 3.0).unwrap();
            assert!(p.position.length() + p.scale <= bounds.radius + 1e-3);
        }
    }

    #[test]
    fn paired_layout_separates_by_radii_plus_margin() {
        let (mut layout, _) = layout();
        layout.paired_margin = 50.0;
        layout.paired_focus = Vec3::new(10.0, 5.0, 0.0);
        let a = descriptor("a", 100.0);
        let b = descriptor("b", 200.0);

        let paired = layout.paired_transform(&a, &b).unwrap();
        assert!((paired.separation - 350.0).abs() < 1e-4);
        assert!((paired.a.position.distance(paired.b.position) - 350.0).abs() < 1e-4);
        let mid = (paired.a.position + paired.b.position) * 0.5;
        assert!(mid.abs_diff_eq(paired.focus, 1e-4));
        assert_eq!(paired.focus, layout.paired_focus);
        assert_eq!(paired.max_radius, 200.0);
    }

    #[test]
    fn unknown_distance_fails_loudly() {
        let (layout, _) = layout();
        let mut broken = descriptor("ghost", 1.0);
        broken.reference_distance = f32::NAN;
        assert!(layout.default_transform(&broken).is_err());
        assert!(layout.orbit_transform(&broken, 0.0).is_err());
        assert!(layout.paired_transform(&broken, &descriptor("x", 1.0)).is_err());
    }
}
