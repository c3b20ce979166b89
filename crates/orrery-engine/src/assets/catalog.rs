//! Static body data: the fixed catalog loaded once at startup.
//!
//! Distances and periods are real relative values (AU, Earth years).
//! Visual radii are exaggerated for readability; real planets would be
//! sub-pixel next to the sun at any useful zoom.

use std::collections::HashSet;
use serde::{Deserialize, Serialize};
use crate::api::error::{CatalogError, InvalidDescriptorError, UnknownBodyError};
use crate::api::types::BodyId;
use crate::core::rng::Rng;

/// Spin of the Earth in radians per second of viewer time.
/// Other bodies scale by their sidereal day length.
const EARTH_SPIN: f32 = 0.5;

/// Immutable per-body data.
#[derive(Debug, Clone, PartialEq)]
pub struct BodyDescriptor {
    pub id: BodyId,
    pub display_name: String,
    /// Distance from the primary focus (AU). Zero marks the primary.
    pub reference_distance: f32,
    /// Rendered radius in the default and paired layouts.
    pub visual_radius: f32,
    /// Spin in radians per second (negative = retrograde).
    pub rotation_rate: f32,
    /// Relative orbital period (Earth = 1). Zero for the primary.
    pub orbital_period: f32,
    /// Starting angle on the orbit, randomized once per session.
    pub initial_orbital_phase: f32,
    /// Fixed rendered radius in orbit mode.
    pub orbit_scale: f32,
    /// Closest the camera may get when this body is the focus.
    pub min_camera_distance: f32,
    /// Farthest the camera may get when this body is the focus.
    pub max_camera_distance: f32,
}

impl BodyDescriptor {
    /// The primary focus (the sun) sits at the origin in every layout.
    pub fn is_primary(&self) -> bool {
        self.reference_distance == 0.0
    }

    /// Orbital angular speed multiplier relative to the base rate.
    /// Zero for the primary.
    pub fn orbital_rate_factor(&self) -> f32 {
        if self.is_primary() {
            0.0
        } else {
            1.0 / self.orbital_period
        }
    }

    /// Reject malformed data. Called for every entry at startup.
    pub fn validate(&self) -> Result<(), InvalidDescriptorError> {
        let fail = |reason: &str| Err(InvalidDescriptorError::new(&self.id, reason));
        if !self.reference_distance.is_finite() || self.reference_distance < 0.0 {
            return fail("unknown or negative reference distance");
        }
        if !self.visual_radius.is_finite() || self.visual_radius <= 0.0 {
            return fail("visual radius must be positive");
        }
        if !self.orbit_scale.is_finite() || self.orbit_scale <= 0.0 {
            return fail("orbit scale must be positive");
        }
        if !self.rotation_rate.is_finite() {
            return fail("rotation rate must be finite");
        }
        if !self.is_primary() && !(self.orbital_period.is_finite() && self.orbital_period > 0.0) {
            return fail("orbiting body needs a positive orbital period");
        }
        if !(self.min_camera_distance > 0.0 && self.min_camera_distance < self.max_camera_distance) {
            return fail("camera distance bounds must satisfy 0 < min < max");
        }
        Ok(())
    }
}

// ── Manifest ─────────────────────────────────────────────────────────

/// Catalog manifest describing all bodies. Loaded from JSON at startup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogManifest {
    pub bodies: Vec<BodyEntry>,
}

/// One body as written in the manifest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BodyEntry {
    pub id: BodyId,
    #[serde(default)]
    pub display_name: Option<String>,
    /// Missing distances are rejected, never defaulted.
    #[serde(default)]
    pub reference_distance: Option<f32>,
    pub visual_radius: f32,
    #[serde(default)]
    pub rotation_rate: f32,
    #[serde(default)]
    pub orbital_period: f32,
    /// Fixed phase; randomized from the session seed when absent.
    #[serde(default)]
    pub initial_orbital_phase: Option<f32>,
    pub orbit_scale: f32,
    #[serde(default)]
    pub min_camera_distance: Option<f32>,
    #[serde(default)]
    pub max_camera_distance: Option<f32>,
}

impl BodyEntry {
    fn into_descriptor(self, rng: &mut Rng) -> Result<BodyDescriptor, InvalidDescriptorError> {
        let reference_distance = self.reference_distance.ok_or_else(|| {
            InvalidDescriptorError::new(&self.id, "unknown reference distance")
        })?;
        let display_name = self.display_name.unwrap_or_else(|| title_case(self.id.as_str()));
        let phase = self.initial_orbital_phase.unwrap_or_else(|| rng.next_angle());
        let descriptor = BodyDescriptor {
            display_name,
            reference_distance,
            visual_radius: self.visual_radius,
            rotation_rate: self.rotation_rate,
            orbital_period: self.orbital_period,
            initial_orbital_phase: phase,
            orbit_scale: self.orbit_scale,
            min_camera_distance: self
                .min_camera_distance
                .unwrap_or(self.visual_radius * 1.5),
            max_camera_distance: self
                .max_camera_distance
                .unwrap_or(self.visual_radius * 60.0),
            id: self.id,
        };
        descriptor.validate()?;
        Ok(descriptor)
    }
}

fn title_case(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

// ── Catalog ──────────────────────────────────────────────────────────

/// The fixed set of bodies, ordered by reference distance.
#[derive(Debug, Clone)]
pub struct BodyCatalog {
    bodies: Vec<BodyDescriptor>,
}

impl BodyCatalog {
    /// Parse and validate a JSON manifest.
    pub fn from_json(json: &str, seed: u64) -> Result<Self, CatalogError> {
        let manifest: CatalogManifest = serde_json::from_str(json)?;
        Self::from_manifest(manifest, seed)
    }

    pub fn from_manifest(manifest: CatalogManifest, seed: u64) -> Result<Self, CatalogError> {
        let mut rng = Rng::new(seed);
        let bodies = manifest
            .bodies
            .into_iter()
            .map(|entry| entry.into_descriptor(&mut rng))
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_descriptors(bodies)
    }

    /// Build from already-constructed descriptors, validating each.
    /// Ids must be unique.
    pub fn from_descriptors(mut bodies: Vec<BodyDescriptor>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::new();
        for body in &bodies {
            body.validate()?;
            if !seen.insert(&body.id) {
                return Err(CatalogError::DuplicateId(body.id.clone()));
            }
        }
        let mut primaries = bodies.iter().filter(|b| b.is_primary());
        if primaries.next().is_none() {
            return Err(CatalogError::MissingPrimary);
        }
        if let Some(extra) = primaries.next() {
            return Err(InvalidDescriptorError::new(&extra.id, "second primary body").into());
        }
        bodies.sort_by(|a, b| a.reference_distance.total_cmp(&b.reference_distance));
        Ok(Self { bodies })
    }

    /// The sun and the eight planets.
    pub fn builtin(seed: u64) -> Self {
        let mut rng = Rng::new(seed);
        // (id, distance AU, radius, sidereal day in Earth days, period in years, orbit scale)
        let table: [(&str, f32, f32, f32, f32, f32); 9] = [
            ("sun", 0.0, 30.0, 25.4, 0.0, 12.0),
            ("mercury", 0.387, 2.4, 58.6, 0.241, 2.5),
            ("venus", 0.723, 6.0, -243.0, 0.615, 3.5),
            ("earth", 1.0, 6.4, 1.0, 1.0, 4.0),
            ("mars", 1.524, 3.4, 1.03, 1.881, 3.0),
            ("jupiter", 5.203, 70.0, 0.41, 11.86, 9.0),
            ("saturn", 9.537, 58.0, 0.44, 29.46, 8.0),
            ("uranus", 19.19, 25.0, -0.72, 84.01, 6.0),
            ("neptune", 30.07, 24.6, 0.67, 164.8, 6.0),
        ];
        let bodies = table
            .iter()
            .map(|&(id, distance, radius, day, period, orbit_scale)| BodyDescriptor {
                id: BodyId::new(id),
                display_name: title_case(id),
                reference_distance: distance,
                visual_radius: radius,
                rotation_rate: EARTH_SPIN / day,
                orbital_period: period,
                initial_orbital_phase: rng.next_angle(),
                orbit_scale,
                min_camera_distance: radius * 1.5,
                max_camera_distance: radius * 60.0,
            })
            .collect();
        Self { bodies }
    }

    /// Look up a descriptor. Unknown ids are a programmer error.
    pub fn get(&self, id: &BodyId) -> Result<&BodyDescriptor, UnknownBodyError> {
        self.bodies
            .iter()
            .find(|b| &b.id == id)
            .ok_or_else(|| UnknownBodyError(id.clone()))
    }

    /// Normalize a user-supplied name and check it against the catalog.
    pub fn resolve(&self, name: &str) -> Result<BodyId, UnknownBodyError> {
        let id = BodyId::new(name);
        self.get(&id).map(|b| b.id.clone())
    }

    /// Position in catalog order (nearest first).
    pub fn index_of(&self, id: &BodyId) -> Option<usize> {
        self.bodies.iter().position(|b| &b.id == id)
    }

    pub fn primary(&self) -> Option<&BodyDescriptor> {
        self.bodies.iter().find(|b| b.is_primary())
    }

    pub fn iter(&self) -> impl Iterator<Item = &BodyDescriptor> {
        self.bodies.iter()
    }

    pub fn ids(&self) -> impl Iterator<Item = &BodyId> {
        self.bodies.iter().map(|b| &b.id)
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_is_valid_and_ordered() {
        let catalog = BodyCatalog::builtin(1);
        assert_eq!(catalog.len(), 9);
        for body in catalog.iter() {
            body.validate().unwrap();
        }
        let distances: Vec<f32> = catalog.iter().map(|b| b.reference_distance).collect();
        assert!(distances.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(catalog.primary().unwrap().id, BodyId::new("sun"));
    }

    #[test]
    fn phases_depend_on_seed() {
        let a = BodyCatalog::builtin(1);
        let b = BodyCatalog::builtin(2);
        let earth = BodyId::new("earth");
        assert_ne!(
            a.get(&earth).unwrap().initial_orbital_phase,
            b.get(&earth).unwrap().initial_orbital_phase
        );
    }

    #[test]
    fn resolve_normalizes_names() {
        let catalog = BodyCatalog::builtin(1);
        assert_eq!(catalog.resolve("Jupiter").unwrap(), BodyId::new("jupiter"));
        assert_eq!(
            catalog.resolve("Vulcan").unwrap_err(),
            UnknownBodyError(BodyId::new("vulcan"))
        );
    }

    #[test]
    fn parse_minimal_manifest() {
        let json = r#"{
            "bodies": [
                { "id": "Sun", "reference_distance": 0, "visual_radius": 10, "orbit_scale": 5 },
                { "id": "earth", "reference_distance": 1, "visual_radius": 2,
                  "orbital_period": 1, "orbit_scale": 1, "initial_orbital_phase": 0.5 }
            ]
        }"#;
        let catalog = BodyCatalog::from_json(json, 3).unwrap();
        let earth = catalog.get(&BodyId::new("earth")).unwrap();
        assert_eq!(earth.display_name, "Earth");
        assert_eq!(earth.initial_orbital_phase, 0.5);
        assert_eq!(earth.min_camera_distance, 3.0);
    }

    #[test]
    fn missing_reference_distance_is_rejected() {
        let json = r#"{
            "bodies": [
                { "id": "sun", "reference_distance": 0, "visual_radius": 10, "orbit_scale": 5 },
                { "id": "mars", "visual_radius": 2, "orbital_period": 1.9, "orbit_scale": 1 }
            ]
        }"#;
        match BodyCatalog::from_json(json, 3) {
            Err(CatalogError::InvalidDescriptor(err)) => assert_eq!(err.id, BodyId::new("mars")),
            other => panic!("expected invalid descriptor, got {other:?}"),
        }
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let json = r#"{
            "bodies": [
                { "id": "sun", "reference_distance": 0, "visual_radius": 10, "orbit_scale": 5 },
                { "id": "SUN", "reference_distance": 0, "visual_radius": 10, "orbit_scale": 5 }
            ]
        }"#;
        assert!(matches!(
            BodyCatalog::from_json(json, 3),
            Err(CatalogError::DuplicateId(_))
        ));
    }

    #[test]
    fn duplicate_descriptors_are_rejected() {
        let mut bodies = BodyCatalog::builtin(1).bodies;
        let earth = bodies[3].clone();
        bodies.push(earth);
        match BodyCatalog::from_descriptors(bodies) {
            Err(CatalogError::DuplicateId(id)) => assert_eq!(id, BodyId::new("earth")),
            other => panic!("expected duplicate id, got {other:?}"),
        }
    }

    #[test]
    fn catalog_without_primary_is_rejected() {
        let json = r#"{
            "bodies": [
                { "id": "earth", "reference_distance": 1, "visual_radius": 2,
                  "orbital_period": 1, "orbit_scale": 1 }
            ]
        }"#;
        assert!(matches!(
            BodyCatalog::from_json(json, 3),
            Err(CatalogError::MissingPrimary)
        ));
    }

    #[test]
    fn orbiting_body_without_period_is_rejected() {
        let mut catalog = BodyCatalog::builtin(1);
        let mut bad = catalog.bodies.remove(3);
        bad.orbital_period = 0.0;
        assert!(bad.validate().is_err());
    }
}
