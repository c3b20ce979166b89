use std::fmt;
use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

/// Case-normalized identifier of a catalog body ("earth", "sun").
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct BodyId(String);

impl BodyId {
    /// Build an id, trimming whitespace and lower-casing.
    pub fn new(name: &str) -> Self {
        Self(name.trim().to_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for BodyId {
    fn from(s: String) -> Self {
        Self::new(&s)
    }
}

impl From<&str> for BodyId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<BodyId> for String {
    fn from(id: BodyId) -> Self {
        id.0
    }
}

impl fmt::Display for BodyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Handle to a renderable node owned by a `SceneGraph`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeHandle(pub u32);

/// Monotonic identifier of a mode transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TransitionId(pub u64);

/// The active view mode.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ViewMode {
    /// Static compressed layout along one axis.
    #[default]
    Default,
    /// Animated circular orbits around the primary.
    Orbit,
    /// Two bodies side by side about a shared focus.
    PairedComparison { a: BodyId, b: BodyId },
    /// Default layout with the camera under direct user control.
    FreeFlight,
}

impl ViewMode {
    pub fn paired(a: impl Into<BodyId>, b: impl Into<BodyId>) -> Self {
        ViewMode::PairedComparison { a: a.into(), b: b.into() }
    }

    /// Numeric code used on the wire (see `bridge::protocol`).
    pub fn code(&self) -> f32 {
        match self {
            ViewMode::Default => 0.0,
            ViewMode::Orbit => 1.0,
            ViewMode::PairedComparison { .. } => 2.0,
            ViewMode::FreeFlight => 3.0,
        }
    }
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViewMode::Default => f.write_str("default"),
            ViewMode::Orbit => f.write_str("orbit"),
            ViewMode::PairedComparison { a, b } => write!(f, "paired({a}, {b})"),
            ViewMode::FreeFlight => f.write_str("free-flight"),
        }
    }
}

/// A status record communicated from Rust to TypeScript via the shared buffer.
/// `kind` identifies the record, `a/b/c` carry payload.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, Pod, Zeroable)]
pub struct StatusRecord {
    pub kind: f32,
    pub a: f32,
    pub b: f32,
    pub c: f32,
}

impl StatusRecord {
    pub const FLOATS: usize = 4;
}
