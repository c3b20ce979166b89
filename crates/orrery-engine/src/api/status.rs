use crate::api::error::LoadError;
use crate::api::types::{BodyId, StatusRecord, ViewMode};
use crate::assets::catalog::BodyCatalog;

/// Record kinds written into the shared buffer's status section.
pub const STATUS_MODE_SETTLED: f32 = 1.0;
pub const STATUS_BODY_LOAD_FAILED: f32 = 2.0;

/// Notifications for the UI layer, drained once per frame.
#[derive(Debug, Clone, PartialEq)]
pub enum StatusEvent {
    /// A transition completed and the viewer is idle in `mode`.
    ModeSettled(ViewMode),
    /// A body's asset failed to load; it is absent from the scene.
    BodyLoadFailed { id: BodyId, error: LoadError },
}

impl StatusEvent {
    /// Flatten into a wire record. Bodies are referenced by catalog index.
    pub fn to_record(&self, catalog: &BodyCatalog) -> StatusRecord {
        let index = |id: &BodyId| catalog.index_of(id).map_or(-1.0, |i| i as f32);
        match self {
            StatusEvent::ModeSettled(mode) => {
                let (a, b) = match mode {
                    ViewMode::PairedComparison { a, b } => (index(a), index(b)),
                    _ => (-1.0, -1.0),
                };
                StatusRecord { kind: STATUS_MODE_SETTLED, a: mode.code(), b: a, c: b }
            }
            StatusEvent::BodyLoadFailed { id, .. } => StatusRecord {
                kind: STATUS_BODY_LOAD_FAILED,
                a: index(id),
                b: 0.0,
                c: 0.0,
            },
        }
    }
}
