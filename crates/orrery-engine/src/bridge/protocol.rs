/// Shared-buffer layout.
/// Must stay in sync with the TypeScript host's `protocol.ts`.
///
/// Layout (all values in f32 / 4 bytes):
/// ```text
/// [Header: 16 floats]
/// [Nodes: max_nodes × 8 floats]
/// [Camera: 24 floats]
/// [Status: max_events × 4 floats]
/// ```
///
/// Capacities are written once into the header at init.
/// TypeScript reads them from the header to compute offsets dynamically.

use crate::api::config::ViewerConfig;
use crate::api::types::StatusRecord;
use crate::renderer::camera::CameraUniform;
use crate::renderer::instance::NodeInstance;

/// Number of floats in the header section.
pub const HEADER_FLOATS: usize = 16;

/// Header field indices.
pub const HEADER_LOCK: usize = 0;
pub const HEADER_FRAME_COUNTER: usize = 1;
pub const HEADER_MAX_NODES: usize = 2;
pub const HEADER_NODE_COUNT: usize = 3;
pub const HEADER_MAX_EVENTS: usize = 4;
pub const HEADER_EVENT_COUNT: usize = 5;
pub const HEADER_PROTOCOL_VERSION: usize = 6;
/// `ViewMode::code()` of the mode the viewer is in or heading to.
pub const HEADER_MODE: usize = 7;
/// 1.0 while a transition is running.
pub const HEADER_TRANSITIONING: usize = 8;
pub const HEADER_CATALOG_SIZE: usize = 9;

/// Protocol version written into the header.
pub const PROTOCOL_VERSION: f32 = 1.0;

/// Floats per node instance (wire format, fixed).
pub const NODE_FLOATS: usize = NodeInstance::FLOATS;

/// Floats in the camera block (wire format, fixed).
pub const CAMERA_FLOATS: usize = CameraUniform::FLOATS;

/// Floats per status record: kind, a, b, c (wire format, fixed).
pub const EVENT_FLOATS: usize = StatusRecord::FLOATS;

/// Runtime-computed buffer layout.
#[derive(Debug, Clone, PartialEq)]
pub struct ProtocolLayout {
    pub max_nodes: usize,
    /// Maximum status records per frame.
    pub max_events: usize,

    pub node_data_floats: usize,
    pub event_data_floats: usize,

    /// Offset (in floats) where node data begins.
    pub node_data_offset: usize,
    /// Offset (in floats) where the camera block begins.
    pub camera_data_offset: usize,
    /// Offset (in floats) where status records begin.
    pub event_data_offset: usize,

    /// Total buffer size in floats.
    pub buffer_total_floats: usize,
    /// Total buffer size in bytes.
    pub buffer_total_bytes: usize,
}

impl ProtocolLayout {
    /// Compute layout from raw capacity values.
    pub fn new(max_nodes: usize, max_events: usize) -> Self {
        let node_data_floats = max_nodes * NODE_FLOATS;
        let event_data_floats = max_events * EVENT_FLOATS;

        let node_data_offset = HEADER_FLOATS;
        let camera_data_offset = node_data_offset + node_data_floats;
        let event_data_offset = camera_data_offset + CAMERA_FLOATS;

        let buffer_total_floats = event_data_offset + event_data_floats;

        Self {
            max_nodes,
            max_events,
            node_data_floats,
            event_data_floats,
            node_data_offset,
            camera_data_offset,
            event_data_offset,
            buffer_total_floats,
            buffer_total_bytes: buffer_total_floats * 4,
        }
    }

    pub fn from_config(config: &ViewerConfig) -> Self {
        Self::new(config.max_nodes, config.max_events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_default_config_matches_expected_sizes() {
        let layout = ProtocolLayout::from_config(&ViewerConfig::default());
        assert_eq!(layout.max_nodes, 64);
        assert_eq!(layout.max_events, 32);
        assert_eq!(layout.node_data_offset, 16);
        assert_eq!(layout.camera_data_offset, 16 + 64 * 8);
        assert_eq!(layout.event_data_offset, 16 + 64 * 8 + 24);
        assert_eq!(layout.buffer_total_floats, 16 + 64 * 8 + 24 + 32 * 4);
        assert_eq!(layout.buffer_total_bytes, layout.buffer_total_floats * 4);
    }

    #[test]
    fn offsets_are_contiguous() {
        let layout = ProtocolLayout::new(10, 3);
        assert_eq!(layout.camera_data_offset, layout.node_data_offset + layout.node_data_floats);
        assert_eq!(layout.event_data_offset, layout.camera_data_offset + CAMERA_FLOATS);
        assert_eq!(layout.buffer_total_floats, layout.event_data_offset + layout.event_data_floats);
    }

    #[test]
    fn header_fields_fit_in_header() {
        assert!(HEADER_CATALOG_SIZE < HEADER_FLOATS);
    }
}
