use orrery_engine::bridge::protocol::{
    HEADER_FLOATS, HEADER_FRAME_COUNTER, HEADER_MAX_NODES, HEADER_NODE_COUNT,
    HEADER_MAX_EVENTS, HEADER_EVENT_COUNT, HEADER_PROTOCOL_VERSION, HEADER_MODE,
    HEADER_TRANSITIONING, HEADER_CATALOG_SIZE, PROTOCOL_VERSION,
};
use orrery_engine::{
    AssetLoader, BodyCatalog, BodyId, CameraUniform, InputEvent, ModeRequestError,
    NodeBuffer, ProtocolLayout, RequestOutcome, Scene, StatusRecord, Viewer,
    ViewerConfig, ViewMode,
};

/// Viewer runner that packs each frame into flat buffers for the host.
///
/// `lib.rs` keeps one runner in a `thread_local!` and exports free functions
/// via `#[wasm_bindgen]`, because wasm-bindgen cannot export generic structs
/// directly.
pub struct ViewerRunner<L: AssetLoader> {
    viewer: Viewer<Scene, L>,
    layout: ProtocolLayout,
    node_buffer: NodeBuffer,
    camera: CameraUniform,
    /// Status records of the last frame, capped at `max_events`.
    status: Vec<StatusRecord>,
    header: [f32; HEADER_FLOATS],
    frame: u64,
}

impl<L: AssetLoader> ViewerRunner<L> {
    pub fn new(config: &ViewerConfig, catalog: BodyCatalog, loader: L) -> Self {
        let layout = ProtocolLayout::from_config(config);
        let catalog_size = catalog.len();
        let scene = Scene::with_capacity(config.max_nodes);
        let viewer = Viewer::new(config, catalog, scene, loader);

        let mut header = [0.0; HEADER_FLOATS];
        header[HEADER_PROTOCOL_VERSION] = PROTOCOL_VERSION;
        header[HEADER_MAX_NODES] = layout.max_nodes as f32;
        header[HEADER_MAX_EVENTS] = layout.max_events as f32;
        header[HEADER_CATALOG_SIZE] = catalog_size as f32;

        Self {
            node_buffer: NodeBuffer::with_capacity(layout.max_nodes),
            camera: viewer.camera().uniform(),
            status: Vec::with_capacity(layout.max_events),
            viewer,
            layout,
            header,
            frame: 0,
        }
    }

    pub fn init(&mut self) {
        self.viewer.init();
    }

    pub fn dispose(&mut self) {
        self.viewer.dispose();
        self.node_buffer.rebuild(self.viewer.scene().iter());
        self.status.clear();
        self.write_header();
    }

    pub fn push_input(&mut self, event: InputEvent) {
        self.viewer.push_input(event);
    }

    pub fn request_mode(&mut self, mode: ViewMode) -> Result<RequestOutcome, ModeRequestError> {
        self.viewer.request_mode(mode)
    }

    /// Request a mode by its host-side name. Paired comparison needs both ids.
    pub fn request_named(
        &mut self,
        mode: &str,
        a: Option<&str>,
        b: Option<&str>,
    ) -> Result<RequestOutcome, String> {
        let mode = match (mode, a, b) {
            ("default", _, _) => ViewMode::Default,
            ("orbit", _, _) => ViewMode::Orbit,
            ("free-flight" | "freeflight", _, _) => ViewMode::FreeFlight,
            ("paired", Some(a), Some(b)) => ViewMode::PairedComparison {
                a: BodyId::new(a),
                b: BodyId::new(b),
            },
            ("paired", _, _) => return Err("paired comparison needs two body ids".to_owned()),
            (other, _, _) => return Err(format!("unknown view mode: {other}")),
        };
        self.request_mode(mode).map_err(|e| e.to_string())
    }

    /// Run one frame: advance the viewer, then repack nodes, camera and status.
    pub fn tick(&mut self, dt: f32) {
        if !self.viewer.is_initialized() {
            return;
        }
        self.viewer.tick(dt);
        self.frame += 1;

        self.node_buffer.rebuild(self.viewer.scene().iter());
        self.camera = self.viewer.camera().uniform();

        let events = self.viewer.drain_status();
        let catalog = self.viewer.director().catalog();
        self.status.clear();
        for event in events {
            if self.status.len() == self.layout.max_events {
                log::warn!("status buffer full, dropping {event:?}");
                continue;
            }
            self.status.push(event.to_record(catalog));
        }

        self.write_header();
    }

    fn write_header(&mut self) {
        let director = self.viewer.director();
        self.header[HEADER_FRAME_COUNTER] = self.frame as f32;
        self.header[HEADER_NODE_COUNT] = self.node_buffer.instance_count() as f32;
        self.header[HEADER_EVENT_COUNT] = self.status.len() as f32;
        self.header[HEADER_MODE] = director.heading_to().code();
        self.header[HEADER_TRANSITIONING] = if director.is_idle() { 0.0 } else { 1.0 };
    }

    pub fn viewer(&self) -> &Viewer<Scene, L> {
        &self.viewer
    }

    // ---- Pointer accessors for SharedArrayBuffer reads ----

    pub fn header_ptr(&self) -> *const f32 {
        self.header.as_ptr()
    }

    pub fn nodes_ptr(&self) -> *const f32 {
        self.node_buffer.instances_ptr()
    }

    pub fn node_count(&self) -> u32 {
        self.node_buffer.instance_count()
    }

    pub fn camera_ptr(&self) -> *const f32 {
        &self.camera as *const CameraUniform as *const f32
    }

    pub fn status_ptr(&self) -> *const f32 {
        self.status.as_ptr() as *const f32
    }

    pub fn status_len(&self) -> u32 {
        self.status.len() as u32
    }

    // ---- Capacity accessors ----

    pub fn max_nodes(&self) -> u32 {
        self.layout.max_nodes as u32
    }

    pub fn max_events(&self) -> u32 {
        self.layout.max_events as u32
    }

    pub fn buffer_total_floats(&self) -> u32 {
        self.layout.buffer_total_floats as u32
    }
}
