pub mod api;
pub mod core;
pub mod components;
pub mod systems;
pub mod renderer;
pub mod bridge;
pub mod input;
pub mod assets;
pub mod extensions;
pub mod director;

// Re-export key types at crate root for convenience
pub use api::viewer::Viewer;
pub use api::config::ViewerConfig;
pub use api::types::{BodyId, NodeHandle, TransitionId, ViewMode, StatusRecord};
pub use api::status::{StatusEvent, STATUS_MODE_SETTLED, STATUS_BODY_LOAD_FAILED};
pub use api::error::{
    UnknownBodyError, InvalidDescriptorError, LoadError,
    ModeConflictError, ModeRequestError, CatalogError,
};
pub use assets::catalog::{BodyCatalog, BodyDescriptor, CatalogManifest};
pub use assets::loader::{AssetLoader, AssetFuture, BundledLoader, VisualAsset};
pub use assets::registry::{BodyRegistry, BodyInstance, Representation};
pub use components::node::Node;
pub use core::scene::Scene;
pub use director::{TransitionDirector, DirectorState, RequestOutcome, CancelToken};
pub use renderer::camera::{CameraRig, CameraUniform, CameraHandle, ZoomLimits};
pub use renderer::instance::{NodeInstance, NodeBuffer};
pub use renderer::traits::SceneGraph;
pub use input::queue::{InputEvent, InputQueue};
pub use bridge::protocol::ProtocolLayout;
pub use systems::placement::{Layout, PairedPlacement, SceneBounds};
pub use systems::orbit::OrbitAnimator;

// Extensions: easing and tweening shared by the director and the camera
pub use extensions::{Easing, Placement, Tween, lerp, ease, ease_vec3};
