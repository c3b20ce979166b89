pub mod camera;
pub mod instance;
pub mod traits;

pub use traits::SceneGraph;
