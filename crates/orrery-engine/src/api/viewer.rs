use glam::Vec3;
use crate::api::config::ViewerConfig;
use crate::api::error::ModeRequestError;
use crate::api::status::StatusEvent;
use crate::api::types::ViewMode;
use crate::assets::catalog::BodyCatalog;
use crate::assets::loader::AssetLoader;
use crate::director::{RequestOutcome, TransitionDirector};
use crate::input::queue::{InputEvent, InputQueue};
use crate::renderer::camera::CameraRig;
use crate::renderer::traits::SceneGraph;

/// Top-level composition root: owns the scene, the asset loader and the
/// director for one viewer session. `init` populates, `dispose` tears down.
pub struct Viewer<S: SceneGraph, L: AssetLoader> {
    director: TransitionDirector,
    scene: S,
    loader: L,
    input: InputQueue,
    initialized: bool,
}

impl<S: SceneGraph, L: AssetLoader> Viewer<S, L> {
    pub fn new(config: &ViewerConfig, catalog: BodyCatalog, scene: S, loader: L) -> Self {
        Self {
            director: TransitionDirector::new(config, catalog),
            scene,
            loader,
            input: InputQueue::new(),
            initialized: false,
        }
    }

    /// Start loading every body into the default layout.
    pub fn init(&mut self) {
        if self.initialized {
            return;
        }
        let id = self.director.populate(&mut self.loader);
        self.initialized = true;
        log::info!("viewer initialized ({} bodies, transition {})", self.director.catalog().len(), id.0);
    }

    /// Cancel any transition and release every body. `init` may be called again.
    pub fn dispose(&mut self) {
        self.director.dispose(&mut self.scene);
        self.input.drain();
        self.initialized = false;
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn request_mode(&mut self, mode: ViewMode) -> Result<RequestOutcome, ModeRequestError> {
        self.director.request_mode(mode, &mut self.loader)
    }

    pub fn push_input(&mut self, event: InputEvent) {
        self.input.push(event);
    }

    /// One frame: apply camera input, then advance the director.
    pub fn tick(&mut self, dt: f32) {
        if !self.initialized {
            return;
        }
        let camera = self.director.camera_mut();
        for event in self.input.drain() {
            match event {
                InputEvent::Fly { right, up, forward } => camera.fly(Vec3::new(right, up, forward), dt),
                InputEvent::Look { yaw, pitch } => camera.look(yaw, pitch),
                InputEvent::Orbit { dx, dy } => camera.orbit(dx, dy),
                InputEvent::Zoom { delta } => camera.zoom(delta),
            }
        }
        self.director.tick(dt, &mut self.scene, &mut self.loader);
    }

    pub fn drain_status(&mut self) -> Vec<StatusEvent> {
        self.director.drain_status()
    }

    pub fn director(&self) -> &TransitionDirector {
        &self.director
    }

    pub fn camera(&self) -> &CameraRig {
        self.director.camera()
    }

    pub fn scene(&self) -> &S {
        &self.scene
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::loader::BundledLoader;
    use crate::core::scene::Scene;

    fn viewer() -> Viewer<Scene, BundledLoader> {
        Viewer::new(&ViewerConfig::default(), BodyCatalog::builtin(1), Scene::new(), BundledLoader::new("models/"))
    }

    fn settle(viewer: &mut Viewer<Scene, BundledLoader>) {
        for _ in 0..300 {
            viewer.tick(1.0 / 60.0);
            if viewer.director().is_idle() {
                return;
            }
        }
        panic!("viewer did not settle");
    }

    #[test]
    fn tick_before_init_does_nothing() {
        let mut v = viewer();
        v.tick(0.1);
        assert!(v.scene().is_empty());
    }

    #[test]
    fn init_then_dispose_round_trip() {
        let mut v = viewer();
        v.init();
        settle(&mut v);
        assert_eq!(v.scene().len(), 9);
        assert_eq!(v.scene().find_by_asset("models/earth").map(|n| n.asset_index), Some(3));

        v.dispose();
        assert!(v.scene().is_empty());
        v.init();
        settle(&mut v);
        assert_eq!(v.scene().len(), 9);
    }

    #[test]
    fn zoom_input_reaches_the_camera_once_settled() {
        let mut v = viewer();
        v.init();
        settle(&mut v);
        let before = v.camera().distance();
        v.push_input(InputEvent::Zoom { delta: 1.0 });
        v.tick(1.0 / 60.0);
        assert!(v.camera().distance() > before);
    }

    #[test]
    fn fly_input_moves_the_ship_in_free_flight() {
        let mut v = viewer();
        v.init();
        settle(&mut v);
        v.request_mode(ViewMode::FreeFlight).unwrap();
        let eye = v.camera().eye();
        v.push_input(InputEvent::Fly { right: 0.0, up: 0.0, forward: 1.0 });
        v.tick(0.5);
        assert!(v.camera().eye().distance(eye) > 1.0);
    }
}
