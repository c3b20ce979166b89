//! WASM bridge for the orrery viewer.
//!
//! One `ViewerRunner` lives in a `thread_local!`. The host drives it through
//! the free functions below and reads frame data straight out of wasm memory
//! using the pointer accessors.

pub mod loader;
pub mod runner;

pub use loader::JsAssetLoader;
pub use runner::ViewerRunner;

use std::cell::RefCell;
use js_sys::{Function, Math};
use wasm_bindgen::prelude::*;
use orrery_engine::{BodyCatalog, InputEvent, ViewerConfig};

thread_local! {
    static RUNNER: RefCell<Option<ViewerRunner<JsAssetLoader>>> = const { RefCell::new(None) };
}

/// Run `f` against the live runner. `None` before `viewer_init`.
fn with_runner<R>(f: impl FnOnce(&mut ViewerRunner<JsAssetLoader>) -> R) -> Option<R> {
    RUNNER.with(|cell| cell.borrow_mut().as_mut().map(f))
}

fn js_error(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// Build the catalog and start loading every body into the default layout.
///
/// `config_json` and `catalog_json` are optional; without a config the
/// session seed is drawn from `Math.random`. Catalog errors are fatal and
/// returned to the caller.
#[wasm_bindgen]
pub fn viewer_init(
    config_json: Option<String>,
    catalog_json: Option<String>,
    load_asset: Function,
) -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);

    let config = match config_json {
        Some(json) => ViewerConfig::from_json(&json).map_err(js_error)?,
        None => ViewerConfig {
            session_seed: (Math::random() * u32::MAX as f64) as u64,
            ..ViewerConfig::default()
        },
    };
    let catalog = match catalog_json {
        Some(json) => BodyCatalog::from_json(&json, config.session_seed).map_err(js_error)?,
        None => BodyCatalog::builtin(config.session_seed),
    };

    let mut runner = ViewerRunner::new(&config, catalog, JsAssetLoader::new(load_asset));
    runner.init();
    RUNNER.with(|cell| *cell.borrow_mut() = Some(runner));
    log::info!("orrery: initialized");
    Ok(())
}

/// Tear the scene down and drop the runner. `viewer_init` may be called again.
#[wasm_bindgen]
pub fn viewer_dispose() {
    RUNNER.with(|cell| {
        if let Some(mut runner) = cell.borrow_mut().take() {
            runner.dispose();
        }
    });
}

#[wasm_bindgen]
pub fn viewer_tick(dt: f32) {
    with_runner(|r| r.tick(dt));
}

/// `mode` is one of `default`, `orbit`, `paired`, `free-flight`.
#[wasm_bindgen]
pub fn viewer_request_mode(mode: &str, a: Option<String>, b: Option<String>) -> Result<(), JsValue> {
    with_runner(|r| r.request_named(mode, a.as_deref(), b.as_deref()))
        .ok_or_else(|| js_error("viewer not initialized"))?
        .map(|_| ())
        .map_err(js_error)
}

// ---- Input ----

#[wasm_bindgen]
pub fn viewer_fly(right: f32, up: f32, forward: f32) {
    with_runner(|r| r.push_input(InputEvent::Fly { right, up, forward }));
}

#[wasm_bindgen]
pub fn viewer_look(yaw: f32, pitch: f32) {
    with_runner(|r| r.push_input(InputEvent::Look { yaw, pitch }));
}

#[wasm_bindgen]
pub fn viewer_orbit(dx: f32, dy: f32) {
    with_runner(|r| r.push_input(InputEvent::Orbit { dx, dy }));
}

#[wasm_bindgen]
pub fn viewer_zoom(delta: f32) {
    with_runner(|r| r.push_input(InputEvent::Zoom { delta }));
}

// ---- Data accessors ----

#[wasm_bindgen]
pub fn get_header_ptr() -> *const f32 {
    with_runner(|r| r.header_ptr()).unwrap_or(std::ptr::null())
}

#[wasm_bindgen]
pub fn get_nodes_ptr() -> *const f32 {
    with_runner(|r| r.nodes_ptr()).unwrap_or(std::ptr::null())
}

#[wasm_bindgen]
pub fn get_node_count() -> u32 {
    with_runner(|r| r.node_count()).unwrap_or(0)
}

#[wasm_bindgen]
pub fn get_camera_ptr() -> *const f32 {
    with_runner(|r| r.camera_ptr()).unwrap_or(std::ptr::null())
}

#[wasm_bindgen]
pub fn get_status_ptr() -> *const f32 {
    with_runner(|r| r.status_ptr()).unwrap_or(std::ptr::null())
}

#[wasm_bindgen]
pub fn get_status_len() -> u32 {
    with_runner(|r| r.status_len()).unwrap_or(0)
}

// ---- Capacity accessors ----

#[wasm_bindgen]
pub fn get_max_nodes() -> u32 {
    with_runner(|r| r.max_nodes()).unwrap_or(0)
}

#[wasm_bindgen]
pub fn get_max_events() -> u32 {
    with_runner(|r| r.max_events()).unwrap_or(0)
}

#[wasm_bindgen]
pub fn get_buffer_total_floats() -> u32 {
    with_runner(|r| r.buffer_total_floats()).unwrap_or(0)
}
