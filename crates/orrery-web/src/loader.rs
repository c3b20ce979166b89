use js_sys::{Function, Promise};
use wasm_bindgen::JsValue;
use wasm_bindgen_futures::JsFuture;
use orrery_engine::{AssetFuture, AssetLoader, BodyId, LoadError, VisualAsset};

/// Asset loader backed by a host callback.
///
/// The callback receives a body id and returns a Promise (or a plain value)
/// resolving to the asset key the host renderer knows the model by. A
/// rejection becomes a `LoadError` for that body.
pub struct JsAssetLoader {
    load: Function,
}

impl JsAssetLoader {
    pub fn new(load: Function) -> Self {
        Self { load }
    }
}

fn describe(value: &JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{value:?}"))
}

impl AssetLoader for JsAssetLoader {
    fn load_body_asset(&mut self, id: &BodyId) -> AssetFuture {
        let id = id.clone();
        let called = self.load.call1(&JsValue::NULL, &JsValue::from_str(id.as_str()));
        Box::pin(async move {
            let value = called.map_err(|e| LoadError::new(&id, describe(&e)))?;
            let resolved = JsFuture::from(Promise::resolve(&value))
                .await
                .map_err(|e| LoadError::new(&id, describe(&e)))?;
            let key = resolved.as_string().unwrap_or_else(|| id.as_str().to_owned());
            Ok::<_, LoadError>(VisualAsset::new(key))
        })
    }
}
