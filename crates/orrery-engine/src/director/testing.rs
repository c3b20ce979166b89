//! Scriptable asset loader for frame-by-frame director tests.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::future::{poll_fn, ready};
use std::rc::Rc;
use std::task::Poll;
use crate::api::error::LoadError;
use crate::api::types::BodyId;
use crate::assets::loader::{AssetFuture, AssetLoader, VisualAsset};

/// Result slot a test fills in to resolve a pending load.
pub type Slot = Rc<RefCell<Option<Result<VisualAsset, LoadError>>>>;

/// Resolves immediately by default; selected bodies fail or wait on a slot.
#[derive(Default)]
pub struct ScriptedLoader {
    failing: HashSet<BodyId>,
    manual: HashMap<BodyId, Slot>,
    requests: Vec<BodyId>,
}

impl ScriptedLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(mut self, name: &str) -> Self {
        self.failing.insert(BodyId::new(name));
        self
    }

    /// Make loads of `name` stay pending until the returned slot is filled.
    pub fn manual(&mut self, name: &str) -> Slot {
        let slot = Slot::default();
        self.manual.insert(BodyId::new(name), Rc::clone(&slot));
        slot
    }

    pub fn request_count(&self, name: &str) -> usize {
        let id = BodyId::new(name);
        self.requests.iter().filter(|r| **r == id).count()
    }
}

impl AssetLoader for ScriptedLoader {
    fn load_body_asset(&mut self, id: &BodyId) -> AssetFuture {
        self.requests.push(id.clone());
        if self.failing.contains(id) {
            return Box::pin(ready(Err::<VisualAsset, _>(LoadError::new(id, "scripted failure"))));
        }
        if let Some(slot) = self.manual.get(id) {
            let slot = Rc::clone(slot);
            return Box::pin(poll_fn(move |_| match slot.borrow_mut().take() {
                Some(result) => Poll::Ready(result),
                None => Poll::Pending,
            }));
        }
        Box::pin(ready(Ok::<_, LoadError>(VisualAsset::new(id.as_str()))))
    }
}
