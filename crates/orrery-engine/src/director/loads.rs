use std::collections::{BTreeMap, HashMap};
use std::task::{Context, Poll, Waker};
use crate::api::error::LoadError;
use crate::api::types::BodyId;
use crate::assets::loader::{AssetFuture, AssetLoader, VisualAsset};

/// Session asset cache plus the loads still in flight.
///
/// Futures are polled once per frame from the tick, never awaited, so the
/// frame loop cannot block. A load nobody needs any more is dropped, which
/// cancels it.
#[derive(Default)]
pub struct AssetLoads {
    cache: HashMap<BodyId, VisualAsset>,
    in_flight: BTreeMap<BodyId, AssetFuture>,
}

impl AssetLoads {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start loading `id` unless it is cached or already in flight.
    pub fn request(&mut self, id: &BodyId, loader: &mut impl AssetLoader) {
        if self.cache.contains_key(id) || self.in_flight.contains_key(id) {
            return;
        }
        log::debug!("loading asset for {id}");
        self.in_flight.insert(id.clone(), loader.load_body_asset(id));
    }

    pub fn cached(&self, id: &BodyId) -> Option<&VisualAsset> {
        self.cache.get(id)
    }

    pub fn is_pending(&self, id: &BodyId) -> bool {
        self.in_flight.contains_key(id)
    }

    pub fn pending_count(&self) -> usize {
        self.in_flight.len()
    }

    /// Poll every in-flight load once. Successes move into the cache;
    /// failures are removed and returned.
    pub fn poll(&mut self) -> Vec<(BodyId, LoadError)> {
        let mut cx = Context::from_waker(Waker::noop());
        let mut finished = Vec::new();
        for (id, future) in self.in_flight.iter_mut() {
            if let Poll::Ready(result) = future.as_mut().poll(&mut cx) {
                finished.push((id.clone(), result));
            }
        }

        let mut failures = Vec::new();
        for (id, result) in finished {
            self.in_flight.remove(&id);
            match result {
                Ok(asset) => {
                    self.cache.insert(id, asset);
                }
                Err(err) => failures.push((id, err)),
            }
        }
        failures
    }

    /// Drop in-flight loads for bodies `keep` rejects.
    pub fn retain(&mut self, mut keep: impl FnMut(&BodyId) -> bool) {
        self.in_flight.retain(|id, _| {
            let kept = keep(id);
            if !kept {
                log::trace!("dropping load for {id}");
            }
            kept
        });
    }

    /// Forget everything, cancelling in-flight loads.
    pub fn clear(&mut self) {
        self.in_flight.clear();
        self.cache.clear();
    }
}
