//! One in-flight mode change and the per-body work it schedules.

use std::cell::Cell;
use std::rc::Rc;
use glam::Vec3;
use crate::api::config::ViewerConfig;
use crate::api::error::AnimationCancelled;
use crate::api::types::{BodyId, TransitionId, ViewMode};
use crate::assets::loader::AssetLoader;
use crate::assets::registry::{BodyRegistry, Representation};
use crate::director::loads::AssetLoads;
use crate::extensions::easing::Easing;
use crate::extensions::transform::Placement;
use crate::extensions::tween::Tween;
use crate::renderer::camera::CameraHandle;
use crate::renderer::traits::SceneGraph;

/// Shared cancellation flag. Every mutation a transition schedules is
/// preceded by `check()`.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Rc<Cell<bool>>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.set(true);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.get()
    }

    pub(crate) fn check(&self) -> Result<(), AnimationCancelled> {
        if self.is_cancelled() {
            Err(AnimationCancelled)
        } else {
            Ok(())
        }
    }
}

/// Durations and curves for body animations.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Timing {
    pub exit: (f32, Easing),
    pub enter: (f32, Easing),
    pub motion: (f32, Easing),
    pub enter_offset: Vec3,
}

impl Timing {
    pub fn new(config: &ViewerConfig) -> Self {
        Self {
            exit: (config.exit_duration, config.exit_easing),
            enter: (config.enter_duration, config.enter_easing),
            motion: (config.move_duration, config.move_easing),
            enter_offset: config.enter_offset,
        }
    }
}

/// Where a body should end up under the target mode.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Target {
    pub placement: Placement,
    pub representation: Representation,
    /// Orbital angle to record on the instance; `None` outside orbit mode.
    pub orbit_phase: Option<f32>,
}

#[derive(Debug)]
pub(crate) enum Step {
    /// Shrinking out. Released when the tween completes.
    Exit(Tween),
    /// Waiting for the body's asset before materializing.
    Await,
    /// Growing in, or moving from where it was, toward the target.
    Approach(Tween),
    Done,
}

/// The work one body needs to reach its target (or leave the scene).
#[derive(Debug)]
pub(crate) struct BodyJob {
    pub id: BodyId,
    pub target: Option<Target>,
    pub step: Step,
}

/// What a job did this frame, for the director to report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum JobEvent {
    Idle,
    Released,
    Materialized,
    Finished,
}

impl BodyJob {
    /// Shrink out and release.
    pub fn exit(id: BodyId, from: Placement, timing: &Timing) -> Self {
        let (duration, easing) = timing.exit;
        Self {
            id,
            target: None,
            step: Step::Exit(Tween::shrink(from, duration, easing)),
        }
    }

    /// Shrink out, release, then come back under another representation.
    pub fn swap(id: BodyId, from: Placement, target: Target, timing: &Timing) -> Self {
        let (duration, easing) = timing.exit;
        Self {
            id,
            target: Some(target),
            step: Step::Exit(Tween::shrink(from, duration, easing)),
        }
    }

    /// Load, materialize off to the side, and grow into place.
    pub fn enter(id: BodyId, target: Target) -> Self {
        Self {
            id,
            target: Some(target),
            step: Step::Await,
        }
    }

    /// Stay live and move from the current placement to the new target.
    pub fn retarget(id: BodyId, from: Placement, target: Target, timing: &Timing) -> Self {
        let (duration, easing) = timing.motion;
        Self {
            id,
            target: Some(target),
            step: Step::Approach(Tween::new(from, target.placement, duration, easing)),
        }
    }

    pub fn is_done(&self) -> bool {
        matches!(self.step, Step::Done)
    }

    pub fn is_awaiting(&self) -> bool {
        matches!(self.step, Step::Await)
    }

    /// Give up on a body whose asset failed to load.
    pub fn abandon(&mut self) {
        self.step = Step::Done;
    }

    /// Run one frame of this job. Every registry write is guarded by `token`.
    pub fn advance(
        &mut self,
        dt: f32,
        token: &CancelToken,
        timing: &Timing,
        registry: &mut BodyRegistry,
        scene: &mut impl SceneGraph,
        loads: &mut AssetLoads,
        loader: &mut impl AssetLoader,
    ) -> Result<JobEvent, AnimationCancelled> {
        match &mut self.step {
            Step::Exit(tween) => {
                let placement = tween.advance(dt);
                let complete = tween.is_complete();
                token.check()?;
                registry.write_placement(scene, &self.id, placement);
                if !complete {
                    return Ok(JobEvent::Idle);
                }
                token.check()?;
                registry.release(scene, &self.id);
                self.step = if self.target.is_some() { Step::Await } else { Step::Done };
                Ok(JobEvent::Released)
            }
            Step::Await => {
                let Some(target) = self.target else {
                    self.step = Step::Done;
                    return Ok(JobEvent::Finished);
                };
                loads.request(&self.id, loader);
                let Some(asset) = loads.cached(&self.id) else {
                    return Ok(JobEvent::Idle);
                };
                let index = registry.catalog().index_of(&self.id).map_or(-1, |i| i as i32);
                let asset = asset.clone().with_index(index);
                let start = target
                    .placement
                    .with_position(target.placement.position + timing.enter_offset)
                    .with_scale(0.0);

                token.check()?;
                if let Err(err) = registry.materialize(scene, &self.id, &asset, start, target.representation) {
                    log::error!("cannot materialize: {err}");
                    self.step = Step::Done;
                    return Ok(JobEvent::Finished);
                }
                registry.update(scene, &self.id, |instance| instance.orbital_phase = target.orbit_phase);
                let (duration, easing) = timing.enter;
                self.step = Step::Approach(Tween::new(start, target.placement, duration, easing));
                Ok(JobEvent::Materialized)
            }
            Step::Approach(tween) => {
                let placement = tween.advance(dt);
                let complete = tween.is_complete();
                let phase = self.target.and_then(|t| t.orbit_phase);
                token.check()?;
                registry.update(scene, &self.id, |instance| {
                    instance.position = placement.position;
                    instance.scale = placement.scale;
                    instance.orbital_phase = phase;
                });
                if complete {
                    self.step = Step::Done;
                    return Ok(JobEvent::Finished);
                }
                Ok(JobEvent::Idle)
            }
            Step::Done => Ok(JobEvent::Idle),
        }
    }
}

/// One mode change in flight. At most one is active; a newer request
/// cancels the token of the older one before doing anything else.
#[derive(Debug)]
pub struct Transition {
    pub id: TransitionId,
    pub from: ViewMode,
    pub to: ViewMode,
    /// Director clock (seconds) when the transition began.
    pub started_at: f32,
    /// Bodies this transition adds, moves or removes.
    pub affected: Vec<BodyId>,
    pub(crate) token: CancelToken,
    pub(crate) jobs: Vec<BodyJob>,
    pub(crate) camera: Option<CameraHandle>,
}

impl Transition {
    pub fn token(&self) -> &CancelToken {
        &self.token
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Jobs still running.
    pub fn pending_jobs(&self) -> usize {
        self.jobs.iter().filter(|j| !j.is_done()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::catalog::BodyCatalog;
    use crate::assets::loader::{BundledLoader, VisualAsset};
    use crate::core::scene::Scene;

    fn timing() -> Timing {
        Timing::new(&ViewerConfig::default())
    }

    fn target(x: f32) -> Target {
        Target {
            placement: Placement::new(Vec3::new(x, 0.0, 0.0), 5.0),
            representation: Representation::Scaled,
            orbit_phase: None,
        }
    }

    fn live_earth() -> (BodyRegistry, Scene) {
        let mut registry = BodyRegistry::new(BodyCatalog::builtin(3));
        let mut scene = Scene::new();
        registry
            .materialize(&mut scene, &BodyId::new("earth"), &VisualAsset::new("earth"), target(10.0).placement, Representation::Scaled)
            .unwrap();
        (registry, scene)
    }

    #[test]
    fn cancelled_token_blocks_every_mutation() {
        let (mut registry, mut scene) = live_earth();
        let mut loads = AssetLoads::new();
        let mut loader = BundledLoader::default();
        let earth = BodyId::new("earth");
        let before = registry.instance(&earth).unwrap().clone();

        let token = CancelToken::new();
        token.cancel();
        let mut job = BodyJob::exit(earth.clone(), before.placement(), &timing());
        for _ in 0..10 {
            let result = job.advance(0.1, &token, &timing(), &mut registry, &mut scene, &mut loads, &mut loader);
            assert_eq!(result, Err(AnimationCancelled));
        }
        assert_eq!(registry.instance(&earth), Some(&before));
        assert_eq!(scene.destroyed_count(), 0);
    }

    #[test]
    fn exit_shrinks_then_releases() {
        let (mut registry, mut scene) = live_earth();
        let mut loads = AssetLoads::new();
        let mut loader = BundledLoader::default();
        let earth = BodyId::new("earth");
        let token = CancelToken::new();
        let mut job = BodyJob::exit(earth.clone(), target(10.0).placement, &timing());

        let event = job.advance(0.2, &token, &timing(), &mut registry, &mut scene, &mut loads, &mut loader);
        assert_eq!(event, Ok(JobEvent::Idle));
        assert!(registry.instance(&earth).unwrap().scale < 5.0);

        let event = job.advance(0.2, &token, &timing(), &mut registry, &mut scene, &mut loads, &mut loader);
        assert_eq!(event, Ok(JobEvent::Released));
        assert!(job.is_done());
        assert!(!registry.is_live(&earth));
        assert!(scene.is_empty());
    }

    #[test]
    fn swap_never_holds_two_instances() {
        let (mut registry, mut scene) = live_earth();
        let mut loads = AssetLoads::new();
        let mut loader = BundledLoader::default();
        let earth = BodyId::new("earth");
        let token = CancelToken::new();
        let orbital = Target {
            placement: Placement::new(Vec3::new(0.0, 0.0, 40.0), 4.0),
            representation: Representation::Orbital,
            orbit_phase: Some(1.0),
        };
        let mut job = BodyJob::swap(earth.clone(), target(10.0).placement, orbital, &timing());

        let mut frames = 0;
        while !job.is_done() {
            job.advance(0.05, &token, &timing(), &mut registry, &mut scene, &mut loads, &mut loader).unwrap();
            loads.poll();
            assert!(scene.len() <= 1);
            frames += 1;
            assert!(frames < 200);
        }
        let instance = registry.instance(&earth).unwrap();
        assert_eq!(instance.representation, Representation::Orbital);
        assert_eq!(instance.placement(), orbital.placement);
        assert_eq!(instance.orbital_phase, Some(1.0));
        assert_eq!(scene.created_count(), 2);
    }

    #[test]
    fn enter_starts_offset_and_invisible_small() {
        let mut registry = BodyRegistry::new(BodyCatalog::builtin(3));
        let mut scene = Scene::new();
        let mut loads = AssetLoads::new();
        let mut loader = BundledLoader::new("m/");
        let mars = BodyId::new("mars");
        let token = CancelToken::new();
        let mut job = BodyJob::enter(mars.clone(), target(300.0));

        // First frame only requests the load.
        let event = job.advance(0.1, &token, &timing(), &mut registry, &mut scene, &mut loads, &mut loader);
        assert_eq!(event, Ok(JobEvent::Idle));
        loads.poll();

        let event = job.advance(0.1, &token, &timing(), &mut registry, &mut scene, &mut loads, &mut loader);
        assert_eq!(event, Ok(JobEvent::Materialized));
        let instance = registry.instance(&mars).unwrap();
        assert_eq!(instance.scale, 0.0);
        assert_eq!(instance.position, Vec3::new(300.0, 0.0, 0.0) + timing().enter_offset);
        let node = scene.get(instance.node).unwrap();
        assert_eq!(node.asset_key, "m/mars");
        assert_eq!(node.asset_index, 4);
    }
}
