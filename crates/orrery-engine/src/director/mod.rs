//! Transition Director: the view-mode state machine.
//!
//! The director is the only writer of the body registry and the camera rig.
//! A mode request validates, cancels the in-flight transition, and plans
//! per-body jobs from what is actually live right now. The frame tick then
//! drives those jobs, the camera framing, and the steady-state updaters.
//!
//! ```text
//! Idle(m) --request(t)--> Transitioning(m, t) --all jobs + camera done--> Idle(t)
//!                               |  request(u)
//!                               +------------> Transitioning(t, u)   (old token cancelled)
//! ```

pub mod loads;
pub mod transition;
#[cfg(test)]
pub(crate) mod testing;

use std::f32::consts::TAU;
use crate::api::config::ViewerConfig;
use crate::api::error::{AnimationCancelled, InvalidDescriptorError, LoadError, ModeConflictError, ModeRequestError};
use crate::api::status::StatusEvent;
use crate::api::types::{BodyId, TransitionId, ViewMode};
use crate::assets::catalog::BodyCatalog;
use crate::assets::loader::AssetLoader;
use crate::assets::registry::{BodyRegistry, Representation};
use crate::renderer::camera::{CameraRig, ZoomLimits};
use crate::renderer::traits::SceneGraph;
use crate::systems::orbit::{spin_bodies, OrbitAnimator};
use crate::systems::placement::{Layout, PairedPlacement, SceneBounds};

pub use loads::AssetLoads;
pub use transition::{CancelToken, Transition};
use transition::{BodyJob, JobEvent, Target, Timing};

/// Placements that already match within this tolerance are left alone.
const SETTLED_TOLERANCE: f32 = 1e-4;

#[derive(Debug, Clone, PartialEq)]
pub enum DirectorState {
    Idle(ViewMode),
    Transitioning { from: ViewMode, to: ViewMode },
}

/// Result of an accepted mode request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestOutcome {
    /// Already in (or heading to) that mode. Nothing was started.
    Unchanged,
    Started(TransitionId),
}

enum Framing {
    Overview(SceneBounds),
    Paired { paired: PairedPlacement, limits: ZoomLimits },
    FreeFlight,
}

/// Desired end state of a transition.
struct Plan {
    targets: Vec<(BodyId, Target)>,
    framing: Option<Framing>,
}

impl Plan {
    fn target(&self, id: &BodyId) -> Option<Target> {
        self.targets.iter().find(|(t, _)| t == id).map(|(_, target)| *target)
    }

    fn needs(&self, id: &BodyId) -> bool {
        self.targets.iter().any(|(t, _)| t == id)
    }
}

pub struct TransitionDirector {
    timing: Timing,
    layout: Layout,
    registry: BodyRegistry,
    camera: CameraRig,
    orbit: OrbitAnimator,
    loads: AssetLoads,
    state: DirectorState,
    active: Option<Transition>,
    next_id: u64,
    /// Seconds of ticks since construction.
    clock: f32,
    status: Vec<StatusEvent>,
}

impl TransitionDirector {
    pub fn new(config: &ViewerConfig, catalog: BodyCatalog) -> Self {
        Self {
            timing: Timing::new(config),
            layout: Layout::new(config, &catalog),
            registry: BodyRegistry::new(catalog),
            camera: CameraRig::new(config),
            orbit: OrbitAnimator::new(),
            loads: AssetLoads::new(),
            state: DirectorState::Idle(ViewMode::Default),
            active: None,
            next_id: 1,
            clock: 0.0,
            status: Vec::new(),
        }
    }

    // -- Accessors --

    pub fn state(&self) -> &DirectorState {
        &self.state
    }

    /// The settled mode, if no transition is running.
    pub fn mode(&self) -> Option<&ViewMode> {
        match &self.state {
            DirectorState::Idle(mode) => Some(mode),
            DirectorState::Transitioning { .. } => None,
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self.state, DirectorState::Idle(_))
    }

    /// Mode the viewer is in, or is heading to.
    pub fn heading_to(&self) -> &ViewMode {
        match &self.state {
            DirectorState::Idle(mode) => mode,
            DirectorState::Transitioning { to, .. } => to,
        }
    }

    pub fn active(&self) -> Option<&Transition> {
        self.active.as_ref()
    }

    pub fn registry(&self) -> &BodyRegistry {
        &self.registry
    }

    pub fn catalog(&self) -> &BodyCatalog {
        self.registry.catalog()
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn camera(&self) -> &CameraRig {
        &self.camera
    }

    /// User camera input goes straight to the rig; it never starts a transition.
    pub fn camera_mut(&mut self) -> &mut CameraRig {
        &mut self.camera
    }

    pub fn orbit(&self) -> &OrbitAnimator {
        &self.orbit
    }

    pub fn loads(&self) -> &AssetLoads {
        &self.loads
    }

    /// Take the status events queued since the last drain.
    pub fn drain_status(&mut self) -> Vec<StatusEvent> {
        std::mem::take(&mut self.status)
    }

    // -- Requests --

    /// Load and place every body in the default layout.
    pub fn populate(&mut self, loader: &mut impl AssetLoader) -> TransitionId {
        self.supersede();
        self.start(ViewMode::Default, loader)
    }

    /// Ask for a new view mode. Conflicts and unknown bodies are rejected
    /// synchronously and leave everything as it was.
    pub fn request_mode(
        &mut self,
        mode: ViewMode,
        loader: &mut impl AssetLoader,
    ) -> Result<RequestOutcome, ModeRequestError> {
        self.validate(&mode)?;
        if *self.heading_to() == mode {
            log::trace!("request for {mode} ignored: already there");
            return Ok(RequestOutcome::Unchanged);
        }
        self.supersede();
        Ok(RequestOutcome::Started(self.start(mode, loader)))
    }

    fn validate(&self, mode: &ViewMode) -> Result<(), ModeRequestError> {
        let conflict = |reason| ModeConflictError {
            requested: mode.clone(),
            active: self.heading_to().clone(),
            reason,
        };
        match mode {
            ViewMode::PairedComparison { a, b } => {
                self.registry.get(a)?;
                self.registry.get(b)?;
                if a == b {
                    return Err(conflict("a body cannot be compared with itself").into());
                }
            }
            ViewMode::FreeFlight if *self.heading_to() == ViewMode::Orbit => {
                return Err(conflict("free flight is disabled in orbit mode").into());
            }
            _ => {}
        }
        Ok(())
    }

    /// Cancel the in-flight transition, body jobs and camera alike.
    fn supersede(&mut self) {
        if let Some(old) = self.active.take() {
            old.token.cancel();
            if let Some(handle) = old.camera {
                self.camera.cancel(handle);
            }
            log::debug!(
                "transition {} ({} -> {}) superseded with {} jobs pending",
                old.id.0,
                old.from,
                old.to,
                old.pending_jobs()
            );
        }
    }

    fn start(&mut self, to: ViewMode, loader: &mut impl AssetLoader) -> TransitionId {
        let from = self.heading_to().clone();
        let id = TransitionId(self.next_id);
        self.next_id += 1;

        self.orbit.set_enabled(false);
        let plan = self.plan(&to);

        let mut jobs = Vec::new();
        for instance in self.registry.all() {
            let current = instance.placement();
            let job = match plan.target(&instance.id) {
                None => BodyJob::exit(instance.id, current, &self.timing),
                Some(target) if target.representation != instance.representation => {
                    BodyJob::swap(instance.id, current, target, &self.timing)
                }
                Some(target)
                    if current.approx_eq(&target.placement, SETTLED_TOLERANCE)
                        && instance.orbital_phase == target.orbit_phase =>
                {
                    continue
                }
                Some(target) => BodyJob::retarget(instance.id, current, target, &self.timing),
            };
            jobs.push(job);
        }
        for (body, target) in &plan.targets {
            if !self.registry.is_live(body) {
                self.loads.request(body, loader);
                jobs.push(BodyJob::enter(body.clone(), *target));
            }
        }
        self.loads.retain(|body| plan.needs(body));

        if to != ViewMode::FreeFlight && self.camera.is_free_flight() {
            self.camera.exit_free_flight();
        }
        let camera = match plan.framing {
            Some(Framing::Overview(bounds)) => Some(self.camera.frame_overview(bounds)),
            Some(Framing::Paired { paired, limits }) => Some(self.camera.frame_paired(
                paired.focus,
                paired.separation,
                paired.max_radius,
                limits,
            )),
            Some(Framing::FreeFlight) => {
                self.camera.enter_free_flight();
                None
            }
            None => None,
        };

        log::info!("transition {}: {from} -> {to}, {} body jobs", id.0, jobs.len());
        self.state = DirectorState::Transitioning { from: from.clone(), to: to.clone() };
        self.active = Some(Transition {
            id,
            from,
            to,
            started_at: self.clock,
            affected: jobs.iter().map(|job| job.id.clone()).collect(),
            token: CancelToken::new(),
            jobs,
            camera,
        });
        id
    }

    /// Where every body belongs under `to`, and how to frame it.
    fn plan(&self, to: &ViewMode) -> Plan {
        let catalog = self.registry.catalog();
        let mut targets = Vec::new();
        let framing = match to {
            ViewMode::Default | ViewMode::FreeFlight => {
                for body in catalog.iter() {
                    if let Some(placement) = logged(self.layout.default_transform(body)) {
                        targets.push((body.id.clone(), Target {
                            placement,
                            representation: Representation::Scaled,
                            orbit_phase: None,
                        }));
                    }
                }
                if *to == ViewMode::FreeFlight {
                    Some(Framing::FreeFlight)
                } else {
                    logged(self.layout.default_bounds(catalog)).map(Framing::Overview)
                }
            }
            ViewMode::Orbit => {
                let elapsed = self.orbit.elapsed();
                for body in catalog.iter() {
                    let phase = self.layout.orbit_phase(body, elapsed).rem_euclid(TAU);
                    if let Some(placement) = logged(self.layout.orbit_transform_at_phase(body, phase)) {
                        targets.push((body.id.clone(), Target {
                            placement,
                            representation: Representation::Orbital,
                            orbit_phase: (!body.is_primary()).then_some(phase),
                        }));
                    }
                }
                logged(self.layout.orbit_bounds(catalog)).map(Framing::Overview)
            }
            ViewMode::PairedComparison { a, b } => {
                let (Ok(da), Ok(db)) = (catalog.get(a), catalog.get(b)) else {
                    return Plan { targets, framing: None };
                };
                logged(self.layout.paired_transform(da, db)).map(|paired| {
                    for (id, placement) in [(a, paired.a), (b, paired.b)] {
                        targets.push((id.clone(), Target {
                            placement,
                            representation: Representation::Scaled,
                            orbit_phase: None,
                        }));
                    }
                    let limits = ZoomLimits::new(
                        da.min_camera_distance.max(db.min_camera_distance),
                        da.max_camera_distance.max(db.max_camera_distance),
                    );
                    Framing::Paired { paired, limits }
                })
            }
        };
        log::debug!("plan for {to}: {} bodies", targets.len());
        Plan { targets, framing }
    }

    // -- Frame --

    /// Advance one frame: resolve loads, run the active transition, move
    /// the camera, then the steady-state updaters.
    pub fn tick(&mut self, dt: f32, scene: &mut impl SceneGraph, loader: &mut impl AssetLoader) {
        self.clock += dt;
        for (id, error) in self.loads.poll() {
            self.report_failure(id, error);
        }

        let mut active = self.active.take();
        if let Some(transition) = active.as_mut() {
            if let Err(AnimationCancelled) = self.advance(transition, dt, scene, loader) {
                log::trace!("transition {}: cancelled work skipped", transition.id.0);
            }
        }
        self.camera.tick(dt);
        if let Some(transition) = active {
            if transition.is_cancelled() {
                log::trace!("transition {} dropped", transition.id.0);
            } else if self.is_settled(&transition) {
                self.settle(transition);
            } else {
                self.active = Some(transition);
            }
        }

        self.orbit.advance(dt, &self.layout, &mut self.registry, scene);
        if self.active.is_none() && !self.orbit.is_enabled() {
            spin_bodies(dt, &mut self.registry, scene);
        }
    }

    fn advance(
        &mut self,
        transition: &mut Transition,
        dt: f32,
        scene: &mut impl SceneGraph,
        loader: &mut impl AssetLoader,
    ) -> Result<(), AnimationCancelled> {
        for job in transition.jobs.iter_mut() {
            let event = job.advance(
                dt,
                &transition.token,
                &self.timing,
                &mut self.registry,
                scene,
                &mut self.loads,
                loader,
            )?;
            match event {
                JobEvent::Released => log::debug!("{} released", job.id),
                JobEvent::Materialized => log::debug!("{} materialized", job.id),
                JobEvent::Idle | JobEvent::Finished => {}
            }
        }

        Ok(())
    }

    fn is_settled(&self, transition: &Transition) -> bool {
        transition.jobs.iter().all(BodyJob::is_done)
            && !transition.camera.is_some_and(|h| self.camera.is_animating(h))
    }

    fn settle(&mut self, transition: Transition) {
        let mode = transition.to;
        self.orbit.set_enabled(mode == ViewMode::Orbit);
        log::info!(
            "transition {}: settled in {mode} after {:.2}s",
            transition.id.0,
            self.clock - transition.started_at
        );
        self.state = DirectorState::Idle(mode.clone());
        self.status.push(StatusEvent::ModeSettled(mode));
    }

    /// A load failed: the body stays absent and the transition carries on.
    fn report_failure(&mut self, id: BodyId, error: LoadError) {
        log::warn!("{error}; continuing without it");
        if let Some(transition) = self.active.as_mut() {
            for job in transition.jobs.iter_mut().filter(|j| j.id == id && j.is_awaiting()) {
                job.abandon();
            }
        }
        self.status.push(StatusEvent::BodyLoadFailed { id, error });
    }

    /// Cancel everything and release every body.
    pub fn dispose(&mut self, scene: &mut impl SceneGraph) {
        self.supersede();
        self.status.clear();
        self.registry.release_all(scene);
        self.loads.clear();
        self.orbit.set_enabled(false);
        if self.camera.is_free_flight() {
            self.camera.exit_free_flight();
        }
        self.state = DirectorState::Idle(ViewMode::Default);
        log::info!("director disposed");
    }
}

fn logged<T>(result: Result<T, InvalidDescriptorError>) -> Option<T> {
    result.map_err(|err| log::error!("{err}")).ok()
}
