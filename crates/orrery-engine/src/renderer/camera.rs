use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};
use std::f32::consts::FRAC_PI_2;
use crate::api::config::ViewerConfig;
use crate::extensions::easing::{ease, ease_vec3, Easing};
use crate::systems::placement::SceneBounds;

/// Keeps the pitch away from the poles so `look_at` never degenerates.
const PITCH_LIMIT: f32 = FRAC_PI_2 - 0.05;
/// Pitch the rig starts with: slightly above the orbital plane.
const DEFAULT_PITCH: f32 = 0.35;

/// Identifies one framing animation. Stale handles are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CameraHandle(pub u64);

/// Allowed camera-to-focus distance while the user orbits/zooms.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomLimits {
    pub min: f32,
    pub max: f32,
}

impl ZoomLimits {
    pub fn new(min: f32, max: f32) -> Self {
        Self {
            min: min.min(max),
            max: max.max(min),
        }
    }

    pub fn clamp(&self, distance: f32) -> f32 {
        distance.clamp(self.min, self.max)
    }

    /// Widen the range so it contains `distance`.
    pub fn including(self, distance: f32) -> Self {
        Self::new(self.min.min(distance), self.max.max(distance))
    }
}

/// GPU-side camera data, mirrored into the shared buffer each frame.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, Pod, Zeroable)]
pub struct CameraUniform {
    pub view: [[f32; 4]; 4],
    pub eye: [f32; 3],
    pub fov_y: f32,
    pub target: [f32; 3],
    /// 1.0 while in free flight.
    pub free_flight: f32,
}

impl CameraUniform {
    pub const FLOATS: usize = 24;
}

/// Framing and input tuning, lifted out of `ViewerConfig`.
#[derive(Debug, Clone, Copy)]
struct RigSettings {
    duration: f32,
    easing: Easing,
    overview_padding: f32,
    paired_multiplier: f32,
    overview_zoom_min: f32,
    overview_zoom_max: f32,
    orbit_sensitivity: f32,
    zoom_sensitivity: f32,
    flight_speed: f32,
    look_sensitivity: f32,
}

struct CameraAnimation {
    handle: CameraHandle,
    from_focus: Vec3,
    to_focus: Vec3,
    from_distance: f32,
    to_distance: f32,
    elapsed: f32,
}

/// Free-flight pose. Looks along `-direction(yaw, pitch)`, the same
/// parametrization the orbit camera uses, so switching is seamless.
#[derive(Debug, Clone, Copy)]
struct Flight {
    eye: Vec3,
    yaw: f32,
    pitch: f32,
}

/// Orbit camera around a focus point, with animated framing and an
/// optional free-flight override.
pub struct CameraRig {
    focus: Vec3,
    distance: f32,
    yaw: f32,
    pitch: f32,
    fov_y: f32,
    limits: ZoomLimits,
    animation: Option<CameraAnimation>,
    flight: Option<Flight>,
    next_handle: u64,
    settings: RigSettings,
}

impl CameraRig {
    pub fn new(config: &ViewerConfig) -> Self {
        Self {
            focus: Vec3::ZERO,
            distance: 1000.0,
            yaw: 0.0,
            pitch: DEFAULT_PITCH,
            fov_y: config.fov_y(),
            limits: ZoomLimits::new(1.0, f32::MAX),
            animation: None,
            flight: None,
            next_handle: 1,
            settings: RigSettings {
                duration: config.camera_duration,
                easing: config.camera_easing,
                overview_padding: config.overview_padding,
                paired_multiplier: config.paired_distance_multiplier,
                overview_zoom_min: config.overview_zoom_min,
                overview_zoom_max: config.overview_zoom_max,
                orbit_sensitivity: config.orbit_sensitivity,
                zoom_sensitivity: config.zoom_sensitivity,
                flight_speed: config.flight_speed,
                look_sensitivity: config.look_sensitivity,
            },
        }
    }

    pub fn focus(&self) -> Vec3 {
        self.focus
    }

    pub fn distance(&self) -> f32 {
        self.distance
    }

    pub fn zoom_limits(&self) -> ZoomLimits {
        self.limits
    }

    pub fn set_zoom_limits(&mut self, limits: ZoomLimits) {
        self.limits = limits;
        if self.animation.is_none() {
            self.distance = limits.clamp(self.distance);
        }
    }

    /// Distance at which a sphere of `radius` fills the vertical field of view.
    fn fit_distance(&self, radius: f32) -> f32 {
        radius / (self.fov_y * 0.5).tan()
    }

    /// Animate to show the whole of `bounds`. Zoom limits become a range
    /// around the framing distance.
    pub fn frame_overview(&mut self, bounds: SceneBounds) -> CameraHandle {
        let distance = self.fit_distance(bounds.radius) * self.settings.overview_padding;
        self.limits = ZoomLimits::new(
            distance * self.settings.overview_zoom_min,
            distance * self.settings.overview_zoom_max,
        );
        self.start(bounds.center, distance)
    }

    /// Animate to frame two bodies `separation` apart (center to center)
    /// whose larger bounding radius is `max_radius`.
    pub fn frame_paired(
        &mut self,
        focus: Vec3,
        separation: f32,
        max_radius: f32,
        limits: ZoomLimits,
    ) -> CameraHandle {
        let extent = separation * 0.5 + max_radius;
        let distance = self.fit_distance(extent) * self.settings.paired_multiplier;
        self.limits = limits.including(distance);
        self.start(focus, distance)
    }

    fn start(&mut self, focus: Vec3, distance: f32) -> CameraHandle {
        let handle = CameraHandle(self.next_handle);
        self.next_handle += 1;
        self.animation = Some(CameraAnimation {
            handle,
            from_focus: self.focus,
            to_focus: focus,
            from_distance: self.distance,
            to_distance: distance,
            elapsed: 0.0,
        });
        log::debug!("camera {handle:?}: framing {focus} at {distance:.1}");
        handle
    }

    /// Stop the animation where it is. The camera keeps its current pose.
    pub fn cancel(&mut self, handle: CameraHandle) {
        if self.animation.as_ref().is_some_and(|a| a.handle == handle) {
            self.animation = None;
            log::trace!("camera {handle:?}: cancelled");
        }
    }

    pub fn is_animating(&self, handle: CameraHandle) -> bool {
        self.animation.as_ref().is_some_and(|a| a.handle == handle)
    }

    pub fn is_busy(&self) -> bool {
        self.animation.is_some()
    }

    /// Advance the framing animation by `dt` seconds.
    pub fn tick(&mut self, dt: f32) {
        let Some(anim) = self.animation.as_mut() else {
            return;
        };
        anim.elapsed += dt;
        let duration = self.settings.duration;
        let t = if duration > 0.0 { (anim.elapsed / duration).min(1.0) } else { 1.0 };
        let easing = self.settings.easing;
        self.focus = ease_vec3(anim.from_focus, anim.to_focus, t, easing);
        self.distance = ease(anim.from_distance, anim.to_distance, t, easing);
        if t >= 1.0 {
            self.focus = anim.to_focus;
            self.distance = anim.to_distance;
            self.animation = None;
        }
    }

    // -- User orbit controls --

    /// Rotate around the focus. Ignored while framing or in free flight.
    pub fn orbit(&mut self, dx: f32, dy: f32) {
        if self.animation.is_some() || self.flight.is_some() {
            return;
        }
        self.yaw -= dx * self.settings.orbit_sensitivity;
        self.pitch = (self.pitch + dy * self.settings.orbit_sensitivity).clamp(-PITCH_LIMIT, PITCH_LIMIT);
    }

    /// Multiplicative zoom, clamped to the current limits.
    pub fn zoom(&mut self, delta: f32) {
        if self.animation.is_some() || self.flight.is_some() {
            return;
        }
        let factor = (1.0 + delta * self.settings.zoom_sensitivity).max(0.01);
        self.distance = self.limits.clamp(self.distance * factor);
    }

    // -- Free flight --

    pub fn is_free_flight(&self) -> bool {
        self.flight.is_some()
    }

    /// Hand the camera to direct movement input, starting from the current pose.
    pub fn enter_free_flight(&mut self) {
        if let Some(anim) = self.animation.take() {
            log::trace!("camera {:?}: dropped for free flight", anim.handle);
        }
        self.flight = Some(Flight {
            eye: self.eye(),
            yaw: self.yaw,
            pitch: self.pitch,
        });
    }

    /// Return to orbiting a point in front of the ship, at the same pose.
    pub fn exit_free_flight(&mut self) {
        if let Some(flight) = self.flight.take() {
            self.yaw = flight.yaw;
            self.pitch = flight.pitch;
            self.focus = flight.eye - direction(flight.yaw, flight.pitch) * self.distance;
        }
    }

    /// Move along the ship's axes. `movement` is (right, up, forward) in
    /// units of `flight_speed`.
    pub fn fly(&mut self, movement: Vec3, dt: f32) {
        let speed = self.settings.flight_speed;
        if let Some(flight) = self.flight.as_mut() {
            let forward = -direction(flight.yaw, flight.pitch);
            let right = forward.cross(Vec3::Y).normalize_or_zero();
            let up = right.cross(forward);
            let step = right * movement.x + up * movement.y + forward * movement.z;
            flight.eye += step * speed * dt;
        }
    }

    pub fn look(&mut self, d_yaw: f32, d_pitch: f32) {
        let sensitivity = self.settings.look_sensitivity;
        if let Some(flight) = self.flight.as_mut() {
            flight.yaw -= d_yaw * sensitivity;
            flight.pitch = (flight.pitch + d_pitch * sensitivity).clamp(-PITCH_LIMIT, PITCH_LIMIT);
        }
    }

    // -- Pose --

    pub fn eye(&self) -> Vec3 {
        match self.flight {
            Some(flight) => flight.eye,
            None => self.focus + direction(self.yaw, self.pitch) * self.distance,
        }
    }

    /// Point the camera looks at.
    pub fn target(&self) -> Vec3 {
        match self.flight {
            Some(flight) => flight.eye - direction(flight.yaw, flight.pitch),
            None => self.focus,
        }
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye(), self.target(), Vec3::Y)
    }

    pub fn uniform(&self) -> CameraUniform {
        CameraUniform {
            view: self.view_matrix().to_cols_array_2d(),
            eye: self.eye().to_array(),
            fov_y: self.fov_y,
            target: self.target().to_array(),
            free_flight: if self.flight.is_some() { 1.0 } else { 0.0 },
        }
    }
}

/// Unit vector from the focus toward the eye.
fn direction(yaw: f32, pitch: f32) -> Vec3 {
    Vec3::new(pitch.cos() * yaw.sin(), pitch.sin(), pitch.cos() * yaw.cos())
}
