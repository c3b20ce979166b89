// extensions/tween.rs
//
// Time-based interpolation of a body's placement.
// A tween only computes values; the owner decides whether it may write them.
//
// Usage:
//   let mut tween = Tween::new(from, to, 0.8, Easing::BackOut);
//   let current = tween.advance(dt);  // placement to write this frame
//   if tween.is_complete() { ... }

use super::easing::Easing;
use super::transform::Placement;

/// A single placement animation with a fixed duration.
#[derive(Debug, Clone)]
pub struct Tween {
    /// Start placement.
    pub from: Placement,
    /// End placement.
    pub to: Placement,
    /// Duration in seconds.
    pub duration: f32,
    /// Elapsed time.
    pub elapsed: f32,
    /// Easing function.
    pub easing: Easing,
}

impl Tween {
    pub fn new(from: Placement, to: Placement, duration: f32, easing: Easing) -> Self {
        Self {
            from,
            to,
            duration,
            elapsed: 0.0,
            easing,
        }
    }

    /// Shrink to nothing in place.
    pub fn shrink(from: Placement, duration: f32, easing: Easing) -> Self {
        Self::new(from, from.with_scale(0.0), duration, easing)
    }

    /// Normalized progress [0, 1].
    pub fn progress(&self) -> f32 {
        if self.duration <= 0.0 {
            1.0
        } else {
            (self.elapsed / self.duration).clamp(0.0, 1.0)
        }
    }

    /// Placement at the current elapsed time.
    pub fn current(&self) -> Placement {
        if self.is_complete() {
            return self.to;
        }
        self.from.ease_to(&self.to, self.progress(), self.easing)
    }

    /// Advance time and return the placement to apply this frame.
    pub fn advance(&mut self, dt: f32) -> Placement {
        self.elapsed += dt;
        self.current()
    }

    pub fn is_complete(&self) -> bool {
        self.elapsed >= self.duration
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn tween_position() {
        let mut tween = Tween::new(
            Placement::new(Vec3::ZERO, 1.0),
            Placement::new(Vec3::new(100.0, 0.0, 0.0), 1.0),
            1.0,
            Easing::Linear,
        );

        let half = tween.advance(0.5);
        assert!((half.position.x - 50.0).abs() < 0.01);
        assert!(!tween.is_complete());

        let done = tween.advance(0.5);
        assert!((done.position.x - 100.0).abs() < 0.01);
        assert!(tween.is_complete());
    }

    #[test]
    fn overshooting_easing_still_lands_exactly() {
        let to = Placement::new(Vec3::new(3.0, 1.0, 2.0), 7.0);
        let mut tween = Tween::new(Placement::default(), to, 0.3, Easing::BackOut);
        let end = tween.advance(1.0);
        assert_eq!(end, to);
    }

    #[test]
    fn shrink_ends_at_zero_scale() {
        let from = Placement::new(Vec3::new(5.0, 0.0, 0.0), 2.0);
        let mut tween = Tween::shrink(from, 0.4, Easing::CubicIn);
        let end = tween.advance(0.4);
        assert_eq!(end.scale, 0.0);
        assert_eq!(end.position, from.position);
    }

    #[test]
    fn zero_duration_completes_immediately() {
        let tween = Tween::new(Placement::default(), Placement::default(), 0.0, Easing::Linear);
        assert!(tween.is_complete());
        assert_eq!(tween.progress(), 1.0);
    }
}
