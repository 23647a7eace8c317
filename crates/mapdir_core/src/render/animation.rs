//! In-flight view transition model.
//!
//! Keeps exactly one transition at a time. Retargeting mid-flight starts
//! the new transition from wherever the current one has reached.

use crate::render::surface::SurfaceView;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq)]
struct Transition {
    from: SurfaceView,
    to: SurfaceView,
    started_at: Instant,
    duration: Duration,
}

impl Transition {
    fn progress(&self, now: Instant) -> f64 {
        if self.duration.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_duration_since(self.started_at);
        (elapsed.as_secs_f64() / self.duration.as_secs_f64()).min(1.0)
    }

    fn view_at(&self, now: Instant) -> SurfaceView {
        let t = ease_in_out(self.progress(now));
        SurfaceView {
            center: self.from.center.lerp(self.to.center, t),
            zoom: self.from.zoom + (self.to.zoom - self.from.zoom) * t,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ViewAnimation {
    resting: SurfaceView,
    active: Option<Transition>,
}

impl ViewAnimation {
    pub fn new(initial: SurfaceView) -> Self {
        Self {
            resting: initial,
            active: None,
        }
    }

    /// Replaces any running transition; returns the start view used.
    pub fn retarget(&mut self, target: SurfaceView, now: Instant, duration: Duration) -> SurfaceView {
        let from = self.view_at(now);
        self.active = Some(Transition {
            from,
            to: target,
            started_at: now,
            duration,
        });
        self.resting = target;
        from
    }

    /// Jumps to `view` without a transition.
    pub fn reset(&mut self, view: SurfaceView) {
        self.resting = view;
        self.active = None;
    }

    pub fn view_at(&self, now: Instant) -> SurfaceView {
        match &self.active {
            Some(transition) => transition.view_at(now),
            None => self.resting,
        }
    }

    /// Final view of the latest request.
    pub fn target(&self) -> SurfaceView {
        self.resting
    }

    pub fn is_animating(&self, now: Instant) -> bool {
        self.active
            .as_ref()
            .is_some_and(|transition| transition.progress(now) < 1.0)
    }
}

fn ease_in_out(t: f64) -> f64 {
    t * t * (3.0 - 2.0 * t)
}
