//! Animated zoom transitions with cancel-and-replace semantics.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::transform::Transform;

/// Reference duration for zoom-to-bounds and reset animations.
pub const DEFAULT_TRANSITION: Duration = Duration::from_millis(750);

/// Easing curve applied to transition progress.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Easing {
    /// Constant speed.
    Linear,
    /// Slow start and end, symmetric cubic.
    #[default]
    CubicInOut,
}

impl Easing {
    /// Map linear progress `t ∈ [0, 1]` to eased progress.
    #[must_use]
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::CubicInOut => {
                let t2 = t * 2.0;
                if t2 <= 1.0 {
                    t2 * t2 * t2 / 2.0
                } else {
                    let u = t2 - 2.0;
                    (u * u * u + 2.0) / 2.0
                }
            }
        }
    }
}

/// One in-flight interpolation between two transforms.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transition {
    /// Start value.
    pub from: Transform,
    /// End value.
    pub to: Transform,
    /// Host time at which the transition began.
    pub started_at: Duration,
    /// Total length.
    pub duration: Duration,
    /// Easing curve.
    pub easing: Easing,
}

impl Transition {
    /// Linear progress at `now`, in `[0, 1]`.
    #[must_use]
    pub fn progress(&self, now: Duration) -> f64 {
        if self.duration.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_sub(self.started_at);
        (elapsed.as_secs_f64() / self.duration.as_secs_f64()).min(1.0)
    }

    /// Interpolated transform at `now`. Exactly `to` once finished.
    #[must_use]
    pub fn sample(&self, now: Duration) -> Transform {
        let t = self.progress(now);
        if t >= 1.0 {
            return self.to;
        }
        self.from.lerp(&self.to, self.easing.apply(t))
    }

    /// Whether the transition has reached its end at `now`.
    #[must_use]
    pub fn is_finished(&self, now: Duration) -> bool {
        self.progress(now) >= 1.0
    }
}

/// Holds at most one transition; a new request supersedes the old one.
#[derive(Debug, Clone, Default)]
pub struct ZoomAnimator {
    active: Option<Transition>,
    easing: Easing,
}

impl ZoomAnimator {
    /// Create an idle animator using the given easing.
    #[must_use]
    pub fn new(easing: Easing) -> Self {
        Self {
            active: None,
            easing,
        }
    }

    /// Begin animating from `from` to `to`, replacing any transition in flight.
    pub fn begin(&mut self, from: Transform, to: Transform, now: Duration, duration: Duration) {
        if self.active.is_some() {
            tracing::debug!("superseding in-flight zoom transition");
        }
        self.active = Some(Transition {
            from,
            to,
            started_at: now,
            duration,
            easing: self.easing,
        });
    }

    /// Drop the in-flight transition, if any. Returns whether one was running.
    pub fn cancel(&mut self) -> bool {
        self.active.take().is_some()
    }

    /// Whether a transition is in flight.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// The in-flight transition.
    #[must_use]
    pub const fn current(&self) -> Option<&Transition> {
        self.active.as_ref()
    }

    /// Sample the transition at `now`, retiring it once finished.
    pub fn advance(&mut self, now: Duration) -> Option<Transform> {
        let transition = self.active?;
        let value = transition.sample(now);
        if transition.is_finished(now) {
            self.active = None;
        }
        Some(value)
    }
}
