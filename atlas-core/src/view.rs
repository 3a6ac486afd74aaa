//! The view-state container.
//!
//! [`ViewState`] is the single owner of the base transform, the camera
//! offset and the in-flight transition. Gestures and transitions write
//! only the base; the rendered transform is always recomputed as
//! `constrain(base ∘ camera offset)` and handed out as an immutable
//! [`ViewSnapshot`].

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::camera::CameraFollow;
use crate::config::MapConfig;
use crate::constraint::TransformConstraint;
use crate::geometry::{Point, Viewport};
use crate::transform::Transform;
use crate::transition::ZoomAnimator;

/// Immutable per-frame view of the transform state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewSnapshot {
    /// Transform from explicit gestures and transitions.
    pub base: Transform,
    /// Transform actually applied to the rendering surface.
    pub combined: Transform,
    /// Live camera-follow offset in pixels.
    pub camera_offset: Point,
    /// Whether a zoom transition is in flight.
    pub animating: bool,
}

/// Owner of all transform state.
#[derive(Debug, Clone)]
pub struct ViewState {
    viewport: Viewport,
    constraint: TransformConstraint,
    base: Transform,
    combined: Transform,
    camera: CameraFollow,
    animator: ZoomAnimator,
    transition: Duration,
}

impl ViewState {
    /// Create a view at rest for the given viewport.
    #[must_use]
    pub fn new(config: &MapConfig, viewport: Viewport) -> Self {
        let constraint = TransformConstraint::new(config.zoom_extent());
        let mut camera = CameraFollow::new(config.camera_settings());
        camera.set_enabled(config.camera_follow);
        let rest = constraint.rest();
        Self {
            viewport,
            constraint,
            base: rest,
            combined: rest,
            camera,
            animator: ZoomAnimator::default(),
            transition: config.transition(),
        }
    }

    /// Current viewport.
    #[must_use]
    pub const fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Resize the viewport and re-derive the rendered transform.
    ///
    /// A degenerate viewport leaves the base untouched; only the rendered
    /// transform falls back to rest.
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        if !viewport.is_degenerate() {
            self.base = self.constraint.clamp(self.base, viewport);
        }
        self.recompose();
    }

    /// The constraint in force.
    #[must_use]
    pub const fn constraint(&self) -> &TransformConstraint {
        &self.constraint
    }

    /// Base transform.
    #[must_use]
    pub const fn base(&self) -> Transform {
        self.base
    }

    /// Last rendered transform.
    #[must_use]
    pub const fn combined(&self) -> Transform {
        self.combined
    }

    /// Camera-follow controller.
    #[must_use]
    pub const fn camera(&self) -> &CameraFollow {
        &self.camera
    }

    /// Enable or disable camera drift.
    pub fn set_camera_follow(&mut self, enabled: bool) {
        self.camera.set_enabled(enabled);
    }

    /// Take an immutable snapshot.
    #[must_use]
    pub fn snapshot(&self) -> ViewSnapshot {
        ViewSnapshot {
            base: self.base,
            combined: self.combined,
            camera_offset: self.camera.offset(),
            animating: self.animator.is_active(),
        }
    }

    /// A pan/zoom gesture produced `transform`.
    ///
    /// Interrupts any transition and becomes the new (constrained) base.
    pub fn apply_gesture(&mut self, transform: Transform) -> Transform {
        if self.animator.cancel() {
            tracing::debug!("gesture interrupted zoom transition");
        }
        self.base = self.constraint.clamp(transform, self.viewport);
        self.recompose()
    }

    /// Animate the base toward `target`, superseding any transition in flight.
    pub fn animate_to(&mut self, target: Transform, now: Duration) {
        let target = self.constraint.clamp(target, self.viewport);
        tracing::debug!(%target, "zoom transition requested");
        self.animator.begin(self.base, target, now, self.transition);
    }

    /// Animate the scale by `factor` about the viewport center.
    pub fn zoom_by(&mut self, factor: f64, now: Duration) {
        let from = self
            .animator
            .current()
            .map_or(self.base, |transition| transition.to);
        let scale = self.constraint.extent().clamp(from.scale * factor);
        let target = from.zoom_about(self.viewport.center(), scale);
        self.animate_to(target, now);
    }

    /// Whether a transition is in flight.
    #[must_use]
    pub const fn is_animating(&self) -> bool {
        self.animator.is_active()
    }

    /// Record the latest pointer position.
    pub fn pointer_moved(&mut self, position: Point) {
        self.camera.sample_pointer(position);
    }

    /// Forget the pointer.
    pub fn pointer_left(&mut self) {
        self.camera.clear_pointer();
    }

    /// Advance one frame: transition first, then camera, then recompose.
    pub fn frame(&mut self, now: Duration) -> Transform {
        if let Some(base) = self.animator.advance(now) {
            self.base = base;
        }
        self.camera.step(&self.base, self.viewport, self.constraint.extent());
        self.recompose()
    }

    /// Recompute `constrain(base ∘ offset)` from current state.
    fn recompose(&mut self) -> Transform {
        self.combined = self
            .constraint
            .clamp(self.camera.compose(&self.base), self.viewport);
        self.combined
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view() -> ViewState {
        ViewState::new(&MapConfig::default(), Viewport::new(800.0, 600.0))
    }

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn starts_at_rest() {
        let v = view();
        assert_eq!(v.base(), Transform::identity());
        assert_eq!(v.combined(), Transform::identity());
        assert!(!v.snapshot().animating);
    }

    #[test]
    fn gesture_is_constrained() {
        let mut v = view();
        let applied = v.apply_gesture(Transform::new(5000.0, 5000.0, 20.0));
        assert!((applied.scale - 8.0).abs() < f64::EPSILON);
        assert!((applied.translate_x - 160.0).abs() < 1e-9);
        assert_eq!(v.base(), applied);
    }

    #[test]
    fn gesture_cancels_transition() {
        let mut v = view();
        v.animate_to(Transform::new(-800.0, -600.0, 3.0), ms(0));
        assert!(v.is_animating());
        v.apply_gesture(Transform::new(-100.0, -100.0, 2.0));
        assert!(!v.is_animating());
        v.frame(ms(2000));
        assert!((v.base().scale - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn transition_reaches_target_over_frames() {
        let mut v = view();
        let target = Transform::new(-800.0, -600.0, 3.0);
        v.animate_to(target, ms(0));
        let mid = v.frame(ms(300));
        assert!(mid.scale > 1.0 && mid.scale < 3.0);
        v.frame(ms(750));
        assert_eq!(v.base(), target);
        assert!(!v.is_animating());
    }

    #[test]
    fn camera_offset_is_composed_and_constrained() {
        let mut v = view();
        v.apply_gesture(Transform::new(-1200.0, -900.0, 4.0));
        v.pointer_moved(Point::new(800.0, 600.0));
        for _ in 0..300 {
            v.frame(ms(0));
        }
        let snap = v.snapshot();
        assert_eq!(snap.base, Transform::new(-1200.0, -900.0, 4.0));
        assert!((snap.combined.translate_x - -1208.0).abs() < 1e-6);
        assert!((snap.combined.translate_y - -906.0).abs() < 1e-6);
    }

    #[test]
    fn zoom_by_chains_from_pending_target() {
        let mut v = view();
        v.zoom_by(2.0, ms(0));
        v.zoom_by(2.0, ms(10));
        v.frame(ms(5000));
        assert!((v.base().scale - 4.0).abs() < 1e-9);
    }

    #[test]
    fn zero_viewport_renders_identity() {
        let mut v = view();
        v.apply_gesture(Transform::new(-1200.0, -900.0, 4.0));
        v.set_viewport(Viewport::new(0.0, 0.0));
        assert_eq!(v.frame(ms(0)), Transform::identity());
    }

    #[test]
    fn hidden_viewport_keeps_user_zoom() {
        let mut v = view();
        let zoomed = v.apply_gesture(Transform::new(-1200.0, -900.0, 4.0));
        v.set_viewport(Viewport::new(0.0, 0.0));
        assert_eq!(v.base(), zoomed);
        assert_eq!(v.combined(), Transform::identity());

        v.set_viewport(Viewport::new(800.0, 600.0));
        assert_eq!(v.base(), zoomed);
        assert_eq!(v.combined(), zoomed);
    }
}
