//! Camera follow: a per-frame drift of the view toward the cursor.
//!
//! Each frame the pointer position is normalized against the viewport
//! center, turned into a target offset, and the live offset is pulled
//! toward it by a first-order low-pass filter:
//!
//! ```text
//! n       = (pointer - center) / (extent / 2)        // not clamped to [-1, 1]
//! target  = -n * intensity * (extent / 2)            // zero at rest zoom
//! offset += (target - offset) * smoothness
//! view    = constrain(base ∘ translate(offset / base.k))
//! ```
//!
//! The negative sign is deliberate and must be kept.

use crate::constraint::{TransformConstraint, ZoomExtent};
use crate::geometry::{Point, Viewport};
use crate::transform::Transform;

/// Default fraction of the half-viewport the camera drifts at full deflection.
pub const DEFAULT_FOLLOW_INTENSITY: f64 = 0.02;

/// Default low-pass factor per frame.
pub const DEFAULT_SMOOTHNESS: f64 = 0.1;

/// Tunables for [`CameraFollow`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraSettings {
    /// How far the camera drifts, as a fraction of the half-extent.
    pub follow_intensity: f64,
    /// Convergence factor in `(0, 1]`; 1 snaps to the target in one frame.
    pub smoothness: f64,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            follow_intensity: DEFAULT_FOLLOW_INTENSITY,
            smoothness: DEFAULT_SMOOTHNESS,
        }
    }
}

/// Camera-follow controller state.
///
/// The offset is persistent: disabling and re-enabling resumes from the
/// last offset rather than snapping back to zero.
#[derive(Debug, Clone)]
pub struct CameraFollow {
    settings: CameraSettings,
    pointer: Option<Point>,
    offset: Point,
    enabled: bool,
}

impl CameraFollow {
    /// Create an enabled controller with zero offset and no pointer sample.
    #[must_use]
    pub fn new(settings: CameraSettings) -> Self {
        Self {
            settings,
            pointer: None,
            offset: Point::default(),
            enabled: true,
        }
    }

    /// Current tunables.
    #[must_use]
    pub const fn settings(&self) -> CameraSettings {
        self.settings
    }

    /// Enable or disable drifting. The offset is kept either way.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Whether the controller drifts on [`Self::step`].
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Record the latest pointer position (viewport pixels). Last value wins.
    ///
    /// A non-finite sample is treated as the pointer leaving.
    pub fn sample_pointer(&mut self, position: Point) {
        if position.x.is_finite() && position.y.is_finite() {
            self.pointer = Some(position);
        } else {
            tracing::warn!(?position, "ignoring non-finite pointer sample");
            self.pointer = None;
        }
    }

    /// Forget the pointer, e.g. when it leaves the surface.
    pub fn clear_pointer(&mut self) {
        self.pointer = None;
    }

    /// Latest pointer sample.
    #[must_use]
    pub const fn pointer(&self) -> Option<Point> {
        self.pointer
    }

    /// Live camera offset in viewport pixels.
    #[must_use]
    pub const fn offset(&self) -> Point {
        self.offset
    }

    /// Pointer offset from the viewport center divided by the half-extent.
    ///
    /// Values outside `[-1, 1]` are returned as-is for pointers outside the viewport.
    #[must_use]
    pub fn normalized_pointer(&self, viewport: Viewport) -> Option<Point> {
        if viewport.is_degenerate() {
            return None;
        }
        let pointer = self.pointer?;
        let center = viewport.center();
        Some(Point::new(
            (pointer.x - center.x) / center.x,
            (pointer.y - center.y) / center.y,
        ))
    }

    /// Intensity in force for `base`: zero when fully zoomed out.
    #[must_use]
    pub fn effective_intensity(&self, base: &Transform, extent: ZoomExtent) -> f64 {
        if extent.is_at_rest(base.scale) {
            0.0
        } else {
            self.settings.follow_intensity
        }
    }

    /// Offset the camera is gliding toward this frame.
    #[must_use]
    pub fn target_offset(&self, base: &Transform, viewport: Viewport, extent: ZoomExtent) -> Point {
        let Some(normalized) = self.normalized_pointer(viewport) else {
            return Point::default();
        };
        let intensity = self.effective_intensity(base, extent);
        let half = viewport.center();
        Point::new(
            -normalized.x * intensity * half.x,
            -normalized.y * intensity * half.y,
        )
    }

    /// Advance the low-pass filter by one frame and return the new offset.
    ///
    /// A disabled controller keeps its offset frozen.
    pub fn step(&mut self, base: &Transform, viewport: Viewport, extent: ZoomExtent) -> Point {
        if !self.enabled {
            return self.offset;
        }
        let target = self.target_offset(base, viewport, extent);
        let k = self.settings.smoothness;
        let next = Point::new(
            self.offset.x + (target.x - self.offset.x) * k,
            self.offset.y + (target.y - self.offset.y) * k,
        );
        self.offset = if next.x.is_finite() && next.y.is_finite() {
            next
        } else {
            Point::default()
        };
        self.offset
    }

    /// `base ∘ translate(offset / base.k)`: the offset lands in viewport pixels.
    #[must_use]
    pub fn compose(&self, base: &Transform) -> Transform {
        if !base.scale.is_normal() {
            return *base;
        }
        base.translate(self.offset.x / base.scale, self.offset.y / base.scale)
    }

    /// Step the filter, compose with `base` and constrain the result.
    pub fn tick(
        &mut self,
        base: &Transform,
        viewport: Viewport,
        constraint: &TransformConstraint,
    ) -> Transform {
        self.step(base, viewport, constraint.extent());
        constraint.clamp(self.compose(base), viewport)
    }
}

impl Default for CameraFollow {
    fn default() -> Self {
        Self::new(CameraSettings::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VIEW: Viewport = Viewport::new(800.0, 600.0);

    fn zoomed() -> Transform {
        Transform::new(-1200.0, -900.0, 4.0)
    }

    #[test]
    fn no_drift_at_rest_zoom() {
        let mut camera = CameraFollow::default();
        camera.sample_pointer(Point::new(0.0, 0.0));
        let constraint = TransformConstraint::default();
        let base = Transform::identity();

        for _ in 0..50 {
            let view = camera.tick(&base, VIEW, &constraint);
            assert_eq!(view, Transform::identity());
        }
        assert_eq!(camera.offset(), Point::default());
    }

    #[test]
    fn pointer_at_center_has_zero_target() {
        let mut camera = CameraFollow::default();
        camera.sample_pointer(VIEW.center());
        let target = camera.target_offset(&zoomed(), VIEW, ZoomExtent::default());
        assert!(target.x.abs() < f64::EPSILON);
        assert!(target.y.abs() < f64::EPSILON);
    }

    #[test]
    fn corner_pointer_pushes_camera_the_other_way() {
        let mut camera = CameraFollow::default();
        camera.sample_pointer(Point::new(800.0, 600.0));
        let target = camera.target_offset(&zoomed(), VIEW, ZoomExtent::default());
        assert!((target.x - -0.02 * 400.0).abs() < 1e-12);
        assert!((target.y - -0.02 * 300.0).abs() < 1e-12);
    }

    #[test]
    fn pointer_outside_viewport_is_not_clamped() {
        let mut camera = CameraFollow::default();
        camera.sample_pointer(Point::new(1600.0, 300.0));
        let normalized = camera.normalized_pointer(VIEW).expect("pointer sampled");
        assert!((normalized.x - 3.0).abs() < 1e-12);
        assert!(normalized.y.abs() < 1e-12);
    }

    #[test]
    fn offset_converges_exponentially() {
        let mut camera = CameraFollow::default();
        camera.sample_pointer(Point::new(800.0, 600.0));
        let extent = ZoomExtent::default();

        let first = camera.step(&zoomed(), VIEW, extent);
        assert!((first.x - -0.8).abs() < 1e-12);

        for _ in 0..200 {
            camera.step(&zoomed(), VIEW, extent);
        }
        assert!((camera.offset().x - -8.0).abs() < 1e-6);
        assert!((camera.offset().y - -6.0).abs() < 1e-6);
    }

    #[test]
    fn disabled_camera_keeps_its_offset() {
        let mut camera = CameraFollow::default();
        camera.sample_pointer(Point::new(800.0, 600.0));
        let extent = ZoomExtent::default();
        for _ in 0..10 {
            camera.step(&zoomed(), VIEW, extent);
        }
        let frozen = camera.offset();

        camera.set_enabled(false);
        camera.sample_pointer(VIEW.center());
        assert_eq!(camera.step(&zoomed(), VIEW, extent), frozen);

        camera.set_enabled(true);
        let resumed = camera.step(&zoomed(), VIEW, extent);
        assert!(resumed.x.abs() < frozen.x.abs());
        assert!(resumed.x < 0.0);
    }

    #[test]
    fn compose_offsets_in_viewport_pixels() {
        let mut camera = CameraFollow::new(CameraSettings {
            follow_intensity: 0.02,
            smoothness: 1.0,
        });
        camera.sample_pointer(Point::new(800.0, 600.0));
        let base = zoomed();
        camera.step(&base, VIEW, ZoomExtent::default());
        let composed = camera.compose(&base);
        assert!((composed.translate_x - (base.translate_x - 8.0)).abs() < 1e-9);
        assert!((composed.translate_y - (base.translate_y - 6.0)).abs() < 1e-9);
        assert!((composed.scale - base.scale).abs() < f64::EPSILON);
    }

    #[test]
    fn non_finite_pointer_does_not_poison_offset() {
        let mut camera = CameraFollow::default();
        let extent = ZoomExtent::default();
        camera.sample_pointer(Point::new(f64::NAN, 10.0));
        assert_eq!(camera.pointer(), None);
        camera.step(&zoomed(), VIEW, extent);
        assert_eq!(camera.offset(), Point::default());

        camera.sample_pointer(Point::new(800.0, f64::INFINITY));
        assert_eq!(camera.pointer(), None);

        camera.sample_pointer(Point::new(800.0, 600.0));
        let offset = camera.step(&zoomed(), VIEW, extent);
        assert!(offset.x.is_finite() && offset.x < 0.0);
    }

    #[test]
    fn non_finite_step_resets_offset() {
        let mut camera = CameraFollow::new(CameraSettings {
            follow_intensity: f64::INFINITY,
            smoothness: 1.0,
        });
        camera.sample_pointer(Point::new(800.0, 600.0));
        assert_eq!(
            camera.step(&zoomed(), VIEW, ZoomExtent::default()),
            Point::default()
        );
    }

    #[test]
    fn missing_pointer_targets_zero() {
        let camera = CameraFollow::default();
        let target = camera.target_offset(&zoomed(), VIEW, ZoomExtent::default());
        assert_eq!(target, Point::default());
    }
}
