//! View transforms: translate plus uniform scale.
//!
//! A [`Transform`] maps a point `p` in map space to `k * p + (x, y)` in
//! viewport space. Values are immutable; every operation returns a new
//! transform, so readers within one frame always see a complete value.
//!
//! Composition follows standard affine order. `a.compose(b)` applies `b`
//! first and then `a`:
//!
//! ```text
//! a ∘ b = { k: a.k * b.k, x: a.x + a.k * b.x, y: a.y + a.k * b.y }
//! ```

use serde::{Deserialize, Serialize};

use crate::geometry::Point;

/// Tolerance used by [`Transform::approx_eq`] when none is given.
pub const DEFAULT_TOLERANCE: f64 = 1e-9;

/// A 2D translate + uniform scale transform.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transform {
    /// Horizontal translation in pixels.
    pub translate_x: f64,
    /// Vertical translation in pixels.
    pub translate_y: f64,
    /// Uniform scale factor.
    pub scale: f64,
}

impl Transform {
    /// The identity transform.
    pub const IDENTITY: Self = Self {
        translate_x: 0.0,
        translate_y: 0.0,
        scale: 1.0,
    };

    /// Create a transform from its components.
    #[must_use]
    pub const fn new(translate_x: f64, translate_y: f64, scale: f64) -> Self {
        Self {
            translate_x,
            translate_y,
            scale,
        }
    }

    /// The identity transform.
    #[must_use]
    pub const fn identity() -> Self {
        Self::IDENTITY
    }

    /// A pure translation.
    #[must_use]
    pub const fn translation(dx: f64, dy: f64) -> Self {
        Self::new(dx, dy, 1.0)
    }

    /// A pure scale about the origin.
    #[must_use]
    pub const fn scaling(factor: f64) -> Self {
        Self::new(0.0, 0.0, factor)
    }

    /// `self ∘ other`: apply `other`, then `self`.
    #[must_use]
    pub fn compose(&self, other: &Self) -> Self {
        Self {
            translate_x: self.translate_x + self.scale * other.translate_x,
            translate_y: self.translate_y + self.scale * other.translate_y,
            scale: self.scale * other.scale,
        }
    }

    /// Translate in map space (the offset is multiplied by the current scale).
    #[must_use]
    pub fn translate(&self, dx: f64, dy: f64) -> Self {
        self.compose(&Self::translation(dx, dy))
    }

    /// Scale about the map-space origin.
    #[must_use]
    pub fn scale_by(&self, factor: f64) -> Self {
        self.compose(&Self::scaling(factor))
    }

    /// Rescale to `scale` while keeping the viewport point `anchor` fixed.
    #[must_use]
    pub fn zoom_about(&self, anchor: Point, scale: f64) -> Self {
        let map = self.invert(anchor);
        Self {
            translate_x: anchor.x - map.x * scale,
            translate_y: anchor.y - map.y * scale,
            scale,
        }
    }

    /// Map a map-space point into viewport space.
    #[must_use]
    pub fn apply(&self, point: Point) -> Point {
        Point::new(
            point.x * self.scale + self.translate_x,
            point.y * self.scale + self.translate_y,
        )
    }

    /// Map a viewport point back into map space.
    ///
    /// A zero or non-finite scale has no inverse; the point is returned unchanged.
    #[must_use]
    pub fn invert(&self, point: Point) -> Point {
        if !self.scale.is_normal() {
            return point;
        }
        Point::new(
            (point.x - self.translate_x) / self.scale,
            (point.y - self.translate_y) / self.scale,
        )
    }

    /// Whether all three components are finite.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.translate_x.is_finite() && self.translate_y.is_finite() && self.scale.is_finite()
    }

    /// Component-wise comparison within `tolerance`.
    #[must_use]
    pub fn approx_eq(&self, other: &Self, tolerance: f64) -> bool {
        (self.translate_x - other.translate_x).abs() <= tolerance
            && (self.translate_y - other.translate_y).abs() <= tolerance
            && (self.scale - other.scale).abs() <= tolerance
    }

    /// The `(x, y, k)` triple used for interpolation.
    #[must_use]
    pub const fn to_triple(&self) -> [f64; 3] {
        [self.translate_x, self.translate_y, self.scale]
    }

    /// Rebuild a transform from an `(x, y, k)` triple.
    #[must_use]
    pub const fn from_triple(triple: [f64; 3]) -> Self {
        Self::new(triple[0], triple[1], triple[2])
    }

    /// Linear interpolation of the triple; `t = 0` is `self`, `t = 1` is `to`.
    #[must_use]
    pub fn lerp(&self, to: &Self, t: f64) -> Self {
        let a = self.to_triple();
        let b = to.to_triple();
        Self::from_triple([
            a[0] + (b[0] - a[0]) * t,
            a[1] + (b[1] - a[1]) * t,
            a[2] + (b[2] - a[2]) * t,
        ])
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl From<[f64; 3]> for Transform {
    fn from(triple: [f64; 3]) -> Self {
        Self::from_triple(triple)
    }
}

impl From<Transform> for [f64; 3] {
    fn from(transform: Transform) -> Self {
        transform.to_triple()
    }
}

impl std::fmt::Display for Transform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "translate({:.3},{:.3}) scale({:.4})",
            self.translate_x, self.translate_y, self.scale
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_is_neutral_for_compose() {
        let t = Transform::new(12.0, -4.0, 2.5);
        assert_eq!(Transform::identity().compose(&t), t);
        assert_eq!(t.compose(&Transform::identity()), t);
    }

    #[test]
    fn compose_applies_right_operand_first() {
        let a = Transform::new(10.0, 20.0, 2.0);
        let b = Transform::new(3.0, 4.0, 3.0);
        let p = Point::new(1.0, 1.0);

        let composed = a.compose(&b).apply(p);
        let stepwise = a.apply(b.apply(p));
        assert!((composed.x - stepwise.x).abs() < 1e-12);
        assert!((composed.y - stepwise.y).abs() < 1e-12);
    }

    #[test]
    fn compose_is_associative() {
        let a = Transform::new(1.0, 2.0, 2.0);
        let b = Transform::new(-5.0, 7.0, 0.5);
        let c = Transform::new(3.0, 3.0, 4.0);
        let left = a.compose(&b).compose(&c);
        let right = a.compose(&b.compose(&c));
        assert!(left.approx_eq(&right, 1e-12));
    }

    #[test]
    fn translate_offset_is_scaled() {
        let t = Transform::new(0.0, 0.0, 4.0).translate(2.5, -1.0);
        assert!(t.approx_eq(&Transform::new(10.0, -4.0, 4.0), 1e-12));
    }

    #[test]
    fn operations_do_not_mutate_receiver() {
        let base = Transform::new(5.0, 5.0, 2.0);
        let _ = base.translate(100.0, 100.0);
        let _ = base.scale_by(3.0);
        assert_eq!(base, Transform::new(5.0, 5.0, 2.0));
    }

    #[test]
    fn zoom_about_keeps_anchor_fixed() {
        let t = Transform::new(30.0, -10.0, 2.0);
        let anchor = Point::new(400.0, 300.0);
        let before = t.invert(anchor);
        let zoomed = t.zoom_about(anchor, 5.0);
        let after = zoomed.invert(anchor);
        assert!((before.x - after.x).abs() < 1e-9);
        assert!((before.y - after.y).abs() < 1e-9);
        assert!((zoomed.scale - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn triple_conversion_preserves_components() {
        let t = Transform::new(1.5, -2.5, 3.0);
        let triple: [f64; 3] = t.into();
        assert_eq!(triple, [1.5, -2.5, 3.0]);
        assert_eq!(Transform::from(triple), t);
    }

    #[test]
    fn lerp_endpoints_and_midpoint() {
        let a = Transform::identity();
        let b = Transform::new(100.0, -50.0, 3.0);
        assert_eq!(a.lerp(&b, 0.0), a);
        assert!(a.lerp(&b, 1.0).approx_eq(&b, 1e-12));
        assert!(a
            .lerp(&b, 0.5)
            .approx_eq(&Transform::new(50.0, -25.0, 2.0), 1e-12));
    }

    #[test]
    fn serializes_with_camel_case_keys() {
        let json = serde_json::to_string(&Transform::new(1.0, 2.0, 3.0)).expect("serialize");
        assert!(json.contains("translateX"));
        assert!(json.contains("translateY"));
        assert!(json.contains("scale"));
    }
}
