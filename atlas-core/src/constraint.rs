//! Pan/zoom bounds for the view transform.
//!
//! ```text
//!  scale <= min + ε      → translate forced to (0, 0)
//!  otherwise, per axis   → translate ∈ [-(extent * k - 0.2 * extent), 0.2 * extent]
//! ```
//!
//! [`TransformConstraint::clamp`] is idempotent.

use serde::{Deserialize, Serialize};

use crate::geometry::Viewport;
use crate::transform::Transform;
use crate::{AtlasError, AtlasResult};

/// Tolerance for treating a scale as "fully zoomed out".
pub const SCALE_EPSILON: f64 = 0.05;

/// Fraction of the viewport that must stay covered by the map on each axis.
pub const MIN_VISIBLE_FRACTION: f64 = 0.2;

/// Allowed range of the scale factor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoomExtent {
    min: f64,
    max: f64,
}

impl ZoomExtent {
    /// Create a zoom extent.
    ///
    /// # Errors
    ///
    /// Returns [`AtlasError::InvalidZoomExtent`] unless `0 < min <= max` and both are finite.
    pub fn new(min: f64, max: f64) -> AtlasResult<Self> {
        if !(min.is_finite() && max.is_finite()) || min <= 0.0 || max < min {
            return Err(AtlasError::InvalidZoomExtent { min, max });
        }
        Ok(Self { min, max })
    }

    /// Minimum scale (fully zoomed out).
    #[must_use]
    pub const fn min(&self) -> f64 {
        self.min
    }

    /// Maximum scale.
    #[must_use]
    pub const fn max(&self) -> f64 {
        self.max
    }

    /// Clamp a scale into the extent. Non-finite scales fall back to `min`.
    #[must_use]
    pub fn clamp(&self, scale: f64) -> f64 {
        if scale.is_finite() {
            scale.clamp(self.min, self.max)
        } else {
            self.min
        }
    }

    /// Whether `scale` is epsilon-equal to (or below) the minimum.
    #[must_use]
    pub fn is_at_rest(&self, scale: f64) -> bool {
        scale <= self.min + SCALE_EPSILON
    }
}

impl Default for ZoomExtent {
    fn default() -> Self {
        Self { min: 1.0, max: 8.0 }
    }
}

/// Clamps candidate transforms to valid pan/zoom bounds.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TransformConstraint {
    extent: ZoomExtent,
}

impl TransformConstraint {
    /// Create a constraint for the given zoom extent.
    #[must_use]
    pub const fn new(extent: ZoomExtent) -> Self {
        Self { extent }
    }

    /// The zoom extent in force.
    #[must_use]
    pub const fn extent(&self) -> ZoomExtent {
        self.extent
    }

    /// The fully-zoomed-out, centered transform.
    #[must_use]
    pub const fn rest(&self) -> Transform {
        Transform::new(0.0, 0.0, self.extent.min)
    }

    /// Clamp `transform` for a viewport of the given size.
    ///
    /// Degenerate viewports and non-finite transforms yield [`Self::rest`].
    #[must_use]
    pub fn clamp(&self, transform: Transform, viewport: Viewport) -> Transform {
        if viewport.is_degenerate() || !transform.is_finite() {
            return self.rest();
        }

        let scale = self.extent.clamp(transform.scale);
        if self.extent.is_at_rest(scale) {
            return Transform::new(0.0, 0.0, scale);
        }

        Transform::new(
            clamp_axis(transform.translate_x, viewport.width, scale),
            clamp_axis(transform.translate_y, viewport.height, scale),
            scale,
        )
    }
}

fn clamp_axis(translate: f64, extent: f64, scale: f64) -> f64 {
    let margin = MIN_VISIBLE_FRACTION * extent;
    let map_extent = extent * scale;
    translate.clamp(-(map_extent - margin), margin)
}
