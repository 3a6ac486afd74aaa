//! Single-feature selection and zoom-to-bounds.
//!
//! ```text
//!   NoSelection ──select(a)──► Selected(a) ──select(b)──► Selected(b)
//!        ▲                         │
//!        └───────deselect()────────┘
//! ```

use crate::constraint::ZoomExtent;
use crate::feature::FeatureId;
use crate::geometry::{Bounds, Viewport};
use crate::surface::{Renderer, Surface};
use crate::transform::Transform;

/// Fraction of the viewport a selected feature fills after zooming.
pub const DEFAULT_FIT_PADDING: f64 = 0.9;

/// Current selection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Selection {
    /// Nothing selected.
    #[default]
    None,
    /// Exactly one feature selected.
    Selected(FeatureId),
}

/// Owns the selection state; the only writer of the selected marker.
#[derive(Debug, Clone, Default)]
pub struct SelectionController {
    state: Selection,
}

impl SelectionController {
    /// Create a controller with nothing selected.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> &Selection {
        &self.state
    }

    /// Selected feature, if any.
    #[must_use]
    pub fn selected(&self) -> Option<&FeatureId> {
        match &self.state {
            Selection::None => None,
            Selection::Selected(id) => Some(id),
        }
    }

    /// Whether `id` is the selected feature.
    #[must_use]
    pub fn is_selected(&self, id: &FeatureId) -> bool {
        self.selected() == Some(id)
    }

    /// Select `id`, clearing the previous marker first. Returns the previous selection.
    pub fn select(&mut self, id: FeatureId, renderer: &mut dyn Renderer) -> Option<FeatureId> {
        let previous = match std::mem::take(&mut self.state) {
            Selection::Selected(prev) => Some(prev),
            Selection::None => None,
        };
        if let Some(prev) = previous.as_ref().filter(|prev| **prev != id) {
            renderer.set_selected(prev, false);
        }
        renderer.set_selected(&id, true);
        tracing::debug!(feature = %id, previous = ?previous, "feature selected");
        self.state = Selection::Selected(id);
        previous
    }

    /// Clear the selection and hide the info panel. Returns what was selected.
    pub fn deselect(&mut self, surface: &mut dyn Surface) -> Option<FeatureId> {
        let previous = match std::mem::take(&mut self.state) {
            Selection::Selected(prev) => Some(prev),
            Selection::None => None,
        };
        if let Some(prev) = &previous {
            surface.set_selected(prev, false);
            tracing::debug!(feature = %prev, "feature deselected");
        }
        surface.hide();
        previous
    }
}

/// Transform that centers `bounds` in the viewport, filling `padding` of it.
///
/// `scale = min(max, padding / max(w / vw, h / vh))`, then clamped into the
/// extent. Degenerate input yields the identity.
#[must_use]
pub fn fit_bounds(bounds: Bounds, viewport: Viewport, extent: ZoomExtent, padding: f64) -> Transform {
    if viewport.is_degenerate() || !bounds.is_finite() {
        return Transform::identity();
    }
    let ratio = (bounds.width() / viewport.width).max(bounds.height() / viewport.height);
    let scale = if ratio > 0.0 {
        extent.clamp((padding / ratio).min(extent.max()))
    } else {
        extent.max()
    };
    let center = bounds.center();
    let view_center = viewport.center();
    Transform::new(
        view_center.x - scale * center.x,
        view_center.y - scale * center.y,
        scale,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intent::IntentLog;
    use crate::surface::InfoPanel;

    #[test]
    fn selecting_b_after_a_leaves_only_b_marked() {
        let mut selection = SelectionController::new();
        let mut log = IntentLog::new();

        selection.select(FeatureId::new("a"), &mut log);
        let previous = selection.select(FeatureId::new("b"), &mut log);

        assert_eq!(previous, Some(FeatureId::new("a")));
        let marked: Vec<_> = log.marked_selected().into_iter().collect();
        assert_eq!(marked, vec![FeatureId::new("b")]);
        assert!(selection.is_selected(&FeatureId::new("b")));
    }

    #[test]
    fn deselect_clears_marker_and_hides_panel() {
        let mut selection = SelectionController::new();
        let mut log = IntentLog::new();

        selection.select(FeatureId::new("a"), &mut log);
        log.show("A", None);
        assert_eq!(selection.deselect(&mut log), Some(FeatureId::new("a")));
        assert!(log.marked_selected().is_empty());
        assert!(!log.info_visible());
        assert_eq!(selection.state(), &Selection::None);
    }

    #[test]
    fn reselecting_same_feature_keeps_it_marked() {
        let mut selection = SelectionController::new();
        let mut log = IntentLog::new();
        selection.select(FeatureId::new("a"), &mut log);
        selection.select(FeatureId::new("a"), &mut log);
        assert_eq!(log.marked_selected().len(), 1);
    }

    #[test]
    fn fit_bounds_centers_and_pads() {
        let view = Viewport::new(800.0, 600.0);
        // 80 x 30 box: width-bound ratio 0.1 → scale 9 → clamped to 8.
        let t = fit_bounds(
            Bounds::new(100.0, 100.0, 180.0, 130.0),
            view,
            ZoomExtent::default(),
            DEFAULT_FIT_PADDING,
        );
        assert!((t.scale - 8.0).abs() < 1e-12);
        let center = t.apply(Bounds::new(100.0, 100.0, 180.0, 130.0).center());
        assert!((center.x - 400.0).abs() < 1e-9);
        assert!((center.y - 300.0).abs() < 1e-9);
    }

    #[test]
    fn fit_bounds_uses_the_tighter_axis() {
        let view = Viewport::new(800.0, 600.0);
        // 200 x 300 box: height ratio 0.5 dominates → scale 1.8.
        let t = fit_bounds(
            Bounds::new(0.0, 0.0, 200.0, 300.0),
            view,
            ZoomExtent::default(),
            DEFAULT_FIT_PADDING,
        );
        assert!((t.scale - 1.8).abs() < 1e-12);
    }

    #[test]
    fn fit_bounds_never_zooms_out_past_minimum() {
        let view = Viewport::new(800.0, 600.0);
        let t = fit_bounds(
            Bounds::new(-1000.0, -1000.0, 3000.0, 3000.0),
            view,
            ZoomExtent::default(),
            DEFAULT_FIT_PADDING,
        );
        assert!((t.scale - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn degenerate_inputs_fit_to_identity() {
        let b = Bounds::new(0.0, 0.0, 10.0, 10.0);
        assert_eq!(
            fit_bounds(b, Viewport::new(0.0, 0.0), ZoomExtent::default(), 0.9),
            Transform::identity()
        );
        let point = Bounds::new(5.0, 5.0, 5.0, 5.0);
        let t = fit_bounds(point, Viewport::new(800.0, 600.0), ZoomExtent::default(), 0.9);
        assert!((t.scale - 8.0).abs() < f64::EPSILON);
    }
}
