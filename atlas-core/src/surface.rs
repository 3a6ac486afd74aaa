//! Collaborator interfaces the engine drives.
//!
//! The engine never touches markup. It emits intents to a [`Renderer`]
//! and an [`InfoPanel`], and asks a [`Projection`] for pixel-space
//! geometry it does not compute itself.

use std::collections::HashMap;

use crate::compliance::ComplianceRecord;
use crate::feature::{CountryFeature, FeatureId, ProjectedFeature};
use crate::geometry::{Bounds, Point};
use crate::transform::Transform;

/// Pixel-space geometry for features.
pub trait Projection {
    /// Bounding box of the feature's projected path.
    fn bounds(&self, feature: &CountryFeature) -> Option<Bounds>;

    /// Projected centroid of the feature.
    fn centroid(&self, feature: &CountryFeature) -> Option<Point>;
}

/// Receives presentation intents for the map group and individual features.
pub trait Renderer {
    /// Apply `transform` to the map group.
    fn apply_transform(&mut self, transform: Transform);

    /// Mark or unmark a feature as selected.
    fn set_selected(&mut self, id: &FeatureId, selected: bool);

    /// Mark or unmark a feature as hovered.
    fn set_highlighted(&mut self, id: &FeatureId, highlighted: bool);

    /// Set a feature's compliance-status class and fill color.
    fn set_status(&mut self, id: &FeatureId, class: &str, color: &str);
}

/// Displays details for the selected country.
pub trait InfoPanel {
    /// Show details for `country`; `record` is `None` when there is no data.
    fn show(&mut self, country: &str, record: Option<&ComplianceRecord>);

    /// Hide the panel.
    fn hide(&mut self);

    /// Surface a one-line message to the user.
    fn notify(&mut self, message: &str);
}

/// Everything the engine drives: a [`Renderer`] that is also an [`InfoPanel`].
pub trait Surface: Renderer + InfoPanel {}

impl<T: Renderer + InfoPanel + ?Sized> Surface for T {}

/// A [`Projection`] backed by bounds and centroids precomputed by the host.
#[derive(Debug, Clone, Default)]
pub struct BoundsTable {
    shapes: HashMap<FeatureId, (Option<Bounds>, Option<Point>)>,
}

impl BoundsTable {
    /// Create an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from projected features.
    #[must_use]
    pub fn from_projected(features: &[ProjectedFeature]) -> Self {
        let mut table = Self::new();
        for f in features {
            table.insert(f.feature.id.clone(), f.bounds(), f.centroid());
        }
        table
    }

    /// Record geometry for a feature, replacing any previous entry.
    pub fn insert(&mut self, id: FeatureId, bounds: Option<Bounds>, centroid: Option<Point>) {
        self.shapes.insert(id, (bounds, centroid));
    }

    /// Number of features with geometry.
    #[must_use]
    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    /// Whether the table is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }
}

impl Projection for BoundsTable {
    fn bounds(&self, feature: &CountryFeature) -> Option<Bounds> {
        self.shapes.get(&feature.id).and_then(|(b, _)| *b)
    }

    fn centroid(&self, feature: &CountryFeature) -> Option<Point> {
        self.shapes.get(&feature.id).and_then(|(_, c)| *c)
    }
}
