//! Country features as delivered by the map-data loader.

use serde::{Deserialize, Serialize};

use crate::geometry::{Bounds, Point};

/// Identifier of a country feature (topology id or ISO code).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureId(String);

impl FeatureId {
    /// Create an id from any string.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for FeatureId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for FeatureId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Name fields a feature may carry, in resolution priority order.
///
/// Keys follow the Natural Earth attribute names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureProperties {
    /// Primary display name.
    #[serde(rename = "NAME", default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// English name.
    #[serde(rename = "NAME_EN", default, skip_serializing_if = "Option::is_none")]
    pub name_en: Option<String>,
    /// Long-form name.
    #[serde(rename = "NAME_LONG", default, skip_serializing_if = "Option::is_none")]
    pub name_long: Option<String>,
    /// Administrative name.
    #[serde(rename = "ADMIN", default, skip_serializing_if = "Option::is_none")]
    pub admin: Option<String>,
    /// Sovereign-entity name.
    #[serde(rename = "SOVEREIGNT", default, skip_serializing_if = "Option::is_none")]
    pub sovereignt: Option<String>,
    /// Generic lowercase `name` key.
    #[serde(rename = "name", default, skip_serializing_if = "Option::is_none")]
    pub generic_name: Option<String>,
}

impl FeatureProperties {
    /// Name candidates in priority order.
    #[must_use]
    pub fn candidates(&self) -> [Option<&str>; 6] {
        [
            self.name.as_deref(),
            self.name_en.as_deref(),
            self.name_long.as_deref(),
            self.admin.as_deref(),
            self.sovereignt.as_deref(),
            self.generic_name.as_deref(),
        ]
    }
}

/// An opaque geographic shape, identified by id and described by its name fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountryFeature {
    /// Feature identifier.
    pub id: FeatureId,
    /// Name property bag.
    #[serde(default)]
    pub properties: FeatureProperties,
}

impl CountryFeature {
    /// Create a feature.
    #[must_use]
    pub fn new(id: impl Into<FeatureId>, properties: FeatureProperties) -> Self {
        Self {
            id: id.into(),
            properties,
        }
    }
}

impl From<String> for FeatureId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// A feature with geometry already projected by the host.
///
/// Browser hosts run the projection/path generator and hand the core
/// only the pixel-space bounds and centroid it needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectedFeature {
    /// The feature itself.
    #[serde(flatten)]
    pub feature: CountryFeature,
    /// Bounding box as `[x0, y0, x1, y1]` in viewport pixels.
    #[serde(default)]
    pub bounds: Option<[f64; 4]>,
    /// Centroid as `[x, y]` in viewport pixels.
    #[serde(default)]
    pub centroid: Option<[f64; 2]>,
}

impl ProjectedFeature {
    /// Bounding box, if the host supplied one.
    #[must_use]
    pub fn bounds(&self) -> Option<Bounds> {
        self.bounds.map(|[x0, y0, x1, y1]| Bounds::new(x0, y0, x1, y1))
    }

    /// Centroid, if the host supplied one.
    #[must_use]
    pub fn centroid(&self) -> Option<Point> {
        self.centroid.map(|[x, y]| Point::new(x, y))
    }
}
