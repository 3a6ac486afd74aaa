//! Compliance data sources.
//!
//! Fetching is asynchronous and may fail; the map decides what a failure
//! means (see [`crate::WorldMap::load_from`]).

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::compliance::{ComplianceCategory, ComplianceModel, ComplianceRecord};
use crate::AtlasResult;

/// One complete data load: categories plus records keyed by canonical name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplianceDataset {
    /// Status categories.
    #[serde(default)]
    pub categories: Vec<ComplianceCategory>,
    /// Records keyed by canonical country name.
    #[serde(default)]
    pub countries: BTreeMap<String, ComplianceRecord>,
}

impl ComplianceDataset {
    /// Parse a dataset from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`crate::AtlasError::Serialization`] if the document is malformed.
    pub fn from_json(json: &str) -> AtlasResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Build a model from this dataset.
    #[must_use]
    pub fn into_model(self) -> ComplianceModel {
        ComplianceModel::from_parts(self.countries, self.categories)
    }
}

/// Something that can produce a [`ComplianceDataset`].
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Fetch a complete dataset.
    ///
    /// # Errors
    ///
    /// Implementations return an error when the data cannot be obtained or parsed.
    async fn fetch(&self) -> AtlasResult<ComplianceDataset>;
}

/// A source that always yields the same in-memory dataset.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    dataset: ComplianceDataset,
}

impl StaticSource {
    /// Wrap a dataset.
    #[must_use]
    pub fn new(dataset: ComplianceDataset) -> Self {
        Self { dataset }
    }
}

#[async_trait]
impl DataSource for StaticSource {
    async fn fetch(&self) -> AtlasResult<ComplianceDataset> {
        Ok(self.dataset.clone())
    }
}

/// A source that parses a JSON document held in memory.
#[derive(Debug, Clone)]
pub struct JsonSource {
    json: String,
}

impl JsonSource {
    /// Wrap a JSON document.
    #[must_use]
    pub fn new(json: impl Into<String>) -> Self {
        Self { json: json.into() }
    }
}

#[async_trait]
impl DataSource for JsonSource {
    async fn fetch(&self) -> AtlasResult<ComplianceDataset> {
        ComplianceDataset::from_json(&self.json)
    }
}
