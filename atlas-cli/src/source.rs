//! File-backed inputs.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use atlas_core::{AtlasError, AtlasResult, ComplianceDataset, DataSource, MapConfig, ProjectedFeature};

use crate::error::{CliError, CliResult};

/// A [`DataSource`] that reads a dataset JSON file on every fetch.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    /// Read from `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// File this source reads.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl DataSource for JsonFileSource {
    async fn fetch(&self) -> AtlasResult<ComplianceDataset> {
        let json = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            AtlasError::DataSource(format!("{}: {e}", self.path.display()))
        })?;
        let dataset = ComplianceDataset::from_json(&json)?;
        tracing::debug!(
            path = %self.path.display(),
            countries = dataset.countries.len(),
            "dataset read"
        );
        Ok(dataset)
    }
}

async fn read(path: &Path) -> CliResult<String> {
    tokio::fs::read_to_string(path)
        .await
        .map_err(|source| CliError::Io {
            path: path.to_path_buf(),
            source,
        })
}

/// Read a JSON array of projected features.
///
/// # Errors
///
/// Returns [`CliError::Io`] or [`CliError::Json`] if the file cannot be read or parsed.
pub async fn load_features(path: &Path) -> CliResult<Vec<ProjectedFeature>> {
    let json = read(path).await?;
    let features: Vec<ProjectedFeature> =
        serde_json::from_str(&json).map_err(|source| CliError::Json {
            path: path.to_path_buf(),
            source,
        })?;
    tracing::info!(path = %path.display(), features = features.len(), "features loaded");
    Ok(features)
}

/// Read a map configuration, or the defaults when no path is given.
///
/// # Errors
///
/// Returns an error if the file cannot be read, or holds invalid settings.
pub async fn load_config(path: Option<&Path>) -> CliResult<MapConfig> {
    let Some(path) = path else {
        return Ok(MapConfig::default());
    };
    let json = read(path).await?;
    Ok(MapConfig::from_json(&json)?)
}
