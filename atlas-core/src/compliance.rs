//! Per-country compliance records and status categories.
//!
//! Color lookup is a total three-step fallback:
//!
//! ```text
//! record.status → category.color
//!       └─ miss → categories["unknown"].color
//!                       └─ miss → DEFAULT_COLOR
//! ```

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Status key of the fallback category.
pub const UNKNOWN_STATUS: &str = "unknown";

/// Color used when not even the `"unknown"` category is present.
pub const DEFAULT_COLOR: &str = "#e0e0e0";

/// Compliance data for one country, keyed by canonical name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplianceRecord {
    /// Standard the country is assessed against.
    pub standard: String,
    /// Status key into the category table.
    pub status: String,
    /// Number of units operating in the country.
    #[serde(default)]
    pub units_in_country: u32,
    /// Score in percent, if assessed.
    #[serde(default)]
    pub compliance_score: Option<f64>,
    /// Certifications held.
    #[serde(default)]
    pub certifications: Vec<String>,
    /// Date of the last audit, as delivered.
    #[serde(default)]
    pub last_audit_date: Option<String>,
}

/// Display metadata for a status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplianceCategory {
    /// Status key.
    pub status: String,
    /// Fill color (CSS color string).
    pub color: String,
    /// Short label for legends and tooltips.
    pub label: String,
    /// Longer description.
    #[serde(default)]
    pub description: String,
}

impl ComplianceCategory {
    /// The synthetic category installed when data fails to load.
    #[must_use]
    pub fn fallback_unknown() -> Self {
        Self {
            status: UNKNOWN_STATUS.to_string(),
            color: DEFAULT_COLOR.to_string(),
            label: "Unknown".to_string(),
            description: "No compliance data available".to_string(),
        }
    }
}

/// In-memory store of records and categories.
///
/// Replaced wholesale by [`ComplianceModel::load`]; there are no partial updates.
#[derive(Debug, Clone, Default)]
pub struct ComplianceModel {
    records: HashMap<String, ComplianceRecord>,
    categories: HashMap<String, ComplianceCategory>,
    /// Category keys in load order, for legends.
    order: Vec<String>,
}

impl ComplianceModel {
    /// Create an empty model (no records, no categories).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a model from records and categories.
    ///
    /// Later duplicates replace earlier ones.
    #[must_use]
    pub fn from_parts(
        records: impl IntoIterator<Item = (String, ComplianceRecord)>,
        categories: impl IntoIterator<Item = ComplianceCategory>,
    ) -> Self {
        let records: HashMap<_, _> = records.into_iter().collect();
        let mut by_status = HashMap::new();
        let mut order = Vec::new();
        for category in categories {
            if !by_status.contains_key(&category.status) {
                order.push(category.status.clone());
            }
            by_status.insert(category.status.clone(), category);
        }
        Self {
            records,
            categories: by_status,
            order,
        }
    }

    /// The degraded model used after a failed load.
    #[must_use]
    pub fn fallback() -> Self {
        Self::from_parts(Vec::new(), [ComplianceCategory::fallback_unknown()])
    }

    /// Replace the whole record and category set.
    ///
    /// The new model is built first and swapped in as one assignment, so
    /// no reader sees records from one load and categories from another.
    pub fn load(
        &mut self,
        records: impl IntoIterator<Item = (String, ComplianceRecord)>,
        categories: impl IntoIterator<Item = ComplianceCategory>,
    ) {
        let next = Self::from_parts(records, categories);
        tracing::info!(
            records = next.records.len(),
            categories = next.categories.len(),
            "compliance data loaded"
        );
        *self = next;
    }

    /// Record stored under exactly `name`.
    #[must_use]
    pub fn record(&self, name: &str) -> Option<&ComplianceRecord> {
        self.records.get(name)
    }

    /// Category metadata for `status`.
    #[must_use]
    pub fn category_for(&self, status: &str) -> Option<&ComplianceCategory> {
        self.categories.get(status)
    }

    /// Color for a status, with the unknown/default fallbacks.
    #[must_use]
    pub fn color_for_status(&self, status: Option<&str>) -> &str {
        status
            .and_then(|s| self.categories.get(s))
            .or_else(|| self.categories.get(UNKNOWN_STATUS))
            .map_or(DEFAULT_COLOR, |c| c.color.as_str())
    }

    /// Color for the record stored under `canonical_name`.
    #[must_use]
    pub fn color_for(&self, canonical_name: &str) -> &str {
        self.color_for_status(self.record(canonical_name).map(|r| r.status.as_str()))
    }

    /// Category keys in load order.
    pub fn legend(&self) -> impl Iterator<Item = &ComplianceCategory> {
        self.order.iter().filter_map(|s| self.categories.get(s))
    }

    /// Number of records.
    #[must_use]
    pub fn record_count(&self) -> usize {
        self.records.len()
    }

    /// Whether the model holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// CSS-style class for a status, e.g. `"Partially Compliant"` → `status-partially-compliant`.
#[must_use]
pub fn status_class(status: Option<&str>) -> String {
    let status = status.unwrap_or(UNKNOWN_STATUS);
    let slug: String = status
        .trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '-'
            }
        })
        .collect();
    format!("status-{slug}")
}
