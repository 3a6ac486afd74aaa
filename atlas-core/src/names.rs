//! Canonical country names and alias-aware record lookup.

use std::collections::HashMap;

use crate::compliance::{ComplianceModel, ComplianceRecord};
use crate::feature::{CountryFeature, FeatureProperties};

/// Name returned when a feature carries no usable name field.
pub const UNKNOWN_NAME: &str = "Unknown";

/// Built-in aliases from names found in map data to canonical record keys.
pub const DEFAULT_ALIASES: &[(&str, &str)] = &[
    ("USA", "United States"),
    ("United States of America", "United States"),
    ("U.S.A.", "United States"),
    ("UK", "United Kingdom"),
    ("Great Britain", "United Kingdom"),
    ("Russian Federation", "Russia"),
    ("Czech Rep.", "Czech Republic"),
    ("Czechia", "Czech Republic"),
    ("Republic of Korea", "South Korea"),
    ("Korea", "South Korea"),
    ("Dem. Rep. Korea", "North Korea"),
    ("Dem. Rep. Congo", "Democratic Republic of the Congo"),
    ("Democratic Republic of Congo", "Democratic Republic of the Congo"),
    ("Congo", "Republic of the Congo"),
    ("Côte d'Ivoire", "Ivory Coast"),
    ("Cote d'Ivoire", "Ivory Coast"),
    ("Bosnia and Herz.", "Bosnia and Herzegovina"),
    ("Central African Rep.", "Central African Republic"),
    ("Dominican Rep.", "Dominican Republic"),
    ("Eq. Guinea", "Equatorial Guinea"),
    ("S. Sudan", "South Sudan"),
    ("Solomon Is.", "Solomon Islands"),
    ("Falkland Is.", "Falkland Islands"),
    ("W. Sahara", "Western Sahara"),
    ("eSwatini", "Eswatini"),
    ("Swaziland", "Eswatini"),
    ("Macedonia", "North Macedonia"),
    ("Lao PDR", "Laos"),
    ("Viet Nam", "Vietnam"),
    ("Iran (Islamic Republic of)", "Iran"),
    ("Syrian Arab Republic", "Syria"),
    ("Türkiye", "Turkey"),
    ("Taiwan, Province of China", "Taiwan"),
    ("United Republic of Tanzania", "Tanzania"),
];

/// Resolves feature names and looks up records through an alias table.
#[derive(Debug, Clone)]
pub struct NameResolver {
    aliases: HashMap<String, String>,
}

impl NameResolver {
    /// Resolver with the built-in alias table.
    #[must_use]
    pub fn new() -> Self {
        Self::with_aliases(DEFAULT_ALIASES.iter().copied())
    }

    /// Resolver with exactly the given aliases.
    #[must_use]
    pub fn with_aliases<'a>(aliases: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        Self {
            aliases: aliases
                .into_iter()
                .map(|(from, to)| (from.to_string(), to.to_string()))
                .collect(),
        }
    }

    /// Canonical name of a feature: the first non-blank name field, else `"Unknown"`.
    ///
    /// Priority: `NAME`, `NAME_EN`, `NAME_LONG`, `ADMIN`, `SOVEREIGNT`, `name`.
    #[must_use]
    pub fn resolve(&self, feature: &CountryFeature) -> String {
        resolve_properties(&feature.properties)
    }

    /// Canonical key for `name`: its alias target, or `name` itself.
    #[must_use]
    pub fn canonical<'a>(&'a self, name: &'a str) -> &'a str {
        self.aliases.get(name).map_or(name, String::as_str)
    }

    /// Direct match first, then one retry through the alias table.
    #[must_use]
    pub fn lookup_record<'m>(
        &self,
        model: &'m ComplianceModel,
        name: &str,
    ) -> Option<&'m ComplianceRecord> {
        model
            .record(name)
            .or_else(|| self.aliases.get(name).and_then(|alias| model.record(alias)))
    }

    /// Number of aliases known.
    #[must_use]
    pub fn alias_count(&self) -> usize {
        self.aliases.len()
    }
}

impl Default for NameResolver {
    fn default() -> Self {
        Self::new()
    }
}

/// Resolve a bare property bag (see [`NameResolver::resolve`]).
#[must_use]
pub fn resolve_properties(properties: &FeatureProperties) -> String {
    properties
        .candidates()
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|name| !name.is_empty())
        .unwrap_or(UNKNOWN_NAME)
        .to_string()
}
