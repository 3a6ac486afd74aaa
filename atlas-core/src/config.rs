//! Map configuration, loaded once and read-only afterwards.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::camera::{CameraSettings, DEFAULT_FOLLOW_INTENSITY, DEFAULT_SMOOTHNESS};
use crate::constraint::ZoomExtent;
use crate::selection::DEFAULT_FIT_PADDING;
use crate::{AtlasError, AtlasResult};

/// Behaviour flags and tunables for the map.
///
/// JSON keys are camelCase; missing keys take their defaults and unknown
/// keys are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
#[allow(clippy::struct_excessive_bools)]
pub struct MapConfig {
    /// Zoom to a country's bounds when it is clicked.
    pub auto_zoom_on_click: bool,
    /// Enable name search.
    pub enable_search: bool,
    /// Include compliance details in hover tooltips.
    pub show_compliance_in_tooltip: bool,
    /// Provide label positions for country names.
    pub show_country_names: bool,
    /// Start with camera follow enabled.
    pub camera_follow: bool,
    /// Camera drift as a fraction of the half-extent.
    pub follow_intensity: f64,
    /// Camera low-pass factor in `(0, 1]`.
    pub smoothness: f64,
    /// Minimum (fully zoomed out) scale.
    pub min_scale: f64,
    /// Maximum scale.
    pub max_scale: f64,
    /// Length of zoom transitions in milliseconds.
    pub transition_ms: u64,
    /// Scale multiplier for zoom-in/zoom-out buttons.
    pub zoom_step: f64,
    /// Fraction of the viewport a selected country fills.
    pub fit_padding: f64,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            auto_zoom_on_click: true,
            enable_search: true,
            show_compliance_in_tooltip: true,
            show_country_names: false,
            camera_follow: true,
            follow_intensity: DEFAULT_FOLLOW_INTENSITY,
            smoothness: DEFAULT_SMOOTHNESS,
            min_scale: 1.0,
            max_scale: 8.0,
            transition_ms: 750,
            zoom_step: 1.5,
            fit_padding: DEFAULT_FIT_PADDING,
        }
    }
}

impl MapConfig {
    /// Parse and validate a JSON configuration document.
    ///
    /// # Errors
    ///
    /// Returns [`AtlasError::Serialization`] for malformed JSON and
    /// [`AtlasError::InvalidConfig`] for out-of-range values.
    pub fn from_json(json: &str) -> AtlasResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check every tunable is in range.
    ///
    /// # Errors
    ///
    /// Returns [`AtlasError::InvalidConfig`] naming the first bad value.
    pub fn validate(&self) -> AtlasResult<()> {
        let invalid = |msg: String| {
            tracing::warn!("rejecting map config: {msg}");
            Err(AtlasError::InvalidConfig(msg))
        };

        if !(self.smoothness.is_finite() && self.smoothness > 0.0 && self.smoothness <= 1.0) {
            return invalid(format!("smoothness must be in (0, 1], got {}", self.smoothness));
        }
        if !(self.follow_intensity.is_finite() && self.follow_intensity >= 0.0) {
            return invalid(format!(
                "followIntensity must be >= 0, got {}",
                self.follow_intensity
            ));
        }
        if !(self.zoom_step.is_finite() && self.zoom_step > 1.0) {
            return invalid(format!("zoomStep must be > 1, got {}", self.zoom_step));
        }
        if !(self.fit_padding.is_finite() && self.fit_padding > 0.0 && self.fit_padding <= 1.0) {
            return invalid(format!(
                "fitPadding must be in (0, 1], got {}",
                self.fit_padding
            ));
        }
        if let Err(e) = ZoomExtent::new(self.min_scale, self.max_scale) {
            return invalid(e.to_string());
        }
        Ok(())
    }

    /// Zoom extent from `minScale`/`maxScale`, or the default extent if they are invalid.
    #[must_use]
    pub fn zoom_extent(&self) -> ZoomExtent {
        ZoomExtent::new(self.min_scale, self.max_scale).unwrap_or_default()
    }

    /// Camera tunables.
    #[must_use]
    pub const fn camera_settings(&self) -> CameraSettings {
        CameraSettings {
            follow_intensity: self.follow_intensity,
            smoothness: self.smoothness,
        }
    }

    /// Zoom transition duration.
    #[must_use]
    pub const fn transition(&self) -> Duration {
        Duration::from_millis(self.transition_ms)
    }
}
