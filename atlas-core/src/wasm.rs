//! WebAssembly bindings for atlas-core.
//!
//! The host projects features, renders paths and drives the animation
//! frame callback; this module exposes the engine and hands presentation
//! intents back as JSON.

use std::time::Duration;

use wasm_bindgen::prelude::*;

use crate::{
    BoundsTable, ComplianceDataset, FeatureId, IntentLog, LoopToken, MapConfig, ProjectedFeature,
    Viewport, WorldMap,
};

/// Initialize the atlas WASM module.
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

/// Host timestamps arrive as milliseconds; anything unusable counts as zero.
fn host_time(now_ms: f64) -> Duration {
    if now_ms.is_finite() && now_ms > 0.0 {
        Duration::try_from_secs_f64(now_ms / 1000.0).unwrap_or(Duration::ZERO)
    } else {
        Duration::ZERO
    }
}

/// Map instance for WASM.
#[wasm_bindgen]
pub struct WasmAtlas {
    map: WorldMap<BoundsTable, IntentLog>,
}

#[wasm_bindgen]
impl WasmAtlas {
    /// Create a map from a JSON configuration (empty string for defaults).
    ///
    /// # Errors
    ///
    /// Returns an error string if the configuration is malformed or invalid.
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: &str, width: f64, height: f64) -> Result<WasmAtlas, String> {
        let config = if config_json.trim().is_empty() {
            MapConfig::default()
        } else {
            MapConfig::from_json(config_json).map_err(|e| e.to_string())?
        };
        Ok(Self {
            map: WorldMap::new(
                config,
                Viewport::new(width, height),
                BoundsTable::new(),
                IntentLog::new(),
            ),
        })
    }

    /// Install projected features (a JSON array of `ProjectedFeature`).
    ///
    /// # Errors
    ///
    /// Returns an error string if JSON parsing fails.
    #[wasm_bindgen(js_name = setFeatures)]
    pub fn set_features(&mut self, json: &str) -> Result<(), String> {
        let projected: Vec<ProjectedFeature> =
            serde_json::from_str(json).map_err(|e| e.to_string())?;
        self.map.set_projection(BoundsTable::from_projected(&projected));
        self.map
            .set_features(projected.into_iter().map(|p| p.feature).collect());
        Ok(())
    }

    /// Commit a compliance dataset fetched by the host.
    ///
    /// A malformed document degrades to the fallback model, like a failed fetch.
    #[wasm_bindgen(js_name = loadData)]
    pub fn load_data(&mut self, json: &str) -> bool {
        match ComplianceDataset::from_json(json) {
            Ok(dataset) => {
                self.map.load_dataset(dataset);
                true
            }
            Err(e) => {
                self.map.load_failed(&e);
                false
            }
        }
    }

    /// Report that the host could not fetch compliance data.
    #[wasm_bindgen(js_name = loadFailed)]
    pub fn load_failed(&mut self, message: &str) {
        self.map
            .load_failed(&crate::AtlasError::DataSource(message.to_string()));
    }

    /// Whether a load (real or fallback) has completed.
    #[wasm_bindgen(js_name = isDataLoaded)]
    #[must_use]
    pub fn is_data_loaded(&self) -> bool {
        self.map.is_data_loaded()
    }

    /// Pointer moved to viewport coordinates.
    #[wasm_bindgen(js_name = pointerMove)]
    pub fn pointer_move(&mut self, x: f64, y: f64) {
        self.map.pointer_moved(x, y);
    }

    /// Pointer left the map.
    #[wasm_bindgen(js_name = pointerLeave)]
    pub fn pointer_leave(&mut self) {
        self.map.pointer_left();
    }

    /// Pointer entered a feature; returns tooltip JSON.
    pub fn hover(&mut self, id: &str) -> Option<String> {
        let tooltip = self.map.hover(&FeatureId::new(id))?;
        serde_json::to_string(&tooltip).ok()
    }

    /// Pointer left the hovered feature.
    #[wasm_bindgen(js_name = hoverEnd)]
    pub fn hover_end(&mut self) {
        self.map.hover_end();
    }

    /// A feature was clicked.
    ///
    /// # Errors
    ///
    /// Returns an error string if the feature is unknown.
    pub fn click(&mut self, id: &str, now_ms: f64) -> Result<(), String> {
        self.map
            .click(&FeatureId::new(id), host_time(now_ms))
            .map_err(|e| e.to_string())
    }

    /// The map background was clicked.
    #[wasm_bindgen(js_name = clickBackground)]
    pub fn click_background(&mut self, now_ms: f64) {
        self.map.click_background(host_time(now_ms));
    }

    /// Deselect and zoom all the way out.
    pub fn reset(&mut self, now_ms: f64) {
        self.map.reset(host_time(now_ms));
    }

    /// Zoom in one step.
    #[wasm_bindgen(js_name = zoomIn)]
    pub fn zoom_in(&mut self, now_ms: f64) {
        self.map.zoom_in(host_time(now_ms));
    }

    /// Zoom out one step.
    #[wasm_bindgen(js_name = zoomOut)]
    pub fn zoom_out(&mut self, now_ms: f64) {
        self.map.zoom_out(host_time(now_ms));
    }

    /// A zoom behavior produced a transform.
    pub fn gesture(&mut self, x: f64, y: f64, k: f64) {
        self.map.gesture(crate::Transform::new(x, y, k));
    }

    /// The rendering surface was resized.
    pub fn resize(&mut self, width: f64, height: f64) {
        self.map.set_viewport(width, height);
    }

    /// Enable or disable camera follow.
    #[wasm_bindgen(js_name = setCameraFollow)]
    pub fn set_camera_follow(&mut self, enabled: bool) {
        self.map.set_camera_follow(enabled);
    }

    /// Start the animation loop; returns the token to pass to `frame`.
    pub fn start(&mut self) -> u64 {
        self.map.start().generation()
    }

    /// Stop the animation loop.
    pub fn stop(&mut self) -> bool {
        self.map.stop()
    }

    /// Run one animation frame; `false` means the host should stop scheduling.
    pub fn frame(&mut self, token: u64, now_ms: f64) -> bool {
        self.map
            .frame(LoopToken::from_generation(token), host_time(now_ms))
            .is_some()
    }

    /// Take every intent recorded since the last drain, as a JSON array.
    #[wasm_bindgen(js_name = drainIntents)]
    pub fn drain_intents(&mut self) -> String {
        serde_json::to_string(&self.map.surface_mut().drain()).unwrap_or_else(|_| "[]".into())
    }

    /// Search feature names; returns a JSON array of hits.
    #[must_use]
    pub fn search(&self, query: &str) -> String {
        serde_json::to_string(&self.map.search(query)).unwrap_or_else(|_| "[]".into())
    }

    /// Select the best match for `query`; returns its id.
    #[wasm_bindgen(js_name = selectFirstMatch)]
    pub fn select_first_match(&mut self, query: &str, now_ms: f64) -> Option<String> {
        self.map
            .select_first_match(query, host_time(now_ms))
            .map(|id| id.as_str().to_string())
    }

    /// Label anchors as JSON (empty unless country names are enabled).
    #[must_use]
    pub fn labels(&self) -> String {
        serde_json::to_string(&self.map.labels()).unwrap_or_else(|_| "[]".into())
    }

    /// Legend entries in load order, as JSON.
    #[must_use]
    pub fn legend(&self) -> String {
        let legend: Vec<_> = self.map.model().legend().collect();
        serde_json::to_string(&legend).unwrap_or_else(|_| "[]".into())
    }

    /// Current view snapshot as JSON.
    #[must_use]
    pub fn snapshot(&self) -> String {
        serde_json::to_string(&self.map.snapshot()).unwrap_or_default()
    }
}
