//! The world map controller.
//!
//! [`WorldMap`] wires the components together and is what hosts talk to:
//!
//! ```text
//!  gesture / pointer / click / search
//!              │
//!              ▼
//!  ┌──────────────────────────────────────────────┐
//!  │ WorldMap                                     │
//!  │  NameResolver ─► ComplianceModel             │
//!  │  SelectionController ─► zoom request         │
//!  │  ViewState: base ∘ camera ─► constraint      │
//!  │  FrameLoop: start / stop / frame(token, now) │
//!  └──────────────────────────────────────────────┘
//!              │ intents
//!              ▼
//!       Renderer + InfoPanel
//! ```

use std::collections::HashMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::compliance::{status_class, ComplianceModel, ComplianceRecord};
use crate::config::MapConfig;
use crate::feature::{CountryFeature, FeatureId};
use crate::frame_loop::{FrameLoop, LoopToken};
use crate::geometry::{Point, Viewport};
use crate::names::NameResolver;
use crate::selection::{fit_bounds, SelectionController};
use crate::source::{ComplianceDataset, DataSource};
use crate::surface::{Projection, Surface};
use crate::transform::Transform;
use crate::view::{ViewSnapshot, ViewState};
use crate::{AtlasError, AtlasResult};

/// What a hover tooltip should show.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TooltipContent {
    /// Canonical country name.
    pub country: String,
    /// Whether compliance data exists for the country.
    pub has_data: bool,
    /// Status label, when compliance details are enabled and known.
    pub status_label: Option<String>,
    /// Status color, when compliance details are enabled.
    pub color: Option<String>,
    /// Compliance score, when enabled and present.
    pub compliance_score: Option<f64>,
    /// Units in the country, when enabled and present.
    pub units_in_country: Option<u32>,
}

/// A search result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHit {
    /// Matching feature.
    pub id: FeatureId,
    /// Its canonical name.
    pub name: String,
}

/// A country-name label anchored at the feature centroid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountryLabel {
    /// Feature id.
    pub id: FeatureId,
    /// Canonical name.
    pub name: String,
    /// Centroid in map pixel space.
    pub position: Point,
}

/// Interactive world map state and orchestration.
pub struct WorldMap<P, S> {
    config: MapConfig,
    projection: P,
    surface: S,
    resolver: NameResolver,
    model: ComplianceModel,
    data_loaded: bool,
    features: Vec<CountryFeature>,
    names: Vec<String>,
    index: HashMap<FeatureId, usize>,
    selection: SelectionController,
    hovered: Option<FeatureId>,
    view: ViewState,
    frames: FrameLoop,
}

impl<P, S> WorldMap<P, S>
where
    P: Projection,
    S: Surface,
{
    /// Create a map with no features and no data.
    pub fn new(config: MapConfig, viewport: Viewport, projection: P, surface: S) -> Self {
        let view = ViewState::new(&config, viewport);
        Self {
            config,
            projection,
            surface,
            resolver: NameResolver::new(),
            model: ComplianceModel::new(),
            data_loaded: false,
            features: Vec::new(),
            names: Vec::new(),
            index: HashMap::new(),
            selection: SelectionController::new(),
            hovered: None,
            view,
            frames: FrameLoop::new(),
        }
    }

    /// Replace the name resolver (e.g. to add aliases).
    #[must_use]
    pub fn with_resolver(mut self, resolver: NameResolver) -> Self {
        self.resolver = resolver;
        self.names = self.features.iter().map(|f| self.resolver.resolve(f)).collect();
        self
    }

    /// Configuration in force.
    #[must_use]
    pub const fn config(&self) -> &MapConfig {
        &self.config
    }

    /// The presentation surface.
    #[must_use]
    pub const fn surface(&self) -> &S {
        &self.surface
    }

    /// Mutable access to the presentation surface.
    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// The projection.
    #[must_use]
    pub const fn projection(&self) -> &P {
        &self.projection
    }

    /// Replace the projection, e.g. after the host re-projects on resize.
    pub fn set_projection(&mut self, projection: P) {
        self.projection = projection;
    }

    /// The compliance model.
    #[must_use]
    pub const fn model(&self) -> &ComplianceModel {
        &self.model
    }

    /// The name resolver.
    #[must_use]
    pub const fn resolver(&self) -> &NameResolver {
        &self.resolver
    }

    /// The selection controller.
    #[must_use]
    pub const fn selection(&self) -> &SelectionController {
        &self.selection
    }

    /// Immutable snapshot of the view state.
    #[must_use]
    pub fn snapshot(&self) -> ViewSnapshot {
        self.view.snapshot()
    }

    // ---------------------------------------------------------------------
    // Features and data
    // ---------------------------------------------------------------------

    /// Install the loaded map features, replacing any previous set.
    pub fn set_features(&mut self, features: Vec<CountryFeature>) {
        self.names = features.iter().map(|f| self.resolver.resolve(f)).collect();
        self.index = features
            .iter()
            .enumerate()
            .map(|(i, f)| (f.id.clone(), i))
            .collect();
        self.features = features;
        tracing::info!(features = self.features.len(), "map features installed");

        if let Some(selected) = self.selection.selected() {
            if !self.index.contains_key(selected) {
                self.selection.deselect(&mut self.surface);
            }
        }
        if self.hovered.as_ref().is_some_and(|h| !self.index.contains_key(h)) {
            self.hovered = None;
        }
        if self.data_loaded {
            self.apply_status_styles();
        }
    }

    /// Installed features in load order.
    #[must_use]
    pub fn features(&self) -> &[CountryFeature] {
        &self.features
    }

    /// Number of installed features.
    #[must_use]
    pub fn feature_count(&self) -> usize {
        self.features.len()
    }

    /// Feature by id.
    #[must_use]
    pub fn feature(&self, id: &FeatureId) -> Option<&CountryFeature> {
        self.index.get(id).map(|&i| &self.features[i])
    }

    /// Canonical name of a feature.
    #[must_use]
    pub fn name_of(&self, id: &FeatureId) -> Option<&str> {
        self.index.get(id).map(|&i| self.names[i].as_str())
    }

    /// Commit a dataset as the new compliance model.
    pub fn load_dataset(&mut self, dataset: ComplianceDataset) {
        self.model.load(dataset.countries, dataset.categories);
        self.data_loaded = true;
        self.after_load();
    }

    /// Degrade to the fallback model after a failed load.
    pub fn load_failed(&mut self, error: &AtlasError) {
        tracing::warn!(error = %error, "compliance data unavailable, using fallback");
        self.model = ComplianceModel::fallback();
        self.data_loaded = true;
        self.surface
            .notify("Compliance data could not be loaded; showing map without status.");
        self.after_load();
    }

    /// Fetch from `source` and commit the result (or the fallback).
    ///
    /// Returns `true` if real data was loaded.
    pub async fn load_from(&mut self, source: &dyn DataSource) -> bool {
        match source.fetch().await {
            Ok(dataset) => {
                self.load_dataset(dataset);
                true
            }
            Err(e) => {
                self.load_failed(&e);
                false
            }
        }
    }

    /// Whether a load (successful or fallback) has been committed.
    #[must_use]
    pub const fn is_data_loaded(&self) -> bool {
        self.data_loaded
    }

    /// Compliance record for a feature, through the alias table.
    #[must_use]
    pub fn record_for(&self, id: &FeatureId) -> Option<&ComplianceRecord> {
        let name = self.name_of(id)?;
        self.resolver.lookup_record(&self.model, name)
    }

    /// Fill color for a feature. Always returns a color.
    #[must_use]
    pub fn color_for(&self, id: &FeatureId) -> &str {
        self.model
            .color_for_status(self.record_for(id).map(|r| r.status.as_str()))
    }

    fn after_load(&mut self) {
        self.apply_status_styles();
        if let Some(i) = self.selection.selected().and_then(|id| self.index.get(id)) {
            let name = &self.names[*i];
            let record = self.resolver.lookup_record(&self.model, name);
            self.surface.show(name, record);
        }
    }

    fn apply_status_styles(&mut self) {
        for (feature, name) in self.features.iter().zip(&self.names) {
            let status = self
                .resolver
                .lookup_record(&self.model, name)
                .map(|r| r.status.as_str());
            let color = self.model.color_for_status(status);
            self.surface
                .set_status(&feature.id, &status_class(status), color);
        }
    }

    // ---------------------------------------------------------------------
    // Interaction
    // ---------------------------------------------------------------------

    /// Pointer entered `id`: highlight it and describe it for a tooltip.
    pub fn hover(&mut self, id: &FeatureId) -> Option<TooltipContent> {
        let &i = self.index.get(id)?;
        if self.hovered.as_ref() != Some(id) {
            if let Some(prev) = self.hovered.take() {
                self.surface.set_highlighted(&prev, false);
            }
            self.surface.set_highlighted(id, true);
            self.hovered = Some(id.clone());
        }

        let name = &self.names[i];
        let record = self.resolver.lookup_record(&self.model, name);
        let mut tooltip = TooltipContent {
            country: name.clone(),
            has_data: record.is_some(),
            status_label: None,
            color: None,
            compliance_score: None,
            units_in_country: None,
        };
        if self.config.show_compliance_in_tooltip {
            let status = record.map(|r| r.status.as_str());
            tooltip.status_label = status
                .and_then(|s| self.model.category_for(s))
                .map(|c| c.label.clone());
            tooltip.color = Some(self.model.color_for_status(status).to_string());
            tooltip.compliance_score = record.and_then(|r| r.compliance_score);
            tooltip.units_in_country = record.map(|r| r.units_in_country);
        }
        Some(tooltip)
    }

    /// Pointer left the hovered feature.
    pub fn hover_end(&mut self) {
        if let Some(prev) = self.hovered.take() {
            self.surface.set_highlighted(&prev, false);
        }
    }

    /// A feature was clicked.
    ///
    /// Selects it, shows its data and, if configured, zooms to its bounds.
    /// Clicking the selected feature again resets the view.
    ///
    /// # Errors
    ///
    /// Returns [`AtlasError::FeatureNotFound`] if `id` is not installed.
    pub fn click(&mut self, id: &FeatureId, now: Duration) -> AtlasResult<()> {
        let &i = self
            .index
            .get(id)
            .ok_or_else(|| AtlasError::FeatureNotFound(id.to_string()))?;

        if self.selection.is_selected(id) {
            self.reset(now);
            return Ok(());
        }

        self.selection.select(id.clone(), &mut self.surface);
        let name = &self.names[i];
        let record = self.resolver.lookup_record(&self.model, name);
        self.surface.show(name, record);

        if self.config.auto_zoom_on_click {
            match self.projection.bounds(&self.features[i]) {
                Some(bounds) => {
                    let target = fit_bounds(
                        bounds,
                        self.view.viewport(),
                        self.view.constraint().extent(),
                        self.config.fit_padding,
                    );
                    self.view.animate_to(target, now);
                }
                None => tracing::debug!(feature = %id, "no projected bounds, not zooming"),
            }
        }
        Ok(())
    }

    /// The background was clicked.
    pub fn click_background(&mut self, now: Duration) {
        self.reset(now);
    }

    /// Clear the selection and hide the info panel.
    pub fn deselect(&mut self) {
        self.selection.deselect(&mut self.surface);
    }

    /// Deselect and animate back to the fully zoomed-out view.
    pub fn reset(&mut self, now: Duration) {
        self.deselect();
        let rest = self.view.constraint().rest();
        self.view.animate_to(rest, now);
    }

    /// Animate one zoom step in.
    pub fn zoom_in(&mut self, now: Duration) {
        self.view.zoom_by(self.config.zoom_step, now);
    }

    /// Animate one zoom step out.
    pub fn zoom_out(&mut self, now: Duration) {
        self.view.zoom_by(1.0 / self.config.zoom_step, now);
    }

    /// A pan/zoom gesture produced `transform`; applied immediately.
    pub fn gesture(&mut self, transform: Transform) -> Transform {
        let applied = self.view.apply_gesture(transform);
        self.surface.apply_transform(applied);
        applied
    }

    /// Latest pointer position in viewport pixels.
    pub fn pointer_moved(&mut self, x: f64, y: f64) {
        self.view.pointer_moved(Point::new(x, y));
    }

    /// Pointer left the map surface.
    pub fn pointer_left(&mut self) {
        self.view.pointer_left();
        self.hover_end();
    }

    /// The rendering surface was resized.
    pub fn set_viewport(&mut self, width: f64, height: f64) {
        self.view.set_viewport(Viewport::new(width, height));
        self.surface.apply_transform(self.view.combined());
    }

    /// Enable or disable camera follow.
    pub fn set_camera_follow(&mut self, enabled: bool) {
        self.view.set_camera_follow(enabled);
    }

    // ---------------------------------------------------------------------
    // Frame loop
    // ---------------------------------------------------------------------

    /// Start the animation loop. Idempotent.
    pub fn start(&mut self) -> LoopToken {
        self.frames.start()
    }

    /// Stop the animation loop. Idempotent; later frames for the old token emit nothing.
    pub fn stop(&mut self) -> bool {
        self.frames.stop()
    }

    /// Whether the animation loop is running.
    #[must_use]
    pub const fn is_running(&self) -> bool {
        self.frames.is_running()
    }

    /// Run one frame for `token` at host time `now`.
    ///
    /// Returns the rendered transform, or `None` if the loop was stopped
    /// or restarted since `token` was issued.
    pub fn frame(&mut self, token: LoopToken, now: Duration) -> Option<Transform> {
        self.frames.tick(token)?;
        let combined = self.view.frame(now);
        self.surface.apply_transform(combined);
        Some(combined)
    }

    // ---------------------------------------------------------------------
    // Search and labels
    // ---------------------------------------------------------------------

    /// Features whose name matches `query`, prefix matches first.
    #[must_use]
    pub fn search(&self, query: &str) -> Vec<SearchHit> {
        let query = query.trim().to_lowercase();
        if !self.config.enable_search || query.is_empty() {
            return Vec::new();
        }

        let mut ranked: Vec<(u8, &str, &FeatureId)> = self
            .features
            .iter()
            .zip(&self.names)
            .filter_map(|(feature, name)| {
                let canonical = self.resolver.canonical(name);
                let rank = [name.as_str(), canonical]
                    .iter()
                    .filter_map(|candidate| match_rank(&candidate.to_lowercase(), &query))
                    .min()?;
                Some((rank, name.as_str(), &feature.id))
            })
            .collect();
        ranked.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.cmp(b.1)));

        ranked
            .into_iter()
            .map(|(_, name, id)| SearchHit {
                id: id.clone(),
                name: name.to_string(),
            })
            .collect()
    }

    /// Select the best search hit for `query`, as if it had been clicked.
    pub fn select_first_match(&mut self, query: &str, now: Duration) -> Option<FeatureId> {
        let hit = self.search(query).into_iter().next()?;
        if !self.selection.is_selected(&hit.id) {
            // The id comes from the installed features, so the click cannot miss.
            self.click(&hit.id, now).ok()?;
        }
        Some(hit.id)
    }

    /// Label anchors for every feature with a projected centroid.
    #[must_use]
    pub fn labels(&self) -> Vec<CountryLabel> {
        if !self.config.show_country_names {
            return Vec::new();
        }
        self.features
            .iter()
            .zip(&self.names)
            .filter_map(|(feature, name)| {
                self.projection.centroid(feature).map(|position| CountryLabel {
                    id: feature.id.clone(),
                    name: name.clone(),
                    position,
                })
            })
            .collect()
    }
}

impl<P, S> std::fmt::Debug for WorldMap<P, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorldMap")
            .field("features", &self.features.len())
            .field("data_loaded", &self.data_loaded)
            .field("selected", &self.selection.selected())
            .field("view", &self.view.snapshot())
            .field("running", &self.frames.is_running())
            .finish_non_exhaustive()
    }
}

fn match_rank(candidate: &str, query: &str) -> Option<u8> {
    if candidate.starts_with(query) {
        Some(0)
    } else if candidate.contains(query) {
        Some(1)
    } else {
        None
    }
}
