//! Terminal presentation surface.

use std::collections::{BTreeMap, BTreeSet};

use atlas_core::{ComplianceRecord, FeatureId, InfoPanel, Renderer, Transform};

/// A [`Renderer`] + [`InfoPanel`] that logs intents and keeps the final state.
#[derive(Debug, Clone, Default)]
pub struct ConsoleSurface {
    transform: Transform,
    selected: BTreeSet<FeatureId>,
    highlighted: Option<FeatureId>,
    classes: BTreeMap<FeatureId, String>,
    panel: Option<String>,
    notices: Vec<String>,
    transforms_applied: u64,
}

impl ConsoleSurface {
    /// Create an empty surface.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Last applied transform.
    #[must_use]
    pub const fn transform(&self) -> Transform {
        self.transform
    }

    /// Number of transforms applied.
    #[must_use]
    pub const fn transforms_applied(&self) -> u64 {
        self.transforms_applied
    }

    /// Features currently marked selected.
    #[must_use]
    pub fn selected(&self) -> &BTreeSet<FeatureId> {
        &self.selected
    }

    /// Status class of a feature.
    #[must_use]
    pub fn class_of(&self, id: &FeatureId) -> Option<&str> {
        self.classes.get(id).map(String::as_str)
    }

    /// Text of the info panel, if visible.
    #[must_use]
    pub fn panel(&self) -> Option<&str> {
        self.panel.as_deref()
    }

    /// Messages shown to the user.
    #[must_use]
    pub fn notices(&self) -> &[String] {
        &self.notices
    }
}

impl Renderer for ConsoleSurface {
    fn apply_transform(&mut self, transform: Transform) {
        tracing::trace!(%transform, "transform");
        self.transform = transform;
        self.transforms_applied += 1;
    }

    fn set_selected(&mut self, id: &FeatureId, selected: bool) {
        if selected {
            self.selected.insert(id.clone());
        } else {
            self.selected.remove(id);
        }
    }

    fn set_highlighted(&mut self, id: &FeatureId, highlighted: bool) {
        if highlighted {
            self.highlighted = Some(id.clone());
        } else if self.highlighted.as_ref() == Some(id) {
            self.highlighted = None;
        }
    }

    fn set_status(&mut self, id: &FeatureId, class: &str, _color: &str) {
        self.classes.insert(id.clone(), class.to_string());
    }
}

impl InfoPanel for ConsoleSurface {
    fn show(&mut self, country: &str, record: Option<&ComplianceRecord>) {
        let text = match record {
            Some(r) => format!(
                "{country}: {} ({}), {} units",
                r.status, r.standard, r.units_in_country
            ),
            None => format!("{country}: no compliance data"),
        };
        tracing::info!("{text}");
        self.panel = Some(text);
    }

    fn hide(&mut self) {
        self.panel = None;
    }

    fn notify(&mut self, message: &str) {
        tracing::warn!("{message}");
        self.notices.push(message.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_selection_and_panel_state() {
        let mut surface = ConsoleSurface::new();
        let a = FeatureId::new("a");
        surface.set_selected(&a, true);
        surface.show("France", None);
        assert!(surface.selected().contains(&a));
        assert_eq!(surface.panel(), Some("France: no compliance data"));

        surface.set_selected(&a, false);
        surface.hide();
        assert!(surface.selected().is_empty());
        assert!(surface.panel().is_none());
    }

    #[test]
    fn counts_transforms() {
        let mut surface = ConsoleSurface::new();
        surface.apply_transform(Transform::new(1.0, 2.0, 3.0));
        surface.apply_transform(Transform::identity());
        assert_eq!(surface.transforms_applied(), 2);
        assert_eq!(surface.transform(), Transform::identity());
    }
}
