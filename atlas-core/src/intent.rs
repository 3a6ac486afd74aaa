//! Recorded presentation intents.
//!
//! [`IntentLog`] is a [`Renderer`] and [`InfoPanel`] that records what the
//! engine asked for. The WASM host drains it as JSON each frame; tests
//! replay it to check what ended up on screen.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::compliance::ComplianceRecord;
use crate::feature::FeatureId;
use crate::surface::{InfoPanel, Renderer};
use crate::transform::Transform;

/// One request from the engine to its presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Intent {
    /// Apply a transform to the map group.
    Transform {
        /// The combined transform.
        transform: Transform,
    },
    /// Mark or unmark a feature as selected.
    Selected {
        /// Feature id.
        id: FeatureId,
        /// New state.
        selected: bool,
    },
    /// Mark or unmark a feature as hovered.
    Highlighted {
        /// Feature id.
        id: FeatureId,
        /// New state.
        highlighted: bool,
    },
    /// Style a feature by compliance status.
    Status {
        /// Feature id.
        id: FeatureId,
        /// Status class name.
        class: String,
        /// Fill color.
        color: String,
    },
    /// Show the info panel.
    ShowInfo {
        /// Country name.
        country: String,
        /// Record, or `None` for "no data".
        record: Option<ComplianceRecord>,
    },
    /// Hide the info panel.
    HideInfo,
    /// One-line user-visible message.
    Notice {
        /// Message text.
        message: String,
    },
}

/// A recording [`Renderer`] + [`InfoPanel`].
#[derive(Debug, Clone, Default)]
pub struct IntentLog {
    intents: Vec<Intent>,
}

impl IntentLog {
    /// Create an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Intents recorded so far.
    #[must_use]
    pub fn intents(&self) -> &[Intent] {
        &self.intents
    }

    /// Take all recorded intents, leaving the log empty.
    pub fn drain(&mut self) -> Vec<Intent> {
        std::mem::take(&mut self.intents)
    }

    /// Replay every selection intent and return the features left marked selected.
    #[must_use]
    pub fn marked_selected(&self) -> BTreeSet<FeatureId> {
        let mut marked = BTreeSet::new();
        for intent in &self.intents {
            if let Intent::Selected { id, selected } = intent {
                if *selected {
                    marked.insert(id.clone());
                } else {
                    marked.remove(id);
                }
            }
        }
        marked
    }

    /// The most recent transform applied, if any.
    #[must_use]
    pub fn last_transform(&self) -> Option<Transform> {
        self.intents.iter().rev().find_map(|intent| match intent {
            Intent::Transform { transform } => Some(*transform),
            _ => None,
        })
    }

    /// Whether the info panel is visible after replaying the log.
    #[must_use]
    pub fn info_visible(&self) -> bool {
        self.intents
            .iter()
            .rev()
            .find_map(|intent| match intent {
                Intent::ShowInfo { .. } => Some(true),
                Intent::HideInfo => Some(false),
                _ => None,
            })
            .unwrap_or(false)
    }
}

impl Renderer for IntentLog {
    fn apply_transform(&mut self, transform: Transform) {
        self.intents.push(Intent::Transform { transform });
    }

    fn set_selected(&mut self, id: &FeatureId, selected: bool) {
        self.intents.push(Intent::Selected {
            id: id.clone(),
            selected,
        });
    }

    fn set_highlighted(&mut self, id: &FeatureId, highlighted: bool) {
        self.intents.push(Intent::Highlighted {
            id: id.clone(),
            highlighted,
        });
    }

    fn set_status(&mut self, id: &FeatureId, class: &str, color: &str) {
        self.intents.push(Intent::Status {
            id: id.clone(),
            class: class.to_string(),
            color: color.to_string(),
        });
    }
}

impl InfoPanel for IntentLog {
    fn show(&mut self, country: &str, record: Option<&ComplianceRecord>) {
        self.intents.push(Intent::ShowInfo {
            country: country.to_string(),
            record: record.cloned(),
        });
    }

    fn hide(&mut self) {
        self.intents.push(Intent::HideInfo);
    }

    fn notify(&mut self, message: &str) {
        self.intents.push(Intent::Notice {
            message: message.to_string(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replay_tracks_selection_marks() {
        let mut log = IntentLog::new();
        let a = FeatureId::new("a");
        let b = FeatureId::new("b");
        log.set_selected(&a, true);
        log.set_selected(&a, false);
        log.set_selected(&b, true);
        assert_eq!(log.marked_selected().into_iter().collect::<Vec<_>>(), vec![b]);
    }

    #[test]
    fn info_visibility_follows_last_command() {
        let mut log = IntentLog::new();
        assert!(!log.info_visible());
        log.show("France", None);
        assert!(log.info_visible());
        log.hide();
        assert!(!log.info_visible());
    }

    #[test]
    fn intents_serialize_with_type_tag() {
        let mut log = IntentLog::new();
        log.apply_transform(Transform::identity());
        log.notify("Failed to load compliance data");
        let json = serde_json::to_string(&log.drain()).expect("serialize");
        assert!(json.contains(r#""type":"transform""#));
        assert!(json.contains(r#""type":"notice""#));
        assert!(log.intents().is_empty());
    }
}
