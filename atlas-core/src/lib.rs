//! # Compliance Atlas Core
//!
//! View-state engine for an interactive world map that colors countries
//! by compliance status. Rendering is left to the host; the engine only
//! decides what is selected, how the map is transformed, and which
//! presentation intents to emit. Compiles to WASM behind the `wasm` feature.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │               atlas-core.wasm               │
//! ├─────────────────────────────────────────────┤
//! │  Data            │  View                    │
//! │  - NameResolver  │  - Transform             │
//! │  - Compliance    │  - TransformConstraint   │
//! │  - DataSource    │  - CameraFollow          │
//! ├─────────────────────────────────────────────┤
//! │  Interaction     │  Timing                  │
//! │  - Selection     │  - FrameLoop             │
//! │  - Search/hover  │  - ZoomAnimator          │
//! └─────────────────────────────────────────────┘
//!            │ Renderer + InfoPanel intents
//!            ▼
//!        host surface
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod camera;
pub mod compliance;
pub mod config;
pub mod constraint;
pub mod error;
pub mod feature;
pub mod frame_loop;
pub mod geometry;
pub mod intent;
pub mod map;
pub mod names;
pub mod selection;
pub mod source;
pub mod surface;
pub mod transform;
pub mod transition;
pub mod view;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use camera::{CameraFollow, CameraSettings};
pub use compliance::{status_class, ComplianceCategory, ComplianceModel, ComplianceRecord};
pub use config::MapConfig;
pub use constraint::{TransformConstraint, ZoomExtent, MIN_VISIBLE_FRACTION, SCALE_EPSILON};
pub use error::{AtlasError, AtlasResult};
pub use feature::{CountryFeature, FeatureId, FeatureProperties, ProjectedFeature};
pub use frame_loop::{FrameLoop, FrameTick, LoopToken};
pub use geometry::{Bounds, Point, Viewport};
pub use intent::{Intent, IntentLog};
pub use map::{CountryLabel, SearchHit, TooltipContent, WorldMap};
pub use names::{resolve_properties, NameResolver, UNKNOWN_NAME};
pub use selection::{fit_bounds, Selection, SelectionController};
pub use source::{ComplianceDataset, DataSource, JsonSource, StaticSource};
pub use surface::{BoundsTable, InfoPanel, Projection, Renderer, Surface};
pub use transform::Transform;
pub use transition::{Easing, Transition, ZoomAnimator};
pub use view::{ViewSnapshot, ViewState};

/// Atlas core version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
