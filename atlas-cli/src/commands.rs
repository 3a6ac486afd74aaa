//! Command execution.

use std::fmt::Write as _;
use std::time::Duration;

use atlas_core::{
    status_class, AtlasError, BoundsTable, FeatureId, ViewSnapshot, Viewport, WorldMap,
};
use serde::Serialize;

use crate::console::ConsoleSurface;
use crate::error::{CliError, CliResult};
use crate::source::{load_config, load_features, JsonFileSource};
use crate::ticker::Ticker;
use crate::{CliArgs, Command};

/// Final state after `simulate`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct SimulationReport {
    frames_rendered: u32,
    selected: Option<String>,
    info_panel: Option<String>,
    view: ViewSnapshot,
}

/// A loaded map plus the inputs it came from.
#[derive(Debug)]
pub struct Session {
    map: WorldMap<BoundsTable, ConsoleSurface>,
    has_features: bool,
    has_data: bool,
}

impl Session {
    /// Load configuration, features and data named by `args`.
    ///
    /// A dataset that fails to load degrades to the fallback model, as in
    /// the browser.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration or feature file is unusable.
    pub async fn open(args: &CliArgs) -> CliResult<Self> {
        let config = load_config(args.config.as_deref()).await?;
        let projected = match &args.features {
            Some(path) => load_features(path).await?,
            None => Vec::new(),
        };

        let mut map = WorldMap::new(
            config,
            Viewport::new(args.width, args.height),
            BoundsTable::from_projected(&projected),
            ConsoleSurface::new(),
        );
        let has_features = args.features.is_some();
        map.set_features(projected.into_iter().map(|p| p.feature).collect());

        let has_data = match &args.data {
            Some(path) => {
                map.load_from(&JsonFileSource::new(path)).await;
                true
            }
            None => false,
        };

        Ok(Self {
            map,
            has_features,
            has_data,
        })
    }

    /// The underlying map.
    #[must_use]
    pub fn map(&self) -> &WorldMap<BoundsTable, ConsoleSurface> {
        &self.map
    }

    /// Run `command` and return its printable output.
    ///
    /// # Errors
    ///
    /// Returns an error if a required input is missing or the command fails.
    pub async fn execute(&mut self, command: &Command) -> CliResult<String> {
        match command {
            Command::Resolve => self.resolve(),
            Command::Lookup { name } => self.lookup(name),
            Command::Legend => self.legend(),
            Command::Search { query } => self.search(query),
            Command::Simulate {
                select,
                pointer,
                frames,
                fps,
            } => {
                self.simulate(select.as_deref(), *pointer, *frames, *fps)
                    .await
            }
        }
    }

    fn require_features(&self) -> CliResult<()> {
        if self.has_features {
            Ok(())
        } else {
            Err(CliError::MissingInput("--features"))
        }
    }

    fn require_data(&self) -> CliResult<()> {
        if self.has_data {
            Ok(())
        } else {
            Err(CliError::MissingInput("--data"))
        }
    }

    fn resolve(&self) -> CliResult<String> {
        self.require_features()?;
        let mut out = String::new();
        for feature in self.map.features() {
            let name = self.map.name_of(&feature.id).unwrap_or_default();
            let status = self.map.record_for(&feature.id).map(|r| r.status.as_str());
            let _ = writeln!(out, "{}\t{name}\t{}", feature.id, status_class(status));
        }
        Ok(out)
    }

    fn lookup(&self, name: &str) -> CliResult<String> {
        self.require_data()?;
        let map = &self.map;
        match map.resolver().lookup_record(map.model(), name) {
            Some(record) => {
                serde_json::to_string_pretty(record).map_err(|e| AtlasError::from(e).into())
            }
            None => Ok(format!("{name}: no compliance data")),
        }
    }

    fn legend(&self) -> CliResult<String> {
        self.require_data()?;
        let mut out = String::new();
        for category in self.map.model().legend() {
            let _ = writeln!(
                out,
                "{}\t{}\t{}",
                category.status, category.color, category.label
            );
        }
        Ok(out)
    }

    fn search(&self, query: &str) -> CliResult<String> {
        self.require_features()?;
        let mut out = String::new();
        for hit in self.map.search(query) {
            let _ = writeln!(out, "{}\t{}", hit.id, hit.name);
        }
        Ok(out)
    }

    async fn simulate(
        &mut self,
        select: Option<&str>,
        pointer: Option<(f64, f64)>,
        frames: u32,
        fps: u32,
    ) -> CliResult<String> {
        if let Some(id) = select {
            self.map.click(&FeatureId::new(id), Duration::ZERO)?;
        }
        if let Some((x, y)) = pointer {
            self.map.pointer_moved(x, y);
        }

        let token = self.map.start();
        let mut ticker = Ticker::with_fps(fps);
        let mut rendered = 0;
        if let Some(mut ticks) = ticker.start() {
            while rendered < frames {
                let Some(elapsed) = ticks.recv().await else {
                    break;
                };
                if self.map.frame(token, elapsed).is_some() {
                    rendered += 1;
                }
            }
        }
        ticker.stop();
        self.map.stop();
        tracing::info!(frames = rendered, "simulation finished");

        let report = SimulationReport {
            frames_rendered: rendered,
            selected: self
                .map
                .selection()
                .selected()
                .map(|id| id.as_str().to_string()),
            info_panel: self.map.surface().panel().map(str::to_string),
            view: self.map.snapshot(),
        };
        serde_json::to_string_pretty(&report).map_err(|e| AtlasError::from(e).into())
    }
}

/// Open a session for `args` and run its command.
///
/// # Errors
///
/// Returns an error if inputs cannot be loaded or the command fails.
pub async fn run(args: &CliArgs) -> CliResult<String> {
    let mut session = Session::open(args).await?;
    session.execute(&args.command).await
}
