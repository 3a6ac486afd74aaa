//! # Compliance Atlas CLI
//!
//! Headless native host for the atlas engine. Loads projected features and
//! a compliance dataset from JSON files, answers queries against them and
//! can run the animation loop on a tokio interval to simulate a session.
//!
//! ## Usage
//!
//! ```bash
//! compliance-atlas --features world.json --data compliance.json legend
//! compliance-atlas --features world.json --data compliance.json lookup USA
//! compliance-atlas --features world.json --data compliance.json simulate --select 840 --frames 90
//! ```
//!
//! ## Architecture
//!
//! - `CliArgs` - Command-line arguments parsed with clap
//! - `JsonFileSource` - `DataSource` reading a dataset from disk
//! - `ConsoleSurface` - `Renderer` + `InfoPanel` that logs and keeps final state
//! - `Ticker` - cancellable tokio interval driving `WorldMap::frame`

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]

mod commands;
mod console;
mod error;
mod source;
mod ticker;

pub use commands::{run, Session};
pub use console::ConsoleSurface;
pub use error::{CliError, CliResult};
pub use source::{load_config, load_features, JsonFileSource};
pub use ticker::Ticker;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Command-line arguments for compliance-atlas.
#[derive(Debug, Clone, Parser)]
#[command(name = "compliance-atlas")]
#[command(about = "Query and simulate the Compliance Atlas world map")]
#[command(version)]
pub struct CliArgs {
    /// JSON array of projected features
    #[arg(long, env = "ATLAS_FEATURES")]
    pub features: Option<PathBuf>,

    /// Compliance dataset (categories + countries) as JSON
    #[arg(long, env = "ATLAS_DATA")]
    pub data: Option<PathBuf>,

    /// Map configuration as JSON
    #[arg(long, env = "ATLAS_CONFIG")]
    pub config: Option<PathBuf>,

    /// Viewport width in pixels
    #[arg(long, default_value = "960")]
    pub width: f64,

    /// Viewport height in pixels
    #[arg(long, default_value = "600")]
    pub height: f64,

    /// What to do
    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands.
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Print each feature's id, resolved name and status
    Resolve,

    /// Print the compliance record for a country name (aliases allowed)
    Lookup {
        /// Country name
        name: String,
    },

    /// Print the status legend in load order
    Legend,

    /// Search feature names
    Search {
        /// Query text
        query: String,
    },

    /// Run the animation loop and print the final view
    Simulate {
        /// Feature id to click before the loop starts
        #[arg(long)]
        select: Option<String>,

        /// Pointer position as `x,y` in viewport pixels
        #[arg(long, value_parser = parse_point)]
        pointer: Option<(f64, f64)>,

        /// Number of frames to run
        #[arg(long, default_value = "60")]
        frames: u32,

        /// Frames per second
        #[arg(long, default_value = "60")]
        fps: u32,
    },
}

fn parse_point(s: &str) -> Result<(f64, f64), String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected x,y but got {s:?}"))?;
    let x = x.trim().parse().map_err(|e| format!("bad x: {e}"))?;
    let y = y.trim().parse().map_err(|e| format!("bad y: {e}"))?;
    Ok((x, y))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_subcommand_and_globals() {
        let args = CliArgs::parse_from([
            "compliance-atlas",
            "--features",
            "world.json",
            "--width",
            "800",
            "lookup",
            "USA",
        ]);
        assert_eq!(args.features, Some(PathBuf::from("world.json")));
        assert!((args.width - 800.0).abs() < f64::EPSILON);
        assert!(matches!(args.command, Command::Lookup { ref name } if name == "USA"));
    }

    #[test]
    fn parses_simulate_pointer() {
        let args = CliArgs::parse_from([
            "compliance-atlas",
            "simulate",
            "--pointer",
            "10, 20",
            "--frames",
            "3",
        ]);
        match args.command {
            Command::Simulate {
                pointer, frames, ..
            } => {
                assert_eq!(pointer, Some((10.0, 20.0)));
                assert_eq!(frames, 3);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn rejects_malformed_pointer() {
        assert!(parse_point("10").is_err());
        assert!(parse_point("a,1").is_err());
    }
}
