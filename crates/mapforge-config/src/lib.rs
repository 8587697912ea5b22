//! Configuration system for mapforge.
//!
//! Holds every generation tunable as an immutable record that persists to disk
//! as RON. Supports CLI overrides via clap and hot-reload detection, and keeps
//! the tile table (the opaque item ids the generators paint with).

mod cli;
mod config;
mod error;
mod tiles;

pub use cli::CliArgs;
pub use config::{
    BiomeSettings, CaveSettings, Config, DebugConfig, ForestSettings, LakeSettings, MapConfig,
    RuinsSettings, StructureSettings, default_config_dir,
};
pub use error::ConfigError;
pub use tiles::{TileId, TileTable};
