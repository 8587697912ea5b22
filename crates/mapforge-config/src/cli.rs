//! Command-line argument parsing for mapforge.

use std::path::PathBuf;

use clap::Parser;

use crate::Config;

/// mapforge command-line arguments.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug)]
#[command(name = "mapforge", about = "Procedural tile map generator")]
pub struct CliArgs {
    /// Map width in tiles.
    #[arg(long)]
    pub width: Option<u32>,

    /// Map height in tiles.
    #[arg(long)]
    pub height: Option<u32>,

    /// World seed.
    #[arg(long)]
    pub seed: Option<u32>,

    /// Skip the cave pass.
    #[arg(long)]
    pub no_caves: bool,

    /// Skip the ruins pass.
    #[arg(long)]
    pub no_ruins: bool,

    /// Skip the forest pass.
    #[arg(long)]
    pub no_forests: bool,

    /// Skip the lake pass.
    #[arg(long)]
    pub no_lakes: bool,

    /// Seed the structure passes from the world seed.
    #[arg(long)]
    pub reproducible: bool,

    /// Print an ASCII preview of the generated map.
    #[arg(long)]
    pub preview: bool,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    ///
    /// Boolean flags only ever switch behaviour on or passes off, so an absent
    /// flag leaves the file setting untouched.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(w) = args.width {
            self.map.width = w;
        }
        if let Some(h) = args.height {
            self.map.height = h;
        }
        if let Some(seed) = args.seed {
            self.map.seed = seed;
        }
        if args.no_caves {
            self.structures.caves = false;
        }
        if args.no_ruins {
            self.structures.ruins = false;
        }
        if args.no_forests {
            self.structures.forests = false;
        }
        if args.no_lakes {
            self.structures.lakes = false;
        }
        if args.reproducible {
            self.structures.reproducible = true;
        }
        if args.preview {
            self.debug.preview = true;
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_args() -> CliArgs {
        CliArgs {
            width: None,
            height: None,
            seed: None,
            no_caves: false,
            no_ruins: false,
            no_forests: false,
            no_lakes: false,
            reproducible: false,
            preview: false,
            log_level: None,
            config: None,
        }
    }

    #[test]
    fn test_cli_override() {
        let mut config = Config::default();
        let args = CliArgs {
            width: Some(128),
            seed: Some(7),
            no_caves: true,
            ..no_args()
        };
        config.apply_cli_overrides(&args);
        assert_eq!(config.map.width, 128);
        assert_eq!(config.map.seed, 7);
        assert!(!config.structures.caves);
        // Non-overridden fields retain defaults
        assert_eq!(config.map.height, 256);
        assert!(config.structures.ruins);
    }

    #[test]
    fn test_cli_no_override() {
        let original = Config::default();
        let mut config = Config::default();
        config.apply_cli_overrides(&no_args());
        assert_eq!(config, original);
    }

    #[test]
    fn test_cli_parses_flags() {
        let args = CliArgs::parse_from([
            "mapforge",
            "--width",
            "64",
            "--no-lakes",
            "--reproducible",
            "--log-level",
            "debug",
        ]);
        assert_eq!(args.width, Some(64));
        assert!(args.no_lakes);
        assert!(args.reproducible);
        assert_eq!(args.log_level.as_deref(), Some("debug"));
    }
}
