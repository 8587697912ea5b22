//! mapforge: generate a procedural tile map from the command line.
//!
//! Loads `config.ron` (creating it on first run), applies CLI overrides,
//! runs the full generation pipeline and logs what was produced.
//!
//! Run with: `cargo run -p mapforge-cli -- --seed 42 --preview`

mod preview;

use std::collections::BTreeMap;
use std::process::ExitCode;
use std::time::Instant;

use clap::Parser;
use mapforge_config::{CliArgs, Config, default_config_dir};
use mapforge_terrain::{
    Biome, ClutterId, ClutterPalette, GeneratedMap, HeightmapSampler, TerrainError,
    TerrainGenerator, moisture_noise, pass_rng,
};
use rand::RngCore;
use tracing::{error, info};

fn main() -> ExitCode {
    let args = CliArgs::parse();
    let config_dir = args.config.clone().unwrap_or_else(default_config_dir);

    let mut config = match Config::load_or_create(&config_dir) {
        Ok(config) => config,
        Err(e) => {
            mapforge_log::init_logging(None, false, None);
            error!("Failed to load config from {}: {e}", config_dir.display());
            return ExitCode::FAILURE;
        }
    };
    config.apply_cli_overrides(&args);

    mapforge_log::init_logging(
        Some(&config_dir.join("logs")),
        cfg!(debug_assertions),
        Some(&config),
    );

    match run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Map generation failed: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Structure randomness: pinned to the world seed, or fresh every run.
fn rng_for(config: &Config, pass: &str) -> Box<dyn RngCore> {
    if config.structures.reproducible {
        Box::new(pass_rng(config.map.seed, pass))
    } else {
        Box::new(rand::rng())
    }
}

fn run(config: &Config) -> Result<(), TerrainError> {
    let (width, height) = (config.map.width as usize, config.map.height as usize);
    let start = Instant::now();

    let generator = TerrainGenerator::new(config)?;
    let mut heightmap = HeightmapSampler::new(&config.map).generate(width, height)?;
    let noise = moisture_noise(config.map.seed);
    let mut palette = ClutterPalette::new(rng_for(config, "clutter"));
    let mut rng = rng_for(config, "structures");

    let map = generator.generate(&mut heightmap, &noise, &mut palette, &mut *rng)?;

    info!(
        "Generated {}x{} map in {} ms",
        width,
        height,
        start.elapsed().as_millis()
    );
    log_stats(&map);

    if config.debug.preview {
        print!(
            "{}",
            preview::render(&map, &config.tiles, preview::MAX_COLUMNS)
        );
    }
    Ok(())
}

fn log_stats(map: &GeneratedMap<ClutterId>) {
    let total = map.biomes.len() as f64;
    let mut counts: BTreeMap<Biome, usize> = BTreeMap::new();
    for &biome in map.biomes.iter() {
        *counts.entry(biome).or_default() += 1;
    }
    for (biome, count) in counts {
        info!(
            "  {:<9} {:>7} tiles ({:.1}%)",
            biome.name(),
            count,
            count as f64 / total * 100.0
        );
    }

    let decorations = map.decorations.iter().flatten().count();
    let trees = map
        .forest
        .as_ref()
        .map_or(0, |forest| forest.iter().flatten().count());
    info!(
        "Rivers: {} ({} cells) | Decorations: {} | Forest trees: {}",
        map.rivers.rivers.len(),
        map.rivers.river_cells.len(),
        decorations,
        trees
    );
    info!(
        "Caverns: {} ({} tunnels) | Ruins: {} | Lakes: {}",
        map.structures.caverns, map.structures.tunnels, map.structures.ruins, map.structures.lakes
    );
}
