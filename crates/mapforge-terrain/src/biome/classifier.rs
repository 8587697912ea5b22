//! Biome classifier: elevation and moisture bands with a seeded positional jitter.

use mapforge_config::{BiomeSettings, TileId, TileTable};
use tracing::warn;

use super::{Biome, BiomeDef, BiomeTable};
use crate::error::TerrainError;
use crate::grid::Grid;
use crate::random::DeterministicRandom;

/// Fraction of the scaled jitter added to both elevation and moisture.
const JITTER_WEIGHT: f64 = 0.1;

/// Assigns a [`BiomeDef`] to a cell from its elevation and moisture.
///
/// Bands are tested in order, first match wins:
///
/// | elevation | moisture | biome |
/// |---|---|---|
/// | `< -0.2` | any | OCEAN |
/// | `< 0.0` | any | BEACH |
/// | `> 0.6` | `> 0.3` | SNOW |
/// | `> 0.6` | otherwise | MOUNTAIN |
/// | `> 0.4` | any | ROCKY |
/// | otherwise | `> 0.5` | FOREST |
/// | otherwise | otherwise | GRASSLAND |
#[derive(Clone, Debug)]
pub struct BiomeClassifier {
    table: BiomeTable,
    randomness: f64,
}

impl BiomeClassifier {
    pub fn new(tiles: &TileTable, settings: &BiomeSettings) -> Self {
        let ignored = ignored_settings(settings);
        if !ignored.is_empty() {
            warn!(
                "Biome settings {} have no effect on classification",
                ignored.join(", ")
            );
        }
        Self {
            table: BiomeTable::new(tiles),
            randomness: settings.randomness,
        }
    }

    pub fn table(&self) -> &BiomeTable {
        &self.table
    }

    /// Classify one cell. Inputs are not clamped; the result is always one of
    /// the seven table entries.
    pub fn classify(
        &self,
        elevation: f64,
        moisture: f64,
        x: usize,
        y: usize,
        seed: u32,
    ) -> &BiomeDef {
        let jitter = DeterministicRandom::new(seed).value(x as i64, y as i64) * self.randomness;
        let elevation = elevation + jitter * JITTER_WEIGHT;
        let moisture = moisture + jitter * JITTER_WEIGHT;
        self.table.get(band(elevation, moisture))
    }

    /// Classify every cell of a heightmap against the matching moisture map.
    ///
    /// # Errors
    ///
    /// [`TerrainError::DimensionMismatch`] if the two grids differ in size.
    pub fn classify_map(
        &self,
        heightmap: &Grid<f64>,
        moisture: &Grid<f64>,
        seed: u32,
    ) -> Result<Grid<Biome>, TerrainError> {
        TerrainError::check_same_shape(heightmap, moisture)?;
        Ok(heightmap.map(|x, y, &elevation| {
            self.classify(elevation, moisture[(x, y)], x, y, seed).biome
        }))
    }

    /// Paint each biome's ground tile.
    pub fn tile_map(&self, biomes: &Grid<Biome>) -> Grid<TileId> {
        biomes.map(|_, _, &biome| self.table.get(biome).tile)
    }
}

fn band(elevation: f64, moisture: f64) -> Biome {
    if elevation < -0.2 {
        Biome::Ocean
    } else if elevation < 0.0 {
        Biome::Beach
    } else if elevation > 0.6 {
        if moisture > 0.3 {
            Biome::Snow
        } else {
            Biome::Mountain
        }
    } else if elevation > 0.4 {
        Biome::Rocky
    } else if moisture > 0.5 {
        Biome::Forest
    } else {
        Biome::Grassland
    }
}

/// Settings that are kept in config files but do not drive classification,
/// listed when they differ from their defaults.
fn ignored_settings(settings: &BiomeSettings) -> Vec<&'static str> {
    let defaults = BiomeSettings::default();
    [
        ("moisture_scale", settings.moisture_scale, defaults.moisture_scale),
        ("height_influence", settings.height_influence, defaults.height_influence),
        ("biome_blending", settings.biome_blending, defaults.biome_blending),
        ("river_chance", settings.river_chance, defaults.river_chance),
    ]
    .into_iter()
    .filter(|&(_, value, default)| value != default)
    .map(|(name, _, _)| name)
    .collect()
}
