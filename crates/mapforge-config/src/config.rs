//! Configuration structs with sensible defaults and RON persistence.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::tiles::TileTable;

/// Top-level generation configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Map dimensions, seed, and heightmap noise settings.
    pub map: MapConfig,
    /// Biome classification settings.
    pub biomes: BiomeSettings,
    /// Tile ids from the item table.
    pub tiles: TileTable,
    /// Cave template.
    pub caves: CaveSettings,
    /// Ruins template.
    pub ruins: RuinsSettings,
    /// Forest template.
    pub forest: ForestSettings,
    /// Lake template.
    pub lake: LakeSettings,
    /// Which structure passes run, and how they draw randomness.
    pub structures: StructureSettings,
    /// Debug/development settings.
    pub debug: DebugConfig,
}

/// Map dimensions and the heightmap noise that seeds the pipeline.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MapConfig {
    /// Map width in tiles.
    pub width: u32,
    /// Map height in tiles.
    pub height: u32,
    /// World seed. Keys every deterministic random value.
    pub seed: u32,
    /// Number of fBm octaves in the heightmap noise.
    pub octaves: u32,
    /// Frequency of the first octave, in cycles per tile.
    pub base_frequency: f64,
    /// Amplitude multiplier between octaves.
    pub persistence: f64,
    /// Frequency multiplier between octaves.
    pub lacunarity: f64,
}

/// Biome classification parameters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BiomeSettings {
    /// Scale applied to the positional jitter before it perturbs elevation and
    /// moisture. 0 disables jitter.
    pub randomness: f64,
    /// Moisture scale. Carried for compatibility with existing configs.
    pub moisture_scale: f64,
    /// Height influence. Carried for compatibility with existing configs.
    pub height_influence: f64,
    /// Biome blending width. Carried for compatibility with existing configs.
    pub biome_blending: f64,
    /// River chance. Carried for compatibility with existing configs.
    pub river_chance: f64,
}

/// Cellular-automaton cave template.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CaveSettings {
    /// Probability that a cell starts filled.
    pub frequency: f64,
    /// Automaton iterations.
    pub iterations: u32,
    /// Smallest cavern region (in cells) that is carved.
    pub min_size: usize,
    /// Largest cavern region (in cells) that is carved.
    pub max_size: usize,
    /// Chance per carved cell of eroding its mountain neighbours.
    pub detail_chance: f64,
    /// Chance per mountain neighbour of turning to stone once eroding.
    pub erosion_chance: f64,
    /// Maximum centroid distance for a tunnel between two caverns.
    pub tunnel_distance: f64,
    /// Chance of carving a tunnel for each close-enough pair.
    pub tunnel_chance: f64,
}

/// Ruins template.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RuinsSettings {
    /// Placement attempts. `None` derives `sqrt(width * height) / 16`.
    pub count: Option<u32>,
    /// Minimum distance, in tiles, between a ruin and the map edge.
    pub edge_margin: u32,
    /// A site is rejected unless more than this fraction of it is grass.
    pub min_grass_fraction: f64,
    /// Chance for a stamped wall tile to be weathered into gravel.
    pub weathering_chance: f64,
    /// Chance for a grass tile on the border ring to become gravel.
    pub border_erosion_chance: f64,
}

/// Forest template.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ForestSettings {
    /// Seed trees per hundred grass tiles.
    pub density: f64,
    /// Probability that an eligible cluster position receives a tree.
    pub clustering: f64,
    /// Smallest cluster (inclusive).
    pub min_size: u32,
    /// Largest cluster (exclusive).
    pub max_size: u32,
}

/// Lake template.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LakeSettings {
    /// Lake attempts. `None` derives `sqrt(width * height) / 32`.
    pub count: Option<u32>,
    /// Smallest lake diameter (inclusive).
    pub min_size: u32,
    /// Largest lake diameter (exclusive).
    pub max_size: u32,
    /// Edge noise, as a fraction of the lake diameter.
    pub roughness: f64,
    /// Chance for a shallow edge tile to become sand instead of water.
    pub shore_sand_chance: f64,
    /// An attempt is abandoned when the surrounding window holds more water tiles than this.
    pub max_nearby_water: usize,
}

/// Enables structure passes and picks their randomness source.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StructureSettings {
    /// Run the cave pass.
    pub caves: bool,
    /// Run the ruins pass.
    pub ruins: bool,
    /// Run the forest pass.
    pub forests: bool,
    /// Run the lake pass.
    pub lakes: bool,
    /// Derive the structure RNG from the map seed instead of the thread RNG.
    pub reproducible: bool,
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level override (e.g., "debug", "info", "warn").
    pub log_level: String,
    /// Print an ASCII preview of the finished map.
    pub preview: bool,
}

// --- Default implementations ---

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            width: 256,
            height: 256,
            seed: 1337,
            octaves: 6,
            base_frequency: 0.01,
            persistence: 0.5,
            lacunarity: 2.0,
        }
    }
}

impl Default for BiomeSettings {
    fn default() -> Self {
        Self {
            randomness: 0.2,
            moisture_scale: 1.0,
            height_influence: 1.0,
            biome_blending: 0.15,
            river_chance: 0.03,
        }
    }
}

impl Default for CaveSettings {
    fn default() -> Self {
        Self {
            frequency: 0.45,
            iterations: 5,
            min_size: 5,
            max_size: 30,
            detail_chance: 0.2,
            erosion_chance: 0.3,
            tunnel_distance: 30.0,
            tunnel_chance: 0.3,
        }
    }
}

impl Default for RuinsSettings {
    fn default() -> Self {
        Self {
            count: None,
            edge_margin: 5,
            min_grass_fraction: 0.6,
            weathering_chance: 0.3,
            border_erosion_chance: 0.2,
        }
    }
}

impl Default for ForestSettings {
    fn default() -> Self {
        Self {
            density: 0.4,
            clustering: 0.7,
            min_size: 20,
            max_size: 100,
        }
    }
}

impl Default for LakeSettings {
    fn default() -> Self {
        Self {
            count: None,
            min_size: 10,
            max_size: 40,
            roughness: 0.3,
            shore_sand_chance: 0.7,
            max_nearby_water: 10,
        }
    }
}

impl Default for StructureSettings {
    fn default() -> Self {
        Self {
            caves: true,
            ruins: true,
            forests: true,
            lakes: true,
            reproducible: false,
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            preview: false,
        }
    }
}

/// Platform config directory for mapforge (e.g. `~/.config/mapforge`).
///
/// Falls back to the working directory when the platform reports none.
pub fn default_config_dir() -> PathBuf {
    dirs::config_dir()
        .map(|dir| dir.join("mapforge"))
        .unwrap_or_else(|| PathBuf::from("."))
}

// --- Load / Save / Reload ---

impl Config {
    /// Load config from the given directory, or create a default config file.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join("config.ron");

        if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
            let config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;
            log::info!("Loaded config from {}", config_path.display());
            Ok(config)
        } else {
            let config = Config::default();
            config.save(config_dir)?;
            log::info!("Created default config at {}", config_path.display());
            Ok(config)
        }
    }

    /// Save config to the given directory as `config.ron`.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        std::fs::create_dir_all(config_dir).map_err(ConfigError::WriteError)?;

        let config_path = config_dir.join("config.ron");
        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(3)
            .separate_tuple_members(true)
            .enumerate_arrays(false);

        let serialized =
            ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::SerializeError)?;

        std::fs::write(&config_path, serialized).map_err(ConfigError::WriteError)?;
        Ok(())
    }

    /// Hot-reload: returns `Some(new_config)` if the file changed, `None` otherwise.
    pub fn reload(&self, config_dir: &Path) -> Result<Option<Self>, ConfigError> {
        let config_path = config_dir.join("config.ron");
        let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
        let new_config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;

        if &new_config != self {
            log::info!("Config reloaded with changes");
            Ok(Some(new_config))
        } else {
            Ok(None)
        }
    }
}
