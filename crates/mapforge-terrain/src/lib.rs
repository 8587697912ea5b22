//! Procedural 2D tile terrain: biome classification, river carving, decorations,
//! and cave, ruins, forest and lake structure passes.

mod cave;
mod decoration;
mod error;
mod fields;
mod forest;
mod grid;
mod heightmap;
mod lake;
mod pipeline;
mod random;
mod river;
mod ruins;

pub mod biome;

pub use biome::{Biome, BiomeClassifier, BiomeDef, BiomeTable, DecorationTag};
pub use cave::{CaveCarver, CaveOutcome, CavernRegion};
pub use decoration::{ClutterId, ClutterPalette, DecorationDistributor, DecorationFactory};
pub use error::{GridError, TerrainError};
pub use fields::{FieldGenerator, WATER_LEVEL, moisture_noise};
pub use forest::ForestGrower;
pub use grid::{Grid, NEIGHBORS_8};
pub use heightmap::HeightmapSampler;
pub use lake::{LakeCarver, LakeOutcome, LakeSite};
pub use mapforge_config::{TileId, TileTable};
pub use pipeline::{GeneratedMap, StructureReport, TerrainGenerator};
pub use random::{DeterministicRandom, derive_pass_seed, pass_rng};
pub use river::{RiverCarver, RiverNetwork, RiverPath};
pub use ruins::{RUIN_PATTERNS, RuinPattern, RuinsOutcome, RuinsStamper};
