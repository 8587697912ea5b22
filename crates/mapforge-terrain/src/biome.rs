//! Biome system: the fixed biome table and the Whittaker-style classifier.
//!
//! Assigns biomes to map cells from elevation and moisture, with a seeded
//! positional jitter that roughens the borders between bands.

mod classifier;
mod def;
mod table;

pub use classifier::BiomeClassifier;
pub use def::{Biome, BiomeDef, DecorationTag};
pub use table::BiomeTable;
