//! End-to-end map generation: heightmap in, tiles and decorations out.

use mapforge_config::{Config, StructureSettings, TileId};
use noise::NoiseFn;
use rand::Rng;
use tracing::{debug, info};

use crate::biome::{Biome, BiomeClassifier};
use crate::cave::CaveCarver;
use crate::decoration::{DecorationDistributor, DecorationFactory};
use crate::error::TerrainError;
use crate::fields::FieldGenerator;
use crate::forest::ForestGrower;
use crate::grid::Grid;
use crate::lake::LakeCarver;
use crate::river::{RiverCarver, RiverNetwork};
use crate::ruins::RuinsStamper;

/// Counts reported by the structure passes.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StructureReport {
    pub caverns: usize,
    pub tunnels: usize,
    pub ruins: usize,
    pub lakes: usize,
}

/// Everything one generation run produces.
#[derive(Clone, Debug, PartialEq)]
pub struct GeneratedMap<D> {
    pub temperature: Grid<f64>,
    pub moisture: Grid<f64>,
    pub rivers: RiverNetwork,
    /// Biomes classified from the river-carved heightmap.
    pub biomes: Grid<Biome>,
    /// Final ground tiles after every enabled structure pass.
    pub tiles: Grid<TileId>,
    pub decorations: Grid<Option<D>>,
    /// Trees from the forest pass, if it ran.
    pub forest: Option<Grid<Option<D>>>,
    pub structures: StructureReport,
}

/// Runs the generation passes in order over a caller-supplied heightmap.
///
/// Built once per configuration; every pass is immutable and can be reused
/// for any number of maps.
pub struct TerrainGenerator {
    seed: u32,
    classifier: BiomeClassifier,
    fields: FieldGenerator,
    rivers: RiverCarver,
    decorations: DecorationDistributor,
    caves: CaveCarver,
    ruins: RuinsStamper,
    forest: ForestGrower,
    lakes: LakeCarver,
    enabled: StructureSettings,
}

impl TerrainGenerator {
    /// # Errors
    ///
    /// [`TerrainError::InvalidConfig`] if two tile names share an id or a
    /// structure template is out of range.
    pub fn new(config: &Config) -> Result<Self, TerrainError> {
        if !config.tiles.is_unambiguous() {
            return Err(TerrainError::InvalidConfig(
                "tile table maps two tile names to the same id".to_string(),
            ));
        }

        let seed = config.map.seed;
        Ok(Self {
            seed,
            classifier: BiomeClassifier::new(&config.tiles, &config.biomes),
            fields: FieldGenerator::new(),
            rivers: RiverCarver::new(seed),
            decorations: DecorationDistributor::new(seed),
            caves: CaveCarver::new(config.caves.clone(), config.tiles.clone())?,
            ruins: RuinsStamper::new(config.ruins.clone(), config.tiles.clone())?,
            forest: ForestGrower::new(config.forest.clone(), &config.tiles)?,
            lakes: LakeCarver::new(config.lake.clone(), config.tiles.clone())?,
            enabled: config.structures.clone(),
        })
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }

    pub fn classifier(&self) -> &BiomeClassifier {
        &self.classifier
    }

    /// Generate a map from `heightmap`, carving rivers into it in place.
    ///
    /// `noise` drives the moisture field, `factory` builds decorations and
    /// trees, and `rng` feeds every structure pass. Pass a seeded RNG to make
    /// the structures reproducible.
    pub fn generate<N, F, R>(
        &self,
        heightmap: &mut Grid<f64>,
        noise: &N,
        factory: &mut F,
        rng: &mut R,
    ) -> Result<GeneratedMap<F::Decoration>, TerrainError>
    where
        N: NoiseFn<f64, 2>,
        F: DecorationFactory,
        R: Rng + ?Sized,
    {
        info!(
            "Generating {}x{} map with seed {}",
            heightmap.width(),
            heightmap.height(),
            self.seed
        );

        let rivers = self.rivers.carve(heightmap);
        let temperature = self.fields.temperature(heightmap);
        let moisture = self.fields.moisture(heightmap, noise);

        let biomes = self
            .classifier
            .classify_map(heightmap, &moisture, self.seed)?;
        let mut tiles = self.classifier.tile_map(&biomes);
        let decorations = self
            .decorations
            .distribute(&biomes, self.classifier.table(), factory);

        let mut structures = StructureReport::default();
        if self.enabled.caves {
            let outcome = self.caves.generate(&tiles, rng)?;
            structures.caverns = outcome.caverns;
            structures.tunnels = outcome.tunnels;
            tiles = outcome.tiles;
        }
        if self.enabled.ruins {
            let outcome = self.ruins.stamp(&tiles, rng);
            structures.ruins = outcome.placed;
            tiles = outcome.tiles;
        }
        if self.enabled.lakes {
            let outcome = self.lakes.carve(&tiles, rng);
            structures.lakes = outcome.lakes.len();
            tiles = outcome.tiles;
        }
        let forest = self
            .enabled
            .forests
            .then(|| self.forest.grow(&tiles, factory, rng));

        debug!("Structures: {:?}", structures);
        info!(
            "Map generated: {} rivers, {} caverns, {} ruins, {} lakes",
            rivers.rivers.len(),
            structures.caverns,
            structures.ruins,
            structures.lakes
        );

        Ok(GeneratedMap {
            temperature,
            moisture,
            rivers,
            biomes,
            tiles,
            decorations,
            forest,
            structures,
        })
    }
}
