//! Point decorations scattered over the biome map.

use rand::Rng;
use tracing::debug;

use crate::biome::{Biome, BiomeTable, DecorationTag};
use crate::error::TerrainError;
use crate::grid::Grid;
use crate::random::DeterministicRandom;

const TREE_THRESHOLD: f64 = 0.05;
const ROCK_THRESHOLD: f64 = 0.04;
const SHELL_THRESHOLD: f64 = 0.03;

/// Produces concrete decoration objects on demand.
///
/// Implementations may be nondeterministic; the distributor only decides
/// where decorations go.
pub trait DecorationFactory {
    type Decoration;

    fn random_tree(&mut self) -> Self::Decoration;

    /// A rock for rocky ground.
    fn random_sandstone(&mut self) -> Self::Decoration;

    fn random_shell(&mut self) -> Self::Decoration;
}

/// Item id of a placed clutter object.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClutterId(pub u16);

const DEFAULT_TREES: [u16; 8] = [2700, 2701, 2702, 2703, 2705, 2706, 2707, 2708];
const DEFAULT_SANDSTONES: [u16; 4] = [1285, 1336, 1337, 1338];
const DEFAULT_SHELLS: [u16; 3] = [2814, 2815, 2816];

/// A [`DecorationFactory`] that draws item ids uniformly from fixed lists.
#[derive(Clone, Debug)]
pub struct ClutterPalette<R> {
    rng: R,
    trees: Vec<ClutterId>,
    sandstones: Vec<ClutterId>,
    shells: Vec<ClutterId>,
}

impl<R: Rng> ClutterPalette<R> {
    /// A palette over the built-in item ids.
    pub fn new(rng: R) -> Self {
        let ids = |list: &[u16]| -> Vec<ClutterId> {
            list.iter().copied().map(ClutterId).collect()
        };
        Self {
            rng,
            trees: ids(&DEFAULT_TREES),
            sandstones: ids(&DEFAULT_SANDSTONES),
            shells: ids(&DEFAULT_SHELLS),
        }
    }

    /// A palette over caller-supplied item ids.
    ///
    /// # Errors
    ///
    /// [`TerrainError::InvalidConfig`] if any list is empty.
    pub fn with_items(
        rng: R,
        trees: Vec<ClutterId>,
        sandstones: Vec<ClutterId>,
        shells: Vec<ClutterId>,
    ) -> Result<Self, TerrainError> {
        let lists = [
            ("trees", &trees),
            ("sandstones", &sandstones),
            ("shells", &shells),
        ];
        for (name, list) in lists {
            if list.is_empty() {
                return Err(TerrainError::InvalidConfig(format!(
                    "clutter palette has no {name}"
                )));
            }
        }
        Ok(Self {
            rng,
            trees,
            sandstones,
            shells,
        })
    }
}

fn pick<R: Rng>(rng: &mut R, list: &[ClutterId]) -> ClutterId {
    list[rng.random_range(0..list.len())]
}

impl<R: Rng> DecorationFactory for ClutterPalette<R> {
    type Decoration = ClutterId;

    fn random_tree(&mut self) -> ClutterId {
        pick(&mut self.rng, &self.trees)
    }

    fn random_sandstone(&mut self) -> ClutterId {
        pick(&mut self.rng, &self.sandstones)
    }

    fn random_shell(&mut self) -> ClutterId {
        pick(&mut self.rng, &self.shells)
    }
}

/// Decides, per cell, whether a biome gets a tree, a rock, a shell or nothing.
#[derive(Clone, Copy, Debug)]
pub struct DecorationDistributor {
    random: DeterministicRandom,
}

impl DecorationDistributor {
    pub fn new(seed: u32) -> Self {
        Self {
            random: DeterministicRandom::new(seed),
        }
    }

    /// Scatter decorations over `biomes`. At most one per cell; the positions
    /// depend only on the biome map and the seed.
    pub fn distribute<F: DecorationFactory>(
        &self,
        biomes: &Grid<Biome>,
        table: &BiomeTable,
        factory: &mut F,
    ) -> Grid<Option<F::Decoration>> {
        let sand = table.tiles().sand;
        let mut placed = 0usize;
        let decorations = biomes.map(|x, y, &biome| {
            let def = table.get(biome);
            let value = self.random.value(x as i64, y as i64);
            let decoration = if def.has_decoration(DecorationTag::Trees) && value < TREE_THRESHOLD
            {
                Some(factory.random_tree())
            } else if def.has_decoration(DecorationTag::Rocks) && value < ROCK_THRESHOLD {
                Some(factory.random_sandstone())
            } else if def.tile == sand && value < SHELL_THRESHOLD {
                Some(factory.random_shell())
            } else {
                None
            };
            placed += usize::from(decoration.is_some());
            decoration
        });
        debug!("Placed {} decorations", placed);
        decorations
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::pass_rng;
    use mapforge_config::TileTable;

    /// Records which factory method produced each decoration.
    struct Tally;

    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    enum Kind {
        Tree,
        Rock,
        Shell,
    }

    impl DecorationFactory for Tally {
        type Decoration = Kind;

        fn random_tree(&mut self) -> Kind {
            Kind::Tree
        }

        fn random_sandstone(&mut self) -> Kind {
            Kind::Rock
        }

        fn random_shell(&mut self) -> Kind {
            Kind::Shell
        }
    }

    fn table() -> BiomeTable {
        BiomeTable::new(&TileTable::default())
    }

    fn scatter(biome: Biome, seed: u32) -> Grid<Option<Kind>> {
        let biomes = Grid::filled(64, 64, biome).unwrap();
        DecorationDistributor::new(seed).distribute(&biomes, &table(), &mut Tally)
    }

    #[test]
    fn test_forest_gets_only_trees_below_threshold() {
        let seed = 11;
        let random = DeterministicRandom::new(seed);
        let decorations = scatter(Biome::Forest, seed);
        for ((x, y), decoration) in decorations.enumerate() {
            let expected = (random.value(x as i64, y as i64) < 0.05).then_some(Kind::Tree);
            assert_eq!(*decoration, expected, "at ({x}, {y})");
        }
        assert!(decorations.iter().any(Option::is_some));
    }

    #[test]
    fn test_rocky_gets_rocks_beach_gets_shells() {
        let rocky = scatter(Biome::Rocky, 5);
        assert!(rocky.iter().flatten().all(|&k| k == Kind::Rock));
        assert!(rocky.iter().any(Option::is_some));

        let beach = scatter(Biome::Beach, 5);
        assert!(beach.iter().flatten().all(|&k| k == Kind::Shell));
        assert!(beach.iter().any(Option::is_some));
    }

    #[test]
    fn test_bare_biomes_stay_empty() {
        for biome in [Biome::Ocean, Biome::Grassland, Biome::Mountain, Biome::Snow] {
            assert!(scatter(biome, 3).iter().all(Option::is_none), "{biome:?}");
        }
    }

    #[test]
    fn test_distribute_deterministic() {
        assert_eq!(scatter(Biome::Forest, 77), scatter(Biome::Forest, 77));
    }

    #[test]
    fn test_palette_draws_from_lists() {
        let mut palette = ClutterPalette::new(pass_rng(1, "clutter"));
        for _ in 0..50 {
            assert!(DEFAULT_TREES.contains(&palette.random_tree().0));
            assert!(DEFAULT_SANDSTONES.contains(&palette.random_sandstone().0));
            assert!(DEFAULT_SHELLS.contains(&palette.random_shell().0));
        }
    }

    #[test]
    fn test_palette_rejects_empty_list() {
        let result = ClutterPalette::with_items(
            pass_rng(1, "clutter"),
            vec![ClutterId(1)],
            vec![],
            vec![ClutterId(3)],
        );
        assert!(matches!(result, Err(TerrainError::InvalidConfig(_))));
    }
}
