//! Forests grown as clusters around randomly seeded trees.

use std::f64::consts::TAU;

use mapforge_config::{ForestSettings, TileId, TileTable};
use rand::Rng;
use tracing::debug;

use crate::decoration::DecorationFactory;
use crate::error::TerrainError;
use crate::grid::Grid;
use crate::random::chance;

/// Seed trees per grass tile, before scaling by density.
const SEEDS_PER_GRASS_TILE: f64 = 0.01;
/// Cluster members land within `sqrt(size) * SPREAD` of their seed.
const SPREAD: f64 = 1.5;

#[derive(Clone, Debug)]
pub struct ForestGrower {
    settings: ForestSettings,
    grass: TileId,
}

impl ForestGrower {
    /// # Errors
    ///
    /// [`TerrainError::InvalidConfig`] if `min_size > max_size`.
    pub fn new(settings: ForestSettings, tiles: &TileTable) -> Result<Self, TerrainError> {
        if settings.min_size > settings.max_size {
            return Err(TerrainError::InvalidConfig(format!(
                "forest min_size {} exceeds max_size {}",
                settings.min_size, settings.max_size
            )));
        }
        Ok(Self {
            settings,
            grass: tiles.grass,
        })
    }

    /// Plant trees on the grass of `base`. Returns one optional tree per cell.
    pub fn grow<F, R>(
        &self,
        base: &Grid<TileId>,
        factory: &mut F,
        rng: &mut R,
    ) -> Grid<Option<F::Decoration>>
    where
        F: DecorationFactory,
        R: Rng + ?Sized,
    {
        let mut forest: Grid<Option<F::Decoration>> = base.map(|_, _, _| None);
        let mut grass: Vec<(usize, usize)> = base
            .enumerate()
            .filter(|&(_, &tile)| tile == self.grass)
            .map(|(pos, _)| pos)
            .collect();

        let seed_count =
            (grass.len() as f64 * SEEDS_PER_GRASS_TILE * self.settings.density) as usize;
        let mut seeds = Vec::with_capacity(seed_count);
        for _ in 0..seed_count {
            if grass.is_empty() {
                break;
            }
            let seed = grass.swap_remove(rng.random_range(0..grass.len()));
            forest[seed] = Some(factory.random_tree());
            seeds.push(seed);
        }

        let mut planted = seeds.len();
        for &(sx, sy) in &seeds {
            let size = self.cluster_size(rng);
            let reach = (size as f64).sqrt() * SPREAD;
            for _ in 0..size {
                let distance = reach * rng.random::<f64>();
                let angle = rng.random::<f64>() * TAU;
                let nx = (sx as f64 + angle.cos() * distance).floor() as i64;
                let ny = (sy as f64 + angle.sin() * distance).floor() as i64;
                if !base.in_bounds(nx, ny) {
                    continue;
                }
                let pos = (nx as usize, ny as usize);
                if base[pos] == self.grass
                    && forest[pos].is_none()
                    && chance(rng, self.settings.clustering)
                {
                    forest[pos] = Some(factory.random_tree());
                    planted += 1;
                }
            }
        }

        debug!("Forest: {} seeds, {} trees", seeds.len(), planted);
        forest
    }

    fn cluster_size<R: Rng + ?Sized>(&self, rng: &mut R) -> u32 {
        let (min, max) = (self.settings.min_size, self.settings.max_size);
        if max > min {
            rng.random_range(min..max)
        } else {
            min
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::pass_rng;

    /// Hands out increasing ids so tests can count factory calls.
    #[derive(Default)]
    struct Nursery {
        issued: u32,
    }

    impl DecorationFactory for Nursery {
        type Decoration = u32;

        fn random_tree(&mut self) -> u32 {
            self.issued += 1;
            self.issued
        }

        fn random_sandstone(&mut self) -> u32 {
            unreachable!("forests only plant trees")
        }

        fn random_shell(&mut self) -> u32 {
            unreachable!("forests only plant trees")
        }
    }

    fn grower(settings: ForestSettings) -> ForestGrower {
        ForestGrower::new(settings, &TileTable::default()).unwrap()
    }

    #[test]
    fn test_trees_only_on_grass() {
        let tiles = TileTable::default();
        let base =
            Grid::from_fn(60, 60, |x, _| if x < 30 { tiles.grass } else { tiles.water }).unwrap();
        let mut nursery = Nursery::default();
        let forest = grower(ForestSettings::default()).grow(
            &base,
            &mut nursery,
            &mut pass_rng(1, "forest"),
        );

        let trees: Vec<_> = forest
            .enumerate()
            .filter(|(_, tree)| tree.is_some())
            .map(|(pos, _)| pos)
            .collect();
        assert_eq!(trees.len() as u32, nursery.issued);
        // 1800 grass tiles at density 0.4 give 7 seeds.
        assert!(trees.len() >= 7);
        assert!(trees.iter().all(|&(x, _)| x < 30), "tree planted off grass");
    }

    #[test]
    fn test_zero_density_plants_nothing() {
        let base = Grid::filled(40, 40, TileTable::default().grass).unwrap();
        let settings = ForestSettings {
            density: 0.0,
            ..ForestSettings::default()
        };
        let mut nursery = Nursery::default();
        let forest = grower(settings).grow(&base, &mut nursery, &mut pass_rng(2, "forest"));
        assert!(forest.iter().all(Option::is_none));
        assert_eq!(nursery.issued, 0);
    }

    #[test]
    fn test_no_grass_plants_nothing() {
        let base = Grid::filled(40, 40, TileTable::default().sand).unwrap();
        let mut nursery = Nursery::default();
        let forest =
            grower(ForestSettings::default()).grow(&base, &mut nursery, &mut pass_rng(3, "forest"));
        assert!(forest.iter().all(Option::is_none));
    }

    #[test]
    fn test_clusters_grow_around_seeds() {
        let base = Grid::filled(100, 100, TileTable::default().grass).unwrap();
        let settings = ForestSettings {
            clustering: 1.0,
            ..ForestSettings::default()
        };
        let mut nursery = Nursery::default();
        let forest = grower(settings).grow(&base, &mut nursery, &mut pass_rng(4, "forest"));
        let trees = forest.iter().flatten().count();
        // 40 seeds with clusters of at least 20 attempts each.
        assert!(trees > 40, "expected clusters beyond the seeds, got {trees}");
    }

    #[test]
    fn test_grow_reproducible_with_seeded_rng() {
        let base = Grid::filled(50, 50, TileTable::default().grass).unwrap();
        let grower = grower(ForestSettings::default());
        let a = grower.grow(&base, &mut Nursery::default(), &mut pass_rng(5, "forest"));
        let b = grower.grow(&base, &mut Nursery::default(), &mut pass_rng(5, "forest"));
        assert_eq!(a, b);
    }

    #[test]
    fn test_inverted_sizes_rejected() {
        let settings = ForestSettings {
            min_size: 50,
            max_size: 10,
            ..ForestSettings::default()
        };
        assert!(ForestGrower::new(settings, &TileTable::default()).is_err());
    }
}
