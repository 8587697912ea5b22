//! Lakes filled out to a noisy radius around random centres.

use mapforge_config::{LakeSettings, TileId, TileTable};
use rand::Rng;
use tracing::debug;

use crate::error::TerrainError;
use crate::grid::Grid;
use crate::random::chance;

/// Centres keep this distance from the map edge.
const CENTER_MARGIN: usize = 10;
/// Half-side of the square checked for existing water around a centre.
const CROWDING_RADIUS: i64 = 15;
/// Edge tiles shallower than this depth may become sand.
const SHORE_DEPTH: f64 = 0.2;

/// Where a lake was dug, and its nominal diameter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LakeSite {
    pub center: (usize, usize),
    pub size: u32,
}

/// Result of a lake pass.
#[derive(Clone, Debug, PartialEq)]
pub struct LakeOutcome {
    pub tiles: Grid<TileId>,
    pub lakes: Vec<LakeSite>,
    /// Attempts abandoned because the map is too small or the site already
    /// has water nearby.
    pub skipped: usize,
}

#[derive(Clone, Debug)]
pub struct LakeCarver {
    settings: LakeSettings,
    tiles: TileTable,
}

impl LakeCarver {
    /// # Errors
    ///
    /// [`TerrainError::InvalidConfig`] if `min_size > max_size`.
    pub fn new(settings: LakeSettings, tiles: TileTable) -> Result<Self, TerrainError> {
        if settings.min_size > settings.max_size {
            return Err(TerrainError::InvalidConfig(format!(
                "lake min_size {} exceeds max_size {}",
                settings.min_size, settings.max_size
            )));
        }
        Ok(Self { settings, tiles })
    }

    /// Lake attempts on a `width x height` map.
    pub fn attempts(&self, width: usize, height: usize) -> usize {
        match self.settings.count {
            Some(count) => count as usize,
            None => ((width * height) as f64).sqrt() as usize / 32,
        }
    }

    pub fn carve<R: Rng + ?Sized>(&self, base: &Grid<TileId>, rng: &mut R) -> LakeOutcome {
        let (width, height) = (base.width(), base.height());
        let attempts = self.attempts(width, height);
        let mut tiles = base.clone();
        let mut lakes = Vec::new();
        let mut skipped = 0;

        for _ in 0..attempts {
            let size = self.lake_size(rng);
            let rx = rng.random::<f64>();
            let ry = rng.random::<f64>();
            if width < 2 * CENTER_MARGIN || height < 2 * CENTER_MARGIN {
                skipped += 1;
                continue;
            }
            let center = (
                (rx * (width - 2 * CENTER_MARGIN) as f64) as usize + CENTER_MARGIN,
                (ry * (height - 2 * CENTER_MARGIN) as f64) as usize + CENTER_MARGIN,
            );

            let nearby = self.water_near(base, center);
            if nearby > self.settings.max_nearby_water {
                debug!("Lake at {:?} skipped: {} water tiles nearby", center, nearby);
                skipped += 1;
                continue;
            }

            self.fill(base, &mut tiles, center, size, rng);
            lakes.push(LakeSite { center, size });
        }

        debug!(
            "Lakes: {} dug, {} skipped of {} attempts",
            lakes.len(),
            skipped,
            attempts
        );
        LakeOutcome {
            tiles,
            lakes,
            skipped,
        }
    }

    fn lake_size<R: Rng + ?Sized>(&self, rng: &mut R) -> u32 {
        let (min, max) = (self.settings.min_size, self.settings.max_size);
        if max > min {
            rng.random_range(min..max)
        } else {
            min
        }
    }

    fn water_near(&self, base: &Grid<TileId>, (cx, cy): (usize, usize)) -> usize {
        let mut count = 0;
        for dy in -CROWDING_RADIUS..=CROWDING_RADIUS {
            for dx in -CROWDING_RADIUS..=CROWDING_RADIUS {
                if let Some(pos) = base.offset(cx, cy, dx, dy)
                    && base[pos] == self.tiles.water
                {
                    count += 1;
                }
            }
        }
        count
    }

    fn fill<R: Rng + ?Sized>(
        &self,
        base: &Grid<TileId>,
        tiles: &mut Grid<TileId>,
        (cx, cy): (usize, usize),
        size: u32,
        rng: &mut R,
    ) {
        let half = (size / 2) as i64;
        let radius = size as f64 / 2.0;
        let jitter = self.settings.roughness * size as f64;

        for dy in -half..=half {
            for dx in -half..=half {
                let Some(pos) = base.offset(cx, cy, dx, dy) else {
                    continue;
                };
                let distance = ((dx * dx + dy * dy) as f64).sqrt();
                let adjusted = distance + (rng.random::<f64>() - 0.5) * jitter;
                if adjusted >= radius {
                    continue;
                }
                let ground = base[pos];
                if ground == self.tiles.mountain || ground == self.tiles.water {
                    continue;
                }

                let depth = 1.0 - adjusted / radius;
                tiles[pos] = if depth < SHORE_DEPTH && chance(rng, self.settings.shore_sand_chance)
                {
                    self.tiles.sand
                } else {
                    self.tiles.water
                };
            }
        }
    }
}
