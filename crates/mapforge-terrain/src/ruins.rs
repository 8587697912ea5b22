//! Ruins stamped onto grassland from small wall templates.

use mapforge_config::{RuinsSettings, TileId, TileTable};
use rand::Rng;
use tracing::debug;

use crate::error::TerrainError;
use crate::grid::Grid;
use crate::random::chance;

/// A wall template; `1` is a wall cell, `0` is left untouched.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RuinPattern {
    pub name: &'static str,
    rows: &'static [&'static [u8]],
}

impl RuinPattern {
    pub fn width(&self) -> usize {
        self.rows.first().map_or(0, |row| row.len())
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    pub fn is_wall(&self, x: usize, y: usize) -> bool {
        self.rows
            .get(y)
            .and_then(|row| row.get(x))
            .is_some_and(|&cell| cell == 1)
    }
}

pub const RUIN_PATTERNS: [RuinPattern; 4] = [
    RuinPattern {
        name: "room",
        rows: &[&[1, 1, 1], &[1, 0, 1], &[1, 1, 1]],
    },
    RuinPattern {
        name: "wide room",
        rows: &[&[1, 1, 1, 1, 1], &[1, 0, 0, 0, 1], &[1, 1, 1, 1, 1]],
    },
    RuinPattern {
        name: "inverted L",
        rows: &[&[1, 1, 1], &[1, 0, 1]],
    },
    RuinPattern {
        name: "L",
        rows: &[&[1, 1], &[1, 0], &[1, 1]],
    },
];

/// Result of a ruins pass.
#[derive(Clone, Debug, PartialEq)]
pub struct RuinsOutcome {
    pub tiles: Grid<TileId>,
    pub placed: usize,
    /// Attempts whose site failed [`RuinsStamper::is_suitable`].
    pub rejected: usize,
    /// Attempts abandoned because the template does not fit between the margins.
    pub skipped: usize,
}

/// Places [`RUIN_PATTERNS`] on mostly-grass sites.
#[derive(Clone, Debug)]
pub struct RuinsStamper {
    settings: RuinsSettings,
    tiles: TileTable,
}

impl RuinsStamper {
    /// # Errors
    ///
    /// [`TerrainError::InvalidConfig`] if `min_grass_fraction` lies outside `[0, 1]`.
    pub fn new(settings: RuinsSettings, tiles: TileTable) -> Result<Self, TerrainError> {
        if !(0.0..=1.0).contains(&settings.min_grass_fraction) {
            return Err(TerrainError::InvalidConfig(format!(
                "ruins min_grass_fraction {} is not a fraction",
                settings.min_grass_fraction
            )));
        }
        Ok(Self { settings, tiles })
    }

    /// Placement attempts on a `width x height` map.
    pub fn attempts(&self, width: usize, height: usize) -> usize {
        match self.settings.count {
            Some(count) => count as usize,
            None => ((width * height) as f64).sqrt() as usize / 16,
        }
    }

    /// A site is suitable when it lies on the map, holds no water or mountain,
    /// and more than `min_grass_fraction` of its cells are grass.
    pub fn is_suitable(
        &self,
        base: &Grid<TileId>,
        pattern: &RuinPattern,
        x: usize,
        y: usize,
    ) -> bool {
        let (pw, ph) = (pattern.width(), pattern.height());
        if pw == 0 || x + pw > base.width() || y + ph > base.height() {
            return false;
        }

        let mut grass = 0usize;
        for py in 0..ph {
            for px in 0..pw {
                let tile = base[(x + px, y + py)];
                if tile == self.tiles.water || tile == self.tiles.mountain {
                    return false;
                }
                if tile == self.tiles.grass {
                    grass += 1;
                }
            }
        }
        grass as f64 / (pw * ph) as f64 > self.settings.min_grass_fraction
    }

    /// Try every placement and return the stamped copy of `base`.
    pub fn stamp<R: Rng + ?Sized>(&self, base: &Grid<TileId>, rng: &mut R) -> RuinsOutcome {
        let attempts = self.attempts(base.width(), base.height());
        let margin = self.settings.edge_margin as i64;
        let mut tiles = base.clone();
        let (mut placed, mut rejected, mut skipped) = (0, 0, 0);

        for _ in 0..attempts {
            let pattern = RUIN_PATTERNS[rng.random_range(0..RUIN_PATTERNS.len())];
            let span_x = base.width() as i64 - pattern.width() as i64 - 2 * margin;
            let span_y = base.height() as i64 - pattern.height() as i64 - 2 * margin;
            let rx = rng.random::<f64>();
            let ry = rng.random::<f64>();
            if span_x < 0 || span_y < 0 {
                skipped += 1;
                continue;
            }
            let x = ((rx * span_x as f64) as i64 + margin) as usize;
            let y = ((ry * span_y as f64) as i64 + margin) as usize;

            if !self.is_suitable(base, &pattern, x, y) {
                rejected += 1;
                continue;
            }

            self.apply(base, &mut tiles, &pattern, (x, y), rng);
            debug!("Ruin '{}' placed at ({}, {})", pattern.name, x, y);
            placed += 1;
        }

        debug!(
            "Ruins: {} placed, {} rejected, {} skipped of {} attempts",
            placed, rejected, skipped, attempts
        );
        RuinsOutcome {
            tiles,
            placed,
            rejected,
            skipped,
        }
    }

    fn apply<R: Rng + ?Sized>(
        &self,
        base: &Grid<TileId>,
        tiles: &mut Grid<TileId>,
        pattern: &RuinPattern,
        (x, y): (usize, usize),
        rng: &mut R,
    ) {
        let (pw, ph) = (pattern.width() as i64, pattern.height() as i64);

        for py in 0..ph {
            for px in 0..pw {
                if pattern.is_wall(px as usize, py as usize) {
                    let weathered = chance(rng, self.settings.weathering_chance);
                    tiles[(x + px as usize, y + py as usize)] = if weathered {
                        self.tiles.gravel
                    } else {
                        self.tiles.stone
                    };
                }
            }
        }

        // Rubble on the ring just outside the template.
        for py in -1..=ph {
            for px in -1..=pw {
                let on_ring = py == -1 || py == ph || px == -1 || px == pw;
                if !on_ring || !chance(rng, self.settings.border_erosion_chance) {
                    continue;
                }
                if let Some(pos) = base.offset(x, y, px, py)
                    && base[pos] == self.tiles.grass
                {
                    tiles[pos] = self.tiles.gravel;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::pass_rng;

    fn stamper(settings: RuinsSettings) -> RuinsStamper {
        RuinsStamper::new(settings, TileTable::default()).unwrap()
    }

    #[test]
    fn test_pattern_shapes() {
        let dims: Vec<_> = RUIN_PATTERNS.iter().map(|p| (p.width(), p.height())).collect();
        assert_eq!(dims, vec![(3, 3), (5, 3), (3, 2), (2, 3)]);
        assert!(!RUIN_PATTERNS[0].is_wall(1, 1));
        assert!(RUIN_PATTERNS[3].is_wall(1, 2));
        assert!(!RUIN_PATTERNS[3].is_wall(1, 1));
        assert!(!RUIN_PATTERNS[0].is_wall(7, 0));
    }

    #[test]
    fn test_all_water_rejects_every_attempt() {
        let tiles = TileTable::default();
        let base = Grid::filled(64, 64, tiles.water).unwrap();
        let stamper = stamper(RuinsSettings::default());
        let outcome = stamper.stamp(&base, &mut pass_rng(1, "ruins"));
        assert_eq!(stamper.attempts(64, 64), 4);
        assert_eq!(outcome.placed, 0);
        assert_eq!(outcome.rejected, 4);
        assert_eq!(outcome.tiles, base);
    }

    #[test]
    fn test_grassland_accepts_every_attempt() {
        let tiles = TileTable::default();
        let base = Grid::filled(64, 64, tiles.grass).unwrap();
        let settings = RuinsSettings {
            count: Some(10),
            ..RuinsSettings::default()
        };
        let outcome = stamper(settings).stamp(&base, &mut pass_rng(2, "ruins"));
        assert_eq!(outcome.placed, 10);
        assert!(outcome.tiles.iter().any(|&t| t == tiles.stone || t == tiles.gravel));
        let allowed = [tiles.grass, tiles.stone, tiles.gravel];
        assert!(outcome.tiles.iter().all(|t| allowed.contains(t)));
    }

    #[test]
    fn test_walls_stay_inside_margin() {
        let tiles = TileTable::default();
        let base = Grid::filled(40, 40, tiles.grass).unwrap();
        let settings = RuinsSettings {
            count: Some(50),
            border_erosion_chance: 0.0,
            ..RuinsSettings::default()
        };
        let outcome = stamper(settings).stamp(&base, &mut pass_rng(3, "ruins"));
        for ((x, y), &tile) in outcome.tiles.enumerate() {
            if tile != tiles.grass {
                assert!((5..35).contains(&x) && (5..35).contains(&y), "wall at ({x}, {y})");
            }
        }
    }

    #[test]
    fn test_grass_fraction_is_strict() {
        let tiles = TileTable::default();
        let wide = RUIN_PATTERNS[1];
        let stamper = stamper(RuinsSettings::default());

        // 9 of 15 grass is exactly 0.6 and not enough.
        let mut base = Grid::filled(5, 3, tiles.sand).unwrap();
        for i in 0..9 {
            base[(i % 5, i / 5)] = tiles.grass;
        }
        assert!(!stamper.is_suitable(&base, &wide, 0, 0));

        base[(4, 1)] = tiles.grass;
        assert!(stamper.is_suitable(&base, &wide, 0, 0));
    }

    #[test]
    fn test_mountain_or_water_rejects_site() {
        let tiles = TileTable::default();
        let room = RUIN_PATTERNS[0];
        let stamper = stamper(RuinsSettings::default());
        let mut base = Grid::filled(8, 8, tiles.grass).unwrap();
        assert!(stamper.is_suitable(&base, &room, 2, 2));
        base[(4, 4)] = tiles.mountain;
        assert!(!stamper.is_suitable(&base, &room, 2, 2));
        base[(4, 4)] = tiles.water;
        assert!(!stamper.is_suitable(&base, &room, 2, 2));
        assert!(!stamper.is_suitable(&base, &room, 6, 0), "site off the map");
    }

    #[test]
    fn test_exact_fit_between_margins_is_placed() {
        // 15 = 5-wide room + 2 * 5 margin, 13 = 3-tall room + 2 * 5 margin.
        let tiles = TileTable::default();
        let base = Grid::filled(15, 13, tiles.grass).unwrap();
        let settings = RuinsSettings {
            count: Some(20),
            border_erosion_chance: 0.0,
            ..RuinsSettings::default()
        };
        let outcome = stamper(settings).stamp(&base, &mut pass_rng(5, "ruins"));
        assert_eq!(outcome.placed, 20);
        assert_eq!(outcome.skipped, 0);
        for ((x, y), &tile) in outcome.tiles.enumerate() {
            if tile != tiles.grass {
                assert!((5..10).contains(&x) && (5..8).contains(&y), "wall at ({x}, {y})");
            }
        }
    }

    #[test]
    fn test_tiny_map_skips_attempts() {
        let base = Grid::filled(10, 10, TileTable::default().grass).unwrap();
        let settings = RuinsSettings {
            count: Some(3),
            ..RuinsSettings::default()
        };
        let outcome = stamper(settings).stamp(&base, &mut pass_rng(4, "ruins"));
        assert_eq!(outcome.skipped, 3);
        assert_eq!(outcome.tiles, base);
    }
}
