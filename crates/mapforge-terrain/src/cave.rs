//! Cellular-automaton caves carved into mountain tiles.
//!
//! A random fill is smoothed by a 4/5 automaton, split into 8-connected
//! regions, and the mid-sized regions are carved into the tile grid as gravel.
//! Nearby caverns are joined by straight tunnels.

use std::collections::VecDeque;

use mapforge_config::{CaveSettings, TileId, TileTable};
use rand::Rng;
use tracing::debug;

use crate::error::TerrainError;
use crate::grid::Grid;
use crate::random::chance;

/// Filled cells survive with at least this many filled neighbours.
const SURVIVE_NEIGHBORS: usize = 4;
/// Empty cells fill with at least this many filled neighbours.
const BIRTH_NEIGHBORS: usize = 5;

/// One 8-connected group of filled automaton cells.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CavernRegion {
    cells: Vec<(usize, usize)>,
}

impl CavernRegion {
    pub fn cells(&self) -> &[(usize, usize)] {
        &self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Floored mean of the member coordinates.
    pub fn centroid(&self) -> (usize, usize) {
        let n = self.cells.len().max(1);
        let (sx, sy) = self
            .cells
            .iter()
            .fold((0usize, 0usize), |(sx, sy), &(x, y)| (sx + x, sy + y));
        (sx / n, sy / n)
    }
}

/// Result of a cave pass.
#[derive(Clone, Debug, PartialEq)]
pub struct CaveOutcome {
    pub tiles: Grid<TileId>,
    /// Regions that passed the size filter and were carved.
    pub caverns: usize,
    /// Tunnels dug; a pair can be joined once from each side.
    pub tunnels: usize,
}

/// Carves caverns and tunnels into a tile grid.
#[derive(Clone, Debug)]
pub struct CaveCarver {
    settings: CaveSettings,
    tiles: TileTable,
}

impl CaveCarver {
    /// # Errors
    ///
    /// [`TerrainError::InvalidConfig`] if the fill frequency lies outside
    /// `[0, 1]` or `min_size > max_size`.
    pub fn new(settings: CaveSettings, tiles: TileTable) -> Result<Self, TerrainError> {
        if !(0.0..=1.0).contains(&settings.frequency) {
            return Err(TerrainError::InvalidConfig(format!(
                "cave frequency {} is not a probability",
                settings.frequency
            )));
        }
        if settings.min_size > settings.max_size {
            return Err(TerrainError::InvalidConfig(format!(
                "cave min_size {} exceeds max_size {}",
                settings.min_size, settings.max_size
            )));
        }
        Ok(Self { settings, tiles })
    }

    pub fn settings(&self) -> &CaveSettings {
        &self.settings
    }

    /// Random initial fill: each cell is filled with probability `frequency`.
    pub fn initialize<R: Rng + ?Sized>(
        &self,
        width: usize,
        height: usize,
        rng: &mut R,
    ) -> Result<Grid<bool>, TerrainError> {
        Ok(Grid::from_fn(width, height, |_, _| {
            chance(rng, self.settings.frequency)
        })?)
    }

    /// One synchronous automaton generation. Off-grid neighbours count as filled.
    pub fn automaton_step(mask: &Grid<bool>) -> Grid<bool> {
        mask.map(|x, y, &filled| {
            let in_grid = mask.neighbors(x, y).filter(|&(pos, _)| mask[pos]).count();
            let off_grid = 8 - mask.neighbors(x, y).count();
            let count = in_grid + off_grid;
            if filled {
                count >= SURVIVE_NEIGHBORS
            } else {
                count >= BIRTH_NEIGHBORS
            }
        })
    }

    /// Split the filled cells into 8-connected regions, in scan order of
    /// their first cell.
    pub fn identify_regions(mask: &Grid<bool>) -> Vec<CavernRegion> {
        let mut visited = mask.map(|_, _, _| false);
        let mut regions = Vec::new();
        let mut queue = VecDeque::new();

        for ((x, y), &filled) in mask.enumerate() {
            if !filled || visited[(x, y)] {
                continue;
            }
            visited[(x, y)] = true;
            queue.push_back((x, y));
            let mut cells = Vec::new();

            while let Some(cell) = queue.pop_front() {
                cells.push(cell);
                for (next, _) in mask.neighbors(cell.0, cell.1) {
                    if mask[next] && !visited[next] {
                        visited[next] = true;
                        queue.push_back(next);
                    }
                }
            }
            regions.push(CavernRegion { cells });
        }

        regions
    }

    /// Integer line from `from` to `to`, both endpoints included.
    pub fn bresenham_line(from: (usize, usize), to: (usize, usize)) -> Vec<(usize, usize)> {
        let (mut x0, mut y0) = (from.0 as i64, from.1 as i64);
        let (x1, y1) = (to.0 as i64, to.1 as i64);
        let dx = (x1 - x0).abs();
        let dy = (y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx - dy;
        let mut line = Vec::with_capacity((dx.max(dy) + 1) as usize);

        loop {
            line.push((x0 as usize, y0 as usize));
            if x0 == x1 && y0 == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 > -dy {
                err -= dy;
                x0 += sx;
            }
            if e2 < dx {
                err += dx;
                y0 += sy;
            }
        }

        line
    }

    /// Run the automaton from a fresh random fill and carve the result.
    pub fn generate<R: Rng + ?Sized>(
        &self,
        base: &Grid<TileId>,
        rng: &mut R,
    ) -> Result<CaveOutcome, TerrainError> {
        let mut mask = self.initialize(base.width(), base.height(), rng)?;
        for _ in 0..self.settings.iterations {
            mask = Self::automaton_step(&mask);
        }
        self.carve_with_mask(base, &mask, rng)
    }

    /// Carve the regions of a finished automaton mask into a copy of `base`.
    ///
    /// # Errors
    ///
    /// [`TerrainError::DimensionMismatch`] if `mask` and `base` differ in size.
    pub fn carve_with_mask<R: Rng + ?Sized>(
        &self,
        base: &Grid<TileId>,
        mask: &Grid<bool>,
        rng: &mut R,
    ) -> Result<CaveOutcome, TerrainError> {
        TerrainError::check_same_shape(base, mask)?;

        let regions = Self::identify_regions(mask);
        let found = regions.len();
        let caverns: Vec<CavernRegion> = regions
            .into_iter()
            .filter(|region| {
                (self.settings.min_size..=self.settings.max_size).contains(&region.len())
            })
            .collect();
        let centroids: Vec<_> = caverns.iter().map(CavernRegion::centroid).collect();

        let mountain = self.tiles.mountain;
        let mut tiles = base.clone();
        let mut tunnels = 0;

        for (i, cavern) in caverns.iter().enumerate() {
            for &cell in cavern.cells() {
                if base[cell] != mountain {
                    continue;
                }
                tiles[cell] = self.tiles.gravel;
                if chance(rng, self.settings.detail_chance) {
                    self.erode_around(&mut tiles, cell, rng);
                }
            }

            let from = centroids[i];
            for (j, &to) in centroids.iter().enumerate() {
                if i == j {
                    continue;
                }
                let dx = to.0 as f64 - from.0 as f64;
                let dy = to.1 as f64 - from.1 as f64;
                if (dx * dx + dy * dy).sqrt() < self.settings.tunnel_distance
                    && chance(rng, self.settings.tunnel_chance)
                {
                    self.dig_tunnel(&mut tiles, from, to);
                    tunnels += 1;
                }
            }
        }

        debug!(
            "Caves: {} of {} regions carved, {} tunnels",
            caverns.len(),
            found,
            tunnels
        );
        Ok(CaveOutcome {
            tiles,
            caverns: caverns.len(),
            tunnels,
        })
    }

    fn erode_around<R: Rng + ?Sized>(
        &self,
        tiles: &mut Grid<TileId>,
        (x, y): (usize, usize),
        rng: &mut R,
    ) {
        let around: Vec<_> = tiles.neighbors(x, y).map(|(pos, _)| pos).collect();
        for pos in around {
            if tiles[pos] == self.tiles.mountain && chance(rng, self.settings.erosion_chance) {
                tiles[pos] = self.tiles.stone;
            }
        }
    }

    /// Gravel along the line, widened into adjacent mountain.
    fn dig_tunnel(&self, tiles: &mut Grid<TileId>, from: (usize, usize), to: (usize, usize)) {
        for (x, y) in Self::bresenham_line(from, to) {
            tiles[(x, y)] = self.tiles.gravel;
            let around: Vec<_> = tiles.neighbors(x, y).map(|(pos, _)| pos).collect();
            for pos in around {
                if tiles[pos] == self.tiles.mountain {
                    tiles[pos] = self.tiles.gravel;
                }
            }
        }
    }
}
