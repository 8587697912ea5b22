//! Downhill river carving.
//!
//! Rivers start on high ground away from the map edge, walk to the lowest
//! unvisited neighbour until they reach water or a local minimum, and are then
//! cut into the heightmap as a water channel with lowered banks.

use tracing::{debug, info};

use crate::fields::WATER_LEVEL;
use crate::grid::Grid;
use crate::random::DeterministicRandom;

/// Sources must sit strictly above this elevation.
const SOURCE_ELEVATION: f64 = 0.6;
/// Sources must sit at least this many cells from every edge.
const SOURCE_MARGIN: usize = 5;
/// Paths with this many cells or fewer are discarded.
const MIN_CELLS_EXCLUSIVE: usize = 10;
/// Elevation written into every committed river cell.
const CHANNEL_ELEVATION: f64 = -0.15;
/// Bank elevation cap for axial neighbours; diagonal neighbours get +0.1.
const BANK_ELEVATION: f64 = -0.05;

/// A committed river, ordered from source to mouth.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RiverPath {
    cells: Vec<(usize, usize)>,
}

impl RiverPath {
    pub fn cells(&self) -> &[(usize, usize)] {
        &self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// The high cell the river started from.
    pub fn source(&self) -> Option<(usize, usize)> {
        self.cells.first().copied()
    }

    /// The last cell: open water, or the local minimum the walk stopped in.
    pub fn mouth(&self) -> Option<(usize, usize)> {
        self.cells.last().copied()
    }
}

/// Every river carved in one pass, plus their cells flattened in commit order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RiverNetwork {
    pub rivers: Vec<RiverPath>,
    pub river_cells: Vec<(usize, usize)>,
}

/// Carves rivers into a heightmap in place.
#[derive(Clone, Copy, Debug)]
pub struct RiverCarver {
    random: DeterministicRandom,
}

impl RiverCarver {
    pub fn new(seed: u32) -> Self {
        Self {
            random: DeterministicRandom::new(seed),
        }
    }

    /// Number of rivers attempted on a `width x height` map.
    pub fn river_count(width: usize, height: usize) -> usize {
        ((width * height) as f64).sqrt() as usize / 32
    }

    /// Trace and carve up to [`RiverCarver::river_count`] rivers.
    ///
    /// Rivers are committed one at a time, so later rivers see the valleys of
    /// earlier ones. A path of 10 cells or fewer is dropped and leaves the
    /// heightmap untouched, though its cells stay ineligible as sources.
    pub fn carve(&self, heightmap: &mut Grid<f64>) -> RiverNetwork {
        let (width, height) = (heightmap.width(), heightmap.height());
        let attempts = Self::river_count(width, height);
        let mut visited = heightmap.map(|_, _, _| false);
        let mut network = RiverNetwork::default();

        for r in 0..attempts {
            let sources = source_candidates(heightmap, &visited);
            if sources.is_empty() {
                debug!("River {}: no source above {}", r, SOURCE_ELEVATION);
                continue;
            }

            let pick = self.random.value(r as i64, r as i64 + 1) * sources.len() as f64;
            let start = sources[(pick as usize).min(sources.len() - 1)];
            let cells = walk(heightmap, &mut visited, start, width + height);

            if cells.len() <= MIN_CELLS_EXCLUSIVE {
                debug!(
                    "River {} from {:?} discarded after {} cells",
                    r,
                    start,
                    cells.len()
                );
                continue;
            }

            commit(heightmap, &mut visited, &cells);
            debug!(
                "River {} carved from {:?} to {:?} ({} cells)",
                r,
                start,
                cells.last(),
                cells.len()
            );
            network.river_cells.extend_from_slice(&cells);
            network.rivers.push(RiverPath { cells });
        }

        info!(
            "Carved {} of {} rivers ({} cells)",
            network.rivers.len(),
            attempts,
            network.river_cells.len()
        );
        network
    }
}

fn source_candidates(heightmap: &Grid<f64>, visited: &Grid<bool>) -> Vec<(usize, usize)> {
    let (width, height) = (heightmap.width(), heightmap.height());
    heightmap
        .enumerate()
        .filter(|&((x, y), &elevation)| {
            x >= SOURCE_MARGIN
                && y >= SOURCE_MARGIN
                && x + SOURCE_MARGIN < width
                && y + SOURCE_MARGIN < height
                && elevation > SOURCE_ELEVATION
                && !visited[(x, y)]
        })
        .map(|(pos, _)| pos)
        .collect()
}

/// Follow the steepest unvisited descent from `start`.
///
/// Ends on the first neighbour below water level (which is included), when no
/// unvisited neighbour is strictly lower, or after `max_steps` cells.
fn walk(
    heightmap: &Grid<f64>,
    visited: &mut Grid<bool>,
    start: (usize, usize),
    max_steps: usize,
) -> Vec<(usize, usize)> {
    let mut path = Vec::new();
    let mut current = start;

    for _ in 0..max_steps {
        visited[current] = true;
        path.push(current);

        let mut lowest = (heightmap[current], current);
        let mut reached_water = false;
        for (next, _) in heightmap.neighbors(current.0, current.1) {
            let elevation = heightmap[next];
            if elevation < WATER_LEVEL {
                path.push(next);
                reached_water = true;
                break;
            }
            if elevation < lowest.0 && !visited[next] {
                lowest = (elevation, next);
            }
        }

        if reached_water || lowest.1 == current {
            break;
        }
        current = lowest.1;
    }

    path
}

fn commit(heightmap: &mut Grid<f64>, visited: &mut Grid<bool>, cells: &[(usize, usize)]) {
    for &(x, y) in cells {
        visited[(x, y)] = true;
        heightmap[(x, y)] = CHANNEL_ELEVATION;

        let banks: Vec<_> = heightmap.neighbors(x, y).collect();
        for (pos, (dx, dy)) in banks {
            let elevation = heightmap[pos];
            if elevation > WATER_LEVEL {
                let cap = BANK_ELEVATION + (dx * dy).abs() as f64 * 0.1;
                heightmap[pos] = elevation.min(cap);
            }
        }
    }
}
