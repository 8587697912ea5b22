//! Temperature, moisture and water-distance fields derived from a heightmap.

use std::collections::VecDeque;

use noise::{NoiseFn, Simplex};
use tracing::warn;

use crate::grid::Grid;

/// Elevation below which a cell counts as open water.
pub const WATER_LEVEL: f64 = -0.1;

const AXIAL_STEP: f64 = 1.0;
const DIAGONAL_STEP: f64 = 1.414;

/// Moisture noise for a world seed, decorrelated from the heightmap noise.
pub fn moisture_noise(seed: u32) -> Simplex {
    Simplex::new(seed.wrapping_add(0xDEAD_BEEF))
}

/// Builds the climate fields the classifier and river pass consume.
#[derive(Clone, Debug)]
pub struct FieldGenerator {
    /// Tiles per unit of noise input for the moisture field.
    pub noise_scale: f64,
}

impl Default for FieldGenerator {
    fn default() -> Self {
        Self { noise_scale: 64.0 }
    }
}

impl FieldGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Latitude and altitude blend: warmest at the middle row and at sea level.
    ///
    /// `0.6 * latitude + 0.4 * max(0, 1 - 2 * elevation)`, where latitude is 1 on
    /// the middle row and 0 on the top row.
    pub fn temperature(&self, heightmap: &Grid<f64>) -> Grid<f64> {
        let height = heightmap.height() as f64;
        heightmap.map(|_, y, &elevation| {
            let latitude = 1.0 - ((y as f64 / height) - 0.5).abs() * 2.0;
            let altitude = (1.0 - elevation * 2.0).max(0.0);
            latitude * 0.6 + altitude * 0.4
        })
    }

    /// Half noise, half proximity to water.
    ///
    /// The noise is sampled at `(x, y) / noise_scale` and remapped from `[-1, 1]`
    /// to `[0, 1]`. Proximity is `1 - distance / max_distance` over the finite
    /// distances; a map without water gets no proximity term, and a map whose
    /// farthest cell is itself water gets full proximity everywhere.
    pub fn moisture(&self, heightmap: &Grid<f64>, noise: &impl NoiseFn<f64, 2>) -> Grid<f64> {
        let distances = self.water_distance(heightmap);
        let max_distance = distances
            .iter()
            .copied()
            .filter(|d| d.is_finite())
            .fold(None, |max: Option<f64>, d| Some(max.map_or(d, |m| m.max(d))));

        let scale = self.noise_scale;
        distances.map(|x, y, &distance| {
            let base = (noise.get([x as f64 / scale, y as f64 / scale]) + 1.0) * 0.5;
            let water = match max_distance {
                None => 0.0,
                Some(_) if !distance.is_finite() => 0.0,
                Some(max) if max <= 0.0 => 1.0,
                Some(max) => 1.0 - distance / max,
            };
            base * 0.5 + water * 0.5
        })
    }

    /// Approximate distance from every cell to the nearest water cell.
    ///
    /// Multi-source breadth-first relaxation over 8-connectivity; axial steps
    /// cost 1.0, diagonal steps 1.414. Cells with no reachable water stay at
    /// `f64::INFINITY`.
    pub fn water_distance(&self, heightmap: &Grid<f64>) -> Grid<f64> {
        let mut distances = heightmap.map(|_, _, _| f64::INFINITY);
        let mut queue = VecDeque::new();

        for ((x, y), &elevation) in heightmap.enumerate() {
            if elevation < WATER_LEVEL {
                distances[(x, y)] = 0.0;
                queue.push_back((x, y, 0.0));
            }
        }

        if queue.is_empty() {
            warn!(
                "No water below {} on a {}x{} heightmap; water distance is unbounded",
                WATER_LEVEL,
                heightmap.width(),
                heightmap.height()
            );
            return distances;
        }

        while let Some((x, y, distance)) = queue.pop_front() {
            for ((nx, ny), (dx, dy)) in heightmap.neighbors(x, y) {
                let step = if dx * dy != 0 { DIAGONAL_STEP } else { AXIAL_STEP };
                let candidate = distance + step;
                if candidate < distances[(nx, ny)] {
                    distances[(nx, ny)] = candidate;
                    queue.push_back((nx, ny, candidate));
                }
            }
        }

        distances
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use noise::Constant;

    fn single_water_cell(width: usize, height: usize) -> Grid<f64> {
        Grid::from_fn(width, height, |x, y| if (x, y) == (0, 0) { -0.5 } else { 0.3 }).unwrap()
    }

    #[test]
    fn test_water_distance_steps() {
        let distances = FieldGenerator::new().water_distance(&single_water_cell(8, 8));
        assert_eq!(distances[(0, 0)], 0.0);
        assert_eq!(distances[(1, 0)], 1.0);
        assert!((distances[(1, 1)] - 1.414).abs() < 1e-9);
        assert!(
            (distances[(3, 4)] - 5.242).abs() < 1e-9,
            "three diagonals and one axial step, got {}",
            distances[(3, 4)]
        );
    }

    #[test]
    fn test_water_distance_without_water_is_infinite() {
        let heightmap = Grid::filled(5, 5, 0.5).unwrap();
        let distances = FieldGenerator::new().water_distance(&heightmap);
        assert!(distances.iter().all(|d| d.is_infinite()));
    }

    #[test]
    fn test_temperature_latitude_and_altitude() {
        let heightmap = Grid::from_fn(1, 10, |_, y| if y == 5 { 0.0 } else { 1.0 }).unwrap();
        let temperature = FieldGenerator::new().temperature(&heightmap);
        // Middle row at sea level: full latitude and altitude terms.
        assert!((temperature[(0, 5)] - 1.0).abs() < 1e-12);
        // Top row on a peak: both terms vanish.
        assert_eq!(temperature[(0, 0)], 0.0);
        // Negative elevations push the altitude term past 1.
        let low = Grid::filled(1, 2, -0.5).unwrap();
        let t = FieldGenerator::new().temperature(&low);
        assert!((t[(0, 0)] - 0.8).abs() < 1e-12);
    }

    #[test]
    fn test_moisture_wettest_at_water() {
        let heightmap = single_water_cell(16, 16);
        let moisture = FieldGenerator::new().moisture(&heightmap, &Constant::new(0.0));
        assert!((moisture[(0, 0)] - 0.75).abs() < 1e-12);
        assert!((moisture[(15, 15)] - 0.25).abs() < 1e-12);
        assert!(moisture[(4, 4)] > moisture[(10, 10)]);
    }

    #[test]
    fn test_moisture_without_water_is_noise_only() {
        let heightmap = Grid::filled(6, 6, 0.4).unwrap();
        let moisture = FieldGenerator::new().moisture(&heightmap, &Constant::new(1.0));
        assert!(moisture.iter().all(|&m| (m - 0.5).abs() < 1e-12));
    }

    #[test]
    fn test_moisture_all_water_is_never_nan() {
        let heightmap = Grid::filled(6, 6, -0.9).unwrap();
        let moisture = FieldGenerator::new().moisture(&heightmap, &Constant::new(-1.0));
        assert!(moisture.iter().all(|&m| (m - 0.5).abs() < 1e-12));
    }

    #[test]
    fn test_moisture_with_simplex_is_finite() {
        let heightmap = Grid::from_fn(32, 32, |x, _| x as f64 / 16.0 - 1.0).unwrap();
        let moisture = FieldGenerator::new().moisture(&heightmap, &Simplex::new(5));
        assert!(moisture.iter().all(|m| m.is_finite()));
    }
}
