//! Multi-octave fractal Brownian motion (fBm) heightmap sampler.
//!
//! Composites multiple octaves of simplex noise into a heightmap normalised to
//! `[-1, 1]`, the range every later pass expects.

use mapforge_config::MapConfig;
use noise::{NoiseFn, Simplex};

use crate::error::TerrainError;
use crate::grid::Grid;

/// Generates heightmaps using fractal Brownian motion over simplex noise.
///
/// Each successive octave multiplies the frequency by `lacunarity` and the
/// amplitude by `persistence`.
pub struct HeightmapSampler {
    noise: Simplex,
    octaves: u32,
    base_frequency: f64,
    persistence: f64,
    lacunarity: f64,
}

impl HeightmapSampler {
    pub fn new(map: &MapConfig) -> Self {
        Self {
            noise: Simplex::new(map.seed),
            octaves: map.octaves,
            base_frequency: map.base_frequency,
            persistence: map.persistence,
            lacunarity: map.lacunarity,
        }
    }

    /// Normalised height at a tile coordinate.
    ///
    /// Octave sums are divided by the geometric sum of the amplitudes, so the
    /// result stays within `[-1, 1]`. Zero octaves yield flat ground at 0.
    pub fn sample(&self, x: f64, y: f64) -> f64 {
        let mut total = 0.0;
        let mut frequency = self.base_frequency;
        let mut amplitude = 1.0;

        for _ in 0..self.octaves {
            total += self.noise.get([x * frequency, y * frequency]) * amplitude;
            frequency *= self.lacunarity;
            amplitude *= self.persistence;
        }

        let max = self.max_amplitude();
        if max > 0.0 {
            (total / max).clamp(-1.0, 1.0)
        } else {
            0.0
        }
    }

    /// Geometric series sum of the octave amplitudes.
    pub fn max_amplitude(&self) -> f64 {
        let mut sum = 0.0;
        let mut amp = 1.0;
        for _ in 0..self.octaves {
            sum += amp;
            amp *= self.persistence;
        }
        sum
    }

    /// Sample every tile of a `width x height` map.
    pub fn generate(&self, width: usize, height: usize) -> Result<Grid<f64>, TerrainError> {
        Ok(Grid::from_fn(width, height, |x, y| {
            self.sample(x as f64, y as f64)
        })?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-12;

    fn map(seed: u32) -> MapConfig {
        MapConfig {
            seed,
            ..MapConfig::default()
        }
    }

    #[test]
    fn test_determinism_same_seed_same_coord() {
        let h1 = HeightmapSampler::new(&map(42)).sample(100.0, 200.0);
        let h2 = HeightmapSampler::new(&map(42)).sample(100.0, 200.0);
        assert!(
            (h1 - h2).abs() < EPSILON,
            "Same seed + same coord must produce identical height: {h1} vs {h2}"
        );
    }

    #[test]
    fn test_different_seeds_produce_different_heightmaps() {
        let a = HeightmapSampler::new(&map(1)).generate(32, 32).unwrap();
        let b = HeightmapSampler::new(&map(999)).generate(32, 32).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_heightmap_normalised() {
        let heightmap = HeightmapSampler::new(&map(7)).generate(128, 128).unwrap();
        assert!(heightmap.iter().all(|h| (-1.0..=1.0).contains(h)));
        assert!(
            heightmap.iter().any(|&h| h > 0.0) && heightmap.iter().any(|&h| h < 0.0),
            "fBm should produce both highs and lows"
        );
    }

    #[test]
    fn test_max_amplitude_calculation() {
        let config = MapConfig {
            octaves: 4,
            persistence: 0.5,
            ..MapConfig::default()
        };
        let sampler = HeightmapSampler::new(&config);
        assert!((sampler.max_amplitude() - 1.875).abs() < EPSILON);
    }

    #[test]
    fn test_zero_octaves_is_flat() {
        let config = MapConfig {
            octaves: 0,
            ..MapConfig::default()
        };
        let heightmap = HeightmapSampler::new(&config).generate(8, 8).unwrap();
        assert!(heightmap.iter().all(|&h| h == 0.0));
    }

    #[test]
    fn test_zero_size_rejected() {
        let result = HeightmapSampler::new(&map(0)).generate(0, 16);
        assert!(matches!(result, Err(TerrainError::Grid(_))));
    }
}
