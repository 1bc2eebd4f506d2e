//! Noise-driven chunk content generator.

use std::f32::consts::TAU;

use bevy::prelude::*;

use super::ChunkGenerator;
use crate::config::{BandConfig, BandShape, GeneratorConfig};
use crate::coords::ChunkPos;
use crate::noise::{GradientNoise, Lcg, chunk_sub_seed};
use crate::primitives::{PrimitiveShape, PrimitiveSpec};

/// Deterministic terrain generator sampling a continuous noise field.
///
/// Each chunk footprint is partitioned into a `grid x grid` sub-grid. Per
/// sub-cell, a fractal height sample offsets the cell vertically, a
/// classification sample at a larger spatial period picks a band (raised
/// block, empty, or lowered marker), and a third sample drives a seed-stable
/// hue. Terrain shape uses raw coordinate sampling so neighboring chunks
/// continue the same field; only rotation draws from the per-chunk
/// sub-seed.
pub struct NoiseGenerator {
  noise: GradientNoise,
  world_seed: i64,
  chunk_size: f32,
  config: GeneratorConfig,
}

impl NoiseGenerator {
  /// Creates a generator for the given world seed and chunk size.
  pub fn new(world_seed: i64, chunk_size: f32, config: GeneratorConfig) -> Self {
    Self {
      noise: GradientNoise::new(world_seed),
      world_seed,
      chunk_size,
      config,
    }
  }

  /// Classifies a threshold sample into a band, if any.
  fn classify(&self, t: f32) -> Option<&BandConfig> {
    if t > self.config.raised.threshold {
      Some(&self.config.raised)
    } else if t < self.config.lowered.threshold {
      Some(&self.config.lowered)
    } else {
      None
    }
  }
}

impl ChunkGenerator for NoiseGenerator {
  fn generate(&self, pos: ChunkPos) -> Vec<PrimitiveSpec> {
    let grid = self.config.grid;
    let cell = 1.0 / grid as f32;
    let cell_size = self.chunk_size * cell;
    let mut rng = Lcg::new(chunk_sub_seed(self.world_seed, pos));
    let mut specs = Vec::new();

    for iz in 0..grid {
      for ix in 0..grid {
        // Sub-cell center in chunk units, offset from the chunk center.
        let px = pos.x as f32 - 0.5 + cell * (ix as f32 + 0.5);
        let pz = pos.z as f32 - 0.5 + cell * (iz as f32 + 0.5);

        let t = self.noise.noise2(
          (px / self.config.classify_period) as f64,
          (pz / self.config.classify_period) as f64,
        ) as f32;
        let Some(band) = self.classify(t) else {
          continue;
        };

        let py = pos.y as f32
          - self.noise.fractal(
            (px * self.config.height_frequency) as f64,
            self.config.height_plane as f64,
            (pz * self.config.height_frequency) as f64,
            self.config.octaves,
          ) as f32;

        let hue = (self
          .noise
          .noise3(
            (px / self.config.color_period) as f64,
            self.config.color_plane as f64,
            (pz / self.config.color_period) as f64,
          )
          .abs() as f32
          * 360.0)
          .floor()
          % 360.0;

        let shape = match band.shape {
          BandShape::Cube => PrimitiveShape::Cube { edge: cell_size },
          BandShape::Sphere => PrimitiveShape::Sphere {
            radius: cell_size / 2.0,
          },
        };

        let rotation = if self.config.randomize_rotation {
          Quat::from_euler(
            EulerRot::XYZ,
            rng.next_f32() * TAU,
            rng.next_f32() * TAU,
            rng.next_f32() * TAU,
          )
        } else {
          Quat::IDENTITY
        };

        specs.push(PrimitiveSpec {
          shape,
          position: Vec3::new(px, py, pz) * self.chunk_size,
          rotation,
          color: Color::hsl(hue, band.saturation, band.lightness),
          surface: self.config.surface,
        });
      }
    }

    specs
  }
}

#[cfg(test)]
mod tests {
  use rand::Rng;

  use super::*;
  use crate::noise::world_seed_from_name;

  fn generator(seed: i64) -> NoiseGenerator {
    NoiseGenerator::new(seed, 512.0, GeneratorConfig::default())
  }

  #[test]
  fn generation_is_deterministic() {
    // Same seed, same coordinate: field-for-field identical spec lists.
    let mut rng = rand::thread_rng();
    for _ in 0..20 {
      let seed = rng.gen_range(0..1i64 << 31);
      let pos = ChunkPos::new(rng.gen_range(-100..100), 0, rng.gen_range(-100..100));
      let a = generator(seed).generate(pos);
      let b = generator(seed).generate(pos);
      assert_eq!(a, b);
    }
  }

  #[test]
  fn repeated_calls_on_one_generator_are_idempotent() {
    let g = generator(world_seed_from_name("test-world"));
    let pos = ChunkPos::new(3, 0, -7);
    assert_eq!(g.generate(pos), g.generate(pos));
  }

  #[test]
  fn emits_at_most_one_primitive_per_sub_cell() {
    let g = generator(world_seed_from_name("test-world"));
    for x in -3..3 {
      for z in -3..3 {
        let specs = g.generate(ChunkPos::new(x, 0, z));
        assert!(specs.len() <= 64);
      }
    }
  }

  #[test]
  fn all_primitives_are_static() {
    let g = generator(42);
    for spec in g.generate(ChunkPos::new(5, 0, 5)) {
      assert_eq!(spec.surface.mass, 0.0);
      assert_eq!(spec.surface.friction, 0.9);
      assert_eq!(spec.surface.restitution, 0.1);
    }
  }

  #[test]
  fn neutral_band_everywhere_emits_nothing() {
    // Thresholds outside the noise range leave every cell in the empty band.
    let mut config = GeneratorConfig::default();
    config.raised.threshold = 2.0;
    config.lowered.threshold = -2.0;
    let g = NoiseGenerator::new(42, 512.0, config);
    assert!(g.generate(ChunkPos::new(0, 0, 0)).is_empty());
  }

  #[test]
  fn rotation_is_identity_unless_randomized() {
    let g = generator(42);
    for spec in g.generate(ChunkPos::new(1, 0, 1)) {
      assert_eq!(spec.rotation, Quat::IDENTITY);
    }

    let mut config = GeneratorConfig::default();
    config.randomize_rotation = true;
    let g = NoiseGenerator::new(42, 512.0, config);
    // Randomized rotations are still deterministic per chunk.
    let a = g.generate(ChunkPos::new(1, 0, 1));
    let b = g.generate(ChunkPos::new(1, 0, 1));
    assert_eq!(a, b);
  }

  #[test]
  fn positions_fall_inside_chunk_footprint() {
    let chunk_size = 512.0;
    let g = generator(world_seed_from_name("test-world"));
    for x in -2..2 {
      for z in -2..2 {
        let pos = ChunkPos::new(x, 0, z);
        let center = pos.to_world(chunk_size);
        for spec in g.generate(pos) {
          assert!((spec.position.x - center.x).abs() <= chunk_size / 2.0);
          assert!((spec.position.z - center.z).abs() <= chunk_size / 2.0);
        }
      }
    }
  }
}
