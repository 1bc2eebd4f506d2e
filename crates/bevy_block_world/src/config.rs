//! Engine configuration and validation.
//!
//! Configuration is immutable once streaming starts. Invalid values are
//! fatal at startup: the engine refuses to enumerate an unbounded or empty
//! active set rather than limp along.

use serde::Deserialize;

use crate::primitives::SurfaceProps;

/// Top-level streaming configuration.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct BlockWorldConfig {
  /// World units per chunk edge.
  pub chunk_size: f32,
  /// Chunks within this planar radius of the observer stay loaded.
  pub chunk_radius: i32,
  /// Vertical chunk layer the streaming disc is built on.
  ///
  /// Pinned rather than derived from the observer so that jumping or
  /// falling never churns the window.
  pub stream_layer: i32,
  /// Delay between queue drains, in milliseconds.
  pub throttle_ms: u64,
  /// Safety padding subtracted from every chunk floor height.
  pub floor_padding: f32,
  /// Floor height assumed for chunks that generated no primitives.
  pub default_floor: f32,
  /// Content generation parameters.
  pub generator: GeneratorConfig,
}

impl Default for BlockWorldConfig {
  fn default() -> Self {
    Self {
      chunk_size: 512.0,
      chunk_radius: 2,
      stream_layer: 0,
      throttle_ms: 50,
      floor_padding: 30.0,
      default_floor: 0.0,
      generator: GeneratorConfig::default(),
    }
  }
}

impl BlockWorldConfig {
  /// Parses and validates a TOML configuration string.
  pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
    let config: Self = toml::from_str(s)?;
    config.validate()?;
    Ok(config)
  }

  /// Checks the invariants the engine relies on.
  pub fn validate(&self) -> Result<(), ConfigError> {
    if !self.chunk_size.is_finite() || self.chunk_size <= 0.0 {
      return Err(ConfigError::NonPositiveChunkSize(self.chunk_size));
    }
    if self.chunk_radius <= 0 {
      return Err(ConfigError::NonPositiveChunkRadius(self.chunk_radius));
    }
    if self.generator.grid == 0 {
      return Err(ConfigError::ZeroSubGrid);
    }
    if self.generator.octaves == 0 {
      return Err(ConfigError::ZeroOctaves);
    }
    Ok(())
  }
}

/// Parameters of the noise-driven chunk content generator.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
  /// Sub-cells per chunk edge; each chunk samples `grid * grid` cells.
  pub grid: u32,
  /// Fractal octaves for the height field.
  pub octaves: u32,
  /// Frequency multiplier for height sampling.
  pub height_frequency: f32,
  /// Fixed vertical sampling plane for the height field.
  pub height_plane: f32,
  /// Spatial period of the classification noise, in chunk units.
  pub classify_period: f32,
  /// Spatial period of the hue noise, in chunk units.
  pub color_period: f32,
  /// Fixed vertical sampling plane for the hue noise.
  pub color_plane: f32,
  /// Rotate raised blocks by per-chunk seeded random Euler angles.
  pub randomize_rotation: bool,
  /// Band emitting raised blocks.
  pub raised: BandConfig,
  /// Band emitting lowered markers.
  pub lowered: BandConfig,
  /// Surface properties applied to every generated primitive.
  pub surface: SurfaceProps,
}

impl Default for GeneratorConfig {
  fn default() -> Self {
    Self {
      grid: 8,
      octaves: 6,
      height_frequency: 4.0,
      height_plane: 100.0,
      classify_period: 10.0,
      color_period: 20.0,
      color_plane: 100.0,
      randomize_rotation: false,
      raised: BandConfig {
        threshold: 0.3,
        shape: BandShape::Cube,
        saturation: 1.0,
        lightness: 0.7,
      },
      lowered: BandConfig {
        threshold: -0.3,
        shape: BandShape::Sphere,
        saturation: 0.75,
        lightness: 0.5,
      },
      surface: SurfaceProps::default(),
    }
  }
}

/// Primitive shape emitted by a classification band.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BandShape {
  Cube,
  Sphere,
}

/// One classification band of the threshold noise.
///
/// The raised band matches values above its threshold, the lowered band
/// values below its (negative) threshold; everything between is empty.
#[derive(Clone, Copy, Debug, Deserialize)]
pub struct BandConfig {
  pub threshold: f32,
  pub shape: BandShape,
  /// HSL saturation of generated colors.
  pub saturation: f32,
  /// HSL lightness of generated colors.
  pub lightness: f32,
}

/// Configuration validation errors.
#[derive(Debug)]
pub enum ConfigError {
  NonPositiveChunkSize(f32),
  NonPositiveChunkRadius(i32),
  ZeroSubGrid,
  ZeroOctaves,
  Parse(toml::de::Error),
}

impl std::fmt::Display for ConfigError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Self::NonPositiveChunkSize(v) => write!(f, "chunk_size must be positive, got {}", v),
      Self::NonPositiveChunkRadius(v) => write!(f, "chunk_radius must be positive, got {}", v),
      Self::ZeroSubGrid => write!(f, "generator.grid must be at least 1"),
      Self::ZeroOctaves => write!(f, "generator.octaves must be at least 1"),
      Self::Parse(e) => write!(f, "configuration parse error: {}", e),
    }
  }
}

impl std::error::Error for ConfigError {}

impl From<toml::de::Error> for ConfigError {
  fn from(e: toml::de::Error) -> Self {
    Self::Parse(e)
  }
}
