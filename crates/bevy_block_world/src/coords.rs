//! Chunk coordinate types and active-set geometry.
//!
//! The world is partitioned into a regular grid of cubic chunks. Chunk
//! boundaries sit at half-chunk offsets from the origin, so chunk (0,0,0)
//! is centered on the world origin rather than cornered there.

use std::fmt;

use bevy::prelude::*;

/// Position in the chunk grid.
///
/// The vertical component is carried for full-3D streaming but the active
/// set is a planar disc; see [`active_positions`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ChunkPos {
  pub x: i32,
  pub y: i32,
  pub z: i32,
}

impl ChunkPos {
  /// Creates a new chunk position.
  pub const fn new(x: i32, y: i32, z: i32) -> Self {
    Self { x, y, z }
  }

  /// Returns the chunk containing a world position.
  ///
  /// Rounds to the nearest chunk center: boundaries fall at half-chunk
  /// offsets, not at chunk edges.
  pub fn from_world(position: Vec3, chunk_size: f32) -> Self {
    Self::new(
      (position.x / chunk_size + 0.5).floor() as i32,
      (position.y / chunk_size + 0.5).floor() as i32,
      (position.z / chunk_size + 0.5).floor() as i32,
    )
  }

  /// Returns the central world position of this chunk.
  pub fn to_world(self, chunk_size: f32) -> Vec3 {
    Vec3::new(self.x as f32, self.y as f32, self.z as f32) * chunk_size
  }

  /// Squared distance to another chunk in the horizontal plane.
  ///
  /// Vertical extent is deliberately ignored; the streaming window is a
  /// disc, not a sphere.
  pub fn planar_distance_squared(self, other: ChunkPos) -> i64 {
    let dx = (self.x - other.x) as i64;
    let dz = (self.z - other.z) as i64;
    dx * dx + dz * dz
  }
}

impl fmt::Display for ChunkPos {
  /// Canonical `"x,y,z"` key, also used for per-chunk seed derivation.
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{},{},{}", self.x, self.y, self.z)
  }
}

/// Returns every chunk position within `radius` of `center`, nearest first.
///
/// Enumerates the bounding box around `center`, keeps positions whose
/// squared planar distance is at most `radius * radius`, and sorts them
/// ascending by that distance. The sort order is load-priority order:
/// chunks closest to the observer are generated first. All returned
/// positions sit on the vertical chunk layer `layer`.
pub fn active_positions(center: ChunkPos, radius: i32, layer: i32) -> Vec<ChunkPos> {
  let sq_radius = (radius as i64) * (radius as i64);
  let mut positions = Vec::new();
  for z in -radius..=radius {
    for x in -radius..=radius {
      let sq = (x as i64) * (x as i64) + (z as i64) * (z as i64);
      if sq > sq_radius {
        continue;
      }
      positions.push((ChunkPos::new(center.x + x, layer, center.z + z), sq));
    }
  }
  positions.sort_by_key(|&(_, sq)| sq);
  positions.into_iter().map(|(pos, _)| pos).collect()
}
