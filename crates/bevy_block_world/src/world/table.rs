//! Ownership table for generated chunk resources.
//!
//! The single source of truth for "what exists": every primitive handle
//! created for a chunk lives here and nowhere else. At most one record per
//! coordinate can be alive at any instant.

use std::collections::HashMap;

use bevy::prelude::*;

use crate::coords::ChunkPos;

/// Resources owned by one generated chunk.
#[derive(Debug)]
pub struct GeneratedChunk {
  /// Handles of every primitive created for this chunk.
  pub handles: Vec<Entity>,
  /// Lowest primitive height minus the configured padding, or the default
  /// floor for chunks that generated nothing.
  pub floor_height: f32,
}

/// Coordinate-keyed table of generated chunks.
#[derive(Debug, Default)]
pub struct ChunkTable {
  chunks: HashMap<ChunkPos, GeneratedChunk>,
}

impl ChunkTable {
  pub fn new() -> Self {
    Self::default()
  }

  /// Records a freshly generated chunk. Returns the previous record if one
  /// existed; callers must have torn it down first.
  pub fn insert(&mut self, pos: ChunkPos, chunk: GeneratedChunk) -> Option<GeneratedChunk> {
    self.chunks.insert(pos, chunk)
  }

  /// Removes and returns a chunk record.
  pub fn remove(&mut self, pos: &ChunkPos) -> Option<GeneratedChunk> {
    self.chunks.remove(pos)
  }

  pub fn get(&self, pos: &ChunkPos) -> Option<&GeneratedChunk> {
    self.chunks.get(pos)
  }

  pub fn contains(&self, pos: &ChunkPos) -> bool {
    self.chunks.contains_key(pos)
  }

  pub fn len(&self) -> usize {
    self.chunks.len()
  }

  pub fn is_empty(&self) -> bool {
    self.chunks.is_empty()
  }

  /// Iterates over owned chunk coordinates.
  pub fn positions(&self) -> impl Iterator<Item = ChunkPos> + '_ {
    self.chunks.keys().copied()
  }

  /// Minimum floor height over all owned chunks.
  ///
  /// Falls back to `default_floor` when no chunks are owned. Used by
  /// gameplay as the "fell out of the world" threshold.
  pub fn aggregate_floor(&self, default_floor: f32) -> f32 {
    self
      .chunks
      .values()
      .map(|chunk| chunk.floor_height)
      .reduce(f32::min)
      .unwrap_or(default_floor)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn chunk(floor_height: f32) -> GeneratedChunk {
    GeneratedChunk {
      handles: Vec::new(),
      floor_height,
    }
  }

  #[test]
  fn aggregate_floor_is_minimum_over_chunks() {
    let mut table = ChunkTable::new();
    table.insert(ChunkPos::new(0, 0, 0), chunk(-10.0));
    table.insert(ChunkPos::new(1, 0, 0), chunk(-250.5));
    table.insert(ChunkPos::new(0, 0, 1), chunk(40.0));
    assert_eq!(table.aggregate_floor(0.0), -250.5);
  }

  #[test]
  fn aggregate_floor_defaults_when_empty() {
    let table = ChunkTable::new();
    assert_eq!(table.aggregate_floor(-30.0), -30.0);
  }

  #[test]
  fn remove_returns_ownership() {
    let mut table = ChunkTable::new();
    let pos = ChunkPos::new(2, 0, 2);
    table.insert(pos, chunk(-5.0));
    assert!(table.contains(&pos));
    let removed = table.remove(&pos).unwrap();
    assert_eq!(removed.floor_height, -5.0);
    assert!(!table.contains(&pos));
    assert!(table.remove(&pos).is_none());
  }
}
