//! Chunk content generation.
//!
//! The [`ChunkGenerator`] trait is the pluggable seam between the streaming
//! engine and whatever decides chunk content. The shipped implementation is
//! [`NoiseGenerator`]; tests substitute fixed generators.

mod noise;

pub use noise::NoiseGenerator;

use crate::coords::ChunkPos;
use crate::primitives::PrimitiveSpec;

/// Produces the primitive specs for a chunk coordinate.
///
/// Implementations must be stateless beyond configuration: calling
/// `generate` twice with the same coordinate must yield the same list, so
/// a chunk regenerated after a remove/re-add cycle is indistinguishable
/// from the first generation.
///
/// The `Send + Sync` bounds let generators be shared behind `Arc` across
/// streaming sessions.
pub trait ChunkGenerator: Send + Sync {
  fn generate(&self, pos: ChunkPos) -> Vec<PrimitiveSpec>;
}
