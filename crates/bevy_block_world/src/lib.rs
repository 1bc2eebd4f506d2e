//! Block World - chunk streaming plugin for procedurally generated worlds.
//!
//! Maintains a bounded, moving window of generated terrain around an
//! observer. Content is decided by deterministic seeded noise (same seed +
//! same chunk coordinate ⇒ same content, on every client), created and
//! destroyed through a coalescing work queue drained at a throttled rate so
//! streaming never competes with the frame budget for more than one chunk's
//! worth of work per interval.
//!
//! # Usage
//!
//! ```ignore
//! use std::sync::Arc;
//! use bevy_block_world::{
//!   BlockWorld, BlockWorldConfig, BlockWorldPlugin, NoiseGenerator, StreamingObserver,
//!   world_seed_from_name,
//! };
//!
//! let config = BlockWorldConfig::default();
//! let seed = world_seed_from_name("my-world");
//! let generator = NoiseGenerator::new(seed, config.chunk_size, config.generator.clone());
//!
//! app.add_plugins(BlockWorldPlugin);
//! app.world_mut().spawn(BlockWorld::new(config, Arc::new(generator))?);
//! // Mark the player (or camera) entity:
//! app.world_mut().spawn((Transform::default(), GlobalTransform::default(), StreamingObserver));
//! ```

use bevy::prelude::*;

pub mod config;
pub mod coords;
pub mod noise;
pub mod primitives;
pub mod seeding;
pub mod world;

pub use config::{BandConfig, BandShape, BlockWorldConfig, ConfigError, GeneratorConfig};
pub use coords::{ChunkPos, active_positions};
pub use noise::{GradientNoise, Lcg, chunk_sub_seed, hash_string, world_seed_from_name};
pub use primitives::{BlockPrimitive, PrimitiveHost, PrimitiveShape, PrimitiveSpec, SurfaceProps};
pub use seeding::{ChunkGenerator, NoiseGenerator};
pub use world::systems::StreamingObserver;
pub use world::{BlockWorld, DrainState, Job, JobKind};

use world::systems::{drain_stream_queues, update_streaming};

/// Plugin wiring the streaming systems into the schedule.
///
/// Each [`BlockWorld`] component is an independent streaming session; the
/// plugin only registers the systems that drive them.
#[derive(Default)]
pub struct BlockWorldPlugin;

impl Plugin for BlockWorldPlugin {
  fn build(&self, app: &mut App) {
    app.add_systems(Update, (update_streaming, drain_stream_queues).chain());
  }
}
