//! BlockWorld - the streaming engine.
//!
//! One [`BlockWorld`] is one independent streaming session: it owns the
//! active set, the work queue, the lifecycle table, and the throttle timer
//! as instance state, so multiple sessions (and tests) never share
//! anything. All mutation happens on the schedule's single logical thread;
//! no locking anywhere.
//!
//! Sub-modules:
//! - [`queue`] — coalescing job FIFO
//! - [`table`] — chunk resource ownership
//! - [`systems`] — the Bevy layer driving [`BlockWorld::step`] and
//!   [`BlockWorld::tick`]

pub mod queue;
pub mod systems;
pub mod table;

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use bevy::prelude::*;

pub use queue::{ChunkQueue, DrainState, Job, JobKind};
pub use table::{ChunkTable, GeneratedChunk};

use crate::config::{BlockWorldConfig, ConfigError};
use crate::coords::{ChunkPos, active_positions};
use crate::primitives::PrimitiveHost;
use crate::seeding::ChunkGenerator;

/// Streaming engine component.
///
/// Spawn one per world; mark the observer entity with
/// [`systems::StreamingObserver`] and add the
/// [`BlockWorldPlugin`](crate::BlockWorldPlugin) to drive it.
#[derive(Component)]
pub struct BlockWorld {
  config: BlockWorldConfig,
  generator: Arc<dyn ChunkGenerator>,
  /// Chunk coordinates that must currently exist. Recomputed fresh on
  /// every observer chunk change, never mutated incrementally.
  active: HashSet<ChunkPos>,
  /// Observer chunk from the previous update; debounces recomputation
  /// while the observer moves within one chunk.
  last_observer_chunk: Option<ChunkPos>,
  queue: ChunkQueue,
  table: ChunkTable,
  /// Inter-job delay; caps generation cost per scheduling interval.
  throttle: Timer,
}

impl BlockWorld {
  /// Creates a streaming engine, validating configuration first.
  ///
  /// Invalid configuration is fatal here: streaming never starts.
  pub fn new(
    config: BlockWorldConfig,
    generator: Arc<dyn ChunkGenerator>,
  ) -> Result<Self, ConfigError> {
    config.validate()?;
    let throttle = Timer::new(
      Duration::from_millis(config.throttle_ms),
      TimerMode::Repeating,
    );
    Ok(Self {
      config,
      generator,
      active: HashSet::new(),
      last_observer_chunk: None,
      queue: ChunkQueue::new(),
      table: ChunkTable::new(),
      throttle,
    })
  }

  /// Recomputes the active set for the observer position and queues the
  /// delta.
  ///
  /// `None` means no observer exists (e.g. during respawn): streaming is
  /// paused, no diff is produced, the queue keeps draining. Returns early
  /// without work when the observer stayed in its previous chunk.
  pub fn step(&mut self, observer: Option<Vec3>) {
    let Some(position) = observer else {
      return;
    };

    let observer_chunk = ChunkPos::from_world(position, self.config.chunk_size);
    if self.last_observer_chunk == Some(observer_chunk) {
      return;
    }
    self.last_observer_chunk = Some(observer_chunk);

    let ordered = active_positions(
      observer_chunk,
      self.config.chunk_radius,
      self.config.stream_layer,
    );
    let new_set: HashSet<ChunkPos> = ordered.iter().copied().collect();

    // `ordered` is nearest-first, which becomes generation priority.
    for &pos in &ordered {
      if !self.active.contains(&pos) {
        self.queue.push(Job::generate(pos));
      }
    }
    for &pos in &self.active {
      if !new_set.contains(&pos) {
        self.queue.push(Job::remove(pos));
      }
    }

    debug!(
      "observer chunk {}: {} active, {} queued",
      observer_chunk,
      new_set.len(),
      self.queue.len()
    );
    self.active = new_set;
  }

  /// Advances the throttle and drains at most one job when it fires.
  ///
  /// Returns true if a job executed.
  pub fn tick(&mut self, delta: Duration, host: &mut dyn PrimitiveHost) -> bool {
    self.throttle.tick(delta);
    if !self.throttle.just_finished() {
      return false;
    }
    self.drain_one(host)
  }

  /// Pops jobs until one survives re-validation, then executes it.
  ///
  /// A popped job is checked against the *current* active set: a Generate
  /// for a coordinate that left the set, or a Remove for a coordinate that
  /// re-entered it, is dropped without executing. Rapid back-and-forth
  /// observer movement produces such stale jobs despite enqueue-time
  /// coalescing. Dropped jobs don't consume the tick's job budget.
  pub fn drain_one(&mut self, host: &mut dyn PrimitiveHost) -> bool {
    loop {
      let Some(job) = self.queue.pop() else {
        return false;
      };
      let stale = match job.kind {
        JobKind::Generate => !self.active.contains(&job.pos),
        JobKind::Remove => self.active.contains(&job.pos),
      };
      if stale {
        debug!("dropping stale {:?} for chunk {}", job.kind, job.pos);
        continue;
      }
      match job.kind {
        JobKind::Generate => self.execute_generate(job.pos, host),
        JobKind::Remove => self.execute_remove(job.pos, host),
      }
      return true;
    }
  }

  /// Generates a chunk's content and records ownership.
  fn execute_generate(&mut self, pos: ChunkPos, host: &mut dyn PrimitiveHost) {
    // Regeneration tears the old chunk down first; two records for one
    // coordinate are never alive simultaneously.
    if self.table.contains(&pos) {
      self.execute_remove(pos, host);
    }

    let specs = self.generator.generate(pos);
    let mut handles = Vec::with_capacity(specs.len());
    let mut lowest = f32::INFINITY;
    for spec in &specs {
      match host.add_primitive(spec) {
        Some(handle) => {
          handles.push(handle);
          lowest = lowest.min(spec.position.y);
        }
        None => warn!("primitive creation failed in chunk {}", pos),
      }
    }

    let floor_height = if lowest.is_finite() {
      lowest - self.config.floor_padding
    } else {
      self.config.default_floor - self.config.floor_padding
    };
    self.table.insert(pos, GeneratedChunk {
      handles,
      floor_height,
    });
  }

  /// Releases a chunk's primitives and drops its record.
  ///
  /// A handle the host refuses to release is logged and abandoned; the
  /// record is dropped either way so the table always matches the active
  /// set.
  fn execute_remove(&mut self, pos: ChunkPos, host: &mut dyn PrimitiveHost) {
    let Some(chunk) = self.table.remove(&pos) else {
      return;
    };
    for handle in chunk.handles {
      if !host.remove_primitive(handle) {
        warn!("leaked primitive {:?} from chunk {}", handle, pos);
      }
    }
  }

  /// Minimum floor height over all generated chunks, the fallback
  /// out-of-bounds threshold for respawn logic.
  pub fn aggregate_floor(&self) -> f32 {
    self
      .table
      .aggregate_floor(self.config.default_floor - self.config.floor_padding)
  }

  pub fn config(&self) -> &BlockWorldConfig {
    &self.config
  }

  /// Number of chunks in the required active set.
  pub fn active_count(&self) -> usize {
    self.active.len()
  }

  /// Number of chunks whose content currently exists.
  pub fn loaded_count(&self) -> usize {
    self.table.len()
  }

  pub fn is_loaded(&self, pos: ChunkPos) -> bool {
    self.table.contains(&pos)
  }

  pub fn pending_jobs(&self) -> usize {
    self.queue.len()
  }

  pub fn drain_state(&self) -> DrainState {
    self.queue.state()
  }

  pub fn last_observer_chunk(&self) -> Option<ChunkPos> {
    self.last_observer_chunk
  }
}
