//! Full Bevy E2E streaming test.
//!
//! Drives a headless app with a streaming observer:
//! 1. Spawn a world and observer, run until the window fills
//! 2. Move the observer, verify the window follows (spawns and despawns)
//! 3. Remove the observer, verify streaming pauses

use std::sync::Arc;
use std::time::Duration;

use bevy::prelude::*;
use bevy_block_world::{
  BlockPrimitive, BlockWorld, BlockWorldConfig, BlockWorldPlugin, ChunkGenerator, ChunkPos,
  NoiseGenerator, PrimitiveShape, PrimitiveSpec, StreamingObserver, SurfaceProps,
  world_seed_from_name,
};

const CHUNK_SIZE: f32 = 512.0;

/// Emits exactly one static cube per chunk, at a known height.
struct UnitCubeGenerator;

impl ChunkGenerator for UnitCubeGenerator {
  fn generate(&self, pos: ChunkPos) -> Vec<PrimitiveSpec> {
    let mut position = pos.to_world(CHUNK_SIZE);
    position.y = -10.0;
    vec![PrimitiveSpec {
      shape: PrimitiveShape::Cube { edge: 64.0 },
      position,
      rotation: Quat::IDENTITY,
      color: Color::WHITE,
      surface: SurfaceProps::default(),
    }]
  }
}

struct TestHarness {
  app: App,
  observer: Entity,
}

impl TestHarness {
  fn new(generator: Arc<dyn ChunkGenerator>) -> Self {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins);
    app.add_plugins(BlockWorldPlugin);

    // Short throttle so tests drain roughly one job per update.
    let mut config = BlockWorldConfig::default();
    config.throttle_ms = 1;

    let observer = app
      .world_mut()
      .spawn((
        Transform::default(),
        GlobalTransform::default(),
        StreamingObserver,
      ))
      .id();

    let world = BlockWorld::new(config, generator).unwrap();
    app.world_mut().spawn(world);
    app.update();

    Self { app, observer }
  }

  /// Runs updates with a real delay so the throttle timer advances.
  fn run(&mut self, updates: usize) {
    for _ in 0..updates {
      std::thread::sleep(Duration::from_millis(2));
      self.app.update();
    }
  }

  fn world(&mut self) -> &BlockWorld {
    let mut q = self.app.world_mut().query::<&BlockWorld>();
    q.single(self.app.world()).unwrap()
  }

  fn move_observer(&mut self, position: Vec3) {
    let mut entity = self.app.world_mut().entity_mut(self.observer);
    let mut transform = entity.get_mut::<Transform>().unwrap();
    transform.translation = position;
    let copied = *transform;
    drop(transform);
    // MinimalPlugins doesn't run transform propagation.
    let mut global = entity.get_mut::<GlobalTransform>().unwrap();
    *global = GlobalTransform::from(copied);
  }

  fn primitive_count(&mut self) -> usize {
    let mut q = self.app.world_mut().query::<&BlockPrimitive>();
    q.iter(self.app.world()).count()
  }
}

#[test]
fn streams_initial_window_around_observer() {
  let mut harness = TestHarness::new(Arc::new(UnitCubeGenerator));
  harness.run(40);

  let world = harness.world();
  assert_eq!(world.active_count(), 13);
  assert_eq!(world.loaded_count(), 13);
  assert_eq!(world.pending_jobs(), 0);
  // One cube per chunk at y = -10, default padding 30.
  assert_eq!(world.aggregate_floor(), -40.0);
  assert_eq!(harness.primitive_count(), 13);
}

#[test]
fn window_follows_the_observer() {
  let mut harness = TestHarness::new(Arc::new(UnitCubeGenerator));
  harness.run(40);

  harness.move_observer(Vec3::new(3.0 * CHUNK_SIZE, 0.0, 0.0));
  harness.run(60);

  let world = harness.world();
  assert_eq!(world.loaded_count(), 13);
  assert_eq!(world.pending_jobs(), 0);
  assert!(world.is_loaded(ChunkPos::new(3, 0, 0)));
  assert!(world.is_loaded(ChunkPos::new(5, 0, 0)));
  assert!(!world.is_loaded(ChunkPos::new(0, 0, 0)));
  // Entities for dropped chunks were despawned, not leaked.
  assert_eq!(harness.primitive_count(), 13);
}

#[test]
fn sub_chunk_movement_changes_nothing() {
  let mut harness = TestHarness::new(Arc::new(UnitCubeGenerator));
  harness.run(40);

  harness.move_observer(Vec3::new(200.0, 0.0, -200.0));
  harness.run(10);

  let world = harness.world();
  assert_eq!(world.loaded_count(), 13);
  assert_eq!(world.pending_jobs(), 0);
  assert_eq!(harness.primitive_count(), 13);
}

#[test]
fn removing_the_observer_pauses_streaming() {
  let mut harness = TestHarness::new(Arc::new(UnitCubeGenerator));
  harness.run(40);

  let observer = harness.observer;
  harness.app.world_mut().despawn(observer);
  harness.run(10);

  // Nothing streams in or out without an observer.
  let world = harness.world();
  assert_eq!(world.loaded_count(), 13);
  assert_eq!(world.pending_jobs(), 0);
  assert_eq!(harness.primitive_count(), 13);
}

#[test]
fn noise_generator_streams_deterministic_terrain() {
  let seed = world_seed_from_name("test-world");
  let config = BlockWorldConfig::default();
  let generator = NoiseGenerator::new(seed, config.chunk_size, config.generator.clone());
  let mut harness = TestHarness::new(Arc::new(generator));
  harness.run(40);

  let world = harness.world();
  assert_eq!(world.loaded_count(), 13);
  assert_eq!(world.pending_jobs(), 0);
  assert!(world.aggregate_floor().is_finite());

  // The same seed produces the same specs outside the app.
  let a = NoiseGenerator::new(seed, config.chunk_size, config.generator.clone());
  let b = NoiseGenerator::new(seed, config.chunk_size, config.generator.clone());
  for pos in bevy_block_world::active_positions(ChunkPos::new(0, 0, 0), 2, 0) {
    assert_eq!(a.generate(pos), b.generate(pos));
  }
}
