//! Bevy systems driving streaming and queue drain.
//!
//! Both systems run in `Update`, chained: observer movement first, then at
//! most one job per world when its throttle fires. Everything between
//! drains is ordinary frame work; the throttle is a cooperative yield, not
//! a blocking wait.

use bevy::prelude::*;

use super::BlockWorld;
use crate::primitives::{BlockPrimitive, PrimitiveHost, PrimitiveSpec};

/// Marker component for the entity whose position drives streaming.
///
/// No entity carrying this marker means no observer (e.g. during respawn):
/// streaming pauses while queued work keeps draining.
#[derive(Component)]
pub struct StreamingObserver;

/// System: feeds the observer position into every streaming session.
pub(crate) fn update_streaming(
  observer: Query<&GlobalTransform, With<StreamingObserver>>,
  mut worlds: Query<&mut BlockWorld>,
) {
  let observer_position = observer.single().ok().map(|t| t.translation());
  for mut world in worlds.iter_mut() {
    world.step(observer_position);
  }
}

/// System: advances each world's throttle and drains due jobs.
pub(crate) fn drain_stream_queues(
  mut commands: Commands,
  time: Res<Time>,
  mut worlds: Query<&mut BlockWorld>,
) {
  let delta = time.delta();
  for mut world in worlds.iter_mut() {
    let mut host = CommandsHost {
      commands: &mut commands,
    };
    world.tick(delta, &mut host);
  }
}

/// `PrimitiveHost` over `Commands`: generated primitives become entities.
struct CommandsHost<'a, 'w, 's> {
  commands: &'a mut Commands<'w, 's>,
}

impl PrimitiveHost for CommandsHost<'_, '_, '_> {
  fn add_primitive(&mut self, spec: &PrimitiveSpec) -> Option<Entity> {
    let entity = self
      .commands
      .spawn((
        BlockPrimitive {
          shape: spec.shape,
          color: spec.color,
          surface: spec.surface,
        },
        Transform::from_translation(spec.position).with_rotation(spec.rotation),
        Visibility::default(),
      ))
      .id();
    Some(entity)
  }

  fn remove_primitive(&mut self, handle: Entity) -> bool {
    self
      .commands
      .get_entity(handle)
      .map(|mut entity| {
        entity.despawn();
        true
      })
      .unwrap_or(false)
  }
}
