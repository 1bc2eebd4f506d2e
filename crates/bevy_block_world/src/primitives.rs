//! Generated primitive descriptions and the render/physics collaborator
//! contract.
//!
//! The engine never touches rendering or physics directly: it emits
//! [`PrimitiveSpec`]s and hands them to a [`PrimitiveHost`], receiving back
//! opaque entity handles that only the lifecycle table may hold.

use bevy::prelude::*;
use serde::Deserialize;

/// Shape of a generated world primitive.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PrimitiveShape {
  /// Axis-aligned cube with the given edge length.
  Cube { edge: f32 },
  /// Sphere with the given radius.
  Sphere { radius: f32 },
}

/// Physical material properties of a generated primitive.
///
/// Mass zero marks the primitive as static/immovable.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct SurfaceProps {
  pub friction: f32,
  pub restitution: f32,
  pub mass: f32,
}

impl Default for SurfaceProps {
  fn default() -> Self {
    Self {
      friction: 0.9,
      restitution: 0.1,
      mass: 0.0,
    }
  }
}

/// Complete description of one primitive to materialize.
///
/// Specs are plain values: generating a chunk twice with the same seed and
/// configuration yields field-for-field identical lists.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PrimitiveSpec {
  pub shape: PrimitiveShape,
  /// World-space position.
  pub position: Vec3,
  pub rotation: Quat,
  pub color: Color,
  pub surface: SurfaceProps,
}

/// Collaborator contract for primitive creation and removal.
///
/// Implemented by the Bevy layer over `Commands`; tests substitute a mock.
/// Creation may fail (`None`), in which case the engine records the gap and
/// moves on. Removal reports whether the handle was actually released.
pub trait PrimitiveHost {
  fn add_primitive(&mut self, spec: &PrimitiveSpec) -> Option<Entity>;
  fn remove_primitive(&mut self, handle: Entity) -> bool;
}

/// Component attached to every entity spawned for a generated primitive.
///
/// Downstream rendering and physics read shape, color, and surface
/// properties from here; the engine itself only keeps the entity handle.
#[derive(Component, Clone, Copy, Debug)]
pub struct BlockPrimitive {
  pub shape: PrimitiveShape,
  pub color: Color,
  pub surface: SurfaceProps,
}
