//! Deterministic seeded noise.
//!
//! Everything in this module is a pure function of `(seed, coordinates)`:
//! identical inputs always yield bit-identical output. Clients and the
//! generator derive terrain from the shared world seed alone, so no
//! geometry ever crosses the network.

use crate::coords::ChunkPos;

/// Park-Miller modulus (a Mersenne prime, 2^31 - 1).
const LCG_MODULUS: i64 = 2_147_483_647;
/// Park-Miller multiplier.
const LCG_MULTIPLIER: i64 = 16_807;

/// Minimal-standard multiplicative congruential generator.
///
/// State stays in `[1, 2^31 - 2]`; the raw sequence never yields zero.
#[derive(Clone, Debug)]
pub struct Lcg {
  state: i64,
}

impl Lcg {
  /// Creates a generator from an arbitrary seed.
  ///
  /// Seeds congruent to zero are shifted into range so the sequence never
  /// degenerates to all zeros.
  pub fn new(seed: i64) -> Self {
    let mut state = seed % LCG_MODULUS;
    if state <= 0 {
      state += LCG_MODULUS - 1;
    }
    Self { state }
  }

  /// Advances the state and returns the next raw value in `[1, 2^31 - 2]`.
  fn next(&mut self) -> i64 {
    self.state = self.state * LCG_MULTIPLIER % LCG_MODULUS;
    self.state
  }

  /// Returns the next value in `[0, 1)`.
  pub fn next_f64(&mut self) -> f64 {
    (self.next() - 1) as f64 / (LCG_MODULUS - 1) as f64
  }

  /// Returns the next value in `[0, 1)` as `f32`.
  pub fn next_f32(&mut self) -> f32 {
    self.next_f64() as f32
  }
}

/// Polynomial rolling hash over a string's characters.
///
/// Folds each character as `hash = ch + (hash << 5) - hash` with wrapping
/// 32-bit arithmetic, i.e. `hash * 31 + ch`.
pub fn hash_string(s: &str) -> i32 {
  let mut hash: i32 = 0;
  for ch in s.chars() {
    hash = (ch as i32).wrapping_add((hash << 5).wrapping_sub(hash));
  }
  hash
}

/// Derives the session world seed from a human-readable world name.
///
/// The name is trimmed and padded with a single trailing space before
/// hashing, then reduced to a non-negative 31-bit value.
pub fn world_seed_from_name(name: &str) -> i64 {
  let mut canonical = name.trim().to_owned();
  canonical.push(' ');
  (hash_string(&canonical) & 0x7fff_ffff) as i64
}

/// Per-chunk seed for randomized attributes (e.g. rotation).
///
/// Terrain shape never uses this: shape comes from raw coordinate sampling
/// so neighboring chunks sample one continuous field.
pub fn chunk_sub_seed(world_seed: i64, pos: ChunkPos) -> i64 {
  world_seed + hash_string(&pos.to_string()) as i64
}

/// Gradient vectors for the coherent-noise lattice.
const GRADIENT: [[f64; 3]; 16] = [
  [1.0, 1.0, 0.0],
  [-1.0, 1.0, 0.0],
  [1.0, -1.0, 0.0],
  [-1.0, -1.0, 0.0],
  [1.0, 0.0, 1.0],
  [-1.0, 0.0, 1.0],
  [1.0, 0.0, -1.0],
  [-1.0, 0.0, -1.0],
  [0.0, 1.0, 1.0],
  [0.0, -1.0, 1.0],
  [0.0, 1.0, -1.0],
  [0.0, -1.0, -1.0],
  [1.0, 1.0, 0.0],
  [0.0, -1.0, 1.0],
  [-1.0, 1.0, 0.0],
  [0.0, -1.0, -1.0],
];

/// Seeded coherent noise over a 256-entry permutation lattice.
///
/// Output is approximately in `[-1, 1]` and continuous in all three
/// coordinates. Two instances built from the same seed are
/// indistinguishable.
#[derive(Clone, Debug)]
pub struct GradientNoise {
  /// Permutation table.
  perm: [u8; 256],
  /// Coordinate offsets, decorrelating instances that share a lattice.
  xo: f64,
  yo: f64,
  zo: f64,
}

impl GradientNoise {
  /// Builds the permutation table from a seed via Fisher-Yates shuffle.
  pub fn new(seed: i64) -> Self {
    let mut rng = Lcg::new(seed);
    let xo = rng.next_f64() * 256.0;
    let yo = rng.next_f64() * 256.0;
    let zo = rng.next_f64() * 256.0;

    let mut perm = [0u8; 256];
    for (i, entry) in perm.iter_mut().enumerate() {
      *entry = i as u8;
    }
    for i in 0..256 {
      let offset = (rng.next_f64() * (256 - i) as f64) as usize;
      perm.swap(i, i + offset);
    }

    Self { perm, xo, yo, zo }
  }

  /// Permutation lookup, wrapping the index into the table.
  #[inline]
  fn p(&self, i: i32) -> i32 {
    self.perm[(i & 255) as usize] as i32
  }

  /// Samples 3D noise at the given coordinates.
  pub fn noise3(&self, x: f64, y: f64, z: f64) -> f64 {
    let x = x + self.xo;
    let y = y + self.yo;
    let z = z + self.zo;

    let xf = x.floor();
    let yf = y.floor();
    let zf = z.floor();
    let xi = xf as i32;
    let yi = yf as i32;
    let zi = zf as i32;
    let xr = x - xf;
    let yr = y - yf;
    let zr = z - zf;

    let u = fade(xr);
    let v = fade(yr);
    let w = fade(zr);

    let a = self.p(xi) + yi;
    let aa = self.p(a) + zi;
    let ab = self.p(a + 1) + zi;
    let b = self.p(xi + 1) + yi;
    let ba = self.p(b) + zi;
    let bb = self.p(b + 1) + zi;

    lerp(
      w,
      lerp(
        v,
        lerp(
          u,
          grad_dot(self.p(aa), xr, yr, zr),
          grad_dot(self.p(ba), xr - 1.0, yr, zr),
        ),
        lerp(
          u,
          grad_dot(self.p(ab), xr, yr - 1.0, zr),
          grad_dot(self.p(bb), xr - 1.0, yr - 1.0, zr),
        ),
      ),
      lerp(
        v,
        lerp(
          u,
          grad_dot(self.p(aa + 1), xr, yr, zr - 1.0),
          grad_dot(self.p(ba + 1), xr - 1.0, yr, zr - 1.0),
        ),
        lerp(
          u,
          grad_dot(self.p(ab + 1), xr, yr - 1.0, zr - 1.0),
          grad_dot(self.p(bb + 1), xr - 1.0, yr - 1.0, zr - 1.0),
        ),
      ),
    )
  }

  /// Samples 2D noise in the horizontal plane.
  pub fn noise2(&self, x: f64, z: f64) -> f64 {
    self.noise3(x, 0.0, z)
  }

  /// Layered fractal noise: `octaves` layers at doubling frequency and
  /// halving amplitude.
  ///
  /// The first octave is the lowest frequency at full amplitude, so large
  /// features dominate and higher octaves add progressively finer detail.
  pub fn fractal(&self, x: f64, y: f64, z: f64, octaves: u32) -> f64 {
    debug_assert!(octaves >= 1);
    let mut sum = 0.0;
    let mut amplitude = 1.0;
    let mut wavelength = (1i64 << (octaves - 1)) as f64;
    for _ in 0..octaves {
      sum += self.noise3(x / wavelength, y / wavelength, z / wavelength) * amplitude;
      amplitude /= 2.0;
      wavelength /= 2.0;
    }
    sum
  }
}

/// Quintic smoothstep, zero first and second derivatives at the lattice.
#[inline]
fn fade(t: f64) -> f64 {
  t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

#[inline]
fn lerp(t: f64, a: f64, b: f64) -> f64 {
  a + t * (b - a)
}

/// Dot product of a hashed gradient vector with the corner offset.
#[inline]
fn grad_dot(hash: i32, x: f64, y: f64, z: f64) -> f64 {
  let g = GRADIENT[(hash & 15) as usize];
  g[0] * x + g[1] * y + g[2] * z
}
