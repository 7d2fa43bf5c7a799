//! Seeded pseudo-random numbers for per-particle attributes
//!
//! Everything here is exact wrapping `u32` arithmetic, so the same virtual id
//! and base seed produce the same bits on every platform and on every loop of
//! the emitter.

/// Random numbers start repeating after this many particles
///
/// Virtual ids are wrapped to this value before seed derivation so the
/// seed stays exactly representable once it reaches 32-bit floats downstream.
pub const RANDOM_REPEAT_COUNT: u64 = 131_072;

/// Modulus of the seed hash (2^32)
const MODULUS: f64 = 4_294_967_296.0;
/// LCG multiplier (Numerical Recipes)
const MULTIPLIER: u32 = 1_664_525;
/// LCG increment (Numerical Recipes)
const INCREMENT: u32 = 1_013_904_223;
/// Extra odd multiplier that spreads base seeds apart
const SEED_SPREAD: u32 = 22_695_477;
/// Golden ratio step used to separate successive draws from one seed
const DRAW_STEP: u32 = 0x9E37_79B9;

/// Derive the seed of one particle from the emitter seed and its virtual id
///
/// `((1664525 * virtual_id * base_seed * K + C) mod 2^32) / 2^32`
///
/// A zero factor collapses the product, so virtual id 0 and base seed 0
/// both yield `C / 2^32`.
pub fn virtual_seed(base_seed: u32, virtual_id: u64) -> f64 {
    let id = (virtual_id % RANDOM_REPEAT_COUNT) as u32;
    let state = MULTIPLIER
        .wrapping_mul(id)
        .wrapping_mul(base_seed)
        .wrapping_mul(SEED_SPREAD)
        .wrapping_add(INCREMENT);
    f64::from(state) / MODULUS
}

/// Deterministic random stream keyed by a particle seed
///
/// Each call to [`SeededRandom::next_float`] advances an internal counter, so
/// drawing X, Y and Z from the same seed yields three decorrelated values.
/// [`SeededRandom::reset`] rewinds the counter; the scheduler does this per
/// spawn so a particle's attributes depend only on its seed.
#[derive(Debug, Clone, Default)]
pub struct SeededRandom {
    counter: u32,
}

impl SeededRandom {
    /// Create a stream with the counter at zero
    pub fn new() -> Self {
        Self { counter: 0 }
    }

    /// Rewind the draw counter
    pub fn reset(&mut self) {
        self.counter = 0;
    }

    /// Number of draws since the last reset
    pub fn draws(&self) -> u32 {
        self.counter
    }

    /// Generate a float in `[0, 1)` from `seed` and the current draw index
    pub fn next_float(&mut self, seed: f64) -> f64 {
        let key = (seed.fract().abs() * MODULUS) as u32;
        self.counter = self.counter.wrapping_add(1);
        let state = key.wrapping_add(self.counter.wrapping_mul(DRAW_STEP));
        let state = MULTIPLIER.wrapping_mul(state).wrapping_add(INCREMENT);
        f64::from(mix(state)) / MODULUS
    }

    /// Generate a float in `[min, max)`
    pub fn next_range(&mut self, seed: f64, min: f32, max: f32) -> f32 {
        let t = self.next_float(seed) as f32;
        min + (max - min) * t
    }
}

/// Final avalanche so neighbouring LCG states do not produce neighbouring floats
#[inline]
fn mix(mut h: u32) -> u32 {
    h ^= h >> 16;
    h = h.wrapping_mul(0x85EB_CA6B);
    h ^= h >> 13;
    h = h.wrapping_mul(0xC2B2_AE35);
    h ^= h >> 16;
    h
}
