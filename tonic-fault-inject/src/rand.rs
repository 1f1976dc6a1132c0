//! Fast random sampling for fault decisions.
//!
//! Trigger decisions and status code picks only need a uniform-ish spread
//! under high call volume, not cryptographic quality. The [`Sampler`] trait
//! keeps the source injectable: production uses [`FastSampler`], tests that
//! want reproducible decisions hand in a [`SeededSampler`].

use std::fmt;
use std::sync::Arc;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use spin::Mutex;

/// A bounded uniform random integer source.
///
/// Implementations must be safe for unsynchronized concurrent use and must
/// not block the caller.
pub trait Sampler: Send + Sync {
    /// Returns a uniform random integer in `[0, n)`. `n` must be non zero.
    fn uniform(&self, n: u32) -> u32;

    /// Returns a uniform random integer in `[0, 100)`, to compare against a
    /// configured percentage.
    fn percent_roll(&self) -> u32 {
        self.uniform(100)
    }
}

/// Uniform selection from a non-empty slice of candidates.
pub fn pick_one<'a, T>(sampler: &dyn Sampler, candidates: &'a [T]) -> &'a T {
    &candidates[sampler.uniform(candidates.len() as u32) as usize]
}

/// The default sampler, backed by the per-thread generator from [`rand`].
#[derive(Debug, Default, Clone, Copy)]
pub struct FastSampler;

impl Sampler for FastSampler {
    fn uniform(&self, n: u32) -> u32 {
        rand::thread_rng().gen_range(0..n)
    }
}

/// A deterministic sampler, seeded once and shared by all clones.
#[derive(Clone)]
pub struct SeededSampler {
    inner: Arc<Mutex<SmallRng>>,
}

impl SeededSampler {
    /// Creates a new sampler from the given seed. Equal seeds produce equal
    /// decision sequences.
    pub fn new(seed: u64) -> Self {
        SeededSampler {
            inner: Arc::new(Mutex::new(SmallRng::seed_from_u64(seed))),
        }
    }
}

impl Sampler for SeededSampler {
    fn uniform(&self, n: u32) -> u32 {
        self.inner.lock().gen_range(0..n)
    }
}

impl fmt::Debug for SeededSampler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SeededSampler").finish_non_exhaustive()
    }
}
