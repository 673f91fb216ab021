//! Deterministic random number streams
//!
//! Game logic draws from a single `logic` stream so that a seed fully
//! determines world generation and simulation. Cosmetic jitter draws from a
//! separately derived stream and never perturbs the logic sequence.

use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

pub struct RngManager {
    seed: u64,
    logic: ChaCha8Rng,
    cosmetic: ChaCha8Rng,
}

impl RngManager {
    pub fn new(seed: u64) -> Self {
        let mut master = ChaCha8Rng::seed_from_u64(seed);
        let logic = derive_stream(&mut master);
        let cosmetic = derive_stream(&mut master);
        Self {
            seed,
            logic,
            cosmetic,
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// The shared stream for everything that affects simulation state.
    pub fn logic(&mut self) -> &mut ChaCha8Rng {
        &mut self.logic
    }

    /// Visual-only randomness (feedback jitter).
    pub fn cosmetic(&mut self) -> &mut ChaCha8Rng {
        &mut self.cosmetic
    }
}

impl Default for RngManager {
    fn default() -> Self {
        Self::new(42)
    }
}

fn derive_stream(master: &mut ChaCha8Rng) -> ChaCha8Rng {
    let mut seed_bytes = [0u8; 8];
    master.fill_bytes(&mut seed_bytes);
    ChaCha8Rng::seed_from_u64(u64::from_le_bytes(seed_bytes))
}

/// Helper functions for common random operations
pub trait RngExt {
    fn random_f32(&mut self, min: f32, max: f32) -> f32;
    fn chance(&mut self, probability: f32) -> bool;
}

impl<R: Rng> RngExt for R {
    fn random_f32(&mut self, min: f32, max: f32) -> f32 {
        self.gen::<f32>() * (max - min) + min
    }

    fn chance(&mut self, probability: f32) -> bool {
        self.gen::<f32>() < probability
    }
}
