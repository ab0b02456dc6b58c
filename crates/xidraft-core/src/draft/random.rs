// Injectable randomness: a uniform index draw and a uniform shuffle.

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Random primitives used by the draft engine.
///
/// Object safe so the session can hold a `Box<dyn RandomSource>`; tests swap
/// in seeded or scripted sources. `Send + Sync` so the app loop can run on any
/// runtime worker.
pub trait RandomSource: Send + Sync {
    /// Uniform index in `0..len`. Callers never pass `len == 0`.
    fn index(&mut self, len: usize) -> usize;

    /// Uniformly permute `order` in place.
    fn shuffle(&mut self, order: &mut [usize]);
}

impl<T: RandomSource + ?Sized> RandomSource for Box<T> {
    fn index(&mut self, len: usize) -> usize {
        (**self).index(len)
    }

    fn shuffle(&mut self, order: &mut [usize]) {
        (**self).shuffle(order)
    }
}

/// ChaCha-backed source; reproducible when built from a seed.
#[derive(Debug, Clone)]
pub struct SeededRandom {
    rng: ChaCha8Rng,
}

impl SeededRandom {
    pub fn from_seed(seed: u64) -> Self {
        SeededRandom {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    pub fn from_entropy() -> Self {
        SeededRandom {
            rng: ChaCha8Rng::from_entropy(),
        }
    }

    /// Seeded when a seed is configured, entropy-seeded otherwise.
    pub fn from_optional_seed(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::from_seed(seed),
            None => Self::from_entropy(),
        }
    }
}

impl RandomSource for SeededRandom {
    fn index(&mut self, len: usize) -> usize {
        self.rng.gen_range(0..len)
    }

    fn shuffle(&mut self, order: &mut [usize]) {
        // Fisher-Yates
        order.shuffle(&mut self.rng);
    }
}
