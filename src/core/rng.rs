//! Deterministic random number generation for die rolls.
//!
//! Only the `roll` formula consumes randomness; everything else in the
//! resolution core is deterministic. The RNG is seeded and checkpointable
//! so a scheduler can replay a fight exactly.
//!
//! ```
//! use hero_tactics::core::GameRng;
//!
//! let mut a = GameRng::new(7);
//! let mut b = GameRng::new(7);
//! assert_eq!(a.roll_die(20), b.roll_die(20));
//! ```

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Seeded ChaCha8 stream.
#[derive(Clone, Debug)]
pub struct GameRng {
    inner: ChaCha8Rng,
    seed: u64,
    forks: u64,
}

impl GameRng {
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
            seed,
            forks: 0,
        }
    }

    /// Split off an independent stream, e.g. for a trigger-driven cast
    /// that must not disturb the main sequence.
    #[must_use]
    pub fn fork(&mut self) -> Self {
        self.forks += 1;
        Self::new(self.seed.wrapping_add(self.forks.wrapping_mul(0x9E37_79B9_7F4A_7C15)))
    }

    /// Roll a die with `sides` faces, uniform in `1..=sides`.
    ///
    /// A die with fewer than one face always rolls 0.
    pub fn roll_die(&mut self, sides: u32) -> i32 {
        if sides == 0 {
            return 0;
        }
        let sides = i32::try_from(sides).unwrap_or(i32::MAX);
        self.inner.gen_range(1..=sides)
    }

    /// Where this stream stands, for saving alongside a board snapshot.
    #[must_use]
    pub fn checkpoint(&self) -> GameRngState {
        GameRngState {
            seed: self.seed,
            position: self.inner.get_word_pos(),
            forks: self.forks,
        }
    }

    /// Resume a stream exactly where a checkpoint left it.
    #[must_use]
    pub fn restore(checkpoint: &GameRngState) -> Self {
        let mut inner = ChaCha8Rng::seed_from_u64(checkpoint.seed);
        inner.set_word_pos(checkpoint.position);
        Self {
            inner,
            seed: checkpoint.seed,
            forks: checkpoint.forks,
        }
    }
}

/// Saved position of a [`GameRng`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameRngState {
    pub seed: u64,
    /// ChaCha word position.
    pub position: u128,
    pub forks: u64,
}
