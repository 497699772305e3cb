//! Deterministic random source
//!
//! One `SimRng` is owned by the engine and threaded by `&mut` into every
//! subsystem that needs randomness. The same seed plus the same call
//! sequence yields an identical stream, and the stream position survives
//! save/restore so a restored game continues the exact draws an unsaved
//! run would have made.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

#[derive(Debug, Clone)]
pub struct SimRng {
    seed: u64,
    rng: ChaCha8Rng,
}

impl SimRng {
    pub fn seed_from_u64(seed: u64) -> Self {
        Self {
            seed,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Uniform draw in [0, 1)
    pub fn uniform(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }

    /// Inclusive integer draw; degenerate ranges return `lo` without
    /// consuming a draw
    pub fn int_range(&mut self, lo: i64, hi: i64) -> i64 {
        if hi <= lo {
            return lo;
        }
        self.rng.gen_range(lo..=hi)
    }

    /// Probability check consuming exactly one draw
    pub fn chance(&mut self, probability: f64) -> bool {
        self.uniform() < probability
    }

    /// Weighted index selection; non-positive weights are skipped.
    /// An all-zero table falls back to index 0.
    pub fn pick(&mut self, weights: &[f64]) -> usize {
        let total: f64 = weights.iter().filter(|w| **w > 0.0).sum();
        if total <= 0.0 {
            return 0;
        }
        let mut roll = self.uniform() * total;
        for (i, w) in weights.iter().enumerate() {
            if *w <= 0.0 {
                continue;
            }
            if roll < *w {
                return i;
            }
            roll -= w;
        }
        weights.len() - 1
    }
}

/// Wire form: the seed plus the ChaCha word position split into two u64s
#[derive(Serialize, Deserialize)]
struct RngState {
    seed: u64,
    word_pos_lo: u64,
    word_pos_hi: u64,
}

impl Serialize for SimRng {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let pos = self.rng.get_word_pos();
        RngState {
            seed: self.seed,
            word_pos_lo: pos as u64,
            word_pos_hi: (pos >> 64) as u64,
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for SimRng {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let state = RngState::deserialize(deserializer)?;
        if state.word_pos_hi > 0x3F {
            // ChaCha word positions are 68 bits wide
            return Err(D::Error::custom("rng word position out of range"));
        }
        let mut rng = ChaCha8Rng::seed_from_u64(state.seed);
        rng.set_word_pos(((state.word_pos_hi as u128) << 64) | state.word_pos_lo as u128);
        Ok(Self {
            seed: state.seed,
            rng,
        })
    }
}
