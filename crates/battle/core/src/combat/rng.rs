//! Random source used by every roll in a battle.
//!
//! All rolls go through [`Roller`] so that a battle seeded identically replays
//! identically, and tests can script exact roll values.

use std::collections::VecDeque;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Source of uniform random numbers.
pub trait Roller: Send {
    /// Uniform value in `[0, 1)`.
    fn unit(&mut self) -> f32;

    /// Uniform value in `[min, max)`.
    fn range(&mut self, min: f32, max: f32) -> f32 {
        min + (max - min) * self.unit()
    }

    /// Uniform index in `[0, len)`. `len` must be non-zero.
    fn index(&mut self, len: usize) -> usize {
        let i = (self.unit() * len as f32) as usize;
        i.min(len.saturating_sub(1))
    }

    /// True with probability `chance`.
    fn chance(&mut self, chance: f32) -> bool {
        self.unit() < chance
    }
}

/// Seeded ChaCha8 generator. The default production source.
#[derive(Clone, Debug)]
pub struct SeededRoller {
    rng: ChaCha8Rng,
}

impl SeededRoller {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    pub fn from_entropy() -> Self {
        Self {
            rng: ChaCha8Rng::from_entropy(),
        }
    }
}

impl Roller for SeededRoller {
    fn unit(&mut self) -> f32 {
        self.rng.r#gen::<f32>()
    }

    fn index(&mut self, len: usize) -> usize {
        self.rng.gen_range(0..len.max(1))
    }
}

/// Replays a fixed list of values, then repeats a fallback forever.
///
/// Intended for tests that need to force dodge, block or crit outcomes.
#[derive(Clone, Debug)]
pub struct ScriptedRoller {
    values: VecDeque<f32>,
    fallback: f32,
}

impl ScriptedRoller {
    pub fn new(values: impl IntoIterator<Item = f32>) -> Self {
        Self {
            values: values.into_iter().collect(),
            fallback: 0.99,
        }
    }

    /// Roller that always returns `value`.
    pub fn constant(value: f32) -> Self {
        Self {
            values: VecDeque::new(),
            fallback: value,
        }
    }

    #[must_use]
    pub fn with_fallback(mut self, fallback: f32) -> Self {
        self.fallback = fallback;
        self
    }

    pub fn push(&mut self, value: f32) {
        self.values.push_back(value);
    }

    pub fn remaining(&self) -> usize {
        self.values.len()
    }
}

impl Roller for ScriptedRoller {
    fn unit(&mut self) -> f32 {
        self.values.pop_front().unwrap_or(self.fallback)
    }
}
