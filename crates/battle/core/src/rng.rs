//! Random number sources for battle rolls.
//!
//! Every roll (accuracy, damage bonus, effect duration, initiative jitter)
//! goes through [`BattleRng`], so a battle replays exactly when seeded the
//! same way.

use std::collections::VecDeque;

/// Source of uniformly distributed integers.
pub trait BattleRng {
    fn next_u32(&mut self) -> u32;

    /// Uniform value in `[min, max]` inclusive.
    fn range(&mut self, min: u32, max: u32) -> u32 {
        if min >= max {
            return min;
        }
        let span = u64::from(max - min) + 1;
        min + (u64::from(self.next_u32()) % span) as u32
    }

    /// Uniform value in `[0, 100)`, compared against accuracy percentages.
    fn roll_percent(&mut self) -> u32 {
        self.next_u32() % 100
    }
}

/// PCG-XSH-RR generator: 64-bit state, 32-bit output.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PcgRng {
    state: u64,
}

impl PcgRng {
    const MULTIPLIER: u64 = 6364136223846793005;
    const INCREMENT: u64 = 1442695040888963407;

    pub fn seeded(seed: u64) -> Self {
        let mut rng = Self { state: 0 };
        rng.step();
        rng.state = rng.state.wrapping_add(seed);
        rng.step();
        rng
    }

    #[inline]
    fn step(&mut self) {
        self.state = self
            .state
            .wrapping_mul(Self::MULTIPLIER)
            .wrapping_add(Self::INCREMENT);
    }

    #[inline]
    fn output(state: u64) -> u32 {
        let xorshifted = (((state >> 18) ^ state) >> 27) as u32;
        let rot = (state >> 59) as u32;
        xorshifted.rotate_right(rot)
    }
}

impl BattleRng for PcgRng {
    fn next_u32(&mut self) -> u32 {
        let old = self.state;
        self.step();
        Self::output(old)
    }
}

/// Replays a fixed list of raw values, then repeats `fallback`.
///
/// Used for scripted scenarios and tests where each roll must be known.
#[derive(Clone, Debug, Default)]
pub struct ScriptedRng {
    values: VecDeque<u32>,
    fallback: u32,
}

impl ScriptedRng {
    pub fn new(values: impl IntoIterator<Item = u32>) -> Self {
        Self {
            values: values.into_iter().collect(),
            fallback: 0,
        }
    }

    /// Always returns `value`.
    pub fn constant(value: u32) -> Self {
        Self {
            values: VecDeque::new(),
            fallback: value,
        }
    }

    pub fn with_fallback(mut self, fallback: u32) -> Self {
        self.fallback = fallback;
        self
    }

    pub fn remaining(&self) -> usize {
        self.values.len()
    }
}

impl BattleRng for ScriptedRng {
    fn next_u32(&mut self) -> u32 {
        self.values.pop_front().unwrap_or(self.fallback)
    }
}
