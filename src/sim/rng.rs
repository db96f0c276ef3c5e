/// Seeded random service (PCG32), so a given seed replays the same run.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::services::RandomSource;

pub struct SeededRandom {
    rng: Pcg32,
}

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        SeededRandom { rng: Pcg32::seed_from_u64(seed) }
    }
}

impl RandomSource for SeededRandom {
    fn random_int(&mut self, bound: u32) -> u32 {
        if bound <= 1 {
            return 0;
        }
        self.rng.random_range(0..bound)
    }
}

/// Replays a fixed list of rolls, then yields 0.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct ScriptedRandom {
    rolls: std::collections::VecDeque<u32>,
}

#[cfg(test)]
impl ScriptedRandom {
    pub fn new(rolls: &[u32]) -> Self {
        ScriptedRandom { rolls: rolls.iter().copied().collect() }
    }

    pub fn push(&mut self, rolls: &[u32]) {
        self.rolls.extend(rolls.iter().copied());
    }
}

#[cfg(test)]
impl RandomSource for ScriptedRandom {
    fn random_int(&mut self, bound: u32) -> u32 {
        self.rolls.pop_front().unwrap_or(0) % bound.max(1)
    }
}
