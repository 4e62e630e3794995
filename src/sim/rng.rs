//! Random source consumed by the simulation
//!
//! The core only needs uniform `u32`s; bounded ranges and weighted choices
//! are derived here so every draw goes through one seedable stream.

use rand::{RngCore, SeedableRng};
use rand_pcg::Pcg32;

/// Uniform random integer stream injected into every simulation call
pub trait RandomSource {
    /// Next uniform value over the full `u32` range
    fn next_u32(&mut self) -> u32;

    /// Uniform value in `0..n` (returns 0 when `n == 0`)
    fn below(&mut self, n: u32) -> u32 {
        if n == 0 { 0 } else { self.next_u32() % n }
    }

    /// True with probability `percent / 100`
    fn chance_percent(&mut self, percent: u32) -> bool {
        self.below(100) < percent
    }

    /// Whole-unit position in `[min, max]`, inclusive at both ends
    fn lane(&mut self, min: f32, max: f32) -> f32 {
        let span = (max - min + 1.0).max(1.0) as u32;
        min + self.below(span) as f32
    }

    /// Animation phase in `[0, 6.28)` with 0.01 resolution
    fn phase(&mut self) -> f32 {
        self.below(628) as f32 / 100.0
    }
}

impl<R: RngCore + ?Sized> RandomSource for R {
    #[inline]
    fn next_u32(&mut self) -> u32 {
        RngCore::next_u32(self)
    }
}

/// Default deterministic generator for runs and tests
pub type GameRng = Pcg32;

/// Build the default generator from a run seed
pub fn seeded_rng(seed: u64) -> GameRng {
    Pcg32::seed_from_u64(seed)
}
