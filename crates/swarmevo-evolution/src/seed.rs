//! Deterministic RNG stream derivation for runs.
//!
//! All randomness in a run is rooted at one base [`SimSeed`]. Three
//! stream families are derived from it:
//!
//! - one initialization RNG for the generation-0 population;
//! - one simulation seed per `(generation, individual)` coordinate, used
//!   to build that individual's scenario — identical regardless of how
//!   many evaluation threads are running;
//! - one reproduction RNG per generation, driving selection, crossover,
//!   and mutation draws for that generation's turnover.
//!
//! The stream tags keep the two families disjoint, so adding draws to one
//! can never shift the other.

use rand_pcg::Pcg32;
use swarmevo_sim::SimSeed;

/// Stream tag for per-individual simulation seeds.
const EVALUATION_STREAM: u64 = 0x4556_414c;
/// Stream tag for per-generation reproduction RNGs.
const REPRODUCTION_STREAM: u64 = 0x5245_5052;
/// Stream tag for generation-0 population initialization.
const INIT_STREAM: u64 = 0x494e_4954;

/// RNG driving generation-0 population initialization.
#[must_use]
pub fn init_rng(base: SimSeed) -> Pcg32 {
    base.derive(INIT_STREAM, 0).rng()
}

/// Seed for one individual's simulation in one generation.
#[must_use]
pub fn individual_seed(base: SimSeed, generation: usize, index: usize) -> SimSeed {
    base.derive(
        EVALUATION_STREAM.wrapping_add((generation as u64) << 32),
        index as u64,
    )
}

/// RNG driving one generation's selection/crossover/mutation draws.
#[must_use]
pub fn reproduction_rng(base: SimSeed, generation: usize) -> Pcg32 {
    base.derive(REPRODUCTION_STREAM, generation as u64).rng()
}
