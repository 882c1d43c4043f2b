//! Generational genetic algorithm for evolving bot control weights.
//!
//! This crate is the training core: it owns the population lifecycle and
//! turns a scenario/intelligence pair into evolved weight vectors. The
//! simulation itself stays behind the `swarmevo-sim` collaborator seams;
//! this crate only builds instances, triggers stepping, and reads fitness.
//!
//! # How a run works
//!
//! 1. **Initialize** — build a population of random chromosomes (or seed
//!    it from a loaded weight vector)
//! 2. **Evaluate** — every individual drives its own scenario instance
//!    for a fixed number of ticks; the scenario's metric becomes the
//!    individual's fitness
//! 3. **Record** — per-generation statistics are appended to the run
//!    history
//! 4. **Checkpoint** — the generation's best weights are written to disk
//!    before anything else happens
//! 5. **Reproduce** — elitism, tournament selection, uniform crossover,
//!    and mutation produce the next population
//! 6. Repeat from 2 for the requested number of generations
//!
//! [`runner::EvolutionLoop`] orchestrates the cycle; the pieces are usable
//! on their own ([`genetic::PopulationEvolver`], [`evaluator::FitnessEvaluator`],
//! [`checkpoint::Checkpointer`]).
//!
//! # Reproducibility
//!
//! Every pseudo-random draw in a run is rooted at one
//! [`swarmevo_sim::SimSeed`]: each individual's simulation gets a seed
//! derived from `(run seed, generation, index)` and the genetic operators
//! draw from a per-generation stream (see [`seed`]). Fitness results are
//! written back by individual index. Together this makes a run a pure
//! function of its seed, independent of evaluation parallelism.
//!
//! # Parallelism
//!
//! Fitness evaluation is embarrassingly parallel — each individual's
//! scenario is fully independent state — and runs on scoped threads, one
//! per individual. The sequential observed path exists for live
//! visualization, where a single rendering context must see every frame.

pub mod checkpoint;
pub mod evaluator;
pub mod genetic;
pub mod runner;
pub mod seed;
pub mod weights;

#[cfg(test)]
mod testutil;
