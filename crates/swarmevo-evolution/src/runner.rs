//! The generational evolution loop.
//!
//! [`EvolutionLoop`] owns the whole cycle:
//!
//! ```text
//! INIT -> (EVALUATE -> RECORD -> CHECKPOINT -> REPRODUCE) x generations -> TERMINATE
//! ```
//!
//! Per generation it evaluates every unevaluated individual, summarizes
//! the population into a [`GenerationStats`], persists the generation's
//! best weights through the [`Checkpointer`], and finally reproduces.
//! The checkpoint write is blocking and happens before reproduction, so a
//! run interrupted between generations always leaves a consistent,
//! loadable last checkpoint.
//!
//! Cancellation is cooperative: a [`StopToken`] is consulted once per
//! generation, after checkpointing. A stopped run returns the history of
//! every completed generation — partial generations are never recorded
//! or persisted.

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use swarmevo_sim::{IntelligenceSpec, ScenarioSpec, SimSeed};

use crate::{
    checkpoint::{Checkpointer, CheckpointWriteError},
    evaluator::{EvolutionObserver, FitnessEvaluator},
    genetic::{GenerationStats, Population, PopulationEvolver},
    seed,
};

/// Run parameters consumed by [`EvolutionLoop::new`].
///
/// Validated fail-fast before any simulation work begins; see
/// [`EvolutionParams::validate`] for the accepted ranges.
#[derive(Debug, Clone, Copy)]
pub struct EvolutionParams {
    /// Number of individuals per generation.
    pub population_size: usize,
    /// Simulation ticks per fitness evaluation.
    pub generation_frames: usize,
    /// Bots sharing one chromosome in each evaluation scenario.
    pub eval_bots: usize,
    /// Per-gene mutation probability, in `[0, 1]`.
    pub mutation_rate: f32,
    /// Relative magnitude bound of one mutation, non-negative.
    pub mutation_range: f32,
    /// Fraction of the population carried over unchanged, in `[0, 1]`.
    pub elite_percentage: f32,
    /// Tournament size for parent selection, in `[1, population_size]`.
    pub tournament_size: usize,
    /// Gene range for random initialization, positive.
    pub init_range: f32,
    /// Evaluate sequentially and report every frame to the observer.
    pub visualize: bool,
}

impl EvolutionParams {
    /// Checks every parameter against its accepted range.
    pub fn validate(&self) -> Result<(), ParamError> {
        if self.population_size == 0 {
            return Err(ParamError::EmptyPopulation);
        }
        if self.generation_frames == 0 {
            return Err(ParamError::NoFrames);
        }
        if self.eval_bots == 0 {
            return Err(ParamError::NoBots);
        }
        if !(0.0..=1.0).contains(&self.mutation_rate) {
            return Err(ParamError::MutationRate {
                rate: self.mutation_rate,
            });
        }
        if !self.mutation_range.is_finite() || self.mutation_range < 0.0 {
            return Err(ParamError::MutationRange {
                range: self.mutation_range,
            });
        }
        if !(0.0..=1.0).contains(&self.elite_percentage) {
            return Err(ParamError::ElitePercentage {
                percentage: self.elite_percentage,
            });
        }
        if self.tournament_size == 0 || self.tournament_size > self.population_size {
            return Err(ParamError::TournamentSize {
                tournament_size: self.tournament_size,
                population_size: self.population_size,
            });
        }
        if !self.init_range.is_finite() || self.init_range <= 0.0 {
            return Err(ParamError::InitRange {
                range: self.init_range,
            });
        }
        Ok(())
    }
}

/// A run parameter was outside its accepted range.
#[derive(Debug, Clone, Copy, PartialEq, derive_more::Display, derive_more::Error)]
pub enum ParamError {
    #[display("population_size must be at least 1")]
    EmptyPopulation,
    #[display("generation_frames must be at least 1")]
    NoFrames,
    #[display("eval_bots must be at least 1")]
    NoBots,
    #[display("mutation_rate must be within [0, 1], got {rate}")]
    MutationRate { rate: f32 },
    #[display("mutation_range must be finite and non-negative, got {range}")]
    MutationRange { range: f32 },
    #[display("elite_percentage must be within [0, 1], got {percentage}")]
    ElitePercentage { percentage: f32 },
    #[display(
        "tournament_size must be within [1, population_size = {population_size}], got {tournament_size}"
    )]
    TournamentSize {
        tournament_size: usize,
        population_size: usize,
    },
    #[display("init_range must be finite and positive, got {range}")]
    InitRange { range: f32 },
    #[display("initial weights have {actual} genes, intelligence expects {expected}")]
    InitialWeightLen { expected: usize, actual: usize },
    #[display(
        "initial population has {actual} individuals, population_size is {expected}"
    )]
    InitialPopulationSize { expected: usize, actual: usize },
}

/// Cooperative stop request, honored at generation boundaries only.
///
/// Cloning shares the flag, so a UI thread can hold one handle while the
/// loop polls another. Once requested, the loop finishes (and
/// checkpoints) the generation in flight, then terminates.
#[derive(Debug, Clone, Default)]
pub struct StopToken {
    stop: Arc<AtomicBool>,
}

impl StopToken {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request_stop(&self) {
        self.stop.store(true, Ordering::Relaxed);
    }

    #[must_use]
    pub fn is_stop_requested(&self) -> bool {
        self.stop.load(Ordering::Relaxed)
    }
}

/// A run failed after it had started.
///
/// Checkpoints written for earlier generations are always left intact;
/// the error names the generation the run stopped at.
#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum EvolutionError {
    #[display("failed to checkpoint generation {generation}: {source}")]
    Checkpoint {
        generation: usize,
        source: CheckpointWriteError,
    },
}

/// Orchestrates generations end-to-end and returns the full run history.
pub struct EvolutionLoop<'a> {
    scenario_spec: &'a dyn ScenarioSpec,
    intelligence_spec: &'a dyn IntelligenceSpec,
    params: EvolutionParams,
    run_seed: SimSeed,
    initial_weights: Option<Vec<f32>>,
    initial_population: Option<Population>,
}

impl<'a> EvolutionLoop<'a> {
    /// Creates a loop for the given collaborators, validating `params`
    /// before any simulation work.
    pub fn new(
        scenario_spec: &'a dyn ScenarioSpec,
        intelligence_spec: &'a dyn IntelligenceSpec,
        params: EvolutionParams,
        run_seed: SimSeed,
    ) -> Result<Self, ParamError> {
        params.validate()?;
        Ok(Self {
            scenario_spec,
            intelligence_spec,
            params,
            run_seed,
            initial_weights: None,
            initial_population: None,
        })
    }

    /// Seeds generation 0 from an existing weight vector instead of
    /// random initialization.
    ///
    /// Slot 0 carries the vector verbatim; the rest of the population is
    /// perturbed copies (spread by `mutation_range`), so the search
    /// resumes as a cloud around the loaded solution.
    pub fn with_initial_weights(mut self, weights: Vec<f32>) -> Result<Self, ParamError> {
        let expected = self.intelligence_spec.weight_len();
        if weights.len() != expected {
            return Err(ParamError::InitialWeightLen {
                expected,
                actual: weights.len(),
            });
        }
        self.initial_weights = Some(weights);
        Ok(self)
    }

    /// Supplies generation 0 wholesale, overriding both random and
    /// seeded initialization.
    pub fn with_initial_population(mut self, population: Population) -> Result<Self, ParamError> {
        if population.len() != self.params.population_size {
            return Err(ParamError::InitialPopulationSize {
                expected: self.params.population_size,
                actual: population.len(),
            });
        }
        let expected = self.intelligence_spec.weight_len();
        if let Some(individual) = population
            .individuals()
            .iter()
            .find(|ind| ind.weights().len() != expected)
        {
            return Err(ParamError::InitialWeightLen {
                expected,
                actual: individual.weights().len(),
            });
        }
        self.initial_population = Some(population);
        Ok(self)
    }

    #[must_use]
    pub fn params(&self) -> &EvolutionParams {
        &self.params
    }

    fn initial_population(&self) -> Population {
        if let Some(population) = &self.initial_population {
            return population.clone();
        }
        let mut rng = seed::init_rng(self.run_seed);
        match &self.initial_weights {
            Some(weights) => Population::seeded(
                weights,
                self.params.population_size,
                self.params.mutation_range,
                &mut rng,
            ),
            None => Population::random(
                self.params.population_size,
                self.intelligence_spec.weight_len(),
                self.params.init_range,
                &mut rng,
            ),
        }
    }

    /// Runs up to `generations` generations and returns the history, one
    /// [`GenerationStats`] per completed generation in order
    /// (`history[i].generation == i`).
    ///
    /// The history covers all `generations` unless `stop` was triggered,
    /// in which case it covers every generation completed before the stop
    /// was honored. Every recorded generation has a matching checkpoint
    /// file on disk.
    pub fn run<O>(
        &self,
        generations: usize,
        checkpointer: &Checkpointer,
        observer: &mut O,
        stop: &StopToken,
    ) -> Result<Vec<GenerationStats>, EvolutionError>
    where
        O: EvolutionObserver,
    {
        let evaluator = FitnessEvaluator::new(
            self.scenario_spec,
            self.intelligence_spec,
            self.params.generation_frames,
            self.params.eval_bots,
        );
        let evolver = PopulationEvolver {
            elite_percentage: self.params.elite_percentage,
            tournament_size: self.params.tournament_size,
            mutation_rate: self.params.mutation_rate,
            mutation_range: self.params.mutation_range,
        };

        let mut population = self.initial_population();
        let mut history = Vec::with_capacity(generations);

        for generation in 0..generations {
            if self.params.visualize {
                evaluator.evaluate_population_observed(
                    &mut population,
                    self.run_seed,
                    generation,
                    observer,
                );
            } else {
                evaluator.evaluate_population(&mut population, self.run_seed, generation);
            }

            let stats = GenerationStats::from_population(generation, &population)
                .expect("population is never empty");
            observer.on_generation(&stats, &population);

            checkpointer
                .save(&stats)
                .map_err(|source| EvolutionError::Checkpoint { generation, source })?;
            history.push(stats);

            if stop.is_stop_requested() {
                break;
            }

            if generation + 1 < generations {
                let mut rng = seed::reproduction_rng(self.run_seed, generation);
                population = evolver.evolve(&population, &mut rng);
            }
        }

        Ok(history)
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        checkpoint::WeightCheckpoint,
        evaluator::NullObserver,
        genetic::Individual,
        testutil::{SumScenarioSpec, WeightProbeSpec},
    };

    use super::*;

    const SEED: SimSeed = SimSeed::from_bytes([9; 16]);

    fn params() -> EvolutionParams {
        EvolutionParams {
            population_size: 6,
            generation_frames: 4,
            eval_bots: 2,
            mutation_rate: 0.2,
            mutation_range: 0.2,
            elite_percentage: 0.2,
            tournament_size: 3,
            init_range: 1.0,
            visualize: false,
        }
    }

    fn run_loop(
        loop_: &EvolutionLoop<'_>,
        generations: usize,
    ) -> (tempfile::TempDir, Vec<GenerationStats>) {
        let dir = tempfile::tempdir().unwrap();
        let checkpointer = Checkpointer::new(dir.path());
        let history = loop_
            .run(generations, &checkpointer, &mut NullObserver, &StopToken::new())
            .unwrap();
        (dir, history)
    }

    #[test]
    fn test_validation_rejects_bad_params() {
        let check = |mutator: fn(&mut EvolutionParams), expected: ParamError| {
            let mut p = params();
            mutator(&mut p);
            assert_eq!(p.validate(), Err(expected));
        };
        check(|p| p.population_size = 0, ParamError::EmptyPopulation);
        check(|p| p.generation_frames = 0, ParamError::NoFrames);
        check(|p| p.eval_bots = 0, ParamError::NoBots);
        check(
            |p| p.mutation_rate = 1.5,
            ParamError::MutationRate { rate: 1.5 },
        );
        check(
            |p| p.mutation_range = -0.1,
            ParamError::MutationRange { range: -0.1 },
        );
        check(
            |p| p.elite_percentage = -0.5,
            ParamError::ElitePercentage { percentage: -0.5 },
        );
        check(
            |p| p.tournament_size = 7,
            ParamError::TournamentSize {
                tournament_size: 7,
                population_size: 6,
            },
        );
        check(
            |p| p.tournament_size = 0,
            ParamError::TournamentSize {
                tournament_size: 0,
                population_size: 6,
            },
        );
        check(|p| p.init_range = 0.0, ParamError::InitRange { range: 0.0 });
        assert!(params().validate().is_ok());
    }

    #[test]
    fn test_new_fails_fast_on_invalid_params() {
        let mut p = params();
        p.tournament_size = 100;
        assert!(EvolutionLoop::new(&SumScenarioSpec, &WeightProbeSpec, p, SEED).is_err());
    }

    #[test]
    fn test_history_covers_every_generation_in_order() {
        let loop_ =
            EvolutionLoop::new(&SumScenarioSpec, &WeightProbeSpec, params(), SEED).unwrap();
        let (_dir, history) = run_loop(&loop_, 5);
        assert_eq!(history.len(), 5);
        for (i, stats) in history.iter().enumerate() {
            assert_eq!(stats.generation, i);
        }
    }

    #[test]
    fn test_max_fitness_is_monotonic_with_elitism() {
        let loop_ =
            EvolutionLoop::new(&SumScenarioSpec, &WeightProbeSpec, params(), SEED).unwrap();
        let (_dir, history) = run_loop(&loop_, 8);
        for pair in history.windows(2) {
            assert!(
                pair[1].max_fitness >= pair[0].max_fitness,
                "max fitness regressed: {} -> {}",
                pair[0].max_fitness,
                pair[1].max_fitness
            );
        }
    }

    #[test]
    fn test_same_seed_reproduces_identical_history() {
        let loop_ =
            EvolutionLoop::new(&SumScenarioSpec, &WeightProbeSpec, params(), SEED).unwrap();
        let (_dir_a, a) = run_loop(&loop_, 4);
        let (_dir_b, b) = run_loop(&loop_, 4);
        assert_eq!(a, b);
    }

    #[test]
    fn test_checkpoints_match_history() {
        let loop_ =
            EvolutionLoop::new(&SumScenarioSpec, &WeightProbeSpec, params(), SEED).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let checkpointer = Checkpointer::new(dir.path());
        let history = loop_
            .run(3, &checkpointer, &mut NullObserver, &StopToken::new())
            .unwrap();
        for stats in &history {
            let checkpoint =
                WeightCheckpoint::load(checkpointer.checkpoint_path(stats.generation)).unwrap();
            assert_eq!(checkpoint.weights, stats.best_weights);
            assert_eq!(checkpoint.generation, stats.generation);
            assert_eq!(checkpoint.fitness, stats.max_fitness);
        }
    }

    #[test]
    fn test_stop_token_halts_at_generation_boundary() {
        struct StopAfterTwo {
            stop: StopToken,
        }

        impl EvolutionObserver for StopAfterTwo {
            fn on_generation(&mut self, stats: &GenerationStats, _population: &Population) {
                if stats.generation == 1 {
                    self.stop.request_stop();
                }
            }
        }

        let loop_ =
            EvolutionLoop::new(&SumScenarioSpec, &WeightProbeSpec, params(), SEED).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let checkpointer = Checkpointer::new(dir.path());
        let stop = StopToken::new();
        let mut observer = StopAfterTwo { stop: stop.clone() };
        let history = loop_.run(10, &checkpointer, &mut observer, &stop).unwrap();

        // Generations 0 and 1 completed and were checkpointed; nothing
        // beyond was started.
        assert_eq!(history.len(), 2);
        assert!(checkpointer.checkpoint_path(1).exists());
        assert!(!checkpointer.checkpoint_path(2).exists());
    }

    #[test]
    fn test_checkpoint_failure_is_fatal_and_named() {
        let loop_ =
            EvolutionLoop::new(&SumScenarioSpec, &WeightProbeSpec, params(), SEED).unwrap();
        // A file where the save directory should be makes create_dir_all fail.
        let file = tempfile::NamedTempFile::new().unwrap();
        let checkpointer = Checkpointer::new(file.path());
        let err = loop_
            .run(3, &checkpointer, &mut NullObserver, &StopToken::new())
            .unwrap_err();
        let EvolutionError::Checkpoint { generation, .. } = err;
        assert_eq!(generation, 0);
    }

    #[test]
    fn test_initial_weights_seed_generation_zero() {
        // Exactly representable genes, so the verbatim copy sums to 1.5
        // with no rounding.
        let seed_weights = vec![0.25, 0.5, 0.75];
        let loop_ = EvolutionLoop::new(&SumScenarioSpec, &WeightProbeSpec, params(), SEED)
            .unwrap()
            .with_initial_weights(seed_weights.clone())
            .unwrap();
        let (_dir, history) = run_loop(&loop_, 1);
        // The verbatim seed vector scores 1.5; perturbed copies stay
        // within 20% per gene, so the generation best is near that.
        assert!(history[0].max_fitness >= 1.5);
    }

    #[test]
    fn test_initial_weights_reject_wrong_length() {
        let err = EvolutionLoop::new(&SumScenarioSpec, &WeightProbeSpec, params(), SEED)
            .unwrap()
            .with_initial_weights(vec![1.0])
            .err()
            .unwrap();
        assert_eq!(
            err,
            ParamError::InitialWeightLen {
                expected: 3,
                actual: 1
            }
        );
    }

    /// The worked example: population 4, tournament 4, elite 25%, three
    /// generations, fitness fixed per individual by weight sum.
    #[test]
    fn test_small_run_with_dominant_elite() {
        let mut p = params();
        p.population_size = 4;
        p.tournament_size = 4;
        p.elite_percentage = 0.25;
        p.mutation_rate = 0.0;

        // Constant chromosomes: crossover can never exceed the best
        // parent's sum, so [3, 3, 3] stays the maximum forever.
        let initial = Population::from_individuals(vec![
            Individual::from_weights(vec![3.0, 3.0, 3.0]),
            Individual::from_weights(vec![2.0, 2.0, 2.0]),
            Individual::from_weights(vec![1.0, 1.0, 1.0]),
            Individual::from_weights(vec![0.0, 0.0, 0.0]),
        ]);
        let loop_ = EvolutionLoop::new(&SumScenarioSpec, &WeightProbeSpec, p, SEED)
            .unwrap()
            .with_initial_population(initial)
            .unwrap();

        let (_dir, history) = run_loop(&loop_, 3);
        assert_eq!(history.len(), 3);
        assert_eq!(history[2].generation, 2);
        for stats in &history {
            assert_eq!(stats.best_weights, vec![3.0, 3.0, 3.0]);
            assert_eq!(stats.max_fitness, 9.0);
        }
    }

    #[test]
    fn test_initial_population_rejects_wrong_size() {
        let initial =
            Population::from_individuals(vec![Individual::from_weights(vec![0.0, 0.0, 0.0])]);
        let err = EvolutionLoop::new(&SumScenarioSpec, &WeightProbeSpec, params(), SEED)
            .unwrap()
            .with_initial_population(initial)
            .err()
            .unwrap();
        assert_eq!(
            err,
            ParamError::InitialPopulationSize {
                expected: 6,
                actual: 1
            }
        );
    }

    /// Full stack: real scenario and intelligence, parallel evaluation,
    /// reproducible across reruns.
    #[test]
    fn test_end_to_end_with_real_collaborators() {
        use swarmevo_intelligence::flocking::FlockingSpec;
        use swarmevo_sim::FreeRoamSpec;

        let mut p = params();
        p.population_size = 4;
        p.generation_frames = 30;
        p.eval_bots = 3;
        p.tournament_size = 2;
        let loop_ = EvolutionLoop::new(&FreeRoamSpec, &FlockingSpec, p, SEED).unwrap();

        let (_dir_a, history) = run_loop(&loop_, 2);
        assert_eq!(history.len(), 2);
        assert!(history.iter().all(|s| s.best_weights.len() == 7));

        let (_dir_b, again) = run_loop(&loop_, 2);
        assert_eq!(history, again);
    }

    #[test]
    fn test_visualize_path_matches_parallel_path() {
        let mut visual = params();
        visual.visualize = true;
        let parallel_loop =
            EvolutionLoop::new(&SumScenarioSpec, &WeightProbeSpec, params(), SEED).unwrap();
        let visual_loop =
            EvolutionLoop::new(&SumScenarioSpec, &WeightProbeSpec, visual, SEED).unwrap();
        let (_dir_a, a) = run_loop(&parallel_loop, 3);
        let (_dir_b, b) = run_loop(&visual_loop, 3);
        assert_eq!(a, b);
    }
}
