//! Fitness evaluation through the simulation collaborators.
//!
//! [`FitnessEvaluator`] is the bridge between the genetic algorithm and
//! the `swarmevo-sim` seams: per individual it builds a set of
//! intelligences from the chromosome, assembles one fresh scenario around
//! them, steps it for a fixed number of ticks, and records the scenario's
//! fitness metric on the individual.
//!
//! # Parallelism and determinism
//!
//! [`FitnessEvaluator::evaluate_population`] runs one scoped thread per
//! individual. Every simulation is fully independent state, each thread
//! writes only its own individual's fitness, and each simulation's seed
//! is derived from the individual's `(generation, index)` coordinate —
//! so the results are identical to the sequential path regardless of
//! scheduling.
//!
//! The sequential path ([`FitnessEvaluator::evaluate_population_observed`])
//! exists for live visualization: a single rendering context wants to see
//! every frame, which rules out concurrent evaluation for that run.
//!
//! # Failure policy
//!
//! A collaborator that fails to build (weight-count mismatch, empty bot
//! set) costs only that individual: its fitness is recorded as
//! `f32::MIN`, the worst representable value, and the pass continues.
//! Selection then weeds the individual out naturally. A run never aborts
//! mid-generation because one chromosome could not be evaluated.

use std::thread;

use swarmevo_sim::{
    BoxedScenario, IntelligenceSpec, Scenario, ScenarioBuildError, ScenarioSpec, SimSeed,
    WeightCountError,
};

use crate::{
    genetic::{GenerationStats, Population},
    seed,
};

/// Progress coordinates handed to [`EvolutionObserver::on_frame`].
#[derive(Debug, Clone, Copy)]
pub struct FrameContext {
    /// Zero-based generation index.
    pub generation: usize,
    /// Index of the individual currently being evaluated.
    pub individual: usize,
    /// Total number of individuals in the population.
    pub population_size: usize,
    /// Zero-based frame index within this individual's simulation.
    pub frame: usize,
    /// Total frames each individual is simulated for.
    pub generation_frames: usize,
}

/// Callbacks for watching a run as it progresses.
///
/// `on_frame` fires once per simulated tick, but only on the sequential
/// evaluation path (the parallel path has no single vantage point to
/// observe from). `on_generation` fires after every generation's
/// evaluation, on both paths.
pub trait EvolutionObserver {
    /// Called after each simulation tick during sequential evaluation.
    fn on_frame(&mut self, _scenario: &dyn Scenario, _context: &FrameContext) {}

    /// Called once per generation with its summary and the evaluated
    /// population.
    fn on_generation(&mut self, _stats: &GenerationStats, _population: &Population) {}
}

/// Observer that ignores everything; for headless runs and tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullObserver;

impl EvolutionObserver for NullObserver {}

/// A collaborator could not be assembled for an individual's evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum EvaluationError {
    #[display("failed to build intelligence: {_0}")]
    Intelligence(WeightCountError),
    #[display("failed to build scenario: {_0}")]
    Scenario(ScenarioBuildError),
}

/// Evaluates individuals by running bounded simulations.
#[derive(Clone, Copy)]
pub struct FitnessEvaluator<'a> {
    scenario_spec: &'a dyn ScenarioSpec,
    intelligence_spec: &'a dyn IntelligenceSpec,
    generation_frames: usize,
    eval_bots: usize,
}

impl<'a> FitnessEvaluator<'a> {
    /// Creates an evaluator running `generation_frames` ticks per
    /// individual, with `eval_bots` bots sharing each chromosome.
    #[must_use]
    pub fn new(
        scenario_spec: &'a dyn ScenarioSpec,
        intelligence_spec: &'a dyn IntelligenceSpec,
        generation_frames: usize,
        eval_bots: usize,
    ) -> Self {
        Self {
            scenario_spec,
            intelligence_spec,
            generation_frames,
            eval_bots,
        }
    }

    /// Length of the chromosome this evaluator's intelligence expects.
    #[must_use]
    pub fn weight_len(&self) -> usize {
        self.intelligence_spec.weight_len()
    }

    /// Builds a fresh scenario hosting `eval_bots` instances of the
    /// intelligence, all parameterized by `weights`.
    fn build_scenario(
        &self,
        weights: &[f32],
        sim_seed: SimSeed,
    ) -> Result<BoxedScenario, EvaluationError> {
        let intelligences = (0..self.eval_bots)
            .map(|_| self.intelligence_spec.build(weights))
            .collect::<Result<Vec<_>, _>>()
            .map_err(EvaluationError::Intelligence)?;
        self.scenario_spec
            .build(intelligences, sim_seed)
            .map_err(EvaluationError::Scenario)
    }

    /// Runs one bounded simulation and returns its fitness.
    pub fn evaluate_weights(
        &self,
        weights: &[f32],
        sim_seed: SimSeed,
    ) -> Result<f32, EvaluationError> {
        let mut scenario = self.build_scenario(weights, sim_seed)?;
        for _ in 0..self.generation_frames {
            scenario.step();
        }
        Ok(scenario.fitness())
    }

    /// Evaluates every unevaluated individual in parallel, one scoped
    /// thread each.
    ///
    /// Individuals that already carry a fitness — elites copied over from
    /// the previous generation — are skipped, never re-simulated. Fitness
    /// is written back by individual index; a failed build records
    /// `f32::MIN` (see the module-level failure policy).
    pub fn evaluate_population(
        &self,
        population: &mut Population,
        base_seed: SimSeed,
        generation: usize,
    ) {
        thread::scope(|scope| {
            for (index, individual) in population.individuals_mut().iter_mut().enumerate() {
                if individual.fitness().is_some() {
                    continue;
                }
                let sim_seed = seed::individual_seed(base_seed, generation, index);
                scope.spawn(move || {
                    let fitness = self
                        .evaluate_weights(individual.weights(), sim_seed)
                        .unwrap_or(f32::MIN);
                    individual.record_fitness(fitness);
                });
            }
        });
    }

    /// Evaluates every unevaluated individual sequentially, reporting
    /// each simulated frame to the observer.
    ///
    /// Produces exactly the same fitness values as
    /// [`Self::evaluate_population`] for the same seed.
    pub fn evaluate_population_observed(
        &self,
        population: &mut Population,
        base_seed: SimSeed,
        generation: usize,
        observer: &mut dyn EvolutionObserver,
    ) {
        let population_size = population.len();
        for (index, individual) in population.individuals_mut().iter_mut().enumerate() {
            if individual.fitness().is_some() {
                continue;
            }
            let sim_seed = seed::individual_seed(base_seed, generation, index);
            let fitness = match self.build_scenario(individual.weights(), sim_seed) {
                Ok(mut scenario) => {
                    for frame in 0..self.generation_frames {
                        scenario.step();
                        observer.on_frame(
                            scenario.as_ref(),
                            &FrameContext {
                                generation,
                                individual: index,
                                population_size,
                                frame,
                                generation_frames: self.generation_frames,
                            },
                        );
                    }
                    scenario.fitness()
                }
                Err(_) => f32::MIN,
            };
            individual.record_fitness(fitness);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        genetic::Individual,
        testutil::{FailingIntelligenceSpec, SumScenarioSpec, WeightProbeSpec},
    };

    const SEED: SimSeed = SimSeed::from_bytes([3; 16]);

    fn population(chromosomes: &[&[f32]]) -> Population {
        Population::from_individuals(
            chromosomes
                .iter()
                .map(|weights| Individual::from_weights(weights.to_vec()))
                .collect(),
        )
    }

    #[test]
    fn test_evaluate_weights_reads_scenario_fitness() {
        let evaluator = FitnessEvaluator::new(&SumScenarioSpec, &WeightProbeSpec, 10, 4);
        let fitness = evaluator.evaluate_weights(&[1.0, 2.0, 3.0], SEED).unwrap();
        assert_eq!(fitness, 6.0);
    }

    #[test]
    fn test_evaluate_weights_propagates_build_errors() {
        let evaluator = FitnessEvaluator::new(&SumScenarioSpec, &WeightProbeSpec, 10, 4);
        let err = evaluator.evaluate_weights(&[1.0], SEED).unwrap_err();
        assert!(matches!(err, EvaluationError::Intelligence(_)));
    }

    #[test]
    fn test_parallel_evaluation_writes_by_index() {
        let evaluator = FitnessEvaluator::new(&SumScenarioSpec, &WeightProbeSpec, 5, 2);
        let mut pop = population(&[
            &[1.0, 0.0, 0.0],
            &[0.0, 2.0, 0.0],
            &[0.0, 0.0, 3.0],
            &[1.0, 1.0, 1.0],
        ]);
        evaluator.evaluate_population(&mut pop, SEED, 0);
        let fitness: Vec<_> = pop
            .individuals()
            .iter()
            .map(|ind| ind.fitness().unwrap())
            .collect();
        assert_eq!(fitness, vec![1.0, 2.0, 3.0, 3.0]);
    }

    #[test]
    fn test_parallel_and_sequential_paths_agree() {
        let evaluator = FitnessEvaluator::new(&SumScenarioSpec, &WeightProbeSpec, 5, 3);
        let chromosomes: &[&[f32]] = &[&[0.5, 0.25, 0.0], &[1.0, -1.0, 0.5], &[0.0, 0.0, 0.0]];
        let mut parallel = population(chromosomes);
        let mut sequential = population(chromosomes);
        evaluator.evaluate_population(&mut parallel, SEED, 4);
        evaluator.evaluate_population_observed(&mut sequential, SEED, 4, &mut NullObserver);
        for (a, b) in parallel.individuals().iter().zip(sequential.individuals()) {
            assert_eq!(a.fitness(), b.fitness());
        }
    }

    #[test]
    fn test_failed_build_records_worst_fitness() {
        let evaluator = FitnessEvaluator::new(&SumScenarioSpec, &FailingIntelligenceSpec, 5, 2);
        let mut pop = population(&[&[1.0, 2.0, 3.0], &[0.0, 0.0, 0.0]]);
        evaluator.evaluate_population(&mut pop, SEED, 0);
        for individual in pop.individuals() {
            assert_eq!(individual.fitness(), Some(f32::MIN));
        }
    }

    #[test]
    fn test_failed_build_on_sequential_path() {
        let evaluator = FitnessEvaluator::new(&SumScenarioSpec, &FailingIntelligenceSpec, 5, 2);
        let mut pop = population(&[&[1.0, 2.0, 3.0]]);
        evaluator.evaluate_population_observed(&mut pop, SEED, 0, &mut NullObserver);
        assert_eq!(pop.individuals()[0].fitness(), Some(f32::MIN));
    }

    #[test]
    fn test_observer_sees_every_frame() {
        struct CountingObserver {
            frames: usize,
            last_context: Option<FrameContext>,
        }

        impl EvolutionObserver for CountingObserver {
            fn on_frame(&mut self, _scenario: &dyn Scenario, context: &FrameContext) {
                self.frames += 1;
                self.last_context = Some(*context);
            }
        }

        let evaluator = FitnessEvaluator::new(&SumScenarioSpec, &WeightProbeSpec, 7, 2);
        let mut pop = population(&[&[1.0, 0.0, 0.0], &[0.0, 1.0, 0.0]]);
        let mut observer = CountingObserver {
            frames: 0,
            last_context: None,
        };
        evaluator.evaluate_population_observed(&mut pop, SEED, 2, &mut observer);

        assert_eq!(observer.frames, 2 * 7);
        let last = observer.last_context.unwrap();
        assert_eq!(last.generation, 2);
        assert_eq!(last.individual, 1);
        assert_eq!(last.population_size, 2);
        assert_eq!(last.frame, 6);
        assert_eq!(last.generation_frames, 7);
    }

    #[test]
    fn test_already_evaluated_individuals_are_skipped() {
        let evaluator = FitnessEvaluator::new(&SumScenarioSpec, &WeightProbeSpec, 5, 2);
        let mut elite = Individual::from_weights(vec![1.0, 1.0, 1.0]);
        elite.record_fitness(99.0); // not what the simulation would yield
        let mut pop = Population::from_individuals(vec![
            elite,
            Individual::from_weights(vec![2.0, 0.0, 0.0]),
        ]);
        evaluator.evaluate_population(&mut pop, SEED, 1);
        assert_eq!(pop.individuals()[0].fitness(), Some(99.0));
        assert_eq!(pop.individuals()[1].fitness(), Some(2.0));
    }

    #[test]
    fn test_repeated_evaluation_is_identical() {
        let evaluator = FitnessEvaluator::new(&SumScenarioSpec, &WeightProbeSpec, 5, 2);
        let chromosomes: &[&[f32]] = &[&[0.3, 0.3, 0.3], &[0.9, -0.2, 0.1]];
        let mut first = population(chromosomes);
        let mut second = population(chromosomes);
        evaluator.evaluate_population(&mut first, SEED, 1);
        evaluator.evaluate_population(&mut second, SEED, 1);
        assert_eq!(first, second);
    }
}
