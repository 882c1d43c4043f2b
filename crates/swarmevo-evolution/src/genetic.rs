//! Population data model and genetic operators.
//!
//! The chromosome layer of the training system: [`Individual`] pairs a
//! weight vector with its evaluated fitness, [`Population`] holds the
//! fixed-size set alive in one generation, and [`PopulationEvolver`]
//! produces the next generation through elitism, tournament selection,
//! crossover, and mutation.
//!
//! Populations keep their insertion order; nothing here depends on a
//! pre-sorted population. The evolver ranks a working copy when it needs
//! one, which keeps fitness write-back by index (see
//! [`evaluator`](crate::evaluator)) and random draws reproducible.

use rand::Rng;
use swarmevo_stats::descriptive::DescriptiveStats;

use crate::weights;

/// A single candidate solution: a weight vector plus its fitness.
///
/// Fitness is `None` until the individual has been through a fitness
/// evaluation pass. Elites are the only individuals whose fitness
/// survives into the next generation; everyone else is created
/// unevaluated.
#[derive(Debug, Clone, PartialEq)]
pub struct Individual {
    weights: Vec<f32>,
    fitness: Option<f32>,
}

impl Individual {
    /// Creates an unevaluated individual with random weights, each gene
    /// uniform in `[-init_range, +init_range]`.
    pub fn random<R>(rng: &mut R, init_range: f32, weight_len: usize) -> Self
    where
        R: Rng + ?Sized,
    {
        Self::from_weights(weights::random(rng, init_range, weight_len))
    }

    /// Wraps a weight vector as an unevaluated individual.
    #[must_use]
    pub const fn from_weights(weights: Vec<f32>) -> Self {
        Self {
            weights,
            fitness: None,
        }
    }

    #[must_use]
    pub fn weights(&self) -> &[f32] {
        &self.weights
    }

    /// The evaluated fitness, or `None` if this individual has not been
    /// evaluated yet.
    #[must_use]
    pub fn fitness(&self) -> Option<f32> {
        self.fitness
    }

    pub(crate) fn record_fitness(&mut self, fitness: f32) {
        self.fitness = Some(fitness);
    }

    /// Fitness for ranking purposes: unevaluated individuals sort below
    /// every evaluated one.
    pub(crate) fn rank_fitness(&self) -> f32 {
        self.fitness.unwrap_or(f32::MIN)
    }
}

/// The fixed-size set of individuals alive in one generation.
#[derive(Debug, Clone, PartialEq)]
pub struct Population {
    individuals: Vec<Individual>,
}

impl Population {
    /// Creates a population of `count` random unevaluated individuals.
    pub fn random<R>(count: usize, weight_len: usize, init_range: f32, rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        let individuals = (0..count)
            .map(|_| Individual::random(rng, init_range, weight_len))
            .collect();
        Self { individuals }
    }

    /// Creates a population seeded from an existing weight vector.
    ///
    /// Index 0 carries the vector verbatim; every other slot gets a copy
    /// with all genes perturbed by up to `spread` (relative), so the
    /// search starts as a cloud around the seed instead of `count`
    /// duplicates.
    pub fn seeded<R>(seed_weights: &[f32], count: usize, spread: f32, rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        let individuals = (0..count)
            .map(|i| {
                let mut weights = seed_weights.to_vec();
                if i > 0 {
                    weights::mutate(&mut weights, 1.0, spread, rng);
                }
                Individual::from_weights(weights)
            })
            .collect();
        Self { individuals }
    }

    #[must_use]
    pub const fn from_individuals(individuals: Vec<Individual>) -> Self {
        Self { individuals }
    }

    #[must_use]
    pub fn individuals(&self) -> &[Individual] {
        &self.individuals
    }

    pub(crate) fn individuals_mut(&mut self) -> &mut [Individual] {
        &mut self.individuals
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.individuals.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.individuals.is_empty()
    }

    /// The highest-fitness individual; ties go to the earliest index.
    #[must_use]
    pub fn best(&self) -> Option<&Individual> {
        self.individuals.iter().reduce(|best, candidate| {
            if candidate.rank_fitness() > best.rank_fitness() {
                candidate
            } else {
                best
            }
        })
    }

    /// Descriptive statistics over all fitness values.
    ///
    /// Unevaluated individuals enter as `f32::MIN`; call this after an
    /// evaluation pass.
    #[must_use]
    pub fn fitness_stats(&self) -> Option<DescriptiveStats> {
        DescriptiveStats::new(self.individuals.iter().map(Individual::rank_fitness))
    }

    /// Per-gene statistics across the population, one entry per gene.
    ///
    /// Useful for watching convergence: shrinking per-gene spread means
    /// the population is agreeing on a solution.
    #[must_use]
    pub fn weight_stats(&self) -> Vec<DescriptiveStats> {
        let weight_len = self
            .individuals
            .first()
            .map_or(0, |ind| ind.weights().len());
        (0..weight_len)
            .map(|i| {
                DescriptiveStats::new(self.individuals.iter().map(|ind| ind.weights()[i])).unwrap()
            })
            .collect()
    }
}

/// Per-generation summary recorded into the run history.
///
/// Immutable once created; `best_weights` is the payload the checkpointer
/// persists.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationStats {
    /// Zero-based generation index.
    pub generation: usize,
    pub max_fitness: f32,
    pub mean_fitness: f32,
    pub min_fitness: f32,
    /// Weights of the generation's best individual.
    pub best_weights: Vec<f32>,
}

impl GenerationStats {
    /// Summarizes an evaluated population. Returns `None` for an empty
    /// population.
    #[must_use]
    pub fn from_population(generation: usize, population: &Population) -> Option<Self> {
        let stats = population.fitness_stats()?;
        let best = population.best()?;
        Some(Self {
            generation,
            max_fitness: stats.max,
            mean_fitness: stats.mean,
            min_fitness: stats.min,
            best_weights: best.weights().to_vec(),
        })
    }
}

/// Selects an individual by tournament.
///
/// Draws `tournament_size` individuals uniformly at random **with
/// replacement** and returns the one with the highest fitness; ties are
/// broken by first occurrence in the sample. Larger tournaments create
/// stronger selection pressure.
///
/// # Panics
///
/// Panics if `individuals` is empty or `tournament_size` is zero.
pub fn tournament_select<'a, R>(
    individuals: &'a [Individual],
    tournament_size: usize,
    rng: &mut R,
) -> &'a Individual
where
    R: Rng + ?Sized,
{
    assert!(tournament_size > 0);
    assert!(!individuals.is_empty());
    let mut best: Option<&Individual> = None;
    for _ in 0..tournament_size {
        let candidate = &individuals[rng.random_range(0..individuals.len())];
        let replaces = best.is_none_or(|best| candidate.rank_fitness() > best.rank_fitness());
        if replaces {
            best = Some(candidate);
        }
    }
    best.unwrap()
}

/// Produces the next generation from an evaluated population.
///
/// Reproduction is elitism plus tournament-selected offspring:
///
/// 1. The top `ceil(elite_percentage * population_size)` individuals are
///    deep-copied unchanged, fitness included — elites are never
///    re-evaluated.
/// 2. Every remaining slot is filled by a child of two
///    tournament-selected parents, combined by uniform crossover and
///    then mutated (see [`weights`]). Children are unevaluated.
///
/// The output population always has the same size as the input.
#[derive(Debug, Clone, Copy)]
pub struct PopulationEvolver {
    /// Fraction of the population preserved unchanged, in `[0, 1]`.
    pub elite_percentage: f32,
    /// Tournament size for parent selection.
    pub tournament_size: usize,
    /// Per-gene mutation probability, in `[0, 1]`.
    pub mutation_rate: f32,
    /// Relative magnitude bound of one mutation.
    pub mutation_range: f32,
}

impl PopulationEvolver {
    /// Number of elites for a population of `population_size`, clamped to
    /// `[0, population_size]`.
    #[expect(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss
    )]
    #[must_use]
    pub fn elite_count(&self, population_size: usize) -> usize {
        ((self.elite_percentage * population_size as f32).ceil() as usize).min(population_size)
    }

    /// Evolves the population into the next generation.
    #[must_use]
    pub fn evolve<R>(&self, population: &Population, rng: &mut R) -> Population
    where
        R: Rng + ?Sized,
    {
        // Rank a working copy of the references; stable sort keeps the
        // original order among equal-fitness individuals.
        let mut ranked: Vec<&Individual> = population.individuals().iter().collect();
        ranked.sort_by(|a, b| b.rank_fitness().total_cmp(&a.rank_fitness()));

        let elite_count = self.elite_count(population.len());
        let mut next: Vec<Individual> = ranked[..elite_count]
            .iter()
            .map(|ind| (*ind).clone())
            .collect();

        while next.len() < population.len() {
            let p1 = tournament_select(population.individuals(), self.tournament_size, rng);
            let p2 = tournament_select(population.individuals(), self.tournament_size, rng);
            let mut child = weights::uniform_crossover(p1.weights(), p2.weights(), rng);
            weights::mutate(&mut child, self.mutation_rate, self.mutation_range, rng);
            next.push(Individual::from_weights(child));
        }

        Population::from_individuals(next)
    }
}
