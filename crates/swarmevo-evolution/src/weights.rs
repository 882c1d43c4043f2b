//! Weight-vector operations for the genetic algorithm.
//!
//! Free functions implementing the chromosome-level operators:
//! initialization ([`random`]), recombination ([`uniform_crossover`]), and
//! perturbation ([`mutate`]). [`genetic::PopulationEvolver`](crate::genetic::PopulationEvolver)
//! composes these into generation turnover.
//!
//! # Operator policies
//!
//! - **Uniform per-gene crossover**: each gene independently comes from
//!   either parent with equal probability. It assumes nothing about gene
//!   ordering, which matters here because chromosomes are interpreted by
//!   pluggable intelligences with unrelated gene layouts.
//! - **Range-relative mutation**: a mutated gene moves by a uniform
//!   fraction of its own magnitude, drawn from
//!   `[-mutation_range, +mutation_range]`. Genes that are exactly zero
//!   receive the draw as an absolute offset instead, so they are not
//!   permanently stuck at zero.

use rand::Rng;

/// Creates a weight vector by applying a function to each index.
///
/// # Examples
///
/// ```
/// use swarmevo_evolution::weights;
///
/// let weights = weights::from_fn(|i| i as f32 * 0.5, 3);
/// assert_eq!(weights, vec![0.0, 0.5, 1.0]);
/// ```
pub fn from_fn<F>(mut f: F, len: usize) -> Vec<f32>
where
    F: FnMut(usize) -> f32,
{
    let mut values = Vec::with_capacity(len);
    for i in 0..len {
        values.push(f(i));
    }
    values
}

/// Generates a random weight vector, each gene uniform in
/// `[-init_range, +init_range]`.
///
/// Used for generation-0 population initialization.
pub fn random<R>(rng: &mut R, init_range: f32, len: usize) -> Vec<f32>
where
    R: Rng + ?Sized,
{
    from_fn(|_| rng.random_range(-init_range..=init_range), len)
}

/// Combines two parents gene-by-gene: each position independently takes
/// the first parent's value with probability 1/2, otherwise the second's.
///
/// # Panics
///
/// Panics if the parents have different lengths.
pub fn uniform_crossover<R>(p1: &[f32], p2: &[f32], rng: &mut R) -> Vec<f32>
where
    R: Rng + ?Sized,
{
    assert_eq!(p1.len(), p2.len());
    from_fn(
        |i| if rng.random_bool(0.5) { p1[i] } else { p2[i] },
        p1.len(),
    )
}

/// Mutates a weight vector in place.
///
/// For each gene, with probability `rate`, a perturbation factor is drawn
/// uniformly from `[-range, +range]` and applied relative to the gene's
/// current magnitude: `w += w * factor`. A gene that is exactly zero gets
/// the factor as an absolute offset (`w += factor`) instead.
///
/// Consequently a nonzero gene never moves by more than `range` times its
/// own magnitude in one application, and a zero gene by more than `range`
/// in absolute terms.
pub fn mutate<R>(weights: &mut [f32], rate: f32, range: f32, rng: &mut R)
where
    R: Rng + ?Sized,
{
    for w in weights {
        if rng.random_bool(f64::from(rate)) {
            let factor = rng.random_range(-range..=range);
            if *w == 0.0 {
                *w += factor;
            } else {
                *w += *w * factor;
            }
        }
    }
}
