//! Scenario and intelligence capability seams.
//!
//! A scenario is the whole simulated world: it owns the bots, pairs each
//! bot with an intelligence, advances everything one tick per
//! [`Scenario::step`], and defines the fitness metric for a run. An
//! intelligence is the pure decision function of one bot: observation in,
//! action out, with all of its behavior controlled by the weight vector it
//! was built from.
//!
//! Each seam has a spec/factory counterpart. Specs are the values kept in
//! the plug-in registry; they build fresh instances with independent
//! internal state, which is what lets fitness evaluations run in parallel
//! without sharing anything.
//!
//! Intelligences hold no random state. Any stochasticity a behavior needs
//! (wander noise) is drawn by the scenario from its seeded stream and
//! handed over inside the [`Observation`], which keeps a run a pure
//! function of its seed.

pub use self::{free_roam::FreeRoamSpec, target_chase::TargetChaseSpec};

use crate::{
    ScenarioBuildError, WeightCountError,
    core::{ArenaBounds, Bot, Vec2},
    seed::SimSeed,
};

pub mod free_roam;
pub mod target_chase;

/// A neighbor bot as seen in an observation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    pub position: Vec2,
    pub velocity: Vec2,
}

/// One bot's view of the world for one tick.
///
/// `neighbors` contains every bot in the scenario, including the observer
/// itself at `bot_index`; intelligences skip their own entry and apply
/// their own perception cutoff.
#[derive(Debug, Clone, Copy)]
pub struct Observation<'a> {
    /// Index of the observing bot within `neighbors`.
    pub bot_index: usize,
    /// The observing bot's position.
    pub position: Vec2,
    /// The observing bot's velocity.
    pub velocity: Vec2,
    /// Snapshot of all bots at the start of the tick.
    pub neighbors: &'a [Neighbor],
    /// Arena bounds, for wall avoidance.
    pub bounds: ArenaBounds,
    /// Current pursuit target, if the scenario has one.
    pub target: Option<Vec2>,
    /// Seeded noise sample for wander behaviors, fresh each tick.
    pub wander_jitter: Vec2,
}

/// The action a bot takes for one tick: a steering force request.
///
/// Scenarios cap the magnitude at their acceleration limit, so
/// intelligences may return arbitrarily large vectors.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Action {
    pub steering: Vec2,
}

impl Action {
    #[must_use]
    pub const fn steer(steering: Vec2) -> Self {
        Self { steering }
    }
}

/// The per-bot decision function, parameterized by a weight vector.
///
/// Implementations must be pure: the action may depend only on the
/// observation and the weights the instance was built from. Statelessness
/// is what allows one weight vector to drive any number of bots and makes
/// evaluations reproducible.
pub trait Intelligence {
    /// Maps one bot's observation to its action for this tick.
    fn decide(&self, observation: &Observation<'_>) -> Action;
}

pub type BoxedIntelligence = Box<dyn Intelligence>;

/// Factory for an intelligence kind; the value registered under the
/// intelligence's name in the plug-in registry.
pub trait IntelligenceSpec: Sync {
    /// Registry name of this intelligence.
    fn name(&self) -> &'static str;

    /// Length of the weight vector this intelligence is parameterized by.
    ///
    /// Invariant for the lifetime of a run: every individual's chromosome
    /// has exactly this many genes.
    fn weight_len(&self) -> usize;

    /// Builds an instance from a weight vector.
    fn build(&self, weights: &[f32]) -> Result<BoxedIntelligence, WeightCountError>;
}

/// A simulated environment and its fitness metric.
pub trait Scenario {
    /// Advances simulated time by one tick.
    fn step(&mut self);

    /// Reads the scalar fitness accumulated so far.
    ///
    /// Higher is better. The metric is entirely scenario-defined; the
    /// evaluator only triggers stepping and reads this value at the end
    /// of a bounded run.
    fn fitness(&self) -> f32;

    /// Current bot states, for rendering.
    fn bots(&self) -> &[Bot];

    /// Arena bounds, for rendering.
    fn bounds(&self) -> ArenaBounds;

    /// Current pursuit target, if any, for rendering.
    fn target(&self) -> Option<Vec2> {
        None
    }
}

pub type BoxedScenario = Box<dyn Scenario>;

/// Factory for a scenario kind; the value registered under the scenario's
/// name in the plug-in registry.
///
/// `build` must produce instances with fully independent internal state:
/// one scenario per fitness evaluation, never shared.
pub trait ScenarioSpec: Sync {
    /// Registry name of this scenario.
    fn name(&self) -> &'static str;

    /// Builds a scenario hosting one bot per supplied intelligence,
    /// with all stochastic state rooted at `seed`.
    fn build(
        &self,
        intelligences: Vec<BoxedIntelligence>,
        seed: SimSeed,
    ) -> Result<BoxedScenario, ScenarioBuildError>;
}
