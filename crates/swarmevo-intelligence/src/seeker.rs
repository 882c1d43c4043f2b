//! Individual homing intelligence.
//!
//! No group behavior: each bot independently homes on the scenario target
//! (or the arena center when the scenario has none), avoids walls, and
//! damps its own velocity to keep from orbiting the goal. A useful
//! baseline against flocking, and the natural fit for `target_chase`.

use swarmevo_sim::{
    Action, BoxedIntelligence, Intelligence, IntelligenceSpec, Observation, Vec2, WeightCountError,
};

/// Distance from a wall at which avoidance pressure starts.
const WALL_MARGIN: f32 = 8.0;

/// Named view of a seeker chromosome.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeekerWeights {
    /// Pull toward the goal point.
    pub target: f32,
    /// Push away from nearby walls.
    pub wall_avoid: f32,
    /// Brake proportional to current velocity.
    pub damping: f32,
    /// Gain on the scenario-supplied wander jitter.
    pub wander: f32,
}

impl SeekerWeights {
    /// Number of genes a seeker chromosome carries.
    pub const LEN: usize = 4;

    pub fn from_slice(weights: &[f32]) -> Result<Self, WeightCountError> {
        let [target, wall_avoid, damping, wander] = *weights else {
            return Err(WeightCountError {
                expected: Self::LEN,
                actual: weights.len(),
            });
        };
        Ok(Self {
            target,
            wall_avoid,
            damping,
            wander,
        })
    }
}

/// Factory for [`SeekerIntelligence`]; registered as `seeker`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SeekerSpec;

impl IntelligenceSpec for SeekerSpec {
    fn name(&self) -> &'static str {
        "seeker"
    }

    fn weight_len(&self) -> usize {
        SeekerWeights::LEN
    }

    fn build(&self, weights: &[f32]) -> Result<BoxedIntelligence, WeightCountError> {
        Ok(Box::new(SeekerIntelligence::new(SeekerWeights::from_slice(
            weights,
        )?)))
    }
}

/// Homes on the goal with wall avoidance and velocity damping.
#[derive(Debug, Clone, Copy)]
pub struct SeekerIntelligence {
    weights: SeekerWeights,
}

impl SeekerIntelligence {
    #[must_use]
    pub const fn new(weights: SeekerWeights) -> Self {
        Self { weights }
    }
}

impl Intelligence for SeekerIntelligence {
    fn decide(&self, observation: &Observation<'_>) -> Action {
        let w = &self.weights;
        let goal = observation.target.unwrap_or_else(|| observation.bounds.center());

        let mut steering = (goal - observation.position).normalized() * w.target;

        // Wall avoidance: push inward on every axis within the margin.
        let bounds = observation.bounds;
        let position = observation.position;
        let mut inward = Vec2::ZERO;
        if position.x < WALL_MARGIN {
            inward.x += 1.0 - position.x / WALL_MARGIN;
        }
        if position.x > bounds.width - WALL_MARGIN {
            inward.x -= 1.0 - (bounds.width - position.x) / WALL_MARGIN;
        }
        if position.y < WALL_MARGIN {
            inward.y += 1.0 - position.y / WALL_MARGIN;
        }
        if position.y > bounds.height - WALL_MARGIN {
            inward.y -= 1.0 - (bounds.height - position.y) / WALL_MARGIN;
        }
        steering += inward * w.wall_avoid;

        steering += -observation.velocity * w.damping;
        steering += observation.wander_jitter * w.wander;

        Action::steer(steering)
    }
}
