//! Boids-style flocking intelligence.
//!
//! The classic three steering urges (cohesion, separation, alignment)
//! plus target pursuit, wander noise, and a cruise-speed regulator, each
//! scaled by an evolved gain. The perception radius itself is a gene, so
//! evolution can trade broad awareness against tight local reactions.

use swarmevo_sim::{
    Action, BoxedIntelligence, Intelligence, IntelligenceSpec, Observation, Vec2, WeightCountError,
};

/// Scale factor converting the perception gene to an arena distance.
const PERCEPTION_SCALE: f32 = 20.0;
/// Distance below which separation pressure applies, as a fraction of the
/// perception radius.
const SEPARATION_FRACTION: f32 = 0.4;
/// Scale factor converting the cruise-speed gene to a speed.
const CRUISE_SCALE: f32 = 2.0;

/// Named view of a flocking chromosome.
///
/// Gene order is fixed; [`FlockingWeights::from_slice`] is the only place
/// that knows slice positions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlockingWeights {
    /// Pull toward the centroid of perceived neighbors.
    pub cohesion: f32,
    /// Push away from neighbors closer than the separation distance.
    pub separation: f32,
    /// Pull toward the mean velocity of perceived neighbors.
    pub alignment: f32,
    /// Pull toward the scenario target, when one exists.
    pub target: f32,
    /// Gain on the scenario-supplied wander jitter.
    pub wander: f32,
    /// Preferred travel speed (scaled by [`CRUISE_SCALE`]).
    pub cruise_speed: f32,
    /// Neighbor perception radius (scaled by [`PERCEPTION_SCALE`]).
    pub perception: f32,
}

impl FlockingWeights {
    /// Number of genes a flocking chromosome carries.
    pub const LEN: usize = 7;

    pub fn from_slice(weights: &[f32]) -> Result<Self, WeightCountError> {
        let [cohesion, separation, alignment, target, wander, cruise_speed, perception] = *weights
        else {
            return Err(WeightCountError {
                expected: Self::LEN,
                actual: weights.len(),
            });
        };
        Ok(Self {
            cohesion,
            separation,
            alignment,
            target,
            wander,
            cruise_speed,
            perception,
        })
    }
}

/// Factory for [`FlockingIntelligence`]; registered as `flocking`.
#[derive(Debug, Clone, Copy, Default)]
pub struct FlockingSpec;

impl IntelligenceSpec for FlockingSpec {
    fn name(&self) -> &'static str {
        "flocking"
    }

    fn weight_len(&self) -> usize {
        FlockingWeights::LEN
    }

    fn build(&self, weights: &[f32]) -> Result<BoxedIntelligence, WeightCountError> {
        Ok(Box::new(FlockingIntelligence::new(
            FlockingWeights::from_slice(weights)?,
        )))
    }
}

/// Steers by summing weighted boids urges over perceived neighbors.
#[derive(Debug, Clone, Copy)]
pub struct FlockingIntelligence {
    weights: FlockingWeights,
}

impl FlockingIntelligence {
    #[must_use]
    pub const fn new(weights: FlockingWeights) -> Self {
        Self { weights }
    }
}

impl Intelligence for FlockingIntelligence {
    #[expect(clippy::cast_precision_loss)]
    fn decide(&self, observation: &Observation<'_>) -> Action {
        let w = &self.weights;
        let perception = w.perception.abs() * PERCEPTION_SCALE;
        let separation_distance = perception * SEPARATION_FRACTION;

        let mut centroid = Vec2::ZERO;
        let mut mean_velocity = Vec2::ZERO;
        let mut separation = Vec2::ZERO;
        let mut perceived = 0usize;
        for (index, neighbor) in observation.neighbors.iter().enumerate() {
            if index == observation.bot_index {
                continue;
            }
            let offset = neighbor.position - observation.position;
            let distance = offset.length();
            if distance > perception {
                continue;
            }
            perceived += 1;
            centroid += neighbor.position;
            mean_velocity += neighbor.velocity;
            if distance < separation_distance && distance > f32::EPSILON {
                // Repulsion grows as neighbors close in.
                separation += -offset.normalized() * (1.0 - distance / separation_distance);
            }
        }

        let mut steering = Vec2::ZERO;
        if perceived > 0 {
            let inv = 1.0 / perceived as f32;
            let cohesion = ((centroid * inv) - observation.position).normalized();
            let alignment = ((mean_velocity * inv) - observation.velocity).normalized();
            steering += cohesion * w.cohesion;
            steering += alignment * w.alignment;
            steering += separation * w.separation;
        }
        if let Some(target) = observation.target {
            steering += (target - observation.position).normalized() * w.target;
        }
        steering += observation.wander_jitter * w.wander;

        // Cruise regulation: accelerate toward the preferred speed along
        // the current heading (or any heading when stationary).
        let cruise = w.cruise_speed.abs() * CRUISE_SCALE;
        let heading = observation.velocity.normalized();
        let speed_error = cruise - observation.velocity.length();
        if heading == Vec2::ZERO {
            steering += Vec2::new(speed_error, 0.0);
        } else {
            steering += heading * speed_error;
        }

        Action::steer(steering)
    }
}
