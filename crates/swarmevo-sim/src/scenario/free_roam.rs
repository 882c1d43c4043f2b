//! Open-arena roaming scenario.
//!
//! Bots spawn at random positions in a bounded arena and are free to go
//! anywhere. The fitness metric rewards ground covered and penalizes wall
//! contact, so evolved behaviors learn to keep moving while staying away
//! from the edges. With a flocking intelligence this is the classic
//! emergent-swarm setup: groups that cruise together cover distance
//! without piling into walls.

use rand_distr::{Distribution as _, Normal};
use rand_pcg::Pcg32;

use crate::{
    ScenarioBuildError,
    core::{ArenaBounds, Bot, Vec2},
    scenario::{BoxedIntelligence, BoxedScenario, Neighbor, Observation, Scenario, ScenarioSpec},
    seed::SimSeed,
};

const BOUNDS: ArenaBounds = ArenaBounds::new(120.0, 80.0);
const MAX_ACCEL: f32 = 0.4;
const MAX_SPEED: f32 = 2.0;
/// Standard deviation of the per-tick wander noise sample.
const WANDER_SIGMA: f32 = 0.5;
/// Fitness deducted per wall contact, in units of distance travelled.
const WALL_PENALTY: f32 = 5.0;

/// Factory for [`FreeRoamScenario`]; registered as `free_roam`.
#[derive(Debug, Clone, Copy, Default)]
pub struct FreeRoamSpec;

impl ScenarioSpec for FreeRoamSpec {
    fn name(&self) -> &'static str {
        "free_roam"
    }

    fn build(
        &self,
        intelligences: Vec<BoxedIntelligence>,
        seed: SimSeed,
    ) -> Result<BoxedScenario, ScenarioBuildError> {
        Ok(Box::new(FreeRoamScenario::new(intelligences, seed)?))
    }
}

/// Bots roam a bounded arena; fitness = mean distance travelled minus a
/// wall-contact penalty.
pub struct FreeRoamScenario {
    bots: Vec<Bot>,
    intelligences: Vec<BoxedIntelligence>,
    rng: Pcg32,
    wander: Normal<f32>,
    travelled: Vec<f32>,
    wall_contacts: Vec<u32>,
    scratch: Vec<Neighbor>,
}

impl FreeRoamScenario {
    pub fn new(
        intelligences: Vec<BoxedIntelligence>,
        seed: SimSeed,
    ) -> Result<Self, ScenarioBuildError> {
        if intelligences.is_empty() {
            return Err(ScenarioBuildError::NoBots);
        }
        let mut rng = seed.rng();
        let bots = (0..intelligences.len())
            .map(|_| Bot::at(BOUNDS.random_point(&mut rng)))
            .collect::<Vec<_>>();
        let count = bots.len();
        Ok(Self {
            bots,
            intelligences,
            rng,
            wander: Normal::new(0.0, WANDER_SIGMA).unwrap(),
            travelled: vec![0.0; count],
            wall_contacts: vec![0; count],
            scratch: Vec::with_capacity(count),
        })
    }
}

impl Scenario for FreeRoamScenario {
    fn step(&mut self) {
        self.scratch.clear();
        self.scratch.extend(self.bots.iter().map(|bot| Neighbor {
            position: bot.position(),
            velocity: bot.velocity(),
        }));

        // Bots are processed in index order so the jitter stream is a pure
        // function of the seed.
        for (index, bot) in self.bots.iter_mut().enumerate() {
            let jitter = Vec2::new(
                self.wander.sample(&mut self.rng),
                self.wander.sample(&mut self.rng),
            );
            let observation = Observation {
                bot_index: index,
                position: bot.position(),
                velocity: bot.velocity(),
                neighbors: &self.scratch,
                bounds: BOUNDS,
                target: None,
                wander_jitter: jitter,
            };
            let action = self.intelligences[index].decide(&observation);
            let (moved, hit_wall) = bot.integrate(action.steering, MAX_ACCEL, MAX_SPEED, BOUNDS);
            self.travelled[index] += moved;
            if hit_wall {
                self.wall_contacts[index] += 1;
            }
        }
    }

    #[expect(clippy::cast_precision_loss)]
    fn fitness(&self) -> f32 {
        let per_bot = self
            .travelled
            .iter()
            .zip(&self.wall_contacts)
            .map(|(travelled, contacts)| travelled - WALL_PENALTY * (*contacts as f32));
        per_bot.sum::<f32>() / self.bots.len() as f32
    }

    fn bots(&self) -> &[Bot] {
        &self.bots
    }

    fn bounds(&self) -> ArenaBounds {
        BOUNDS
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenario::{Action, Intelligence};

    /// Pushes in a fixed direction, ignoring the observation.
    struct Mover(Vec2);

    impl Intelligence for Mover {
        fn decide(&self, _observation: &Observation<'_>) -> Action {
            Action::steer(self.0)
        }
    }

    /// Steers toward the arena center, so it never grinds a wall
    /// regardless of spawn position.
    struct CenterSeeker;

    impl Intelligence for CenterSeeker {
        fn decide(&self, observation: &Observation<'_>) -> Action {
            Action::steer(observation.bounds.center() - observation.position)
        }
    }

    /// Never steers.
    struct Still;

    impl Intelligence for Still {
        fn decide(&self, _observation: &Observation<'_>) -> Action {
            Action::default()
        }
    }

    fn boxed<I: Intelligence + 'static>(intelligence: I) -> BoxedIntelligence {
        Box::new(intelligence)
    }

    const SEED: SimSeed = SimSeed::from_bytes([11; 16]);

    #[test]
    fn test_requires_at_least_one_bot() {
        let err = FreeRoamScenario::new(vec![], SEED).err().unwrap();
        assert_eq!(err, ScenarioBuildError::NoBots);
    }

    #[test]
    fn test_same_seed_reproduces_fitness() {
        let mut a = FreeRoamScenario::new(vec![boxed(Mover(Vec2::new(1.0, 0.5)))], SEED).unwrap();
        let mut b = FreeRoamScenario::new(vec![boxed(Mover(Vec2::new(1.0, 0.5)))], SEED).unwrap();
        for _ in 0..50 {
            a.step();
            b.step();
        }
        assert_eq!(a.fitness(), b.fitness());
        assert_eq!(a.bots()[0], b.bots()[0]);
    }

    #[test]
    fn test_moving_beats_standing_still() {
        let mut moving = FreeRoamScenario::new(vec![boxed(CenterSeeker)], SEED).unwrap();
        let mut still = FreeRoamScenario::new(vec![boxed(Still)], SEED).unwrap();
        for _ in 0..30 {
            moving.step();
            still.step();
        }
        assert!(moving.fitness() > still.fitness());
        assert_eq!(still.fitness(), 0.0);
    }

    #[test]
    fn test_wall_grinding_is_penalized() {
        // Full throttle into the right wall: travels briefly, then racks
        // up contact penalties.
        let mut grinder =
            FreeRoamScenario::new(vec![boxed(Mover(Vec2::new(100.0, 0.0)))], SEED).unwrap();
        for _ in 0..500 {
            grinder.step();
        }
        assert!(grinder.fitness() < 0.0);
    }

    #[test]
    fn test_bots_stay_in_bounds() {
        let mut scenario =
            FreeRoamScenario::new(vec![boxed(Mover(Vec2::new(-50.0, 30.0)))], SEED).unwrap();
        for _ in 0..100 {
            scenario.step();
            assert!(scenario.bounds().contains(scenario.bots()[0].position()));
        }
    }

    #[test]
    fn test_spec_builds_one_bot_per_intelligence() {
        let scenario = FreeRoamSpec
            .build(vec![boxed(Still), boxed(Still), boxed(Still)], SEED)
            .unwrap();
        assert_eq!(scenario.bots().len(), 3);
        assert_eq!(FreeRoamSpec.name(), "free_roam");
    }
}
