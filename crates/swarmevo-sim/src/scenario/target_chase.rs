//! Moving-target pursuit scenario.
//!
//! A single target point relocates to a random arena position at a fixed
//! interval, and every bot is scored on how close it stays to it. Fitness
//! is the time-averaged mean proximity across all bots, normalized by the
//! arena diagonal so it always lands in `[0, 1]`. Behaviors that track the
//! target tightly and re-acquire it quickly after each jump score highest.

use rand_distr::{Distribution as _, Normal};
use rand_pcg::Pcg32;

use crate::{
    ScenarioBuildError,
    core::{ArenaBounds, Bot, Vec2},
    scenario::{BoxedIntelligence, BoxedScenario, Neighbor, Observation, Scenario, ScenarioSpec},
    seed::SimSeed,
};

const BOUNDS: ArenaBounds = ArenaBounds::new(100.0, 100.0);
const MAX_ACCEL: f32 = 0.5;
const MAX_SPEED: f32 = 2.5;
const WANDER_SIGMA: f32 = 0.3;
/// Ticks between target relocations.
const RETARGET_INTERVAL: u64 = 150;

/// Factory for [`TargetChaseScenario`]; registered as `target_chase`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TargetChaseSpec;

impl ScenarioSpec for TargetChaseSpec {
    fn name(&self) -> &'static str {
        "target_chase"
    }

    fn build(
        &self,
        intelligences: Vec<BoxedIntelligence>,
        seed: SimSeed,
    ) -> Result<BoxedScenario, ScenarioBuildError> {
        Ok(Box::new(TargetChaseScenario::new(intelligences, seed)?))
    }
}

/// Bots pursue a periodically relocating target; fitness = time-averaged
/// mean proximity in `[0, 1]`.
pub struct TargetChaseScenario {
    bots: Vec<Bot>,
    intelligences: Vec<BoxedIntelligence>,
    rng: Pcg32,
    wander: Normal<f32>,
    target: Vec2,
    ticks: u64,
    proximity_sum: f32,
    scratch: Vec<Neighbor>,
}

impl TargetChaseScenario {
    pub fn new(
        intelligences: Vec<BoxedIntelligence>,
        seed: SimSeed,
    ) -> Result<Self, ScenarioBuildError> {
        if intelligences.is_empty() {
            return Err(ScenarioBuildError::NoBots);
        }
        let mut rng = seed.rng();
        let target = BOUNDS.random_point(&mut rng);
        let bots = (0..intelligences.len())
            .map(|_| Bot::at(BOUNDS.random_point(&mut rng)))
            .collect::<Vec<_>>();
        let count = bots.len();
        Ok(Self {
            bots,
            intelligences,
            rng,
            wander: Normal::new(0.0, WANDER_SIGMA).unwrap(),
            target,
            ticks: 0,
            proximity_sum: 0.0,
            scratch: Vec::with_capacity(count),
        })
    }
}

impl Scenario for TargetChaseScenario {
    #[expect(clippy::cast_precision_loss)]
    fn step(&mut self) {
        if self.ticks > 0 && self.ticks % RETARGET_INTERVAL == 0 {
            self.target = BOUNDS.random_point(&mut self.rng);
        }
        self.ticks += 1;

        self.scratch.clear();
        self.scratch.extend(self.bots.iter().map(|bot| Neighbor {
            position: bot.position(),
            velocity: bot.velocity(),
        }));

        let diagonal = BOUNDS.diagonal();
        let mut proximity = 0.0;
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
                target: Some(self.target),
                wander_jitter: jitter,
            };
            let action = self.intelligences[index].decide(&observation);
            bot.integrate(action.steering, MAX_ACCEL, MAX_SPEED, BOUNDS);
            proximity += 1.0 - bot.position().distance_to(self.target) / diagonal;
        }
        self.proximity_sum += proximity / self.bots.len() as f32;
    }

    #[expect(clippy::cast_precision_loss)]
    fn fitness(&self) -> f32 {
        if self.ticks == 0 {
            0.0
        } else {
            self.proximity_sum / self.ticks as f32
        }
    }

    fn bots(&self) -> &[Bot] {
        &self.bots
    }

    fn bounds(&self) -> ArenaBounds {
        BOUNDS
    }

    fn target(&self) -> Option<Vec2> {
        Some(self.target)
    }
}
