//! Deterministic stub collaborators for unit tests.
//!
//! The probe intelligence reports the sum of its weight vector through its
//! steering output, and the sum scenario turns that straight into fitness.
//! Together they give tests a fitness function that is a pure, known
//! function of the chromosome, with no simulation noise.

use swarmevo_sim::{
    Action, ArenaBounds, Bot, BoxedIntelligence, BoxedScenario, Intelligence, IntelligenceSpec,
    Observation, Scenario, ScenarioBuildError, ScenarioSpec, SimSeed, Vec2, WeightCountError,
};

pub(crate) const PROBE_WEIGHT_LEN: usize = 3;

/// Intelligence whose steering x-component is its weight sum.
pub(crate) struct WeightProbeSpec;

impl IntelligenceSpec for WeightProbeSpec {
    fn name(&self) -> &'static str {
        "weight_probe"
    }

    fn weight_len(&self) -> usize {
        PROBE_WEIGHT_LEN
    }

    fn build(&self, weights: &[f32]) -> Result<BoxedIntelligence, WeightCountError> {
        if weights.len() != PROBE_WEIGHT_LEN {
            return Err(WeightCountError {
                expected: PROBE_WEIGHT_LEN,
                actual: weights.len(),
            });
        }
        Ok(Box::new(ProbeIntelligence {
            sum: weights.iter().sum(),
        }))
    }
}

struct ProbeIntelligence {
    sum: f32,
}

impl Intelligence for ProbeIntelligence {
    fn decide(&self, _observation: &Observation<'_>) -> Action {
        Action::steer(Vec2::new(self.sum, 0.0))
    }
}

/// Spec whose build always fails, for exercising the failure policy.
pub(crate) struct FailingIntelligenceSpec;

impl IntelligenceSpec for FailingIntelligenceSpec {
    fn name(&self) -> &'static str {
        "failing"
    }

    fn weight_len(&self) -> usize {
        PROBE_WEIGHT_LEN
    }

    fn build(&self, weights: &[f32]) -> Result<BoxedIntelligence, WeightCountError> {
        Err(WeightCountError {
            expected: usize::MAX,
            actual: weights.len(),
        })
    }
}

/// Scenario whose fitness is the mean steering x-component of its bots'
/// intelligences — with [`WeightProbeSpec`], the mean weight sum.
pub(crate) struct SumScenarioSpec;

impl ScenarioSpec for SumScenarioSpec {
    fn name(&self) -> &'static str {
        "weight_sum"
    }

    fn build(
        &self,
        intelligences: Vec<BoxedIntelligence>,
        _seed: SimSeed,
    ) -> Result<BoxedScenario, ScenarioBuildError> {
        if intelligences.is_empty() {
            return Err(ScenarioBuildError::NoBots);
        }
        let bots = vec![Bot::at(Vec2::new(5.0, 5.0)); intelligences.len()];
        Ok(Box::new(SumScenario {
            intelligences,
            bots,
            value: 0.0,
        }))
    }
}

struct SumScenario {
    intelligences: Vec<BoxedIntelligence>,
    bots: Vec<Bot>,
    value: f32,
}

impl Scenario for SumScenario {
    #[expect(clippy::cast_precision_loss)]
    fn step(&mut self) {
        let mut total = 0.0;
        for (index, intelligence) in self.intelligences.iter().enumerate() {
            let observation = Observation {
                bot_index: index,
                position: Vec2::new(5.0, 5.0),
                velocity: Vec2::ZERO,
                neighbors: &[],
                bounds: self.bounds(),
                target: None,
                wander_jitter: Vec2::ZERO,
            };
            total += intelligence.decide(&observation).steering.x;
        }
        self.value = total / self.intelligences.len() as f32;
    }

    fn fitness(&self) -> f32 {
        self.value
    }

    fn bots(&self) -> &[Bot] {
        &self.bots
    }

    fn bounds(&self) -> ArenaBounds {
        ArenaBounds::new(10.0, 10.0)
    }
}
