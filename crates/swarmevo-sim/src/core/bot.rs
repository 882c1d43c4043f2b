use crate::core::{arena::ArenaBounds, vec2::Vec2};

/// One simulated agent: a point mass with position and velocity.
///
/// Bots carry no decision logic of their own; a scenario pairs each bot
/// with an intelligence and applies the returned steering every tick
/// through [`Bot::integrate`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bot {
    position: Vec2,
    velocity: Vec2,
}

impl Bot {
    #[must_use]
    pub const fn at(position: Vec2) -> Self {
        Self {
            position,
            velocity: Vec2::ZERO,
        }
    }

    #[must_use]
    pub fn position(&self) -> Vec2 {
        self.position
    }

    #[must_use]
    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    /// Advances the bot one tick under the given steering force.
    ///
    /// The steering is capped at `max_accel`, the resulting velocity at
    /// `max_speed`, and the new position is clamped into `bounds`. On wall
    /// contact the velocity is zeroed, so bots do not grind along walls at
    /// full speed.
    ///
    /// Returns the distance actually moved and whether a wall was hit.
    pub fn integrate(
        &mut self,
        steering: Vec2,
        max_accel: f32,
        max_speed: f32,
        bounds: ArenaBounds,
    ) -> (f32, bool) {
        self.velocity = (self.velocity + steering.clamped(max_accel)).clamped(max_speed);
        let proposed = self.position + self.velocity;
        let (clamped, hit_wall) = bounds.clamp(proposed);
        let moved = self.position.distance_to(clamped);
        self.position = clamped;
        if hit_wall {
            self.velocity = Vec2::ZERO;
        }
        (moved, hit_wall)
    }
}
