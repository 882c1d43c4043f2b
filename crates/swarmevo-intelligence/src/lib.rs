//! Weight-parameterized bot intelligences.
//!
//! This crate hosts the decision functions the genetic algorithm tunes.
//! Each intelligence interprets its weight vector as a set of named
//! steering gains, and each comes with a spec type implementing
//! [`swarmevo_sim::IntelligenceSpec`] for the plug-in registry.
//!
//! # Weight semantics
//!
//! The GA treats a chromosome as an opaque `Vec<f32>`; only the
//! intelligence gives the genes meaning. The mapping from slice positions
//! to named gains lives in each intelligence's `*Weights` struct, so the
//! interpretation is written down in exactly one place and validated by
//! `from_slice` at build time.
//!
//! - [`flocking::FlockingIntelligence`] — boids-style group behavior
//!   (7 genes: cohesion, separation, alignment, target pursuit, wander,
//!   cruise speed, perception radius).
//! - [`seeker::SeekerIntelligence`] — individual homing behavior
//!   (4 genes: target pursuit, wall avoidance, damping, wander).

pub mod flocking;
pub mod seeker;
