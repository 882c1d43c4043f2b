//! Simulated world model for bot evolution.
//!
//! This crate provides the two collaborator seams the training system is
//! built around, plus the concrete worlds shipped with the binary:
//!
//! - [`Scenario`] — a self-contained simulated environment. It owns the
//!   bots, advances them one tick at a time via [`Scenario::step`], and
//!   defines the fitness metric read after a bounded run.
//! - [`Intelligence`] — the per-bot decision function. Given an
//!   [`Observation`] of the world from one bot's point of view, it returns
//!   the [`Action`] that bot takes this tick.
//!
//! Both seams come with a spec/factory counterpart ([`ScenarioSpec`],
//! [`IntelligenceSpec`]) so fresh, independent instances can be built per
//! evaluation. Scenarios are deterministic functions of their [`SimSeed`]:
//! all in-scenario randomness (spawn placement, wander jitter, target
//! repositioning) flows from a seeded PCG stream, so the same seed always
//! replays the same run.
//!
//! # Concrete scenarios
//!
//! - [`scenario::free_roam`] — bots roam a bounded arena; fitness rewards
//!   ground covered and penalizes wall contact.
//! - [`scenario::target_chase`] — bots pursue a periodically relocating
//!   target; fitness is time-averaged proximity.

pub use self::{core::*, scenario::*, seed::SimSeed};

pub mod core;
pub mod scenario;
pub mod seed;

/// A weight vector had the wrong length for the intelligence it was meant
/// to parameterize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("weight vector has {actual} genes, intelligence expects {expected}")]
pub struct WeightCountError {
    /// Number of genes the intelligence requires.
    pub expected: usize,
    /// Number of genes actually supplied.
    pub actual: usize,
}

/// A scenario could not be assembled from the supplied collaborators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ScenarioBuildError {
    /// A scenario needs at least one bot to simulate.
    #[display("scenario requires at least one bot")]
    NoBots,
}
