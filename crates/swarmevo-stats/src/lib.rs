//! Descriptive statistics for evolution reporting.
//!
//! The evolution loop and the CLI summarize fitness distributions and
//! per-gene weight spreads every generation. This crate provides the small
//! statistical toolkit those summaries are built from, with no dependency
//! on the simulation or GA crates.

pub mod descriptive;
