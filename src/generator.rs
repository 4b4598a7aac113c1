//! Quota-driven corpus generation.
//!
//! ```text
//! templates ──sample──▶ related pool ──classify──▶ per-branch buckets
//!           ──sample──▶ irrelevant pool ─────────▶ (IRR, sentinel key)
//!                                                      │
//! Amount ── difficulty table ──▶ quota per branch ─────┤
//!                                                      ▼
//!                                  round-robin draw per category
//!                                  (expand pools on shortage, bounded)
//!                                                      │
//!                                                      ▼
//!                        apply rule ─▶ underlying / surface + glosses
//! ```
//!
//! ## Responsibilities by module
//!
//! - `options.rs`: `Options` and the difficulty table.
//! - `quota.rs`: `Amount`, `CategoryCounts` and rounding of quotas.
//! - `buckets.rs`: per-branch category buckets and the round-robin draw.
//! - `gloss.rs`: `GlossPool` and gloss assignment.
//! - `corpus.rs`: the `Generator` itself and its `Generation` output.
//!
//! Scarcity never fails a call. A short category is logged with `warn!`,
//! triggers at most `Options::max_expansions` pool rebuilds per call, and is
//! reported back as a [`Shortage`]; words that no category could supply are
//! counted in [`Generation::missing`].

#[path = "generator/buckets.rs"]
mod buckets;
#[path = "generator/corpus.rs"]
mod corpus;
#[path = "generator/gloss.rs"]
mod gloss;
#[path = "generator/options.rs"]
mod options;
#[path = "generator/quota.rs"]
mod quota;

pub use corpus::{BranchAmounts, Example, Generation, Generator, Shortage};
pub use gloss::GlossPool;
pub use options::{DifficultyTable, MAX_DIFFICULTY, Options};
pub use quota::{Amount, CategoryCounts};

#[cfg(test)]
#[path = "generator/tests.rs"]
mod tests;
