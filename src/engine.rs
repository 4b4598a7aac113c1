//! Rule evaluation engine.
//!
//! The engine answers two questions about a word and a rule `A -> B / C_D`:
//! *how does the rule see this word* (classification) and *what does the word
//! become* (application). It is split into focused submodules under
//! `src/engine/` while keeping public paths flat (`crate::engine::Rule`,
//! `crate::engine::Evaluator`, ...).
//!
//! ## How the parts work together
//!
//! ```text
//! rule text ── loaders ──▶ Rule (rule.rs, immutable)
//!                            │
//!                            ▼
//!            Evaluator::new(rule, inventory, phonemes)   (evaluator.rs)
//!                            │
//! word ── locate_targets ────┤  A expanded via MatcherCache (matcher_cache.rs)
//!                            │
//!                            ▼
//!          per target × per branch: is_c / is_d
//!                            │   C, D expanded via MatcherCache
//!                            ▼
//!          Classification (classify.rs)  +  memoized CADT spans
//!                            │
//!                            ▼
//!          apply: rewrite CADT spans left to right, shifting offsets
//! ```
//!
//! ## Responsibilities by module
//!
//! - `rule.rs`: the rule data model (`Target`, `Replacement`, `Environment`,
//!   `Branch`, `Rule`) and its notation-style `Display`.
//! - `matcher_cache.rs`: structural cache of particle-sequence expansions.
//! - `classify.rs`: the `CADT`/`CADNT`/`CAND`/`NCAD`/`IRR` taxonomy, its
//!   precedence and the `ExampleMask` summary.
//! - `evaluator.rs`: target scanning, environment checks, classification and
//!   application for one rule.
//! - `family.rs`: weighted groups of related rules.
//!
//! ## Debugging
//!
//! Set `RULESHIFT_LOG=ruleshift::engine=trace` to see per-word classification
//! events.

#[path = "engine/classify.rs"]
mod classify;
#[path = "engine/evaluator.rs"]
mod evaluator;
#[path = "engine/family.rs"]
mod family;
#[path = "engine/matcher_cache.rs"]
mod matcher_cache;
#[path = "engine/rule.rs"]
mod rule;

pub use classify::{Classification, ExampleMask, ExampleType, Verdict};
pub use evaluator::Evaluator;
pub use family::RuleFamily;
pub use matcher_cache::{MatcherCache, MatcherKey};
pub use rule::{Branch, EDGE_SYMBOL, Environment, Replacement, Rule, Target};
