//! Error types.
//!
//! Failures fall into two families:
//!
//! - [`LoadError`]: a feature table, rule file, template file, phoneme list or
//!   gloss list could not be read or is malformed. Loads are all-or-nothing;
//!   nothing is partially applied.
//! - [`EngineError`]: a contract between components was broken (for example a
//!   word from the related pool turned out to be irrelevant). These are not
//!   user-recoverable.
//!
//! Scarcity is *not* an error: a short category is reported through
//! [`crate::Shortage`] and a `warn!` event, and generation carries on.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading input data.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Data row found before the `[TL]` header row.
    #[error("line {line}: feature table does not start with a [TL] header row")]
    MissingHeader { line: usize },

    #[error("line {line}: duplicate [TL] header row")]
    DuplicateHeader { line: usize },

    #[error("line {line}: sound '{symbol}' lists {found} feature values, header declares {expected}")]
    MisalignedRow { line: usize, symbol: String, expected: usize, found: usize },

    #[error("line {line}: duplicate sound symbol '{symbol}'")]
    DuplicateSymbol { line: usize, symbol: String },

    #[error("line {line}: sound '{symbol}' has the same feature vector as '{existing}'")]
    DuplicateFeatureVector { line: usize, symbol: String, existing: String },

    /// A feature value name appears under two different axes.
    #[error("line {line}: feature value '{value}' is used by both '{first}' and '{second}'")]
    AmbiguousFeatureValue { line: usize, value: String, first: String, second: String },

    #[error("line {line}: unknown feature '{feature}'")]
    UnknownFeature { line: usize, feature: String },

    #[error("line {line}: unknown phoneme symbol '{symbol}'")]
    UnknownSymbol { line: usize, symbol: String },

    #[error("line {line}: invalid rule '{text}': {reason}")]
    MalformedRule { line: usize, text: String, reason: String },

    #[error("line {line}: invalid template '{text}': {reason}")]
    MalformedTemplate { line: usize, text: String, reason: String },

    #[error("line {line}: gloss group is empty")]
    EmptyGlossGroup { line: usize },
}

/// Contract violations between the rule engine and the generator.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum EngineError {
    #[error("rule has {c} left environments but {d} right environments")]
    BranchCountMismatch { c: usize, d: usize },

    #[error("rule has no environment branch")]
    NoBranches,

    /// Pool construction guarantees every related word carries a target.
    #[error("related word '{word}' was classified as irrelevant")]
    RelatedWordIrrelevant { word: String },

    #[error("difficulty {0} has no entry in the difficulty table")]
    UnknownDifficulty(u8),

    #[error("related pool share must lie within 0.0..=1.0, got {0}")]
    InvalidPoolSplit(f64),

    /// Category shares must be non-negative and sum to at most 1.
    #[error("difficulty {level}: category shares sum to {sum}, expected at most 1.0")]
    InvalidShares { level: u8, sum: f64 },
}

/// Umbrella error for the file-facing API and the binary.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("rule index {index} out of range ({count} rules loaded)")]
    NoSuchRule { index: usize, count: usize },
}
