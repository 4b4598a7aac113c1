extern crate self as ruleshift;

#[macro_use]
mod macros;
mod api;
mod engine;
mod error;
mod generator;
mod inventory;
mod loaders;
pub mod logging;
mod template;

#[cfg(test)]
mod test_support;

pub use api::{Bundle, Sources};
pub use engine::{
    Branch, Classification, EDGE_SYMBOL, Environment, Evaluator, ExampleMask, ExampleType, MatcherCache, MatcherKey,
    Replacement, Rule, RuleFamily, Target, Verdict,
};
pub use error::{EngineError, Error, LoadError};
pub use generator::{
    Amount, BranchAmounts, CategoryCounts, DifficultyTable, Example, Generation, Generator, GlossPool, MAX_DIFFICULTY,
    Options, Shortage,
};
pub use inventory::Inventory;
pub use loaders::{
    PREDEFINED_MARKER, load_feature_table, load_glosses, load_phonemes, load_rules, load_templates,
    read_feature_table, read_glosses, read_phonemes, read_rules, read_templates,
};
pub use template::Template;

use std::collections::BTreeSet;
use std::fmt;

// --- Feature model ----------------------------------------------------------

/// Name of a feature axis (a column of the feature table, e.g. `voicing`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FeatureType(String);

impl FeatureType {
    pub fn new(name: impl Into<String>) -> Self {
        FeatureType(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FeatureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An opaque feature value (e.g. `voiced`). Every value belongs to exactly one
/// [`FeatureType`]; the owning [`Inventory`] knows which.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FeatureValue(String);

impl FeatureValue {
    pub fn new(name: impl Into<String>) -> Self {
        FeatureValue(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FeatureValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An ordered list of feature values.
///
/// Used in two roles:
///
/// - as a natural-class constraint (`[consonant,voiced]` matches every sound
///   carrying *all* listed values), see [`Inventory::matching_sounds`];
/// - as an exact identity key when it lists one value per axis, see
///   [`Inventory::sound_by_features`].
///
/// Equality is positional, not set-based: `[a,b] != [b,a]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Particle {
    features: Vec<FeatureValue>,
}

impl Particle {
    pub fn new(features: Vec<FeatureValue>) -> Self {
        Particle { features }
    }

    /// Build a particle from raw value names.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Particle { features: names.into_iter().map(|n| FeatureValue::new(n)).collect() }
    }

    pub fn features(&self) -> &[FeatureValue] {
        &self.features
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

impl fmt::Display for Particle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, value) in self.features.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            f.write_str(value.as_str())?;
        }
        f.write_str("]")
    }
}

// --- Sounds -----------------------------------------------------------------

/// Stable ordering key of a sound: its row index in the feature table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SoundId(pub(crate) usize);

impl SoundId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Deterministically ordered set of sounds.
pub type SoundSet = BTreeSet<SoundId>;

/// An inventory symbol with its full feature vector (one value per axis, in
/// the inventory's axis order). Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sound {
    pub(crate) id: SoundId,
    pub(crate) symbol: String,
    pub(crate) features: Vec<FeatureValue>,
}

impl Sound {
    pub fn id(&self) -> SoundId {
        self.id
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn features(&self) -> &[FeatureValue] {
        &self.features
    }
}

impl fmt::Display for Sound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.symbol)
    }
}

// --- Spans ------------------------------------------------------------------

/// A half-open byte range inside a word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Span {
    /// Start byte index (inclusive).
    pub start: usize,
    /// End byte index (exclusive).
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Span { start, end }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}
