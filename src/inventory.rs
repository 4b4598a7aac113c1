//! Sound inventory and natural-class lookup.
//!
//! An [`Inventory`] is built once by the feature-table loader and then only
//! read. It owns every index the rest of the crate needs:
//!
//! ```text
//! axes            [major, voicing, place, manner]
//! values_by_axis  voicing -> [voiced, voiceless, ...]
//! axis_of         voiced  -> voicing
//! by_symbol       "b"     -> SoundId(1)
//! by_features     [consonant,voiced,labial,stop] -> SoundId(1)
//! sounds_by_value voiced  -> {b, d, g, ...}
//! ```
//!
//! There is no process-wide symbol table: components that need symbol lookup
//! receive `&Inventory`, so several inventories can live side by side.

use crate::error::LoadError;
use crate::{FeatureType, FeatureValue, Particle, Sound, SoundId, SoundSet, Span};
use std::collections::HashMap;

#[derive(Debug, Clone, Default)]
pub struct Inventory {
    axes: Vec<FeatureType>,
    values_by_axis: Vec<Vec<FeatureValue>>,
    axis_of: HashMap<FeatureValue, usize>,
    sounds: Vec<Sound>,
    by_symbol: HashMap<String, SoundId>,
    by_features: HashMap<Particle, SoundId>,
    sounds_by_value: HashMap<FeatureValue, SoundSet>,
    /// Longest symbol in bytes, bounds the segmentation window.
    max_symbol_len: usize,
}

impl Inventory {
    /// Create an empty inventory with the given axis order.
    pub(crate) fn with_axes(axes: Vec<FeatureType>) -> Self {
        let values_by_axis = vec![Vec::new(); axes.len()];
        Inventory { axes, values_by_axis, ..Default::default() }
    }

    /// Register a sound read from feature-table line `line`.
    ///
    /// Rejects duplicate symbols, duplicate feature vectors, rows whose width
    /// differs from the header, and value names already owned by another axis.
    pub(crate) fn insert(&mut self, line: usize, symbol: &str, values: Vec<FeatureValue>) -> Result<SoundId, LoadError> {
        if values.len() != self.axes.len() {
            return Err(LoadError::MisalignedRow {
                line,
                symbol: symbol.to_string(),
                expected: self.axes.len(),
                found: values.len(),
            });
        }

        if self.by_symbol.contains_key(symbol) {
            return Err(LoadError::DuplicateSymbol { line, symbol: symbol.to_string() });
        }

        let key = Particle::new(values.clone());
        if let Some(existing) = self.by_features.get(&key) {
            return Err(LoadError::DuplicateFeatureVector {
                line,
                symbol: symbol.to_string(),
                existing: self.sounds[existing.0].symbol.clone(),
            });
        }

        for (axis, value) in values.iter().enumerate() {
            match self.axis_of.get(value) {
                Some(&owner) if owner != axis => {
                    return Err(LoadError::AmbiguousFeatureValue {
                        line,
                        value: value.to_string(),
                        first: self.axes[owner].to_string(),
                        second: self.axes[axis].to_string(),
                    });
                }
                Some(_) => {}
                None => {
                    self.axis_of.insert(value.clone(), axis);
                    self.values_by_axis[axis].push(value.clone());
                }
            }
        }

        let id = SoundId(self.sounds.len());
        for value in &values {
            self.sounds_by_value.entry(value.clone()).or_default().insert(id);
        }
        self.by_symbol.insert(symbol.to_string(), id);
        self.by_features.insert(key, id);
        self.max_symbol_len = self.max_symbol_len.max(symbol.len());
        self.sounds.push(Sound { id, symbol: symbol.to_string(), features: values });

        Ok(id)
    }

    // --- Feature axes ---------------------------------------------------------

    /// Axis names in table order.
    pub fn axes(&self) -> &[FeatureType] {
        &self.axes
    }

    /// Values seen on `axis`, in first-seen order.
    pub fn values_of(&self, axis: &FeatureType) -> Option<&[FeatureValue]> {
        let idx = self.axes.iter().position(|a| a == axis)?;
        Some(&self.values_by_axis[idx])
    }

    /// The axis a value belongs to.
    pub fn axis_of(&self, value: &FeatureValue) -> Option<&FeatureType> {
        self.axis_of.get(value).map(|&idx| &self.axes[idx])
    }

    /// True when `name` is a feature value of some axis.
    pub fn has_value(&self, name: &str) -> bool {
        self.axis_of.contains_key(&FeatureValue::new(name))
    }

    // --- Sounds -------------------------------------------------------------

    pub fn sounds(&self) -> &[Sound] {
        &self.sounds
    }

    pub fn len(&self) -> usize {
        self.sounds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sounds.is_empty()
    }

    pub fn sound(&self, id: SoundId) -> &Sound {
        &self.sounds[id.0]
    }

    pub fn sound_by_symbol(&self, symbol: &str) -> Option<&Sound> {
        self.by_symbol.get(symbol).map(|id| &self.sounds[id.0])
    }

    /// Exact lookup: the sound whose full feature vector equals `key`.
    pub fn sound_by_features(&self, key: &Particle) -> Option<&Sound> {
        self.by_features.get(key).map(|id| &self.sounds[id.0])
    }

    /// Every sound in the table.
    pub fn universe(&self) -> SoundSet {
        self.sounds.iter().map(|s| s.id).collect()
    }

    /// Symbols of `set`, in id order (for logs and reports).
    pub fn symbols<'a>(&'a self, set: &SoundSet) -> Vec<&'a str> {
        set.iter().map(|id| self.sounds[id.0].symbol.as_str()).collect()
    }

    // --- Natural classes ----------------------------------------------------

    /// Sounds carrying every value of `particle`, optionally restricted to
    /// `allowed`.
    ///
    /// An empty particle matches everything (or exactly `allowed`). An unknown
    /// value matches nothing. The result is never an error: an empty set means
    /// the slot is unsatisfiable.
    pub fn matching_sounds(&self, particle: &Particle, allowed: Option<&SoundSet>) -> SoundSet {
        let mut result: SoundSet = match allowed {
            Some(set) => set.clone(),
            None => self.universe(),
        };

        for value in particle.features() {
            match self.sounds_by_value.get(value) {
                Some(carriers) => result.retain(|id| carriers.contains(id)),
                None => return SoundSet::new(),
            }
            if result.is_empty() {
                break;
            }
        }

        result
    }

    /// The sound obtained by overwriting `id`'s feature vector with the values
    /// of `delta`, axis by axis.
    ///
    /// Returns `None` when the respecified vector names no sound in the table
    /// (or `delta` mentions an unknown value).
    pub fn respecify(&self, id: SoundId, delta: &Particle) -> Option<SoundId> {
        let mut features = self.sounds[id.0].features.clone();
        for value in delta.features() {
            let axis = *self.axis_of.get(value)?;
            features[axis] = value.clone();
        }
        self.by_features.get(&Particle::new(features)).copied()
    }

    /// Split `word` into sound spans, greedily preferring the longest symbol
    /// at each position. Characters that start no symbol become one-char
    /// spans.
    ///
    /// ```text
    /// "chat" -> [0..2 "ch", 2..3 "a", 3..4 "t"]
    /// ```
    pub fn segment(&self, word: &str) -> Vec<Span> {
        let mut spans = Vec::new();
        let mut start = 0;

        while start < word.len() {
            let rest = &word[start..];
            let one_char = rest.chars().next().map(|c| start + c.len_utf8()).unwrap_or(word.len());

            let longest = rest
                .char_indices()
                .map(|(i, c)| start + i + c.len_utf8())
                .take_while(|&end| end - start <= self.max_symbol_len)
                .filter(|&end| self.by_symbol.contains_key(&word[start..end]))
                .last();

            let end = longest.unwrap_or(one_char);
            spans.push(Span::new(start, end));
            start = end;
        }

        spans
    }
}
