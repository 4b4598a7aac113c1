//! Memoized expansion of particle sequences.
//!
//! Every environment check needs the concrete strings a `C`/`D` (or `A`)
//! particle sequence can spell. Deriving them is a cartesian product over the
//! inventory, so doing it per target per word dominates classification cost.
//! [`MatcherCache`] keys expansions *structurally*: two equal particle
//! sequences over the same allowed set share one entry no matter where they
//! come from.
//!
//! The cache never evicts; it lives exactly as long as its owning
//! [`Evaluator`](super::Evaluator) and can be dropped and rebuilt at any time.

use crate::{Inventory, Particle, SoundId, SoundSet, Template};
use std::collections::HashMap;
use std::rc::Rc;

/// Structural cache key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MatcherKey {
    pub particles: Vec<Particle>,
    /// Allowed sounds, in id order (`None` = whole inventory).
    pub allowed: Option<Vec<SoundId>>,
    /// `None` for exhaustive expansion.
    pub size_limit: Option<usize>,
}

impl MatcherKey {
    pub fn exhaustive(particles: &[Particle], allowed: Option<&SoundSet>) -> Self {
        MatcherKey {
            particles: particles.to_vec(),
            allowed: allowed.map(|set| set.iter().copied().collect()),
            size_limit: None,
        }
    }
}

#[derive(Debug, Default)]
pub struct MatcherCache {
    entries: HashMap<MatcherKey, Rc<[String]>>,
    hits: usize,
    misses: usize,
}

impl MatcherCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Candidate strings for `particles`, longest first.
    ///
    /// Longest-first order lets scanners prefer `ch` over `c` when both fit.
    pub fn expansion(&mut self, inventory: &Inventory, particles: &[Particle], allowed: Option<&SoundSet>) -> Rc<[String]> {
        let key = MatcherKey::exhaustive(particles, allowed);
        self.get_or_insert_with(key, || {
            let mut words = Template::new(particles.to_vec()).expand(inventory, allowed);
            words.sort_by(|a, b| b.len().cmp(&a.len()));
            words
        })
    }

    /// Look `key` up, computing and storing the value on a miss.
    pub fn get_or_insert_with<F>(&mut self, key: MatcherKey, compute: F) -> Rc<[String]>
    where
        F: FnOnce() -> Vec<String>,
    {
        if let Some(found) = self.entries.get(&key) {
            self.hits += 1;
            return Rc::clone(found);
        }
        self.misses += 1;
        let value: Rc<[String]> = compute().into();
        self.entries.insert(key, Rc::clone(&value));
        value
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn hits(&self) -> usize {
        self.hits
    }

    pub fn misses(&self) -> usize {
        self.misses
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
