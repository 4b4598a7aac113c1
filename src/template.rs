//! Word-shape templates.
//!
//! A [`Template`] is an ordered list of slot constraints. It produces words by
//! choosing one matching sound per slot and concatenating the symbols:
//!
//! ```text
//! [consonant]-[vowel]   with phonemes {p, b, a, i}
//!   expand  -> pa, pi, ba, bi          (full cartesian product)
//!   sample  -> up to N random draws    (deduplicated)
//! ```
//!
//! Exhaustive expansion is meant for short particle sequences (rule targets
//! and environments). Full word shapes go through [`Template::sample`], since
//! their cartesian product is usually intractable.

use crate::{Inventory, Particle, SoundId, SoundSet};
use rand::Rng;
use rand::seq::SliceRandom;
use std::collections::HashSet;
use std::fmt;

/// Random draws allowed per requested word before sampling gives up.
const MAX_DRAWS_PER_WORD: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Template {
    slots: Vec<Particle>,
}

impl Template {
    pub fn new(slots: Vec<Particle>) -> Self {
        Template { slots }
    }

    pub fn slots(&self) -> &[Particle] {
        &self.slots
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Candidate sounds per slot. `None` if any slot is unsatisfiable.
    fn slot_sounds(&self, inventory: &Inventory, allowed: Option<&SoundSet>) -> Option<Vec<Vec<SoundId>>> {
        let mut per_slot = Vec::with_capacity(self.slots.len());
        for particle in &self.slots {
            let sounds: Vec<SoundId> = inventory.matching_sounds(particle, allowed).into_iter().collect();
            if sounds.is_empty() {
                return None;
            }
            per_slot.push(sounds);
        }
        Some(per_slot)
    }

    /// Size of the cartesian product (saturating).
    pub fn word_count(&self, inventory: &Inventory, allowed: Option<&SoundSet>) -> usize {
        if self.slots.is_empty() {
            return 0;
        }
        self.slots
            .iter()
            .map(|p| inventory.matching_sounds(p, allowed).len())
            .fold(1usize, |acc, n| acc.saturating_mul(n))
    }

    /// Every word the template can produce, in slot-major order.
    ///
    /// Returns an empty list as soon as one slot matches nothing.
    pub fn expand(&self, inventory: &Inventory, allowed: Option<&SoundSet>) -> Vec<String> {
        if self.slots.is_empty() {
            return Vec::new();
        }
        let Some(per_slot) = self.slot_sounds(inventory, allowed) else {
            return Vec::new();
        };

        let mut words = vec![String::new()];
        for sounds in &per_slot {
            let mut next = Vec::with_capacity(words.len() * sounds.len());
            for word in &words {
                for &id in sounds {
                    let mut w = word.clone();
                    w.push_str(inventory.sound(id).symbol());
                    next.push(w);
                }
            }
            words = next;
        }

        // Different sound sequences can spell the same string (e.g. "c"+"h"
        // and "ch"); keep the first occurrence.
        let mut seen = HashSet::with_capacity(words.len());
        words.retain(|w| seen.insert(w.clone()));
        words
    }

    /// Up to `size_limit` distinct words drawn at random.
    ///
    /// Each draw picks one sound per slot independently. Sampling stops when
    /// `size_limit` distinct words exist or the draw budget runs out, so fewer
    /// words than requested is a normal outcome.
    pub fn sample<R: Rng + ?Sized>(
        &self,
        inventory: &Inventory,
        size_limit: usize,
        allowed: Option<&SoundSet>,
        rng: &mut R,
    ) -> Vec<String> {
        if self.slots.is_empty() || size_limit == 0 {
            return Vec::new();
        }
        let Some(mut per_slot) = self.slot_sounds(inventory, allowed) else {
            return Vec::new();
        };
        for sounds in per_slot.iter_mut() {
            sounds.shuffle(rng);
        }

        let mut words = Vec::new();
        let mut seen = HashSet::new();
        let budget = size_limit.saturating_mul(MAX_DRAWS_PER_WORD);

        for _ in 0..budget {
            let mut word = String::new();
            for sounds in &per_slot {
                let id = sounds[rng.gen_range(0..sounds.len())];
                word.push_str(inventory.sound(id).symbol());
            }
            if seen.insert(word.clone()) {
                words.push(word);
                if words.len() >= size_limit {
                    break;
                }
            }
        }

        words
    }

    /// Up to `size_limit` distinct words that each spell `anchor` somewhere.
    ///
    /// `anchor` lists the sounds allowed at consecutive positions. Each draw
    /// picks a start slot where every anchor position fits its slot, fills
    /// those slots from the overlap and the other slots freely:
    ///
    /// ```text
    /// [consonant]-[vowel]-[consonant]   anchor [voiced]
    ///   start 0 -> b a t, d i p, ...
    ///   start 2 -> p a b, t i d, ...
    /// ```
    ///
    /// An empty anchor behaves like [`Template::sample`]; an anchor that fits
    /// nowhere yields no words.
    pub fn sample_anchored<R: Rng + ?Sized>(
        &self,
        inventory: &Inventory,
        size_limit: usize,
        allowed: Option<&SoundSet>,
        anchor: &[SoundSet],
        rng: &mut R,
    ) -> Vec<String> {
        if anchor.is_empty() {
            return self.sample(inventory, size_limit, allowed, rng);
        }
        if self.slots.len() < anchor.len() || size_limit == 0 {
            return Vec::new();
        }
        let Some(per_slot) = self.slot_sounds(inventory, allowed) else {
            return Vec::new();
        };

        // For every feasible start, the sounds each anchored slot may take.
        let starts: Vec<(usize, Vec<Vec<SoundId>>)> = (0..=per_slot.len() - anchor.len())
            .filter_map(|start| {
                let fitted: Vec<Vec<SoundId>> = anchor
                    .iter()
                    .enumerate()
                    .map(|(offset, sounds)| {
                        per_slot[start + offset].iter().copied().filter(|id| sounds.contains(id)).collect()
                    })
                    .collect();
                fitted.iter().all(|f: &Vec<SoundId>| !f.is_empty()).then_some((start, fitted))
            })
            .collect();
        if starts.is_empty() {
            return Vec::new();
        }

        let mut words = Vec::new();
        let mut seen = HashSet::new();
        let budget = size_limit.saturating_mul(MAX_DRAWS_PER_WORD);

        for _ in 0..budget {
            let (start, fitted) = &starts[rng.gen_range(0..starts.len())];
            let mut word = String::new();
            for (slot, sounds) in per_slot.iter().enumerate() {
                let sounds = match slot.checked_sub(*start) {
                    Some(offset) if offset < fitted.len() => &fitted[offset],
                    _ => sounds,
                };
                let id = sounds[rng.gen_range(0..sounds.len())];
                word.push_str(inventory.sound(id).symbol());
            }
            if seen.insert(word.clone()) {
                words.push(word);
                if words.len() >= size_limit {
                    break;
                }
            }
        }

        words
    }

    /// Exhaustive expansion when `size_limit` is `None`, sampling otherwise.
    pub fn generate<R: Rng + ?Sized>(
        &self,
        inventory: &Inventory,
        size_limit: Option<usize>,
        allowed: Option<&SoundSet>,
        rng: &mut R,
    ) -> Vec<String> {
        match size_limit {
            None => self.expand(inventory, allowed),
            Some(limit) => self.sample(inventory, limit, allowed, rng),
        }
    }
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, slot) in self.slots.iter().enumerate() {
            if i > 0 {
                f.write_str("-")?;
            }
            write!(f, "{}", slot)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{phonemes, template, toy_inventory};
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn expand_is_full_cartesian_product() {
        let inv = toy_inventory();
        let allowed = phonemes(&inv, "p b t a i");
        let t = template(&inv, "[consonant]-[vowel]-[consonant]");

        let words = t.expand(&inv, Some(&allowed));
        assert_eq!(words.len(), 3 * 2 * 3);
        assert_eq!(words.len(), t.word_count(&inv, Some(&allowed)));
        assert_eq!(words.first().map(String::as_str), Some("pap"));
        assert!(words.contains(&"tib".to_string()));
    }

    #[test]
    fn expand_fails_fast_on_empty_slot() {
        let inv = toy_inventory();
        let allowed = phonemes(&inv, "p t a");
        let t = template(&inv, "[consonant]-[nasal]");

        assert!(t.expand(&inv, Some(&allowed)).is_empty());
        assert_eq!(t.word_count(&inv, Some(&allowed)), 0);
    }

    #[test]
    fn sample_respects_limit_and_allowed_set() {
        let inv = toy_inventory();
        let allowed = phonemes(&inv, "p b t d k g a e i o u");
        let t = template(&inv, "[consonant]-[vowel]-[consonant]-[vowel]");
        let mut rng = StdRng::seed_from_u64(7);

        let words = t.sample(&inv, 40, Some(&allowed), &mut rng);
        assert!(words.len() <= 40);
        assert!(!words.is_empty());
        for w in &words {
            assert_eq!(w.len(), 4);
            assert!(w.chars().all(|c| "pbtdkgaeiou".contains(c)), "{w}");
        }
    }

    #[test]
    fn sample_tolerates_small_spaces() {
        let inv = toy_inventory();
        let allowed = phonemes(&inv, "p a");
        let t = template(&inv, "[consonant]-[vowel]");
        let mut rng = StdRng::seed_from_u64(1);

        assert_eq!(t.generate(&inv, Some(10), Some(&allowed), &mut rng), vec!["pa".to_string()]);
    }

    #[test]
    fn anchored_samples_always_contain_the_anchor() {
        let inv = toy_inventory();
        let allowed = phonemes(&inv, "p b t d a i");
        let voiced = phonemes(&inv, "b d");
        let t = template(&inv, "[consonant]-[vowel]-[consonant]");
        let mut rng = StdRng::seed_from_u64(11);

        let words = t.sample_anchored(&inv, 30, Some(&allowed), &[voiced.clone()], &mut rng);
        assert!(!words.is_empty());
        for w in &words {
            assert!(w.contains('b') || w.contains('d'), "{w}");
        }

        // A two-sound anchor only fits where a consonant is followed by a vowel.
        let vowel = phonemes(&inv, "i");
        let pairs = t.sample_anchored(&inv, 30, Some(&allowed), &[voiced, vowel], &mut rng);
        assert!(pairs.iter().all(|w| w[..2] == *"bi" || w[..2] == *"di"), "{pairs:?}");

        // Vowels never fit a consonant slot.
        let misfit = phonemes(&inv, "a");
        let t = template(&inv, "[consonant]-[consonant]");
        assert!(t.sample_anchored(&inv, 10, Some(&allowed), &[misfit], &mut rng).is_empty());
    }

    #[test]
    fn display_joins_slots() {
        let inv = toy_inventory();
        let t = template(&inv, "[consonant,voiced]-[vowel]");
        assert_eq!(t.to_string(), "[consonant,voiced]-[vowel]");
    }

    proptest! {
        #[test]
        fn prop_sample_has_no_duplicates(seed in any::<u64>(), limit in 1usize..60) {
            let inv = toy_inventory();
            let t = template(&inv, "[consonant]-[vowel]-[consonant]");
            let mut rng = StdRng::seed_from_u64(seed);

            let words = t.sample(&inv, limit, None, &mut rng);
            let unique: HashSet<&String> = words.iter().collect();
            prop_assert!(words.len() <= limit);
            prop_assert_eq!(unique.len(), words.len());
        }
    }
}
