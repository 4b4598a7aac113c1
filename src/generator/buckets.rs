//! Category buckets and round-robin sampling.
//!
//! One [`Buckets`] exists per environment branch. Inside a category, words
//! are grouped by the target token that classified them so that sampling can
//! spread picks across tokens:
//!
//! ```text
//! CADT   "b" -> [ba, bi, bada]
//!        "d" -> [da, dibu]
//! IRR    ""  -> [pa, tipa, ...]       (single sentinel key)
//! ```

use crate::engine::ExampleType;
use rand::Rng;
use rand::seq::SliceRandom;
use std::collections::{BTreeMap, HashSet};

/// Bucket key used for every irrelevant word.
pub(crate) const IRR_KEY: &str = "";

#[derive(Debug, Clone, Default)]
pub(crate) struct Buckets {
    /// token -> words, per category in `ExampleType::ALL` order.
    maps: [BTreeMap<String, Vec<String>>; 5],
    /// Every word of a category, for dedup and counting.
    members: [HashSet<String>; 5],
}

impl Buckets {
    /// File `word` under `token` in `kind`. A word already in that category is
    /// ignored.
    pub(crate) fn add(&mut self, kind: ExampleType, token: &str, word: &str) {
        let idx = kind.index();
        if self.members[idx].insert(word.to_string()) {
            self.maps[idx].entry(token.to_string()).or_default().push(word.to_string());
        }
    }

    pub(crate) fn category(&self, kind: ExampleType) -> &BTreeMap<String, Vec<String>> {
        &self.maps[kind.index()]
    }

    /// Distinct words filed under `kind`.
    pub(crate) fn len(&self, kind: ExampleType) -> usize {
        self.members[kind.index()].len()
    }
}

/// Pick up to `quota` words from `category`, round-robin across its tokens.
///
/// Each token's list is shuffled once; the token order is reshuffled every
/// round and each token examines exactly one word per round. A word for which
/// `taken` holds costs the token its turn. Sampling ends when the quota is
/// met, every list is exhausted, or `stall_rounds` consecutive rounds pick
/// nothing.
pub(crate) fn draw<R: Rng + ?Sized>(
    category: &BTreeMap<String, Vec<String>>,
    quota: usize,
    taken: impl Fn(&str) -> bool,
    stall_rounds: usize,
    rng: &mut R,
) -> Vec<String> {
    let mut picked: Vec<String> = Vec::new();
    if quota == 0 || category.is_empty() {
        return picked;
    }

    let lists: Vec<Vec<&str>> = category
        .values()
        .map(|words| {
            let mut list: Vec<&str> = words.iter().map(String::as_str).collect();
            list.shuffle(rng);
            list
        })
        .collect();
    let mut cursors = vec![0usize; lists.len()];
    let mut order: Vec<usize> = (0..lists.len()).collect();
    let mut seen: HashSet<&str> = HashSet::new();
    let mut stalled = 0;

    while picked.len() < quota && stalled < stall_rounds.max(1) {
        order.shuffle(rng);
        let mut progressed = false;

        for &key in &order {
            let Some(&word) = lists[key].get(cursors[key]) else {
                continue;
            };
            cursors[key] += 1;
            if !taken(word) && seen.insert(word) {
                picked.push(word.to_string());
                progressed = true;
            }
            if picked.len() >= quota {
                break;
            }
        }

        if cursors.iter().zip(&lists).all(|(c, l)| *c >= l.len()) {
            break;
        }
        stalled = if progressed { 0 } else { stalled + 1 };
    }

    picked
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::cell::Cell;

    fn category(groups: &[(&str, &[&str])]) -> BTreeMap<String, Vec<String>> {
        groups
            .iter()
            .map(|(key, words)| (key.to_string(), words.iter().map(|w| w.to_string()).collect()))
            .collect()
    }

    #[test]
    fn add_deduplicates_within_a_category() {
        let mut buckets = Buckets::default();
        buckets.add(ExampleType::Cadt, "b", "ba");
        buckets.add(ExampleType::Cadt, "d", "ba");
        buckets.add(ExampleType::Cand, "b", "ba");

        assert_eq!(buckets.len(ExampleType::Cadt), 1);
        assert_eq!(buckets.len(ExampleType::Cand), 1);
        assert_eq!(buckets.category(ExampleType::Cadt).keys().collect::<Vec<_>>(), ["b"]);
    }

    #[test]
    fn draw_spreads_picks_across_tokens() {
        let cat = category(&[("b", &["ba", "bi", "bu", "bo"]), ("d", &["da", "di"]), ("g", &["ga"])]);
        let mut rng = StdRng::seed_from_u64(5);

        let picked = draw(&cat, 3, |_| false, 10, &mut rng);
        let firsts: HashSet<char> = picked.iter().filter_map(|w| w.chars().next()).collect();
        assert_eq!(picked.len(), 3);
        assert_eq!(firsts.len(), 3, "{picked:?}");
    }

    #[test]
    fn draw_skips_taken_words_and_stops_when_exhausted() {
        let cat = category(&[("b", &["ba", "bi"]), ("d", &["da"])]);
        let mut rng = StdRng::seed_from_u64(9);

        let mut picked = draw(&cat, 10, |w| w == "bi", 10, &mut rng);
        picked.sort();
        assert_eq!(picked, vec!["ba".to_string(), "da".to_string()]);
        assert!(draw(&cat, 0, |_| false, 10, &mut rng).is_empty());
    }

    #[test]
    fn draw_gives_up_after_stalled_rounds() {
        let words: Vec<String> = (0..10).map(|i| format!("b{i}")).collect();
        let words: Vec<&str> = words.iter().map(String::as_str).collect();
        let cat = category(&[("b", words.as_slice())]);
        let mut rng = StdRng::seed_from_u64(4);

        let examined = Cell::new(0);
        let taken = |_: &str| {
            examined.set(examined.get() + 1);
            true
        };
        assert!(draw(&cat, 3, taken, 2, &mut rng).is_empty());
        assert_eq!(examined.get(), 2);

        // Free words keep the rounds productive.
        assert_eq!(draw(&cat, 10, |_| false, 2, &mut rng).len(), 10);
    }

    #[test]
    fn draw_never_repeats_a_word_shared_by_tokens() {
        let cat = category(&[("b", &["bada"]), ("d", &["bada", "da"])]);
        let mut rng = StdRng::seed_from_u64(2);

        let picked = draw(&cat, 5, |_| false, 10, &mut rng);
        let unique: HashSet<&String> = picked.iter().collect();
        assert_eq!(unique.len(), picked.len());
        assert_eq!(picked.len(), 2);
    }
}
