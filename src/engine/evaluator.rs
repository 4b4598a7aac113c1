//! Rule evaluation: target location, environment checks, classification and
//! rewrite application.
//!
//! An [`Evaluator`] binds one [`Rule`] to an [`Inventory`] and a phoneme set
//! and owns the mutable caches:
//!
//! - a [`MatcherCache`] of expanded `A`/`C`/`D` candidates;
//! - a per-word memo of the classification and of the `CADT` spans that
//!   [`Evaluator::apply`] later rewrites.
//!
//! Both caches are append-only and private to the evaluator; there is no
//! sharing across threads.
//!
//! ## Positions
//!
//! Words are plain strings and every position is a byte offset. Matching is
//! restricted to sound boundaries (see [`Inventory::segment`]) so a target
//! `c` never matches the first half of `ch`.
//!
//! ## Non-overlap policy
//!
//! Targets are found left to right; after a match at `[i, i+len)` scanning
//! resumes at `i+len`. Overlapping occurrences are therefore not reported.

use super::classify::{Classification, ExampleType, Verdict};
use super::matcher_cache::MatcherCache;
use super::rule::{Environment, Replacement, Rule, Target};
use crate::{Inventory, SoundSet, Span};
use std::collections::HashMap;
use std::rc::Rc;
use tracing::trace;

#[derive(Debug, Clone)]
struct Memo {
    classification: Classification,
    /// Spans whose rewrite changes the word, ascending and unique.
    cadt_spans: Vec<Span>,
}

#[derive(Debug)]
pub struct Evaluator<'a> {
    rule: &'a Rule,
    inventory: &'a Inventory,
    /// Sounds environments and targets are expanded over (`None` = all).
    phonemes: Option<SoundSet>,
    matchers: MatcherCache,
    memo: HashMap<String, Memo>,
}

impl<'a> Evaluator<'a> {
    pub fn new(rule: &'a Rule, inventory: &'a Inventory, phonemes: Option<SoundSet>) -> Self {
        Evaluator { rule, inventory, phonemes, matchers: MatcherCache::new(), memo: HashMap::new() }
    }

    pub fn rule(&self) -> &'a Rule {
        self.rule
    }

    pub fn inventory(&self) -> &'a Inventory {
        self.inventory
    }

    pub fn phonemes(&self) -> Option<&SoundSet> {
        self.phonemes.as_ref()
    }

    pub fn matchers(&self) -> &MatcherCache {
        &self.matchers
    }

    /// Number of words with a memoized classification.
    pub fn memoized(&self) -> usize {
        self.memo.len()
    }

    fn expansion(&mut self, particles: &[crate::Particle]) -> Rc<[String]> {
        self.matchers.expansion(self.inventory, particles, self.phonemes.as_ref())
    }

    // --- Targets --------------------------------------------------------------

    /// Spans of every occurrence of the rule's target in `word`.
    ///
    /// ```text
    /// A = [voiced]        "abda" -> [1..2 "b", 2..3 "d"]
    /// A = *               "ba"   -> [0..1, 1..2]
    /// A = {"ch": ..}      "chat" -> [0..2]
    /// ```
    pub fn locate_targets(&mut self, word: &str) -> Vec<Span> {
        let segments = self.inventory.segment(word);

        let rule = self.rule;
        let candidates: Rc<[String]> = match rule.target() {
            Target::Any => return segments,
            Target::Class(particles) => self.expansion(particles),
            Target::Literal(keys) => {
                let mut keys = keys.clone();
                keys.sort_by(|a, b| b.len().cmp(&a.len()));
                keys.into()
            }
        };

        scan(word, &segments, &candidates)
    }

    // --- Environments ---------------------------------------------------------

    /// Does `env` hold immediately before byte `loc`? The matched context
    /// must start on a sound boundary of `segments`.
    fn left_holds(&mut self, env: &Environment, word: &str, segments: &[Span], loc: usize) -> bool {
        match env {
            Environment::Any => true,
            Environment::Edge => loc == 0,
            Environment::Pattern { particles, anchored } => {
                let candidates = self.expansion(particles);
                candidates.iter().any(|c| {
                    c.len() <= loc
                        && (!anchored || loc == c.len())
                        && on_boundary(word, segments, loc - c.len())
                        && word.get(loc - c.len()..loc) == Some(c.as_str())
                })
            }
        }
    }

    /// Does `env` hold immediately after byte `end`? The matched context must
    /// end on a sound boundary of `segments`.
    fn right_holds(&mut self, env: &Environment, word: &str, segments: &[Span], end: usize) -> bool {
        match env {
            Environment::Any => true,
            Environment::Edge => end == word.len(),
            Environment::Pattern { particles, anchored } => {
                let candidates = self.expansion(particles);
                candidates.iter().any(|c| {
                    end + c.len() <= word.len()
                        && (!anchored || end + c.len() == word.len())
                        && on_boundary(word, segments, end + c.len())
                        && word.get(end..end + c.len()) == Some(c.as_str())
                })
            }
        }
    }

    // --- Rewriting --------------------------------------------------------------

    /// Replacement text for the target `text`, or `None` when the rule cannot
    /// rewrite it (no sound carries the respecified vector, or the literal
    /// table has no entry).
    fn rewrite_text(&self, text: &str) -> Option<String> {
        match self.rule.replacement() {
            Replacement::Delete => Some(String::new()),
            Replacement::LiteralMap(map) => map.get(text).cloned(),
            Replacement::Respecify(delta) => {
                let mut out = String::with_capacity(text.len());
                for span in self.inventory.segment(text) {
                    let sound = self.inventory.sound_by_symbol(&text[span.start..span.end])?;
                    let target = self.inventory.respecify(sound.id(), delta)?;
                    out.push_str(self.inventory.sound(target).symbol());
                }
                Some(out)
            }
        }
    }

    /// Would rewriting `span` alone change `word`?
    fn changes_word(&self, word: &str, span: Span) -> bool {
        let text = &word[span.start..span.end];
        self.rewrite_text(text).is_some_and(|replacement| replacement != text)
    }

    // --- Classification ---------------------------------------------------------

    /// Classify `word` against every environment branch.
    ///
    /// Results are memoized per word; the `CADT` spans found along the way are
    /// kept for [`Evaluator::apply`].
    pub fn classify(&mut self, word: &str) -> Classification {
        if let Some(memo) = self.memo.get(word) {
            return memo.classification.clone();
        }

        let rule = self.rule;
        let branches = rule.branches();
        let segments = self.inventory.segment(word);
        let targets = self.locate_targets(word);

        if targets.is_empty() {
            let classification = Classification::irrelevant(branches.len());
            self.memo.insert(word.to_string(), Memo { classification: classification.clone(), cadt_spans: Vec::new() });
            trace!(word, "no target, irrelevant");
            return classification;
        }

        let mut verdicts: Vec<Option<Verdict>> = vec![None; branches.len()];
        let mut cadt_spans: Vec<Span> = Vec::new();

        for &target in &targets {
            let token = &word[target.start..target.end];
            let mut changes: Option<bool> = None;

            for (idx, branch) in branches.iter().enumerate() {
                let is_c = self.left_holds(&branch.left, word, &segments, target.start);
                let is_d = self.right_holds(&branch.right, word, &segments, target.end);
                let current = verdicts[idx].as_ref().map(|v| v.kind);

                if is_c && is_d {
                    let changed = *changes.get_or_insert_with(|| self.changes_word(word, target));
                    if changed {
                        if current != Some(ExampleType::Cadt) {
                            verdicts[idx] = Some(Verdict::new(ExampleType::Cadt, token));
                        }
                        if cadt_spans.last() != Some(&target) {
                            cadt_spans.push(target);
                        }
                    } else if !current.is_some_and(ExampleType::is_conditioned) {
                        verdicts[idx] = Some(Verdict::new(ExampleType::Cadnt, token));
                    }
                } else if current.is_none() {
                    if is_c {
                        verdicts[idx] = Some(Verdict::new(ExampleType::Cand, token));
                    } else if is_d {
                        verdicts[idx] = Some(Verdict::new(ExampleType::Ncad, token));
                    }
                }
            }
        }

        let classification = Classification::new(verdicts);
        trace!(word, mask = ?classification.mask(), spans = cadt_spans.len(), "classified");
        self.memo.insert(word.to_string(), Memo { classification: classification.clone(), cadt_spans });
        classification
    }

    /// Spans `apply` would rewrite in `word`.
    pub fn cadt_spans(&mut self, word: &str) -> Vec<Span> {
        self.classify(word);
        self.memo.get(word).map(|m| m.cadt_spans.clone()).unwrap_or_default()
    }

    /// Apply the rule to `word`, producing its surface form.
    ///
    /// Every `CADT` span is rewritten left to right; later spans are shifted by
    /// the length change of earlier replacements. Words without `CADT` spans
    /// come back unchanged.
    pub fn apply(&mut self, word: &str) -> String {
        let spans = self.cadt_spans(word);
        if spans.is_empty() {
            return word.to_string();
        }

        let mut out = word.to_string();
        let mut shift: isize = 0;

        for span in spans {
            let start = (span.start as isize + shift) as usize;
            let end = (span.end as isize + shift) as usize;
            if let Some(replacement) = self.rewrite_text(&out[start..end]) {
                shift += replacement.len() as isize - span.len() as isize;
                out.replace_range(start..end, &replacement);
            }
        }

        out
    }
}

/// Left-to-right scan for `candidates` (longest first) at segment starts.
/// A match must also end on a segment boundary.
fn scan(word: &str, segments: &[Span], candidates: &[String]) -> Vec<Span> {
    let mut found = Vec::new();
    let mut idx = 0;

    while idx < segments.len() {
        let start = segments[idx].start;
        let rest = &word[start..];
        let hit = candidates
            .iter()
            .find(|c| !c.is_empty() && rest.starts_with(c.as_str()) && on_boundary(word, segments, start + c.len()));

        match hit {
            Some(c) => {
                let end = start + c.len();
                found.push(Span::new(start, end));
                while idx < segments.len() && segments[idx].start < end {
                    idx += 1;
                }
            }
            None => idx += 1,
        }
    }

    found
}

/// Is byte `pos` a sound boundary of `word` (including both word edges)?
fn on_boundary(word: &str, segments: &[Span], pos: usize) -> bool {
    pos == 0 || pos == word.len() || segments.iter().any(|s| s.start == pos)
}
