use super::buckets::{Buckets, IRR_KEY, draw};
use super::gloss::GlossPool;
use super::options::Options;
use super::quota::{Amount, CategoryCounts};
use crate::engine::{Evaluator, ExampleType, Rule, Target};
use crate::error::EngineError;
use crate::{Inventory, SoundSet, Template};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::collections::HashSet;
use tracing::{debug, info, warn};

/// A generated word with its gloss.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Example {
    pub word: String,
    pub gloss: Option<String>,
}

/// Requested vs delivered counts for one environment branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BranchAmounts {
    pub requested: CategoryCounts,
    pub delivered: CategoryCounts,
}

/// A category that could not meet its quota, even after pool expansion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shortage {
    pub branch: usize,
    pub kind: ExampleType,
    pub requested: usize,
    pub delivered: usize,
}

/// Result of one [`Generator::generate`] call.
///
/// `underlying[i]`, `surface[i]` and `categories[i]` describe the same word.
/// Words are ordered by category (`CADT` first, `IRR` last).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Generation {
    pub underlying: Vec<Example>,
    pub surface: Vec<Example>,
    /// Category each word was drawn for.
    pub categories: Vec<ExampleType>,
    pub amounts: Vec<BranchAmounts>,
    pub shortages: Vec<Shortage>,
    /// Words still missing after every category (and backfill) ran dry.
    pub missing: usize,
}

impl Generation {
    pub fn requested(&self) -> CategoryCounts {
        self.amounts.iter().fold(CategoryCounts::default(), |mut acc, a| {
            acc += a.requested;
            acc
        })
    }

    pub fn delivered(&self) -> CategoryCounts {
        self.amounts.iter().fold(CategoryCounts::default(), |mut acc, a| {
            acc += a.delivered;
            acc
        })
    }

    pub fn is_complete(&self) -> bool {
        self.missing == 0 && self.shortages.is_empty()
    }

    /// `(underlying, surface)` pairs in output order.
    pub fn pairs(&self) -> impl Iterator<Item = (&Example, &Example)> {
        self.underlying.iter().zip(&self.surface)
    }
}

/// Quota-driven example generator for one rule.
///
/// Construction samples the candidate pools and files every word into
/// per-branch category buckets. Each [`generate`](Generator::generate) call
/// then draws from the buckets, expanding the pools when a category runs
/// short. Words returned by earlier calls are excluded until a call asks for
/// a `fresh` start.
#[derive(Debug)]
pub struct Generator<'a> {
    inventory: &'a Inventory,
    phonemes: SoundSet,
    /// Sound sequences that spell a target; related words contain one.
    anchors: Vec<Vec<SoundSet>>,
    /// Sounds that cannot begin a target occurrence.
    irrelevant_sounds: SoundSet,
    templates: Vec<Template>,
    evaluator: Evaluator<'a>,
    difficulty: u8,
    options: Options,
    rng: StdRng,
    pub(super) buckets: Vec<Buckets>,
    /// Every word ever drawn into a pool.
    pooled: HashSet<String>,
    /// Words returned by earlier calls.
    excluded: HashSet<String>,
}

impl<'a> Generator<'a> {
    pub fn new(
        inventory: &'a Inventory,
        phonemes: SoundSet,
        templates: Vec<Template>,
        rule: &'a Rule,
        difficulty: u8,
        options: Options,
    ) -> Result<Self, EngineError> {
        options.validate()?;
        options.difficulty.shares(difficulty)?;

        let rng = match options.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let anchors = target_anchors(inventory, &phonemes, rule);
        let irrelevant_sounds = irrelevant_sounds(inventory, &phonemes, rule);

        let mut generator = Generator {
            inventory,
            evaluator: Evaluator::new(rule, inventory, Some(phonemes.clone())),
            phonemes,
            anchors,
            irrelevant_sounds,
            templates,
            difficulty,
            buckets: vec![Buckets::default(); rule.branches().len()],
            options,
            rng,
            pooled: HashSet::new(),
            excluded: HashSet::new(),
        };

        let added = generator.build_pool()?;
        debug!(
            rule = %rule,
            templates = generator.templates.len(),
            words = added,
            irrelevant_sounds = ?inventory.symbols(&generator.irrelevant_sounds),
            "candidate pools built"
        );
        Ok(generator)
    }

    // --- Accessors ------------------------------------------------------------

    pub fn difficulty(&self) -> u8 {
        self.difficulty
    }

    pub fn set_difficulty(&mut self, level: u8) -> Result<(), EngineError> {
        self.options.difficulty.shares(level)?;
        self.difficulty = level;
        Ok(())
    }

    pub fn templates(&self) -> &[Template] {
        &self.templates
    }

    pub fn rule(&self) -> &'a Rule {
        self.evaluator.rule()
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    pub fn phonemes(&self) -> &SoundSet {
        &self.phonemes
    }

    /// Distinct candidates per category for `branch`.
    pub fn bucket_sizes(&self, branch: usize) -> Option<CategoryCounts> {
        let buckets = self.buckets.get(branch)?;
        let mut counts = CategoryCounts::default();
        for kind in ExampleType::ALL {
            counts[kind] = buckets.len(kind);
        }
        Some(counts)
    }

    /// Number of words barred from the next non-fresh call.
    pub fn excluded(&self) -> usize {
        self.excluded.len()
    }

    // --- Pools ----------------------------------------------------------------

    /// Sample every template once more and file the new words. Returns how
    /// many words were new.
    fn build_pool(&mut self) -> Result<usize, EngineError> {
        let (related_budget, irrelevant_budget) = self.options.pool_split();
        let mut added = 0;

        for template in &self.templates {
            let mut related = Vec::new();
            if !self.anchors.is_empty() {
                let per_anchor = related_budget.div_ceil(self.anchors.len());
                for anchor in &self.anchors {
                    related.extend(template.sample_anchored(
                        self.inventory,
                        per_anchor,
                        Some(&self.phonemes),
                        anchor,
                        &mut self.rng,
                    ));
                }
            }
            for word in related {
                if self.pooled.contains(&word) {
                    continue;
                }
                let classification = self.evaluator.classify(&word);
                if classification.is_irrelevant() {
                    return Err(EngineError::RelatedWordIrrelevant { word });
                }
                for (branch, verdict) in classification.branches().iter().enumerate() {
                    if let Some(verdict) = verdict {
                        self.buckets[branch].add(verdict.kind, &verdict.token, &word);
                    }
                }
                self.pooled.insert(word);
                added += 1;
            }

            if self.irrelevant_sounds.is_empty() || irrelevant_budget == 0 {
                continue;
            }
            let irrelevant =
                template.sample(self.inventory, irrelevant_budget, Some(&self.irrelevant_sounds), &mut self.rng);
            for word in irrelevant {
                if self.pooled.contains(&word) {
                    continue;
                }
                // Multi-character symbols can still spell a target.
                if !self.evaluator.classify(&word).is_irrelevant() {
                    debug!(word, "irrelevant pool word contains a target, skipped");
                    continue;
                }
                for buckets in &mut self.buckets {
                    buckets.add(ExampleType::Irr, IRR_KEY, &word);
                }
                self.pooled.insert(word);
                added += 1;
            }
        }

        Ok(added)
    }

    // --- Sampling -------------------------------------------------------------

    fn take(&mut self, branch: usize, kind: ExampleType, quota: usize, chosen: &HashSet<String>) -> Vec<String> {
        let excluded = &self.excluded;
        draw(
            self.buckets[branch].category(kind),
            quota,
            |word| excluded.contains(word) || chosen.contains(word),
            self.options.stall_rounds,
            &mut self.rng,
        )
    }

    /// Draw `amount` examples.
    ///
    /// With `fresh` the cross-call exclusion set is cleared first. Scarcity is
    /// reported through [`Generation::shortages`] and
    /// [`Generation::missing`] (and `warn!` events); it never fails the call.
    pub fn generate(&mut self, amount: Amount, fresh: bool, glosses: &GlossPool) -> Result<Generation, EngineError> {
        if fresh {
            self.excluded.clear();
        }

        let shares = self.options.difficulty.shares(self.difficulty)?;
        let requested = amount.per_branch(self.buckets.len(), shares);
        let requested_total: usize = requested.iter().map(CategoryCounts::total).sum();

        let mut amounts: Vec<BranchAmounts> =
            requested.iter().map(|&r| BranchAmounts { requested: r, delivered: CategoryCounts::default() }).collect();
        let mut shortages = Vec::new();
        let mut chosen: HashSet<String> = HashSet::new();
        let mut picks: Vec<(ExampleType, usize, String)> = Vec::new();
        let mut expansions = 0;
        let mut exhausted = false;

        for (branch, wanted) in requested.iter().enumerate() {
            for kind in ExampleType::ALL {
                let want = wanted[kind];
                if want == 0 {
                    continue;
                }

                let mut got = self.take(branch, kind, want, &chosen);
                chosen.extend(got.iter().cloned());

                while got.len() < want && !exhausted && expansions < self.options.max_expansions {
                    warn!(branch, category = %kind, requested = want, available = got.len(), "not enough candidates, expanding pool");
                    expansions += 1;
                    let added = self.build_pool()?;
                    debug!(expansion = expansions, added, "pool expanded");
                    if added == 0 {
                        exhausted = true;
                        break;
                    }
                    let more = self.take(branch, kind, want - got.len(), &chosen);
                    chosen.extend(more.iter().cloned());
                    got.extend(more);
                }

                if got.len() < want {
                    warn!(branch, category = %kind, requested = want, delivered = got.len(), "category short");
                    shortages.push(Shortage { branch, kind, requested: want, delivered: got.len() });
                }

                amounts[branch].delivered[kind] = got.len();
                picks.extend(got.into_iter().map(|word| (kind, branch, word)));
            }
        }

        if self.options.backfill && picks.len() < requested_total {
            'fill: for branch in 0..self.buckets.len() {
                for kind in ExampleType::ALL {
                    let need = requested_total - picks.len();
                    if need == 0 {
                        break 'fill;
                    }
                    let extra = self.take(branch, kind, need, &chosen);
                    if !extra.is_empty() {
                        debug!(branch, category = %kind, count = extra.len(), "backfilled");
                    }
                    chosen.extend(extra.iter().cloned());
                    amounts[branch].delivered[kind] += extra.len();
                    picks.extend(extra.into_iter().map(|word| (kind, branch, word)));
                }
            }
        }

        let missing = requested_total.saturating_sub(picks.len());
        if missing > 0 {
            warn!(missing, requested = requested_total, "no candidates left in any category");
        }

        picks.sort_by_key(|(kind, branch, _)| (*kind, *branch));
        self.excluded.extend(chosen);

        let glosses = glosses.draw(picks.len(), &mut self.rng);
        let mut generation = Generation { amounts, shortages, missing, ..Generation::default() };
        for ((kind, _, word), gloss) in picks.into_iter().zip(glosses) {
            let surface = self.evaluator.apply(&word);
            generation.surface.push(Example { word: surface, gloss: gloss.clone() });
            generation.underlying.push(Example { word, gloss });
            generation.categories.push(kind);
        }

        info!(
            requested = requested_total,
            delivered = generation.underlying.len(),
            missing,
            shortages = generation.shortages.len(),
            "generation finished"
        );
        Ok(generation)
    }
}

/// Sound sequences that spell the rule's target.
///
/// A class target gives one anchor with the matching sounds per position. A
/// literal target gives one anchor per key that segments into phonemes. An
/// unconstrained target gives a single empty anchor, since every sound is a
/// target.
pub(super) fn target_anchors(inventory: &Inventory, phonemes: &SoundSet, rule: &Rule) -> Vec<Vec<SoundSet>> {
    match rule.target() {
        Target::Any => vec![Vec::new()],
        Target::Class(particles) => {
            vec![particles.iter().map(|p| inventory.matching_sounds(p, Some(phonemes))).collect()]
        }
        Target::Literal(keys) => keys
            .iter()
            .filter_map(|key| {
                inventory
                    .segment(key)
                    .into_iter()
                    .map(|span| {
                        let sound = inventory.sound_by_symbol(&key[span.start..span.end])?;
                        phonemes.contains(&sound.id()).then(|| SoundSet::from([sound.id()]))
                    })
                    .collect::<Option<Vec<SoundSet>>>()
            })
            .filter(|anchor| !anchor.is_empty())
            .collect(),
    }
}

/// Sounds that cannot start an occurrence of the rule's target.
///
/// An unconstrained target starts at every sound, so the set is empty.
pub(super) fn irrelevant_sounds(inventory: &Inventory, phonemes: &SoundSet, rule: &Rule) -> SoundSet {
    match rule.target() {
        Target::Any => SoundSet::new(),
        Target::Class(particles) => match particles.first() {
            Some(first) => {
                let starters = inventory.matching_sounds(first, Some(phonemes));
                phonemes.difference(&starters).copied().collect()
            }
            None => SoundSet::new(),
        },
        Target::Literal(keys) => phonemes
            .iter()
            .copied()
            .filter(|&id| {
                let symbol = inventory.sound(id).symbol();
                !keys.iter().any(|key| key.contains(symbol))
            })
            .collect(),
    }
}
