use super::buckets::Buckets;
use super::corpus::{irrelevant_sounds, target_anchors};
use super::*;
use crate::engine::{Evaluator, ExampleType};
use crate::test_support::{digraph_inventory, phonemes, rule, template, toy_inventory};
use crate::{EngineError, Inventory, Rule};
use std::collections::HashSet;

fn options(seed: u64) -> Options {
    Options { seed: Some(seed), pool_size: 200, ..Options::default() }
}

fn toy_generator<'a>(inv: &'a Inventory, r: &'a Rule, opts: Options) -> Generator<'a> {
    Generator::new(
        inv,
        phonemes(inv, "p b t d m a i u"),
        vec![template(inv, "[consonant]-[vowel]-[consonant]-[vowel]")],
        r,
        5,
        opts,
    )
    .unwrap()
}

fn words(generation: &Generation) -> Vec<&str> {
    generation.underlying.iter().map(|e| e.word.as_str()).collect()
}

/// Buckets with 3 CADT, 5 CADNT, 10 CAND, 10 NCAD and 10 IRR words for
/// `[voiced]>[voiceless]/#_[vowel]`.
fn scarce_buckets() -> Buckets {
    let vowels = ["a", "e", "i", "o", "u"];
    let mut buckets = Buckets::default();

    for w in ["ba", "bi", "bu"] {
        buckets.add(ExampleType::Cadt, "b", w);
    }
    for v in vowels {
        buckets.add(ExampleType::Cadnt, "m", &format!("m{v}"));
        for tail in ["", "p"] {
            buckets.add(ExampleType::Cand, "b", &format!("bp{v}{tail}"));
        }
        for c in ["b", "d"] {
            buckets.add(ExampleType::Ncad, c, &format!("a{c}{v}"));
        }
        for c in ["p", "t"] {
            buckets.add(ExampleType::Irr, "", &format!("p{v}{c}"));
        }
    }
    buckets
}

fn scarce_generator<'a>(inv: &'a Inventory, r: &'a Rule, backfill: bool) -> Generator<'a> {
    let opts = Options { seed: Some(1), pool_size: 0, backfill, ..Options::default() };
    let mut generator = Generator::new(inv, phonemes(inv, "p b t d m a e i o u"), Vec::new(), r, 5, opts).unwrap();
    generator.buckets[0] = scarce_buckets();
    generator
}

#[test]
fn scarce_category_is_reported_not_fatal() {
    let inv = toy_inventory();
    let r = rule(&inv, "[voiced]>[voiceless]/#_[vowel]");
    let mut generator = scarce_generator(&inv, &r, false);

    let out = generator.generate(Amount::Total(20), false, &GlossPool::default()).unwrap();

    assert_eq!(out.amounts[0].requested, CategoryCounts::new(8, 2, 4, 4, 2));
    assert_eq!(out.amounts[0].delivered, CategoryCounts::new(3, 2, 4, 4, 2));
    assert_eq!(out.shortages, vec![Shortage { branch: 0, kind: ExampleType::Cadt, requested: 8, delivered: 3 }]);
    assert_eq!(out.missing, 5);
    assert_eq!(out.underlying.len(), 15);

    let mut cadt: Vec<&str> = out
        .underlying
        .iter()
        .zip(&out.categories)
        .filter(|(_, kind)| **kind == ExampleType::Cadt)
        .map(|(e, _)| e.word.as_str())
        .collect();
    cadt.sort();
    assert_eq!(cadt, ["ba", "bi", "bu"]);
}

#[test]
fn backfill_covers_shortfall_from_other_categories() {
    let inv = toy_inventory();
    let r = rule(&inv, "[voiced]>[voiceless]/#_[vowel]");
    let mut generator = scarce_generator(&inv, &r, true);

    let out = generator.generate(Amount::Total(20), false, &GlossPool::default()).unwrap();

    assert_eq!(out.missing, 0);
    assert_eq!(out.underlying.len(), 20);
    // CADT and the remaining CADNT words run out before CAND fills the rest.
    assert_eq!(out.amounts[0].delivered, CategoryCounts::new(3, 5, 6, 4, 2));
    assert_eq!(out.shortages.len(), 1);
}

#[test]
fn generation_is_consistent_with_the_rule() {
    let inv = toy_inventory();
    let r = rule(&inv, "[voiced]>[voiceless]/#_");
    let mut generator = toy_generator(&inv, &r, options(42));
    let glosses = GlossPool::new(vec![vec!["water".into()], vec!["fire".into(), "flame".into()]]);

    let out = generator.generate(Amount::Total(20), false, &glosses).unwrap();
    let mut eval = Evaluator::new(&r, &inv, Some(phonemes(&inv, "p b t d m a i u")));

    assert_eq!(out.underlying.len() + out.missing, 20);
    assert_eq!(out.underlying.len(), out.delivered().total());
    assert_eq!(out.requested().total(), 20);
    assert!(out.categories.windows(2).all(|w| w[0] <= w[1]), "output is ordered by category");

    let unique: HashSet<&str> = words(&out).into_iter().collect();
    assert_eq!(unique.len(), out.underlying.len());

    for ((under, surface), kind) in out.pairs().zip(&out.categories) {
        assert_eq!(surface.word, eval.apply(&under.word));
        assert_eq!(under.gloss, surface.gloss);
        assert!(under.gloss.is_some());
        match kind {
            ExampleType::Cadt => assert_ne!(surface.word, under.word),
            _ => assert_eq!(surface.word, under.word),
        }
        assert_eq!(eval.classify(&under.word).kind(0), Some(*kind), "{}", under.word);
    }

    // With D unconstrained every word-initial target applies, so CAND never
    // occurs.
    assert!(out.shortages.iter().any(|s| s.kind == ExampleType::Cand && s.delivered == 0));
}

#[test]
fn earlier_words_are_excluded_until_fresh() {
    let inv = toy_inventory();
    let r = rule(&inv, "[voiced]>[voiceless]/#_");
    let mut generator = toy_generator(&inv, &r, options(7));
    let none = GlossPool::default();

    let first = generator.generate(Amount::Total(15), false, &none).unwrap();
    let seen: HashSet<String> = words(&first).into_iter().map(str::to_string).collect();
    assert_eq!(generator.excluded(), seen.len());

    let second = generator.generate(Amount::Total(15), false, &none).unwrap();
    assert!(words(&second).iter().all(|w| !seen.contains(*w)));

    let third = generator.generate(Amount::Total(15), true, &none).unwrap();
    assert_eq!(generator.excluded(), third.underlying.len());
    assert!(third.underlying.iter().all(|e| e.gloss.is_none()));
}

#[test]
fn same_seed_same_output() {
    let inv = toy_inventory();
    let r = rule(&inv, "[voiced]>[voiceless]/#_&[vowel]_[vowel]");
    let none = GlossPool::default();

    let a = toy_generator(&inv, &r, options(99)).generate(Amount::Total(12), false, &none).unwrap();
    let b = toy_generator(&inv, &r, options(99)).generate(Amount::Total(12), false, &none).unwrap();

    assert_eq!(a, b);
    assert_eq!(a.amounts.len(), 2);
    assert_eq!(a.amounts[1].requested.total(), 6);
}

#[test]
fn per_category_amounts_bypass_the_table() {
    let inv = toy_inventory();
    let r = rule(&inv, "[voiced]>[voiceless]/#_");
    let mut generator = toy_generator(&inv, &r, options(3));

    let wanted = CategoryCounts::new(4, 2, 0, 3, 1);
    let out = generator.generate(Amount::PerCategory(wanted), false, &GlossPool::default()).unwrap();

    assert_eq!(out.requested(), wanted);
    assert_eq!(out.delivered(), wanted);
    assert!(out.is_complete());
}

#[test]
fn pools_bucket_words_by_token() {
    let inv = toy_inventory();
    let r = rule(&inv, "[voiced]>[voiceless]/#_");
    let generator = toy_generator(&inv, &r, options(11));

    let sizes = generator.bucket_sizes(0).unwrap();
    assert!(sizes[ExampleType::Cadt] > 0);
    assert!(sizes[ExampleType::Irr] > 0);
    assert_eq!(sizes[ExampleType::Cand], 0);

    let cadt_tokens: HashSet<&String> = generator.buckets[0].category(ExampleType::Cadt).keys().collect();
    assert!(cadt_tokens.iter().all(|t| ["b", "d"].contains(&t.as_str())));
    assert_eq!(generator.buckets[0].category(ExampleType::Irr).keys().collect::<Vec<_>>(), [""]);
    assert!(generator.bucket_sizes(1).is_none());
}

#[test]
fn irrelevant_sounds_depend_on_the_target() {
    let inv = toy_inventory();
    let set = phonemes(&inv, "p b t ch m a");

    let class = rule(&inv, "[voiced]>[voiceless]/#_");
    assert_eq!(inv.symbols(&irrelevant_sounds(&inv, &set, &class)), vec!["p", "t", "ch", "a"]);

    let literal = rule(&inv, "<<PREDEFINED>>{ch:t}/_");
    assert_eq!(inv.symbols(&irrelevant_sounds(&inv, &set, &literal)), vec!["p", "b", "t", "m", "a"]);

    let any = rule(&inv, ">/_#");
    assert!(irrelevant_sounds(&inv, &set, &any).is_empty());
}

#[test]
fn expansion_refills_a_short_category() {
    let inv = toy_inventory();
    let r = rule(&inv, "[voiced]>[voiceless]/#_");
    let wanted = Amount::PerCategory(CategoryCounts::new(6, 0, 0, 0, 0));
    let small_pool =
        |max_expansions| Options { seed: Some(3), pool_size: 4, max_expansions, ..Options::default() };

    let mut capped = toy_generator(&inv, &r, small_pool(0));
    let before = capped.bucket_sizes(0).unwrap()[ExampleType::Cadt];
    assert!(before < 6);

    let out = capped.generate(wanted, false, &GlossPool::default()).unwrap();
    assert_eq!(capped.bucket_sizes(0).unwrap()[ExampleType::Cadt], before);
    assert_eq!(out.delivered()[ExampleType::Cadt], before);
    assert_eq!(out.shortages.len(), 1);

    // Same seed, so the same initial pool.
    let mut grown = toy_generator(&inv, &r, small_pool(3));
    assert_eq!(grown.bucket_sizes(0).unwrap()[ExampleType::Cadt], before);

    let out = grown.generate(wanted, false, &GlossPool::default()).unwrap();
    let after = grown.bucket_sizes(0).unwrap()[ExampleType::Cadt];
    assert!(after > before, "{before} -> {after}");
    assert_eq!(out.delivered()[ExampleType::Cadt], after.min(6));
    assert!(out.delivered()[ExampleType::Cadt] > before);
}

#[test]
fn related_words_always_carry_a_target() {
    let inv = toy_inventory();
    let set = phonemes(&inv, "p b t ch m a");

    let class = rule(&inv, "[voiced][vowel]>[voiceless]/#_");
    let anchors = target_anchors(&inv, &set, &class);
    assert_eq!(anchors, vec![vec![phonemes(&inv, "b m"), phonemes(&inv, "a")]]);

    // Keys outside the phoneme list cannot be spelled.
    let literal = rule(&inv, "<<PREDEFINED>>{ch:t, s:z}/_");
    assert_eq!(target_anchors(&inv, &set, &literal), vec![vec![phonemes(&inv, "ch")]]);

    assert_eq!(target_anchors(&inv, &set, &rule(&inv, ">/_#")), vec![Vec::<crate::SoundSet>::new()]);
}

#[test]
fn related_word_without_target_is_fatal() {
    // "c" followed by "h" reads back as "ch", so the sampled "cha" has no "c".
    let inv = digraph_inventory();
    let r = rule(&inv, "[alveolar,stop]>/_");
    let shape = template(&inv, "[alveolar,stop]-[glottal]-[vowel]");
    let opts = Options { seed: Some(1), pool_size: 10, ..Options::default() };

    let err = Generator::new(&inv, phonemes(&inv, "c h a"), vec![shape], &r, 5, opts).unwrap_err();
    assert_eq!(err, EngineError::RelatedWordIrrelevant { word: "cha".into() });
}

#[test]
fn construction_and_difficulty_errors() {
    let inv = toy_inventory();
    let r = rule(&inv, "[voiced]>[voiceless]/#_");
    let set = phonemes(&inv, "p b a");

    let err = Generator::new(&inv, set.clone(), Vec::new(), &r, 11, Options::default()).unwrap_err();
    assert_eq!(err, EngineError::UnknownDifficulty(11));

    let bad = Options { related_share: -0.5, ..Options::default() };
    let err = Generator::new(&inv, set.clone(), Vec::new(), &r, 5, bad).unwrap_err();
    assert_eq!(err, EngineError::InvalidPoolSplit(-0.5));

    let mut generator = Generator::new(&inv, set, Vec::new(), &r, 5, options(1)).unwrap();
    assert_eq!(generator.set_difficulty(12), Err(EngineError::UnknownDifficulty(12)));
    assert_eq!(generator.difficulty(), 5);
    generator.set_difficulty(9).unwrap();
    assert_eq!(generator.difficulty(), 9);
    assert_eq!(generator.rule(), &r);
    assert!(generator.templates().is_empty());
}

#[test]
fn tiny_spaces_exhaust_without_looping() {
    let inv = toy_inventory();
    let r = rule(&inv, "[voiced]>[voiceless]/#_");
    let opts = Options { seed: Some(5), pool_size: 50, ..Options::default() };
    let mut generator =
        Generator::new(&inv, phonemes(&inv, "b p a"), vec![template(&inv, "[consonant]-[vowel]")], &r, 5, opts)
            .unwrap();

    // Only "ba" (CADT) and "pa" (IRR) exist.
    let out = generator.generate(Amount::Total(10), false, &GlossPool::default()).unwrap();
    let mut got = words(&out);
    got.sort();
    assert_eq!(got, ["ba", "pa"]);
    assert_eq!(out.missing, 8);
    assert_eq!(out.surface.iter().map(|e| e.word.as_str()).collect::<Vec<_>>(), ["pa", "pa"]);
}
