use super::*;
use crate::test_support::{TOY_FEATURES, toy_inventory};
use crate::{Environment, Replacement, Target};

#[test]
fn feature_table_loads_toy_inventory() {
    let inv = load_feature_table(TOY_FEATURES).unwrap();
    assert_eq!(inv.len(), 18);
    let axes: Vec<&str> = inv.axes().iter().map(|a| a.as_str()).collect();
    assert_eq!(axes, ["major", "voicing", "place", "manner"]);
    assert_eq!(inv.sound_by_symbol("ch").map(|s| s.features().len()), Some(4));
}

#[test]
fn feature_table_errors() {
    let cases: Vec<(&str, fn(&LoadError) -> bool)> = vec![
        ("p,consonant\n", |e| matches!(e, LoadError::MissingHeader { line: 1 })),
        ("", |e| matches!(e, LoadError::MissingHeader { .. })),
        ("[TL],a\n[TL],a\n", |e| matches!(e, LoadError::DuplicateHeader { line: 2 })),
        ("[TL],major,voicing\np,consonant\n", |e| {
            matches!(e, LoadError::MisalignedRow { line: 2, expected: 2, found: 1, .. })
        }),
        ("[TL],major,voicing\np,consonant,,voiced\n", |e| matches!(e, LoadError::MisalignedRow { line: 2, .. })),
        ("[TL],major\np,consonant\np,vowel\n", |e| matches!(e, LoadError::DuplicateSymbol { line: 3, .. })),
        ("[TL],major\np,consonant\nb,consonant\n", |e| {
            matches!(e, LoadError::DuplicateFeatureVector { line: 3, existing, .. } if existing == "p")
        }),
        ("[TL],major,voicing\np,consonant,voiced\nb,voiced,consonant\n", |e| {
            matches!(e, LoadError::AmbiguousFeatureValue { line: 3, .. })
        }),
    ];

    for (text, check) in cases {
        let err = load_feature_table(text).unwrap_err();
        assert!(check(&err), "{text:?} gave {err:?}");
    }
}

#[test]
fn rules_parse_every_section_kind() {
    let inv = toy_inventory();
    let rules = load_rules(
        "[voiced]>[voiceless]/#_&_[voiceless]\n\n[vowel]>/#[consonant]_[consonant]#\n>[voiced]/_",
        &inv,
    )
    .unwrap();
    assert_eq!(rules.len(), 3);

    let first = &rules[0];
    assert_eq!(first.target(), &Target::Class(vec![particle!["voiced"]]));
    assert_eq!(first.replacement(), &Replacement::Respecify(particle!["voiceless"]));
    assert_eq!(first.branches()[0].left, Environment::Edge);
    assert_eq!(first.branches()[0].right, Environment::Any);
    assert_eq!(
        first.branches()[1].right,
        Environment::Pattern { particles: vec![particle!["voiceless"]], anchored: false }
    );

    let second = &rules[1];
    assert_eq!(second.replacement(), &Replacement::Delete);
    assert_eq!(
        second.branches()[0].left,
        Environment::Pattern { particles: vec![particle!["consonant"]], anchored: true }
    );
    assert_eq!(
        second.branches()[0].right,
        Environment::Pattern { particles: vec![particle!["consonant"]], anchored: true }
    );

    assert_eq!(rules[2].target(), &Target::Any);
}

#[test]
fn predefined_rule_accepts_quoted_entries() {
    let inv = toy_inventory();
    let rules = load_rules("<<PREDEFINED>>{'ch': \"t\", s:z}/_#", &inv).unwrap();
    let rule = &rules[0];

    assert!(rule.is_predefined());
    assert_eq!(rule.target(), &Target::Literal(vec!["ch".to_string(), "s".to_string()]));
    let Replacement::LiteralMap(map) = rule.replacement() else { panic!("expected a literal map") };
    assert_eq!(map.get("ch").map(String::as_str), Some("t"));
}

#[test]
fn malformed_rules_fail_the_whole_load() {
    let inv = toy_inventory();
    let malformed = [
        "[voiced][voiceless]/#_",
        "[voiced]>[voiceless]>[voiced]/#_",
        "[voiced]>[voiceless]",
        "[voiced]>[voiceless]/#_/_#",
        "[voiced]>[voiceless]/#__",
        "[voiced]>[voiceless]/#",
        "[voiced]>[voiceless][stop]/#_",
        "voiced>[voiceless]/#_",
        "[voiced,]>[voiceless]/#_",
        "[voiced]>[voiceless]/_#[vowel]",
        "<<PREDEFINED>>ch:t/_",
        "<<PREDEFINED>>{}/_",
    ];

    for text in malformed {
        let input = format!("[voiced]>[voiceless]/#_\n{text}");
        match load_rules(&input, &inv) {
            Err(LoadError::MalformedRule { line: 2, .. }) => {}
            other => panic!("{text}: expected MalformedRule on line 2, got {other:?}"),
        }
    }
}

#[test]
fn unknown_features_are_reported_by_name() {
    let inv = toy_inventory();
    let err = load_rules("[voiced]>[retroflex]/#_", &inv).unwrap_err();
    assert!(matches!(err, LoadError::UnknownFeature { line: 1, ref feature } if feature == "retroflex"));

    let err = load_templates("[consonant]-[rounded]", &inv).unwrap_err();
    assert!(matches!(err, LoadError::UnknownFeature { line: 1, ref feature } if feature == "rounded"));
}

#[test]
fn templates_parse_slots() {
    let inv = toy_inventory();
    let templates = load_templates("[consonant]-[vowel]\n[consonant,voiced] - [vowel,high] - [nasal]\n", &inv).unwrap();

    assert_eq!(templates.len(), 2);
    assert_eq!(templates[1].slots(), &[particle!["consonant", "voiced"], particle!["vowel", "high"], particle!["nasal"]]);

    let err = load_templates("[consonant][vowel]", &inv).unwrap_err();
    assert!(matches!(err, LoadError::MalformedTemplate { line: 1, .. }));
    let err = load_templates("[consonant]--[vowel]", &inv).unwrap_err();
    assert!(matches!(err, LoadError::MalformedTemplate { line: 1, .. }));
}

#[test]
fn phonemes_resolve_symbols() {
    let inv = toy_inventory();
    let set = load_phonemes("p b\n  ch a\n\ni", &inv).unwrap();
    assert_eq!(inv.symbols(&set), vec!["p", "b", "ch", "a", "i"]);

    let err = load_phonemes("p\nq", &inv).unwrap_err();
    assert!(matches!(err, LoadError::UnknownSymbol { line: 2, ref symbol } if symbol == "q"));
}

#[test]
fn glosses_group_by_line() {
    let pool = load_glosses("water, river\n\nfire\n").unwrap();
    assert_eq!(pool.len(), 2);
    assert_eq!(pool.groups()[0], vec!["water".to_string(), "river".to_string()]);

    assert!(matches!(load_glosses("sun\n , ,\n"), Err(LoadError::EmptyGlossGroup { line: 2 })));
}

#[test]
fn missing_files_report_the_path() {
    let err = read_phonemes("/nonexistent/ruleshift/phonemes.txt", &toy_inventory()).unwrap_err();
    match err {
        LoadError::Io { path, .. } => assert!(path.ends_with("phonemes.txt")),
        other => panic!("expected an I/O error, got {other:?}"),
    }
}
