//! Shared fixtures for unit tests.

use crate::{Inventory, Rule, SoundSet, Template, load_feature_table, load_phonemes, load_rules, load_templates};

/// A small ASCII feature table (with a BOM and a blank row, like real exports).
pub(crate) const TOY_FEATURES: &str = "\u{feff}[TL],major,voicing,place,manner,,
p,consonant,voiceless,labial,stop,,
b,consonant,voiced,labial,stop,,
t,consonant,voiceless,coronal,stop,,
d,consonant,voiced,coronal,stop,,
k,consonant,voiceless,dorsal,stop,,
g,consonant,voiced,dorsal,stop,,
f,consonant,voiceless,labial,fricative,,
v,consonant,voiced,labial,fricative,,
s,consonant,voiceless,coronal,fricative,,
z,consonant,voiced,coronal,fricative,,
ch,consonant,voiceless,coronal,affricate,,
m,consonant,voiced,labial,nasal,,
n,consonant,voiced,coronal,nasal,,
,,,,,,
a,vowel,modal,central,low,,
e,vowel,modal,front,mid,,
i,vowel,modal,front,high,,
o,vowel,modal,back,mid,,
u,vowel,modal,back,high,,
";

/// Symbols that are prefixes (`s`, `c`) or suffixes (`h`) of longer ones.
pub(crate) const DIGRAPH_FEATURES: &str = "[TL],major,place,manner
s,consonant,alveolar,fricative
sh,consonant,postalveolar,fricative
c,consonant,alveolar,stop
h,consonant,glottal,fricative
ch,consonant,postalveolar,affricate
a,vowel,central,low
i,vowel,front,high
";

pub(crate) fn toy_inventory() -> Inventory {
    load_feature_table(TOY_FEATURES).expect("toy feature table loads")
}

pub(crate) fn digraph_inventory() -> Inventory {
    load_feature_table(DIGRAPH_FEATURES).expect("digraph feature table loads")
}

pub(crate) fn phonemes(inventory: &Inventory, symbols: &str) -> SoundSet {
    load_phonemes(symbols, inventory).expect("known phonemes")
}

pub(crate) fn rule(inventory: &Inventory, text: &str) -> Rule {
    let mut rules = load_rules(text, inventory).expect("valid rule");
    assert_eq!(rules.len(), 1);
    rules.remove(0)
}

pub(crate) fn template(inventory: &Inventory, text: &str) -> Template {
    let mut templates = load_templates(text, inventory).expect("valid template");
    assert_eq!(templates.len(), 1);
    templates.remove(0)
}
