//! Text loaders for the five inputs.
//!
//! ```text
//! features.csv   [TL],major,voicing,...      -> Inventory
//! rules.txt      [voiced]>[voiceless]/#_     -> Vec<Rule>
//! templates.txt  [consonant]-[vowel]         -> Vec<Template>
//! phonemes.txt   p b t a i                   -> SoundSet
//! glosses.txt    water, river                -> GlossPool
//! ```
//!
//! Each `load_*` function parses text already in memory; the matching
//! `read_*` function reads a file first and reports I/O failures as
//! [`LoadError::Io`]. Loads are all-or-nothing: the first malformed line
//! fails the whole input.

#[path = "loaders/features.rs"]
mod features;
#[path = "loaders/lists.rs"]
mod lists;
#[path = "loaders/rules.rs"]
mod rules;
#[path = "loaders/templates.rs"]
mod templates;

pub use features::{load_feature_table, read_feature_table};
pub use lists::{load_glosses, load_phonemes, read_glosses, read_phonemes};
pub use rules::{PREDEFINED_MARKER, load_rules, read_rules};
pub use templates::{load_templates, read_templates};

use crate::error::LoadError;
use crate::{Inventory, Particle};
use std::path::Path;

fn read_file(path: &Path) -> Result<String, LoadError> {
    std::fs::read_to_string(path).map_err(|source| LoadError::Io { path: path.to_path_buf(), source })
}

/// Non-blank lines with their 1-based line numbers, trimmed.
fn content_lines(text: &str) -> impl Iterator<Item = (usize, &str)> {
    text.lines()
        .enumerate()
        .map(|(idx, line)| (idx + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty())
}

/// Why a bracketed section was rejected.
enum SectionError {
    Malformed(&'static str),
    UnknownFeature(String),
}

/// Parse the inside of one bracket group (`consonant,voiced`).
fn parse_particle(inner: &str, inventory: &Inventory) -> Result<Particle, SectionError> {
    let names: Vec<&str> = inner.split(',').map(str::trim).collect();
    if names.iter().any(|n| n.is_empty()) {
        return Err(SectionError::Malformed("empty feature name in bracket group"));
    }
    if let Some(unknown) = names.iter().find(|n| !inventory.has_value(n)) {
        return Err(SectionError::UnknownFeature(unknown.to_string()));
    }
    Ok(Particle::from_names(names))
}

/// Parse a concatenation of bracket groups (`[consonant][vowel,high]`).
/// An empty section yields an empty list.
fn parse_particles(section: &str, inventory: &Inventory) -> Result<Vec<Particle>, SectionError> {
    if section.is_empty() {
        return Ok(Vec::new());
    }
    if !regex!(r"^(\[[^\[\]]*\])+$").is_match(section) {
        return Err(SectionError::Malformed("expected bracketed feature lists"));
    }
    regex!(r"\[([^\[\]]*)\]")
        .captures_iter(section)
        .map(|caps| parse_particle(&caps[1], inventory))
        .collect()
}

#[cfg(test)]
#[path = "loaders/tests.rs"]
mod tests;
