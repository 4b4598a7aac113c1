use super::{content_lines, read_file};
use crate::error::LoadError;
use crate::{GlossPool, Inventory, SoundSet};
use std::path::Path;
use tracing::debug;

/// Resolve whitespace-separated symbols against `inventory`.
pub fn load_phonemes(text: &str, inventory: &Inventory) -> Result<SoundSet, LoadError> {
    let mut set = SoundSet::new();

    for (line, raw) in content_lines(text) {
        for symbol in raw.split_whitespace() {
            let sound = inventory
                .sound_by_symbol(symbol)
                .ok_or_else(|| LoadError::UnknownSymbol { line, symbol: symbol.to_string() })?;
            set.insert(sound.id());
        }
    }

    debug!(phonemes = set.len(), "phoneme list loaded");
    Ok(set)
}

pub fn read_phonemes(path: impl AsRef<Path>, inventory: &Inventory) -> Result<SoundSet, LoadError> {
    load_phonemes(&read_file(path.as_ref())?, inventory)
}

/// One gloss group per non-blank line; glosses inside a group are separated
/// by commas and are interchangeable translations of one meaning.
pub fn load_glosses(text: &str) -> Result<GlossPool, LoadError> {
    let mut groups = Vec::new();

    for (line, raw) in content_lines(text) {
        let group: Vec<String> =
            raw.split(',').map(str::trim).filter(|g| !g.is_empty()).map(str::to_string).collect();
        if group.is_empty() {
            return Err(LoadError::EmptyGlossGroup { line });
        }
        groups.push(group);
    }

    debug!(groups = groups.len(), "gloss list loaded");
    Ok(GlossPool::new(groups))
}

pub fn read_glosses(path: impl AsRef<Path>) -> Result<GlossPool, LoadError> {
    load_glosses(&read_file(path.as_ref())?)
}
