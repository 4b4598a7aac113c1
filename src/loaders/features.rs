use super::read_file;
use crate::error::LoadError;
use crate::{FeatureType, FeatureValue, Inventory};
use std::path::Path;
use tracing::debug;

const HEADER_MARKER: &str = "[TL]";

/// Parse a feature table.
///
/// The header row starts with `[TL]` and lists the axis names up to the first
/// empty cell. Each data row names a symbol followed by one value per axis;
/// trailing empty cells are ignored and rows with an empty first cell are
/// skipped. A leading byte-order mark is tolerated.
pub fn load_feature_table(text: &str) -> Result<Inventory, LoadError> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut inventory: Option<Inventory> = None;

    for (idx, raw) in text.lines().enumerate() {
        let line = idx + 1;
        let cells: Vec<&str> = raw.split(',').map(str::trim).collect();
        let Some((&first, rest)) = cells.split_first() else { continue };

        if first.is_empty() {
            continue;
        }

        if first == HEADER_MARKER {
            if inventory.is_some() {
                return Err(LoadError::DuplicateHeader { line });
            }
            let axes = rest.iter().take_while(|c| !c.is_empty()).map(|c| FeatureType::new(*c)).collect();
            inventory = Some(Inventory::with_axes(axes));
            continue;
        }

        let Some(inv) = inventory.as_mut() else {
            return Err(LoadError::MissingHeader { line });
        };

        let width = rest.iter().rposition(|c| !c.is_empty()).map_or(0, |last| last + 1);
        let filled = rest[..width].iter().filter(|c| !c.is_empty()).count();
        if filled != width {
            return Err(LoadError::MisalignedRow {
                line,
                symbol: first.to_string(),
                expected: inv.axes().len(),
                found: filled,
            });
        }
        let values = rest[..width].iter().map(|c| FeatureValue::new(*c)).collect();
        inv.insert(line, first, values)?;
    }

    let inventory = inventory.ok_or(LoadError::MissingHeader { line: 1 })?;
    debug!(axes = inventory.axes().len(), sounds = inventory.len(), "feature table loaded");
    Ok(inventory)
}

pub fn read_feature_table(path: impl AsRef<Path>) -> Result<Inventory, LoadError> {
    load_feature_table(&read_file(path.as_ref())?)
}
