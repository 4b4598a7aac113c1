use super::{SectionError, content_lines, parse_particles, read_file};
use crate::error::LoadError;
use crate::{Inventory, Template};
use std::path::Path;
use tracing::debug;

/// Slot separator inside a template line.
const SLOT_DELIMITER: char = '-';

/// Parse one template per non-blank line: bracket groups joined by `-`.
pub fn load_templates(text: &str, inventory: &Inventory) -> Result<Vec<Template>, LoadError> {
    let mut templates = Vec::new();

    for (line, raw) in content_lines(text) {
        let malformed = |reason: &str| LoadError::MalformedTemplate {
            line,
            text: raw.to_string(),
            reason: reason.to_string(),
        };

        let mut slots = Vec::new();
        for slot in raw.split(SLOT_DELIMITER).map(str::trim) {
            let mut particles = parse_particles(slot, inventory).map_err(|e| match e {
                SectionError::Malformed(reason) => malformed(reason),
                SectionError::UnknownFeature(feature) => LoadError::UnknownFeature { line, feature },
            })?;
            if particles.len() != 1 {
                return Err(malformed("each slot must be exactly one bracket group"));
            }
            slots.push(particles.remove(0));
        }

        let template = Template::new(slots);
        debug!(line, template = %template, "template loaded");
        templates.push(template);
    }

    Ok(templates)
}

pub fn read_templates(path: impl AsRef<Path>, inventory: &Inventory) -> Result<Vec<Template>, LoadError> {
    load_templates(&read_file(path.as_ref())?, inventory)
}
