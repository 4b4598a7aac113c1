use super::{SectionError, content_lines, parse_particles, read_file};
use crate::engine::{EDGE_SYMBOL, Environment, Replacement, Rule, Target};
use crate::error::LoadError;
use crate::{Inventory, Particle};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::debug;

/// Prefix of a rule line whose `A>B` part is a literal table.
pub const PREDEFINED_MARKER: &str = "<<PREDEFINED>>";

/// Parse one rule per non-blank line.
///
/// ```text
/// [voiced]>[voiceless]/#_&_[voiceless]
/// [vowel]>/[consonant]_#                  (empty B deletes)
/// >[voiced]/[nasal]_                      (empty A is any segment)
/// <<PREDEFINED>>{ch:t, 'sh':"s"}/_[vowel]
/// ```
pub fn load_rules(text: &str, inventory: &Inventory) -> Result<Vec<Rule>, LoadError> {
    let mut rules = Vec::new();
    for (line, raw) in content_lines(text) {
        let rule = RuleLine { line, text: raw, inventory }.parse()?;
        debug!(line, rule = %rule, "rule loaded");
        rules.push(rule);
    }
    Ok(rules)
}

pub fn read_rules(path: impl AsRef<Path>, inventory: &Inventory) -> Result<Vec<Rule>, LoadError> {
    load_rules(&read_file(path.as_ref())?, inventory)
}

struct RuleLine<'a> {
    line: usize,
    text: &'a str,
    inventory: &'a Inventory,
}

impl RuleLine<'_> {
    fn malformed(&self, reason: impl Into<String>) -> LoadError {
        LoadError::MalformedRule { line: self.line, text: self.text.to_string(), reason: reason.into() }
    }

    fn section_error(&self, err: SectionError) -> LoadError {
        match err {
            SectionError::Malformed(reason) => self.malformed(reason),
            SectionError::UnknownFeature(feature) => LoadError::UnknownFeature { line: self.line, feature },
        }
    }

    fn particles(&self, section: &str) -> Result<Vec<Particle>, LoadError> {
        parse_particles(section.trim(), self.inventory).map_err(|e| self.section_error(e))
    }

    fn parse(&self) -> Result<Rule, LoadError> {
        let (predefined, body) = match self.text.strip_prefix(PREDEFINED_MARKER) {
            Some(rest) => (true, rest.trim_start()),
            None => (false, self.text),
        };

        let mut parts = body.split('/');
        let (Some(action), Some(environments), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(self.malformed("expected exactly one '/'"));
        };

        let (lefts, rights) = self.environments(environments)?;

        let (target, replacement) = if predefined {
            let map = self.literal_map(action.trim())?;
            let keys = map.keys().cloned().collect();
            (Target::Literal(keys), Replacement::LiteralMap(map))
        } else {
            self.action(action)?
        };

        Rule::from_sides(target, replacement, lefts, rights).map_err(|e| self.malformed(e.to_string()))
    }

    // --- A>B ----------------------------------------------------------------

    fn action(&self, action: &str) -> Result<(Target, Replacement), LoadError> {
        let mut parts = action.split('>');
        let (Some(a), Some(b), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(self.malformed("expected exactly one '>'"));
        };

        let a = self.particles(a)?;
        let target = if a.is_empty() { Target::Any } else { Target::Class(a) };

        let mut b = self.particles(b)?;
        let replacement = match b.len() {
            0 => Replacement::Delete,
            1 => Replacement::Respecify(b.remove(0)),
            _ => return Err(self.malformed("replacement must be a single bracket group")),
        };

        Ok((target, replacement))
    }

    /// `{src:dst, ...}`, quotes around either side optional.
    fn literal_map(&self, action: &str) -> Result<BTreeMap<String, String>, LoadError> {
        let Some(caps) = regex!(r"^\{(.*)\}$").captures(action) else {
            return Err(self.malformed("predefined rule needs a {src:dst, ...} table"));
        };

        let mut map = BTreeMap::new();
        for entry in caps[1].split(',').map(str::trim).filter(|e| !e.is_empty()) {
            let Some(pair) = regex!(r#"^['"]?([^'":]+)['"]?\s*:\s*['"]?([^'":]*)['"]?$"#).captures(entry) else {
                return Err(self.malformed(format!("bad table entry '{entry}'")));
            };
            map.insert(pair[1].trim().to_string(), pair[2].trim().to_string());
        }

        if map.is_empty() {
            return Err(self.malformed("predefined table is empty"));
        }
        Ok(map)
    }

    // --- C_D&C_D ------------------------------------------------------------

    fn environments(&self, text: &str) -> Result<(Vec<Environment>, Vec<Environment>), LoadError> {
        let mut lefts = Vec::new();
        let mut rights = Vec::new();

        for branch in text.split('&') {
            let mut sides = branch.trim().split('_');
            let (Some(c), Some(d), None) = (sides.next(), sides.next(), sides.next()) else {
                return Err(self.malformed(format!("environment '{branch}' needs exactly one '_'")));
            };

            let (c, c_edge) = match c.strip_prefix(EDGE_SYMBOL) {
                Some(rest) => (rest, true),
                None => (c, false),
            };
            let (d, d_edge) = match d.strip_suffix(EDGE_SYMBOL) {
                Some(rest) => (rest, true),
                None => (d, false),
            };

            lefts.push(self.environment(c, c_edge)?);
            rights.push(self.environment(d, d_edge)?);
        }

        Ok((lefts, rights))
    }

    fn environment(&self, section: &str, edge: bool) -> Result<Environment, LoadError> {
        let particles = self.particles(section)?;
        Ok(match (particles.is_empty(), edge) {
            (true, false) => Environment::Any,
            (true, true) => Environment::Edge,
            (false, anchored) => Environment::Pattern { particles, anchored },
        })
    }
}
