use super::rule::Rule;
use rand::Rng;
use rand::distributions::{Distribution, WeightedIndex};

/// A named, weighted group of related rules.
///
/// Families are assembled by callers that want to pick one rule out of a set
/// of variants (e.g. voicing vs devoicing of the same class). Weights are
/// relative; a family whose weights are all zero falls back to a uniform pick.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuleFamily {
    name: String,
    rules: Vec<Rule>,
    weights: Vec<f64>,
}

impl RuleFamily {
    pub fn new(name: impl Into<String>) -> Self {
        RuleFamily { name: name.into(), rules: Vec::new(), weights: Vec::new() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Add a rule. Negative or non-finite weights count as zero.
    pub fn add_rule(&mut self, rule: Rule, weight: f64) {
        let weight = if weight.is_finite() && weight > 0.0 { weight } else { 0.0 };
        self.rules.push(rule);
        self.weights.push(weight);
    }

    /// Remove and return the rule at `idx`.
    pub fn remove_rule(&mut self, idx: usize) -> Option<Rule> {
        if idx >= self.rules.len() {
            return None;
        }
        self.weights.remove(idx);
        Some(self.rules.remove(idx))
    }

    pub fn get_rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn weight(&self, idx: usize) -> Option<f64> {
        self.weights.get(idx).copied()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Pick one rule at random, proportionally to its weight.
    pub fn choose<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&Rule> {
        if self.rules.is_empty() {
            return None;
        }
        match WeightedIndex::new(&self.weights) {
            Ok(dist) => self.rules.get(dist.sample(rng)),
            Err(_) => self.rules.get(rng.gen_range(0..self.rules.len())),
        }
    }
}
