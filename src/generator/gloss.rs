use rand::Rng;
use rand::seq::SliceRandom;
use tracing::warn;

/// Gloss vocabulary: groups of interchangeable glosses, one group per
/// meaning.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GlossPool {
    groups: Vec<Vec<String>>,
}

impl GlossPool {
    /// Build a pool; empty groups are dropped.
    pub fn new(groups: Vec<Vec<String>>) -> Self {
        GlossPool { groups: groups.into_iter().filter(|g| !g.is_empty()).collect() }
    }

    pub fn groups(&self) -> &[Vec<String>] {
        &self.groups
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// One gloss for each of `count` words.
    ///
    /// Distinct groups are sampled first and one gloss is picked from each.
    /// When there are more words than groups the groups are reshuffled and
    /// reused. An empty pool yields `None` throughout.
    pub(crate) fn draw<R: Rng + ?Sized>(&self, count: usize, rng: &mut R) -> Vec<Option<String>> {
        if self.groups.is_empty() {
            return vec![None; count];
        }
        if count > self.groups.len() {
            warn!(words = count, groups = self.groups.len(), "not enough gloss groups, reusing meanings");
        }

        let mut out = Vec::with_capacity(count);
        let mut order: Vec<usize> = Vec::new();

        while out.len() < count {
            if order.is_empty() {
                order = (0..self.groups.len()).collect();
                order.shuffle(rng);
            }
            let Some(group) = order.pop() else { break };
            out.push(self.groups[group].choose(rng).cloned());
        }

        out
    }
}
