//! Per-category quotas.
//!
//! ```text
//! Amount::Total(20), 2 branches, shares (.4 .1 .2 .2 | .1)
//!   split        -> [10, 10]          (remainder goes to the last branch)
//!   per branch   -> CADT 4, CADNT 1, CAND 2, NCAD 2, IRR 1
//! ```
//!
//! Rounding can overshoot the amount; the excess is trimmed from `IRR` first,
//! then `NCAD`, `CAND`, `CADNT` and `CADT`. A shortfall goes to `IRR`.

use crate::engine::ExampleType;
use std::fmt;
use std::ops::{Index, IndexMut};

/// One count per [`ExampleType`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CategoryCounts([usize; 5]);

impl CategoryCounts {
    pub fn new(cadt: usize, cadnt: usize, cand: usize, ncad: usize, irr: usize) -> Self {
        CategoryCounts([cadt, cadnt, cand, ncad, irr])
    }

    pub fn total(&self) -> usize {
        self.0.iter().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ExampleType, usize)> + '_ {
        ExampleType::ALL.iter().map(|&kind| (kind, self[kind]))
    }

    pub fn as_array(&self) -> [usize; 5] {
        self.0
    }
}

impl Index<ExampleType> for CategoryCounts {
    type Output = usize;

    fn index(&self, kind: ExampleType) -> &usize {
        &self.0[kind.index()]
    }
}

impl IndexMut<ExampleType> for CategoryCounts {
    fn index_mut(&mut self, kind: ExampleType) -> &mut usize {
        &mut self.0[kind.index()]
    }
}

impl std::ops::AddAssign for CategoryCounts {
    fn add_assign(&mut self, other: CategoryCounts) {
        for (mine, theirs) in self.0.iter_mut().zip(other.0) {
            *mine += theirs;
        }
    }
}

impl fmt::Display for CategoryCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (kind, count)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{}={}", kind, count)?;
        }
        Ok(())
    }
}

/// How many words a `generate` call asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Amount {
    /// A total, distributed by the difficulty table.
    Total(usize),
    /// Explicit counts per category, bypassing the difficulty table.
    PerCategory(CategoryCounts),
}

impl Amount {
    /// Requested counts for each of `branches` environment branches.
    pub(crate) fn per_branch(&self, branches: usize, shares: [f64; 5]) -> Vec<CategoryCounts> {
        match *self {
            Amount::Total(total) => {
                split_evenly(total, branches).into_iter().map(|amount| quota(amount, shares)).collect()
            }
            Amount::PerCategory(counts) => {
                let mut out = vec![CategoryCounts::default(); branches];
                for (kind, count) in counts.iter() {
                    for (branch, part) in split_evenly(count, branches).into_iter().enumerate() {
                        out[branch][kind] = part;
                    }
                }
                out
            }
        }
    }
}

/// `total` split into `parts` near-equal parts, remainder on the last.
pub(crate) fn split_evenly(total: usize, parts: usize) -> Vec<usize> {
    if parts == 0 {
        return Vec::new();
    }
    let base = total / parts;
    let mut out = vec![base; parts];
    if let Some(last) = out.last_mut() {
        *last += total - base * parts;
    }
    out
}

/// Category counts for `amount` words given the five shares.
pub(crate) fn quota(amount: usize, shares: [f64; 5]) -> CategoryCounts {
    let mut counts = CategoryCounts::default();
    for (kind, share) in ExampleType::ALL.iter().zip(shares) {
        counts[*kind] = ((amount as f64) * share).round() as usize;
    }

    let mut excess = counts.total().saturating_sub(amount);
    for kind in ExampleType::ALL.iter().rev() {
        let cut = excess.min(counts[*kind]);
        counts[*kind] -= cut;
        excess -= cut;
    }

    let short = amount.saturating_sub(counts.total());
    counts[ExampleType::Irr] += short;
    counts
}
