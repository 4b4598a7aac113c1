//! Example taxonomy.
//!
//! Each word is classified once per environment branch:
//!
//! ```text
//! target found? ──no──▶ IRR (every branch)
//!      │yes
//!      ▼  per target, per branch
//!  C and D ──▶ rewrite changes word? ──yes──▶ CADT
//!      │                             └─no───▶ CADNT
//!  C only ──▶ CAND
//!  D only ──▶ NCAD
//!  neither ─▶ (nothing)
//! ```
//!
//! Precedence across the targets of one word: `CADT` > `CADNT` >
//! {`CAND`, `NCAD`}. Between `CAND` and `NCAD` the first target (left to
//! right) wins. A branch where no target sees either side of its environment
//! stays unclassified; there is no "neither" category.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ExampleType {
    /// Environment matches and the rewrite changes the word.
    Cadt,
    /// Environment matches but the rewrite is a no-op.
    Cadnt,
    /// Only the left environment matches.
    Cand,
    /// Only the right environment matches.
    Ncad,
    /// The target never occurs.
    Irr,
}

impl ExampleType {
    pub const ALL: [ExampleType; 5] =
        [ExampleType::Cadt, ExampleType::Cadnt, ExampleType::Cand, ExampleType::Ncad, ExampleType::Irr];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            ExampleType::Cadt => "CADT",
            ExampleType::Cadnt => "CADNT",
            ExampleType::Cand => "CAND",
            ExampleType::Ncad => "NCAD",
            ExampleType::Irr => "IRR",
        }
    }

    pub fn mask(self) -> ExampleMask {
        match self {
            ExampleType::Cadt => ExampleMask::CADT,
            ExampleType::Cadnt => ExampleMask::CADNT,
            ExampleType::Cand => ExampleMask::CAND,
            ExampleType::Ncad => ExampleMask::NCAD,
            ExampleType::Irr => ExampleMask::IRR,
        }
    }

    /// `CADT` and `CADNT` outrank the half-environment types.
    pub(crate) fn is_conditioned(self) -> bool {
        matches!(self, ExampleType::Cadt | ExampleType::Cadnt)
    }
}

impl fmt::Display for ExampleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

bitflags::bitflags! {
    /// Union of the categories a word received across branches.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ExampleMask: u8 {
        const CADT  = 1 << 0;
        const CADNT = 1 << 1;
        const CAND  = 1 << 2;
        const NCAD  = 1 << 3;
        const IRR   = 1 << 4;
    }
}

/// Classification of one branch, with the matched target text used as the
/// bucket key by the generator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    pub kind: ExampleType,
    pub token: String,
}

impl Verdict {
    pub fn new(kind: ExampleType, token: impl Into<String>) -> Self {
        Verdict { kind, token: token.into() }
    }

    pub fn irrelevant() -> Self {
        Verdict { kind: ExampleType::Irr, token: String::new() }
    }
}

/// Per-branch verdicts for one word.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    branches: Vec<Option<Verdict>>,
}

impl Classification {
    pub(crate) fn new(branches: Vec<Option<Verdict>>) -> Self {
        Classification { branches }
    }

    pub(crate) fn irrelevant(branch_count: usize) -> Self {
        Classification { branches: vec![Some(Verdict::irrelevant()); branch_count] }
    }

    pub fn branches(&self) -> &[Option<Verdict>] {
        &self.branches
    }

    pub fn branch(&self, idx: usize) -> Option<&Verdict> {
        self.branches.get(idx).and_then(Option::as_ref)
    }

    pub fn kind(&self, idx: usize) -> Option<ExampleType> {
        self.branch(idx).map(|v| v.kind)
    }

    /// True when the target never occurs (all branches `IRR`).
    pub fn is_irrelevant(&self) -> bool {
        self.branches.iter().all(|v| matches!(v, Some(Verdict { kind: ExampleType::Irr, .. })))
    }

    pub fn mask(&self) -> ExampleMask {
        self.branches.iter().flatten().fold(ExampleMask::empty(), |acc, v| acc | v.kind.mask())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_and_indices_follow_declaration_order() {
        let names: Vec<&str> = ExampleType::ALL.iter().map(|t| t.name()).collect();
        assert_eq!(names, ["CADT", "CADNT", "CAND", "NCAD", "IRR"]);
        for (i, t) in ExampleType::ALL.iter().enumerate() {
            assert_eq!(t.index(), i);
        }
    }

    #[test]
    fn mask_unions_branches() {
        let c = Classification::new(vec![
            Some(Verdict::new(ExampleType::Cadt, "b")),
            None,
            Some(Verdict::new(ExampleType::Ncad, "d")),
        ]);
        assert_eq!(c.mask(), ExampleMask::CADT | ExampleMask::NCAD);
        assert_eq!(c.kind(1), None);
        assert!(!c.is_irrelevant());
        assert!(Classification::irrelevant(2).is_irrelevant());
    }
}
