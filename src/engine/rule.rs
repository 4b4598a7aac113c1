//! Rule definitions.
//!
//! A [`Rule`] is the immutable description of an SPE-style rewrite
//! `A -> B / C _ D`, possibly with several OR'd environment branches:
//!
//! ```text
//! [voiced] > [voiceless] / #_ & _[voiceless]
//!  target     replacement  branch 0  branch 1
//! ```
//!
//! Evaluation state (caches) lives in [`Evaluator`](super::Evaluator), not
//! here, so one rule can be shared by several evaluators.

use crate::error::EngineError;
use crate::Particle;
use std::collections::BTreeMap;
use std::fmt;

/// Word-edge marker in rule notation.
pub const EDGE_SYMBOL: char = '#';

/// What the rule watches for (`A`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// Any single segment.
    Any,
    /// A sequence of natural classes, one per segment.
    Class(Vec<Particle>),
    /// Literal strings (the keys of a predefined mapping).
    Literal(Vec<String>),
}

/// What happens to a matched target (`B`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Replacement {
    /// Remove the target.
    Delete,
    /// Overwrite the listed feature axes of every segment in the target.
    Respecify(Particle),
    /// Replace by table lookup on the target text.
    LiteralMap(BTreeMap<String, String>),
}

/// One side (`C` or `D`) of an environment branch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    /// Unconstrained.
    Any,
    /// Word boundary only (`#_` or `_#`).
    Edge,
    /// A particle sequence adjacent to the target. `anchored` additionally
    /// requires the sequence to touch the word edge.
    Pattern { particles: Vec<Particle>, anchored: bool },
}

/// One `C_D` alternative.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Branch {
    pub left: Environment,
    pub right: Environment,
}

impl Branch {
    pub fn new(left: Environment, right: Environment) -> Self {
        Branch { left, right }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    target: Target,
    replacement: Replacement,
    branches: Vec<Branch>,
}

impl Rule {
    pub fn new(target: Target, replacement: Replacement, branches: Vec<Branch>) -> Result<Self, EngineError> {
        if branches.is_empty() {
            return Err(EngineError::NoBranches);
        }
        Ok(Rule { target, replacement, branches })
    }

    /// Build a rule from parallel left/right environment lists.
    pub fn from_sides(
        target: Target,
        replacement: Replacement,
        lefts: Vec<Environment>,
        rights: Vec<Environment>,
    ) -> Result<Self, EngineError> {
        if lefts.len() != rights.len() {
            return Err(EngineError::BranchCountMismatch { c: lefts.len(), d: rights.len() });
        }
        let branches = lefts.into_iter().zip(rights).map(|(l, r)| Branch::new(l, r)).collect();
        Rule::new(target, replacement, branches)
    }

    /// A rule that rewrites by literal table: the table keys are the targets.
    pub fn predefined(map: BTreeMap<String, String>, branches: Vec<Branch>) -> Result<Self, EngineError> {
        let keys = map.keys().cloned().collect();
        Rule::new(Target::Literal(keys), Replacement::LiteralMap(map), branches)
    }

    pub fn target(&self) -> &Target {
        &self.target
    }

    pub fn replacement(&self) -> &Replacement {
        &self.replacement
    }

    pub fn branches(&self) -> &[Branch] {
        &self.branches
    }

    pub fn is_predefined(&self) -> bool {
        matches!(self.replacement, Replacement::LiteralMap(_))
    }
}

fn write_particles(f: &mut fmt::Formatter<'_>, particles: &[Particle]) -> fmt::Result {
    for p in particles {
        write!(f, "{}", p)?;
    }
    Ok(())
}

impl fmt::Display for Environment {
    /// Renders the left-hand form; see [`Branch`]'s impl for the right side.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Environment::Any => Ok(()),
            Environment::Edge => write!(f, "{}", EDGE_SYMBOL),
            Environment::Pattern { particles, anchored } => {
                if *anchored {
                    write!(f, "{}", EDGE_SYMBOL)?;
                }
                write_particles(f, particles)
            }
        }
    }
}

impl fmt::Display for Branch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_", self.left)?;
        match &self.right {
            Environment::Any => Ok(()),
            Environment::Edge => write!(f, "{}", EDGE_SYMBOL),
            Environment::Pattern { particles, anchored } => {
                write_particles(f, particles)?;
                if *anchored {
                    write!(f, "{}", EDGE_SYMBOL)?;
                }
                Ok(())
            }
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_predefined() {
            f.write_str("<Predefined> ")?;
        } else {
            match &self.target {
                Target::Any => f.write_str("*")?,
                Target::Class(particles) => write_particles(f, particles)?,
                Target::Literal(keys) => f.write_str(&keys.join("|"))?,
            }
            f.write_str(" -> ")?;
        }

        match &self.replacement {
            Replacement::Delete => f.write_str("Ø")?,
            Replacement::Respecify(p) => write!(f, "{}", p)?,
            Replacement::LiteralMap(map) => {
                f.write_str("{")?;
                for (i, (from, to)) in map.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{} > {}", from, to)?;
                }
                f.write_str("}")?;
            }
        }

        f.write_str(" / ")?;
        for (i, branch) in self.branches.iter().enumerate() {
            if i > 0 {
                f.write_str(" or ")?;
            }
            write!(f, "{}", branch)?;
        }
        Ok(())
    }
}
