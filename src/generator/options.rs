use crate::error::EngineError;
use once_cell::sync::Lazy;
use std::collections::BTreeMap;

/// Highest difficulty level.
pub const MAX_DIFFICULTY: u8 = 10;

/// Tolerance when checking that shares sum to at most 1.
const SHARE_EPSILON: f64 = 1e-9;

/// Share of each category per difficulty level, in `ExampleType::ALL` order
/// without `IRR` (which receives the remainder).
///
/// Harder levels trade clear `CADT` examples for near misses.
static DEFAULT_DIFFICULTY: Lazy<DifficultyTable> = Lazy::new(|| {
    let rows: [(u8, [f64; 4]); 11] = [
        (0, [0.60, 0.05, 0.10, 0.10]),
        (1, [0.56, 0.06, 0.11, 0.11]),
        (2, [0.52, 0.06, 0.12, 0.12]),
        (3, [0.48, 0.07, 0.13, 0.13]),
        (4, [0.44, 0.07, 0.15, 0.15]),
        (5, [0.40, 0.10, 0.20, 0.20]),
        (6, [0.36, 0.10, 0.21, 0.21]),
        (7, [0.32, 0.11, 0.22, 0.22]),
        (8, [0.28, 0.12, 0.23, 0.23]),
        (9, [0.24, 0.13, 0.24, 0.24]),
        (10, [0.20, 0.14, 0.25, 0.25]),
    ];
    DifficultyTable { levels: rows.into_iter().collect() }
});

/// Difficulty level -> category shares.
#[derive(Debug, Clone, PartialEq)]
pub struct DifficultyTable {
    levels: BTreeMap<u8, [f64; 4]>,
}

impl Default for DifficultyTable {
    fn default() -> Self {
        DEFAULT_DIFFICULTY.clone()
    }
}

impl DifficultyTable {
    /// A table with no levels.
    pub fn empty() -> Self {
        DifficultyTable { levels: BTreeMap::new() }
    }

    /// Set the `(CADT, CADNT, CAND, NCAD)` shares of `level`.
    pub fn set(&mut self, level: u8, shares: [f64; 4]) -> Result<(), EngineError> {
        if level > MAX_DIFFICULTY {
            return Err(EngineError::UnknownDifficulty(level));
        }
        let sum: f64 = shares.iter().sum();
        if shares.iter().any(|s| !s.is_finite() || *s < 0.0) || sum > 1.0 + SHARE_EPSILON {
            return Err(EngineError::InvalidShares { level, sum });
        }
        self.levels.insert(level, shares);
        Ok(())
    }

    /// All five shares of `level`, `IRR` last.
    pub fn shares(&self, level: u8) -> Result<[f64; 5], EngineError> {
        let [cadt, cadnt, cand, ncad] = *self.levels.get(&level).ok_or(EngineError::UnknownDifficulty(level))?;
        let irr = (1.0 - (cadt + cadnt + cand + ncad)).max(0.0);
        Ok([cadt, cadnt, cand, ncad, irr])
    }

    pub fn levels(&self) -> impl Iterator<Item = u8> + '_ {
        self.levels.keys().copied()
    }

    pub fn contains(&self, level: u8) -> bool {
        self.levels.contains_key(&level)
    }
}

/// Generator configuration.
///
/// ```text
/// pool_size        words sampled per template per pool build
///   ├── related_share * pool_size   around a target occurrence
///   └── remainder                   from sounds that cannot start a target
/// stall_rounds     unproductive round-robin rounds before a category gives up
/// max_expansions   pool rebuilds allowed per generate() call
/// backfill         fill shortfalls from other categories' leftovers
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Options {
    /// Seed for reproducible runs; `None` seeds from the OS.
    pub seed: Option<u64>,
    pub pool_size: usize,
    pub related_share: f64,
    pub stall_rounds: usize,
    pub max_expansions: usize,
    pub backfill: bool,
    pub difficulty: DifficultyTable,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            seed: None,
            pool_size: 1000,
            related_share: 0.8,
            stall_rounds: 10,
            max_expansions: 3,
            backfill: false,
            difficulty: DifficultyTable::default(),
        }
    }
}

impl Options {
    pub(crate) fn validate(&self) -> Result<(), EngineError> {
        if !(0.0..=1.0).contains(&self.related_share) {
            return Err(EngineError::InvalidPoolSplit(self.related_share));
        }
        Ok(())
    }

    /// `(related, irrelevant)` draw budgets per template.
    pub(crate) fn pool_split(&self) -> (usize, usize) {
        let related = ((self.pool_size as f64) * self.related_share).round() as usize;
        let related = related.min(self.pool_size);
        (related, self.pool_size - related)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_table_covers_every_level() {
        let table = DifficultyTable::default();
        assert_eq!(table.levels().collect::<Vec<_>>(), (0..=MAX_DIFFICULTY).collect::<Vec<_>>());

        for level in 0..=MAX_DIFFICULTY {
            let shares = table.shares(level).unwrap();
            let sum: f64 = shares.iter().sum();
            assert!((sum - 1.0).abs() < 1e-9, "level {level} sums to {sum}");
        }

        let mid = table.shares(5).unwrap();
        assert_eq!(&mid[..4], &[0.4, 0.1, 0.2, 0.2]);
        assert!((mid[4] - 0.1).abs() < 1e-9);
    }

    #[test]
    fn table_rejects_bad_rows() {
        let mut table = DifficultyTable::empty();
        assert_eq!(table.shares(3), Err(EngineError::UnknownDifficulty(3)));
        assert_eq!(table.set(11, [0.1; 4]), Err(EngineError::UnknownDifficulty(11)));
        assert!(matches!(table.set(2, [0.5, 0.5, 0.1, 0.0]), Err(EngineError::InvalidShares { level: 2, .. })));
        assert!(matches!(table.set(2, [-0.1, 0.5, 0.1, 0.0]), Err(EngineError::InvalidShares { .. })));

        table.set(2, [0.5, 0.5, 0.0, 0.0]).unwrap();
        assert_eq!(table.shares(2).unwrap()[4], 0.0);
    }

    #[test]
    fn pool_split_follows_related_share() {
        let options = Options { pool_size: 10, related_share: 0.75, ..Options::default() };
        assert_eq!(options.pool_split(), (8, 2));
        assert!(options.validate().is_ok());

        let bad = Options { related_share: 1.5, ..Options::default() };
        assert_eq!(bad.validate(), Err(EngineError::InvalidPoolSplit(1.5)));
    }
}
