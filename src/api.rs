use crate::error::Error;
use crate::{
    Generator, GlossPool, Inventory, Options, Rule, SoundSet, Template, read_feature_table, read_glosses,
    read_phonemes, read_rules, read_templates,
};
use std::path::PathBuf;
use tracing::info;

/// Input file locations.
///
/// `glosses` is optional; without it every example carries `None` as gloss.
#[derive(Debug, Clone, Default)]
pub struct Sources {
    pub features: PathBuf,
    pub rules: PathBuf,
    pub templates: PathBuf,
    pub phonemes: PathBuf,
    pub glosses: Option<PathBuf>,
}

/// Everything needed to generate a puzzle, loaded from disk.
///
/// The inventory is loaded first; rules, templates and phonemes are resolved
/// against it.
#[derive(Debug, Clone)]
pub struct Bundle {
    pub inventory: Inventory,
    pub rules: Vec<Rule>,
    pub templates: Vec<Template>,
    pub phonemes: SoundSet,
    pub glosses: GlossPool,
}

impl Bundle {
    /// Load every input of `sources`. The first failing file aborts the load.
    ///
    /// # Example
    /// ```no_run
    /// use ruleshift::{Bundle, Sources};
    ///
    /// let sources = Sources {
    ///     features: "data/features.csv".into(),
    ///     rules: "data/rules.txt".into(),
    ///     templates: "data/templates.txt".into(),
    ///     phonemes: "data/phonemes.txt".into(),
    ///     glosses: Some("data/glosses.txt".into()),
    /// };
    /// let bundle = Bundle::load(&sources)?;
    /// println!("{}", bundle.rule(0)?);
    /// # Ok::<(), ruleshift::Error>(())
    /// ```
    pub fn load(sources: &Sources) -> Result<Bundle, Error> {
        let inventory = read_feature_table(&sources.features)?;
        let rules = read_rules(&sources.rules, &inventory)?;
        let templates = read_templates(&sources.templates, &inventory)?;
        let phonemes = read_phonemes(&sources.phonemes, &inventory)?;
        let glosses = match &sources.glosses {
            Some(path) => read_glosses(path)?,
            None => GlossPool::default(),
        };

        info!(
            sounds = inventory.len(),
            rules = rules.len(),
            templates = templates.len(),
            phonemes = phonemes.len(),
            glosses = glosses.len(),
            "inputs loaded"
        );
        Ok(Bundle { inventory, rules, templates, phonemes, glosses })
    }

    pub fn rule(&self, index: usize) -> Result<&Rule, Error> {
        self.rules.get(index).ok_or(Error::NoSuchRule { index, count: self.rules.len() })
    }

    /// A generator for rule `index` over the bundle's templates and phonemes.
    pub fn generator(&self, index: usize, difficulty: u8, options: Options) -> Result<Generator<'_>, Error> {
        let rule = self.rule(index)?;
        let generator =
            Generator::new(&self.inventory, self.phonemes.clone(), self.templates.clone(), rule, difficulty, options)?;
        Ok(generator)
    }
}
