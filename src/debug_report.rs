use ruleshift::{ExampleType, Generation, Rule};

mod ansi {
    pub const RESET: &str = "\x1b[0m";
    pub const DIM: &str = "\x1b[2m";
    pub const BOLD: &str = "\x1b[1m";

    pub const RED: &str = "\x1b[31m";
    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const BLUE: &str = "\x1b[34m";
    pub const MAGENTA: &str = "\x1b[35m";
    pub const CYAN: &str = "\x1b[36m";
    pub const GRAY: &str = "\x1b[90m";

    pub struct Palette {
        enabled: bool,
    }

    impl Palette {
        pub fn new(enabled: bool) -> Self {
            Self { enabled }
        }

        pub fn paint(&self, s: impl AsRef<str>, color: &str) -> String {
            if self.enabled { format!("{}{}{}", color, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }

        pub fn bold(&self, s: impl AsRef<str>) -> String {
            if self.enabled { format!("{}{}{}", BOLD, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }

        pub fn dim(&self, s: impl AsRef<str>) -> String {
            if self.enabled { format!("{}{}{}", DIM, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }
    }
}

fn category_color(kind: ExampleType) -> &'static str {
    match kind {
        ExampleType::Cadt => ansi::GREEN,
        ExampleType::Cadnt => ansi::CYAN,
        ExampleType::Cand => ansi::BLUE,
        ExampleType::Ncad => ansi::MAGENTA,
        ExampleType::Irr => ansi::GRAY,
    }
}

pub fn print_run(rule: &Rule, difficulty: u8, generation: &Generation, color: bool) {
    let palette = ansi::Palette::new(color);
    println!("\n{}", palette.bold(palette.paint(format!("⚙  Rule: {rule}"), ansi::CYAN)));
    println!("{}", palette.dim(format!("   difficulty {difficulty}")));

    println!("\n{}", palette.paint("━━━ Examples ━━━", ansi::GRAY));
    if generation.underlying.is_empty() {
        println!("{}", palette.dim("  No examples generated"));
        println!("\n{}", palette.paint("Possible reasons:", ansi::YELLOW));
        println!("  • Templates cannot spell any word over the phoneme list");
        println!("  • The rule target never occurs in the templates");
    } else {
        print_examples(generation, &palette);
    }

    println!("\n{}", palette.paint("━━━ Categories ━━━", ansi::GRAY));
    print_categories(generation, &palette);

    if !generation.is_complete() {
        println!("\n{}", palette.paint("━━━ Warnings ━━━", ansi::GRAY));
        print_warnings(generation, &palette);
    }
    println!();
}

fn print_examples(generation: &Generation, palette: &ansi::Palette) {
    let width = generation.underlying.iter().map(|e| e.word.chars().count()).max().unwrap_or(0);

    for (idx, ((under, surface), kind)) in generation.pairs().zip(&generation.categories).enumerate() {
        let changed = under.word != surface.word;
        let surface_word = if changed { palette.bold(&surface.word) } else { surface.word.clone() };
        let pad = width.saturating_sub(under.word.chars().count());
        println!(
            "  {} {}{} {} {}  {} {}",
            palette.paint(format!("[{idx:>2}]"), ansi::GRAY),
            under.word,
            " ".repeat(pad),
            palette.dim("→"),
            surface_word,
            palette.paint(format!("{:<5}", kind.name()), category_color(*kind)),
            palette.dim(under.gloss.as_deref().map(|g| format!("'{g}'")).unwrap_or_default()),
        );
    }
}

fn print_categories(generation: &Generation, palette: &ansi::Palette) {
    let header: String = ExampleType::ALL.iter().map(|k| format!("{:>7}", k.name())).collect();
    println!("  {}  {}", palette.dim("branch"), palette.dim(header));

    for (branch, amounts) in generation.amounts.iter().enumerate() {
        let cells: String = ExampleType::ALL
            .iter()
            .map(|&kind| {
                let (got, want) = (amounts.delivered[kind], amounts.requested[kind]);
                let cell = format!("{:>7}", format!("{got}/{want}"));
                if got < want { palette.paint(cell, ansi::RED) } else { palette.paint(cell, category_color(kind)) }
            })
            .collect();
        println!("  {:>6}  {}", palette.paint(branch.to_string(), ansi::BLUE), cells);
    }

    println!(
        "  Total: {}  │  Requested: {}",
        palette.paint(generation.underlying.len().to_string(), ansi::GREEN),
        palette.dim(generation.requested().total().to_string()),
    );
}

fn print_warnings(generation: &Generation, palette: &ansi::Palette) {
    for shortage in &generation.shortages {
        println!(
            "  {} branch {} {}: {} of {} requested",
            palette.paint("!", ansi::YELLOW),
            shortage.branch,
            palette.paint(shortage.kind.name(), category_color(shortage.kind)),
            palette.paint(shortage.delivered.to_string(), ansi::RED),
            shortage.requested,
        );
    }
    if generation.missing > 0 {
        println!(
            "  {} {} words could not be generated from any category",
            palette.paint("!", ansi::YELLOW),
            palette.paint(generation.missing.to_string(), ansi::RED),
        );
        println!("\n{}", palette.dim("  Tip: try --backfill, more templates or a larger phoneme list"));
    }
}
