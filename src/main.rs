mod debug_report;

use ruleshift::logging::{self, Profile};
use ruleshift::{Amount, Bundle, CategoryCounts, MAX_DIFFICULTY, Options, Sources};
use std::io::{self, IsTerminal};
use std::path::PathBuf;

const DEFAULT_AMOUNT: usize = 20;
const DEFAULT_DIFFICULTY: u8 = 5;

fn main() {
    let config = match parse_args() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(2);
        }
    };

    logging::init(Profile::Development);

    if let Err(err) = run(&config) {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run(config: &CliConfig) -> Result<(), ruleshift::Error> {
    let bundle = Bundle::load(&config.sources)?;
    let options = Options { seed: config.seed, backfill: config.backfill, ..Options::default() };
    let mut generator = bundle.generator(config.rule, config.difficulty, options)?;
    let generation = generator.generate(config.amount, false, &bundle.glosses)?;

    debug_report::print_run(generator.rule(), config.difficulty, &generation, config.color);
    Ok(())
}

struct CliConfig {
    sources: Sources,
    rule: usize,
    amount: Amount,
    difficulty: u8,
    seed: Option<u64>,
    backfill: bool,
    color: bool,
}

fn parse_args() -> Result<CliConfig, String> {
    let mut sources = Sources {
        features: PathBuf::from("data/features.csv"),
        rules: PathBuf::from("data/rules.txt"),
        templates: PathBuf::from("data/templates.txt"),
        phonemes: PathBuf::from("data/phonemes.txt"),
        glosses: None,
    };
    let mut rule = 0;
    let mut amount = Amount::Total(DEFAULT_AMOUNT);
    let mut difficulty = DEFAULT_DIFFICULTY;
    let mut seed = None;
    let mut backfill = false;
    let mut color = io::stdout().is_terminal();
    let mut args = std::env::args().skip(1);

    while let Some(arg) = args.next() {
        let (flag, inline) = match arg.split_once('=') {
            Some((flag, value)) if flag.starts_with("--") => (flag.to_string(), Some(value.to_string())),
            _ => (arg.clone(), None),
        };
        let mut value = |name: &str| match inline.clone() {
            Some(v) => Ok(v),
            None => args.next().ok_or_else(|| format!("error: {name} expects a value")),
        };

        match flag.as_str() {
            "-h" | "--help" => {
                print_help();
                std::process::exit(0);
            }
            "-V" | "--version" => {
                println!("ruleshift {}", env!("CARGO_PKG_VERSION"));
                std::process::exit(0);
            }
            "--color" => color = true,
            "--no-color" => color = false,
            "--backfill" => backfill = true,
            "--features" => sources.features = value("--features")?.into(),
            "--rules" => sources.rules = value("--rules")?.into(),
            "--templates" => sources.templates = value("--templates")?.into(),
            "--phonemes" => sources.phonemes = value("--phonemes")?.into(),
            "--glosses" => sources.glosses = Some(value("--glosses")?.into()),
            "--rule" => rule = parse_number(&value("--rule")?, "--rule")?,
            "--amount" => amount = parse_amount(&value("--amount")?)?,
            "--seed" => seed = Some(parse_number(&value("--seed")?, "--seed")?),
            "--difficulty" => {
                let raw = value("--difficulty")?;
                difficulty = parse_number(&raw, "--difficulty")?;
                if difficulty > MAX_DIFFICULTY {
                    return Err(format!("error: --difficulty must be 0..={MAX_DIFFICULTY}, got {raw}"));
                }
            }
            _ if flag.starts_with('-') => {
                return Err(format!("error: unknown option '{arg}'\n\n{}", help_text()));
            }
            _ => return Err(format!("error: unexpected argument '{arg}'")),
        }
    }

    Ok(CliConfig { sources, rule, amount, difficulty, seed, backfill, color })
}

fn parse_number<T: std::str::FromStr>(value: &str, flag: &str) -> Result<T, String> {
    value.trim().parse().map_err(|_| format!("error: invalid {flag} '{value}' (expected a non-negative integer)"))
}

/// `N` for a total, or five comma-separated counts `CADT,CADNT,CAND,NCAD,IRR`.
fn parse_amount(value: &str) -> Result<Amount, String> {
    if !value.contains(',') {
        return parse_number(value, "--amount").map(Amount::Total);
    }
    let counts = value.split(',').map(|part| parse_number(part, "--amount")).collect::<Result<Vec<usize>, _>>()?;
    match counts.as_slice() {
        &[cadt, cadnt, cand, ncad, irr] => Ok(Amount::PerCategory(CategoryCounts::new(cadt, cadnt, cand, ncad, irr))),
        _ => Err(format!("error: --amount '{value}' must list 5 counts (CADT,CADNT,CAND,NCAD,IRR)")),
    }
}

fn print_help() {
    println!("{}", help_text());
}

fn help_text() -> String {
    format!(
        "ruleshift {version}

Generate sound-change puzzle examples for one rule.

Usage:
  ruleshift [OPTIONS]

Inputs (default to the files under data/):
  --features <path>          Feature table (CSV with a [TL] header row).
  --rules <path>             Rule file, one rule per line.
  --templates <path>         Word templates, one per line.
  --phonemes <path>          Phoneme inventory of the puzzle language.
  --glosses <path>           Gloss groups, one meaning per line. Optional.

Generation:
  --rule <index>             Rule to use, counting from 0. Default: 0
  --amount <n|a,b,c,d,e>     Total words, or per-category counts
                             CADT,CADNT,CAND,NCAD,IRR. Default: {amount}
  --difficulty <0-{max}>      Category mix. Default: {difficulty}
  --seed <n>                 Seed the generator for reproducible output.
  --backfill                 Fill shortfalls from other categories.

Output:
  --color                    Force ANSI color output.
  --no-color                 Disable ANSI color output.
  -h, --help                 Show this help message.
  -V, --version              Print version information.

Logging goes to stderr; set {env} (e.g. {env}=debug) to change the filter.

Exit codes:
  0  Success.
  1  Input could not be loaded or generation failed.
  2  Invalid arguments.
",
        version = env!("CARGO_PKG_VERSION"),
        amount = DEFAULT_AMOUNT,
        difficulty = DEFAULT_DIFFICULTY,
        max = MAX_DIFFICULTY,
        env = logging::ENV_VAR,
    )
}
