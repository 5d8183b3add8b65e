// allercheck CLI - second-pass allergen judgment for ingredient labels

mod dictionary;
mod exit_codes;
mod judge;

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use allercheck_config::Settings;
use allercheck_engine::{catalog, AllergenDictionary, AllergenEngine};
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

use dictionary::DictionaryCommands;
use exit_codes::{EXIT_DICTIONARY_INVALID, EXIT_ERROR, EXIT_IO, EXIT_SUCCESS, EXIT_USAGE};

/// Environment variable holding the log filter.
const LOG_ENV: &str = "ALLERCHECK_LOG";

#[derive(Parser)]
#[command(name = "allercheck")]
#[command(about = "Correct vision-model allergen verdicts for ingredient labels")]
#[command(long_version = long_version())]
#[command(version)]
struct Cli {
    /// Settings file (defaults to the user config directory)
    #[arg(long, global = true, env = "ALLERCHECK_SETTINGS")]
    settings: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Judge a classifier reply (exit 0 = success, 3 = warning, 4 = danger)
    #[command(after_help = "\
The input is the raw reply of the vision classifier: a JSON object with \
result, message, details and ingredients. Replies that cannot be parsed are \
judged as a degraded 'warning' result.

Examples:
  allercheck judge reply.json --allergen 乳 --allergen 卵
  allercheck judge reply.json -a 乳,卵 --json
  cat reply.json | allercheck judge - -a 小麦 --output judgment.json
  allercheck judge reply.json --dictionary custom.toml")]
    Judge {
        /// Classifier reply file (omit or - for stdin)
        input: Option<PathBuf>,

        /// Allergen id to check. Repeatable; comma-separated accepted.
        /// Defaults to the saved selection.
        #[arg(long, short = 'a', value_name = "ID")]
        allergen: Vec<String>,

        /// Dictionary TOML replacing the configured one
        #[arg(long)]
        dictionary: Option<PathBuf>,

        /// Output the judgment record as JSON on stdout
        #[arg(long)]
        json: bool,

        /// Write the judgment record JSON to file
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },

    /// List the allergen catalog (8 mandatory + 20 recommended)
    Allergens {
        /// Output JSON
        #[arg(long)]
        json: bool,
    },

    /// Dictionary inspection and validation
    #[command(subcommand)]
    Dictionary(DictionaryCommands),

    /// Save the default allergen selection used by `judge`
    #[command(after_help = "\
Examples:
  allercheck select 乳 卵
  allercheck select そば,落花生
  allercheck select            # show the saved selection
  allercheck select --clear")]
    Select {
        /// Allergen ids (catalog ids or free text)
        ids: Vec<String>,

        /// Clear the saved selection
        #[arg(long, conflicts_with = "ids")]
        clear: bool,
    },
}

fn long_version() -> &'static str {
    concat!(
        env!("CARGO_PKG_VERSION"),
        " (", env!("GIT_COMMIT_HASH"), ")",
        "\nengine:  allercheck-engine ", env!("CARGO_PKG_VERSION"),
        "\ntarget:  ", env!("TARGET"),
        "\nrecord_version: 1",
    )
}

fn init_logging(verbose: u8, default_level: &str) {
    let filter = match verbose {
        0 => EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_level)),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    // Also captures `log` records from the engine crates
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .try_init();
}

fn load_settings(path: Option<&PathBuf>) -> Settings {
    match path {
        Some(p) if p.exists() => Settings::load_from(p).unwrap_or_else(|e| {
            eprintln!("{e}");
            Settings::default()
        }),
        Some(_) => Settings::default(),
        None => Settings::load(),
    }
}

/// Build the engine from `--dictionary`, then settings/env, then builtin.
pub(crate) fn load_engine(
    dictionary: Option<PathBuf>,
    settings: &Settings,
) -> Result<AllergenEngine, CliError> {
    let Some(path) = dictionary.or_else(|| settings.effective_dictionary_path()) else {
        return Ok(AllergenEngine::default());
    };

    let text = std::fs::read_to_string(&path).map_err(|e| {
        CliError::new(EXIT_IO, format!("cannot read dictionary {}: {e}", path.display()))
    })?;
    let dict = AllergenDictionary::from_toml(&text).map_err(|e| {
        CliError::new(EXIT_DICTIONARY_INVALID, format!("{}: {e}", path.display()))
            .with_hint("check it with `allercheck dictionary validate`")
    })?;
    log::debug!("using dictionary {}", path.display());
    Ok(AllergenEngine::new(dict))
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let settings = load_settings(cli.settings.as_ref());
    init_logging(cli.verbose, &settings.log_level);

    let result = match cli.command {
        None => {
            // No subcommand = show help
            eprintln!("Usage: allercheck <command> [options]");
            eprintln!("       allercheck --help for more information");
            Ok(())
        }
        Some(Commands::Judge { input, allergen, dictionary, json, output }) => {
            judge::cmd_judge(&settings, input, allergen, dictionary, json, output)
        }
        Some(Commands::Allergens { json }) => cmd_allergens(json),
        Some(Commands::Dictionary(cmd)) => dictionary::cmd_dictionary(&settings, cmd),
        Some(Commands::Select { ids, clear }) => {
            cmd_select(settings, cli.settings.as_ref(), ids, clear)
        }
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn new(code: u8, msg: impl Into<String>) -> Self {
        Self { code, message: msg.into(), hint: None }
    }

    pub fn io(msg: impl Into<String>) -> Self {
        Self::new(EXIT_IO, msg)
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

// ============================================================================
// allergens
// ============================================================================

fn cmd_allergens(json: bool) -> Result<(), CliError> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();

    if json {
        let all: Vec<_> = catalog::all().collect();
        let text = serde_json::to_string_pretty(&all)
            .map_err(|e| CliError::new(EXIT_ERROR, format!("JSON serialization error: {e}")))?;
        writeln!(handle, "{text}").map_err(|e| CliError::io(e.to_string()))?;
        return Ok(());
    }

    for a in catalog::all() {
        let emoji = a.emoji.unwrap_or("");
        writeln!(handle, "{:<12} {:<12} {}\t{}", a.id, a.tier.to_string(), emoji, a.label)
            .map_err(|e| CliError::io(e.to_string()))?;
    }
    Ok(())
}

// ============================================================================
// select
// ============================================================================

fn cmd_select(
    mut settings: Settings,
    path: Option<&PathBuf>,
    ids: Vec<String>,
    clear: bool,
) -> Result<(), CliError> {
    if !clear && ids.is_empty() {
        for id in &settings.selected_allergens {
            println!("{id}");
        }
        return Ok(());
    }

    // Never save over a file the user has to fix by hand
    let target = path.cloned().unwrap_or_else(Settings::config_path);
    if target.exists() {
        settings = Settings::load_from(&target).map_err(|e| {
            CliError::new(EXIT_ERROR, e)
                .with_hint("fix or remove the settings file, then run `allercheck select` again")
        })?;
    }

    if clear {
        settings.selected_allergens.clear();
    } else {
        let ids = judge::split_allergens(&ids);
        if ids.is_empty() {
            return Err(CliError::new(EXIT_USAGE, "no allergen ids given"));
        }
        for id in ids.iter().filter(|id| !catalog::is_known(id)) {
            eprintln!("note: '{id}' is not in the catalog; kept as free text");
        }
        settings.set_selected_allergens(ids);
    }

    settings
        .save_to(&target)
        .map_err(|e| CliError::io(format!("cannot save settings: {e}")))?;
    eprintln!(
        "saved {} allergen(s) to {}",
        settings.selected_allergens.len(),
        target.display()
    );
    Ok(())
}
