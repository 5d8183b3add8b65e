//! `allercheck dictionary` — inspect and validate allergen dictionaries.

use std::path::PathBuf;

use allercheck_config::Settings;
use allercheck_engine::AllergenDictionary;
use clap::Subcommand;

use crate::exit_codes::{EXIT_DICTIONARY_INVALID, EXIT_IO};
use crate::{load_engine, CliError};

#[derive(Subcommand)]
pub enum DictionaryCommands {
    /// Print the active dictionary (builtin unless overridden)
    #[command(after_help = "\
Examples:
  allercheck dictionary show
  allercheck dictionary show --json
  allercheck dictionary show --dictionary custom.toml")]
    Show {
        /// Dictionary TOML to show instead of the configured one
        #[arg(long)]
        dictionary: Option<PathBuf>,

        /// Output JSON instead of TOML
        #[arg(long)]
        json: bool,
    },

    /// Check a dictionary TOML file without using it
    #[command(after_help = "\
Examples:
  allercheck dictionary validate custom.toml")]
    Validate {
        /// Path to the dictionary TOML file
        path: PathBuf,
    },
}

pub fn cmd_dictionary(settings: &Settings, cmd: DictionaryCommands) -> Result<(), CliError> {
    match cmd {
        DictionaryCommands::Show { dictionary, json } => cmd_show(settings, dictionary, json),
        DictionaryCommands::Validate { path } => cmd_validate(path),
    }
}

fn cmd_show(settings: &Settings, dictionary: Option<PathBuf>, json: bool) -> Result<(), CliError> {
    let engine = load_engine(dictionary, settings)?;
    let dict = engine.dictionary();

    let text = if json {
        serde_json::to_string_pretty(dict)
            .map_err(|e| CliError::new(EXIT_IO, format!("JSON serialization error: {e}")))?
    } else {
        dict.to_toml()
            .map_err(|e| CliError::new(EXIT_DICTIONARY_INVALID, e.to_string()))?
    };
    println!("{text}");
    Ok(())
}

fn cmd_validate(path: PathBuf) -> Result<(), CliError> {
    let text = std::fs::read_to_string(&path)
        .map_err(|e| CliError::new(EXIT_IO, format!("cannot read {}: {e}", path.display())))?;
    let dict = AllergenDictionary::from_toml(&text)
        .map_err(|e| CliError::new(EXIT_DICTIONARY_INVALID, e.to_string()))?;

    let alias_count: usize = dict.aliases.iter().map(|g| g.names.len()).sum();
    eprintln!(
        "{}: ok ({} safe compounds, {} aliases across {} allergens, {} contamination keywords)",
        path.display(),
        dict.safe_compounds.len(),
        alias_count,
        dict.aliases.len(),
        dict.contamination_keywords.len(),
    );
    Ok(())
}
