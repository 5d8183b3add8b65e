//! `allercheck judge` — correct a classifier reply against selected allergens.

use std::io::Read;
use std::path::PathBuf;

use allercheck_config::Settings;
use allercheck_protocol::JudgmentRecord;

use crate::exit_codes::{verdict_exit_code, EXIT_IO, EXIT_SUCCESS, EXIT_USAGE};
use crate::{load_engine, CliError};

/// Split `--allergen` values on ASCII and Japanese commas.
pub fn split_allergens(values: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for value in values {
        for part in value.split([',', '、']) {
            let part = part.trim();
            if !part.is_empty() && !out.iter().any(|a| a == part) {
                out.push(part.to_string());
            }
        }
    }
    out
}

fn read_input(input: Option<&PathBuf>) -> Result<String, CliError> {
    match input {
        Some(path) if path.as_os_str() != "-" => std::fs::read_to_string(path).map_err(|e| {
            CliError::new(EXIT_IO, format!("cannot read {}: {e}", path.display()))
        }),
        _ => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .map_err(|e| CliError::new(EXIT_IO, format!("cannot read stdin: {e}")))?;
            Ok(buf)
        }
    }
}

pub fn cmd_judge(
    settings: &Settings,
    input: Option<PathBuf>,
    allergen_args: Vec<String>,
    dictionary: Option<PathBuf>,
    json_output: bool,
    output_file: Option<PathBuf>,
) -> Result<(), CliError> {
    let mut allergens = split_allergens(&allergen_args);
    if allergens.is_empty() {
        allergens = settings.selected_allergens.clone();
    }
    if allergens.is_empty() {
        return Err(CliError::new(EXIT_USAGE, "no allergens selected")
            .with_hint("pass --allergen <ID> or save a selection with `allercheck select`"));
    }

    let engine = load_engine(dictionary, settings)?;
    let raw = read_input(input.as_ref())?;

    let record = allercheck_protocol::judge(&engine, &raw, &allergens);
    log::info!(
        "judged {} allergen(s): {} -> {}",
        allergens.len(),
        record.classifier.verdict,
        record.final_verdict
    );

    let json_str = serde_json::to_string_pretty(&record)
        .map_err(|e| CliError::new(EXIT_IO, format!("JSON serialization error: {e}")))?;

    if let Some(ref path) = output_file {
        std::fs::write(path, &json_str)
            .map_err(|e| CliError::new(EXIT_IO, format!("cannot write output: {e}")))?;
        eprintln!("wrote {}", path.display());
    }

    if json_output {
        println!("{json_str}");
    }

    print_summary(&record);

    match verdict_exit_code(record.final_verdict) {
        EXIT_SUCCESS => Ok(()),
        // Verdict is already on stderr; no extra error line
        code => Err(CliError::new(code, "")),
    }
}

/// Human summary to stderr
fn print_summary(record: &JudgmentRecord) {
    eprintln!("{}: {}", record.final_verdict, record.message);
    if !record.details.is_empty() {
        eprintln!("  {}", record.details);
    }
    for c in &record.analysis.corrections {
        eprintln!("  correction: {c}");
    }
    for w in &record.analysis.warnings {
        eprintln!("  warning:    {w}");
    }
    if record.classifier.verdict != record.final_verdict {
        eprintln!("  (classifier said {})", record.classifier.verdict);
    }
}
