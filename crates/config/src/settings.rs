// User settings
// Loaded from ~/.config/allercheck/settings.json

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable that overrides `dictionary.path`.
pub const DICTIONARY_ENV: &str = "ALLERCHECK_DICTIONARY";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // Allergens checked when none are given on the command line
    #[serde(rename = "allergens.selected")]
    pub selected_allergens: Vec<String>,

    // Replacement for the builtin dictionary (TOML)
    #[serde(rename = "dictionary.path")]
    pub dictionary_path: Option<PathBuf>,

    // Log filter used when ALLERCHECK_LOG is unset
    #[serde(rename = "log.level")]
    pub log_level: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            selected_allergens: Vec::new(),
            dictionary_path: None,
            log_level: "warn".into(),
        }
    }
}

const DEFAULT_FILE: &str = r#"{
    // Allergens to check when `allercheck judge` is run without --allergen.
    // Use catalog ids (see `allercheck allergens`) or your own free text.
    "allergens.selected": [],

    // Path to a TOML dictionary replacing the builtin one (null = builtin).
    // ALLERCHECK_DICTIONARY overrides this.
    "dictionary.path": null,

    // Log filter when ALLERCHECK_LOG is unset: error, warn, info, debug, trace
    "log.level": "warn"
}
"#;

/// Drop `//` comment lines so the file can be annotated.
fn strip_comments(contents: &str) -> String {
    contents
        .lines()
        .filter(|line| !line.trim().starts_with("//"))
        .collect::<Vec<_>>()
        .join("\n")
}

impl Settings {
    /// Get the settings file path
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("allercheck")
            .join("settings.json")
    }

    /// Load settings from the default location, falling back to defaults.
    /// Writes an annotated default file on first run.
    pub fn load() -> Self {
        let path = Self::config_path();

        if !path.exists() {
            if let Err(e) = Self::create_default_file(&path) {
                eprintln!("Error writing default settings.json: {}", e);
            }
            return Self::default();
        }

        match Self::load_from(&path) {
            Ok(settings) => settings,
            Err(e) => {
                eprintln!("{}", e);
                eprintln!("Using default settings");
                Self::default()
            }
        }
    }

    /// Load settings from an explicit path.
    pub fn load_from(path: &Path) -> Result<Self, String> {
        let contents = fs::read_to_string(path)
            .map_err(|e| format!("Error reading {}: {}", path.display(), e))?;
        serde_json::from_str(&strip_comments(&contents))
            .map_err(|e| format!("Error parsing {}: {}", path.display(), e))
    }

    /// Save current settings to the default location
    pub fn save(&self) -> Result<(), String> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<(), String> {
        // Ensure directory exists
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| e.to_string())?;
        }

        let json = serde_json::to_string_pretty(self).map_err(|e| e.to_string())?;
        fs::write(path, json).map_err(|e| e.to_string())
    }

    fn create_default_file(path: &Path) -> Result<(), String> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| e.to_string())?;
        }
        fs::write(path, DEFAULT_FILE).map_err(|e| e.to_string())
    }

    /// Dictionary path after applying the environment override.
    pub fn effective_dictionary_path(&self) -> Option<PathBuf> {
        match env::var(DICTIONARY_ENV) {
            Ok(p) if !p.trim().is_empty() => Some(PathBuf::from(p.trim())),
            _ => self.dictionary_path.clone(),
        }
    }

    /// Replace the saved selection, dropping blanks and duplicates.
    pub fn set_selected_allergens<I, S>(&mut self, ids: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut selected: Vec<String> = Vec::new();
        for id in ids {
            let id: String = id.into();
            let id = id.trim().to_string();
            if !id.is_empty() && !selected.contains(&id) {
                selected.push(id);
            }
        }
        self.selected_allergens = selected;
    }
}
