//! allercheck Classifier Protocol
//!
//! Wire types at the boundary between the vision classifier and the
//! correction engine, plus the judgment record handed to presentation.
//!
//! # Classifier output
//!
//! The classifier is prompted to answer with a single JSON object:
//!
//! ```json
//! { "result": "success|warning|danger", "message": "...", "details": "...", "ingredients": "..." }
//! ```
//!
//! Models do not always comply. [`parse_classifier_output`] never fails:
//! anything it cannot understand becomes [`ClassifierResult::degraded`]
//! (verdict `warning`) so the engine always receives a usable input.
//!
//! # Usage
//!
//! ```ignore
//! use allercheck_protocol::{judge, JudgmentRecord};
//!
//! let engine = AllergenEngine::default();
//! let record = judge(&engine, &raw_model_reply, &["乳".to_string()]);
//! println!("{}", serde_json::to_string_pretty(&record)?);
//! ```

use std::fmt;

use allercheck_engine::{AllergenEngine, AnalysisResult, ClassifierResult, Verdict};
use serde::{Deserialize, Deserializer, Serialize};

/// Current judgment record version. Increment for breaking changes.
pub const RECORD_VERSION: u32 = 1;

// =============================================================================
// Errors
// =============================================================================

#[derive(Debug)]
pub enum ProtocolError {
    /// Reply is not a JSON object of the expected shape.
    Malformed(String),
    /// `result` is not one of success / warning / danger.
    UnknownVerdict(String),
}

impl fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Malformed(msg) => write!(f, "malformed classifier output: {msg}"),
            Self::UnknownVerdict(v) => write!(f, "unknown classifier verdict: \"{v}\""),
        }
    }
}

impl std::error::Error for ProtocolError {}

// =============================================================================
// Classifier → Engine
// =============================================================================

/// Classifier reply as it appears on the wire.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RawClassifierOutput {
    pub result: String,
    pub message: String,
    pub details: String,
    /// Usually a string; some replies list ingredients as an array instead.
    #[serde(deserialize_with = "string_or_list")]
    pub ingredients: String,
}

fn string_or_list<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Ingredients {
        Text(String),
        List(Vec<String>),
        Null(()),
    }

    Ok(match Ingredients::deserialize(deserializer)? {
        Ingredients::Text(s) => s,
        Ingredients::List(items) => items.join("、"),
        Ingredients::Null(()) => String::new(),
    })
}

/// Strip a surrounding Markdown code fence (```json ... ```), if any.
fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.trim_end();
    let rest = rest.strip_suffix("```").unwrap_or(rest);
    // Drop the info string ("json") on the opening line, or in front of a
    // single-line body
    let body = match rest.split_once('\n') {
        Some((info, body)) if !info.trim_start().starts_with('{') => body,
        _ => {
            let rest = rest.trim_start();
            rest.strip_prefix("json").unwrap_or(rest)
        }
    };
    body.trim()
}

impl RawClassifierOutput {
    pub fn into_classifier_result(self) -> Result<ClassifierResult, ProtocolError> {
        let verdict = self
            .result
            .parse::<Verdict>()
            .map_err(|_| ProtocolError::UnknownVerdict(self.result.clone()))?;
        Ok(ClassifierResult {
            verdict,
            ingredient_text: self.ingredients,
            explanation: self.details,
        })
    }
}

/// Decode the wire object, tolerating a surrounding code fence.
pub fn parse_raw_output(raw: &str) -> Result<RawClassifierOutput, ProtocolError> {
    serde_json::from_str(strip_code_fence(raw)).map_err(|e| ProtocolError::Malformed(e.to_string()))
}

/// Parse a classifier reply, reporting why it could not be used.
pub fn try_parse_classifier_output(raw: &str) -> Result<ClassifierResult, ProtocolError> {
    parse_raw_output(raw)?.into_classifier_result()
}

/// Parse a classifier reply, substituting the degraded result on failure.
pub fn parse_classifier_output(raw: &str) -> ClassifierResult {
    parse_with_message(raw).0
}

/// Like [`parse_classifier_output`], also returning the model's headline
/// (empty when degraded).
fn parse_with_message(raw: &str) -> (ClassifierResult, String) {
    let parsed = parse_raw_output(raw).and_then(|out| {
        let message = out.message.clone();
        out.into_classifier_result().map(|r| (r, message))
    });
    match parsed {
        Ok(pair) => pair,
        Err(e) => {
            log::warn!("{e}; using degraded classifier result");
            (ClassifierResult::degraded(), String::new())
        }
    }
}

// =============================================================================
// Engine → Presentation
// =============================================================================

/// Headline shown next to the verdict badge.
pub fn verdict_message(verdict: Verdict) -> &'static str {
    match verdict {
        Verdict::Success => "Pass: safe to eat",
        Verdict::Warning => "Caution: please double-check",
        Verdict::Danger => "Fail: contains a selected allergen",
    }
}

/// Everything about one judgment, for display or for the caller to store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JudgmentRecord {
    pub version: u32,
    pub timestamp: String, // RFC 3339
    pub allergens: Vec<String>,
    pub classifier: ClassifierResult,
    /// Headline the classifier itself gave, kept for display.
    #[serde(default)]
    pub classifier_message: String,
    pub analysis: AnalysisResult,
    pub final_verdict: Verdict,
    pub message: String,
    pub details: String,
}

impl JudgmentRecord {
    pub fn new(allergens: Vec<String>, classifier: ClassifierResult, analysis: AnalysisResult) -> Self {
        Self::at(chrono::Utc::now().to_rfc3339(), allergens, classifier, analysis)
    }

    pub fn at(
        timestamp: String,
        allergens: Vec<String>,
        classifier: ClassifierResult,
        analysis: AnalysisResult,
    ) -> Self {
        Self {
            version: RECORD_VERSION,
            timestamp,
            allergens,
            final_verdict: analysis.final_verdict,
            message: verdict_message(analysis.final_verdict).to_string(),
            details: analysis.details.clone(),
            classifier,
            classifier_message: String::new(),
            analysis,
        }
    }

    pub fn with_classifier_message(mut self, message: impl Into<String>) -> Self {
        self.classifier_message = message.into();
        self
    }
}

/// Parse a raw classifier reply and run it through the engine.
pub fn judge(engine: &AllergenEngine, raw: &str, allergens: &[String]) -> JudgmentRecord {
    let (classifier, message) = parse_with_message(raw);
    let analysis = engine.analyze(&classifier, allergens);
    JudgmentRecord::new(allergens.to_vec(), classifier, analysis).with_classifier_message(message)
}

// =============================================================================
// Tests
// =============================================================================
