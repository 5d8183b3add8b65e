use serde::{Deserialize, Serialize};

use crate::verdict::Verdict;

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// First-pass verdict from the vision classifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifierResult {
    pub verdict: Verdict,
    /// Raw ingredient text read off the label. May be empty.
    #[serde(default)]
    pub ingredient_text: String,
    #[serde(default)]
    pub explanation: String,
}

impl ClassifierResult {
    pub fn new(
        verdict: Verdict,
        ingredient_text: impl Into<String>,
        explanation: impl Into<String>,
    ) -> Self {
        Self {
            verdict,
            ingredient_text: ingredient_text.into(),
            explanation: explanation.into(),
        }
    }

    /// Stand-in used when the classifier output could not be understood.
    pub fn degraded() -> Self {
        Self {
            verdict: Verdict::Warning,
            ingredient_text: String::new(),
            explanation: "Please try again".into(),
        }
    }
}

impl Default for ClassifierResult {
    fn default() -> Self {
        Self::degraded()
    }
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

/// Corrected verdict plus everything that contributed to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub final_verdict: Verdict,
    pub corrections: Vec<String>,
    pub warnings: Vec<String>,
    pub details: String,
}

impl AnalysisResult {
    /// Result that carries the classifier's verdict and explanation unchanged.
    pub fn passthrough(input: &ClassifierResult) -> Self {
        Self {
            final_verdict: input.verdict,
            corrections: Vec::new(),
            warnings: Vec::new(),
            details: input.explanation.clone(),
        }
    }
}
