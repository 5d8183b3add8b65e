//! `allercheck-engine` — deterministic allergen correction engine.
//!
//! Pure engine crate: receives a first-pass classifier verdict plus the
//! user's allergen selection, returns a corrected verdict with explanations.
//! No CLI or IO dependencies.

pub mod analyze;
pub mod catalog;
pub mod dictionary;
pub mod error;
pub mod model;
pub mod verdict;

pub use analyze::AllergenEngine;
pub use dictionary::AllergenDictionary;
pub use error::DictionaryError;
pub use model::{AnalysisResult, ClassifierResult};
pub use verdict::Verdict;
