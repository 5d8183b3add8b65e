use crate::dictionary::AllergenDictionary;
use crate::model::{AnalysisResult, ClassifierResult};
use crate::verdict::Verdict;

/// Second-pass corrector for classifier verdicts.
///
/// Holds its dictionary by value; cloning or sharing the engine across
/// threads needs no coordination since `analyze` never mutates it.
#[derive(Debug, Clone, Default)]
pub struct AllergenEngine {
    dictionary: AllergenDictionary,
}

impl AllergenEngine {
    pub fn new(dictionary: AllergenDictionary) -> Self {
        Self { dictionary }
    }

    pub fn dictionary(&self) -> &AllergenDictionary {
        &self.dictionary
    }

    /// Correct a classifier verdict against the user's allergen selection.
    ///
    /// Stages run in a fixed order and each sees the verdict left by the
    /// previous one:
    ///
    /// 1. safe compounds (may upgrade to `Success`)
    /// 2. aliases of selected allergens (`Success` → `Danger`)
    /// 3. contamination keywords (`Success` → `Warning`)
    ///
    /// Every match is recorded in `corrections` / `warnings`. Only the stage
    /// that moves the verdict rewrites `details`.
    pub fn analyze<S: AsRef<str>>(
        &self,
        input: &ClassifierResult,
        selected: &[S],
    ) -> AnalysisResult {
        let mut result = AnalysisResult::passthrough(input);
        let text = input.ingredient_text.as_str();
        if text.is_empty() {
            log::debug!("no ingredient text, keeping classifier verdict {}", input.verdict);
            return result;
        }

        self.correct_safe_compounds(text, selected, &mut result);
        self.detect_aliases(text, selected, &mut result);
        self.detect_contamination(text, &mut result);

        if result.final_verdict.is_worse_than(input.verdict) {
            log::debug!("verdict downgraded: {} -> {}", input.verdict, result.final_verdict);
        } else if result.final_verdict != input.verdict {
            log::debug!("verdict upgraded: {} -> {}", input.verdict, result.final_verdict);
        }
        result
    }

    fn correct_safe_compounds<S: AsRef<str>>(
        &self,
        text: &str,
        selected: &[S],
        result: &mut AnalysisResult,
    ) {
        for compound in &self.dictionary.safe_compounds {
            if !text.contains(compound.name.as_str()) {
                continue;
            }
            log::trace!("safe compound matched: {}", compound.name);
            let correction = format!("{} is {}", compound.name, compound.explanation);

            let confused = selected
                .iter()
                .any(|s| compound.confused_with.iter().any(|id| id == s.as_ref()));
            if confused {
                result.final_verdict = Verdict::Success;
                result.details = format!("{correction}. Safe to eat.");
            }
            result.corrections.push(correction);
        }
    }

    fn detect_aliases<S: AsRef<str>>(
        &self,
        text: &str,
        selected: &[S],
        result: &mut AnalysisResult,
    ) {
        for allergen in selected {
            let allergen = allergen.as_ref();
            for alias in self.dictionary.aliases_for(allergen) {
                if !text.contains(alias.as_str()) {
                    continue;
                }
                log::trace!("alias matched: {alias} ({allergen})");
                result
                    .warnings
                    .push(format!("{alias} is an alias of {allergen}"));
                if result.final_verdict == Verdict::Success {
                    result.final_verdict = Verdict::Danger;
                    result.details =
                        format!("Contains {alias}, which is a {allergen} allergen.");
                }
            }
        }
    }

    fn detect_contamination(&self, text: &str, result: &mut AnalysisResult) {
        for keyword in &self.dictionary.contamination_keywords {
            if !text.contains(keyword.as_str()) {
                continue;
            }
            log::trace!("contamination keyword matched: {keyword}");
            result
                .warnings
                .push(format!("Cross-contact risk during manufacturing ({keyword})"));
            // Contamination never escalates past Warning
            if result.final_verdict == Verdict::Success {
                result.final_verdict = Verdict::Warning;
                result.details = "Possible contact with other allergens during manufacturing. \
                                  Beware of trace contamination."
                    .into();
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dictionary::{AliasGroup, SafeCompound};

    fn engine() -> AllergenEngine {
        AllergenEngine::default()
    }

    fn input(verdict: Verdict, text: &str) -> ClassifierResult {
        ClassifierResult::new(verdict, text, "classifier says so")
    }

    #[test]
    fn safe_compound_upgrades_when_confused_allergen_selected() {
        let r = engine().analyze(&input(Verdict::Danger, "豆乳"), &["乳"]);
        assert_eq!(r.final_verdict, Verdict::Success);
        assert_eq!(r.corrections.len(), 1);
        assert!(r.corrections[0].starts_with("豆乳 is "));
        assert!(r.details.contains("豆乳"));
        assert!(r.warnings.is_empty());
    }

    #[test]
    fn safe_compound_without_matching_selection_only_records_correction() {
        let r = engine().analyze(&input(Verdict::Danger, "豆乳"), &["卵"]);
        assert_eq!(r.final_verdict, Verdict::Danger);
        assert_eq!(r.corrections.len(), 1);
        assert_eq!(r.details, "classifier says so");
    }

    #[test]
    fn last_safe_compound_names_details() {
        let r = engine().analyze(&input(Verdict::Danger, "豆乳とオーツミルク"), &["乳"]);
        assert_eq!(r.final_verdict, Verdict::Success);
        assert_eq!(r.corrections.len(), 2);
        assert!(r.details.contains("オーツミルク"));
    }

    #[test]
    fn safe_compound_upgrades_warning_to_success() {
        let r = engine().analyze(&input(Verdict::Warning, "アーモンドミルク"), &["乳"]);
        assert_eq!(r.final_verdict, Verdict::Success);
        assert_eq!(r.corrections.len(), 1);
        assert!(r.details.contains("アーモンドミルク"));
    }

    #[test]
    fn alias_downgrades_success_to_danger() {
        let r = engine().analyze(&input(Verdict::Success, "卵白を含む"), &["卵"]);
        assert_eq!(r.final_verdict, Verdict::Danger);
        assert_eq!(r.warnings, vec!["卵白 is an alias of 卵"]);
        assert!(r.details.contains("卵白"));
    }

    #[test]
    fn first_alias_keeps_details() {
        let r = engine().analyze(&input(Verdict::Success, "卵黄、卵白"), &["卵"]);
        assert_eq!(r.final_verdict, Verdict::Danger);
        // Dictionary order is 卵白 then 卵黄
        assert_eq!(r.warnings.len(), 2);
        assert!(r.warnings[0].starts_with("卵白"));
        assert!(r.details.contains("卵白"));
        assert!(!r.details.contains("卵黄"));
    }

    #[test]
    fn alias_does_not_touch_warning_verdict() {
        let r = engine().analyze(&input(Verdict::Warning, "バター"), &["乳"]);
        assert_eq!(r.final_verdict, Verdict::Warning);
        assert_eq!(r.warnings.len(), 1);
        assert_eq!(r.details, "classifier says so");
    }

    #[test]
    fn alias_of_unselected_allergen_is_ignored() {
        let r = engine().analyze(&input(Verdict::Success, "バター"), &["卵"]);
        assert_eq!(r.final_verdict, Verdict::Success);
        assert!(r.warnings.is_empty());
    }

    #[test]
    fn contamination_downgrades_to_warning_only() {
        let r = engine().analyze(&input(Verdict::Success, "同一ラインで製造"), &[] as &[&str]);
        assert_eq!(r.final_verdict, Verdict::Warning);
        assert_eq!(r.warnings.len(), 1);
        assert!(r.warnings[0].contains("同一ラインで"));
        assert!(r.details.contains("manufacturing"));
    }

    #[test]
    fn contamination_on_warning_keeps_details() {
        let r = engine().analyze(&input(Verdict::Warning, "同一ラインで製造"), &["乳"]);
        assert_eq!(r.final_verdict, Verdict::Warning);
        assert_eq!(r.warnings.len(), 1);
        assert_eq!(r.details, "classifier says so");
    }

    #[test]
    fn contamination_after_alias_keeps_danger() {
        let r = engine().analyze(&input(Verdict::Success, "卵白。同一ラインで製造"), &["卵"]);
        assert_eq!(r.final_verdict, Verdict::Danger);
        assert_eq!(r.warnings.len(), 2);
        assert!(r.details.contains("卵白"));
    }

    #[test]
    fn unknown_allergen_id_produces_nothing() {
        let r = engine().analyze(&input(Verdict::Success, "パクチー"), &["パクチー"]);
        assert_eq!(r, AnalysisResult::passthrough(&input(Verdict::Success, "パクチー")));
    }

    #[test]
    fn injected_dictionary_is_used() {
        let dict = AllergenDictionary {
            contamination_keywords: vec![],
            safe_compounds: vec![SafeCompound {
                name: "ピーナッツバター風味".into(),
                explanation: "flavoring only".into(),
                confused_with: vec!["落花生".into()],
            }],
            aliases: vec![AliasGroup {
                allergen: "ごま".into(),
                names: vec!["セサミ".into()],
            }],
        };
        let engine = AllergenEngine::new(dict);

        let r = engine.analyze(&input(Verdict::Danger, "ピーナッツバター風味"), &["落花生"]);
        assert_eq!(r.final_verdict, Verdict::Success);

        let r = engine.analyze(&input(Verdict::Success, "セサミオイル"), &["ごま"]);
        assert_eq!(r.final_verdict, Verdict::Danger);

        // Builtin keywords are not present in the injected dictionary
        let r = engine.analyze(&input(Verdict::Success, "同一ラインで"), &["ごま"]);
        assert_eq!(r.final_verdict, Verdict::Success);
    }

    #[test]
    fn engine_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<AllergenEngine>();
    }
}
