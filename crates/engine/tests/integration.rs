use std::path::PathBuf;

use allercheck_engine::{AllergenDictionary, AllergenEngine, AnalysisResult, ClassifierResult, Verdict};
use proptest::prelude::*;

fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn run(verdict: Verdict, text: &str, selected: &[&str]) -> AnalysisResult {
    let engine = AllergenEngine::default();
    engine.analyze(&ClassifierResult::new(verdict, text, "first pass"), selected)
}

// -------------------------------------------------------------------------
// Label scenarios
// -------------------------------------------------------------------------

#[test]
fn soy_milk_is_not_dairy() {
    let r = run(Verdict::Danger, "豆乳", &["乳"]);
    assert_eq!(r.final_verdict, Verdict::Success);
    assert!(r.corrections.iter().any(|c| c.contains("豆乳")));
    assert!(r.warnings.is_empty());
}

#[test]
fn egg_white_is_egg() {
    let r = run(Verdict::Success, "卵白を含む", &["卵"]);
    assert_eq!(r.final_verdict, Verdict::Danger);
    assert!(r.warnings.iter().any(|w| w.contains("卵白") && w.contains("卵")));
}

#[test]
fn shared_factory_is_a_warning() {
    let r = run(
        Verdict::Success,
        "本品製造工場では小麦を含む製品を製造しています",
        &["小麦"],
    );
    assert_eq!(r.final_verdict, Verdict::Warning);
    assert!(!r.warnings.is_empty());
    assert!(r.corrections.is_empty());
}

#[test]
fn empty_label_passes_through() {
    let r = run(Verdict::Warning, "", &["乳"]);
    assert_eq!(r.final_verdict, Verdict::Warning);
    assert!(r.corrections.is_empty());
    assert!(r.warnings.is_empty());
    assert_eq!(r.details, "first pass");
}

#[test]
fn alias_overrides_safe_compound_upgrade() {
    let r = run(Verdict::Danger, "豆乳、卵白を含む", &["乳", "卵"]);
    assert_eq!(r.final_verdict, Verdict::Danger);
    assert_eq!(r.corrections.len(), 1);
    assert!(r.corrections[0].contains("豆乳"));
    assert_eq!(r.warnings.len(), 1);
    assert!(r.warnings[0].contains("卵白"));
    assert!(r.details.contains("卵白"), "details: {}", r.details);
}

#[test]
fn empty_selection_still_checks_contamination() {
    let r = run(Verdict::Success, "バター。微量混入の可能性あり", &[]);
    assert_eq!(r.final_verdict, Verdict::Warning);
    assert_eq!(r.warnings.len(), 1);
}

#[test]
fn every_match_is_recorded() {
    let r = run(
        Verdict::Success,
        "小麦粉、バター、チーズ。同一ラインでえびを使用。同じ工場で",
        &["小麦", "乳"],
    );
    assert_eq!(r.final_verdict, Verdict::Danger);
    // 小麦粉, バター, チーズ, 同一ラインで, 同じ工場で
    assert_eq!(r.warnings.len(), 5);
    assert!(r.details.contains("小麦粉"));
}

#[test]
fn matching_is_case_sensitive() {
    let r = run(Verdict::Success, "Peanut oil", &["落花生"]);
    assert_eq!(r.final_verdict, Verdict::Success);
    let r = run(Verdict::Success, "peanut oil", &["落花生"]);
    assert_eq!(r.final_verdict, Verdict::Danger);
}

// -------------------------------------------------------------------------
// Dictionary from file
// -------------------------------------------------------------------------

#[test]
fn fixture_dictionary_drives_engine() {
    let text = std::fs::read_to_string(fixtures_dir().join("sesame.dictionary.toml")).unwrap();
    let dict = AllergenDictionary::from_toml(&text).unwrap();
    let engine = AllergenEngine::new(dict);

    let r = engine.analyze(
        &ClassifierResult::new(Verdict::Danger, "ごま風味ドレッシング（ごま不使用）", ""),
        &["ごま"],
    );
    assert_eq!(r.final_verdict, Verdict::Success);

    let r = engine.analyze(
        &ClassifierResult::new(Verdict::Success, "香菜、共通設備で製造", ""),
        &["パクチー"],
    );
    assert_eq!(r.final_verdict, Verdict::Danger);
    assert_eq!(r.warnings.len(), 2);

    // Builtin entries are gone
    let r = engine.analyze(&ClassifierResult::new(Verdict::Success, "卵白", ""), &["卵"]);
    assert_eq!(r.final_verdict, Verdict::Success);
}

#[test]
fn results_serialize_with_lowercase_verdict() {
    let r = run(Verdict::Success, "卵白", &["卵"]);
    let json = serde_json::to_value(&r).unwrap();
    assert_eq!(json["final_verdict"], "danger");
    assert!(json["warnings"].is_array());
}

// -------------------------------------------------------------------------
// Properties
// -------------------------------------------------------------------------

const FRAGMENTS: &[&str] = &[
    "豆乳", "卵白", "バター", "小麦粉", "同一ラインで", "砂糖", "食塩", "ココナッツミルク",
    "本品製造工場では", "ピーナッツ", "、", "水",
];
const IDS: &[&str] = &["卵", "乳", "小麦", "落花生", "パクチー", "ごま"];

fn verdict_strategy() -> impl Strategy<Value = Verdict> {
    prop_oneof![Just(Verdict::Success), Just(Verdict::Warning), Just(Verdict::Danger)]
}

fn label_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec(prop::sample::select(FRAGMENTS), 0..8).prop_map(|v| v.concat())
}

fn selection_strategy() -> impl Strategy<Value = Vec<&'static str>> {
    prop::collection::vec(prop::sample::select(IDS), 0..4)
}

proptest! {
    #[test]
    fn analyze_is_deterministic(
        verdict in verdict_strategy(),
        text in label_strategy(),
        selected in selection_strategy(),
    ) {
        let input = ClassifierResult::new(verdict, text, "x");
        let engine = AllergenEngine::default();
        prop_assert_eq!(engine.analyze(&input, &selected[..]), engine.analyze(&input, &selected[..]));
    }

    #[test]
    fn warnings_never_leave_success(
        verdict in verdict_strategy(),
        text in label_strategy(),
        selected in selection_strategy(),
    ) {
        let input = ClassifierResult::new(verdict, text, "x");
        let r = AllergenEngine::default().analyze(&input, &selected[..]);
        if !r.warnings.is_empty() {
            prop_assert_ne!(r.final_verdict, Verdict::Success);
        }
    }

    #[test]
    fn empty_text_is_identity(
        verdict in verdict_strategy(),
        selected in selection_strategy(),
    ) {
        let input = ClassifierResult::new(verdict, "", "unchanged");
        let r = AllergenEngine::default().analyze(&input, &selected[..]);
        prop_assert_eq!(r, AnalysisResult::passthrough(&input));
    }

    #[test]
    fn no_upgrade_without_safe_compound_correction(
        verdict in verdict_strategy(),
        text in label_strategy(),
        selected in selection_strategy(),
    ) {
        let input = ClassifierResult::new(verdict, text, "x");
        let r = AllergenEngine::default().analyze(&input, &selected[..]);
        if r.corrections.is_empty() {
            prop_assert!(r.final_verdict >= verdict);
        }
    }
}
