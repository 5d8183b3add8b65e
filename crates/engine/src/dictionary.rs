use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::catalog;
use crate::error::DictionaryError;

// ---------------------------------------------------------------------------
// Entries
// ---------------------------------------------------------------------------

/// An ingredient that reads like an allergen but is not derived from one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SafeCompound {
    pub name: String,
    pub explanation: String,
    /// Allergen ids this compound is commonly mistaken for.
    pub confused_with: Vec<String>,
}

/// Alternate names under which an allergen appears on a label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AliasGroup {
    pub allergen: String,
    pub names: Vec<String>,
}

// ---------------------------------------------------------------------------
// Dictionary
// ---------------------------------------------------------------------------

/// Read-only lookup tables driving the correction stages.
///
/// Entry order is significant: it decides which match names the headline
/// `details` of an analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllergenDictionary {
    #[serde(default)]
    pub contamination_keywords: Vec<String>,
    #[serde(default)]
    pub safe_compounds: Vec<SafeCompound>,
    #[serde(default)]
    pub aliases: Vec<AliasGroup>,
}

impl Default for AllergenDictionary {
    fn default() -> Self {
        Self::builtin()
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn safe(name: &str, explanation: &str, confused_with: &[&str]) -> SafeCompound {
    SafeCompound {
        name: name.into(),
        explanation: explanation.into(),
        confused_with: strings(confused_with),
    }
}

fn alias(allergen: &str, names: &[&str]) -> AliasGroup {
    AliasGroup {
        allergen: allergen.into(),
        names: strings(names),
    }
}

impl AllergenDictionary {
    /// The dictionary shipped with the engine.
    pub fn builtin() -> Self {
        Self {
            safe_compounds: vec![
                safe("豆乳", "derived from soybeans (not a milk allergen)", &["乳"]),
                safe("ココナッツミルク", "plant-based (not a milk allergen)", &["乳"]),
                safe("アーモンドミルク", "nut-based (not a milk allergen)", &["乳"]),
                safe("ライスミルク", "derived from rice (not a milk allergen)", &["乳"]),
                safe("オーツミルク", "derived from oats (not a milk allergen)", &["乳"]),
            ],
            aliases: vec![
                alias("卵", &["卵白", "卵黄", "エッグ", "オボアルブミン", "レシチン（卵由来）", "全卵"]),
                alias(
                    "乳",
                    &["牛乳", "バター", "チーズ", "ホエイ", "カゼイン", "ラクトース", "クリーム", "ヨーグルト"],
                ),
                alias("小麦", &["小麦粉", "グルテン", "ウィート", "デュラム", "セモリナ", "強力粉", "薄力粉"]),
                alias("えび", &["海老", "エビ", "シュリンプ", "車海老", "甘海老"]),
                alias("かに", &["蟹", "カニ", "クラブ", "ズワイガニ", "タラバガニ"]),
                alias("くるみ", &["胡桃", "ウォルナット", "クルミ"]),
                alias("そば", &["蕎麦", "ソバ", "buckwheat"]),
                alias("落花生", &["ピーナッツ", "落花生", "peanut", "南京豆"]),
            ],
            contamination_keywords: strings(&[
                "同一ラインで",
                "同一設備で",
                "本品製造工場では",
                "製造ラインで",
                "コンタミネーション",
                "微量混入",
                "同じ工場で",
            ]),
        }
    }

    /// A dictionary with no entries. Every analysis passes through unchanged.
    pub fn empty() -> Self {
        Self {
            safe_compounds: Vec::new(),
            aliases: Vec::new(),
            contamination_keywords: Vec::new(),
        }
    }

    pub fn from_toml(input: &str) -> Result<Self, DictionaryError> {
        let dict: AllergenDictionary =
            toml::from_str(input).map_err(|e| DictionaryError::Parse(e.to_string()))?;
        dict.validate()?;
        Ok(dict)
    }

    pub fn to_toml(&self) -> Result<String, DictionaryError> {
        toml::to_string_pretty(self).map_err(|e| DictionaryError::Serialize(e.to_string()))
    }

    /// Alias names registered for `allergen`, in dictionary order.
    pub fn aliases_for(&self, allergen: &str) -> &[String] {
        self.aliases
            .iter()
            .find(|g| g.allergen == allergen)
            .map(|g| g.names.as_slice())
            .unwrap_or(&[])
    }

    pub fn validate(&self) -> Result<(), DictionaryError> {
        // An empty needle would match every label
        let mut seen = HashSet::new();
        for compound in &self.safe_compounds {
            if compound.name.is_empty() {
                return Err(DictionaryError::Validation(
                    "safe compound with empty name".into(),
                ));
            }
            if !seen.insert(compound.name.as_str()) {
                return Err(DictionaryError::Validation(format!(
                    "duplicate safe compound '{}'",
                    compound.name
                )));
            }
            if compound.confused_with.is_empty() {
                return Err(DictionaryError::Validation(format!(
                    "safe compound '{}': confused_with must list at least one allergen",
                    compound.name
                )));
            }
            for id in &compound.confused_with {
                if !catalog::is_known(id) {
                    log::warn!(
                        "safe compound '{}': '{}' is not a catalog allergen",
                        compound.name,
                        id
                    );
                }
            }
        }

        let mut groups = HashSet::new();
        for group in &self.aliases {
            if !groups.insert(group.allergen.as_str()) {
                return Err(DictionaryError::Validation(format!(
                    "duplicate alias group for '{}'",
                    group.allergen
                )));
            }
            if group.names.iter().any(|n| n.is_empty()) {
                return Err(DictionaryError::Validation(format!(
                    "alias group '{}': empty alias",
                    group.allergen
                )));
            }
            if !catalog::is_known(&group.allergen) {
                log::warn!("alias group '{}' is not a catalog allergen", group.allergen);
            }
        }

        if self.contamination_keywords.iter().any(|k| k.is_empty()) {
            return Err(DictionaryError::Validation(
                "empty contamination keyword".into(),
            ));
        }

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
