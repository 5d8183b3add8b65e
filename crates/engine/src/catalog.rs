//! Japanese allergen labeling categories.
//!
//! Eight allergens must be declared on packaged food; twenty more are
//! recommended. Ids are the strings users select and the keys the dictionary
//! uses for alias groups.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    Mandatory,
    Recommended,
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Mandatory => write!(f, "mandatory"),
            Self::Recommended => write!(f, "recommended"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Allergen {
    pub id: &'static str,
    pub label: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emoji: Option<&'static str>,
    pub tier: Tier,
}

const fn mandatory(id: &'static str, label: &'static str, emoji: &'static str) -> Allergen {
    Allergen { id, label, emoji: Some(emoji), tier: Tier::Mandatory }
}

const fn recommended(id: &'static str) -> Allergen {
    Allergen { id, label: id, emoji: None, tier: Tier::Recommended }
}

pub const MANDATORY: [Allergen; 8] = [
    mandatory("卵", "卵", "🥚"),
    mandatory("乳", "乳（牛乳）", "🥛"),
    mandatory("小麦", "小麦", "🌾"),
    mandatory("えび", "えび", "🦐"),
    mandatory("かに", "かに", "🦀"),
    mandatory("くるみ", "くるみ", "🌰"),
    mandatory("そば", "そば", "🍜"),
    mandatory("落花生", "落花生（ピーナッツ）", "🥜"),
];

pub const RECOMMENDED: [Allergen; 20] = [
    recommended("アーモンド"),
    recommended("あわび"),
    recommended("いか"),
    recommended("いくら"),
    recommended("オレンジ"),
    recommended("カシューナッツ"),
    recommended("キウイフルーツ"),
    recommended("牛肉"),
    recommended("ごま"),
    recommended("さけ"),
    recommended("さば"),
    recommended("大豆"),
    recommended("鶏肉"),
    recommended("バナナ"),
    recommended("豚肉"),
    recommended("まつたけ"),
    recommended("もも"),
    recommended("やまいも"),
    recommended("りんご"),
    recommended("ゼラチン"),
];

/// All catalog entries, mandatory first.
pub fn all() -> impl Iterator<Item = &'static Allergen> {
    MANDATORY.iter().chain(RECOMMENDED.iter())
}

pub fn lookup(id: &str) -> Option<&'static Allergen> {
    all().find(|a| a.id == id)
}

/// False for free-text selections the user typed in themselves.
pub fn is_known(id: &str) -> bool {
    lookup(id).is_some()
}
