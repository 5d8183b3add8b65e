use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Outcome of a judgment.
///
/// Variants are declared in ascending severity so the derived `Ord` gives
/// `Success < Warning < Danger`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    /// No selected allergen detected.
    Success,
    /// Uncertain, or cross-contact risk during manufacturing.
    Warning,
    /// A selected allergen is confirmed present.
    Danger,
}

impl Verdict {
    pub const ALL: [Verdict; 3] = [Verdict::Success, Verdict::Warning, Verdict::Danger];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Danger => "danger",
        }
    }

    /// True if `self` is strictly more severe than `other`.
    pub fn is_worse_than(&self, other: Verdict) -> bool {
        *self > other
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Verdict {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "success" => Ok(Self::Success),
            "warning" => Ok(Self::Warning),
            "danger" => Ok(Self::Danger),
            other => Err(format!(
                "unknown verdict \"{other}\" (expected success, warning or danger)"
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_ordering() {
        assert!(Verdict::Danger > Verdict::Warning);
        assert!(Verdict::Warning > Verdict::Success);
        assert!(Verdict::Danger.is_worse_than(Verdict::Success));
        assert!(!Verdict::Success.is_worse_than(Verdict::Success));
    }

    #[test]
    fn parse_and_display_agree() {
        for v in Verdict::ALL {
            assert_eq!(v.to_string().parse::<Verdict>().unwrap(), v);
        }
    }

    #[test]
    fn parse_rejects_unknown() {
        let err = "dangerous".parse::<Verdict>().unwrap_err();
        assert!(err.contains("dangerous"));
    }

    #[test]
    fn serde_uses_lowercase() {
        assert_eq!(serde_json::to_string(&Verdict::Warning).unwrap(), "\"warning\"");
        let v: Verdict = serde_json::from_str("\"danger\"").unwrap();
        assert_eq!(v, Verdict::Danger);
    }
}
