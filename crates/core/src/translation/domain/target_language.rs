use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Closed set of languages a transcript can be translated into.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TargetLanguage {
    #[default]
    #[serde(rename = "zh-tw")]
    TraditionalChinese,
}

impl TargetLanguage {
    pub const ALL: &[TargetLanguage] = &[TargetLanguage::TraditionalChinese];

    /// Short identifier accepted on the command line and in settings files.
    pub fn key(&self) -> &'static str {
        match self {
            TargetLanguage::TraditionalChinese => "zh-tw",
        }
    }

    /// Human-readable label shown to the user.
    pub fn label(&self) -> &'static str {
        match self {
            TargetLanguage::TraditionalChinese => "Traditional Chinese",
        }
    }

    /// Name of the language as written into the translation prompt.
    pub fn prompt_name(&self) -> &'static str {
        match self {
            TargetLanguage::TraditionalChinese => "繁體中文",
        }
    }

    /// Whether translated text must pass through the script normalizer.
    pub fn requires_script_normalization(&self) -> bool {
        match self {
            TargetLanguage::TraditionalChinese => true,
        }
    }
}

impl fmt::Display for TargetLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for TargetLanguage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        TargetLanguage::ALL
            .iter()
            .copied()
            .find(|lang| lang.key() == wanted || lang.label().to_lowercase() == wanted)
            .ok_or_else(|| {
                let keys: Vec<&str> = TargetLanguage::ALL.iter().map(|l| l.key()).collect();
                format!(
                    "unsupported target language '{s}', expected one of: {}",
                    keys.join(", ")
                )
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::key("zh-tw")]
    #[case::upper_key("ZH-TW")]
    #[case::label("Traditional Chinese")]
    #[case::padded("  zh-tw ")]
    fn test_parse_traditional_chinese(#[case] input: &str) {
        assert_eq!(
            input.parse::<TargetLanguage>().unwrap(),
            TargetLanguage::TraditionalChinese
        );
    }

    #[test]
    fn test_parse_unknown_lists_choices() {
        let err = "klingon".parse::<TargetLanguage>().unwrap_err();
        assert!(err.contains("klingon"));
        assert!(err.contains("zh-tw"));
    }

    #[test]
    fn test_display_uses_label() {
        assert_eq!(
            TargetLanguage::TraditionalChinese.to_string(),
            "Traditional Chinese"
        );
    }

    #[test]
    fn test_serde_uses_key() {
        let json = serde_json::to_string(&TargetLanguage::TraditionalChinese).unwrap();
        assert_eq!(json, "\"zh-tw\"");
        let parsed: TargetLanguage = serde_json::from_str("\"zh-tw\"").unwrap();
        assert_eq!(parsed, TargetLanguage::TraditionalChinese);
    }

    #[test]
    fn test_all_languages_have_distinct_keys() {
        let mut keys: Vec<&str> = TargetLanguage::ALL.iter().map(|l| l.key()).collect();
        keys.sort();
        keys.dedup();
        assert_eq!(keys.len(), TargetLanguage::ALL.len());
    }
}
