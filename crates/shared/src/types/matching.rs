//! Description comparison used when reconciling imported movements.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

/// How a movement description is compared against an already-stored one.
///
/// Day and amount always compare exactly. Only the description is affected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchStrategy {
    /// Byte-for-byte equality.
    #[default]
    Exact,
    /// Case, accents, whitespace and punctuation are ignored, so
    /// `"Culto de Adoração- Dizimo"` matches `"culto de adoracao - dízimo"`.
    Normalized,
}

impl MatchStrategy {
    /// Returns the comparison key for a description under this strategy.
    #[must_use]
    pub fn description_key<'a>(self, description: &'a str) -> Cow<'a, str> {
        match self {
            Self::Exact => Cow::Borrowed(description),
            Self::Normalized => Cow::Owned(normalize_description(description)),
        }
    }

    /// Returns true if both descriptions are considered the same.
    #[must_use]
    pub fn same_description(self, left: &str, right: &str) -> bool {
        self.description_key(left) == self.description_key(right)
    }
}

impl std::str::FromStr for MatchStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "exact" => Ok(Self::Exact),
            "normalized" => Ok(Self::Normalized),
            other => Err(format!("unknown match strategy: {other}")),
        }
    }
}

/// Lowercases, folds Portuguese diacritics, and keeps only alphanumerics.
#[must_use]
pub fn normalize_description(description: &str) -> String {
    description
        .chars()
        .flat_map(char::to_lowercase)
        .map(fold_diacritic)
        .filter(|c| c.is_alphanumeric())
        .collect()
}

fn fold_diacritic(c: char) -> char {
    match c {
        'á' | 'à' | 'â' | 'ã' | 'ä' => 'a',
        'é' | 'è' | 'ê' | 'ë' => 'e',
        'í' | 'ì' | 'î' | 'ï' => 'i',
        'ó' | 'ò' | 'ô' | 'õ' | 'ö' => 'o',
        'ú' | 'ù' | 'û' | 'ü' => 'u',
        'ç' => 'c',
        'ñ' => 'n',
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Culto de Adoração- Dizimo", "culto de adoracao - dízimo")]
    #[case("Oferta de10 Reais", "Oferta de 10 Reais")]
    #[case("  Conta de ÁGUA ", "conta de agua")]
    fn test_normalized_matches_variants(#[case] left: &str, #[case] right: &str) {
        assert!(MatchStrategy::Normalized.same_description(left, right));
        assert!(!MatchStrategy::Exact.same_description(left, right));
    }

    #[test]
    fn test_normalized_keeps_distinct_words_apart() {
        assert!(!MatchStrategy::Normalized.same_description("Dízimo", "Oferta"));
    }

    #[test]
    fn test_exact_borrows() {
        assert!(matches!(
            MatchStrategy::Exact.description_key("Luz"),
            Cow::Borrowed("Luz")
        ));
    }

    #[test]
    fn test_strategy_parse_and_serde() {
        assert_eq!("Normalized".parse::<MatchStrategy>(), Ok(MatchStrategy::Normalized));
        assert!("fuzzy".parse::<MatchStrategy>().is_err());
        assert_eq!(MatchStrategy::default(), MatchStrategy::Exact);
        assert_eq!(
            serde_json::to_string(&MatchStrategy::Normalized).unwrap(),
            "\"normalized\""
        );
    }
}
