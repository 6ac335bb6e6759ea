use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::{ModelError, ModelResult};

/// Defines how a configured value set is tested against one candidate value.
///
/// Every variant is a pure predicate: identical inputs always yield
/// identical results and there are no side effects. New variants are
/// additions to this enum; call sites dispatch through [`Self::is_match`]
/// and never change.
///
/// Variants:
/// - `Contains`: the configured set is non-empty and contains the candidate.
/// - `NotContains`: the configured set is non-empty and does not contain it.
/// - `Exact`: the configured set holds exactly one value equal to the candidate.
/// - `Prefix`: some configured value is a prefix of the candidate.
#[derive(Default, Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ValueMatchStrategy {
    /// Membership test against the configured set.
    #[default]
    Contains,
    /// Inverted membership test; an empty configured set never matches.
    NotContains,
    /// Single-value equality.
    Exact,
    /// Prefix test, first match wins.
    Prefix,
}

impl ValueMatchStrategy {
    /// Test `candidate` against `configured` under this strategy.
    pub fn is_match(&self, configured: &[String], candidate: &str) -> bool {
        match self {
            ValueMatchStrategy::Contains => {
                !configured.is_empty() && configured.iter().any(|v| v == candidate)
            }
            ValueMatchStrategy::NotContains => {
                !configured.is_empty() && !configured.iter().any(|v| v == candidate)
            }
            ValueMatchStrategy::Exact => {
                configured.len() == 1 && configured[0] == candidate
            }
            ValueMatchStrategy::Prefix => {
                configured.iter().any(|v| candidate.starts_with(v.as_str()))
            }
        }
    }
}

impl FromStr for ValueMatchStrategy {
    type Err = ModelError;
    fn from_str(s: &str) -> ModelResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "contains" | "in" => Ok(ValueMatchStrategy::Contains),
            "not-contains" | "not-in" => Ok(ValueMatchStrategy::NotContains),
            "exact" | "equals" => Ok(ValueMatchStrategy::Exact),
            "prefix" => Ok(ValueMatchStrategy::Prefix),
            other => Err(ModelError::UnknownStrategy(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ValueMatchStrategy;

    fn vals(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn contains_requires_non_empty_set() {
        let s = ValueMatchStrategy::Contains;
        assert!(s.is_match(&vals(&["a", "b"]), "a"));
        assert!(!s.is_match(&vals(&["a", "b"]), "c"));
        assert!(!s.is_match(&[], "a"));
    }

    #[test]
    fn not_contains_requires_non_empty_set() {
        let s = ValueMatchStrategy::NotContains;
        assert!(s.is_match(&vals(&["a", "b"]), "c"));
        assert!(!s.is_match(&vals(&["a", "b"]), "a"));
        assert!(!s.is_match(&[], "c"));
    }

    #[test]
    fn exact_needs_single_equal_value() {
        let s = ValueMatchStrategy::Exact;
        assert!(s.is_match(&vals(&["a"]), "a"));
        assert!(!s.is_match(&vals(&["a", "a"]), "a"));
        assert!(!s.is_match(&vals(&["b"]), "a"));
        assert!(!s.is_match(&[], "a"));
    }

    #[test]
    fn prefix_matches_any_configured_prefix() {
        let s = ValueMatchStrategy::Prefix;
        assert!(s.is_match(&vals(&["v1", "v2"]), "v2.3.1"));
        assert!(!s.is_match(&vals(&["v3"]), "v2.3.1"));
        assert!(!s.is_match(&[], "v2.3.1"));
    }

    #[test]
    fn strategies_are_pure() {
        let s = ValueMatchStrategy::Contains;
        let configured = vals(&["x"]);
        let first = s.is_match(&configured, "x");
        for _ in 0..10 {
            assert_eq!(s.is_match(&configured, "x"), first);
        }
        assert_eq!(configured, vals(&["x"]));
    }

    #[test]
    fn parses_aliases() {
        assert_eq!(
            "in".parse::<ValueMatchStrategy>().unwrap(),
            ValueMatchStrategy::Contains
        );
        assert_eq!(
            "NOT-IN".parse::<ValueMatchStrategy>().unwrap(),
            ValueMatchStrategy::NotContains
        );
        assert_eq!(
            "equals".parse::<ValueMatchStrategy>().unwrap(),
            ValueMatchStrategy::Exact
        );
        assert!("fuzzy".parse::<ValueMatchStrategy>().is_err());
    }
}
