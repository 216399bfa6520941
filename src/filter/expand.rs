use crate::config::SynonymMap;
use std::collections::BTreeSet;

/// The set of lowercase terms that must not appear in any returned recipe's
/// ingredients for one request. Derived per request, never persisted.
///
/// Backed by an ordered set so that expression construction downstream is
/// deterministic for a given input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExclusionSet(BTreeSet<String>);

impl ExclusionSet {
    pub fn insert(&mut self, term: impl Into<String>) {
        self.0.insert(term.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn contains(&self, term: &str) -> bool {
        self.0.contains(term)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> + '_ {
        self.0.iter().map(String::as_str)
    }

    /// True if any excluded term occurs in `text` as a case-insensitive
    /// substring. This is the checkable form of the safety invariant.
    pub fn matches(&self, text: &str) -> bool {
        let haystack = text.to_lowercase();
        self.0.iter().any(|term| haystack.contains(term.as_str()))
    }
}

impl FromIterator<String> for ExclusionSet {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        ExclusionSet(iter.into_iter().collect())
    }
}

/// Expand declared allergens into the full exclusion set.
///
/// Each allergen is trimmed and lowercased, then matched against every
/// dictionary key with a bidirectional substring test; a hit pulls in that
/// key's whole derivative list. The match is purely syntactic by design:
/// "egg" hitting a key "eggplant" is accepted behavior, not filtered out.
pub fn expand(allergens: &[String], synonyms: &SynonymMap) -> ExclusionSet {
    let mut exclusions = ExclusionSet::default();

    for allergen in allergens {
        let normalized = allergen.trim().to_lowercase();
        exclusions.insert(normalized.clone());

        for (key, derivatives) in synonyms.iter() {
            if key.contains(&normalized) || normalized.contains(key) {
                for term in derivatives {
                    exclusions.insert(term.clone());
                }
            }
        }
    }

    exclusions
}

#[cfg(test)]
mod tests {
    use super::*;

    fn milk_map() -> SynonymMap {
        [(
            "milk".to_string(),
            vec![
                "butter".to_string(),
                "cheese".to_string(),
                "cream".to_string(),
            ],
        )]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_expand_milk() {
        let exclusions = expand(&["milk".to_string()], &milk_map());

        let expected: ExclusionSet = ["milk", "butter", "cheese", "cream"]
            .into_iter()
            .map(String::from)
            .collect();
        assert_eq!(exclusions, expected);
    }

    #[test]
    fn test_empty_allergens_yield_empty_set() {
        let exclusions = expand(&[], &milk_map());
        assert!(exclusions.is_empty());
    }

    #[test]
    fn test_empty_map_yields_normalized_allergens_only() {
        let exclusions = expand(
            &["  Peanuts ".to_string(), "SOY".to_string()],
            &SynonymMap::default(),
        );

        let expected: ExclusionSet = ["peanuts", "soy"].into_iter().map(String::from).collect();
        assert_eq!(exclusions, expected);
    }

    #[test]
    fn test_substring_match_is_bidirectional() {
        let map: SynonymMap = [(
            "eggplant".to_string(),
            vec!["aubergine".to_string()],
        )]
        .into_iter()
        .collect();

        // allergen is a substring of the key
        let exclusions = expand(&["egg".to_string()], &map);
        assert!(exclusions.contains("aubergine"));

        // key is a substring of the allergen
        let exclusions = expand(&["eggplant parmesan".to_string()], &map);
        assert!(exclusions.contains("aubergine"));
    }

    #[test]
    fn test_unrelated_key_not_expanded() {
        let map: SynonymMap = [
            (
                "milk".to_string(),
                vec!["butter".to_string()],
            ),
            (
                "fish".to_string(),
                vec!["anchovy".to_string()],
            ),
        ]
        .into_iter()
        .collect();

        let exclusions = expand(&["milk".to_string()], &map);
        assert!(exclusions.contains("butter"));
        assert!(!exclusions.contains("anchovy"));
    }

    #[test]
    fn test_matches_is_case_insensitive_substring() {
        let exclusions: ExclusionSet = ["peanut".to_string()].into_iter().collect();

        assert!(exclusions.matches("bread, Peanut Butter, jelly"));
        assert!(exclusions.matches("chopped PEANUTS"));
        assert!(!exclusions.matches("lettuce, tomato, olive oil"));
    }
}
