//! Mob Search Module
//!
//! Resolves free text (a name someone typed, a nickname, a shout from a channel log) to the
//! canonical mob it refers to. Matching is case-insensitive against both the canonical name
//! and every synonym. The catalog is scanned in its stored order and the first hit wins, so
//! when two mobs share a synonym the one listed first in the file is returned.

use log::debug;
use mob_data::{MobCatalog, MobRecord};
use thiserror::Error;

/// Possible errors / situations causing a failed mob search.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchError {
    #[error("No mob found with the name or synonym '{0}'.")]
    NoMatchingName(String),
    #[error("search term is empty")]
    EmptyTerm,
}

/// Find the mob whose name or synonym matches `term`, ignoring case.
///
/// # Errors
/// `SearchError::NoMatchingName` if nothing in the catalog matches.
pub fn find_mob<'a>(catalog: &'a MobCatalog, term: &str) -> Result<(&'a str, &'a MobRecord), SearchError> {
    let lc_term = term.to_lowercase();
    for (name, record) in catalog {
        if name.to_lowercase() == lc_term {
            debug!("'{term}' matched mob name '{name}'");
            return Ok((name.as_str(), record));
        }
        if record.has_synonym(&lc_term) {
            debug!("'{term}' matched a synonym of '{name}'");
            return Ok((name.as_str(), record));
        }
    }
    Err(SearchError::NoMatchingName(term.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn mob(synonyms: &[&str]) -> MobRecord {
        serde_json::from_value(json!({ "synonyms": synonyms })).unwrap()
    }

    fn catalog() -> MobCatalog {
        let mut catalog = MobCatalog::new();
        catalog.insert("Vindictive Spirit".into(), mob(&["vindi", "Spook"]));
        catalog.insert(
            "Wuoshi".into(),
            serde_json::from_value(json!({ "location": "Eastern Marsh" })).unwrap(),
        );
        catalog.insert("Giant Tuna".into(), mob(&["tuna", "FISH"]));
        catalog.insert("Lesser Tuna".into(), mob(&["tuna"]));
        catalog
    }

    #[test]
    fn every_name_resolves_in_any_case() {
        let catalog = catalog();
        for (name, record) in &catalog {
            for variant in [name.clone(), name.to_uppercase(), name.to_lowercase()] {
                let (found, found_rec) = find_mob(&catalog, &variant).unwrap();
                assert_eq!(found, name);
                assert_eq!(found_rec, record);
            }
        }
    }

    #[test]
    fn every_synonym_resolves_in_any_case() {
        let catalog = catalog();
        for (name, record) in catalog.iter().take(3) {
            for syn in record.synonyms() {
                for variant in [syn.to_string(), syn.to_uppercase(), syn.to_lowercase()] {
                    let (found, _) = find_mob(&catalog, &variant).unwrap();
                    assert_eq!(found, name, "synonym variant '{variant}'");
                }
            }
        }
    }

    #[test]
    fn first_listed_mob_wins_shared_synonym() {
        let catalog = catalog();
        let (found, _) = find_mob(&catalog, "TUNA").unwrap();
        assert_eq!(found, "Giant Tuna");
    }

    #[test]
    fn name_match_checked_before_later_synonyms() {
        let mut catalog = MobCatalog::new();
        catalog.insert("Rat".into(), MobRecord::default());
        catalog.insert("Rat King".into(), mob(&["rat"]));
        assert_eq!(find_mob(&catalog, "rat").unwrap().0, "Rat");
    }

    #[test]
    fn partial_terms_do_not_match() {
        let err = find_mob(&catalog(), "vind").unwrap_err();
        assert_eq!(err, SearchError::NoMatchingName("vind".into()));
    }

    #[test]
    fn unknown_term_is_not_found() {
        let err = find_mob(&catalog(), "a non-existent mob").unwrap_err();
        assert_eq!(err.to_string(), "No mob found with the name or synonym 'a non-existent mob'.");
    }

    #[test]
    fn empty_catalog_finds_nothing() {
        assert!(find_mob(&MobCatalog::new(), "vindi").is_err());
    }
}
