use mc::*;
use mob_catalog as mc;
use mob_data::{MobCatalog, MobField, MobRecord};
use serde_json::json;
use std::sync::Arc;

fn catalog() -> MobCatalog {
    serde_json::from_value(json!({
        "Vindictive Spirit": { "location": "Old Chapel", "synonyms": ["vindi", "Ghost"] },
        "Giant Tuna": { "synonyms": ["tuna"], "track": true },
        "Wuoshi": { "location": "Eastern Marsh" }
    }))
    .unwrap()
}

#[test]
fn test_lib_version() {
    assert!(!mc::CATALOG_VERSION.is_empty());
}

#[test]
fn test_find_mob_examples() {
    let catalog = catalog();
    assert_eq!(find_mob(&catalog, "vindi").unwrap().0, "Vindictive Spirit");
    assert_eq!(find_mob(&catalog, "tuna").unwrap().0, "Giant Tuna");
    assert_eq!(find_mob(&catalog, "Wuoshi").unwrap().0, "Wuoshi");
    assert!(matches!(
        find_mob(&catalog, "a non-existent mob"),
        Err(SearchError::NoMatchingName(_))
    ));
}

#[test]
fn test_find_mob_uppercase_names() {
    let catalog = catalog();
    for name in catalog.keys() {
        assert_eq!(find_mob(&catalog, &name.to_uppercase()).unwrap().0, name);
    }
}

#[test]
fn test_service_update_then_lookup() {
    let store = Arc::new(MemoryStore::new(catalog()));
    let service = CatalogService::new(store.clone());

    service
        .update("Wuoshi", Some(&json!({ "synonyms": [" marsh thing "] })))
        .unwrap();
    let (name, record) = service.lookup("MARSH THING").unwrap();
    assert_eq!(name, "Wuoshi");
    assert_eq!(record.location(), Some(&json!("Eastern Marsh")));
    assert_eq!(store.save_count(), 1);
}

#[test]
fn test_location_is_read_only() {
    let store = Arc::new(MemoryStore::new(catalog()));
    let service = CatalogService::new(store.clone());

    let updated = service
        .update("Giant Tuna", Some(&json!({ "location": "Land", "et": "x" })))
        .unwrap();
    assert_eq!(updated.location(), None);
    assert_eq!(updated.field(MobField::Et), Some(&json!("x")));
    assert_eq!(store.snapshot()["Giant Tuna"], updated);
}

#[test]
fn test_default_record_serializes_empty() {
    assert_eq!(serde_json::to_value(MobRecord::default()).unwrap(), json!({}));
}
