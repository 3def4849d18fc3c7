use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::patch::{MobField, MobPatch};

/// Canonical mob name. Unique and case-sensitive within a catalog.
pub type MobName = String;

/// Every mob record keyed by canonical name, kept in the order the keys were read.
pub type MobCatalog = IndexMap<MobName, MobRecord>;

/// Metadata tracked for a single mob.
///
/// Stored exactly as read: every key keeps its value (including `null` and shapes this crate
/// doesn't expect) and its position. Updating an existing key keeps it in place; new keys are
/// appended. Only the update path in [`MobPatch`] enforces value shapes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MobRecord {
    fields: Map<String, Value>,
}

impl MobRecord {
    /// Raw value stored under `key`, if any.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Value of an updatable field, if present.
    pub fn field(&self, field: MobField) -> Option<&Value> {
        self.get(field.as_key())
    }

    /// Where the mob lives. Never changed through an update.
    pub fn location(&self) -> Option<&Value> {
        self.get("location")
    }

    /// Synonyms for this mob. Non-string entries and non-list values are skipped.
    pub fn synonyms(&self) -> Vec<&str> {
        match self.field(MobField::Synonyms) {
            Some(Value::Array(entries)) => entries.iter().filter_map(Value::as_str).collect(),
            _ => Vec::new(),
        }
    }

    /// True if `lc_term` (already lowercased) equals any synonym, ignoring case.
    pub fn has_synonym(&self, lc_term: &str) -> bool {
        self.synonyms().iter().any(|syn| syn.to_lowercase() == lc_term)
    }

    /// Every stored key and value, in stored order.
    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    pub fn set(&mut self, field: MobField, value: Value) {
        self.fields.insert(field.as_key().to_string(), value);
    }

    /// Apply a validated patch. Fields the patch doesn't carry are left alone.
    pub fn apply(&mut self, patch: MobPatch) {
        let MobPatch {
            fte,
            coth,
            track,
            et,
            synonyms,
            ..
        } = patch;
        let updates = [
            (MobField::Fte, fte),
            (MobField::Coth, coth),
            (MobField::Track, track),
            (MobField::Et, et),
            (MobField::Synonyms, synonyms.map(|list| list.into_iter().map(Value::String).collect())),
        ];
        for (field, value) in updates {
            if let Some(value) = value {
                self.set(field, value);
            }
        }
    }
}
