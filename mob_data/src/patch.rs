//! Partial updates to a mob record.
//!
//! Request bodies arrive as untrusted JSON. [`MobPatch::from_json`] checks the whole body
//! before anything is written, so a bad `synonyms` value rejects the update even when other
//! fields in the same body were fine.

use std::fmt;

use serde_json::Value;
use thiserror::Error;

/// Record fields that may be changed through an update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MobField {
    Fte,
    Coth,
    Track,
    Et,
    Synonyms,
}

impl MobField {
    pub const ALL: [MobField; 5] = [
        MobField::Fte,
        MobField::Coth,
        MobField::Track,
        MobField::Et,
        MobField::Synonyms,
    ];

    /// Look up an updatable field by its JSON key. Keys are case-sensitive.
    pub fn from_key(key: &str) -> Option<MobField> {
        match key {
            "fte" => Some(MobField::Fte),
            "coth" => Some(MobField::Coth),
            "track" => Some(MobField::Track),
            "et" => Some(MobField::Et),
            "synonyms" => Some(MobField::Synonyms),
            _ => None,
        }
    }

    pub fn as_key(self) -> &'static str {
        match self {
            MobField::Fte => "fte",
            MobField::Coth => "coth",
            MobField::Track => "track",
            MobField::Et => "et",
            MobField::Synonyms => "synonyms",
        }
    }
}

impl fmt::Display for MobField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_key())
    }
}

/// Reasons an update body is refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatchError {
    #[error("Invalid JSON payload: {0}")]
    InvalidPayload(String),
    #[error("Field '{field}' must be a list of strings.")]
    InvalidFieldType { field: MobField },
}

/// A validated set of field updates for one mob record.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MobPatch {
    pub fte: Option<Value>,
    pub coth: Option<Value>,
    pub track: Option<Value>,
    pub et: Option<Value>,
    /// Already trimmed, with blank entries dropped.
    pub synonyms: Option<Vec<String>>,
    /// Keys present in the body that aren't updatable. Kept for logging only.
    pub ignored: Vec<String>,
}

impl MobPatch {
    /// Validate an update body and turn it into a patch.
    ///
    /// ```
    /// use mob_data::{MobPatch, PatchError};
    /// use serde_json::json;
    ///
    /// let patch = MobPatch::from_json(&json!({
    ///     "synonyms": ["  Foo ", "", "Bar"],
    ///     "location": "ignored",
    /// }))
    /// .unwrap();
    /// assert_eq!(patch.synonyms, Some(vec!["Foo".to_string(), "Bar".to_string()]));
    /// assert_eq!(patch.ignored, vec!["location".to_string()]);
    ///
    /// let err = MobPatch::from_json(&json!({ "synonyms": ["ok", 5] })).unwrap_err();
    /// assert!(matches!(err, PatchError::InvalidFieldType { .. }));
    /// ```
    ///
    /// # Errors
    /// `InvalidPayload` if the body isn't a non-empty JSON object, `InvalidFieldType` if
    /// `synonyms` isn't an array made entirely of strings.
    pub fn from_json(body: &Value) -> Result<MobPatch, PatchError> {
        let Some(fields) = body.as_object() else {
            return Err(PatchError::InvalidPayload(format!(
                "expected a JSON object, got {}",
                json_kind(body)
            )));
        };
        if fields.is_empty() {
            return Err(PatchError::InvalidPayload("no fields supplied".to_string()));
        }

        let mut patch = MobPatch::default();
        for (key, value) in fields {
            let Some(field) = MobField::from_key(key) else {
                patch.ignored.push(key.clone());
                continue;
            };
            match field {
                MobField::Fte => patch.fte = Some(value.clone()),
                MobField::Coth => patch.coth = Some(value.clone()),
                MobField::Track => patch.track = Some(value.clone()),
                MobField::Et => patch.et = Some(value.clone()),
                MobField::Synonyms => patch.synonyms = Some(clean_synonyms(value)?),
            }
        }
        Ok(patch)
    }

    /// Updatable fields this patch will change, in declaration order.
    pub fn fields(&self) -> Vec<MobField> {
        MobField::ALL
            .into_iter()
            .filter(|field| match field {
                MobField::Fte => self.fte.is_some(),
                MobField::Coth => self.coth.is_some(),
                MobField::Track => self.track.is_some(),
                MobField::Et => self.et.is_some(),
                MobField::Synonyms => self.synonyms.is_some(),
            })
            .collect()
    }
}

/// Trim every synonym and drop the ones left empty. Any non-string element rejects the list.
fn clean_synonyms(value: &Value) -> Result<Vec<String>, PatchError> {
    let invalid = || PatchError::InvalidFieldType {
        field: MobField::Synonyms,
    };
    let entries = value.as_array().ok_or_else(invalid)?;
    let mut cleaned = Vec::with_capacity(entries.len());
    for entry in entries {
        let text = entry.as_str().ok_or_else(invalid)?;
        let trimmed = text.trim();
        if !trimmed.is_empty() {
            cleaned.push(trimmed.to_string());
        }
    }
    Ok(cleaned)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
