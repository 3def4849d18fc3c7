//! Catalog operations shared by the HTTP handlers and the CLI tools.
//!
//! Every call loads a fresh snapshot from the store. Updates hold a process-wide lock for
//! the whole load, mutate, save sequence so two writers can't overwrite each other's changes.
//! Processes sharing one data file are not coordinated.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, PoisonError};

use log::{debug, info};
use mob_data::{MobName, MobPatch, MobRecord, PatchError};
use serde_json::Value;
use thiserror::Error;

use crate::mob_search::{SearchError, find_mob};
use crate::store::MobStore;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Mob '{0}' not found.")]
    NotFound(String),
    #[error(transparent)]
    Patch(#[from] PatchError),
    #[error(transparent)]
    Search(#[from] SearchError),
    #[error("mob catalog storage failed: {0:#}")]
    Store(#[from] anyhow::Error),
}

/// Front door to a [`MobStore`].
pub struct CatalogService {
    store: Arc<dyn MobStore>,
    write_lock: Mutex<()>,
}

impl CatalogService {
    pub fn new(store: Arc<dyn MobStore>) -> Self {
        Self {
            store,
            write_lock: Mutex::new(()),
        }
    }

    /// Every record, keyed and ordered by canonical name.
    ///
    /// # Errors
    /// Returns `CatalogError::Store` if the catalog cannot be loaded.
    pub fn list_sorted(&self) -> Result<BTreeMap<MobName, MobRecord>, CatalogError> {
        let catalog = self.store.load()?;
        Ok(catalog.into_iter().collect())
    }

    /// Resolve a name or synonym to its canonical mob.
    ///
    /// # Errors
    /// `EmptyTerm` for a blank term, `NoMatchingName` if nothing matches, or a store failure.
    pub fn lookup(&self, term: &str) -> Result<(MobName, MobRecord), CatalogError> {
        if term.trim().is_empty() {
            return Err(SearchError::EmptyTerm.into());
        }
        let catalog = self.store.load()?;
        let (name, record) = find_mob(&catalog, term)?;
        Ok((name.to_string(), record.clone()))
    }

    /// Apply an update body to an existing mob and persist the catalog.
    ///
    /// `body` is `None` when the request carried no usable JSON. The mob's existence is
    /// checked before the body, so an unknown name reports not-found even with a bad body.
    ///
    /// # Errors
    /// `NotFound` for an unknown name, `Patch` for a rejected body, or a store failure.
    /// Nothing is written unless the whole body is valid.
    pub fn update(&self, name: &str, body: Option<&Value>) -> Result<MobRecord, CatalogError> {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);

        let mut catalog = self.store.load()?;
        let Some(record) = catalog.get_mut(name) else {
            return Err(CatalogError::NotFound(name.to_string()));
        };
        let body = body.ok_or_else(|| PatchError::InvalidPayload("request body is missing or not JSON".into()))?;
        let patch = MobPatch::from_json(body)?;
        if !patch.ignored.is_empty() {
            debug!("ignoring read-only or unknown fields for '{name}': {:?}", patch.ignored);
        }

        let fields = patch.fields();
        record.apply(patch);
        let updated = record.clone();
        self.store.save(&catalog)?;

        let changed = fields.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ");
        info!("mob '{name}' updated ({changed})");
        Ok(updated)
    }
}
