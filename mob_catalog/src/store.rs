//! Persistence for the mob catalog.
//!
//! The whole catalog is read on every request and rewritten on every successful update.
//! Writes go to a temp file in the target directory which is then renamed over the old
//! file, so a failed write leaves the previous contents in place.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use anyhow::{Context, Result};
use log::{debug, info};
use mob_data::MobCatalog;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use tempfile::NamedTempFile;

/// Source of truth for the catalog. Handlers get one of these injected rather than
/// reaching for a global.
pub trait MobStore: Send + Sync {
    /// Read the full catalog. A store that has never been written is empty, not an error.
    ///
    /// # Errors
    /// Returns an error if the backing data exists but cannot be read or parsed.
    fn load(&self) -> Result<MobCatalog>;

    /// Replace the stored catalog with `catalog`. There is no merge.
    ///
    /// # Errors
    /// Returns an error if the catalog cannot be serialized or written.
    fn save(&self, catalog: &MobCatalog) -> Result<()>;
}

/// Catalog kept in a single pretty-printed UTF-8 JSON file.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Directory the temp file is created in; must be on the same filesystem as the target.
    fn parent_dir(&self) -> &Path {
        match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        }
    }
}

impl MobStore for JsonFileStore {
    fn load(&self) -> Result<MobCatalog> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!("no catalog at '{}', starting empty", self.path.display());
                return Ok(MobCatalog::new());
            },
            Err(err) => {
                return Err(err).with_context(|| format!("reading mob catalog {}", self.path.display()));
            },
        };
        let catalog: MobCatalog =
            serde_json::from_str(&raw).with_context(|| format!("parsing mob catalog {}", self.path.display()))?;
        debug!("{} mobs loaded from '{}'", catalog.len(), self.path.display());
        Ok(catalog)
    }

    fn save(&self, catalog: &MobCatalog) -> Result<()> {
        let text = to_pretty_json(catalog)?;
        let dir = self.parent_dir();
        let mut tmp =
            NamedTempFile::new_in(dir).with_context(|| format!("creating temp file in {}", dir.display()))?;
        tmp.write_all(text.as_bytes())
            .with_context(|| format!("writing temp file for {}", self.path.display()))?;
        tmp.as_file()
            .sync_all()
            .with_context(|| format!("flushing temp file for {}", self.path.display()))?;
        // The temp file is created owner-only; carry over whatever mode the catalog already had.
        if let Ok(meta) = fs::metadata(&self.path) {
            tmp.as_file()
                .set_permissions(meta.permissions())
                .with_context(|| format!("copying permissions of {}", self.path.display()))?;
        }
        tmp.persist(&self.path)
            .with_context(|| format!("replacing mob catalog {}", self.path.display()))?;
        info!("{} mobs written to '{}'", catalog.len(), self.path.display());
        Ok(())
    }
}

/// Catalog held in memory. Used by tests and anywhere a scratch catalog is handy.
#[derive(Debug, Default)]
pub struct MemoryStore {
    catalog: Mutex<MobCatalog>,
    saves: Mutex<usize>,
}

impl MemoryStore {
    pub fn new(catalog: MobCatalog) -> Self {
        Self {
            catalog: Mutex::new(catalog),
            saves: Mutex::new(0),
        }
    }

    /// Copy of what is currently stored.
    pub fn snapshot(&self) -> MobCatalog {
        self.catalog.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Number of times `save` has been called.
    pub fn save_count(&self) -> usize {
        *self.saves.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl MobStore for MemoryStore {
    fn load(&self) -> Result<MobCatalog> {
        Ok(self.snapshot())
    }

    fn save(&self, catalog: &MobCatalog) -> Result<()> {
        *self.catalog.lock().unwrap_or_else(PoisonError::into_inner) = catalog.clone();
        *self.saves.lock().unwrap_or_else(PoisonError::into_inner) += 1;
        Ok(())
    }
}

/// Serialize the catalog with four-space indentation and a trailing newline.
///
/// # Errors
/// Returns an error if a record cannot be serialized.
pub fn to_pretty_json(catalog: &MobCatalog) -> Result<String> {
    let mut buf = Vec::new();
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
    catalog.serialize(&mut ser).context("serializing mob catalog")?;
    buf.push(b'\n');
    String::from_utf8(buf).context("mob catalog serialized to invalid UTF-8")
}
