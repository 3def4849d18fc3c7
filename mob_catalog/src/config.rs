//! Server configuration.
//!
//! Settings are layered: built-in defaults, then an optional `catalog.toml`, then
//! `MOB_CATALOG_*` environment variables. Command-line flags are applied last by the binary.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::{info, warn};
use serde::{Deserialize, Serialize};

pub const DEFAULT_CONFIG_FILE: &str = "catalog.toml";
pub const DEFAULT_BIND: &str = "127.0.0.1:5000";
pub const DEFAULT_DATA_FILE: &str = "mobs.json";

pub const ENV_BIND: &str = "MOB_CATALOG_BIND";
pub const ENV_DATA_FILE: &str = "MOB_CATALOG_DATA";
pub const ENV_STATIC_DIR: &str = "MOB_CATALOG_STATIC_DIR";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Address the HTTP server listens on.
    pub bind: SocketAddr,
    /// JSON file holding the mob catalog.
    pub data_file: PathBuf,
    /// Directory of static assets served for any path the API doesn't handle.
    pub static_dir: Option<PathBuf>,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            data_file: PathBuf::from(DEFAULT_DATA_FILE),
            static_dir: None,
        }
    }
}

impl CatalogConfig {
    /// Apply `MOB_CATALOG_*` overrides from the process environment.
    ///
    /// # Errors
    /// Returns an error if `MOB_CATALOG_BIND` is set but isn't a socket address.
    pub fn apply_env(&mut self) -> Result<()> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from any key lookup. Empty values are treated as unset.
    ///
    /// # Errors
    /// Returns an error if the bind override isn't a socket address.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(bind) = get(ENV_BIND) {
            self.bind = bind
                .trim()
                .parse()
                .with_context(|| format!("{ENV_BIND}='{bind}' is not a HOST:PORT address"))?;
        }
        if let Some(path) = get(ENV_DATA_FILE) {
            self.data_file = path.into();
        }
        if let Some(dir) = get(ENV_STATIC_DIR) {
            self.static_dir = Some(dir.into());
        }
        Ok(())
    }
}

/// Load configuration from a TOML file, falling back to defaults on error.
///
/// A missing file is normal and only logged at `info!`; an unreadable or malformed one is
/// logged at `warn!`. This function never fails.
pub fn load_config(toml_path: &Path) -> CatalogConfig {
    if !toml_path.exists() {
        info!("no config at '{}', using defaults", toml_path.display());
        return CatalogConfig::default();
    }
    match try_load_config(toml_path) {
        Ok(config) => {
            info!("configuration loaded from '{}'", toml_path.display());
            config
        },
        Err(e) => {
            warn!(
                "Could not load configuration from '{}': {:#}. Using defaults.",
                toml_path.display(),
                e
            );
            CatalogConfig::default()
        },
    }
}

/// Attempts to load configuration from a TOML file.
///
/// # Errors
/// Returns an error if the file cannot be read or parsed.
fn try_load_config(toml_path: &Path) -> Result<CatalogConfig> {
    let raw = std::fs::read_to_string(toml_path)
        .with_context(|| format!("reading configuration from '{}'", toml_path.display()))?;
    toml::from_str(&raw).with_context(|| format!("parsing configuration from '{}'", toml_path.display()))
}

fn default_bind() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 5000))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn default_bind_matches_constant() {
        assert_eq!(CatalogConfig::default().bind, DEFAULT_BIND.parse::<SocketAddr>().unwrap());
    }

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempdir().unwrap();
        assert_eq!(load_config(&dir.path().join("nope.toml")), CatalogConfig::default());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("catalog.toml");
        fs::write(&path, "data_file = \"data/mobs.json\"\nstatic_dir = \"web\"\n").unwrap();

        let config = load_config(&path);
        assert_eq!(config.data_file, PathBuf::from("data/mobs.json"));
        assert_eq!(config.static_dir, Some(PathBuf::from("web")));
        assert_eq!(config.bind, CatalogConfig::default().bind);
    }

    #[test]
    fn malformed_file_falls_back_to_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("catalog.toml");
        fs::write(&path, "bind = 12").unwrap();
        assert_eq!(load_config(&path), CatalogConfig::default());
    }

    #[test]
    fn overrides_replace_file_values() {
        let vars: HashMap<&str, &str> = HashMap::from([
            (ENV_BIND, "0.0.0.0:8080"),
            (ENV_DATA_FILE, "/srv/mobs.json"),
            (ENV_STATIC_DIR, ""),
        ]);
        let mut config = CatalogConfig::default();
        config
            .apply_overrides(|key| vars.get(key).map(|v| (*v).to_string()))
            .unwrap();

        assert_eq!(config.bind, "0.0.0.0:8080".parse::<SocketAddr>().unwrap());
        assert_eq!(config.data_file, PathBuf::from("/srv/mobs.json"));
        assert_eq!(config.static_dir, None);
    }

    #[test]
    fn bad_bind_override_is_an_error() {
        let mut config = CatalogConfig::default();
        let err = config
            .apply_overrides(|key| (key == ENV_BIND).then(|| "localhost".to_string()))
            .unwrap_err();
        assert!(err.to_string().contains(ENV_BIND));
    }
}
