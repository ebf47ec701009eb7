use crate::error::ShareResult;
use crate::models::ConfigFetch;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// The one persisted record per installation. Written only as a whole:
/// either the previous configuration is visible or the new one, never a
/// mix.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ShareConfig {
    #[serde(default)]
    pub api_url: Option<String>,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub share_name: Option<String>,
    #[serde(default)]
    pub icon_url: Option<String>,
    #[serde(default)]
    pub post_endpoint: Option<String>,
    #[serde(default)]
    pub delivery_key: Option<String>,
}

impl ShareConfig {
    /// The app is configured iff a submission endpoint is known.
    pub fn is_configured(&self) -> bool {
        self.post_endpoint
            .as_deref()
            .map_or(false, |endpoint| !endpoint.is_empty())
    }
}

fn non_empty(value: String) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

/// File-backed store for the [`ShareConfig`] record.
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the persisted record. A missing or unreadable file yields the
    /// default (unconfigured) record.
    pub fn load(&self) -> ShareConfig {
        if !self.path.exists() {
            return ShareConfig::default();
        }

        match fs::read_to_string(&self.path) {
            Ok(content) => serde_yaml::from_str(&content).unwrap_or_default(),
            Err(_) => ShareConfig::default(),
        }
    }

    /// Persist the whole record. Written to a sibling temp file and
    /// renamed into place so a crash mid-write never leaves a partial
    /// record visible.
    pub fn save(&self, config: &ShareConfig) -> ShareResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let yaml = serde_yaml::to_string(config)?;
        let tmp = self.path.with_extension("yaml.tmp");
        fs::write(&tmp, yaml)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    /// Remove all persisted fields.
    pub fn clear(&self) -> ShareResult<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// Persist the result of a successful configuration fetch as one
    /// unit, replacing every field.
    pub fn apply_fetch(
        &self,
        fetch: &ConfigFetch,
        api_key: Option<&str>,
    ) -> ShareResult<ShareConfig> {
        let config = ShareConfig {
            api_url: Some(fetch.config_url.clone()),
            api_key: api_key.map(|k| k.to_string()).and_then(non_empty),
            share_name: non_empty(fetch.name.clone()),
            icon_url: non_empty(fetch.icon.clone()),
            post_endpoint: non_empty(fetch.endpoint.clone()),
            delivery_key: non_empty(fetch.delivery_key.clone()),
        };

        self.save(&config)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_store() -> (tempfile::TempDir, ConfigStore) {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let store = ConfigStore::new(dir.path().join("config.yaml"));
        (dir, store)
    }

    fn sample_fetch() -> ConfigFetch {
        ConfigFetch {
            name: "My List".to_string(),
            icon: String::new(),
            endpoint: "https://example.com/api/share".to_string(),
            delivery_key: "dk-1".to_string(),
            config_url: "https://example.com/api/config".to_string(),
        }
    }

    #[test]
    fn test_missing_file_loads_default() {
        let (_dir, store) = test_store();
        let config = store.load();
        assert_eq!(config, ShareConfig::default());
        assert!(!config.is_configured());
    }

    #[test]
    fn test_save_load_roundtrip() {
        let (_dir, store) = test_store();
        let config = ShareConfig {
            api_url: Some("https://example.com/api/config".to_string()),
            post_endpoint: Some("https://example.com/api/share".to_string()),
            ..Default::default()
        };

        store.save(&config).expect("Failed to save");
        assert_eq!(store.load(), config);
    }

    #[test]
    fn test_apply_fetch_configures_atomically() {
        let (_dir, store) = test_store();
        let config = store
            .apply_fetch(&sample_fetch(), Some("secret"))
            .expect("Failed to apply fetch");

        assert!(config.is_configured());
        assert_eq!(config.api_key.as_deref(), Some("secret"));
        assert_eq!(config.delivery_key.as_deref(), Some("dk-1"));
        // Empty icon is stored as absent
        assert!(config.icon_url.is_none());
        assert_eq!(store.load(), config);
    }

    #[test]
    fn test_clear_unconfigures() {
        let (_dir, store) = test_store();
        store
            .apply_fetch(&sample_fetch(), None)
            .expect("Failed to apply fetch");
        assert!(store.load().is_configured());

        store.clear().expect("Failed to clear");
        assert!(!store.load().is_configured());

        // Clearing an already-empty store is fine
        store.clear().expect("Failed to clear twice");
    }

    #[test]
    fn test_corrupt_file_loads_default() {
        let (_dir, store) = test_store();
        fs::write(store.path(), "{{{ not yaml").expect("Failed to write");
        assert_eq!(store.load(), ShareConfig::default());
    }

    #[test]
    fn test_empty_endpoint_is_not_configured() {
        let config = ShareConfig {
            post_endpoint: Some(String::new()),
            ..Default::default()
        };
        assert!(!config.is_configured());
    }
}
