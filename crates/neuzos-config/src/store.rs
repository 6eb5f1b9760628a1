//! Config store
//!
//! Owns the on-disk document and an in-memory cache of the last loaded or
//! saved value. The store never notifies anyone; callers broadcast changes.

use parking_lot::RwLock;
use serde_json::{Map, Value};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::ConfigError;
use crate::paths::CONFIG_FILE_NAME;
use crate::sanitize::sanitize_document;
use crate::schema::Config;
use crate::Result;

pub struct ConfigStore {
    /// Full path of the JSON document
    path: PathBuf,
    /// Last loaded or saved document
    cache: Arc<RwLock<Option<Config>>>,
}

impl ConfigStore {
    /// Open a store rooted at `dir`, creating the directory if needed.
    ///
    /// This is the only place the directory is created, so `load` stays
    /// read-mostly.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir).map_err(|source| ConfigError::CreateDir {
            path: dir.clone(),
            source,
        })?;

        Ok(Self {
            path: dir.join(CONFIG_FILE_NAME),
            cache: Arc::new(RwLock::new(None)),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Cached document, if any load or save has happened yet.
    pub fn cached(&self) -> Option<Config> {
        self.cache.read().clone()
    }

    /// Load the document.
    ///
    /// Returns the cached value unless `force_reload` is set. A missing file
    /// is replaced by the built-in default. An existing file is merged over
    /// the default per top-level key, sanitized, persisted and cached.
    pub fn load(&self, force_reload: bool) -> Result<Config> {
        if !force_reload {
            if let Some(config) = self.cache.read().clone() {
                return Ok(config);
            }
        }

        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::info!(path = %self.path.display(), "No config found, writing defaults");
                let config = Config::default();
                self.persist_best_effort(&config);
                *self.cache.write() = Some(config.clone());
                return Ok(config);
            }
            Err(e) => return Err(self.read_error(e.to_string())),
        };

        let document: Value =
            serde_json::from_str(&raw).map_err(|e| self.read_error(e.to_string()))?;
        let Value::Object(document) = document else {
            return Err(self.read_error(ConfigError::NotAnObject.to_string()));
        };

        let defaults = Config::default_document();
        let mut merged = merge_over_defaults(&defaults, document);
        sanitize_document(&mut merged, &defaults);

        let config: Config = serde_json::from_value(Value::Object(merged))
            .map_err(|e| self.read_error(e.to_string()))?;

        self.persist_best_effort(&config);
        *self.cache.write() = Some(config.clone());

        tracing::info!(
            path = %self.path.display(),
            sessions = config.sessions.len(),
            layouts = config.layouts.len(),
            key_binds = config.key_binds.len(),
            "Loaded config"
        );

        Ok(config)
    }

    /// Replace the document on disk, then the cache.
    /// Persist a document through the same sanitization pass as `load`,
    /// then swap it into the cache. Returns the document as stored.
    pub fn save(&self, config: &Config) -> Result<Config> {
        let Value::Object(mut document) = serde_json::to_value(config)? else {
            return Err(ConfigError::NotAnObject);
        };
        sanitize_document(&mut document, &Config::default_document());
        let config: Config = serde_json::from_value(Value::Object(document))?;

        self.write_document(&config)?;
        *self.cache.write() = Some(config.clone());
        tracing::info!(path = %self.path.display(), "Saved config");
        Ok(config)
    }

    fn write_document(&self, config: &Config) -> Result<()> {
        let body = serde_json::to_string_pretty(config)?;
        let tmp = self
            .path
            .with_file_name(format!("{}.{}.tmp", CONFIG_FILE_NAME, uuid::Uuid::new_v4()));

        let write_error = |source: std::io::Error| ConfigError::Write {
            path: self.path.clone(),
            source,
        };

        std::fs::write(&tmp, body).map_err(write_error)?;
        if let Err(e) = std::fs::rename(&tmp, &self.path) {
            let _ = std::fs::remove_file(&tmp);
            return Err(write_error(e));
        }
        Ok(())
    }

    fn persist_best_effort(&self, config: &Config) {
        if let Err(e) = self.write_document(config) {
            tracing::warn!("Failed to persist merged config: {}", e);
        }
    }

    fn read_error(&self, reason: String) -> ConfigError {
        ConfigError::Read {
            path: self.path.clone(),
            reason,
        }
    }
}

impl Clone for ConfigStore {
    fn clone(&self) -> Self {
        Self {
            path: self.path.clone(),
            cache: Arc::clone(&self.cache),
        }
    }
}

fn merge_over_defaults(
    defaults: &Map<String, Value>,
    document: Map<String, Value>,
) -> Map<String, Value> {
    let mut merged = defaults.clone();
    for (key, value) in document {
        merged.insert(key, value);
    }
    merged
}
