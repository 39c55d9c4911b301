use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;

/// Key holding the raw bar settings.
pub const SETTINGS_OPTION: &str = "fvd_mbb_settings";

#[derive(Debug, Error)]
pub enum OptionStoreError {
    #[error("failed to {action} option store {}: {source}", path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("option store {} is not valid JSON: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("option store {} is not a JSON object", path.display())]
    NotAnObject { path: PathBuf },
}

/// A JSON object file of named option records.
#[derive(Debug, Clone)]
pub struct OptionStore {
    path: PathBuf,
}

impl OptionStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<Map<String, Value>, OptionStoreError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => return Ok(Map::new()),
            Err(source) => {
                return Err(OptionStoreError::Io {
                    action: "read",
                    path: self.path.clone(),
                    source,
                });
            }
        };

        if content.trim().is_empty() {
            return Ok(Map::new());
        }

        match serde_json::from_str(&content) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(_) => Err(OptionStoreError::NotAnObject {
                path: self.path.clone(),
            }),
            Err(source) => Err(OptionStoreError::Json {
                path: self.path.clone(),
                source,
            }),
        }
    }

    fn write_all(&self, map: Map<String, Value>) -> Result<(), OptionStoreError> {
        let io_error = |source: std::io::Error| OptionStoreError::Io {
            action: "write",
            path: self.path.clone(),
            source,
        };
        let content = serde_json::to_vec_pretty(&Value::Object(map))
            .map_err(|error| io_error(std::io::Error::other(error)))?;
        crate::persist::write_atomic(&self.path, &content).map_err(io_error)
    }

    /// The stored record for `key`, or `None` when it was never set.
    pub fn get(&self, key: &str) -> Result<Option<Value>, OptionStoreError> {
        Ok(self.read_all()?.remove(key))
    }

    /// Replace the record for `key`, keeping every other record.
    pub fn set<T: Serialize>(&self, key: &str, value: &T) -> Result<(), OptionStoreError> {
        let value = serde_json::to_value(value).map_err(|source| OptionStoreError::Json {
            path: self.path.clone(),
            source,
        })?;
        let mut map = self.read_all()?;
        map.insert(key.to_string(), value);
        self.write_all(map)
    }

    /// Remove the record for `key`. Returns whether it existed.
    pub fn delete(&self, key: &str) -> Result<bool, OptionStoreError> {
        let mut map = self.read_all()?;
        if map.remove(key).is_none() {
            return Ok(false);
        }
        self.write_all(map)?;
        Ok(true)
    }
}
