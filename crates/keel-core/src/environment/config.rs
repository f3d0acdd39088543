use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json;
#[cfg(feature = "yaml-config")]
use serde_yaml;
#[cfg(feature = "toml-config")]
use toml;

use crate::environment::error::EnvironmentSystemError;

/// Supported configuration file formats
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConfigFormat {
    /// JSON format (.json)
    Json,
    /// YAML format (.yaml, .yml) - requires "yaml-config" feature
    #[cfg(feature = "yaml-config")]
    Yaml,
    /// TOML format (.toml) - requires "toml-config" feature
    #[cfg(feature = "toml-config")]
    Toml,
}

impl ConfigFormat {
    /// Get the file extension for this format
    pub fn extension(&self) -> &'static str {
        match self {
            ConfigFormat::Json => "json",
            #[cfg(feature = "yaml-config")]
            ConfigFormat::Yaml => "yaml",
            #[cfg(feature = "toml-config")]
            ConfigFormat::Toml => "toml",
        }
    }

    /// Determine format from file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| match ext.to_lowercase().as_str() {
                "json" => Some(ConfigFormat::Json),
                #[cfg(feature = "yaml-config")]
                "yaml" | "yml" => Some(ConfigFormat::Yaml),
                #[cfg(feature = "toml-config")]
                "toml" => Some(ConfigFormat::Toml),
                _ => None,
            })
    }
}

/// In-memory configuration values consulted by conditions during bootstrap.
///
/// Keys are flat strings; [`ConfigMap::lookup`] additionally walks dotted
/// keys (`output.json`) through nested objects, so properties-style lookups
/// work against structured TOML/YAML/JSON documents.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigMap {
    /// Raw configuration values
    #[serde(flatten)]
    values: HashMap<String, serde_json::Value>,
}

impl ConfigMap {
    /// Create a new empty configuration
    pub fn new() -> Self {
        Self {
            values: HashMap::new(),
        }
    }

    /// Create a configuration from a HashMap
    pub fn from_hashmap(values: HashMap<String, serde_json::Value>) -> Self {
        Self { values }
    }

    /// Find the raw value for a key: exact match first, then a dotted-path
    /// walk through nested objects.
    pub fn lookup(&self, key: &str) -> Option<&serde_json::Value> {
        if let Some(value) = self.values.get(key) {
            return Some(value);
        }
        let mut segments = key.split('.');
        let mut current = self.values.get(segments.next()?)?;
        for segment in segments {
            current = current.as_object()?.get(segment)?;
        }
        Some(current)
    }

    /// Get a configuration value
    pub fn get<T: for<'de> Deserialize<'de>>(&self, key: &str) -> Option<T> {
        self.lookup(key)
            .and_then(|value| serde_json::from_value(value.clone()).ok())
    }

    /// Get a configuration value with default
    pub fn get_or<T: for<'de> Deserialize<'de>>(&self, key: &str, default: T) -> T {
        self.get(key).unwrap_or(default)
    }

    /// Interpret a value as a flag. Booleans are taken as-is; the strings
    /// `"true"`/`"1"` and `"false"`/`"0"` coerce, so properties-style files
    /// behave like typed ones.
    pub fn get_flag(&self, key: &str) -> Option<bool> {
        match self.lookup(key)? {
            serde_json::Value::Bool(flag) => Some(*flag),
            serde_json::Value::String(text) => match text.trim() {
                "true" | "1" => Some(true),
                "false" | "0" => Some(false),
                _ => None,
            },
            _ => None,
        }
    }

    /// Set a configuration value
    pub fn set<T: Serialize>(&mut self, key: &str, value: T) -> Result<(), EnvironmentSystemError> {
        match serde_json::to_value(value) {
            Ok(json_value) => {
                self.values.insert(key.to_string(), json_value);
                Ok(())
            }
            Err(e) => Err(EnvironmentSystemError::Serialization {
                format: "json".to_string(),
                source: Box::new(e),
            }),
        }
    }

    /// Insert a pre-built JSON value (infallible `set`)
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) {
        self.values.insert(key.into(), value.into());
    }

    /// Remove a configuration value
    pub fn remove(&mut self, key: &str) -> Option<serde_json::Value> {
        self.values.remove(key)
    }

    /// Check if key exists (exact or dotted)
    pub fn contains_key(&self, key: &str) -> bool {
        self.lookup(key).is_some()
    }

    /// Get all top-level keys
    pub fn keys(&self) -> Vec<String> {
        self.values.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Merge with another config, overriding existing values
    pub fn merge(&mut self, other: &ConfigMap) {
        for (key, value) in &other.values {
            self.values.insert(key.clone(), value.clone());
        }
    }

    /// Serialize to string based on format
    pub fn serialize(&self, format: ConfigFormat) -> Result<String, EnvironmentSystemError> {
        match format {
            ConfigFormat::Json => {
                serde_json::to_string_pretty(&self).map_err(|e| {
                    EnvironmentSystemError::Serialization {
                        format: "json".to_string(),
                        source: Box::new(e),
                    }
                })
            }
            #[cfg(feature = "yaml-config")]
            ConfigFormat::Yaml => {
                serde_yaml::to_string(&self).map_err(|e| EnvironmentSystemError::Serialization {
                    format: "yaml".to_string(),
                    source: Box::new(e),
                })
            }
            #[cfg(feature = "toml-config")]
            ConfigFormat::Toml => {
                toml::to_string_pretty(&self).map_err(|e| EnvironmentSystemError::Serialization {
                    format: "toml".to_string(),
                    source: Box::new(e),
                })
            }
        }
    }

    /// Deserialize from string based on format
    pub fn deserialize(data: &str, format: ConfigFormat) -> Result<Self, EnvironmentSystemError> {
        match format {
            ConfigFormat::Json => {
                serde_json::from_str(data).map_err(|e| EnvironmentSystemError::Deserialization {
                    format: "json".to_string(),
                    source: Box::new(e),
                })
            }
            #[cfg(feature = "yaml-config")]
            ConfigFormat::Yaml => {
                serde_yaml::from_str(data).map_err(|e| EnvironmentSystemError::Deserialization {
                    format: "yaml".to_string(),
                    source: Box::new(e),
                })
            }
            #[cfg(feature = "toml-config")]
            ConfigFormat::Toml => {
                toml::from_str(data).map_err(|e| EnvironmentSystemError::Deserialization {
                    format: "toml".to_string(),
                    source: Box::new(e),
                })
            }
        }
    }
}
