use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use log::debug;

use crate::environment::capability::{CapabilityProbe, StaticCapabilities};
use crate::environment::config::{ConfigFormat, ConfigMap};
use crate::environment::error::EnvironmentSystemError;
use crate::environment::snapshot::EnvironmentSnapshot;

struct ConfigSource {
    path: PathBuf,
    required: bool,
}

/// Declares where environment values come from and how to detect
/// capabilities.
///
/// Precedence, lowest to highest: programmatic defaults, configuration
/// files in the order added, then the per-run overrides passed to `build`.
/// An optional file that does not exist is skipped; a required one fails
/// the build.
pub struct EnvironmentSources {
    defaults: ConfigMap,
    files: Vec<ConfigSource>,
    capabilities: Arc<dyn CapabilityProbe>,
}

impl fmt::Debug for EnvironmentSources {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnvironmentSources")
            .field("defaults", &self.defaults)
            .field("files", &self.files.len())
            .finish_non_exhaustive()
    }
}

impl EnvironmentSources {
    pub fn new() -> Self {
        Self {
            defaults: ConfigMap::new(),
            files: Vec::new(),
            capabilities: Arc::new(StaticCapabilities::new()),
        }
    }

    /// Set a default value, overridable by files and run overrides
    pub fn with_default(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.defaults.insert(key, value);
        self
    }

    /// Add a configuration file that must exist
    pub fn with_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.files.push(ConfigSource {
            path: path.into(),
            required: true,
        });
        self
    }

    /// Add a configuration file that is skipped when absent
    pub fn with_optional_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.files.push(ConfigSource {
            path: path.into(),
            required: false,
        });
        self
    }

    /// Replace the capability probe
    pub fn with_probe(mut self, probe: impl CapabilityProbe + 'static) -> Self {
        self.capabilities = Arc::new(probe);
        self
    }

    /// Merge all sources into an immutable snapshot for one run.
    pub fn build(&self, overrides: &ConfigMap) -> Result<EnvironmentSnapshot, EnvironmentSystemError> {
        let mut merged = self.defaults.clone();
        for source in &self.files {
            match std::fs::read_to_string(&source.path) {
                Ok(text) => {
                    let format = ConfigFormat::from_path(&source.path)
                        .ok_or_else(|| EnvironmentSystemError::UnsupportedFormat(source.path.clone()))?;
                    let parsed = ConfigMap::deserialize(&text, format)?;
                    debug!(
                        "Loaded {} configuration value(s) from '{}'",
                        parsed.len(),
                        source.path.display()
                    );
                    merged.merge(&parsed);
                }
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                    if source.required {
                        return Err(EnvironmentSystemError::FileNotFound(source.path.clone()));
                    }
                    debug!(
                        "Optional configuration file '{}' not present, skipping",
                        source.path.display()
                    );
                }
                Err(e) => {
                    return Err(EnvironmentSystemError::io(e, "read", source.path.clone()));
                }
            }
        }
        merged.merge(overrides);
        Ok(EnvironmentSnapshot::new(merged, self.capabilities.clone()))
    }
}

impl Default for EnvironmentSources {
    fn default() -> Self {
        Self::new()
    }
}
