use std::fmt;
use std::sync::Arc;

use serde::Deserialize;

use crate::environment::capability::{CapabilityProbe, StaticCapabilities};
use crate::environment::config::ConfigMap;

/// Immutable view of the host environment for one bootstrap run.
///
/// Carries the fully merged configuration values and the capability probe.
/// Built once per run by [`super::EnvironmentSources::build`] and never
/// mutated afterwards; conditions receive it by shared reference.
pub struct EnvironmentSnapshot {
    values: ConfigMap,
    capabilities: Arc<dyn CapabilityProbe>,
}

impl fmt::Debug for EnvironmentSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnvironmentSnapshot")
            .field("values", &self.values)
            .finish_non_exhaustive()
    }
}

impl EnvironmentSnapshot {
    pub fn new(values: ConfigMap, capabilities: Arc<dyn CapabilityProbe>) -> Self {
        Self {
            values,
            capabilities,
        }
    }

    /// Snapshot over bare values with nothing detectable. Convenient for
    /// tests and embedders that do not use capability conditions.
    pub fn with_values(values: ConfigMap) -> Self {
        Self::new(values, Arc::new(StaticCapabilities::new()))
    }

    /// Get a configuration value
    pub fn get<T: for<'de> Deserialize<'de>>(&self, key: &str) -> Option<T> {
        self.values.get(key)
    }

    /// Get a configuration value with default
    pub fn get_or<T: for<'de> Deserialize<'de>>(&self, key: &str, default: T) -> T {
        self.values.get_or(key, default)
    }

    /// Whether the key holds a truthy flag (absent keys are false)
    pub fn flag(&self, key: &str) -> bool {
        self.values.get_flag(key).unwrap_or(false)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn keys(&self) -> Vec<String> {
        self.values.keys()
    }

    /// The merged configuration values
    pub fn values(&self) -> &ConfigMap {
        &self.values
    }

    /// Ask the capability probe about a named capability
    pub fn has_capability(&self, name: &str) -> bool {
        self.capabilities.detect(name)
    }
}
