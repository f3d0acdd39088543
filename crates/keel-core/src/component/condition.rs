use std::fmt;

use serde_json::Value;

use crate::bootstrap::error::BoxError;
use crate::environment::EnvironmentSnapshot;

/// Outcome of evaluating one condition against the environment snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConditionResult {
    /// Whether the guarded descriptor is eligible
    pub matched: bool,
    /// Human-readable explanation; never empty
    pub reason: String,
}

impl ConditionResult {
    pub fn met(reason: impl Into<String>) -> Self {
        Self {
            matched: true,
            reason: reason.into(),
        }
    }

    pub fn unmet(reason: impl Into<String>) -> Self {
        Self {
            matched: false,
            reason: reason.into(),
        }
    }
}

type Predicate = Box<dyn Fn(&EnvironmentSnapshot) -> Result<ConditionResult, BoxError> + Send + Sync>;

/// Guard deciding whether a descriptor participates in a bootstrap run.
///
/// Predicates are pure reads of the snapshot. A predicate that returns an
/// error does not abort anything: evaluation recovers it locally as an
/// unmatched result whose reason carries the error text. This keeps an
/// unprobeable environment equivalent to a condition that is not met.
pub struct Condition {
    description: String,
    predicate: Predicate,
}

impl fmt::Debug for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Condition")
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

impl Condition {
    pub fn new<F>(description: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&EnvironmentSnapshot) -> Result<ConditionResult, BoxError> + Send + Sync + 'static,
    {
        Self {
            description: description.into(),
            predicate: Box::new(predicate),
        }
    }

    /// Always eligible
    pub fn always() -> Self {
        Self::new("always eligible", |_| Ok(ConditionResult::met("unconditional")))
    }

    /// Eligible when the key holds a truthy flag
    pub fn config_flag(key: impl Into<String>) -> Self {
        let key = key.into();
        let description = format!("config flag '{}' is set", key);
        Self::new(description, move |env| {
            let result = if env.flag(&key) {
                ConditionResult::met(format!("config flag '{}' is set", key))
            } else if env.contains_key(&key) {
                ConditionResult::unmet(format!("config key '{}' is present but not truthy", key))
            } else {
                ConditionResult::unmet(format!("config key '{}' is absent", key))
            };
            Ok(result)
        })
    }

    /// Eligible when the key holds exactly the expected value
    pub fn config_equals(key: impl Into<String>, expected: impl Into<Value>) -> Self {
        let key = key.into();
        let expected = expected.into();
        let description = format!("config key '{}' equals {}", key, expected);
        Self::new(description, move |env| {
            let result = match env.get::<Value>(&key) {
                Some(actual) if actual == expected => {
                    ConditionResult::met(format!("config key '{}' equals {}", key, expected))
                }
                Some(actual) => ConditionResult::unmet(format!(
                    "config key '{}' is {} (expected {})",
                    key, actual, expected
                )),
                None => ConditionResult::unmet(format!("config key '{}' is absent", key)),
            };
            Ok(result)
        })
    }

    /// Eligible when the environment detects the named capability
    pub fn capability(name: impl Into<String>) -> Self {
        let name = name.into();
        let description = format!("capability '{}' is available", name);
        Self::new(description, move |env| {
            let result = if env.has_capability(&name) {
                ConditionResult::met(format!("capability '{}' detected", name))
            } else {
                ConditionResult::unmet(format!("capability '{}' not detected", name))
            };
            Ok(result)
        })
    }

    /// Arbitrary boolean check; the description doubles as the reason
    pub fn predicate<F>(description: impl Into<String>, check: F) -> Self
    where
        F: Fn(&EnvironmentSnapshot) -> Result<bool, BoxError> + Send + Sync + 'static,
    {
        let description = description.into();
        let reason = description.clone();
        Self::new(description, move |env| {
            let result = if check(env)? {
                ConditionResult::met(reason.clone())
            } else {
                ConditionResult::unmet(format!("not met: {}", reason))
            };
            Ok(result)
        })
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Evaluate against the snapshot. Predicate errors are recovered as an
    /// unmatched result; they never propagate.
    pub fn evaluate(&self, environment: &EnvironmentSnapshot) -> ConditionResult {
        match (self.predicate)(environment) {
            Ok(mut result) => {
                if result.reason.is_empty() {
                    result.reason = self.description.clone();
                }
                result
            }
            Err(e) => {
                log::debug!(
                    "Condition '{}' evaluation failed, treated as unmatched: {}",
                    self.description,
                    e
                );
                ConditionResult::unmet(format!("evaluation failed: {}", e))
            }
        }
    }
}

impl Default for Condition {
    fn default() -> Self {
        Self::always()
    }
}
