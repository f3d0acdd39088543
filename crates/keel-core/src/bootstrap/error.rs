//! # Keel Core Bootstrap Errors
//!
//! Defines the boundary error type returned by a failed bootstrap run.
//!
//! Subsystem errors ([`ComponentSystemError`], [`EnvironmentSystemError`])
//! stay typed inside their modules; at the orchestrator boundary they are
//! folded into a [`BootstrapError`] value carrying the phase the failure
//! occurred in and a [`BootstrapErrorKind`]. The boundary error is a plain
//! clonable value so the `Failed` lifecycle event can carry it verbatim.
use std::result::Result as StdResult;

use thiserror::Error as ThisError;

use crate::component::error::ComponentSystemError;
use crate::environment::error::EnvironmentSystemError;
use crate::event::error::ListenerFailure;

/// Boxed error payload produced by factories, listeners, and condition
/// predicates.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Represents a specific phase of the bootstrap state machine.
///
/// `Init` is the initial state; `Ready` and `Failed` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ThisError)]
pub enum BootstrapPhase {
    #[error("Init")]
    Init,
    #[error("EnvironmentBuilt")]
    EnvironmentBuilt,
    #[error("Resolving")]
    Resolving,
    #[error("Instantiating")]
    Instantiating,
    #[error("Ready")]
    Ready,
    #[error("Failed")]
    Failed,
}

/// What went wrong, independent of the phase it happened in.
#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
pub enum BootstrapErrorKind {
    /// A descriptor id was registered twice.
    #[error("component already registered: '{id}'")]
    DuplicateComponent { id: String },

    /// A mandatory dependency has no eligible provider.
    #[error("component '{dependent}' requires '{missing_type}', which is {}", availability(.registered))]
    MissingDependency {
        dependent: String,
        missing_type: String,
        /// Whether a provider exists but was excluded by its condition.
        registered: bool,
    },

    /// The eligible descriptors contain at least one dependency cycle.
    #[error("circular dependency detected: {}", .ids.join(" -> "))]
    CyclicDependency { ids: Vec<String> },

    /// More than one eligible descriptor provides the same type.
    #[error("ambiguous providers for '{type_name}': {}", .ids.join(", "))]
    AmbiguousProvider { type_name: String, ids: Vec<String> },

    /// A factory returned an error (or a value of the wrong type).
    #[error("construction of component '{id}' failed: {detail}")]
    ComponentConstruction { id: String, detail: String },

    /// One or more listeners failed while an event was delivered.
    #[error("{} listener(s) failed during '{event}'", .failures.len())]
    Listener {
        event: String,
        failures: Vec<ListenerFailure>,
    },

    /// The environment snapshot could not be built.
    #[error("environment could not be built: {detail}")]
    Environment { detail: String },

    /// `run` was called on a machine already in a terminal state.
    #[error("bootstrap has already run")]
    AlreadyRan,
}

fn availability(registered: &bool) -> &'static str {
    if *registered {
        "registered but excluded by its condition"
    } else {
        "not provided by any registered component"
    }
}

impl From<ComponentSystemError> for BootstrapErrorKind {
    fn from(err: ComponentSystemError) -> Self {
        match err {
            ComponentSystemError::DuplicateComponent { id } => {
                BootstrapErrorKind::DuplicateComponent { id }
            }
            ComponentSystemError::MissingDependency {
                dependent,
                missing_type,
                registered,
            } => BootstrapErrorKind::MissingDependency {
                dependent,
                missing_type,
                registered,
            },
            ComponentSystemError::CyclicDependency { ids } => {
                BootstrapErrorKind::CyclicDependency { ids }
            }
            ComponentSystemError::AmbiguousProvider { type_name, ids } => {
                BootstrapErrorKind::AmbiguousProvider { type_name, ids }
            }
            ComponentSystemError::ConstructionFailed { id, source } => {
                BootstrapErrorKind::ComponentConstruction {
                    id,
                    detail: source.to_string(),
                }
            }
        }
    }
}

impl From<EnvironmentSystemError> for BootstrapErrorKind {
    fn from(err: EnvironmentSystemError) -> Self {
        BootstrapErrorKind::Environment {
            detail: err.to_string(),
        }
    }
}

/// Boundary error for a failed bootstrap run.
#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
#[error("bootstrap failed during {phase}: {kind}")]
pub struct BootstrapError {
    /// Phase of the state machine the failure occurred in.
    pub phase: BootstrapPhase,
    pub kind: BootstrapErrorKind,
}

impl BootstrapError {
    pub fn new(phase: BootstrapPhase, kind: impl Into<BootstrapErrorKind>) -> Self {
        BootstrapError {
            phase,
            kind: kind.into(),
        }
    }

    /// Rendered description of the kind, without the phase prefix.
    pub fn detail(&self) -> String {
        self.kind.to_string()
    }
}

/// Shorthand for Result with the boundary error type
pub type Result<T> = StdResult<T, BootstrapError>;
