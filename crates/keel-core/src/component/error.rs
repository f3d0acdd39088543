//! # Keel Core Component System Errors
//!
//! Defines error types specific to descriptor registration and resolution.
//!
//! Every resolution failure is total: when one of these is raised, no
//! component of the run has been (or will be) instantiated.
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ComponentSystemError {
    #[error("Component already registered: '{id}'")]
    DuplicateComponent { id: String },

    #[error("Component '{dependent}' requires '{missing_type}', which is {}", availability(.registered))]
    MissingDependency {
        dependent: String,
        missing_type: String,
        /// Whether a provider exists but was excluded by its condition
        registered: bool,
    },

    #[error("Circular dependency detected: {}", .ids.join(" -> "))]
    CyclicDependency { ids: Vec<String> },

    #[error("Ambiguous providers for type '{type_name}': {}", .ids.join(", "))]
    AmbiguousProvider { type_name: String, ids: Vec<String> },

    #[error("Construction of component '{id}' failed: {source}")]
    ConstructionFailed {
        id: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync + 'static>,
    },
}

fn availability(registered: &bool) -> &'static str {
    if *registered {
        "registered but excluded by its condition"
    } else {
        "not provided by any registered component"
    }
}
