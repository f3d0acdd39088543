//! # Keel Core Component System
//!
//! The `component` module defines what a candidate component *is* and how a
//! set of candidates becomes a deterministic instantiation plan.
//!
//! ## Key Responsibilities & Components:
//!
//! - **Descriptors**: [`ComponentDescriptor`](descriptor::ComponentDescriptor)
//!   couples an id, a provided type, ordered dependency specs, a guard
//!   condition, and a [`ComponentFactory`](descriptor::ComponentFactory).
//! - **Conditions**: [`Condition`](condition::Condition) predicates over the
//!   environment snapshot, producing a [`ConditionResult`](condition::ConditionResult)
//!   with a reason string; predicate errors are recovered as "not matched".
//! - **Resolution**: [`ComponentRegistry`](registry::ComponentRegistry)
//!   evaluates conditions, applies fallback supersession, and topologically
//!   sorts the eligible set over a [`DependencyGraph`](graph::DependencyGraph),
//!   breaking ties by registration order.
//! - **Error Handling**: [`ComponentSystemError`](error::ComponentSystemError)
//!   in the `error` submodule.
pub mod condition;
pub mod descriptor;
pub mod error;
pub mod graph;
pub mod registry;

/// Re-export key types
pub use condition::{Condition, ConditionResult};
pub use descriptor::{
    ComponentDescriptor, ComponentFactory, ComponentInstance, DependencyHandles, DependencySpec,
    provider,
};
pub use error::ComponentSystemError;
pub use graph::DependencyGraph;
pub use registry::{ComponentRegistry, ResolvedEntry, Resolution};

// Test module declaration
#[cfg(test)]
mod tests;
