// Subsystem modules
pub mod bootstrap;
pub mod component;
pub mod environment;
pub mod event;

// Re-export key public types/traits for easier use by binaries and
// embedders.
pub use bootstrap::{
    ApplicationContext, Bootstrap, BootstrapError, BootstrapErrorKind, BootstrapPhase, BoxError,
    ReportEntry, StartupReport,
};
pub use component::{
    ComponentDescriptor, ComponentFactory, ComponentInstance, ComponentRegistry, Condition,
    ConditionResult, DependencyHandles, provider,
};
pub use environment::{
    CapabilityProbe, ConfigFormat, ConfigMap, EnvironmentSnapshot, EnvironmentSources,
    SharedLibraryProbe, StaticCapabilities, capability_fn,
};
pub use event::{
    EventBus, LifecycleEvent, LifecycleEventKind, LifecycleListener, ListenerFailure, ListenerId,
    listener_fn, sync_listener,
};

// Cross-module scenario tests
#[cfg(test)]
mod tests;
