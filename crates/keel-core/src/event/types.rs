use std::fmt;

use crate::bootstrap::error::{BootstrapError, BootstrapPhase};

/// Discriminant for the fixed lifecycle notifications; the subscription key
/// of the event bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LifecycleEventKind {
    Started,
    EnvironmentPrepared,
    Prepared,
    Ready,
    Failed,
}

impl LifecycleEventKind {
    /// Dotted event name, stable across releases
    pub fn name(&self) -> &'static str {
        match self {
            LifecycleEventKind::Started => "bootstrap.started",
            LifecycleEventKind::EnvironmentPrepared => "bootstrap.environment_prepared",
            LifecycleEventKind::Prepared => "bootstrap.prepared",
            LifecycleEventKind::Ready => "bootstrap.ready",
            LifecycleEventKind::Failed => "bootstrap.failed",
        }
    }
}

impl fmt::Display for LifecycleEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Immutable lifecycle notification published by the bootstrap orchestrator.
///
/// A successful run publishes `Started`, `EnvironmentPrepared`, `Prepared`,
/// `Ready` in that order. A failed run publishes the prefix reached plus
/// exactly one `Failed`.
#[derive(Debug, Clone, PartialEq)]
pub enum LifecycleEvent {
    /// Bootstrap has begun; nothing has been built yet.
    Started,
    /// The environment snapshot is complete and immutable.
    EnvironmentPrepared,
    /// Every eligible component has been instantiated.
    Prepared,
    /// The application context is available.
    Ready,
    /// Bootstrap aborted. Carries the failing phase and the cause.
    Failed {
        phase: BootstrapPhase,
        error: BootstrapError,
    },
}

impl LifecycleEvent {
    pub fn kind(&self) -> LifecycleEventKind {
        match self {
            LifecycleEvent::Started => LifecycleEventKind::Started,
            LifecycleEvent::EnvironmentPrepared => LifecycleEventKind::EnvironmentPrepared,
            LifecycleEvent::Prepared => LifecycleEventKind::Prepared,
            LifecycleEvent::Ready => LifecycleEventKind::Ready,
            LifecycleEvent::Failed { .. } => LifecycleEventKind::Failed,
        }
    }

    /// Dotted event name, stable across releases
    pub fn name(&self) -> &'static str {
        self.kind().name()
    }

    pub(crate) fn failed(error: BootstrapError) -> Self {
        LifecycleEvent::Failed {
            phase: error.phase,
            error,
        }
    }
}
