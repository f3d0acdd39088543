use std::any::TypeId;
use std::collections::HashMap;

use crate::bootstrap::constants::{DEBUG_KEY, ENGINE_NAME, ENGINE_VERSION};
use crate::bootstrap::context::ApplicationContext;
use crate::bootstrap::error::{BootstrapError, BootstrapErrorKind, BootstrapPhase, BoxError, Result};
use crate::bootstrap::report::StartupReport;
use crate::component::descriptor::{ComponentDescriptor, ComponentInstance, DependencyHandles};
use crate::component::error::ComponentSystemError;
use crate::component::registry::{ComponentRegistry, Resolution, ResolvedEntry};
use crate::environment::{ConfigMap, EnvironmentSources};
use crate::event::bus::{EventBus, sync_listener};
use crate::event::types::{LifecycleEvent, LifecycleEventKind};
use crate::event::{LifecycleListener, ListenerId};

/// Drives one bootstrap run over the registered descriptors.
///
/// The run is a fixed, strictly ordered sequence: publish `Started`, build
/// the environment snapshot, publish `EnvironmentPrepared`, resolve,
/// instantiate in resolved order, publish `Prepared`, finalize the
/// application context, publish `Ready`. The first failure moves the
/// machine to `Failed`, publishes exactly one `Failed` event, and returns
/// the boundary error; partially built instances are discarded.
#[derive(Debug)]
pub struct Bootstrap {
    registry: ComponentRegistry,
    bus: EventBus,
    sources: EnvironmentSources,
    phase: BootstrapPhase,
    report: Option<StartupReport>,
}

impl Bootstrap {
    pub fn new() -> Self {
        Self::with_sources(EnvironmentSources::new())
    }

    pub fn with_sources(sources: EnvironmentSources) -> Self {
        Self {
            registry: ComponentRegistry::new(),
            bus: EventBus::new(),
            sources,
            phase: BootstrapPhase::Init,
            report: None,
        }
    }

    /// Register a component descriptor. Ids must be unique.
    pub fn register(&mut self, descriptor: ComponentDescriptor) -> Result<()> {
        self.registry
            .register(descriptor)
            .map_err(|e| BootstrapError::new(self.phase, e))
    }

    /// Subscribe a listener to one lifecycle event kind
    pub fn subscribe(
        &mut self,
        kind: LifecycleEventKind,
        listener: Box<dyn LifecycleListener>,
    ) -> ListenerId {
        self.bus.subscribe(kind, listener)
    }

    /// Subscribe a synchronous closure to one lifecycle event kind
    pub fn subscribe_fn<F>(&mut self, kind: LifecycleEventKind, f: F) -> ListenerId
    where
        F: Fn(&LifecycleEvent) -> std::result::Result<(), BoxError> + Send + Sync + 'static,
    {
        self.bus.subscribe(kind, sync_listener(f))
    }

    /// Remove a listener; returns whether anything was removed
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.bus.unsubscribe(id)
    }

    /// Current phase of the state machine
    pub fn phase(&self) -> BootstrapPhase {
        self.phase
    }

    /// The condition report of the last run, retained when the `debug`
    /// flag was set in the merged environment
    pub fn startup_report(&self) -> Option<&StartupReport> {
        self.report.as_ref()
    }

    /// The registered descriptors
    pub fn registry(&self) -> &ComponentRegistry {
        &self.registry
    }

    /// Execute the bootstrap sequence once.
    ///
    /// `overrides` take precedence over every other configuration source.
    /// A machine in a terminal state refuses to run again and publishes
    /// nothing: the per-run event contract belongs to the run that already
    /// happened.
    pub async fn run(&mut self, overrides: ConfigMap) -> Result<ApplicationContext> {
        if self.phase != BootstrapPhase::Init {
            return Err(BootstrapError::new(self.phase, BootstrapErrorKind::AlreadyRan));
        }
        log::info!("Bootstrapping {} v{}", ENGINE_NAME, ENGINE_VERSION);
        match self.run_phases(overrides).await {
            Ok(context) => {
                self.phase = BootstrapPhase::Ready;
                log::info!("Bootstrap complete: {} component(s) ready", context.len());
                Ok(context)
            }
            Err(error) => {
                self.phase = BootstrapPhase::Failed;
                log::error!("{}", error);
                // Exactly one Failed per run. Failures of Failed-listeners
                // are logged and dropped; there is nothing left to abort.
                let failures = self.bus.publish(&LifecycleEvent::failed(error.clone())).await;
                for failure in failures {
                    log::error!("{}", failure);
                }
                Err(error)
            }
        }
    }

    async fn run_phases(&mut self, overrides: ConfigMap) -> Result<ApplicationContext> {
        self.publish(BootstrapPhase::Init, LifecycleEvent::Started).await?;

        let environment = self
            .sources
            .build(&overrides)
            .map_err(|e| BootstrapError::new(BootstrapPhase::Init, e))?;
        self.phase = BootstrapPhase::EnvironmentBuilt;
        log::debug!(
            "Environment snapshot built ({} top-level value(s))",
            environment.values().len()
        );
        self.publish(BootstrapPhase::EnvironmentBuilt, LifecycleEvent::EnvironmentPrepared)
            .await?;

        self.phase = BootstrapPhase::Resolving;
        let Resolution { report, plan } = self.registry.resolve(&environment);
        if environment.flag(DEBUG_KEY) {
            for line in report.to_string().lines() {
                log::info!("{}", line);
            }
            self.report = Some(report);
        }
        let plan = plan.map_err(|e| BootstrapError::new(BootstrapPhase::Resolving, e))?;

        self.phase = BootstrapPhase::Instantiating;
        let instances = self.instantiate(&plan).await?;
        self.publish(BootstrapPhase::Instantiating, LifecycleEvent::Prepared)
            .await?;

        let context = ApplicationContext::from_instances(instances);
        self.publish(BootstrapPhase::Ready, LifecycleEvent::Ready).await?;
        Ok(context)
    }

    // Deliver one event; a non-empty failure set fails the given phase
    // after delivery has reached every listener.
    async fn publish(&self, phase: BootstrapPhase, event: LifecycleEvent) -> Result<()> {
        let name = event.name();
        let failures = self.bus.publish(&event).await;
        if failures.is_empty() {
            Ok(())
        } else {
            Err(BootstrapError::new(
                phase,
                BootstrapErrorKind::Listener {
                    event: name.to_string(),
                    failures,
                },
            ))
        }
    }

    // Build every planned component in order. On failure the partial
    // instance table is dropped here; no context is ever exposed.
    async fn instantiate(
        &self,
        plan: &[ResolvedEntry],
    ) -> Result<Vec<(String, TypeId, ComponentInstance)>> {
        let mut built: Vec<(String, TypeId, ComponentInstance)> = Vec::with_capacity(plan.len());
        let mut by_type: HashMap<TypeId, ComponentInstance> = HashMap::new();
        for entry in plan {
            let descriptor = &entry.descriptor;
            let handles = DependencyHandles::resolve_from(descriptor.dependencies(), &by_type);
            let instance = descriptor.construct(&handles).await.map_err(|e| {
                BootstrapError::new(
                    BootstrapPhase::Instantiating,
                    ComponentSystemError::ConstructionFailed {
                        id: descriptor.id().to_string(),
                        source: e,
                    },
                )
            })?;
            if instance.as_ref().type_id() != descriptor.provides() {
                return Err(BootstrapError::new(
                    BootstrapPhase::Instantiating,
                    BootstrapErrorKind::ComponentConstruction {
                        id: descriptor.id().to_string(),
                        detail: format!(
                            "factory produced a value of an unexpected type (expected '{}')",
                            descriptor.provides_name()
                        ),
                    },
                ));
            }
            log::debug!("Instantiated component '{}'", descriptor.id());
            by_type.insert(descriptor.provides(), instance.clone());
            built.push((descriptor.id().to_string(), descriptor.provides(), instance));
        }
        Ok(built)
    }
}

impl Default for Bootstrap {
    fn default() -> Self {
        Self::new()
    }
}
