use std::any::TypeId;
use std::collections::HashMap;
use std::sync::Arc;

use log::{debug, info};

use crate::bootstrap::report::{ReportEntry, StartupReport};
use crate::component::condition::ConditionResult;
use crate::component::descriptor::ComponentDescriptor;
use crate::component::error::ComponentSystemError;
use crate::component::graph::DependencyGraph;
use crate::environment::EnvironmentSnapshot;

/// One planned instantiation: the descriptor and why it was admitted.
#[derive(Debug, Clone)]
pub struct ResolvedEntry {
    pub descriptor: Arc<ComponentDescriptor>,
    pub condition: ConditionResult,
}

/// Outcome of one resolution pass.
///
/// The report covers every registered descriptor and is present even when
/// planning fails, so diagnostics survive a failed run.
#[derive(Debug)]
pub struct Resolution {
    pub report: StartupReport,
    pub plan: Result<Vec<ResolvedEntry>, ComponentSystemError>,
}

/// Holds registered descriptors in registration order.
///
/// Registration order is observable: it breaks topological-sort ties and
/// decides which error is reported first when several are possible, so
/// iteration here always runs over the insertion-ordered vector, never a
/// map.
#[derive(Debug, Default)]
pub struct ComponentRegistry {
    descriptors: Vec<Arc<ComponentDescriptor>>,
    ids: HashMap<String, usize>,
}

impl ComponentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a descriptor; ids must be unique
    pub fn register(&mut self, descriptor: ComponentDescriptor) -> Result<(), ComponentSystemError> {
        if self.ids.contains_key(descriptor.id()) {
            return Err(ComponentSystemError::DuplicateComponent {
                id: descriptor.id().to_string(),
            });
        }
        debug!(
            "Registered component '{}' providing '{}'",
            descriptor.id(),
            descriptor.provides_name()
        );
        self.ids.insert(descriptor.id().to_string(), self.descriptors.len());
        self.descriptors.push(Arc::new(descriptor));
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<&Arc<ComponentDescriptor>> {
        self.ids.get(id).map(|&idx| &self.descriptors[idx])
    }

    /// All descriptors, registration order
    pub fn descriptors(&self) -> &[Arc<ComponentDescriptor>] {
        &self.descriptors
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    /// Evaluate every condition, apply fallback supersession, and plan a
    /// deterministic instantiation order over the eligible descriptors.
    ///
    /// Planning is total-or-nothing: an ambiguous provider, a missing
    /// mandatory dependency, or a cycle fails the whole pass.
    pub fn resolve(&self, environment: &EnvironmentSnapshot) -> Resolution {
        let mut outcomes: Vec<ConditionResult> = self
            .descriptors
            .iter()
            .map(|descriptor| descriptor.condition().evaluate(environment))
            .collect();

        self.supersede_fallbacks(&mut outcomes);

        let report = StartupReport::new(
            self.descriptors
                .iter()
                .zip(&outcomes)
                .map(|(descriptor, outcome)| ReportEntry {
                    id: descriptor.id().to_string(),
                    provides: descriptor.provides_name().to_string(),
                    matched: outcome.matched,
                    reason: outcome.reason.clone(),
                })
                .collect(),
        );

        // Eligible providers per type, post-supersession, registration order.
        let mut eligible_providers: HashMap<TypeId, Vec<usize>> = HashMap::new();
        for (idx, descriptor) in self.descriptors.iter().enumerate() {
            if outcomes[idx].matched {
                eligible_providers
                    .entry(descriptor.provides())
                    .or_default()
                    .push(idx);
            }
        }

        for (idx, descriptor) in self.descriptors.iter().enumerate() {
            if !outcomes[idx].matched {
                continue;
            }
            let rivals = &eligible_providers[&descriptor.provides()];
            if rivals.len() > 1 {
                return Resolution {
                    report,
                    plan: Err(ComponentSystemError::AmbiguousProvider {
                        type_name: descriptor.provides_name().to_string(),
                        ids: rivals
                            .iter()
                            .map(|&i| self.descriptors[i].id().to_string())
                            .collect(),
                    }),
                };
            }
        }

        let provider_of: HashMap<TypeId, usize> = eligible_providers
            .iter()
            .map(|(&type_id, indices)| (type_id, indices[0]))
            .collect();

        let mut graph = DependencyGraph::new();
        for (idx, _) in self.descriptors.iter().enumerate() {
            if outcomes[idx].matched {
                graph.add_node(idx);
            }
        }
        for (idx, descriptor) in self.descriptors.iter().enumerate() {
            if !outcomes[idx].matched {
                continue;
            }
            for spec in descriptor.dependencies() {
                match provider_of.get(&spec.type_id()) {
                    Some(&provider_idx) => graph.add_edge(idx, provider_idx),
                    None if spec.is_required() => {
                        let registered = self
                            .descriptors
                            .iter()
                            .any(|other| other.provides() == spec.type_id());
                        return Resolution {
                            report,
                            plan: Err(ComponentSystemError::MissingDependency {
                                dependent: descriptor.id().to_string(),
                                missing_type: spec.type_name().to_string(),
                                registered,
                            }),
                        };
                    }
                    None => {
                        debug!(
                            "Optional dependency '{}' of '{}' has no eligible provider",
                            spec.type_name(),
                            descriptor.id()
                        );
                    }
                }
            }
        }

        let order = match graph.topological_sort() {
            Ok(order) => order,
            Err(cycle) => {
                return Resolution {
                    report,
                    plan: Err(ComponentSystemError::CyclicDependency {
                        ids: cycle
                            .into_iter()
                            .map(|idx| self.descriptors[idx].id().to_string())
                            .collect(),
                    }),
                };
            }
        };

        info!(
            "Resolved {} of {} registered component(s)",
            order.len(),
            self.descriptors.len()
        );
        let entries = order
            .into_iter()
            .map(|idx| ResolvedEntry {
                descriptor: Arc::clone(&self.descriptors[idx]),
                condition: outcomes[idx].clone(),
            })
            .collect();
        Resolution {
            report,
            plan: Ok(entries),
        }
    }

    // A fallback provider yields when any non-fallback provider of the same
    // type matched; its outcome becomes an exclusion naming the winner. The
    // per-type decisions are independent, so map iteration order is fine.
    fn supersede_fallbacks(&self, outcomes: &mut [ConditionResult]) {
        let mut providers: HashMap<TypeId, Vec<usize>> = HashMap::new();
        for (idx, descriptor) in self.descriptors.iter().enumerate() {
            if outcomes[idx].matched {
                providers.entry(descriptor.provides()).or_default().push(idx);
            }
        }
        for indices in providers.values() {
            let non_fallback: Vec<usize> = indices
                .iter()
                .copied()
                .filter(|&idx| !self.descriptors[idx].is_fallback())
                .collect();
            if non_fallback.is_empty() || non_fallback.len() == indices.len() {
                continue;
            }
            let winner = self.descriptors[non_fallback[0]].id();
            for &idx in indices {
                if self.descriptors[idx].is_fallback() {
                    debug!(
                        "Fallback component '{}' superseded by '{}'",
                        self.descriptors[idx].id(),
                        winner
                    );
                    outcomes[idx] = ConditionResult::unmet(format!("superseded by '{}'", winner));
                }
            }
        }
    }
}
