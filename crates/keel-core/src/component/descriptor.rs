use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;

use crate::bootstrap::error::BoxError;
use crate::component::condition::Condition;

/// Shared, type-erased component instance. Factories produce one; the
/// application context stores them and hands out downcast clones.
pub type ComponentInstance = Arc<dyn Any + Send + Sync>;

/// Asynchronous component factory trait
///
/// Receives the resolved dependencies and produces the instance. The
/// returned value must be of the descriptor's provided type; anything else
/// is rejected as a construction failure.
#[async_trait]
pub trait ComponentFactory: Send + Sync {
    async fn build(&self, dependencies: &DependencyHandles) -> Result<ComponentInstance, BoxError>;
}

/// Declares one dependency of a descriptor on a provided type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DependencySpec {
    type_id: TypeId,
    type_name: &'static str,
    required: bool,
}

impl DependencySpec {
    /// Mandatory dependency: resolution fails if no eligible provider exists
    pub fn required<D: Send + Sync + 'static>() -> Self {
        Self {
            type_id: TypeId::of::<D>(),
            type_name: std::any::type_name::<D>(),
            required: true,
        }
    }

    /// Optional dependency: absent when no eligible provider exists
    pub fn optional<D: Send + Sync + 'static>() -> Self {
        Self {
            type_id: TypeId::of::<D>(),
            type_name: std::any::type_name::<D>(),
            required: false,
        }
    }

    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn is_required(&self) -> bool {
        self.required
    }
}

/// Dependency instances for one factory invocation, in declared order.
///
/// An optional dependency without an eligible provider is present as an
/// empty slot; `get` returns `None` for it.
pub struct DependencyHandles {
    slots: Vec<(DependencySpec, Option<ComponentInstance>)>,
}

impl fmt::Debug for DependencyHandles {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut list = f.debug_list();
        for (spec, instance) in &self.slots {
            list.entry(&format_args!(
                "{} ({})",
                spec.type_name(),
                if instance.is_some() { "present" } else { "absent" }
            ));
        }
        list.finish()
    }
}

impl DependencyHandles {
    /// No dependencies at all; useful for leaf factories in tests
    pub fn empty() -> Self {
        Self { slots: Vec::new() }
    }

    pub(crate) fn resolve_from(
        specs: &[DependencySpec],
        available: &HashMap<TypeId, ComponentInstance>,
    ) -> Self {
        Self {
            slots: specs
                .iter()
                .map(|spec| (*spec, available.get(&spec.type_id()).cloned()))
                .collect(),
        }
    }

    /// Fetch a dependency by type; `None` when the slot is absent or the
    /// type was never declared
    pub fn get<D: Send + Sync + 'static>(&self) -> Option<Arc<D>> {
        let target = TypeId::of::<D>();
        self.slots
            .iter()
            .find(|(spec, _)| spec.type_id() == target)
            .and_then(|(_, instance)| instance.clone())
            .and_then(|instance| Arc::downcast::<D>(instance).ok())
    }

    /// Fetch a mandatory dependency; errors instead of returning `None`
    pub fn require<D: Send + Sync + 'static>(&self) -> Result<Arc<D>, BoxError> {
        self.get::<D>().ok_or_else(|| {
            format!(
                "required dependency '{}' is not available",
                std::any::type_name::<D>()
            )
            .into()
        })
    }

    pub fn is_present<D: Send + Sync + 'static>(&self) -> bool {
        self.get::<D>().is_some()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

/// Candidate component: identity, provided type, guard, wiring, and recipe.
///
/// Descriptors are declarative; nothing runs until the orchestrator
/// resolves and instantiates them. Ids are unique per registry. The
/// dependency list is ordered and may not, transitively, lead back to the
/// descriptor's own provided type.
pub struct ComponentDescriptor {
    id: String,
    provides: TypeId,
    provides_name: &'static str,
    dependencies: Vec<DependencySpec>,
    condition: Condition,
    factory: Box<dyn ComponentFactory>,
    fallback: bool,
}

impl fmt::Debug for ComponentDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentDescriptor")
            .field("id", &self.id)
            .field("provides", &self.provides_name)
            .field("dependencies", &self.dependencies)
            .field("condition", &self.condition)
            .field("fallback", &self.fallback)
            .finish_non_exhaustive()
    }
}

impl ComponentDescriptor {
    /// New descriptor providing `T`, unconditional until a condition is set
    pub fn new<T: Send + Sync + 'static>(
        id: impl Into<String>,
        factory: impl ComponentFactory + 'static,
    ) -> Self {
        Self {
            id: id.into(),
            provides: TypeId::of::<T>(),
            provides_name: std::any::type_name::<T>(),
            dependencies: Vec::new(),
            condition: Condition::always(),
            factory: Box::new(factory),
            fallback: false,
        }
    }

    pub fn with_condition(mut self, condition: Condition) -> Self {
        self.condition = condition;
        self
    }

    /// Append a mandatory dependency on the provider of `D`
    pub fn depends_on<D: Send + Sync + 'static>(mut self) -> Self {
        self.dependencies.push(DependencySpec::required::<D>());
        self
    }

    /// Append an optional dependency on the provider of `D`
    pub fn depends_on_optional<D: Send + Sync + 'static>(mut self) -> Self {
        self.dependencies.push(DependencySpec::optional::<D>());
        self
    }

    /// Mark this descriptor as yielding to any other eligible provider of
    /// the same type
    pub fn as_fallback(mut self) -> Self {
        self.fallback = true;
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// TypeId of the provided capability
    pub fn provides(&self) -> TypeId {
        self.provides
    }

    /// Type name of the provided capability, for diagnostics
    pub fn provides_name(&self) -> &'static str {
        self.provides_name
    }

    pub fn dependencies(&self) -> &[DependencySpec] {
        &self.dependencies
    }

    pub fn condition(&self) -> &Condition {
        &self.condition
    }

    pub fn is_fallback(&self) -> bool {
        self.fallback
    }

    pub(crate) async fn construct(
        &self,
        dependencies: &DependencyHandles,
    ) -> Result<ComponentInstance, BoxError> {
        self.factory.build(dependencies).await
    }
}

/// Typed synchronous factory (Internal Helper)
struct FnProvider<T, F> {
    build: F,
    _marker: PhantomData<fn() -> T>,
}

impl<T, F> fmt::Debug for FnProvider<T, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnProvider").finish_non_exhaustive()
    }
}

#[async_trait]
impl<T, F> ComponentFactory for FnProvider<T, F>
where
    T: Send + Sync + 'static,
    F: Fn(&DependencyHandles) -> Result<T, BoxError> + Send + Sync,
{
    async fn build(&self, dependencies: &DependencyHandles) -> Result<ComponentInstance, BoxError> {
        let instance = (self.build)(dependencies)?;
        Ok(Arc::new(instance))
    }
}

/// Adapt a synchronous, typed constructor into a factory. Covers the
/// common case; implement [`ComponentFactory`] directly when construction
/// needs to await something.
pub fn provider<T, F>(build: F) -> impl ComponentFactory
where
    T: Send + Sync + 'static,
    F: Fn(&DependencyHandles) -> Result<T, BoxError> + Send + Sync + 'static,
{
    FnProvider {
        build,
        _marker: PhantomData,
    }
}
