use std::any::TypeId;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::component::descriptor::ComponentInstance;

/// Immutable table of the components a successful run constructed.
///
/// Instances are shared (`Arc`) and type-erased; lookups downcast to the
/// provided type. The context only exists when every eligible component was
/// built, and it never changes afterwards.
pub struct ApplicationContext {
    by_id: HashMap<String, ComponentInstance>,
    by_type: HashMap<TypeId, ComponentInstance>,
    // instantiation order, for iteration and diagnostics
    order: Vec<String>,
}

impl fmt::Debug for ApplicationContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApplicationContext")
            .field("components", &self.order)
            .finish()
    }
}

impl ApplicationContext {
    pub(crate) fn from_instances(instances: Vec<(String, TypeId, ComponentInstance)>) -> Self {
        let mut by_id = HashMap::with_capacity(instances.len());
        let mut by_type = HashMap::with_capacity(instances.len());
        let mut order = Vec::with_capacity(instances.len());
        for (id, type_id, instance) in instances {
            by_type.insert(type_id, instance.clone());
            order.push(id.clone());
            by_id.insert(id, instance);
        }
        Self {
            by_id,
            by_type,
            order,
        }
    }

    /// Fetch a component by its provided type
    pub fn get<T: Send + Sync + 'static>(&self) -> Option<Arc<T>> {
        self.by_type
            .get(&TypeId::of::<T>())
            .cloned()
            .and_then(|instance| Arc::downcast::<T>(instance).ok())
    }

    /// Whether a component of the provided type was constructed
    pub fn has<T: Send + Sync + 'static>(&self) -> bool {
        self.by_type.contains_key(&TypeId::of::<T>())
    }

    /// Fetch the raw instance registered under an id
    pub fn instance(&self, id: &str) -> Option<&ComponentInstance> {
        self.by_id.get(id)
    }

    pub fn contains_id(&self, id: &str) -> bool {
        self.by_id.contains_key(id)
    }

    /// Component ids in instantiation order
    pub fn ids(&self) -> &[String] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}
