use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::pin::Pin;

use async_trait::async_trait;

use crate::bootstrap::error::BoxError;
use crate::event::error::ListenerFailure;
use crate::event::types::{LifecycleEvent, LifecycleEventKind};
use crate::event::{LifecycleListener, ListenerId};

// This type represents an owned future returned by closure-backed listeners
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Lifecycle event bus with strictly ordered, sequential delivery.
///
/// Listeners subscribe to exactly one event kind and are invoked on the
/// publishing task, one at a time, in subscription order. A failing
/// listener never stops delivery; its failure is recorded and returned to
/// the publisher once every listener has run.
pub struct EventBus {
    listeners: HashMap<LifecycleEventKind, Vec<(ListenerId, Box<dyn LifecycleListener>)>>,
    next_listener_id: ListenerId,
}

// Manual Debug implementation for EventBus
impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let listener_count: usize = self.listeners.values().map(|v| v.len()).sum();
        f.debug_struct("EventBus")
            .field("listener_count", &listener_count)
            .field("next_listener_id", &self.next_listener_id)
            .finish()
    }
}

/// Closure-backed listener (Internal Helper)
struct FnListener {
    listener: Box<dyn for<'a> Fn(&'a LifecycleEvent) -> BoxFuture<'a, Result<(), BoxError>> + Send + Sync>,
}

impl fmt::Debug for FnListener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnListener").finish_non_exhaustive()
    }
}

#[async_trait]
impl LifecycleListener for FnListener {
    async fn on_event(&self, event: &LifecycleEvent) -> Result<(), BoxError> {
        (self.listener)(event).await
    }
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            listeners: HashMap::new(),
            next_listener_id: 1,
        }
    }

    /// Register a listener for one event kind
    pub fn subscribe(&mut self, kind: LifecycleEventKind, listener: Box<dyn LifecycleListener>) -> ListenerId {
        let id = self.next_listener_id;
        self.next_listener_id += 1;
        self.listeners.entry(kind).or_default().push((id, listener));
        id
    }

    /// Remove a listener by id; returns whether anything was removed
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let mut found = false;
        self.listeners.values_mut().for_each(|listeners| {
            let len_before = listeners.len();
            listeners.retain(|(l_id, _)| *l_id != id);
            if listeners.len() < len_before {
                found = true;
            }
        });
        found
    }

    /// Number of listeners subscribed to one kind
    pub fn listener_count(&self, kind: LifecycleEventKind) -> usize {
        self.listeners.get(&kind).map_or(0, |v| v.len())
    }

    /// Deliver an event to every listener of its kind, in subscription
    /// order, collecting failures instead of short-circuiting.
    pub async fn publish(&self, event: &LifecycleEvent) -> Vec<ListenerFailure> {
        let mut failures = Vec::new();
        if let Some(listeners) = self.listeners.get(&event.kind()) {
            for (id, listener) in listeners {
                if let Err(e) = listener.on_event(event).await {
                    log::warn!("Listener {} failed during '{}': {}", id, event.name(), e);
                    failures.push(ListenerFailure::new(*id, event.name(), e.to_string()));
                }
            }
        }
        failures
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

//--------------------------------------------------
// Helper Functions
//--------------------------------------------------

/// Wrap an async closure as a boxed listener
pub fn listener_fn<F>(f: F) -> Box<dyn LifecycleListener>
where
    F: for<'a> Fn(&'a LifecycleEvent) -> BoxFuture<'a, Result<(), BoxError>> + Send + Sync + 'static,
{
    Box::new(FnListener {
        listener: Box::new(f),
    })
}

/// Wrap a synchronous closure as a boxed listener compatible with the
/// async bus
pub fn sync_listener<F>(f: F) -> Box<dyn LifecycleListener>
where
    F: Fn(&LifecycleEvent) -> Result<(), BoxError> + Send + Sync + 'static,
{
    Box::new(FnListener {
        listener: Box::new(move |event| {
            let result = f(event);
            Box::pin(async move { result })
        }),
    })
}
