pub mod bus;
pub mod error;
pub mod types;

use async_trait::async_trait;

use crate::bootstrap::error::BoxError;

/// Type for listener identifiers
pub type ListenerId = u64;

/// Asynchronous lifecycle listener trait
///
/// Listeners observe bootstrap progress; they cannot veto it. Returning an
/// error marks the surrounding phase as failed once delivery of the event
/// has completed for every listener.
#[async_trait]
pub trait LifecycleListener: Send + Sync {
    async fn on_event(&self, event: &types::LifecycleEvent) -> Result<(), BoxError>;
}

/// Re-export important types
pub use bus::{BoxFuture, EventBus, listener_fn, sync_listener};
pub use error::ListenerFailure;
pub use types::{LifecycleEvent, LifecycleEventKind};
