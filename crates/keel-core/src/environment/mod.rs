//! # Keel Core Environment
//!
//! The `environment` module supplies the facts a bootstrap run is decided
//! against: configuration values merged from defaults, files, and per-run
//! overrides, plus host capability detection.
//!
//! ## Key Responsibilities & Components:
//!
//! - **Configuration Values**: [`ConfigMap`](config::ConfigMap) with
//!   format-aware loading via [`ConfigFormat`](config::ConfigFormat).
//! - **Capability Detection**: the [`CapabilityProbe`](capability::CapabilityProbe)
//!   trait and its built-in probes in the `capability` submodule.
//! - **The Snapshot**: [`EnvironmentSnapshot`](snapshot::EnvironmentSnapshot),
//!   the immutable view handed to conditions, assembled by
//!   [`EnvironmentSources`](sources::EnvironmentSources).
//! - **Error Handling**: [`EnvironmentSystemError`](error::EnvironmentSystemError)
//!   in the `error` submodule.
pub mod capability;
pub mod config;
pub mod error;
pub mod snapshot;
pub mod sources;

/// Re-export key types
pub use capability::{CapabilityProbe, SharedLibraryProbe, StaticCapabilities, capability_fn};
pub use config::{ConfigFormat, ConfigMap};
pub use error::EnvironmentSystemError;
pub use snapshot::EnvironmentSnapshot;
pub use sources::EnvironmentSources;
