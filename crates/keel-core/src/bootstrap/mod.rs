//! # Keel Core Bootstrap
//!
//! The `bootstrap` module forms the heart of the `keel-core` engine. It
//! drives the fixed bootstrap sequence over registered component
//! descriptors and owns everything a caller touches at the boundary.
//!
//! ## Key Responsibilities & Components:
//!
//! - **Orchestration**: the [`Bootstrap`](orchestrator::Bootstrap) state
//!   machine runs environment construction, resolution, instantiation, and
//!   lifecycle event publication in strict order, failing fast.
//! - **The Product**: a successful run yields an
//!   [`ApplicationContext`](context::ApplicationContext), the immutable
//!   table of constructed components.
//! - **Diagnostics**: [`StartupReport`](report::StartupReport) records every
//!   descriptor's condition outcome when the `debug` flag is set.
//! - **Error Handling**: the boundary error value
//!   [`BootstrapError`](error::BootstrapError) with its
//!   [`BootstrapPhase`](error::BootstrapPhase) and
//!   [`BootstrapErrorKind`](error::BootstrapErrorKind), plus a `Result`
//!   alias, in the `error` submodule.
//! - **Core Constants**: engine-wide constants via the `constants`
//!   submodule.
pub mod constants;
pub mod context;
pub mod error;
pub mod orchestrator;
pub mod report;

pub use context::ApplicationContext;
pub use error::{BootstrapError, BootstrapErrorKind, BootstrapPhase, BoxError, Result};
pub use orchestrator::Bootstrap;
pub use report::{ReportEntry, StartupReport};
