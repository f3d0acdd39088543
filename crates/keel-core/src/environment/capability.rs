use std::collections::HashSet;
use std::ffi::OsString;
use std::fmt;

use libloading::{Library, library_filename};

/// Pluggable capability detection for the environment snapshot.
///
/// A probe answers "is the named capability available on this host" and
/// nothing more. Probes must be infallible: a capability that cannot be
/// checked is a capability that is not present.
pub trait CapabilityProbe: Send + Sync {
    fn detect(&self, capability: &str) -> bool;
}

/// Probe backed by a fixed set of capability names.
///
/// The default probe for [`super::EnvironmentSources`]; also the natural
/// choice for tests and embedders that know their feature set up front.
#[derive(Debug, Clone, Default)]
pub struct StaticCapabilities {
    names: HashSet<String>,
}

impl StaticCapabilities {
    pub fn new() -> Self {
        Self {
            names: HashSet::new(),
        }
    }

    /// Add one capability name (builder style)
    pub fn with(mut self, name: impl Into<String>) -> Self {
        self.names.insert(name.into());
        self
    }

    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl CapabilityProbe for StaticCapabilities {
    fn detect(&self, capability: &str) -> bool {
        self.names.contains(capability)
    }
}

/// Probe that treats capability names as loadable shared libraries.
///
/// A bare name like `ssl` is expanded to the platform filename
/// (`libssl.so`, `ssl.dll`, ...); names containing a path separator or an
/// extension are passed through untouched. The library is unloaded again
/// as soon as the check completes.
#[derive(Debug, Clone, Copy, Default)]
pub struct SharedLibraryProbe;

impl CapabilityProbe for SharedLibraryProbe {
    fn detect(&self, capability: &str) -> bool {
        let candidate: OsString = if capability.contains('/') || capability.contains('.') {
            capability.into()
        } else {
            library_filename(capability)
        };
        match unsafe { Library::new(&candidate) } {
            Ok(_library) => true,
            Err(e) => {
                log::debug!("Capability '{}' is not loadable: {}", capability, e);
                false
            }
        }
    }
}

struct FnProbe<F> {
    probe: F,
}

impl<F> fmt::Debug for FnProbe<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnProbe").finish_non_exhaustive()
    }
}

impl<F> CapabilityProbe for FnProbe<F>
where
    F: Fn(&str) -> bool + Send + Sync,
{
    fn detect(&self, capability: &str) -> bool {
        (self.probe)(capability)
    }
}

/// Wrap a closure as a capability probe
pub fn capability_fn<F>(f: F) -> impl CapabilityProbe + fmt::Debug
where
    F: Fn(&str) -> bool + Send + Sync + 'static,
{
    FnProbe { probe: f }
}
