use std::fmt;

/// Eligibility record for one registered descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportEntry {
    pub id: String,
    /// Type name of the provided capability
    pub provides: String,
    pub matched: bool,
    /// Condition outcome or supersession note; never empty
    pub reason: String,
}

/// Condition outcomes for every registered descriptor, in registration
/// order, regardless of eligibility.
///
/// Retained by the orchestrator when the `debug` flag is set in the merged
/// environment; survives resolution and instantiation failures.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StartupReport {
    entries: Vec<ReportEntry>,
}

impl StartupReport {
    pub(crate) fn new(entries: Vec<ReportEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[ReportEntry] {
        &self.entries
    }

    pub fn get(&self, id: &str) -> Option<&ReportEntry> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    /// Entries admitted to the run
    pub fn matched(&self) -> impl Iterator<Item = &ReportEntry> {
        self.entries.iter().filter(|entry| entry.matched)
    }

    /// Entries excluded from the run
    pub fn excluded(&self) -> impl Iterator<Item = &ReportEntry> {
        self.entries.iter().filter(|entry| !entry.matched)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Display for StartupReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Startup condition report ({} component(s)):", self.entries.len())?;
        for entry in &self.entries {
            write!(
                f,
                "\n  [{}] {} ({}): {}",
                if entry.matched { '+' } else { '-' },
                entry.id,
                entry.provides,
                entry.reason
            )?;
        }
        Ok(())
    }
}
