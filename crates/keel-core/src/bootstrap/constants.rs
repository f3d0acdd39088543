/// Engine name
pub const ENGINE_NAME: &str = "keel";

/// Engine version
pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Configuration key that enables the startup condition report
pub const DEBUG_KEY: &str = "debug";

/// Conventional configuration file consulted when no explicit path is given
pub const DEFAULT_CONFIG_FILE: &str = "application.toml";
