//! # Keel Core Environment Errors
//!
//! Defines error types specific to building the environment snapshot.
//!
//! These cover configuration file I/O, format detection, and value
//! (de)serialization. Capability probes and condition predicates never
//! surface errors through this type; their failures are recovered where
//! they occur.
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EnvironmentSystemError {
    #[error("I/O error during operation '{operation}' on path '{path}': {source}")]
    Io {
        path: PathBuf,
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Configuration file not found at path: {0}")]
    FileNotFound(PathBuf),

    #[error("Serialization to '{format}' failed: {source}")]
    Serialization {
        format: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync + 'static>,
    },

    #[error("Deserialization from '{format}' failed: {source}")]
    Deserialization {
        format: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync + 'static>,
    },

    #[error("Unsupported configuration format for path: {0}")]
    UnsupportedFormat(PathBuf),
}

// Helper for creating Io errors, ensuring path is always included.
impl EnvironmentSystemError {
    pub fn io(source: std::io::Error, operation: impl Into<String>, path: PathBuf) -> Self {
        EnvironmentSystemError::Io {
            source,
            operation: operation.into(),
            path,
        }
    }
}
