//! Error types shared by the engine and its hosts

use thiserror::Error;

/// Errors raised while resolving a configuration override
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The override document was not a mapping at the top level
    #[error("configuration override must be a mapping, got {0}")]
    NotAMapping(&'static str),

    /// The merged document does not fit the schema (unknown option, wrong type)
    #[error("invalid configuration: {0}")]
    Invalid(#[from] serde_json::Error),
}

/// Result type for configuration resolution
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors raised while mounting an engine onto a host surface
#[derive(Error, Debug)]
pub enum MountError {
    /// The named container element does not exist
    #[error("container element #{0} not found")]
    MissingContainer(String),

    /// The host could not provide a 2D drawing context
    #[error("2d drawing context unavailable: {0}")]
    ContextUnavailable(String),

    /// The configuration override could not be resolved
    #[error(transparent)]
    Config(#[from] ConfigError),
}
