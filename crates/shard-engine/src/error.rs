//! Error types for the shard engine binary.
//!
//! [`EngineError`] is the top-level error type that wraps every possible
//! startup failure so `main` can propagate with `?`.

/// Top-level error for the shard engine binary.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: shard_core::ConfigError,
    },

    /// The static catalog failed to load.
    #[error("catalog error: {source}")]
    Catalog {
        /// The underlying catalog error.
        #[from]
        source: shard_catalog::CatalogError,
    },

    /// The agent runner's environment-driven configuration was invalid.
    #[error("runner config error: {source}")]
    RunnerConfig {
        /// The underlying runner error.
        #[from]
        source: shard_agent_runner::RunnerError,
    },

    /// The HTTP server failed to bind or serve.
    #[error("server error: {source}")]
    Server {
        /// The underlying server error.
        #[from]
        source: shard_server::ServerError,
    },

    /// Reading a file from disk failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
