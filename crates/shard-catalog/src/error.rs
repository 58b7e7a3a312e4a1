//! Errors surfaced by catalog loading and lookup.

use thiserror::Error;

/// Errors that can occur when loading or querying the static catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Failed to read a catalog file from disk.
    #[error("failed to read catalog file {path}: {source}")]
    Io {
        /// The file that could not be read.
        path: String,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// Failed to parse a catalog file's YAML content.
    #[error("failed to parse catalog file {path}: {source}")]
    Yaml {
        /// The file that failed to parse.
        path: String,
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// A lookup was attempted for an id not present in the catalog.
    #[error("{kind} not found: {id}")]
    NotFound {
        /// The kind of entry looked up (e.g. `"item"`, `"recipe"`).
        kind: &'static str,
        /// The id that was not found.
        id: String,
    },
}
