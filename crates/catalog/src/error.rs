//! Error types for the directory catalog.

use std::path::PathBuf;

/// Errors produced while enumerating or reading the served directory.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("directory unavailable: {}: {source}", .path.display())]
    DirectoryUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
