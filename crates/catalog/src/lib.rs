//! Directory catalog for the file server.
//!
//! Enumerates the entries of the single directory the server exposes and
//! answers exact-name existence queries. Nothing is cached: every query
//! re-reads the directory, so the answers always reflect what is on disk
//! at the moment of the call.

mod error;

pub use error::CatalogError;

use std::path::PathBuf;

use tokio::fs::{File, ReadDir};
use tracing::trace;

/// Read-only view of the served directory.
#[derive(Debug, Clone)]
pub struct Catalog {
    root: PathBuf,
}

impl Catalog {
    /// Creates a catalog rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Opens the directory and returns a lazy sequence of entry names.
    ///
    /// Names come back in the order the OS yields them, which is not
    /// guaranteed to be stable between calls. The returned sequence can
    /// be walked once; call `entries` again to re-enumerate.
    pub async fn entries(&self) -> Result<Entries, CatalogError> {
        let read_dir = tokio::fs::read_dir(&self.root)
            .await
            .map_err(|source| self.unavailable(source))?;
        Ok(Entries {
            root: self.root.clone(),
            read_dir,
        })
    }

    /// Returns `true` if an entry named exactly `name` exists.
    ///
    /// Case-sensitive, full-string comparison against a fresh enumeration.
    pub async fn contains(&self, name: &str) -> Result<bool, CatalogError> {
        let mut entries = self.entries().await?;
        while let Some(entry) = entries.next_name().await? {
            if entry == name {
                trace!(name, "catalog hit");
                return Ok(true);
            }
        }
        trace!(name, "catalog miss");
        Ok(false)
    }

    /// Opens the entry `name` for reading.
    ///
    /// Callers are expected to have checked the name with [`contains`]
    /// first; the entry can still vanish between the check and the open.
    ///
    /// [`contains`]: Self::contains
    pub async fn open(&self, name: &str) -> std::io::Result<File> {
        File::open(self.root.join(name)).await
    }

    fn unavailable(&self, source: std::io::Error) -> CatalogError {
        CatalogError::DirectoryUnavailable {
            path: self.root.clone(),
            source,
        }
    }
}

/// A single pass over the directory's entry names.
#[derive(Debug)]
pub struct Entries {
    root: PathBuf,
    read_dir: ReadDir,
}

impl Entries {
    /// Yields the next entry name, or `None` once the directory is exhausted.
    pub async fn next_name(&mut self) -> Result<Option<String>, CatalogError> {
        match self.read_dir.next_entry().await {
            Ok(Some(entry)) => Ok(Some(entry.file_name().to_string_lossy().into_owned())),
            Ok(None) => Ok(None),
            Err(source) => Err(CatalogError::DirectoryUnavailable {
                path: self.root.clone(),
                source,
            }),
        }
    }

    /// Drains the remaining names into a vector.
    pub async fn collect_names(mut self) -> Result<Vec<String>, CatalogError> {
        let mut names = Vec::new();
        while let Some(name) = self.next_name().await? {
            names.push(name);
        }
        Ok(names)
    }
}
