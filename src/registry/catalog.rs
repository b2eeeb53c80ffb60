//! Catalog file stored at `<data-dir>/autoindex`.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::debug;

use super::project::Catalog;

/// File name of the catalog inside the data directory.
pub const CATALOG_FILE: &str = "autoindex";

/// Errors while reading or writing the catalog file.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// The catalog file exists but could not be read.
    #[error("Failed to read catalog from {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The catalog file is not a valid serialized catalog.
    #[error("Failed to parse catalog from {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The catalog could not be serialized.
    #[error("Failed to serialize catalog: {0}")]
    Serialize(#[source] serde_json::Error),

    /// Writing the new catalog failed; the previous file is untouched.
    #[error("Failed to write catalog to {path:?}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Loads and persists the catalog at a fixed file path.
#[derive(Debug, Clone)]
pub struct CatalogStore {
    path: PathBuf,
}

impl CatalogStore {
    /// Create a store for the catalog file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Create a store for the catalog file inside `data_dir`.
    pub fn in_data_dir(data_dir: &Path) -> Self {
        Self::new(data_dir.join(CATALOG_FILE))
    }

    /// Path of the catalog file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the catalog from disk.
    ///
    /// A missing file is an empty catalog; any other read failure or
    /// malformed content is an error.
    pub fn load(&self) -> Result<Catalog, CatalogError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("No existing catalog at {:?}, starting empty", self.path);
                return Ok(Catalog::new());
            }
            Err(source) => {
                return Err(CatalogError::Read {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        let catalog: Catalog =
            serde_json::from_str(&content).map_err(|source| CatalogError::Parse {
                path: self.path.clone(),
                source,
            })?;

        debug!("Loaded {} project(s) from {:?}", catalog.len(), self.path);
        Ok(catalog)
    }

    /// Replace the catalog file with `catalog`.
    ///
    /// Writes a uniquely named sibling temp file, syncs it, then renames it
    /// over the target so readers only ever see a complete catalog.
    /// Concurrent saves never share a temp file. Parent directories are not
    /// created.
    pub fn save(&self, catalog: &Catalog) -> Result<(), CatalogError> {
        let mut content =
            serde_json::to_string_pretty(catalog).map_err(CatalogError::Serialize)?;
        content.push('\n');

        let write_err = |source: io::Error| CatalogError::Write {
            path: self.path.clone(),
            source,
        };

        let temp = write_synced(self.parent_dir(), content.as_bytes()).map_err(write_err)?;
        // On failure the temp file is dropped, which removes it
        temp.persist(&self.path).map_err(|e| write_err(e.error))?;

        debug!("Saved {} project(s) to {:?}", catalog.len(), self.path);
        Ok(())
    }

    fn parent_dir(&self) -> &Path {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        }
    }
}

fn write_synced(dir: &Path, bytes: &[u8]) -> io::Result<NamedTempFile> {
    let mut temp = NamedTempFile::new_in(dir)?;
    temp.write_all(bytes)?;
    temp.as_file().sync_all()?;
    Ok(temp)
}
