//! Registering a directory in the catalog.

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

use super::catalog::{CatalogError, CatalogStore};
use super::project::RegisteredProject;
use crate::config::FingerprintConfig;
use crate::fingerprint::fingerprint_with_timeout;

/// Errors that abort a registration. Fingerprint failures never do.
#[derive(Error, Debug)]
pub enum RegisterError {
    /// The project name is empty or only whitespace.
    #[error("Project name must not be empty")]
    EmptyName,

    /// The target path could not be made absolute.
    #[error("Failed to resolve project path {path:?}: {source}")]
    PathResolution {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Loading or saving the catalog failed.
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

/// Append `{name, absolute path, fingerprint}` to the catalog at `catalog_path`.
///
/// The catalog is loaded (a missing file counts as empty), the record is
/// appended and the whole catalog is written back. If the write fails the
/// previous catalog file is left as it was. Returns the appended record.
pub async fn add_project(
    raw_path: &Path,
    project_name: &str,
    catalog_path: &Path,
    fingerprint: &FingerprintConfig,
) -> Result<RegisteredProject, RegisterError> {
    if project_name.trim().is_empty() {
        return Err(RegisterError::EmptyName);
    }

    let project_path =
        std::path::absolute(raw_path).map_err(|source| RegisterError::PathResolution {
            path: raw_path.to_path_buf(),
            source,
        })?;

    let store = CatalogStore::new(catalog_path);
    let mut catalog = store.load()?;

    let hash =
        fingerprint_with_timeout(&project_path, fingerprint.options(), fingerprint.timeout())
            .await;

    let project = RegisteredProject::new(project_name, project_path, hash);
    catalog.push(project.clone());
    store.save(&catalog)?;

    info!(
        "Registered project '{}' at {:?} ({} total)",
        project.name,
        project.path,
        catalog.len()
    );

    Ok(project)
}
