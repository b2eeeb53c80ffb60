//! `doctree add`: register a directory for auto-indexing.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tracing::debug;

use crate::config::{default_project_name, Config};
use crate::registry::{add_project, CatalogStore};

/// Register `path` in the catalog under `data_dir`.
pub async fn run(path: &Path, project: Option<String>, data_dir: &Path, config: &Config) -> Result<()> {
    let name = project.unwrap_or_else(default_project_name);

    fs::create_dir_all(data_dir)
        .with_context(|| format!("Failed to create data directory {:?}", data_dir))?;

    // First run: leave an editable config next to the catalog
    let config_path = Config::config_path(data_dir);
    if !config_path.exists() {
        config.save(data_dir)?;
        debug!("Wrote default config to {:?}", config_path);
    }

    let store = CatalogStore::in_data_dir(data_dir);

    let added = add_project(path, &name, store.path(), &config.fingerprint)
        .await
        .with_context(|| format!("Failed to register {:?} in {:?}", path, store.path()))?;

    println!("Added project '{}' at {}", added.name, added.display_path());
    if added.has_fingerprint() {
        println!("Fingerprint: {}", added.hash);
    } else {
        println!("Fingerprint unavailable; the project was registered without one.");
    }

    Ok(())
}
