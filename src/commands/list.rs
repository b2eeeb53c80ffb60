//! `doctree list`: show the registered projects.

use anyhow::{Context, Result};
use std::path::Path;

use crate::fingerprint::UNAVAILABLE_FINGERPRINT;
use crate::registry::CatalogStore;

const HASH_WIDTH: usize = 12;

/// Print the catalog under `data_dir` in registration order.
pub fn run(data_dir: &Path) -> Result<()> {
    let store = CatalogStore::in_data_dir(data_dir);
    let catalog = store
        .load()
        .with_context(|| format!("Failed to list projects from {:?}", store.path()))?;

    if catalog.is_empty() {
        println!("No projects registered.");
        println!("\nTo register a directory, run:");
        println!("  doctree add <path>");
        return Ok(());
    }

    println!("{:<20} {:<50} {:<12}", "NAME", "PATH", "HASH");
    println!("{}", "-".repeat(84));

    for project in &catalog {
        let path_display = truncate_path(&project.display_path(), 48);
        let path_status = if project.path_exists() {
            path_display
        } else {
            format!("{} (missing)", path_display)
        };

        let hash = if project.hash == UNAVAILABLE_FINGERPRINT {
            "-".to_string()
        } else {
            truncate_string(&project.hash, HASH_WIDTH)
        };

        println!(
            "{:<20} {:<50} {:<12}",
            truncate_string(&project.name, 18),
            path_status,
            hash
        );
    }

    println!("\nTotal: {} project(s)", catalog.len());
    println!("Catalog: {}", store.path().display());

    Ok(())
}

/// Truncate a string to at most `max_len` characters, adding "..." if truncated.
fn truncate_string(s: &str, max_len: usize) -> String {
    let len = s.chars().count();
    if len <= max_len {
        s.to_string()
    } else if max_len > 3 {
        let kept: String = s.chars().take(max_len - 3).collect();
        format!("{}...", kept)
    } else {
        s.chars().take(max_len).collect()
    }
}

/// Truncate a path to at most `max_len` characters, keeping the end.
fn truncate_path(s: &str, max_len: usize) -> String {
    let len = s.chars().count();
    if len <= max_len {
        s.to_string()
    } else if max_len > 3 {
        let kept: String = s.chars().skip(len - (max_len - 3)).collect();
        format!("...{}", kept)
    } else {
        s.chars().skip(len - max_len).collect()
    }
}
