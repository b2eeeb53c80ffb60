use anyhow::Result;
use std::fs;
use tempfile::TempDir;

use doctree::config::FingerprintConfig;
use doctree::fingerprint::{try_compute_fingerprint, FingerprintOptions};
use doctree::registry::{add_project, CatalogStore, RegisterError};
use doctree::UNAVAILABLE_FINGERPRINT;

use crate::helpers::test_utils::create_project;

#[tokio::test]
async fn test_first_add_then_second_add_keeps_first_record() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let proj = create_project(temp_dir.path(), "proj", &[("a.txt", "hello")]);
    let other = create_project(temp_dir.path(), "other", &[("b.txt", "world")]);
    let catalog_path = temp_dir.path().join("catalog.json");
    let config = FingerprintConfig::default();

    add_project(&proj, "myproj", &catalog_path, &config).await?;

    let store = CatalogStore::new(&catalog_path);
    let after_first = store.load()?;
    assert_eq!(after_first.len(), 1);
    let first = &after_first.projects()[0];
    assert_eq!(first.name, "myproj");
    assert_eq!(first.path, proj);
    assert_ne!(first.hash, UNAVAILABLE_FINGERPRINT);

    add_project(&other, "other", &catalog_path, &config).await?;

    let after_second = store.load()?;
    assert_eq!(after_second.len(), 2);
    assert_eq!(&after_second.projects()[0], first);
    assert_eq!(after_second.projects()[1].path, other);

    Ok(())
}

#[tokio::test]
async fn test_repeated_adds_append_in_call_order() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let proj = create_project(temp_dir.path(), "proj", &[("src/lib.rs", "pub fn f() {}")]);
    let catalog_path = temp_dir.path().join("autoindex");
    let config = FingerprintConfig::default();

    let names: Vec<String> = (0..5).map(|i| format!("run-{}", i)).collect();
    for name in &names {
        add_project(&proj, name, &catalog_path, &config).await?;
    }

    let catalog = CatalogStore::new(&catalog_path).load()?;
    let recorded: Vec<&str> = catalog.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(recorded, names.iter().map(String::as_str).collect::<Vec<_>>());

    // Same untouched tree, same fingerprint every time
    let first_hash = &catalog.projects()[0].hash;
    assert!(catalog.iter().all(|p| &p.hash == first_hash));

    Ok(())
}

#[tokio::test]
async fn test_recorded_hash_tracks_tree_changes() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let proj = create_project(
        temp_dir.path(),
        "proj",
        &[("a.txt", "hello"), ("docs/guide.md", "# Guide")],
    );
    let catalog_path = temp_dir.path().join("autoindex");
    let config = FingerprintConfig::default();

    let before = add_project(&proj, "p", &catalog_path, &config).await?;
    assert_eq!(
        before.hash,
        try_compute_fingerprint(&proj, &FingerprintOptions::default())?
    );

    fs::write(proj.join("docs/guide.md"), "# Guide v2")?;
    let after = add_project(&proj, "p", &catalog_path, &config).await?;

    assert_ne!(before.hash, after.hash);
    Ok(())
}

#[tokio::test]
async fn test_unavailable_fingerprint_does_not_fail_add() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let catalog_path = temp_dir.path().join("autoindex");
    let missing = temp_dir.path().join("not-there");

    let added = add_project(&missing, "ghost", &catalog_path, &FingerprintConfig::default()).await?;

    assert_eq!(added.hash, UNAVAILABLE_FINGERPRINT);
    assert!(!added.has_fingerprint());

    let catalog = CatalogStore::new(&catalog_path).load()?;
    assert_eq!(catalog.projects(), &[added]);
    Ok(())
}

#[tokio::test]
async fn test_zero_timeout_still_registers() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let proj = create_project(temp_dir.path(), "proj", &[("a.txt", "hello")]);
    let catalog_path = temp_dir.path().join("autoindex");
    let config = FingerprintConfig {
        timeout_secs: 0,
        include_mtime: false,
    };

    let added = add_project(&proj, "p", &catalog_path, &config).await?;

    // Either the walk won the race or the sentinel was recorded; never an error
    assert!(added.hash == UNAVAILABLE_FINGERPRINT || added.hash.len() == 64);
    assert_eq!(CatalogStore::new(&catalog_path).load()?.len(), 1);
    Ok(())
}

#[tokio::test]
async fn test_corrupt_catalog_is_left_untouched() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let proj = create_project(temp_dir.path(), "proj", &[("a.txt", "hello")]);
    let catalog_path = temp_dir.path().join("autoindex");
    fs::write(&catalog_path, "[{\"name\": \"half")?;

    let result = add_project(&proj, "p", &catalog_path, &FingerprintConfig::default()).await;

    let err = result.unwrap_err();
    assert!(matches!(err, RegisterError::Catalog(_)));
    assert!(err.to_string().contains("autoindex"));
    assert_eq!(fs::read_to_string(&catalog_path)?, "[{\"name\": \"half");
    Ok(())
}
