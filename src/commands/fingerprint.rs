//! `doctree fingerprint`: print the fingerprint of a directory.

use anyhow::{bail, Result};
use std::path::Path;

use crate::config::Config;
use crate::fingerprint::{fingerprint_with_timeout, UNAVAILABLE_FINGERPRINT};

pub async fn run(path: &Path, include_mtime: bool, config: &Config) -> Result<()> {
    let mut options = config.fingerprint.options();
    options.include_mtime |= include_mtime;

    let digest = fingerprint_with_timeout(path, options, config.fingerprint.timeout()).await;

    if digest == UNAVAILABLE_FINGERPRINT {
        bail!("Fingerprint unavailable for {:?}", path);
    }

    println!("{}", digest);
    Ok(())
}
