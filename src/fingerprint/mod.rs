//! Directory fingerprinting.
//!
//! A fingerprint is a SHA-256 digest (lowercase hex) over a canonical walk
//! of a directory tree: every file and subdirectory contributes its relative
//! path, permission bits and content. Modification times are only included
//! when [`FingerprintOptions::include_mtime`] is set, so under the default
//! options an untouched tree always yields the same fingerprint.
//!
//! Fingerprinting never fails a registration: callers use
//! [`compute_fingerprint`] or [`fingerprint_with_timeout`], which fall back
//! to [`UNAVAILABLE_FINGERPRINT`] and log a warning instead.

mod tree;

use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::oneshot;
use tracing::{debug, warn};

/// Recorded in place of a digest when the tree could not be fingerprinted.
pub const UNAVAILABLE_FINGERPRINT: &str = "0";

/// Errors while fingerprinting a directory.
#[derive(Error, Debug)]
pub enum FingerprintError {
    /// The path exists but is not a directory.
    #[error("Not a directory: {0:?}")]
    NotADirectory(PathBuf),

    /// Metadata or content of an entry could not be read.
    #[error("Failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The directory walk itself failed (permission denied, loop, ...).
    #[error("Failed to walk directory: {0}")]
    Walk(#[from] walkdir::Error),

    /// The fingerprint did not finish within the allotted time.
    #[error("Fingerprinting timed out after {0:?}")]
    Timeout(Duration),

    /// The walk was stopped through its cancel flag.
    #[error("Fingerprinting was cancelled")]
    Cancelled,

    /// The background worker panicked or could not be started.
    #[error("Fingerprint worker failed: {0}")]
    Worker(String),
}

/// Which metadata participates in the fingerprint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FingerprintOptions {
    /// Mix modification times into the digest. Touching a file then changes
    /// the fingerprint even when its content is unchanged.
    pub include_mtime: bool,
}

/// Fingerprint `dir`, returning the error on failure.
pub fn try_compute_fingerprint(
    dir: &Path,
    options: &FingerprintOptions,
) -> Result<String, FingerprintError> {
    tree::hash_tree(dir, options, &AtomicBool::new(false))
}

/// Fingerprint `dir`, degrading to [`UNAVAILABLE_FINGERPRINT`] on failure.
pub fn compute_fingerprint(dir: &Path, options: &FingerprintOptions) -> String {
    degrade(dir, try_compute_fingerprint(dir, options))
}

/// Fingerprint `dir` on a background thread, bounded by `timeout`.
///
/// A timeout, a worker panic or any walk error all yield
/// [`UNAVAILABLE_FINGERPRINT`]. On timeout the walk is told to stop and the
/// thread is left detached, so nothing (runtime shutdown included) waits
/// on it.
pub async fn fingerprint_with_timeout(
    dir: &Path,
    options: FingerprintOptions,
    timeout: Duration,
) -> String {
    let root = dir.to_path_buf();
    let result = run_bounded(timeout, move |cancel| {
        tree::hash_tree(&root, &options, cancel)
    })
    .await;
    degrade(dir, result)
}

async fn run_bounded<F>(timeout: Duration, job: F) -> Result<String, FingerprintError>
where
    F: FnOnce(&AtomicBool) -> Result<String, FingerprintError> + Send + 'static,
{
    let cancel = Arc::new(AtomicBool::new(false));
    let (tx, rx) = oneshot::channel();

    let worker_cancel = Arc::clone(&cancel);
    thread::Builder::new()
        .name("doctree-fingerprint".to_string())
        .spawn(move || {
            // The receiver is gone after a timeout
            let _ = tx.send(job(&worker_cancel));
        })
        .map_err(|e| FingerprintError::Worker(e.to_string()))?;

    match tokio::time::timeout(timeout, rx).await {
        Ok(Ok(result)) => result,
        Ok(Err(_)) => Err(FingerprintError::Worker(
            "worker exited without a result".to_string(),
        )),
        Err(_) => {
            cancel.store(true, Ordering::Relaxed);
            Err(FingerprintError::Timeout(timeout))
        }
    }
}

fn degrade(dir: &Path, result: Result<String, FingerprintError>) -> String {
    match result {
        Ok(digest) => {
            debug!("Fingerprint of {:?}: {}", dir, digest);
            digest
        }
        Err(e) => {
            warn!("Fingerprint unavailable for {:?}: {}", dir, e);
            UNAVAILABLE_FINGERPRINT.to_string()
        }
    }
}
