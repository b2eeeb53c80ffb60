//! Canonical recursive walk feeding a SHA-256 accumulator.

use sha2::{Digest, Sha256};
use std::fs::{self, FileType, Metadata};
use std::io::{self, Read};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::UNIX_EPOCH;
use walkdir::{DirEntry, WalkDir};

use super::{FingerprintError, FingerprintOptions};

const TAG_DIR: u8 = b'd';
const TAG_FILE: u8 = b'f';
const TAG_SYMLINK: u8 = b'l';
const TAG_FIFO: u8 = b'p';
const TAG_SOCKET: u8 = b's';
const TAG_BLOCK_DEVICE: u8 = b'b';
const TAG_CHAR_DEVICE: u8 = b'c';
const TAG_OTHER: u8 = b'o';

const READ_CHUNK: usize = 64 * 1024;

/// Hash every entry under `root` (the root included) in file-name order.
///
/// Each entry contributes its kind, its relative path, its permission bits,
/// optionally its mtime, and then its content (regular files) or link target
/// (symlinks). Special files (fifos, sockets, devices) are never opened.
/// Variable-length fields are length-prefixed.
///
/// `cancel` is polled between entries and between read chunks.
pub(super) fn hash_tree(
    root: &Path,
    options: &FingerprintOptions,
    cancel: &AtomicBool,
) -> Result<String, FingerprintError> {
    let root_meta = fs::metadata(root).map_err(|source| FingerprintError::Io {
        path: root.to_path_buf(),
        source,
    })?;
    if !root_meta.is_dir() {
        return Err(FingerprintError::NotADirectory(root.to_path_buf()));
    }

    let mut hasher = Sha256::new();
    let mut entries = 0usize;

    for entry in WalkDir::new(root).follow_links(false).sort_by_file_name() {
        check_cancelled(cancel)?;
        let entry = entry?;
        hash_entry(&mut hasher, root, &entry, options, cancel)?;
        entries += 1;
    }

    tracing::trace!("Hashed {} entries under {:?}", entries, root);
    Ok(hex::encode(hasher.finalize()))
}

fn check_cancelled(cancel: &AtomicBool) -> Result<(), FingerprintError> {
    if cancel.load(Ordering::Relaxed) {
        Err(FingerprintError::Cancelled)
    } else {
        Ok(())
    }
}

fn hash_entry(
    hasher: &mut Sha256,
    root: &Path,
    entry: &DirEntry,
    options: &FingerprintOptions,
    cancel: &AtomicBool,
) -> Result<(), FingerprintError> {
    let path = entry.path();
    let metadata = entry.metadata()?;
    let relative = path.strip_prefix(root).unwrap_or(path);
    let tag = entry_tag(entry.file_type());

    hasher.update([tag]);
    update_framed(hasher, &relative_path_bytes(relative));
    hasher.update(permission_bits(&metadata).to_le_bytes());

    if options.include_mtime {
        hasher.update(mtime_nanos(&metadata).to_le_bytes());
    }

    let io_err = |source: io::Error| FingerprintError::Io {
        path: path.to_path_buf(),
        source,
    };

    match tag {
        TAG_SYMLINK => {
            let target = fs::read_link(path).map_err(io_err)?;
            update_framed(hasher, &relative_path_bytes(&target));
        }
        TAG_FILE => {
            hasher.update(metadata.len().to_le_bytes());
            let file = fs::File::open(path).map_err(io_err)?;
            hash_content(hasher, file, cancel).map_err(|e| match e {
                ContentError::Io(source) => io_err(source),
                ContentError::Cancelled => FingerprintError::Cancelled,
            })?;
        }
        _ => {}
    }

    Ok(())
}

fn entry_tag(file_type: FileType) -> u8 {
    if file_type.is_symlink() {
        TAG_SYMLINK
    } else if file_type.is_dir() {
        TAG_DIR
    } else if file_type.is_file() {
        TAG_FILE
    } else {
        special_tag(file_type)
    }
}

#[cfg(unix)]
fn special_tag(file_type: FileType) -> u8 {
    use std::os::unix::fs::FileTypeExt;

    if file_type.is_fifo() {
        TAG_FIFO
    } else if file_type.is_socket() {
        TAG_SOCKET
    } else if file_type.is_block_device() {
        TAG_BLOCK_DEVICE
    } else if file_type.is_char_device() {
        TAG_CHAR_DEVICE
    } else {
        TAG_OTHER
    }
}

#[cfg(not(unix))]
fn special_tag(_file_type: FileType) -> u8 {
    TAG_OTHER
}

enum ContentError {
    Io(io::Error),
    Cancelled,
}

fn hash_content(
    hasher: &mut Sha256,
    mut reader: impl Read,
    cancel: &AtomicBool,
) -> Result<(), ContentError> {
    let mut buf = vec![0u8; READ_CHUNK];
    loop {
        if cancel.load(Ordering::Relaxed) {
            return Err(ContentError::Cancelled);
        }
        match reader.read(&mut buf) {
            Ok(0) => return Ok(()),
            Ok(n) => hasher.update(&buf[..n]),
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(ContentError::Io(e)),
        }
    }
}

fn update_framed(hasher: &mut Sha256, bytes: &[u8]) {
    hasher.update((bytes.len() as u64).to_le_bytes());
    hasher.update(bytes);
}

#[cfg(unix)]
fn relative_path_bytes(path: &Path) -> Vec<u8> {
    use std::os::unix::ffi::OsStrExt;

    let mut out = Vec::new();
    for (i, component) in path.components().enumerate() {
        if i > 0 {
            out.push(b'/');
        }
        out.extend_from_slice(component.as_os_str().as_bytes());
    }
    out
}

#[cfg(not(unix))]
fn relative_path_bytes(path: &Path) -> Vec<u8> {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join("/")
        .into_bytes()
}

#[cfg(unix)]
fn permission_bits(metadata: &Metadata) -> u32 {
    use std::os::unix::fs::PermissionsExt;
    metadata.permissions().mode() & 0o7777
}

#[cfg(not(unix))]
fn permission_bits(metadata: &Metadata) -> u32 {
    u32::from(metadata.permissions().readonly())
}

fn mtime_nanos(metadata: &Metadata) -> u128 {
    metadata
        .modified()
        .ok()
        .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
        .map(|d| d.as_nanos())
        .unwrap_or(0)
}
