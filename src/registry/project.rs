//! Registered project records and the ordered catalog that holds them.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A directory registered for auto-indexing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisteredProject {
    /// Human-readable project name (not required to be unique)
    pub name: String,
    /// Absolute path to the project root
    pub path: PathBuf,
    /// Fingerprint of the directory tree at registration time
    pub hash: String,
}

impl RegisteredProject {
    /// Create a new record.
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>, hash: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            hash: hash.into(),
        }
    }

    /// Check if the project path exists on disk.
    pub fn path_exists(&self) -> bool {
        self.path.exists()
    }

    /// Get a display-friendly representation of the project path.
    pub fn display_path(&self) -> String {
        self.path.display().to_string()
    }

    /// Whether the recorded hash is the "fingerprint unavailable" sentinel.
    pub fn has_fingerprint(&self) -> bool {
        self.hash != crate::fingerprint::UNAVAILABLE_FINGERPRINT
    }
}

/// Ordered list of registered projects.
///
/// Serialized transparently as a JSON array; insertion order is preserved
/// and duplicates (by name or path) are allowed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    projects: Vec<RegisteredProject>,
}

impl Catalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record at the end of the catalog.
    pub fn push(&mut self, project: RegisteredProject) {
        self.projects.push(project);
    }

    /// Records in insertion order.
    pub fn projects(&self) -> &[RegisteredProject] {
        &self.projects
    }

    pub fn len(&self) -> usize {
        self.projects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, RegisteredProject> {
        self.projects.iter()
    }
}

impl From<Vec<RegisteredProject>> for Catalog {
    fn from(projects: Vec<RegisteredProject>) -> Self {
        Self { projects }
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a RegisteredProject;
    type IntoIter = std::slice::Iter<'a, RegisteredProject>;

    fn into_iter(self) -> Self::IntoIter {
        self.projects.iter()
    }
}
