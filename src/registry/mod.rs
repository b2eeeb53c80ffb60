//! Catalog of projects registered for auto-indexing.
//!
//! The catalog is an ordered JSON array of `{name, path, hash}` records
//! stored at `<data-dir>/autoindex`, where `hash` is the directory
//! fingerprint taken at registration time (see [`crate::fingerprint`]).
//!
//! Records are only ever appended; the same path or name may appear more
//! than once.

mod catalog;
mod project;
mod register;

pub use catalog::{CatalogError, CatalogStore, CATALOG_FILE};
pub use project::{Catalog, RegisteredProject};
pub use register::{add_project, RegisterError};
