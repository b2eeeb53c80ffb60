pub mod cli;
pub mod commands;
pub mod config;
pub mod fingerprint;
pub mod logging;
pub mod registry;

pub use config::Config;
pub use fingerprint::{compute_fingerprint, FingerprintOptions, UNAVAILABLE_FINGERPRINT};
pub use registry::{add_project, Catalog, CatalogStore, RegisteredProject};
