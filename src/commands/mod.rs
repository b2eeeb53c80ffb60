pub mod add;
pub mod fingerprint;
pub mod list;
