//! File storage for uploaded originals.
//!
//! The `Storage` trait abstracts the upload directory so the registry and
//! cleanup service never touch the filesystem directly; `LocalStorage` is
//! the only backend - a flat local directory served statically by the API.
//!
//! **Key format:** keys are flat generated filenames,
//! `{epoch_millis}_{sanitized_original_name}`. See [`keys`].

mod keys;
mod local;
mod traits;

pub use keys::{generate_storage_key, sanitize_filename};
pub use local::LocalStorage;
pub use traits::{Storage, StorageEntry, StorageError, StorageResult};
