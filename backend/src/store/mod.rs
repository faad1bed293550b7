//! Persistence for the model registry: metadata documents in [`records`],
//! uploaded bytes in [`files`].

pub mod files;
pub mod records;

pub use files::{FileStore, FileStoreError};
pub use records::{Document, ModelId, RecordStore, StoreError};
