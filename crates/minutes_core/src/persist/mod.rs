//! Typed persistent state slots and their serialization strategies.
//!
//! # Responsibility
//! - Map in-memory collections to JSON text stored by a [`KvRepository`].
//! - Reject unknown storage kinds at configuration time.
//! - Surface corrupted stored data instead of masking it as "no data".
//!
//! [`KvRepository`]: crate::repo::kv_repo::KvRepository

use crate::db::DbError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod codec;
pub mod value;

pub type PersistResult<T> = Result<T, PersistError>;

/// Error raised while configuring, loading or saving a persistent slot.
#[derive(Debug)]
pub enum PersistError {
    /// Stored text for `key` cannot be decoded by the field's codec.
    StorageCorruption {
        key: String,
        source: serde_json::Error,
    },
    /// `kind` is not a known storage kind, or does not fit the field's codec.
    UnsupportedStorageKind { key: String, kind: String },
    /// Two fields of one layout are configured with the same storage key.
    DuplicateKey { key: String },
    /// In-memory value could not be serialized.
    Encode {
        key: String,
        source: serde_json::Error,
    },
    Storage(DbError),
}

impl Display for PersistError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::StorageCorruption { key, source } => {
                write!(f, "stored value for `{key}` is corrupted: {source}")
            }
            Self::UnsupportedStorageKind { key, kind } => {
                write!(f, "unsupported storage kind `{kind}` for `{key}`")
            }
            Self::DuplicateKey { key } => {
                write!(f, "storage key `{key}` is assigned to more than one field")
            }
            Self::Encode { key, source } => write!(f, "failed to encode `{key}`: {source}"),
            Self::Storage(err) => write!(f, "{err}"),
        }
    }
}

impl Error for PersistError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::StorageCorruption { source, .. } | Self::Encode { source, .. } => Some(source),
            Self::UnsupportedStorageKind { .. } | Self::DuplicateKey { .. } => None,
            Self::Storage(err) => Some(err),
        }
    }
}

impl From<DbError> for PersistError {
    fn from(value: DbError) -> Self {
        Self::Storage(value)
    }
}
