//! Named, typed state slot mirrored to durable storage.
//!
//! # Invariants
//! - Loading an absent key yields the default and performs no write.
//! - Loading a present key that fails to decode is an error, never a default.
//! - The held value is only ever replaced, never mutated in place.

use super::codec::{CollectionCodec, StorageKind};
use super::{PersistError, PersistResult};
use crate::repo::kv_repo::KvRepository;
use log::{debug, error};

/// Storage key plus the codec that owns its serialized shape.
///
/// Construct via [`FieldBinding::configure`] so the requested kind is checked
/// against the codec before any storage access.
#[derive(Debug, Clone)]
pub struct FieldBinding<C> {
    key: String,
    codec: C,
}

impl<C: CollectionCodec> FieldBinding<C> {
    /// Binds `key` to `codec`, requiring `kind` to name the codec's shape.
    ///
    /// # Errors
    /// - [`PersistError::UnsupportedStorageKind`] when `kind` is unknown or
    ///   names the other shape.
    pub fn configure(key: impl Into<String>, kind: &str, codec: C) -> PersistResult<Self> {
        let key = key.into();
        match kind.parse::<StorageKind>() {
            Ok(parsed) if parsed == codec.kind() => Ok(Self { key, codec }),
            _ => {
                error!(
                    "event=field_configure module=persist status=error key={key} kind={kind} error_code=unsupported_storage_kind"
                );
                Err(PersistError::UnsupportedStorageKind {
                    key,
                    kind: kind.to_string(),
                })
            }
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Serializes `value` into the text stored under this key.
    pub fn encode_raw(&self, value: &C::Value) -> PersistResult<String> {
        let encoded = self
            .codec
            .encode(value)
            .map_err(|source| PersistError::Encode {
                key: self.key.clone(),
                source,
            })?;
        Ok(encoded.to_string())
    }

    fn decode_raw(&self, raw: &str) -> PersistResult<C::Value> {
        serde_json::from_str(raw)
            .and_then(|parsed| self.codec.decode(parsed))
            .map_err(|source| PersistError::StorageCorruption {
                key: self.key.clone(),
                source,
            })
    }
}

/// Reads the value stored under `key`, or returns `default` if none exists.
///
/// # Errors
/// - [`PersistError::StorageCorruption`] when the stored text does not decode.
/// - [`PersistError::Storage`] on repository failures.
pub fn load_value<R, C>(
    repo: &R,
    binding: &FieldBinding<C>,
    default: C::Value,
) -> PersistResult<C::Value>
where
    R: KvRepository + ?Sized,
    C: CollectionCodec,
{
    match repo.read_raw(binding.key())? {
        Some(raw) => binding.decode_raw(&raw).map_err(|err| {
            error!(
                "event=value_load module=persist status=error key={} error_code=storage_corruption",
                binding.key()
            );
            err
        }),
        None => {
            debug!(
                "event=value_load module=persist status=ok key={} source=default",
                binding.key()
            );
            Ok(default)
        }
    }
}

/// Writes `value` under `key`, replacing any prior value.
pub fn save_value<R, C>(repo: &R, binding: &FieldBinding<C>, value: &C::Value) -> PersistResult<()>
where
    R: KvRepository + ?Sized,
    C: CollectionCodec,
{
    let raw = binding.encode_raw(value)?;
    repo.write_batch(&[(binding.key(), raw)])?;
    Ok(())
}

/// A field binding together with its current in-memory snapshot.
pub struct PersistentValue<C: CollectionCodec> {
    binding: FieldBinding<C>,
    current: C::Value,
}

impl<C: CollectionCodec> PersistentValue<C> {
    /// Rehydrates the slot from `repo`, falling back to `default`.
    pub fn load<R>(repo: &R, binding: FieldBinding<C>, default: C::Value) -> PersistResult<Self>
    where
        R: KvRepository + ?Sized,
    {
        let current = load_value(repo, &binding, default)?;
        Ok(Self { binding, current })
    }

    pub fn key(&self) -> &str {
        self.binding.key()
    }

    /// Current snapshot.
    pub fn get(&self) -> &C::Value {
        &self.current
    }

    /// Swaps in `next` and returns the snapshot it replaced.
    pub fn replace(&mut self, next: C::Value) -> C::Value {
        std::mem::replace(&mut self.current, next)
    }

    /// Returns `(key, encoded value)` ready for a batched write.
    pub fn encoded_entry(&self) -> PersistResult<(&str, String)> {
        Ok((self.binding.key(), self.binding.encode_raw(&self.current)?))
    }

    /// Writes the current snapshot to `repo`.
    pub fn save<R>(&self, repo: &R) -> PersistResult<()>
    where
        R: KvRepository + ?Sized,
    {
        save_value(repo, &self.binding, &self.current)
    }
}
