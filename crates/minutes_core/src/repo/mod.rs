//! Durable storage contracts and their SQLite implementation.
//!
//! # Responsibility
//! - Store opaque serialized values under flat string keys.
//! - Keep SQL details out of the persistence and service layers.

pub mod kv_repo;
