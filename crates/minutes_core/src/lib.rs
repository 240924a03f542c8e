//! Core of the meeting minutes tool.
//!
//! Owns the persisted attendee/issue/note selection and renders the minutes
//! document from it. Front ends only translate user actions into calls here.

pub mod catalog;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod persist;
pub mod repo;
pub mod service;

pub use catalog::{filter_issues, load_catalog, parse_catalog, CatalogError, CatalogResult};
pub use config::MinutesConfig;
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::issue::{AttendeeTag, Issue, IssueNumber};
pub use model::selection::{AttendeeSet, IssueSet, NoteMap, SelectionSnapshot};
pub use persist::codec::{CollectionCodec, KeyValueMapCodec, StorageKind, UniqueSetCodec};
pub use persist::value::{load_value, save_value, FieldBinding, PersistentValue};
pub use persist::{PersistError, PersistResult};
pub use repo::kv_repo::{KvRepository, SqliteKvRepository};
pub use service::minutes_service::{generate_minutes, normalize_title, render_minutes};
pub use service::selection_service::{FieldLayout, SelectionStore, StorageLayout};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
