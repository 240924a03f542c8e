//! Domain types for issues, attendees and the selection aggregate.
//!
//! # Invariants
//! - Issues are read-only inputs; nothing in core creates or mutates them.
//! - Selection collections are persistent (structurally shared) values, so a
//!   clone is a cheap, independent snapshot.

pub mod issue;
pub mod selection;
