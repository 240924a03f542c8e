//! Use-case services over the persisted selection.
//!
//! # Responsibility
//! - Own selection mutations and their flush to storage.
//! - Render the minutes document from a selection snapshot.

pub mod minutes_service;
pub mod selection_service;
