//! Selection store: attendees, selected issues and per-issue notes.
//!
//! # Responsibility
//! - Rehydrate the three collections from durable storage at open.
//! - Apply add/remove/update mutations as snapshot replacement.
//! - Flush all three collections before a mutation returns.
//!
//! # Invariants
//! - A snapshot handed out earlier is never changed by later mutations.
//! - A failed flush leaves the in-memory state as it was before the call.
//! - Writes are permissive: numbers and tags are not checked against the
//!   catalog or roster.

use crate::model::issue::{AttendeeTag, IssueNumber};
use crate::model::selection::{AttendeeSet, IssueSet, NoteMap, SelectionSnapshot};
use crate::persist::codec::{CollectionCodec, KeyValueMapCodec, StorageKind, UniqueSetCodec};
use crate::persist::value::{FieldBinding, PersistentValue};
use crate::persist::{PersistError, PersistResult};
use crate::repo::kv_repo::KvRepository;
use log::{error, info};

pub const ATTENDEES_KEY: &str = "attendees";
pub const SELECTED_ISSUES_KEY: &str = "selectedIssues";
pub const NOTES_KEY: &str = "notes";

/// Storage key and kind name for one persisted field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldLayout {
    pub key: String,
    pub kind: String,
}

impl FieldLayout {
    pub fn new(key: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            kind: kind.into(),
        }
    }
}

/// Per-field storage configuration of the selection store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageLayout {
    pub attendees: FieldLayout,
    pub selected_issues: FieldLayout,
    pub notes: FieldLayout,
}

impl Default for StorageLayout {
    fn default() -> Self {
        Self {
            attendees: FieldLayout::new(ATTENDEES_KEY, StorageKind::UniqueSet.as_str()),
            selected_issues: FieldLayout::new(
                SELECTED_ISSUES_KEY,
                StorageKind::UniqueSet.as_str(),
            ),
            notes: FieldLayout::new(NOTES_KEY, StorageKind::KeyValueMap.as_str()),
        }
    }
}

impl StorageLayout {
    /// Fails with `DuplicateKey` when two fields share a storage key.
    pub fn check_distinct_keys(&self) -> PersistResult<()> {
        let keys = [
            self.attendees.key.as_str(),
            self.selected_issues.key.as_str(),
            self.notes.key.as_str(),
        ];
        for (idx, key) in keys.iter().enumerate() {
            if keys[idx + 1..].contains(key) {
                return Err(PersistError::DuplicateKey {
                    key: (*key).to_string(),
                });
            }
        }
        Ok(())
    }
}

type AttendeeSlot = PersistentValue<UniqueSetCodec<AttendeeTag>>;
type IssueSlot = PersistentValue<UniqueSetCodec<IssueNumber>>;
type NoteSlot = PersistentValue<KeyValueMapCodec<IssueNumber, String>>;

/// Persisted selection state for one meeting.
pub struct SelectionStore<R: KvRepository> {
    repo: R,
    attendees: AttendeeSlot,
    selected_issues: IssueSlot,
    notes: NoteSlot,
}

impl<R: KvRepository> SelectionStore<R> {
    /// Validates `layout` and rehydrates every field from `repo`.
    ///
    /// # Errors
    /// - `DuplicateKey` before any storage read when two fields share a key.
    /// - `UnsupportedStorageKind` before any storage read when a field's kind
    ///   is unknown or does not fit the field.
    /// - `StorageCorruption` when a stored value cannot be decoded.
    pub fn open(repo: R, layout: &StorageLayout) -> PersistResult<Self> {
        if let Err(err) = layout.check_distinct_keys() {
            error!("event=selection_open module=selection status=error error={err}");
            return Err(err);
        }
        let attendee_binding = FieldBinding::configure(
            layout.attendees.key.as_str(),
            &layout.attendees.kind,
            UniqueSetCodec::<AttendeeTag>::new(),
        )?;
        let issue_binding = FieldBinding::configure(
            layout.selected_issues.key.as_str(),
            &layout.selected_issues.kind,
            UniqueSetCodec::<IssueNumber>::new(),
        )?;
        let note_binding = FieldBinding::configure(
            layout.notes.key.as_str(),
            &layout.notes.kind,
            KeyValueMapCodec::<IssueNumber, String>::new(),
        )?;

        let attendees = PersistentValue::load(&repo, attendee_binding, AttendeeSet::new())?;
        let selected_issues = PersistentValue::load(&repo, issue_binding, IssueSet::new())?;
        let notes = PersistentValue::load(&repo, note_binding, NoteMap::new())?;

        info!(
            "event=selection_open module=selection status=ok attendees={} selected_issues={} notes={}",
            attendees.get().len(),
            selected_issues.get().len(),
            notes.get().len()
        );

        Ok(Self {
            repo,
            attendees,
            selected_issues,
            notes,
        })
    }

    /// Opens with the default key names and kinds.
    pub fn open_default(repo: R) -> PersistResult<Self> {
        Self::open(repo, &StorageLayout::default())
    }

    /// Adds `tag` to the attendee set. Adding a present tag is a no-op.
    pub fn add_attendee(&mut self, tag: impl Into<AttendeeTag>) -> PersistResult<AttendeeSet> {
        let next = self.attendees.get().update(tag.into());
        self.commit("add_attendee", |store| &mut store.attendees, next)
    }

    /// Removes `tag` from the attendee set. Removing an absent tag is a no-op.
    pub fn remove_attendee(&mut self, tag: &str) -> PersistResult<AttendeeSet> {
        let next = self.attendees.get().without(tag);
        self.commit("remove_attendee", |store| &mut store.attendees, next)
    }

    pub fn add_selected_issue(&mut self, number: IssueNumber) -> PersistResult<IssueSet> {
        let next = self.selected_issues.get().update(number);
        self.commit("add_selected_issue", |store| &mut store.selected_issues, next)
    }

    /// Deselects `number`. Its note, if any, is kept.
    pub fn remove_selected_issue(&mut self, number: IssueNumber) -> PersistResult<IssueSet> {
        let next = self.selected_issues.get().without(&number);
        self.commit(
            "remove_selected_issue",
            |store| &mut store.selected_issues,
            next,
        )
    }

    /// Upserts the note for `number`. An empty string is stored as-is.
    pub fn set_note(
        &mut self,
        number: IssueNumber,
        text: impl Into<String>,
    ) -> PersistResult<NoteMap> {
        let next = self.notes.get().update(number, text.into());
        self.commit("set_note", |store| &mut store.notes, next)
    }

    pub fn attendees(&self) -> AttendeeSet {
        self.attendees.get().clone()
    }

    pub fn selected_issues(&self) -> IssueSet {
        self.selected_issues.get().clone()
    }

    pub fn notes(&self) -> NoteMap {
        self.notes.get().clone()
    }

    pub fn note(&self, number: IssueNumber) -> Option<&str> {
        self.notes.get().get(&number).map(String::as_str)
    }

    /// Returns all three collections as one immutable snapshot.
    pub fn snapshot(&self) -> SelectionSnapshot {
        SelectionSnapshot {
            attendees: self.attendees(),
            selected_issues: self.selected_issues(),
            notes: self.notes(),
        }
    }

    /// Deletes all three stored entries and empties the in-memory state.
    ///
    /// The entries are removed in one transaction. On failure neither
    /// storage nor memory is changed.
    pub fn reset(&mut self) -> PersistResult<()> {
        let keys = [
            self.attendees.key(),
            self.selected_issues.key(),
            self.notes.key(),
        ];
        if let Err(err) = self.repo.remove_batch(&keys) {
            error!("event=selection_reset module=selection status=error error={err}");
            return Err(err.into());
        }
        self.attendees.replace(AttendeeSet::new());
        self.selected_issues.replace(IssueSet::new());
        self.notes.replace(NoteMap::new());
        info!("event=selection_reset module=selection status=ok");
        Ok(())
    }

    fn commit<C: CollectionCodec>(
        &mut self,
        op: &'static str,
        slot: impl Fn(&mut Self) -> &mut PersistentValue<C>,
        next: C::Value,
    ) -> PersistResult<C::Value> {
        let previous = slot(self).replace(next.clone());
        match self.flush() {
            Ok(()) => {
                info!("event=selection_update module=selection status=ok op={op}");
                Ok(next)
            }
            Err(err) => {
                slot(self).replace(previous);
                error!(
                    "event=selection_update module=selection status=error op={op} error={err}"
                );
                Err(err)
            }
        }
    }

    fn flush(&self) -> PersistResult<()> {
        let entries = [
            self.attendees.encoded_entry()?,
            self.selected_issues.encoded_entry()?,
            self.notes.encoded_entry()?,
        ];
        self.repo.write_batch(&entries)?;
        Ok(())
    }
}
