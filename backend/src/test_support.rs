//! Test doubles shared by unit tests (in `src/`) and integration tests (in
//! `tests/`). Compiled for `cfg(test)` and the `test-support` feature.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Local, TimeDelta, TimeZone, Utc};
use mockable::Clock;

use crate::domain::ports::{NoteRepository, NoteRepositoryError};
use crate::domain::{Author, Note, NoteChanges, NoteDraft, NoteId};

/// Clock that only moves when told to.
pub struct MutableClock(Mutex<DateTime<Utc>>);

impl MutableClock {
    fn new(now: DateTime<Utc>) -> Self {
        Self(Mutex::new(now))
    }

    /// Clock starting at 2026-03-01T09:00:00Z.
    pub fn fixed() -> Self {
        let start = Utc
            .with_ymd_and_hms(2026, 3, 1, 9, 0, 0)
            .single()
            .unwrap_or_else(|| panic!("fixture timestamp is valid"));
        Self::new(start)
    }

    pub fn advance_seconds(&self, seconds: i64) {
        *self.lock_clock() += TimeDelta::seconds(seconds);
    }

    fn lock_clock(&self) -> MutexGuard<'_, DateTime<Utc>> {
        match self.0.lock() {
            Ok(guard) => guard,
            Err(_) => panic!("clock mutex"),
        }
    }
}

impl Clock for MutableClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.lock_clock()
    }
}

#[derive(Default)]
struct Store {
    last_id: i32,
    notes: BTreeMap<NoteId, Note>,
    failure: Option<NoteRepositoryError>,
}

/// In-memory [`NoteRepository`] mirroring the PostgreSQL adapter's ordering
/// and identifier assignment.
#[derive(Default)]
pub struct InMemoryNoteRepository {
    store: Mutex<Store>,
}

impl InMemoryNoteRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent call fail with `error` until cleared with `None`.
    pub fn fail_with(&self, error: Option<NoteRepositoryError>) {
        self.lock_store().failure = error;
    }

    /// Number of stored notes.
    pub fn len(&self) -> usize {
        self.lock_store().notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock_store(&self) -> MutexGuard<'_, Store> {
        match self.store.lock() {
            Ok(guard) => guard,
            Err(_) => panic!("note store mutex"),
        }
    }

    fn checked_store(&self) -> Result<MutexGuard<'_, Store>, NoteRepositoryError> {
        let store = self.lock_store();
        match &store.failure {
            Some(error) => Err(error.clone()),
            None => Ok(store),
        }
    }
}

#[async_trait]
impl NoteRepository for InMemoryNoteRepository {
    async fn list(&self, author: Option<Author>) -> Result<Vec<Note>, NoteRepositoryError> {
        let store = self.checked_store()?;
        let mut notes: Vec<Note> = store
            .notes
            .values()
            .filter(|note| author.is_none_or(|author| note.author == author))
            .cloned()
            .collect();
        notes.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(notes)
    }

    async fn find_by_id(&self, id: NoteId) -> Result<Option<Note>, NoteRepositoryError> {
        let store = self.checked_store()?;
        Ok(store.notes.get(&id).cloned())
    }

    async fn insert(
        &self,
        draft: &NoteDraft,
        now: DateTime<Utc>,
    ) -> Result<Note, NoteRepositoryError> {
        let mut store = self.checked_store()?;
        store.last_id += 1;
        let id = NoteId::new(store.last_id);
        let note = Note::from_draft(id, draft.clone(), now);
        store.notes.insert(id, note.clone());
        Ok(note)
    }

    async fn update(
        &self,
        id: NoteId,
        changes: &NoteChanges,
        now: DateTime<Utc>,
    ) -> Result<Option<Note>, NoteRepositoryError> {
        let mut store = self.checked_store()?;
        let Some(current) = store.notes.get(&id) else {
            return Ok(None);
        };
        let updated = current.apply(changes, now);
        store.notes.insert(id, updated.clone());
        Ok(Some(updated))
    }

    async fn delete(&self, id: NoteId) -> Result<bool, NoteRepositoryError> {
        let mut store = self.checked_store()?;
        Ok(store.notes.remove(&id).is_some())
    }
}
