//! Subject store: the single owner of attendance state.
//!
//! # Responsibility
//! - Own the ordered subject collection and every mutation of it.
//! - Write the full snapshot back to the key-value collaborator after each
//!   state-changing mutation.
//! - Hand out immutable snapshots to readers.
//!
//! # Invariants
//! - Validation rejections, unknown ids and undo on empty history are silent
//!   no-ops: `Ok(false)` / `Ok(None)`, no state change, no write.
//! - Published snapshots are never mutated; writers copy on write.
//! - A failed write-back returns `StoreError::Persistence` but the in-memory
//!   mutation stays committed.
//! - `present`/`total` change only together with `history`.

use crate::config::StoreConfig;
use crate::model::subject::{
    AttendanceStatus, NewNote, Note, NoteId, Subject, SubjectId, TimetableSlot,
};
use crate::repo::kv_store::{KeyValueStore, KvError};
use crate::service::timetable_import::{group_import_slots, next_color};
use crate::time::clock::{Clock, SystemClock};
use log::{debug, error, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;
use uuid::Uuid;

pub type StoreResult<T> = Result<T, StoreError>;

/// Recoverable store failure. In-memory state is never rolled back.
#[derive(Debug)]
pub enum StoreError {
    Persistence(KvError),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Persistence(err) => write!(f, "failed to persist subjects: {err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Persistence(err) => Some(err),
        }
    }
}

impl From<KvError> for StoreError {
    fn from(value: KvError) -> Self {
        Self::Persistence(value)
    }
}

/// Caller input for `SubjectStore::add_subject`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NewSubject {
    pub name: String,
    pub professor: String,
    pub color: String,
    pub timetable: Vec<TimetableSlot>,
}

/// Mutable subject collection backed by a key-value collaborator.
pub struct SubjectStore<K: KeyValueStore, C: Clock = SystemClock> {
    kv: K,
    clock: C,
    config: StoreConfig,
    subjects: Arc<Vec<Subject>>,
    revision: u64,
}

impl<K: KeyValueStore> SubjectStore<K, SystemClock> {
    /// Loads with the system clock and default configuration.
    pub fn open(kv: K) -> StoreResult<Self> {
        Self::load(kv, SystemClock, StoreConfig::default())
    }
}

impl<K: KeyValueStore, C: Clock> SubjectStore<K, C> {
    /// Loads the persisted snapshot once.
    ///
    /// # Contract
    /// - Missing key: empty store.
    /// - Malformed stored data: empty store, `warn` event.
    /// - Counters disagreeing with history are rebuilt from history.
    ///
    /// # Errors
    /// - `StoreError::Persistence` when the collaborator itself fails.
    pub fn load(kv: K, clock: C, config: StoreConfig) -> StoreResult<Self> {
        let key = config.storage_key.as_str();
        let stored = match kv.get(key) {
            Ok(stored) => stored,
            Err(KvError::InvalidData { message, .. }) => {
                warn!(
                    "event=store_load module=store status=fallback reason=undecodable key={} error={}",
                    key, message
                );
                None
            }
            Err(err) => {
                error!(
                    "event=store_load module=store status=error key={} error={}",
                    key, err
                );
                return Err(err.into());
            }
        };

        let mut subjects = match stored {
            None => Vec::new(),
            Some(value) => serde_json::from_value::<Vec<Subject>>(value).unwrap_or_else(|err| {
                warn!(
                    "event=store_load module=store status=fallback reason=malformed key={} error={}",
                    key, err
                );
                Vec::new()
            }),
        };

        for subject in &mut subjects {
            if subject.recount() {
                warn!(
                    "event=store_repair module=store status=ok subject_id={} present={} total={}",
                    subject.id,
                    subject.present(),
                    subject.total()
                );
            }
        }

        info!(
            "event=store_load module=store status=ok key={} subjects={}",
            key,
            subjects.len()
        );
        Ok(Self {
            kv,
            clock,
            config,
            subjects: Arc::new(subjects),
            revision: 0,
        })
    }

    /// Immutable view of the current state; stays valid across later mutations.
    pub fn snapshot(&self) -> Arc<Vec<Subject>> {
        Arc::clone(&self.subjects)
    }

    pub fn subjects(&self) -> &[Subject] {
        &self.subjects
    }

    pub fn subject(&self, id: &str) -> Option<&Subject> {
        self.subjects.iter().find(|subject| subject.id == id)
    }

    /// Incremented by every state-changing mutation; usable as a memo key.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn len(&self) -> usize {
        self.subjects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subjects.is_empty()
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Appends a new subject with zeroed counters.
    ///
    /// Returns `Ok(None)` without any change when `name` is blank.
    /// Slots with a malformed time are dropped.
    pub fn add_subject(&mut self, input: NewSubject) -> StoreResult<Option<SubjectId>> {
        let Some(id) = self.insert_subject(input) else {
            return Ok(None);
        };
        self.commit("subject_add", &id)?;
        Ok(Some(id))
    }

    /// Creates one subject per imported name, cycling palette colors.
    ///
    /// Persists once after all subjects are added.
    pub fn import_timetable(&mut self, slots: &[TimetableSlot]) -> StoreResult<Vec<SubjectId>> {
        let groups = group_import_slots(slots);
        let mut created = Vec::with_capacity(groups.len());
        for group in groups {
            let color = next_color(self.len(), self.config.palette.as_slice())
                .unwrap_or_default()
                .to_string();
            let input = NewSubject {
                name: group.name,
                professor: group.professor,
                color,
                timetable: group.timetable,
            };
            if let Some(id) = self.insert_subject(input) {
                created.push(id);
            }
        }

        if created.is_empty() {
            return Ok(created);
        }
        self.commit("timetable_import", &format!("count:{}", created.len()))?;
        Ok(created)
    }

    pub fn delete_subject(&mut self, id: &str) -> StoreResult<bool> {
        let Some(index) = self.position(id) else {
            return Ok(self.skip("subject_delete", id));
        };
        Arc::make_mut(&mut self.subjects).remove(index);
        self.commit("subject_delete", id)?;
        Ok(true)
    }

    /// Renames a subject in place, trimming both fields.
    pub fn rename_subject(
        &mut self,
        id: &str,
        new_name: &str,
        new_professor: &str,
    ) -> StoreResult<bool> {
        let name = new_name.trim();
        if name.is_empty() {
            return Ok(self.skip("subject_rename", id));
        }
        let Some(subject) = self.subject_mut(id) else {
            return Ok(self.skip("subject_rename", id));
        };
        subject.name = name.to_string();
        subject.professor = new_professor.trim().to_string();
        self.commit("subject_rename", id)?;
        Ok(true)
    }

    pub fn mark_present(&mut self, id: &str) -> StoreResult<bool> {
        self.mark(id, AttendanceStatus::Present)
    }

    pub fn mark_absent(&mut self, id: &str) -> StoreResult<bool> {
        self.mark(id, AttendanceStatus::Absent)
    }

    /// Removes the most recent record, exactly reversing the mark that added it.
    ///
    /// Earlier records keep their `attendance_percentage_after` snapshots.
    pub fn undo_last_action(&mut self, id: &str) -> StoreResult<bool> {
        let has_history = self
            .subject(id)
            .is_some_and(|subject| !subject.history().is_empty());
        if !has_history {
            return Ok(self.skip("attendance_undo", id));
        }
        let removed = self.subject_mut(id).and_then(Subject::undo_last);
        if removed.is_none() {
            return Ok(false);
        }
        self.commit("attendance_undo", id)?;
        Ok(true)
    }

    /// Attaches a note, assigning its id and upload timestamp.
    pub fn add_note(&mut self, subject_id: &str, input: NewNote) -> StoreResult<Option<NoteId>> {
        let upload_date = self.clock.now_ms();
        let Some(subject) = self.subject_mut(subject_id) else {
            self.skip("note_add", subject_id);
            return Ok(None);
        };
        let note_id = Uuid::new_v4().to_string();
        subject.notes.push(Note {
            id: note_id.clone(),
            title: input.title,
            content: input.content,
            file_name: input.file_name,
            file_type: input.file_type,
            upload_date,
        });
        self.commit("note_add", subject_id)?;
        Ok(Some(note_id))
    }

    pub fn delete_note(&mut self, subject_id: &str, note_id: &str) -> StoreResult<bool> {
        let found = self
            .subject(subject_id)
            .is_some_and(|subject| subject.notes.iter().any(|note| note.id == note_id));
        if !found {
            return Ok(self.skip("note_delete", subject_id));
        }
        if let Some(subject) = self.subject_mut(subject_id) {
            subject.notes.retain(|note| note.id != note_id);
        }
        self.commit("note_delete", subject_id)?;
        Ok(true)
    }

    /// Empties the store and erases the persisted snapshot.
    pub fn reset_all(&mut self) -> StoreResult<()> {
        self.subjects = Arc::new(Vec::new());
        self.revision += 1;
        let key = self.config.storage_key.as_str();
        match self.kv.remove(key) {
            Ok(()) => {
                info!("event=store_reset module=store status=ok key={}", key);
                Ok(())
            }
            Err(err) => {
                error!(
                    "event=store_reset module=store status=error key={} error={}",
                    key, err
                );
                Err(err.into())
            }
        }
    }

    fn mark(&mut self, id: &str, status: AttendanceStatus) -> StoreResult<bool> {
        let timestamp = self.clock.now_ms();
        let Some(subject) = self.subject_mut(id) else {
            return Ok(self.skip("attendance_mark", id));
        };
        let record = subject.record(status, timestamp);
        debug!(
            "event=attendance_mark module=store status=ok subject_id={} mark={:?} percentage_after={:.2}",
            id, record.status, record.attendance_percentage_after
        );
        self.commit("attendance_mark", id)?;
        Ok(true)
    }

    fn insert_subject(&mut self, input: NewSubject) -> Option<SubjectId> {
        let name = input.name.trim();
        if name.is_empty() {
            self.skip("subject_add", "-");
            return None;
        }

        let (timetable, rejected): (Vec<TimetableSlot>, Vec<TimetableSlot>) = input
            .timetable
            .into_iter()
            .partition(|slot| slot.validate().is_ok());
        if !rejected.is_empty() {
            warn!(
                "event=subject_add module=store status=partial dropped_slots={}",
                rejected.len()
            );
        }

        let subject = Subject::new(name, input.professor.trim(), input.color, timetable);
        let id = subject.id.clone();
        Arc::make_mut(&mut self.subjects).push(subject);
        Some(id)
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.subjects.iter().position(|subject| subject.id == id)
    }

    /// Looks up before copying so unknown ids never clone a shared snapshot.
    fn subject_mut(&mut self, id: &str) -> Option<&mut Subject> {
        let index = self.position(id)?;
        Arc::make_mut(&mut self.subjects).get_mut(index)
    }

    fn skip(&self, event: &str, id: &str) -> bool {
        debug!("event={} module=store status=skip subject_id={}", event, id);
        false
    }

    fn commit(&mut self, event: &str, id: &str) -> StoreResult<()> {
        self.revision += 1;
        let key = self.config.storage_key.as_str();
        let result = serde_json::to_value(self.subjects.as_slice())
            .map_err(KvError::from)
            .and_then(|value| self.kv.set(key, &value));

        match result {
            Ok(()) => {
                info!(
                    "event={} module=store status=ok subject_id={} revision={}",
                    event, id, self.revision
                );
                Ok(())
            }
            Err(err) => {
                error!(
                    "event={} module=store status=error subject_id={} revision={} error={}",
                    event, id, self.revision, err
                );
                Err(err.into())
            }
        }
    }
}
