//! # Entry Mutation Workflow
//!
//! [`Timetable`] owns the registry, the entry store and the teacher
//! directory for one selected class/section, and drives every mutation
//! through the scheduling service.
//!
//! Local state changes only after the service accepts a mutation. Input
//! problems (blank subject, overlapping slot, ...) are rejected before the
//! state moves to `Submitting` and before any network call. After an entry mutation the selected scope is re-fetched;
//! a failed re-fetch is logged and leaves the locally applied change in place.

use tracing::{error, info, warn};

use crate::errors::{ScheduleError, ScheduleResult};
use crate::grid::{self, Grid};
use crate::lookup;
use crate::models::{
    ClockTime, Day, EntryDraft, EntryId, EntryUpdate, Scope, SlotId, TeacherDirectory, TimeSlot,
    TimetableEntry,
};
use crate::registry::TimeSlotRegistry;
use crate::service::SchedulingService;
use crate::store::{EntryStore, LoadOutcome};

/// Progress of the most recent mutation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum MutationState {
    #[default]
    Idle,
    Submitting,
    Success,
    /// Carries the user-facing message.
    Failed(String),
}

pub struct Timetable<S> {
    service: S,
    registry: TimeSlotRegistry,
    store: EntryStore,
    teachers: TeacherDirectory,
    days: Vec<Day>,
    state: MutationState,
}

impl<S: SchedulingService> Timetable<S> {
    pub fn new(service: S) -> Self {
        Self {
            service,
            registry: TimeSlotRegistry::new(),
            store: EntryStore::new(),
            teachers: TeacherDirectory::default(),
            days: Day::ALL.to_vec(),
            state: MutationState::Idle,
        }
    }

    /// Overrides the grid columns (all seven days by default).
    pub fn with_days(mut self, days: Vec<Day>) -> Self {
        self.days = days;
        self
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    pub fn registry(&self) -> &TimeSlotRegistry {
        &self.registry
    }

    pub fn store(&self) -> &EntryStore {
        &self.store
    }

    pub fn teachers(&self) -> &TeacherDirectory {
        &self.teachers
    }

    pub fn days(&self) -> &[Day] {
        &self.days
    }

    pub fn state(&self) -> &MutationState {
        &self.state
    }

    pub async fn refresh_slots(&mut self) -> ScheduleResult<()> {
        let slots = self.service.time_slots().await?;
        self.registry.replace(slots);
        Ok(())
    }

    pub async fn refresh_teachers(&mut self) -> ScheduleResult<()> {
        let teachers = self.service.teachers_with_subjects().await?;
        self.teachers = TeacherDirectory::new(teachers);
        info!("Loaded {} teachers", self.teachers.len());
        Ok(())
    }

    /// Switches to `scope` and loads its entries.
    ///
    /// The previous scope's entries are dropped first, so a failed load
    /// leaves nothing selected.
    pub async fn select(&mut self, scope: Scope) -> ScheduleResult<LoadOutcome> {
        self.state = MutationState::Idle;
        self.store.clear();
        self.store.load(&self.service, &scope).await
    }

    pub fn grid(&self) -> Grid {
        grid::project(self.registry.slots(), &self.days, self.store.entries())
    }

    /// Creates an entry in the `(slot, day)` cell of the selected scope.
    pub async fn create_entry(
        &mut self,
        slot_id: &SlotId,
        day: Day,
        subject_name: &str,
        teacher_id: &str,
        room_number: Option<&str>,
    ) -> ScheduleResult<TimetableEntry> {
        let result = match self.draft_entry(slot_id, day, subject_name, teacher_id, room_number) {
            Ok(draft) => {
                self.state = MutationState::Submitting;
                self.submit_create(draft).await
            }
            Err(err) => Err(err),
        };
        self.settle("create entry", result)
    }

    pub async fn update_entry(
        &mut self,
        id: &EntryId,
        update: EntryUpdate,
    ) -> ScheduleResult<TimetableEntry> {
        let result = match self.draft_update(id, update) {
            Ok(draft) => {
                self.state = MutationState::Submitting;
                self.submit_update(id, draft).await
            }
            Err(err) => Err(err),
        };
        self.settle("update entry", result)
    }

    pub async fn delete_entry(&mut self, id: &EntryId) -> ScheduleResult<TimetableEntry> {
        let result = if self.store.get(id).is_some() {
            self.state = MutationState::Submitting;
            self.submit_delete(id).await
        } else {
            Err(ScheduleError::EntryNotFound(id.to_string()))
        };
        self.settle("delete entry", result)
    }

    pub async fn add_slot(&mut self, start: ClockTime, end: ClockTime) -> ScheduleResult<TimeSlot> {
        let result = match self.registry.validate_candidate(start, end, None) {
            Ok(candidate) => {
                self.state = MutationState::Submitting;
                self.submit_add_slot(candidate).await
            }
            Err(err) => Err(err),
        };
        self.settle("add time slot", result)
    }

    pub async fn edit_slot(
        &mut self,
        id: &SlotId,
        start: ClockTime,
        end: ClockTime,
    ) -> ScheduleResult<TimeSlot> {
        let checked = if self.registry.get(id).is_some() {
            self.registry.validate_candidate(start, end, Some(id))
        } else {
            Err(ScheduleError::SlotNotFound(id.to_string()))
        };
        let result = match checked {
            Ok(candidate) => {
                self.state = MutationState::Submitting;
                self.submit_edit_slot(id, candidate).await
            }
            Err(err) => Err(err),
        };
        self.settle("edit time slot", result)
    }

    /// Deletes a slot. Entries on its interval stay in the store and drop
    /// out of the grid.
    pub async fn remove_slot(&mut self, id: &SlotId) -> ScheduleResult<TimeSlot> {
        let result = if self.registry.get(id).is_some() {
            self.state = MutationState::Submitting;
            self.submit_remove_slot(id).await
        } else {
            Err(ScheduleError::SlotNotFound(id.to_string()))
        };
        self.settle("remove time slot", result)
    }

    fn draft_entry(
        &self,
        slot_id: &SlotId,
        day: Day,
        subject_name: &str,
        teacher_id: &str,
        room_number: Option<&str>,
    ) -> ScheduleResult<EntryDraft> {
        let scope = self
            .store
            .scope()
            .cloned()
            .ok_or_else(|| ScheduleError::Validation("Select a class and section first".into()))?;
        let slot = self
            .registry
            .get(slot_id)
            .ok_or_else(|| ScheduleError::SlotNotFound(slot_id.to_string()))?;

        let draft = EntryDraft {
            class_name: scope.class_name,
            section: scope.section,
            subject_name: subject_name.trim().to_string(),
            teacher_id: teacher_id.trim().to_string(),
            day,
            start_time: slot.start_time,
            end_time: slot.end_time,
            room_number: normalize_room(room_number),
        };
        self.check_draft(&draft, None)?;
        Ok(draft)
    }

    fn draft_update(&self, id: &EntryId, update: EntryUpdate) -> ScheduleResult<EntryDraft> {
        let existing = self
            .store
            .get(id)
            .ok_or_else(|| ScheduleError::EntryNotFound(id.to_string()))?;

        let mut draft = existing.to_draft();
        if let Some(subject_name) = update.subject_name {
            draft.subject_name = subject_name.trim().to_string();
        }
        if let Some(teacher_id) = update.teacher_id {
            draft.teacher_id = teacher_id.trim().to_string();
        }
        if let Some(day) = update.day {
            draft.day = day;
        }
        if let Some(slot_id) = &update.slot_id {
            let slot = self
                .registry
                .get(slot_id)
                .ok_or_else(|| ScheduleError::SlotNotFound(slot_id.to_string()))?;
            draft.start_time = slot.start_time;
            draft.end_time = slot.end_time;
        }
        if let Some(room_number) = update.room_number {
            draft.room_number = normalize_room(room_number.as_deref());
        }
        self.check_draft(&draft, Some(id))?;
        Ok(draft)
    }

    async fn submit_create(&mut self, draft: EntryDraft) -> ScheduleResult<TimetableEntry> {
        let entry = self.service.create_entry(&draft).await?;
        info!(
            "Created entry {} ({} on {} at {})",
            entry.id,
            entry.subject_name,
            entry.day,
            entry.slot_id()
        );
        self.store.upsert(entry.clone());
        self.reload().await;
        Ok(entry)
    }

    async fn submit_update(
        &mut self,
        id: &EntryId,
        draft: EntryDraft,
    ) -> ScheduleResult<TimetableEntry> {
        let entry = self.service.update_entry(id, &draft).await?;
        info!("Updated entry {}", entry.id);
        self.store.upsert(entry.clone());
        self.reload().await;
        Ok(entry)
    }

    async fn submit_delete(&mut self, id: &EntryId) -> ScheduleResult<TimetableEntry> {
        self.service.delete_entry(id).await?;
        let removed = self
            .store
            .remove(id)
            .ok_or_else(|| ScheduleError::EntryNotFound(id.to_string()))?;
        info!("Deleted entry {}", id);
        self.reload().await;
        Ok(removed)
    }

    async fn submit_add_slot(&mut self, candidate: TimeSlot) -> ScheduleResult<TimeSlot> {
        let created = self.service.create_time_slot(&candidate).await?;
        if created.id != candidate.id {
            warn!(
                "Service stored time slot {} as {}, reloading slots",
                candidate.id, created.id
            );
            self.reload_slots().await;
            return Ok(created);
        }
        let slot = self
            .registry
            .add_slot(candidate.start_time, candidate.end_time)?;
        info!("Added time slot {}", slot.label);
        Ok(slot)
    }

    async fn submit_edit_slot(
        &mut self,
        id: &SlotId,
        candidate: TimeSlot,
    ) -> ScheduleResult<TimeSlot> {
        let updated = self.service.update_time_slot(id, &candidate).await?;
        let slot = if updated.id != candidate.id {
            warn!(
                "Service stored time slot {} as {}, reloading slots",
                candidate.id, updated.id
            );
            self.reload_slots().await;
            updated
        } else {
            self.registry
                .edit_slot(id, candidate.start_time, candidate.end_time)?
        };
        if &slot.id != id {
            self.warn_orphaned(id);
        }
        info!("Time slot {} is now {}", id, slot.id);
        Ok(slot)
    }

    async fn submit_remove_slot(&mut self, id: &SlotId) -> ScheduleResult<TimeSlot> {
        self.service.delete_time_slot(id).await?;
        let removed = self
            .registry
            .remove_slot(id)
            .ok_or_else(|| ScheduleError::SlotNotFound(id.to_string()))?;
        self.warn_orphaned(id);
        info!("Removed time slot {}", removed.label);
        Ok(removed)
    }

    /// UI-boundary checks for an entry draft. Overlaps are only logged.
    fn check_draft(&self, draft: &EntryDraft, excluding: Option<&EntryId>) -> ScheduleResult<()> {
        if draft.subject_name.is_empty() || draft.teacher_id.is_empty() {
            return Err(ScheduleError::Validation(
                "Please select both a teacher and a subject".into(),
            ));
        }
        if self.teachers.get(&draft.teacher_id).is_none() {
            return Err(ScheduleError::Validation(format!(
                "Unknown teacher: {}",
                draft.teacher_id
            )));
        }
        if !self.teachers.qualifies(&draft.teacher_id, &draft.subject_name) {
            return Err(ScheduleError::Validation(format!(
                "{} does not teach {}",
                self.teachers.display_name(&draft.teacher_id),
                draft.subject_name
            )));
        }

        let interval = draft.interval()?;
        for other in lookup::overlapping_entries(self.store.entries(), draft.day, &interval, excluding)
        {
            if other.teacher_id == draft.teacher_id {
                warn!(
                    "{} is already teaching {} on {} at {}",
                    self.teachers.display_name(&draft.teacher_id),
                    other.subject_name,
                    other.day,
                    other.slot_id()
                );
            } else {
                warn!(
                    "{} on {} at {} is double-booked with {}",
                    draft.subject_name,
                    draft.day,
                    interval,
                    other.subject_name
                );
            }
        }
        Ok(())
    }

    async fn reload(&mut self) {
        let Some(scope) = self.store.scope().cloned() else {
            return;
        };
        if let Err(err) = self.store.load(&self.service, &scope).await {
            warn!("Timetable for {} may be stale, refresh failed: {}", scope, err);
        }
    }

    async fn reload_slots(&mut self) {
        if let Err(err) = self.refresh_slots().await {
            warn!("Time slots may be stale, refresh failed: {}", err);
        }
    }

    fn warn_orphaned(&self, old_id: &SlotId) {
        let orphaned = self
            .store
            .entries()
            .iter()
            .filter(|entry| &entry.slot_id() == old_id)
            .count();
        if orphaned > 0 {
            warn!(
                "{} entries still reference {} and no longer appear in the grid",
                orphaned, old_id
            );
        }
    }

    fn settle<T>(&mut self, action: &str, result: ScheduleResult<T>) -> ScheduleResult<T> {
        self.state = match &result {
            Ok(_) => MutationState::Success,
            Err(err) => {
                error!("Failed to {}: {}", action, err);
                MutationState::Failed(err.user_message())
            }
        };
        result
    }
}

fn normalize_room(room_number: Option<&str>) -> Option<String> {
    room_number
        .map(str::trim)
        .filter(|room| !room.is_empty())
        .map(str::to_string)
}
