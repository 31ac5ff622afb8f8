//! Seams to the external collaborators: the scheduling service and the
//! session that supplies its credential.

use async_trait::async_trait;

use crate::errors::ScheduleResult;
use crate::models::{EntryDraft, EntryId, Scope, SlotId, Teacher, TimeSlot, TimetableEntry};

/// Remote operations the scheduling core depends on.
///
/// Implementations report transport failures as `ScheduleError::Transport`,
/// error responses as `ScheduleError::RemoteRejection`, and a missing
/// credential as `ScheduleError::AuthMissing`.
#[async_trait]
pub trait SchedulingService: Send + Sync {
    async fn time_slots(&self) -> ScheduleResult<Vec<TimeSlot>>;

    async fn create_time_slot(&self, slot: &TimeSlot) -> ScheduleResult<TimeSlot>;

    async fn update_time_slot(&self, id: &SlotId, slot: &TimeSlot) -> ScheduleResult<TimeSlot>;

    async fn delete_time_slot(&self, id: &SlotId) -> ScheduleResult<()>;

    async fn timetable(&self, scope: &Scope) -> ScheduleResult<Vec<TimetableEntry>>;

    async fn teachers_with_subjects(&self) -> ScheduleResult<Vec<Teacher>>;

    async fn create_entry(&self, draft: &EntryDraft) -> ScheduleResult<TimetableEntry>;

    async fn update_entry(&self, id: &EntryId, draft: &EntryDraft)
    -> ScheduleResult<TimetableEntry>;

    async fn delete_entry(&self, id: &EntryId) -> ScheduleResult<()>;
}

/// Supplies the bearer credential for service calls.
pub trait CredentialProvider: Send + Sync {
    fn bearer_token(&self) -> Option<String>;
}

/// Credential fixed at construction, e.g. read from configuration.
#[derive(Debug, Clone, Default)]
pub struct StaticCredentials {
    token: Option<String>,
}

impl StaticCredentials {
    pub fn new(token: Option<String>) -> Self {
        Self {
            token: token.filter(|token| !token.trim().is_empty()),
        }
    }
}

impl CredentialProvider for StaticCredentials {
    fn bearer_token(&self) -> Option<String> {
        self.token.clone()
    }
}
