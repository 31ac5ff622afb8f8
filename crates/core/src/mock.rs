use async_trait::async_trait;
use mockall::mock;

use crate::errors::ScheduleResult;
use crate::models::{EntryDraft, EntryId, Scope, SlotId, Teacher, TimeSlot, TimetableEntry};
use crate::service::SchedulingService;

// Mock scheduling service for testing
mock! {
    pub SchedulingService {}

    #[async_trait]
    impl SchedulingService for SchedulingService {
        async fn time_slots(&self) -> ScheduleResult<Vec<TimeSlot>>;

        async fn create_time_slot(&self, slot: &TimeSlot) -> ScheduleResult<TimeSlot>;

        async fn update_time_slot(
            &self,
            id: &SlotId,
            slot: &TimeSlot,
        ) -> ScheduleResult<TimeSlot>;

        async fn delete_time_slot(&self, id: &SlotId) -> ScheduleResult<()>;

        async fn timetable(&self, scope: &Scope) -> ScheduleResult<Vec<TimetableEntry>>;

        async fn teachers_with_subjects(&self) -> ScheduleResult<Vec<Teacher>>;

        async fn create_entry(&self, draft: &EntryDraft) -> ScheduleResult<TimetableEntry>;

        async fn update_entry(
            &self,
            id: &EntryId,
            draft: &EntryDraft,
        ) -> ScheduleResult<TimetableEntry>;

        async fn delete_entry(&self, id: &EntryId) -> ScheduleResult<()>;
    }
}
