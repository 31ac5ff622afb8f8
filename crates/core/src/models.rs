pub mod day;
pub mod entry;
pub mod scope;
pub mod teacher;
pub mod time_slot;

pub use day::Day;
pub use entry::{EntryDraft, EntryId, EntryUpdate, TimetableEntry};
pub use scope::{ClassName, Scope, Section};
pub use teacher::{Teacher, TeacherDirectory};
pub use time_slot::{ClockTime, Interval, SlotId, TimeSlot};
