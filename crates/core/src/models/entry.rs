use std::fmt;

use serde::{Deserialize, Serialize};

use super::day::Day;
use super::scope::{ClassName, Scope, Section};
use super::time_slot::{ClockTime, Interval, SlotId};
use crate::errors::ScheduleResult;

/// Identifier assigned to an entry by the scheduling service.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(String);

impl EntryId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EntryId {
    fn from(value: &str) -> Self {
        EntryId(value.to_string())
    }
}

impl From<String> for EntryId {
    fn from(value: String) -> Self {
        EntryId(value)
    }
}

/// Assignment of a teacher and subject to one day and interval of a class/section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimetableEntry {
    #[serde(alias = "_id")]
    pub id: EntryId,
    pub class_name: ClassName,
    pub section: Section,
    pub subject_name: String,
    pub teacher_id: String,
    pub day: Day,
    pub start_time: ClockTime,
    pub end_time: ClockTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room_number: Option<String>,
}

impl TimetableEntry {
    pub fn scope(&self) -> Scope {
        Scope {
            class_name: self.class_name.clone(),
            section: self.section.clone(),
        }
    }

    /// Fails for entries whose stored interval is empty or inverted.
    pub fn interval(&self) -> ScheduleResult<Interval> {
        Interval::new(self.start_time, self.end_time)
    }

    /// The id of the slot this entry renders in, if such a slot exists.
    pub fn slot_id(&self) -> SlotId {
        SlotId::for_times(self.start_time, self.end_time)
    }

    pub fn to_draft(&self) -> EntryDraft {
        EntryDraft {
            class_name: self.class_name.clone(),
            section: self.section.clone(),
            subject_name: self.subject_name.clone(),
            teacher_id: self.teacher_id.clone(),
            day: self.day,
            start_time: self.start_time,
            end_time: self.end_time,
            room_number: self.room_number.clone(),
        }
    }
}

/// Body sent to the service when creating or updating an entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryDraft {
    pub class_name: ClassName,
    pub section: Section,
    pub subject_name: String,
    pub teacher_id: String,
    pub day: Day,
    pub start_time: ClockTime,
    pub end_time: ClockTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room_number: Option<String>,
}

impl EntryDraft {
    pub fn interval(&self) -> ScheduleResult<Interval> {
        Interval::new(self.start_time, self.end_time)
    }

    pub fn into_entry(self, id: EntryId) -> TimetableEntry {
        TimetableEntry {
            id,
            class_name: self.class_name,
            section: self.section,
            subject_name: self.subject_name,
            teacher_id: self.teacher_id,
            day: self.day,
            start_time: self.start_time,
            end_time: self.end_time,
            room_number: self.room_number,
        }
    }
}

/// Fields changed by an update; `None` keeps the stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryUpdate {
    pub subject_name: Option<String>,
    pub teacher_id: Option<String>,
    pub day: Option<Day>,
    pub slot_id: Option<SlotId>,
    pub room_number: Option<Option<String>>,
}
