#![allow(dead_code)]

use std::collections::BTreeSet;

use timetable_core::models::{
    ClockTime, Day, EntryId, Scope, Teacher, TimeSlot, TimetableEntry,
};

pub fn time(value: &str) -> ClockTime {
    value.parse().expect("valid clock time")
}

pub fn slot(start: &str, end: &str) -> TimeSlot {
    TimeSlot::new(time(start), time(end)).expect("valid slot")
}

pub fn scope() -> Scope {
    Scope::new("10", "a").expect("valid scope")
}

pub fn entry(id: &str, day: Day, start: &str, end: &str, teacher_id: &str) -> TimetableEntry {
    let scope = scope();
    TimetableEntry {
        id: EntryId::from(id),
        class_name: scope.class_name,
        section: scope.section,
        subject_name: "Mathematics".to_string(),
        teacher_id: teacher_id.to_string(),
        day,
        start_time: time(start),
        end_time: time(end),
        room_number: Some("101".to_string()),
    }
}

pub fn teacher(id: &str, full_name: &str, subjects: &[&str]) -> Teacher {
    Teacher {
        id: id.to_string(),
        full_name: full_name.to_string(),
        designation: Some("TGT".to_string()),
        subjects: subjects.iter().map(|s| s.to_string()).collect::<BTreeSet<_>>(),
    }
}
