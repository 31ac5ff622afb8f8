//! Plain-text rendering of the grid for the terminal.

use std::fmt::Write;

use timetable_core::grid::{Cell, Grid};
use timetable_core::models::{TeacherDirectory, TimeSlot, TimetableEntry};

pub fn slots(slots: &[TimeSlot]) -> String {
    if slots.is_empty() {
        return "No time slots defined\n".to_string();
    }
    slots
        .iter()
        .map(|slot| format!("{:<13} {}\n", slot.id, slot.label))
        .collect()
}

pub fn grid(grid: &Grid, teachers: &TeacherDirectory) -> String {
    let mut out = String::new();
    if grid.rows().is_empty() {
        out.push_str("No time slots defined\n");
    }

    for row in grid.rows() {
        let _ = writeln!(out, "{} [{}]", row.slot.label, row.slot.id);
        for cell in &row.cells {
            let _ = writeln!(out, "  {:<10} {}", cell.day.title(), describe(cell, teachers));
        }
    }

    if !grid.orphans().is_empty() {
        let _ = writeln!(out, "\nNot shown (no matching time slot or day):");
        for entry in grid.orphans() {
            let _ = writeln!(
                out,
                "  {} {}-{} {}",
                entry.day.title(),
                entry.start_time,
                entry.end_time,
                line(entry, teachers)
            );
        }
    }
    out
}

fn describe(cell: &Cell, teachers: &TeacherDirectory) -> String {
    if cell.is_empty() {
        return "(free)".to_string();
    }

    let mut parts: Vec<String> = cell
        .preview()
        .iter()
        .map(|entry| line(entry, teachers))
        .collect();
    if cell.overflow() > 0 {
        parts.push(format!("+{} more", cell.overflow()));
    }

    let badge = if cell.count() > 1 {
        format!("({}) ", cell.count())
    } else {
        String::new()
    };
    format!("{}{}", badge, parts.join("; "))
}

fn line(entry: &TimetableEntry, teachers: &TeacherDirectory) -> String {
    let mut text = format!(
        "{} - {}",
        entry.subject_name,
        teachers.display_name(&entry.teacher_id)
    );
    if let Some(room) = &entry.room_number {
        let _ = write!(text, " [Room {}]", room);
    }
    text
}
