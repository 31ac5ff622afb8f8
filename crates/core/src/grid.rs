//! # Grid Projector
//!
//! Builds the weekly matrix: one row per time slot, one column per day.
//! Each cell holds every entry matching it exactly; rendering only shows a
//! short preview, see [`PREVIEW_LIMIT`].

use std::collections::HashSet;

use serde::Serialize;

use crate::lookup;
use crate::models::{Day, SlotId, TimeSlot, TimetableEntry};

/// Entries shown per cell before collapsing the rest into an overflow count.
pub const PREVIEW_LIMIT: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Cell {
    pub slot_id: SlotId,
    pub day: Day,
    entries: Vec<TimetableEntry>,
}

impl Cell {
    pub fn count(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[TimetableEntry] {
        &self.entries
    }

    pub fn preview(&self) -> &[TimetableEntry] {
        &self.entries[..self.entries.len().min(PREVIEW_LIMIT)]
    }

    pub fn overflow(&self) -> usize {
        self.entries.len().saturating_sub(PREVIEW_LIMIT)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GridRow {
    pub slot: TimeSlot,
    pub cells: Vec<Cell>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Grid {
    days: Vec<Day>,
    rows: Vec<GridRow>,
    orphans: Vec<TimetableEntry>,
}

impl Grid {
    pub fn days(&self) -> &[Day] {
        &self.days
    }

    pub fn rows(&self) -> &[GridRow] {
        &self.rows
    }

    /// Entries that landed in no cell: their interval matches no slot, or
    /// their day is not one of the columns.
    pub fn orphans(&self) -> &[TimetableEntry] {
        &self.orphans
    }

    pub fn cell(&self, slot_id: &SlotId, day: Day) -> Option<&Cell> {
        self.rows
            .iter()
            .find(|row| &row.slot.id == slot_id)
            .and_then(|row| row.cells.iter().find(|cell| cell.day == day))
    }

    /// All placed entries, row by row.
    pub fn entries(&self) -> impl Iterator<Item = &TimetableEntry> {
        self.rows
            .iter()
            .flat_map(|row| row.cells.iter())
            .flat_map(|cell| cell.entries.iter())
    }
}

/// Projects `entries` onto `slots × days`.
///
/// `slots` are used in the order given; pass them from the registry to get
/// chronological rows.
pub fn project(slots: &[TimeSlot], days: &[Day], entries: &[TimetableEntry]) -> Grid {
    let rows = slots
        .iter()
        .map(|slot| GridRow {
            slot: slot.clone(),
            cells: days
                .iter()
                .map(|&day| Cell {
                    slot_id: slot.id.clone(),
                    day,
                    entries: lookup::entries_for_cell(entries, slot, day)
                        .into_iter()
                        .cloned()
                        .collect(),
                })
                .collect(),
        })
        .collect();

    let slot_ids: HashSet<&SlotId> = slots.iter().map(|slot| &slot.id).collect();
    let orphans = entries
        .iter()
        .filter(|entry| !slot_ids.contains(&entry.slot_id()) || !days.contains(&entry.day))
        .cloned()
        .collect();

    Grid {
        days: days.to_vec(),
        rows,
        orphans,
    }
}
