//! Cell lookup and interval conflict detection.
//!
//! Cell membership is exact: an entry belongs to a cell only when its
//! `(start, end)` equals the slot interval and its day equals the column.
//! Conflicts use the half-open overlap rule `s1 < e2 && s2 < e1`.

use tracing::debug;

use crate::models::{Day, EntryId, Interval, SlotId, TimeSlot, TimetableEntry};

/// Entries occupying the `(slot, day)` cell, in store order.
///
/// More than one entry per cell is a valid result.
pub fn entries_for_cell<'a>(
    entries: &'a [TimetableEntry],
    slot: &TimeSlot,
    day: Day,
) -> Vec<&'a TimetableEntry> {
    entries
        .iter()
        .filter(|entry| {
            entry.day == day
                && entry.start_time == slot.start_time
                && entry.end_time == slot.end_time
        })
        .collect()
}

/// First slot overlapping `candidate`, ignoring the slot with id `excluding`.
pub fn first_conflict<'a>(
    slots: &'a [TimeSlot],
    candidate: &Interval,
    excluding: Option<&SlotId>,
) -> Option<&'a TimeSlot> {
    let conflict = slots
        .iter()
        .filter(|slot| Some(&slot.id) != excluding)
        .find(|slot| slot.interval().overlaps(candidate));

    if let Some(slot) = conflict {
        debug!("Candidate {} overlaps slot {}", candidate, slot.id);
    }
    conflict
}

pub fn has_interval_conflict(
    slots: &[TimeSlot],
    candidate: &Interval,
    excluding: Option<&SlotId>,
) -> bool {
    first_conflict(slots, candidate, excluding).is_some()
}

/// Entries on `day` whose interval overlaps `interval`.
///
/// Used to warn about double-booking; overlapping entries are never rejected.
/// Entries with an unusable stored interval are skipped.
pub fn overlapping_entries<'a>(
    entries: &'a [TimetableEntry],
    day: Day,
    interval: &Interval,
    excluding: Option<&EntryId>,
) -> Vec<&'a TimetableEntry> {
    entries
        .iter()
        .filter(|entry| entry.day == day && Some(&entry.id) != excluding)
        .filter(|entry| {
            entry
                .interval()
                .map(|existing| existing.overlaps(interval))
                .unwrap_or(false)
        })
        .collect()
}
