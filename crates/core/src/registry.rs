//! # TimeSlot Registry
//!
//! The ordered set of intervals used as grid rows. The registry is the
//! source of truth for rows: entries are matched against it, never the
//! other way round.
//!
//! Stored slots never overlap and are kept sorted by start time (ties by end
//! time), so iteration order is the grid's row order.

use tracing::{debug, info, warn};

use crate::errors::{ScheduleError, ScheduleResult};
use crate::lookup;
use crate::models::{ClockTime, Interval, SlotId, TimeSlot};

#[derive(Debug, Clone, Default)]
pub struct TimeSlotRegistry {
    slots: Vec<TimeSlot>,
}

impl TimeSlotRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the registry with a fetched slot list.
    ///
    /// Slots overlapping an already accepted slot are skipped; an identical
    /// interval counts as an overlap, so duplicates collapse to one row.
    pub fn replace(&mut self, slots: impl IntoIterator<Item = TimeSlot>) {
        self.slots.clear();
        for slot in slots {
            let interval = slot.interval();
            if let Some(existing) = lookup::first_conflict(&self.slots, &interval, None) {
                warn!(
                    "Skipping time slot {} which overlaps {}",
                    slot.id, existing.id
                );
                continue;
            }
            self.slots.push(slot);
        }
        self.sort();
        info!("Loaded {} time slots", self.slots.len());
    }

    /// Validates `[start, end)` as a new slot, or as the new interval of the
    /// slot `excluding`, without changing the registry.
    pub fn validate_candidate(
        &self,
        start: ClockTime,
        end: ClockTime,
        excluding: Option<&SlotId>,
    ) -> ScheduleResult<TimeSlot> {
        let interval = Interval::new(start, end)?;
        if let Some(existing) = lookup::first_conflict(&self.slots, &interval, excluding) {
            return Err(ScheduleError::SlotConflict {
                candidate: interval.to_string(),
                existing: existing.id.to_string(),
            });
        }
        Ok(TimeSlot::from_interval(interval))
    }

    pub fn add_slot(&mut self, start: ClockTime, end: ClockTime) -> ScheduleResult<TimeSlot> {
        let slot = self.validate_candidate(start, end, None)?;
        self.slots.push(slot.clone());
        self.sort();
        debug!("Added time slot {}", slot.id);
        Ok(slot)
    }

    /// The edited slot's id changes with its interval.
    pub fn edit_slot(
        &mut self,
        id: &SlotId,
        start: ClockTime,
        end: ClockTime,
    ) -> ScheduleResult<TimeSlot> {
        let position = self
            .position(id)
            .ok_or_else(|| ScheduleError::SlotNotFound(id.to_string()))?;
        let slot = self.validate_candidate(start, end, Some(id))?;
        self.slots[position] = slot.clone();
        self.sort();
        debug!("Edited time slot {} -> {}", id, slot.id);
        Ok(slot)
    }

    /// Removes the slot without touching entries that reference its interval.
    pub fn remove_slot(&mut self, id: &SlotId) -> Option<TimeSlot> {
        let removed = self.position(id).map(|position| self.slots.remove(position));
        if removed.is_some() {
            debug!("Removed time slot {}", id);
        }
        removed
    }

    /// Slots in chronological order.
    pub fn slots(&self) -> &[TimeSlot] {
        &self.slots
    }

    pub fn get(&self, id: &SlotId) -> Option<&TimeSlot> {
        self.slots.iter().find(|slot| &slot.id == id)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    fn position(&self, id: &SlotId) -> Option<usize> {
        self.slots.iter().position(|slot| &slot.id == id)
    }

    fn sort(&mut self) {
        self.slots
            .sort_by(|a, b| (a.start_time, a.end_time).cmp(&(b.start_time, b.end_time)));
    }
}
