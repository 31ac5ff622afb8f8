//! # Entry Store
//!
//! Working set of timetable entries for the selected class/section.
//!
//! Loads are guarded by a sequence number: `begin_load` hands out a
//! [`FetchTicket`] and only the most recent ticket may replace the working
//! set. A slower response for a previously selected scope is dropped.

use tracing::{debug, info, warn};

use crate::errors::ScheduleResult;
use crate::models::{EntryId, Scope, TimetableEntry};
use crate::registry::TimeSlotRegistry;
use crate::service::SchedulingService;

/// Handle for one in-flight fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    sequence: u64,
    scope: Scope,
}

impl FetchTicket {
    pub fn scope(&self) -> &Scope {
        &self.scope
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Applied(usize),
    Stale,
}

#[derive(Debug, Default)]
pub struct EntryStore {
    scope: Option<Scope>,
    entries: Vec<TimetableEntry>,
    latest: u64,
}

impl EntryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetches the scope's entries and replaces the working set.
    pub async fn load<S>(&mut self, service: &S, scope: &Scope) -> ScheduleResult<LoadOutcome>
    where
        S: SchedulingService + ?Sized,
    {
        let ticket = self.begin_load(scope.clone());
        let entries = service.timetable(scope).await?;
        Ok(self.apply(&ticket, entries))
    }

    /// Marks a new fetch as the latest; earlier tickets become stale.
    pub fn begin_load(&mut self, scope: Scope) -> FetchTicket {
        self.latest += 1;
        debug!("Fetch #{} started for {}", self.latest, scope);
        FetchTicket {
            sequence: self.latest,
            scope,
        }
    }

    pub fn apply(&mut self, ticket: &FetchTicket, entries: Vec<TimetableEntry>) -> LoadOutcome {
        if ticket.sequence != self.latest {
            warn!(
                "Discarding stale timetable for {} (fetch #{}, latest #{})",
                ticket.scope, ticket.sequence, self.latest
            );
            return LoadOutcome::Stale;
        }

        let count = entries.len();
        self.scope = Some(ticket.scope.clone());
        self.entries = entries;
        info!("Loaded {} timetable entries for {}", count, ticket.scope);
        LoadOutcome::Applied(count)
    }

    /// Drops the working set and the selected scope.
    pub fn clear(&mut self) {
        self.scope = None;
        self.entries.clear();
    }

    pub fn upsert(&mut self, entry: TimetableEntry) {
        match self.entries.iter_mut().find(|existing| existing.id == entry.id) {
            Some(existing) => *existing = entry,
            None => self.entries.push(entry),
        }
    }

    pub fn remove(&mut self, id: &EntryId) -> Option<TimetableEntry> {
        let position = self.entries.iter().position(|entry| &entry.id == id)?;
        Some(self.entries.remove(position))
    }

    pub fn get(&self, id: &EntryId) -> Option<&TimetableEntry> {
        self.entries.iter().find(|entry| &entry.id == id)
    }

    pub fn entries(&self) -> &[TimetableEntry] {
        &self.entries
    }

    pub fn scope(&self) -> Option<&Scope> {
        self.scope.as_ref()
    }

    /// Entries whose interval matches no registered slot.
    pub fn orphans<'a>(&'a self, registry: &TimeSlotRegistry) -> Vec<&'a TimetableEntry> {
        self.entries
            .iter()
            .filter(|entry| registry.get(&entry.slot_id()).is_none())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
