//! # Timetable Core
//!
//! The weekly timetable scheduling core: time-slot rows, timetable entries
//! for one class/section, cell lookup with overlap detection, and the grid
//! projection rendered by front ends.
//!
//! ## Architecture
//!
//! - **Models**: wire types shared with the scheduling service
//! - **Registry**: the ordered, non-overlapping set of time slots
//! - **Store**: entries of the selected class/section
//! - **Lookup**: cell membership and interval conflict checks
//! - **Grid**: the `slots × days` projection
//! - **Workflow**: create/update/delete orchestration against the service
//!
//! The core never talks to the network directly; it goes through the
//! [`service::SchedulingService`] trait.

/// Error types and user-facing messages
pub mod errors;
/// Grid projection of slots, days and entries
pub mod grid;
/// Cell lookup and conflict detection
pub mod lookup;
/// Mock scheduling service for tests
pub mod mock;
/// Data model shared with the scheduling service
pub mod models;
/// Time-slot registry
pub mod registry;
/// Collaborator seams
pub mod service;
/// Entry store for the selected class/section
pub mod store;
/// Mutation workflow
pub mod workflow;

pub use errors::{ScheduleError, ScheduleResult};
pub use grid::{Cell, Grid, GridRow, PREVIEW_LIMIT};
pub use registry::TimeSlotRegistry;
pub use service::{CredentialProvider, SchedulingService, StaticCredentials};
pub use store::{EntryStore, FetchTicket, LoadOutcome};
pub use workflow::{MutationState, Timetable};
