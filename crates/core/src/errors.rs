use thiserror::Error;

/// Generic notice shown when the scheduling service cannot be reached.
pub const TRANSPORT_NOTICE: &str =
    "Unable to reach the scheduling service. Please check your connection and try again.";

/// Notice shown when no usable credential is available.
pub const AUTH_NOTICE: &str = "Your session has expired. Please sign in again.";

#[derive(Error, Debug)]
pub enum ScheduleError {
    #[error("Invalid interval: start {start} must be before end {end}")]
    InvalidInterval { start: String, end: String },

    #[error("Time slot {candidate} overlaps existing slot {existing}")]
    SlotConflict { candidate: String, existing: String },

    #[error("Time slot not found: {0}")]
    SlotNotFound(String),

    #[error("Timetable entry not found: {0}")]
    EntryNotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Transport error: {0}")]
    Transport(#[from] eyre::Report),

    #[error("Request rejected ({status}): {message}")]
    RemoteRejection { status: u16, message: String },

    #[error("Authentication required: no credential available")]
    AuthMissing,
}

impl ScheduleError {
    /// Text suitable for a transient user-facing notification.
    pub fn user_message(&self) -> String {
        match self {
            ScheduleError::Transport(_) => TRANSPORT_NOTICE.to_string(),
            ScheduleError::RemoteRejection { message, .. } => message.clone(),
            ScheduleError::AuthMissing => AUTH_NOTICE.to_string(),
            ScheduleError::InvalidInterval { .. } => {
                "End time must be after start time.".to_string()
            }
            ScheduleError::SlotConflict { existing, .. } => {
                format!("This time slot overlaps with {}.", existing)
            }
            other => other.to_string(),
        }
    }

    pub fn is_retryable(&self) -> bool {
        matches!(self, ScheduleError::Transport(_))
    }
}

pub type ScheduleResult<T> = Result<T, ScheduleError>;
