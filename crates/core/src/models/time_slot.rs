use std::fmt;
use std::str::FromStr;

use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::errors::{ScheduleError, ScheduleResult};

/// Wall-clock time of day with minute precision, written `HH:MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClockTime(NaiveTime);

impl ClockTime {
    pub fn from_hm(hour: u32, minute: u32) -> ScheduleResult<Self> {
        NaiveTime::from_hms_opt(hour, minute, 0)
            .map(ClockTime)
            .ok_or_else(|| ScheduleError::Validation(format!("Invalid time {}:{}", hour, minute)))
    }

    /// 12-hour rendering, e.g. `9:05 AM`.
    pub fn twelve_hour(&self) -> String {
        self.0.format("%-I:%M %p").to_string()
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%H:%M"))
    }
}

impl FromStr for ClockTime {
    type Err = ScheduleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        // Some backends append seconds; they carry no meaning for the grid.
        let parsed = NaiveTime::parse_from_str(s, "%H:%M")
            .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M:%S"))
            .map_err(|_| ScheduleError::Validation(format!("Invalid time: {}", s)))?;
        ClockTime::from_hm(parsed.hour(), parsed.minute())
    }
}

impl Serialize for ClockTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ClockTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Half-open interval `[start, end)` with `start < end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Interval {
    start: ClockTime,
    end: ClockTime,
}

impl Interval {
    pub fn new(start: ClockTime, end: ClockTime) -> ScheduleResult<Self> {
        if start >= end {
            return Err(ScheduleError::InvalidInterval {
                start: start.to_string(),
                end: end.to_string(),
            });
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> ClockTime {
        self.start
    }

    pub fn end(&self) -> ClockTime {
        self.end
    }

    /// Touching intervals (`a.end == b.start`) do not overlap.
    pub fn overlaps(&self, other: &Interval) -> bool {
        self.start < other.end && other.start < self.end
    }

    pub fn slot_id(&self) -> SlotId {
        SlotId::for_times(self.start, self.end)
    }

    pub fn label(&self) -> String {
        format!("{} - {}", self.start.twelve_hour(), self.end.twelve_hour())
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

/// Identifier of a time slot, derived from its interval.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SlotId(String);

impl SlotId {
    /// Identical intervals always map to the same id.
    pub fn for_times(start: ClockTime, end: ClockTime) -> Self {
        SlotId(format!("{}-{}", start, end))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SlotId {
    fn from(value: &str) -> Self {
        SlotId(value.to_string())
    }
}

/// A row of the weekly grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawTimeSlot")]
pub struct TimeSlot {
    pub id: SlotId,
    pub start_time: ClockTime,
    pub end_time: ClockTime,
    pub label: String,
}

impl TimeSlot {
    pub fn new(start: ClockTime, end: ClockTime) -> ScheduleResult<Self> {
        Ok(Self::from_interval(Interval::new(start, end)?))
    }

    pub fn from_interval(interval: Interval) -> Self {
        Self {
            id: interval.slot_id(),
            start_time: interval.start(),
            end_time: interval.end(),
            label: interval.label(),
        }
    }

    pub fn interval(&self) -> Interval {
        Interval {
            start: self.start_time,
            end: self.end_time,
        }
    }
}

/// Wire shape accepted from the service; id and label are re-derived.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawTimeSlot {
    start_time: ClockTime,
    end_time: ClockTime,
}

impl TryFrom<RawTimeSlot> for TimeSlot {
    type Error = ScheduleError;

    fn try_from(raw: RawTimeSlot) -> Result<Self, Self::Error> {
        TimeSlot::new(raw.start_time, raw.end_time)
    }
}
