use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::ScheduleError;

/// Class name such as `10` or `Nursery`; never blank.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ClassName(String);

impl ClassName {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for ClassName {
    type Err = ScheduleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(ScheduleError::Validation("Class name is required".to_string()));
        }
        Ok(ClassName(trimmed.to_string()))
    }
}

impl TryFrom<String> for ClassName {
    type Error = ScheduleError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ClassName> for String {
    fn from(value: ClassName) -> Self {
        value.0
    }
}

impl fmt::Display for ClassName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Section label, normalized to upper-case (`a` and `A` are the same section).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Section(String);

impl Section {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Section {
    type Err = ScheduleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(ScheduleError::Validation("Section is required".to_string()));
        }
        if !trimmed.chars().all(char::is_alphanumeric) {
            return Err(ScheduleError::Validation(format!("Invalid section: {}", trimmed)));
        }
        Ok(Section(trimmed.to_uppercase()))
    }
}

impl TryFrom<String> for Section {
    type Error = ScheduleError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Section> for String {
    fn from(value: Section) -> Self {
        value.0
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The `(className, section)` pair that bounds what is loaded at one time.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scope {
    pub class_name: ClassName,
    pub section: Section,
}

impl Scope {
    pub fn new(class_name: &str, section: &str) -> Result<Self, ScheduleError> {
        Ok(Self {
            class_name: class_name.parse()?,
            section: section.parse()?,
        })
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.class_name, self.section)
    }
}
