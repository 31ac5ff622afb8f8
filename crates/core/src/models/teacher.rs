use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Teacher {
    #[serde(alias = "_id")]
    pub id: String,
    pub full_name: String,
    #[serde(default)]
    pub designation: Option<String>,
    #[serde(default)]
    pub subjects: BTreeSet<String>,
}

pub const UNKNOWN_TEACHER: &str = "Unknown teacher";

/// Read-only lookup of teachers and the subjects they may teach.
#[derive(Debug, Clone, Default)]
pub struct TeacherDirectory {
    teachers: HashMap<String, Teacher>,
}

impl TeacherDirectory {
    pub fn new(teachers: impl IntoIterator<Item = Teacher>) -> Self {
        Self {
            teachers: teachers
                .into_iter()
                .map(|teacher| (teacher.id.clone(), teacher))
                .collect(),
        }
    }

    pub fn get(&self, teacher_id: &str) -> Option<&Teacher> {
        self.teachers.get(teacher_id)
    }

    pub fn display_name(&self, teacher_id: &str) -> &str {
        self.get(teacher_id)
            .map(|teacher| teacher.full_name.as_str())
            .unwrap_or(UNKNOWN_TEACHER)
    }

    pub fn subjects_for(&self, teacher_id: &str) -> Option<&BTreeSet<String>> {
        self.get(teacher_id).map(|teacher| &teacher.subjects)
    }

    /// Subject names compare case-insensitively.
    pub fn qualifies(&self, teacher_id: &str, subject_name: &str) -> bool {
        self.subjects_for(teacher_id).is_some_and(|subjects| {
            subjects
                .iter()
                .any(|subject| subject.eq_ignore_ascii_case(subject_name.trim()))
        })
    }

    pub fn len(&self) -> usize {
        self.teachers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.teachers.is_empty()
    }
}
