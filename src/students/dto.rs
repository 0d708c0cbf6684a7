use serde::{Deserialize, Serialize};

use super::repo::Student;

/// Fields accepted from clients. A missing `course_id` leaves the student
/// unenrolled.
#[derive(Debug, Deserialize)]
pub struct StudentInput {
    pub name: String,
    #[serde(default)]
    pub course_id: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct StudentOut {
    pub id: i64,
    pub name: String,
    pub course_id: Option<i64>,
}

/// Shape used when a course expands its enrolled students.
#[derive(Debug, Serialize)]
pub struct StudentSummary {
    pub id: i64,
    pub name: String,
}

impl From<Student> for StudentOut {
    fn from(s: Student) -> Self {
        Self {
            id: s.id,
            name: s.name,
            course_id: s.course_id,
        }
    }
}

impl From<Student> for StudentSummary {
    fn from(s: Student) -> Self {
        Self {
            id: s.id,
            name: s.name,
        }
    }
}
