use serde::{Deserialize, Serialize};

use crate::students::dto::StudentSummary;

use super::repo::Course;

/// Fields accepted from clients for create and update. Identifiers are
/// server-assigned and never client-supplied.
#[derive(Debug, Deserialize)]
pub struct CourseInput {
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct CourseOut {
    pub id: i64,
    pub name: String,
}

/// Single-course view, expanding enrolled students one level deep. Students
/// never embed their course back, so the nesting cannot recurse.
#[derive(Debug, Serialize)]
pub struct CourseDetails {
    pub id: i64,
    pub name: String,
    pub students: Vec<StudentSummary>,
}

impl From<Course> for CourseOut {
    fn from(c: Course) -> Self {
        Self {
            id: c.id,
            name: c.name,
        }
    }
}
