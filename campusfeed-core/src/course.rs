//! Normalized course aggregates produced by the ingestion pipeline.

use chrono::NaiveDateTime;
use serde::Serialize;

/// A deduplicated course: all occurrences sharing one external course id.
///
/// Created by the grouper on the first accepted occurrence, appended to
/// during the same pipeline run, and a plain owned value afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Course {
    /// External course id. 0 on the room-schedule path when the course
    /// search could not resolve one.
    pub course_id: u32,
    pub title: String,
    /// Short identifier derived from the title, unique within one run.
    pub slug: String,
    pub events: Vec<Event>,
    pub contacts: Vec<ContactPerson>,
}

/// One scheduled occurrence of a course.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Event {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    /// Room label, or the queried room id on the room-schedule path.
    pub room: String,
    pub comment: String,
    /// Whether the occurrence came from this import pass.
    pub imported: bool,
}

/// A person attached to a course.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContactPerson {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    /// All feed roles joined with ", ", feed order preserved.
    pub role: String,
    /// At most one contact per course carries this flag.
    pub main_contact: bool,
}
