//! Grouping per-occurrence records into course aggregates.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use chrono::NaiveDateTime;

use crate::course::{Course, Event};
use crate::record::RawEvent;
use crate::slug::SlugCounter;
use crate::xcal::CalendarEntry;

/// Query parameter marking the course id inside a description link.
const COURSE_ID_MARKER: &str = "pStpSpNr=";

/// Wire format of feed timestamps, local time.
pub const FEED_TIME_FORMAT: &str = "%Y%m%dT%H%M%S";

pub fn parse_feed_timestamp(raw: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(raw, FEED_TIME_FORMAT).ok()
}

/// Extract the course id from a description link.
///
/// The link is opaque apart from the id parameter: anything other than one
/// marker followed by a bare numeric id yields `None`.
fn course_id_from_link(link: &str) -> Option<u32> {
    let parts: Vec<&str> = link.split(COURSE_ID_MARKER).collect();
    if parts.len() != 2 {
        return None;
    }
    parts[1].parse().ok()
}

/// Group calendar entries by the course id embedded in their description
/// links.
///
/// One left-to-right pass: the first occurrence of an id creates the course
/// and fixes its title, later occurrences only append events. Entries with
/// malformed links, non-numeric ids, or unparsable timestamps are dropped
/// silently; the feeds carry such noise. Courses come back ordered by id,
/// their events ordered by start.
pub fn group_by_course(entries: &[CalendarEntry]) -> Vec<Course> {
    let mut slugs = SlugCounter::new();
    let mut courses: HashMap<u32, Course> = HashMap::new();

    for entry in entries {
        let Some(course_id) = course_id_from_link(&entry.description_link) else {
            continue;
        };
        let Some(start) = parse_feed_timestamp(&entry.dtstart) else {
            continue;
        };
        let Some(end) = parse_feed_timestamp(&entry.dtend) else {
            continue;
        };
        let event = Event {
            start,
            end,
            room: entry.location.clone(),
            comment: entry.comment.clone(),
            imported: true,
        };
        match courses.entry(course_id) {
            Entry::Occupied(mut occupied) => occupied.get_mut().events.push(event),
            Entry::Vacant(vacant) => {
                vacant.insert(Course {
                    course_id,
                    title: entry.summary.clone(),
                    slug: slugs.assign(&entry.summary),
                    events: vec![event],
                    contacts: Vec::new(),
                });
            }
        }
    }

    let mut result: Vec<Course> = courses.into_values().collect();
    result.sort_by_key(|course| course.course_id);
    for course in &mut result {
        sort_events(&mut course.events);
    }
    result
}

/// Group room-schedule occurrences by their `eventTitle` attribute.
///
/// The looser sibling of [`group_by_course`] for the attribute-bag feed:
/// the records carry no course id, so courses start out with id 0 until the
/// course search resolves one. Every event is labeled with the queried room.
/// Occurrences without a title or with unparsable timestamps are dropped.
pub fn group_by_title(events: &[RawEvent], room: &str) -> Vec<Course> {
    let mut slugs = SlugCounter::new();
    let mut courses: HashMap<String, Course> = HashMap::new();

    for raw in events {
        let Some(title) = raw.attr("eventTitle") else {
            continue;
        };
        let Some(start) = raw.attr("dtstart").and_then(parse_feed_timestamp) else {
            continue;
        };
        let Some(end) = raw.attr("dtend").and_then(parse_feed_timestamp) else {
            continue;
        };
        let event = Event {
            start,
            end,
            room: room.to_string(),
            comment: String::new(),
            imported: true,
        };
        match courses.entry(title.to_string()) {
            Entry::Occupied(mut occupied) => occupied.get_mut().events.push(event),
            Entry::Vacant(vacant) => {
                vacant.insert(Course {
                    course_id: 0,
                    title: title.to_string(),
                    slug: slugs.assign(title),
                    events: vec![event],
                    contacts: Vec::new(),
                });
            }
        }
    }

    let mut result: Vec<Course> = courses.into_values().collect();
    result.sort_by(|a, b| a.title.cmp(&b.title));
    for course in &mut result {
        sort_events(&mut course.events);
    }
    result
}

/// Stable chronological ordering; re-sorting a sorted list is a no-op.
pub fn sort_events(events: &mut [Event]) {
    events.sort_by_key(|event| event.start);
}
