//! Calendar entries from the xCal organization feed.
//!
//! Unlike the room-schedule feed this one carries fielded entries. The
//! filter narrows them to confirmed lecture occurrences in known rooms and
//! normalizes summary and location on the way through.

use crate::config::FilterConfig;
use crate::error::CampusResult;

/// One entry of the xCal feed, timestamps still in wire form
/// (`YYYYMMDDThhmmss`, local time).
#[derive(Debug, Clone, PartialEq)]
pub struct CalendarEntry {
    pub summary: String,
    pub category: String,
    pub status: String,
    pub location: String,
    pub comment: String,
    /// Link from the entry's description; carries the course id parameter.
    pub description_link: String,
    pub dtstart: String,
    pub dtend: String,
}

/// Parse an xCal document into its `vevent` entries.
pub fn parse_calendar(xml: &str) -> CampusResult<Vec<CalendarEntry>> {
    let doc = roxmltree::Document::parse(xml)?;
    let mut entries = Vec::new();

    for vevent in doc
        .root_element()
        .descendants()
        .filter(|n| n.has_tag_name("vevent"))
    {
        let text_of = |name: &str| {
            vevent
                .children()
                .find(|c| c.has_tag_name(name))
                .and_then(|c| c.text())
                .unwrap_or_default()
                .trim()
                .to_string()
        };
        // the category label nests under categories > item
        let category = vevent
            .descendants()
            .find(|n| n.has_tag_name("item"))
            .and_then(|n| n.text())
            .unwrap_or_default()
            .trim()
            .to_string();
        let description_link = vevent
            .children()
            .find(|c| c.has_tag_name("description"))
            .and_then(|c| c.attribute("altrep"))
            .unwrap_or_default()
            .to_string();

        entries.push(CalendarEntry {
            summary: text_of("summary"),
            category,
            status: text_of("status"),
            location: text_of("location"),
            comment: text_of("comment"),
            description_link,
            dtstart: text_of("dtstart"),
            dtend: text_of("dtend"),
        });
    }
    Ok(entries)
}

/// Narrow entries to confirmed lecture occurrences in known rooms.
///
/// An entry survives iff its category matches a lecture tag (or the lab
/// override rewrote it), its status is whitelisted, its location contains a
/// known room substring, and its comment does not mark it as a simulcast
/// duplicate. Survivors get their summary cleaned and their location
/// rewritten to the room label.
pub fn filter_entries(entries: Vec<CalendarEntry>, config: &FilterConfig) -> Vec<CalendarEntry> {
    let mut kept = Vec::new();
    for mut entry in entries {
        if let Some(lab) = &config.lab_override {
            if entry.summary.contains(&lab.summary_marker) {
                entry.category = lab.category.clone();
                entry.location = lab.location.clone();
            }
        }
        if !is_lecture_category(&entry.category, config) {
            continue;
        }
        if !config.statuses.iter().any(|s| *s == entry.status) {
            continue;
        }
        if !config.rooms.iter().any(|r| entry.location.contains(&r.code)) {
            continue;
        }
        if !config.exclude_comment_marker.is_empty()
            && entry
                .comment
                .to_lowercase()
                .contains(&config.exclude_comment_marker)
        {
            continue;
        }

        entry.summary = clean_summary(&entry.summary);
        if let Some(room) = config
            .rooms
            .iter()
            .find(|r| entry.location.contains(&r.code))
        {
            entry.location = room.label.clone();
        }
        kept.push(entry);
    }
    kept
}

fn is_lecture_category(category: &str, config: &FilterConfig) -> bool {
    let lowered = category.to_lowercase();
    config
        .lecture_categories
        .iter()
        .any(|tag| lowered.contains(tag))
}

/// Strip the digit run the feed prepends to summaries as a sort key.
pub fn clean_summary(summary: &str) -> String {
    summary
        .trim_start_matches(|c: char| c.is_ascii_digit())
        .trim()
        .to_string()
}

/// Sort entries chronologically. The wire format orders lexicographically,
/// and the sort is stable, so same-start entries keep their feed order.
pub fn sort_entries(entries: &mut [CalendarEntry]) {
    entries.sort_by(|a, b| a.dtstart.cmp(&b.dtstart));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(summary: &str, category: &str, status: &str, location: &str, comment: &str) -> CalendarEntry {
        CalendarEntry {
            summary: summary.to_string(),
            category: category.to_string(),
            status: status.to_string(),
            location: location.to_string(),
            comment: comment.to_string(),
            description_link: String::new(),
            dtstart: "20231016T081500".to_string(),
            dtend: "20231016T094500".to_string(),
        }
    }

    #[test]
    fn test_parse_calendar_reads_vevents() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<iCalendar>
  <vcalendar>
    <vevent>
      <dtstart>20231016T081500</dtstart>
      <dtend>20231016T094500</dtend>
      <summary>101 Einführung in die Informatik 1</summary>
      <categories><item>Vorlesung</item></categories>
      <status>fix</status>
      <location>5602.EG.001 (001, Hörsaal 1), Boltzmannstr. 3</location>
      <comment></comment>
      <description altrep="https://campus.example/export?pStpSpNr=950123">details</description>
    </vevent>
  </vcalendar>
</iCalendar>"#;
        let entries = parse_calendar(xml).unwrap();
        assert_eq!(entries.len(), 1);
        let e = &entries[0];
        assert_eq!(e.summary, "101 Einführung in die Informatik 1");
        assert_eq!(e.category, "Vorlesung");
        assert_eq!(e.status, "fix");
        assert_eq!(e.description_link, "https://campus.example/export?pStpSpNr=950123");
        assert_eq!(e.comment, "");
    }

    #[test]
    fn test_lecture_in_known_room_is_kept_and_relabeled() {
        let kept = filter_entries(
            vec![entry("Analysis", "Vorlesung", "fix", "5602.EG.001 foo", "")],
            &FilterConfig::default(),
        );
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].location, "MI HS1");
    }

    #[test]
    fn test_simulcast_duplicate_is_dropped() {
        let kept = filter_entries(
            vec![entry(
                "Analysis",
                "Vorlesung",
                "fix",
                "5602.EG.001 foo",
                "Videoübertragung aus Raum X",
            )],
            &FilterConfig::default(),
        );
        assert!(kept.is_empty());
    }

    #[test]
    fn test_unknown_room_is_dropped() {
        let kept = filter_entries(
            vec![entry("Analysis", "Vorlesung", "fix", "9999.EG.001", "")],
            &FilterConfig::default(),
        );
        assert!(kept.is_empty());
    }

    #[test]
    fn test_non_whitelisted_status_is_dropped() {
        let config = FilterConfig::default();
        let kept = filter_entries(
            vec![
                entry("A", "Vorlesung", "geplant", "5604.EG.011", ""),
                entry("B", "Vorlesung", "verschoben", "5604.EG.011", ""),
                entry("C", "Vorlesung", "abgesagt", "5604.EG.011", ""),
            ],
            &config,
        );
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].summary, "A");
    }

    #[test]
    fn test_non_lecture_category_is_dropped() {
        let kept = filter_entries(
            vec![entry("Übung Analysis", "Übung", "fix", "5602.EG.001", "")],
            &FilterConfig::default(),
        );
        assert!(kept.is_empty());
    }

    #[test]
    fn test_category_match_is_case_insensitive_substring() {
        let kept = filter_entries(
            vec![entry("Analysis", "VORLESUNG mit Zentralübung", "fix", "5602.EG.001", "")],
            &FilterConfig::default(),
        );
        assert_eq!(kept.len(), 1);
    }

    #[test]
    fn test_lab_override_forces_category_and_room() {
        let kept = filter_entries(
            vec![entry(
                "Praktikum Systemadministration",
                "Praktikum",
                "fix",
                "kein Raum",
                "",
            )],
            &FilterConfig::default(),
        );
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].location, "Interims I 102");
    }

    #[test]
    fn test_summary_cleanup_strips_leading_sort_digits() {
        assert_eq!(
            clean_summary("101 Einführung in die Informatik 1"),
            "Einführung in die Informatik 1"
        );
        assert_eq!(clean_summary("Analysis 2"), "Analysis 2");
    }

    #[test]
    fn test_room_rewrite_uses_first_matching_entry() {
        let mut config = FilterConfig::default();
        config.rooms.insert(
            0,
            crate::config::RoomMapping {
                code: "5602.EG".to_string(),
                label: "shadowing entry".to_string(),
            },
        );
        let kept = filter_entries(
            vec![entry("Analysis", "Vorlesung", "fix", "5602.EG.001", "")],
            &config,
        );
        assert_eq!(kept[0].location, "shadowing entry");
    }

    #[test]
    fn test_sort_is_stable_and_monotonic() {
        let mut entries = vec![
            entry("B", "Vorlesung", "fix", "x", ""),
            entry("A", "Vorlesung", "fix", "x", ""),
            entry("C", "Vorlesung", "fix", "x", ""),
        ];
        entries[0].dtstart = "20231017T081500".to_string();
        entries[1].dtstart = "20231016T081500".to_string();
        entries[2].dtstart = "20231016T081500".to_string();

        sort_entries(&mut entries);
        assert_eq!(entries[0].summary, "A");
        assert_eq!(entries[1].summary, "C"); // same start, feed order kept
        assert_eq!(entries[2].summary, "B");

        let before = entries.clone();
        sort_entries(&mut entries);
        assert_eq!(entries, before);
    }
}
