//! Filter configuration tables.
//!
//! Every table the entry filter and contact enricher consult is an explicit
//! value passed into the pipeline, so deployments can override them in their
//! config file and tests can run against small fixtures. The defaults cover
//! the TUM deployment this client was written for.

use serde::Deserialize;

/// One known room: the location substring the feed uses and the label
/// shown to humans.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RoomMapping {
    /// Substring matched against the raw location text.
    pub code: String,
    /// Label the location is rewritten to.
    pub label: String,
}

/// Override for a lab course that is listed under a non-lecture category
/// but should be treated as a lecture in a fixed room.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LabOverride {
    /// Summary substring that triggers the override.
    pub summary_marker: String,
    /// Category the entry is rewritten to before the remaining checks run.
    pub category: String,
    /// Raw location the entry is rewritten to; must match a room code so
    /// the room whitelist and label rewrite still apply.
    pub location: String,
}

/// Tables steering the calendar-entry filter and contact enrichment.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    /// Category substrings (lowercase) accepted as lecture-type entries.
    pub lecture_categories: Vec<String>,
    /// Status values accepted verbatim.
    pub statuses: Vec<String>,
    /// Known rooms in match-priority order. One ordered table drives both
    /// the room whitelist and the location rewrite, so the two can never
    /// disagree.
    pub rooms: Vec<RoomMapping>,
    /// Comment marker (lowercase) identifying simulcast duplicates of a
    /// primary lecture; matching entries are dropped.
    pub exclude_comment_marker: String,
    /// Role keywords (lowercase) designating a course's main contact.
    pub lead_role_keywords: Vec<String>,
    /// Optional lab-course override applied before the category check.
    pub lab_override: Option<LabOverride>,
}

impl Default for FilterConfig {
    fn default() -> Self {
        FilterConfig {
            lecture_categories: vec!["vorlesung".to_string()],
            statuses: vec!["fix".to_string(), "geplant".to_string()],
            rooms: vec![
                room("5602.EG.001", "MI HS1"),
                room("5604.EG.011", "MI HS2"),
                room("5606.EG.011", "MI HS3"),
                room("5608.EG.038", "00.08.038"),
                room("5613.EG.009A", "00.13.009A"),
                room("5620.01.101", "Interims I 101"),
                room("5620.01.102", "Interims I 102"),
                room("5510.02.001", "MW 2001"),
                room("5510.EG.001", "MW 0001"),
            ],
            exclude_comment_marker: "videoübertragung aus".to_string(),
            lead_role_keywords: vec!["leiter".to_string(), "prüfer".to_string()],
            lab_override: Some(LabOverride {
                summary_marker: "Praktikum Systemadministration".to_string(),
                category: "Vorlesung".to_string(),
                location: "5620.01.102 (102, Hörsaal 2, \"Interims I\"), Boltzmannstr. 5(5620), 85748 Garching b. München".to_string(),
            }),
        }
    }
}

fn room(code: &str, label: &str) -> RoomMapping {
    RoomMapping {
        code: code.to_string(),
        label: label.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_tables_cover_deployment_rooms() {
        let config = FilterConfig::default();
        assert!(config.rooms.iter().any(|r| r.code == "5602.EG.001" && r.label == "MI HS1"));
        assert_eq!(config.statuses, vec!["fix", "geplant"]);
        assert_eq!(config.lead_role_keywords, vec!["leiter", "prüfer"]);
    }

    #[test]
    fn test_partial_toml_falls_back_to_defaults() {
        let parsed: FilterConfig = toml::from_str(
            r#"
            statuses = ["fix"]

            [[rooms]]
            code = "1234.EG.001"
            label = "Test Hall"
            "#,
        )
        .unwrap();
        assert_eq!(parsed.statuses, vec!["fix"]);
        assert_eq!(parsed.rooms.len(), 1);
        // untouched tables keep their defaults
        assert_eq!(parsed.lecture_categories, vec!["vorlesung"]);
        assert!(parsed.lab_override.is_some());
    }
}
