//! Contact extraction from the course-export and course-search feeds.

use std::sync::LazyLock;

use regex::Regex;

use crate::course::ContactPerson;
use crate::error::CampusResult;

/// One person from a course-export record, roles still separate.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportPerson {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    /// Roles in feed order.
    pub roles: Vec<String>,
}

/// A parsed course-export record.
#[derive(Debug, Clone, PartialEq)]
pub struct CourseExport {
    pub title: String,
    pub persons: Vec<ExportPerson>,
}

/// Parse a course-export document into its title and person records.
pub fn parse_course_export(xml: &str) -> CampusResult<CourseExport> {
    let doc = roxmltree::Document::parse(xml)?;
    let root = doc.root_element();

    let title = root
        .descendants()
        .find(|n| n.has_tag_name("courseName"))
        .map(|name| {
            name.children()
                .find(|c| c.has_tag_name("text"))
                .and_then(|c| c.text())
                .or_else(|| name.text())
                .unwrap_or_default()
                .trim()
                .to_string()
        })
        .unwrap_or_default();

    let mut persons = Vec::new();
    if let Some(contacts) = root.descendants().find(|n| n.has_tag_name("contacts")) {
        for person in contacts.descendants().filter(|n| n.has_tag_name("person")) {
            let text_of = |name: &str| {
                person
                    .descendants()
                    .find(|n| n.has_tag_name(name))
                    .and_then(|n| n.text())
                    .unwrap_or_default()
                    .trim()
                    .to_string()
            };
            let roles = person
                .children()
                .filter(|c| c.has_tag_name("role"))
                .filter_map(|c| c.text())
                .map(|t| t.trim().to_string())
                .collect();
            persons.push(ExportPerson {
                first_name: text_of("given"),
                last_name: text_of("family"),
                email: text_of("email"),
                roles,
            });
        }
    }

    Ok(CourseExport { title, persons })
}

/// Fold export persons into contact records, designating the main contact.
///
/// Each person's roles are joined with ", " in feed order. The first person
/// whose joined role string contains a lead-role keyword (case-insensitive)
/// becomes the main contact; when nobody matches but the course has
/// contacts, the first one is promoted instead.
pub fn contacts_from_export(
    export: &CourseExport,
    lead_role_keywords: &[String],
) -> Vec<ContactPerson> {
    let mut contacts = Vec::new();
    let mut has_main = false;

    for person in &export.persons {
        let role = person.roles.join(", ");
        let is_main = !has_main && is_lead_role(&role, lead_role_keywords);
        if is_main {
            has_main = true;
        }
        contacts.push(ContactPerson {
            first_name: person.first_name.clone(),
            last_name: person.last_name.clone(),
            email: person.email.clone(),
            role,
            main_contact: is_main,
        });
    }

    if !has_main {
        if let Some(first) = contacts.first_mut() {
            first.main_contact = true;
        }
    }
    contacts
}

fn is_lead_role(role: &str, keywords: &[String]) -> bool {
    let lowered = role.to_lowercase();
    keywords.iter().any(|keyword| lowered.contains(keyword))
}

/// One row of the course-search feed.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchRow {
    /// Course id, numeric on well-formed rows.
    pub course_id: String,
    /// Course-type short code, e.g. "VO".
    pub course_type: String,
    /// Raw lecturer text; empty when the row has no assigned persons.
    pub lecturers: String,
}

/// Parse the course-search rowset.
pub fn parse_search_rows(xml: &str) -> CampusResult<Vec<SearchRow>> {
    let doc = roxmltree::Document::parse(xml)?;
    let mut rows = Vec::new();
    for row in doc
        .root_element()
        .descendants()
        .filter(|n| n.has_tag_name("row"))
    {
        let text_of = |name: &str| {
            row.children()
                .find(|c| c.has_tag_name(name))
                .and_then(|c| c.text())
                .unwrap_or_default()
                .trim()
                .to_string()
        };
        rows.push(SearchRow {
            course_id: text_of("stp_sp_nr"),
            course_type: text_of("stp_lv_art_kurz"),
            lecturers: text_of("vortragende_mitwirkende"),
        });
    }
    Ok(rows)
}

/// Course-type short codes the search treats as lecture-form courses.
const SEARCH_COURSE_TYPES: [&str; 3] = ["PR", "VO", "VI"];

/// Whether a search row is a lecture-form course with assigned lecturers.
pub fn is_lecture_row(row: &SearchRow) -> bool {
    SEARCH_COURSE_TYPES.contains(&row.course_type.as_str()) && !row.lecturers.is_empty()
}

/// Strip parenthesized and bracketed spans from a title before using it as
/// a search term: "Einführung in die Informatik 1 [IN0001]" becomes
/// "Einführung in die Informatik 1".
pub fn search_title(title: &str) -> String {
    static BRACKETED: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"(\(.*\))|(\[.*\])").expect("valid regex"));
    BRACKETED.replace_all(title, "").trim().to_string()
}
