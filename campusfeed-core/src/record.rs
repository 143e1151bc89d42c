//! Attribute-bag records from the room-schedule feed.
//!
//! The feed represents all event metadata as a flat list of keyed attributes
//! rather than typed fields, and no key is guaranteed to be present. Lookup
//! by key is the only access path; a missing key is a normal outcome, not an
//! error, so filtering and grouping are expressed as attribute predicates.

use crate::error::CampusResult;

/// One occurrence record from the room-schedule feed.
#[derive(Debug, Clone, PartialEq)]
pub struct RawEvent {
    /// Resource type tag carried by the feed.
    pub type_id: String,
    attrs: Vec<(String, String)>,
}

impl RawEvent {
    pub fn new(type_id: impl Into<String>, attrs: Vec<(String, String)>) -> Self {
        RawEvent {
            type_id: type_id.into(),
            attrs,
        }
    }

    /// Look up an attribute by key. First match wins.
    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Parse a room-schedule document into its occurrence records.
///
/// Occurrences live under `resource > description > resourceGroup >
/// description > resource`; each carries its attributes as
/// `description > attribute` children keyed by `attrID`.
pub fn parse_room_schedule(xml: &str) -> CampusResult<Vec<RawEvent>> {
    let doc = roxmltree::Document::parse(xml)?;
    let root = doc.root_element();

    let Some(group) = root
        .descendants()
        .find(|n| n.has_tag_name("resourceGroup"))
    else {
        return Ok(Vec::new());
    };

    let mut events = Vec::new();
    for resource in group.descendants().filter(|n| n.has_tag_name("resource")) {
        let type_id = resource.attribute("typeID").unwrap_or_default().to_string();
        let mut attrs = Vec::new();
        for attribute in resource.descendants().filter(|n| n.has_tag_name("attribute")) {
            let Some(key) = attribute.attribute("attrID") else {
                continue;
            };
            let value = attribute.text().unwrap_or_default().trim().to_string();
            attrs.push((key.to_string(), value));
        }
        events.push(RawEvent { type_id, attrs });
    }
    Ok(events)
}

/// Keep exactly the events whose `key` attribute equals `expected`.
///
/// Order-preserving projection; events without the attribute are dropped.
/// The room-schedule pipeline chains this to express conjunctive selection.
pub fn filter_by_attr(events: Vec<RawEvent>, key: &str, expected: &str) -> Vec<RawEvent> {
    events
        .into_iter()
        .filter(|event| event.attr(key) == Some(expected))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const ROOM_SCHEDULE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<RDM>
  <resource typeID="RO">
    <description>
      <attribute attrID="roomCode">5602.EG.001</attribute>
      <resourceGroup typeID="EventGroup">
        <description>
          <resource typeID="EV">
            <description>
              <attribute attrID="eventTypeID">LV</attribute>
              <attribute attrID="courseType">VO</attribute>
              <attribute attrID="status">fix</attribute>
              <attribute attrID="eventTitle">Einführung in die Informatik 1</attribute>
              <attribute attrID="dtstart">20231016T081500</attribute>
              <attribute attrID="dtend">20231016T094500</attribute>
            </description>
          </resource>
          <resource typeID="EV">
            <description>
              <attribute attrID="eventTypeID">LV</attribute>
              <attribute attrID="courseType">UE</attribute>
              <attribute attrID="status">fix</attribute>
              <attribute attrID="eventTitle">Zentralübung Informatik 1</attribute>
            </description>
          </resource>
          <resource typeID="EV">
            <description>
              <attribute attrID="eventTypeID">EX</attribute>
              <attribute attrID="status">fix</attribute>
            </description>
          </resource>
        </description>
      </resourceGroup>
    </description>
  </resource>
</RDM>"#;

    #[test]
    fn test_parse_room_schedule_reads_occurrences() {
        let events = parse_room_schedule(ROOM_SCHEDULE).unwrap();
        assert_eq!(events.len(), 3);
        assert_eq!(events[0].attr("eventTitle"), Some("Einführung in die Informatik 1"));
        assert_eq!(events[0].attr("dtstart"), Some("20231016T081500"));
    }

    #[test]
    fn test_missing_attribute_is_normal() {
        let events = parse_room_schedule(ROOM_SCHEDULE).unwrap();
        assert_eq!(events[2].attr("eventTitle"), None);
        assert_eq!(events[2].attr("courseType"), None);
    }

    #[test]
    fn test_malformed_xml_is_an_error() {
        assert!(parse_room_schedule("<RDM><resource>").is_err());
    }

    #[test]
    fn test_filter_keeps_matching_events_in_order() {
        let events = parse_room_schedule(ROOM_SCHEDULE).unwrap();
        let filtered = filter_by_attr(events, "eventTypeID", "LV");
        assert_eq!(filtered.len(), 2);
        assert_eq!(filtered[0].attr("courseType"), Some("VO"));
        assert_eq!(filtered[1].attr("courseType"), Some("UE"));
    }

    #[test]
    fn test_filter_drops_events_without_the_attribute() {
        let events = vec![
            RawEvent::new("EV", vec![("status".to_string(), "fix".to_string())]),
            RawEvent::new("EV", vec![]),
        ];
        let filtered = filter_by_attr(events, "status", "fix");
        assert_eq!(filtered.len(), 1);
    }

    #[test]
    fn test_filter_is_idempotent() {
        let events = parse_room_schedule(ROOM_SCHEDULE).unwrap();
        let once = filter_by_attr(events, "status", "fix");
        let twice = filter_by_attr(once.clone(), "status", "fix");
        assert_eq!(once, twice);
    }

    #[test]
    fn test_chained_filters_select_conjunctively() {
        let events = parse_room_schedule(ROOM_SCHEDULE).unwrap();
        let events = filter_by_attr(events, "eventTypeID", "LV");
        let events = filter_by_attr(events, "courseType", "VO");
        let events = filter_by_attr(events, "status", "fix");
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].attr("eventTitle"), Some("Einführung in die Informatik 1"));
    }
}
