//! Events, as sent to and received from the remote service

use serde::{Deserialize, Serialize};

/// Numeric identifier of an object on the remote service
pub type RemoteId = u64;

/// Every rendered event is published straight away
pub const PUBLISH_STATUS: &str = "publish";

/// A fully resolved event, ready to be sent to the remote service.
///
/// Built fresh for every (template, date) pair.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RenderedEvent {
    pub title: String,
    /// Idempotency key of this occurrence
    pub slug: String,
    pub description: String,
    pub excerpt: String,
    /// `YYYY-MM-DD HH:MM:SS`, wall-clock time
    pub start_date: String,
    /// `YYYY-MM-DD HH:MM:SS`, wall-clock time
    pub end_date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub venue: Option<RemoteId>,
    #[serde(rename = "organizer", skip_serializing_if = "Option::is_none")]
    pub organiser: Option<RemoteId>,
    pub tags: Vec<RemoteId>,
    pub categories: Vec<RemoteId>,
    pub status: String,
    pub show_map: bool,
    pub show_map_link: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<RemoteId>,
}

/// An event that already exists on the remote service. Only what is needed to detect duplicates is kept.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct RemoteEvent {
    pub id: RemoteId,
    pub slug: String,
}


#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_payload_field_names() {
        let event = RenderedEvent {
            title: "Morning Service [Sunday 1st February 2026]".to_string(),
            slug: "2026-02-01-morning-service".to_string(),
            description: "<p>desc</p>".to_string(),
            excerpt: "<p>desc</p>".to_string(),
            start_date: "2026-02-01 10:00:00".to_string(),
            end_date: "2026-02-01 11:15:00".to_string(),
            venue: Some(3),
            organiser: Some(4),
            tags: vec![10, 11],
            categories: vec![20],
            status: PUBLISH_STATUS.to_string(),
            show_map: true,
            show_map_link: true,
            image: None,
        };

        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["organizer"], 4);
        assert_eq!(json["venue"], 3);
        assert_eq!(json["status"], "publish");
        assert_eq!(json["tags"], serde_json::json!([10, 11]));
        assert!(json.get("image").is_none());
        assert!(json.get("organiser").is_none());
    }

    #[test]
    fn test_remote_event_ignores_other_fields() {
        let json = r#"{"id": 42, "slug": "2026-02-01-morning-service", "title": "Morning Service", "start_date": "2026-02-01 10:00:00"}"#;
        let event: RemoteEvent = serde_json::from_str(json).unwrap();
        assert_eq!(event, RemoteEvent { id: 42, slug: "2026-02-01-morning-service".to_string() });
    }
}
