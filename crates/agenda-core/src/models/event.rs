//! Event model

use std::fmt;
use std::time::Duration;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use super::enums::{AdministrativeStatus, EventMode, EventStatus, Priority};
use super::serde_helpers::{hhmm, lenient_datetime, null_as_default, string_or_number};

/// Where an event takes place.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub name: String,
    #[serde(deserialize_with = "string_or_number")]
    pub floor: String,
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.floor.trim().is_empty() {
            f.write_str(&self.name)
        } else {
            write!(f, "{} ({}º andar)", self.name, self.floor)
        }
    }
}

/// Time reserved after an event to clean the room, as an ISO-8601 duration
/// (`PT30M`, `PT1H15M`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CleanupDuration(String);

impl CleanupDuration {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into().trim().to_string())
    }

    pub fn from_minutes(minutes: u32) -> Self {
        Self(format!("PT{minutes}M"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Parse the ISO-8601 text into a standard duration.
    pub fn to_duration(&self) -> Result<Duration, String> {
        let parsed = iso8601::duration(&self.0)?;
        Ok(parsed.into())
    }

    pub fn minutes(&self) -> Option<u64> {
        self.to_duration().ok().map(|duration| duration.as_secs() / 60)
    }
}

impl Default for CleanupDuration {
    fn default() -> Self {
        Self::from_minutes(0)
    }
}

impl fmt::Display for CleanupDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.minutes() {
            Some(minutes) => write!(f, "{minutes} min"),
            None => f.write_str(&self.0),
        }
    }
}

/// Editable body of an event, shared by events and pending events.
///
/// This is what create, update and resolve calls send.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventPayload {
    pub name: String,
    pub day: NaiveDate,
    #[serde(with = "hhmm")]
    pub start_time: NaiveTime,
    #[serde(with = "hhmm")]
    pub end_time: NaiveTime,
    #[serde(default, deserialize_with = "null_as_default")]
    pub theme: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub target_audience: String,
    pub mode: EventMode,
    #[serde(default, deserialize_with = "null_as_default")]
    pub environment: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub organizer: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub resources_description: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub disclosure_method: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub related_subjects: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub teaching_strategy: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub authors: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub courses: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub disciplinary_link: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub location: Location,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: EventStatus,
    #[serde(default, deserialize_with = "null_as_default")]
    pub administrative_status: AdministrativeStatus,
    #[serde(default, deserialize_with = "null_as_default")]
    pub priority: Priority,
    #[serde(default, deserialize_with = "null_as_default")]
    pub cleanup_duration: CleanupDuration,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub observation: Option<String>,
}

impl EventPayload {
    /// Time range rendered as `HH:MM - HH:MM`.
    pub fn time_range_label(&self) -> String {
        format!(
            "{} - {}",
            self.start_time.format("%H:%M"),
            self.end_time.format("%H:%M")
        )
    }

    /// Day rendered as `dd/mm/yyyy`.
    pub fn day_label(&self) -> String {
        self.day.format("%d/%m/%Y").to_string()
    }
}

/// A scheduled event owned by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(flatten)]
    pub details: EventPayload,
    #[serde(
        default,
        with = "lenient_datetime",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<NaiveDateTime>,
    #[serde(
        default,
        with = "lenient_datetime",
        skip_serializing_if = "Option::is_none"
    )]
    pub last_modified_at: Option<NaiveDateTime>,
}

/// Filters for `POST /api/events/search`. Unset filters are omitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventSearchFilters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub day: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organizer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<EventMode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<EventStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub administrative_status: Option<AdministrativeStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
}

impl EventSearchFilters {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}


#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::fixtures::{event, payload};
    use super::*;

    #[test]
    fn payload_serializes_camel_case_with_short_times() {
        let value = serde_json::to_value(payload("Semana Acadêmica")).unwrap();
        assert_eq!(value["startTime"], "09:00");
        assert_eq!(value["endTime"], "11:00");
        assert_eq!(value["day"], "2025-03-20");
        assert_eq!(value["cleanupDuration"], "PT30M");
        assert_eq!(value["resourcesDescription"][0], "Projetor");
        assert!(value.get("observation").is_none());
    }

    #[test]
    fn event_deserializes_backend_shape() {
        let raw = r#"{
            "id": 42,
            "name": "Feira de Ciências",
            "day": "2025-05-02",
            "startTime": "14:00:00",
            "endTime": "16:30:00",
            "mode": "HIBRIDO",
            "location": {"name": "Ginásio", "floor": 0},
            "status": "CONFIRMADO",
            "administrativeStatus": "APROVADO",
            "priority": "ALTA",
            "cleanupDuration": "PT1H",
            "authors": ["Carla"],
            "createdAt": "2025-04-01T10:15:00",
            "lastModifiedAt": "2025-04-02T08:00:00Z"
        }"#;
        let parsed: Event = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.id, "42");
        assert_eq!(parsed.details.mode, EventMode::Hibrido);
        assert_eq!(parsed.details.location.floor, "0");
        assert_eq!(parsed.details.cleanup_duration.minutes(), Some(60));
        assert_eq!(parsed.details.authors, vec!["Carla".to_string()]);
        assert!(parsed.details.courses.is_empty());
        assert!(parsed.created_at.is_some());
        assert!(parsed.last_modified_at.is_some());
    }

    #[test]
    fn event_keeps_payload_when_flattened() {
        let original = event("E1", "Hackathon");
        let json = serde_json::to_string(&original).unwrap();
        let parsed: Event = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, original);
    }

    #[test]
    fn labels_use_brazilian_formats() {
        let payload = payload("Mostra");
        assert_eq!(payload.day_label(), "20/03/2025");
        assert_eq!(payload.time_range_label(), "09:00 - 11:00");
    }

    #[test]
    fn cleanup_duration_parses_iso8601() {
        assert_eq!(CleanupDuration::new("PT1H15M").minutes(), Some(75));
        assert_eq!(CleanupDuration::new("quinze").minutes(), None);
        assert_eq!(CleanupDuration::from_minutes(45).to_string(), "45 min");
    }

    #[test]
    fn empty_search_filters_serialize_to_empty_object() {
        let filters = EventSearchFilters::default();
        assert!(filters.is_empty());
        assert_eq!(serde_json::to_string(&filters).unwrap(), "{}");
    }
}
