//! Outcome of calls that the backend may answer with HTTP 409.

use serde_json::Value;

use crate::models::Event;

/// Keys under which a 409 body may carry the record it collided with.
const EXISTING_EVENT_KEYS: &[&str] = &["existingEvent", "conflictingEvent", "conflictData"];

/// Result of a create, update or approve call.
#[derive(Debug, Clone, PartialEq)]
pub enum Submission<T> {
    /// The backend accepted the write. The body is kept when it decodes.
    Accepted(Option<T>),
    /// The backend refused the write because it collides with `existing`.
    Conflict(ConflictRecord),
}

/// Server side of a conflict: the record already occupying the slot, plus the
/// raw 409 body for display.
#[derive(Debug, Clone, PartialEq)]
pub struct ConflictRecord {
    pub existing: Event,
    pub body: Value,
}

/// Pull the existing event out of a 409 body.
///
/// Looks at `existingEvent`, `conflictingEvent` and `conflictData` in that
/// order; `conflictData` may itself wrap an `existingEvent`. Falls back to the
/// body itself when it is an event.
pub fn extract_existing_event(body: &Value) -> Option<Event> {
    for key in EXISTING_EVENT_KEYS {
        let Some(candidate) = body.get(*key) else {
            continue;
        };
        if let Some(nested) = candidate.get("existingEvent") {
            if let Ok(event) = serde_json::from_value::<Event>(nested.clone()) {
                return Some(event);
            }
        }
        if let Ok(event) = serde_json::from_value::<Event>(candidate.clone()) {
            return Some(event);
        }
    }

    serde_json::from_value::<Event>(body.clone()).ok()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::models::event::fixtures::event;
    use crate::models::{CleanupDuration, Priority};

    fn event_json(id: &str) -> Value {
        serde_json::to_value(event(id, "Palestra")).unwrap()
    }

    #[test]
    fn extracts_existing_event_key() {
        let body = json!({ "existingEvent": event_json("E1") });
        assert_eq!(extract_existing_event(&body).unwrap().id, "E1");
    }

    #[test]
    fn extracts_nested_conflict_data() {
        let body = json!({
            "conflictData": {
                "existingEvent": event_json("E9"),
                "pendingEvent": { "id": "P1" }
            }
        });
        assert_eq!(extract_existing_event(&body).unwrap().id, "E9");
    }

    #[test]
    fn extracts_flat_conflict_data_and_bare_body() {
        let flat = json!({ "conflictData": event_json("E2") });
        assert_eq!(extract_existing_event(&flat).unwrap().id, "E2");

        let bare = event_json("E3");
        assert_eq!(extract_existing_event(&bare).unwrap().id, "E3");
    }

    #[test]
    fn existing_event_with_null_optional_fields_is_a_conflict() {
        let mut existing = event_json("E7");
        existing["environment"] = Value::Null;
        existing["resourcesDescription"] = Value::Null;
        existing["theme"] = Value::Null;
        existing["cleanupDuration"] = Value::Null;
        existing["priority"] = Value::Null;

        let found = extract_existing_event(&json!({ "existingEvent": existing })).unwrap();
        assert_eq!(found.id, "E7");
        assert_eq!(found.details.environment, "");
        assert!(found.details.resources_description.is_empty());
        assert_eq!(found.details.theme, "");
        assert_eq!(found.details.cleanup_duration, CleanupDuration::default());
        assert_eq!(found.details.priority, Priority::default());
    }

    #[test]
    fn rejects_bodies_without_event() {
        assert!(extract_existing_event(&json!({ "message": "conflito" })).is_none());
        assert!(extract_existing_event(&json!({ "existingEvent": { "id": "E1" } })).is_none());
    }
}
