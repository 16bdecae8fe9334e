//! Pending event model

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::event::EventPayload;
use super::serde_helpers::{lenient_datetime, string_or_number};

/// An event awaiting approval by a MASTER.
///
/// Approval promotes it to an [`Event`](super::Event) and removes the pending
/// record; rejection deletes it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingEvent {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    /// User who submitted the request.
    #[serde(deserialize_with = "string_or_number")]
    pub event_requester_id: String,
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
