//! `/pending-events` and `/event-approval` endpoints.

use reqwest::Method;

use super::{segment, ApiClient, ApiResult, Submission};
use crate::models::{Event, EventPayload, PendingEvent};

impl ApiClient {
    pub async fn list_pending_events(&self) -> ApiResult<Vec<PendingEvent>> {
        Self::send_json(self.authed_request(Method::GET, "/pending-events")?).await
    }

    /// Pending events submitted by the signed-in user.
    pub async fn my_pending_events(&self) -> ApiResult<Vec<PendingEvent>> {
        let request = self.authed_request(Method::GET, "/pending-events/my-pending-events")?;
        Self::send_json(request).await
    }

    pub async fn get_pending_event(&self, id: &str) -> ApiResult<PendingEvent> {
        let path = format!("/pending-events/{}", segment(id));
        Self::send_json(self.authed_request(Method::GET, &path)?).await
    }

    pub async fn create_pending_event(&self, payload: &EventPayload) -> ApiResult<()> {
        let request = self
            .authed_request(Method::POST, "/pending-events")?
            .json(payload);
        Self::send_unit(request).await
    }

    pub async fn update_pending_event(&self, id: &str, payload: &EventPayload) -> ApiResult<()> {
        let path = format!("/pending-events/{}", segment(id));
        Self::send_unit(self.authed_request(Method::PUT, &path)?.json(payload)).await
    }

    pub async fn delete_pending_event(&self, id: &str) -> ApiResult<()> {
        let path = format!("/pending-events/{}", segment(id));
        Self::send_unit(self.authed_request(Method::DELETE, &path)?).await
    }

    /// Approve a pending event. A clash with a scheduled event comes back as
    /// [`Submission::Conflict`].
    pub async fn approve_pending_event(&self, pending_id: &str) -> ApiResult<Submission<Event>> {
        let path = format!("/event-approval/{}/approve", segment(pending_id));
        Self::send_submission(self.authed_request(Method::POST, &path)?).await
    }

    pub async fn reject_pending_event(&self, pending_id: &str) -> ApiResult<()> {
        let path = format!("/event-approval/{}/reject", segment(pending_id));
        Self::send_unit(self.authed_request(Method::DELETE, &path)?).await
    }

    /// Approve `pending_id` anyway, replacing `existing_id`.
    pub async fn resolve_pending_event_conflict(
        &self,
        existing_id: &str,
        pending_id: &str,
    ) -> ApiResult<()> {
        let path = format!(
            "/event-approval/resolve/{}/{}",
            segment(existing_id),
            segment(pending_id)
        );
        Self::send_unit(self.authed_request(Method::POST, &path)?).await
    }
}
