//! Backend calls the conflict flow depends on.

use async_trait::async_trait;

use crate::api::{ApiClient, ApiResult, Submission};
use crate::models::{Event, EventPayload};

#[async_trait]
pub trait EventsBackend: Send + Sync {
    async fn create_event(&self, payload: &EventPayload) -> ApiResult<Submission<Event>>;

    async fn update_event(
        &self,
        event_id: &str,
        payload: &EventPayload,
    ) -> ApiResult<Submission<Event>>;

    async fn approve_pending_event(&self, pending_id: &str) -> ApiResult<Submission<Event>>;

    async fn resolve_event_conflict(
        &self,
        existing_id: &str,
        new_event: &EventPayload,
    ) -> ApiResult<()>;

    async fn resolve_update_conflict(
        &self,
        conflicting_id: &str,
        updated_event: &EventPayload,
    ) -> ApiResult<()>;

    async fn resolve_pending_event_conflict(
        &self,
        existing_id: &str,
        pending_id: &str,
    ) -> ApiResult<()>;
}

#[async_trait]
impl EventsBackend for ApiClient {
    async fn create_event(&self, payload: &EventPayload) -> ApiResult<Submission<Event>> {
        Self::create_event(self, payload).await
    }

    async fn update_event(
        &self,
        event_id: &str,
        payload: &EventPayload,
    ) -> ApiResult<Submission<Event>> {
        Self::update_event(self, event_id, payload).await
    }

    async fn approve_pending_event(&self, pending_id: &str) -> ApiResult<Submission<Event>> {
        Self::approve_pending_event(self, pending_id).await
    }

    async fn resolve_event_conflict(
        &self,
        existing_id: &str,
        new_event: &EventPayload,
    ) -> ApiResult<()> {
        Self::resolve_event_conflict(self, existing_id, new_event).await
    }

    async fn resolve_update_conflict(
        &self,
        conflicting_id: &str,
        updated_event: &EventPayload,
    ) -> ApiResult<()> {
        Self::resolve_update_conflict(self, conflicting_id, updated_event).await
    }

    async fn resolve_pending_event_conflict(
        &self,
        existing_id: &str,
        pending_id: &str,
    ) -> ApiResult<()> {
        Self::resolve_pending_event_conflict(self, existing_id, pending_id).await
    }
}
