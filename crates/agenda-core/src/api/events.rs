//! `/api/events` endpoints.

use reqwest::Method;

use super::{segment, ApiClient, ApiResult, Submission};
use crate::models::{Event, EventPayload, EventSearchFilters};

impl ApiClient {
    pub async fn list_events(&self) -> ApiResult<Vec<Event>> {
        Self::send_json(self.authed_request(Method::GET, "/api/events")?).await
    }

    pub async fn get_event(&self, id: &str) -> ApiResult<Event> {
        let path = format!("/api/events/{}", segment(id));
        Self::send_json(self.authed_request(Method::GET, &path)?).await
    }

    /// Create an event. A clash with an existing event comes back as
    /// [`Submission::Conflict`].
    pub async fn create_event(&self, payload: &EventPayload) -> ApiResult<Submission<Event>> {
        let request = self.authed_request(Method::POST, "/api/events")?.json(payload);
        Self::send_submission(request).await
    }

    pub async fn update_event(
        &self,
        id: &str,
        payload: &EventPayload,
    ) -> ApiResult<Submission<Event>> {
        let path = format!("/api/events/{}", segment(id));
        let request = self.authed_request(Method::PUT, &path)?.json(payload);
        Self::send_submission(request).await
    }

    pub async fn delete_event(&self, id: &str) -> ApiResult<()> {
        let path = format!("/api/events/{}", segment(id));
        Self::send_unit(self.authed_request(Method::DELETE, &path)?).await
    }

    /// Replace `existing_id` with a new event after a creation conflict.
    pub async fn resolve_event_conflict(
        &self,
        existing_id: &str,
        new_event: &EventPayload,
    ) -> ApiResult<()> {
        let path = format!("/api/events/resolve/{}", segment(existing_id));
        Self::send_unit(self.authed_request(Method::POST, &path)?.json(new_event)).await
    }

    /// Overwrite `conflicting_id` with the edited event after an update conflict.
    pub async fn resolve_update_conflict(
        &self,
        conflicting_id: &str,
        updated_event: &EventPayload,
    ) -> ApiResult<()> {
        let path = format!("/api/events/resolve-update/{}", segment(conflicting_id));
        Self::send_unit(self.authed_request(Method::POST, &path)?.json(updated_event)).await
    }

    pub async fn search_events(&self, filters: &EventSearchFilters) -> ApiResult<Vec<Event>> {
        let request = self
            .authed_request(Method::POST, "/api/events/search")?
            .json(filters);
        Self::send_json(request).await
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::api::ApiError;
    use crate::models::event::fixtures::{event, payload};
    use crate::models::EventMode;

    fn client(server: &MockServer) -> ApiClient {
        ApiClient::new(server.uri()).unwrap().with_token("tok")
    }

    #[tokio::test]
    async fn list_events_sends_bearer_token() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/events"))
            .and(header("authorization", "Bearer tok"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                event("E1", "Palestra"),
                event("E2", "Oficina")
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let events = client(&server).list_events().await.unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[1].id, "E2");
    }

    #[tokio::test]
    async fn unauthenticated_client_fails_without_network() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let client = ApiClient::new(server.uri()).unwrap();
        let error = client.list_events().await.unwrap_err();
        assert!(matches!(error, ApiError::NotSignedIn));
    }

    #[tokio::test]
    async fn create_event_returns_conflict_with_existing_record() {
        let server = MockServer::start().await;
        let submitted = payload("Semana de Tecnologia");
        Mock::given(method("POST"))
            .and(path("/api/events"))
            .and(body_json(&submitted))
            .respond_with(
                ResponseTemplate::new(409)
                    .set_body_json(json!({ "existingEvent": event("E1", "Reunião") })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let outcome = client(&server).create_event(&submitted).await.unwrap();
        let Submission::Conflict(conflict) = outcome else {
            panic!("expected conflict");
        };
        assert_eq!(conflict.existing, event("E1", "Reunião"));
    }

    #[tokio::test]
    async fn create_event_accepts_empty_success_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/events"))
            .respond_with(ResponseTemplate::new(201))
            .mount(&server)
            .await;

        let outcome = client(&server)
            .create_event(&payload("Mostra"))
            .await
            .unwrap();
        assert_eq!(outcome, Submission::Accepted(None));
    }

    #[tokio::test]
    async fn conflict_without_event_is_malformed() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/api/events/E5"))
            .respond_with(ResponseTemplate::new(409).set_body_string("conflito"))
            .mount(&server)
            .await;

        let error = client(&server)
            .update_event("E5", &payload("Mostra"))
            .await
            .unwrap_err();
        assert!(matches!(error, ApiError::MalformedConflict(_)));
    }

    #[tokio::test]
    async fn server_errors_surface_status_and_message() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/api/events/E1"))
            .respond_with(
                ResponseTemplate::new(500).set_body_json(json!({ "message": "falha interna" })),
            )
            .mount(&server)
            .await;

        let error = client(&server).delete_event("E1").await.unwrap_err();
        assert_eq!(error.status(), Some(500));
        assert!(error.to_string().contains("falha interna"));
    }

    #[tokio::test]
    async fn resolve_endpoints_use_conflicting_id_in_path() {
        let server = MockServer::start().await;
        let submitted = payload("Congresso");
        Mock::given(method("POST"))
            .and(path("/api/events/resolve/E1"))
            .and(body_json(&submitted))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/events/resolve-update/E2"))
            .and(body_json(&submitted))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let client = client(&server);
        client.resolve_event_conflict("E1", &submitted).await.unwrap();
        client
            .resolve_update_conflict("E2", &submitted)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn search_posts_only_set_filters() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/events/search"))
            .and(body_json(json!({ "name": "feira", "mode": "ONLINE" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(1)
            .mount(&server)
            .await;

        let filters = EventSearchFilters {
            name: Some("feira".to_string()),
            mode: Some(EventMode::Online),
            ..Default::default()
        };
        let found = client(&server).search_events(&filters).await.unwrap();
        assert!(found.is_empty());
    }
}
