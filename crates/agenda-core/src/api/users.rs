//! `/api/users` and `/pendingUser` endpoints.

use reqwest::Method;

use super::{segment, ApiClient, ApiResult};
use crate::auth::Session;
use crate::models::{LoginRequest, PendingUser, User, UserPayload};

impl ApiClient {
    /// Exchange credentials for a session. Does not require a token.
    pub async fn login(&self, credentials: &LoginRequest) -> ApiResult<Session> {
        let request = self
            .public_request(Method::POST, "/api/users/login")
            .json(credentials);
        Self::send_json(request).await
    }

    /// Submit a registration; it becomes a pending user awaiting approval.
    pub async fn register(&self, payload: &UserPayload) -> ApiResult<()> {
        let request = self
            .public_request(Method::POST, "/api/users/register")
            .json(payload);
        Self::send_unit(request).await
    }

    pub async fn list_users(&self) -> ApiResult<Vec<User>> {
        Self::send_json(self.authed_request(Method::GET, "/api/users")?).await
    }

    pub async fn get_user(&self, id: &str) -> ApiResult<User> {
        let path = format!("/api/users/{}", segment(id));
        Self::send_json(self.authed_request(Method::GET, &path)?).await
    }

    pub async fn update_user(&self, id: &str, payload: &UserPayload) -> ApiResult<()> {
        let path = format!("/api/users/{}", segment(id));
        Self::send_unit(self.authed_request(Method::PUT, &path)?.json(payload)).await
    }

    pub async fn delete_user(&self, id: &str) -> ApiResult<()> {
        let path = format!("/api/users/{}", segment(id));
        Self::send_unit(self.authed_request(Method::DELETE, &path)?).await
    }

    pub async fn list_pending_users(&self) -> ApiResult<Vec<PendingUser>> {
        Self::send_json(self.authed_request(Method::GET, "/pendingUser")?).await
    }

    pub async fn get_pending_user(&self, id: &str) -> ApiResult<PendingUser> {
        let path = format!("/pendingUser/{}", segment(id));
        Self::send_json(self.authed_request(Method::GET, &path)?).await
    }

    pub async fn update_pending_user(&self, id: &str, payload: &UserPayload) -> ApiResult<()> {
        let path = format!("/pendingUser/{}", segment(id));
        Self::send_unit(self.authed_request(Method::PUT, &path)?.json(payload)).await
    }

    pub async fn delete_pending_user(&self, id: &str) -> ApiResult<()> {
        let path = format!("/pendingUser/{}", segment(id));
        Self::send_unit(self.authed_request(Method::DELETE, &path)?).await
    }

    /// Promote a pending registration to a regular user.
    pub async fn approve_pending_user(&self, id: &str) -> ApiResult<()> {
        let path = format!("/pendingUser/{}/approve", segment(id));
        Self::send_unit(self.authed_request(Method::POST, &path)?).await
    }

    pub async fn reject_pending_user(&self, id: &str) -> ApiResult<()> {
        let path = format!("/pendingUser/{}/reject", segment(id));
        Self::send_unit(self.authed_request(Method::DELETE, &path)?).await
    }
}
