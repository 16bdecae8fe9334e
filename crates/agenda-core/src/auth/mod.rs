//! Session holder with pluggable persistence.
//!
//! The session is explicit state: [`AuthService::hydrate`] restores it from
//! storage once at startup and [`AuthService::logout`] clears both storage
//! and memory. Callers obtain an authenticated [`ApiClient`] from the service
//! instead of reading a global token.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::api::{ApiClient, ApiError};
use crate::form::{FormError, LoginForm, LoginSchema, ValidationErrors};
use crate::models::{string_or_number, Role, UserPayload};

/// Signed-in user as returned by `/api/users/login`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub name: String,
    pub role: Role,
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
}

impl fmt::Debug for Session {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Session")
            .field("token", &"[REDACTED]")
            .field("name", &self.name)
            .field("role", &self.role)
            .field("id", &self.id)
            .finish()
    }
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("Failed to parse JSON payload: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Secure storage error: {0}")]
    SecureStorage(String),
    #[error("Invalid credentials: {0}")]
    Validation(ValidationErrors),
    #[error(transparent)]
    Form(#[from] FormError),
    #[error("No active session; sign in first")]
    NotSignedIn,
}

pub type AuthResult<T> = Result<T, AuthError>;

/// Device key-value storage for the session.
pub trait SessionPersistence: Clone + Send + Sync + 'static {
    fn load_session(&self) -> AuthResult<Option<Session>>;
    fn save_session(&self, session: &Session) -> AuthResult<()>;
    fn clear_session(&self) -> AuthResult<()>;
}

/// Process-local store keyed by slot name. Nothing survives a restart.
#[derive(Debug, Clone, Default)]
pub struct MemorySessionStore {
    slot: String,
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemorySessionStore {
    pub fn new(slot: impl Into<String>) -> Self {
        Self {
            slot: slot.into(),
            entries: Arc::default(),
        }
    }

    fn lock(&self) -> AuthResult<std::sync::MutexGuard<'_, HashMap<String, String>>> {
        self.entries
            .lock()
            .map_err(|error| AuthError::SecureStorage(error.to_string()))
    }
}

impl SessionPersistence for MemorySessionStore {
    fn load_session(&self) -> AuthResult<Option<Session>> {
        let guard = self.lock()?;
        guard
            .get(&self.slot)
            .map(|raw| serde_json::from_str(raw))
            .transpose()
            .map_err(AuthError::from)
    }

    fn save_session(&self, session: &Session) -> AuthResult<()> {
        let raw = serde_json::to_string(session)?;
        self.lock()?.insert(self.slot.clone(), raw);
        Ok(())
    }

    fn clear_session(&self) -> AuthResult<()> {
        self.lock()?.remove(&self.slot);
        Ok(())
    }
}

#[derive(Clone)]
pub struct AuthService<S: SessionPersistence> {
    api: ApiClient,
    store: S,
    session: Option<Session>,
    hydrated: bool,
}

impl<S: SessionPersistence> AuthService<S> {
    pub fn new(api: ApiClient, store: S) -> Self {
        let mut api = api;
        api.clear_token();
        Self {
            api,
            store,
            session: None,
            hydrated: false,
        }
    }

    /// Restore the persisted session. Storage is read only on the first call.
    pub fn hydrate(&mut self) -> AuthResult<Option<&Session>> {
        if !self.hydrated {
            self.session = self.store.load_session()?;
            self.hydrated = true;
            if let Some(session) = &self.session {
                tracing::debug!(user_id = %session.id, "Restored persisted session");
            }
        }
        Ok(self.session.as_ref())
    }

    pub async fn login(&mut self, email: &str, password: &str) -> AuthResult<&Session> {
        let mut form = LoginForm::new(LoginSchema);
        form.set("email", email)?;
        form.set("password", password)?;
        let credentials = form.to_request().map_err(AuthError::Validation)?;

        let session = self.api.login(&credentials).await?;
        self.store.save_session(&session)?;
        tracing::info!(user_id = %session.id, role = %session.role.as_wire(), "Signed in");
        self.hydrated = true;
        Ok(self.session.insert(session))
    }

    pub async fn register(&self, payload: &UserPayload) -> AuthResult<()> {
        self.api.register(payload).await?;
        Ok(())
    }

    /// Forget the session in memory and in storage.
    pub fn logout(&mut self) -> AuthResult<()> {
        self.session = None;
        self.hydrated = true;
        self.store.clear_session()
    }

    pub const fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// Client carrying the current session's bearer token.
    pub fn client(&self) -> AuthResult<ApiClient> {
        let session = self.session.as_ref().ok_or(AuthError::NotSignedIn)?;
        Ok(self.api.clone().with_session(session))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn session() -> Session {
        Session {
            token: "secret-jwt".to_string(),
            name: "Ana".to_string(),
            role: Role::Requester,
            id: "7".to_string(),
        }
    }

    #[test]
    fn session_debug_redacts_token() {
        let rendered = format!("{:?}", session());
        assert!(!rendered.contains("secret-jwt"));
        assert!(rendered.contains("[REDACTED]"));
    }

    #[test]
    fn hydrate_reads_storage_once() {
        let store = MemorySessionStore::new("test");
        store.save_session(&session()).unwrap();
        let api = ApiClient::new("https://agenda.example.com").unwrap();
        let mut service = AuthService::new(api, store.clone());

        assert_eq!(service.hydrate().unwrap(), Some(&session()));
        store.clear_session().unwrap();
        assert_eq!(service.hydrate().unwrap(), Some(&session()));
    }

    #[test]
    fn logout_clears_memory_and_storage() {
        let store = MemorySessionStore::new("test");
        store.save_session(&session()).unwrap();
        let api = ApiClient::new("https://agenda.example.com").unwrap();
        let mut service = AuthService::new(api, store.clone());
        service.hydrate().unwrap();

        service.logout().unwrap();
        assert!(service.session().is_none());
        assert!(store.load_session().unwrap().is_none());
        assert!(matches!(service.client(), Err(AuthError::NotSignedIn)));
    }

    #[test]
    fn client_carries_session_token() {
        let store = MemorySessionStore::new("test");
        store.save_session(&session()).unwrap();
        let api = ApiClient::new("https://agenda.example.com").unwrap();
        let mut service = AuthService::new(api, store);
        service.hydrate().unwrap();

        assert!(service.client().unwrap().is_authenticated());
    }

    #[tokio::test]
    async fn login_validates_before_network() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let api = ApiClient::new(server.uri()).unwrap();
        let mut service = AuthService::new(api, MemorySessionStore::new("test"));
        let error = service.login("não-é-email", "").await.unwrap_err();
        let AuthError::Validation(errors) = error else {
            panic!("expected validation error");
        };
        assert!(errors.get("email").is_some());
        assert!(errors.get("password").is_some());
    }

    #[tokio::test]
    async fn login_persists_session() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/users/login"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "token": "secret-jwt",
                "name": "Ana",
                "role": "REQUESTER",
                "id": "7"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let store = MemorySessionStore::new("test");
        let api = ApiClient::new(server.uri()).unwrap();
        let mut service = AuthService::new(api, store.clone());
        let signed_in = service.login("ana@ifsp.edu.br", "segredo").await.unwrap();
        assert_eq!(signed_in, &session());
        assert_eq!(store.load_session().unwrap(), Some(session()));
    }
}
