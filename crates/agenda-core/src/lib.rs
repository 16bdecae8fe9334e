//! agenda-core - Core library for Agenda
//!
//! Models, form validation, the REST client, session handling and the
//! conflict resolution flow shared by Agenda front ends.

pub mod api;
pub mod auth;
pub mod conflict;
pub mod error;
pub mod form;
pub mod models;
pub mod util;

pub use api::{ApiClient, ApiError, Submission};
pub use auth::{AuthService, Session, SessionPersistence};
pub use conflict::{ConflictFlow, ConflictKind, Decision, EventsBackend, Navigator};
pub use error::Error;
pub use form::{EventForm, FormState, LoginForm, UserForm, ValidationErrors};
pub use models::{Event, EventPayload, PendingEvent, User};
