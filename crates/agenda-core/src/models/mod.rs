//! Data models for Agenda

mod enums;
pub(crate) mod event;
mod pending_event;
mod serde_helpers;
mod user;

pub use enums::{AdministrativeStatus, EventMode, EventStatus, ParseEnumError, Priority, Role};
pub use event::{CleanupDuration, Event, EventPayload, EventSearchFilters, Location};
pub use pending_event::PendingEvent;
pub(crate) use serde_helpers::{format_time, parse_time, string_or_number};
pub use user::{LoginRequest, PendingUser, User, UserPayload};
