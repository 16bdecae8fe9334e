//! User and registration models

use serde::{Deserialize, Serialize};

use super::enums::Role;
use super::serde_helpers::string_or_number;

/// A registered account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
}

/// A provisional registration awaiting MASTER approval.
pub type PendingUser = User;

/// Body for register and user/pending-user update calls.
///
/// The password is write-only: it is sent when present and never read back.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct UserPayload {
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    pub role: Role,
}

impl std::fmt::Debug for UserPayload {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("UserPayload")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &self.password.as_ref().map(|_| "[REDACTED]"))
            .field("role", &self.role)
            .finish()
    }
}

#[derive(Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for LoginRequest {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("LoginRequest")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_ignores_password_in_responses() {
        let raw = r#"{"id": 3, "name": "Lia", "email": "lia@ifsp.edu.br", "role": "REQUESTER", "password": "hash"}"#;
        let user: User = serde_json::from_str(raw).unwrap();
        assert_eq!(user.id, "3");
        assert_eq!(user.role, Role::Requester);
    }

    #[test]
    fn payload_omits_missing_password() {
        let payload = UserPayload {
            name: "Lia".to_string(),
            email: "lia@ifsp.edu.br".to_string(),
            password: None,
            role: Role::User,
        };
        let value = serde_json::to_value(&payload).unwrap();
        assert!(value.get("password").is_none());
        assert_eq!(value["role"], "USER");
    }

    #[test]
    fn debug_redacts_passwords() {
        let request = LoginRequest {
            email: "lia@ifsp.edu.br".to_string(),
            password: "segredo123".to_string(),
        };
        assert!(!format!("{request:?}").contains("segredo123"));

        let payload = UserPayload {
            name: "Lia".to_string(),
            email: "lia@ifsp.edu.br".to_string(),
            password: Some("segredo123".to_string()),
            role: Role::User,
        };
        assert!(!format!("{payload:?}").contains("segredo123"));
    }
}
