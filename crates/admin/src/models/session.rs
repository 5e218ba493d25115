//! Session-related types for admin authentication.

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use storekeep_core::{AdminRole, AdminUserId, Email};

/// The authenticated admin, as reported by the backend profile endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ProfileWire")]
pub struct CurrentAdmin {
    /// Backend user ID (`_id` or `id` on the wire).
    pub id: AdminUserId,
    /// Admin's display name.
    #[serde(default)]
    pub name: String,
    /// Admin's email address.
    pub email: Email,
    /// Admin's role/permission level.
    #[serde(default)]
    pub role: AdminRole,
}

/// Profile as sent by the backend, which may carry `_id`, `id` or both.
#[derive(Deserialize)]
struct ProfileWire {
    #[serde(rename = "_id")]
    underscore_id: Option<AdminUserId>,
    id: Option<AdminUserId>,
    #[serde(default)]
    name: String,
    email: Email,
    #[serde(default)]
    role: AdminRole,
}

impl TryFrom<ProfileWire> for CurrentAdmin {
    type Error = String;

    /// `_id` wins over `id`; blank values count as missing.
    fn try_from(wire: ProfileWire) -> Result<Self, Self::Error> {
        let id = [wire.underscore_id, wire.id]
            .into_iter()
            .flatten()
            .find(|id| !id.as_str().is_empty())
            .ok_or_else(|| "profile has no `_id` or `id`".to_string())?;
        Ok(Self {
            id,
            name: wire.name,
            email: wire.email,
            role: wire.role,
        })
    }
}

impl CurrentAdmin {
    /// Name to greet the admin with, falling back to the email address.
    #[must_use]
    pub fn display_name(&self) -> &str {
        if self.name.trim().is_empty() {
            self.email.as_str()
        } else {
            &self.name
        }
    }
}

/// Login form input.
///
/// Kept as raw strings: validation happens when the auth context submits it.
#[derive(Clone)]
pub struct Credentials {
    pub email: String,
    pub password: SecretString,
}

impl Credentials {
    #[must_use]
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: SecretString::from(password.into()),
        }
    }

    /// Whether a password was entered at all.
    #[must_use]
    pub fn has_password(&self) -> bool {
        !self.password.expose_secret().is_empty()
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_current_admin_accepts_underscore_id() {
        let admin: CurrentAdmin = serde_json::from_value(json!({
            "_id": "65a0",
            "name": "Ada",
            "email": "ada@example.com",
            "role": "super_admin"
        }))
        .unwrap();
        assert_eq!(admin.id.as_str(), "65a0");
        assert_eq!(admin.role, AdminRole::SuperAdmin);
    }

    #[test]
    fn test_current_admin_with_both_ids_prefers_underscore_id() {
        let admin: CurrentAdmin = serde_json::from_value(json!({
            "_id": "u1",
            "id": "virtual",
            "name": "Ada",
            "email": "ada@example.com",
            "role": "admin"
        }))
        .unwrap();
        assert_eq!(admin.id.as_str(), "u1");

        let fallback: CurrentAdmin = serde_json::from_value(json!({
            "_id": "",
            "id": "u2",
            "email": "ada@example.com"
        }))
        .unwrap();
        assert_eq!(fallback.id.as_str(), "u2");
    }

    #[test]
    fn test_current_admin_requires_an_id() {
        let err = serde_json::from_value::<CurrentAdmin>(json!({"email": "ada@example.com"}))
            .unwrap_err();
        assert!(err.to_string().contains("no `_id` or `id`"));
    }

    #[test]
    fn test_current_admin_defaults() {
        let admin: CurrentAdmin =
            serde_json::from_value(json!({"id": 3, "email": "ops@example.com"})).unwrap();
        assert_eq!(admin.id.as_str(), "3");
        assert_eq!(admin.role, AdminRole::Admin);
        assert_eq!(admin.display_name(), "ops@example.com");
    }

    #[test]
    fn test_credentials_debug_redacts_password() {
        let creds = Credentials::new("a@example.com", "hunter2");
        let debug = format!("{creds:?}");
        assert!(debug.contains("a@example.com"));
        assert!(!debug.contains("hunter2"));
        assert!(creds.has_password());
        assert!(!Credentials::new("a@example.com", "").has_password());
    }
}
