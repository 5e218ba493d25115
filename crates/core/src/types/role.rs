//! Admin roles reported by the backend profile endpoint.

use serde::{Deserialize, Serialize};

/// Admin role with different permission levels.
///
/// The backend decides what each role may do; the client only displays it.
/// Roles this client does not know about deserialize as [`AdminRole::Unknown`]
/// instead of failing the whole profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AdminRole {
    /// Full access to all admin features including user management.
    #[serde(alias = "superadmin")]
    SuperAdmin,
    /// Full access to store management features.
    #[default]
    Admin,
    /// Read-only access to store data.
    Viewer,
    /// Any role string not listed above.
    #[serde(other)]
    Unknown,
}

impl std::fmt::Display for AdminRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SuperAdmin => write!(f, "super_admin"),
            Self::Admin => write!(f, "admin"),
            Self::Viewer => write!(f, "viewer"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

impl std::str::FromStr for AdminRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "super_admin" | "superadmin" => Ok(Self::SuperAdmin),
            "admin" => Ok(Self::Admin),
            "viewer" => Ok(Self::Viewer),
            _ => Err(format!("invalid admin role: {s}")),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_known_roles() {
        let role: AdminRole = serde_json::from_str("\"super_admin\"").unwrap();
        assert_eq!(role, AdminRole::SuperAdmin);
        let role: AdminRole = serde_json::from_str("\"superadmin\"").unwrap();
        assert_eq!(role, AdminRole::SuperAdmin);
        let role: AdminRole = serde_json::from_str("\"viewer\"").unwrap();
        assert_eq!(role, AdminRole::Viewer);
    }

    #[test]
    fn test_unknown_role_does_not_fail() {
        let role: AdminRole = serde_json::from_str("\"editor\"").unwrap();
        assert_eq!(role, AdminRole::Unknown);
    }

    #[test]
    fn test_display_matches_from_str() {
        for role in [AdminRole::SuperAdmin, AdminRole::Admin, AdminRole::Viewer] {
            assert_eq!(role.to_string().parse::<AdminRole>().unwrap(), role);
        }
        assert!("unknown".parse::<AdminRole>().is_err());
    }
}
