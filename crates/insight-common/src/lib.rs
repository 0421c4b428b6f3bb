//! Insight Common - Shared types for Insight Manager
//!
//! This crate provides:
//! - Error types and structured error codes
//! - The closed set of user roles and their write permissions
//! - Action types used by the request guard

pub mod error;

pub use error::{ErrorCode, InsightError};

use serde::{Deserialize, Serialize};

/// Resource name for insight records
pub const INSIGHT_RESOURCE: &str = "insights";
/// Resource name for master options
pub const MASTER_RESOURCE: &str = "masters";

/// Action types for permission control
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActionTypes {
    #[default]
    Read,
    Write,
}

impl ActionTypes {
    pub fn as_str(self) -> &'static str {
        match self {
            ActionTypes::Read => "r",
            ActionTypes::Write => "w",
        }
    }
}

impl std::fmt::Display for ActionTypes {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// User role. Determines which resources a user may write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Admin,
    Manager,
    Viewer,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Admin => "Admin",
            Role::Manager => "Manager",
            Role::Viewer => "Viewer",
        }
    }

    /// Check whether this role may perform `action` on `resource`.
    ///
    /// Reads are open to every role. Insight records may be written by
    /// Admin and Manager, master options by Admin only. Unknown resources
    /// are writable by Admin only.
    pub fn permits(self, resource: &str, action: ActionTypes) -> bool {
        match action {
            ActionTypes::Read => true,
            ActionTypes::Write => match (self, resource) {
                (Role::Admin, _) => true,
                (Role::Manager, INSIGHT_RESOURCE) => true,
                _ => false,
            },
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Admin" => Ok(Role::Admin),
            "Manager" => Ok(Role::Manager),
            "Viewer" => Ok(Role::Viewer),
            _ => Err(format!("Invalid role: {}", s)),
        }
    }
}

/// Trim a string and return `None` when nothing is left
pub fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_types_as_str() {
        assert_eq!(ActionTypes::Read.as_str(), "r");
        assert_eq!(ActionTypes::Write.as_str(), "w");
        assert_eq!(ActionTypes::default(), ActionTypes::Read);
    }

    #[test]
    fn test_role_from_str() {
        assert_eq!("Admin".parse::<Role>(), Ok(Role::Admin));
        assert_eq!("Manager".parse::<Role>(), Ok(Role::Manager));
        assert_eq!("Viewer".parse::<Role>(), Ok(Role::Viewer));
        assert!("admin".parse::<Role>().is_err());
        assert!("".parse::<Role>().is_err());
    }

    #[test]
    fn test_role_permissions() {
        for role in [Role::Admin, Role::Manager, Role::Viewer] {
            assert!(role.permits(INSIGHT_RESOURCE, ActionTypes::Read));
            assert!(role.permits(MASTER_RESOURCE, ActionTypes::Read));
        }

        assert!(Role::Admin.permits(INSIGHT_RESOURCE, ActionTypes::Write));
        assert!(Role::Admin.permits(MASTER_RESOURCE, ActionTypes::Write));

        assert!(Role::Manager.permits(INSIGHT_RESOURCE, ActionTypes::Write));
        assert!(!Role::Manager.permits(MASTER_RESOURCE, ActionTypes::Write));

        assert!(!Role::Viewer.permits(INSIGHT_RESOURCE, ActionTypes::Write));
        assert!(!Role::Viewer.permits(MASTER_RESOURCE, ActionTypes::Write));
    }

    #[test]
    fn test_role_serde() {
        let json = serde_json::to_string(&Role::Manager).unwrap();
        assert_eq!(json, "\"Manager\"");
        let role: Role = serde_json::from_str("\"Viewer\"").unwrap();
        assert_eq!(role, Role::Viewer);
    }

    #[test]
    fn test_non_blank() {
        assert_eq!(non_blank(Some("  abc ")), Some("abc"));
        assert_eq!(non_blank(Some("   ")), None);
        assert_eq!(non_blank(None), None);
    }
}
