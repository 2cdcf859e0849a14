//! User Types

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Primitive role assigned to every back-office user.
///
/// Roles are the legacy, coarse authorization layer. Granular access is
/// modeled by permission profiles; the role survives as a fallback allow-list
/// for endpoints not yet migrated to granular checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Full administrative access.
    Admin,
    /// Branch manager.
    Manager,
    /// Day-to-day operator (contracts, payments intake).
    Operator,
    /// Accounting staff (payments, invoices).
    Accountant,
    /// Workshop / parts staff.
    Mechanic,
}

impl Role {
    /// Parse a role from its lowercase name.
    pub fn parse(name: &str) -> Result<Self, Error> {
        match name {
            "admin" => Ok(Self::Admin),
            "manager" => Ok(Self::Manager),
            "operator" => Ok(Self::Operator),
            "accountant" => Ok(Self::Accountant),
            "mechanic" => Ok(Self::Mechanic),
            other => Err(Error::UnknownRole(other.to_string())),
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Admin => "admin",
            Self::Manager => "manager",
            Self::Operator => "operator",
            Self::Accountant => "accountant",
            Self::Mechanic => "mechanic",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parse_roundtrip() {
        for role in [
            Role::Admin,
            Role::Manager,
            Role::Operator,
            Role::Accountant,
            Role::Mechanic,
        ] {
            assert_eq!(Role::parse(&role.to_string()).unwrap(), role);
        }
    }

    #[test]
    fn test_role_parse_unknown() {
        assert!(matches!(Role::parse("root"), Err(Error::UnknownRole(_))));
    }
}
