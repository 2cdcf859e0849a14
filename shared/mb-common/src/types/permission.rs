//! Permission types as bitflags.
//!
//! The four access granularities recognized by the permission gate. Grants
//! combine them with bitwise OR, so a single grant row can allow several
//! types for one operation.

use bitflags::bitflags;

use crate::error::Error;

bitflags! {
    /// Permission types represented as a bitfield.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
    #[serde(transparent)]
    pub struct PermissionTypes: u8 {
        /// Permission to read an entity or listing.
        const VIEW    = 1 << 0;
        /// Permission to create a new entity.
        const CREATE  = 1 << 1;
        /// Permission to run a state-changing action.
        const EXECUTE = 1 << 2;
        /// Permission to approve a pending entity.
        const APPROVE = 1 << 3;
    }
}

impl PermissionTypes {
    /// Check if these types include all of `other`.
    #[must_use]
    pub const fn has(self, other: Self) -> bool {
        self.contains(other)
    }

    /// Parse a single permission type from its lowercase name.
    pub fn parse(name: &str) -> Result<Self, Error> {
        match name {
            "view" => Ok(Self::VIEW),
            "create" => Ok(Self::CREATE),
            "execute" => Ok(Self::EXECUTE),
            "approve" => Ok(Self::APPROVE),
            other => Err(Error::UnknownPermissionType(other.to_string())),
        }
    }
}

impl Default for PermissionTypes {
    fn default() -> Self {
        Self::empty()
    }
}
