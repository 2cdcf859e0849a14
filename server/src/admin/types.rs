//! Admin request types.

use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use mb_common::Role;

/// Body for POST /api/admin/operations.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterOperationRequest {
    /// Dotted operation key (`parts.discount.apply`).
    #[validate(length(min = 3, max = 100))]
    pub key: String,
    /// Entity type the operation acts on.
    #[validate(length(min = 1, max = 50))]
    pub entity: String,
    /// Required permission type name (`view`, `create`, `execute`, `approve`).
    pub required: String,
}

/// One grant row in a profile request.
#[derive(Debug, Deserialize)]
pub struct GrantBody {
    /// Operation key; must already be registered.
    pub operation: String,
    /// Permission type names to grant.
    pub types: Vec<String>,
}

/// Body for POST /api/admin/profiles.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateProfileRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    pub grants: Vec<GrantBody>,
}

/// Body for POST /api/admin/users.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(length(min = 1, max = 100))]
    pub username: String,
    pub role: Role,
    #[serde(default)]
    pub profile_ids: Vec<Uuid>,
}

/// Body for PUT /api/admin/users/{id}/profiles.
#[derive(Debug, Deserialize)]
pub struct AssignProfilesRequest {
    pub profile_ids: Vec<Uuid>,
}
