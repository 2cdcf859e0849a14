//! JWT Token Validation
//!
//! HS256 with a shared secret. The external identity provider issues the
//! tokens; this service only validates them and trusts the `sub` claim.
//! The test helper `generate_access_token` signs with the same secret.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::AuthResult;

/// JWT claims for access tokens.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID as UUID string).
    pub sub: String,
    /// Expiration time (Unix timestamp).
    pub exp: i64,
    /// Issued at (Unix timestamp).
    pub iat: i64,
}

/// Generate an access token for a user.
pub fn generate_access_token(user_id: Uuid, secret: &str, expiry_seconds: i64) -> AuthResult<String> {
    let now = Utc::now();
    let claims = Claims {
        sub: user_id.to_string(),
        exp: (now + Duration::seconds(expiry_seconds)).timestamp(),
        iat: now.timestamp(),
    };
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;
    Ok(token)
}

/// Validate an access token and return its claims.
pub fn validate_access_token(token: &str, secret: &str) -> AuthResult<Claims> {
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )?;
    Ok(data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_and_validate() {
        let user_id = Uuid::now_v7();
        let token = generate_access_token(user_id, "test-secret", 900).unwrap();

        let claims = validate_access_token(&token, "test-secret").unwrap();
        assert_eq!(claims.sub, user_id.to_string());
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = generate_access_token(Uuid::now_v7(), "secret-a", 900).unwrap();
        assert!(validate_access_token(&token, "secret-b").is_err());
    }

    #[test]
    fn test_expired_token_rejected() {
        let token = generate_access_token(Uuid::now_v7(), "test-secret", -3600).unwrap();
        assert!(validate_access_token(&token, "test-secret").is_err());
    }
}
