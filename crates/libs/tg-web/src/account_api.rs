//! Request and response bodies of the account endpoints.

use serde::{Deserialize, Serialize};
use tg_auth::auth_body::AuthBody;
use tg_models::account::AccountRecord;

use crate::ctx::Principal;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Public view of an account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserResponse {
    pub identity: String,
    pub roles: Vec<String>,
}

impl From<&AccountRecord> for UserResponse {
    fn from(account: &AccountRecord) -> Self {
        let mut roles: Vec<String> = account.roles.iter().map(|r| r.id.clone()).collect();
        roles.sort();
        Self {
            identity: account.identity.to_string(),
            roles,
        }
    }
}

impl From<&Principal> for UserResponse {
    fn from(principal: &Principal) -> Self {
        Self {
            identity: principal.identity.to_string(),
            roles: principal.role_names(),
        }
    }
}

/// Token plus the account it was issued for.
///
/// # JSON Format
///
/// ```json
/// {
///   "access_token": "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...",
///   "token_type": "Bearer",
///   "expires_in": 86400,
///   "user": { "identity": "user@example.com", "roles": ["USER"] }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthResponse {
    #[serde(flatten)]
    pub token: AuthBody,
    pub user: UserResponse,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailQuery {
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailCheckResponse {
    pub email: String,
    pub is_duplicate: bool,
    pub available: bool,
}

impl EmailCheckResponse {
    pub fn new(email: String, is_duplicate: bool) -> Self {
        Self {
            email,
            is_duplicate,
            available: !is_duplicate,
        }
    }
}
