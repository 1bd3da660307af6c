//! Main Crate Error

use axum::{Json, http::StatusCode, response::IntoResponse};
use serde_json::json;
use tg_auth::error::VerificationError;
use tracing::{debug, error};

use crate::ctx::GateRejection;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Auth(#[from] tg_auth::error::Error),

    #[error(transparent)]
    Models(#[from] tg_models::error::Error),

    #[error(transparent)]
    Token(#[from] VerificationError),

    #[error(transparent)]
    Join(#[from] tokio::task::JoinError),

    /* Api Errors */
    #[error("API Forbidden")]
    ApiForbidden,

    #[error("Wrong Credentials")]
    WrongCredentials,

    #[error("Missing Credentials")]
    MissingCredentials,

    #[error("Account Disabled")]
    AccountDisabled,

    #[error("Unknown Account")]
    UnknownAccount,

    #[error("Account Store Unavailable")]
    AccountStoreUnavailable,

    #[error("Identity Taken")]
    IdentityTaken,

    #[error("Invalid Request: {0}")]
    InvalidRequest(String),

    #[error("Context Missing")]
    CtxMissing,
}

impl From<GateRejection> for Error {
    fn from(value: GateRejection) -> Self {
        match value {
            GateRejection::Token(err) => Error::Token(err),
            GateRejection::UnknownAccount => Error::UnknownAccount,
            GateRejection::AccountDisabled => Error::AccountDisabled,
            GateRejection::AccountLookup => Error::AccountStoreUnavailable,
        }
    }
}

impl Error {
    /// HTTP status, machine-readable code and client-facing message.
    pub fn parts(&self) -> (StatusCode, &'static str, String) {
        let (status, code, message) = match self {
            Error::MissingCredentials | Error::CtxMissing => (
                StatusCode::UNAUTHORIZED,
                "authentication_required",
                "Authentication required",
            ),
            Error::Token(VerificationError::Expired)
            | Error::Auth(tg_auth::error::Error::Verification(VerificationError::Expired)) => (
                StatusCode::UNAUTHORIZED,
                VerificationError::Expired.code(),
                "Authentication token expired",
            ),
            Error::Token(err) | Error::Auth(tg_auth::error::Error::Verification(err)) => (
                StatusCode::UNAUTHORIZED,
                err.code(),
                "Invalid authentication token",
            ),
            Error::UnknownAccount => (
                StatusCode::UNAUTHORIZED,
                "unknown_account",
                "Invalid authentication token",
            ),
            Error::AccountDisabled | Error::Models(tg_models::error::Error::Disabled(_)) => {
                (StatusCode::UNAUTHORIZED, "account_disabled", "Account disabled")
            }
            Error::WrongCredentials => (
                StatusCode::UNAUTHORIZED,
                "wrong_credentials",
                "Invalid credentials",
            ),
            Error::ApiForbidden => (StatusCode::FORBIDDEN, "forbidden", "Access forbidden"),
            Error::IdentityTaken | Error::Models(tg_models::error::Error::DuplicateIdentity(_)) => {
                (StatusCode::CONFLICT, "identity_taken", "Identity already in use")
            }
            Error::InvalidRequest(message) => {
                return (
                    StatusCode::BAD_REQUEST,
                    "invalid_request",
                    message.clone(),
                );
            }
            Error::Auth(tg_auth::error::Error::InvalidIdentity) => {
                (StatusCode::BAD_REQUEST, "invalid_identity", "Invalid identity")
            }
            Error::Models(tg_models::error::Error::NotFound(_)) => {
                (StatusCode::NOT_FOUND, "not_found", "Account not found")
            }
            Error::AccountStoreUnavailable
            | Error::Models(tg_models::error::Error::Unavailable(_)) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "unavailable",
                "Service temporarily unavailable",
            ),
            Error::Auth(_) | Error::Join(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal",
                "Internal server error",
            ),
        };
        (status, code, String::from(message))
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> axum::response::Response {
        let (status, code, message) = self.parts();
        if status.is_server_error() {
            error!("Creating API error response for error: {:?}", self);
        } else {
            debug!("Creating API error response for error: {:?}", self);
        }

        let body = Json(json!({
            "error": {
                "message": message,
                "code": code,
                "status": status.as_u16()
            }
        }));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod test {
    use tg_auth::identity::Identity;

    use super::*;

    #[test]
    fn rejections_map_to_unauthorized() {
        for rejection in [
            GateRejection::Token(VerificationError::BadSignature),
            GateRejection::UnknownAccount,
            GateRejection::AccountDisabled,
        ] {
            let (status, _, _) = Error::from(rejection).parts();
            assert_eq!(status, StatusCode::UNAUTHORIZED);
        }
        let (status, _, _) = Error::from(GateRejection::AccountLookup).parts();
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn token_codes_are_passed_through() {
        let (_, code, message) = Error::Token(VerificationError::Expired).parts();
        assert_eq!(code, "token_expired");
        assert_eq!(message, "Authentication token expired");

        let (_, code, _) = Error::Token(VerificationError::MissingSubject).parts();
        assert_eq!(code, "missing_subject");
    }

    #[test]
    fn duplicate_identity_is_a_conflict() {
        let err = Error::Models(tg_models::error::Error::DuplicateIdentity(
            Identity::new("a@b.c").unwrap(),
        ));
        assert_eq!(err.parts().0, StatusCode::CONFLICT);
        assert_eq!(Error::IdentityTaken.parts().0, StatusCode::CONFLICT);
    }

    #[test]
    fn missing_role_is_forbidden() {
        assert_eq!(
            Error::ApiForbidden.parts(),
            (StatusCode::FORBIDDEN, "forbidden", String::from("Access forbidden"))
        );
    }
}
