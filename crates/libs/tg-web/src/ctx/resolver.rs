//! Authentication gate: resolves the request context from the bearer token.

use std::{convert::Infallible, sync::Arc};

use axum::{
    extract::{FromRequestParts, OptionalFromRequestParts, Request, State},
    http::{HeaderMap, request::Parts},
    middleware::Next,
    response::Response,
};
use tg_auth::{
    AUTH_HEADER, AUTH_HEADER_PREFIX, clock::Clock, error::VerificationError,
    verifier::TokenVerifier,
};
use tg_models::account::store::AccountStore;
use tracing::{debug, error, warn};

use crate::{
    ctx::{GateOutcome, GateRejection, Principal},
    prelude::*,
};

/// Returns the token carried by an `Authorization: Bearer <token>` header.
///
/// The scheme match is exact and case-sensitive. Anything else, including
/// an empty token, yields `None`.
///
/// # Examples
///
/// ```rust
/// use axum::http::{HeaderMap, HeaderValue};
/// use tg_web::ctx::resolver::extract_bearer;
///
/// let mut headers = HeaderMap::new();
/// headers.insert("Authorization", HeaderValue::from_static("Bearer abc.def.ghi"));
/// assert_eq!(extract_bearer(&headers), Some("abc.def.ghi"));
///
/// headers.insert("Authorization", HeaderValue::from_static("bearer abc"));
/// assert_eq!(extract_bearer(&headers), None);
/// ```
pub fn extract_bearer(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTH_HEADER)
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.strip_prefix(AUTH_HEADER_PREFIX))
        .filter(|token| !token.is_empty())
}

/// Turns request headers into a [`GateOutcome`].
///
/// Verification failures never abort the request: they are logged and
/// recorded, and the route guards decide what to do with them.
#[derive(Clone)]
pub struct AuthGate {
    verifier: TokenVerifier,
    accounts: Arc<dyn AccountStore>,
    clock: Arc<dyn Clock>,
}

impl AuthGate {
    pub fn new(
        verifier: TokenVerifier,
        accounts: Arc<dyn AccountStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            verifier,
            accounts,
            clock,
        }
    }

    pub async fn evaluate(&self, headers: &HeaderMap) -> GateOutcome {
        let Some(token) = extract_bearer(headers) else {
            return GateOutcome::NoToken;
        };

        let identity = match self.verifier.verify(token, self.clock.now()) {
            Ok(identity) => identity,
            Err(VerificationError::Expired) => {
                debug!("Bearer token expired");
                return GateOutcome::Rejected(GateRejection::Token(VerificationError::Expired));
            }
            Err(err) => {
                warn!("Bearer token rejected: {err}");
                return GateOutcome::Rejected(GateRejection::Token(err));
            }
        };

        match self.accounts.load_roles(&identity).await {
            Ok(roles) => {
                debug!("Authenticated {identity}");
                GateOutcome::Authenticated(Principal::new(identity, roles))
            }
            Err(tg_models::error::Error::NotFound(_)) => {
                warn!("Valid token for unknown account {identity}");
                GateOutcome::Rejected(GateRejection::UnknownAccount)
            }
            Err(tg_models::error::Error::Disabled(_)) => {
                warn!("Valid token for disabled account {identity}");
                GateOutcome::Rejected(GateRejection::AccountDisabled)
            }
            Err(err) => {
                error!("Failed to load roles for {identity}: {err}");
                GateOutcome::Rejected(GateRejection::AccountLookup)
            }
        }
    }
}

/// Middleware running the [`AuthGate`] on every request.
///
/// The outcome is inserted into the request extensions, where the
/// [`Principal`] extractors and the route guards pick it up.
///
/// # Examples
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use axum::Router;
/// use tg_web::ctx::resolver::{AuthGate, mw_ctx_resolver};
///
/// fn app(gate: Arc<AuthGate>) -> Router<()> {
///     Router::new().layer(axum::middleware::from_fn_with_state(gate, mw_ctx_resolver))
/// }
/// ```
pub async fn mw_ctx_resolver(
    State(gate): State<Arc<AuthGate>>,
    mut req: Request,
    next: Next,
) -> Response {
    let outcome = gate.evaluate(req.headers()).await;
    req.extensions_mut().insert(outcome);

    next.run(req).await
}

impl<S: Send + Sync> FromRequestParts<S> for Principal {
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self> {
        match parts
            .extensions
            .get::<GateOutcome>()
            .ok_or(Error::CtxMissing)?
        {
            GateOutcome::Authenticated(principal) => Ok(principal.clone()),
            GateOutcome::NoToken => Err(Error::MissingCredentials),
            GateOutcome::Rejected(rejection) => Err(Error::from(*rejection)),
        }
    }
}

impl<S: Send + Sync> OptionalFromRequestParts<S> for Principal {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> std::result::Result<Option<Self>, Self::Rejection> {
        Ok(parts
            .extensions
            .get::<GateOutcome>()
            .and_then(GateOutcome::principal)
            .cloned())
    }
}
