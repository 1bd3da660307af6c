//! Route guards.
//!
//! Both guards read the [`GateOutcome`](crate::ctx::GateOutcome) left by
//! [`mw_ctx_resolver`](crate::ctx::resolver::mw_ctx_resolver), so that
//! middleware must run first.

use crate::prelude::*;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use super::ctx::Principal;

/// Middleware that requires an authenticated principal for a route.
///
/// Requests without a token, or whose token was refused, are answered with
/// 401 and the reason code.
///
/// # Examples
///
/// ```rust,no_run
/// use axum::{Router, routing::get};
/// use tg_web::mw_auth::mw_require_auth;
///
/// let app: Router<()> = Router::new()
///     .route("/protected", get(protected_handler))
///     .route_layer(axum::middleware::from_fn(mw_require_auth));
///
/// async fn protected_handler() -> &'static str {
///     "This requires authentication"
/// }
/// ```
pub async fn mw_require_auth(
    principal: Result<Principal>,
    req: Request,
    next: Next,
) -> Result<Response> {
    principal?;
    Ok(next.run(req).await)
}

/// Middleware that requires a specific role for a route.
///
/// Unauthenticated requests get 401; authenticated ones lacking the role
/// get 403.
///
/// # Examples
///
/// ```rust
/// use axum::{Router, routing::get};
/// use tg_web::mw_auth::mw_require_role;
///
/// let app: Router<()> = Router::new()
///     .route("/admin", get(admin_handler))
///     .route_layer(axum::middleware::from_fn_with_state("ADMIN", mw_require_role));
///
/// async fn admin_handler() -> &'static str {
///     "This requires the admin role"
/// }
/// ```
pub async fn mw_require_role(
    State(role): State<&'static str>,
    principal: Principal,
    req: Request,
    next: Next,
) -> Result<Response> {
    if !principal.has_role(role) {
        tracing::debug!("{} lacks role {role}", principal.identity);
        return Err(Error::ApiForbidden);
    }
    Ok(next.run(req).await)
}

/// Builds a [`mw_require_role`] layer for the given role.
///
/// # Examples
///
/// ```rust
/// use axum::{Router, routing::get};
/// use tg_web::require_role;
///
/// let app: Router<()> = Router::new()
///     .route("/admin", get(admin_handler))
///     .route_layer(require_role!("ADMIN"));
///
/// async fn admin_handler() -> &'static str {
///     "Admin only"
/// }
/// ```
#[macro_export]
macro_rules! require_role {
    ($role:expr) => {{
        use $crate::mw_auth::mw_require_role;
        axum::middleware::from_fn_with_state($role, mw_require_role)
    }};
}
