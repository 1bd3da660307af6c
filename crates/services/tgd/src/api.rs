//! HTTP routes of the tokengate service.

use std::net::SocketAddr;

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    middleware,
    routing::{get, post},
};
use serde_json::{Value, json};
use tg_models::auth::role::Role;
use tg_web::{
    account_api::{
        AuthResponse, EmailCheckResponse, EmailQuery, LoginRequest, SignupRequest, UserResponse,
    },
    ctx::{Principal, resolver::mw_ctx_resolver},
    mw_auth::mw_require_auth,
    prelude::Result as TgWebResult,
    require_role,
};
use tokio::{net::TcpListener, task::JoinHandle};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, TraceLayer},
};

use crate::{prelude::*, state::TgState};

fn v1(path: &str) -> String {
    format!("/v1/{path}")
}

/// Builds the application router.
pub fn app(state: TgState) -> Router {
    let admin_routes = Router::new()
        .route(&v1("admin/ping"), get(admin_ping))
        .route_layer(require_role!(Role::ADMIN))
        .route_layer(middleware::from_fn(mw_require_auth));

    let user_routes = Router::new()
        .route(&v1("me"), get(me))
        .route_layer(middleware::from_fn(mw_require_auth));

    let public_routes = Router::new()
        .route(&v1("auth/signup"), post(signup))
        .route(&v1("auth/login"), post(login))
        .route(&v1("auth/check-email"), get(check_email))
        .route(&v1("auth/health"), get(health));

    Router::new()
        .merge(admin_routes)
        .merge(user_routes)
        .merge(public_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::default().include_headers(false)),
        )
        .layer(CorsLayer::permissive())
        .layer(middleware::from_fn_with_state(
            state.gate.clone(),
            mw_ctx_resolver,
        ))
        .with_state(state)
}

/// Binds `address` and serves the API in a background task.
///
/// Returns the bound address, which differs from `address` when port 0 was
/// requested.
pub async fn setup_api(
    state: TgState,
    address: SocketAddr,
) -> Result<(SocketAddr, JoinHandle<Result<()>>)> {
    let listener = TcpListener::bind(address).await?;
    let local_addr = listener.local_addr()?;
    tracing::info!("listening on {local_addr}");

    let app = app(state);
    let handle = tokio::spawn(async move {
        axum::serve(listener, app).await?;
        Ok(())
    });

    Ok((local_addr, handle))
}

async fn signup(
    State(state): State<TgState>,
    Json(payload): Json<SignupRequest>,
) -> TgWebResult<(StatusCode, Json<AuthResponse>)> {
    let response = state.auth.signup(&payload).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn login(
    State(state): State<TgState>,
    Json(payload): Json<LoginRequest>,
) -> TgWebResult<Json<AuthResponse>> {
    Ok(Json(state.auth.login(&payload).await?))
}

async fn check_email(
    State(state): State<TgState>,
    Query(query): Query<EmailQuery>,
) -> TgWebResult<Json<EmailCheckResponse>> {
    let is_duplicate = state.auth.is_identity_taken(&query.email).await?;
    Ok(Json(EmailCheckResponse::new(query.email, is_duplicate)))
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "OK" }))
}

async fn me(principal: Principal) -> Json<UserResponse> {
    Json(UserResponse::from(&principal))
}

async fn admin_ping(principal: Principal) -> Json<Value> {
    Json(json!({
        "status": "OK",
        "identity": principal.identity.to_string(),
    }))
}
