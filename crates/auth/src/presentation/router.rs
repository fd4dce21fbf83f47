//! Auth Router

use axum::{
    Router, middleware,
    routing::{get, post},
};
use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::domain::repository::{AccountRepository, DeviceRepository};
use crate::infra::postgres::PgAuthRepository;
use crate::presentation::handlers::{self, AuthAppState};
use crate::presentation::middleware::{AuthorizeState, authorize, track_request};

/// Create the Auth router with PostgreSQL repository
pub fn auth_router(repo: PgAuthRepository, config: AuthConfig) -> Router {
    auth_router_generic(repo, config)
}

/// Create a generic Auth router for any repository implementation
pub fn auth_router_generic<R>(repo: R, config: AuthConfig) -> Router
where
    R: AccountRepository + DeviceRepository + Clone + Send + Sync + 'static,
{
    let config = Arc::new(config);

    let state = AuthAppState {
        repo: Arc::new(repo),
        config: config.clone(),
    };

    let gate = AuthorizeState { config };

    Router::new()
        .route("/register", post(handlers::register::<R>))
        .route("/login", post(handlers::login::<R>))
        .route("/refresh", post(handlers::refresh_token::<R>))
        .route("/check", get(handlers::check_token))
        .layer(middleware::from_fn_with_state(gate, authorize))
        .layer(middleware::from_fn(track_request))
        .with_state(state)
}
