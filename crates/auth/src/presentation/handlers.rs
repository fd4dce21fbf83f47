//! HTTP Handlers

use axum::Json;
use axum::extract::State;
use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::{
    LoginInput, LoginUseCase, RefreshTokenInput, RefreshTokenUseCase, RegisterInput,
    RegisterUseCase,
};
use crate::domain::repository::{AccountRepository, DeviceRepository};
use crate::error::AuthResult;
use crate::presentation::dto::{
    CheckTokenResponse, LoginRequest, LoginResponse, RefreshTokenRequest, RefreshTokenResponse,
    RegisterRequest, RegisterResponse,
};

/// Shared state for auth handlers
#[derive(Clone)]
pub struct AuthAppState<R>
where
    R: AccountRepository + DeviceRepository + Clone + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub config: Arc<AuthConfig>,
}

// ============================================================================
// Register
// ============================================================================

/// POST /api/auth/register
pub async fn register<R>(
    State(state): State<AuthAppState<R>>,
    Json(req): Json<RegisterRequest>,
) -> AuthResult<Json<RegisterResponse>>
where
    R: AccountRepository + DeviceRepository + Clone + Send + Sync + 'static,
{
    let use_case = RegisterUseCase::new(state.repo.clone(), state.config.clone());

    let input = RegisterInput {
        email: req.email,
        password: req.password,
    };

    let output = use_case.execute(input).await?;

    Ok(Json(RegisterResponse {
        account_id: output.account_id,
    }))
}

// ============================================================================
// Login
// ============================================================================

/// POST /api/auth/login
pub async fn login<R>(
    State(state): State<AuthAppState<R>>,
    Json(req): Json<LoginRequest>,
) -> AuthResult<Json<LoginResponse>>
where
    R: AccountRepository + DeviceRepository + Clone + Send + Sync + 'static,
{
    let use_case = LoginUseCase::new(state.repo.clone(), state.repo.clone(), state.config.clone());

    let input = LoginInput {
        email: req.email,
        password: req.password,
        device_address: req.device_address,
    };

    let output = use_case.execute(input).await?;

    Ok(Json(LoginResponse {
        token: output.token,
    }))
}

// ============================================================================
// Refresh Token
// ============================================================================

/// POST /api/auth/refresh
pub async fn refresh_token<R>(
    State(state): State<AuthAppState<R>>,
    Json(req): Json<RefreshTokenRequest>,
) -> AuthResult<Json<RefreshTokenResponse>>
where
    R: AccountRepository + DeviceRepository + Clone + Send + Sync + 'static,
{
    let use_case = RefreshTokenUseCase::new(state.repo.clone(), state.config.clone());

    let input = RefreshTokenInput {
        device_address: req.device_address,
        access_token: req.access_token,
    };

    let output = use_case.execute(input).await?;

    Ok(Json(RefreshTokenResponse {
        token: output.token,
    }))
}

// ============================================================================
// Check Token
// ============================================================================

/// GET /api/auth/check
///
/// Protected no-op: the authorize middleware has already validated the
/// bearer token by the time this handler runs.
pub async fn check_token() -> Json<CheckTokenResponse> {
    Json(CheckTokenResponse {
        message: "OK".to_string(),
    })
}
