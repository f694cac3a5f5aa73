//! Authentication service routes

use axum::{
    Json, Router,
    extract::State,
    http::{HeaderValue, StatusCode, header},
    response::IntoResponse,
    routing::{get, post},
};
use axum_extra::extract::cookie::SignedCookieJar;
use tower_http::{set_header::SetResponseHeaderLayer, trace::TraceLayer};
use tracing::{error, info, warn};

use crate::{
    AppState,
    error::{AuthError, AuthResult},
    extract::FormFields,
    models::{LoginCredentials, RegistrationForm, SessionData},
};

/// Create the router for the authentication service
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/registration", post(register).fallback(method_not_allowed))
        .route("/login", post(login).fallback(method_not_allowed))
        .route("/logout", post(logout).fallback(method_not_allowed))
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static("*"),
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "auth-service"
    }))
}

async fn method_not_allowed() -> AuthError {
    AuthError::MethodNotAllowed
}

/// User registration endpoint
pub async fn register(
    State(state): State<AppState>,
    FormFields(mut form): FormFields<RegistrationForm>,
) -> AuthResult<impl IntoResponse> {
    info!("Registration request for phone number: {}", form.phone_number);

    let password_hash = state
        .passwords
        .hash(std::mem::take(&mut form.password))
        .await
        .map_err(|e| {
            error!("Failed to hash password: {}", e);
            AuthError::InternalServerError
        })?;

    let user = form.into_user(password_hash);
    state.users.insert(&user).await.map_err(|e| {
        error!("Failed to insert user: {}", e);
        AuthError::InternalServerError
    })?;

    Ok((StatusCode::CREATED, "Registration successful"))
}

/// User login endpoint
pub async fn login(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    FormFields(credentials): FormFields<LoginCredentials>,
) -> AuthResult<impl IntoResponse> {
    info!("Login attempt for phone number: {}", credentials.phone_number);

    let user = state
        .users
        .find_by_phone_number(&credentials.phone_number)
        .await
        .map_err(|e| {
            error!("Failed to find user: {}", e);
            AuthError::InternalServerError
        })?;

    let Some(user) = user else {
        state
            .passwords
            .verify_decoy(credentials.password)
            .await
            .map_err(|e| {
                error!("Failed to verify password: {}", e);
                AuthError::InternalServerError
            })?;
        warn!("Login failed: no user with phone number {}", credentials.phone_number);
        return Err(AuthError::Unauthorized);
    };

    let matches = state
        .passwords
        .verify(user.password_hash, credentials.password)
        .await
        .map_err(|e| {
            error!("Failed to verify password: {}", e);
            AuthError::InternalServerError
        })?;

    if !matches {
        warn!("Login failed: wrong password for {}", credentials.phone_number);
        return Err(AuthError::Unauthorized);
    }

    let session = SessionData {
        username: user.name,
    };
    let jar = state.sessions.establish(jar, &session).await.map_err(|e| {
        error!("Failed to save session: {}", e);
        AuthError::InternalServerError
    })?;

    Ok((StatusCode::OK, jar, "Successfully logged in"))
}

/// Logout endpoint
pub async fn logout(
    State(state): State<AppState>,
    jar: SignedCookieJar,
) -> AuthResult<impl IntoResponse> {
    info!("Logout request");

    let jar = state.sessions.destroy(jar).await.map_err(|e| {
        error!("Failed to remove session: {}", e);
        AuthError::InternalServerError
    })?;

    Ok((StatusCode::OK, jar, "Successfully logged out"))
}
