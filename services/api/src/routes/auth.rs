//! Authentication endpoints
//!
//! Login takes a form-encoded body. Refresh and logout take the refresh token
//! as JSON and need no access token, so a client holding an expired access
//! token can still recover or sign out.

use axum::{
    Extension, Form, Json, Router,
    extract::State,
    middleware,
    response::IntoResponse,
    routing::{get, post},
};
use common::{
    models::{LoginForm, PasswordChange, RefreshTokenRequest, TokenResponse, User},
    validation::check,
};
use tracing::{info, warn};

use crate::{
    error::{ApiError, ApiResult},
    middleware::{AuthUser, auth_middleware},
    repositories::users::verify_password,
    response::{message, ok},
    state::AppState,
};

pub fn router(state: AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/api/auth/me", get(me))
        .route("/api/auth/change-password", post(change_password))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware));

    Router::new()
        .route("/api/auth/login", post(login))
        .route("/api/auth/refresh", post(refresh))
        .route("/api/auth/logout", post(logout))
        .merge(protected)
}

async fn issue_tokens(state: &AppState, user: User) -> ApiResult<TokenResponse> {
    let access_token = state.jwt.generate_access_token(&user)?;
    let refresh_token = state.sessions.create_session(user.id).await?;

    Ok(TokenResponse {
        access_token,
        refresh_token,
        token_type: "bearer".to_string(),
        user: Some(user),
    })
}

async fn login(
    State(state): State<AppState>,
    Form(form): Form<LoginForm>,
) -> ApiResult<impl IntoResponse> {
    let key = format!("login:{}", form.username.to_lowercase());
    if !state.rate_limiter.is_allowed(&key).await {
        warn!("Login rate limit hit for {}", form.username);
        return Err(ApiError::TooManyRequests(
            "Too many failed login attempts. Try again later.".to_string(),
        ));
    }

    let credentials = state.users.find_credentials(&form.username).await?;
    let user = match credentials {
        Some(c) if verify_password(&c.password_hash, &form.password)? => c.user,
        _ => {
            state.rate_limiter.record_failure(&key).await;
            info!("Failed login for {}", form.username);
            return Err(ApiError::Unauthorized(
                "Incorrect username or password".to_string(),
            ));
        }
    };

    if !user.is_active {
        return Err(ApiError::BadRequest("Inactive user".to_string()));
    }

    state.rate_limiter.reset(&key).await;
    info!("User {} signed in", user.username);

    let token = issue_tokens(&state, user).await?;
    Ok(ok(token, "Authentication successful."))
}

/// Exchange a refresh token for a new pair; the old refresh token is spent
async fn refresh(
    State(state): State<AppState>,
    Json(request): Json<RefreshTokenRequest>,
) -> ApiResult<impl IntoResponse> {
    let invalid = || ApiError::Unauthorized("Invalid refresh token".to_string());

    let user_id = state
        .sessions
        .consume(&request.refresh_token)
        .await?
        .ok_or_else(invalid)?;

    let user = state
        .users
        .find_by_id(user_id)
        .await?
        .filter(|user| user.is_active)
        .ok_or_else(invalid)?;

    let token = issue_tokens(&state, user).await?;
    Ok(ok(token, "Access token refreshed."))
}

async fn logout(
    State(state): State<AppState>,
    Json(request): Json<RefreshTokenRequest>,
) -> ApiResult<impl IntoResponse> {
    if !state.sessions.revoke(&request.refresh_token).await? {
        info!("Logout with an unknown refresh token");
    }
    Ok(message("Signed out and refresh token revoked."))
}

async fn me(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> ApiResult<impl IntoResponse> {
    let user = state
        .users
        .find_by_id(user.id)
        .await?
        .ok_or_else(ApiError::unauthorized)?;
    Ok(ok(user, "Authenticated user profile retrieved."))
}

async fn change_password(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(change): Json<PasswordChange>,
) -> ApiResult<impl IntoResponse> {
    check(&change)?;

    let hash = state
        .users
        .password_hash(user.id)
        .await?
        .ok_or_else(ApiError::unauthorized)?;

    if !verify_password(&hash, &change.current_password)? {
        return Err(ApiError::BadRequest("Incorrect current password".to_string()));
    }

    state.users.update_password(user.id, &change.new_password).await?;
    info!("User {} changed their password", user.username);
    Ok(message("Password updated."))
}
