//! Authentication middleware for JWT token validation

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::Response,
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};
use tracing::{debug, warn};

use crate::{
    error::{ApiError, ApiResult},
    state::AppState,
};

/// Authenticated user information
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: i64,
    pub username: String,
    pub is_admin: bool,
}

/// Resolve the bearer token to an active user and store it in the request
pub async fn auth_middleware(
    State(state): State<AppState>,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
    mut req: Request<Body>,
    next: Next,
) -> ApiResult<Response> {
    let TypedHeader(Authorization(bearer)) = bearer.ok_or_else(ApiError::unauthorized)?;

    let claims = state.jwt.validate_token(bearer.token()).map_err(|e| {
        debug!("Rejected access token: {}", e);
        ApiError::unauthorized()
    })?;

    let user = state
        .users
        .find_by_id(claims.uid)
        .await?
        .filter(|user| user.username == claims.sub)
        .ok_or_else(ApiError::unauthorized)?;

    if !user.is_active {
        warn!("Inactive user {} presented a valid token", user.username);
        return Err(ApiError::BadRequest("Inactive user".to_string()));
    }

    req.extensions_mut().insert(AuthUser {
        id: user.id,
        username: user.username,
        is_admin: user.is_admin,
    });

    Ok(next.run(req).await)
}

/// Reject non-admin users; must run inside [`auth_middleware`]
pub async fn admin_middleware(req: Request<Body>, next: Next) -> ApiResult<Response> {
    let user = req
        .extensions()
        .get::<AuthUser>()
        .ok_or_else(ApiError::unauthorized)?;

    if !user.is_admin {
        return Err(ApiError::Forbidden("Not enough permissions".to_string()));
    }

    Ok(next.run(req).await)
}
