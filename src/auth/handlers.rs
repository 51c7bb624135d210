use anyhow::Context;
use axum::{
    extract::{FromRef, State},
    http::{header::SET_COOKIE, HeaderMap, StatusCode},
    routing::{get, post, put},
    Json, Router,
};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::{
    auth::{
        cookie,
        dto::{LoginRequest, MessageResponse, PublicUser, SignupRequest, UpdateProfileRequest},
        extractors::AuthUser,
        jwt::JwtKeys,
        password,
        repo::{self, User},
    },
    error::ApiError,
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/signup", post(signup))
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout))
        .route("/auth/update-profile", put(update_profile))
        .route("/auth/check-auth", get(check_auth))
}

/// Issue a session token for `user_id` and wrap it in a `Set-Cookie` header.
fn session_headers(state: &AppState, user_id: Uuid) -> Result<HeaderMap, ApiError> {
    let keys = JwtKeys::from_ref(state);
    let token = keys.sign(user_id).context("sign session token")?;
    let cookie = cookie::session_cookie(
        &token,
        state.config.jwt.ttl_seconds(),
        state.config.environment.is_production(),
    )
    .context("build session cookie")?;

    let mut headers = HeaderMap::new();
    headers.insert(SET_COOKIE, cookie);
    Ok(headers)
}

#[instrument(skip(state, payload))]
pub async fn signup(
    State(state): State<AppState>,
    Json(payload): Json<SignupRequest>,
) -> Result<(StatusCode, HeaderMap, Json<PublicUser>), ApiError> {
    let full_name = payload.full_name.trim().to_string();
    let email = payload.email.trim().to_lowercase();

    if full_name.is_empty() || email.is_empty() || payload.password.is_empty() {
        return Err(ApiError::BadRequest("All fields are required"));
    }
    // Counted in characters, not bytes, so multibyte passwords are not
    // over-credited.
    if payload.password.chars().count() < 6 {
        return Err(ApiError::BadRequest(
            "Password must be at least 6 characters",
        ));
    }

    if User::find_by_email(&state.db, &email).await?.is_some() {
        warn!(email = %email, "signup with existing email");
        return Err(ApiError::BadRequest("Email already exists"));
    }

    // Hashing is deliberately slow; keep it off the runtime workers.
    let hash = tokio::task::spawn_blocking(move || password::hash_password(&payload.password))
        .await
        .context("password hashing task")??;

    let user = match User::create(&state.db, &full_name, &email, &hash).await {
        Ok(user) => user,
        // Lost the race against a concurrent signup for the same email; the
        // unique index, not the lookup above, is what makes this safe.
        Err(err) if repo::is_unique_violation(&err) => {
            warn!(email = %email, "signup race on existing email");
            return Err(ApiError::BadRequest("Email already exists"));
        }
        Err(err) => return Err(err.into()),
    };

    let headers = session_headers(&state, user.id)?;
    info!(user_id = %user.id, email = %user.email, "user signed up");
    Ok((StatusCode::CREATED, headers, Json(user.into())))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<(HeaderMap, Json<PublicUser>), ApiError> {
    let email = payload.email.trim().to_lowercase();

    let Some(user) = User::find_by_email(&state.db, &email).await? else {
        warn!(email = %email, "login with unknown email");
        return Err(ApiError::InvalidCredentials);
    };

    let hash = user.password_hash.clone();
    let ok = tokio::task::spawn_blocking(move || password::verify_password(&payload.password, &hash))
        .await
        .context("password verify task")??;
    if !ok {
        warn!(user_id = %user.id, "login with wrong password");
        return Err(ApiError::InvalidCredentials);
    }

    let headers = session_headers(&state, user.id)?;
    info!(user_id = %user.id, "user logged in");
    Ok((headers, Json(user.into())))
}

#[instrument(skip(state))]
pub async fn logout(
    State(state): State<AppState>,
) -> Result<(HeaderMap, Json<MessageResponse>), ApiError> {
    let cookie = cookie::clear_session_cookie(state.config.environment.is_production())
        .context("build logout cookie")?;

    let mut headers = HeaderMap::new();
    headers.insert(SET_COOKIE, cookie);
    Ok((
        headers,
        Json(MessageResponse {
            message: "Logged out successfully",
        }),
    ))
}

#[instrument(skip(state, payload))]
pub async fn update_profile(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<UpdateProfileRequest>,
) -> Result<Json<PublicUser>, ApiError> {
    if payload.profile_pic.trim().is_empty() {
        return Err(ApiError::BadRequest("Profile pic is required"));
    }

    let url = state
        .images
        .upload(&payload.profile_pic)
        .await
        .context("upload profile picture")?;

    let user = User::set_profile_pic(&state.db, user_id, &url)
        .await?
        .ok_or(ApiError::Unauthorized("User not found"))?;

    info!(user_id = %user.id, "profile picture updated");
    Ok(Json(user.into()))
}

#[instrument(skip(state))]
pub async fn check_auth(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<PublicUser>, ApiError> {
    let user = User::find_by_id(&state.db, user_id)
        .await?
        .ok_or(ApiError::Unauthorized("User not found"))?;
    Ok(Json(user.into()))
}
