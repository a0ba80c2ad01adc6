use anyhow::Context;
use axum::extract::FromRef;
use lazy_static::lazy_static;
use regex::Regex;
use tracing::{info, warn};
use uuid::Uuid;

use super::dto::{AuthResponse, LoginRequest, PublicUser, SignupRequest};
use super::jwt::JwtKeys;
use super::password::{hash_password, verify_password};
use super::repo_types::{EmailTaken, NewUser, Role, User};
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

pub const MIN_PASSWORD_LEN: usize = 6;

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

pub async fn signup(state: &AppState, req: SignupRequest) -> ApiResult<PublicUser> {
    let name = req.name.trim().to_string();
    let email = req.email.trim().to_lowercase();

    if name.is_empty() || email.is_empty() || req.password.is_empty() {
        return Err(ApiError::validation("Name, email and password are required"));
    }
    if !is_valid_email(&email) {
        warn!(%email, "invalid email");
        return Err(ApiError::validation("Invalid email"));
    }
    if req.password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ApiError::validation(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    let role = match req.role.as_deref().map(str::trim).filter(|r| !r.is_empty()) {
        None => Role::Blogger,
        Some(r) => r
            .parse::<Role>()
            .map_err(|_| ApiError::validation("Role must be either admin or blogger"))?,
    };

    if state.users.find_by_email(&email).await?.is_some() {
        warn!(%email, "email already registered");
        return Err(ApiError::Conflict("Email already registered".into()));
    }

    let cost = state.config.password_hash_cost;
    let password = req.password;
    let password_hash = tokio::task::spawn_blocking(move || hash_password(&password, cost))
        .await
        .context("password hashing task")??;

    let user = state
        .users
        .create(NewUser {
            name,
            email,
            password_hash,
            role,
        })
        .await
        .map_err(|e| {
            if e.is::<EmailTaken>() {
                ApiError::Conflict("Email already registered".into())
            } else {
                ApiError::Internal(e)
            }
        })?;

    info!(user_id = %user.id, email = %user.email, role = %user.role, "user registered");
    Ok(user.into())
}

pub async fn login(state: &AppState, req: LoginRequest) -> ApiResult<AuthResponse> {
    let email = req.email.trim().to_lowercase();
    if email.is_empty() || req.password.is_empty() {
        return Err(ApiError::validation("Email and password are required"));
    }

    let Some(user) = state.users.find_by_email(&email).await? else {
        warn!(%email, "login unknown email");
        return Err(ApiError::Unauthorized("Invalid credentials".into()));
    };

    let password = req.password;
    let hash = user.password_hash.clone();
    let matches = tokio::task::spawn_blocking(move || verify_password(&password, &hash))
        .await
        .context("password verify task")??;
    if !matches {
        warn!(%email, user_id = %user.id, "login invalid password");
        return Err(ApiError::Unauthorized("Invalid credentials".into()));
    }

    info!(user_id = %user.id, "user logged in");
    issue_tokens(&JwtKeys::from_ref(state), user)
}

pub async fn refresh(state: &AppState, refresh_token: &str) -> ApiResult<AuthResponse> {
    let keys = JwtKeys::from_ref(state);
    let claims = keys
        .verify_refresh(refresh_token)
        .map_err(|e| ApiError::Unauthorized(e.to_string()))?;

    // role may have been read from an old token; reissue with the stored one
    let user = state
        .users
        .find_by_id(claims.sub)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("User not found".into()))?;

    issue_tokens(&keys, user)
}

pub async fn me(state: &AppState, user_id: Uuid) -> ApiResult<PublicUser> {
    state
        .users
        .find_by_id(user_id)
        .await?
        .map(PublicUser::from)
        .ok_or_else(|| ApiError::Unauthorized("User not found".into()))
}

fn issue_tokens(keys: &JwtKeys, user: User) -> ApiResult<AuthResponse> {
    let access_token = keys.sign_access(user.id, user.role)?;
    let refresh_token = keys.sign_refresh(user.id, user.role)?;
    Ok(AuthResponse {
        access_token,
        refresh_token,
        user: user.into(),
    })
}
