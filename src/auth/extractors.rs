use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use tracing::warn;
use uuid::Uuid;

use super::claims::TokenKind;
use super::jwt::JwtKeys;
use super::repo_types::Role;
use crate::error::ApiError;

/// Caller identity read from a valid access token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthUser {
    pub id: Uuid,
    pub role: Role,
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    JwtKeys: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let keys = JwtKeys::from_ref(state);
        let auth = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .ok_or_else(|| ApiError::Unauthorized("Missing Authorization header".into()))?;

        // Expect "Bearer <token>"
        let token = auth
            .strip_prefix("Bearer ")
            .or_else(|| auth.strip_prefix("bearer "))
            .ok_or_else(|| ApiError::Unauthorized("Invalid Authorization header".into()))?;

        let claims = keys.verify(token).map_err(|_| {
            warn!("invalid or expired token");
            ApiError::Unauthorized("Invalid or expired token".into())
        })?;

        if claims.kind != TokenKind::Access {
            return Err(ApiError::Unauthorized("Access token required".into()));
        }

        Ok(AuthUser {
            id: claims.sub,
            role: claims.role,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::AppState;
    use axum::http::{header::AUTHORIZATION, Request};

    async fn extract(header: Option<String>) -> Result<AuthUser, ApiError> {
        let state = AppState::fake();
        let mut req = Request::builder().uri("/");
        if let Some(h) = header {
            req = req.header(AUTHORIZATION, h);
        }
        let (mut parts, _) = req.body(()).unwrap().into_parts();
        AuthUser::from_request_parts(&mut parts, &state).await
    }

    #[tokio::test]
    async fn accepts_access_token() {
        let keys = JwtKeys::from_ref(&AppState::fake());
        let id = Uuid::new_v4();
        let token = keys.sign_access(id, Role::Admin).unwrap();

        let user = extract(Some(format!("Bearer {token}"))).await.unwrap();
        assert_eq!(user, AuthUser { id, role: Role::Admin });
    }

    #[tokio::test]
    async fn rejects_missing_header() {
        let err = extract(None).await.unwrap_err();
        assert!(matches!(err, ApiError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn rejects_refresh_token() {
        let keys = JwtKeys::from_ref(&AppState::fake());
        let token = keys.sign_refresh(Uuid::new_v4(), Role::Blogger).unwrap();

        let err = extract(Some(format!("Bearer {token}"))).await.unwrap_err();
        assert_eq!(err.to_string(), "Access token required");
    }

    #[tokio::test]
    async fn rejects_other_schemes() {
        let err = extract(Some("Basic dXNlcjpwYXNz".into())).await.unwrap_err();
        assert!(matches!(err, ApiError::Unauthorized(_)));
    }
}
