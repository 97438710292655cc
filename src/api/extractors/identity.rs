use axum::{
    extract::{FromRequestParts, FromRef},
    http::{header::AUTHORIZATION, request::Parts},
};
use crate::state::AppState;
use crate::domain::models::user::User;
use crate::error::AppError;
use std::sync::Arc;
use tower_cookies::Cookies;
use tracing::{debug, Span};

pub const ACCESS_COOKIE: &str = "access_token";

/// The caller, if a valid access token was presented.
///
/// Missing, malformed or expired tokens all resolve to `Identity(None)`; the
/// permission check turns that into a 401 where it matters.
pub struct Identity(pub Option<User>);

impl Identity {
    pub fn user(&self) -> Option<&User> {
        self.0.as_ref()
    }
}

impl<S> FromRequestParts<S> for Identity
where
    S: Send + Sync,
    Arc<AppState>: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = <Arc<AppState> as FromRef<S>>::from_ref(state);

        let Some(token) = access_token(parts) else {
            return Ok(Identity(None));
        };

        let claims = match app_state.auth_service.decode_access_token(&token) {
            Ok(claims) => claims,
            Err(_) => {
                debug!("Ignoring invalid or expired access token");
                return Ok(Identity(None));
            }
        };

        let user = app_state.user_repo.find_by_id(&claims.sub).await?
            .filter(|u| u.is_active);

        if let Some(user) = &user {
            Span::current().record("user_id", user.id.as_str());
        }

        Ok(Identity(user))
    }
}

/// Bearer header first, then the `access_token` cookie.
fn access_token(parts: &Parts) -> Option<String> {
    let bearer = parts.headers.get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty());

    if bearer.is_some() {
        return bearer;
    }

    parts.extensions.get::<Cookies>()
        .and_then(|cookies| cookies.get(ACCESS_COOKIE))
        .map(|cookie| cookie.value().to_string())
}

/// Like [`Identity`] but rejects anonymous callers with 401.
pub struct AuthUser(pub User);

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    Arc<AppState>: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Identity(user) = Identity::from_request_parts(parts, state).await?;
        user.map(AuthUser).ok_or(AppError::Unauthorized)
    }
}
