//! Identity resolution for tweet routes

use axum::{extract::FromRequestParts, http::request::Parts};
use axum_extra::extract::CookieJar;
use std::sync::Arc;

use crate::AppState;
use crate::domain::users::User;
use crate::error::AppError;
use crate::services::{cookies, error::LogErr, session};

/// Extractor that resolves the caller from the access_token cookie.
///
/// Never rejects for a missing or bad token: that is `CurrentUser(None)`,
/// and each operation decides whether an identity is required.
pub struct CurrentUser(pub Option<User>);

impl FromRequestParts<Arc<AppState>> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);

        let Some(access_token) = jar.get(cookies::config::ACCESS_TOKEN_NAME) else {
            return Ok(CurrentUser(None));
        };

        let user_id = match session::validate_access_token(access_token.value(), &state.jwt_secret) {
            Ok(user_id) => user_id,
            Err(e) => {
                tracing::debug!(error = %e, "Ignoring access token");
                return Ok(CurrentUser(None));
            }
        };

        // A valid token for a deleted user is no identity
        let user = state
            .store
            .find_user(user_id)
            .await
            .log_err("Load current user error")?;

        Ok(CurrentUser(user))
    }
}
