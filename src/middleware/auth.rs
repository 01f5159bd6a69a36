//! Authentication extractors
//!
//! `AuthUser` resolves the bearer token to a signed-in caller (401 otherwise).
//! `AdminUser` additionally requires admin membership (403 otherwise).

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::http::HeaderMap;
use tracing::debug;

use crate::services::AuthContext;
use crate::state::AppState;
use crate::utils::errors::{BakeshopError, Result};

/// Extract the token from `Authorization: Bearer <token>`
pub fn bearer_token(headers: &HeaderMap) -> Result<&str> {
    let value = headers
        .get(AUTHORIZATION)
        .ok_or_else(|| BakeshopError::Authentication("Missing Authorization header".to_string()))?
        .to_str()
        .map_err(|_| BakeshopError::Authentication("Malformed Authorization header".to_string()))?;

    let token = value
        .strip_prefix("Bearer ")
        .or_else(|| value.strip_prefix("bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| BakeshopError::Authentication("Expected a bearer token".to_string()))?;

    Ok(token)
}

/// A signed-in caller
#[derive(Debug, Clone)]
pub struct AuthUser(pub AuthContext);

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = BakeshopError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self> {
        let token = bearer_token(&parts.headers)?;
        let context = state.services.auth_service.authenticate(token).await?;
        Ok(AuthUser(context))
    }
}

/// A signed-in caller with admin membership
#[derive(Debug, Clone)]
pub struct AdminUser(pub AuthContext);

impl AdminUser {
    pub fn id(&self) -> i64 {
        self.0.user_id()
    }
}

#[async_trait]
impl FromRequestParts<AppState> for AdminUser {
    type Rejection = BakeshopError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self> {
        let AuthUser(context) = AuthUser::from_request_parts(parts, state).await?;
        context.require_admin()?;
        debug!(user_id = context.user_id(), path = %parts.uri.path(), "Admin request");
        Ok(AdminUser(context))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use axum::http::HeaderValue;

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_bearer_token() {
        assert_eq!(bearer_token(&headers("Bearer abc.def.ghi")).unwrap(), "abc.def.ghi");
        assert_eq!(bearer_token(&headers("bearer  abc ")).unwrap(), "abc");
    }

    #[test]
    fn test_missing_or_malformed_header() {
        assert_matches!(bearer_token(&HeaderMap::new()), Err(BakeshopError::Authentication(_)));
        assert_matches!(bearer_token(&headers("Basic dXNlcjpwYXNz")), Err(BakeshopError::Authentication(_)));
        assert_matches!(bearer_token(&headers("Bearer ")), Err(BakeshopError::Authentication(_)));
    }
}
