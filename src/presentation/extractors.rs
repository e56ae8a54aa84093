use crate::domain::accounts::Account;
use crate::domain::auth::Claims;
use crate::infrastructure::state::AppState;
use crate::shared::error::AppError;
use axum::{
    extract::{FromRequestParts, Path},
    http::request::Parts,
};

/// Authenticated caller extractor
/// Validates the bearer token from the Authorization header
pub struct AuthUser {
    pub claims: Claims,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("Authorization")
            .and_then(|h| h.to_str().ok())
            .ok_or_else(|| AppError::Unauthorized("Missing Authorization header".to_string()))?;

        let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            AppError::Unauthorized("Invalid Authorization header format".to_string())
        })?;

        let claims = state
            .auth_service
            .validate_token(token)
            .map_err(|_| AppError::Unauthorized("Invalid or expired token".to_string()))?;

        if claims.token_type != "access" {
            return Err(AppError::Unauthorized("Invalid token type".to_string()));
        }

        Ok(AuthUser { claims })
    }
}

/// Authorization context for destructive faculty operations.
///
/// The token only names the account; the role is read from the account
/// store, so a client cannot assert administrator rights on its own.
pub struct AdminContext {
    pub account: Account,
}

impl FromRequestParts<AppState> for AdminContext {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let AuthUser { claims } = AuthUser::from_request_parts(parts, state).await?;
        let account_id = claims
            .account_id()
            .map_err(|e| AppError::Unauthorized(e.to_string()))?;

        let account = state
            .accounts
            .find_by_id(account_id)
            .await?
            .ok_or_else(|| AppError::Unauthorized("Unknown account".to_string()))?;

        if !account.is_administrator() {
            tracing::warn!(
                account_id = %account.id,
                role = %account.role,
                "non-administrator attempted a faculty operation"
            );
            return Err(AppError::Forbidden("Administrator role required".to_string()));
        }

        Ok(AdminContext { account })
    }
}

/// Faculty name from the `{faculty_id}` path segment, percent-decoded.
/// Segments that do not decode to UTF-8 are rejected with the JSON error body.
pub struct FacultyPath(pub String);

impl<S> FromRequestParts<S> for FacultyPath
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(faculty_id) = Path::<String>::from_request_parts(parts, state).await?;
        Ok(FacultyPath(faculty_id))
    }
}
