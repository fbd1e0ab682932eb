// rest/auth.rs — Bearer token extraction and role guards.
//
// Header: Authorization: Bearer <token>
// `AuthUser` rejects with 401 on a missing/invalid token or a deleted
// account; `Seller`/`Buyer` additionally reject with 403 on the wrong role.

use axum::{extract::FromRequestParts, http::header, http::request::Parts};
use std::sync::Arc;

use crate::auth::token;
use crate::error::ApiError;
use crate::users::{Role, UserRow};
use crate::AppContext;

/// The authenticated caller, loaded fresh from storage so revoked accounts
/// lose access immediately.
pub struct AuthUser(pub UserRow);

impl FromRequestParts<Arc<AppContext>> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        ctx: &Arc<AppContext>,
    ) -> Result<Self, Self::Rejection> {
        let bearer = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .ok_or_else(|| ApiError::unauthorized("Not authorized, no token"))?;

        let claims = token::verify(&ctx.token_secret, bearer)
            .map_err(|_| ApiError::unauthorized("Not authorized, token failed"))?;

        let user = ctx
            .storage
            .get_user(&claims.sub)
            .await?
            .ok_or_else(|| ApiError::unauthorized("Not authorized, user not found"))?;

        Ok(AuthUser(user))
    }
}

/// Authenticated caller who must hold the seller role.
pub struct Seller(pub UserRow);

impl FromRequestParts<Arc<AppContext>> for Seller {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        ctx: &Arc<AppContext>,
    ) -> Result<Self, Self::Rejection> {
        let AuthUser(user) = AuthUser::from_request_parts(parts, ctx).await?;
        if user.role != Role::Seller {
            return Err(ApiError::forbidden("Not authorized as a seller"));
        }
        Ok(Seller(user))
    }
}

/// Authenticated caller who must hold the buyer role.
pub struct Buyer(pub UserRow);

impl FromRequestParts<Arc<AppContext>> for Buyer {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        ctx: &Arc<AppContext>,
    ) -> Result<Self, Self::Rejection> {
        let AuthUser(user) = AuthUser::from_request_parts(parts, ctx).await?;
        if user.role != Role::Buyer {
            return Err(ApiError::forbidden("Not authorized as a buyer"));
        }
        Ok(Buyer(user))
    }
}
