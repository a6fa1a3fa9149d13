use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use uuid::Uuid;

use crate::error::AppError;

pub const USER_ID_HEADER: &str = "x-user-id";

#[derive(Debug, Clone, Copy)]
pub struct Principal(pub Uuid);

#[axum::async_trait]
impl<S> FromRequestParts<S> for Principal
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let raw = parts
            .headers
            .get(USER_ID_HEADER)
            .ok_or_else(|| {
                AppError::Unauthenticated(format!("missing {USER_ID_HEADER} header"))
            })?
            .to_str()
            .map_err(|_| {
                AppError::Unauthenticated(format!("{USER_ID_HEADER} header is not valid text"))
            })?;

        let user_id = raw.parse::<Uuid>().map_err(|_| {
            AppError::Unauthenticated(format!("{USER_ID_HEADER} is not a valid uuid"))
        })?;

        Ok(Principal(user_id))
    }
}
