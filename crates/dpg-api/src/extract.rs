use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use dpg_types::Address;

use crate::error::ApiError;

/// Header carrying the caller's address
pub const CALLER_HEADER: &str = "x-caller";

/// Address of the account making the request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caller(pub Address);

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for Caller {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let raw = parts
            .headers
            .get(CALLER_HEADER)
            .ok_or_else(|| ApiError::Caller(format!("{} header is required", CALLER_HEADER)))?
            .to_str()
            .map_err(|e| ApiError::Caller(e.to_string()))?;

        raw.trim()
            .parse()
            .map(Caller)
            .map_err(|e| ApiError::Caller(format!("{}: {}", CALLER_HEADER, e)))
    }
}
