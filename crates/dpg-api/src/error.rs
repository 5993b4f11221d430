use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use dpg_types::DpgError;
use thiserror::Error;

/// Errors surfaced over HTTP
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Engine(#[from] DpgError),

    #[error("{operation} is not offered by the {variant} deployment")]
    NotOffered {
        operation: &'static str,
        variant: &'static str,
    },

    #[error("Missing or malformed caller header: {0}")]
    Caller(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Engine state is unavailable")]
    Poisoned,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Engine(err) => engine_status(err),
            ApiError::NotOffered { .. } => StatusCode::NOT_FOUND,
            ApiError::Caller(_) => StatusCode::UNAUTHORIZED,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Config(_) | ApiError::Poisoned | ApiError::Io(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::Engine(err) => err.kind(),
            ApiError::NotOffered { .. } => "not_offered",
            ApiError::Caller(_) => "missing_caller",
            ApiError::BadRequest(_) => "bad_request",
            ApiError::Config(_) => "config",
            ApiError::Poisoned => "unavailable",
            ApiError::Io(_) => "io",
        }
    }
}

fn engine_status(err: &DpgError) -> StatusCode {
    match err {
        DpgError::Unauthorized { .. } => StatusCode::FORBIDDEN,
        DpgError::AlreadyApproved(_)
        | DpgError::NotApproved(_)
        | DpgError::TooEarly(_)
        | DpgError::NotYetEligible(_)
        | DpgError::AlreadyClaimed { .. }
        | DpgError::NothingToClaim(_)
        | DpgError::InsufficientFunds { .. } => StatusCode::CONFLICT,
        DpgError::InvalidCount(_)
        | DpgError::ValueMismatch { .. }
        | DpgError::ZeroAddress
        | DpgError::DuplicateUnit(_)
        | DpgError::Overflow(_) => StatusCode::BAD_REQUEST,
        DpgError::Config(_) | DpgError::Serialization(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(kind = self.kind(), error = %self, "request failed");
        }
        let body = Json(serde_json::json!({
            "error": self.kind(),
            "message": self.to_string(),
        }));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dpg_types::{Address, Role};

    #[test]
    fn test_status_mapping() {
        let unauthorized = ApiError::from(DpgError::Unauthorized {
            role: Role::Agency,
            caller: Address::ZERO,
        });
        assert_eq!(unauthorized.status(), StatusCode::FORBIDDEN);
        assert_eq!(ApiError::from(DpgError::TooEarly(1)).status(), StatusCode::CONFLICT);
        assert_eq!(
            ApiError::from(DpgError::InvalidCount(0)).status(),
            StatusCode::BAD_REQUEST
        );
        let not_offered = ApiError::NotOffered {
            operation: "claim_reward",
            variant: "donation",
        };
        assert_eq!(not_offered.status(), StatusCode::NOT_FOUND);
        assert_eq!(not_offered.kind(), "not_offered");
    }
}
