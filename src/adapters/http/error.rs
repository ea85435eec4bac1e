use axum::{http::StatusCode, response::{IntoResponse, Response}, Json};
use tracing::{error, warn};

use crate::application::dto::ErrorResponse;
use crate::domain::errors::DomainError;

/// A [`DomainError`] on its way out as a JSON error body.
#[derive(Debug)]
pub struct ApiError(pub DomainError);

impl From<DomainError> for ApiError {
    fn from(e: DomainError) -> Self {
        Self(e)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self.0 {
            DomainError::UnknownModel { .. }
            | DomainError::InvalidColor { .. }
            | DomainError::InvalidInput(_) => StatusCode::UNPROCESSABLE_ENTITY,
            DomainError::ImageDecode(_) => StatusCode::BAD_REQUEST,
            DomainError::NotFound(_) => StatusCode::NOT_FOUND,
            DomainError::Encode(_) | DomainError::OperationFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("Request failed: {}", self.0);
        } else {
            warn!("Request rejected: {}", self.0);
        }
        let body = ErrorResponse { error: self.0.to_string(), kind: self.0.kind().to_string() };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_taxonomy_to_status_codes() {
        let cases = [
            (DomainError::UnknownModel { name: "x".into(), expected: String::new() }, 422),
            (DomainError::InvalidColor { value: "1".into(), reason: String::new() }, 422),
            (DomainError::InvalidInput("x".into()), 422),
            (DomainError::ImageDecode("x".into()), 400),
            (DomainError::NotFound("x".into()), 404),
            (DomainError::Encode("x".into()), 500),
            (DomainError::OperationFailed("x".into()), 500),
        ];
        for (err, code) in cases {
            assert_eq!(ApiError(err).status().as_u16(), code);
        }
    }
}
