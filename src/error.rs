use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use log::error;
use serde_json::json;

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug)]
pub enum ApiError {
    Validation(String),
    InvalidId(String),
    NotFound(String),
    Conflict(String),
    UpstreamFormat(String),
    Internal(String),
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::Validation(msg)
            | ApiError::InvalidId(msg)
            | ApiError::NotFound(msg)
            | ApiError::Conflict(msg)
            | ApiError::UpstreamFormat(msg)
            | ApiError::Internal(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::InvalidId(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::UpstreamFormat(_) | ApiError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(json!({ "error": self.to_string() }))
    }
}

impl From<mongodb::error::Error> for ApiError {
    fn from(err: mongodb::error::Error) -> Self {
        error!("Database operation failed: {:?}", err);
        ApiError::Internal("Internal server error".to_string())
    }
}

impl From<bson::ser::Error> for ApiError {
    fn from(err: bson::ser::Error) -> Self {
        error!("Failed to encode document: {:?}", err);
        ApiError::Internal("Internal server error".to_string())
    }
}

impl From<bson::de::Error> for ApiError {
    fn from(err: bson::de::Error) -> Self {
        error!("Failed to decode document: {:?}", err);
        ApiError::Internal("Internal server error".to_string())
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        error!("Error calling Gemini API: {:?}", err);
        if err.is_timeout() {
            ApiError::Internal("Gemini request timed out".to_string())
        } else {
            ApiError::Internal(format!("Error calling Gemini API: {}", err))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;

    #[test]
    fn maps_each_variant_to_its_status() {
        let cases = [
            (ApiError::Validation("x".into()), 400),
            (ApiError::InvalidId("x".into()), 400),
            (ApiError::NotFound("x".into()), 404),
            (ApiError::Conflict("x".into()), 409),
            (ApiError::UpstreamFormat("x".into()), 500),
            (ApiError::Internal("x".into()), 500),
        ];
        for (err, status) in cases {
            assert_eq!(err.status_code().as_u16(), status, "{:?}", err);
        }
    }

    #[actix_rt::test]
    async fn renders_error_envelope() {
        let resp = ApiError::NotFound("Trip not found".into()).error_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let body = to_bytes(resp.into_body()).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body, json!({ "error": "Trip not found" }));
    }
}
