use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::error;

/// Errors returned by the HTTP handlers. Each variant maps to one status code
/// and a JSON body with a `message` field.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(&'static str),
    /// Body could not be read or parsed.
    #[error("{0}")]
    InvalidBody(String),
    #[error("{0}")]
    Unauthorized(&'static str),
    #[error("{0}")]
    NotFound(&'static str),
    /// Edit failures carry the underlying detail in an `error` field.
    #[error("{message}: {detail}")]
    Failed {
        message: &'static str,
        detail: String,
    },
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) | ApiError::InvalidBody(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Failed { .. } | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            ApiError::BadRequest(message)
            | ApiError::Unauthorized(message)
            | ApiError::NotFound(message) => json!({ "message": message }),
            ApiError::InvalidBody(message) => json!({ "message": message }),
            ApiError::Failed { message, detail } => json!({ "message": message, "error": detail }),
            ApiError::Internal(e) => {
                error!(error = %e, "internal error");
                json!({ "message": e.to_string() })
            }
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_json(err: ApiError) -> (StatusCode, serde_json::Value) {
        let res = err.into_response();
        let status = res.status();
        let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn client_errors_only_carry_a_message() {
        let (status, body) = body_json(ApiError::BadRequest("bad")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "message": "bad" }));

        let (status, body) = body_json(ApiError::InvalidBody("bad json".into())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "message": "bad json" }));

        let (status, _) = body_json(ApiError::Unauthorized("no")).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        let (status, _) = body_json(ApiError::NotFound("gone")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn failed_includes_detail() {
        let (status, body) = body_json(ApiError::Failed {
            message: "could not update",
            detail: "connection reset".into(),
        })
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["message"], "could not update");
        assert_eq!(body["error"], "connection reset");
    }

    #[tokio::test]
    async fn internal_passes_message_through() {
        let (status, body) = body_json(anyhow::anyhow!("pool timed out").into()).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["message"], "pool timed out");
    }
}
