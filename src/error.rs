use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Application-level errors
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    /// A required source table is missing or unreadable. Fatal at startup.
    #[error("Data unavailable: {0}")]
    DataUnavailable(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Unexpected failure while building vectors, ranking or joining.
    #[error("Computation failure: {0}")]
    ComputationFailure(String),
}

impl AppError {
    /// Wraps a CSV error with the path of the file being read
    pub fn csv(path: &std::path::Path, err: csv::Error) -> Self {
        AppError::DataUnavailable(format!("{}: {}", path.display(), err))
    }

    /// Wraps an I/O error with the path of the file being read
    pub fn io(path: &std::path::Path, err: std::io::Error) -> Self {
        AppError::DataUnavailable(format!("{}: {}", path.display(), err))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, json!({ "error": msg })),
            AppError::DataUnavailable(msg) | AppError::ComputationFailure(msg) => {
                tracing::error!(error = %msg, "Recommendation request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({
                        "error": "Internal error while processing the request",
                        "details": msg
                    }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_invalid_input_is_client_error_without_details() {
        let response = AppError::InvalidInput("age out of range".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert_eq!(body["error"], "age out of range");
        assert!(body.get("details").is_none());
    }

    #[tokio::test]
    async fn test_computation_failure_carries_details() {
        let response =
            AppError::ComputationFailure("destination missing".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body_json(response).await;
        assert!(body["error"].is_string());
        assert_eq!(body["details"], "destination missing");
    }

    #[test]
    fn test_io_error_names_path() {
        let err = AppError::io(
            std::path::Path::new("/data/cluster_0.csv"),
            std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
        );
        assert!(matches!(err, AppError::DataUnavailable(_)));
        assert!(err.to_string().contains("/data/cluster_0.csv"));
    }
}
