/**
 * Error Conversion
 *
 * `BackendError` implements axum's `IntoResponse`, so handlers can return it
 * directly. The body follows the Conduit error envelope:
 *
 * ```json
 * { "errors": { "body": ["article not found"] } }
 * ```
 */

use axum::{
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::backend::error::types::BackendError;

#[derive(Serialize)]
struct ErrorBody {
    errors: ErrorMessages,
}

#[derive(Serialize)]
struct ErrorMessages {
    body: Vec<String>,
}

impl IntoResponse for BackendError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_client_error() {
            tracing::warn!(status = status.as_u16(), "request rejected: {}", self);
        }

        let body = ErrorBody {
            errors: ErrorMessages {
                body: vec![self.message()],
            },
        };
        (status, Json(body)).into_response()
    }
}
