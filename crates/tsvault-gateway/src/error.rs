//! HTTP mapping for [`TsVaultError`].
//!
//! Every error response carries a machine-checkable `code` and a human
//! readable `error` message. Backend failures are reported as
//! `Server error: <details>`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use tsvault_core::error::{ClientCode, TsVaultError};

/// Handler error wrapper (orphan rule: `IntoResponse` lives here, not in core).
#[derive(Debug, Error)]
#[error(transparent)]
pub struct ApiError(#[from] pub TsVaultError);

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self.0.client_code() {
            c if c.is_validation() => StatusCode::BAD_REQUEST,
            ClientCode::NoData => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let code = self.0.client_code().as_str();
        let message = if status.is_server_error() {
            tracing::error!(code, error = %self.0, "query failed");
            format!("Server error: {}", self.0)
        } else {
            tracing::debug!(code, error = %self.0, "query rejected");
            self.0.to_string()
        };
        let body = Json(json!({
            "error": message,
            "code": code,
        }));
        (status, body).into_response()
    }
}
