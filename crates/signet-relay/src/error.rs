use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    #[error("failed to read configuration at {path}: {source}")]
    ConfigRead {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed configuration: {0}")]
    ConfigParse(#[from] serde_json::Error),
    #[error("failed to load public key at {path}: {source}")]
    PublicKeyLoad {
        path: std::path::PathBuf,
        #[source]
        source: signet_core::CoreError,
    },
    #[error("storage error: {0}")]
    Storage(#[from] std::io::Error),
    #[error("failed to bind listener: {0}")]
    Bind(std::io::Error),

    #[error("multipart error: {0}")]
    Multipart(#[from] axum::extract::multipart::MultipartError),
    #[error("missing required form field {0:?}")]
    MissingField(&'static str),
    #[error("invalid token")]
    InvalidToken,
    #[error("malformed metadata: {0}")]
    MalformedMetadata(signet_core::CoreError),
    #[error("artifact does not match its metadata: {0}")]
    IntegrityFailed(signet_core::CoreError),
    #[error("no version has been published yet")]
    NotFound,
}

pub type Result<T> = std::result::Result<T, RelayError>;

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let status = match &self {
            RelayError::Multipart(_)
            | RelayError::MissingField(_)
            | RelayError::MalformedMetadata(_) => StatusCode::BAD_REQUEST,
            RelayError::IntegrityFailed(
                signet_core::CoreError::ChecksumMismatch { .. }
                | signet_core::CoreError::Base64(_)
                | signet_core::CoreError::SignatureLength(_),
            ) => StatusCode::BAD_REQUEST,
            RelayError::InvalidToken | RelayError::IntegrityFailed(_) => StatusCode::UNAUTHORIZED,
            RelayError::NotFound => StatusCode::NOT_FOUND,
            RelayError::ConfigRead { .. }
            | RelayError::ConfigParse(_)
            | RelayError::PublicKeyLoad { .. }
            | RelayError::Storage(_)
            | RelayError::Bind(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        tracing::warn!(%status, error = %self, "request rejected");

        (
            status,
            axum::Json(ErrorBody {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}
