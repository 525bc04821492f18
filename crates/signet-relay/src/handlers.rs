use crate::error::{RelayError, Result};
use crate::state::SharedState;
use axum::extract::{Multipart, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::json;
use subtle::ConstantTimeEq;

#[derive(Default)]
struct UploadForm {
    token: Option<String>,
    metadata: Option<String>,
    file: Option<Vec<u8>>,
}

#[derive(Serialize)]
struct UploadResponse {
    status: &'static str,
    version: String,
}

/// `POST /upload` — ingest a new artifact after re-verifying every invariant
/// the pipeline relies on: bearer token, checksum, and Ed25519 signature.
pub async fn upload(State(state): State<SharedState>, mut multipart: Multipart) -> Result<Response> {
    let mut form = UploadForm::default();

    while let Some(field) = multipart.next_field().await? {
        match field.name().unwrap_or_default() {
            "token" => form.token = Some(field.text().await?),
            "metadata" => form.metadata = Some(field.text().await?),
            "file" => form.file = Some(field.bytes().await?.to_vec()),
            _ => {}
        }
    }

    let token = form.token.ok_or(RelayError::MissingField("token"))?;
    let metadata_json = form.metadata.ok_or(RelayError::MissingField("metadata"))?;
    let artifact = form.file.ok_or(RelayError::MissingField("file"))?;

    if token.as_bytes().ct_eq(state.token.as_bytes()).unwrap_u8() == 0 {
        tracing::warn!("rejected upload with invalid token");
        return Err(RelayError::InvalidToken);
    }

    let metadata = signet_core::Metadata::from_json(metadata_json.as_bytes())
        .map_err(RelayError::MalformedMetadata)?;

    metadata
        .verify_integrity(&artifact, &state.public_key)
        .map_err(RelayError::IntegrityFailed)?;

    state.storage.write_pair(&artifact, &metadata).await?;

    tracing::info!(version = %metadata.version, bytes = artifact.len(), "stored new artifact");

    Ok((
        StatusCode::OK,
        Json(UploadResponse {
            status: "ok",
            version: metadata.version,
        }),
    )
        .into_response())
}

/// `GET /latest` — the current metadata, verbatim as persisted.
pub async fn latest(State(state): State<SharedState>) -> Result<Response> {
    let metadata = state.storage.read_metadata().await?.ok_or(RelayError::NotFound)?;
    Ok(Json(metadata).into_response())
}

/// `GET /download` — the current artifact bytes, verbatim as persisted.
pub async fn download(State(state): State<SharedState>) -> Result<Response> {
    let artifact = state.storage.read_artifact().await?.ok_or(RelayError::NotFound)?;
    let disposition = format!("attachment; filename={}", state.download_filename);
    Ok((
        [
            (header::CONTENT_TYPE, "application/octet-stream".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        artifact,
    )
        .into_response())
}

/// `GET /health` — liveness probe, no auth, no state access.
pub async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok", "time": chrono::Utc::now().to_rfc3339() }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::Storage;
    use axum::body::Body;
    use axum::http::Request;
    use axum::routing::{get, post};
    use axum::Router;
    use ed25519_dalek::SigningKey;
    use rand::rngs::OsRng;
    use std::sync::Arc;
    use tower::ServiceExt;

    fn router(state: SharedState) -> Router {
        Router::new()
            .route("/upload", post(upload))
            .route("/latest", get(latest))
            .route("/download", get(download))
            .route("/health", get(health))
            .with_state(state)
    }

    fn test_state(dir: &std::path::Path, signing_key: &SigningKey, token: &str) -> SharedState {
        Arc::new(crate::state::RelayState {
            storage: Storage::new(dir.to_path_buf()).unwrap(),
            public_key: signing_key.verifying_key(),
            token: token.to_string(),
            download_filename: "signet-artifact".to_string(),
        })
    }

    fn multipart_body(boundary: &str, token: &str, metadata_json: &str, file: &[u8]) -> Vec<u8> {
        let mut body = Vec::new();
        body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
        body.extend_from_slice(b"Content-Disposition: form-data; name=\"token\"\r\n\r\n");
        body.extend_from_slice(token.as_bytes());
        body.extend_from_slice(b"\r\n");

        body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
        body.extend_from_slice(b"Content-Disposition: form-data; name=\"metadata\"\r\n\r\n");
        body.extend_from_slice(metadata_json.as_bytes());
        body.extend_from_slice(b"\r\n");

        body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
        body.extend_from_slice(
            b"Content-Disposition: form-data; name=\"file\"; filename=\"artifact\"\r\n",
        );
        body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
        body.extend_from_slice(file);
        body.extend_from_slice(b"\r\n");

        body.extend_from_slice(format!("--{boundary}--\r\n").as_bytes());
        body
    }

    fn upload_request(token: &str, metadata_json: &str, file: &[u8]) -> Request<Body> {
        let boundary = "signet-test-boundary";
        let body = multipart_body(boundary, token, metadata_json, file);
        Request::builder()
            .method("POST")
            .uri("/upload")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={boundary}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    fn sample_metadata_json(artifact: &[u8], signing_key: &SigningKey) -> String {
        let metadata = signet_core::Metadata {
            version: "20260101-000000".into(),
            build_time: "2026-01-01 00:00:00".into(),
            checksum: signet_core::sha256_hex(artifact),
            platform: "darwin/arm64".into(),
            signature: signet_core::sign_base64(signing_key, artifact),
        };
        serde_json::to_string(&metadata).unwrap()
    }

    #[tokio::test]
    async fn valid_upload_is_stored_and_latest_reflects_it() {
        let dir = tempfile::tempdir().unwrap();
        let signing_key = SigningKey::generate(&mut OsRng);
        let state = test_state(dir.path(), &signing_key, "right-token");
        let app = router(state.clone());

        let artifact = b"a freshly built artifact".to_vec();
        let metadata_json = sample_metadata_json(&artifact, &signing_key);
        let request = upload_request("right-token", &metadata_json, &artifact);

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let stored = state.storage.read_artifact().await.unwrap().unwrap();
        assert_eq!(stored, artifact);
    }

    #[tokio::test]
    async fn wrong_token_is_rejected_and_leaves_prior_state_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let signing_key = SigningKey::generate(&mut OsRng);
        let state = test_state(dir.path(), &signing_key, "right-token");

        let prior = b"already published".to_vec();
        state
            .storage
            .write_pair(
                &prior,
                &signet_core::Metadata::from_json(sample_metadata_json(&prior, &signing_key).as_bytes())
                    .unwrap(),
            )
            .await
            .unwrap();

        let app = router(state.clone());
        let artifact = b"attacker artifact".to_vec();
        let metadata_json = sample_metadata_json(&artifact, &signing_key);
        let request = upload_request("wrong", &metadata_json, &artifact);

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let stored = state.storage.read_artifact().await.unwrap().unwrap();
        assert_eq!(stored, prior);
    }

    #[tokio::test]
    async fn checksum_mismatch_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let signing_key = SigningKey::generate(&mut OsRng);
        let state = test_state(dir.path(), &signing_key, "tok");
        let app = router(state);

        let signed_artifact = b"bytes that were signed".to_vec();
        let metadata_json = sample_metadata_json(&signed_artifact, &signing_key);
        let request = upload_request("tok", &metadata_json, b"different bytes entirely sent instead");

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn forged_signature_over_different_bytes_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let signing_key = SigningKey::generate(&mut OsRng);
        let state = test_state(dir.path(), &signing_key, "tok");
        let app = router(state);

        let artifact = b"the real artifact bytes".to_vec();
        let mut metadata = signet_core::Metadata {
            version: "20260101-000000".into(),
            build_time: "2026-01-01 00:00:00".into(),
            checksum: signet_core::sha256_hex(&artifact),
            platform: "darwin/arm64".into(),
            signature: signet_core::sign_base64(&signing_key, b"some other bytes"),
        };
        // checksum matches the real artifact, but the signature covers
        // different bytes signed under the same key.
        metadata.checksum = signet_core::sha256_hex(&artifact);
        let metadata_json = serde_json::to_string(&metadata).unwrap();
        let request = upload_request("tok", &metadata_json, &artifact);

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn latest_and_download_404_before_any_upload() {
        let dir = tempfile::tempdir().unwrap();
        let signing_key = SigningKey::generate(&mut OsRng);
        let state = test_state(dir.path(), &signing_key, "tok");
        let app = router(state);

        let response = app
            .clone()
            .oneshot(Request::builder().uri("/latest").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = app
            .oneshot(Request::builder().uri("/download").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let dir = tempfile::tempdir().unwrap();
        let signing_key = SigningKey::generate(&mut OsRng);
        let state = test_state(dir.path(), &signing_key, "tok");
        let app = router(state);

        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
