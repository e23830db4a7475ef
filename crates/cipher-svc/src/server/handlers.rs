//! Axum request handlers for all service endpoints.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use common::protocol::{
    DecryptRequest, DecryptResponse, EncryptRequest, EncryptResponse, ErrorResponse,
    HealthResponse,
};
use common::ServiceError;
use dualcipher::CipherError;
use tracing::warn;

use super::state::AppState;

/// `POST /encrypt` — turn a plaintext value into the text to persist.
///
/// While encryption is disabled (no primary key) the plaintext itself is
/// returned, so callers never need to special-case that state.
pub async fn encrypt(
    State(state): State<AppState>,
    payload: Result<Json<EncryptRequest>, JsonRejection>,
) -> Response {
    let Json(req) = match payload {
        Ok(body) => body,
        Err(rejection) => return bad_body(&rejection),
    };
    let cipher = state.ciphers.current();
    match cipher.encrypt_to_text(req.plaintext.as_bytes()) {
        Ok(ciphertext) => (StatusCode::OK, Json(EncryptResponse { ciphertext })).into_response(),
        Err(e) => {
            warn!(error = %e, "encryption failed");
            error_response(service_error(&e))
        }
    }
}

/// `POST /decrypt` — recover the plaintext of a stored value.
pub async fn decrypt(
    State(state): State<AppState>,
    payload: Result<Json<DecryptRequest>, JsonRejection>,
) -> Response {
    let Json(req) = match payload {
        Ok(body) => body,
        Err(rejection) => return bad_body(&rejection),
    };
    let cipher = state.ciphers.current();
    let bytes = match cipher.decrypt_from_text(&req.ciphertext) {
        Ok(b) => b,
        Err(e) => {
            warn!(error = %e, mode = %cipher.cipher().mode(), "decryption failed");
            return error_response(service_error(&e));
        }
    };

    match String::from_utf8(bytes) {
        Ok(plaintext) => (StatusCode::OK, Json(DecryptResponse { plaintext })).into_response(),
        Err(_) => error_response(ServiceError::Unprocessable(
            "decrypted value is not valid UTF-8".into(),
        )),
    }
}

/// `GET /health` — liveness check reporting the active key state.
pub async fn health(State(state): State<AppState>) -> Response {
    let current = state.ciphers.current();
    let cipher = current.cipher();
    let body = HealthResponse {
        status: "ok".into(),
        algorithm: cipher.algorithm().to_string(),
        mode: cipher.mode().to_string(),
        primary_key_id: cipher.primary_key_id().map(str::to_owned),
        secondary_key_id: cipher.secondary_key_id().map(str::to_owned),
    };
    (StatusCode::OK, Json(body)).into_response()
}

/// Catch-all 404 handler.
pub async fn not_found() -> impl IntoResponse {
    let err = ErrorResponse::new("not_found", "the requested resource does not exist");
    (StatusCode::NOT_FOUND, Json(err))
}

// ---------------------------------------------------------------------------
// Error mapping
// ---------------------------------------------------------------------------

/// Map a cipher error to the caller-facing error. Messages are fixed strings so
/// no input byte is ever echoed back.
fn service_error(e: &CipherError) -> ServiceError {
    match e {
        CipherError::MalformedInput { .. } => {
            ServiceError::Unprocessable("ciphertext too short".into())
        }
        CipherError::AuthenticationFailed => {
            ServiceError::Unprocessable("ciphertext failed authentication".into())
        }
        CipherError::HexDecode(_) => {
            ServiceError::Unprocessable("ciphertext is not valid hex".into())
        }
        CipherError::PlaintextNotText => {
            ServiceError::Unprocessable("plaintext cannot be stored unencrypted".into())
        }
        CipherError::EncryptionDisabled => {
            ServiceError::EncryptionFailure("encryption is disabled".into())
        }
        CipherError::EntropyUnavailable | CipherError::SealFailed => {
            ServiceError::EncryptionFailure("encryption failed".into())
        }
        CipherError::NoKeysProvided
        | CipherError::InvalidKeyMaterial { .. }
        | CipherError::UnknownAlgorithm(_) => {
            ServiceError::Internal("cipher misconfigured".into())
        }
    }
}

/// Reject a body that is not JSON of the expected shape. The parser's message
/// can quote the input, so neither the log nor the response carries it.
fn bad_body(rejection: &JsonRejection) -> Response {
    warn!(status = %rejection.status(), "rejected request body");
    error_response(ServiceError::BadRequest(
        "request body must be a JSON object of the documented shape".into(),
    ))
}

fn error_response(err: ServiceError) -> Response {
    let status =
        StatusCode::from_u16(err.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let body = ErrorResponse::new(err.code(), err.to_string());
    (status, Json(body)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{to_bytes, Body},
        http::Request,
        routing::{get, post},
        Router,
    };
    use dualcipher::{new_cipher, Algorithm, CipherBuilder, PassthroughPolicy};
    use serde::de::DeserializeOwned;
    use tower::ServiceExt;

    use crate::keys::CipherStore;

    const KEY_A: &str = "aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa";
    const KEY_B: &str = "bbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb";

    fn test_router(store: CipherStore) -> Router {
        Router::new()
            .route("/encrypt", post(encrypt))
            .route("/decrypt", post(decrypt))
            .route("/health", get(health))
            .with_state(AppState::new(store))
    }

    fn store(primary: &str, secondary: &str) -> CipherStore {
        CipherStore::new(new_cipher(Algorithm::XChaCha20Poly1305, primary, secondary).unwrap())
    }

    async fn post_json<T: DeserializeOwned>(
        app: Router,
        uri: &str,
        body: serde_json::Value,
    ) -> (StatusCode, T) {
        let req = Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    async fn post_raw(app: Router, uri: &str, body: &'static str) -> (StatusCode, ErrorResponse) {
        let req = Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body))
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    async fn encrypt_via(store: &CipherStore, plaintext: &str) -> String {
        let (status, resp): (_, EncryptResponse) = post_json(
            test_router(store.clone()),
            "/encrypt",
            serde_json::json!({ "plaintext": plaintext }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        resp.ciphertext
    }

    #[tokio::test]
    async fn encrypt_then_decrypt() {
        let store = store(KEY_A, "");
        let ciphertext = encrypt_via(&store, "123-45-6789").await;
        assert_ne!(ciphertext, "123-45-6789");

        let (status, resp): (_, DecryptResponse) = post_json(
            test_router(store),
            "/decrypt",
            serde_json::json!({ "ciphertext": ciphertext }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(resp.plaintext, "123-45-6789");
    }

    #[tokio::test]
    async fn rotation_reads_values_written_with_old_key() {
        let old = store(KEY_A, "");
        let ciphertext = encrypt_via(&old, "legacy").await;

        old.replace(new_cipher(Algorithm::XChaCha20Poly1305, KEY_B, KEY_A).unwrap());
        let (status, resp): (_, DecryptResponse) = post_json(
            test_router(old),
            "/decrypt",
            serde_json::json!({ "ciphertext": ciphertext }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(resp.plaintext, "legacy");
    }

    #[tokio::test]
    async fn disabled_encryption_returns_plaintext() {
        let store = store("", KEY_A);
        assert_eq!(encrypt_via(&store, "visible").await, "visible");
    }

    #[tokio::test]
    async fn tampered_value_during_rotation_is_unprocessable() {
        let writer = store(KEY_A, "");
        let mut ciphertext = encrypt_via(&writer, "secret").await;
        let flipped = if ciphertext.ends_with('0') { '1' } else { '0' };
        ciphertext.pop();
        ciphertext.push(flipped);

        let (status, resp): (_, ErrorResponse) = post_json(
            test_router(store(KEY_B, KEY_A)),
            "/decrypt",
            serde_json::json!({ "ciphertext": ciphertext }),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(resp.code, "unprocessable");
        assert!(!resp.message.contains("secret"));
    }

    #[tokio::test]
    async fn non_hex_during_rotation_is_unprocessable() {
        let (status, resp): (_, ErrorResponse) = post_json(
            test_router(store(KEY_B, KEY_A)),
            "/decrypt",
            serde_json::json!({ "ciphertext": "plain old value" }),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(resp.message, "unprocessable: ciphertext is not valid hex");
    }

    #[tokio::test]
    async fn strict_disabled_encryption_is_an_error() {
        let cipher = CipherBuilder::new(Algorithm::Aes256Gcm)
            .secondary(KEY_A)
            .passthrough(PassthroughPolicy::Strict)
            .build_hex()
            .unwrap();
        let (status, resp): (_, ErrorResponse) = post_json(
            test_router(CipherStore::new(cipher)),
            "/encrypt",
            serde_json::json!({ "plaintext": "x" }),
        )
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(resp.code, "encryption_failure");
    }

    #[tokio::test]
    async fn invalid_json_body_is_bad_request() {
        let (status, resp) = post_raw(test_router(store(KEY_A, "")), "/decrypt", "{not json").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(resp.code, "bad_request");
        assert!(!resp.message.contains("not json"));
    }

    #[tokio::test]
    async fn wrong_body_shape_is_bad_request() {
        let (status, resp) =
            post_raw(test_router(store(KEY_A, "")), "/encrypt", r#"{"ciphertext":"x"}"#).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(resp.code, "bad_request");
    }

    #[tokio::test]
    async fn health_reports_key_state() {
        let req = Request::builder()
            .uri("/health")
            .body(Body::empty())
            .unwrap();
        let resp = test_router(store(KEY_B, KEY_A)).oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let health: HealthResponse = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(health.mode, "rotating");
        assert_eq!(health.algorithm, "xchacha20-poly1305");
        assert!(health.primary_key_id.is_some());
        assert!(health.secondary_key_id.is_some());
    }

    #[test]
    fn error_mapping() {
        assert_eq!(service_error(&CipherError::AuthenticationFailed).http_status(), 422);
        assert_eq!(
            service_error(&CipherError::MalformedInput { len: 1, nonce_size: 24 }).http_status(),
            422
        );
        assert_eq!(service_error(&CipherError::EntropyUnavailable).http_status(), 500);
        assert_eq!(service_error(&CipherError::NoKeysProvided).code(), "internal_error");
    }
}
