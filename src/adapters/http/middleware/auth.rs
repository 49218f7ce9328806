//! Signed-request authentication middleware for axum.
//!
//! Every platform call carries a credential in a request header (by default
//! `Digest: JWT=<token>`). The credential is only valid for the exact bytes of
//! the body it was issued for, so the middleware buffers the body, hands both
//! to the `RequestAuthenticator` port and rebuilds the request for the handler.
//!
//! ```text
//! Request → auth_middleware → buffer body → authenticate(credential, body)
//!                                  ↓ ok                       ↓ err
//!                        Handler sees same body         400 {error, code}
//! ```
//!
//! # Example
//!
//! ```ignore
//! use axum::{Router, routing::post, middleware};
//!
//! let auth = AuthState::new(Arc::new(MockRequestAuthenticator::new()));
//!
//! let app = Router::new()
//!     .route("/connect", post(connect))
//!     .layer(middleware::from_fn_with_state(auth, auth_middleware));
//! ```

use std::sync::Arc;

use axum::{
    body::{self, Body},
    extract::{Request, State},
    http::{HeaderName, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};

use crate::domain::auth::{AuthError, SignedClaims};
use crate::ports::RequestAuthenticator;

/// Header the platform puts the credential in.
pub const DEFAULT_CREDENTIAL_HEADER: &str = "digest";

/// Largest body the middleware will buffer for verification.
pub const MAX_SIGNED_BODY_BYTES: usize = 1024 * 1024;

/// Auth middleware state - the authenticator and where to find the credential.
#[derive(Clone)]
pub struct AuthState {
    authenticator: Arc<dyn RequestAuthenticator>,
    credential_header: HeaderName,
}

impl AuthState {
    pub fn new(authenticator: Arc<dyn RequestAuthenticator>) -> Self {
        Self {
            authenticator,
            credential_header: HeaderName::from_static(DEFAULT_CREDENTIAL_HEADER),
        }
    }

    /// Reads the credential from a different header.
    pub fn with_credential_header(mut self, header: HeaderName) -> Self {
        self.credential_header = header;
        self
    }
}

/// Claims of the verified credential, injected into request extensions.
#[derive(Debug, Clone)]
pub struct VerifiedRequest(pub SignedClaims);

/// Why the middleware refused a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthRejection {
    /// No credential header, or one that is not valid UTF-8.
    MissingCredential,
    /// The body could not be read within the size limit.
    UnreadableBody,
    /// The authenticator rejected the credential.
    Rejected(AuthError),
}

impl AuthRejection {
    fn code(&self) -> &'static str {
        match self {
            AuthRejection::MissingCredential => "MISSING_CREDENTIAL",
            AuthRejection::UnreadableBody => "UNREADABLE_BODY",
            AuthRejection::Rejected(err) => err.code(),
        }
    }
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        // The platform only distinguishes "accepted" from "bad request"
        (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({
                "error": "Invalid request",
                "code": self.code()
            })),
        )
            .into_response()
    }
}

/// Authentication middleware for platform-signed requests.
///
/// This middleware:
/// 1. Reads the credential from the configured header
/// 2. Buffers the body exactly as received
/// 3. Verifies the credential against the body via the `RequestAuthenticator` port
/// 4. On success, injects `VerifiedRequest` and passes the same bytes on
/// 5. On any failure, returns 400 before the handler runs
pub async fn auth_middleware(
    State(auth): State<AuthState>,
    request: Request,
    next: Next,
) -> Response {
    match authenticate(&auth, request).await {
        Ok(request) => next.run(request).await,
        Err(rejection) => {
            tracing::warn!(code = rejection.code(), "Rejected unauthenticated request");
            rejection.into_response()
        }
    }
}

async fn authenticate(auth: &AuthState, request: Request) -> Result<Request, AuthRejection> {
    let credential = request
        .headers()
        .get(&auth.credential_header)
        .and_then(|h| h.to_str().ok())
        .map(str::to_owned)
        .ok_or(AuthRejection::MissingCredential)?;

    let (mut parts, body) = request.into_parts();
    let bytes = body::to_bytes(body, MAX_SIGNED_BODY_BYTES)
        .await
        .map_err(|_| AuthRejection::UnreadableBody)?;

    let claims = auth
        .authenticator
        .authenticate(&credential, &bytes)
        .await
        .map_err(AuthRejection::Rejected)?;

    parts.extensions.insert(VerifiedRequest(claims));
    Ok(Request::from_parts(parts, Body::from(bytes)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::auth::MockRequestAuthenticator;
    use axum::{middleware, routing::post, Extension, Router};
    use tower::ServiceExt;

    async fn echo(Extension(verified): Extension<VerifiedRequest>, body: String) -> String {
        assert!(verified.0.binds(body.as_bytes()));
        body
    }

    fn app(authenticator: Arc<MockRequestAuthenticator>, header: Option<&'static str>) -> Router {
        let mut state = AuthState::new(authenticator);
        if let Some(name) = header {
            state = state.with_credential_header(HeaderName::from_static(name));
        }
        Router::new()
            .route("/echo", post(echo))
            .layer(middleware::from_fn_with_state(state, auth_middleware))
    }

    fn request(header: &str, credential: Option<&str>, body: &'static str) -> Request {
        let mut builder = axum::http::Request::builder().method("POST").uri("/echo");
        if let Some(value) = credential {
            builder = builder.header(header, value);
        }
        builder.body(Body::from(body)).unwrap()
    }

    async fn json_body(response: Response) -> serde_json::Value {
        let bytes = body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Accepted requests
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn valid_credential_reaches_handler_with_same_body() {
        let authenticator = Arc::new(MockRequestAuthenticator::new().with_credential("good"));
        let response = app(authenticator.clone(), None)
            .oneshot(request("Digest", Some("good"), r#"{"a":1}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], br#"{"a":1}"#);
        assert_eq!(authenticator.seen_bodies(), vec![br#"{"a":1}"#.to_vec()]);
    }

    #[tokio::test]
    async fn credential_header_is_configurable() {
        let authenticator = Arc::new(MockRequestAuthenticator::new().with_credential("good"));
        let response = app(authenticator, Some("x-signature"))
            .oneshot(request("X-Signature", Some("good"), "{}"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Rejected requests
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn missing_header_is_bad_request() {
        let authenticator = Arc::new(MockRequestAuthenticator::new().with_credential("good"));
        let response = app(authenticator.clone(), None)
            .oneshot(request("Digest", None, "{}"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = json_body(response).await;
        assert_eq!(json["code"], "MISSING_CREDENTIAL");
        assert!(authenticator.seen_bodies().is_empty());
    }

    #[tokio::test]
    async fn unknown_credential_is_bad_request() {
        let authenticator = Arc::new(MockRequestAuthenticator::new().with_credential("good"));
        let response = app(authenticator, None)
            .oneshot(request("Digest", Some("forged"), "{}"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = json_body(response).await;
        assert_eq!(json["error"], "Invalid request");
        assert_eq!(json["code"], "BAD_SIGNATURE");
    }

    #[tokio::test]
    async fn authenticator_error_code_is_reported() {
        let authenticator = Arc::new(
            MockRequestAuthenticator::new()
                .with_credential("good")
                .with_error(AuthError::Expired),
        );
        let response = app(authenticator, None)
            .oneshot(request("Digest", Some("good"), "{}"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["code"], "EXPIRED");
    }
}
