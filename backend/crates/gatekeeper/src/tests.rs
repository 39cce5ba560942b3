//! Unit tests for gatekeeper crate
//!
//! Exercises the full middleware pipeline against an in-process router.

#[cfg(test)]
mod pipeline_tests {
    use crate::application::config::GatekeeperConfig;
    use crate::infra::memory::InMemoryRateLimitStore;
    use crate::presentation::middleware::{GatekeeperState, rate_limit, security_filter};
    use axum::Router;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use axum::middleware::Next;
    use axum::routing::{get, post};
    use platform::rate_limit::{
        RateLimitConfig, RateLimitDecision, RateLimitStore,
    };
    use tower::ServiceExt;

    async fn ok_handler() -> &'static str {
        "ok"
    }

    fn app<S>(store: S, config: GatekeeperConfig) -> Router
    where
        S: RateLimitStore + Clone + Send + Sync + 'static,
    {
        let state = GatekeeperState::new(store, config);
        let limit_state = state.clone();
        let security_state = state;

        Router::new()
            .route("/api/ping", get(ok_handler))
            .route("/api/echo", post(ok_handler))
            .route("/health", get(ok_handler))
            .layer(axum::middleware::from_fn(
                move |req: Request<Body>, next: Next| {
                    let state = limit_state.clone();
                    async move { rate_limit(state, req, next).await }
                },
            ))
            .layer(axum::middleware::from_fn(
                move |req: Request<Body>, next: Next| {
                    let state = security_state.clone();
                    async move { security_filter(state, req, next).await }
                },
            ))
    }

    fn default_app() -> Router {
        app(InMemoryRateLimitStore::new(), GatekeeperConfig::default())
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_normal_request_passes_with_decorated_response() {
        let app = default_app();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/ping")
                    .header("user-agent", "Mozilla/5.0")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let headers = response.headers();
        assert_eq!(headers.get("x-content-type-options").unwrap(), "nosniff");
        assert_eq!(headers.get("x-frame-options").unwrap(), "DENY");
        assert_eq!(headers.get("x-xss-protection").unwrap(), "1; mode=block");
        assert_eq!(
            headers.get("referrer-policy").unwrap(),
            "strict-origin-when-cross-origin"
        );
        assert_eq!(
            headers.get("permissions-policy").unwrap(),
            "geolocation=(), microphone=(), camera=()"
        );
        assert!(headers.get("server").is_none());
        assert!(headers.get("server-timing").is_some());
        assert_eq!(headers.get("x-ratelimit-limit").unwrap(), "100");
        assert_eq!(headers.get("x-ratelimit-remaining").unwrap(), "99");
        assert!(headers.get("x-ratelimit-reset").is_some());
    }

    #[tokio::test]
    async fn test_denied_user_agent_rejected() {
        let app = default_app();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/ping")
                    .header("user-agent", "python-requests/2.31")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        let body = body_json(response).await;
        assert_eq!(body["error"], "Forbidden");
    }

    #[tokio::test]
    async fn test_exempt_path_skips_denylist() {
        let app = default_app();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .header("user-agent", "curl/8.5.0")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_suspicious_url_rejected() {
        let app = default_app();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/ping?q=1%20union%20all%20select%20*")
                    .header("user-agent", "Mozilla/5.0")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"], "Bad Request");
    }

    #[tokio::test]
    async fn test_suspicious_body_rejected() {
        let app = default_app();

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/echo")
                    .header("user-agent", "Mozilla/5.0")
                    .body(Body::from("<script>alert(1)</script>"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_clean_body_forwarded_to_handler() {
        let app = default_app();

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/echo")
                    .header("user-agent", "Mozilla/5.0")
                    .body(Body::from(r#"{"title":"weekly report"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_invalid_utf8_body_is_decoded_lossily() {
        let app = default_app();

        // Broken bytes around the payload must not hide the signature
        let mut bytes = vec![0xff, 0xfe];
        bytes.extend_from_slice(b"<script>alert(1)</script>");
        bytes.push(0xff);

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/echo")
                    .header("user-agent", "Mozilla/5.0")
                    .body(Body::from(bytes))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"], "Bad Request");
    }

    #[tokio::test]
    async fn test_undecodable_body_without_signature_passes() {
        let app = default_app();

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/echo")
                    .header("user-agent", "Mozilla/5.0")
                    .body(Body::from(vec![0xff, 0xfe, 0xfd, 0x80]))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_read_only_method_body_is_not_inspected() {
        let app = default_app();

        // GET bodies are unusual but legal; only mutating methods are scanned
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/ping")
                    .header("user-agent", "Mozilla/5.0")
                    .body(Body::from("<script>alert(1)</script>"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_rate_limit_rejects_over_limit() {
        let config = GatekeeperConfig {
            rate_limit: RateLimitConfig::new(2, 60),
            ..GatekeeperConfig::default()
        };
        let app = app(InMemoryRateLimitStore::new(), config);

        for _ in 0..2 {
            let response = app
                .clone()
                .oneshot(
                    Request::builder()
                        .uri("/api/ping")
                        .header("user-agent", "Mozilla/5.0")
                        .header("x-forwarded-for", "203.0.113.9")
                        .body(Body::empty())
                        .unwrap(),
                )
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK);
        }

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/ping")
                    .header("user-agent", "Mozilla/5.0")
                    .header("x-forwarded-for", "203.0.113.9")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(response.headers().get("retry-after").unwrap(), "60");
        let body = body_json(response).await;
        assert_eq!(body["error"], "Too Many Requests");
        assert_eq!(body["retry_after"], 60);
    }

    #[tokio::test]
    async fn test_rate_limit_buckets_by_client_key() {
        let config = GatekeeperConfig {
            rate_limit: RateLimitConfig::new(1, 60),
            ..GatekeeperConfig::default()
        };
        let app = app(InMemoryRateLimitStore::new(), config);

        let first = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/api/ping")
                    .header("user-agent", "Mozilla/5.0")
                    .header("authorization", "Bearer token-for-user-a")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(first.status(), StatusCode::OK);

        // Same limit, different credential: own bucket
        let other = app
            .oneshot(
                Request::builder()
                    .uri("/api/ping")
                    .header("user-agent", "Mozilla/5.0")
                    .header("authorization", "Bearer another-credential")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(other.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_exempt_path_bypasses_rate_limit() {
        let config = GatekeeperConfig {
            rate_limit: RateLimitConfig::new(1, 60),
            ..GatekeeperConfig::default()
        };
        let app = app(InMemoryRateLimitStore::new(), config);

        for _ in 0..5 {
            let response = app
                .clone()
                .oneshot(
                    Request::builder()
                        .uri("/health")
                        .header("user-agent", "kube-probe/1.29")
                        .body(Body::empty())
                        .unwrap(),
                )
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK);
            assert!(response.headers().get("x-ratelimit-limit").is_none());
        }
    }

    /// Store that fails every call, standing in for a lost backend.
    #[derive(Debug, Clone)]
    struct BrokenStore;

    impl RateLimitStore for BrokenStore {
        async fn check_and_record(
            &self,
            _key: &str,
            _config: &RateLimitConfig,
            _now: chrono::DateTime<chrono::Utc>,
        ) -> Result<RateLimitDecision, Box<dyn std::error::Error + Send + Sync>> {
            Err("store down".into())
        }

        async fn sweep(
            &self,
            _config: &RateLimitConfig,
            _now: chrono::DateTime<chrono::Utc>,
        ) -> Result<u64, Box<dyn std::error::Error + Send + Sync>> {
            Err("store down".into())
        }
    }

    #[tokio::test]
    async fn test_store_failure_fails_open() {
        let app = app(BrokenStore, GatekeeperConfig::default());

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/ping")
                    .header("user-agent", "Mozilla/5.0")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().get("x-ratelimit-limit").is_none());
    }

    #[test]
    fn test_config_defaults() {
        let config = GatekeeperConfig::default();
        assert_eq!(config.rate_limit.max_requests, 100);
        assert_eq!(config.rate_limit.window.as_secs(), 60);
        assert!(config.is_exempt("/health"));
        assert!(config.is_exempt("/metrics"));
        assert!(!config.is_exempt("/api/reports"));
        assert_eq!(config.sweep_interval().as_secs(), 300);
        assert_eq!(config.denied_user_agents.len(), 6);
    }
}
