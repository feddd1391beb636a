//! Use-case and router tests for the auth crate

#[cfg(test)]
mod support {
    use std::collections::HashMap;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::time::Duration;

    use chrono::Utc;
    use kernel::id::SnowflakeGenerator;
    use kernel::store::{StoreError, StoreResult};

    use crate::application::config::AuthConfig;
    use crate::application::token::SessionTokenIssuer;
    use crate::domain::entity::user::User;
    use crate::domain::identity::{
        CodeExchange, ExternalIdentity, IdentityError, IdentityProvider, ProviderRejection,
    };
    use crate::domain::repository::UserRepository;
    use crate::domain::value_object::{open_id::OpenId, profile::LoginProfile, user_id::UserId};
    use crate::infra::memory::InMemoryAuthRepository;

    pub const SECRET: &[u8] = b"test-secret-test-secret-test-sec";

    pub fn config() -> Arc<AuthConfig> {
        Arc::new(AuthConfig {
            token_secret: SECRET.to_vec(),
            token_ttl: Duration::from_secs(72 * 3600),
            call_timeout: Duration::from_secs(1),
        })
    }

    pub fn issuer() -> Arc<SessionTokenIssuer> {
        Arc::new(SessionTokenIssuer::new(SECRET, Duration::from_secs(72 * 3600)))
    }

    pub fn ids() -> Arc<SnowflakeGenerator> {
        Arc::new(SnowflakeGenerator::new(1).unwrap())
    }

    pub fn open_id(value: &str) -> OpenId {
        OpenId::new(value).unwrap()
    }

    /// Identity provider answering from a fixed table of codes
    #[derive(Default)]
    pub struct StubIdentity {
        outcomes: HashMap<String, CodeExchange>,
        delay: Option<Duration>,
    }

    impl StubIdentity {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn grant(mut self, code: &str, open_id_value: &str) -> Self {
            self.outcomes.insert(
                code.to_string(),
                CodeExchange::Granted(ExternalIdentity {
                    open_id: open_id(open_id_value),
                    union_id: None,
                    session_key: None,
                }),
            );
            self
        }

        pub fn reject(mut self, code: &str, errcode: i64, errmsg: &str) -> Self {
            self.outcomes.insert(
                code.to_string(),
                CodeExchange::Rejected(ProviderRejection {
                    errcode,
                    errmsg: errmsg.to_string(),
                }),
            );
            self
        }

        pub fn slow(mut self, delay: Duration) -> Self {
            self.delay = Some(delay);
            self
        }
    }

    impl IdentityProvider for StubIdentity {
        async fn exchange_code(&self, code: &str) -> Result<CodeExchange, IdentityError> {
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            self.outcomes
                .get(code)
                .cloned()
                .ok_or_else(|| IdentityError::Transport("connection refused".to_string()))
        }
    }

    /// Store where a concurrent request wins the first create
    #[derive(Default)]
    pub struct RacingRepository {
        pub inner: InMemoryAuthRepository,
        raced: AtomicBool,
    }

    impl UserRepository for RacingRepository {
        async fn create(&self, user: &User) -> StoreResult<()> {
            if !self.raced.swap(true, Ordering::SeqCst) {
                let winner = User::register(
                    UserId::from_i64(7),
                    user.open_id.clone(),
                    &LoginProfile::default(),
                    Utc::now(),
                );
                self.inner.create(&winner).await?;
                return Err(StoreError::Conflict);
            }
            self.inner.create(user).await
        }

        async fn find_by_open_id(&self, open_id: &OpenId) -> StoreResult<Option<User>> {
            self.inner.find_by_open_id(open_id).await
        }

        async fn update(&self, user: &User) -> StoreResult<bool> {
            self.inner.update(user).await
        }
    }

    /// Store whose creates always collide and whose reads never see the winner
    pub struct StuckRepository;

    impl UserRepository for StuckRepository {
        async fn create(&self, _user: &User) -> StoreResult<()> {
            Err(StoreError::Conflict)
        }

        async fn find_by_open_id(&self, _open_id: &OpenId) -> StoreResult<Option<User>> {
            Ok(None)
        }

        async fn update(&self, _user: &User) -> StoreResult<bool> {
            Ok(false)
        }
    }

    /// Store that is down
    pub struct BrokenRepository;

    impl UserRepository for BrokenRepository {
        async fn create(&self, _user: &User) -> StoreResult<()> {
            Err(StoreError::backend("connection reset"))
        }

        async fn find_by_open_id(&self, _open_id: &OpenId) -> StoreResult<Option<User>> {
            Err(StoreError::backend("connection reset"))
        }

        async fn update(&self, _user: &User) -> StoreResult<bool> {
            Err(StoreError::backend("connection reset"))
        }
    }
}

#[cfg(test)]
mod login_tests {
    use std::sync::Arc;
    use std::time::Duration;

    use super::support::*;
    use crate::application::{WechatLoginInput, WechatLoginUseCase};
    use crate::domain::repository::UserRepository;
    use crate::error::AuthError;
    use crate::infra::memory::InMemoryAuthRepository;

    fn input(code: &str) -> WechatLoginInput {
        WechatLoginInput {
            code: code.to_string(),
            nick_name: None,
            avatar_url: None,
        }
    }

    fn use_case<U: UserRepository + Send + Sync>(
        repo: Arc<U>,
        identity: StubIdentity,
    ) -> WechatLoginUseCase<U, StubIdentity> {
        WechatLoginUseCase::new(repo, Arc::new(identity), issuer(), ids(), config())
    }

    #[tokio::test]
    async fn test_first_then_repeat_login() {
        let repo = Arc::new(InMemoryAuthRepository::new());
        let login = use_case(repo.clone(), StubIdentity::new().grant("abc123", "ext-001"));

        let first = login.execute(input("abc123")).await.unwrap();
        assert!(first.is_new_user);
        assert_eq!(first.user.open_id.as_str(), "ext-001");

        tokio::time::sleep(Duration::from_millis(5)).await;

        let second = login.execute(input("abc123")).await.unwrap();
        assert!(!second.is_new_user);
        assert_eq!(second.user.open_id, first.user.open_id);
        assert_eq!(second.user.user_id, first.user.user_id);
        assert!(second.user.last_login_at > first.user.last_login_at);

        assert_eq!(repo.len(), 1);
    }

    #[tokio::test]
    async fn test_login_token_is_bound_to_open_id() {
        let repo = Arc::new(InMemoryAuthRepository::new());
        let login = use_case(repo, StubIdentity::new().grant("abc123", "ext-001"));

        let output = login.execute(input("abc123")).await.unwrap();
        let session = issuer().verify(&output.token.token).unwrap();
        assert_eq!(session.open_id, open_id("ext-001"));
    }

    #[tokio::test]
    async fn test_repeat_login_replaces_profile() {
        let repo = Arc::new(InMemoryAuthRepository::new());
        let login = use_case(repo.clone(), StubIdentity::new().grant("abc123", "ext-001"));

        login
            .execute(WechatLoginInput {
                code: "abc123".to_string(),
                nick_name: Some("Mina".to_string()),
                avatar_url: Some("https://cdn.example.com/m.png".to_string()),
            })
            .await
            .unwrap();

        let again = login
            .execute(WechatLoginInput {
                code: "abc123".to_string(),
                nick_name: Some("Mina K".to_string()),
                avatar_url: None,
            })
            .await
            .unwrap();

        assert_eq!(again.user.nick_name.as_str(), "Mina K");
        assert_eq!(again.user.avatar_url.as_str(), "");
        assert!(!again.is_new_user);
        assert_eq!(repo.len(), 1);
    }

    #[tokio::test]
    async fn test_empty_code_rejected() {
        let repo = Arc::new(InMemoryAuthRepository::new());
        let login = use_case(repo, StubIdentity::new());

        let err = login.execute(input("  ")).await.err().unwrap();
        assert!(matches!(err, AuthError::Validation(_)));
    }

    #[tokio::test]
    async fn test_rejected_code_creates_no_user() {
        let repo = Arc::new(InMemoryAuthRepository::new());
        let login = use_case(
            repo.clone(),
            StubIdentity::new().reject("used-code", 40163, "code been used"),
        );

        let err = login.execute(input("used-code")).await.err().unwrap();
        assert!(matches!(err, AuthError::ExternalAuth(ref msg) if msg == "code been used"));
        assert_eq!(err.to_string(), "wechat login failed: code been used");
        assert!(repo.is_empty());
    }

    #[tokio::test]
    async fn test_unreachable_provider() {
        let repo = Arc::new(InMemoryAuthRepository::new());
        let login = use_case(repo, StubIdentity::new());

        let err = login.execute(input("abc123")).await.err().unwrap();
        assert!(matches!(err, AuthError::ExternalAuth(_)));
    }

    #[tokio::test]
    async fn test_slow_provider_times_out() {
        let repo = Arc::new(InMemoryAuthRepository::new());
        let identity = StubIdentity::new()
            .grant("abc123", "ext-001")
            .slow(Duration::from_secs(5));
        let login = WechatLoginUseCase::new(
            repo,
            Arc::new(identity),
            issuer(),
            ids(),
            Arc::new(crate::application::AuthConfig {
                call_timeout: Duration::from_millis(50),
                ..(*config()).clone()
            }),
        );

        let err = login.execute(input("abc123")).await.err().unwrap();
        assert!(matches!(err, AuthError::Timeout("identity exchange")));
    }

    #[tokio::test]
    async fn test_create_race_resolved_by_retry() {
        let repo = Arc::new(RacingRepository::default());
        let login = use_case(repo.clone(), StubIdentity::new().grant("abc123", "ext-001"));

        let output = login.execute(input("abc123")).await.unwrap();

        assert!(!output.is_new_user);
        assert_eq!(output.user.user_id.value(), 7);
        assert_eq!(repo.inner.len(), 1);
    }

    #[tokio::test]
    async fn test_persistent_conflict_surfaces() {
        let login = use_case(
            Arc::new(StuckRepository),
            StubIdentity::new().grant("abc123", "ext-001"),
        );

        let err = login.execute(input("abc123")).await.err().unwrap();
        assert!(matches!(err, AuthError::Conflict));
    }

    #[tokio::test]
    async fn test_storage_failure() {
        let login = use_case(
            Arc::new(BrokenRepository),
            StubIdentity::new().grant("abc123", "ext-001"),
        );

        let err = login.execute(input("abc123")).await.err().unwrap();
        assert!(matches!(err, AuthError::Storage(_)));
    }
}

#[cfg(test)]
mod session_tests {
    use std::sync::Arc;

    use super::support::*;
    use crate::application::{
        GetUserInfoUseCase, RefreshTokenUseCase, UpdateProfileInput, UpdateProfileUseCase,
        WechatLoginInput, WechatLoginUseCase,
    };
    use crate::error::AuthError;
    use crate::infra::memory::InMemoryAuthRepository;

    async fn logged_in_repo() -> Arc<InMemoryAuthRepository> {
        let repo = Arc::new(InMemoryAuthRepository::new());
        WechatLoginUseCase::new(
            repo.clone(),
            Arc::new(StubIdentity::new().grant("abc123", "ext-001")),
            issuer(),
            ids(),
            config(),
        )
        .execute(WechatLoginInput {
            code: "abc123".to_string(),
            nick_name: Some("Mina".to_string()),
            avatar_url: Some("https://cdn.example.com/m.png".to_string()),
        })
        .await
        .unwrap();
        repo
    }

    #[tokio::test]
    async fn test_refresh_issues_new_valid_token() {
        let repo = logged_in_repo().await;
        let refresh = RefreshTokenUseCase::new(repo, issuer(), config());

        let a = refresh.execute(&open_id("ext-001")).await.unwrap();
        let b = refresh.execute(&open_id("ext-001")).await.unwrap();

        assert_ne!(a.token, b.token);
        assert_eq!(a.expires_in, 72 * 3600);
        assert_eq!(issuer().verify(&a.token).unwrap().open_id, open_id("ext-001"));
        assert_eq!(issuer().verify(&b.token).unwrap().open_id, open_id("ext-001"));
    }

    #[tokio::test]
    async fn test_refresh_unknown_user() {
        let repo = Arc::new(InMemoryAuthRepository::new());
        let refresh = RefreshTokenUseCase::new(repo, issuer(), config());

        let err = refresh.execute(&open_id("ext-404")).await.err().unwrap();
        assert!(matches!(err, AuthError::UserNotFound));
    }

    #[tokio::test]
    async fn test_get_user_info() {
        let repo = logged_in_repo().await;
        let user = GetUserInfoUseCase::new(repo, config())
            .execute(&open_id("ext-001"))
            .await
            .unwrap();

        assert_eq!(user.nick_name.as_str(), "Mina");
    }

    #[tokio::test]
    async fn test_update_profile_overwrites_both_fields() {
        let repo = logged_in_repo().await;
        let update = UpdateProfileUseCase::new(repo.clone(), config());

        let user = update
            .execute(
                &open_id("ext-001"),
                UpdateProfileInput {
                    nick_name: "Kai".to_string(),
                    avatar_url: None,
                },
            )
            .await
            .unwrap();

        assert_eq!(user.nick_name.as_str(), "Kai");
        assert_eq!(user.avatar_url.as_str(), "");

        let stored = GetUserInfoUseCase::new(repo, config())
            .execute(&open_id("ext-001"))
            .await
            .unwrap();
        assert_eq!(stored.nick_name.as_str(), "Kai");
        assert_eq!(stored.avatar_url.as_str(), "");
    }

    #[tokio::test]
    async fn test_update_profile_requires_nick_name() {
        let repo = logged_in_repo().await;
        let update = UpdateProfileUseCase::new(repo, config());

        let err = update
            .execute(
                &open_id("ext-001"),
                UpdateProfileInput {
                    nick_name: String::new(),
                    avatar_url: None,
                },
            )
            .await
            .err()
            .unwrap();

        assert!(matches!(err, AuthError::Validation(_)));
    }

    #[tokio::test]
    async fn test_update_profile_unknown_user() {
        let repo = Arc::new(InMemoryAuthRepository::new());
        let update = UpdateProfileUseCase::new(repo, config());

        let err = update
            .execute(
                &open_id("ext-404"),
                UpdateProfileInput {
                    nick_name: "Kai".to_string(),
                    avatar_url: None,
                },
            )
            .await
            .err()
            .unwrap();

        assert!(matches!(err, AuthError::UserNotFound));
    }
}

#[cfg(test)]
mod router_tests {
    use axum::Router;
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use super::support::*;
    use crate::infra::memory::InMemoryAuthRepository;
    use crate::presentation::router::auth_router_generic;

    fn app() -> Router {
        auth_router_generic(
            InMemoryAuthRepository::new(),
            StubIdentity::new().grant("abc123", "ext-001"),
            issuer(),
            ids(),
            (*config()).clone(),
        )
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn login_request() -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/auth/wechat-login")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json!({"code": "abc123"}).to_string()))
            .unwrap()
    }

    fn authed(method: &str, uri: &str, token: &str, body: Body) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::AUTHORIZATION, format!("Bearer {}", token))
            .header(header::CONTENT_TYPE, "application/json")
            .body(body)
            .unwrap()
    }

    async fn login(app: &Router) -> String {
        let response = app.clone().oneshot(login_request()).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        body["data"]["token"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn test_login_envelope() {
        let response = app().oneshot(login_request()).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["code"], 0);
        assert_eq!(body["message"], "success");
        assert_eq!(body["data"]["isNewUser"], true);
        assert_eq!(body["data"]["userInfo"]["openid"], "ext-001");
        assert!(body["timestamp"].as_i64().is_some());
    }

    #[tokio::test]
    async fn test_login_bad_json() {
        let request = Request::builder()
            .method("POST")
            .uri("/auth/wechat-login")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();

        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["code"], 1001);
    }

    #[tokio::test]
    async fn test_login_rejected_code() {
        let request = Request::builder()
            .method("POST")
            .uri("/auth/wechat-login")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json!({"code": "unknown"}).to_string()))
            .unwrap();

        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_json(response).await["code"], 1002);
    }

    #[tokio::test]
    async fn test_protected_route_without_bearer() {
        let request = Request::builder()
            .uri("/auth/user-info")
            .body(Body::empty())
            .unwrap();

        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_json(response).await["code"], 1002);
    }

    #[tokio::test]
    async fn test_protected_route_with_garbage_token() {
        let response = app()
            .oneshot(authed("GET", "/auth/user-info", "garbage", Body::empty()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body = body_json(response).await;
        assert_eq!(body["code"], 3002);
        assert_eq!(body["message"], "invalid or expired session");
    }

    #[tokio::test]
    async fn test_protected_route_with_expired_token() {
        let app = app();
        let _ = login(&app).await;
        let expired = issuer()
            .issue_at(
                &open_id("ext-001"),
                chrono::Utc::now() - chrono::Duration::hours(100),
            )
            .unwrap();

        let response = app
            .oneshot(authed("GET", "/auth/user-info", &expired.token, Body::empty()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body = body_json(response).await;
        assert_eq!(body["code"], 3003);
        assert_eq!(body["message"], "invalid or expired session");
    }

    #[tokio::test]
    async fn test_user_info_roundtrip() {
        let app = app();
        let token = login(&app).await;

        let response = app
            .clone()
            .oneshot(authed(
                "PUT",
                "/auth/user-info",
                &token,
                Body::from(json!({"nickName": "Kai", "avatarUrl": "https://cdn.example.com/k.png"}).to_string()),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .oneshot(authed("GET", "/auth/user-info", &token, Body::empty()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["data"]["nickName"], "Kai");
        assert_eq!(body["data"]["avatarUrl"], "https://cdn.example.com/k.png");
        assert!(body["data"]["lastLoginTime"].as_i64().unwrap() > 0);
    }

    #[tokio::test]
    async fn test_update_user_info_requires_nick_name() {
        let app = app();
        let token = login(&app).await;

        let response = app
            .oneshot(authed(
                "PUT",
                "/auth/user-info",
                &token,
                Body::from(json!({"avatarUrl": "https://cdn.example.com/k.png"}).to_string()),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["code"], 1001);
    }

    #[tokio::test]
    async fn test_refresh_token() {
        let app = app();
        let token = login(&app).await;

        let response = app
            .oneshot(authed("POST", "/auth/refresh-token", &token, Body::empty()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        let refreshed = body["data"]["token"].as_str().unwrap();
        assert_ne!(refreshed, token);
        assert_eq!(body["data"]["expiresIn"], 72 * 3600);
    }

    #[tokio::test]
    async fn test_refresh_for_vanished_user() {
        // valid signature, but the user was never stored
        let token = issuer().issue(&open_id("ext-404")).unwrap().token;

        let response = app()
            .oneshot(authed("POST", "/auth/refresh-token", &token, Body::empty()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(response).await["code"], 3001);
    }
}
