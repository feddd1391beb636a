//! WeChat Mini-Program API Client
//!
//! Implements [`IdentityProvider`] over `sns/jscode2session` and sends
//! subscribe messages with a cached access token.

use std::collections::BTreeMap;
use std::fmt;
use std::time::{Duration, Instant};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::domain::identity::{
    CodeExchange, ExternalIdentity, IdentityError, IdentityProvider, ProviderRejection, SessionKey,
};
use crate::domain::subscribe_message::{Delivery, SubscribeMessage};
use crate::domain::value_object::open_id::OpenId;

/// Access tokens are refreshed this long before the platform expires them
const ACCESS_TOKEN_MARGIN: Duration = Duration::from_secs(300);

/// errcodes meaning the access token is no longer accepted
const STALE_ACCESS_TOKEN_CODES: [i64; 3] = [40001, 40014, 42001];

/// WeChat client configuration
#[derive(Clone)]
pub struct WechatConfig {
    pub app_id: String,
    pub app_secret: String,
    /// `https://api.weixin.qq.com` in production
    pub api_base: String,
    pub request_timeout: Duration,
}

impl fmt::Debug for WechatConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WechatConfig")
            .field("app_id", &self.app_id)
            .field("app_secret", &"**redacted**")
            .field("api_base", &self.api_base)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

struct CachedAccessToken {
    value: String,
    refresh_after: Instant,
}

enum AccessTokenFetch {
    Token(String),
    Rejected(ProviderRejection),
}

/// WeChat API client
pub struct WechatClient {
    http: reqwest::Client,
    config: WechatConfig,
    access_token: Mutex<Option<CachedAccessToken>>,
}

impl WechatClient {
    pub fn new(config: WechatConfig) -> Result<Self, IdentityError> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| IdentityError::Transport(e.to_string()))?;

        Ok(Self {
            http,
            config,
            access_token: Mutex::new(None),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.api_base.trim_end_matches('/'), path)
    }

    // ========================================================================
    // Subscribe messages
    // ========================================================================

    /// Send a subscribe message
    ///
    /// A rejection caused by a stale access token drops the cached token and
    /// retries once with a fresh one.
    pub async fn send_subscribe_message(
        &self,
        message: &SubscribeMessage,
    ) -> Result<Delivery, IdentityError> {
        let mut retried = false;
        loop {
            let token = match self.access_token().await? {
                AccessTokenFetch::Token(token) => token,
                AccessTokenFetch::Rejected(rejection) => return Ok(Delivery::Rejected(rejection)),
            };

            let body = SubscribeMessageBody::from(message);
            let request = self
                .http
                .post(self.url("/cgi-bin/message/subscribe/send"))
                .query(&[("access_token", token.as_str())])
                .json(&body);
            let status: ApiStatusBody = send_json(request).await?;

            if status.errcode == 0 {
                tracing::info!(
                    open_id = %message.to_user,
                    template_id = %message.template_id,
                    "Subscribe message sent"
                );
                return Ok(Delivery::Sent);
            }

            if STALE_ACCESS_TOKEN_CODES.contains(&status.errcode) && !retried {
                tracing::debug!(errcode = status.errcode, "Access token refused, refetching");
                self.invalidate_access_token().await;
                retried = true;
                continue;
            }

            tracing::warn!(
                open_id = %message.to_user,
                template_id = %message.template_id,
                errcode = status.errcode,
                errmsg = %status.errmsg,
                "Subscribe message rejected"
            );
            return Ok(Delivery::Rejected(ProviderRejection {
                errcode: status.errcode,
                errmsg: status.errmsg,
            }));
        }
    }

    /// Drop the cached access token
    pub async fn invalidate_access_token(&self) {
        *self.access_token.lock().await = None;
    }

    async fn access_token(&self) -> Result<AccessTokenFetch, IdentityError> {
        let mut cached = self.access_token.lock().await;
        if let Some(token) = cached.as_ref() {
            if Instant::now() < token.refresh_after {
                return Ok(AccessTokenFetch::Token(token.value.clone()));
            }
        }

        let request = self.http.get(self.url("/cgi-bin/token")).query(&[
            ("grant_type", "client_credential"),
            ("appid", self.config.app_id.as_str()),
            ("secret", self.config.app_secret.as_str()),
        ]);
        let body: AccessTokenBody = send_json(request).await?;

        if body.errcode != 0 {
            tracing::warn!(errcode = body.errcode, errmsg = %body.errmsg, "Access token request rejected");
            return Ok(AccessTokenFetch::Rejected(ProviderRejection {
                errcode: body.errcode,
                errmsg: body.errmsg,
            }));
        }

        let value = body
            .access_token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| IdentityError::Decode("access_token missing".to_string()))?;

        let lifetime = Duration::from_secs(body.expires_in).saturating_sub(ACCESS_TOKEN_MARGIN);
        *cached = Some(CachedAccessToken {
            value: value.clone(),
            refresh_after: Instant::now() + lifetime,
        });

        Ok(AccessTokenFetch::Token(value))
    }
}

// ============================================================================
// Identity Provider Implementation
// ============================================================================

impl IdentityProvider for WechatClient {
    async fn exchange_code(&self, code: &str) -> Result<CodeExchange, IdentityError> {
        let request = self.http.get(self.url("/sns/jscode2session")).query(&[
            ("appid", self.config.app_id.as_str()),
            ("secret", self.config.app_secret.as_str()),
            ("js_code", code),
            ("grant_type", "authorization_code"),
        ]);
        let body: Code2SessionBody = send_json(request).await?;

        if body.errcode != 0 {
            return Ok(CodeExchange::Rejected(ProviderRejection {
                errcode: body.errcode,
                errmsg: body.errmsg,
            }));
        }

        let open_id = body
            .openid
            .ok_or_else(|| IdentityError::Decode("openid missing".to_string()))
            .and_then(|v| OpenId::new(v).map_err(|e| IdentityError::Decode(e.message().to_string())))?;

        Ok(CodeExchange::Granted(ExternalIdentity {
            open_id,
            union_id: body.unionid.filter(|u| !u.is_empty()),
            session_key: body.session_key.map(SessionKey::new),
        }))
    }
}

// ============================================================================
// Wire types
// ============================================================================

#[derive(Deserialize)]
struct Code2SessionBody {
    #[serde(default)]
    openid: Option<String>,
    #[serde(default)]
    session_key: Option<String>,
    #[serde(default)]
    unionid: Option<String>,
    #[serde(default)]
    errcode: i64,
    #[serde(default)]
    errmsg: String,
}

#[derive(Deserialize)]
struct AccessTokenBody {
    #[serde(default)]
    access_token: Option<String>,
    #[serde(default)]
    expires_in: u64,
    #[serde(default)]
    errcode: i64,
    #[serde(default)]
    errmsg: String,
}

#[derive(Deserialize)]
struct ApiStatusBody {
    #[serde(default)]
    errcode: i64,
    #[serde(default)]
    errmsg: String,
}

#[derive(Serialize)]
struct DataItem<'a> {
    value: &'a str,
}

#[derive(Serialize)]
struct SubscribeMessageBody<'a> {
    touser: &'a str,
    template_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    page: Option<&'a str>,
    data: BTreeMap<&'a str, DataItem<'a>>,
    miniprogram_state: &'static str,
    lang: &'a str,
}

impl<'a> From<&'a SubscribeMessage> for SubscribeMessageBody<'a> {
    fn from(message: &'a SubscribeMessage) -> Self {
        Self {
            touser: message.to_user.as_str(),
            template_id: &message.template_id,
            page: message.page.as_deref(),
            data: message
                .data
                .iter()
                .map(|(k, v)| (k.as_str(), DataItem { value: v }))
                .collect(),
            miniprogram_state: message.state.as_str(),
            lang: &message.lang,
        }
    }
}

/// Send a request and decode the JSON answer
///
/// WeChat answers some endpoints with `text/plain`, so the body is decoded
/// regardless of content type.
async fn send_json<T: DeserializeOwned>(request: reqwest::RequestBuilder) -> Result<T, IdentityError> {
    let response = request.send().await.map_err(classify)?;

    let status = response.status();
    if !status.is_success() {
        return Err(IdentityError::Transport(format!("unexpected status {}", status)));
    }

    let bytes = response.bytes().await.map_err(classify)?;
    serde_json::from_slice(&bytes).map_err(|e| IdentityError::Decode(e.to_string()))
}

/// Map a reqwest error without leaking the URL (it carries the app secret)
fn classify(err: reqwest::Error) -> IdentityError {
    if err.is_timeout() {
        IdentityError::Timeout
    } else {
        IdentityError::Transport(err.without_url().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    fn client(server: &MockServer, timeout: Duration) -> WechatClient {
        WechatClient::new(WechatConfig {
            app_id: "wx-app".to_string(),
            app_secret: "wx-secret".to_string(),
            api_base: server.base_url(),
            request_timeout: timeout,
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_exchange_code_granted() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/sns/jscode2session")
                    .query_param("appid", "wx-app")
                    .query_param("secret", "wx-secret")
                    .query_param("js_code", "abc123")
                    .query_param("grant_type", "authorization_code");
                then.status(200)
                    .header("content-type", "text/plain")
                    .body(
                        json!({"openid": "ext-001", "session_key": "c2Vzc2lvbg=="}).to_string(),
                    );
            })
            .await;

        let result = client(&server, Duration::from_secs(2))
            .exchange_code("abc123")
            .await
            .unwrap();

        mock.assert_async().await;
        match result {
            CodeExchange::Granted(identity) => {
                assert_eq!(identity.open_id.as_str(), "ext-001");
                assert!(identity.union_id.is_none());
                assert_eq!(identity.session_key.unwrap().expose(), "c2Vzc2lvbg==");
            }
            other => panic!("expected Granted, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_exchange_code_rejected() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/sns/jscode2session");
                then.status(200)
                    .json_body(json!({"errcode": 40029, "errmsg": "invalid code"}));
            })
            .await;

        let result = client(&server, Duration::from_secs(2))
            .exchange_code("used-code")
            .await
            .unwrap();

        assert_eq!(
            result,
            CodeExchange::Rejected(ProviderRejection {
                errcode: 40029,
                errmsg: "invalid code".to_string(),
            })
        );
    }

    #[tokio::test]
    async fn test_exchange_code_missing_openid() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/sns/jscode2session");
                then.status(200).json_body(json!({"session_key": "k"}));
            })
            .await;

        let err = client(&server, Duration::from_secs(2))
            .exchange_code("abc123")
            .await
            .unwrap_err();

        assert!(matches!(err, IdentityError::Decode(_)));
    }

    #[tokio::test]
    async fn test_exchange_code_server_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/sns/jscode2session");
                then.status(502);
            })
            .await;

        let err = client(&server, Duration::from_secs(2))
            .exchange_code("abc123")
            .await
            .unwrap_err();

        assert!(matches!(err, IdentityError::Transport(_)));
        assert!(!err.to_string().contains("wx-secret"));
    }

    #[tokio::test]
    async fn test_exchange_code_timeout() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/sns/jscode2session");
                then.status(200)
                    .delay(Duration::from_millis(500))
                    .json_body(json!({"openid": "ext-001"}));
            })
            .await;

        let err = client(&server, Duration::from_millis(100))
            .exchange_code("abc123")
            .await
            .unwrap_err();

        assert_eq!(err, IdentityError::Timeout);
    }

    #[tokio::test]
    async fn test_subscribe_message_reuses_access_token() {
        let server = MockServer::start_async().await;
        let token_mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/cgi-bin/token")
                    .query_param("grant_type", "client_credential");
                then.status(200)
                    .json_body(json!({"access_token": "tok-1", "expires_in": 7200}));
            })
            .await;
        let send_mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/cgi-bin/message/subscribe/send")
                    .query_param("access_token", "tok-1")
                    .body_contains("\"touser\":\"ext-001\"")
                    .body_contains("\"thing1\":{\"value\":\"Checkup\"}");
                then.status(200).json_body(json!({"errcode": 0, "errmsg": "ok"}));
            })
            .await;

        let client = client(&server, Duration::from_secs(2));
        let message = SubscribeMessage::new(OpenId::new("ext-001").unwrap(), "tmpl-1")
            .field("thing1", "Checkup");

        assert_eq!(client.send_subscribe_message(&message).await.unwrap(), Delivery::Sent);
        assert_eq!(client.send_subscribe_message(&message).await.unwrap(), Delivery::Sent);

        token_mock.assert_hits_async(1).await;
        send_mock.assert_hits_async(2).await;
    }

    #[tokio::test]
    async fn test_subscribe_message_stale_token_retried_once() {
        let server = MockServer::start_async().await;
        let token_mock = server
            .mock_async(|when, then| {
                when.method(GET).path("/cgi-bin/token");
                then.status(200)
                    .json_body(json!({"access_token": "tok-1", "expires_in": 7200}));
            })
            .await;
        let send_mock = server
            .mock_async(|when, then| {
                when.method(POST).path("/cgi-bin/message/subscribe/send");
                then.status(200)
                    .json_body(json!({"errcode": 42001, "errmsg": "access_token expired"}));
            })
            .await;

        let client = client(&server, Duration::from_secs(2));
        let message = SubscribeMessage::new(OpenId::new("ext-001").unwrap(), "tmpl-1");

        let delivery = client.send_subscribe_message(&message).await.unwrap();

        assert!(matches!(delivery, Delivery::Rejected(ref r) if r.errcode == 42001));
        token_mock.assert_hits_async(2).await;
        send_mock.assert_hits_async(2).await;
    }

    #[tokio::test]
    async fn test_access_token_rejected() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/cgi-bin/token");
                then.status(200)
                    .json_body(json!({"errcode": 40013, "errmsg": "invalid appid"}));
            })
            .await;

        let client = client(&server, Duration::from_secs(2));
        let message = SubscribeMessage::new(OpenId::new("ext-001").unwrap(), "tmpl-1");

        let delivery = client.send_subscribe_message(&message).await.unwrap();
        assert!(matches!(delivery, Delivery::Rejected(ref r) if r.errcode == 40013));
    }

    #[test]
    fn test_config_debug_redacts_secret() {
        let config = WechatConfig {
            app_id: "wx-app".to_string(),
            app_secret: "wx-secret".to_string(),
            api_base: "https://api.weixin.qq.com".to_string(),
            request_timeout: Duration::from_secs(5),
        };
        assert!(!format!("{:?}", config).contains("wx-secret"));
    }
}
