//! Server Configuration
//!
//! Reads environment variables into the per-crate configs. Parsing is a pure
//! function over a lookup closure so it can be tested without touching the
//! process environment.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use auth::{AuthConfig, WechatConfig};
use media::UploadConfig;
use release::ReleaseConfig;
use thiserror::Error;

/// Shortest accepted JWT secret in bytes
const MIN_JWT_SECRET_LEN: usize = 16;

/// Longest accepted session lifetime (one year)
const MAX_JWT_EXPIRE_HOURS: u64 = 24 * 365;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} is invalid: {reason}")]
    Invalid { name: &'static str, reason: String },
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub database_url: String,
    pub database_max_connections: u32,
    pub frontend_origins: Vec<String>,
    pub snowflake_node_id: u16,
    pub auth: AuthConfig,
    pub wechat: WechatConfig,
    pub upload: UploadConfig,
    pub release: ReleaseConfig,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let vars = Vars(lookup);

        let port: u16 = vars.parsed("PORT", 8080)?;
        let base_url = vars
            .optional("BASE_URL")
            .unwrap_or_else(|| format!("http://localhost:{}", port))
            .trim_end_matches('/')
            .to_string();

        let jwt_secret = vars.required("JWT_SECRET")?;
        if jwt_secret.len() < MIN_JWT_SECRET_LEN {
            return Err(ConfigError::Invalid {
                name: "JWT_SECRET",
                reason: format!("must be at least {} bytes", MIN_JWT_SECRET_LEN),
            });
        }
        let jwt_expire_hours: u64 = vars.parsed("JWT_EXPIRE_HOURS", 72)?;
        let token_ttl = (1..=MAX_JWT_EXPIRE_HOURS)
            .contains(&jwt_expire_hours)
            .then(|| jwt_expire_hours.checked_mul(3600))
            .flatten()
            .map(Duration::from_secs)
            .ok_or_else(|| ConfigError::Invalid {
                name: "JWT_EXPIRE_HOURS",
                reason: format!("must be between 1 and {}", MAX_JWT_EXPIRE_HOURS),
            })?;

        let call_timeout = Duration::from_secs(vars.parsed("CALL_TIMEOUT_SECS", 5)?);

        let snowflake_node_id: u16 = vars.parsed("SNOWFLAKE_NODE_ID", 1)?;
        if snowflake_node_id > 1023 {
            return Err(ConfigError::Invalid {
                name: "SNOWFLAKE_NODE_ID",
                reason: "must be between 0 and 1023".to_string(),
            });
        }

        let allowed_types = vars
            .optional("UPLOAD_ALLOWED_TYPES")
            .map(|v| split_list(&v))
            .unwrap_or_else(|| UploadConfig::default().allowed_types);

        Ok(Self {
            port,
            database_url: vars.required("DATABASE_URL")?,
            database_max_connections: vars.parsed("DATABASE_MAX_CONNECTIONS", 5)?,
            frontend_origins: vars
                .optional("FRONTEND_ORIGINS")
                .map(|v| split_list(&v))
                .unwrap_or_default(),
            snowflake_node_id,
            auth: AuthConfig {
                token_secret: jwt_secret.into_bytes(),
                token_ttl,
                call_timeout,
            },
            wechat: WechatConfig {
                app_id: vars.required("WECHAT_APP_ID")?,
                app_secret: vars.required("WECHAT_APP_SECRET")?,
                api_base: vars
                    .optional("WECHAT_API_BASE")
                    .unwrap_or_else(|| "https://api.weixin.qq.com".to_string()),
                request_timeout: call_timeout,
            },
            upload: UploadConfig {
                max_size: vars.parsed("UPLOAD_MAX_SIZE", 10 * 1024 * 1024)?,
                allowed_types,
                storage_path: PathBuf::from(
                    vars.optional("UPLOAD_STORAGE_PATH")
                        .unwrap_or_else(|| "uploads".to_string()),
                ),
                base_url,
                call_timeout,
            },
            release: ReleaseConfig {
                call_timeout,
                admin_token: vars.optional("ADMIN_TOKEN"),
            },
        })
    }
}

struct Vars<F>(F);

impl<F> Vars<F>
where
    F: Fn(&str) -> Option<String>,
{
    /// Unset and blank are the same
    fn optional(&self, name: &str) -> Option<String> {
        (self.0)(name)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    fn required(&self, name: &'static str) -> Result<String, ConfigError> {
        self.optional(name).ok_or(ConfigError::Missing(name))
    }

    fn parsed<T>(&self, name: &'static str, default: T) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        match self.optional(name) {
            Some(raw) => raw.parse().map_err(|e: T::Err| ConfigError::Invalid {
                name,
                reason: e.to_string(),
            }),
            None => Ok(default),
        }
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
