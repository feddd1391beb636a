//! Application Layer
//!
//! Use cases and application services.

pub mod config;
pub mod refresh_token;
pub mod token;
pub mod user_profile;
pub mod wechat_login;

// Re-exports
pub use config::AuthConfig;
pub use refresh_token::RefreshTokenUseCase;
pub use token::{IssuedToken, SessionTokenIssuer, TokenError, VerifiedSession};
pub use user_profile::{GetUserInfoUseCase, UpdateProfileInput, UpdateProfileUseCase};
pub use wechat_login::{WechatLoginInput, WechatLoginOutput, WechatLoginUseCase};
