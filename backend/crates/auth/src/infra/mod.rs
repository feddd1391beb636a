//! Infrastructure Layer
//!
//! Database implementations and external service integrations.

pub mod memory;
pub mod postgres;
pub mod wechat;

pub use memory::InMemoryAuthRepository;
pub use postgres::PgAuthRepository;
pub use wechat::{WechatClient, WechatConfig};
