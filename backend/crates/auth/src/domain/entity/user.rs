//! User Entity
//!
//! One row per external identity. Created on first login, refreshed on
//! every later login.

use chrono::{DateTime, Utc};

use crate::domain::value_object::{
    open_id::OpenId,
    profile::{AvatarUrl, LoginProfile, NickName},
    user_id::UserId,
};

/// User entity
#[derive(Debug, Clone)]
pub struct User {
    /// Internal snowflake identifier
    pub user_id: UserId,
    /// External identity (unique, immutable)
    pub open_id: OpenId,
    pub nick_name: NickName,
    pub avatar_url: AvatarUrl,
    /// Last successful login time
    pub last_login_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Register a user on their first login
    pub fn register(
        user_id: UserId,
        open_id: OpenId,
        profile: &LoginProfile,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            user_id,
            open_id,
            nick_name: profile.nick_name.clone().unwrap_or_default(),
            avatar_url: profile.avatar_url.clone().unwrap_or_default(),
            last_login_at: now,
            created_at: now,
            updated_at: now,
        }
    }

    /// Record a successful login; the login's profile replaces the stored one
    /// and an absent field clears it
    pub fn record_login(&mut self, profile: &LoginProfile, now: DateTime<Utc>) {
        self.nick_name = profile.nick_name.clone().unwrap_or_default();
        self.avatar_url = profile.avatar_url.clone().unwrap_or_default();
        self.last_login_at = now;
        self.updated_at = now;
    }

    /// Overwrite the mutable profile fields
    pub fn update_profile(&mut self, nick_name: NickName, avatar_url: AvatarUrl, now: DateTime<Utc>) {
        self.nick_name = nick_name;
        self.avatar_url = avatar_url;
        self.updated_at = now;
    }
}
