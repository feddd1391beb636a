//! Value Object Module

pub mod open_id;
pub mod profile;
pub mod user_id;
