//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - Bearer credential extraction from HTTP headers
//! - Deadlines for calls to slow collaborators (HTTP APIs, databases, disks)
//! - Cryptographic utilities (random tokens, constant-time comparison)

pub mod bearer;
pub mod crypto;
pub mod deadline;
