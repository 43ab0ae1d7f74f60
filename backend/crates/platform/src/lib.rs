//! Platform Crate - Technical Infrastructure
//!
//! Shared technical foundations for the catalog service:
//! - Password hashing (Argon2id)
//! - Cookie and bearer-token extraction
//! - Random secret generation
//! - The PostgreSQL gateway used by every repository

pub mod cookie;
pub mod crypto;
pub mod database;
pub mod password;
