//! Value Object Module

pub mod claims;
pub mod user_name;
pub mod user_role;
