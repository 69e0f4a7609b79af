//! # TaskHub Shared Library
//!
//! This crate contains the data-access and authorization layer shared by the
//! TaskHub API server and its tests.
//!
//! ## Module Organization
//!
//! - `db`: Connection pool, storage adapter, and schema bootstrap
//! - `models`: `User` and `Task` entities with their CRUD operations
//! - `auth`: Password hashing, session tokens, and access control

pub mod auth;
pub mod db;
pub mod models;

/// Current version of the TaskHub shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
