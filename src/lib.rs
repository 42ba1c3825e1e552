//! # IdentityHub Library
//!
//! A multi-tenant identity-binding backend: wallet addresses are bound
//! through a Sign-In-with-Ethereum challenge flow, X (Twitter) accounts
//! through OAuth2 + PKCE, and tweet engagement is verified against the X API
//! behind a TTL'd result cache.

pub mod args;
pub mod config;
pub mod db_persistence;
pub mod errors;
pub mod handlers;
pub mod http_server;
pub mod middlewares;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod siwe;
pub mod twitter_api;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use db_persistence::{DbError, DbPersistence};
pub use errors::{AppError, AppResult};
pub use http_server::AppState;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
