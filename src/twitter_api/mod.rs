pub mod client;
pub mod oauth;

pub use client::{ListEndpoint, TwitterApiClient, MAX_SEARCH_DEPTH, SEARCH_PAGE_SIZE};
pub use oauth::{OAuth2Client, PkceVerifier, OAUTH_SCOPES};

/// Failures talking to the X platform. Upstream rejections carry the HTTP
/// status text the way the platform reported it.
#[derive(Debug, thiserror::Error)]
pub enum TwitterApiError {
    #[error("External service error: {0}")]
    ExternalService(String),
    #[error("Invalid endpoint configuration: {0}")]
    InvalidEndpoint(String),
}
