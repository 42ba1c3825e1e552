use crate::{
    db_persistence::DbError,
    models::ModelError,
    services::{
        invitation_service::InvitationError, twitter_service::TwitterError,
        wallet_service::WalletError,
    },
};

/// Top-level error for the binaries; the HTTP layer maps service errors to
/// its own envelope before they ever get here.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Database error: {0}")]
    Database(#[from] DbError),
    #[error("Model error: {0}")]
    Model(#[from] ModelError),
    #[error("Wallet error: {0}")]
    Wallet(#[from] WalletError),
    #[error("Twitter error: {0}")]
    Twitter(#[from] TwitterError),
    #[error("Invitation error: {0}")]
    Invitation(#[from] InvitationError),
    #[error("Server error: {0}")]
    Server(String),
}

pub type AppResult<T> = Result<T, AppError>;
