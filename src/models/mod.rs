#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("Invalid data input: {0}")]
    InvalidInput(String),
}

pub type ModelResult<T> = Result<T, ModelError>;

pub mod application;
pub mod engagement_cache;
pub mod user_invitation;
pub mod user_twitter;
pub mod user_wallet;
