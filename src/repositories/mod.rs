use crate::db_persistence::DbError;

pub type DbResult<T> = Result<T, DbError>;

pub mod application;
pub mod engagement_cache;
pub mod user_invitation;
pub mod user_twitter;
pub mod user_wallet;
