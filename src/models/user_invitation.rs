use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{postgres::PgRow, FromRow, Row};

/// A user's invitation code, optionally pointing at the user who referred
/// them.
#[derive(Debug, Serialize, Clone)]
pub struct UserInvitation {
    pub id: i64,
    #[serde(skip_serializing)]
    pub application_id: i32,
    pub user_key: String,
    pub code: String,
    pub father_user_key: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

impl<'r> FromRow<'r, PgRow> for UserInvitation {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(UserInvitation {
            id: row.try_get("id")?,
            application_id: row.try_get("application_id")?,
            user_key: row.try_get("user_key")?,
            code: row.try_get("code")?,
            father_user_key: row.try_get("father_user_key")?,
            created_at: row.try_get("created_at")?,
        })
    }
}
