use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{postgres::PgRow, types::Json, FromRow, Row};

/// Format of generated invitation codes, stored per tenant.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CodeFormat {
    pub alphabet: String,
    pub size: usize,
}

impl Default for CodeFormat {
    fn default() -> Self {
        CodeFormat {
            alphabet: "0123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ"
                .to_string(),
            size: 6,
        }
    }
}

/// A tenant of the service. Every authenticated request is resolved to one
/// of these rows through its API key.
#[derive(Debug, Serialize, Clone)]
pub struct Application {
    pub id: i32,
    pub name: String,
    #[serde(skip_serializing)]
    pub apikey: String,
    #[serde(skip_serializing)]
    pub twitter_client_id: String,
    #[serde(skip_serializing)]
    pub twitter_client_secret: String,
    pub fake_verify: bool,
    pub disabled: bool,
    pub code_format: Option<CodeFormat>,
    pub created_at: Option<DateTime<Utc>>,
}

impl Application {
    pub fn code_format(&self) -> CodeFormat {
        self.code_format.clone().unwrap_or_default()
    }
}

impl<'r> FromRow<'r, PgRow> for Application {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        let code_format: Option<Json<CodeFormat>> = row.try_get("code_format")?;

        Ok(Application {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            apikey: row.try_get("apikey")?,
            twitter_client_id: row.try_get("twitter_client_id")?,
            twitter_client_secret: row.try_get("twitter_client_secret")?,
            fake_verify: row.try_get("fake_verify")?,
            disabled: row.try_get("disabled")?,
            code_format: code_format.map(|json| json.0),
            created_at: row.try_get("created_at")?,
        })
    }
}
