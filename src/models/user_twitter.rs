use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{postgres::PgRow, types::Json, FromRow, Row};

/// OAuth2 token blob persisted with a binding. `expires_at` is a unix epoch
/// in milliseconds.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TwitterToken {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub expires_at: i64,
}

impl TwitterToken {
    pub fn expired(&self) -> bool {
        self.expires_at <= Utc::now().timestamp_millis()
    }

    pub fn expires_at_datetime(&self) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(self.expires_at)
            .single()
            .unwrap_or_else(Utc::now)
    }
}

/// Public profile fields returned by the X users lookup.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TwitterUserInfo {
    pub id: String,
    pub name: String,
    pub username: String,
}

/// One X account bound to a user of a tenant. The display name is stored
/// base64-encoded so arbitrary unicode survives the round trip.
#[derive(Debug, Clone)]
pub struct UserTwitter {
    pub id: i64,
    pub application_id: i32,
    pub user_key: String,
    pub twitter_id: String,
    pub twitter_name: String,
    pub twitter_username: String,
    pub token: TwitterToken,
    pub scopes: Vec<String>,
    pub callback_url: String,
    pub created_at: Option<DateTime<Utc>>,
}

impl UserTwitter {
    pub fn new(
        application_id: i32,
        user_key: &str,
        info: &TwitterUserInfo,
        token: TwitterToken,
        scopes: Vec<String>,
        callback_url: &str,
    ) -> Self {
        UserTwitter {
            id: 0,
            application_id,
            user_key: user_key.to_string(),
            twitter_id: info.id.clone(),
            twitter_name: encode_name(&info.name),
            twitter_username: info.username.clone(),
            token,
            scopes,
            callback_url: callback_url.to_string(),
            created_at: None,
        }
    }

    /// Profile view with the display name decoded back to plain text.
    pub fn user_info(&self) -> TwitterUserInfo {
        TwitterUserInfo {
            id: self.twitter_id.clone(),
            name: decode_name(&self.twitter_name),
            username: self.twitter_username.clone(),
        }
    }
}

pub fn encode_name(name: &str) -> String {
    BASE64.encode(name.as_bytes())
}

/// Decodes a stored display name; rows predating the encoding are returned
/// as-is.
pub fn decode_name(stored: &str) -> String {
    BASE64
        .decode(stored)
        .ok()
        .and_then(|bytes| String::from_utf8(bytes).ok())
        .unwrap_or_else(|| stored.to_string())
}

impl<'r> FromRow<'r, PgRow> for UserTwitter {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        let token: Json<TwitterToken> = row.try_get("token")?;

        Ok(UserTwitter {
            id: row.try_get("id")?,
            application_id: row.try_get("application_id")?,
            user_key: row.try_get("user_key")?,
            twitter_id: row.try_get("twitter_id")?,
            twitter_name: row.try_get("twitter_name")?,
            twitter_username: row.try_get("twitter_username")?,
            token: token.0,
            scopes: row.try_get("scopes")?,
            callback_url: row.try_get("callback_url")?,
            created_at: row.try_get("created_at")?,
        })
    }
}
