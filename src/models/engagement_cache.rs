use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{postgres::PgRow, FromRow, Row};

use crate::models::{ModelError, ModelResult};

/// What an engagement cache row attests to.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EngagementKind {
    Like,
    Retweet,
}

impl EngagementKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EngagementKind::Like => "like",
            EngagementKind::Retweet => "retweet",
        }
    }

    pub fn parse(value: &str) -> ModelResult<Self> {
        match value {
            "like" => Ok(EngagementKind::Like),
            "retweet" => Ok(EngagementKind::Retweet),
            other => Err(ModelError::InvalidInput(format!(
                "unknown engagement kind: {other}"
            ))),
        }
    }
}

/// A cached verification verdict for one (account, tweet, kind) triple.
/// Rows are never deleted on read; an `expires_at` in the past just means
/// the verdict must be recomputed.
#[derive(Debug, Serialize, Clone)]
pub struct EngagementCacheEntry {
    pub id: i64,
    pub twitter_id: String,
    pub tweet_id: String,
    pub kind: EngagementKind,
    pub result: bool,
    pub fake: bool,
    pub expires_at: DateTime<Utc>,
}

impl EngagementCacheEntry {
    pub fn expired(&self) -> bool {
        self.expires_at <= Utc::now()
    }
}

impl<'r> FromRow<'r, PgRow> for EngagementCacheEntry {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        let kind: String = row.try_get("kind")?;
        let kind = EngagementKind::parse(&kind).map_err(|e| sqlx::Error::ColumnDecode {
            index: "kind".to_string(),
            source: Box::new(e),
        })?;

        Ok(EngagementCacheEntry {
            id: row.try_get("id")?,
            twitter_id: row.try_get("twitter_id")?,
            tweet_id: row.try_get("tweet_id")?,
            kind,
            result: row.try_get("result")?,
            fake: row.try_get("fake")?,
            expires_at: row.try_get("expires_at")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_kind_round_trip() {
        for kind in [EngagementKind::Like, EngagementKind::Retweet] {
            assert_eq!(EngagementKind::parse(kind.as_str()).unwrap(), kind);
        }
        assert!(EngagementKind::parse("quote").is_err());
    }

    #[test]
    fn test_expiry_is_soft() {
        let mut entry = EngagementCacheEntry {
            id: 1,
            twitter_id: "123".to_string(),
            tweet_id: "456".to_string(),
            kind: EngagementKind::Like,
            result: true,
            fake: false,
            expires_at: Utc::now() + Duration::minutes(20),
        };
        assert!(!entry.expired());

        entry.expires_at = Utc::now() - Duration::seconds(1);
        assert!(entry.expired());
    }
}
