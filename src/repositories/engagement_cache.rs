use chrono::{Duration, Utc};
use sqlx::PgPool;

use crate::{
    models::engagement_cache::{EngagementCacheEntry, EngagementKind},
    repositories::DbResult,
};

/// How long a cached verdict is served before the upstream API is asked
/// again.
pub const CACHE_TTL_MINUTES: i64 = 20;

#[derive(Clone, Debug)]
pub struct EngagementCacheRepository {
    pool: PgPool,
}

impl EngagementCacheRepository {
    pub fn new(pool: &PgPool) -> Self {
        Self { pool: pool.clone() }
    }

    /// Records a verdict, overwriting any previous row for the triple and
    /// restarting its TTL.
    pub async fn upsert(
        &self,
        twitter_id: &str,
        tweet_id: &str,
        kind: EngagementKind,
        result: bool,
        fake: bool,
    ) -> DbResult<EngagementCacheEntry> {
        let expires_at = Utc::now() + Duration::minutes(CACHE_TTL_MINUTES);

        let entry = sqlx::query_as::<_, EngagementCacheEntry>(
            r#"
            INSERT INTO engagement_caches (twitter_id, tweet_id, kind, result, fake, expires_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (twitter_id, tweet_id, kind)
            DO UPDATE SET
                result = EXCLUDED.result,
                fake = EXCLUDED.fake,
                expires_at = EXCLUDED.expires_at
            RETURNING *
            "#,
        )
        .bind(twitter_id)
        .bind(tweet_id)
        .bind(kind.as_str())
        .bind(result)
        .bind(fake)
        .bind(expires_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(entry)
    }

    /// Returns the physical row whether or not it is expired; callers decide
    /// freshness via [`EngagementCacheEntry::expired`].
    pub async fn find(
        &self,
        twitter_id: &str,
        tweet_id: &str,
        kind: EngagementKind,
    ) -> DbResult<Option<EngagementCacheEntry>> {
        let entry = sqlx::query_as::<_, EngagementCacheEntry>(
            "SELECT * FROM engagement_caches WHERE twitter_id = $1 AND tweet_id = $2 AND kind = $3",
        )
        .bind(twitter_id)
        .bind(tweet_id)
        .bind(kind.as_str())
        .fetch_optional(&self.pool)
        .await?;

        Ok(entry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::Config, utils::test_db::reset_database};
    use sqlx::PgPool;

    async fn setup_test_repository() -> EngagementCacheRepository {
        let config = Config::load_test_env().expect("Failed to load configuration for tests");
        let pool = PgPool::connect(config.get_database_url())
            .await
            .expect("Failed to create pool.");

        reset_database(&pool).await;

        EngagementCacheRepository::new(&pool)
    }

    #[tokio::test]
    async fn test_upsert_keeps_one_row_per_triple() {
        let repo = setup_test_repository().await;

        let first = repo
            .upsert("123", "456", EngagementKind::Like, false, false)
            .await
            .unwrap();
        assert!(!first.result);

        let second = repo
            .upsert("123", "456", EngagementKind::Like, true, false)
            .await
            .unwrap();
        assert_eq!(second.id, first.id);
        assert!(second.result);
        assert!(second.expires_at >= first.expires_at);

        // A different kind for the same pair is a separate row
        let retweet = repo
            .upsert("123", "456", EngagementKind::Retweet, true, false)
            .await
            .unwrap();
        assert_ne!(retweet.id, first.id);
    }

    #[tokio::test]
    async fn test_find_returns_expired_rows() {
        let repo = setup_test_repository().await;

        let entry = repo
            .upsert("123", "789", EngagementKind::Retweet, true, true)
            .await
            .unwrap();
        assert!(entry.fake);
        assert!(!entry.expired());

        let found = repo
            .find("123", "789", EngagementKind::Retweet)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.id, entry.id);

        assert!(repo
            .find("123", "000", EngagementKind::Retweet)
            .await
            .unwrap()
            .is_none());
    }
}
