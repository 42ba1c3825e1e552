use sqlx::{types::Json, PgPool};

use crate::{
    models::user_twitter::{TwitterToken, UserTwitter},
    repositories::DbResult,
};

#[derive(Clone, Debug)]
pub struct UserTwitterRepository {
    pool: PgPool,
}

impl UserTwitterRepository {
    pub fn new(pool: &PgPool) -> Self {
        Self { pool: pool.clone() }
    }

    /// Creates or replaces the binding for (application, user). Rebinding a
    /// twitter account already held by another user of the same tenant trips
    /// the unique index and surfaces as a database error.
    pub async fn upsert(&self, binding: &UserTwitter) -> DbResult<UserTwitter> {
        let binding = sqlx::query_as::<_, UserTwitter>(
            r#"
            INSERT INTO user_twitters
                (application_id, user_key, twitter_id, twitter_name, twitter_username, token, scopes, callback_url)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (application_id, user_key)
            DO UPDATE SET
                twitter_id = EXCLUDED.twitter_id,
                twitter_name = EXCLUDED.twitter_name,
                twitter_username = EXCLUDED.twitter_username,
                token = EXCLUDED.token,
                scopes = EXCLUDED.scopes,
                callback_url = EXCLUDED.callback_url
            RETURNING *
            "#,
        )
        .bind(binding.application_id)
        .bind(&binding.user_key)
        .bind(&binding.twitter_id)
        .bind(&binding.twitter_name)
        .bind(&binding.twitter_username)
        .bind(Json(&binding.token))
        .bind(&binding.scopes)
        .bind(&binding.callback_url)
        .fetch_one(&self.pool)
        .await?;

        Ok(binding)
    }

    pub async fn find_by_user(
        &self,
        application_id: i32,
        user_key: &str,
    ) -> DbResult<Option<UserTwitter>> {
        let binding = sqlx::query_as::<_, UserTwitter>(
            "SELECT * FROM user_twitters WHERE application_id = $1 AND user_key = $2",
        )
        .bind(application_id)
        .bind(user_key)
        .fetch_optional(&self.pool)
        .await?;

        Ok(binding)
    }

    /// Persists a refreshed token for an existing binding.
    pub async fn update_token(
        &self,
        application_id: i32,
        user_key: &str,
        token: &TwitterToken,
    ) -> DbResult<()> {
        sqlx::query(
            "UPDATE user_twitters SET token = $3 WHERE application_id = $1 AND user_key = $2",
        )
        .bind(application_id)
        .bind(user_key)
        .bind(Json(token))
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn delete_by_user(&self, application_id: i32, user_key: &str) -> DbResult<()> {
        sqlx::query("DELETE FROM user_twitters WHERE application_id = $1 AND user_key = $2")
            .bind(application_id)
            .bind(user_key)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    pub async fn delete_all(&self, application_id: i32) -> DbResult<()> {
        sqlx::query("DELETE FROM user_twitters WHERE application_id = $1")
            .bind(application_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::Config,
        models::user_twitter::TwitterUserInfo,
        utils::test_db::{create_persisted_application, reset_database},
    };
    use chrono::Utc;
    use sqlx::PgPool;

    async fn setup_test_repository() -> (PgPool, UserTwitterRepository) {
        let config = Config::load_test_env().expect("Failed to load configuration for tests");
        let pool = PgPool::connect(config.get_database_url())
            .await
            .expect("Failed to create pool.");

        reset_database(&pool).await;

        (pool.clone(), UserTwitterRepository::new(&pool))
    }

    fn binding(application_id: i32, user_key: &str, twitter_id: &str) -> UserTwitter {
        let info = TwitterUserInfo {
            id: twitter_id.to_string(),
            name: "Display Name".to_string(),
            username: format!("handle_{twitter_id}"),
        };
        let token = TwitterToken {
            access_token: "access".to_string(),
            refresh_token: Some("refresh".to_string()),
            expires_at: Utc::now().timestamp_millis() + 7_200_000,
        };
        UserTwitter::new(
            application_id,
            user_key,
            &info,
            token,
            vec!["tweet.read".to_string(), "users.read".to_string()],
            "https://app.example.com/callback",
        )
    }

    #[tokio::test]
    async fn test_upsert_replaces_binding_for_user() {
        let (pool, repo) = setup_test_repository().await;
        let app = create_persisted_application(&pool, "acme").await;

        let created = repo.upsert(&binding(app.id, "user_01", "111")).await.unwrap();
        assert_eq!(created.twitter_id, "111");
        assert!(created.created_at.is_some());

        // Re-binding the same user to a different account replaces the row
        let replaced = repo.upsert(&binding(app.id, "user_01", "222")).await.unwrap();
        assert_eq!(replaced.id, created.id);
        assert_eq!(replaced.twitter_id, "222");
        assert_eq!(replaced.user_info().name, "Display Name");
    }

    #[tokio::test]
    async fn test_twitter_account_unique_per_tenant() {
        let (pool, repo) = setup_test_repository().await;
        let app_a = create_persisted_application(&pool, "tenant_a").await;
        let app_b = create_persisted_application(&pool, "tenant_b").await;

        repo.upsert(&binding(app_a.id, "user_01", "111")).await.unwrap();

        // Same account under another tenant is fine
        repo.upsert(&binding(app_b.id, "user_01", "111")).await.unwrap();

        // Same account for a second user of the same tenant is rejected
        assert!(repo.upsert(&binding(app_a.id, "user_02", "111")).await.is_err());
    }

    #[tokio::test]
    async fn test_update_token() {
        let (pool, repo) = setup_test_repository().await;
        let app = create_persisted_application(&pool, "acme").await;

        repo.upsert(&binding(app.id, "user_01", "111")).await.unwrap();

        let refreshed = TwitterToken {
            access_token: "new-access".to_string(),
            refresh_token: Some("new-refresh".to_string()),
            expires_at: Utc::now().timestamp_millis() + 60_000,
        };
        repo.update_token(app.id, "user_01", &refreshed).await.unwrap();

        let stored = repo.find_by_user(app.id, "user_01").await.unwrap().unwrap();
        assert_eq!(stored.token.access_token, "new-access");
    }
}
