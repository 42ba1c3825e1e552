use sqlx::PgPool;

use crate::{models::application::Application, repositories::DbResult};

#[derive(Clone, Debug)]
pub struct ApplicationRepository {
    pool: PgPool,
}

impl ApplicationRepository {
    pub fn new(pool: &PgPool) -> Self {
        Self { pool: pool.clone() }
    }

    pub async fn find_by_apikey(&self, apikey: &str) -> DbResult<Option<Application>> {
        let application =
            sqlx::query_as::<_, Application>("SELECT * FROM applications WHERE apikey = $1")
                .bind(apikey)
                .fetch_optional(&self.pool)
                .await?;

        Ok(application)
    }

    pub async fn find_by_id(&self, id: i32) -> DbResult<Option<Application>> {
        let application =
            sqlx::query_as::<_, Application>("SELECT * FROM applications WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(application)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::Config,
        utils::test_db::{create_persisted_application, reset_database},
    };
    use sqlx::PgPool;

    async fn setup_test_repository() -> (PgPool, ApplicationRepository) {
        let config = Config::load_test_env().expect("Failed to load configuration for tests");
        let pool = PgPool::connect(config.get_database_url())
            .await
            .expect("Failed to create pool.");

        reset_database(&pool).await;

        (pool.clone(), ApplicationRepository::new(&pool))
    }

    #[tokio::test]
    async fn test_find_by_apikey() {
        let (pool, repo) = setup_test_repository().await;

        let app = create_persisted_application(&pool, "acme").await;

        let found = repo.find_by_apikey(&app.apikey).await.unwrap().unwrap();
        assert_eq!(found.id, app.id);
        assert_eq!(found.name, "acme");
        assert!(!found.disabled);

        assert!(repo.find_by_apikey("no-such-key").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_find_by_id() {
        let (pool, repo) = setup_test_repository().await;

        let app = create_persisted_application(&pool, "acme").await;

        let found = repo.find_by_id(app.id).await.unwrap().unwrap();
        assert_eq!(found.apikey, app.apikey);

        assert!(repo.find_by_id(app.id + 100).await.unwrap().is_none());
    }
}
