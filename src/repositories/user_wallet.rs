use sqlx::PgPool;

use crate::{
    models::user_wallet::{ChainType, UserWallet},
    repositories::DbResult,
};

#[derive(Clone, Debug)]
pub struct UserWalletRepository {
    pool: PgPool,
}

impl UserWalletRepository {
    pub fn new(pool: &PgPool) -> Self {
        Self { pool: pool.clone() }
    }

    /// Creates or replaces the wallet bound to (application, user, chain).
    pub async fn upsert(&self, wallet: &UserWallet) -> DbResult<UserWallet> {
        let wallet = sqlx::query_as::<_, UserWallet>(
            r#"
            INSERT INTO user_wallets (application_id, user_key, chain, address, is_signup, memo, extra)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (application_id, user_key, chain)
            DO UPDATE SET
                address = EXCLUDED.address,
                is_signup = EXCLUDED.is_signup,
                memo = EXCLUDED.memo,
                extra = EXCLUDED.extra
            RETURNING *
            "#,
        )
        .bind(wallet.application_id)
        .bind(&wallet.user_key)
        .bind(wallet.chain.as_str())
        .bind(&wallet.address)
        .bind(wallet.is_signup)
        .bind(&wallet.memo)
        .bind(&wallet.extra)
        .fetch_one(&self.pool)
        .await?;

        Ok(wallet)
    }

    pub async fn find_by_user(
        &self,
        application_id: i32,
        user_key: &str,
        chain: ChainType,
    ) -> DbResult<Option<UserWallet>> {
        let wallet = sqlx::query_as::<_, UserWallet>(
            "SELECT * FROM user_wallets WHERE application_id = $1 AND user_key = $2 AND chain = $3",
        )
        .bind(application_id)
        .bind(user_key)
        .bind(chain.as_str())
        .fetch_optional(&self.pool)
        .await?;

        Ok(wallet)
    }

    pub async fn find_by_address(
        &self,
        application_id: i32,
        address: &str,
        chain: ChainType,
    ) -> DbResult<Option<UserWallet>> {
        let wallet = sqlx::query_as::<_, UserWallet>(
            "SELECT * FROM user_wallets WHERE application_id = $1 AND address = $2 AND chain = $3",
        )
        .bind(application_id)
        .bind(address)
        .bind(chain.as_str())
        .fetch_optional(&self.pool)
        .await?;

        Ok(wallet)
    }

    pub async fn find_all_by_user(
        &self,
        application_id: i32,
        user_key: &str,
    ) -> DbResult<Vec<UserWallet>> {
        let wallets = sqlx::query_as::<_, UserWallet>(
            "SELECT * FROM user_wallets WHERE application_id = $1 AND user_key = $2 ORDER BY id",
        )
        .bind(application_id)
        .bind(user_key)
        .fetch_all(&self.pool)
        .await?;

        Ok(wallets)
    }

    pub async fn delete_by_user(&self, application_id: i32, user_key: &str) -> DbResult<()> {
        sqlx::query("DELETE FROM user_wallets WHERE application_id = $1 AND user_key = $2")
            .bind(application_id)
            .bind(user_key)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    pub async fn delete_all(&self, application_id: i32) -> DbResult<()> {
        sqlx::query("DELETE FROM user_wallets WHERE application_id = $1")
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
        models::user_wallet::UserWalletInput,
        utils::test_db::{create_persisted_application, reset_database},
    };
    use sqlx::PgPool;

    async fn setup_test_repository() -> (PgPool, UserWalletRepository) {
        let config = Config::load_test_env().expect("Failed to load configuration for tests");
        let pool = PgPool::connect(config.get_database_url())
            .await
            .expect("Failed to create pool.");

        reset_database(&pool).await;

        (pool.clone(), UserWalletRepository::new(&pool))
    }

    fn evm_wallet(application_id: i32, user_key: &str, address: &str) -> UserWallet {
        let input = UserWalletInput {
            chain: ChainType::Evm,
            address: address.to_string(),
            is_signup: Some(true),
            memo: Some("signup wallet".to_string()),
            extra: None,
        };
        UserWallet::new(application_id, user_key, input).unwrap()
    }

    #[tokio::test]
    async fn test_upsert_replaces_per_user_and_chain() {
        let (pool, repo) = setup_test_repository().await;
        let app = create_persisted_application(&pool, "acme").await;

        let created = repo
            .upsert(&evm_wallet(
                app.id,
                "user_01",
                "0xd8da6bf26964af9d7eed9e03e53415d37aa96045",
            ))
            .await
            .unwrap();
        assert_eq!(created.address, "0xd8dA6BF26964aF9D7eEd9e03E53415D37aA96045");
        assert!(created.created_at.is_some());

        // Same user and chain, new address: row is replaced, not duplicated
        let replaced = repo
            .upsert(&evm_wallet(
                app.id,
                "user_01",
                "0xfb6916095ca1df60bb79ce92ce3ea74c37c5d359",
            ))
            .await
            .unwrap();
        assert_eq!(replaced.id, created.id);
        assert_eq!(
            replaced.address,
            "0xfB6916095ca1df60bB79Ce92cE3Ea74c37c5d359"
        );

        let all = repo.find_all_by_user(app.id, "user_01").await.unwrap();
        assert_eq!(all.len(), 1);
    }

    #[tokio::test]
    async fn test_address_uniqueness_is_per_tenant() {
        let (pool, repo) = setup_test_repository().await;
        let app_a = create_persisted_application(&pool, "tenant_a").await;
        let app_b = create_persisted_application(&pool, "tenant_b").await;

        let address = "0xd8da6bf26964af9d7eed9e03e53415d37aa96045";
        repo.upsert(&evm_wallet(app_a.id, "user_01", address))
            .await
            .unwrap();

        // The same address binds fine under a different tenant
        repo.upsert(&evm_wallet(app_b.id, "user_99", address))
            .await
            .unwrap();

        // But a second user under the same tenant trips the unique index
        let duplicate = repo.upsert(&evm_wallet(app_a.id, "user_02", address)).await;
        assert!(duplicate.is_err());
    }

    #[tokio::test]
    async fn test_find_by_address_and_delete() {
        let (pool, repo) = setup_test_repository().await;
        let app = create_persisted_application(&pool, "acme").await;

        let wallet = repo
            .upsert(&evm_wallet(
                app.id,
                "user_01",
                "0xd8da6bf26964af9d7eed9e03e53415d37aa96045",
            ))
            .await
            .unwrap();

        let found = repo
            .find_by_address(app.id, &wallet.address, ChainType::Evm)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.user_key, "user_01");

        repo.delete_by_user(app.id, "user_01").await.unwrap();
        assert!(repo
            .find_by_user(app.id, "user_01", ChainType::Evm)
            .await
            .unwrap()
            .is_none());
    }
}
