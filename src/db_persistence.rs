use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::repositories::{
    application::ApplicationRepository, engagement_cache::EngagementCacheRepository,
    user_invitation::UserInvitationRepository, user_twitter::UserTwitterRepository,
    user_wallet::UserWalletRepository, DbResult,
};

#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
    #[error("Application not found: {0}")]
    ApplicationNotFound(String),
}

#[derive(Debug, Clone)]
pub struct DbPersistence {
    pub applications: ApplicationRepository,
    pub wallets: UserWalletRepository,
    pub twitters: UserTwitterRepository,
    pub invitations: UserInvitationRepository,
    pub engagement_cache: EngagementCacheRepository,

    pool: PgPool,
}

impl DbPersistence {
    pub async fn new(database_url: &str) -> DbResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await?;

        sqlx::migrate!("./migrations").run(&pool).await?;

        let applications = ApplicationRepository::new(&pool);
        let wallets = UserWalletRepository::new(&pool);
        let twitters = UserTwitterRepository::new(&pool);
        let invitations = UserInvitationRepository::new(&pool);
        let engagement_cache = EngagementCacheRepository::new(&pool);

        Ok(Self {
            applications,
            wallets,
            twitters,
            invitations,
            engagement_cache,
            pool,
        })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}
