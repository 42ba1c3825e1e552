use sqlx::PgPool;

use crate::{
    config::Config,
    db_persistence::DbPersistence,
    models::application::Application,
    models::user_twitter::{TwitterToken, TwitterUserInfo, UserTwitter},
    twitter_api::OAUTH_SCOPES,
};

pub async fn reset_database(pool: &PgPool) {
    sqlx::query(
        "TRUNCATE applications, user_wallets, user_twitters, user_invitations, engagement_caches \
         RESTART IDENTITY CASCADE",
    )
    .execute(pool)
    .await
    .expect("Failed to truncate tables for tests");
}

/// Opens the test database, running migrations on first use.
pub async fn test_db_persistence() -> DbPersistence {
    let config = Config::load_test_env().expect("Failed to load configuration for tests");
    DbPersistence::new(config.get_database_url())
        .await
        .expect("Failed to connect to test database")
}

/// Inserts a tenant row directly; the API itself never creates tenants.
pub async fn create_persisted_application(pool: &PgPool, name: &str) -> Application {
    sqlx::query_as::<_, Application>(
        r#"
        INSERT INTO applications (name, apikey, twitter_client_id, twitter_client_secret)
        VALUES ($1, $2, $3, $4)
        RETURNING *
        "#,
    )
    .bind(name)
    .bind(format!("apikey-{name}"))
    .bind(format!("client-id-{name}"))
    .bind(format!("client-secret-{name}"))
    .fetch_one(pool)
    .await
    .expect("Failed to insert test application")
}

/// An unpersisted tenant for tests that never touch the database.
pub fn test_application(id: i32, name: &str) -> Application {
    Application {
        id,
        name: name.to_string(),
        apikey: format!("apikey-{name}"),
        twitter_client_id: format!("client-id-{name}"),
        twitter_client_secret: format!("client-secret-{name}"),
        fake_verify: false,
        disabled: false,
        code_format: None,
        created_at: None,
    }
}

pub async fn create_persisted_twitter_binding(
    db: &DbPersistence,
    application_id: i32,
    user_key: &str,
    twitter_id: &str,
    token: TwitterToken,
) -> UserTwitter {
    let info = TwitterUserInfo {
        id: twitter_id.to_string(),
        name: format!("User {twitter_id}"),
        username: format!("handle_{twitter_id}"),
    };
    let binding = UserTwitter::new(
        application_id,
        user_key,
        &info,
        token,
        OAUTH_SCOPES.iter().map(|s| s.to_string()).collect(),
        "https://app.example.com/callback",
    );
    db.twitters
        .upsert(&binding)
        .await
        .expect("Failed to insert test twitter binding")
}
