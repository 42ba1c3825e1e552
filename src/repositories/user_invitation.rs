use sqlx::PgPool;

use crate::{models::user_invitation::UserInvitation, repositories::DbResult};

#[derive(Clone, Debug)]
pub struct UserInvitationRepository {
    pool: PgPool,
}

impl UserInvitationRepository {
    pub fn new(pool: &PgPool) -> Self {
        Self { pool: pool.clone() }
    }

    pub async fn create(
        &self,
        application_id: i32,
        user_key: &str,
        code: &str,
        father_user_key: Option<&str>,
    ) -> DbResult<UserInvitation> {
        let invitation = sqlx::query_as::<_, UserInvitation>(
            r#"
            INSERT INTO user_invitations (application_id, user_key, code, father_user_key)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(application_id)
        .bind(user_key)
        .bind(code)
        .bind(father_user_key)
        .fetch_one(&self.pool)
        .await?;

        Ok(invitation)
    }

    pub async fn find_by_user(
        &self,
        application_id: i32,
        user_key: &str,
    ) -> DbResult<Option<UserInvitation>> {
        let invitation = sqlx::query_as::<_, UserInvitation>(
            "SELECT * FROM user_invitations WHERE application_id = $1 AND user_key = $2",
        )
        .bind(application_id)
        .bind(user_key)
        .fetch_optional(&self.pool)
        .await?;

        Ok(invitation)
    }

    pub async fn find_by_code(
        &self,
        application_id: i32,
        code: &str,
    ) -> DbResult<Option<UserInvitation>> {
        let invitation = sqlx::query_as::<_, UserInvitation>(
            "SELECT * FROM user_invitations WHERE application_id = $1 AND code = $2",
        )
        .bind(application_id)
        .bind(code)
        .fetch_optional(&self.pool)
        .await?;

        Ok(invitation)
    }

    pub async fn delete_all(&self, application_id: i32) -> DbResult<()> {
        sqlx::query("DELETE FROM user_invitations WHERE application_id = $1")
            .bind(application_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
