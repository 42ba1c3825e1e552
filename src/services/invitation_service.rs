//! Invitation codes: one per user per tenant, generated from the tenant's
//! configured code format, optionally recording who referred the user.

use std::sync::Arc;

use thiserror::Error;
use tracing::warn;

use crate::db_persistence::{DbError, DbPersistence};
use crate::models::application::Application;
use crate::models::user_invitation::UserInvitation;
use crate::utils::nonce::random_code;

/// Collision retries before code generation gives up.
pub const MAX_CODE_ATTEMPTS: u32 = 5;

#[derive(Debug, Error)]
pub enum InvitationError {
    #[error("User already has an invitation code")]
    AlreadyExists,
    #[error("Invalid referral code: {0}")]
    InvalidReferralCode(String),
    #[error("Could not generate a unique invitation code")]
    CodeGenerationExhausted,
    #[error(transparent)]
    Database(#[from] DbError),
}

pub type InvitationResult<T> = Result<T, InvitationError>;

pub struct InvitationService {
    db: Arc<DbPersistence>,
}

impl InvitationService {
    pub fn new(db: Arc<DbPersistence>) -> Self {
        Self { db }
    }

    /// Returns the user's invitation code, minting one on first access.
    pub async fn get_user_invitation_code(
        &self,
        application: &Application,
        user_key: &str,
    ) -> InvitationResult<UserInvitation> {
        if let Some(existing) = self
            .db
            .invitations
            .find_by_user(application.id, user_key)
            .await?
        {
            return Ok(existing);
        }

        let code = self.generate_unique_code(application).await?;
        Ok(self
            .db
            .invitations
            .create(application.id, user_key, &code, None)
            .await?)
    }

    /// Creates the user's invitation row explicitly, optionally crediting
    /// the referrer whose code was used. Fails when the user already has one
    /// or the referral code resolves to nobody.
    pub async fn create_user_invitation(
        &self,
        application: &Application,
        user_key: &str,
        referral_code: Option<&str>,
    ) -> InvitationResult<UserInvitation> {
        if self
            .db
            .invitations
            .find_by_user(application.id, user_key)
            .await?
            .is_some()
        {
            return Err(InvitationError::AlreadyExists);
        }

        let father_user_key = match referral_code {
            Some(code) => {
                let parent = self
                    .db
                    .invitations
                    .find_by_code(application.id, code)
                    .await?
                    .ok_or_else(|| InvitationError::InvalidReferralCode(code.to_string()))?;
                Some(parent.user_key)
            }
            None => None,
        };

        let code = self.generate_unique_code(application).await?;
        Ok(self
            .db
            .invitations
            .create(application.id, user_key, &code, father_user_key.as_deref())
            .await?)
    }

    pub async fn destroy_all_invitations(&self, application_id: i32) -> InvitationResult<()> {
        Ok(self.db.invitations.delete_all(application_id).await?)
    }

    async fn generate_unique_code(&self, application: &Application) -> InvitationResult<String> {
        let format = application.code_format();

        for attempt in 0..MAX_CODE_ATTEMPTS {
            let code = random_code(&format.alphabet, format.size);
            if self
                .db
                .invitations
                .find_by_code(application.id, &code)
                .await?
                .is_none()
            {
                return Ok(code);
            }
            warn!(attempt, "invitation code collision, retrying");
        }

        Err(InvitationError::CodeGenerationExhausted)
    }
}
