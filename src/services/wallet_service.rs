//! Wallet binding: the SIWE-style challenge/response protocol plus plain
//! CRUD over a user's wallet rows.

use std::sync::Arc;

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::db_persistence::{DbError, DbPersistence};
use crate::models::user_wallet::{ChainType, UserWallet, UserWalletInput};
use crate::models::ModelError;
use crate::siwe::{SiweError, SiweMessage, SIGN_IN_STATEMENT, SIWE_VERSION};
use crate::utils::evm_address::to_checksum_address;
use crate::utils::nonce::generate_nonce;

#[derive(Debug, Error)]
pub enum WalletError {
    #[error("Invalid {0} wallet address")]
    InvalidAddress(String),
    #[error("Unsupported chain type for signing: {0}")]
    UnsupportedChainType(String),
    #[error("Wallet address {0} already exists")]
    AlreadyBound(String),
    #[error("Wallet not found")]
    NotFound,
    #[error("Owner check required but no user query supplied")]
    OwnerCheckRequired,
    #[error("Expected message, signature, nonce and address on verify")]
    MalformedChallenge,
    #[error("Address mismatch")]
    AddressMismatch,
    #[error(transparent)]
    Siwe(#[from] SiweError),
    #[error(transparent)]
    Model(#[from] ModelError),
    #[error(transparent)]
    Database(#[from] DbError),
}

pub type WalletResult<T> = Result<T, WalletError>;

/// Caller-supplied proof target: the user the address is supposed to belong
/// to.
#[derive(Debug, Deserialize)]
pub struct ApplicationUserQuery {
    pub user_key: String,
}

#[derive(Debug, Deserialize)]
pub struct WalletSignRequestPayload {
    pub chain: ChainType,
    pub address: String,
    pub domain: String,
    pub uri: String,
    pub chain_id: u64,
    pub version: Option<String>,
    pub user_query: Option<ApplicationUserQuery>,
}

/// The challenge handed back to the client. The client signs `message` and
/// echoes the whole struct on verify.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct WalletSignRequestData {
    pub chain: ChainType,
    pub address: String,
    pub nonce: String,
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct WalletSignVerifyPayload {
    pub request: WalletSignRequestData,
    pub signature: String,
    pub user_query: Option<ApplicationUserQuery>,
}

#[derive(Debug, Serialize)]
pub struct WalletSignVerifyResult {
    pub address: String,
    pub expiration_time: Option<String>,
}

pub struct WalletService {
    db: Arc<DbPersistence>,
    require_owner_check: bool,
}

impl WalletService {
    pub fn new(db: Arc<DbPersistence>, require_owner_check: bool) -> Self {
        Self {
            db,
            require_owner_check,
        }
    }

    /// Issues a signing challenge for an EVM address. Other chain types
    /// never reach the challenge flow.
    pub async fn request_sign(
        &self,
        application_id: i32,
        payload: WalletSignRequestPayload,
    ) -> WalletResult<WalletSignRequestData> {
        self.check_owner(application_id, &payload.address, payload.chain, &payload.user_query)
            .await?;

        if payload.chain != ChainType::Evm {
            return Err(WalletError::UnsupportedChainType(
                payload.chain.as_str().to_string(),
            ));
        }

        let address = to_checksum_address(&payload.address)
            .ok_or_else(|| WalletError::InvalidAddress(payload.chain.as_str().to_string()))?;
        let nonce = generate_nonce();

        let message = SiweMessage {
            domain: payload.domain,
            address: address.clone(),
            statement: Some(SIGN_IN_STATEMENT.to_string()),
            uri: payload.uri,
            version: payload.version.unwrap_or_else(|| SIWE_VERSION.to_string()),
            chain_id: payload.chain_id,
            nonce: nonce.clone(),
            issued_at: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            expiration_time: None,
        };

        Ok(WalletSignRequestData {
            chain: payload.chain,
            address,
            nonce,
            message: message.prepare_message(),
        })
    }

    /// Verifies a signed challenge. On success the address comes back
    /// lowercased, ready to be bound.
    pub async fn verify_sign(
        &self,
        application_id: i32,
        payload: WalletSignVerifyPayload,
    ) -> WalletResult<WalletSignVerifyResult> {
        let request = &payload.request;

        self.check_owner(application_id, &request.address, request.chain, &payload.user_query)
            .await?;

        if request.chain != ChainType::Evm {
            return Err(WalletError::UnsupportedChainType(
                request.chain.as_str().to_string(),
            ));
        }
        if request.message.is_empty()
            || request.nonce.is_empty()
            || request.address.is_empty()
            || payload.signature.is_empty()
        {
            return Err(WalletError::MalformedChallenge);
        }

        let message = SiweMessage::parse(&request.message)?;
        message.verify(&payload.signature, &request.nonce)?;

        if !message.address.eq_ignore_ascii_case(&request.address) {
            return Err(WalletError::AddressMismatch);
        }

        Ok(WalletSignVerifyResult {
            address: request.address.to_lowercase(),
            expiration_time: message.expiration_time,
        })
    }

    /// Binds an address to a user. Any chain type is accepted here; the
    /// per-tenant (address, chain) uniqueness is enforced before writing.
    pub async fn upsert_wallet(
        &self,
        application_id: i32,
        user_key: &str,
        input: UserWalletInput,
    ) -> WalletResult<UserWallet> {
        let wallet = UserWallet::new(application_id, user_key, input)?;

        if let Some(existing) = self
            .db
            .wallets
            .find_by_address(application_id, &wallet.address, wallet.chain)
            .await?
        {
            if existing.user_key != wallet.user_key {
                return Err(WalletError::AlreadyBound(wallet.address));
            }
        }

        Ok(self.db.wallets.upsert(&wallet).await?)
    }

    pub async fn get_user_wallets(
        &self,
        application_id: i32,
        user_key: &str,
    ) -> WalletResult<Vec<UserWallet>> {
        Ok(self
            .db
            .wallets
            .find_all_by_user(application_id, user_key)
            .await?)
    }

    pub async fn destroy_wallets(&self, application_id: i32, user_key: &str) -> WalletResult<()> {
        Ok(self.db.wallets.delete_by_user(application_id, user_key).await?)
    }

    pub async fn destroy_all_wallets(&self, application_id: i32) -> WalletResult<()> {
        Ok(self.db.wallets.delete_all(application_id).await?)
    }

    /// When a user query is present (or demanded by configuration), the
    /// address must already belong to that user.
    async fn check_owner(
        &self,
        application_id: i32,
        address: &str,
        chain: ChainType,
        user_query: &Option<ApplicationUserQuery>,
    ) -> WalletResult<()> {
        let Some(query) = user_query else {
            if self.require_owner_check {
                return Err(WalletError::OwnerCheckRequired);
            }
            return Ok(());
        };

        let stored = chain
            .normalize(address)
            .map_err(|_| WalletError::InvalidAddress(chain.as_str().to_string()))?;
        let wallet = self
            .db
            .wallets
            .find_by_address(application_id, &stored, chain)
            .await?;

        match wallet {
            Some(wallet) if wallet.user_key == query.user_key => Ok(()),
            _ => Err(WalletError::NotFound),
        }
    }
}
