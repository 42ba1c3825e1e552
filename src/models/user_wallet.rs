use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{postgres::PgRow, FromRow, Row};

use crate::models::{ModelError, ModelResult};
use crate::utils::btc_address_validator::is_valid_btc_address;
use crate::utils::evm_address::{is_valid_evm_address, to_checksum_address};
use crate::utils::sei_address_validator::is_valid_sei_address;

/// The closed set of address kinds a wallet row can carry.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ChainType {
    Evm,
    Btc,
    Sei,
    Email,
}

impl ChainType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChainType::Evm => "evm",
            ChainType::Btc => "btc",
            ChainType::Sei => "sei",
            ChainType::Email => "email",
        }
    }

    pub fn parse(value: &str) -> ModelResult<Self> {
        match value {
            "evm" => Ok(ChainType::Evm),
            "btc" => Ok(ChainType::Btc),
            "sei" => Ok(ChainType::Sei),
            "email" => Ok(ChainType::Email),
            other => Err(ModelError::InvalidInput(format!(
                "unknown chain type: {other}"
            ))),
        }
    }

    /// Structural validity of an address for this chain.
    pub fn validate(&self, address: &str) -> bool {
        match self {
            ChainType::Evm => is_valid_evm_address(address),
            ChainType::Btc => is_valid_btc_address(address),
            ChainType::Sei => is_valid_sei_address(address),
            ChainType::Email => is_valid_email(address),
        }
    }

    /// Canonical stored form of an address. EVM addresses are rendered with
    /// their EIP-55 checksum casing; other chains are stored verbatim.
    pub fn normalize(&self, address: &str) -> ModelResult<String> {
        let invalid =
            || ModelError::InvalidInput(format!("invalid {} address: {address}", self.as_str()));

        match self {
            ChainType::Evm => to_checksum_address(address).ok_or_else(invalid),
            _ if self.validate(address) => Ok(address.to_string()),
            _ => Err(invalid()),
        }
    }
}

impl std::fmt::Display for ChainType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

fn is_valid_email(address: &str) -> bool {
    let Some((local, domain)) = address.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.is_empty()
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !address.chars().any(char::is_whitespace)
}

/// One wallet address bound to a user of a tenant.
#[derive(Debug, Serialize, Clone)]
pub struct UserWallet {
    pub id: i64,
    #[serde(skip_serializing)]
    pub application_id: i32,
    pub user_key: String,
    pub chain: ChainType,
    pub address: String,
    pub is_signup: bool,
    pub memo: Option<String>,
    pub extra: Option<serde_json::Value>,
    pub created_at: Option<DateTime<Utc>>,
}

impl UserWallet {
    pub fn new(application_id: i32, user_key: &str, input: UserWalletInput) -> ModelResult<Self> {
        if user_key.is_empty() {
            return Err(ModelError::InvalidInput("empty user key".to_string()));
        }
        let address = input.chain.normalize(&input.address)?;

        Ok(UserWallet {
            id: 0,
            application_id,
            user_key: user_key.to_string(),
            chain: input.chain,
            address,
            is_signup: input.is_signup.unwrap_or(false),
            memo: input.memo,
            extra: input.extra,
            created_at: None,
        })
    }
}

impl<'r> FromRow<'r, PgRow> for UserWallet {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        let chain: String = row.try_get("chain")?;
        let chain = ChainType::parse(&chain).map_err(|e| sqlx::Error::ColumnDecode {
            index: "chain".to_string(),
            source: Box::new(e),
        })?;

        Ok(UserWallet {
            id: row.try_get("id")?,
            application_id: row.try_get("application_id")?,
            user_key: row.try_get("user_key")?,
            chain,
            address: row.try_get("address")?,
            is_signup: row.try_get("is_signup")?,
            memo: row.try_get("memo")?,
            extra: row.try_get("extra")?,
            created_at: row.try_get("created_at")?,
        })
    }
}

// An unvalidated version that we can deserialize directly from JSON
#[derive(Debug, Deserialize)]
pub struct UserWalletInput {
    pub chain: ChainType,
    pub address: String,
    pub is_signup: Option<bool>,
    pub memo: Option<String>,
    pub extra: Option<serde_json::Value>,
}
