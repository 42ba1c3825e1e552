//! ERC-4361 ("Sign-In with Ethereum") message rendering, parsing and
//! EIP-191 personal-sign verification.

use k256::ecdsa::{RecoveryId, Signature, VerifyingKey};
use thiserror::Error;

use crate::utils::evm_address::keccak256;

/// Statement embedded in every challenge message.
pub const SIGN_IN_STATEMENT: &str = "Sign in with Ethereum to the app.";

/// Default message version per ERC-4361.
pub const SIWE_VERSION: &str = "1";

#[derive(Debug, Error)]
pub enum SiweError {
    #[error("Malformed sign-in message: {0}")]
    Malformed(String),
    #[error("Invalid signature encoding: {0}")]
    InvalidSignature(String),
    #[error("Nonce mismatch")]
    NonceMismatch,
    #[error("Signature does not match address")]
    SignatureMismatch,
}

/// A parsed or to-be-rendered sign-in message.
#[derive(Debug, Clone, PartialEq)]
pub struct SiweMessage {
    pub domain: String,
    pub address: String,
    pub statement: Option<String>,
    pub uri: String,
    pub version: String,
    pub chain_id: u64,
    pub nonce: String,
    pub issued_at: String,
    pub expiration_time: Option<String>,
}

impl SiweMessage {
    /// Renders the exact plaintext the wallet signs.
    pub fn prepare_message(&self) -> String {
        let mut message = format!(
            "{} wants you to sign in with your Ethereum account:\n{}\n\n",
            self.domain, self.address
        );
        if let Some(statement) = &self.statement {
            message.push_str(statement);
            message.push('\n');
        }
        message.push('\n');
        message.push_str(&format!(
            "URI: {}\nVersion: {}\nChain ID: {}\nNonce: {}\nIssued At: {}",
            self.uri, self.version, self.chain_id, self.nonce, self.issued_at
        ));
        if let Some(expiration_time) = &self.expiration_time {
            message.push_str(&format!("\nExpiration Time: {}", expiration_time));
        }
        message
    }

    /// Parses the plaintext form produced by [`prepare_message`].
    ///
    /// [`prepare_message`]: Self::prepare_message
    pub fn parse(message: &str) -> Result<Self, SiweError> {
        let malformed = |what: &str| SiweError::Malformed(what.to_string());

        let mut lines = message.lines();
        let domain = lines
            .next()
            .and_then(|l| l.strip_suffix(" wants you to sign in with your Ethereum account:"))
            .ok_or_else(|| malformed("missing preamble"))?
            .to_string();
        let address = lines
            .next()
            .filter(|l| !l.is_empty())
            .ok_or_else(|| malformed("missing address"))?
            .to_string();
        if lines.next() != Some("") {
            return Err(malformed("expected blank line after address"));
        }

        let mut statement = None;
        let line = lines.next().ok_or_else(|| malformed("truncated message"))?;
        if !line.is_empty() {
            statement = Some(line.to_string());
            if lines.next() != Some("") {
                return Err(malformed("expected blank line after statement"));
            }
        }

        let mut uri = None;
        let mut version = None;
        let mut chain_id = None;
        let mut nonce = None;
        let mut issued_at = None;
        let mut expiration_time = None;

        for line in lines {
            if let Some(value) = line.strip_prefix("URI: ") {
                uri = Some(value.to_string());
            } else if let Some(value) = line.strip_prefix("Version: ") {
                version = Some(value.to_string());
            } else if let Some(value) = line.strip_prefix("Chain ID: ") {
                chain_id = Some(
                    value
                        .parse::<u64>()
                        .map_err(|_| malformed("invalid chain id"))?,
                );
            } else if let Some(value) = line.strip_prefix("Nonce: ") {
                nonce = Some(value.to_string());
            } else if let Some(value) = line.strip_prefix("Issued At: ") {
                issued_at = Some(value.to_string());
            } else if let Some(value) = line.strip_prefix("Expiration Time: ") {
                expiration_time = Some(value.to_string());
            }
        }

        Ok(Self {
            domain,
            address,
            statement,
            uri: uri.ok_or_else(|| malformed("missing URI"))?,
            version: version.ok_or_else(|| malformed("missing Version"))?,
            chain_id: chain_id.ok_or_else(|| malformed("missing Chain ID"))?,
            nonce: nonce.ok_or_else(|| malformed("missing Nonce"))?,
            issued_at: issued_at.ok_or_else(|| malformed("missing Issued At"))?,
            expiration_time,
        })
    }

    /// Verifies an EIP-191 personal-sign signature over this message.
    ///
    /// Checks the nonce against the server-issued one, recovers the signing
    /// key from the 65-byte `r || s || v` signature and compares the derived
    /// address with the one claimed in the message (case-insensitive).
    pub fn verify(&self, signature: &str, expected_nonce: &str) -> Result<(), SiweError> {
        if self.nonce != expected_nonce {
            return Err(SiweError::NonceMismatch);
        }

        let raw = hex::decode(signature.strip_prefix("0x").unwrap_or(signature))
            .map_err(|e| SiweError::InvalidSignature(e.to_string()))?;
        if raw.len() != 65 {
            return Err(SiweError::InvalidSignature(format!(
                "expected 65 bytes, got {}",
                raw.len()
            )));
        }

        let signature = Signature::from_slice(&raw[..64])
            .map_err(|e| SiweError::InvalidSignature(e.to_string()))?;
        let recovery_id = normalize_recovery_id(raw[64])?;

        let prehash = eip191_hash(&self.prepare_message());
        let key = VerifyingKey::recover_from_prehash(&prehash, &signature, recovery_id)
            .map_err(|_| SiweError::SignatureMismatch)?;

        let recovered = address_from_verifying_key(&key);
        if recovered.eq_ignore_ascii_case(&self.address) {
            Ok(())
        } else {
            Err(SiweError::SignatureMismatch)
        }
    }
}

/// Hashes a message under the `"\x19Ethereum Signed Message:\n" + len` prefix.
pub fn eip191_hash(message: &str) -> [u8; 32] {
    let mut data = format!("\x19Ethereum Signed Message:\n{}", message.len()).into_bytes();
    data.extend_from_slice(message.as_bytes());
    keccak256(&data)
}

/// Derives the lowercase 0x-address from a recovered public key.
pub fn address_from_verifying_key(key: &VerifyingKey) -> String {
    let point = key.to_encoded_point(false);
    // Skip the 0x04 uncompressed-point tag, keep the last 20 hash bytes
    let hash = keccak256(&point.as_bytes()[1..]);
    format!("0x{}", hex::encode(&hash[12..]))
}

/// Maps the `v` byte to a recovery id. Wallets emit 27/28; raw ids 0/1 are
/// accepted as well.
fn normalize_recovery_id(v: u8) -> Result<RecoveryId, SiweError> {
    let id = match v {
        0 | 1 => v,
        27 | 28 => v - 27,
        other => {
            return Err(SiweError::InvalidSignature(format!(
                "invalid recovery byte {}",
                other
            )))
        }
    };
    RecoveryId::try_from(id).map_err(|e| SiweError::InvalidSignature(e.to_string()))
}
