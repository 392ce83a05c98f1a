//! # Caller Identity
//!
//! Turns the creator credential of a proposal into the account identifier
//! the token ledger keys balances by.

use sha2::{Digest, Sha256};
use shared_types::entities::{Credential, Identity};
use shared_types::errors::ContractError;

use crate::config::IdentityMode;

/// Derives a stable identity from a credential.
pub trait IdentityProvider: Send + Sync {
    /// Identity of the credential's holder. Fails with
    /// `ContractError::Identity` when the credential is unusable.
    fn identify(&self, credential: &Credential) -> Result<Identity, ContractError>;
}

fn require_certificate(credential: &Credential) -> Result<(), ContractError> {
    if credential.certificate.is_empty() {
        return Err(ContractError::Identity(
            "creator certificate is empty".to_string(),
        ));
    }
    Ok(())
}

/// Lowercase hex of `SHA-256(mspId || 0x00 || certificate)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct CertificateDigestProvider;

impl IdentityProvider for CertificateDigestProvider {
    fn identify(&self, credential: &Credential) -> Result<Identity, ContractError> {
        require_certificate(credential)?;
        if credential.msp_id.is_empty() {
            return Err(ContractError::Identity("creator MSP id is empty".to_string()));
        }

        let mut hasher = Sha256::new();
        hasher.update(credential.msp_id.as_bytes());
        hasher.update([0u8]);
        hasher.update(&credential.certificate);
        Ok(Identity::new(hex::encode(hasher.finalize())))
    }
}

/// The certificate field carries the caller's public key as UTF-8 text.
#[derive(Debug, Clone, Copy, Default)]
pub struct PublicKeyProvider;

impl IdentityProvider for PublicKeyProvider {
    fn identify(&self, credential: &Credential) -> Result<Identity, ContractError> {
        require_certificate(credential)?;
        let key = std::str::from_utf8(&credential.certificate)
            .map_err(|e| ContractError::Identity(format!("public key is not UTF-8: {e}")))?;
        Ok(Identity::from(key))
    }
}

/// Provider for a configured mode.
#[must_use]
pub fn provider_for(mode: IdentityMode) -> Box<dyn IdentityProvider> {
    match mode {
        IdentityMode::CertificateDigest => Box::new(CertificateDigestProvider),
        IdentityMode::PublicKey => Box::new(PublicKeyProvider),
    }
}
