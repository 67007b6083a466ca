//! Seed-phrase identities
//!
//! Derives a secp256k1 signing identity from a 12 to 24-word BIP-39 mnemonic
//! along the Internet Computer derivation path, so the same phrase yields the
//! same principal as the JavaScript `Secp256k1KeyIdentity.fromSeedPhrase`.

use crate::error::IdentityError;
use bip32::{DerivationPath, XPrv};
use bip39::{Language, Mnemonic};
use candid::Principal;
use ic_agent::identity::Secp256k1Identity;
use ic_agent::Identity;
use std::fmt;
use std::sync::Arc;

/// BIP-44 path with the Internet Computer coin type (223).
pub const DERIVATION_PATH: &str = "m/44'/223'/0'/0/0";

/// A signing identity derived from a seed phrase
#[derive(Clone)]
pub struct SeedIdentity {
    identity: Arc<dyn Identity>,
    principal: Principal,
}

impl SeedIdentity {
    /// Derive the identity for `seed_phrase` with an empty BIP-39 password.
    ///
    /// Words may be separated by any whitespace.
    pub fn from_seed_phrase(seed_phrase: &str) -> Result<Self, IdentityError> {
        let normalized = seed_phrase.split_whitespace().collect::<Vec<_>>().join(" ");
        if normalized.is_empty() {
            return Err(IdentityError::InvalidSeedPhrase("empty seed phrase".into()));
        }

        let mnemonic = Mnemonic::parse_in_normalized(Language::English, &normalized)
            .map_err(|e| IdentityError::InvalidSeedPhrase(e.to_string()))?;
        let seed = mnemonic.to_seed_normalized("");

        let path: DerivationPath = DERIVATION_PATH
            .parse()
            .map_err(|e: bip32::Error| IdentityError::Derivation(e.to_string()))?;
        let xprv = XPrv::derive_from_path(seed, &path)
            .map_err(|e| IdentityError::Derivation(e.to_string()))?;

        let secret = k256::SecretKey::from_slice(&xprv.to_bytes())
            .map_err(|e| IdentityError::InvalidKey(e.to_string()))?;
        let identity = Secp256k1Identity::from_private_key(secret);
        let principal = identity.sender().map_err(IdentityError::Principal)?;

        Ok(Self {
            identity: Arc::new(identity),
            principal,
        })
    }

    /// Self-authenticating principal of this identity
    pub fn principal(&self) -> Principal {
        self.principal
    }

    /// Shared handle for building agents
    pub fn identity(&self) -> Arc<dyn Identity> {
        Arc::clone(&self.identity)
    }

    /// Sign arbitrary bytes, returning the raw signature
    pub fn sign(&self, content: &[u8]) -> Result<Vec<u8>, IdentityError> {
        let signature = self
            .identity
            .sign_arbitrary(content)
            .map_err(IdentityError::InvalidKey)?;
        signature
            .signature
            .ok_or_else(|| IdentityError::InvalidKey("identity produced no signature".into()))
    }
}

impl fmt::Debug for SeedIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SeedIdentity")
            .field("principal", &self.principal.to_text())
            .finish_non_exhaustive()
    }
}
