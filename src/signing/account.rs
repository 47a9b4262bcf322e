//! Account key management.
//!
//! # Security
//! - Private keys are loaded from a hex string, an environment variable, or a mnemonic
//! - Keys are never logged or serialized
//! - `Debug` output only shows the derived address

use alloy::primitives::{Address, B256};
use alloy::signers::local::coins_bip39::English;
use alloy::signers::local::{MnemonicBuilder, PrivateKeySigner};
use alloy::signers::{Signature, SignerSync};
use k256::elliptic_curve::sec1::ToEncodedPoint;

use crate::error::{MessageError, MessageResult};

/// Environment variable name for the private key.
pub const PRIVATE_KEY_ENV_VAR: &str = "TWENTYSIX_PRIVATE_KEY";

/// BIP-44 path of the first Ethereum account.
pub const DEFAULT_DERIVATION_PATH: &str = "m/44'/60'/0'/0/0";

/// A secp256k1 key pair and its derived address.
#[derive(Clone)]
pub struct Account {
    /// The underlying signer (private key).
    signer: PrivateKeySigner,
}

impl Account {
    /// Create an account from a hex-encoded private key string.
    ///
    /// # Arguments
    /// * `private_key_hex` - Hex string (with or without 0x prefix)
    pub fn from_private_key(private_key_hex: &str) -> MessageResult<Self> {
        let key_hex = private_key_hex
            .trim()
            .strip_prefix("0x")
            .unwrap_or(private_key_hex.trim());

        let signer: PrivateKeySigner = key_hex
            .parse()
            .map_err(|e| MessageError::Decode(format!("Invalid private key format: {}", e)))?;

        tracing::debug!(address = %signer.address(), "Account loaded from private key");

        Ok(Self { signer })
    }

    /// Load an account from the `TWENTYSIX_PRIVATE_KEY` environment variable.
    pub fn from_env() -> MessageResult<Self> {
        Self::from_env_var(PRIVATE_KEY_ENV_VAR)
    }

    /// Load an account from an arbitrary environment variable.
    pub fn from_env_var(var: &str) -> MessageResult<Self> {
        let private_key = std::env::var(var).map_err(|_| {
            MessageError::Decode(format!("Environment variable {} not set", var))
        })?;

        Self::from_private_key(&private_key)
    }

    /// Derive an account from a BIP-39 mnemonic phrase.
    ///
    /// An empty `derivation_path` selects [`DEFAULT_DERIVATION_PATH`]. A phrase or
    /// path that cannot be parsed is reported as [`MessageError::Decode`].
    pub fn from_mnemonic(phrase: &str, derivation_path: &str) -> MessageResult<Self> {
        let path = if derivation_path.is_empty() {
            DEFAULT_DERIVATION_PATH
        } else {
            derivation_path
        };

        let signer = MnemonicBuilder::<English>::default()
            .phrase(phrase.trim())
            .derivation_path(path)
            .map_err(|e| MessageError::Decode(format!("Invalid derivation path '{}': {}", path, e)))?
            .build()
            .map_err(|e| MessageError::Decode(format!("Invalid mnemonic: {}", e)))?;

        tracing::debug!(address = %signer.address(), path = path, "Account derived from mnemonic");

        Ok(Self { signer })
    }

    /// Get the account's address.
    pub fn address(&self) -> Address {
        self.signer.address()
    }

    /// Checksummed address string, as carried in the `sender` field.
    pub fn address_string(&self) -> String {
        self.signer.address().to_checksum(None)
    }

    /// Uncompressed SEC1 public key (65 bytes, leading `0x04`).
    pub fn public_key(&self) -> Vec<u8> {
        let public_key = k256::PublicKey::from(self.signer.credential().verifying_key());
        public_key.to_encoded_point(false).as_bytes().to_vec()
    }

    /// Sign a 32-byte prehashed digest.
    pub(crate) fn sign_digest(&self, digest: &B256) -> MessageResult<Signature> {
        self.signer
            .sign_hash_sync(digest)
            .map_err(|e| MessageError::Decode(format!("Signing failed: {}", e)))
    }
}

impl std::fmt::Debug for Account {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Account")
            .field("address", &self.address_string())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::hex;

    // Well-known test private key (Anvil's first account)
    const TEST_PRIVATE_KEY: &str = "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
    const TEST_ADDRESS: &str = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266";
    const TEST_PUBLIC_KEY: &str = "048318535b54105d4a7aae60c08fc45f9687181b4fdfc625bd1a753fa7397fed753547f11ca8696646f2f3acb08e31016afac23e630c5d11f59f61fef57b0d2aa5";
    const TEST_MNEMONIC: &str = "test test test test test test test test test test test junk";

    #[test]
    fn test_account_from_private_key() {
        let account = Account::from_private_key(TEST_PRIVATE_KEY).unwrap();
        assert_eq!(account.address_string(), TEST_ADDRESS);
        assert_eq!(hex::encode(account.public_key()), TEST_PUBLIC_KEY);
    }

    #[test]
    fn test_account_with_0x_prefix() {
        let account = Account::from_private_key(&format!("0x{}", TEST_PRIVATE_KEY)).unwrap();
        assert_eq!(account.address_string(), TEST_ADDRESS);
        assert_eq!(hex::encode(account.public_key()), TEST_PUBLIC_KEY);
    }

    #[test]
    fn test_invalid_private_key() {
        let result = Account::from_private_key("invalid_key");
        assert!(matches!(result, Err(MessageError::Decode(_))));
        assert!(result.unwrap_err().to_string().contains("Invalid private key"));
    }

    #[test]
    fn test_account_from_mnemonic() {
        // Anvil's mnemonic derives the same first account as TEST_PRIVATE_KEY.
        let account = Account::from_mnemonic(TEST_MNEMONIC, "").unwrap();
        assert_eq!(account.address_string(), TEST_ADDRESS);

        let second = Account::from_mnemonic(TEST_MNEMONIC, "m/44'/60'/0'/0/1").unwrap();
        assert_ne!(second.address(), account.address());
    }

    #[test]
    fn test_invalid_mnemonic_is_an_error() {
        let result = Account::from_mnemonic("not a valid phrase", "");
        assert!(matches!(result, Err(MessageError::Decode(_))));

        let result = Account::from_mnemonic(TEST_MNEMONIC, "m/not/a/path");
        assert!(matches!(result, Err(MessageError::Decode(_))));
    }

    #[test]
    fn test_from_env_var_missing() {
        let result = Account::from_env_var("TWENTYSIX_TEST_UNSET_VARIABLE");
        assert!(result.unwrap_err().to_string().contains("not set"));
    }

    #[test]
    fn test_debug_hides_key() {
        let account = Account::from_private_key(TEST_PRIVATE_KEY).unwrap();
        let debug = format!("{:?}", account);
        assert!(debug.contains(TEST_ADDRESS));
        assert!(!debug.contains(TEST_PRIVATE_KEY));
    }
}
