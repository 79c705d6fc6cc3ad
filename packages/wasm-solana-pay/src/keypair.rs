//! Ed25519 payer keypairs.
//!
//! Wallet integrations normally sign elsewhere; a local keypair is used for
//! tests, scripts and the [`TransactionSigner`](crate::client::TransactionSigner)
//! implementation.

use solana_sdk::pubkey::Pubkey;
use solana_sdk::signer::Signer;

use crate::error::WasmSolanaPayError;

/// Re-export the underlying Solana Keypair type.
pub use solana_sdk::signature::Keypair;

pub trait KeypairExt {
    /// Keypair from a 32-byte Ed25519 seed.
    fn from_seed_bytes(seed: &[u8]) -> Result<Keypair, WasmSolanaPayError>;

    /// Keypair from the 64-byte Solana CLI format (seed followed by public key).
    fn from_solana_secret_key(secret_key: &[u8]) -> Result<Keypair, WasmSolanaPayError>;

    fn address(&self) -> Pubkey;
}

impl KeypairExt for Keypair {
    fn from_seed_bytes(seed: &[u8]) -> Result<Keypair, WasmSolanaPayError> {
        let bytes: [u8; 32] = seed.try_into().map_err(|_| {
            WasmSolanaPayError::Signing(format!("Seed must be 32 bytes, got {}", seed.len()))
        })?;
        Ok(Keypair::new_from_array(bytes))
    }

    fn from_solana_secret_key(secret_key: &[u8]) -> Result<Keypair, WasmSolanaPayError> {
        if secret_key.len() != 64 {
            return Err(WasmSolanaPayError::Signing(format!(
                "Solana secret key must be 64 bytes, got {}",
                secret_key.len()
            )));
        }
        Keypair::try_from(secret_key)
            .map_err(|e| WasmSolanaPayError::Signing(format!("Invalid keypair: {}", e)))
    }

    fn address(&self) -> Pubkey {
        self.pubkey()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEED: [u8; 32] = [
        210, 49, 239, 175, 249, 91, 42, 66, 77, 70, 3, 144, 23, 0, 145, 152, 86, 35, 166, 11, 129,
        49, 201, 162, 255, 195, 94, 229, 98, 78, 76, 38,
    ];

    #[test]
    fn test_known_seed_address() {
        let keypair = Keypair::from_seed_bytes(&SEED).unwrap();
        assert_eq!(
            keypair.address().to_string(),
            "FKjSjCqByQRwSzZoMXA7bKnDbJe41YgJTHFFzBeC42bH"
        );
    }

    #[test]
    fn test_solana_secret_key_matches_seed() {
        let keypair = Keypair::from_seed_bytes(&SEED).unwrap();
        let mut secret = [0u8; 64];
        secret[..32].copy_from_slice(&SEED);
        secret[32..].copy_from_slice(keypair.address().as_ref());

        let restored = Keypair::from_solana_secret_key(&secret).unwrap();
        assert_eq!(restored.address(), keypair.address());
    }

    #[test]
    fn test_bad_lengths() {
        assert!(matches!(
            Keypair::from_seed_bytes(&[0u8; 31]),
            Err(WasmSolanaPayError::Signing(_))
        ));
        assert!(matches!(
            Keypair::from_solana_secret_key(&[0u8; 63]),
            Err(WasmSolanaPayError::Signing(_))
        ));
    }
}
