//! Solana public keys and the well-known addresses the wall program uses.
//!
//! A Solana address is the Base58 encoding of 32 raw bytes. For wallets the
//! bytes are an Ed25519 public key; for PDAs they are an off-curve SHA-256
//! digest. Either way the bytes ARE the address, no hashing is applied.

use std::fmt;
use std::str::FromStr;

use crate::error::WallError;

/// A 32-byte Solana public key.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Pubkey([u8; 32]);

impl Pubkey {
    pub const fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub const fn to_bytes(self) -> [u8; 32] {
        self.0
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Copy a public key out of a 32-byte slice.
    pub fn try_from_slice(bytes: &[u8]) -> Result<Self, WallError> {
        let arr: [u8; 32] = bytes.try_into().map_err(|_| {
            WallError::InvalidAddress(format!("expected 32 bytes, got {}", bytes.len()))
        })?;
        Ok(Self(arr))
    }
}

impl AsRef<[u8]> for Pubkey {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<[u8; 32]> for Pubkey {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

impl fmt::Display for Pubkey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&bs58::encode(self.0).into_string())
    }
}

impl fmt::Debug for Pubkey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Pubkey({self})")
    }
}

impl FromStr for Pubkey {
    type Err = WallError;

    /// Parse a Base58 address. Anything that does not decode to exactly 32
    /// bytes is rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = bs58::decode(s)
            .into_vec()
            .map_err(|e| WallError::InvalidAddress(format!("base58 decode failed: {e}")))?;

        let arr: [u8; 32] = bytes.try_into().map_err(|v: Vec<u8>| {
            WallError::InvalidAddress(format!("expected 32 bytes, got {}", v.len()))
        })?;

        Ok(Self(arr))
    }
}

// ---------------------------------------------------------------------------
// Well-known addresses
// ---------------------------------------------------------------------------

/// The System Program: 32 zero bytes.
/// Base58: `11111111111111111111111111111111`
pub const SYSTEM_PROGRAM_ID: Pubkey = Pubkey::new([0u8; 32]);

/// The deployed wall program: `7UhisdAH7dosM1nfF1rbBXYv1Vtgr2yd6W4B7SuZJJVx`
pub const PROGRAM_ID: Pubkey = Pubkey::new([
    0x60, 0x3e, 0xd9, 0x0c, 0xe9, 0xf8, 0x3f, 0x47, 0x3b, 0x24, 0x24, 0xdb, 0xcd, 0xb4, 0x62,
    0x44, 0x44, 0x11, 0xa7, 0xc5, 0xaf, 0xe1, 0x1d, 0x1a, 0x73, 0x72, 0xc9, 0x10, 0x29, 0x55,
    0xd8, 0x5b,
]);

/// Mint and royalty proceeds land here: `6nJXxD7VQJpnpE3tdWmM9VjTnC5mB2oREeWh5B6EHuzK`
pub const TREASURY: Pubkey = Pubkey::new([
    0x55, 0xe5, 0x65, 0x7a, 0xc9, 0x8a, 0x91, 0x97, 0xf2, 0xe0, 0x2b, 0x49, 0x9f, 0xe0, 0xca,
    0xea, 0xc7, 0x92, 0xdf, 0xa0, 0xef, 0x0c, 0xc6, 0xf8, 0x00, 0xa0, 0x8c, 0x70, 0x12, 0x6d,
    0x8f, 0x3c,
]);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_program_address() {
        assert_eq!(
            SYSTEM_PROGRAM_ID.to_string(),
            "11111111111111111111111111111111"
        );
    }

    #[test]
    fn program_id_matches_base58() {
        assert_eq!(
            PROGRAM_ID.to_string(),
            "7UhisdAH7dosM1nfF1rbBXYv1Vtgr2yd6W4B7SuZJJVx"
        );
    }

    #[test]
    fn treasury_matches_base58() {
        assert_eq!(
            TREASURY.to_string(),
            "6nJXxD7VQJpnpE3tdWmM9VjTnC5mB2oREeWh5B6EHuzK"
        );
    }

    #[test]
    fn parse_and_display_roundtrip() {
        let address = "TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA";
        let key: Pubkey = address.parse().unwrap();
        assert_eq!(key.to_string(), address);
    }

    #[test]
    fn parse_garbage_fails() {
        let result = "not-a-valid-address!!!".parse::<Pubkey>();
        assert!(matches!(result, Err(WallError::InvalidAddress(_))));
    }

    #[test]
    fn parse_wrong_length_fails() {
        // "1" decodes to a single zero byte.
        let err = "1".parse::<Pubkey>().unwrap_err();
        assert!(err.to_string().contains("expected 32 bytes, got 1"));
    }

    #[test]
    fn try_from_slice_checks_length() {
        assert!(Pubkey::try_from_slice(&[7u8; 31]).is_err());
        let key = Pubkey::try_from_slice(&[7u8; 32]).unwrap();
        assert_eq!(key.to_bytes(), [7u8; 32]);
    }

    #[test]
    fn debug_shows_base58() {
        let debug = format!("{:?}", SYSTEM_PROGRAM_ID);
        assert_eq!(debug, "Pubkey(11111111111111111111111111111111)");
    }
}
