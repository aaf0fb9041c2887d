//! Fixed-offset byte layouts of the registry and wall accounts.
//!
//! Every offset below is a contract with the deployed program's memory
//! layout. Each account has exactly one schema table, and both the decoders
//! and the fixture encoders read it, so there is a single place to change.
//!
//! ```text
//! Registry (74 bytes):
//!   discriminator   8    [0..8)
//!   authority      32    [8..40)
//!   treasury       32    [40..72)
//!   mint_count      2    [72..74)   u16 LE
//!
//! Wall (82 bytes):
//!   discriminator   8    [0..8)     must equal WALL_DISCRIMINATOR
//!   owner          32    [8..40)
//!   cast_hash      32    [40..72)   all zero = unset
//!   price           8    [72..80)   u64 LE, lamports
//!   state           1    [80]       0 Inactive, 1 Active, 2 Listed
//!   bump            1    [81]
//! ```

use std::fmt;

use crate::address::Pubkey;
use crate::error::WallError;

/// Total number of walls the program will ever mint.
pub const TOTAL_SUPPLY: u16 = 888;

/// Anchor account tag: `sha256("account:Registry")[..8]`.
pub const REGISTRY_DISCRIMINATOR: [u8; 8] = [47, 174, 110, 246, 184, 182, 252, 218];

/// Anchor account tag: `sha256("account:Wall")[..8]`.
pub const WALL_DISCRIMINATOR: [u8; 8] = [246, 132, 243, 249, 165, 137, 54, 35];

// ---------------------------------------------------------------------------
// Schema
// ---------------------------------------------------------------------------

/// One named field of an account layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    pub name: &'static str,
    pub offset: usize,
    pub width: usize,
}

impl Field {
    pub const fn first(name: &'static str, width: usize) -> Self {
        Self {
            name,
            offset: 0,
            width,
        }
    }

    /// A field laid out immediately after `prev`.
    pub const fn after(prev: &Field, name: &'static str, width: usize) -> Self {
        Self {
            name,
            offset: prev.end(),
            width,
        }
    }

    pub const fn end(&self) -> usize {
        self.offset + self.width
    }

    /// Caller must have checked `data.len() >= self.end()`.
    fn bytes<'a>(&self, data: &'a [u8]) -> &'a [u8] {
        &data[self.offset..self.end()]
    }

    fn array<const N: usize>(&self, data: &[u8]) -> [u8; N] {
        let mut out = [0u8; N];
        out.copy_from_slice(self.bytes(data));
        out
    }

    fn write(&self, buf: &mut [u8], value: &[u8]) {
        buf[self.offset..self.end()].copy_from_slice(value);
    }
}

pub mod registry_layout {
    use super::Field;

    pub const DISCRIMINATOR: Field = Field::first("discriminator", 8);
    pub const AUTHORITY: Field = Field::after(&DISCRIMINATOR, "authority", 32);
    pub const TREASURY: Field = Field::after(&AUTHORITY, "treasury", 32);
    pub const MINT_COUNT: Field = Field::after(&TREASURY, "mint_count", 2);

    pub const FIELDS: [Field; 4] = [DISCRIMINATOR, AUTHORITY, TREASURY, MINT_COUNT];

    /// Minimum account length the decoder accepts.
    pub const LEN: usize = MINT_COUNT.end();
}

pub mod wall_layout {
    use super::Field;

    pub const DISCRIMINATOR: Field = Field::first("discriminator", 8);
    pub const OWNER: Field = Field::after(&DISCRIMINATOR, "owner", 32);
    pub const CAST_HASH: Field = Field::after(&OWNER, "cast_hash", 32);
    pub const PRICE: Field = Field::after(&CAST_HASH, "price", 8);
    pub const STATE: Field = Field::after(&PRICE, "state", 1);
    pub const BUMP: Field = Field::after(&STATE, "bump", 1);

    pub const FIELDS: [Field; 6] = [DISCRIMINATOR, OWNER, CAST_HASH, PRICE, STATE, BUMP];

    /// Minimum account length the decoder accepts.
    pub const LEN: usize = BUMP.end();
}

fn check_len(account: &'static str, data: &[u8], expected: usize) -> Result<(), WallError> {
    if data.len() < expected {
        return Err(WallError::MalformedAccount {
            account,
            expected,
            actual: data.len(),
        });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

/// The registry singleton: global mint progress and configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegistryAccount {
    pub authority: Pubkey,
    pub treasury: Pubkey,
    pub mint_count: u16,
}

impl RegistryAccount {
    pub fn decode(data: &[u8]) -> Result<Self, WallError> {
        use registry_layout::*;

        check_len("registry", data, LEN)?;

        Ok(Self {
            authority: Pubkey::new(AUTHORITY.array(data)),
            treasury: Pubkey::new(TREASURY.array(data)),
            mint_count: u16::from_le_bytes(MINT_COUNT.array(data)),
        })
    }

    /// The account image the program would store for this registry.
    pub fn encode(&self) -> Vec<u8> {
        use registry_layout::*;

        let mut buf = vec![0u8; LEN];
        DISCRIMINATOR.write(&mut buf, &REGISTRY_DISCRIMINATOR);
        AUTHORITY.write(&mut buf, self.authority.as_bytes());
        TREASURY.write(&mut buf, self.treasury.as_bytes());
        MINT_COUNT.write(&mut buf, &self.mint_count.to_le_bytes());
        buf
    }

    pub fn remaining_supply(&self) -> u16 {
        TOTAL_SUPPLY.saturating_sub(self.mint_count)
    }

    pub fn is_sold_out(&self) -> bool {
        self.mint_count >= TOTAL_SUPPLY
    }

    /// Index the next mint will occupy. This is also the seed of the wall
    /// PDA the mint instruction must reference.
    pub fn next_mint_index(&self) -> Result<u16, WallError> {
        if self.is_sold_out() {
            return Err(WallError::SupplyExhausted {
                minted: self.mint_count,
                total: TOTAL_SUPPLY,
            });
        }
        Ok(self.mint_count)
    }
}

// ---------------------------------------------------------------------------
// Wall
// ---------------------------------------------------------------------------

/// Lifecycle state stored in the wall's `state` byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WallState {
    Inactive,
    Active,
    Listed,
}

impl WallState {
    pub fn as_u8(self) -> u8 {
        match self {
            WallState::Inactive => 0,
            WallState::Active => 1,
            WallState::Listed => 2,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            WallState::Inactive => "Inactive",
            WallState::Active => "Active",
            WallState::Listed => "Listed",
        }
    }
}

impl TryFrom<u8> for WallState {
    type Error = WallError;

    fn try_from(byte: u8) -> Result<Self, Self::Error> {
        match byte {
            0 => Ok(WallState::Inactive),
            1 => Ok(WallState::Active),
            2 => Ok(WallState::Listed),
            other => Err(WallError::UnknownState(other)),
        }
    }
}

impl fmt::Display for WallState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A decoded wall account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WallAccount {
    pub owner: Pubkey,
    /// `None` while the wall has never been activated.
    pub cast_hash: Option<[u8; 32]>,
    /// Asking price in lamports. Only meaningful while `Listed`.
    pub price: u64,
    pub state: WallState,
    pub bump: u8,
}

impl WallAccount {
    /// A freshly minted wall as the program creates it.
    pub fn minted(owner: Pubkey, bump: u8) -> Self {
        Self {
            owner,
            cast_hash: None,
            price: 0,
            state: WallState::Inactive,
            bump,
        }
    }

    pub fn decode(data: &[u8]) -> Result<Self, WallError> {
        use wall_layout::*;

        check_len("wall", data, LEN)?;

        let discriminator: [u8; 8] = DISCRIMINATOR.array(data);
        if discriminator != WALL_DISCRIMINATOR {
            return Err(WallError::UnrecognizedDiscriminator(discriminator));
        }

        let [state_byte]: [u8; 1] = STATE.array(data);
        let state = WallState::try_from(state_byte)?;

        let cast_hash: [u8; 32] = CAST_HASH.array(data);
        let [bump]: [u8; 1] = BUMP.array(data);

        Ok(Self {
            owner: Pubkey::new(OWNER.array(data)),
            cast_hash: cast_hash.iter().any(|b| *b != 0).then_some(cast_hash),
            price: u64::from_le_bytes(PRICE.array(data)),
            state,
            bump,
        })
    }

    /// Decode and check the owner field against `expected_owner`.
    ///
    /// This is a client-side sanity check only; the program enforces the
    /// real ownership rules.
    pub fn decode_owned_by(data: &[u8], expected_owner: &Pubkey) -> Result<Self, WallError> {
        let wall = Self::decode(data)?;
        if wall.owner != *expected_owner {
            return Err(WallError::OwnershipMismatch {
                expected: *expected_owner,
                actual: wall.owner,
            });
        }
        Ok(wall)
    }

    pub fn encode(&self) -> Vec<u8> {
        use wall_layout::*;

        let mut buf = vec![0u8; LEN];
        DISCRIMINATOR.write(&mut buf, &WALL_DISCRIMINATOR);
        OWNER.write(&mut buf, self.owner.as_bytes());
        CAST_HASH.write(&mut buf, &self.cast_hash.unwrap_or([0u8; 32]));
        PRICE.write(&mut buf, &self.price.to_le_bytes());
        STATE.write(&mut buf, &[self.state.as_u8()]);
        BUMP.write(&mut buf, &[self.bump]);
        buf
    }

    /// Lowercase hex of the cast hash, without a `0x` prefix.
    pub fn cast_hash_hex(&self) -> Option<String> {
        self.cast_hash.map(hex::encode)
    }

    pub fn listing_price(&self) -> Option<u64> {
        (self.state == WallState::Listed).then_some(self.price)
    }

    pub fn is_owned_by(&self, key: &Pubkey) -> bool {
        self.owner == *key
    }
}

#[cfg(test)]
mod tests {
    use sha2::{Digest, Sha256};

    use super::*;

    fn owner() -> Pubkey {
        Pubkey::new([0x0Au8; 32])
    }

    fn raw_wall(state: u8) -> Vec<u8> {
        let mut data = vec![0u8; wall_layout::LEN];
        data[..8].copy_from_slice(&WALL_DISCRIMINATOR);
        data[8..40].copy_from_slice(owner().as_bytes());
        data[80] = state;
        data
    }

    // -- Schema ---------------------------------------------------------------

    #[test]
    fn registry_offsets_match_program() {
        use registry_layout::*;
        assert_eq!(AUTHORITY.offset, 8);
        assert_eq!(TREASURY.offset, 40);
        assert_eq!(MINT_COUNT.offset, 72);
        assert_eq!(LEN, 74);
    }

    #[test]
    fn wall_offsets_match_program() {
        use wall_layout::*;
        assert_eq!(OWNER.offset, 8);
        assert_eq!(CAST_HASH.offset, 40);
        assert_eq!(PRICE.offset, 72);
        assert_eq!(STATE.offset, 80);
        assert_eq!(BUMP.offset, 81);
        assert_eq!(LEN, 82);
    }

    #[test]
    fn schema_fields_are_contiguous() {
        for fields in [&registry_layout::FIELDS[..], &wall_layout::FIELDS[..]] {
            assert_eq!(fields[0].offset, 0);
            for pair in fields.windows(2) {
                assert_eq!(pair[0].end(), pair[1].offset, "gap before {}", pair[1].name);
            }
        }
    }

    #[test]
    fn discriminators_are_anchor_tags() {
        let wall = Sha256::digest(b"account:Wall");
        assert_eq!(&wall[..8], &WALL_DISCRIMINATOR);
        let registry = Sha256::digest(b"account:Registry");
        assert_eq!(&registry[..8], &REGISTRY_DISCRIMINATOR);
    }

    // -- Registry ---------------------------------------------------------------

    #[test]
    fn decode_registry_reads_mint_count_le() {
        let mut data = vec![0u8; 74];
        data[72] = 0x78;
        data[73] = 0x03;
        let registry = RegistryAccount::decode(&data).unwrap();
        assert_eq!(registry.mint_count, 888);
    }

    #[test]
    fn decode_registry_short_buffer_fails() {
        let err = RegistryAccount::decode(&[0u8; 10]).unwrap_err();
        assert_eq!(
            err,
            WallError::MalformedAccount {
                account: "registry",
                expected: 74,
                actual: 10,
            }
        );
    }

    #[test]
    fn decode_registry_accepts_trailing_bytes() {
        let mut data = RegistryAccount {
            authority: Pubkey::new([1u8; 32]),
            treasury: Pubkey::new([2u8; 32]),
            mint_count: 5,
        }
        .encode();
        data.extend_from_slice(&[0xFF; 16]);
        let registry = RegistryAccount::decode(&data).unwrap();
        assert_eq!(registry.mint_count, 5);
        assert_eq!(registry.treasury, Pubkey::new([2u8; 32]));
    }

    #[test]
    fn next_mint_index_is_mint_count() {
        let registry = RegistryAccount {
            authority: Pubkey::default(),
            treasury: Pubkey::default(),
            mint_count: 887,
        };
        assert_eq!(registry.next_mint_index().unwrap(), 887);
        assert_eq!(registry.remaining_supply(), 1);
    }

    #[test]
    fn next_mint_index_fails_when_sold_out() {
        let registry = RegistryAccount {
            authority: Pubkey::default(),
            treasury: Pubkey::default(),
            mint_count: TOTAL_SUPPLY,
        };
        assert!(registry.is_sold_out());
        assert_eq!(registry.remaining_supply(), 0);
        assert!(matches!(
            registry.next_mint_index(),
            Err(WallError::SupplyExhausted { minted: 888, total: 888 })
        ));
    }

    // -- Wall ---------------------------------------------------------------

    #[test]
    fn decode_fresh_wall() {
        let wall = WallAccount::decode(&raw_wall(0)).unwrap();
        assert_eq!(wall.owner, owner());
        assert_eq!(wall.cast_hash, None);
        assert_eq!(wall.state, WallState::Inactive);
        assert_eq!(wall.cast_hash_hex(), None);
    }

    #[test]
    fn state_bytes_map_exhaustively() {
        assert_eq!(WallAccount::decode(&raw_wall(0)).unwrap().state, WallState::Inactive);
        assert_eq!(WallAccount::decode(&raw_wall(1)).unwrap().state, WallState::Active);
        assert_eq!(WallAccount::decode(&raw_wall(2)).unwrap().state, WallState::Listed);
        for bad in 3u8..=255 {
            assert_eq!(
                WallAccount::decode(&raw_wall(bad)).unwrap_err(),
                WallError::UnknownState(bad)
            );
        }
    }

    #[test]
    fn decode_wall_reports_cast_hash_as_hex() {
        let mut data = raw_wall(1);
        data[40] = 0xAB;
        data[71] = 0x01;
        let wall = WallAccount::decode(&data).unwrap();
        let hex = wall.cast_hash_hex().unwrap();
        assert_eq!(hex.len(), 64);
        assert!(hex.starts_with("ab"));
        assert!(hex.ends_with("01"));
    }

    #[test]
    fn decode_wall_reads_price_and_bump() {
        let mut data = raw_wall(2);
        data[72..80].copy_from_slice(&1_500_000_000u64.to_le_bytes());
        data[81] = 253;
        let wall = WallAccount::decode(&data).unwrap();
        assert_eq!(wall.price, 1_500_000_000);
        assert_eq!(wall.listing_price(), Some(1_500_000_000));
        assert_eq!(wall.bump, 253);
    }

    #[test]
    fn price_is_hidden_unless_listed() {
        let mut data = raw_wall(1);
        data[72..80].copy_from_slice(&42u64.to_le_bytes());
        let wall = WallAccount::decode(&data).unwrap();
        assert_eq!(wall.listing_price(), None);
    }

    #[test]
    fn decode_wall_short_buffer_fails() {
        let err = WallAccount::decode(&raw_wall(0)[..81]).unwrap_err();
        assert!(matches!(
            err,
            WallError::MalformedAccount { expected: 82, actual: 81, .. }
        ));
    }

    #[test]
    fn decode_wall_rejects_registry_bytes() {
        let mut data = RegistryAccount {
            authority: owner(),
            treasury: owner(),
            mint_count: 3,
        }
        .encode();
        data.resize(82, 0);
        assert_eq!(
            WallAccount::decode(&data).unwrap_err(),
            WallError::UnrecognizedDiscriminator(REGISTRY_DISCRIMINATOR)
        );
    }

    #[test]
    fn decode_owned_by_checks_owner() {
        let data = raw_wall(0);
        assert!(WallAccount::decode_owned_by(&data, &owner()).is_ok());

        let stranger = Pubkey::new([0x0Bu8; 32]);
        assert_eq!(
            WallAccount::decode_owned_by(&data, &stranger).unwrap_err(),
            WallError::OwnershipMismatch {
                expected: stranger,
                actual: owner(),
            }
        );
    }

    #[test]
    fn encode_then_decode_listed_wall() {
        let wall = WallAccount {
            owner: owner(),
            cast_hash: Some([0x11; 32]),
            price: 7,
            state: WallState::Listed,
            bump: 200,
        };
        let data = wall.encode();
        assert_eq!(data.len(), wall_layout::LEN);
        assert_eq!(WallAccount::decode(&data).unwrap(), wall);
    }

    #[test]
    fn minted_wall_is_inactive_and_unset() {
        let wall = WallAccount::minted(owner(), 9);
        assert_eq!(wall.state, WallState::Inactive);
        assert_eq!(wall.cast_hash, None);
        assert_eq!(wall.encode()[80], 0);
    }
}
