//! Instruction builders for the five wall program entry points.
//!
//! Every payload is `discriminator (8 bytes) || args`. The discriminators are
//! the Anchor sighashes `sha256("global:<name>")[..8]`, stored here as opaque
//! constants.
//!
//! | Operation | Accounts                                                   | Args            |
//! |-----------|------------------------------------------------------------|-----------------|
//! | mint      | registry(w), wall(w), treasury(w), payer(w,s), system      | none            |
//! | activate  | wall(w), owner(s)                                          | cast hash [32]  |
//! | list      | wall(w), owner(s)                                          | price u64 LE    |
//! | unlist    | wall(w), owner(w,s), treasury(w), system                   | none            |
//! | buy       | wall(w), seller(w), buyer(w,s), treasury(w), system        | none            |

use tracing::{debug, warn};

use crate::address::{Pubkey, SYSTEM_PROGRAM_ID};
use crate::error::WallError;
use crate::pda::WallProgram;

pub const MINT_WALL: [u8; 8] = [254, 62, 48, 58, 150, 117, 204, 141];
pub const ACTIVATE_WALL: [u8; 8] = [88, 67, 119, 10, 202, 25, 16, 165];
pub const LIST_WALL: [u8; 8] = [161, 181, 22, 255, 201, 246, 76, 229];
pub const UNLIST_WALL: [u8; 8] = [191, 224, 115, 83, 170, 170, 255, 52];
pub const BUY_WALL: [u8; 8] = [249, 205, 81, 115, 77, 158, 27, 54];

// ---------------------------------------------------------------------------
// Data structures
// ---------------------------------------------------------------------------

/// A single account reference in an instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccountMeta {
    pub pubkey: Pubkey,
    pub is_signer: bool,
    pub is_writable: bool,
}

impl AccountMeta {
    pub fn writable(pubkey: Pubkey, is_signer: bool) -> Self {
        Self {
            pubkey,
            is_signer,
            is_writable: true,
        }
    }

    pub fn readonly(pubkey: Pubkey, is_signer: bool) -> Self {
        Self {
            pubkey,
            is_signer,
            is_writable: false,
        }
    }
}

/// An instruction before it is compiled into a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction {
    pub program_id: Pubkey,
    pub accounts: Vec<AccountMeta>,
    pub data: Vec<u8>,
}

fn payload(discriminator: &[u8; 8], args: &[u8]) -> Vec<u8> {
    let mut data = Vec::with_capacity(8 + args.len());
    data.extend_from_slice(discriminator);
    data.extend_from_slice(args);
    data
}

// ---------------------------------------------------------------------------
// Builders
// ---------------------------------------------------------------------------

impl WallProgram {
    /// Mint the wall at `mint_index`.
    ///
    /// `mint_index` must be the registry's current `mint_count`; the program
    /// derives the same PDA internally and rejects anything else. Supply
    /// bounds are NOT checked here, see `RegistryAccount::next_mint_index`.
    pub fn mint(
        &self,
        payer: &Pubkey,
        treasury: &Pubkey,
        mint_index: u16,
    ) -> Result<Instruction, WallError> {
        let wall = self.wall_address(mint_index)?;
        debug!(%wall, mint_index, "building mint_wall");

        Ok(Instruction {
            program_id: self.program_id(),
            accounts: vec![
                AccountMeta::writable(self.registry_address(), false),
                AccountMeta::writable(wall, false),
                AccountMeta::writable(*treasury, false),
                AccountMeta::writable(*payer, true),
                AccountMeta::readonly(SYSTEM_PROGRAM_ID, false),
            ],
            data: MINT_WALL.to_vec(),
        })
    }

    /// Activate a wall by pinning it to a cast.
    pub fn activate(
        &self,
        wall: &Pubkey,
        owner: &Pubkey,
        cast_hash_hex: &str,
    ) -> Result<Instruction, WallError> {
        let cast_hash = cast_hash_from_hex(cast_hash_hex)?;
        debug!(%wall, %owner, cast_hash = %hex::encode(cast_hash), "building activate_wall");

        Ok(Instruction {
            program_id: self.program_id(),
            accounts: vec![
                AccountMeta::writable(*wall, false),
                AccountMeta::readonly(*owner, true),
            ],
            data: payload(&ACTIVATE_WALL, &cast_hash),
        })
    }

    /// List a wall for sale at `price` lamports.
    pub fn list(&self, wall: &Pubkey, owner: &Pubkey, price: u64) -> Instruction {
        debug!(%wall, %owner, price, "building list_wall");

        Instruction {
            program_id: self.program_id(),
            accounts: vec![
                AccountMeta::writable(*wall, false),
                AccountMeta::readonly(*owner, true),
            ],
            data: payload(&LIST_WALL, &price.to_le_bytes()),
        }
    }

    pub fn unlist(&self, wall: &Pubkey, owner: &Pubkey, treasury: &Pubkey) -> Instruction {
        debug!(%wall, %owner, "building unlist_wall");

        Instruction {
            program_id: self.program_id(),
            accounts: vec![
                AccountMeta::writable(*wall, false),
                AccountMeta::writable(*owner, true),
                AccountMeta::writable(*treasury, false),
                AccountMeta::readonly(SYSTEM_PROGRAM_ID, false),
            ],
            data: UNLIST_WALL.to_vec(),
        }
    }

    /// Buy a listed wall from `seller`, who must be the wall's current owner.
    pub fn buy(
        &self,
        wall: &Pubkey,
        seller: &Pubkey,
        buyer: &Pubkey,
        treasury: &Pubkey,
    ) -> Instruction {
        debug!(%wall, %seller, %buyer, "building buy_wall");

        Instruction {
            program_id: self.program_id(),
            accounts: vec![
                AccountMeta::writable(*wall, false),
                AccountMeta::writable(*seller, false),
                AccountMeta::writable(*buyer, true),
                AccountMeta::writable(*treasury, false),
                AccountMeta::readonly(SYSTEM_PROGRAM_ID, false),
            ],
            data: BUY_WALL.to_vec(),
        }
    }
}

/// Convert a hex cast hash (optionally `0x`-prefixed) into exactly 32 bytes.
///
/// Short input is left-padded with zeros. Input longer than 32 bytes keeps
/// its first 32 bytes and drops the rest.
pub fn cast_hash_from_hex(input: &str) -> Result<[u8; 32], WallError> {
    let clean = input.strip_prefix("0x").unwrap_or(input);

    let bytes = hex::decode(clean)
        .map_err(|e| WallError::InvalidHash(format!("{input:?}: {e}")))?;

    let mut out = [0u8; 32];
    if bytes.len() > 32 {
        warn!(len = bytes.len(), "cast hash longer than 32 bytes, truncating");
        out.copy_from_slice(&bytes[..32]);
    } else {
        out[32 - bytes.len()..].copy_from_slice(&bytes);
    }

    Ok(out)
}
