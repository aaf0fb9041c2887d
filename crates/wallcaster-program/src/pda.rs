//! Program Derived Address derivation for the registry and wall accounts.
//!
//! Seeds (must match the on-chain program byte for byte):
//!
//! ```text
//! registry = ["registry"]
//! wall     = ["wall", registry_address, mint_index as u16 LE]
//! ```

use sha2::{Digest, Sha256};

use crate::address::{Pubkey, PROGRAM_ID};
use crate::error::WallError;

/// Appended to every PDA hash preimage.
const PDA_MARKER: &[u8] = b"ProgramDerivedAddress";

pub const REGISTRY_SEED: &[u8] = b"registry";
pub const WALL_SEED: &[u8] = b"wall";

/// Derivation context for one deployment of the wall program.
///
/// The registry address is computed once here and reused for every wall
/// derivation, so callers should construct this once and pass it around.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WallProgram {
    program_id: Pubkey,
    registry: Pubkey,
    registry_bump: u8,
}

impl WallProgram {
    pub fn new(program_id: Pubkey) -> Result<Self, WallError> {
        let (registry, registry_bump) = find_program_address(&[REGISTRY_SEED], &program_id)?;
        Ok(Self {
            program_id,
            registry,
            registry_bump,
        })
    }

    /// The mainnet deployment.
    pub fn mainnet() -> Result<Self, WallError> {
        Self::new(PROGRAM_ID)
    }

    pub fn program_id(&self) -> Pubkey {
        self.program_id
    }

    /// Address of the registry singleton.
    pub fn registry_address(&self) -> Pubkey {
        self.registry
    }

    pub fn registry_bump(&self) -> u8 {
        self.registry_bump
    }

    /// Address of the wall minted at `mint_index` (zero-based).
    pub fn wall_address(&self, mint_index: u16) -> Result<Pubkey, WallError> {
        self.wall_address_with_bump(mint_index)
            .map(|(address, _bump)| address)
    }

    pub fn wall_address_with_bump(&self, mint_index: u16) -> Result<(Pubkey, u8), WallError> {
        find_program_address(
            &[
                WALL_SEED,
                self.registry.as_ref(),
                &mint_index.to_le_bytes(),
            ],
            &self.program_id,
        )
    }
}

/// Find a valid Program Derived Address (PDA) for the given seeds and program.
///
/// Iterates bump seeds from 255 down to 0, computing
/// `SHA-256(seed_0 || seed_1 || ... || bump || program_id || "ProgramDerivedAddress")`
/// and returning the first result that is NOT a valid Ed25519 point.
pub fn find_program_address(
    seeds: &[&[u8]],
    program_id: &Pubkey,
) -> Result<(Pubkey, u8), WallError> {
    for bump in (0u8..=255).rev() {
        if let Some(address) = create_program_address(seeds, bump, program_id) {
            return Ok((address, bump));
        }
    }

    Err(WallError::NoViableBump)
}

/// Attempt to create a PDA from seeds + bump + program_id.
///
/// Returns `None` when the digest lands on the Ed25519 curve.
pub fn create_program_address(seeds: &[&[u8]], bump: u8, program_id: &Pubkey) -> Option<Pubkey> {
    let mut hasher = Sha256::new();

    for seed in seeds {
        hasher.update(seed);
    }
    hasher.update([bump]);
    hasher.update(program_id.as_bytes());
    hasher.update(PDA_MARKER);

    let hash: [u8; 32] = hasher.finalize().into();

    if is_on_curve(&hash) {
        return None;
    }

    Some(Pubkey::new(hash))
}

/// Check if 32 bytes decompress to a valid Ed25519 curve point.
pub fn is_on_curve(bytes: &[u8; 32]) -> bool {
    curve25519_dalek::edwards::CompressedEdwardsY(*bytes)
        .decompress()
        .is_some()
}
