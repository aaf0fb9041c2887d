use serde::Serialize;
use wallcaster_program::{Pubkey, Signature, WallAccount};

/// A wall as handed to the host UI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WallSummary {
    /// Mint index, when known.
    pub index: Option<u16>,
    pub pda: String,
    pub owner: String,
    /// Hex, no `0x` prefix. `None` until activated.
    pub cast_hash: Option<String>,
    /// "Inactive", "Active" or "Listed"
    pub state: &'static str,
    /// Asking price in lamports, only while listed.
    pub price: Option<u64>,
}

impl WallSummary {
    pub fn new(index: Option<u16>, pda: &Pubkey, wall: &WallAccount) -> Self {
        Self {
            index,
            pda: pda.to_string(),
            owner: wall.owner.to_string(),
            cast_hash: wall.cast_hash_hex(),
            state: wall.state.as_str(),
            price: wall.listing_price(),
        }
    }
}

/// Result of a successful mint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MintReceipt {
    pub signature: Signature,
    pub wall: Pubkey,
    pub mint_index: u16,
}
