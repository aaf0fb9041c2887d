use thiserror::Error;

use crate::address::Pubkey;

/// Errors raised while deriving addresses, decoding accounts, or building
/// instructions for the wall program.
///
/// None of these are retryable: each one means the input bytes or arguments
/// are wrong and must be fixed by the caller.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum WallError {
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("malformed {account} account: expected at least {expected} bytes, got {actual}")]
    MalformedAccount {
        account: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("unrecognized account discriminator: {}", hex::encode(.0))]
    UnrecognizedDiscriminator([u8; 8]),

    #[error("unknown wall state byte: {0}")]
    UnknownState(u8),

    #[error("wall is owned by {actual}, expected {expected}")]
    OwnershipMismatch { expected: Pubkey, actual: Pubkey },

    #[error("invalid cast hash: {0}")]
    InvalidHash(String),

    #[error("supply exhausted: {minted} of {total} walls minted")]
    SupplyExhausted { minted: u16, total: u16 },

    #[error("could not find a viable PDA bump seed")]
    NoViableBump,

    #[error("transaction build error: {0}")]
    TransactionBuildError(String),

    #[error("serialization error: {0}")]
    SerializationError(String),
}
