//! Custom error codes returned by the deployed wall program.
//!
//! Anchor numbers user errors from 6000 upwards in declaration order. A
//! failed simulation surfaces them as `InstructionError(_, Custom(code))`.

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ProgramError {
    #[error("All 888 walls are minted")]
    SoldOut,

    #[error("Wall is already listed")]
    AlreadyListed,

    #[error("Wall is not listed")]
    NotListed,

    #[error("Price must be > 0")]
    ZeroPrice,

    #[error("Cannot buy your own listing")]
    SelfPurchase,

    #[error("Seller provided is not the owner")]
    SellerNotOwner,

    #[error("Insufficient funds")]
    InsufficientFunds,

    #[error("Royalty overflow")]
    RoyaltyOverflow,

    #[error("Wall is listed – unlist first")]
    ListedWall,
}

const FIRST_CODE: u32 = 6000;

const ALL: [ProgramError; 9] = [
    ProgramError::SoldOut,
    ProgramError::AlreadyListed,
    ProgramError::NotListed,
    ProgramError::ZeroPrice,
    ProgramError::SelfPurchase,
    ProgramError::SellerNotOwner,
    ProgramError::InsufficientFunds,
    ProgramError::RoyaltyOverflow,
    ProgramError::ListedWall,
];

impl ProgramError {
    pub fn from_code(code: u32) -> Option<Self> {
        let index = code.checked_sub(FIRST_CODE)?;
        ALL.get(index as usize).copied()
    }

    pub fn code(self) -> u32 {
        FIRST_CODE + self as u32
    }
}
