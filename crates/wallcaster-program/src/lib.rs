//! Client-side codec for the wallcaster on-chain program.
//!
//! This crate derives the registry and wall PDAs, decodes the fixed-layout
//! account bytes, and builds the raw instruction payloads for mint, activate,
//! list, unlist and buy. Like the rest of the workspace it avoids
//! `solana-sdk`: keys are plain 32-byte arrays, PDAs are found with `sha2`
//! plus a `curve25519-dalek` on-curve check, and messages are compiled by
//! hand.
//!
//! Everything here is pure and synchronous. Fetching accounts, signing and
//! submitting are the caller's job (see the `wallcaster-client` crate).

pub mod address;
pub mod error;
pub mod instruction;
pub mod layout;
pub mod pda;
pub mod program_error;
pub mod transaction;

// Re-export key public types for ergonomic imports.
pub use address::{Pubkey, PROGRAM_ID, SYSTEM_PROGRAM_ID, TREASURY};
pub use error::WallError;
pub use instruction::{cast_hash_from_hex, AccountMeta, Instruction};
pub use layout::{RegistryAccount, WallAccount, WallState, TOTAL_SUPPLY};
pub use pda::{find_program_address, WallProgram};
pub use program_error::ProgramError;
pub use transaction::{
    assemble_transaction, compile_message, split_transaction, Message, Signature,
};
