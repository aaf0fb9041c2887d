//! Capability interfaces for the collaborators the client drives.
//!
//! The client never owns a global connection. Callers inject an
//! [`RpcClient`] once, and hand a [`WalletProvider`] to each state-changing
//! call.

use wallcaster_program::{Message, Pubkey, Signature};

use crate::config::Commitment;
use crate::error::ClientError;

/// Raw account as returned by `getAccountInfo`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountInfo {
    /// Program that owns the account.
    pub owner: Pubkey,
    pub lamports: u64,
    pub data: Vec<u8>,
}

/// `getProgramAccounts` memcmp filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemcmpFilter {
    pub offset: usize,
    pub bytes: Vec<u8>,
}

impl MemcmpFilter {
    pub fn new(offset: usize, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            offset,
            bytes: bytes.into(),
        }
    }

    pub fn matches(&self, data: &[u8]) -> bool {
        let Some(end) = self.offset.checked_add(self.bytes.len()) else {
            return false;
        };
        data.get(self.offset..end)
            .is_some_and(|window| window == self.bytes.as_slice())
    }
}

/// Why a simulated transaction failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimulationError {
    /// `InstructionError(index, Custom(code))`
    Custom { instruction: u8, code: u32 },
    Other(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Simulation {
    pub err: Option<SimulationError>,
    pub logs: Vec<String>,
    pub units_consumed: Option<u64>,
}

/// The subset of the Solana JSON-RPC API the client uses.
pub trait RpcClient {
    fn get_account(&self, address: &Pubkey) -> Result<Option<AccountInfo>, ClientError>;

    fn get_program_accounts(
        &self,
        program_id: &Pubkey,
        filters: &[MemcmpFilter],
    ) -> Result<Vec<(Pubkey, AccountInfo)>, ClientError>;

    fn get_latest_blockhash(&self, commitment: Commitment) -> Result<[u8; 32], ClientError>;

    /// Simulate an unsigned message (signature verification disabled).
    fn simulate(&self, message: &Message) -> Result<Simulation, ClientError>;

    fn send_transaction(&self, wire: &[u8]) -> Result<Signature, ClientError>;

    /// Wait until `signature` reaches `commitment`.
    fn confirm(&self, signature: &Signature, commitment: Commitment) -> Result<(), ClientError>;

    fn get_balance(&self, address: &Pubkey) -> Result<u64, ClientError>;
}

/// A wallet that can identify itself and sign-and-send a message.
pub trait WalletProvider {
    fn connect(&self) -> Result<Pubkey, ClientError>;

    /// `cluster` names the network the wallet must send on, e.g. "mainnet-beta".
    fn sign_and_send(&self, message: &Message, cluster: &str) -> Result<Signature, ClientError>;
}
