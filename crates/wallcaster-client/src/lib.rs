//! Caller side of the wallcaster program.
//!
//! [`WallClient`] sequences account reads, instruction building and
//! submission over collaborators the host injects: an [`RpcClient`] for
//! chain access and a [`WalletProvider`] for signing. Neither is global.

pub mod client;
pub mod config;
pub mod error;
pub mod rpc;
pub mod types;
pub mod wallet;

pub use client::WallClient;
pub use config::{ClusterConfig, Commitment};
pub use error::ClientError;
pub use rpc::{AccountInfo, MemcmpFilter, RpcClient, Simulation, SimulationError, WalletProvider};
pub use types::{MintReceipt, WallSummary};
pub use wallet::LocalKeypair;
