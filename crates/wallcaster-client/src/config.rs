//! Cluster configuration, loaded from JSON.
//!
//! ```json
//! {
//!   "rpc_url": "https://api.mainnet-beta.solana.com",
//!   "cluster": "mainnet-beta",
//!   "commitment": "confirmed",
//!   "blockhash_commitment": "finalized",
//!   "program_id": "7UhisdAH7dosM1nfF1rbBXYv1Vtgr2yd6W4B7SuZJJVx"
//! }
//! ```
//!
//! Missing fields take their mainnet defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};
use wallcaster_program::{Pubkey, WallProgram, PROGRAM_ID};

use crate::error::ClientError;

pub const DEFAULT_RPC_URL: &str = "https://api.mainnet-beta.solana.com";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Commitment {
    Processed,
    #[default]
    Confirmed,
    Finalized,
}

impl Commitment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Commitment::Processed => "processed",
            Commitment::Confirmed => "confirmed",
            Commitment::Finalized => "finalized",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusterConfig {
    /// Endpoint the host's `RpcClient` connects to.
    pub rpc_url: String,
    /// Network label passed to `WalletProvider::sign_and_send`, e.g. "mainnet-beta".
    pub cluster: String,
    /// Level transactions are confirmed at.
    pub commitment: Commitment,
    /// Level the recent blockhash is fetched at.
    pub blockhash_commitment: Commitment,
    /// Base58 program id of the wall program.
    pub program_id: String,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            rpc_url: DEFAULT_RPC_URL.to_string(),
            cluster: "mainnet-beta".to_string(),
            commitment: Commitment::Confirmed,
            blockhash_commitment: Commitment::Finalized,
            program_id: PROGRAM_ID.to_string(),
        }
    }
}

impl ClusterConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ClientError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ClientError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn to_json(&self) -> Result<String, ClientError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ClientError> {
        if self.rpc_url.is_empty() {
            return Err(ClientError::Config("rpc_url must not be empty".into()));
        }
        if self.cluster.is_empty() {
            return Err(ClientError::Config("cluster must not be empty".into()));
        }
        self.program_id()?;
        Ok(())
    }

    pub fn program_id(&self) -> Result<Pubkey, ClientError> {
        self.program_id
            .parse()
            .map_err(|e| ClientError::Config(format!("program_id: {e}")))
    }

    /// Derivation context for the configured deployment.
    pub fn program(&self) -> Result<WallProgram, ClientError> {
        Ok(WallProgram::new(self.program_id()?)?)
    }
}
