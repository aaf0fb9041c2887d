use thiserror::Error;
use wallcaster_program::{ProgramError, Pubkey, WallError};

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("RPC error: {0}")]
    Rpc(String),

    #[error("Wallet error: {0}")]
    Wallet(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error(transparent)]
    Wall(WallError),

    /// The program rejected the transaction during simulation.
    #[error("Smart contract error: {0}")]
    Program(ProgramError),

    /// A client-side check predicts the program would reject this call.
    #[error("Rejected before submission: {0}")]
    Rejected(ProgramError),

    #[error("Transaction simulation failed: {0}")]
    Simulation(String),

    #[error("Account not found: {0}")]
    AccountNotFound(Pubkey),

    #[error("Account {0} is not owned by the wall program")]
    ForeignAccount(Pubkey),

    #[error("Wallet {0} already owns a wall")]
    AlreadyOwnsWall(Pubkey),

    #[error("Wall is already activated")]
    AlreadyActive,
}

impl ClientError {
    /// Whether retrying the same call could succeed. Decode and build
    /// failures mean the input is wrong; only transport failures are
    /// transient.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ClientError::Rpc(_))
    }
}

impl From<WallError> for ClientError {
    fn from(e: WallError) -> Self {
        ClientError::Wall(e)
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(e: serde_json::Error) -> Self {
        ClientError::Config(e.to_string())
    }
}

impl From<std::io::Error> for ClientError {
    fn from(e: std::io::Error) -> Self {
        ClientError::Config(e.to_string())
    }
}
