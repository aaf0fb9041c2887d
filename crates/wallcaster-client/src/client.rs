//! Sequencing of the wall operations over an injected RPC client.
//!
//! Each state-changing call follows the same path: read the accounts it
//! depends on, check what the program would reject anyway, build the
//! instruction, simulate, then sign-and-send through the wallet and confirm.

use tracing::{debug, info, warn};
use wallcaster_program::layout::{wall_layout, WALL_DISCRIMINATOR};
use wallcaster_program::{
    compile_message, Instruction, ProgramError, Pubkey, RegistryAccount, Signature, WallAccount,
    WallError, WallProgram, WallState,
};

use crate::config::ClusterConfig;
use crate::error::ClientError;
use crate::rpc::{MemcmpFilter, RpcClient, SimulationError, WalletProvider};
use crate::types::{MintReceipt, WallSummary};

pub struct WallClient<R> {
    rpc: R,
    program: WallProgram,
    config: ClusterConfig,
}

impl<R: RpcClient> WallClient<R> {
    pub fn new(rpc: R, config: &ClusterConfig) -> Result<Self, ClientError> {
        config.validate()?;
        let program = config.program()?;
        info!(
            rpc_url = %config.rpc_url,
            cluster = %config.cluster,
            program_id = %program.program_id(),
            "wall client ready"
        );
        Ok(Self {
            rpc,
            program,
            config: config.clone(),
        })
    }

    /// Mainnet defaults, pointed at `program`.
    pub fn with_program(rpc: R, program: WallProgram) -> Self {
        let config = ClusterConfig {
            program_id: program.program_id().to_string(),
            ..ClusterConfig::default()
        };
        Self {
            rpc,
            program,
            config,
        }
    }

    pub fn program(&self) -> &WallProgram {
        &self.program
    }

    pub fn config(&self) -> &ClusterConfig {
        &self.config
    }

    pub fn rpc(&self) -> &R {
        &self.rpc
    }

    // -----------------------------------------------------------------------
    // Reads
    // -----------------------------------------------------------------------

    /// Fetch account data, insisting the wall program owns it.
    fn fetch_program_account(&self, address: &Pubkey) -> Result<Vec<u8>, ClientError> {
        let account = self
            .rpc
            .get_account(address)?
            .ok_or(ClientError::AccountNotFound(*address))?;

        if account.owner != self.program.program_id() {
            return Err(ClientError::ForeignAccount(*address));
        }
        Ok(account.data)
    }

    pub fn fetch_registry(&self) -> Result<RegistryAccount, ClientError> {
        let data = self.fetch_program_account(&self.program.registry_address())?;
        let registry = RegistryAccount::decode(&data)?;
        debug!(mint_count = registry.mint_count, "fetched registry");
        Ok(registry)
    }

    pub fn fetch_wall_at(&self, address: &Pubkey) -> Result<WallAccount, ClientError> {
        let data = self.fetch_program_account(address)?;
        Ok(WallAccount::decode(&data)?)
    }

    pub fn fetch_wall(&self, mint_index: u16) -> Result<WallAccount, ClientError> {
        self.fetch_wall_at(&self.program.wall_address(mint_index)?)
    }

    /// The wall `owner` holds, if any. Each wallet holds at most one.
    pub fn find_wall_by_owner(
        &self,
        owner: &Pubkey,
    ) -> Result<Option<(Pubkey, WallAccount)>, ClientError> {
        let filters = [
            MemcmpFilter::new(wall_layout::DISCRIMINATOR.offset, WALL_DISCRIMINATOR),
            MemcmpFilter::new(wall_layout::OWNER.offset, owner.to_bytes()),
        ];
        let accounts = self
            .rpc
            .get_program_accounts(&self.program.program_id(), &filters)?;
        debug!(%owner, matches = accounts.len(), "scanned walls by owner");

        if accounts.len() > 1 {
            warn!(%owner, count = accounts.len(), "wallet owns more than one wall");
        }

        match accounts.into_iter().next() {
            Some((address, account)) => {
                let wall = WallAccount::decode_owned_by(&account.data, owner)?;
                Ok(Some((address, wall)))
            }
            None => Ok(None),
        }
    }

    /// Every wall minted so far, in mint order.
    pub fn list_walls(&self) -> Result<Vec<WallSummary>, ClientError> {
        let registry = self.fetch_registry()?;
        (0..registry.mint_count)
            .map(|index| -> Result<WallSummary, ClientError> {
                let address = self.program.wall_address(index)?;
                let wall = self.fetch_wall_at(&address)?;
                Ok(WallSummary::new(Some(index), &address, &wall))
            })
            .collect()
    }

    pub fn balance(&self, address: &Pubkey) -> Result<u64, ClientError> {
        self.rpc.get_balance(address)
    }

    // -----------------------------------------------------------------------
    // Operations
    // -----------------------------------------------------------------------

    /// Mint the next wall to the connected wallet.
    pub fn mint(&self, wallet: &dyn WalletProvider) -> Result<MintReceipt, ClientError> {
        let payer = wallet.connect()?;

        if self.find_wall_by_owner(&payer)?.is_some() {
            return Err(ClientError::AlreadyOwnsWall(payer));
        }

        // The wall PDA is seeded with the current mint_count, so the registry
        // must be read right before building.
        let registry = self.fetch_registry()?;
        let mint_index = registry.next_mint_index()?;
        let wall = self.program.wall_address(mint_index)?;

        let ix = self.program.mint(&payer, &registry.treasury, mint_index)?;
        let signature = self.submit(wallet, &payer, ix)?;

        info!(%wall, mint_index, %signature, "minted wall");
        Ok(MintReceipt {
            signature,
            wall,
            mint_index,
        })
    }

    /// Pin an inactive wall to a cast.
    pub fn activate(
        &self,
        wallet: &dyn WalletProvider,
        wall: &Pubkey,
        cast_hash_hex: &str,
    ) -> Result<Signature, ClientError> {
        // An all-zero hash decodes as "no cast"; an Active wall must have one.
        let digits = cast_hash_hex.strip_prefix("0x").unwrap_or(cast_hash_hex);
        if digits.bytes().all(|b| b == b'0') {
            return Err(WallError::InvalidHash(format!(
                "cast hash is empty or zero: {cast_hash_hex:?}"
            ))
            .into());
        }

        let owner = wallet.connect()?;
        let account = self.fetch_owned_wall(wall, &owner)?;

        match account.state {
            WallState::Active => return Err(ClientError::AlreadyActive),
            WallState::Listed => return Err(ClientError::Rejected(ProgramError::ListedWall)),
            WallState::Inactive => {}
        }

        let ix = self.program.activate(wall, &owner, cast_hash_hex)?;
        let signature = self.submit(wallet, &owner, ix)?;
        info!(%wall, %signature, "activated wall");
        Ok(signature)
    }

    pub fn list(
        &self,
        wallet: &dyn WalletProvider,
        wall: &Pubkey,
        price: u64,
    ) -> Result<Signature, ClientError> {
        if price == 0 {
            return Err(ClientError::Rejected(ProgramError::ZeroPrice));
        }

        let owner = wallet.connect()?;
        let account = self.fetch_owned_wall(wall, &owner)?;
        if account.state == WallState::Listed {
            return Err(ClientError::Rejected(ProgramError::AlreadyListed));
        }

        let ix = self.program.list(wall, &owner, price);
        let signature = self.submit(wallet, &owner, ix)?;
        info!(%wall, price, %signature, "listed wall");
        Ok(signature)
    }

    pub fn unlist(&self, wallet: &dyn WalletProvider, wall: &Pubkey) -> Result<Signature, ClientError> {
        let owner = wallet.connect()?;
        let account = self.fetch_owned_wall(wall, &owner)?;
        if account.state != WallState::Listed {
            return Err(ClientError::Rejected(ProgramError::NotListed));
        }

        let treasury = self.fetch_registry()?.treasury;
        let ix = self.program.unlist(wall, &owner, &treasury);
        let signature = self.submit(wallet, &owner, ix)?;
        info!(%wall, %signature, "unlisted wall");
        Ok(signature)
    }

    /// Buy a listed wall. The seller is whoever the wall account names as
    /// owner at the time of the call.
    pub fn buy(&self, wallet: &dyn WalletProvider, wall: &Pubkey) -> Result<Signature, ClientError> {
        let buyer = wallet.connect()?;
        let account = self.fetch_wall_at(wall)?;

        if account.state != WallState::Listed {
            return Err(ClientError::Rejected(ProgramError::NotListed));
        }
        if account.is_owned_by(&buyer) {
            return Err(ClientError::Rejected(ProgramError::SelfPurchase));
        }

        let treasury = self.fetch_registry()?.treasury;
        let ix = self.program.buy(wall, &account.owner, &buyer, &treasury);
        let signature = self.submit(wallet, &buyer, ix)?;
        info!(%wall, seller = %account.owner, price = account.price, %signature, "bought wall");
        Ok(signature)
    }

    // -----------------------------------------------------------------------
    // Internal helpers
    // -----------------------------------------------------------------------

    fn fetch_owned_wall(&self, wall: &Pubkey, owner: &Pubkey) -> Result<WallAccount, ClientError> {
        let data = self.fetch_program_account(wall)?;
        Ok(WallAccount::decode_owned_by(&data, owner)?)
    }

    /// Compile, simulate, sign-and-send, confirm.
    fn submit(
        &self,
        wallet: &dyn WalletProvider,
        fee_payer: &Pubkey,
        ix: Instruction,
    ) -> Result<Signature, ClientError> {
        let blockhash = self
            .rpc
            .get_latest_blockhash(self.config.blockhash_commitment)?;
        let message = compile_message(&[ix], fee_payer, &blockhash)?;

        let simulation = self.rpc.simulate(&message)?;
        if let Some(err) = simulation.err {
            for line in &simulation.logs {
                debug!(log = %line, "simulation log");
            }
            return Err(match err {
                SimulationError::Custom { code, .. } => match ProgramError::from_code(code) {
                    Some(program_error) => ClientError::Program(program_error),
                    None => ClientError::Simulation(format!("unknown error code: {code}")),
                },
                SimulationError::Other(description) => ClientError::Simulation(description),
            });
        }

        let signature = wallet.sign_and_send(&message, &self.config.cluster)?;
        self.rpc.confirm(&signature, self.config.commitment)?;
        debug!(%signature, commitment = self.config.commitment.as_str(), "confirmed");
        Ok(signature)
    }
}
