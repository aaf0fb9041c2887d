//! A local Ed25519 keypair that implements [`WalletProvider`].
//!
//! Hosts normally supply their own wallet. This one signs in-process and
//! forwards the wire bytes through the injected RPC client, which is what
//! scripts and integration tests need.

use ed25519_dalek::{Signer, SigningKey};
use tracing::debug;
use wallcaster_program::{assemble_transaction, Message, Pubkey, Signature};
use zeroize::Zeroize;

use crate::error::ClientError;
use crate::rpc::{RpcClient, WalletProvider};

pub struct LocalKeypair<'r, R: ?Sized> {
    signing_key: SigningKey,
    rpc: &'r R,
}

impl<'r, R: RpcClient + ?Sized> LocalKeypair<'r, R> {
    /// Build from a 32-byte Ed25519 seed. The caller's copy is zeroized.
    pub fn from_seed(seed: &mut [u8; 32], rpc: &'r R) -> Self {
        let signing_key = SigningKey::from_bytes(seed);
        seed.zeroize();
        Self { signing_key, rpc }
    }

    pub fn pubkey(&self) -> Pubkey {
        Pubkey::new(self.signing_key.verifying_key().to_bytes())
    }

    /// Sign `message` and return the transaction wire bytes.
    ///
    /// Only single-signer messages are supported: this key must be the one
    /// and only required signer.
    pub fn sign(&self, message: &Message) -> Result<Vec<u8>, ClientError> {
        let me = self.pubkey();
        if message.signers() != [me].as_slice() {
            return Err(ClientError::Wallet(format!(
                "message requires signers {:?}, this wallet is {me}",
                message.signers()
            )));
        }

        let message_bytes = message.serialize()?;
        let signature = self.signing_key.sign(&message_bytes);

        Ok(assemble_transaction(
            message,
            &[Signature::new(signature.to_bytes())],
        )?)
    }
}

impl<R: RpcClient + ?Sized> WalletProvider for LocalKeypair<'_, R> {
    fn connect(&self) -> Result<Pubkey, ClientError> {
        Ok(self.pubkey())
    }

    fn sign_and_send(&self, message: &Message, cluster: &str) -> Result<Signature, ClientError> {
        let wire = self.sign(message)?;
        debug!(bytes = wire.len(), cluster, "sending locally signed transaction");
        self.rpc.send_transaction(&wire)
    }
}
