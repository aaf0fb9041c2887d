//! Legacy Solana message compilation and transaction wire format.
//!
//! Wallets sign the serialized message; the RPC accepts the wire bytes.
//!
//! ```text
//! Transaction:
//!   num_signatures          compact-u16
//!   signatures              64 bytes * num_signatures
//!   message:
//!     num_required_sigs     u8
//!     num_readonly_signed   u8
//!     num_readonly_unsigned u8
//!     num_accounts          compact-u16
//!     account_keys          32 bytes * num_accounts
//!     recent_blockhash      32 bytes
//!     num_instructions      compact-u16
//!     instructions[]        (see below)
//!
//! Instruction:
//!   program_id_index        u8
//!   num_accounts            compact-u16
//!   account_indices         u8 * num_accounts
//!   data_len                compact-u16
//!   data                    u8 * data_len
//! ```

use std::fmt;

use crate::address::Pubkey;
use crate::error::WallError;
use crate::instruction::Instruction;

// ---------------------------------------------------------------------------
// Compact-u16 encoding
// ---------------------------------------------------------------------------

/// Encode a `u16` value in Solana's compact-u16 format.
///
/// - Values 0..0x7f       -> 1 byte
/// - Values 0x80..0x3fff  -> 2 bytes
/// - Values 0x4000..      -> 3 bytes
pub fn encode_compact_u16(value: u16) -> Vec<u8> {
    let mut val = value as u32;
    let mut out = Vec::with_capacity(3);

    loop {
        let mut byte = (val & 0x7f) as u8;
        val >>= 7;
        if val > 0 {
            byte |= 0x80;
        }
        out.push(byte);
        if val == 0 {
            break;
        }
    }

    out
}

/// Decode a compact-u16 value. Returns `(value, bytes_consumed)`.
pub fn decode_compact_u16(data: &[u8]) -> Result<(u16, usize), WallError> {
    let mut value: u32 = 0;
    let mut consumed = 0usize;

    loop {
        let byte = *data.get(consumed).ok_or_else(|| {
            WallError::SerializationError(
                "unexpected end of data while decoding compact-u16".into(),
            )
        })?;
        // A zero continuation byte would alias a shorter encoding.
        if consumed > 0 && byte == 0 {
            return Err(WallError::SerializationError(
                "non-canonical compact-u16 encoding".into(),
            ));
        }
        value |= ((byte & 0x7f) as u32) << (7 * consumed);
        consumed += 1;

        if byte & 0x80 == 0 || consumed >= 3 {
            break;
        }
    }

    let value = u16::try_from(value)
        .map_err(|_| WallError::SerializationError("compact-u16 value overflow".into()))?;

    Ok((value, consumed))
}

fn compact_len(len: usize, what: &str) -> Result<Vec<u8>, WallError> {
    let len = u16::try_from(len)
        .map_err(|_| WallError::SerializationError(format!("too many {what}: {len}")))?;
    Ok(encode_compact_u16(len))
}

// ---------------------------------------------------------------------------
// Data structures
// ---------------------------------------------------------------------------

/// A 64-byte Ed25519 transaction signature.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Signature([u8; 64]);

impl Signature {
    pub const fn new(bytes: [u8; 64]) -> Self {
        Self(bytes)
    }

    pub fn to_bytes(self) -> [u8; 64] {
        self.0
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&bs58::encode(self.0).into_string())
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Signature({self})")
    }
}

/// A compiled instruction where account references are replaced by u8 indices
/// into the message's `account_keys` array.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledInstruction {
    pub program_id_index: u8,
    pub account_indices: Vec<u8>,
    pub data: Vec<u8>,
}

/// A compiled legacy message, ready to be signed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    /// All account keys referenced by this message, in canonical order:
    ///   1. writable signers (fee payer first)
    ///   2. read-only signers
    ///   3. writable non-signers
    ///   4. read-only non-signers
    pub account_keys: Vec<Pubkey>,
    pub num_required_signatures: u8,
    pub num_readonly_signed: u8,
    pub num_readonly_unsigned: u8,
    pub recent_blockhash: [u8; 32],
    pub instructions: Vec<CompiledInstruction>,
}

impl Message {
    pub fn fee_payer(&self) -> Option<&Pubkey> {
        self.account_keys.first()
    }

    /// The keys that must sign, in signature-slot order.
    pub fn signers(&self) -> &[Pubkey] {
        let n = (self.num_required_signatures as usize).min(self.account_keys.len());
        &self.account_keys[..n]
    }

    /// Serialize the message (the bytes that get signed).
    pub fn serialize(&self) -> Result<Vec<u8>, WallError> {
        let mut buf = Vec::with_capacity(256);

        buf.push(self.num_required_signatures);
        buf.push(self.num_readonly_signed);
        buf.push(self.num_readonly_unsigned);

        buf.extend_from_slice(&compact_len(self.account_keys.len(), "account keys")?);
        for key in &self.account_keys {
            buf.extend_from_slice(key.as_bytes());
        }

        buf.extend_from_slice(&self.recent_blockhash);

        buf.extend_from_slice(&compact_len(self.instructions.len(), "instructions")?);
        for ix in &self.instructions {
            buf.push(ix.program_id_index);

            buf.extend_from_slice(&compact_len(ix.account_indices.len(), "instruction accounts")?);
            buf.extend_from_slice(&ix.account_indices);

            buf.extend_from_slice(&compact_len(ix.data.len(), "instruction data bytes")?);
            buf.extend_from_slice(&ix.data);
        }

        Ok(buf)
    }
}

// ---------------------------------------------------------------------------
// Compilation
// ---------------------------------------------------------------------------

/// Compile instructions into a message paid for by `fee_payer`.
///
/// The fee payer is always a writable signer at index 0. Accounts that
/// appear in several instructions are merged, keeping the most permissive
/// flags.
pub fn compile_message(
    instructions: &[Instruction],
    fee_payer: &Pubkey,
    recent_blockhash: &[u8; 32],
) -> Result<Message, WallError> {
    struct AccountEntry {
        pubkey: Pubkey,
        is_signer: bool,
        is_writable: bool,
    }

    let mut entries: Vec<AccountEntry> = Vec::new();

    let mut upsert = |pubkey: Pubkey, signer: bool, writable: bool| {
        if let Some(entry) = entries.iter_mut().find(|e| e.pubkey == pubkey) {
            entry.is_signer |= signer;
            entry.is_writable |= writable;
        } else {
            entries.push(AccountEntry {
                pubkey,
                is_signer: signer,
                is_writable: writable,
            });
        }
    };

    upsert(*fee_payer, true, true);

    for ix in instructions {
        for meta in &ix.accounts {
            upsert(meta.pubkey, meta.is_signer, meta.is_writable);
        }
        upsert(ix.program_id, false, false);
    }

    // Stable sort: insertion order survives within each category, and the
    // fee payer is first in the first category.
    entries.sort_by_key(|e| match (e.is_signer, e.is_writable) {
        (true, true) => 0u8,
        (true, false) => 1,
        (false, true) => 2,
        (false, false) => 3,
    });

    if entries.len() > u8::MAX as usize {
        return Err(WallError::TransactionBuildError(format!(
            "too many accounts: {}",
            entries.len()
        )));
    }

    let count = |pred: fn(&AccountEntry) -> bool| entries.iter().filter(|e| pred(e)).count() as u8;
    let num_required_signatures = count(|e| e.is_signer);
    let num_readonly_signed = count(|e| e.is_signer && !e.is_writable);
    let num_readonly_unsigned = count(|e| !e.is_signer && !e.is_writable);

    let account_keys: Vec<Pubkey> = entries.iter().map(|e| e.pubkey).collect();

    let index_of = |key: &Pubkey| -> Result<u8, WallError> {
        account_keys
            .iter()
            .position(|k| k == key)
            .map(|i| i as u8)
            .ok_or_else(|| WallError::TransactionBuildError(format!("{key} not in account keys")))
    };

    let mut compiled = Vec::with_capacity(instructions.len());
    for ix in instructions {
        let program_id_index = index_of(&ix.program_id)?;
        let account_indices = ix
            .accounts
            .iter()
            .map(|meta| index_of(&meta.pubkey))
            .collect::<Result<Vec<u8>, _>>()?;

        compiled.push(CompiledInstruction {
            program_id_index,
            account_indices,
            data: ix.data.clone(),
        });
    }

    Ok(Message {
        account_keys,
        num_required_signatures,
        num_readonly_signed,
        num_readonly_unsigned,
        recent_blockhash: *recent_blockhash,
        instructions: compiled,
    })
}

// ---------------------------------------------------------------------------
// Wire format
// ---------------------------------------------------------------------------

/// Assemble a signed transaction: signatures in signer order, then the message.
pub fn assemble_transaction(
    message: &Message,
    signatures: &[Signature],
) -> Result<Vec<u8>, WallError> {
    if signatures.len() != message.signers().len() {
        return Err(WallError::TransactionBuildError(format!(
            "expected {} signatures, got {}",
            message.signers().len(),
            signatures.len()
        )));
    }

    let message_bytes = message.serialize()?;
    let mut wire = Vec::with_capacity(1 + 64 * signatures.len() + message_bytes.len());

    wire.extend_from_slice(&compact_len(signatures.len(), "signatures")?);
    for sig in signatures {
        wire.extend_from_slice(&sig.0);
    }
    wire.extend_from_slice(&message_bytes);

    Ok(wire)
}

/// Split wire bytes into their signatures and the message bytes they sign.
pub fn split_transaction(wire: &[u8]) -> Result<(Vec<Signature>, &[u8]), WallError> {
    let (num_sigs, prefix) = decode_compact_u16(wire)?;
    let sigs_end = prefix + num_sigs as usize * 64;

    if sigs_end > wire.len() {
        return Err(WallError::SerializationError(
            "transaction too short: signature slots exceed length".into(),
        ));
    }

    let signatures = wire[prefix..sigs_end]
        .chunks_exact(64)
        .map(|chunk| {
            let mut sig = [0u8; 64];
            sig.copy_from_slice(chunk);
            Signature(sig)
        })
        .collect();

    Ok((signatures, &wire[sigs_end..]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::address::{SYSTEM_PROGRAM_ID, TREASURY};
    use crate::pda::WallProgram;

    fn key(byte: u8) -> Pubkey {
        Pubkey::new([byte; 32])
    }

    // -- compact-u16 --------------------------------------------------------

    #[test]
    fn compact_u16_boundaries() {
        assert_eq!(encode_compact_u16(0), vec![0x00]);
        assert_eq!(encode_compact_u16(0x7f), vec![0x7f]);
        assert_eq!(encode_compact_u16(128), vec![0x80, 0x01]);
        assert_eq!(encode_compact_u16(16383), vec![0xff, 0x7f]);
        assert_eq!(encode_compact_u16(16384), vec![0x80, 0x80, 0x01]);
        assert_eq!(encode_compact_u16(u16::MAX), vec![0xff, 0xff, 0x03]);
    }

    #[test]
    fn decode_compact_u16_reports_consumed() {
        assert_eq!(decode_compact_u16(&[0x7f]).unwrap(), (127, 1));
        assert_eq!(decode_compact_u16(&[0x80, 0x01, 0xAA]).unwrap(), (128, 2));
        assert_eq!(decode_compact_u16(&[0xff, 0xff, 0x03]).unwrap(), (u16::MAX, 3));
    }

    #[test]
    fn decode_compact_u16_rejects_truncated_and_overflow() {
        assert!(decode_compact_u16(&[]).is_err());
        assert!(decode_compact_u16(&[0x80]).is_err());
        assert!(decode_compact_u16(&[0xff, 0xff, 0x7f]).is_err());
    }

    #[test]
    fn decode_compact_u16_rejects_non_canonical() {
        assert!(decode_compact_u16(&[0x80, 0x00]).is_err());
        assert!(decode_compact_u16(&[0x81, 0x80, 0x00]).is_err());
        assert_eq!(decode_compact_u16(&[0x00]).unwrap(), (0, 1));
        for value in [0u16, 1, 127, 128, 16383, 16384, u16::MAX] {
            let encoded = encode_compact_u16(value);
            assert_eq!(
                decode_compact_u16(&encoded).unwrap(),
                (value, encoded.len())
            );
        }
    }

    // -- compile ------------------------------------------------------------

    #[test]
    fn mint_message_account_order() {
        let program = WallProgram::mainnet().unwrap();
        let payer = key(9);
        let ix = program.mint(&payer, &TREASURY, 0).unwrap();
        let msg = compile_message(&[ix], &payer, &[0xAA; 32]).unwrap();

        // payer | registry, wall, treasury | system, program
        assert_eq!(msg.account_keys.len(), 6);
        assert_eq!(msg.account_keys[0], payer);
        assert_eq!(msg.account_keys[1], program.registry_address());
        assert_eq!(msg.account_keys[2], program.wall_address(0).unwrap());
        assert_eq!(msg.account_keys[3], TREASURY);
        assert_eq!(msg.account_keys[4], SYSTEM_PROGRAM_ID);
        assert_eq!(msg.account_keys[5], program.program_id());
        assert_eq!(msg.num_required_signatures, 1);
        assert_eq!(msg.num_readonly_signed, 0);
        assert_eq!(msg.num_readonly_unsigned, 2);

        let cix = &msg.instructions[0];
        assert_eq!(cix.program_id_index, 5);
        assert_eq!(cix.account_indices, vec![1, 2, 3, 0, 4]);
    }

    #[test]
    fn readonly_signer_is_promoted_when_fee_payer() {
        let program = WallProgram::mainnet().unwrap();
        let owner = key(3);
        let ix = program.list(&key(2), &owner, 10);
        let msg = compile_message(&[ix], &owner, &[0u8; 32]).unwrap();

        assert_eq!(msg.account_keys[0], owner);
        assert_eq!(msg.num_required_signatures, 1);
        assert_eq!(msg.num_readonly_signed, 0);
        assert_eq!(msg.signers(), &[owner]);
    }

    #[test]
    fn separate_fee_payer_keeps_readonly_signer() {
        let program = WallProgram::mainnet().unwrap();
        let ix = program.activate(&key(2), &key(3), "ab").unwrap();
        let msg = compile_message(&[ix], &key(7), &[0u8; 32]).unwrap();

        assert_eq!(msg.signers(), &[key(7), key(3)]);
        assert_eq!(msg.num_readonly_signed, 1);
    }

    #[test]
    fn serialize_places_blockhash_after_keys() {
        let program = WallProgram::mainnet().unwrap();
        let ix = program.unlist(&key(2), &key(3), &TREASURY);
        let blockhash = [0xCC; 32];
        let msg = compile_message(&[ix], &key(3), &blockhash).unwrap();
        let bytes = msg.serialize().unwrap();

        assert_eq!(bytes[0], msg.num_required_signatures);
        let n = msg.account_keys.len();
        let offset = 3 + encode_compact_u16(n as u16).len() + 32 * n;
        assert_eq!(&bytes[offset..offset + 32], &blockhash);
    }

    // -- wire ---------------------------------------------------------------

    #[test]
    fn assemble_then_split() {
        let program = WallProgram::mainnet().unwrap();
        let ix = program.buy(&key(2), &key(3), &key(4), &TREASURY);
        let msg = compile_message(&[ix], &key(4), &[1u8; 32]).unwrap();
        let sig = Signature::new([0x5A; 64]);

        let wire = assemble_transaction(&msg, &[sig]).unwrap();
        let (sigs, message_bytes) = split_transaction(&wire).unwrap();
        assert_eq!(sigs, vec![sig]);
        assert_eq!(message_bytes, msg.serialize().unwrap().as_slice());
    }

    #[test]
    fn assemble_rejects_wrong_signature_count() {
        let program = WallProgram::mainnet().unwrap();
        let ix = program.list(&key(2), &key(3), 10);
        let msg = compile_message(&[ix], &key(3), &[1u8; 32]).unwrap();
        assert!(assemble_transaction(&msg, &[]).is_err());
    }

    #[test]
    fn split_rejects_truncated_signatures() {
        assert!(split_transaction(&[0x02, 0x00]).is_err());
        assert!(split_transaction(&[]).is_err());
    }
}
