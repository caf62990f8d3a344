//! Cipher Commands - hash, seal and open with the Charm primitive

use std::io::Write;
use std::path::PathBuf;

use anyhow::Context;
use charm::{open_with_key, seal_with_key, SealedRecord};
use clap::Args;
use primitives::{bytes_to_hex, hex_to_bytes, Transaction};
use serde::Serialize;

use super::io::{open_input, print_json, read_input};
use crate::config::CharmixConfig;

/// Hash bytes with the Charm sponge
#[derive(Args)]
pub struct HashCommand {
    /// Message as hex instead of reading it
    #[arg(long, conflicts_with = "input")]
    hex: Option<String>,

    /// Message file; stdin when omitted
    #[arg(short, long)]
    input: Option<PathBuf>,
}

impl HashCommand {
    pub fn execute(self) -> anyhow::Result<()> {
        let message = match self.hex {
            Some(h) => hex_to_bytes(&h).context("decoding --hex")?,
            None => read_input(self.input.as_deref())?,
        };
        tracing::debug!(len = message.len(), "hashing");
        println!("{}", charm::hash_hex(&message));
        Ok(())
    }
}

/// Encrypt bytes into a sealed record (JSON)
#[derive(Args)]
pub struct EncryptCommand {
    /// 32-byte key, hex
    #[arg(long)]
    key: String,

    /// 8 to 16 byte nonce, hex
    #[arg(long)]
    nonce: String,

    /// Plaintext file; stdin when omitted
    #[arg(short, long)]
    input: Option<PathBuf>,
}

pub(crate) fn encrypt_bytes(key_hex: &str, nonce_hex: &str, plaintext: &[u8]) -> anyhow::Result<SealedRecord> {
    let key = hex_to_bytes(key_hex).context("decoding --key")?;
    let nonce = hex_to_bytes(nonce_hex).context("decoding --nonce")?;
    Ok(seal_with_key(&key, &nonce, plaintext)?)
}

impl EncryptCommand {
    pub fn execute(self, config: &CharmixConfig) -> anyhow::Result<()> {
        let plaintext = read_input(self.input.as_deref())?;
        let record = encrypt_bytes(&self.key, &self.nonce, &plaintext)?;
        print_json(&record, config.output.pretty)
    }
}

/// Verify and decrypt a sealed record; writes the plaintext to stdout
#[derive(Args)]
pub struct DecryptCommand {
    /// 32-byte key, hex
    #[arg(long)]
    key: String,

    /// Sealed record JSON; stdin when omitted
    #[arg(short, long)]
    input: Option<PathBuf>,
}

pub(crate) fn decrypt_record(key_hex: &str, record: &SealedRecord) -> anyhow::Result<Vec<u8>> {
    let key = hex_to_bytes(key_hex).context("decoding --key")?;
    match open_with_key(&key, record)? {
        Some(plaintext) => Ok(plaintext),
        None => anyhow::bail!("authentication failed: tag does not match"),
    }
}

impl DecryptCommand {
    pub fn execute(self) -> anyhow::Result<()> {
        let record: SealedRecord =
            serde_json::from_reader(open_input(self.input.as_deref())?).context("reading sealed record")?;
        let plaintext = decrypt_record(&self.key, &record)?;
        let mut out = std::io::stdout().lock();
        out.write_all(&plaintext).context("writing plaintext")?;
        out.flush()?;
        Ok(())
    }
}

/// Digests of a transaction (JSON)
#[derive(Args)]
pub struct FingerprintCommand {
    /// Transaction JSON; stdin when omitted
    #[arg(short, long)]
    input: Option<PathBuf>,
}

#[derive(Serialize)]
struct Fingerprints {
    txid: String,
    digest: String,
    charm_fingerprint: String,
    proof_hash: String,
}

fn fingerprints(tx: &Transaction) -> Fingerprints {
    Fingerprints {
        txid: bytes_to_hex(&tx.txid),
        digest: bytes_to_hex(&tx.digest().0),
        charm_fingerprint: bytes_to_hex(&spells::charm_fingerprint(tx)),
        proof_hash: bytes_to_hex(&spells::proof_hash(tx)),
    }
}

impl FingerprintCommand {
    pub fn execute(self, config: &CharmixConfig) -> anyhow::Result<()> {
        let tx: Transaction =
            serde_json::from_reader(open_input(self.input.as_deref())?).context("reading transaction")?;
        print_json(&fingerprints(&tx), config.output.pretty)
    }
}
