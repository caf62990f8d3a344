//! Route an app to its checker by tag prefix and wrap the verdict.

use core::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use primitives::{bytes_to_hex, App, Data, Transaction};
use serde::{Deserialize, Serialize};

use crate::escrow::{escrow_check, EscrowCheck};
use crate::nft::{nft_check, NftCheck};
use crate::token::{is_token_burn, is_token_mint, token_check, TokenCheck};

#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Debug)]
#[serde(rename_all = "lowercase")]
pub enum SpellKind {
    Token,
    Bollar,
    Nft,
    Escrow,
    Bounty,
}

const PREFIXES: [(&str, SpellKind); 5] = [
    ("token:", SpellKind::Token),
    ("bollar:", SpellKind::Bollar),
    ("nft:", SpellKind::Nft),
    ("escrow:", SpellKind::Escrow),
    ("bounty:", SpellKind::Bounty),
];

impl SpellKind {
    /// Case-insensitive prefix match; unknown tags are treated as tokens.
    pub fn from_tag(tag: &str) -> Self {
        PREFIXES
            .iter()
            .find(|(prefix, _)| {
                tag.len() >= prefix.len()
                    && tag.as_bytes()[..prefix.len()].eq_ignore_ascii_case(prefix.as_bytes())
            })
            .map_or(SpellKind::Token, |(_, kind)| *kind)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SpellKind::Token => "token",
            SpellKind::Bollar => "bollar",
            SpellKind::Nft => "nft",
            SpellKind::Escrow => "escrow",
            SpellKind::Bounty => "bounty",
        }
    }
}

impl fmt::Display for SpellKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

/// Token verdict plus the mint/burn predicates. The predicates are reported
/// only and never change `valid`.
#[derive(Clone, PartialEq, Eq, Serialize, Debug)]
pub struct TokenDetails {
    #[serde(flatten)]
    pub check: TokenCheck,
    pub is_mint: bool,
    pub is_burn: bool,
}

#[derive(Clone, PartialEq, Eq, Serialize, Debug)]
#[serde(untagged)]
pub enum SpellDetails {
    Token(TokenDetails),
    Nft(NftCheck),
    Escrow(EscrowCheck),
}

impl SpellDetails {
    pub fn valid(&self) -> bool {
        match self {
            SpellDetails::Token(d) => d.check.valid,
            SpellDetails::Nft(d) => d.valid,
            SpellDetails::Escrow(d) => d.valid,
        }
    }

    pub fn errors(&self) -> &[String] {
        match self {
            SpellDetails::Token(d) => &d.check.errors,
            SpellDetails::Nft(d) => &d.errors,
            SpellDetails::Escrow(d) => &d.errors,
        }
    }
}

#[derive(Clone, PartialEq, Eq, Serialize, Debug)]
pub struct SpellResult {
    #[serde(rename = "type")]
    pub kind: SpellKind,
    pub valid: bool,
    pub details: SpellDetails,
    /// Display fingerprint of the transaction summary. Proves nothing.
    #[serde(with = "primitives::hexutil::hex_array")]
    pub proof_hash: [u8; 32],
    /// UNIX milliseconds.
    pub timestamp: u64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ProofSummary<'a> {
    txid: &'a str,
    input_count: usize,
    output_count: usize,
}

/// Charm hash of `{"txid":…,"inputCount":…,"outputCount":…}`.
pub fn proof_hash(tx: &Transaction) -> [u8; 32] {
    let txid = bytes_to_hex(&tx.txid);
    let summary = ProofSummary { txid: &txid, input_count: tx.inputs.len(), output_count: tx.outputs.len() };
    let json = serde_json::to_vec(&summary).unwrap_or_default();
    charm::hash(&json)
}

/// Charm hash of the transaction's canonical encoding.
pub fn charm_fingerprint(tx: &Transaction) -> [u8; 32] {
    charm::hash(&tx.to_canonical_bytes())
}

pub fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

pub fn check_spell(app: &App, tx: &Transaction, x: &Data, w: &Data) -> SpellResult {
    check_spell_at(app, tx, x, w, now_millis())
}

/// [`check_spell`] with a caller-supplied timestamp.
pub fn check_spell_at(app: &App, tx: &Transaction, x: &Data, w: &Data, timestamp: u64) -> SpellResult {
    let kind = SpellKind::from_tag(&app.tag);
    tracing::trace!(tag = %app.tag, %kind, "dispatch");
    let details = match kind {
        SpellKind::Token | SpellKind::Bollar => SpellDetails::Token(TokenDetails {
            check: token_check(app, tx, x, w),
            is_mint: is_token_mint(app, tx),
            is_burn: is_token_burn(app, tx),
        }),
        SpellKind::Nft => SpellDetails::Nft(nft_check(app, tx, x, w)),
        SpellKind::Escrow | SpellKind::Bounty => SpellDetails::Escrow(escrow_check(app, tx, x, w)),
    };
    SpellResult { kind, valid: details.valid(), details, proof_hash: proof_hash(tx), timestamp }
}

#[cfg(test)]
mod tests {
    use super::*;
    use primitives::{CharmState, TxOutput};

    #[test]
    fn routes_by_prefix() {
        assert_eq!(SpellKind::from_tag("token:USD"), SpellKind::Token);
        assert_eq!(SpellKind::from_tag("BOLLAR:x"), SpellKind::Bollar);
        assert_eq!(SpellKind::from_tag("Nft:1"), SpellKind::Nft);
        assert_eq!(SpellKind::from_tag("escrow:abc"), SpellKind::Escrow);
        assert_eq!(SpellKind::from_tag("bounty:9"), SpellKind::Bounty);
        assert_eq!(SpellKind::from_tag("mystery"), SpellKind::Token);
        assert_eq!(SpellKind::from_tag("nft"), SpellKind::Token);
        assert_eq!(SpellKind::from_tag("é"), SpellKind::Token);
    }

    #[test]
    fn bounty_uses_escrow_rules() {
        let app = App::new("bounty:7", [0u8; 32]);
        let mut tx = Transaction::new([0u8; 32]);
        tx.add_output(TxOutput {
            index: 0,
            value: 1000,
            script_pubkey: vec![],
            charm_state: Some(CharmState::new().with_app("bounty:7", Data::U64(0))),
        });
        let r = check_spell_at(&app, &tx, &Data::Empty, &Data::Empty, 42);
        assert_eq!(r.kind, SpellKind::Bounty);
        assert!(r.valid);
        assert!(matches!(r.details, SpellDetails::Escrow(_)));
        assert_eq!(r.timestamp, 42);
    }

    #[test]
    fn proof_hash_tracks_summary_only() {
        let out = |n: u64| TxOutput {
            index: 0,
            value: 546,
            script_pubkey: vec![],
            charm_state: Some(CharmState::new().with_app("token:USD", Data::U64(n))),
        };
        let mut x = Transaction::new([0u8; 32]);
        let mut y = x.clone();
        x.add_output(out(1));
        y.add_output(out(2));
        assert_eq!(proof_hash(&x), proof_hash(&y));
        assert_ne!(charm_fingerprint(&x), charm_fingerprint(&y));

        let a = Transaction::new([0u8; 32]);
        let summary = br#"{"txid":"0000000000000000000000000000000000000000000000000000000000000000","inputCount":0,"outputCount":0}"#;
        assert_eq!(proof_hash(&a), charm::hash(summary));
        assert_ne!(proof_hash(&a), proof_hash(&Transaction::new([1u8; 32])));
    }

    #[test]
    fn result_json_shape() {
        let app = App::new("token:USD", [0u8; 32]);
        let r = check_spell_at(&app, &Transaction::new([0u8; 32]), &Data::Empty, &Data::Empty, 7);
        let v = serde_json::to_value(&r).unwrap();
        assert_eq!(v["type"], "token");
        assert_eq!(v["valid"], true);
        assert_eq!(v["details"]["is_mint"], false);
        assert_eq!(v["details"]["conserved"], true);
        assert_eq!(v["timestamp"], 7);
        assert_eq!(v["proof_hash"].as_str().map(str::len), Some(64));
    }
}
