//! Ledger transaction model: apps, UTXOs and the charm state they carry.

use core::fmt;
use std::collections::BTreeMap;

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

use crate::data::{Data, DataError};

pub const TXID_LEN: usize = 32;
pub const VK_HASH_LEN: usize = 32;

/// Application descriptor. `vk_hash` is an opaque authorization handle and is
/// never checked cryptographically here.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Debug)]
pub struct App {
    /// Namespaced identifier, e.g. `token:USD` or `escrow:<id>`.
    pub tag: String,
    #[serde(with = "crate::hexutil::hex_array")]
    pub vk_hash: [u8; VK_HASH_LEN],
    #[serde(default)]
    pub params: Data,
}

impl App {
    pub fn new(tag: impl Into<String>, vk_hash: [u8; VK_HASH_LEN]) -> Self {
        Self { tag: tag.into(), vk_hash, params: Data::Empty }
    }

    pub fn with_params(tag: impl Into<String>, vk_hash: [u8; VK_HASH_LEN], params: Data) -> Self {
        Self { tag: tag.into(), vk_hash, params }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Debug, Default)]
pub struct UtxoRef {
    #[serde(with = "crate::hexutil::hex_array")]
    pub txid: [u8; TXID_LEN],
    pub vout: u32,
}

/// Per-UTXO application state, keyed by app tag.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Debug, Default)]
pub struct CharmState {
    #[serde(deserialize_with = "unique_apps")]
    pub apps: BTreeMap<String, Data>,
}

/// A repeated tag is an error, not last-wins.
fn unique_apps<'de, D>(deserializer: D) -> Result<BTreeMap<String, Data>, D::Error>
where
    D: Deserializer<'de>,
{
    struct AppsVisitor;
    impl<'de> Visitor<'de> for AppsVisitor {
        type Value = BTreeMap<String, Data>;
        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            write!(f, "a map of app tags to data values")
        }
        fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
        where
            A: MapAccess<'de>,
        {
            let mut out = BTreeMap::new();
            while let Some((tag, state)) = access.next_entry::<String, Data>()? {
                if out.contains_key(&tag) {
                    return Err(serde::de::Error::custom(DataError::DuplicateKey(tag)));
                }
                out.insert(tag, state);
            }
            Ok(out)
        }
    }
    deserializer.deserialize_map(AppsVisitor)
}

impl CharmState {
    pub fn new() -> Self { Self::default() }

    pub fn with_app(mut self, tag: impl Into<String>, state: Data) -> Self {
        self.apps.insert(tag.into(), state);
        self
    }

    pub fn get(&self, tag: &str) -> Option<&Data> {
        self.apps.get(tag)
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.apps.contains_key(tag)
    }
}

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Debug)]
pub struct TxInput {
    pub utxo_ref: UtxoRef,
    #[serde(default)]
    pub charm_state: Option<CharmState>,
}

impl TxInput {
    /// State stored under `tag`, if this input carries that app.
    pub fn app_state(&self, tag: &str) -> Option<&Data> {
        self.charm_state.as_ref()?.get(tag)
    }
}

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Debug)]
pub struct TxOutput {
    pub index: u32,
    /// Amount in satoshis.
    pub value: u64,
    #[serde(with = "crate::hexutil::hex_vec")]
    pub script_pubkey: Vec<u8>,
    #[serde(default)]
    pub charm_state: Option<CharmState>,
}

impl TxOutput {
    pub fn app_state(&self, tag: &str) -> Option<&Data> {
        self.charm_state.as_ref()?.get(tag)
    }
}

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Debug)]
pub struct Transaction {
    #[serde(with = "crate::hexutil::hex_array")]
    pub txid: [u8; TXID_LEN],
    pub inputs: Vec<TxInput>,
    pub outputs: Vec<TxOutput>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spell: Option<NormalizedSpell>,
}

impl Transaction {
    pub fn new(txid: [u8; TXID_LEN]) -> Self {
        Self { txid, inputs: vec![], outputs: vec![], spell: None }
    }

    pub fn add_input(&mut self, input: TxInput) { self.inputs.push(input); }

    pub fn add_output(&mut self, output: TxOutput) { self.outputs.push(output); }

    /// App states under `tag` across inputs, in input order.
    pub fn input_states<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a Data> + 'a {
        self.inputs.iter().filter_map(move |i| i.app_state(tag))
    }

    /// App states under `tag` across outputs, in output order.
    pub fn output_states<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a Data> + 'a {
        self.outputs.iter().filter_map(move |o| o.app_state(tag))
    }

    /// A transaction without an attached spell places no charm constraints.
    pub fn verify_spell(&self) -> bool {
        self.spell.as_ref().map_or(true, NormalizedSpell::verify)
    }
}

// ————————————————————————————————————————————————————————————————————————————
// Normalized spell: the shape committed as public input when proving.
// ————————————————————————————————————————————————————————————————————————————

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Debug)]
pub struct SpellIn {
    pub utxo_ref: UtxoRef,
    #[serde(default)]
    pub charms: Option<CharmState>,
}

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Debug)]
pub struct SpellOut {
    pub index: u32,
    #[serde(default)]
    pub charms: Option<CharmState>,
}

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Debug)]
pub struct NormalizedSpell {
    pub version: u32,
    pub ins: Vec<SpellIn>,
    pub outs: Vec<SpellOut>,
}

impl NormalizedSpell {
    pub fn new(version: u32) -> Self {
        Self { version, ins: vec![], outs: vec![] }
    }

    /// Well-formedness only: a versioned spell spending and creating something.
    pub fn verify(&self) -> bool {
        self.version > 0 && !self.ins.is_empty() && !self.outs.is_empty()
    }
}
