//! Minimal transactions for exercising the checkers: one UTXO per amount or
//! state code, all carrying the app tag.

use primitives::{App, CharmState, Data, Transaction, TxInput, TxOutput, UtxoRef};
use serde::{Deserialize, Serialize};

use crate::ids::{IdGenerator, ZeroIds};

/// Dust-limit output value used for token outputs.
pub const DUST_VALUE: u64 = 546;
/// P2WPKH witness program prefix.
pub const DEFAULT_SCRIPT: [u8; 2] = [0x00, 0x14];

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Debug, Default)]
pub struct TokenTxParams {
    pub app_tag: String,
    #[serde(with = "primitives::hexutil::hex_array", default)]
    pub vk_hash: [u8; 32],
    #[serde(default)]
    pub input_amounts: Vec<u64>,
    #[serde(default)]
    pub output_amounts: Vec<u64>,
}

/// States are raw codes so that unrecognised codes can be exercised too.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Debug, Default)]
pub struct EscrowTxParams {
    pub app_tag: String,
    #[serde(default)]
    pub current_state: Option<u64>,
    pub next_state: u64,
    pub amount: u64,
}

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Debug)]
pub struct BuiltSpell {
    pub app: App,
    pub tx: Transaction,
}

fn carrying(tag: &str, d: Data) -> Option<CharmState> {
    Some(CharmState::new().with_app(tag, d))
}

pub fn build_token_transaction(params: &TokenTxParams) -> BuiltSpell {
    build_token_transaction_with(params, &mut ZeroIds)
}

pub fn build_token_transaction_with<G: IdGenerator + ?Sized>(params: &TokenTxParams, ids: &mut G) -> BuiltSpell {
    let tag = params.app_tag.as_str();
    let mut tx = Transaction::new(ids.next_id());
    for (vout, amount) in params.input_amounts.iter().enumerate() {
        tx.add_input(TxInput {
            utxo_ref: UtxoRef { txid: ids.next_id(), vout: vout as u32 },
            charm_state: carrying(tag, Data::U64(*amount)),
        });
    }
    for (index, amount) in params.output_amounts.iter().enumerate() {
        tx.add_output(TxOutput {
            index: index as u32,
            value: DUST_VALUE,
            script_pubkey: DEFAULT_SCRIPT.to_vec(),
            charm_state: carrying(tag, Data::U64(*amount)),
        });
    }
    BuiltSpell { app: App::new(tag, params.vk_hash), tx }
}

pub fn build_escrow_transaction(params: &EscrowTxParams) -> BuiltSpell {
    build_escrow_transaction_with(params, &mut ZeroIds)
}

/// The escrow output locks `amount` sats; there is an input only when a
/// current state is given.
pub fn build_escrow_transaction_with<G: IdGenerator + ?Sized>(params: &EscrowTxParams, ids: &mut G) -> BuiltSpell {
    let tag = params.app_tag.as_str();
    let app = App::new(tag, ids.next_id());
    let mut tx = Transaction::new(ids.next_id());
    if let Some(code) = params.current_state {
        tx.add_input(TxInput {
            utxo_ref: UtxoRef { txid: ids.next_id(), vout: 0 },
            charm_state: carrying(tag, Data::U64(code)),
        });
    }
    tx.add_output(TxOutput {
        index: 0,
        value: params.amount,
        script_pubkey: DEFAULT_SCRIPT.to_vec(),
        charm_state: carrying(tag, Data::U64(params.next_state)),
    });
    BuiltSpell { app, tx }
}
