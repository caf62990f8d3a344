//! Non-fungible token rules: ids are the hex of the `bytes` state under the
//! app tag; outputs may not repeat an id, and new ids need authorization.

use std::collections::HashSet;

use primitives::{bytes_to_hex, App, Data, Transaction};
use serde::{Deserialize, Serialize};

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Debug, Default)]
pub struct NftCheck {
    pub valid: bool,
    pub input_nfts: Vec<String>,
    pub output_nfts: Vec<String>,
    pub duplicates: Vec<String>,
    pub unauthorized_mints: Vec<String>,
    pub errors: Vec<String>,
}

fn nft_ids<'a>(states: impl Iterator<Item = &'a Data>) -> Vec<String> {
    states.filter_map(Data::as_bytes).map(bytes_to_hex).collect()
}

pub fn nft_check(app: &App, tx: &Transaction, x: &Data, _w: &Data) -> NftCheck {
    let input_nfts = nft_ids(tx.input_states(&app.tag));
    let output_nfts = nft_ids(tx.output_states(&app.tag));
    let mut errors = Vec::new();

    let mut duplicates = Vec::new();
    let mut seen = HashSet::new();
    for id in &output_nfts {
        if !seen.insert(id.as_str()) {
            duplicates.push(id.clone());
            errors.push(format!("Duplicate NFT in outputs: {}", id));
        }
    }

    // Any non-empty `x` is accepted as mint authorization.
    let mut unauthorized_mints = Vec::new();
    if x.is_empty() {
        for id in output_nfts.iter().filter(|id| !input_nfts.contains(id)) {
            unauthorized_mints.push(id.clone());
            errors.push(format!("NFT mint without authorization: {}", id));
        }
    }

    let valid = duplicates.is_empty() && unauthorized_mints.is_empty();
    tracing::debug!(tag = %app.tag, inputs = input_nfts.len(), outputs = output_nfts.len(), valid, "nft check");
    NftCheck { valid, input_nfts, output_nfts, duplicates, unauthorized_mints, errors }
}

#[cfg(test)]
mod tests {
    use super::*;
    use primitives::{CharmState, TxInput, TxOutput, UtxoRef};

    const TAG: &str = "nft:art";

    fn tx(inputs: &[&[u8]], outputs: &[&[u8]]) -> Transaction {
        let mut tx = Transaction::new([0u8; 32]);
        for (vout, id) in inputs.iter().enumerate() {
            tx.add_input(TxInput {
                utxo_ref: UtxoRef { txid: [2u8; 32], vout: vout as u32 },
                charm_state: Some(CharmState::new().with_app(TAG, Data::bytes(id.to_vec()))),
            });
        }
        for (index, id) in outputs.iter().enumerate() {
            tx.add_output(TxOutput {
                index: index as u32,
                value: 546,
                script_pubkey: vec![],
                charm_state: Some(CharmState::new().with_app(TAG, Data::bytes(id.to_vec()))),
            });
        }
        tx
    }

    fn app() -> App { App::new(TAG, [0u8; 32]) }

    #[test]
    fn transfer_keeps_ids() {
        let t = tx(&[&[0xaa], &[0xbb]], &[&[0xbb], &[0xaa]]);
        let r = nft_check(&app(), &t, &Data::Empty, &Data::Empty);
        assert!(r.valid);
        assert_eq!(r.input_nfts, vec!["aa", "bb"]);
        assert_eq!(r.output_nfts, vec!["bb", "aa"]);
    }

    #[test]
    fn duplicate_outputs_are_flagged() {
        let t = tx(&[&[0xaa]], &[&[0xaa], &[0xaa]]);
        let r = nft_check(&app(), &t, &Data::Empty, &Data::Empty);
        assert!(!r.valid);
        assert_eq!(r.duplicates, vec!["aa"]);
        assert_eq!(r.errors, vec!["Duplicate NFT in outputs: aa".to_string()]);
    }

    #[test]
    fn mint_needs_non_empty_auth() {
        let t = tx(&[], &[&[0x01, 0x02]]);
        let r = nft_check(&app(), &t, &Data::Empty, &Data::Empty);
        assert!(!r.valid);
        assert_eq!(r.unauthorized_mints, vec!["0102"]);
        assert_eq!(r.errors, vec!["NFT mint without authorization: 0102".to_string()]);

        let signed = nft_check(&app(), &t, &Data::bytes(vec![9]), &Data::Empty);
        assert!(signed.valid && signed.unauthorized_mints.is_empty());

        for x in [Data::bytes(vec![]), Data::U64(1)] {
            let r = nft_check(&app(), &t, &x, &Data::Empty);
            assert!(r.valid, "{:?}", x);
            assert!(r.unauthorized_mints.is_empty());
            assert!(r.errors.is_empty());
        }
    }

    #[test]
    fn burning_is_allowed() {
        let t = tx(&[&[0xaa]], &[]);
        assert!(nft_check(&app(), &t, &Data::Empty, &Data::Empty).valid);
    }
}
