//! Fungible token rules: conservation of the summed amounts plus a coarse
//! authorization check on `x`.

use primitives::{App, Data, Transaction};
use serde::{Deserialize, Serialize};

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Debug, Default)]
pub struct TokenCheck {
    pub valid: bool,
    pub input_sum: u128,
    pub output_sum: u128,
    pub conserved: bool,
    pub authorized: bool,
    pub errors: Vec<String>,
}

fn amount(d: &Data) -> u128 {
    d.as_u64().map_or(0, u128::from)
}

/// Summed `u64` amounts under the app tag over inputs and outputs. Absent or
/// non-`u64` state counts as zero.
pub fn token_sums(app: &App, tx: &Transaction) -> (u128, u128) {
    let input_sum = tx.input_states(&app.tag).map(amount).sum();
    let output_sum = tx.output_states(&app.tag).map(amount).sum();
    (input_sum, output_sum)
}

/// `Empty` authorization is accepted by omission; anything else must be
/// non-empty bytes.
pub(crate) fn authorization_error(x: &Data) -> Option<String> {
    match x {
        Data::Empty => None,
        Data::Bytes(b) if !b.is_empty() => None,
        Data::Bytes(_) => Some("Empty authorization data".to_string()),
        other => Some(format!("Invalid authorization data: expected bytes, got {}", other.kind())),
    }
}

pub fn token_check(app: &App, tx: &Transaction, x: &Data, _w: &Data) -> TokenCheck {
    let (input_sum, output_sum) = token_sums(app, tx);
    let conserved = input_sum == output_sum;
    let authorized = x.as_bytes().map_or(false, |b| !b.is_empty());

    let mut errors = Vec::new();
    if !conserved {
        errors.push(format!("Token conservation failed: input={} != output={}", input_sum, output_sum));
    }
    if let Some(e) = authorization_error(x) {
        errors.push(e);
    }

    let valid = conserved && (authorized || x.is_empty());
    tracing::debug!(tag = %app.tag, %input_sum, %output_sum, valid, "token check");
    TokenCheck { valid, input_sum, output_sum, conserved, authorized, errors }
}

/// No input carries the tag while at least one output does. Presence only,
/// amounts are not compared.
pub fn is_token_mint(app: &App, tx: &Transaction) -> bool {
    tx.input_states(&app.tag).next().is_none() && tx.output_states(&app.tag).next().is_some()
}

pub fn is_token_burn(app: &App, tx: &Transaction) -> bool {
    let (input_sum, output_sum) = token_sums(app, tx);
    input_sum > output_sum
}

#[cfg(test)]
mod tests {
    use super::*;
    use primitives::{CharmState, TxInput, TxOutput, UtxoRef};

    const TAG: &str = "token:USD";

    fn tx(inputs: &[Option<Data>], outputs: &[Option<Data>]) -> Transaction {
        let mut tx = Transaction::new([0u8; 32]);
        for (vout, d) in inputs.iter().enumerate() {
            tx.add_input(TxInput {
                utxo_ref: UtxoRef { txid: [1u8; 32], vout: vout as u32 },
                charm_state: d.clone().map(|d| CharmState::new().with_app(TAG, d)),
            });
        }
        for (index, d) in outputs.iter().enumerate() {
            tx.add_output(TxOutput {
                index: index as u32,
                value: 546,
                script_pubkey: vec![0x00, 0x14],
                charm_state: d.clone().map(|d| CharmState::new().with_app(TAG, d)),
            });
        }
        tx
    }

    fn app() -> App { App::new(TAG, [0u8; 32]) }

    #[test]
    fn balanced_transfer_is_valid() {
        let t = tx(&[Some(Data::U64(60)), Some(Data::U64(40))], &[Some(Data::U64(100))]);
        let r = token_check(&app(), &t, &Data::Empty, &Data::Empty);
        assert!(r.valid && r.conserved && !r.authorized);
        assert_eq!((r.input_sum, r.output_sum), (100, 100));
        assert!(r.errors.is_empty());
    }

    #[test]
    fn imbalance_names_both_sums() {
        let t = tx(&[Some(Data::U64(100))], &[Some(Data::U64(90))]);
        let r = token_check(&app(), &t, &Data::Empty, &Data::Empty);
        assert!(!r.valid && !r.conserved);
        assert_eq!(r.errors, vec!["Token conservation failed: input=100 != output=90".to_string()]);
        assert!(is_token_burn(&app(), &t));
    }

    #[test]
    fn authorization_rules() {
        let t = tx(&[Some(Data::U64(5))], &[Some(Data::U64(5))]);
        let ok = token_check(&app(), &t, &Data::bytes(vec![1]), &Data::Empty);
        assert!(ok.valid && ok.authorized);

        let empty = token_check(&app(), &t, &Data::bytes(vec![]), &Data::Empty);
        assert!(!empty.valid && !empty.authorized);
        assert_eq!(empty.errors, vec!["Empty authorization data".to_string()]);

        let wrong = token_check(&app(), &t, &Data::U64(1), &Data::Empty);
        assert!(!wrong.valid);
        assert_eq!(wrong.errors.len(), 1);
    }

    #[test]
    fn conservation_error_comes_first() {
        let t = tx(&[Some(Data::U64(1))], &[]);
        let r = token_check(&app(), &t, &Data::bytes(vec![]), &Data::Empty);
        assert_eq!(r.errors.len(), 2);
        assert!(r.errors[0].starts_with("Token conservation failed"));
        assert_eq!(r.errors[1], "Empty authorization data");
    }

    #[test]
    fn mistyped_state_counts_as_zero_but_present() {
        let t = tx(&[Some(Data::string("100"))], &[Some(Data::U64(0))]);
        let r = token_check(&app(), &t, &Data::Empty, &Data::Empty);
        assert_eq!((r.input_sum, r.output_sum), (0, 0));
        assert!(r.valid);
        assert!(!is_token_mint(&app(), &t));
    }

    #[test]
    fn sums_do_not_overflow() {
        let t = tx(&[Some(Data::U64(u64::MAX)), Some(Data::U64(u64::MAX))], &[]);
        let (i, _) = token_sums(&app(), &t);
        assert_eq!(i, 2 * u128::from(u64::MAX));
    }

    #[test]
    fn empty_transaction_is_trivially_valid() {
        let t = tx(&[], &[]);
        let r = token_check(&app(), &t, &Data::Empty, &Data::Empty);
        assert!(r.valid && r.conserved);
        assert!(!is_token_mint(&app(), &t));
        assert!(!is_token_burn(&app(), &t));
    }

    #[test]
    fn other_tags_are_ignored() {
        let mut t = tx(&[], &[Some(Data::U64(7))]);
        t.add_input(TxInput {
            utxo_ref: UtxoRef::default(),
            charm_state: Some(CharmState::new().with_app("token:EUR", Data::U64(7))),
        });
        assert!(is_token_mint(&app(), &t));
        assert_eq!(token_sums(&app(), &t), (0, 7));
    }
}
