//! Spell invocations read from JSON: `(app, tx, x, w)` where `x` is the
//! authorization input and `w` the witness.

use std::io::Read;

use primitives::{App, Data, Transaction};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::dispatch::{check_spell, check_spell_at, SpellResult};

#[derive(Debug, Error)]
pub enum InputError {
    #[error("failed to parse spell input: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Debug)]
pub struct SpellInvocation {
    pub app: App,
    pub tx: Transaction,
    #[serde(default)]
    pub x: Data,
    #[serde(default)]
    pub w: Data,
}

impl SpellInvocation {
    pub fn new(app: App, tx: Transaction) -> Self {
        Self { app, tx, x: Data::Empty, w: Data::Empty }
    }

    pub fn check(&self) -> SpellResult {
        check_spell(&self.app, &self.tx, &self.x, &self.w)
    }

    pub fn check_at(&self, timestamp: u64) -> SpellResult {
        check_spell_at(&self.app, &self.tx, &self.x, &self.w, timestamp)
    }
}

/// Either `{"app":…,"tx":…,"x":…,"w":…}` or the positional `[app, tx, x, w]`.
#[derive(Deserialize)]
#[serde(untagged)]
enum Wire {
    Named(SpellInvocation),
    Positional(App, Transaction, Data, Data),
}

impl From<Wire> for SpellInvocation {
    fn from(w: Wire) -> Self {
        match w {
            Wire::Named(inv) => inv,
            Wire::Positional(app, tx, x, w) => SpellInvocation { app, tx, x, w },
        }
    }
}

pub fn read_spell_input<R: Read>(reader: R) -> Result<SpellInvocation, InputError> {
    let wire: Wire = serde_json::from_reader(reader)?;
    Ok(wire.into())
}

/// A JSON array of invocations, each in either form.
pub fn read_spell_batch<R: Read>(reader: R) -> Result<Vec<SpellInvocation>, InputError> {
    let wires: Vec<Wire> = serde_json::from_reader(reader)?;
    Ok(wires.into_iter().map(SpellInvocation::from).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    const TX: &str = r#"{"txid":"0000000000000000000000000000000000000000000000000000000000000000","inputs":[],"outputs":[]}"#;
    const APP: &str = r#"{"tag":"token:USD","vk_hash":"0000000000000000000000000000000000000000000000000000000000000000"}"#;

    #[test]
    fn named_form_defaults_x_and_w() {
        let json = format!(r#"{{"app":{},"tx":{}}}"#, APP, TX);
        let inv = read_spell_input(json.as_bytes()).unwrap();
        assert_eq!(inv.app.tag, "token:USD");
        assert_eq!(inv.app.params, Data::Empty);
        assert!(inv.x.is_empty() && inv.w.is_empty());
    }

    #[test]
    fn positional_form() {
        let json = format!(r#"[{},{},{{"type":"Bytes","value":"01"}},{{"type":"Empty"}}]"#, APP, TX);
        let inv = read_spell_input(json.as_bytes()).unwrap();
        assert_eq!(inv.x, Data::bytes(vec![1]));
    }

    #[test]
    fn batch_mixes_forms() {
        let json = format!(
            r#"[{{"app":{a},"tx":{t}}},[{a},{t},{{"type":"Empty"}},{{"type":"Empty"}}]]"#,
            a = APP,
            t = TX
        );
        let batch = read_spell_batch(json.as_bytes()).unwrap();
        assert_eq!(batch.len(), 2);
        assert_eq!(batch[0], batch[1]);
    }

    #[test]
    fn garbage_is_an_error() {
        assert!(read_spell_input(&b"{\"app\":1}"[..]).is_err());
        assert!(read_spell_input(&b"not json"[..]).is_err());
    }
}
