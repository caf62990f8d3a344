//! Canonical binary encoding for data values and transactions.

use anyhow::{anyhow, Result};

use crate::data::{Data, DataMap};
use crate::types::*;

// ——— Canonical encoding version ———

const ENC_V1: u8 = 1; // version tag for canonical encodings

/// Nesting limit for lists and maps when decoding untrusted bytes.
pub const MAX_DATA_DEPTH: usize = 64;

const TAG_EMPTY: u8 = 0;
const TAG_BOOL: u8 = 1;
const TAG_U64: u8 = 2;
const TAG_I64: u8 = 3;
const TAG_BYTES: u8 = 4;
const TAG_STRING: u8 = 5;
const TAG_LIST: u8 = 6;
const TAG_MAP: u8 = 7;

impl Data {
    pub fn to_canonical_bytes(&self) -> Vec<u8> {
        let mut out = Vec::new();
        out.push(ENC_V1);
        encode_data(self, &mut out);
        out
    }

    pub fn from_canonical_bytes(mut data: &[u8]) -> Result<Self> {
        let ver = read_u8(&mut data)?;
        if ver != ENC_V1 { return Err(anyhow!("unsupported encoding version: {}", ver)); }
        let d = decode_data(&mut data, 0)?;
        if !data.is_empty() { return Err(anyhow!("trailing bytes in Data")); }
        Ok(d)
    }
}

impl Transaction {
    pub fn to_canonical_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(1 + TXID_LEN + 8);
        out.push(ENC_V1);
        out.extend_from_slice(&self.txid);
        encode_u32(self.inputs.len() as u32, &mut out);
        for input in &self.inputs {
            encode_utxo_ref(&input.utxo_ref, &mut out);
            encode_opt_state(input.charm_state.as_ref(), &mut out);
        }
        encode_u32(self.outputs.len() as u32, &mut out);
        for output in &self.outputs {
            encode_u32(output.index, &mut out);
            encode_u64(output.value, &mut out);
            encode_bytes(&output.script_pubkey, &mut out);
            encode_opt_state(output.charm_state.as_ref(), &mut out);
        }
        match &self.spell {
            None => encode_u8(0, &mut out),
            Some(spell) => {
                encode_u8(1, &mut out);
                encode_spell(spell, &mut out);
            }
        }
        out
    }

    pub fn from_canonical_bytes(mut data: &[u8]) -> Result<Self> {
        let ver = read_u8(&mut data)?;
        if ver != ENC_V1 { return Err(anyhow!("unsupported encoding version: {}", ver)); }
        let txid = read_fixed::<TXID_LEN>(&mut data)?;
        let n_in = read_u32(&mut data)? as usize;
        let mut inputs = Vec::with_capacity(n_in.min(1024));
        for _ in 0..n_in {
            let utxo_ref = decode_utxo_ref(&mut data)?;
            let charm_state = decode_opt_state(&mut data)?;
            inputs.push(TxInput { utxo_ref, charm_state });
        }
        let n_out = read_u32(&mut data)? as usize;
        let mut outputs = Vec::with_capacity(n_out.min(1024));
        for _ in 0..n_out {
            let index = read_u32(&mut data)?;
            let value = read_u64(&mut data)?;
            let script_pubkey = read_vec(&mut data)?;
            let charm_state = decode_opt_state(&mut data)?;
            outputs.push(TxOutput { index, value, script_pubkey, charm_state });
        }
        let spell = match read_u8(&mut data)? {
            0 => None,
            1 => Some(decode_spell(&mut data)?),
            f => return Err(anyhow!("invalid option flag: {}", f)),
        };
        if !data.is_empty() { return Err(anyhow!("trailing bytes in Transaction")); }
        Ok(Transaction { txid, inputs, outputs, spell })
    }
}

// ——— Encoding primitives ———

pub fn encode_u8(v: u8, out: &mut Vec<u8>) { out.push(v); }
pub fn encode_u32(v: u32, out: &mut Vec<u8>) { out.extend_from_slice(&v.to_be_bytes()); }
pub fn encode_u64(v: u64, out: &mut Vec<u8>) { out.extend_from_slice(&v.to_be_bytes()); }

pub fn read_u8(data: &mut &[u8]) -> Result<u8> {
    let (&v, rest) = data.split_first().ok_or_else(|| anyhow!("unexpected EOF"))?;
    *data = rest;
    Ok(v)
}

pub fn read_u32(data: &mut &[u8]) -> Result<u32> {
    Ok(u32::from_be_bytes(read_fixed::<4>(data)?))
}

pub fn read_u64(data: &mut &[u8]) -> Result<u64> {
    Ok(u64::from_be_bytes(read_fixed::<8>(data)?))
}

pub fn encode_bytes(bytes: &[u8], out: &mut Vec<u8>) {
    encode_u32(bytes.len() as u32, out);
    out.extend_from_slice(bytes);
}

pub fn read_vec(data: &mut &[u8]) -> Result<Vec<u8>> {
    let len = read_u32(data)? as usize;
    if data.len() < len { return Err(anyhow!("unexpected EOF")); }
    let v = data[..len].to_vec();
    *data = &data[len..];
    Ok(v)
}

pub fn read_fixed<const N: usize>(data: &mut &[u8]) -> Result<[u8; N]> {
    if data.len() < N { return Err(anyhow!("unexpected EOF")); }
    let mut out = [0u8; N];
    out.copy_from_slice(&data[..N]);
    *data = &data[N..];
    Ok(out)
}

fn read_string(data: &mut &[u8]) -> Result<String> {
    String::from_utf8(read_vec(data)?).map_err(|e| anyhow!("invalid utf-8: {}", e))
}

// ——— Data ———

fn encode_data(d: &Data, out: &mut Vec<u8>) {
    match d {
        Data::Empty => encode_u8(TAG_EMPTY, out),
        Data::Bool(b) => { encode_u8(TAG_BOOL, out); encode_u8(*b as u8, out); }
        Data::U64(v) => { encode_u8(TAG_U64, out); encode_u64(*v, out); }
        Data::I64(v) => { encode_u8(TAG_I64, out); out.extend_from_slice(&v.to_be_bytes()); }
        Data::Bytes(b) => { encode_u8(TAG_BYTES, out); encode_bytes(b, out); }
        Data::String(s) => { encode_u8(TAG_STRING, out); encode_bytes(s.as_bytes(), out); }
        Data::List(items) => {
            encode_u8(TAG_LIST, out);
            encode_u32(items.len() as u32, out);
            for item in items { encode_data(item, out); }
        }
        Data::Map(m) => {
            encode_u8(TAG_MAP, out);
            encode_u32(m.len() as u32, out);
            for (k, v) in m.iter() {
                encode_bytes(k.as_bytes(), out);
                encode_data(v, out);
            }
        }
    }
}

fn decode_data(data: &mut &[u8], depth: usize) -> Result<Data> {
    if depth > MAX_DATA_DEPTH { return Err(anyhow!("data nested deeper than {}", MAX_DATA_DEPTH)); }
    Ok(match read_u8(data)? {
        TAG_EMPTY => Data::Empty,
        TAG_BOOL => match read_u8(data)? {
            0 => Data::Bool(false),
            1 => Data::Bool(true),
            b => return Err(anyhow!("invalid bool byte: {}", b)),
        },
        TAG_U64 => Data::U64(read_u64(data)?),
        TAG_I64 => Data::I64(i64::from_be_bytes(read_fixed::<8>(data)?)),
        TAG_BYTES => Data::Bytes(read_vec(data)?),
        TAG_STRING => Data::String(read_string(data)?),
        TAG_LIST => {
            let len = read_u32(data)? as usize;
            let mut items = Vec::with_capacity(len.min(1024));
            for _ in 0..len { items.push(decode_data(data, depth + 1)?); }
            Data::List(items)
        }
        TAG_MAP => {
            let len = read_u32(data)? as usize;
            let mut m = DataMap::new();
            for _ in 0..len {
                let k = read_string(data)?;
                let v = decode_data(data, depth + 1)?;
                m.insert(k, v)?;
            }
            Data::Map(m)
        }
        t => return Err(anyhow!("unknown data tag: {}", t)),
    })
}

// ——— Transaction parts ———

fn encode_utxo_ref(r: &UtxoRef, out: &mut Vec<u8>) {
    out.extend_from_slice(&r.txid);
    encode_u32(r.vout, out);
}

fn decode_utxo_ref(data: &mut &[u8]) -> Result<UtxoRef> {
    let txid = read_fixed::<TXID_LEN>(data)?;
    let vout = read_u32(data)?;
    Ok(UtxoRef { txid, vout })
}

fn encode_state(s: &CharmState, out: &mut Vec<u8>) {
    encode_u32(s.apps.len() as u32, out);
    for (tag, d) in &s.apps {
        encode_bytes(tag.as_bytes(), out);
        encode_data(d, out);
    }
}

fn decode_state(data: &mut &[u8]) -> Result<CharmState> {
    let len = read_u32(data)? as usize;
    let mut state = CharmState::new();
    for _ in 0..len {
        let tag = read_string(data)?;
        let d = decode_data(data, 0)?;
        if state.apps.insert(tag.clone(), d).is_some() {
            return Err(anyhow!("duplicate app tag in charm state: {}", tag));
        }
    }
    Ok(state)
}

fn encode_opt_state(s: Option<&CharmState>, out: &mut Vec<u8>) {
    match s {
        None => encode_u8(0, out),
        Some(s) => { encode_u8(1, out); encode_state(s, out); }
    }
}

fn decode_opt_state(data: &mut &[u8]) -> Result<Option<CharmState>> {
    match read_u8(data)? {
        0 => Ok(None),
        1 => Ok(Some(decode_state(data)?)),
        f => Err(anyhow!("invalid option flag: {}", f)),
    }
}

fn encode_spell(spell: &NormalizedSpell, out: &mut Vec<u8>) {
    encode_u32(spell.version, out);
    encode_u32(spell.ins.len() as u32, out);
    for i in &spell.ins {
        encode_utxo_ref(&i.utxo_ref, out);
        encode_opt_state(i.charms.as_ref(), out);
    }
    encode_u32(spell.outs.len() as u32, out);
    for o in &spell.outs {
        encode_u32(o.index, out);
        encode_opt_state(o.charms.as_ref(), out);
    }
}

fn decode_spell(data: &mut &[u8]) -> Result<NormalizedSpell> {
    let version = read_u32(data)?;
    let n_in = read_u32(data)? as usize;
    let mut ins = Vec::with_capacity(n_in.min(1024));
    for _ in 0..n_in {
        let utxo_ref = decode_utxo_ref(data)?;
        let charms = decode_opt_state(data)?;
        ins.push(SpellIn { utxo_ref, charms });
    }
    let n_out = read_u32(data)? as usize;
    let mut outs = Vec::with_capacity(n_out.min(1024));
    for _ in 0..n_out {
        let index = read_u32(data)?;
        let charms = decode_opt_state(data)?;
        outs.push(SpellOut { index, charms });
    }
    Ok(NormalizedSpell { version, ins, outs })
}
