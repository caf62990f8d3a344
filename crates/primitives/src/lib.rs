//! Charms data model: typed app state, apps, and ledger transactions.

pub mod data;
pub mod types;
pub mod encode;
pub mod digest;
pub mod hexutil;

// Re-export all public items from modules for convenience
pub use data::*;
pub use types::*;
pub use digest::*;
pub use hexutil::{bytes_to_hex, hex_to_array, hex_to_bytes, HexError};
