//! CLI Commands

mod build;
mod check;
mod cipher;
mod init;
mod io;

pub use build::{BuildEscrowCommand, BuildTokenCommand};
pub use check::{BatchCommand, CheckCommand};
pub use cipher::{DecryptCommand, EncryptCommand, FingerprintCommand, HashCommand};
pub use init::InitCommand;
