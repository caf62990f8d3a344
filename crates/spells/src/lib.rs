//! Spell checkers for charm apps.
//!
//! Each checker inspects the app state a transaction carries under one app
//! tag and returns a structured verdict. Checkers never fail: missing or
//! mistyped state counts as absent and shows up as `valid: false` with
//! messages in `errors`.

pub mod token;
pub mod nft;
pub mod escrow;
pub mod dispatch;
pub mod builder;
pub mod ids;
pub mod input;
pub mod batch;

// Re-export all public items from modules for convenience
pub use token::*;
pub use nft::*;
pub use escrow::*;
pub use dispatch::*;
pub use builder::*;
pub use ids::*;
pub use input::*;
pub use batch::*;
