//! Build Commands - synthesize transactions for the checkers

use anyhow::Context;
use clap::Args;
use primitives::hex_to_array;
use spells::{
    build_escrow_transaction_with, build_token_transaction_with, EscrowTxParams, IdGenerator, RandomIds, SeededIds,
    SpellInvocation, TokenTxParams, ZeroIds,
};

use super::io::print_json;
use crate::config::CharmixConfig;

/// Where txids and vk handles come from
#[derive(Args)]
pub struct IdArgs {
    /// Derive ids from a 32-byte hex seed
    #[arg(long, conflicts_with = "random_ids")]
    seed: Option<String>,

    /// Draw ids from the OS RNG
    #[arg(long)]
    random_ids: bool,
}

impl IdArgs {
    fn generator(&self) -> anyhow::Result<Box<dyn IdGenerator>> {
        if let Some(seed) = &self.seed {
            let seed = hex_to_array::<32>(seed).context("decoding --seed")?;
            return Ok(Box::new(SeededIds::new(seed)));
        }
        if self.random_ids {
            return Ok(Box::new(RandomIds));
        }
        Ok(Box::new(ZeroIds))
    }
}

/// Build a token transfer; output is ready for `charmix check`
#[derive(Args)]
pub struct BuildTokenCommand {
    /// App tag, e.g. token:USD
    #[arg(long)]
    tag: String,

    /// Verification key hash, 32 bytes hex (zero when omitted)
    #[arg(long)]
    vk: Option<String>,

    /// Comma-separated input amounts
    #[arg(long, value_delimiter = ',')]
    inputs: Vec<u64>,

    /// Comma-separated output amounts
    #[arg(long, value_delimiter = ',')]
    outputs: Vec<u64>,

    #[command(flatten)]
    ids: IdArgs,
}

impl BuildTokenCommand {
    fn invocation(&self) -> anyhow::Result<SpellInvocation> {
        let vk_hash = match &self.vk {
            Some(vk) => hex_to_array::<32>(vk).context("decoding --vk")?,
            None => [0u8; 32],
        };
        let params = TokenTxParams {
            app_tag: self.tag.clone(),
            vk_hash,
            input_amounts: self.inputs.clone(),
            output_amounts: self.outputs.clone(),
        };
        let mut ids = self.ids.generator()?;
        let built = build_token_transaction_with(&params, ids.as_mut());
        Ok(SpellInvocation::new(built.app, built.tx))
    }

    pub fn execute(self, config: &CharmixConfig) -> anyhow::Result<()> {
        print_json(&self.invocation()?, config.output.pretty)
    }
}

/// Build an escrow state transition; output is ready for `charmix check`
#[derive(Args)]
pub struct BuildEscrowCommand {
    /// App tag, e.g. escrow:deal-1
    #[arg(long)]
    tag: String,

    /// Current state code (omit for a new escrow)
    #[arg(long)]
    current: Option<u64>,

    /// Next state code: 0 Created, 1 Funded, 2 Released, 3 Disputed,
    /// 4 Refunded, 100+i MilestoneCompleted(i)
    #[arg(long)]
    next: u64,

    /// Sats locked in the escrow output
    #[arg(long, default_value_t = 0)]
    amount: u64,

    #[command(flatten)]
    ids: IdArgs,
}

impl BuildEscrowCommand {
    fn invocation(&self) -> anyhow::Result<SpellInvocation> {
        let params = EscrowTxParams {
            app_tag: self.tag.clone(),
            current_state: self.current,
            next_state: self.next,
            amount: self.amount,
        };
        let mut ids = self.ids.generator()?;
        let built = build_escrow_transaction_with(&params, ids.as_mut());
        Ok(SpellInvocation::new(built.app, built.tx))
    }

    pub fn execute(self, config: &CharmixConfig) -> anyhow::Result<()> {
        print_json(&self.invocation()?, config.output.pretty)
    }
}
