//! Check Commands - run spells through the checkers

use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use serde::Serialize;
use spells::{check_batch, read_spell_batch, read_spell_input, summarize, BatchSummary, SpellResult};

use super::io::{open_input, print_json};
use crate::config::CharmixConfig;

/// Check one spell invocation (`{app, tx, x, w}` or `[app, tx, x, w]`)
#[derive(Args)]
pub struct CheckCommand {
    /// Input JSON file; stdin when omitted
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Fail when the spell is not valid
    #[arg(long)]
    strict: bool,

    /// Fixed timestamp in UNIX milliseconds
    #[arg(long)]
    timestamp: Option<u64>,
}

impl CheckCommand {
    pub fn execute(self, config: &CharmixConfig) -> anyhow::Result<()> {
        let reader = open_input(self.input.as_deref())?;
        let invocation = read_spell_input(reader).context("reading spell input")?;
        let result = match self.timestamp {
            Some(ts) => invocation.check_at(ts),
            None => invocation.check(),
        };
        tracing::info!(tag = %invocation.app.tag, kind = %result.kind, valid = result.valid, "spell checked");
        print_json(&result, config.output.pretty)?;
        if self.strict && !result.valid {
            anyhow::bail!("spell is not valid: {}", result.details.errors().join("; "));
        }
        Ok(())
    }
}

/// Check a JSON array of spell invocations
#[derive(Args)]
pub struct BatchCommand {
    /// Input JSON file; stdin when omitted
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Check entries one after another instead of on the thread pool
    #[arg(long)]
    sequential: bool,
}

#[derive(Serialize)]
struct BatchReport {
    summary: BatchSummary,
    results: Vec<SpellResult>,
}

impl BatchCommand {
    pub fn execute(self, config: &CharmixConfig) -> anyhow::Result<()> {
        let reader = open_input(self.input.as_deref())?;
        let items = read_spell_batch(reader).context("reading spell batch")?;
        let parallel = config.batch.parallel && !self.sequential;
        let results = check_batch(&items, parallel);
        let summary = summarize(&results);
        tracing::info!(total = summary.total, valid = summary.valid, invalid = summary.invalid, "batch checked");
        print_json(&BatchReport { summary, results }, config.output.pretty)
    }
}
