//! Checking many invocations at once.

use rayon::prelude::*;
use serde::Serialize;

use crate::dispatch::{now_millis, SpellResult};
use crate::input::SpellInvocation;

#[derive(Clone, Copy, PartialEq, Eq, Serialize, Debug, Default)]
pub struct BatchSummary {
    pub total: usize,
    pub valid: usize,
    pub invalid: usize,
}

/// Results come back in input order and share one timestamp.
pub fn check_batch(items: &[SpellInvocation], parallel: bool) -> Vec<SpellResult> {
    let timestamp = now_millis();
    tracing::debug!(count = items.len(), parallel, "checking batch");
    if parallel {
        items.par_iter().map(|inv| inv.check_at(timestamp)).collect()
    } else {
        items.iter().map(|inv| inv.check_at(timestamp)).collect()
    }
}

pub fn summarize(results: &[SpellResult]) -> BatchSummary {
    let valid = results.iter().filter(|r| r.valid).count();
    BatchSummary { total: results.len(), valid, invalid: results.len() - valid }
}
