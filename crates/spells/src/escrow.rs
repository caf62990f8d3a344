//! Escrow state machine. The state lives as a `u64` code under the app tag;
//! the spending input holds the current state and the first output carrying
//! the tag holds the next one.

use core::fmt;

use primitives::{App, Data, Transaction};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Debug)]
pub enum EscrowState {
    Created,
    Funded,
    Released,
    Disputed,
    Refunded,
    MilestoneCompleted(u64),
}

impl EscrowState {
    /// Codes at or above this value encode `MilestoneCompleted(code - 100)`.
    pub const MILESTONE_BASE: u64 = 100;

    /// Decode a state code. Codes 5..=99 are not states.
    pub fn from_code(code: u64) -> Option<Self> {
        match code {
            0 => Some(Self::Created),
            1 => Some(Self::Funded),
            2 => Some(Self::Released),
            3 => Some(Self::Disputed),
            4 => Some(Self::Refunded),
            n if n >= Self::MILESTONE_BASE => Some(Self::MilestoneCompleted(n - Self::MILESTONE_BASE)),
            _ => None,
        }
    }

    pub fn from_data(d: &Data) -> Option<Self> {
        d.as_u64().and_then(Self::from_code)
    }

    pub fn code(self) -> u64 {
        match self {
            Self::Created => 0,
            Self::Funded => 1,
            Self::Released => 2,
            Self::Disputed => 3,
            Self::Refunded => 4,
            Self::MilestoneCompleted(i) => Self::MILESTONE_BASE.saturating_add(i),
        }
    }

    /// No transition leaves Released or Refunded.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Released | Self::Refunded)
    }
}

impl fmt::Display for EscrowState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Created => f.write_str("Created"),
            Self::Funded => f.write_str("Funded"),
            Self::Released => f.write_str("Released"),
            Self::Disputed => f.write_str("Disputed"),
            Self::Refunded => f.write_str("Refunded"),
            Self::MilestoneCompleted(i) => write!(f, "MilestoneCompleted({})", i),
        }
    }
}

impl From<EscrowState> for Data {
    fn from(s: EscrowState) -> Self { Data::U64(s.code()) }
}

/// The whitelist. `None` on the left means the escrow does not exist yet.
pub fn is_valid_transition(current: Option<EscrowState>, next: Option<EscrowState>) -> bool {
    use EscrowState::*;
    matches!(
        (current, next),
        (None, Some(Created))
            | (Some(Created), Some(Funded))
            | (Some(Funded), Some(MilestoneCompleted(_)))
            | (Some(MilestoneCompleted(_)), Some(Released))
            | (Some(Funded), Some(Disputed))
            | (Some(Disputed), Some(Refunded))
            | (Some(Disputed), Some(Released))
    )
}

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Debug, Default)]
pub struct EscrowCheck {
    pub valid: bool,
    pub current_state: Option<EscrowState>,
    pub next_state: Option<EscrowState>,
    pub transition_valid: bool,
    pub errors: Vec<String>,
}

fn state_name(s: Option<EscrowState>) -> String {
    s.map_or_else(|| "None".to_string(), |s| s.to_string())
}

/// Only the first input and first output carrying the tag are read; a code
/// that is not a state there reads as no state.
pub fn escrow_check(app: &App, tx: &Transaction, _x: &Data, _w: &Data) -> EscrowCheck {
    let current_state = tx.input_states(&app.tag).next().and_then(EscrowState::from_data);
    let next_state = tx.output_states(&app.tag).next().and_then(EscrowState::from_data);
    let transition_valid = is_valid_transition(current_state, next_state);

    let mut errors = Vec::new();
    if !transition_valid {
        errors.push(format!(
            "Invalid escrow transition: {} -> {}",
            state_name(current_state),
            state_name(next_state)
        ));
    }
    tracing::debug!(
        tag = %app.tag,
        current = %state_name(current_state),
        next = %state_name(next_state),
        transition_valid,
        "escrow check"
    );
    EscrowCheck { valid: transition_valid, current_state, next_state, transition_valid, errors }
}
