//! Everything that happened to the game as the result of a command.
//!
//! Operations return the events they caused so hosts can show feedback
//! without diffing state.

use crate::types::{GeneratorId, Millis};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameEvent {
    // ── Simulation ─────────────────────────────────
    Clicked {
        click_yield: f64,
        clicks:      u64,
    },
    TickApplied {
        elapsed_ms: Millis,
        produced:   f64,
    },
    GeneratorPurchased {
        generator_id: GeneratorId,
        cost_paid:    f64,
        count:        u32,
        next_cost:    f64,
    },
    PurchaseIgnored {
        generator_id: GeneratorId,
        reason:       PurchaseRejection,
    },
    GeneratorUnlocked {
        generator_id: GeneratorId,
        name:         String,
    },

    // ── Session ────────────────────────────────────
    GameReset {
        at: Millis,
    },
    GameSaved {
        at:     Millis,
        status: String,
    },
    GameLoaded {
        at: Millis,
    },
    LoadSkipped {
        reason: String,
    },
}

impl GameEvent {
    /// Stable name used in log lines.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Clicked { .. }            => "clicked",
            Self::TickApplied { .. }        => "tick_applied",
            Self::GeneratorPurchased { .. } => "generator_purchased",
            Self::PurchaseIgnored { .. }    => "purchase_ignored",
            Self::GeneratorUnlocked { .. }  => "generator_unlocked",
            Self::GameReset { .. }          => "game_reset",
            Self::GameSaved { .. }          => "game_saved",
            Self::GameLoaded { .. }         => "game_loaded",
            Self::LoadSkipped { .. }        => "load_skipped",
        }
    }
}

/// Why a purchase was a no-op. None of these are errors.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PurchaseRejection {
    UnknownGenerator,
    Locked,
    InsufficientFunds,
    /// The count cannot grow any further.
    AtCapacity,
}
