use crate::types::{GeneratorId, Millis};
use serde::{Deserialize, Serialize};

/// Everything a host can ask the game to do.
/// Variants are only ever appended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "cmd", rename_all = "snake_case")]
pub enum PlayerCommand {
    Click,
    Buy { generator_id: GeneratorId },
    NewGame,
    Save,
    Load,
    Tick { now_millis: Millis },
}

impl PlayerCommand {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Click       => "click",
            Self::Buy { .. }  => "buy",
            Self::NewGame     => "new_game",
            Self::Save        => "save",
            Self::Load        => "load",
            Self::Tick { .. } => "tick",
        }
    }
}
