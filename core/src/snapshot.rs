//! Snapshot serialization — full game state to/from the save-file JSON.
//!
//! Encoding writes the persisted shape verbatim. Decoding is tolerant:
//! a field is trusted only if it is present and well-formed, anything
//! else falls back to a fresh game's value. A blob that is not a
//! non-empty JSON object is not a save at all.

use crate::{
    config::GameConfig,
    error::GameResult,
    generator::{cost_at, Generator},
    state::GameState,
    types::Millis,
};
use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;

/// The on-disk shape. `last_update` is deliberately absent.
#[derive(Debug, Serialize)]
struct SaveFile<'a> {
    bytes:       f64,
    total_bytes: f64,
    clicks:      u64,
    generators:  &'a [Generator],
    last_save:   Millis,
    game_start:  Millis,
}

pub fn encode(state: &GameState) -> GameResult<String> {
    let file = SaveFile {
        bytes:       state.bytes,
        total_bytes: state.total_bytes,
        clicks:      state.clicks,
        generators:  &state.generators,
        last_save:   state.last_save,
        game_start:  state.game_start,
    };
    Ok(serde_json::to_string(&file)?)
}

/// Why a blob was not treated as a save.
#[derive(Debug, Error, PartialEq)]
pub enum LoadSkip {
    #[error("no saved game")]
    Empty,

    #[error("save is not a JSON object")]
    NotAnObject,

    #[error("save is not valid JSON: {0}")]
    Malformed(String),
}

/// Rebuild a game from `blob`, with `last_update` rebased to `now`.
pub fn decode(blob: &str, config: &GameConfig, now: Millis) -> Result<GameState, LoadSkip> {
    if blob.trim().is_empty() {
        return Err(LoadSkip::Empty);
    }
    let value: Value =
        serde_json::from_str(blob).map_err(|e| LoadSkip::Malformed(e.to_string()))?;
    let obj = value.as_object().ok_or(LoadSkip::NotAnObject)?;
    if obj.is_empty() {
        return Err(LoadSkip::Empty);
    }

    let mut state = GameState::new(&config.generators, now);

    if let Some(bytes) = amount(obj, "bytes") {
        state.bytes = bytes;
    }
    if let Some(total) = amount(obj, "total_bytes") {
        state.total_bytes = total;
    }
    if let Some(clicks) = obj.get("clicks").and_then(Value::as_u64) {
        state.clicks = clicks;
    }
    if let Some(at) = timestamp(obj, "last_save") {
        state.last_save = at;
    }
    if let Some(at) = timestamp(obj, "game_start") {
        state.game_start = at;
    }

    if let Some(saved) = obj.get("generators").and_then(Value::as_array) {
        for (gen, entry) in state.generators.iter_mut().zip(saved) {
            if let Some(entry) = entry.as_object() {
                merge_generator(gen, entry, config);
            }
        }
    }

    // Counts may have been edited past a threshold the saved flags miss.
    state.evaluate_unlocks(&config.rules);
    state.last_update = now;
    Ok(state)
}

fn merge_generator(gen: &mut Generator, entry: &Map<String, Value>, config: &GameConfig) {
    if let Some(name) = entry.get("name").and_then(Value::as_str) {
        if !name.trim().is_empty() {
            gen.name = name.to_string();
        }
    }
    if let Some(base_cost) = amount(entry, "base_cost").filter(|c| *c > 0.0) {
        gen.base_cost = base_cost;
    }
    if let Some(base_production) = amount(entry, "base_production") {
        gen.base_production = base_production;
    }
    if let Some(count) = entry
        .get("count")
        .and_then(Value::as_u64)
        .and_then(|c| u32::try_from(c).ok())
    {
        gen.count = count;
    }
    if entry.get("unlocked").and_then(Value::as_bool) == Some(true) {
        gen.unlocked = true;
    }
    gen.cost = cost_at(gen.base_cost, config.rules.cost_growth, gen.count);
}

/// Milliseconds since the epoch. Times before 1970 are not trusted.
fn timestamp(obj: &Map<String, Value>, key: &str) -> Option<Millis> {
    obj.get(key).and_then(Value::as_i64).filter(|t| *t >= 0)
}

/// A finite, non-negative number.
fn amount(obj: &Map<String, Value>, key: &str) -> Option<f64> {
    obj.get(key)
        .and_then(Value::as_f64)
        .filter(|v| v.is_finite() && *v >= 0.0)
}
