//! Read-only projection of the state for hosts to render.

use crate::{
    config::Rules,
    state::GameState,
    types::{GeneratorId, Millis},
};
use serde::Serialize;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct GeneratorView {
    pub id:         GeneratorId,
    pub name:       String,
    pub count:      u32,
    pub cost:       f64,
    pub unlocked:   bool,
    pub affordable: bool,
    /// Bytes per second from this generator.
    pub producing:  f64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Dashboard {
    pub bytes:            f64,
    pub total_bytes:      f64,
    pub clicks:           u64,
    pub click_power:      f64,
    pub bytes_per_second: f64,
    pub play_time_ms:     Millis,
    pub generators:       Vec<GeneratorView>,
}

impl Dashboard {
    pub fn from_state(state: &GameState, rules: &Rules, now: Millis) -> Self {
        Self {
            bytes:            state.bytes,
            total_bytes:      state.total_bytes,
            clicks:           state.clicks,
            click_power:      state.click_yield(rules),
            bytes_per_second: state.production_rate(),
            play_time_ms:     state.play_time_ms(now),
            generators:       state
                .generators
                .iter()
                .map(|g| GeneratorView {
                    id:         g.id,
                    name:       g.name.clone(),
                    count:      g.count,
                    cost:       g.cost,
                    unlocked:   g.unlocked,
                    affordable: state.can_afford(g.id),
                    producing:  g.production(),
                })
                .collect(),
        }
    }
}

/// `1234.5` → `"1.23K"`, `2_500_000` → `"2.50M"`.
pub fn format_number(n: f64) -> String {
    if n >= 1e6 {
        format!("{:.2}M", n / 1e6)
    } else if n >= 1e3 {
        format!("{:.2}K", n / 1e3)
    } else {
        format!("{n:.2}")
    }
}

/// `"1h 2m 3s"`
pub fn format_play_time(ms: Millis) -> String {
    let seconds = ms.max(0) / 1000;
    let minutes = seconds / 60;
    let hours = minutes / 60;
    format!("{hours}h {}m {}s", minutes % 60, seconds % 60)
}
