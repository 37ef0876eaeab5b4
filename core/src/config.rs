use crate::{
    error::{GameError, GameResult},
    types::Millis,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_SAVE_PATH: &str = "clicker_save.json";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GeneratorConfig {
    pub name:            String,
    pub base_cost:       f64,
    pub base_production: f64,
}

impl GeneratorConfig {
    fn new(name: &str, base_cost: f64, base_production: f64) -> Self {
        Self { name: name.to_string(), base_cost, base_production }
    }
}

/// The stock generator line-up, cheapest first. Order defines the unlock chain.
pub fn default_catalog() -> Vec<GeneratorConfig> {
    vec![
        GeneratorConfig::new("Auto Clicker",      10.0,      0.1),
        GeneratorConfig::new("Byte Compiler",     50.0,      0.5),
        GeneratorConfig::new("Data Miner",        250.0,     2.0),
        GeneratorConfig::new("Quantum Computer",  1_000.0,   10.0),
        GeneratorConfig::new("AI Cluster",        5_000.0,   50.0),
        GeneratorConfig::new("Quantum Network",   25_000.0,  250.0),
        GeneratorConfig::new("Digital Dimension", 100_000.0, 1_000.0),
    ]
}

/// Progression constants used by every state transition.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Rules {
    /// Price multiplier applied per owned unit.
    pub cost_growth:      f64,
    /// Units of generator i-1 needed to unlock generator i.
    pub unlock_threshold: u32,
    /// Every `click_bonus_step` Auto Clickers add `click_bonus` per click.
    pub click_bonus_step: u32,
    pub click_bonus:      f64,
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            cost_growth:      1.15,
            unlock_threshold: 5,
            click_bonus_step: 10,
            click_bonus:      0.1,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GameConfig {
    pub generators:           Vec<GeneratorConfig>,
    #[serde(flatten)]
    pub rules:                Rules,
    pub tick_interval_ms:     Millis,
    pub autosave_interval_ms: Millis,
    pub save_path:            String,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            generators:           default_catalog(),
            rules:                Rules::default(),
            tick_interval_ms:     100,
            autosave_interval_ms: 60_000,
            save_path:            DEFAULT_SAVE_PATH.to_string(),
        }
    }
}

impl GameConfig {
    /// Read a JSON config file. Absent keys keep their defaults.
    pub fn load(path: impl AsRef<Path>) -> GameResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Cannot read {}: {e}", path.display()))?;
        let config: GameConfig = serde_json::from_str(&content)?;
        config.validate()?;
        log::debug!(
            "Loaded config from {} ({} generators)",
            path.display(),
            config.generators.len()
        );
        Ok(config)
    }

    pub fn validate(&self) -> GameResult<()> {
        if self.generators.is_empty() {
            return Err(invalid("generator catalog is empty"));
        }
        for (id, gen) in self.generators.iter().enumerate() {
            if gen.name.trim().is_empty() {
                return Err(invalid(format!("generator {id} has no name")));
            }
            if !(gen.base_cost.is_finite() && gen.base_cost > 0.0) {
                return Err(invalid(format!("generator {id} base_cost must be positive")));
            }
            if !(gen.base_production.is_finite() && gen.base_production >= 0.0) {
                return Err(invalid(format!(
                    "generator {id} base_production must be non-negative"
                )));
            }
        }
        let rules = &self.rules;
        if !(rules.cost_growth.is_finite() && rules.cost_growth >= 1.0) {
            return Err(invalid("cost_growth must be at least 1.0"));
        }
        if rules.click_bonus_step == 0 {
            return Err(invalid("click_bonus_step must be positive"));
        }
        if !(rules.click_bonus.is_finite() && rules.click_bonus >= 0.0) {
            return Err(invalid("click_bonus must be non-negative"));
        }
        if self.tick_interval_ms <= 0 || self.autosave_interval_ms <= 0 {
            return Err(invalid("timer intervals must be positive"));
        }
        Ok(())
    }
}

fn invalid(reason: impl Into<String>) -> GameError {
    GameError::InvalidConfig { reason: reason.into() }
}
