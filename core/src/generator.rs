//! A purchasable byte producer.

use crate::{config::GeneratorConfig, types::GeneratorId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Generator {
    pub id:              GeneratorId,
    pub name:            String,
    pub base_cost:       f64,
    /// Current purchase price. Always `cost_at(base_cost, growth, count)`.
    pub cost:            f64,
    pub count:           u32,
    /// Bytes per second per owned unit.
    pub base_production: f64,
    pub unlocked:        bool,
}

impl Generator {
    /// A fresh, unowned generator. Only the first one starts unlocked.
    pub fn from_config(id: GeneratorId, config: &GeneratorConfig) -> Self {
        Self {
            id,
            name:            config.name.clone(),
            base_cost:       config.base_cost,
            cost:            config.base_cost,
            count:           0,
            base_production: config.base_production,
            unlocked:        id == 0,
        }
    }

    /// Bytes per second contributed by all owned units.
    pub fn production(&self) -> f64 {
        self.count as f64 * self.base_production
    }

    pub fn reprice(&mut self, growth: f64) {
        self.cost = cost_at(self.base_cost, growth, self.count);
    }
}

/// `ceil(base_cost * growth^count)`. Counts too large to price are infinite.
pub fn cost_at(base_cost: f64, growth: f64, count: u32) -> f64 {
    (base_cost * growth.powf(count as f64)).ceil()
}
