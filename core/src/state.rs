//! The game state and every rule that mutates it.
//!
//! RULES:
//!   - Every mutation validates its preconditions before writing a field.
//!   - Any operation that can change a generator count re-evaluates unlocks.
//!   - Rejected operations leave the state untouched.

use crate::{
    config::{GeneratorConfig, Rules},
    event::{GameEvent, PurchaseRejection},
    generator::Generator,
    types::{GeneratorId, Millis},
};

#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    /// Spendable bytes. Never negative.
    pub bytes:       f64,
    /// Lifetime bytes earned. Never decreases.
    pub total_bytes: f64,
    pub clicks:      u64,
    pub generators:  Vec<Generator>,
    /// When production was last accrued. Not persisted.
    pub last_update: Millis,
    pub last_save:   Millis,
    pub game_start:  Millis,
}

impl GameState {
    pub fn new(catalog: &[GeneratorConfig], now: Millis) -> Self {
        Self {
            bytes:       0.0,
            total_bytes: 0.0,
            clicks:      0,
            generators:  catalog
                .iter()
                .enumerate()
                .map(|(id, cfg)| Generator::from_config(id, cfg))
                .collect(),
            last_update: now,
            last_save:   now,
            game_start:  now,
        }
    }

    /// Discard all progress and start over at `now`.
    pub fn reset(&mut self, catalog: &[GeneratorConfig], now: Millis) -> Vec<GameEvent> {
        *self = Self::new(catalog, now);
        vec![GameEvent::GameReset { at: now }]
    }

    // ── Queries ────────────────────────────────────────────────

    /// Bytes earned by one manual click.
    pub fn click_yield(&self, rules: &Rules) -> f64 {
        let auto_clickers = self.generators.first().map_or(0, |g| g.count);
        let steps = auto_clickers.checked_div(rules.click_bonus_step).unwrap_or(0);
        1.0 + steps as f64 * rules.click_bonus
    }

    /// Bytes per second across all generators.
    pub fn production_rate(&self) -> f64 {
        self.generators.iter().map(Generator::production).sum()
    }

    pub fn generator(&self, id: GeneratorId) -> Option<&Generator> {
        self.generators.get(id)
    }

    pub fn can_afford(&self, id: GeneratorId) -> bool {
        self.generator(id)
            .is_some_and(|g| g.unlocked && self.bytes >= g.cost)
    }

    pub fn play_time_ms(&self, now: Millis) -> Millis {
        now.saturating_sub(self.game_start).max(0)
    }

    // ── Mutations ──────────────────────────────────────────────

    pub fn register_click(&mut self, rules: &Rules) -> Vec<GameEvent> {
        let click_yield = self.click_yield(rules);
        self.earn(click_yield);
        self.clicks += 1;

        let mut events = vec![GameEvent::Clicked { click_yield, clicks: self.clicks }];
        events.extend(self.evaluate_unlocks(rules));
        events
    }

    /// Accrue production for the time since the last tick.
    ///
    /// Elapsed time is not capped: a host that was suspended for an hour
    /// earns an hour of production. A clock that moved backwards earns
    /// nothing and does not rewind `last_update`.
    pub fn apply_tick(&mut self, now: Millis, rules: &Rules) -> Vec<GameEvent> {
        let elapsed_ms = now.saturating_sub(self.last_update).max(0);
        self.last_update = self.last_update.max(now);

        let mut events = Vec::new();
        if elapsed_ms > 0 {
            let produced = self.production_rate() * (elapsed_ms as f64 / 1000.0);
            self.earn(produced);
            events.push(GameEvent::TickApplied { elapsed_ms, produced });
        }
        events.extend(self.evaluate_unlocks(rules));
        events
    }

    pub fn purchase_generator(&mut self, id: GeneratorId, rules: &Rules) -> Vec<GameEvent> {
        let rejection = match self.generators.get(id) {
            None                           => Some(PurchaseRejection::UnknownGenerator),
            Some(g) if !g.unlocked         => Some(PurchaseRejection::Locked),
            Some(g) if g.count == u32::MAX => Some(PurchaseRejection::AtCapacity),
            Some(g) if self.bytes < g.cost => Some(PurchaseRejection::InsufficientFunds),
            Some(_)                        => None,
        };
        if let Some(reason) = rejection {
            return vec![GameEvent::PurchaseIgnored { generator_id: id, reason }];
        }

        let gen = &mut self.generators[id];
        let cost_paid = gen.cost;
        gen.count = gen.count.saturating_add(1);
        gen.reprice(rules.cost_growth);
        let (count, next_cost) = (gen.count, gen.cost);
        self.bytes -= cost_paid;

        log::debug!("bought {} #{count} for {cost_paid}", self.generators[id].name);

        let mut events = vec![GameEvent::GeneratorPurchased {
            generator_id: id,
            cost_paid,
            count,
            next_cost,
        }];
        events.extend(self.evaluate_unlocks(rules));
        events
    }

    /// Unlock every generator whose predecessor has reached the threshold.
    /// Unlocks are never revoked.
    pub fn evaluate_unlocks(&mut self, rules: &Rules) -> Vec<GameEvent> {
        let mut events = Vec::new();
        if let Some(first) = self.generators.first_mut() {
            first.unlocked = true;
        }
        for i in 1..self.generators.len() {
            let prev_count = self.generators[i - 1].count;
            let gen = &mut self.generators[i];
            if !gen.unlocked && prev_count >= rules.unlock_threshold {
                gen.unlocked = true;
                log::info!("unlocked {}", gen.name);
                events.push(GameEvent::GeneratorUnlocked {
                    generator_id: i,
                    name:         gen.name.clone(),
                });
            }
        }
        events
    }

    fn earn(&mut self, amount: f64) {
        self.bytes += amount;
        self.total_bytes += amount;
    }
}
