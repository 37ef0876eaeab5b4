//! The game engine — one session of Byte Clicker.
//!
//! The engine owns the only GameState of the session. Every operation
//! takes `&mut self` and runs to completion, so ticks, purchases and
//! saves can never interleave.
//!
//! TIMERS (replaced by `pump`):
//!   - tick:     every `tick_interval_ms`     (100 ms)
//!   - autosave: every `autosave_interval_ms` (60 s)
//!
//! Hosts call `pump` whenever they get control back; any cadence that
//! is due runs, with production accrued for the real elapsed time.

use crate::{
    clock::{Cadence, Clock},
    command::PlayerCommand,
    config::{GameConfig, Rules},
    error::GameResult,
    event::GameEvent,
    snapshot,
    state::GameState,
    store::SaveStore,
    types::{GeneratorId, Millis, SessionId},
    view::Dashboard,
};

pub struct GameEngine<S: SaveStore, C: Clock> {
    pub session_id: SessionId,
    config:         GameConfig,
    state:          GameState,
    store:          S,
    clock:          C,
    tick_cadence:   Cadence,
    autosave:       Cadence,
}

impl<S: SaveStore, C: Clock> GameEngine<S, C> {
    /// Start a session with a fresh game. Call `load` to resume a save.
    pub fn new(config: GameConfig, store: S, clock: C) -> GameResult<Self> {
        config.validate()?;
        let now = clock.now();
        let session_id = uuid::Uuid::new_v4().to_string();
        log::info!(
            "session {session_id} started with {} generators",
            config.generators.len()
        );
        Ok(Self {
            session_id,
            state:        GameState::new(&config.generators, now),
            tick_cadence: Cadence::new(config.tick_interval_ms, now),
            autosave:     Cadence::new(config.autosave_interval_ms, now),
            config,
            store,
            clock,
        })
    }

    // ── Accessors ──────────────────────────────────────────────

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Direct state access for tooling and test setup.
    /// Game code goes through `execute`.
    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn rules(&self) -> &Rules {
        &self.config.rules
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn dashboard(&self) -> Dashboard {
        Dashboard::from_state(&self.state, &self.config.rules, self.clock.now())
    }

    // ── Commands ───────────────────────────────────────────────

    /// Run one host command to completion.
    pub fn execute(&mut self, command: PlayerCommand) -> GameResult<Vec<GameEvent>> {
        log::debug!("session {} command={}", self.session_id, command.name());
        let events = match command {
            PlayerCommand::Click => self.click(),
            PlayerCommand::Buy { generator_id } => self.buy(generator_id),
            PlayerCommand::NewGame => self.new_game()?,
            PlayerCommand::Save => self.save()?,
            PlayerCommand::Load => self.load(),
            PlayerCommand::Tick { now_millis } => self.tick(now_millis),
        };
        for event in &events {
            log::trace!("session {} event={}", self.session_id, event.kind());
        }
        Ok(events)
    }

    pub fn click(&mut self) -> Vec<GameEvent> {
        self.state.register_click(&self.config.rules)
    }

    pub fn buy(&mut self, generator_id: GeneratorId) -> Vec<GameEvent> {
        self.state.purchase_generator(generator_id, &self.config.rules)
    }

    pub fn tick(&mut self, now: Millis) -> Vec<GameEvent> {
        self.tick_cadence.mark(now);
        self.state.apply_tick(now, &self.config.rules)
    }

    /// Run whatever timers are due at the clock's current time.
    pub fn pump(&mut self) -> GameResult<Vec<GameEvent>> {
        let now = self.clock.now();
        let mut events = Vec::new();
        if self.tick_cadence.is_due(now) {
            events.extend(self.tick(now));
        }
        if self.autosave.is_due(now) {
            log::debug!("session {} autosave", self.session_id);
            events.extend(self.save()?);
        }
        Ok(events)
    }

    pub fn save(&mut self) -> GameResult<Vec<GameEvent>> {
        let now = self.clock.now();
        self.state.last_save = now;
        let blob = snapshot::encode(&self.state)?;
        let status = self.store.save(&blob);
        self.autosave.mark(now);
        log::info!("session {} save: {status}", self.session_id);
        Ok(vec![GameEvent::GameSaved { at: now, status }])
    }

    /// Replace the state with the stored save. A missing or unusable save
    /// leaves the current game as it is.
    pub fn load(&mut self) -> Vec<GameEvent> {
        let now = self.clock.now();
        let blob = self.store.load();
        match snapshot::decode(&blob, &self.config, now) {
            Ok(state) => {
                self.state = state;
                self.tick_cadence.mark(now);
                log::info!(
                    "session {} loaded save ({} bytes, {} clicks)",
                    self.session_id,
                    self.state.bytes,
                    self.state.clicks
                );
                vec![GameEvent::GameLoaded { at: now }]
            }
            Err(skip) => {
                log::info!("session {} load skipped: {skip}", self.session_id);
                vec![GameEvent::LoadSkipped { reason: skip.to_string() }]
            }
        }
    }

    /// Start over and immediately overwrite the save with the fresh game.
    pub fn new_game(&mut self) -> GameResult<Vec<GameEvent>> {
        let now = self.clock.now();
        let mut events = self.state.reset(&self.config.generators, now);
        self.tick_cadence.mark(now);
        log::info!("session {} started a new game", self.session_id);
        events.extend(self.save()?);
        Ok(events)
    }
}
