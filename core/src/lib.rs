//! byteclicker-core: the simulation core and persistence gateway of
//! Byte Clicker, an incremental game about collecting bytes.
//!
//! Hosts drive a [`engine::GameEngine`] through [`command::PlayerCommand`]s
//! and render the [`view::Dashboard`] it exposes.

pub mod clock;
pub mod command;
pub mod config;
pub mod engine;
pub mod error;
pub mod event;
pub mod generator;
pub mod snapshot;
pub mod state;
pub mod store;
pub mod types;
pub mod view;
