//! Shared primitive types used across the entire game.

/// Wall-clock time in milliseconds since the Unix epoch.
pub type Millis = i64;

/// Index of a generator in the catalog. Stable for the life of a save.
pub type GeneratorId = usize;

/// Identifies one running session in log output.
pub type SessionId = String;
