//! Error types
//!
//! Everything here is raised at startup. The per-frame path has no error
//! returns: stale or missing input is a valid state, not a fault.

/// A gameplay parameter that cannot produce a playable session.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TuningError {
    #[error("{field}: spawn interval must be greater than zero")]
    ZeroInterval { field: &'static str },
    #[error("{field}: counter increment must be greater than zero")]
    ZeroIncrement { field: &'static str },
    #[error("{field}: counter ceiling {ceiling} is below the spawn interval {interval}")]
    CeilingBelowInterval {
        field: &'static str,
        ceiling: u32,
        interval: u32,
    },
    #[error("{field}: value must be finite and positive, got {value}")]
    NotPositive { field: &'static str, value: f32 },
    #[error("{field}: value must be finite, got {value}")]
    NotFinite { field: &'static str, value: f32 },
    #[error("{field}: despawn depth {despawn} must lie beyond spawn depth {spawn}")]
    DespawnBeforeSpawn {
        field: &'static str,
        spawn: f32,
        despawn: f32,
    },
    #[error("obstacles: lateral band is inverted ({min} > {max})")]
    InvertedBand { min: f32, max: f32 },
}

/// Failure to turn page-supplied JSON into a usable configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid tuning: {0}")]
    Tuning(#[from] TuningError),
}

/// Fatal problems while bringing a session up.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("browser environment unavailable: {0}")]
    Environment(&'static str),
    #[error("canvas element #{0} not found")]
    MissingCanvas(&'static str),
    #[error("no suitable graphics adapter: {0}")]
    Adapter(String),
    #[error("graphics device request failed: {0}")]
    Device(String),
    #[error("render surface creation failed: {0}")]
    Surface(String),
    #[error("audio unavailable: {0}")]
    Audio(String),
    #[error(transparent)]
    Config(#[from] ConfigError),
}
