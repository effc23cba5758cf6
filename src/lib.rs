//! Road Rush - a hand-tracked endless road game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (scroll streams, collisions, game state)
//! - `renderer`: Scene building and WebGPU rendering
//! - `tracking`: Hand detection payloads and the latest-result handoff
//! - `tuning`: Data-driven gameplay parameters, validated at startup
//! - `config`: Page-supplied configuration (tuning + settings)

#[cfg(target_arch = "wasm32")]
pub mod audio;
pub mod config;
pub mod error;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod tracking;
pub mod tuning;

pub use config::GameConfig;
pub use error::{ConfigError, StartupError, TuningError};
pub use settings::{QualityPreset, Settings};
pub use tuning::Tuning;

/// Game loop constants
pub mod consts {
    /// Fixed simulation timestep (one tick per 60 Hz display refresh)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum ticks per animation frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 4;
    /// Longest frame delta fed to the accumulator (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;
}
