//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One tick per frame, no wall-clock reads
//! - Seeded RNG only
//! - Stable iteration order (insertion order within each stream)
//! - No rendering or platform dependencies

pub mod collision;
pub mod player;
pub mod state;
pub mod stream;
pub mod tick;

pub use collision::obstacle_hits_player;
pub use player::lateral_from_raw;
pub use state::{GameEvent, GameState, ObstacleCar, PlayerState, Skyline};
pub use stream::{ScrollStream, SpawnCounter, spawn_due};
pub use tick::{TickInput, tick};
