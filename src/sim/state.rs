//! Game state and core simulation types
//!
//! One session's worth of state, owned by the frame driver and passed by
//! `&mut` into the tick. Nothing here outlives the page.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::stream::{ScrollStream, SpawnCounter};
use crate::tuning::Tuning;

/// An obstacle on the road (rendered as a spinning coin)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObstacleCar {
    pub id: u32,
    pub lateral: f32,
    pub depth: f32,
}

/// The player's car
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PlayerState {
    /// Lateral offset from lane centre, always within the tuned band
    pub lateral: f32,
}

/// Building heights drawn once per session
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Skyline {
    /// Height of the towers, in [150, 350)
    pub tall: f32,
    /// Height of the low blocks, in [100, 150)
    pub short: f32,
}

impl Skyline {
    pub fn roll(rng: &mut Pcg32) -> Self {
        Self {
            tall: rng.random_range(150.0..350.0),
            short: rng.random_range(100.0..150.0),
        }
    }
}

/// Things that happened during a tick, for the host to react to
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Player drove into an obstacle
    Scored { score: u64, lateral: f32 },
    ObstacleSpawned { id: u32, lateral: f32 },
    /// Obstacle passed the despawn bound without being hit
    ObstacleMissed { id: u32 },
}

/// Complete session state (deterministic for a given seed and input sequence)
#[derive(Debug, Clone)]
pub struct GameState {
    /// Session seed for reproducibility
    pub seed: u64,
    rng: Pcg32,
    /// Ticks simulated so far (the first tick is tick 1)
    pub time_ticks: u64,
    pub score: u64,
    pub building_counter: SpawnCounter,
    pub stripe_counter: SpawnCounter,
    pub buildings: ScrollStream,
    pub stripes: ScrollStream,
    /// Live obstacles in spawn order
    pub obstacles: Vec<ObstacleCar>,
    pub player: PlayerState,
    pub skyline: Skyline,
    /// Events raised by the most recent tick
    pub events: Vec<GameEvent>,
    next_id: u32,
}

impl GameState {
    /// Create a fresh session; `tuning` must already be validated
    pub fn new(seed: u64, tuning: &Tuning) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let skyline = Skyline::roll(&mut rng);
        Self {
            seed,
            rng,
            time_ticks: 0,
            score: 0,
            building_counter: SpawnCounter::from_tuning(&tuning.buildings),
            stripe_counter: SpawnCounter::from_tuning(&tuning.stripes),
            buildings: ScrollStream::from_tuning(&tuning.buildings),
            stripes: ScrollStream::from_tuning(&tuning.stripes),
            obstacles: Vec::new(),
            player: PlayerState::default(),
            skyline,
            events: Vec::new(),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Uniform draw from [min, max]
    pub fn random_lateral(&mut self, min: f32, max: f32) -> f32 {
        self.rng.random_range(min..=max)
    }

    /// Hand the last tick's events to the caller
    pub fn drain_events(&mut self) -> std::vec::Drain<'_, GameEvent> {
        self.events.drain(..)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_is_empty() {
        let state = GameState::new(7, &Tuning::default());
        assert_eq!(state.score, 0);
        assert_eq!(state.time_ticks, 0);
        assert_eq!(state.building_counter.value, 0);
        assert_eq!(state.stripe_counter.value, 0);
        assert!(state.buildings.is_empty());
        assert!(state.stripes.is_empty());
        assert!(state.obstacles.is_empty());
        assert_eq!(state.player.lateral, 0.0);
    }

    #[test]
    fn test_skyline_within_ranges() {
        for seed in 0..64 {
            let state = GameState::new(seed, &Tuning::default());
            assert!((150.0..350.0).contains(&state.skyline.tall));
            assert!((100.0..150.0).contains(&state.skyline.short));
        }
    }

    #[test]
    fn test_same_seed_same_skyline() {
        let a = GameState::new(42, &Tuning::default());
        let b = GameState::new(42, &Tuning::default());
        assert_eq!(a.skyline, b.skyline);
    }

    #[test]
    fn test_random_lateral_degenerate_band() {
        let mut state = GameState::new(1, &Tuning::default());
        assert_eq!(state.random_lateral(12.0, 12.0), 12.0);
    }
}
