//! Per-frame simulation tick
//!
//! Fixed order: player input, counters, spawns, buildings, obstacles,
//! stripes. The streams share nothing but the player's lateral offset.

use super::collision::obstacle_hits_player;
use super::state::{GameEvent, GameState, ObstacleCar};
use crate::tuning::{ObstacleTuning, PlayerTuning, Tuning};

/// Input for a single tick (deterministic)
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    /// Raw fingertip x from the latest detection, if a hand is visible
    pub hand_x: Option<f32>,
    /// Raw x that maps to the lane centre (half the detector's frame width)
    pub input_center: f32,
}

impl TickInput {
    /// Input for a fingertip reported in the detector's video pixels
    pub fn from_hand(hand_x: Option<f32>, player: &PlayerTuning) -> Self {
        Self {
            hand_x,
            input_center: player.input_center(),
        }
    }
}

/// Advance the game state by one frame
pub fn tick(state: &mut GameState, input: &TickInput, tuning: &Tuning) {
    state.events.clear();
    state.time_ticks += 1;

    state
        .player
        .apply_reading(input.hand_x, input.input_center, &tuning.player);

    state.building_counter.advance();
    state.stripe_counter.advance();

    if state.building_counter.should_spawn() {
        state.buildings.spawn(state.building_counter.value as f32);
    }
    if state.stripe_counter.should_spawn() {
        state.stripes.spawn(state.stripe_counter.value as f32);
    }

    let culled = state.buildings.advance_and_cull();
    if culled > 0 {
        log::trace!("culled {culled} building(s) at tick {}", state.time_ticks);
    }
    state.building_counter.wrap();

    update_obstacles(state, tuning);

    state.stripes.advance_and_cull();
    state.stripe_counter.wrap();
}

/// Spawn, advance, collide and cull the obstacle stream
fn update_obstacles(state: &mut GameState, tuning: &Tuning) {
    let obstacles: &ObstacleTuning = &tuning.obstacles;

    if state.time_ticks % obstacles.spawn_every_ticks == 0 {
        let id = state.next_entity_id();
        let lateral = state.random_lateral(obstacles.lateral_min, obstacles.lateral_max);
        state.obstacles.push(ObstacleCar {
            id,
            lateral,
            depth: obstacles.spawn_depth,
        });
        state
            .events
            .push(GameEvent::ObstacleSpawned { id, lateral });
        log::debug!("obstacle {id} spawned at lateral {lateral:.1}");
    }

    let player_lateral = state.player.lateral;
    let plane_depth = tuning.player.plane_depth;
    let step = obstacles.step;
    let despawn_depth = obstacles.despawn_depth;
    let events = &mut state.events;
    let score = &mut state.score;

    state.obstacles.retain_mut(|car| {
        car.depth += step;

        if obstacle_hits_player(car, player_lateral, plane_depth, &tuning.collision) {
            *score += 1;
            events.push(GameEvent::Scored {
                score: *score,
                lateral: car.lateral,
            });
            return false;
        }

        match despawn_depth {
            Some(bound) if car.depth > bound => {
                events.push(GameEvent::ObstacleMissed { id: car.id });
                false
            }
            _ => true,
        }
    });
}
