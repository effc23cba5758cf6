//! Obstacle vs player proximity test
//!
//! A box test in the lateral/depth plane, evaluated once per obstacle per
//! tick after it has moved. There is no swept test: a step larger than twice
//! the depth threshold can tunnel through the player plane.

use super::state::ObstacleCar;
use crate::tuning::CollisionTuning;

/// True when the obstacle overlaps the player car
#[inline]
pub fn obstacle_hits_player(
    obstacle: &ObstacleCar,
    player_lateral: f32,
    plane_depth: f32,
    tuning: &CollisionTuning,
) -> bool {
    (obstacle.lateral - player_lateral).abs() < tuning.lateral_threshold
        && (obstacle.depth - plane_depth).abs() < tuning.depth_threshold
}

#[cfg(test)]
mod tests {
    use super::*;

    fn car(lateral: f32, depth: f32) -> ObstacleCar {
        ObstacleCar {
            id: 1,
            lateral,
            depth,
        }
    }

    #[test]
    fn test_head_on_hit() {
        let tuning = CollisionTuning::default();
        assert!(obstacle_hits_player(&car(0.0, 600.0), 0.0, 600.0, &tuning));
    }

    #[test]
    fn test_lateral_threshold_is_exclusive() {
        let tuning = CollisionTuning::default();
        // Depths coincide exactly; only the lateral gap decides
        assert!(!obstacle_hits_player(&car(20.0, 600.0), 0.0, 600.0, &tuning));
        assert!(!obstacle_hits_player(&car(-25.0, 600.0), 0.0, 600.0, &tuning));
        assert!(obstacle_hits_player(&car(19.9, 600.0), 0.0, 600.0, &tuning));
    }

    #[test]
    fn test_depth_window() {
        let tuning = CollisionTuning::default();
        assert!(!obstacle_hits_player(&car(0.0, 570.0), 0.0, 600.0, &tuning));
        assert!(obstacle_hits_player(&car(0.0, 571.0), 0.0, 600.0, &tuning));
        assert!(obstacle_hits_player(&car(0.0, 629.0), 0.0, 600.0, &tuning));
        assert!(!obstacle_hits_player(&car(0.0, 630.0), 0.0, 600.0, &tuning));
    }

    #[test]
    fn test_follows_player_offset() {
        let tuning = CollisionTuning::default();
        assert!(obstacle_hits_player(&car(-40.0, 600.0), -55.0, 600.0, &tuning));
        assert!(!obstacle_hits_player(&car(-40.0, 600.0), 55.0, 600.0, &tuning));
    }
}
