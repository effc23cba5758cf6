//! End-to-end session scenarios driven through the public API

use road_rush::GameConfig;
use road_rush::Tuning;
use road_rush::renderer::{Layer, build_scene};
use road_rush::sim::{GameEvent, GameState, ObstacleCar, TickInput, tick};
use road_rush::tracking::DetectionSlot;

fn run(state: &mut GameState, tuning: &Tuning, input: &TickInput, ticks: u32) {
    for _ in 0..ticks {
        tick(state, input, tuning);
    }
}

#[test]
fn streams_follow_their_counters() {
    let tuning = Tuning::default();
    let mut state = GameState::new(1, &tuning);
    let input = TickInput::default();

    // Stripes: counter 100 at tick 4, spawned there and advanced once
    run(&mut state, &tuning, &input, 4);
    assert_eq!(state.stripes.depths(), &[125.0]);
    assert!(state.buildings.is_empty());

    // Buildings: counter 150 at tick 10
    run(&mut state, &tuning, &input, 6);
    assert_eq!(state.buildings.depths(), &[165.0]);

    // Next building at tick 20 (counter 300), the first has moved 10 steps
    run(&mut state, &tuning, &input, 10);
    assert_eq!(state.buildings.depths(), &[315.0, 315.0]);
}

#[test]
fn head_on_obstacle_scores_once_and_is_removed() {
    let tuning = Tuning::default();
    let mut state = GameState::new(1, &tuning);
    state.obstacles.push(ObstacleCar {
        id: 99,
        lateral: 0.0,
        depth: 590.0,
    });

    tick(&mut state, &TickInput::default(), &tuning);
    assert_eq!(state.score, 1);
    assert!(state.obstacles.is_empty());
    assert_eq!(
        state.events,
        vec![GameEvent::Scored {
            score: 1,
            lateral: 0.0
        }]
    );

    run(&mut state, &tuning, &TickInput::default(), 10);
    assert_eq!(state.score, 1);
}

#[test]
fn obstacle_at_lateral_threshold_passes_by() {
    let tuning = Tuning::default();
    let mut state = GameState::new(1, &tuning);
    state.obstacles.push(ObstacleCar {
        id: 5,
        lateral: tuning.collision.lateral_threshold,
        depth: 590.0,
    });

    tick(&mut state, &TickInput::default(), &tuning);
    assert_eq!(state.score, 0);
    assert_eq!(state.obstacles.len(), 1);
    assert_eq!(state.obstacles[0].depth, 600.0);
}

#[test]
fn configured_session_scores_on_schedule() {
    let config = GameConfig::from_json(
        r#"{ "tuning": { "obstacles": {
            "spawn_every_ticks": 10, "lateral_min": 0.0, "lateral_max": 0.0
        } } }"#,
    )
    .unwrap();
    let tuning = &config.tuning;
    let mut state = GameState::new(3, tuning);
    let input = TickInput::default();

    // First obstacle spawns at tick 10 (-490 after its first move) and
    // reaches 580, inside the depth threshold, at tick 117
    run(&mut state, tuning, &input, 116);
    assert_eq!(state.score, 0);
    run(&mut state, tuning, &input, 1);
    assert_eq!(state.score, 1);

    run(&mut state, tuning, &input, 10);
    assert_eq!(state.score, 2);
}

#[test]
fn unbounded_obstacles_accumulate_when_never_hit() {
    let config = GameConfig::from_json(
        r#"{ "tuning": { "obstacles": { "despawn_depth": null, "lateral_min": 40.0 } } }"#,
    )
    .unwrap();
    let tuning = &config.tuning;
    let mut state = GameState::new(8, tuning);
    // Steer hard left, away from the band
    let input = TickInput::from_hand(Some(0.0), &tuning.player);

    run(&mut state, tuning, &input, 1200);
    assert_eq!(state.player.lateral, -tuning.player.half_width);
    assert_eq!(state.score, 0);
    assert_eq!(state.obstacles.len(), 20);
}

#[test]
fn detections_drive_the_player_through_the_slot() {
    let tuning = Tuning::default();
    let mut state = GameState::new(2, &tuning);
    let slot = DetectionSlot::new();

    slot.publish_json(r#"[{ "index_finger_tip": { "x": 350.0, "y": 10.0 } }]"#)
        .unwrap();
    let input = TickInput::from_hand(slot.latest_fingertip_x(), &tuning.player);
    tick(&mut state, &input, &tuning);
    assert_eq!(state.player.lateral, 30.0);

    // Hand leaves the frame: offset is held
    slot.publish_json("[]").unwrap();
    let input = TickInput::from_hand(slot.latest_fingertip_x(), &tuning.player);
    tick(&mut state, &input, &tuning);
    assert_eq!(state.player.lateral, 30.0);

    // Garbage is rejected and leaves the last detection in place
    assert!(slot.publish_json("{not json").is_err());
    assert_eq!(slot.latest().map(|d| d.hands.len()), Some(0));
}

#[test]
fn fingertip_right_of_frame_centre_steers_right_at_any_viewport() {
    let tuning = Tuning::default();
    let slot = DetectionSlot::new();
    slot.publish_json(r#"[{ "index_finger_tip": { "x": 480.0, "y": 200.0 } }]"#)
        .unwrap();

    for viewport in [(390, 844), (1280, 720), (2560, 1440)] {
        let mut state = GameState::new(6, &tuning);
        let input = TickInput::from_hand(slot.latest_fingertip_x(), &tuning.player);
        tick(&mut state, &input, &tuning);
        assert_eq!(state.player.lateral, tuning.player.half_width);

        let scene = build_scene(&state, &tuning, &Default::default(), viewport);
        assert!(scene.layer(Layer::Player).count() > 0);
    }
}

#[test]
fn scene_mirrors_live_state() {
    let tuning = Tuning::default();
    let mut state = GameState::new(4, &tuning);
    run(&mut state, &tuning, &TickInput::default(), 61);

    let scene = build_scene(&state, &tuning, &Default::default(), (1280, 720));
    assert_eq!(
        scene.layer(Layer::Building).count(),
        state.buildings.len() * 6
    );
    assert_eq!(scene.layer(Layer::Stripe).count(), state.stripes.len() * 3);
    assert_eq!(
        scene.layer(Layer::Obstacle).count(),
        state.obstacles.len() * 2
    );
    assert_eq!(state.obstacles.len(), 1);
}
