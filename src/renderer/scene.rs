//! Scene building
//!
//! Turns a `GameState` into the ordered list of primitives to draw this
//! frame. Pure and GPU-free, so the layout can be tested directly.

use glam::{Quat, Vec3};

use super::camera::Camera;
use super::vertex::colors;
use crate::settings::Settings;
use crate::sim::GameState;
use crate::tuning::Tuning;

/// Shape of a draw command, in world units
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Primitive {
    Box { size: Vec3 },
    Sphere { radius: f32 },
    /// Axis along y
    Cylinder { radius: f32, height: f32 },
}

/// How a primitive is coloured
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Paint {
    Fill([f32; 4]),
    /// Edges only
    Wire([f32; 4]),
}

/// What a command belongs to (for batching and inspection)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Layer {
    Sky,
    Building,
    Ground,
    Player,
    Obstacle,
    Stripe,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawCommand {
    pub layer: Layer,
    pub primitive: Primitive,
    pub translation: Vec3,
    pub rotation: Quat,
    pub paint: Paint,
}

impl DrawCommand {
    fn fill(layer: Layer, primitive: Primitive, translation: Vec3, color: [f32; 4]) -> Self {
        Self {
            layer,
            primitive,
            translation,
            rotation: Quat::IDENTITY,
            paint: Paint::Fill(color),
        }
    }

    fn rotated(mut self, rotation: Quat) -> Self {
        self.rotation = rotation;
        self
    }
}

/// One frame's worth of drawing
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub background: [f32; 4],
    pub camera: Camera,
    pub commands: Vec<DrawCommand>,
}

impl Scene {
    pub fn layer(&self, layer: Layer) -> impl Iterator<Item = &DrawCommand> {
        self.commands.iter().filter(move |c| c.layer == layer)
    }
}

/// Which skyline height a building box uses
#[derive(Clone, Copy)]
enum Height {
    Tall,
    Short,
}

/// Boxes drawn for every building instance:
/// (lateral, depth offset, width, height, color)
const BUILDING_BLOCKS: [(f32, f32, f32, Height, [f32; 4]); 6] = [
    (150.0, -500.0, 70.0, Height::Short, colors::BUILDING_AMBER),
    (150.0, 0.0, 100.0, Height::Tall, colors::BUILDING_TEAL),
    (150.0, 250.0, 70.0, Height::Short, colors::BUILDING_GREEN),
    (-150.0, -250.0, 70.0, Height::Short, colors::BUILDING_MAUVE),
    (150.0, 620.0, 70.0, Height::Tall, colors::BUILDING_RED),
    (-150.0, 0.0, 70.0, Height::Short, colors::BUILDING_PURPLE),
];
const BUILDING_DEPTH: f32 = 170.0;

/// Stripe boxes are drawn at the instance depth and one period either side
const STRIPE_OFFSETS: [f32; 3] = [0.0, 500.0, -500.0];
const STRIPE_SIZE: Vec3 = Vec3::new(10.0, 9.0, 220.0);
const STRIPE_Y: f32 = 49.0;

const SUN_POS: Vec3 = Vec3::new(300.0, -460.0, -1500.0);
const SUN_RADIUS: f32 = 200.0;
const SKY_DOME_RADIUS: f32 = 2000.0;
/// Sky dome rotation per tick on each axis (radians)
const SKY_SPIN: f32 = 0.001;
/// Coin roll per tick (radians)
const COIN_SPIN: f32 = 0.035;
const COIN_Y: f32 = 25.0;

/// Build this frame's draw list; `viewport` is the canvas size in CSS pixels
pub fn build_scene(
    state: &GameState,
    tuning: &Tuning,
    settings: &Settings,
    viewport: (u32, u32),
) -> Scene {
    let mut commands = Vec::with_capacity(
        2 + state.buildings.len() * BUILDING_BLOCKS.len()
            + 6
            + state.obstacles.len() * 2
            + state.stripes.len() * STRIPE_OFFSETS.len(),
    );
    let frame = if settings.animate_scenery() {
        state.time_ticks as f32
    } else {
        0.0
    };

    push_sky(&mut commands, settings, frame);
    push_buildings(&mut commands, state);
    push_road_and_player(&mut commands, state, tuning);
    push_obstacles(&mut commands, state, frame);
    push_stripes(&mut commands, state);

    Scene {
        background: colors::SKY,
        camera: Camera::for_viewport(viewport.0, viewport.1),
        commands,
    }
}

fn push_sky(commands: &mut Vec<DrawCommand>, settings: &Settings, frame: f32) {
    commands.push(DrawCommand::fill(
        Layer::Sky,
        Primitive::Sphere { radius: SUN_RADIUS },
        SUN_POS,
        colors::SUN,
    ));

    if settings.quality.sky_dome_enabled() {
        let angle = frame * SKY_SPIN;
        commands.push(DrawCommand {
            layer: Layer::Sky,
            primitive: Primitive::Sphere {
                radius: SKY_DOME_RADIUS,
            },
            translation: Vec3::ZERO,
            rotation: Quat::from_rotation_z(angle)
                * Quat::from_rotation_x(angle)
                * Quat::from_rotation_y(angle),
            paint: Paint::Wire(colors::SKY_DOME),
        });
    }
}

fn push_buildings(commands: &mut Vec<DrawCommand>, state: &GameState) {
    let skyline = state.skyline;
    for &depth in state.buildings.depths() {
        for &(lateral, offset, width, height, color) in &BUILDING_BLOCKS {
            let height = match height {
                Height::Tall => skyline.tall,
                Height::Short => skyline.short,
            };
            commands.push(DrawCommand::fill(
                Layer::Building,
                Primitive::Box {
                    size: Vec3::new(width, height, BUILDING_DEPTH),
                },
                Vec3::new(lateral, 0.0, depth + offset),
                color,
            ));
        }
    }
}

fn push_road_and_player(commands: &mut Vec<DrawCommand>, state: &GameState, tuning: &Tuning) {
    commands.push(DrawCommand::fill(
        Layer::Ground,
        Primitive::Box {
            size: Vec3::new(9200.0, 10.0, 1500.0),
        },
        Vec3::new(0.0, 50.0, 100.0),
        colors::ROAD,
    ));

    let x = state.player.lateral;
    let z = tuning.player.plane_depth;
    commands.push(DrawCommand::fill(
        Layer::Player,
        Primitive::Box {
            size: Vec3::new(22.0, 15.0, 150.0),
        },
        Vec3::new(x, 25.0, z),
        colors::CAR_BODY,
    ));
    commands.push(DrawCommand::fill(
        Layer::Player,
        Primitive::Box {
            size: Vec3::new(28.0, 5.0, 170.0),
        },
        Vec3::new(x, 30.0, z),
        colors::CAR_BODY,
    ));
    commands.push(DrawCommand::fill(
        Layer::Player,
        Primitive::Box {
            size: Vec3::new(10.0, 5.0, 10.0),
        },
        Vec3::new(x, 35.0, z + 200.0),
        colors::CAR_TRIM,
    ));

    for side in [-360.0, 360.0] {
        commands.push(DrawCommand::fill(
            Layer::Ground,
            Primitive::Box {
                size: Vec3::new(550.0, 20.0, 1500.0),
            },
            Vec3::new(side, 50.0, 100.0),
            colors::SIDEWALK,
        ));
    }
}

fn push_obstacles(commands: &mut Vec<DrawCommand>, state: &GameState, frame: f32) {
    // Stand the coin on its edge, then roll it
    let rotation =
        Quat::from_rotation_z(std::f32::consts::FRAC_PI_2) * Quat::from_rotation_x(frame * COIN_SPIN);
    for car in &state.obstacles {
        let at = Vec3::new(car.lateral, COIN_Y, car.depth);
        commands.push(
            DrawCommand::fill(
                Layer::Obstacle,
                Primitive::Cylinder {
                    radius: 15.0,
                    height: 3.0,
                },
                at,
                colors::COIN_FACE,
            )
            .rotated(rotation),
        );
        commands.push(
            DrawCommand::fill(
                Layer::Obstacle,
                Primitive::Cylinder {
                    radius: 7.0,
                    height: 7.0,
                },
                at,
                colors::COIN_HUB,
            )
            .rotated(rotation),
        );
    }
}

fn push_stripes(commands: &mut Vec<DrawCommand>, state: &GameState) {
    for &depth in state.stripes.depths() {
        for offset in STRIPE_OFFSETS {
            commands.push(DrawCommand::fill(
                Layer::Stripe,
                Primitive::Box { size: STRIPE_SIZE },
                Vec3::new(0.0, STRIPE_Y, depth + offset),
                colors::STRIPE,
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::QualityPreset;
    use crate::sim::{ObstacleCar, TickInput, tick};

    fn session(ticks: u32) -> (GameState, Tuning) {
        let tuning = Tuning::default();
        let mut state = GameState::new(3, &tuning);
        for _ in 0..ticks {
            tick(&mut state, &TickInput::default(), &tuning);
        }
        (state, tuning)
    }

    #[test]
    fn test_empty_session_draws_fixed_scenery() {
        let (state, tuning) = session(0);
        let scene = build_scene(&state, &tuning, &Settings::default(), (800, 600));
        // sun, sky dome, ground, 3 car boxes, 2 sidewalks
        assert_eq!(scene.commands.len(), 8);
        assert_eq!(scene.layer(Layer::Player).count(), 3);
        assert_eq!(scene.layer(Layer::Sky).count(), 2);
    }

    #[test]
    fn test_layers_in_frame_order() {
        let (mut state, tuning) = session(12);
        state.obstacles.push(ObstacleCar {
            id: 1,
            lateral: 0.0,
            depth: 0.0,
        });
        let scene = build_scene(&state, &tuning, &Settings::default(), (800, 600));
        let rank = |layer: Layer| match layer {
            Layer::Sky => 0,
            Layer::Building => 1,
            Layer::Ground | Layer::Player => 2,
            Layer::Obstacle => 3,
            Layer::Stripe => 4,
        };
        let ranks: Vec<_> = scene.commands.iter().map(|c| rank(c.layer)).collect();
        assert!(ranks.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_building_boxes_follow_instance_depth() {
        let (state, tuning) = session(10);
        assert_eq!(state.buildings.len(), 1);
        let scene = build_scene(&state, &tuning, &Settings::default(), (800, 600));
        let depth = state.buildings.depths()[0];
        let boxes: Vec<_> = scene.layer(Layer::Building).collect();
        assert_eq!(boxes.len(), 6);
        assert_eq!(boxes[1].translation, Vec3::new(150.0, 0.0, depth));
        assert_eq!(
            boxes[1].primitive,
            Primitive::Box {
                size: Vec3::new(100.0, state.skyline.tall, 170.0)
            }
        );
    }

    #[test]
    fn test_stripes_drawn_three_times() {
        let (state, tuning) = session(4);
        let scene = build_scene(&state, &tuning, &Settings::default(), (800, 600));
        let depths: Vec<f32> = scene.layer(Layer::Stripe).map(|c| c.translation.z).collect();
        assert_eq!(depths, vec![125.0, 625.0, -375.0]);
    }

    #[test]
    fn test_player_tracks_lateral() {
        let (mut state, tuning) = session(0);
        state.player.lateral = -30.0;
        let scene = build_scene(&state, &tuning, &Settings::default(), (800, 600));
        assert!(scene.layer(Layer::Player).all(|c| c.translation.x == -30.0));
    }

    #[test]
    fn test_reduced_motion_freezes_coin() {
        let (mut state, tuning) = session(100);
        state.obstacles.push(ObstacleCar {
            id: 1,
            lateral: 0.0,
            depth: 0.0,
        });
        let settings = Settings {
            reduced_motion: true,
            ..Settings::default()
        };
        let scene = build_scene(&state, &tuning, &settings, (800, 600));
        let coin = scene.layer(Layer::Obstacle).next().unwrap();
        assert_eq!(
            coin.rotation,
            Quat::from_rotation_z(std::f32::consts::FRAC_PI_2)
        );
    }

    #[test]
    fn test_low_quality_skips_dome() {
        let (state, tuning) = session(0);
        let settings = Settings::from_preset(QualityPreset::Low);
        let scene = build_scene(&state, &tuning, &settings, (800, 600));
        assert!(scene
            .layer(Layer::Sky)
            .all(|c| matches!(c.paint, Paint::Fill(_))));
    }
}
