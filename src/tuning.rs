//! Data-driven gameplay balance
//!
//! Defaults give the classic road: buildings every 50 counter units at
//! 15/frame, stripes every 100 at 25/frame, a coin every 60 frames.
//! Everything is validated once, before the first tick.

use serde::{Deserialize, Serialize};

use crate::error::TuningError;

/// Counter-driven stream (buildings, lane stripes)
///
/// No field-level defaults: buildings and stripes default differently, so a
/// stream block in the page config must be given in full or omitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamTuning {
    /// Counter value at session start
    pub counter_start: u32,
    /// Counter increment per tick
    pub counter_increment: u32,
    /// Spawn whenever the counter is a positive multiple of this
    pub spawn_interval: u32,
    /// Counter resets to zero once it exceeds this
    pub counter_ceiling: u32,
    /// Depth added to every live instance per tick
    pub step: f32,
    /// Instances deeper than this are removed
    pub despawn_depth: f32,
}

impl StreamTuning {
    pub fn buildings() -> Self {
        Self {
            counter_start: 0,
            counter_increment: 15,
            spawn_interval: 50,
            counter_ceiling: 500,
            step: 15.0,
            despawn_depth: 1000.0,
        }
    }

    pub fn stripes() -> Self {
        Self {
            counter_start: 0,
            counter_increment: 25,
            spawn_interval: 100,
            counter_ceiling: 500,
            step: 25.0,
            despawn_depth: 600.0,
        }
    }

    fn validate(&self, field: &'static str) -> Result<(), TuningError> {
        if self.spawn_interval == 0 {
            return Err(TuningError::ZeroInterval { field });
        }
        if self.counter_increment == 0 {
            return Err(TuningError::ZeroIncrement { field });
        }
        if self.counter_ceiling < self.spawn_interval {
            return Err(TuningError::CeilingBelowInterval {
                field,
                ceiling: self.counter_ceiling,
                interval: self.spawn_interval,
            });
        }
        positive(field, self.step)?;
        finite(field, self.despawn_depth)?;
        Ok(())
    }
}

/// Frame-cadence obstacle stream (the coins the player drives into)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObstacleTuning {
    /// Spawn on every tick that is a multiple of this
    pub spawn_every_ticks: u64,
    /// Depth of a freshly spawned obstacle
    pub spawn_depth: f32,
    /// Lateral spawn band (inclusive)
    pub lateral_min: f32,
    pub lateral_max: f32,
    /// Depth added per tick
    pub step: f32,
    /// Missed obstacles deeper than this are removed; `None` keeps them forever
    pub despawn_depth: Option<f32>,
}

impl Default for ObstacleTuning {
    fn default() -> Self {
        Self {
            spawn_every_ticks: 60,
            spawn_depth: -500.0,
            lateral_min: -55.0,
            lateral_max: 55.0,
            step: 10.0,
            despawn_depth: Some(700.0),
        }
    }
}

impl ObstacleTuning {
    fn validate(&self) -> Result<(), TuningError> {
        const FIELD: &str = "obstacles";
        if self.spawn_every_ticks == 0 {
            return Err(TuningError::ZeroInterval { field: FIELD });
        }
        finite(FIELD, self.spawn_depth)?;
        finite(FIELD, self.lateral_min)?;
        finite(FIELD, self.lateral_max)?;
        if self.lateral_min > self.lateral_max {
            return Err(TuningError::InvertedBand {
                min: self.lateral_min,
                max: self.lateral_max,
            });
        }
        positive(FIELD, self.step)?;
        if let Some(despawn) = self.despawn_depth {
            finite(FIELD, despawn)?;
            if despawn <= self.spawn_depth {
                return Err(TuningError::DespawnBeforeSpawn {
                    field: FIELD,
                    spawn: self.spawn_depth,
                    despawn,
                });
            }
        }
        Ok(())
    }
}

/// Player car placement and input mapping
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerTuning {
    /// Lateral offset is clamped to [-half_width, half_width]
    pub half_width: f32,
    /// Depth of the player car (and of the collision plane)
    pub plane_depth: f32,
    /// Width of the detector's video frame, in the pixels fingertip x is reported in
    pub video_width: f32,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            half_width: 55.0,
            plane_depth: 600.0,
            video_width: 640.0,
        }
    }
}

impl PlayerTuning {
    /// Raw fingertip x that maps to the lane centre
    pub fn input_center(&self) -> f32 {
        self.video_width / 2.0
    }
}

/// Obstacle vs player proximity test
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollisionTuning {
    pub lateral_threshold: f32,
    pub depth_threshold: f32,
}

impl Default for CollisionTuning {
    fn default() -> Self {
        Self {
            lateral_threshold: 20.0,
            depth_threshold: 30.0,
        }
    }
}

/// Complete gameplay parameter set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub buildings: StreamTuning,
    pub stripes: StreamTuning,
    pub obstacles: ObstacleTuning,
    pub player: PlayerTuning,
    pub collision: CollisionTuning,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            buildings: StreamTuning::buildings(),
            stripes: StreamTuning::stripes(),
            obstacles: ObstacleTuning::default(),
            player: PlayerTuning::default(),
            collision: CollisionTuning::default(),
        }
    }
}

impl Tuning {
    /// Reject parameter sets that cannot produce a playable session
    pub fn validate(&self) -> Result<(), TuningError> {
        self.buildings.validate("buildings")?;
        self.stripes.validate("stripes")?;
        self.obstacles.validate()?;
        positive("player.half_width", self.player.half_width)?;
        finite("player.plane_depth", self.player.plane_depth)?;
        positive("player.video_width", self.player.video_width)?;
        positive("collision.lateral_threshold", self.collision.lateral_threshold)?;
        positive("collision.depth_threshold", self.collision.depth_threshold)?;
        Ok(())
    }
}

fn finite(field: &'static str, value: f32) -> Result<(), TuningError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(TuningError::NotFinite { field, value })
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), TuningError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(TuningError::NotPositive { field, value })
    }
}
