//! Player controller
//!
//! Maps the tracked fingertip onto the lane band. Without a usable reading
//! the previous offset is held.

use super::state::PlayerState;
use crate::tuning::PlayerTuning;

/// Clamp a raw horizontal reading into `[-half_width, half_width]`
/// around `center`. Returns `None` for readings that are not numbers.
#[inline]
pub fn lateral_from_raw(raw_x: f32, center: f32, half_width: f32) -> Option<f32> {
    if raw_x.is_nan() || !center.is_finite() {
        return None;
    }
    Some((raw_x - center).clamp(-half_width, half_width))
}

impl PlayerState {
    /// Update from this tick's reading (stale-hold when absent or unusable)
    pub fn apply_reading(&mut self, raw_x: Option<f32>, center: f32, tuning: &PlayerTuning) {
        if let Some(lateral) =
            raw_x.and_then(|x| lateral_from_raw(x, center, tuning.half_width))
        {
            self.lateral = lateral;
        }
    }
}
