//! Scroll streams: spawn counters and depth-advancing instance lists
//!
//! A stream is a list of depths in insertion order. Every tick each live
//! depth moves forward by the stream's step exactly once, then anything past
//! the despawn bound is dropped with `retain`, which keeps the survivors in
//! order without the skip hazard of removing while indexing forward.

use serde::{Deserialize, Serialize};

use crate::tuning::StreamTuning;

/// Counter that decides when a stream spawns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpawnCounter {
    pub value: u32,
    pub increment: u32,
    pub interval: u32,
    pub ceiling: u32,
}

impl SpawnCounter {
    pub fn new(start: u32, increment: u32, interval: u32, ceiling: u32) -> Self {
        Self {
            value: start,
            increment,
            interval,
            ceiling,
        }
    }

    pub fn from_tuning(tuning: &StreamTuning) -> Self {
        Self::new(
            tuning.counter_start,
            tuning.counter_increment,
            tuning.spawn_interval,
            tuning.counter_ceiling,
        )
    }

    /// Add this tick's increment
    #[inline]
    pub fn advance(&mut self) {
        self.value = self.value.saturating_add(self.increment);
    }

    /// True on positive multiples of the interval, never at zero
    #[inline]
    pub fn should_spawn(&self) -> bool {
        spawn_due(self.value, self.interval)
    }

    /// Reset to zero once past the ceiling (call after the stream is updated)
    #[inline]
    pub fn wrap(&mut self) {
        if self.value > self.ceiling {
            self.value = 0;
        }
    }
}

/// Spawn rule shared by every counter-driven stream
#[inline]
pub fn spawn_due(counter: u32, interval: u32) -> bool {
    interval > 0 && counter > 0 && counter % interval == 0
}

/// Instances of one stream, stored as depths in creation order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScrollStream {
    depths: Vec<f32>,
    step: f32,
    despawn_depth: f32,
}

impl ScrollStream {
    pub fn new(step: f32, despawn_depth: f32) -> Self {
        Self {
            depths: Vec::new(),
            step,
            despawn_depth,
        }
    }

    pub fn from_tuning(tuning: &StreamTuning) -> Self {
        Self::new(tuning.step, tuning.despawn_depth)
    }

    /// Append a new instance at `depth`
    pub fn spawn(&mut self, depth: f32) {
        self.depths.push(depth);
    }

    /// Move every live instance forward by one step
    pub fn advance(&mut self) {
        let step = self.step;
        for depth in &mut self.depths {
            *depth += step;
        }
    }

    /// Drop instances past the despawn bound, returning how many were removed
    pub fn cull(&mut self) -> usize {
        let before = self.depths.len();
        let bound = self.despawn_depth;
        self.depths.retain(|&depth| depth <= bound);
        before - self.depths.len()
    }

    /// One tick of movement followed by culling
    pub fn advance_and_cull(&mut self) -> usize {
        self.advance();
        self.cull()
    }

    pub fn depths(&self) -> &[f32] {
        &self.depths
    }

    pub fn len(&self) -> usize {
        self.depths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.depths.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spawn_due_skips_zero() {
        assert!(!spawn_due(0, 50));
        assert!(!spawn_due(49, 50));
        assert!(spawn_due(50, 50));
        assert!(!spawn_due(51, 50));
        assert!(spawn_due(100, 50));
        assert!(spawn_due(150, 50));
    }

    #[test]
    fn test_spawn_due_zero_interval_never_fires() {
        assert!(!spawn_due(0, 0));
        assert!(!spawn_due(10, 0));
    }

    #[test]
    fn test_unit_counter_spawns_at_multiples() {
        let mut counter = SpawnCounter::new(0, 1, 50, 10_000);
        let mut spawned_at = Vec::new();
        for _ in 0..160 {
            counter.advance();
            if counter.should_spawn() {
                spawned_at.push(counter.value);
            }
        }
        assert_eq!(spawned_at, vec![50, 100, 150]);
    }

    #[test]
    fn test_building_counter_cycle() {
        // 15/tick against interval 50 lands on 150, 300, 450 and wraps after 510
        let mut counter = SpawnCounter::from_tuning(&StreamTuning::buildings());
        let mut spawn_ticks = Vec::new();
        for tick in 1..=50 {
            counter.advance();
            if counter.should_spawn() {
                spawn_ticks.push(tick);
            }
            counter.wrap();
        }
        assert_eq!(spawn_ticks, vec![10, 20, 30, 44]);
    }

    #[test]
    fn test_wrap_only_past_ceiling() {
        let mut counter = SpawnCounter::new(500, 25, 100, 500);
        counter.wrap();
        assert_eq!(counter.value, 500);
        counter.advance();
        counter.wrap();
        assert_eq!(counter.value, 0);
    }

    #[test]
    fn test_advance_moves_each_instance_once() {
        let mut stream = ScrollStream::new(15.0, 1000.0);
        stream.spawn(150.0);
        stream.spawn(300.0);
        stream.advance();
        assert_eq!(stream.depths(), &[165.0, 315.0]);
    }

    #[test]
    fn test_cull_keeps_neighbours() {
        let mut stream = ScrollStream::new(25.0, 600.0);
        // Two adjacent instances cross the bound together; the one after them must survive
        stream.spawn(590.0);
        stream.spawn(580.0);
        stream.spawn(100.0);
        stream.spawn(595.0);
        stream.spawn(200.0);
        let removed = stream.advance_and_cull();
        assert_eq!(removed, 3);
        assert_eq!(stream.depths(), &[125.0, 225.0]);
    }

    #[test]
    fn test_bound_is_exclusive() {
        let mut stream = ScrollStream::new(10.0, 600.0);
        stream.spawn(590.0);
        assert_eq!(stream.advance_and_cull(), 0);
        assert_eq!(stream.depths(), &[600.0]);
        assert_eq!(stream.advance_and_cull(), 1);
        assert!(stream.is_empty());
    }
}
