//! Hand tracking handoff
//!
//! The pose detector runs on its own cadence and hands its results to the
//! page, which forwards them here as JSON. Only the latest result matters:
//! publishing replaces it, and the frame loop reads it once per tick without
//! waiting for a new one.

use std::sync::{Mutex, MutexGuard, PoisonError};

use serde::{Deserialize, Serialize};

/// A detected keypoint in video pixel coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Keypoint {
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub z: Option<f32>,
}

/// One detected hand. Unknown detector fields are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hand {
    pub index_finger_tip: Keypoint,
    #[serde(default)]
    pub handedness: Option<String>,
    #[serde(default)]
    pub confidence: Option<f32>,
}

/// One detector callback's worth of hands
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HandDetection {
    pub hands: Vec<Hand>,
}

impl HandDetection {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Fingertip x of the first hand, if any hand was seen
    pub fn primary_fingertip_x(&self) -> Option<f32> {
        self.hands.first().map(|hand| hand.index_finger_tip.x)
    }
}

/// Single-slot cell holding the most recent detection
#[derive(Debug, Default)]
pub struct DetectionSlot {
    latest: Mutex<Option<HandDetection>>,
}

impl DetectionSlot {
    pub const fn new() -> Self {
        Self {
            latest: Mutex::new(None),
        }
    }

    /// Replace the stored detection, returning the one it superseded
    pub fn publish(&self, detection: HandDetection) -> Option<HandDetection> {
        self.lock().replace(detection)
    }

    /// Parse and publish a detector payload. Malformed payloads leave the
    /// slot untouched.
    pub fn publish_json(&self, json: &str) -> Result<(), serde_json::Error> {
        let detection = HandDetection::from_json(json)?;
        self.publish(detection);
        Ok(())
    }

    /// Copy of the stored detection
    pub fn latest(&self) -> Option<HandDetection> {
        self.lock().clone()
    }

    /// Fingertip x of the first hand in the stored detection
    pub fn latest_fingertip_x(&self) -> Option<f32> {
        self.lock()
            .as_ref()
            .and_then(HandDetection::primary_fingertip_x)
    }

    pub fn clear(&self) {
        self.lock().take();
    }

    fn lock(&self) -> MutexGuard<'_, Option<HandDetection>> {
        // The slot only ever holds plain data, so a poisoned lock is still usable
        self.latest.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Slot shared by the detector callback and the frame loop
pub static HAND_SLOT: DetectionSlot = DetectionSlot::new();

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    const ML5_PAYLOAD: &str = r#"[
        {
            "handedness": "Right",
            "confidence": 0.93,
            "index_finger_tip": { "x": 312.5, "y": 140.0, "name": "index_finger_tip" },
            "keypoints": [{ "x": 300.0, "y": 200.0, "name": "wrist" }]
        },
        {
            "handedness": "Left",
            "index_finger_tip": { "x": 90.0, "y": 120.0 }
        }
    ]"#;

    #[test]
    fn test_parses_detector_payload() {
        let detection = HandDetection::from_json(ML5_PAYLOAD).unwrap();
        assert_eq!(detection.hands.len(), 2);
        assert_eq!(detection.hands[0].handedness.as_deref(), Some("Right"));
        assert_eq!(detection.primary_fingertip_x(), Some(312.5));
    }

    #[test]
    fn test_empty_list_has_no_fingertip() {
        let detection = HandDetection::from_json("[]").unwrap();
        assert_eq!(detection.primary_fingertip_x(), None);
    }

    #[test]
    fn test_empty_slot_reads_none() {
        let slot = DetectionSlot::new();
        assert_eq!(slot.latest(), None);
        assert_eq!(slot.latest_fingertip_x(), None);
    }

    #[test]
    fn test_publish_replaces_previous() {
        let slot = DetectionSlot::new();
        slot.publish_json(r#"[{"index_finger_tip":{"x":10.0,"y":0.0}}]"#)
            .unwrap();
        let previous = slot.publish(HandDetection::default());
        assert_eq!(previous.and_then(|d| d.primary_fingertip_x()), Some(10.0));
        assert_eq!(slot.latest_fingertip_x(), None);
    }

    #[test]
    fn test_malformed_payload_keeps_previous() {
        let slot = DetectionSlot::new();
        slot.publish_json(r#"[{"index_finger_tip":{"x":42.0,"y":0.0}}]"#)
            .unwrap();
        assert!(slot.publish_json("{not json").is_err());
        assert!(slot.publish_json(r#"[{"thumb_tip":{}}]"#).is_err());
        assert_eq!(slot.latest_fingertip_x(), Some(42.0));
    }

    #[test]
    fn test_reads_do_not_consume() {
        let slot = DetectionSlot::new();
        slot.publish_json(r#"[{"index_finger_tip":{"x":5.0,"y":0.0}}]"#)
            .unwrap();
        assert_eq!(slot.latest_fingertip_x(), Some(5.0));
        assert_eq!(slot.latest_fingertip_x(), Some(5.0));
        slot.clear();
        assert_eq!(slot.latest(), None);
    }

    #[test]
    fn test_concurrent_publish_and_read() {
        let slot = Arc::new(DetectionSlot::new());
        let writer = {
            let slot = Arc::clone(&slot);
            std::thread::spawn(move || {
                for i in 0..500 {
                    let json = format!(r#"[{{"index_finger_tip":{{"x":{i}.0,"y":0.0}}}}]"#);
                    slot.publish_json(&json).unwrap();
                }
            })
        };
        for _ in 0..500 {
            if let Some(x) = slot.latest_fingertip_x() {
                assert!((0.0..500.0).contains(&x));
            }
        }
        writer.join().unwrap();
        assert_eq!(slot.latest_fingertip_x(), Some(499.0));
    }
}
