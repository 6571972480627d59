//! Raw model output and its normalized per-frame form.
//!
//! The raw types mirror the ml5/PoseNet JSON shape
//! (`poses[i].pose.keypoints[j]` with `part`, `score`, `position`), so an
//! external model process can be piped straight in.  Normalization filters by
//! confidence and fixes the landmark vocabulary; everything after this point
//! works with `Option<Keypoint>` slots instead of ragged lists.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::keypoint::{Keypoint, Landmark, LANDMARK_COUNT};

// ════════════════════════════════════════════════════════════════════════════
// Raw wire shape
// ════════════════════════════════════════════════════════════════════════════

/// One frame of raw model output: zero or more detected figures.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RawObservation {
    #[serde(default)]
    pub poses: Vec<RawFigure>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RawFigure {
    #[serde(default)]
    pub pose: RawPose,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RawPose {
    #[serde(default)]
    pub keypoints: Vec<RawKeypoint>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RawKeypoint {
    pub part:     String,
    pub score:    f32,
    pub position: RawPoint,
}

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
pub struct RawPoint {
    pub x: f32,
    pub y: f32,
}

// ════════════════════════════════════════════════════════════════════════════
// Figure — one detected person, slotted by landmark
// ════════════════════════════════════════════════════════════════════════════

/// A single detected figure.  Each slot holds the landmark's keypoint, or
/// `None` when it was missing or below the confidence threshold.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Figure {
    slots: [Option<Keypoint>; LANDMARK_COUNT],
}

impl Figure {
    pub fn get(&self, lm: Landmark) -> Option<&Keypoint> {
        self.slots[lm.index()].as_ref()
    }

    pub fn set(&mut self, lm: Landmark, kp: Keypoint) {
        self.slots[lm.index()] = Some(kp);
    }

    /// Iterate present keypoints together with their landmark.
    pub fn keypoints(&self) -> impl Iterator<Item = (Landmark, &Keypoint)> {
        Landmark::ALL
            .iter()
            .filter_map(move |&lm| self.slots[lm.index()].as_ref().map(|kp| (lm, kp)))
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    /// Estimate the face bounding box from the five head landmarks.
    ///
    /// Width is the ear-to-ear distance, height the distance from the nose to
    /// the midpoint of the eyes.  Returns `None` unless all five landmarks
    /// are present — a partial face must not produce a bogus proximity
    /// signal.
    pub fn face_box(&self) -> Option<FaceBox> {
        let nose      = self.get(Landmark::Nose)?;
        let left_eye  = self.get(Landmark::LeftEye)?;
        let right_eye = self.get(Landmark::RightEye)?;
        let left_ear  = self.get(Landmark::LeftEar)?;
        let right_ear = self.get(Landmark::RightEar)?;

        let width = left_ear.distance_to(right_ear);
        let eye_mid = Keypoint::new(
            (left_eye.x + right_eye.x) / 2.0,
            (left_eye.y + right_eye.y) / 2.0,
            1.0,
        );
        let height = nose.distance_to(&eye_mid);

        Some(FaceBox { width, height, area: width * height })
    }
}

/// Estimated face extent, used as the closeness signal.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FaceBox {
    pub width:  f32,
    pub height: f32,
    pub area:   f32,
}

// ════════════════════════════════════════════════════════════════════════════
// Observation
// ════════════════════════════════════════════════════════════════════════════

/// One frame's normalized detection result.  May contain zero figures.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Observation {
    pub figures: Vec<Figure>,
}

impl Observation {
    /// Normalize raw model output.
    ///
    /// Keypoints are kept only when the part name is in the vocabulary, the
    /// score is strictly above `min_score`, and the coordinates are finite.
    /// Never fails: a malformed or empty figure list yields an observation
    /// that simply reports no activity.
    pub fn normalize(raw: &RawObservation, min_score: f32) -> Observation {
        let mut figures = Vec::with_capacity(raw.poses.len());

        for raw_figure in &raw.poses {
            let mut figure = Figure::default();
            for kp in &raw_figure.pose.keypoints {
                if kp.score <= min_score {
                    continue;
                }
                if !kp.position.x.is_finite() || !kp.position.y.is_finite() {
                    debug!("dropping keypoint {:?} with non-finite position", kp.part);
                    continue;
                }
                match Landmark::from_wire_name(&kp.part) {
                    Some(lm) => figure.set(lm, Keypoint::new(kp.position.x, kp.position.y, kp.score)),
                    None => debug!("dropping keypoint with unknown part {:?}", kp.part),
                }
            }
            figures.push(figure);
        }

        Observation { figures }
    }

    /// Face box of the primary (first) figure, if one can be estimated.
    pub fn primary_face_box(&self) -> Option<FaceBox> {
        self.figures.first().and_then(Figure::face_box)
    }

    pub fn is_empty(&self) -> bool {
        self.figures.iter().all(Figure::is_empty)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    fn raw_kp(part: &str, x: f32, y: f32, score: f32) -> RawKeypoint {
        RawKeypoint {
            part: part.to_string(),
            score,
            position: RawPoint { x, y },
        }
    }

    fn raw_single(keypoints: Vec<RawKeypoint>) -> RawObservation {
        RawObservation {
            poses: vec![RawFigure { pose: RawPose { keypoints } }],
        }
    }

    #[test]
    fn empty_raw_is_valid() {
        let obs = Observation::normalize(&RawObservation::default(), 0.1);
        assert!(obs.figures.is_empty());
        assert!(obs.is_empty());
    }

    #[test]
    fn low_confidence_keypoints_are_dropped() {
        let raw = raw_single(vec![
            raw_kp("nose", 10.0, 10.0, 0.05),
            raw_kp("leftEye", 12.0, 8.0, 0.9),
        ]);
        let obs = Observation::normalize(&raw, 0.1);
        assert_eq!(obs.figures.len(), 1);
        assert!(obs.figures[0].get(Landmark::Nose).is_none());
        assert!(obs.figures[0].get(Landmark::LeftEye).is_some());
    }

    #[test]
    fn threshold_is_exclusive() {
        let raw = raw_single(vec![raw_kp("nose", 1.0, 1.0, 0.1)]);
        let obs = Observation::normalize(&raw, 0.1);
        assert!(obs.figures[0].get(Landmark::Nose).is_none());
    }

    #[test]
    fn unknown_parts_and_nonfinite_positions_are_dropped() {
        let raw = raw_single(vec![
            raw_kp("thirdEye", 1.0, 1.0, 0.9),
            raw_kp("nose", f32::NAN, 1.0, 0.9),
        ]);
        let obs = Observation::normalize(&raw, 0.1);
        assert!(obs.figures[0].is_empty());
    }

    #[test]
    fn face_box_matches_hand_computation() {
        let raw = raw_single(vec![
            raw_kp("nose", 0.0, 0.0, 0.9),
            raw_kp("leftEye", -5.0, -10.0, 0.9),
            raw_kp("rightEye", 5.0, -10.0, 0.9),
            raw_kp("leftEar", -20.0, 0.0, 0.9),
            raw_kp("rightEar", 20.0, 0.0, 0.9),
        ]);
        let obs = Observation::normalize(&raw, 0.1);
        let face = obs.primary_face_box().expect("face box");
        assert_eq!(face.width, 40.0);
        assert_eq!(face.height, 10.0);
        assert_eq!(face.area, 400.0);
    }

    #[test]
    fn partial_face_yields_no_box() {
        // Ears missing — proximity must not be estimated from half a face.
        let raw = raw_single(vec![
            raw_kp("nose", 0.0, 0.0, 0.9),
            raw_kp("leftEye", -5.0, -10.0, 0.9),
            raw_kp("rightEye", 5.0, -10.0, 0.9),
        ]);
        let obs = Observation::normalize(&raw, 0.1);
        assert!(obs.primary_face_box().is_none());
    }
}
