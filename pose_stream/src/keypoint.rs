//! Landmark vocabulary and confidence-scored keypoints.
//!
//! The vocabulary is the 17-landmark PoseNet set.  Indices are stable and
//! double as array slots in [`crate::Figure`], so frame-to-frame matching is
//! just "same figure index, same slot".

use serde::{Deserialize, Serialize};

/// Number of landmarks in the vocabulary.
pub const LANDMARK_COUNT: usize = 17;

// ════════════════════════════════════════════════════════════════════════════
// Landmark
// ════════════════════════════════════════════════════════════════════════════

/// A named anatomical landmark.  `as usize` via [`Landmark::index`] gives the
/// slot this landmark occupies in a [`crate::Figure`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Landmark {
    Nose,
    LeftEye,
    RightEye,
    LeftEar,
    RightEar,
    LeftShoulder,
    RightShoulder,
    LeftElbow,
    RightElbow,
    LeftWrist,
    RightWrist,
    LeftHip,
    RightHip,
    LeftKnee,
    RightKnee,
    LeftAnkle,
    RightAnkle,
}

impl Landmark {
    /// All landmarks, in slot order.
    pub const ALL: [Landmark; LANDMARK_COUNT] = [
        Landmark::Nose,
        Landmark::LeftEye,
        Landmark::RightEye,
        Landmark::LeftEar,
        Landmark::RightEar,
        Landmark::LeftShoulder,
        Landmark::RightShoulder,
        Landmark::LeftElbow,
        Landmark::RightElbow,
        Landmark::LeftWrist,
        Landmark::RightWrist,
        Landmark::LeftHip,
        Landmark::RightHip,
        Landmark::LeftKnee,
        Landmark::RightKnee,
        Landmark::LeftAnkle,
        Landmark::RightAnkle,
    ];

    /// Slot index in a [`crate::Figure`].
    pub fn index(self) -> usize {
        self as usize
    }

    /// The name used on the wire by ml5/PoseNet-style model output.
    pub fn wire_name(self) -> &'static str {
        match self {
            Landmark::Nose          => "nose",
            Landmark::LeftEye       => "leftEye",
            Landmark::RightEye      => "rightEye",
            Landmark::LeftEar       => "leftEar",
            Landmark::RightEar      => "rightEar",
            Landmark::LeftShoulder  => "leftShoulder",
            Landmark::RightShoulder => "rightShoulder",
            Landmark::LeftElbow     => "leftElbow",
            Landmark::RightElbow    => "rightElbow",
            Landmark::LeftWrist     => "leftWrist",
            Landmark::RightWrist    => "rightWrist",
            Landmark::LeftHip       => "leftHip",
            Landmark::RightHip      => "rightHip",
            Landmark::LeftKnee      => "leftKnee",
            Landmark::RightKnee     => "rightKnee",
            Landmark::LeftAnkle     => "leftAnkle",
            Landmark::RightAnkle    => "rightAnkle",
        }
    }

    /// Parse a wire name.  Unknown names yield `None` (the adapter drops
    /// them rather than failing the frame).
    pub fn from_wire_name(name: &str) -> Option<Landmark> {
        Landmark::ALL.iter().copied().find(|l| l.wire_name() == name)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Keypoint
// ════════════════════════════════════════════════════════════════════════════

/// A detected landmark position with its confidence score.
///
/// Coordinates are screen-space pixels in the collaborator's frame (the
/// classic 640×480 capture frame by default); `score` is in [0, 1].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Keypoint {
    pub x:     f32,
    pub y:     f32,
    pub score: f32,
}

impl Keypoint {
    pub fn new(x: f32, y: f32, score: f32) -> Self {
        Keypoint { x, y, score }
    }

    /// Euclidean distance to another keypoint.
    pub fn distance_to(&self, other: &Keypoint) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_names_round_trip() {
        for lm in Landmark::ALL {
            assert_eq!(Landmark::from_wire_name(lm.wire_name()), Some(lm));
        }
    }

    #[test]
    fn unknown_wire_name_is_none() {
        assert_eq!(Landmark::from_wire_name("thirdEye"), None);
    }

    #[test]
    fn indices_are_slot_order() {
        for (i, lm) in Landmark::ALL.iter().enumerate() {
            assert_eq!(lm.index(), i);
        }
    }

    #[test]
    fn distance_is_euclidean() {
        let a = Keypoint::new(0.0, 0.0, 1.0);
        let b = Keypoint::new(3.0, 4.0, 1.0);
        assert_eq!(a.distance_to(&b), 5.0);
    }
}
