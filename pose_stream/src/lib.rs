//! # pose_stream
//!
//! Normalized pose observations for the orb animation core.
//!
//! A pose-estimation collaborator (an external model process, or the built-in
//! simulator in `pose_orb`) periodically produces a *raw* observation: zero or
//! more detected figures, each a list of confidence-scored 2D landmarks.  This
//! crate turns that into a stable per-frame data structure and derives the one
//! scalar pair the animation actually consumes:
//!
//! | Stage | Input | Output |
//! |---|---|---|
//! | [`Observation::normalize`] | raw ml5-shaped keypoint list | [`Observation`] with low-confidence slots dropped |
//! | [`MotionTracker::update`]  | current + previous [`Observation`] | [`ActivityState`] (bounding-box area, mean keypoint velocity) |
//!
//! Keypoints that are missing or below the confidence threshold are `None`
//! slots — nothing downstream ever does arithmetic on an absent landmark, and
//! an observation with zero figures is a perfectly valid "no activity" frame.

pub mod keypoint;
pub mod observation;
pub mod motion;

pub use keypoint::{Keypoint, Landmark, LANDMARK_COUNT};
pub use observation::{
    FaceBox, Figure, Observation, RawFigure, RawKeypoint, RawObservation, RawPoint, RawPose,
};
pub use motion::{ActivityState, Bounds, MotionTracker};
