//! Frame-to-frame activity: bounding-box area and mean keypoint velocity.
//!
//! The tracker keeps exactly one previous observation.  Velocity pairs up
//! keypoints by (figure index, landmark slot); a keypoint present in only one
//! of the two frames contributes nothing — never a spurious displacement
//! against an unrelated point.  No smoothing happens here; that is the size
//! controller's job.

use crate::keypoint::Landmark;
use crate::observation::Observation;

// ════════════════════════════════════════════════════════════════════════════
// Bounds
// ════════════════════════════════════════════════════════════════════════════

/// Axis-aligned bounding box over valid keypoints.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub min_x: f32,
    pub min_y: f32,
    pub max_x: f32,
    pub max_y: f32,
}

impl Bounds {
    pub fn width(&self) -> f32 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f32 {
        self.max_y - self.min_y
    }

    pub fn area(&self) -> f32 {
        self.width() * self.height()
    }
}

// ════════════════════════════════════════════════════════════════════════════
// ActivityState
// ════════════════════════════════════════════════════════════════════════════

/// Per-tick activity summary consumed by the size controller.
///
/// `area` is 0.0 and `bounds` is `None` when the observation has no valid
/// keypoints; `velocity` is 0.0 when nothing could be matched.  All fields
/// are always finite.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ActivityState {
    pub area:     f32,
    pub bounds:   Option<Bounds>,
    pub velocity: f32,
}

// ════════════════════════════════════════════════════════════════════════════
// MotionTracker
// ════════════════════════════════════════════════════════════════════════════

/// Computes [`ActivityState`] from successive observations.
#[derive(Debug, Default)]
pub struct MotionTracker {
    previous: Option<Observation>,
}

impl MotionTracker {
    pub fn new() -> Self {
        MotionTracker { previous: None }
    }

    /// Consume one observation and report the activity it implies.
    pub fn update(&mut self, current: &Observation) -> ActivityState {
        let bounds = bounding_box(current);
        let area = bounds.map(|b| b.area()).unwrap_or(0.0);
        let velocity = self
            .previous
            .as_ref()
            .map(|prev| mean_displacement(current, prev))
            .unwrap_or(0.0);

        self.previous = Some(current.clone());

        ActivityState { area, bounds, velocity }
    }
}

fn bounding_box(obs: &Observation) -> Option<Bounds> {
    let mut bounds: Option<Bounds> = None;
    for figure in &obs.figures {
        for (_, kp) in figure.keypoints() {
            bounds = Some(match bounds {
                None => Bounds { min_x: kp.x, min_y: kp.y, max_x: kp.x, max_y: kp.y },
                Some(b) => Bounds {
                    min_x: b.min_x.min(kp.x),
                    min_y: b.min_y.min(kp.y),
                    max_x: b.max_x.max(kp.x),
                    max_y: b.max_y.max(kp.y),
                },
            });
        }
    }
    bounds
}

fn mean_displacement(current: &Observation, previous: &Observation) -> f32 {
    let mut total = 0.0;
    let mut count = 0u32;

    for (fi, figure) in current.figures.iter().enumerate() {
        let Some(prev_figure) = previous.figures.get(fi) else { continue };
        for lm in Landmark::ALL {
            if let (Some(kp), Some(prev_kp)) = (figure.get(lm), prev_figure.get(lm)) {
                total += kp.distance_to(prev_kp);
                count += 1;
            }
        }
    }

    if count == 0 {
        0.0
    } else {
        total / count as f32
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
