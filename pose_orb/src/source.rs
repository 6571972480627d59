//! Pose sources — the boundary to the external pose-estimation collaborator.
//!
//! The public interface is a stream of [`RawObservation`]s over an `mpsc`
//! channel.  Consumers don't care whether frames come from a real model
//! process or the keyboard-driven simulator, and they never block on the
//! channel: when no new frame has arrived by render time, the previous one
//! is simply reused.

use std::io::{self, BufRead, BufReader};
use std::fs::File;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use log::{info, warn};

use orb_core::ValueNoise;
use pose_stream::{Landmark, RawFigure, RawKeypoint, RawObservation, RawPoint, RawPose};

// ════════════════════════════════════════════════════════════════════════════
// PoseSource trait
// ════════════════════════════════════════════════════════════════════════════

/// Anything that can deliver raw observations over a channel.
pub trait PoseSource: Send + 'static {
    fn run(self: Box<Self>, tx: Sender<RawObservation>);
}

/// Spawn a pose source on its own thread and return the receiving end.
pub fn spawn_pose_source<S: PoseSource>(source: S) -> Receiver<RawObservation> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || Box::new(source).run(tx));
    rx
}

// ════════════════════════════════════════════════════════════════════════════
// SimPoseSource — synthetic figure, steered from the keyboard
// ════════════════════════════════════════════════════════════════════════════

/// Steering commands sent from the visualizer window.
#[derive(Clone, Copy, Debug)]
pub enum SimCommand {
    /// Nudge the figure's center by (dx, dy) capture-frame pixels.
    Move(f32, f32),
    /// Step toward the camera (scale up).
    Grow,
    /// Step away from the camera (scale down).
    Shrink,
    /// Burst of motion — briefly shakes every keypoint.
    Jolt,
    /// Hide or show the figure entirely.
    ToggleFigure,
}

/// Keypoint offsets of a standing figure at scale 1.0, in slot order,
/// relative to the hip line.  Roughly 230 px tall in the 640×480 frame.
const FIGURE_OFFSETS: [(f32, f32); 17] = [
    (0.0, -90.0),    // nose
    (-7.0, -96.0),   // leftEye
    (7.0, -96.0),    // rightEye
    (-16.0, -92.0),  // leftEar
    (16.0, -92.0),   // rightEar
    (-30.0, -60.0),  // leftShoulder
    (30.0, -60.0),   // rightShoulder
    (-45.0, -25.0),  // leftElbow
    (45.0, -25.0),   // rightElbow
    (-50.0, 10.0),   // leftWrist
    (50.0, 10.0),    // rightWrist
    (-18.0, 5.0),    // leftHip
    (18.0, 5.0),     // rightHip
    (-20.0, 60.0),   // leftKnee
    (20.0, 60.0),    // rightKnee
    (-22.0, 115.0),  // leftAnkle
    (22.0, 115.0),   // rightAnkle
];

/// Capture-frame size the simulated model pretends to see.
const FRAME_W: f32 = 640.0;
const FRAME_H: f32 = 480.0;

/// A synthetic person for camera-less development.
///
/// The figure sways on its own (value noise), breathes slightly, and each
/// keypoint carries a wobbling confidence score that occasionally dips below
/// any sensible threshold — so downstream code sees realistic dropouts.
pub struct SimPoseSource {
    pub rx:   Receiver<SimCommand>,
    pub seed: u64,
}

impl SimPoseSource {
    pub fn new(rx: Receiver<SimCommand>) -> Self {
        SimPoseSource { rx, seed: 11 }
    }

    /// One synthesized frame.
    pub(crate) fn frame(noise: &ValueNoise, cx: f32, cy: f32, scale: f32, jolt: f32, t: f32) -> RawObservation {
        let breathe = 1.0 + 0.02 * (t * 1.4).sin();
        let sway_x = (noise.sample2(t * 0.11, 3.3) - 0.5) * 40.0;
        let sway_y = (noise.sample2(t * 0.13, 7.7) - 0.5) * 16.0;
        let wobble = 1.5 + jolt * 25.0;

        let keypoints = Landmark::ALL
            .iter()
            .enumerate()
            .map(|(i, lm)| {
                let (ox, oy) = FIGURE_OFFSETS[i];
                let fi = i as f32;
                let wx = (noise.sample2(fi * 0.31, t) - 0.5) * 2.0 * wobble;
                let wy = (noise.sample2(fi * 0.31 + 50.0, t) - 0.5) * 2.0 * wobble;

                // Confidence wobbles per keypoint and occasionally drops out.
                let score = if noise.sample2(fi * 1.3, t * 0.23) < 0.06 {
                    0.05
                } else {
                    0.55 + 0.44 * noise.sample2(fi * 0.77, t * 0.5)
                };

                RawKeypoint {
                    part: lm.wire_name().to_string(),
                    score,
                    position: RawPoint {
                        x: cx + sway_x + ox * scale * breathe + wx,
                        y: cy + sway_y + oy * scale * breathe + wy,
                    },
                }
            })
            .collect();

        RawObservation {
            poses: vec![RawFigure { pose: RawPose { keypoints } }],
        }
    }
}

impl PoseSource for SimPoseSource {
    fn run(self: Box<Self>, tx: Sender<RawObservation>) {
        let noise = ValueNoise::new(self.seed);
        let mut cx = FRAME_W / 2.0;
        let mut cy = FRAME_H / 2.0;
        let mut scale = 1.0f32;
        let mut jolt = 0.0f32;
        let mut visible = true;
        let mut t = 0.0f32;

        loop {
            // ── steering commands ─────────────────────────────────────────
            while let Ok(cmd) = self.rx.try_recv() {
                match cmd {
                    SimCommand::Move(dx, dy) => {
                        cx = (cx + dx).clamp(0.0, FRAME_W);
                        cy = (cy + dy).clamp(0.0, FRAME_H);
                    }
                    SimCommand::Grow   => scale = (scale * 1.06).min(3.0),
                    SimCommand::Shrink => scale = (scale / 1.06).max(0.3),
                    SimCommand::Jolt   => jolt = 1.0,
                    SimCommand::ToggleFigure => visible = !visible,
                }
            }

            let obs = if visible {
                Self::frame(&noise, cx, cy, scale, jolt, t)
            } else {
                RawObservation::default()
            };
            if tx.send(obs).is_err() {
                return; // consumer gone
            }

            jolt *= 0.90;
            t += 0.033;
            thread::sleep(Duration::from_millis(33));
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// JsonPoseSource — external model adapter
// ════════════════════════════════════════════════════════════════════════════

/// Reads newline-delimited ml5/PoseNet-shaped JSON produced by a real pose
/// process, one observation per line.  Malformed lines are logged and
/// skipped; end of input simply stops the stream (the animation keeps
/// running on the last observation).
pub struct JsonPoseSource {
    reader: Box<dyn BufRead + Send>,
}

impl JsonPoseSource {
    pub fn from_stdin() -> Self {
        JsonPoseSource { reader: Box::new(BufReader::new(io::stdin())) }
    }

    pub fn from_path(path: &str) -> Result<Self> {
        let file = File::open(path).with_context(|| format!("opening pose stream {:?}", path))?;
        Ok(JsonPoseSource { reader: Box::new(BufReader::new(file)) })
    }
}

impl PoseSource for JsonPoseSource {
    fn run(self: Box<Self>, tx: Sender<RawObservation>) {
        for line in self.reader.lines() {
            let line = match line {
                Ok(l) => l,
                Err(e) => {
                    warn!("pose stream read error: {}", e);
                    return;
                }
            };
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<RawObservation>(&line) {
                Ok(raw) => {
                    if tx.send(raw).is_err() {
                        return;
                    }
                }
                Err(e) => warn!("skipping malformed observation: {}", e),
            }
        }
        info!("pose stream ended");
    }
}

// ════════════════════════════════════════════════════════════════════════════
// NullPoseSource — fallback when the collaborator is missing
// ════════════════════════════════════════════════════════════════════════════

/// Emits nothing, ever.  Used when the external collaborator failed to
/// initialize: the error is reported once at startup and the orb idles on an
/// empty-observation stream instead of crashing.
pub struct NullPoseSource;

impl PoseSource for NullPoseSource {
    fn run(self: Box<Self>, _tx: Sender<RawObservation>) {}
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use pose_stream::Observation;

    #[test]
    fn sim_frame_has_full_vocabulary() {
        let noise = ValueNoise::new(11);
        let raw = SimPoseSource::frame(&noise, 320.0, 240.0, 1.0, 0.0, 1.0);
        assert_eq!(raw.poses.len(), 1);
        assert_eq!(raw.poses[0].pose.keypoints.len(), 17);
        for kp in &raw.poses[0].pose.keypoints {
            assert!(Landmark::from_wire_name(&kp.part).is_some());
            assert!((0.0..=1.0).contains(&kp.score));
        }
    }

    #[test]
    fn sim_frame_normalizes_into_a_usable_observation() {
        let noise = ValueNoise::new(11);
        let raw = SimPoseSource::frame(&noise, 320.0, 240.0, 1.0, 0.0, 1.0);
        let obs = Observation::normalize(&raw, 0.1);
        // Most keypoints survive the threshold; a dropout or two is fine.
        let kept = obs.figures[0].keypoints().count();
        assert!(kept >= 12, "only {} keypoints kept", kept);
    }

    #[test]
    fn sim_frames_are_deterministic_per_seed() {
        let noise = ValueNoise::new(11);
        let a = SimPoseSource::frame(&noise, 320.0, 240.0, 1.0, 0.0, 2.5);
        let b = SimPoseSource::frame(&noise, 320.0, 240.0, 1.0, 0.0, 2.5);
        let ax = a.poses[0].pose.keypoints[0].position.x;
        let bx = b.poses[0].pose.keypoints[0].position.x;
        assert_eq!(ax, bx);
    }

    #[test]
    fn json_lines_parse_and_flow_through() {
        let data = concat!(
            r#"{"poses":[{"pose":{"keypoints":[{"part":"nose","score":0.9,"position":{"x":1.0,"y":2.0}}]}}]}"#,
            "\n",
            "this is not json\n",
            r#"{"poses":[]}"#,
            "\n",
        );
        let source = JsonPoseSource { reader: Box::new(BufReader::new(data.as_bytes())) };
        let (tx, rx) = mpsc::channel();
        Box::new(source).run(tx);

        let frames: Vec<RawObservation> = rx.try_iter().collect();
        assert_eq!(frames.len(), 2); // malformed line skipped
        assert_eq!(frames[0].poses[0].pose.keypoints[0].part, "nose");
        assert!(frames[1].poses.is_empty());
    }

    #[test]
    fn null_source_closes_the_channel_quietly() {
        let rx = spawn_pose_source(NullPoseSource);
        // Channel disconnects without delivering anything.
        thread::sleep(Duration::from_millis(50));
        assert!(rx.try_recv().is_err());
    }
}
