//! Top-level application state and the main loop.
//!
//! `AppState` owns the reactor and the most recent normalized observation;
//! `run` wires a pose source, the visualizer, and the reactor together at
//! ~60 fps.  Pose frames arrive on their own cadence — the render tick never
//! waits for one, it just reuses the last observation it has.

use std::sync::mpsc;
use std::time::{Duration, Instant};

use anyhow::{anyhow, Result};
use log::{error, info};

use orb_core::{OrbConfig, OrbReactor, RenderFrame};
use pose_stream::{Observation, RawObservation};

use crate::source::{spawn_pose_source, JsonPoseSource, NullPoseSource, SimPoseSource};
use crate::visualizer::{Visualizer, WIN_H, WIN_W};

// ════════════════════════════════════════════════════════════════════════════
// AppConfig
// ════════════════════════════════════════════════════════════════════════════

/// Where raw observations come from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SourceKind {
    /// Keyboard-steered synthetic figure (default).
    Sim,
    /// ml5-shaped JSON lines on stdin.
    Stdin,
    /// ml5-shaped JSON lines from a file.
    File(String),
}

pub struct AppConfig {
    pub orb:    OrbConfig,
    pub source: SourceKind,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig { orb: OrbConfig::default(), source: SourceKind::Sim }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// AppState
// ════════════════════════════════════════════════════════════════════════════

pub struct AppState {
    reactor:     OrbReactor,
    observation: Observation,
    min_score:   f32,
    pub status:  String,
}

impl AppState {
    pub fn new(config: &AppConfig) -> Self {
        let center = (WIN_W as f32 / 2.0, WIN_H as f32 / 2.0);
        AppState {
            reactor:     OrbReactor::new(config.orb.clone(), center),
            observation: Observation::default(),
            min_score:   config.orb.min_score,
            status:      "waiting for pose stream".to_string(),
        }
    }

    /// Replace the current observation with a freshly normalized one.
    pub fn handle_raw(&mut self, raw: &RawObservation) {
        self.observation = Observation::normalize(raw, self.min_score);
    }

    /// Advance one animation tick and refresh the status line.
    pub fn tick(&mut self, now: Duration) -> RenderFrame {
        let frame = self.reactor.tick(&self.observation, now, 1.0);

        let s = self.reactor.state();
        let a = self.reactor.activity();
        self.status = format!(
            "mood={}  override={}  r={:>3.0}  base={:>3.0}  max={:>3.0}  area={:>6.0}  vel={:>5.1}",
            s.mood.name(),
            s.proximity.name(),
            frame.radius,
            s.base_radius,
            s.max_radius,
            a.area,
            a.velocity,
        );

        frame
    }

    pub fn observation(&self) -> &Observation {
        &self.observation
    }
}

// ════════════════════════════════════════════════════════════════════════════
// run() — the main application loop
// ════════════════════════════════════════════════════════════════════════════

/// Run the full application.  Returns when the window closes or Q is
/// pressed.
pub fn run(config: AppConfig) -> Result<()> {
    // ── sim steering channel (ignored by non-sim sources) ────────────────
    let (sim_tx, sim_rx) = mpsc::channel();

    // ── pose source ───────────────────────────────────────────────────────
    let pose_rx = match &config.source {
        SourceKind::Sim => {
            info!("pose source: simulated figure");
            spawn_pose_source(SimPoseSource::new(sim_rx))
        }
        SourceKind::Stdin => {
            info!("pose source: JSON lines on stdin");
            spawn_pose_source(JsonPoseSource::from_stdin())
        }
        SourceKind::File(path) => match JsonPoseSource::from_path(path) {
            Ok(source) => {
                info!("pose source: {}", path);
                spawn_pose_source(source)
            }
            Err(e) => {
                // The collaborator is missing; report once and idle on an
                // empty stream rather than dying.
                error!("pose source unavailable ({:#}); continuing without detections", e);
                spawn_pose_source(NullPoseSource)
            }
        },
    };

    // ── visualizer + state ────────────────────────────────────────────────
    let mut vis = Visualizer::new(sim_tx).map_err(|e| anyhow!(e))?;
    let mut app = AppState::new(&config);
    let started = Instant::now();

    // ── main loop ─────────────────────────────────────────────────────────
    while vis.is_open() {
        if !vis.poll_input() {
            break;
        }

        // Drain the pose channel, keeping only the newest frame.  A closed
        // channel just means no further updates will come.
        let mut latest: Option<RawObservation> = None;
        while let Ok(raw) = pose_rx.try_recv() {
            latest = Some(raw);
        }
        if let Some(raw) = latest {
            app.handle_raw(&raw);
        }

        let frame = app.tick(started.elapsed());
        vis.render(&frame, app.observation(), &app.status);
    }

    Ok(())
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use orb_core::ValueNoise;
    use pose_stream::{RawFigure, RawKeypoint, RawPoint, RawPose};

    fn make_app() -> AppState {
        AppState::new(&AppConfig::default())
    }

    fn secs(s: f32) -> Duration {
        Duration::from_secs_f32(s)
    }

    #[test]
    fn starts_with_an_empty_observation() {
        let app = make_app();
        assert!(app.observation().is_empty());
    }

    #[test]
    fn raw_frames_are_normalized_on_arrival() {
        let mut app = make_app();
        let raw = RawObservation {
            poses: vec![RawFigure {
                pose: RawPose {
                    keypoints: vec![
                        RawKeypoint {
                            part: "nose".to_string(),
                            score: 0.9,
                            position: RawPoint { x: 10.0, y: 10.0 },
                        },
                        RawKeypoint {
                            part: "leftEye".to_string(),
                            score: 0.01, // below threshold
                            position: RawPoint { x: 12.0, y: 8.0 },
                        },
                    ],
                },
            }],
        };
        app.handle_raw(&raw);
        assert_eq!(app.observation().figures.len(), 1);
        assert_eq!(app.observation().figures[0].keypoints().count(), 1);
    }

    #[test]
    fn tick_produces_a_frame_and_a_status() {
        let mut app = make_app();
        let frame = app.tick(secs(0.016));
        assert_eq!(frame.points.len(), 100);
        assert!(app.status.contains("mood="));
        assert!(app.status.contains("override="));
    }

    #[test]
    fn ticks_without_observations_reuse_the_empty_frame() {
        let mut app = make_app();
        for i in 0..120 {
            let frame = app.tick(secs(i as f32 / 60.0));
            assert!(frame.radius.is_finite());
        }
    }

    #[test]
    fn simulated_stream_drives_the_loop_logic() {
        // End-to-end without a window: sim frame → normalize → tick.
        let mut app = make_app();
        let noise = ValueNoise::new(11);
        let mut t = 0.0f32;
        for _ in 0..60 {
            t += 0.033;
            let raw = SimPoseSource::frame(&noise, 320.0, 240.0, 1.5, 0.2, t);
            app.handle_raw(&raw);
            let frame = app.tick(secs(t));
            assert!(frame.radius.is_finite());
        }
        // A figure was visible throughout, so activity must be nonzero.
        assert!(app.status.contains("area="));
    }
}
