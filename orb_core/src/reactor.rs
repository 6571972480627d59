//! The reactor facade: one call per animation tick, one render descriptor
//! out.

use std::time::Duration;

use pose_stream::{ActivityState, MotionTracker, Observation};

use crate::color::{orb_color, Rgb};
use crate::config::OrbConfig;
use crate::mood::MoodMachine;
use crate::pulse::Pulsator;
use crate::size::SizeController;
use crate::state::OrbState;

// ════════════════════════════════════════════════════════════════════════════
// RenderFrame
// ════════════════════════════════════════════════════════════════════════════

/// Everything a renderer needs for one tick.  The core has no idea how (or
/// whether) these get drawn.
#[derive(Clone, Debug)]
pub struct RenderFrame {
    pub center: (f32, f32),
    /// Instantaneous pulsating radius.
    pub radius: f32,
    pub color:  Rgb,
    /// Ring points, already jittered.
    pub points: Vec<(f32, f32)>,
}

// ════════════════════════════════════════════════════════════════════════════
// OrbReactor
// ════════════════════════════════════════════════════════════════════════════

/// Owns the whole reactive pipeline and its state.
pub struct OrbReactor {
    config:   OrbConfig,
    tracker:  MotionTracker,
    size:     SizeController,
    pulsator: Pulsator,
    moods:    MoodMachine,
    state:    OrbState,
    center:   (f32, f32),
    last_activity: ActivityState,
}

impl OrbReactor {
    pub fn new(config: OrbConfig, center: (f32, f32)) -> Self {
        let state = OrbState::new(&config);
        let size = SizeController::new(config.size.clone());
        let pulsator = Pulsator::new(config.pulse.clone());
        let moods = MoodMachine::new(config.mood.clone(), config.pulse.speed);
        OrbReactor {
            config,
            tracker: MotionTracker::new(),
            size,
            pulsator,
            moods,
            state,
            center,
            last_activity: ActivityState::default(),
        }
    }

    /// Deterministic construction for tests: seeds the mood machine's RNG
    /// (the pulsation noise seed already lives in the config).
    pub fn seeded(config: OrbConfig, center: (f32, f32), seed: u64) -> Self {
        let mut reactor = Self::new(config.clone(), center);
        reactor.moods = MoodMachine::seeded(config.mood, config.pulse.speed, seed);
        reactor
    }

    /// Advance one animation tick.
    ///
    /// `obs` is the most recent normalized observation (re-use the previous
    /// one when the pose collaborator hasn't produced a new frame — never
    /// block waiting for it).  `now` is time since startup; `dt` the
    /// frame-time factor (1.0 at nominal cadence).
    pub fn tick(&mut self, obs: &Observation, now: Duration, dt: f32) -> RenderFrame {
        let activity = self.tracker.update(obs);
        self.size.tick(&mut self.state, &activity);
        self.moods.tick(&mut self.state, obs.primary_face_box(), now);
        self.pulsator.advance(&mut self.state, dt);

        let radius = self.pulsator.radius(&self.state);
        let color = orb_color(radius, self.state.max_radius, self.state.proximity, &self.config.color);
        let points = self.pulsator.ring(self.center, radius, self.state.mood, &self.state);

        self.last_activity = activity;

        RenderFrame { center: self.center, radius, color, points }
    }

    pub fn state(&self) -> &OrbState {
        &self.state
    }

    pub fn activity(&self) -> &ActivityState {
        &self.last_activity
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use pose_stream::{RawFigure, RawKeypoint, RawObservation, RawPoint, RawPose};

    fn observation(points: &[(&str, f32, f32)]) -> Observation {
        let keypoints = points
            .iter()
            .map(|&(part, x, y)| RawKeypoint {
                part: part.to_string(),
                score: 0.95,
                position: RawPoint { x, y },
            })
            .collect();
        Observation::normalize(
            &RawObservation {
                poses: vec![RawFigure { pose: RawPose { keypoints } }],
            },
            0.1,
        )
    }

    fn secs(s: f32) -> Duration {
        Duration::from_secs_f32(s)
    }

    #[test]
    fn empty_stream_keeps_the_orb_alive_and_finite() {
        let mut reactor = OrbReactor::seeded(OrbConfig::default(), (400.0, 400.0), 9);
        for i in 0..600 {
            let frame = reactor.tick(&Observation::default(), secs(i as f32 / 60.0), 1.0);
            assert!(frame.radius.is_finite());
            assert_eq!(frame.points.len(), 100);
            assert!(frame.points.iter().all(|p| p.0.is_finite() && p.1.is_finite()));
        }
    }

    #[test]
    fn figure_grows_the_orb() {
        let mut reactor = OrbReactor::seeded(OrbConfig::default(), (400.0, 400.0), 9);
        let big = observation(&[
            ("leftShoulder", 0.0, 0.0),
            ("rightShoulder", 600.0, 0.0),
            ("leftAnkle", 0.0, 450.0),
            ("rightAnkle", 600.0, 450.0),
        ]);
        let before = reactor.state().base_radius;
        for i in 0..300 {
            reactor.tick(&big, secs(i as f32 / 60.0), 1.0);
        }
        assert!(reactor.state().base_radius > before);
    }

    #[test]
    fn adversarial_sequence_respects_clamps() {
        let mut reactor = OrbReactor::seeded(OrbConfig::default(), (400.0, 400.0), 9);
        let huge = observation(&[("nose", -1e7, -1e7), ("leftAnkle", 1e7, 1e7)]);
        let empty = Observation::default();
        let mut t = 0.0f32;
        for obs in [&empty, &huge, &empty, &huge, &empty] {
            for _ in 0..240 {
                t += 1.0 / 60.0;
                reactor.tick(obs, secs(t), 1.0);
                let s = reactor.state();
                assert!((10.0..=650.0).contains(&s.base_radius));
                assert!((100.0..=600.0).contains(&s.max_radius));
            }
        }
    }

    #[test]
    fn frame_radius_stays_inside_the_envelope() {
        let mut reactor = OrbReactor::seeded(OrbConfig::default(), (400.0, 400.0), 9);
        for i in 0..600 {
            let frame = reactor.tick(&Observation::default(), secs(i as f32 / 60.0), 1.0);
            let s = reactor.state();
            assert!(frame.radius >= s.base_radius - 1e-3);
            assert!(frame.radius <= s.max_radius + 1e-3);
        }
    }

    #[test]
    fn activity_is_reported_for_the_status_line() {
        let mut reactor = OrbReactor::seeded(OrbConfig::default(), (400.0, 400.0), 9);
        let obs = observation(&[("nose", 0.0, 0.0), ("leftAnkle", 100.0, 100.0)]);
        reactor.tick(&obs, secs(0.016), 1.0);
        assert_eq!(reactor.activity().area, 10_000.0);
    }
}
