//! Pulsation: the instantaneous radius inside the `[base, max]` envelope,
//! and the jittered ring of points the renderer draws.

use std::f32::consts::TAU;

use crate::config::{PulsePolicy, PulseTuning};
use crate::math::map_range;
use crate::mood::Mood;
use crate::noise::ValueNoise;
use crate::state::OrbState;

pub struct Pulsator {
    tuning: PulseTuning,
    noise:  ValueNoise,
}

impl Pulsator {
    pub fn new(tuning: PulseTuning) -> Self {
        let noise = ValueNoise::new(tuning.noise_seed);
        Pulsator { tuning, noise }
    }

    /// Advance phase and noise cursor.  `dt` is the host's frame-time factor
    /// (1.0 at the nominal tick rate).
    pub fn advance(&self, state: &mut OrbState, dt: f32) {
        state.phase += state.pulse_speed * dt;
        state.noise_time += self.tuning.time_step * dt;
    }

    /// Instantaneous pulsating radius for the current tick.
    pub fn radius(&self, state: &OrbState) -> f32 {
        let span = state.max_radius - state.base_radius;
        match self.tuning.policy {
            // |sin| keeps the radius on or above base_radius and gives the
            // pulse its heartbeat cadence.
            PulsePolicy::Heartbeat => state.base_radius + state.phase.sin().abs() * span,
            PulsePolicy::Drift => state.base_radius + self.noise.sample1(state.noise_time) * span,
        }
    }

    /// The ring of points to draw, evenly spaced with a mood-dependent
    /// radial jitter.
    ///
    /// Happy and neutral get a gentle organic wobble, scared samples the
    /// noise field at a much higher angular frequency (a jagged, nervous
    /// outline), and bored freezes the ring entirely.
    pub fn ring(&self, center: (f32, f32), radius: f32, mood: Mood, state: &OrbState) -> Vec<(f32, f32)> {
        let n = self.tuning.ring_points;
        let step = match mood {
            Mood::Bored  => None,
            Mood::Scared => Some(self.tuning.scared_jitter_step),
            Mood::Neutral | Mood::Happy => Some(self.tuning.jitter_step),
        };

        let angle_step = TAU / n as f32;
        let amp = self.tuning.jitter_amplitude;

        (0..n)
            .map(|i| {
                let angle = i as f32 * angle_step;
                let r = match step {
                    None => radius,
                    Some(s) => {
                        let v = self.noise.sample2(i as f32 * s, state.noise_time);
                        radius + map_range(v, 0.0, 1.0, -amp, amp)
                    }
                };
                (center.0 + angle.cos() * r, center.1 + angle.sin() * r)
            })
            .collect()
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OrbConfig;

    fn state() -> OrbState {
        let mut s = OrbState::new(&OrbConfig::default());
        s.base_radius = 50.0;
        s.max_radius = 150.0;
        s
    }

    fn pulsator(policy: PulsePolicy) -> Pulsator {
        Pulsator::new(PulseTuning { policy, ..PulseTuning::default() })
    }

    #[test]
    fn heartbeat_starts_at_base() {
        let s = state();
        assert_eq!(pulsator(PulsePolicy::Heartbeat).radius(&s), 50.0);
    }

    #[test]
    fn heartbeat_peaks_at_max() {
        let mut s = state();
        s.phase = std::f32::consts::FRAC_PI_2;
        let r = pulsator(PulsePolicy::Heartbeat).radius(&s);
        assert!((r - 150.0).abs() < 1e-3);
    }

    #[test]
    fn heartbeat_never_dips_below_base() {
        let p = pulsator(PulsePolicy::Heartbeat);
        let mut s = state();
        for _ in 0..5_000 {
            p.advance(&mut s, 1.0);
            let r = p.radius(&s);
            assert!(r >= 50.0 - 1e-4 && r <= 150.0 + 1e-4);
        }
    }

    #[test]
    fn drift_stays_in_envelope() {
        let p = pulsator(PulsePolicy::Drift);
        let mut s = state();
        for _ in 0..5_000 {
            p.advance(&mut s, 1.0);
            let r = p.radius(&s);
            assert!((50.0..150.0).contains(&r), "radius {}", r);
        }
    }

    #[test]
    fn advance_scales_with_dt() {
        let p = pulsator(PulsePolicy::Heartbeat);
        let mut a = state();
        let mut b = state();
        p.advance(&mut a, 1.0);
        p.advance(&mut b, 2.0);
        assert!((b.phase - 2.0 * a.phase).abs() < 1e-6);
    }

    #[test]
    fn ring_has_configured_point_count() {
        let p = pulsator(PulsePolicy::Heartbeat);
        let s = state();
        assert_eq!(p.ring((400.0, 400.0), 100.0, Mood::Happy, &s).len(), 100);
    }

    #[test]
    fn bored_ring_is_a_perfect_circle() {
        let p = pulsator(PulsePolicy::Heartbeat);
        let s = state();
        for (x, y) in p.ring((0.0, 0.0), 100.0, Mood::Bored, &s) {
            let r = (x * x + y * y).sqrt();
            assert!((r - 100.0).abs() < 1e-3);
        }
    }

    #[test]
    fn jitter_stays_within_amplitude() {
        let p = pulsator(PulsePolicy::Heartbeat);
        let mut s = state();
        for _ in 0..100 {
            p.advance(&mut s, 1.0);
            for (x, y) in p.ring((0.0, 0.0), 100.0, Mood::Scared, &s) {
                let r = (x * x + y * y).sqrt();
                assert!((r - 100.0).abs() <= 10.0 + 1e-3, "jitter too large: {}", r);
            }
        }
    }

    #[test]
    fn ring_is_deterministic_for_a_seed() {
        let s = state();
        let a = pulsator(PulsePolicy::Heartbeat).ring((0.0, 0.0), 80.0, Mood::Happy, &s);
        let b = pulsator(PulsePolicy::Heartbeat).ring((0.0, 0.0), 80.0, Mood::Happy, &s);
        assert_eq!(a, b);
    }
}
