//! The single owned bundle of continuously-evolving orb parameters.

use std::time::Duration;

use crate::config::OrbConfig;
use crate::mood::{Mood, ProximityOverride};

/// All mutable animation state, one process-wide instance.
///
/// Written once per tick by the size controller and the mood machine; the
/// renderer only ever reads it (through [`crate::RenderFrame`]).  Keeping it
/// in one place means there are no hidden statics to reset and tests can
/// construct any scenario directly.
#[derive(Clone, Debug)]
pub struct OrbState {
    /// Lower bound of the pulsation envelope.
    pub base_radius: f32,
    /// Upper bound of the pulsation envelope.
    pub max_radius:  f32,
    /// Phase advance per tick (perturbed by proximity overrides).
    pub pulse_speed: f32,
    /// Accumulated pulsation phase (Heartbeat policy).
    pub phase:       f32,
    /// Ever-incrementing noise cursor (Drift policy and ring jitter).
    pub noise_time:  f32,
    /// Current exponential-smoothing factor for the radii.
    pub transition_factor: f32,
    /// Slow ambient disposition.
    pub mood:        Mood,
    /// Transient close-proximity reaction, at most one active.
    pub proximity:   ProximityOverride,
    /// When the active override was triggered (None while inactive).
    pub proximity_since: Option<Duration>,
}

impl OrbState {
    pub fn new(config: &OrbConfig) -> Self {
        OrbState {
            base_radius: config.size.base_clamp.0,
            max_radius:  config.size.max_clamp.0,
            pulse_speed: config.pulse.speed,
            phase:       0.0,
            noise_time:  0.0,
            transition_factor: 0.02,
            mood:        Mood::Neutral,
            proximity:   ProximityOverride::None,
            proximity_since: None,
        }
    }

    /// Clear any active override.
    pub fn clear_override(&mut self) {
        self.proximity = ProximityOverride::None;
        self.proximity_since = None;
    }

    /// Activate `kind`, replacing whatever override was active before.
    pub fn activate_override(&mut self, kind: ProximityOverride, now: Duration) {
        self.clear_override();
        if kind != ProximityOverride::None {
            self.proximity = kind;
            self.proximity_since = Some(now);
        }
    }
}
