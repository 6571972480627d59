//! The mood state machine: slow ambient dispositions plus rare, transient
//! close-proximity reactions.
//!
//! Two independent randomized schedules, each owning its own next-fire
//! deadline and advanced explicitly by the host tick:
//!
//! * the **ambient** schedule re-rolls the orb's disposition every 8–15 s
//!   from a configured probability partition;
//! * the **proximity** schedule (Random policy) re-rolls the override every
//!   1–3 s — each roll first resets any active override, then draws, so a
//!   firing never leaves a half-updated state behind.
//!
//! The alternative FaceTriggered policy skips the second schedule: overrides
//! can only fire while a detected face is close, with per-mood
//! probabilities, and they reach back into the size parameters (pulse speed,
//! base radius) while doing so.
//!
//! Overrides always self-clear after `override_duration`, whatever policy
//! armed them.

use std::time::Duration;

use log::info;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use pose_stream::FaceBox;

use crate::config::{MoodProbs, MoodTuning, OverridePolicy, OverrideProbs};
use crate::math::lerp;
use crate::state::OrbState;

// ════════════════════════════════════════════════════════════════════════════
// Mood / ProximityOverride
// ════════════════════════════════════════════════════════════════════════════

/// Slow ambient disposition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mood {
    Neutral,
    Happy,
    Bored,
    Scared,
}

impl Mood {
    pub fn name(self) -> &'static str {
        match self {
            Mood::Neutral => "neutral",
            Mood::Happy   => "happy",
            Mood::Bored   => "bored",
            Mood::Scared  => "scared",
        }
    }
}

/// Transient reaction to a figure being too close to the camera.
/// At most one is active at a time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProximityOverride {
    None,
    Panic,
    BoredClose,
    HappyClose,
}

impl ProximityOverride {
    pub fn name(self) -> &'static str {
        match self {
            ProximityOverride::None       => "none",
            ProximityOverride::Panic      => "panic",
            ProximityOverride::BoredClose => "bored-close",
            ProximityOverride::HappyClose => "happy-close",
        }
    }

    pub fn is_active(self) -> bool {
        self != ProximityOverride::None
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Partition draws
// ════════════════════════════════════════════════════════════════════════════

/// Assign a mood from a uniform draw in [0, 1) by partitioning the interval.
/// Anything past the configured probabilities lands on Neutral.
pub fn pick_mood(draw: f32, probs: &MoodProbs) -> Mood {
    if draw < probs.happy {
        Mood::Happy
    } else if draw < probs.happy + probs.bored {
        Mood::Bored
    } else if draw < probs.happy + probs.bored + probs.scared {
        Mood::Scared
    } else {
        Mood::Neutral
    }
}

/// Assign an override from a uniform draw; the overwhelming remainder of the
/// interval maps to None, which is what keeps these reactions rare.
pub fn pick_override(draw: f32, probs: &OverrideProbs) -> ProximityOverride {
    if draw < probs.panic {
        ProximityOverride::Panic
    } else if draw < probs.panic + probs.bored_close {
        ProximityOverride::BoredClose
    } else if draw < probs.panic + probs.bored_close + probs.happy_close {
        ProximityOverride::HappyClose
    } else {
        ProximityOverride::None
    }
}

// ════════════════════════════════════════════════════════════════════════════
// MoodMachine
// ════════════════════════════════════════════════════════════════════════════

pub struct MoodMachine {
    tuning: MoodTuning,
    default_pulse_speed: f32,
    rng: StdRng,
    next_ambient:   Duration,
    next_proximity: Duration,
}

impl MoodMachine {
    pub fn new(tuning: MoodTuning, default_pulse_speed: f32) -> Self {
        Self::with_rng(tuning, default_pulse_speed, StdRng::from_entropy())
    }

    /// Deterministic construction for tests.
    pub fn seeded(tuning: MoodTuning, default_pulse_speed: f32, seed: u64) -> Self {
        Self::with_rng(tuning, default_pulse_speed, StdRng::seed_from_u64(seed))
    }

    fn with_rng(tuning: MoodTuning, default_pulse_speed: f32, mut rng: StdRng) -> Self {
        let next_ambient   = rand_delay(&mut rng, tuning.ambient_delay);
        let next_proximity = rand_delay(&mut rng, tuning.proximity_delay);
        MoodMachine { tuning, default_pulse_speed, rng, next_ambient, next_proximity }
    }

    /// Advance the machine to `now`.
    ///
    /// Expiry runs first so a just-expired override can be re-armed in the
    /// same tick; both schedules then fire if their deadline has passed.
    pub fn tick(&mut self, state: &mut OrbState, face: Option<FaceBox>, now: Duration) {
        self.expire(state, now);

        if now >= self.next_ambient {
            self.fire_ambient(state, now);
        }

        match self.tuning.policy {
            OverridePolicy::Random => {
                if now >= self.next_proximity {
                    self.fire_proximity(state, now);
                }
            }
            OverridePolicy::FaceTriggered => self.face_trigger(state, face, now),
        }
    }

    fn expire(&mut self, state: &mut OrbState, now: Duration) {
        if !state.proximity.is_active() {
            return;
        }
        if let Some(since) = state.proximity_since {
            let duration = Duration::from_secs_f32(self.tuning.override_duration);
            if now.saturating_sub(since) > duration {
                info!("the orb has calmed down from {}", state.proximity.name());
                state.clear_override();
                state.pulse_speed = self.default_pulse_speed;
            }
        }
    }

    fn fire_ambient(&mut self, state: &mut OrbState, now: Duration) {
        let draw: f32 = self.rng.gen();
        let mood = pick_mood(draw, &self.tuning.ambient_probs);
        if mood != state.mood {
            info!("the orb is now {}", mood.name());
        }
        state.mood = mood;
        self.next_ambient = now + rand_delay(&mut self.rng, self.tuning.ambient_delay);
    }

    fn fire_proximity(&mut self, state: &mut OrbState, now: Duration) {
        // Reset-then-reassign in one firing; no partial state is ever
        // observable between the two.
        let draw: f32 = self.rng.gen();
        let kind = pick_override(draw, &self.tuning.proximity_probs);
        state.activate_override(kind, now);
        if kind.is_active() {
            info!("randomly triggered {} mode", kind.name());
        }
        self.next_proximity = now + rand_delay(&mut self.rng, self.tuning.proximity_delay);
    }

    fn face_trigger(&mut self, state: &mut OrbState, face: Option<FaceBox>, now: Duration) {
        let close = face.map_or(false, |f| f.area > self.tuning.face_area_threshold);
        if !close {
            state.pulse_speed = self.default_pulse_speed;
            return;
        }

        let (kind, trigger) = match state.mood {
            Mood::Scared => (ProximityOverride::Panic, self.tuning.panic),
            Mood::Bored  => (ProximityOverride::BoredClose, self.tuning.bored_close),
            Mood::Happy  => (ProximityOverride::HappyClose, self.tuning.happy_close),
            Mood::Neutral => {
                state.pulse_speed = self.default_pulse_speed;
                return;
            }
        };

        if self.rng.gen::<f32>() < trigger.probability {
            if state.proximity != kind {
                info!("you're too close — triggering {}", kind.name());
                state.activate_override(kind, now);
            }
            // The reaction reaches back into the size parameters: a new pulse
            // cadence immediately, the base radius eased toward the mood's
            // target.
            state.pulse_speed = trigger.pulse_speed;
            state.base_radius = lerp(state.base_radius, trigger.radius_target, self.tuning.nudge);
        }
    }
}

fn rand_delay(rng: &mut StdRng, range: (f32, f32)) -> Duration {
    let secs = if range.1 > range.0 {
        rng.gen_range(range.0..range.1)
    } else {
        range.0
    };
    Duration::from_secs_f32(secs)
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
