//! Tuning configuration for the whole reactive core.
//!
//! The source sketches this behavior comes from disagreed on several
//! constants and on how the proximity reaction should be triggered, so every
//! knob is exposed here and loadable from TOML; the defaults follow the most
//! complete sketch.  Missing keys fall back to defaults, so a config file
//! only needs the values it changes.

use std::fs;

use anyhow::Result;
use log::warn;
use serde::{Deserialize, Serialize};

use crate::color::Rgb;

// ════════════════════════════════════════════════════════════════════════════
// Policy enums
// ════════════════════════════════════════════════════════════════════════════

/// How the instantaneous pulsating radius is generated.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PulsePolicy {
    /// Rectified sinusoid — a heartbeat-like cadence, radius never dips
    /// below `base_radius`.
    Heartbeat,
    /// Smooth value noise over an ever-incrementing cursor — organic,
    /// non-periodic pulsation.
    Drift,
}

/// How proximity overrides are triggered.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OverridePolicy {
    /// A free-running randomized timer re-rolls the override regardless of
    /// what the camera sees.
    Random,
    /// Overrides can only fire while a detected face is close to the
    /// camera, with per-mood probabilities, and couple back into the pulse
    /// speed and base radius.
    FaceTriggered,
}

// ════════════════════════════════════════════════════════════════════════════
// Tuning sections
// ════════════════════════════════════════════════════════════════════════════

/// Size controller tuning: affine area→radius maps, absolute clamps, and the
/// velocity→smoothing map.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct SizeTuning {
    /// Upper end of the bounding-box-area domain (capture frame area).
    pub area_domain:        f32,
    /// Target range for `base_radius` before exaggeration.
    pub base_target:        (f32, f32),
    /// Target range for `max_radius` before exaggeration.
    pub max_target:         (f32, f32),
    pub area_exaggeration:  f32,
    /// Absolute clamp for `base_radius`.
    pub base_clamp:         (f32, f32),
    /// Absolute clamp for `max_radius`.
    pub max_clamp:          (f32, f32),
    /// Upper end of the mean-velocity domain.
    pub velocity_domain:    f32,
    /// Smoothing-factor range the velocity maps into.
    pub transition_range:   (f32, f32),
}

impl Default for SizeTuning {
    fn default() -> Self {
        SizeTuning {
            area_domain:       640.0 * 480.0,
            base_target:       (10.0, 100.0),
            max_target:        (20.0, 200.0),
            area_exaggeration: 4.0,
            base_clamp:        (10.0, 650.0),
            max_clamp:         (100.0, 600.0),
            velocity_domain:   100.0,
            transition_range:  (0.01, 0.3),
        }
    }
}

/// Pulsation tuning.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct PulseTuning {
    pub policy:            PulsePolicy,
    /// Default phase advance per tick.
    pub speed:             f32,
    /// Points around the rendered ring.
    pub ring_points:       usize,
    /// Ring jitter amplitude in pixels (each point perturbed within ±this).
    pub jitter_amplitude:  f32,
    /// Angular noise frequency for the calm jitter texture.
    pub jitter_step:       f32,
    /// Angular noise frequency when scared — high value gives a jagged ring.
    pub scared_jitter_step: f32,
    /// Noise-cursor advance per tick (drift pulsation and jitter time axis).
    pub time_step:         f32,
    pub noise_seed:        u64,
}

impl Default for PulseTuning {
    fn default() -> Self {
        PulseTuning {
            policy:             PulsePolicy::Heartbeat,
            speed:              0.0075,
            ring_points:        100,
            jitter_amplitude:   10.0,
            jitter_step:        0.1,
            scared_jitter_step: 10.0,
            time_step:          0.01,
            noise_seed:         7,
        }
    }
}

/// Ambient-mood probability partition.  `happy + bored + scared` must sum to
/// at most 1; the remainder of the unit interval maps to Neutral.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct MoodProbs {
    pub happy:  f32,
    pub bored:  f32,
    pub scared: f32,
}

impl Default for MoodProbs {
    fn default() -> Self {
        MoodProbs { happy: 0.40, bored: 0.30, scared: 0.20 }
    }
}

impl MoodProbs {
    pub fn sum(&self) -> f32 {
        self.happy + self.bored + self.scared
    }
}

/// Per-roll override probability partition for the Random policy.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct OverrideProbs {
    pub panic:       f32,
    pub bored_close: f32,
    pub happy_close: f32,
}

impl Default for OverrideProbs {
    fn default() -> Self {
        OverrideProbs { panic: 0.005, bored_close: 0.005, happy_close: 0.005 }
    }
}

impl OverrideProbs {
    pub fn sum(&self) -> f32 {
        self.panic + self.bored_close + self.happy_close
    }
}

/// One face-triggered reaction: its per-tick probability and the size-side
/// effects it applies while firing.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct TriggerTuning {
    pub probability:   f32,
    pub pulse_speed:   f32,
    pub radius_target: f32,
}

impl Default for TriggerTuning {
    fn default() -> Self {
        TriggerTuning { probability: 0.0, pulse_speed: 0.0075, radius_target: 100.0 }
    }
}

/// Mood state machine tuning.
///
/// Scalar knobs come first so the TOML rendering keeps them ahead of the
/// nested tables.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct MoodTuning {
    pub policy:              OverridePolicy,
    /// Ambient re-roll delay range, seconds.
    pub ambient_delay:       (f32, f32),
    /// Proximity re-roll delay range (Random policy), seconds.
    pub proximity_delay:     (f32, f32),
    /// Seconds an override stays active before it self-clears.
    pub override_duration:   f32,
    /// Face area above which a figure counts as "too close".
    pub face_area_threshold: f32,
    /// Smoothing factor for the override's base-radius nudge.
    pub nudge:               f32,
    pub ambient_probs:       MoodProbs,
    pub proximity_probs:     OverrideProbs,
    /// Face-triggered reactions, one per ambient mood that can react.
    pub panic:               TriggerTuning,
    pub bored_close:         TriggerTuning,
    pub happy_close:         TriggerTuning,
}

impl Default for MoodTuning {
    fn default() -> Self {
        MoodTuning {
            policy:              OverridePolicy::FaceTriggered,
            ambient_delay:       (8.0, 15.0),
            proximity_delay:     (1.0, 3.0),
            override_duration:   5.0,
            face_area_threshold: 10_000.0,
            nudge:               0.1,
            ambient_probs:       MoodProbs::default(),
            proximity_probs:     OverrideProbs::default(),
            panic: TriggerTuning {
                probability:   0.005,
                pulse_speed:   0.03,
                radius_target: 30.0,
            },
            bored_close: TriggerTuning {
                probability:   0.002,
                pulse_speed:   0.002,
                radius_target: 150.0,
            },
            happy_close: TriggerTuning {
                probability:   0.003,
                pulse_speed:   3.005,
                radius_target: 100.0,
            },
        }
    }
}

/// Palette tuning.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorTuning {
    /// Pulsating radius above which the gradient starts heating up.
    pub threshold:   f32,
    pub cold:        Rgb,
    pub hot:         Rgb,
    pub panic:       Rgb,
    pub bored_close: Rgb,
    pub happy_close: Rgb,
}

impl Default for ColorTuning {
    fn default() -> Self {
        ColorTuning {
            threshold:   130.0,
            cold:        Rgb::new(0, 0, 255),
            hot:         Rgb::new(255, 0, 0),
            panic:       Rgb::new(255, 0, 0),
            bored_close: Rgb::new(155, 155, 155),
            happy_close: Rgb::new(255, 223, 0),
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// OrbConfig
// ════════════════════════════════════════════════════════════════════════════

/// Complete configuration for the reactive core.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct OrbConfig {
    /// Keypoints at or below this confidence are discarded.
    pub min_score: f32,
    pub size:      SizeTuning,
    pub pulse:     PulseTuning,
    pub mood:      MoodTuning,
    pub color:     ColorTuning,
}

impl Default for OrbConfig {
    fn default() -> Self {
        OrbConfig {
            min_score: 0.1,
            size:      SizeTuning::default(),
            pulse:     PulseTuning::default(),
            mood:      MoodTuning::default(),
            color:     ColorTuning::default(),
        }
    }
}

impl OrbConfig {
    pub fn load(path: &str) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let cfg: OrbConfig = toml::from_str(&content)?;
        cfg.warn_on_suspect_values();
        Ok(cfg)
    }

    pub fn save(&self, path: &str) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Log (but tolerate) probability partitions that overflow the unit
    /// interval — the partition still works, the remainder states just
    /// become unreachable.
    pub fn warn_on_suspect_values(&self) {
        if self.mood.ambient_probs.sum() > 1.0 {
            warn!(
                "ambient mood probabilities sum to {:.3} (> 1): Neutral is unreachable",
                self.mood.ambient_probs.sum()
            );
        }
        if self.mood.proximity_probs.sum() > 1.0 {
            warn!(
                "proximity probabilities sum to {:.3} (> 1): no-override rolls are unreachable",
                self.mood.proximity_probs.sum()
            );
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_round_trip_through_toml() {
        let cfg = OrbConfig::default();
        let text = toml::to_string_pretty(&cfg).expect("serialize");
        let back: OrbConfig = toml::from_str(&text).expect("parse");
        assert_eq!(back.pulse.ring_points, cfg.pulse.ring_points);
        assert_eq!(back.mood.policy, cfg.mood.policy);
        assert_eq!(back.color.cold, cfg.color.cold);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let cfg: OrbConfig = toml::from_str(
            "[pulse]\npolicy = \"drift\"\n\n[mood]\npolicy = \"random\"\n",
        )
        .expect("parse");
        assert_eq!(cfg.pulse.policy, PulsePolicy::Drift);
        assert_eq!(cfg.mood.policy, OverridePolicy::Random);
        // untouched sections keep their defaults
        assert_eq!(cfg.size.area_exaggeration, 4.0);
        assert_eq!(cfg.pulse.speed, 0.0075);
        assert_eq!(cfg.min_score, 0.1);
    }

    #[test]
    fn default_probabilities_fit_the_unit_interval() {
        let cfg = OrbConfig::default();
        assert!(cfg.mood.ambient_probs.sum() <= 1.0);
        assert!(cfg.mood.proximity_probs.sum() <= 1.0);
    }
}
