//! # orb_core
//!
//! The reactive animation core: maps a stream of noisy, partially-missing
//! pose observations into a continuously varying visual signal — orb size,
//! color, and "personality" state.
//!
//! ## Pipeline (one tick)
//!
//! | Stage | Component | Effect |
//! |---|---|---|
//! | 1 | `MotionTracker` (pose_stream) | bounding-box area + mean keypoint velocity |
//! | 2 | [`SizeController`] | smooth `base_radius`/`max_radius` toward area-derived targets |
//! | 3 | [`MoodMachine`] | timed/probabilistic moods and proximity overrides |
//! | 4 | [`Pulsator`] | instantaneous pulsating radius + jittered ring points |
//! | 5 | color | cold→hot gradient, or a fixed override color |
//!
//! [`OrbReactor`] wires the stages together and emits one [`RenderFrame`]
//! per tick for a renderer to draw.  All state lives in a single owned
//! [`OrbState`]; the mood timers are explicit deadlines advanced by the host
//! loop, not hidden callbacks.
//!
//! Every tuning constant — thresholds, probability partitions, timer ranges,
//! pulse speeds — is carried in [`OrbConfig`] and loadable from TOML.

pub mod color;
pub mod config;
pub mod math;
pub mod mood;
pub mod noise;
pub mod pulse;
pub mod reactor;
pub mod size;
pub mod state;

pub use color::Rgb;
pub use config::{OrbConfig, OverridePolicy, PulsePolicy};
pub use mood::{Mood, MoodMachine, ProximityOverride};
pub use noise::ValueNoise;
pub use pulse::Pulsator;
pub use reactor::{OrbReactor, RenderFrame};
pub use size::SizeController;
pub use state::OrbState;
