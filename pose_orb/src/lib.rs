//! # pose_orb
//!
//! Interactive pulsating-orb sketch driven by pose estimation.
//!
//! A pose source delivers raw keypoint observations over a channel; the
//! `orb_core` reactor turns them into a ring of jittered points with a
//! continuously evolving radius, color, and mood; the visualizer draws the
//! ring into a software framebuffer with a fading trail.
//!
//! ## Pose sources
//!
//! * (default) — **Simulated figure**: a synthetic 17-keypoint person that
//!   wanders and breathes, steered from the keyboard.  No camera or model
//!   needed.
//! * `--source stdin` / `--source <file>` — **External model adapter**:
//!   newline-delimited ml5/PoseNet-shaped JSON from a real pose process.
//!
//! ## Simulation keyboard controls
//!
//! | Key | Effect |
//! |---|---|
//! | Arrow keys | Move the figure around the capture frame |
//! | `W` / `S` | Walk toward / away from the camera (scale up / down) |
//! | `Space` | Burst of motion (shakes every keypoint) |
//! | `H` | Hide / show the figure (empty observations) |
//! | `Q` | Quit |
//!
//! The orb's moods re-roll on their own timers regardless of input; get the
//! figure close (scale up) while the orb is scared and it may panic.

pub mod app;
pub mod source;
pub mod visualizer;
