//! Size controller: maps activity into radius targets and eases the orb
//! toward them.
//!
//! Two separate concerns, deliberately decoupled: the figure's spatial
//! extent decides how big the orb *should* be, while the figure's motion
//! energy decides how *fast* it gets there.  The result tracks a person
//! walking toward the camera without jittering on pose-estimation noise.

use pose_stream::ActivityState;

use crate::config::SizeTuning;
use crate::math::{lerp, map_range};
use crate::state::OrbState;

pub struct SizeController {
    tuning: SizeTuning,
}

impl SizeController {
    pub fn new(tuning: SizeTuning) -> Self {
        SizeController { tuning }
    }

    /// Radius targets (base, max) implied by a bounding-box area, before
    /// smoothing and clamping.
    pub fn target_radii(&self, area: f32) -> (f32, f32) {
        let t = &self.tuning;
        let base = map_range(area, 0.0, t.area_domain, t.base_target.0, t.base_target.1)
            * t.area_exaggeration;
        let max = map_range(area, 0.0, t.area_domain, t.max_target.0, t.max_target.1)
            * t.area_exaggeration;
        (base, max)
    }

    /// Advance one tick.
    ///
    /// With no valid keypoints the radii are left exactly where they are —
    /// an empty frame is "no new information", not "shrink to nothing".
    /// The smoothing factor for the *next* tick is derived from the current
    /// mean velocity, so a burst of motion speeds up subsequent transitions.
    pub fn tick(&self, state: &mut OrbState, activity: &ActivityState) {
        if activity.bounds.is_none() {
            return;
        }

        let (target_base, target_max) = self.target_radii(activity.area);
        let t = &self.tuning;

        state.base_radius = lerp(state.base_radius, target_base, state.transition_factor)
            .clamp(t.base_clamp.0, t.base_clamp.1);
        state.max_radius = lerp(state.max_radius, target_max, state.transition_factor)
            .clamp(t.max_clamp.0, t.max_clamp.1);

        state.transition_factor =
            map_range(activity.velocity, 0.0, t.velocity_domain, t.transition_range.0, t.transition_range.1)
                .clamp(t.transition_range.0, t.transition_range.1);
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
