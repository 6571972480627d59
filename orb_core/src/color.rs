//! Orb color derivation.
//!
//! The resting palette is a cold→hot gradient driven by how far the current
//! pulsating radius exceeds a threshold; an active proximity override
//! replaces the gradient with its own fixed color.

use serde::{Deserialize, Serialize};

use crate::config::ColorTuning;
use crate::math::map_range;
use crate::mood::ProximityOverride;

// ════════════════════════════════════════════════════════════════════════════
// Rgb
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Rgb { r, g, b }
    }

    /// Channel-wise linear interpolation toward `other`.
    pub fn lerp(self, other: Rgb, t: f32) -> Rgb {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round() as u8;
        Rgb::new(mix(self.r, other.r), mix(self.g, other.g), mix(self.b, other.b))
    }

    /// Packed 0xAARRGGBB with full alpha, for the framebuffer renderer.
    pub fn to_argb(self) -> u32 {
        0xFF00_0000 | (self.r as u32) << 16 | (self.g as u32) << 8 | self.b as u32
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Gradient
// ════════════════════════════════════════════════════════════════════════════

/// Color for the current tick.
///
/// `t` is 0 while the radius sits below the threshold, then climbs linearly
/// to 1 at `max_radius`; an active override short-circuits the gradient.
pub fn orb_color(
    radius: f32,
    max_radius: f32,
    proximity: ProximityOverride,
    tuning: &ColorTuning,
) -> Rgb {
    match proximity {
        ProximityOverride::Panic => tuning.panic,
        ProximityOverride::BoredClose => tuning.bored_close,
        ProximityOverride::HappyClose => tuning.happy_close,
        ProximityOverride::None => {
            let t = if radius > tuning.threshold && max_radius > tuning.threshold {
                map_range(radius, tuning.threshold, max_radius, 0.0, 1.0).clamp(0.0, 1.0)
            } else {
                0.0
            };
            tuning.cold.lerp(tuning.hot, t)
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    fn tuning() -> ColorTuning {
        ColorTuning::default()
    }

    #[test]
    fn below_threshold_is_cold() {
        let t = tuning();
        assert_eq!(orb_color(50.0, 600.0, ProximityOverride::None, &t), t.cold);
    }

    #[test]
    fn at_max_radius_is_hot() {
        let t = tuning();
        assert_eq!(orb_color(600.0, 600.0, ProximityOverride::None, &t), t.hot);
    }

    #[test]
    fn midway_is_a_blend() {
        let t = tuning();
        let c = orb_color(365.0, 600.0, ProximityOverride::None, &t);
        assert_ne!(c, t.cold);
        assert_ne!(c, t.hot);
    }

    #[test]
    fn override_color_wins_over_gradient() {
        let t = tuning();
        assert_eq!(orb_color(600.0, 600.0, ProximityOverride::Panic, &t), t.panic);
        assert_eq!(orb_color(10.0, 600.0, ProximityOverride::BoredClose, &t), t.bored_close);
        assert_eq!(orb_color(10.0, 600.0, ProximityOverride::HappyClose, &t), t.happy_close);
    }

    #[test]
    fn degenerate_max_radius_stays_cold() {
        // max_radius at/below the threshold must not divide by zero.
        let t = tuning();
        let c = orb_color(200.0, 130.0, ProximityOverride::None, &t);
        assert_eq!(c, t.cold);
    }

    #[test]
    fn argb_packing() {
        assert_eq!(Rgb::new(255, 0, 0).to_argb(), 0xFFFF_0000);
        assert_eq!(Rgb::new(0, 0, 255).to_argb(), 0xFF00_00FF);
    }
}
