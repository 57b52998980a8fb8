use bevy::math::cubic_splines::CubicSegment;
use bevy::prelude::*;
use constants::reveal::REVEAL_EASE_CONTROL_POINTS;

/// CSS-style `cubic-bezier` timing curve for reveal transitions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RevealEasing {
    curve: CubicSegment<Vec2>,
}

impl Default for RevealEasing {
    fn default() -> Self {
        let [x1, y1, x2, y2] = REVEAL_EASE_CONTROL_POINTS;
        Self::new(Vec2::new(x1, y1), Vec2::new(x2, y2))
    }
}

impl RevealEasing {
    pub fn new(p1: Vec2, p2: Vec2) -> Self {
        Self {
            curve: CubicSegment::new_bezier_easing(p1, p2),
        }
    }

    /// Map linear progress in `[0, 1]` onto the curve. Input outside the range is clamped.
    pub fn ease(&self, t: f32) -> f32 {
        if t.is_nan() || t <= 0.0 {
            return 0.0;
        }
        if t >= 1.0 {
            return 1.0;
        }
        self.curve.ease(t).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_end_points_are_exact() {
        let easing = RevealEasing::default();
        assert_eq!(easing.ease(0.0), 0.0);
        assert_eq!(easing.ease(1.0), 1.0);
        assert_eq!(easing.ease(-3.0), 0.0);
        assert_eq!(easing.ease(7.5), 1.0);
        assert_eq!(easing.ease(f32::NAN), 0.0);
    }

    #[test]
    fn test_reveal_curve_is_monotonic() {
        let easing = RevealEasing::default();
        let mut previous = 0.0;
        for step in 1..=100 {
            let value = easing.ease(step as f32 / 100.0);
            assert!(
                value >= previous,
                "curve decreasing at step {step}: {value} < {previous}"
            );
            previous = value;
        }
        assert_eq!(previous, 1.0);
    }

    #[test]
    fn test_reveal_curve_front_loads_progress() {
        // Control points sit above the diagonal, so the curve leads linear timing.
        let easing = RevealEasing::default();
        assert!(easing.ease(0.5) > 0.5);
        assert!(easing.ease(0.25) > 0.25);
    }
}
